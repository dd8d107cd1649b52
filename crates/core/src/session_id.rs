//! Opaque random identifiers: session ids and other one-time values.

use rand::RngCore;

/// Number of random bytes behind each session id (256 bits).
pub const SESSION_ID_BYTES: usize = 32;

/// Lifetime of both a login session row and the bearer token issued with it.
pub const SESSION_LIFETIME_DAYS: i64 = 7;

/// `len` bytes from the thread-local CSPRNG, lowercase hex encoded.
pub fn random_hex(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rand::rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Generate a fresh session id of [`SESSION_ID_BYTES`] random bytes.
pub fn generate_session_id() -> String {
    random_hex(SESSION_ID_BYTES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_is_64_lowercase_hex_chars() {
        let id = generate_session_id();
        assert_eq!(id.len(), SESSION_ID_BYTES * 2);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn random_hex_length_follows_byte_count() {
        assert_eq!(random_hex(16).len(), 32);
        assert_eq!(random_hex(0), "");
    }

    #[test]
    fn session_ids_do_not_repeat() {
        let ids: std::collections::HashSet<String> =
            (0..256).map(|_| generate_session_id()).collect();
        assert_eq!(ids.len(), 256);
    }
}
