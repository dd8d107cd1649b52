//! Mentorly outbound notification infrastructure.
//!
//! - [`delivery`]: SMTP delivery behind the [`MailTransport`] seam.
//! - [`EmailQueue`]: bounded background queue with retry and drop policy.

pub mod delivery;
pub mod queue;

pub use delivery::email::{EmailConfig, EmailDelivery, EmailError, EmailMessage, MailTransport};
pub use queue::{EmailQueue, EmailWorker, RetryPolicy, DEFAULT_QUEUE_CAPACITY};
