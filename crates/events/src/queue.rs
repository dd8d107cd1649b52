//! Bounded background email queue.
//!
//! Request handlers call [`EmailQueue::submit`], which never blocks: when the
//! channel is full the message is dropped with a warning. A single
//! [`EmailWorker`] drains the channel, retrying each message with
//! exponential backoff before giving up on it. The worker exits when the
//! cancellation token fires or every [`EmailQueue`] handle has been dropped.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::delivery::email::{EmailMessage, MailTransport};

/// Default channel capacity when `EMAIL_QUEUE_CAPACITY` is not set.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Retry schedule for a single message.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles after every failure.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Backoff to wait after the given failed attempt (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
    }
}

/// Cloneable producer handle stored in application state.
#[derive(Clone)]
pub struct EmailQueue {
    sender: mpsc::Sender<EmailMessage>,
}

impl EmailQueue {
    /// Create a queue and the worker that drains it.
    pub fn new(
        capacity: usize,
        transport: Arc<dyn MailTransport>,
        policy: RetryPolicy,
    ) -> (Self, EmailWorker) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let worker = EmailWorker {
            receiver,
            transport,
            policy,
        };
        (Self { sender }, worker)
    }

    /// Enqueue a message without waiting. Returns `false` if it was dropped.
    pub fn submit(&self, message: EmailMessage) -> bool {
        match self.sender.try_send(message) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(message)) => {
                tracing::warn!(to = %message.to, subject = %message.subject, "Email queue full, dropping message");
                false
            }
            Err(mpsc::error::TrySendError::Closed(message)) => {
                tracing::warn!(to = %message.to, "Email worker stopped, dropping message");
                false
            }
        }
    }
}

/// Consumer side of an [`EmailQueue`].
pub struct EmailWorker {
    receiver: mpsc::Receiver<EmailMessage>,
    transport: Arc<dyn MailTransport>,
    policy: RetryPolicy,
}

impl EmailWorker {
    /// Drain the queue until `cancel` fires or all producers are gone.
    pub async fn run(mut self, cancel: CancellationToken) {
        tracing::info!(max_attempts = self.policy.max_attempts, "Email worker started");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Email worker stopping");
                    break;
                }
                next = self.receiver.recv() => match next {
                    Some(message) => {
                        self.deliver(&message).await;
                    }
                    None => {
                        tracing::info!("Email queue closed, worker stopping");
                        break;
                    }
                },
            }
        }
    }

    /// Send one message, retrying per the policy. Returns `true` on success.
    pub async fn deliver(&self, message: &EmailMessage) -> bool {
        let max_attempts = self.policy.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            match self.transport.send(message).await {
                Ok(()) => return true,
                Err(e) if attempt < max_attempts => {
                    let delay = self.policy.delay_after(attempt);
                    tracing::warn!(
                        error = %e,
                        to = %message.to,
                        attempt,
                        retry_in_ms = delay.as_millis() as u64,
                        "Email send failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        to = %message.to,
                        attempts = attempt,
                        "Email send failed, dropping message"
                    );
                }
            }
        }
        false
    }
}
