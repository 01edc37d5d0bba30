use crate::domain::ports::Mailer;
use crate::error::AppError;
use async_trait::async_trait;
use tracing::{debug, info};

/// Mail transport that only writes to the log. Delivery is handled outside
/// this service.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), AppError> {
        info!(recipient, subject, "Mail handed to log transport");
        debug!(body, "Mail body");
        Ok(())
    }
}
