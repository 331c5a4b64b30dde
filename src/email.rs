use axum::async_trait;
use tracing::info;

/// Email delivery abstraction. Delivery is fire-and-forget from the login
/// handler; failures are logged and never surfaced to the client.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_otp(&self, to: &str, code: &str) -> anyhow::Result<()>;
}

/// Local dev transport that logs the passcode instead of sending real email.
#[derive(Clone, Debug)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_otp(&self, to: &str, code: &str) -> anyhow::Result<()> {
        info!(to_email = %to, code = %code, "sending OTP email (log transport)");
        Ok(())
    }
}
