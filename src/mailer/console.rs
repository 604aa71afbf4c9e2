use super::Mailer;

/// Logs mail to the console instead of sending it. Good enough for
/// development; swap in a real transport behind the same trait for
/// production.
#[derive(Default, Clone)]
pub struct ConsoleMailer;

impl ConsoleMailer {
    pub fn new() -> Self {
        Self
    }
}

impl Mailer for ConsoleMailer {
    fn send_confirmation(&self, email: &str, token: &str) -> Result<(), String> {
        tracing::info!(email = %email, token = %token, "Confirmation mail (console)");
        Ok(())
    }

    fn send_password_reset(&self, email: &str, token: &str) -> Result<(), String> {
        tracing::info!(email = %email, token = %token, "Password reset mail (console)");
        Ok(())
    }
}
