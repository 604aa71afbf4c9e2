//! Mail-sending abstraction for confirmation and reset tokens

pub mod console;

pub use console::ConsoleMailer;

/// Trait for delivering auth-related mail. Tests substitute a capturing
/// mock; the binary wires up the console implementation.
pub trait Mailer: Send + Sync {
    /// Send an account confirmation token to an address
    fn send_confirmation(&self, email: &str, token: &str) -> Result<(), String>;

    /// Send a password reset token to an address
    fn send_password_reset(&self, email: &str, token: &str) -> Result<(), String>;
}

impl Mailer for Box<dyn Mailer> {
    fn send_confirmation(&self, email: &str, token: &str) -> Result<(), String> {
        (**self).send_confirmation(email, token)
    }

    fn send_password_reset(&self, email: &str, token: &str) -> Result<(), String> {
        (**self).send_password_reset(email, token)
    }
}
