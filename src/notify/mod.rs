pub mod handlers;
pub mod mailer;

pub use handlers::admin_router;
pub use mailer::{Mailer, SmtpMailer};
