use async_trait::async_trait;
use lettre::{
    message::Mailbox, transport::smtp::authentication::Credentials, AsyncSmtpTransport,
    AsyncTransport, Message, Tokio1Executor,
};

use crate::config::SmtpConfig;

/// Outgoing mail transport. Trait seam so tests and the notify handler never
/// touch a real SMTP server.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();
        let from = config
            .from
            .parse::<Mailbox>()
            .map_err(|e| anyhow::anyhow!("invalid SMTP from address: {e}"))?;
        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to
                .parse::<Mailbox>()
                .map_err(|e| anyhow::anyhow!("invalid recipient {to:?}: {e}"))?)
            .subject(subject)
            .body(body.to_string())?;
        self.transport.send(message).await?;
        Ok(())
    }
}

pub const TAX_REMINDER_SUBJECT: &str = "Pending Tax Notification";

pub fn tax_reminder_body(leader_name: &str) -> String {
    format!(
        "Dear {leader_name}, you have pending tax to pay. \
         Please pay as soon as possible."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reminder_body_addresses_the_leader() {
        let body = tax_reminder_body("Ravi Kumar");
        assert!(body.starts_with("Dear Ravi Kumar,"));
        assert!(body.contains("pending tax"));
    }
}
