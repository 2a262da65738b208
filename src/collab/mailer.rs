use anyhow::Context;
use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Attachment, Mailbox, MultiPart, SinglePart, header::ContentType},
    transport::smtp::authentication::Credentials,
};

use crate::config::AppConfig;

#[derive(Debug, Clone)]
pub struct MailAttachment {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Outbound email collaborator: delivery success or failure, nothing more.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        attachment: Option<MailAttachment>,
    ) -> anyhow::Result<()>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let from: Mailbox = config
            .mail_from
            .parse()
            .context("MAIL_FROM is not a valid mailbox")?;

        let transport = match (&config.smtp_user, &config.smtp_pass) {
            (Some(user), Some(pass)) => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
                    .port(config.smtp_port)
                    .credentials(Credentials::new(user.clone(), pass.clone()))
                    .build()
            }
            // No credentials configured: plain connection, e.g. a local relay.
            _ => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
                .port(config.smtp_port)
                .build(),
        };

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        attachment: Option<MailAttachment>,
    ) -> anyhow::Result<()> {
        let to: Mailbox = to.parse().context("recipient is not a valid mailbox")?;
        let builder = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject);

        let email = match attachment {
            Some(att) => {
                let content_type = ContentType::parse(&att.content_type)
                    .context("attachment content type is invalid")?;
                builder.multipart(
                    MultiPart::mixed()
                        .singlepart(SinglePart::plain(body.to_string()))
                        .singlepart(Attachment::new(att.filename).body(att.bytes, content_type)),
                )?
            }
            None => builder.body(body.to_string())?,
        };

        self.transport.send(email).await.context("smtp delivery failed")?;
        Ok(())
    }
}
