//! SMTP adapter for operator emails.
//!
//! Implements the core `MailPort` port with `lettre`. Authentication is PLAIN
//! only; STARTTLS is used when the relay offers it.

use async_trait::async_trait;
use fwatch_core::{
    config::SmtpSettings, domain::EmailMessage, errors::Error, ports::MailPort, Result,
};
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::{
        authentication::{Credentials, Mechanism},
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::debug;

pub const SENDER_NAME: &str = "ASOIAF notifications";

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    /// Checked per message, so a bad address fails a send rather than startup.
    from: String,
}

impl SmtpMailer {
    pub fn new(smtp: &SmtpSettings) -> Result<Self> {
        let tls = TlsParameters::new(smtp.host.clone())
            .map_err(|e| Error::Email(format!("invalid TLS parameters for {}: {e}", smtp.host)))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(smtp.host.as_str())
            .port(smtp.port)
            .tls(Tls::Opportunistic(tls))
            .credentials(Credentials::new(smtp.user.clone(), smtp.password.clone()))
            .authentication(vec![Mechanism::Plain])
            .build();

        Ok(Self {
            transport,
            from: smtp.from.clone(),
        })
    }
}

#[async_trait]
impl MailPort for SmtpMailer {
    async fn send(&self, msg: &EmailMessage) -> Result<()> {
        let email = compose(&self.from, msg)?;
        let resp = self
            .transport
            .send(email)
            .await
            .map_err(|e| Error::Email(format!("failed to send email via SMTP: {e}")))?;
        debug!("SMTP accepted message to {}: {:?}", msg.to, resp.code());
        Ok(())
    }
}

/// `ASOIAF notifications <address>`.
pub fn sender(address: &str) -> Result<Mailbox> {
    let address = address
        .parse()
        .map_err(|e| Error::Email(format!("invalid from address {address:?}: {e}")))?;
    Ok(Mailbox::new(Some(SENDER_NAME.to_string()), address))
}

/// Message from `ASOIAF notifications <from>`.
pub fn compose(from: &str, msg: &EmailMessage) -> Result<Message> {
    build_message(&sender(from)?, msg)
}

/// Single-recipient plain-text message.
pub fn build_message(from: &Mailbox, msg: &EmailMessage) -> Result<Message> {
    let to: Mailbox = msg
        .to
        .parse()
        .map_err(|e| Error::Email(format!("invalid to address {:?}: {e}", msg.to)))?;

    Message::builder()
        .from(from.clone())
        .to(to)
        .subject(msg.subject.as_str())
        .header(ContentType::TEXT_PLAIN)
        .body(msg.body.clone())
        .map_err(|e| Error::Email(format!("failed to build email: {e}")))
}
