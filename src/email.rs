//! Delivers the combined digest over SMTP

use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::{info, instrument};

use crate::config::EmailConfig;
use crate::models::CombinedReport;
use crate::{DigestError, Result};

/// Anything that can deliver a finished digest
pub trait ReportSender {
    async fn send(&self, report: &CombinedReport) -> Result<()>;
}

/// Sends the digest as a plain-text + HTML alternative message
#[derive(Clone)]
pub struct SmtpSender {
    mailer: SmtpTransport,
    from: Mailbox,
    to: Vec<Mailbox>,
}

impl SmtpSender {
    pub fn from_config(config: &EmailConfig) -> Result<Self> {
        let from = config
            .from
            .as_deref()
            .ok_or_else(|| DigestError::config("email.from is required to send the digest"))?;
        let from = parse_mailbox(from)?;

        if config.to.is_empty() {
            return Err(DigestError::config(
                "email.to needs at least one recipient",
            ));
        }
        let to = config
            .to
            .iter()
            .map(|address| parse_mailbox(address))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            mailer: create_mailer(config)?,
            from,
            to,
        })
    }

    /// Assemble the message for `report`
    pub fn build_message(&self, report: &CombinedReport) -> Result<Message> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(report.subject.clone());
        for recipient in &self.to {
            builder = builder.to(recipient.clone());
        }
        builder
            .multipart(MultiPart::alternative_plain_html(
                report.weather_info.clone(),
                report.html_body.clone(),
            ))
            .map_err(|e| DigestError::email(format!("Failed to build message: {e}")))
    }
}

impl ReportSender for SmtpSender {
    #[instrument(skip(self, report), fields(subject = %report.subject))]
    async fn send(&self, report: &CombinedReport) -> Result<()> {
        let email = self.build_message(report)?;
        let mailer = self.mailer.clone();

        // lettre's SmtpTransport is blocking
        tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| DigestError::general(format!("Email task failed: {e}")))?
            .map_err(|e| DigestError::email(format!("Failed to send email: {e}")))?;

        info!(
            "Sent weather digest for {} location(s) to {} recipient(s)",
            report.location_count(),
            self.to.len()
        );
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox> {
    address
        .parse()
        .map_err(|e| DigestError::config(format!("Invalid email address '{address}': {e}")))
}

fn create_mailer(config: &EmailConfig) -> Result<SmtpTransport> {
    let builder = match config.tls.as_str() {
        "tls" => SmtpTransport::relay(&config.smtp_host),
        "starttls" => SmtpTransport::starttls_relay(&config.smtp_host),
        "none" => Ok(SmtpTransport::builder_dangerous(&config.smtp_host)),
        other => {
            return Err(DigestError::config(format!(
                "Unknown email tls mode '{other}'"
            )));
        }
    }
    .map_err(|e| DigestError::config(format!("Invalid SMTP relay '{}': {e}", config.smtp_host)))?;

    let builder = match config.smtp_port {
        Some(port) => builder.port(port),
        None => builder,
    };

    let builder = match (&config.username, &config.password) {
        (Some(username), Some(password)) => {
            builder.credentials(Credentials::new(username.clone(), password.clone()))
        }
        (None, None) => builder,
        _ => {
            return Err(DigestError::config(
                "email.username and email.password must be set together",
            ));
        }
    };

    Ok(builder.build())
}
