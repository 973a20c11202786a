//! SMTP delivery of the rendered digest.
//!
//! Builds a `multipart/alternative` message (a short plain-text part plus
//! the HTML digest) and submits it over a STARTTLS connection with LOGIN
//! credentials. One message per run.
//!
//! This is the last pipeline boundary: every failure mode (unparseable
//! addresses, message build errors, transport and auth failures) is caught,
//! logged, and reported as a `false` return. Nothing propagates past it.

use crate::cli::Cli;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::error::Error;
use tracing::{error, info, instrument};

/// Assemble the digest message for the configured sender and recipient.
fn build_message(cli: &Cli, html: String, date: &str) -> Result<Message, Box<dyn Error>> {
    let from: Mailbox = cli.mail_address.parse()?;
    let to: Mailbox = cli.recipient.parse()?;

    let subject = format!("🎯 Your Google Ads Digest - {date}");
    let plain = format!(
        "Your Google Ads digest for {date}. Open this message in an HTML-capable mail client to read it."
    );

    let message = Message::builder()
        .from(from)
        .to(to)
        .subject(subject)
        .multipart(MultiPart::alternative_plain_html(plain, html))?;
    Ok(message)
}

/// Send the rendered digest by email.
///
/// # Arguments
///
/// * `cli` - Sender/recipient/credential configuration
/// * `html` - The rendered digest document
/// * `date` - Date stamp for the subject line
///
/// # Returns
///
/// `true` when the SMTP server accepted the message, `false` on any
/// failure. Never panics and never returns an error.
#[instrument(level = "info", skip_all, fields(host = %cli.smtp_host, port = cli.smtp_port))]
pub async fn send_digest(cli: &Cli, html: String, date: &str) -> bool {
    let message = match build_message(cli, html, date) {
        Ok(message) => message,
        Err(e) => {
            error!(error = %e, "Failed to build digest message");
            return false;
        }
    };

    let mailer = match AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&cli.smtp_host) {
        Ok(builder) => builder
            .port(cli.smtp_port)
            .credentials(Credentials::new(
                cli.mail_address.clone(),
                cli.mail_password.clone(),
            ))
            .build(),
        Err(e) => {
            error!(error = %e, "SMTP relay host rejected");
            return false;
        }
    };

    match mailer.send(message).await {
        Ok(response) => {
            info!(code = %response.code(), "Digest email sent");
            true
        }
        Err(e) => {
            error!(error = %e, "Digest email failed to send");
            false
        }
    }
}
