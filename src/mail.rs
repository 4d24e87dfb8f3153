use std::{sync::Arc, time::Duration};

use anyhow::Context;
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{debug, info, warn};

use crate::config::MailConfig;

const SMTP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: OutgoingMail) -> anyhow::Result<()>;
}

/// Picks the SMTP relay when `SMTP_HOST` is set, otherwise the logging fallback.
pub fn from_config(cfg: &MailConfig) -> anyhow::Result<Arc<dyn Mailer>> {
    match cfg.smtp_host {
        Some(_) => Ok(Arc::new(SmtpMailer::new(cfg)?)),
        None => {
            warn!("SMTP_HOST is not set: outgoing mail is logged and NOT delivered");
            Ok(Arc::new(LogMailer::new(cfg)))
        }
    }
}

/// Delivers through an SMTP relay, upgrading with STARTTLS when `SMTP_USE_TLS` is on.
pub struct SmtpMailer {
    from: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(cfg: &MailConfig) -> anyhow::Result<Self> {
        let host = cfg
            .smtp_host
            .as_deref()
            .context("SMTP_HOST must be set to relay mail")?;
        let from: Mailbox = cfg
            .from
            .parse()
            .with_context(|| format!("invalid MAIL_FROM address {:?}", cfg.from))?;

        let builder = if cfg.smtp_use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                .with_context(|| format!("invalid SMTP_HOST {host:?}"))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
        };
        let mut builder = builder.port(cfg.smtp_port).timeout(Some(SMTP_TIMEOUT));

        if let (Some(user), Some(password)) = (&cfg.smtp_user, &cfg.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), password.clone()));
        }

        info!(host, port = cfg.smtp_port, tls = cfg.smtp_use_tls, "smtp relay configured");
        Ok(Self {
            from,
            transport: builder.build(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: OutgoingMail) -> anyhow::Result<()> {
        let to: Mailbox = mail.to.parse().context("invalid recipient address")?;
        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(mail.subject)
            .header(ContentType::TEXT_HTML)
            .body(mail.html_body)
            .context("building mail")?;

        let response = self
            .transport
            .send(message)
            .await
            .context("smtp relay rejected mail")?;
        debug!(positive = response.is_positive(), "mail relayed");
        Ok(())
    }
}

/// Local development stand-in: writes mail metadata to the log and delivers nothing.
#[derive(Clone)]
pub struct LogMailer {
    from: String,
}

impl LogMailer {
    pub fn new(cfg: &MailConfig) -> Self {
        Self {
            from: cfg.from.clone(),
        }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: OutgoingMail) -> anyhow::Result<()> {
        anyhow::ensure!(!mail.to.is_empty(), "mail has no recipient");
        info!(from = %self.from, subject = %mail.subject, "mail not delivered (no smtp relay)");
        debug!(to = %mail.to, body_len = mail.html_body.len(), "undelivered mail");
        Ok(())
    }
}

pub fn password_reset_mail(to: &str, username: &str, reset_link: &str) -> OutgoingMail {
    let html_body = format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head><meta charset="UTF-8" /></head>
  <body style="font-family: 'Fira Sans', sans-serif; text-align: center">
    <h1>Hey {username},</h1>
    <h2>You need to change your SCENARIO password?</h2>
    <a href="{reset_link}" style="border: 1px solid #eab208; border-radius: 0.375rem; padding: 0.15rem 1rem; color: #eab208; text-decoration: none; font-weight: 600">RESET PASSWORD</a>
    <p>If you did not initiate this request, you can ignore this email.</p>
  </body>
</html>"#
    );
    OutgoingMail {
        to: to.to_string(),
        subject: format!("{username}, have you forgotten your password?"),
        html_body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::{
        io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
        net::TcpListener,
        sync::oneshot,
    };

    fn relay_config(port: u16) -> MailConfig {
        MailConfig {
            from: "no-reply@scenario.test".into(),
            smtp_host: Some("127.0.0.1".into()),
            smtp_port: port,
            smtp_user: None,
            smtp_password: None,
            smtp_use_tls: false,
        }
    }

    /// Accepts one SMTP session, answers every command positively and reports what it was told.
    async fn local_relay() -> (u16, oneshot::Receiver<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("addr").port();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.expect("accept");
            let (read, mut write) = stream.into_split();
            let mut lines = BufReader::new(read).lines();
            write.write_all(b"220 relay.test ESMTP\r\n").await.expect("greet");

            let mut transcript = Vec::new();
            let mut in_data = false;
            while let Ok(Some(line)) = lines.next_line().await {
                transcript.push(line.clone());
                if in_data {
                    if line == "." {
                        write.write_all(b"250 queued\r\n").await.expect("reply");
                        break;
                    }
                    continue;
                }
                let upper = line.to_ascii_uppercase();
                let reply: &[u8] = if upper.starts_with("EHLO") || upper.starts_with("HELO") {
                    b"250 relay.test\r\n"
                } else if upper.starts_with("DATA") {
                    in_data = true;
                    b"354 end data with <CR><LF>.<CR><LF>\r\n"
                } else {
                    b"250 ok\r\n"
                };
                write.write_all(reply).await.expect("reply");
            }
            let _ = tx.send(transcript);
        });

        (port, rx)
    }

    #[test]
    fn reset_mail_contains_link_and_name() {
        let mail = password_reset_mail(
            "fan@example.com",
            "moviefan",
            "http://localhost:3000/reset-password/abc",
        );
        assert_eq!(mail.to, "fan@example.com");
        assert!(mail.subject.starts_with("moviefan"));
        assert!(mail.html_body.contains("http://localhost:3000/reset-password/abc"));
    }

    #[tokio::test]
    async fn smtp_mailer_delivers_to_configured_relay() {
        let (port, transcript) = local_relay().await;
        let mailer = SmtpMailer::new(&relay_config(port)).expect("mailer");

        mailer
            .send(password_reset_mail(
                "fan@example.com",
                "moviefan",
                "http://localhost:3000/reset-password/abc",
            ))
            .await
            .expect("relay accepts mail");

        let transcript = transcript.await.expect("relay saw a session");
        assert!(transcript
            .iter()
            .any(|l| l.starts_with("MAIL FROM:<no-reply@scenario.test>")));
        assert!(transcript
            .iter()
            .any(|l| l.starts_with("RCPT TO:<fan@example.com>")));
        assert!(transcript
            .iter()
            .any(|l| l == "Subject: moviefan, have you forgotten your password?"));
    }

    #[tokio::test]
    async fn unreachable_relay_is_an_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("addr").port();
        drop(listener);

        let mailer = SmtpMailer::new(&relay_config(port)).expect("mailer");
        let res = mailer
            .send(password_reset_mail("fan@example.com", "moviefan", "http://x"))
            .await;
        assert!(res.is_err());
    }

    #[test]
    fn smtp_mailer_needs_host_and_valid_sender() {
        let mut cfg = relay_config(25);
        cfg.smtp_host = None;
        assert!(SmtpMailer::new(&cfg).is_err());

        let mut cfg = relay_config(25);
        cfg.from = "not an address".into();
        assert!(SmtpMailer::new(&cfg).is_err());
    }

    #[tokio::test]
    async fn log_mailer_rejects_empty_recipient() {
        let mailer = LogMailer {
            from: "no-reply@scenario.local".into(),
        };
        let err = mailer
            .send(password_reset_mail("", "moviefan", "http://x"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("recipient"));
    }
}
