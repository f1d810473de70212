//! Outbound email delivery.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::config::MailConfig;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail provider rejected the message: {0}")]
    Provider(String),
    #[error("mail transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Gateway to whatever delivers email. Handlers treat delivery as
/// best-effort: a failed send is logged, never surfaced to the client.
#[async_trait]
pub trait EmailGateway: Send + Sync {
    async fn compose_and_send(&self, to: &str, subject: &str, body: &str)
        -> Result<(), MailError>;
}

/// HTTP mail provider (mailgun-style messages endpoint, form-encoded,
/// basic auth with the API key).
pub struct HttpMailer {
    api_url: String,
    api_key: String,
    from_address: String,
    client: reqwest::Client,
}

impl HttpMailer {
    pub fn new(api_url: String, api_key: String, from_address: String) -> Self {
        Self {
            api_url,
            api_key,
            from_address,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl EmailGateway for HttpMailer {
    async fn compose_and_send(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), MailError> {
        let params = [
            ("from", self.from_address.as_str()),
            ("to", to),
            ("subject", subject),
            ("text", body),
        ];
        let res = self
            .client
            .post(&self.api_url)
            .form(&params)
            .basic_auth("api", Some(&self.api_key))
            .send()
            .await?;

        if res.status().is_success() {
            tracing::debug!(to, subject, "verification email accepted by provider");
            Ok(())
        } else {
            Err(MailError::Provider(format!(
                "response status {}",
                res.status()
            )))
        }
    }
}

/// Development mailer: messages go to the log instead of the wire.
pub struct LogMailer;

#[async_trait]
impl EmailGateway for LogMailer {
    async fn compose_and_send(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), MailError> {
        tracing::info!(to, subject, body, "outbound email (log-only mailer)");
        Ok(())
    }
}

/// Pick the gateway implied by configuration: a real provider when its
/// endpoint and key are set, the log-only mailer otherwise.
pub fn from_config(cfg: &MailConfig) -> Arc<dyn EmailGateway> {
    match (&cfg.api_url, &cfg.api_key) {
        (Some(url), Some(key)) => Arc::new(HttpMailer::new(
            url.clone(),
            key.clone(),
            cfg.from_address.clone(),
        )),
        _ => Arc::new(LogMailer),
    }
}

/// Subject and body for the signup verification email.
pub fn verification_message(name: &str, otp: &str) -> (String, String) {
    let subject = "Verify your Staynest account".to_string();
    let body = format!(
        "Hi {name},\n\nYour verification code is {otp}. \
         It expires in a few minutes, so enter it soon.\n\n\
         If you did not sign up, you can ignore this email.",
    );
    (subject, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verification_message_names_the_code() {
        let (subject, body) = verification_message("Asha", "123456");
        assert!(subject.contains("Verify"));
        assert!(body.contains("123456"));
        assert!(body.contains("Asha"));
    }

    #[test]
    fn unconfigured_mail_falls_back_to_log_mailer() {
        let cfg = MailConfig {
            api_url: None,
            api_key: Some("key".into()),
            from_address: "a@b.c".into(),
        };
        // No endpoint configured, so this must not pick the HTTP mailer.
        let _gateway = from_config(&cfg);
    }
}
