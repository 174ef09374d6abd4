use color_eyre::Result;
use serde::Serialize;

use crate::services::auth::EmailSender;

const FROM_ADDRESS: &str = "Gitapath <noreply@gitapath.app>";

#[derive(Serialize)]
struct SendEmailRequest {
    from: String,
    to: Vec<String>,
    subject: String,
    html: String,
}

/// Sends transactional email through the Resend API. Without an API key
/// sending is disabled and sign-up skips the verification email.
#[derive(Clone)]
pub struct ResendEmailSender {
    http: reqwest::Client,
    api_key: Option<String>,
}

impl ResendEmailSender {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.filter(|k| !k.is_empty()),
        }
    }
}

impl EmailSender for ResendEmailSender {
    fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    async fn send_verification_email(&self, to_email: &str, verification_url: &str) -> Result<()> {
        let Some(api_key) = &self.api_key else {
            color_eyre::eyre::bail!("email sending is not configured");
        };

        let body = SendEmailRequest {
            from: FROM_ADDRESS.to_string(),
            to: vec![to_email.to_string()],
            subject: "Verify your Gitapath account".to_string(),
            html: format!(
                r#"<h2>Welcome to Gitapath!</h2>
<p>Click the link below to verify your email address:</p>
<p><a href="{verification_url}">{verification_url}</a></p>
<p>This link expires in 24 hours.</p>"#
            ),
        };

        let resp = self
            .http
            .post("https://api.resend.com/emails")
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            tracing::error!("Resend API error: {status} - {text}");
            color_eyre::eyre::bail!("Resend API returned {status}");
        }

        tracing::info!("verification email sent to {to_email}");
        Ok(())
    }
}
