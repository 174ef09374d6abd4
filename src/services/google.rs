use color_eyre::{eyre::OptionExt, Result};
use serde::Deserialize;

use crate::db::FederatedIdentity;

pub const PROVIDER: &str = "google.com";

const AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct UserInfo {
    sub: String,
    email: Option<String>,
    #[serde(default)]
    email_verified: bool,
    name: Option<String>,
    picture: Option<String>,
}

/// Google sign-in via the OAuth 2.0 authorization-code flow.
#[derive(Clone)]
pub struct GoogleOAuth {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
    redirect_url: String,
}

impl GoogleOAuth {
    /// `None` unless both client credentials are configured.
    pub fn from_credentials(
        client_id: Option<String>,
        client_secret: Option<String>,
        base_url: &str,
    ) -> Option<Self> {
        let client_id = client_id.filter(|s| !s.is_empty())?;
        let client_secret = client_secret.filter(|s| !s.is_empty())?;
        Some(Self {
            http: reqwest::Client::new(),
            client_id,
            client_secret,
            redirect_url: format!(
                "{}{}",
                base_url.trim_end_matches('/'),
                crate::names::GOOGLE_CALLBACK_URL
            ),
        })
    }

    pub fn authorize_url(&self, state: &str) -> String {
        format!(
            "{AUTHORIZE_URL}?response_type=code&client_id={}&redirect_uri={}&scope={}&state={}&prompt=select_account",
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_url),
            urlencoding::encode("openid email profile"),
            urlencoding::encode(state),
        )
    }

    /// Trades an authorization code for the signed-in Google account.
    pub async fn exchange(&self, code: &str) -> Result<FederatedIdentity> {
        let resp = self
            .http
            .post(TOKEN_URL)
            .form(&[
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", self.redirect_url.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            tracing::error!("Google token exchange failed: {status} - {text}");
            color_eyre::eyre::bail!("Google token endpoint returned {status}");
        }

        let token = resp.json::<TokenResponse>().await?;

        let info = self
            .http
            .get(USERINFO_URL)
            .bearer_auth(&token.access_token)
            .send()
            .await?
            .error_for_status()?
            .json::<UserInfo>()
            .await?;

        identity_from_userinfo(info)
    }
}

fn identity_from_userinfo(info: UserInfo) -> Result<FederatedIdentity> {
    let email = info.email.ok_or_eyre("Google account has no email address")?;
    let display_name = info
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_string());

    Ok(FederatedIdentity {
        provider: PROVIDER.to_string(),
        subject: info.sub,
        email,
        display_name,
        photo_url: info.picture,
        email_verified: info.email_verified,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn disabled_without_both_credentials() {
        assert!(GoogleOAuth::from_credentials(None, Some("s".into()), "http://x").is_none());
        assert!(GoogleOAuth::from_credentials(Some("id".into()), None, "http://x").is_none());
        assert!(
            GoogleOAuth::from_credentials(Some(String::new()), Some("s".into()), "http://x")
                .is_none()
        );
    }

    #[test]
    fn authorize_url_carries_encoded_redirect_and_state() {
        let google = GoogleOAuth::from_credentials(
            Some("client-1".into()),
            Some("secret".into()),
            "https://gita.example/",
        )
        .unwrap();

        let url = google.authorize_url("01STATE");

        assert!(url.starts_with(AUTHORIZE_URL));
        assert!(url.contains("client_id=client-1"));
        assert!(url.contains("redirect_uri=https%3A%2F%2Fgita.example%2Flogin%2Fgoogle%2Fcallback"));
        assert!(url.contains("scope=openid%20email%20profile"));
        assert!(url.contains("state=01STATE"));
    }

    #[test]
    fn userinfo_without_name_uses_email_local_part() {
        let info: UserInfo = serde_json::from_str(
            r#"{"sub":"42","email":"arjuna@example.com","email_verified":true}"#,
        )
        .unwrap();

        let identity = identity_from_userinfo(info).unwrap();

        assert_eq!(identity.provider, PROVIDER);
        assert_eq!(identity.subject, "42");
        assert_eq!(identity.display_name, "arjuna");
        assert!(identity.email_verified);
    }

    #[test]
    fn userinfo_without_email_is_rejected() {
        let info: UserInfo = serde_json::from_str(r#"{"sub":"42"}"#).unwrap();
        assert!(identity_from_userinfo(info).is_err());
    }
}
