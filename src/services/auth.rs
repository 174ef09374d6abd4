use color_eyre::Result;

use crate::db::{AuthUser, Db, FederatedIdentity, FederatedMatch};
use crate::email::ResendEmailSender;
use crate::utils::normalize_email;

// ---------------------------------------------------------------------------
// AuthRepository trait (DIP: service defines the abstraction it needs)
// ---------------------------------------------------------------------------

#[cfg_attr(test, mockall::automock)]
pub trait AuthRepository: Send + Sync {
    fn email_exists(&self, email: &str) -> impl std::future::Future<Output = Result<bool>> + Send;

    fn create_user(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> impl std::future::Future<Output = Result<(i32, String)>> + Send;

    fn create_user_session(
        &self,
        user_id: i32,
    ) -> impl std::future::Future<Output = Result<String>> + Send;

    fn verify_user_password(
        &self,
        email: &str,
        password: &str,
    ) -> impl std::future::Future<Output = Result<bool>> + Send;

    fn find_user_by_email(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<AuthUser>>> + Send;

    fn delete_user_session(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    fn verify_email_token(
        &self,
        token: &str,
    ) -> impl std::future::Future<Output = Result<bool>> + Send;

    fn regenerate_verification_token(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>>> + Send;

    fn find_or_create_federated_user(
        &self,
        identity: &FederatedIdentity,
    ) -> impl std::future::Future<Output = Result<FederatedMatch>> + Send;
}

impl AuthRepository for Db {
    async fn email_exists(&self, email: &str) -> Result<bool> {
        Db::email_exists(self, email).await
    }

    async fn create_user(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<(i32, String)> {
        Db::create_user(self, email, password, display_name).await
    }

    async fn create_user_session(&self, user_id: i32) -> Result<String> {
        Db::create_user_session(self, user_id).await
    }

    async fn verify_user_password(&self, email: &str, password: &str) -> Result<bool> {
        Db::verify_user_password(self, email, password).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>> {
        Db::find_user_by_email(self, email).await
    }

    async fn delete_user_session(&self, session_id: &str) -> Result<()> {
        Db::delete_user_session(self, session_id).await
    }

    async fn verify_email_token(&self, token: &str) -> Result<bool> {
        Db::verify_email_token(self, token).await
    }

    async fn regenerate_verification_token(&self, email: &str) -> Result<Option<String>> {
        Db::regenerate_verification_token(self, email).await
    }

    async fn find_or_create_federated_user(
        &self,
        identity: &FederatedIdentity,
    ) -> Result<FederatedMatch> {
        Db::find_or_create_federated_user(self, identity).await
    }
}

// ---------------------------------------------------------------------------
// EmailSender trait (DIP: service defines the abstraction it needs)
// ---------------------------------------------------------------------------

#[cfg_attr(test, mockall::automock)]
pub trait EmailSender: Send + Sync {
    /// Whether email sending is configured (false in dev mode).
    fn is_enabled(&self) -> bool;

    fn send_verification_email(
        &self,
        to_email: &str,
        verification_url: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

// ---------------------------------------------------------------------------
// Outcome enums
// ---------------------------------------------------------------------------

pub enum RegisterOutcome {
    /// User created and session started. Contains the session token.
    LoggedIn(String),
    /// Required fields were empty.
    EmptyFields,
    /// Email has no `@`.
    InvalidEmail,
    /// Email already in use.
    EmailTaken,
    /// Password does not meet minimum requirements.
    WeakPassword,
}

pub enum LoginOutcome {
    /// Login succeeded. Contains the session token.
    Success(String),
    /// Required fields were empty.
    EmptyFields,
    /// Password was incorrect (or email not found).
    InvalidCredentials,
}

pub enum FederatedOutcome {
    /// Signed in. Contains the session token.
    Success(String),
    /// The email belongs to an account that must sign in with its password.
    PasswordSignInRequired,
}

pub const MIN_PASSWORD_LENGTH: usize = 6;

// ---------------------------------------------------------------------------
// AuthService
// ---------------------------------------------------------------------------

pub struct AuthService<R: AuthRepository = Db, E: EmailSender = ResendEmailSender> {
    repo: R,
    email: E,
    base_url: String,
}

impl<R: AuthRepository + Clone, E: EmailSender + Clone> Clone for AuthService<R, E> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            email: self.email.clone(),
            base_url: self.base_url.clone(),
        }
    }
}

impl<R: AuthRepository, E: EmailSender> AuthService<R, E> {
    pub fn new(repo: R, email: E, base_url: String) -> Self {
        Self {
            repo,
            email,
            base_url,
        }
    }

    /// Whether verification emails are sent (production mode).
    pub fn email_enabled(&self) -> bool {
        self.email.is_enabled()
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome> {
        let email = normalize_email(email);
        if email.is_empty() || password.is_empty() {
            return Ok(LoginOutcome::EmptyFields);
        }

        let verified = self.repo.verify_user_password(&email, password).await?;

        if !verified {
            return Ok(LoginOutcome::InvalidCredentials);
        }

        let user =
            self.repo.find_user_by_email(&email).await?.ok_or_else(|| {
                color_eyre::eyre::eyre!("user not found after password verification")
            })?;

        let session_token = self.repo.create_user_session(user.id).await?;

        Ok(LoginOutcome::Success(session_token))
    }

    /// Creates the account and signs the user in straight away. When email
    /// is configured a verification link is sent as well; a failed send is
    /// logged and does not block sign-up.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<RegisterOutcome> {
        let email = normalize_email(email);
        let display_name = display_name.trim();
        if email.is_empty() || password.is_empty() || display_name.is_empty() {
            return Ok(RegisterOutcome::EmptyFields);
        }

        if !email.contains('@') {
            return Ok(RegisterOutcome::InvalidEmail);
        }

        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Ok(RegisterOutcome::WeakPassword);
        }

        let exists = self.repo.email_exists(&email).await?;
        if exists {
            return Ok(RegisterOutcome::EmailTaken);
        }

        let (user_id, token) = self.repo.create_user(&email, password, display_name).await?;

        if self.email_enabled() {
            let verification_url = format!("{}/verify-email/{}", self.base_url, token);
            if let Err(e) = self
                .email
                .send_verification_email(&email, &verification_url)
                .await
            {
                tracing::error!("failed to send verification email to {email}: {e}");
            }
        }

        let session_token = self.repo.create_user_session(user_id).await?;
        Ok(RegisterOutcome::LoggedIn(session_token))
    }

    /// Signs in with an identity asserted by an external provider, creating
    /// or linking the account as needed.
    pub async fn login_federated(&self, identity: &FederatedIdentity) -> Result<FederatedOutcome> {
        match self.repo.find_or_create_federated_user(identity).await? {
            FederatedMatch::User(user_id) => {
                let session_token = self.repo.create_user_session(user_id).await?;
                Ok(FederatedOutcome::Success(session_token))
            }
            FederatedMatch::PasswordSignInRequired => Ok(FederatedOutcome::PasswordSignInRequired),
        }
    }

    pub async fn logout(&self, session_id: &str) -> Result<()> {
        self.repo.delete_user_session(session_id).await
    }

    pub async fn verify_email(&self, token: &str) -> Result<bool> {
        self.repo.verify_email_token(token).await
    }

    /// Returns `false` when there is nothing to resend (already verified,
    /// or email is not configured).
    pub async fn resend_verification(&self, email: &str) -> Result<bool> {
        if !self.email_enabled() {
            return Ok(false);
        }

        let Some(token) = self.repo.regenerate_verification_token(email).await? else {
            return Ok(false);
        };

        let verification_url = format!("{}/verify-email/{}", self.base_url, token);
        self.email
            .send_verification_email(email, &verification_url)
            .await?;

        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
