use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use color_eyre::Result;
use ulid::Ulid;

use super::models::{AuthUser, FederatedIdentity, FederatedMatch, UserProfile};
use super::Db;
use crate::utils::normalize_email;

pub const PASSWORD_PROVIDER: &str = "password";

impl Db {
    /// Create a user with an email/password identity and a pending email
    /// verification token. Returns (user_id, token).
    pub async fn create_user(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<(i32, String)> {
        let email = normalize_email(email);
        let password_hash = hash_password(password)?;
        let token = Ulid::new().to_string();
        let mut tx = self.pool.begin().await?;

        let user_id: i32 = sqlx::query_scalar(
            r#"INSERT INTO users (email, password_hash, display_name, email_verified, verification_token, token_expires_at)
               VALUES (?, ?, ?, FALSE, ?, datetime('now', '+24 hours'))
               RETURNING id"#,
        )
        .bind(&email)
        .bind(&password_hash)
        .bind(display_name)
        .bind(&token)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO user_identities (user_id, provider, subject) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(PASSWORD_PROVIDER)
            .bind(&email)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!("new user created: id={user_id}, email={email}");
        Ok((user_id, token))
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>> {
        let user = sqlx::query_as::<_, AuthUser>(
            "SELECT id, email, display_name, email_verified FROM users WHERE email = ?",
        )
        .bind(normalize_email(email))
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn verify_user_password(&self, email: &str, password: &str) -> Result<bool> {
        let stored: Option<Option<String>> =
            sqlx::query_scalar("SELECT password_hash FROM users WHERE email = ?")
                .bind(normalize_email(email))
                .fetch_optional(&self.pool)
                .await?;

        match stored.flatten() {
            Some(stored_hash) => Ok(verify_password(password, &stored_hash)),
            // Unknown email, or a federated-only account without a password.
            None => Ok(false),
        }
    }

    pub async fn create_user_session(&self, user_id: i32) -> Result<String> {
        let session = Ulid::new().to_string();

        sqlx::query("INSERT INTO user_sessions (id, user_id) VALUES (?, ?)")
            .bind(&session)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        tracing::info!("new user session created for user_id={user_id}");
        Ok(session)
    }

    pub async fn get_user_by_session(&self, session_id: &str) -> Result<Option<AuthUser>> {
        let user = sqlx::query_as::<_, AuthUser>(
            r#"
            SELECT u.id, u.email, u.display_name, u.email_verified
            FROM user_sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.id = ?
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn delete_user_session(&self, session_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM user_sessions WHERE id = ?")
            .bind(session_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = ?)")
            .bind(normalize_email(email))
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Verify a user's email using their verification token.
    /// Returns true if verification succeeded, false if token is invalid/expired.
    pub async fn verify_email_token(&self, token: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"UPDATE users
               SET email_verified = TRUE, verification_token = NULL, token_expires_at = NULL
               WHERE verification_token = ? AND token_expires_at > datetime('now')
               AND email_verified = FALSE"#,
        )
        .bind(token)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Regenerate the verification token for an unverified user. Returns the new token.
    pub async fn regenerate_verification_token(&self, email: &str) -> Result<Option<String>> {
        let token = Ulid::new().to_string();
        let result = sqlx::query(
            r#"UPDATE users
               SET verification_token = ?, token_expires_at = datetime('now', '+24 hours')
               WHERE email = ? AND email_verified = FALSE"#,
        )
        .bind(&token)
        .bind(normalize_email(email))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            Ok(Some(token))
        } else {
            Ok(None)
        }
    }

    /// Resolve an external identity to a user: the linked user if the
    /// identity is known, else the user with the same email (which gets the
    /// identity linked), else a new password-less user.
    ///
    /// Linking by email needs the provider to vouch for the address, and an
    /// existing password account must have verified it too. Otherwise the
    /// user has to sign in with their password.
    pub async fn find_or_create_federated_user(
        &self,
        identity: &FederatedIdentity,
    ) -> Result<FederatedMatch> {
        let email = normalize_email(&identity.email);
        let mut tx = self.pool.begin().await?;

        let linked: Option<i32> = sqlx::query_scalar(
            "SELECT user_id FROM user_identities WHERE provider = ? AND subject = ?",
        )
        .bind(&identity.provider)
        .bind(&identity.subject)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(user_id) = linked {
            tx.commit().await?;
            return Ok(FederatedMatch::User(user_id));
        }

        let existing: Option<(i32, bool, bool)> = sqlx::query_as(
            r#"SELECT id, email_verified,
                      EXISTS(SELECT 1 FROM user_identities i WHERE i.user_id = users.id AND i.provider = ?)
               FROM users WHERE email = ?"#,
        )
        .bind(PASSWORD_PROVIDER)
        .bind(&email)
        .fetch_optional(&mut *tx)
        .await?;

        let user_id = match existing {
            Some((user_id, verified, has_password)) => {
                if !identity.email_verified || (has_password && !verified) {
                    tracing::warn!(
                        "refused to link unverified {} identity to user_id={user_id}",
                        identity.provider
                    );
                    return Ok(FederatedMatch::PasswordSignInRequired);
                }
                sqlx::query(
                    r#"UPDATE users
                       SET email_verified = TRUE,
                           photo_url = COALESCE(photo_url, ?)
                       WHERE id = ?"#,
                )
                .bind(&identity.photo_url)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
                tracing::info!(
                    "linked {} identity to existing user_id={user_id}",
                    identity.provider
                );
                user_id
            }
            None => {
                let user_id: i32 = sqlx::query_scalar(
                    r#"INSERT INTO users (email, display_name, photo_url, email_verified)
                       VALUES (?, ?, ?, ?)
                       RETURNING id"#,
                )
                .bind(&email)
                .bind(&identity.display_name)
                .bind(&identity.photo_url)
                .bind(identity.email_verified)
                .fetch_one(&mut *tx)
                .await?;
                tracing::info!(
                    "new {} user created: id={user_id}, email={email}",
                    identity.provider
                );
                user_id
            }
        };

        sqlx::query("INSERT INTO user_identities (user_id, provider, subject) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(&identity.provider)
            .bind(&identity.subject)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(FederatedMatch::User(user_id))
    }

    pub async fn user_profile(&self, user_id: i32) -> Result<Option<UserProfile>> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT id, email, display_name, photo_url, email_verified, created_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(mut profile) = profile else {
            return Ok(None);
        };

        profile.providers = sqlx::query_scalar(
            "SELECT provider FROM user_identities WHERE user_id = ? ORDER BY provider",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(profile))
    }
}

/// Run argon2 hashing on a dedicated thread with a large stack to avoid
/// stack overflow in debug builds.
fn hash_password(password: &str) -> Result<String> {
    let password = password.to_string();
    std::thread::Builder::new()
        .stack_size(4 * 1024 * 1024) // 4 MB stack
        .spawn(move || {
            let salt = SaltString::generate(&mut OsRng);
            let argon2 = Argon2::default();
            argon2
                .hash_password(password.as_bytes(), &salt)
                .map(|h| h.to_string())
                .map_err(|e| color_eyre::eyre::eyre!("failed to hash password: {e}"))
        })?
        .join()
        .map_err(|_| color_eyre::eyre::eyre!("hash thread panicked"))?
}

fn verify_password(password: &str, hash: &str) -> bool {
    let password = password.to_string();
    let hash = hash.to_string();
    std::thread::Builder::new()
        .stack_size(4 * 1024 * 1024)
        .spawn(move || {
            let parsed_hash = match PasswordHash::new(&hash) {
                Ok(h) => h,
                Err(_) => return false,
            };
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok()
        })
        .map(|h| h.join().unwrap_or(false))
        .unwrap_or(false)
}
