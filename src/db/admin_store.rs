use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;

use crate::{
    db::DbPool,
    error::{AppError, Result},
    models::admin::AdminUser,
};

const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Admin account store for database operations
#[derive(Clone)]
pub struct AdminStore {
    pool: DbPool,
}

impl AdminStore {
    /// Create a new AdminStore with the provided database pool
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get an admin account by username
    pub async fn find_by_username(&self, username: &str) -> Result<Option<AdminUser>> {
        let user = sqlx::query_as::<_, AdminUser>(
            "SELECT id, username, password_hash, full_name, email, last_login \
             FROM admin_users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(user)
    }

    /// Create an admin account with a freshly hashed password
    pub async fn create(
        &self,
        username: &str,
        password: &str,
        full_name: &str,
        email: &str,
    ) -> Result<i64> {
        let password_hash = hash_password(password)?;

        let result = sqlx::query(
            "INSERT INTO admin_users (username, password_hash, full_name, email, last_login) \
             VALUES (?, ?, ?, ?, NULL)",
        )
        .bind(username)
        .bind(&password_hash)
        .bind(full_name)
        .bind(email)
        .execute(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(result.last_insert_rowid())
    }

    /// Verify credentials and return the account on success. Unknown
    /// usernames and wrong passwords are indistinguishable to the caller.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<AdminUser> {
        let user = self
            .find_by_username(username)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        self.record_login(user.id).await?;

        Ok(user)
    }

    /// Record a successful login
    pub async fn record_login(&self, id: i64) -> Result<()> {
        sqlx::query("UPDATE admin_users SET last_login = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(())
    }

    /// Seed the configured admin account on first run so the dashboard is
    /// reachable before any real accounts exist.
    pub async fn ensure_default_admin(&self, username: &str, password: &str) -> Result<()> {
        if self.find_by_username(username).await?.is_some() {
            return Ok(());
        }

        self.create(username, password, "Site Administrator", "admin@example.com")
            .await?;
        tracing::info!("Created default admin account '{}'", username);

        if password == DEFAULT_ADMIN_PASSWORD {
            tracing::warn!(
                "Admin account '{}' uses the default password; set ADMIN_PASSWORD before going live",
                username
            );
        }

        Ok(())
    }
}

/// Hash a password with Argon2id
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("failed to hash password: {e}")))?;

    Ok(hash.to_string())
}

/// Verify a password against a stored Argon2 hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("stored password hash is invalid: {e}")))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AppError::Internal(format!("failed to verify password: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[test]
    fn hashes_are_salted_and_verifiable() {
        let first = hash_password("s3cret!").unwrap();
        let second = hash_password("s3cret!").unwrap();
        assert!(first.starts_with("$argon2"));
        assert_ne!(first, second);

        assert!(verify_password("s3cret!", &first).unwrap());
        assert!(!verify_password("wrong", &first).unwrap());
        assert!(verify_password("not-a-hash", "garbage").is_err());
    }

    #[tokio::test]
    async fn authenticate_checks_credentials_and_records_login() {
        let store = AdminStore::new(test_pool().await);
        store
            .create("sarah", "hunter2!", "Sarah Lane", "sarah@example.com")
            .await
            .unwrap();

        let user = store.authenticate("sarah", "hunter2!").await.unwrap();
        assert_eq!(user.username, "sarah");
        assert_eq!(user.full_name, "Sarah Lane");

        let stored = store.find_by_username("sarah").await.unwrap().unwrap();
        assert!(stored.last_login.is_some());

        assert!(matches!(
            store.authenticate("sarah", "wrong").await,
            Err(AppError::InvalidCredentials)
        ));
        assert!(matches!(
            store.authenticate("nobody", "hunter2!").await,
            Err(AppError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn default_admin_is_seeded_once() {
        let store = AdminStore::new(test_pool().await);

        store.ensure_default_admin("admin", "admin123").await.unwrap();
        store.ensure_default_admin("admin", "admin123").await.unwrap();

        let user = store.authenticate("admin", "admin123").await.unwrap();
        assert_eq!(user.full_name, "Site Administrator");
    }
}
