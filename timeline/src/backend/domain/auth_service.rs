//! Sign-in, sign-out and password reset on top of the identity provider.

use std::sync::Arc;

use tracing::{error, info};

use super::error::{ScheduleError, ScheduleResult, ValidationError};
use super::schedule_store::ScheduleStore;
use crate::backend::storage::{IdentityProvider, RowStore};

pub struct AuthService<S: RowStore, I: IdentityProvider> {
    identity: Arc<I>,
    schedule: Arc<ScheduleStore<S, I>>,
}

impl<S: RowStore, I: IdentityProvider> AuthService<S, I> {
    pub fn new(identity: Arc<I>, schedule: Arc<ScheduleStore<S, I>>) -> Self {
        Self { identity, schedule }
    }

    fn require(value: &str, missing: ValidationError) -> Result<&str, ValidationError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(missing);
        }
        Ok(trimmed)
    }

    pub fn current_user(&self) -> Option<String> {
        self.identity.current_user()
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> ScheduleResult<String> {
        let email = Self::require(email, ValidationError::EmptyEmail)?;
        if password.is_empty() {
            return Err(ValidationError::EmptyPassword.into());
        }

        let user_id = self.identity.sign_in(email, password).await.map_err(|e| {
            error!("Sign-in failed for {}: {}", email, e);
            ScheduleError::Identity(e)
        })?;
        info!("User {} signed in", user_id);
        Ok(user_id)
    }

    /// Signs out and drops all committed state
    pub async fn sign_out(&self) -> ScheduleResult<()> {
        self.identity.sign_out().await.map_err(|e| {
            error!("Sign-out failed: {}", e);
            ScheduleError::Identity(e)
        })?;
        self.schedule.clear();
        Ok(())
    }

    pub async fn request_password_reset(&self, email: &str) -> ScheduleResult<()> {
        let email = Self::require(email, ValidationError::EmptyEmail)?;
        self.identity
            .request_password_reset(email)
            .await
            .map_err(ScheduleError::Identity)?;
        info!("Password reset email requested");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::config::TimelineConfig;
    use crate::backend::storage::{InMemoryRowStore, StaticIdentity};

    fn setup_test_auth() -> (AuthService<InMemoryRowStore, StaticIdentity>, Arc<StaticIdentity>) {
        let identity = Arc::new(StaticIdentity::anonymous().with_account("ana@example.com", "secret", "u1"));
        let schedule = Arc::new(ScheduleStore::new(
            TimelineConfig::default(),
            Arc::new(InMemoryRowStore::new()),
            identity.clone(),
        ));
        (AuthService::new(identity.clone(), schedule), identity)
    }

    #[tokio::test]
    async fn test_sign_in_validates_fields() {
        let (auth, _identity) = setup_test_auth();

        let result = auth.sign_in("  ", "secret").await;
        assert!(matches!(result, Err(ScheduleError::Validation(ValidationError::EmptyEmail))));

        let result = auth.sign_in("ana@example.com", "").await;
        assert!(matches!(result, Err(ScheduleError::Validation(ValidationError::EmptyPassword))));
    }

    #[tokio::test]
    async fn test_sign_in_and_out() {
        let (auth, _identity) = setup_test_auth();

        assert!(matches!(
            auth.sign_in("ana@example.com", "nope").await,
            Err(ScheduleError::Identity(_))
        ));
        assert_eq!(auth.sign_in("ana@example.com", "secret").await.unwrap(), "u1");
        assert_eq!(auth.current_user().as_deref(), Some("u1"));

        auth.sign_out().await.unwrap();
        assert!(auth.current_user().is_none());
    }

    #[tokio::test]
    async fn test_password_reset_request() {
        let (auth, identity) = setup_test_auth();
        auth.request_password_reset(" ana@example.com ").await.unwrap();
        assert_eq!(identity.reset_requests(), vec!["ana@example.com".to_string()]);
    }
}
