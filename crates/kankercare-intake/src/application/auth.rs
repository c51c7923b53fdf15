//! Mock login and registration
//!
//! No authentication backend is contacted. A successful login stores a
//! generated token and the user's email in [`AuthStorage`]; registration only
//! validates. Both are rate limited per action.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::config::IntakeConfig;
use crate::domain::{LoginRecord, RegisterRecord};
use crate::notify::{messages, Notification, Notifier};
use crate::rate_limit::{cooldown_minutes, RateLimiter};
use crate::sanitize::Sanitize;
use crate::storage::{AuthStorage, UserData};
use crate::validation::{schemas, FieldErrors};

const LOGIN_KEY: &str = "login";
const REGISTER_KEY: &str = "register";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Success,
    /// Too many attempts in the window; the action was not performed
    RateLimited { retry_after: Duration },
    Invalid(FieldErrors),
}

impl AuthOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AuthOutcome::Success)
    }
}

pub struct AuthService {
    storage: AuthStorage,
    login_limiter: RateLimiter,
    register_limiter: RateLimiter,
    delay: Duration,
    notifier: Arc<dyn Notifier>,
}

impl AuthService {
    pub fn new(
        storage: AuthStorage,
        login_limiter: RateLimiter,
        register_limiter: RateLimiter,
        delay: Duration,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            storage,
            login_limiter,
            register_limiter,
            delay,
            notifier,
        }
    }

    pub fn from_config(config: &IntakeConfig, storage: AuthStorage, notifier: Arc<dyn Notifier>) -> Self {
        Self::new(
            storage,
            RateLimiter::new(config.limits.login),
            RateLimiter::new(config.limits.register),
            config.auth.simulated_delay(),
            notifier,
        )
    }

    pub async fn login(&self, form: &LoginRecord) -> AuthOutcome {
        if let Some(outcome) = self.throttle(&self.login_limiter, LOGIN_KEY) {
            return outcome;
        }

        let form = match schemas::login().validate(form.sanitized()) {
            Ok(valid) => valid.into_inner(),
            Err(errors) => {
                tracing::debug!(fields = %errors, "login form invalid");
                return AuthOutcome::Invalid(errors);
            }
        };

        tokio::time::sleep(self.delay).await;

        let now = Utc::now();
        self.storage
            .set_auth_token(&format!("mock_token_{}", now.timestamp_millis()));
        self.storage.set_user_data(&UserData {
            email: form.email,
            login_time: now,
        });

        tracing::info!("login succeeded");
        self.notifier
            .notify(Notification::success(messages::LOGIN_OK_TITLE, messages::LOGIN_OK_BODY));
        AuthOutcome::Success
    }

    pub async fn register(&self, form: &RegisterRecord) -> AuthOutcome {
        if let Some(outcome) = self.throttle(&self.register_limiter, REGISTER_KEY) {
            return outcome;
        }

        if let Err(errors) = schemas::register().check(&form.sanitized()) {
            tracing::debug!(fields = %errors, "registration form invalid");
            return AuthOutcome::Invalid(errors);
        }

        tokio::time::sleep(self.delay).await;

        tracing::info!("registration succeeded");
        self.notifier.notify(Notification::success(
            messages::REGISTER_OK_TITLE,
            messages::REGISTER_OK_BODY,
        ));
        AuthOutcome::Success
    }

    pub fn logout(&self) {
        self.storage.logout();
        tracing::info!("logged out");
    }

    pub fn is_authenticated(&self) -> bool {
        self.storage.is_authenticated()
    }

    pub fn current_user(&self) -> Option<UserData> {
        self.storage.user_data()
    }

    fn throttle(&self, limiter: &RateLimiter, key: &str) -> Option<AuthOutcome> {
        if limiter.is_allowed(key) {
            return None;
        }
        let retry_after = limiter.remaining_cooldown(key);
        self.notifier.notify(Notification::failure(
            messages::RATE_LIMITED_TITLE,
            messages::retry_in(cooldown_minutes(retry_after)),
        ));
        Some(AuthOutcome::RateLimited { retry_after })
    }
}

#[cfg(test)]
mod tests {
    use tokio_test::block_on;

    use super::*;
    use crate::notify::RecordingNotifier;
    use crate::rate_limit::RateLimitConfig;
    use crate::storage::{MemoryStore, SecureStorage};

    fn service(notifier: Arc<RecordingNotifier>) -> AuthService {
        let storage = AuthStorage::new(SecureStorage::new(Arc::new(MemoryStore::new())));
        AuthService::new(
            storage,
            RateLimiter::login(),
            RateLimiter::register(),
            Duration::ZERO,
            notifier,
        )
    }

    fn login_form() -> LoginRecord {
        LoginRecord {
            email: "pasien@email.com".into(),
            password: "Rahasia123".into(),
            remember_me: Some(true),
        }
    }

    #[tokio::test]
    async fn test_login_stores_session() {
        let notifier = Arc::new(RecordingNotifier::new());
        let auth = service(notifier.clone());

        assert_eq!(auth.login(&login_form()).await, AuthOutcome::Success);

        assert!(auth.is_authenticated());
        let user = auth.current_user().unwrap();
        assert_eq!(user.email, "pasien@email.com");
        assert!(auth.storage.auth_token().unwrap().starts_with("mock_token_"));
        assert_eq!(notifier.notifications()[0].title, "Login Berhasil");

        auth.logout();
        assert!(!auth.is_authenticated());
        assert!(auth.current_user().is_none());
    }

    #[tokio::test]
    async fn test_invalid_login_stores_nothing() {
        let notifier = Arc::new(RecordingNotifier::new());
        let auth = service(notifier.clone());
        let form = LoginRecord {
            password: "abcdefgh".into(),
            ..login_form()
        };

        match auth.login(&form).await {
            AuthOutcome::Invalid(errors) => assert!(errors.contains("password")),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(!auth.is_authenticated());
        assert!(notifier.notifications().is_empty());
    }

    #[tokio::test]
    async fn test_sixth_login_is_rate_limited() {
        let notifier = Arc::new(RecordingNotifier::new());
        let auth = service(notifier.clone());
        let bad = LoginRecord::default();

        for _ in 0..5 {
            assert!(matches!(auth.login(&bad).await, AuthOutcome::Invalid(_)));
        }
        match auth.login(&login_form()).await {
            AuthOutcome::RateLimited { retry_after } => {
                assert!(retry_after <= RateLimitConfig::LOGIN.window);
                assert!(retry_after > Duration::ZERO);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(!auth.is_authenticated());

        let seen = notifier.notifications();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].title, "Terlalu banyak percobaan");
        assert_eq!(seen[0].description, "Coba lagi dalam 15 menit");
    }

    #[test]
    fn test_register_validates_without_storing() {
        let notifier = Arc::new(RecordingNotifier::new());
        let auth = service(notifier.clone());
        let mut form = RegisterRecord {
            full_name: "Siti Rahma".into(),
            email: "siti@email.com".into(),
            phone: "+628123456789".into(),
            password: "Rahasia123".into(),
            confirm_password: "Rahasia321".into(),
            agree_terms: true,
        };

        match block_on(auth.register(&form)) {
            AuthOutcome::Invalid(errors) => {
                assert_eq!(
                    errors.get("confirmPassword"),
                    Some("Password dan konfirmasi password tidak sama")
                );
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        form.confirm_password = form.password.clone();
        assert!(block_on(auth.register(&form)).is_success());
        assert!(!auth.is_authenticated());
        assert_eq!(notifier.notifications()[0].title, "Registrasi Berhasil");
    }

    #[test]
    fn test_register_limit_is_independent_of_login() {
        let notifier = Arc::new(RecordingNotifier::new());
        let auth = service(notifier);
        let form = RegisterRecord::default();

        for _ in 0..3 {
            assert!(matches!(block_on(auth.register(&form)), AuthOutcome::Invalid(_)));
        }
        assert!(matches!(
            block_on(auth.register(&form)),
            AuthOutcome::RateLimited { .. }
        ));
        assert!(block_on(auth.login(&login_form())).is_success());
    }
}
