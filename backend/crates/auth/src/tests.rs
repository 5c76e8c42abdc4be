//! Use-case tests over the in-memory store

#[cfg(test)]
mod support {
    use std::sync::{Arc, Mutex};

    use crate::application::{AuthConfig, SignUpInput, SignUpUseCase};
    use crate::domain::notifier::{EmailMessage, EmailNotifier};
    use crate::error::{AuthError, AuthResult};
    use crate::infra::memory::InMemoryDirectoryStore;

    /// Keeps every message it is asked to send
    #[derive(Clone, Default)]
    pub struct RecordingNotifier {
        pub sent: Arc<Mutex<Vec<EmailMessage>>>,
    }

    impl RecordingNotifier {
        pub fn messages(&self) -> Vec<EmailMessage> {
            self.sent.lock().unwrap().clone()
        }

        /// Reset secret from the link in the last message
        pub fn last_reset_secret(&self) -> String {
            let messages = self.messages();
            let body = &messages.last().expect("no email sent").html_body;
            let start = body.find("?token=").expect("no reset link") + "?token=".len();
            body[start..]
                .chars()
                .take_while(|c| c.is_ascii_hexdigit())
                .collect()
        }
    }

    impl EmailNotifier for RecordingNotifier {
        async fn send(&self, message: &EmailMessage) -> AuthResult<()> {
            self.sent.lock().unwrap().push(message.clone());
            Ok(())
        }
    }

    /// Notifier whose mail server is always down
    #[derive(Clone, Default)]
    pub struct FailingNotifier;

    impl EmailNotifier for FailingNotifier {
        async fn send(&self, _message: &EmailMessage) -> AuthResult<()> {
            Err(AuthError::EmailDispatch("connection refused".to_string()))
        }
    }

    pub fn config() -> Arc<AuthConfig> {
        Arc::new(AuthConfig::development())
    }

    pub fn sign_up_input(email: &str, password: &str) -> SignUpInput {
        SignUpInput {
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    pub async fn register(
        store: &Arc<InMemoryDirectoryStore>,
        config: &Arc<AuthConfig>,
        email: &str,
        password: &str,
    ) -> crate::application::AuthenticatedOutput {
        SignUpUseCase::new(store.clone(), config.clone())
            .execute(sign_up_input(email, password))
            .await
            .unwrap()
    }
}

#[cfg(test)]
mod sign_up_tests {
    use std::sync::Arc;

    use super::support::*;
    use crate::application::{SignUpInput, SignUpUseCase};
    use crate::domain::repository::DirectoryStore;
    use crate::domain::value_object::user_password::RawPassword;
    use crate::error::AuthError;
    use crate::infra::memory::InMemoryDirectoryStore;

    #[tokio::test]
    async fn test_register_returns_public_user_and_token() {
        let store = Arc::new(InMemoryDirectoryStore::new());
        let output = register(&store, &config(), "a@b.com", "secret1").await;

        assert_eq!(output.user.email.as_str(), "a@b.com");
        assert_eq!(output.user.first_name.as_str(), "A");
        assert_eq!(output.user.last_name.as_str(), "B");
        assert!(!output.token.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = Arc::new(InMemoryDirectoryStore::new());
        let config = config();
        register(&store, &config, "a@b.com", "secret1").await;

        let result = SignUpUseCase::new(store.clone(), config.clone())
            .execute(sign_up_input("a@b.com", "other-password"))
            .await;
        assert!(matches!(result, Err(AuthError::EmailTaken)));

        let count = store
            .with_directory(|dir| Ok(dir.user_count()))
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_emails_differing_in_case_are_distinct() {
        let store = Arc::new(InMemoryDirectoryStore::new());
        let config = config();
        register(&store, &config, "a@b.com", "secret1").await;
        register(&store, &config, "A@b.com", "secret1").await;
    }

    #[tokio::test]
    async fn test_missing_fields() {
        let use_case = SignUpUseCase::new(Arc::new(InMemoryDirectoryStore::new()), config());

        for input in [
            sign_up_input("", "secret1"),
            sign_up_input("a@b.com", ""),
            SignUpInput {
                first_name: "  ".to_string(),
                ..sign_up_input("a@b.com", "secret1")
            },
            SignUpInput {
                last_name: String::new(),
                ..sign_up_input("a@b.com", "secret1")
            },
        ] {
            match use_case.execute(input).await {
                Err(AuthError::Validation(msg)) => assert_eq!(msg, "All fields are required"),
                other => panic!("unexpected result: {:?}", other.map(|o| o.user)),
            }
        }
    }

    #[tokio::test]
    async fn test_password_is_hashed() {
        let store = Arc::new(InMemoryDirectoryStore::new());
        let output = register(&store, &config(), "a@b.com", "secret1").await;

        let user_id = output.user.user_id;
        let password = store
            .with_directory(move |dir| Ok(dir.find_user_by_id(&user_id).map(|u| u.password.clone())))
            .await
            .unwrap()
            .unwrap();

        let raw = |s: &str| RawPassword::new(s.to_string()).unwrap();
        assert!(password.verify(&raw("secret1"), None));
        assert!(!password.verify(&raw("secret2"), None));
        assert!(!format!("{:?}", password).contains("secret1"));
    }
}

#[cfg(test)]
mod sign_in_tests {
    use std::sync::Arc;

    use super::support::*;
    use crate::application::{SignInInput, SignInUseCase, VerifyTokenUseCase};
    use crate::error::AuthError;
    use crate::infra::memory::InMemoryDirectoryStore;

    fn input(email: &str, password: &str) -> SignInInput {
        SignInInput {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_then_login_scenario() {
        let store = Arc::new(InMemoryDirectoryStore::new());
        let config = config();
        let registered = register(&store, &config, "a@b.com", "secret1").await;
        assert!(!registered.token.is_empty());

        let use_case = SignInUseCase::new(store.clone(), config.clone());

        let output = use_case.execute(input("a@b.com", "secret1")).await.unwrap();
        assert_eq!(output.user, registered.user);
        assert_ne!(output.token, registered.token);

        let wrong = use_case.execute(input("a@b.com", "wrong")).await;
        assert!(matches!(wrong, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_unknown_email_is_invalid_credentials() {
        let use_case = SignInUseCase::new(Arc::new(InMemoryDirectoryStore::new()), config());
        let result = use_case.execute(input("nobody@b.com", "secret1")).await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_email_match_is_exact() {
        let store = Arc::new(InMemoryDirectoryStore::new());
        let config = config();
        register(&store, &config, "a@b.com", "secret1").await;

        let result = SignInUseCase::new(store, config)
            .execute(input("A@B.COM", "secret1"))
            .await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_missing_fields() {
        let use_case = SignInUseCase::new(Arc::new(InMemoryDirectoryStore::new()), config());
        for (email, password) in [("", "secret1"), ("a@b.com", ""), ("", "")] {
            match use_case.execute(input(email, password)).await {
                Err(AuthError::Validation(msg)) => {
                    assert_eq!(msg, "Email and password are required")
                }
                _ => panic!("expected validation error"),
            }
        }
    }

    #[tokio::test]
    async fn test_login_token_verifies() {
        let store = Arc::new(InMemoryDirectoryStore::new());
        let config = config();
        register(&store, &config, "a@b.com", "secret1").await;

        let output = SignInUseCase::new(store.clone(), config.clone())
            .execute(input("a@b.com", "secret1"))
            .await
            .unwrap();

        let user = VerifyTokenUseCase::new(store, config)
            .execute(&output.token)
            .await
            .unwrap();
        assert_eq!(user, output.user);
    }
}

#[cfg(test)]
mod verify_token_tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::support::*;
    use crate::application::{AuthConfig, BearerTokenSigner, VerifyTokenUseCase};
    use crate::domain::value_object::user_id::UserId;
    use crate::error::{AuthError, TokenKind};
    use crate::infra::memory::InMemoryDirectoryStore;

    #[tokio::test]
    async fn test_register_token_verifies() {
        let store = Arc::new(InMemoryDirectoryStore::new());
        let config = config();
        let output = register(&store, &config, "a@b.com", "secret1").await;

        let user = VerifyTokenUseCase::new(store, config)
            .execute(&output.token)
            .await
            .unwrap();
        assert_eq!(user.user_id, output.user.user_id);
        assert_eq!(user.email.as_str(), "a@b.com");
    }

    #[tokio::test]
    async fn test_empty_token_is_missing() {
        let use_case = VerifyTokenUseCase::new(Arc::new(InMemoryDirectoryStore::new()), config());
        assert!(matches!(use_case.execute("").await, Err(AuthError::MissingToken)));
        assert!(matches!(use_case.execute("   ").await, Err(AuthError::MissingToken)));
    }

    #[tokio::test]
    async fn test_garbage_token_is_malformed() {
        let use_case = VerifyTokenUseCase::new(Arc::new(InMemoryDirectoryStore::new()), config());
        assert!(matches!(
            use_case.execute("definitely-not-a-token").await,
            Err(AuthError::MalformedToken)
        ));
    }

    #[tokio::test]
    async fn test_token_from_other_instance_is_invalid() {
        let store = Arc::new(InMemoryDirectoryStore::new());
        let output = register(&store, &config(), "a@b.com", "secret1").await;

        // Different random secret
        let result = VerifyTokenUseCase::new(store, config())
            .execute(&output.token)
            .await;
        assert!(matches!(result, Err(AuthError::InvalidToken(TokenKind::Bearer))));
    }

    #[tokio::test]
    async fn test_expired_token() {
        let store = Arc::new(InMemoryDirectoryStore::new());
        let config = Arc::new(AuthConfig {
            token_ttl: Duration::ZERO,
            ..AuthConfig::development()
        });
        let output = register(&store, &config, "a@b.com", "secret1").await;

        tokio::time::sleep(Duration::from_millis(5)).await;

        let result = VerifyTokenUseCase::new(store, config).execute(&output.token).await;
        assert!(matches!(result, Err(AuthError::ExpiredToken(TokenKind::Bearer))));
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let config = config();
        let issued = BearerTokenSigner::new(&config).issue(UserId::new()).unwrap();

        let result = VerifyTokenUseCase::new(Arc::new(InMemoryDirectoryStore::new()), config)
            .execute(&issued.token)
            .await;
        assert!(matches!(result, Err(AuthError::UserNotFound)));
    }
}

#[cfg(test)]
mod password_reset_tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::support::*;
    use crate::application::{
        AuthConfig, ForgotPasswordUseCase, RESET_REQUESTED_MESSAGE, ResetPasswordInput,
        ResetPasswordUseCase, SignInInput, SignInUseCase,
    };
    use crate::domain::repository::DirectoryStore;
    use crate::error::{AuthError, TokenKind};
    use crate::infra::memory::InMemoryDirectoryStore;

    fn reset_input(token: &str, new_password: &str) -> ResetPasswordInput {
        ResetPasswordInput {
            token: token.to_string(),
            new_password: new_password.to_string(),
        }
    }

    async fn reset_token_count(store: &InMemoryDirectoryStore) -> usize {
        store
            .with_directory(|dir| Ok(dir.reset_token_count()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_unknown_email_acks_without_token() {
        let store = Arc::new(InMemoryDirectoryStore::new());
        let notifier = RecordingNotifier::default();
        let use_case =
            ForgotPasswordUseCase::new(store.clone(), Arc::new(notifier.clone()), config());

        let ack = use_case.execute("nobody@b.com".to_string()).await.unwrap();
        assert_eq!(ack, RESET_REQUESTED_MESSAGE);
        assert_eq!(reset_token_count(&store).await, 0);
        assert!(notifier.messages().is_empty());
    }

    #[tokio::test]
    async fn test_empty_email_is_validation_error() {
        let use_case = ForgotPasswordUseCase::new(
            Arc::new(InMemoryDirectoryStore::new()),
            Arc::new(RecordingNotifier::default()),
            config(),
        );
        match use_case.execute(" ".to_string()).await {
            Err(AuthError::Validation(msg)) => assert_eq!(msg, "Email is required"),
            _ => panic!("expected validation error"),
        }
    }

    #[tokio::test]
    async fn test_known_email_sends_reset_link() {
        let store = Arc::new(InMemoryDirectoryStore::new());
        let notifier = RecordingNotifier::default();
        let config = Arc::new(AuthConfig {
            reset_url_base: "https://example.com/reset-password".to_string(),
            ..AuthConfig::development()
        });
        register(&store, &config, "a@b.com", "secret1").await;

        let ack = ForgotPasswordUseCase::new(store.clone(), Arc::new(notifier.clone()), config)
            .execute("a@b.com".to_string())
            .await
            .unwrap();
        assert_eq!(ack, RESET_REQUESTED_MESSAGE);

        let messages = notifier.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].to, "a@b.com");
        assert_eq!(messages[0].subject, "Password Reset Request");
        assert!(messages[0].html_body.contains("https://example.com/reset-password?token="));
        assert!(messages[0].html_body.contains("expire in 1 hour."));

        let secret = notifier.last_reset_secret();
        assert_eq!(secret.len(), 64);
        let stored = store
            .with_directory(move |dir| Ok(dir.has_reset_token(&secret)))
            .await
            .unwrap();
        assert!(stored);
    }

    #[tokio::test]
    async fn test_reset_email_states_configured_ttl() {
        let store = Arc::new(InMemoryDirectoryStore::new());
        let notifier = RecordingNotifier::default();
        let config = Arc::new(AuthConfig {
            reset_token_ttl: Duration::from_secs(30 * 60),
            ..AuthConfig::development()
        });
        register(&store, &config, "a@b.com", "secret1").await;

        ForgotPasswordUseCase::new(store, Arc::new(notifier.clone()), config)
            .execute("a@b.com".to_string())
            .await
            .unwrap();

        let body = &notifier.messages()[0].html_body;
        assert!(body.contains("expire in 30 minutes."));
        assert!(!body.contains("1 hour"));
    }

    #[tokio::test]
    async fn test_notifier_failure_still_acks_and_keeps_token() {
        let store = Arc::new(InMemoryDirectoryStore::new());
        let config = config();
        register(&store, &config, "a@b.com", "secret1").await;

        let ack = ForgotPasswordUseCase::new(store.clone(), Arc::new(FailingNotifier), config)
            .execute("a@b.com".to_string())
            .await
            .unwrap();
        assert_eq!(ack, RESET_REQUESTED_MESSAGE);
        assert_eq!(reset_token_count(&store).await, 1);
    }

    #[tokio::test]
    async fn test_reset_is_single_use() {
        let store = Arc::new(InMemoryDirectoryStore::new());
        let notifier = RecordingNotifier::default();
        let config = config();
        register(&store, &config, "a@b.com", "secret1").await;

        ForgotPasswordUseCase::new(store.clone(), Arc::new(notifier.clone()), config.clone())
            .execute("a@b.com".to_string())
            .await
            .unwrap();
        let secret = notifier.last_reset_secret();

        let reset = ResetPasswordUseCase::new(store.clone(), config.clone());
        reset.execute(reset_input(&secret, "new-secret")).await.unwrap();
        assert_eq!(reset_token_count(&store).await, 0);

        let again = reset.execute(reset_input(&secret, "another")).await;
        assert!(matches!(
            again,
            Err(AuthError::InvalidToken(TokenKind::PasswordReset))
        ));

        // Only the new password works
        let sign_in = SignInUseCase::new(store, config);
        let new_login = sign_in
            .execute(SignInInput {
                email: "a@b.com".to_string(),
                password: "new-secret".to_string(),
            })
            .await;
        assert!(new_login.is_ok());
        let old_login = sign_in
            .execute(SignInInput {
                email: "a@b.com".to_string(),
                password: "secret1".to_string(),
            })
            .await;
        assert!(matches!(old_login, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_expired_reset_token_then_invalid() {
        let store = Arc::new(InMemoryDirectoryStore::new());
        let notifier = RecordingNotifier::default();
        let config = Arc::new(AuthConfig {
            reset_token_ttl: Duration::ZERO,
            ..AuthConfig::development()
        });
        register(&store, &config, "a@b.com", "secret1").await;

        ForgotPasswordUseCase::new(store.clone(), Arc::new(notifier.clone()), config.clone())
            .execute("a@b.com".to_string())
            .await
            .unwrap();
        let secret = notifier.last_reset_secret();

        tokio::time::sleep(Duration::from_millis(5)).await;

        let reset = ResetPasswordUseCase::new(store.clone(), config);
        let expired = reset.execute(reset_input(&secret, "new-secret")).await;
        assert!(matches!(
            expired,
            Err(AuthError::ExpiredToken(TokenKind::PasswordReset))
        ));
        assert_eq!(reset_token_count(&store).await, 0);

        let again = reset.execute(reset_input(&secret, "new-secret")).await;
        assert!(matches!(
            again,
            Err(AuthError::InvalidToken(TokenKind::PasswordReset))
        ));
    }

    #[tokio::test]
    async fn test_unknown_reset_token() {
        let reset = ResetPasswordUseCase::new(Arc::new(InMemoryDirectoryStore::new()), config());
        let result = reset.execute(reset_input("abcdef", "new-secret")).await;
        assert!(matches!(
            result,
            Err(AuthError::InvalidToken(TokenKind::PasswordReset))
        ));
    }

    #[tokio::test]
    async fn test_reset_missing_fields() {
        let reset = ResetPasswordUseCase::new(Arc::new(InMemoryDirectoryStore::new()), config());
        for (token, password) in [("", "new-secret"), ("abcdef", ""), ("", "")] {
            match reset.execute(reset_input(token, password)).await {
                Err(AuthError::Validation(msg)) => {
                    assert_eq!(msg, "Token and new password are required")
                }
                _ => panic!("expected validation error"),
            }
        }
    }

    #[tokio::test]
    async fn test_sweep_removes_only_expired_tokens() {
        let store = Arc::new(InMemoryDirectoryStore::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let long_lived = config();
        let short_lived = Arc::new(AuthConfig {
            reset_token_ttl: Duration::ZERO,
            ..AuthConfig::development()
        });
        register(&store, &long_lived, "a@b.com", "secret1").await;
        register(&store, &long_lived, "c@d.com", "secret1").await;

        ForgotPasswordUseCase::new(store.clone(), notifier.clone(), long_lived)
            .execute("a@b.com".to_string())
            .await
            .unwrap();
        ForgotPasswordUseCase::new(store.clone(), notifier.clone(), short_lived)
            .execute("c@d.com".to_string())
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(5)).await;

        assert_eq!(store.cleanup_expired().await.unwrap(), 1);
        assert_eq!(reset_token_count(&store).await, 1);
    }
}
