use chrono::{Duration, Utc};

use biovault_identity::error::IdentityServiceError;
use biovault_identity::usecase::login::{Credentials, LoginUseCase};

use crate::helpers::{MockUserRepo, TEST_PASSWORD, test_user, test_user_with_otp};

fn password(username: &str, password: &str) -> Credentials {
    Credentials::Password {
        username: username.to_owned(),
        password: password.to_owned(),
    }
}

fn otp(email: &str, otp: &str) -> Credentials {
    Credentials::Otp {
        email: email.to_owned(),
        otp: otp.to_owned(),
    }
}

#[tokio::test]
async fn should_login_with_correct_password() {
    let uc = LoginUseCase {
        users: MockUserRepo::new(vec![test_user()]),
    };

    let out = uc.execute(password("alice", TEST_PASSWORD)).await.unwrap();

    assert_eq!(out.user.id, 1);
    assert!(out.token.starts_with("token_"), "token was {}", out.token);
}

#[tokio::test]
async fn should_reject_wrong_password() {
    let uc = LoginUseCase {
        users: MockUserRepo::new(vec![test_user()]),
    };

    let result = uc.execute(password("alice", "wrong")).await;

    assert!(
        matches!(result, Err(IdentityServiceError::InvalidCredentials)),
        "expected InvalidCredentials, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_unknown_username() {
    let uc = LoginUseCase {
        users: MockUserRepo::empty(),
    };

    let result = uc.execute(password("nobody", TEST_PASSWORD)).await;

    assert!(matches!(
        result,
        Err(IdentityServiceError::InvalidCredentials)
    ));
}

#[tokio::test]
async fn should_login_with_valid_otp_once() {
    let repo = MockUserRepo::new(vec![test_user_with_otp(
        "123456",
        Utc::now() + Duration::minutes(5),
    )]);
    let uc = LoginUseCase {
        users: repo.clone(),
    };

    uc.execute(otp("alice@example.com", "123456")).await.unwrap();

    let stored = repo.get(1).unwrap();
    assert!(stored.otp.is_none(), "otp should be cleared after use");
    assert!(stored.otp_expires_at.is_none());

    let replay = uc.execute(otp("alice@example.com", "123456")).await;
    assert!(
        matches!(replay, Err(IdentityServiceError::InvalidOtp)),
        "expected InvalidOtp on replay, got {replay:?}"
    );
}

#[tokio::test]
async fn should_reject_expired_otp() {
    let uc = LoginUseCase {
        users: MockUserRepo::new(vec![test_user_with_otp(
            "123456",
            Utc::now() - Duration::seconds(1),
        )]),
    };

    let result = uc.execute(otp("alice@example.com", "123456")).await;

    assert!(matches!(result, Err(IdentityServiceError::InvalidOtp)));
}

#[tokio::test]
async fn should_reject_mismatched_otp() {
    let uc = LoginUseCase {
        users: MockUserRepo::new(vec![test_user_with_otp(
            "123456",
            Utc::now() + Duration::minutes(5),
        )]),
    };

    let result = uc.execute(otp("alice@example.com", "654321")).await;

    assert!(matches!(result, Err(IdentityServiceError::InvalidOtp)));
}

#[test]
fn should_require_a_complete_credential_pair() {
    let result = Credentials::from_fields(Some("alice".into()), None, None, Some("123456".into()));
    assert!(matches!(result, Err(IdentityServiceError::BadRequest(_))));
}

#[tokio::test]
async fn should_accept_an_otp_for_only_one_of_two_concurrent_logins() {
    let repo = MockUserRepo::new(vec![test_user_with_otp(
        "123456",
        Utc::now() + Duration::minutes(5),
    )])
    .yielding();
    let uc = LoginUseCase {
        users: repo.clone(),
    };

    let (first, second) = tokio::join!(
        uc.execute(otp("alice@example.com", "123456")),
        uc.execute(otp("alice@example.com", "123456")),
    );

    let succeeded = [first.is_ok(), second.is_ok()]
        .iter()
        .filter(|ok| **ok)
        .count();
    assert_eq!(succeeded, 1, "first={first:?} second={second:?}");
    let failed = if first.is_err() { first } else { second };
    assert!(
        matches!(failed, Err(IdentityServiceError::InvalidOtp)),
        "expected InvalidOtp, got {failed:?}"
    );
    assert!(repo.get(1).unwrap().otp.is_none());
}
