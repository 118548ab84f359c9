
use chrono::{Duration, Utc};
use portfolio_site::{
    auth::{
        jwt::JwtService,
        password::{hash_password, verify_password},
    },
    constants::ADMIN_ROLE,
    entities::user::User,
    errors::{AuthError, PasswordError},
    limiter::login_guard::LoginGuard,
    password::{check_password_policy, weak_password_warning},
    settings::AppConfig,
};
use test_utils::*;
use uuid::Uuid;

fn user() -> User {
    User {
        id: Uuid::new_v4(),
        email: ADMIN_EMAIL.to_string(),
        password_hash: String::new(),
        created_at: Utc::now(),
    }
}

#[test]
fn issued_token_carries_identity_and_roles() {
    let jwt = JwtService::new(&test_config());
    let user = user();

    let token = jwt.create_jwt(&user, vec![ADMIN_ROLE.to_string()]).unwrap();
    let claims = jwt.decode_jwt(&token).unwrap().claims;

    assert_eq!(claims.sub, user.id.to_string());
    assert_eq!(claims.email, ADMIN_EMAIL);
    assert!(claims.is_admin());
    assert_eq!(claims.exp - claims.iat, 3600);
    assert_eq!(jwt.expires_in(), 3600);
}

#[test]
fn token_without_roles_is_not_admin() {
    let jwt = JwtService::new(&test_config());
    let token = jwt.create_jwt(&user(), vec![]).unwrap();

    let claims = jwt.decode_jwt(&token).unwrap().claims;
    assert!(!claims.is_admin());
    assert!(!claims.has_role("admin"));
}

#[test]
fn token_signed_with_another_secret_is_rejected() {
    let other = JwtService::new(&AppConfig {
        jwt_secret: "a_completely_different_secret_of_sufficient_len".to_string(),
        ..test_config()
    });
    let token = other.create_jwt(&user(), vec![ADMIN_ROLE.to_string()]).unwrap();

    let jwt = JwtService::new(&test_config());
    assert!(matches!(jwt.decode_jwt(&token), Err(AuthError::InvalidToken)));
    assert!(matches!(jwt.decode_jwt("garbage"), Err(AuthError::InvalidToken)));
}

#[test]
fn expired_token_is_reported_as_expired() {
    let jwt = JwtService::new(&AppConfig {
        jwt_expiration_minutes: -10,
        ..test_config()
    });
    let token = jwt.create_jwt(&user(), vec![ADMIN_ROLE.to_string()]).unwrap();

    assert!(matches!(jwt.decode_jwt(&token), Err(AuthError::TokenExpired)));
}

#[test]
fn hashing_is_salted_and_verifiable() {
    let first = hash_password(ADMIN_PASSWORD).unwrap();
    let second = hash_password(ADMIN_PASSWORD).unwrap();

    assert_ne!(first, second);
    assert!(verify_password(ADMIN_PASSWORD, &first).unwrap());
    assert!(!verify_password("wrong", &first).unwrap());
}

#[test]
fn malformed_hash_is_an_error_not_a_mismatch() {
    assert!(matches!(
        verify_password(ADMIN_PASSWORD, "not-a-phc-string"),
        Err(PasswordError::InvalidHashFormat(_))
    ));
}

#[test]
fn password_policy_requires_every_character_class() {
    assert_eq!(check_password_policy("Ab1!"), Err(PasswordError::TooShort(8)));
    assert_eq!(check_password_policy("Abcdefgh!"), Err(PasswordError::MissingDigit));
    assert_eq!(check_password_policy("ABCDEFG1!"), Err(PasswordError::MissingLowercase));
    assert_eq!(check_password_policy("abcdefg1!"), Err(PasswordError::MissingUppercase));
    assert_eq!(check_password_policy("Abcdefg12"), Err(PasswordError::MissingSymbol));

    assert_eq!(check_password_policy("Admin123!"), Ok(()));
    assert_eq!(check_password_policy(ADMIN_PASSWORD), Ok(()));
}

#[test]
fn weak_but_compliant_passwords_only_warn() {
    assert!(check_password_policy("Password1!").is_ok());
    assert!(weak_password_warning("Password1!").is_some());
    assert!(weak_password_warning("vK8#qz!Lr2@wNp5$").is_none());
}

#[test]
fn account_locks_after_max_failures() {
    let guard = LoginGuard::new(3, Duration::minutes(5));
    let now = Utc::now();

    for _ in 0..2 {
        guard.record_failure_at(ADMIN_EMAIL, now);
        assert!(guard.check_at(ADMIN_EMAIL, now).is_ok());
    }
    guard.record_failure_at(ADMIN_EMAIL, now);

    match guard.check_at(ADMIN_EMAIL, now + Duration::seconds(60)) {
        Err(AuthError::LockedOut(remaining)) => assert_eq!(remaining, 240),
        other => panic!("expected a lockout, got {other:?}"),
    }
}

#[test]
fn lockout_ignores_email_case_and_whitespace() {
    let guard = LoginGuard::new(1, Duration::minutes(5));
    guard.record_failure(" Owner@Portfolio.TEST ");

    assert!(matches!(guard.check(ADMIN_EMAIL), Err(AuthError::LockedOut(_))));
    assert!(guard.check("someone-else@portfolio.test").is_ok());
}

#[test]
fn lock_expires_and_counting_restarts() {
    let guard = LoginGuard::new(2, Duration::minutes(5));
    let now = Utc::now();
    guard.record_failure_at(ADMIN_EMAIL, now);
    guard.record_failure_at(ADMIN_EMAIL, now);

    let later = now + Duration::minutes(6);
    assert!(guard.check_at(ADMIN_EMAIL, later).is_ok());

    guard.record_failure_at(ADMIN_EMAIL, later);
    assert!(guard.check_at(ADMIN_EMAIL, later).is_ok());
}

#[test]
fn successful_login_resets_the_counter() {
    let guard = LoginGuard::new(2, Duration::minutes(5));
    guard.record_failure(ADMIN_EMAIL);
    guard.reset(ADMIN_EMAIL);
    guard.record_failure(ADMIN_EMAIL);

    assert!(guard.check(ADMIN_EMAIL).is_ok());
}
