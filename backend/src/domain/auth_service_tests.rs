//! Tests for the authentication service.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{MockPasswordHasher, MockTokenCodec, MockUserRepository, TokenError};
use crate::domain::{ErrorCode, UserId};

struct FixtureClock;

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
            .single()
            .expect("valid fixture timestamp")
    }
}

fn account(username: &str, email: &str) -> UserAccount {
    UserAccount::create(
        UserId::random(),
        NewUser {
            username: username.to_owned(),
            email: email.to_owned(),
            password_hash: "$2b$04$stored".to_owned(),
        },
        FixtureClock.utc(),
    )
}

#[fixture]
fn registration() -> Registration {
    Registration::try_from_parts(Some("ada"), Some("ada@example.com"), Some("hunter2"))
        .expect("valid registration")
}

fn service(
    users: MockUserRepository,
    passwords: MockPasswordHasher,
    tokens: MockTokenCodec,
) -> AuthService {
    AuthService::new(
        Arc::new(users),
        Arc::new(passwords),
        Arc::new(tokens),
        Arc::new(FixtureClock),
    )
}

#[rstest]
#[tokio::test]
async fn register_hashes_password_and_issues_token(registration: Registration) {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().return_once(|_| Ok(None));
    users.expect_find_by_username().return_once(|_| Ok(None));
    users
        .expect_create()
        .withf(|new_user| new_user.password_hash == "hashed:hunter2")
        .return_once(|new_user| {
            Ok(UserAccount::create(
                UserId::random(),
                new_user,
                FixtureClock.utc(),
            ))
        });
    let mut passwords = MockPasswordHasher::new();
    passwords
        .expect_hash()
        .return_once(|password| Ok(format!("hashed:{password}")));
    let mut tokens = MockTokenCodec::new();
    tokens
        .expect_issue()
        .withf(|identity, issued_at| {
            identity.username == "ada" && *issued_at == FixtureClock.utc()
        })
        .return_once(|_, _| Ok("signed-token".to_owned()));

    let session = service(users, passwords, tokens)
        .register(registration)
        .await
        .expect("registration succeeds");

    assert_eq!(session.token, "signed-token");
    assert_eq!(session.identity.email, "ada@example.com");
}

#[rstest]
#[tokio::test]
async fn register_rejects_taken_email(registration: Registration) {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .return_once(|_| Ok(Some(account("someone", "ada@example.com"))));
    users.expect_find_by_username().return_once(|_| Ok(None));

    let err = service(users, MockPasswordHasher::new(), MockTokenCodec::new())
        .register(registration)
        .await
        .expect_err("duplicate email");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "User already exists");
}

#[rstest]
#[case(None, false)]
#[case(Some(false), false)]
#[case(Some(true), true)]
#[tokio::test]
async fn login_requires_matching_password(
    #[case] password_matches: Option<bool>,
    #[case] should_succeed: bool,
) {
    let mut users = MockUserRepository::new();
    let stored = password_matches.map(|_| account("ada", "ada@example.com"));
    users.expect_find_by_email().return_once(move |_| Ok(stored));
    let mut passwords = MockPasswordHasher::new();
    if let Some(matches) = password_matches {
        passwords.expect_verify().return_once(move |_, _| Ok(matches));
    }
    let mut tokens = MockTokenCodec::new();
    tokens.expect_issue().returning(|_, _| Ok("token".to_owned()));

    let credentials = LoginCredentials::try_from_parts(Some("ada@example.com"), Some("pw"))
        .expect("credentials shape");
    let result = service(users, passwords, tokens).login(credentials).await;

    match (should_succeed, result) {
        (true, Ok(session)) => assert_eq!(session.identity.username, "ada"),
        (false, Err(err)) => {
            assert_eq!(err.code(), ErrorCode::Unauthorized);
            assert_eq!(err.message(), "Invalid credentials");
        }
        (true, Err(err)) => panic!("expected success, got error: {err:?}"),
        (false, Ok(session)) => panic!("expected failure, got session: {session:?}"),
    }
}

#[test]
fn authenticate_maps_codec_failures_to_token_failed() {
    let mut tokens = MockTokenCodec::new();
    tokens
        .expect_verify()
        .return_once(|_| Err(TokenError::invalid("ExpiredSignature")));

    let err = service(MockUserRepository::new(), MockPasswordHasher::new(), tokens)
        .authenticate("stale")
        .expect_err("expired token");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), TOKEN_FAILED);
}

#[tokio::test]
async fn update_profile_rejects_username_of_another_user() {
    let caller = account("ada", "ada@example.com");
    let identity = AuthenticatedUser {
        id: caller.user.id,
        username: caller.user.username.clone(),
        email: caller.user.email.clone(),
    };
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_username()
        .return_once(|_| Ok(Some(account("grace", "grace@example.com"))));

    let err = service(users, MockPasswordHasher::new(), MockTokenCodec::new())
        .update_profile(
            &identity,
            ProfileChanges {
                username: Some("grace".to_owned()),
                ..ProfileChanges::default()
            },
        )
        .await
        .expect_err("username belongs to someone else");

    assert_eq!(err.message(), "Username already taken");
}

#[tokio::test]
async fn update_profile_allows_keeping_own_username() {
    let caller = account("ada", "ada@example.com");
    let identity = AuthenticatedUser {
        id: caller.user.id,
        username: caller.user.username.clone(),
        email: caller.user.email.clone(),
    };
    let own = caller.clone();
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_username()
        .return_once(move |_| Ok(Some(own)));
    users
        .expect_update_profile()
        .return_once(move |_, _| Ok(Some(caller)));

    let user = service(users, MockPasswordHasher::new(), MockTokenCodec::new())
        .update_profile(
            &identity,
            ProfileChanges {
                username: Some("ada".to_owned()),
                ..ProfileChanges::default()
            },
        )
        .await
        .expect("own username is allowed");

    assert_eq!(user.username, "ada");
}
