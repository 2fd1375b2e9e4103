// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # HTTP Integration Tests
//!
//! The full client stack against a mockito server: envelope handling,
//! the session-expired flow and guarded navigation over real requests.

use std::sync::Arc;
use std::time::Duration;

use mockito::{Matcher, Server};
use rk_client::{LogoutReason, ResourceKind, SessionEvent};
use rk_core::{Credentials, PageQuery};
use rk_router::{GuardState, RedirectReason};
use rk_tests::prelude::*;
use serde_json::{json, Value};

// =============================================================================
// Login and Navigation
// =============================================================================

#[tokio::test]
async fn test_login_then_forbidden_over_http() {
    init_test_logging();
    let mut server = Server::new_async().await;

    let login = server
        .mock("POST", "/auth/login")
        .match_body(Matcher::PartialJson(json!({
            "username": "alice",
            "captchaId": "c1",
            "verifyCode": "ab12"
        })))
        .with_body(ok_envelope(
            serde_json::to_value(ProfileFixtures::token_pair("t-1")).unwrap(),
        ))
        .create_async()
        .await;
    let me = server
        .mock("GET", "/auth/me")
        .match_header("authorization", "Bearer t-1")
        .with_body(ok_envelope(serde_json::to_value(ProfileFixtures::alice()).unwrap()))
        .expect(2)
        .create_async()
        .await;
    server
        .mock("GET", "/rbac/perms")
        .match_header("authorization", "Bearer t-1")
        .with_body(ok_envelope(json!([SUPPLY_PAGE])))
        .create_async()
        .await;
    let menus = server
        .mock("GET", "/rbac/menus")
        .with_body(ok_envelope(
            serde_json::to_value(MenuFixtures::rk_records_nested()).unwrap(),
        ))
        .expect(1)
        .create_async()
        .await;

    let context = http_context(&server.url(), Arc::new(CountingPrompt::new()), None).unwrap();
    let navigator = navigator_for(context.session.clone());

    let first = navigator.navigate("/rk/vendor").await.unwrap();
    assert_eq!(first.redirect_reason(), Some(RedirectReason::Unauthenticated));

    context
        .session
        .login(&Credentials::new("alice", "pw", "c1", "ab12"))
        .await
        .unwrap();
    let landing = navigator.after_login().await.unwrap();

    assert_eq!(landing.redirect_reason(), Some(RedirectReason::Forbidden));
    assert_eq!(landing.location.path(), "/403");
    assert_eq!(landing.state, GuardState::PublicOk);

    let supply = navigator.navigate("/rk/supply").await.unwrap();
    assert!(supply.reached_target());

    login.assert_async().await;
    me.assert_async().await;
    menus.assert_async().await;
}

#[tokio::test]
async fn test_wrong_captcha_message_surfaces() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/auth/login")
        .with_body(error_envelope(1001, "验证码不正确"))
        .create_async()
        .await;

    let context = http_context(&server.url(), Arc::new(CountingPrompt::new()), None).unwrap();
    let err = context
        .session
        .login(&Credentials::new("alice", "pw", "c1", "zzzz"))
        .await
        .unwrap_err();

    assert_eq!(err.business_code(), Some(1001));
    assert_eq!(err.user_message(), "验证码不正确");
    assert!(!context.session.is_authenticated());
}

// =============================================================================
// Session Expiry
// =============================================================================

#[tokio::test]
async fn test_concurrent_401s_prompt_once() {
    init_test_logging();
    let mut server = Server::new_async().await;
    let perms = server
        .mock("GET", "/rbac/perms")
        .with_status(401)
        .expect(3)
        .create_async()
        .await;

    let prompt = Arc::new(CountingPrompt::with_delay(Duration::from_millis(200)));
    let session = persisted_session("stale", ProfileFixtures::alice());
    let context = http_context(&server.url(), prompt.clone(), Some(session)).unwrap();
    assert!(context.session.is_authenticated());
    let mut events = context.session.subscribe();

    let (a, b, c) = tokio::join!(
        context.http.get::<Value>("/rbac/perms"),
        context.http.get::<Value>("/rbac/perms"),
        context.http.get::<Value>("/rbac/perms"),
    );

    for result in [a, b, c] {
        assert!(result.unwrap_err().is_auth_failure());
    }
    assert_eq!(prompt.shown(), 1);
    assert!(!context.session.is_authenticated());
    assert_eq!(
        events.recv().await.unwrap(),
        SessionEvent::LoggedOut {
            reason: LogoutReason::SessionExpired
        }
    );
    assert!(events.try_recv().is_err());
    perms.assert_async().await;
}

#[tokio::test]
async fn test_expired_session_drops_menus() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/auth/me")
        .with_body(ok_envelope(serde_json::to_value(ProfileFixtures::alice()).unwrap()))
        .create_async()
        .await;
    server
        .mock("GET", "/rbac/perms")
        .with_body(ok_envelope(json!([SUPPLY_PAGE])))
        .create_async()
        .await;
    server
        .mock("GET", "/rbac/menus")
        .with_body(ok_envelope(
            serde_json::to_value(MenuFixtures::rk_records()).unwrap(),
        ))
        .create_async()
        .await;
    server
        .mock("POST", "/supply/page")
        .with_status(401)
        .create_async()
        .await;

    let session = persisted_session("t-9", ProfileFixtures::alice());
    let prompt = Arc::new(CountingPrompt::new());
    let context = http_context(&server.url(), prompt.clone(), Some(session)).unwrap();
    context.session.hydrate().await.unwrap();
    assert!(context.session.menus().is_some());
    let mut events = context.session.subscribe();

    let err = context
        .resources
        .page::<Value>(ResourceKind::Supply, &PageQuery::new(1, 10))
        .await
        .unwrap_err();

    assert!(err.is_auth_failure());
    assert_eq!(prompt.shown(), 1);
    assert!(context.session.menus().is_none());
    assert!(context.session.cell().get().is_none());
    assert_eq!(
        events.recv().await.unwrap(),
        SessionEvent::LoggedOut {
            reason: LogoutReason::SessionExpired
        }
    );
}

#[tokio::test]
async fn test_explicit_token_failure_skips_prompt() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/auth/me")
        .with_status(401)
        .create_async()
        .await;
    server
        .mock("POST", "/auth/login")
        .with_body(ok_envelope(
            serde_json::to_value(ProfileFixtures::token_pair("t-1")).unwrap(),
        ))
        .create_async()
        .await;

    let prompt = Arc::new(CountingPrompt::new());
    let context = http_context(&server.url(), prompt.clone(), None).unwrap();
    let err = context
        .session
        .login(&Credentials::new("alice", "pw", "c1", "ab12"))
        .await
        .unwrap_err();

    assert!(err.is_auth_failure());
    assert_eq!(prompt.shown(), 0);
    assert!(!context.session.is_authenticated());
}

// =============================================================================
// Business Modules
// =============================================================================

#[tokio::test]
async fn test_supply_page_request() {
    let mut server = Server::new_async().await;
    let page = server
        .mock("POST", "/supply/page")
        .match_header("authorization", "Bearer t-9")
        .match_body(Matcher::PartialJson(json!({
            "page": 2,
            "size": 10,
            "keyWord": "java"
        })))
        .with_body(ok_envelope(json!({
            "list": [{"id": 31, "name": "Backend Engineer"}],
            "pagination": {"total": 11, "page": 2, "size": 10}
        })))
        .create_async()
        .await;

    let session = persisted_session("t-9", ProfileFixtures::alice());
    let context =
        http_context(&server.url(), Arc::new(CountingPrompt::new()), Some(session)).unwrap();

    let result = context
        .resources
        .page::<Value>(ResourceKind::Supply, &PageQuery::new(2, 10).with_keyword("java"))
        .await
        .unwrap();

    assert_eq!(result.list.len(), 1);
    assert_eq!(result.list[0]["name"], "Backend Engineer");
    assert_eq!(result.pagination.pages(), 2);
    page.assert_async().await;
}

#[tokio::test]
async fn test_module_business_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/rk/vendor/delete")
        .with_body(error_envelope(1003, "该供应商存在关联数据"))
        .create_async()
        .await;

    let session = persisted_session("t-9", ProfileFixtures::alice());
    let prompt = Arc::new(CountingPrompt::new());
    let context = http_context(&server.url(), prompt.clone(), Some(session)).unwrap();

    let err = context
        .resources
        .delete(ResourceKind::Vendor, &[4, 5])
        .await
        .unwrap_err();

    assert!(err.is_business());
    assert_eq!(err.user_message(), "该供应商存在关联数据");
    // Business errors never end the session.
    assert!(context.session.is_authenticated());
    assert_eq!(prompt.shown(), 0);
}
