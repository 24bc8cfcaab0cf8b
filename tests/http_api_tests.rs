//! HTTP 接口集成测试：重定向、链接管理、健康检查

mod common;

use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use serde_json::Value;

use common::TestEnv;
use cutter::api::constants::SESSION_COOKIE_NAME;
use cutter::api::jwt::JwtService;
use cutter::api::middleware::request_id::REQUEST_ID_HEADER;
use cutter::api::middleware::{RequestIdMiddleware, SessionAuth, TimingMiddleware};
use cutter::api::services::{AppStartTime, ErrorCode, TrustedProxies, configure};
use cutter::storage::User;

const SECRET: &str = "integration-test-session-secret-0123456789";

macro_rules! init_app {
    ($env:expr, $jwt:expr) => {
        test::init_service(
            App::new()
                .wrap(SessionAuth::new($jwt.clone()))
                .app_data(web::Data::new($env.storage.clone()))
                .app_data(web::Data::from($env.links.clone()))
                .app_data(web::Data::from($env.users.clone()))
                .app_data(web::Data::from($jwt.clone()))
                .app_data(web::Data::new(TrustedProxies::default()))
                .app_data(web::Data::new(AppStartTime::default()))
                .configure(configure),
        )
        .await
    };
}

fn jwt() -> Arc<JwtService> {
    Arc::new(JwtService::new(SECRET, 1))
}

fn session(jwt: &JwtService, user: &User) -> Cookie<'static> {
    let token = jwt.generate_session_token(user).unwrap();
    Cookie::new(SESSION_COOKIE_NAME, token)
}

#[actix_web::test]
async fn test_redirect_statuses() {
    let env = TestEnv::new().await;
    let jwt = jwt();
    let alice = env.seed_user(1001, "alice").await;
    let app = init_app!(env, jwt);

    for (name, dest) in [
        ("live", "https://live.example.com/"),
        ("off", "https://off.example.com/"),
        ("bad", "https://bad.example.com/"),
    ] {
        env.links
            .create(
                cutter::services::CreateLinkRequest {
                    name: Some(name.to_string()),
                    destination: dest.to_string(),
                },
                &alice,
                common::ip("10.0.0.1"),
            )
            .await
            .unwrap();
    }
    env.links.disable("off").await.unwrap();
    env.links.block("bad").await.unwrap();

    let resp = test::call_service(&app, TestRequest::get().uri("/go/live").to_request()).await;
    assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(
        resp.headers().get("Location").unwrap(),
        "https://live.example.com/"
    );

    let resp = test::call_service(&app, TestRequest::default().method(actix_web::http::Method::HEAD).uri("/go/live").to_request()).await;
    assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);

    let resp = test::call_service(&app, TestRequest::get().uri("/go/off").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(&app, TestRequest::get().uri("/go/bad").to_request()).await;
    assert_eq!(resp.status(), StatusCode::GONE);

    let resp = test::call_service(&app, TestRequest::get().uri("/go/nothing").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_create_requires_session() {
    let env = TestEnv::new().await;
    let jwt = jwt();
    let app = init_app!(env, jwt);

    let req = TestRequest::post()
        .uri("/create?destination=https%3A%2F%2Fexample.com")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], ErrorCode::Unauthorized as i32);
    assert!(body["data"].is_null());

    // 伪造签名的 token 同样视为未登录
    let forged = JwtService::new("some-other-secret-that-is-long-enough", 1);
    let mallory = env.seed_user(666, "mallory").await;
    let req = TestRequest::post()
        .uri("/create?destination=https%3A%2F%2Fexample.com")
        .cookie(session(&forged, &mallory))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    assert_eq!(env.storage.count_links().await.unwrap(), 0);
}

#[actix_web::test]
async fn test_create_flow() {
    let env = TestEnv::new().await;
    let jwt = jwt();
    let alice = env.seed_user(1001, "alice").await;
    let app = init_app!(env, jwt);

    let req = TestRequest::post()
        .uri("/create?name=abc123&destination=https%3A%2F%2Fexample.com")
        .cookie(session(&jwt, &alice))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(resp.headers().get("Location").unwrap(), "/go/abc123");

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["name"], "abc123");
    assert_eq!(body["data"]["destination"], "https://example.com");
    assert_eq!(body["data"]["createdBy"]["username"], "alice");
    assert_eq!(body["data"]["isDisabled"], false);
    assert_eq!(body["data"]["publicUri"], "https://s.example.com/go/abc123");

    // 相同目标地址返回已存在的链接
    let req = TestRequest::post()
        .uri("/create?name=other&destination=https%3A%2F%2Fexample.com")
        .cookie(session(&jwt, &alice))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["name"], "abc123");

    // 名称被占用
    let req = TestRequest::post()
        .uri("/create?name=abc123&destination=https%3A%2F%2Fanother.example.com")
        .cookie(session(&jwt, &alice))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], ErrorCode::LinkAlreadyExists as i32);

    // 非法目标地址
    let req = TestRequest::post()
        .uri("/create?destination=javascript%3Aalert(1)")
        .cookie(session(&jwt, &alice))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // 缺少目标地址
    let req = TestRequest::post()
        .uri("/create?name=nodest")
        .cookie(session(&jwt, &alice))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    assert_eq!(env.storage.count_links().await.unwrap(), 1);

    let resp = test::call_service(&app, TestRequest::get().uri("/go/abc123").to_request()).await;
    assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(resp.headers().get("Location").unwrap(), "https://example.com");
}

#[actix_web::test]
async fn test_bearer_token_is_accepted() {
    let env = TestEnv::new().await;
    let jwt = jwt();
    let alice = env.seed_user(1001, "alice").await;
    let app = init_app!(env, jwt);

    let token = jwt.generate_session_token(&alice).unwrap();
    let req = TestRequest::post()
        .uri("/create?destination=https%3A%2F%2Fbearer.example.com")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
}

#[actix_web::test]
async fn test_blocked_user_is_forbidden() {
    let env = TestEnv::new().await;
    let jwt = jwt();
    let alice = env.seed_user(1001, "alice").await;
    let app = init_app!(env, jwt);

    // 会话签发后再封禁，依然生效
    let cookie = session(&jwt, &alice);
    env.users.disable(alice.id).await.unwrap();

    let req = TestRequest::post()
        .uri("/create?destination=https%3A%2F%2Fexample.com")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(env.storage.count_links().await.unwrap(), 0);
}

#[actix_web::test]
async fn test_disable_and_enable_respect_ownership() {
    let env = TestEnv::new().await;
    let jwt = jwt();
    let alice = env.seed_user(1001, "alice").await;
    let bob = env.seed_user(1002, "bob").await;
    let admin = env.seed_admin(1003, "root").await;
    let app = init_app!(env, jwt);

    let req = TestRequest::post()
        .uri("/create?name=mine&destination=https%3A%2F%2Fmine.example.com")
        .cookie(session(&jwt, &alice))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CREATED
    );

    // 未登录
    let req = TestRequest::delete().uri("/disable/mine").to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );

    // 其他用户
    let req = TestRequest::delete()
        .uri("/disable/mine")
        .cookie(session(&jwt, &bob))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );

    // 不存在的链接
    let req = TestRequest::delete()
        .uri("/disable/ghost")
        .cookie(session(&jwt, &alice))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    // 所有者
    let req = TestRequest::delete()
        .uri("/disable/mine")
        .cookie(session(&jwt, &alice))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["isDisabled"], true);

    let resp = test::call_service(&app, TestRequest::get().uri("/go/mine").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // 管理员可以操作任何人的链接
    let req = TestRequest::put()
        .uri("/enable/mine")
        .cookie(session(&jwt, &admin))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["isDisabled"], false);

    let resp = test::call_service(&app, TestRequest::get().uri("/go/mine").to_request()).await;
    assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
}

#[actix_web::test]
async fn test_block_requires_admin() {
    let env = TestEnv::new().await;
    let jwt = jwt();
    let alice = env.seed_user(1001, "alice").await;
    let admin = env.seed_admin(1003, "root").await;
    let app = init_app!(env, jwt);

    let req = TestRequest::post()
        .uri("/create?name=spam&destination=https%3A%2F%2Fspam.example.com")
        .cookie(session(&jwt, &alice))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CREATED
    );

    // 所有者也不能封禁
    let req = TestRequest::delete()
        .uri("/block/spam")
        .cookie(session(&jwt, &alice))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );

    let req = TestRequest::delete()
        .uri("/block/spam")
        .cookie(session(&jwt, &admin))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["isBlocked"], true);

    let resp = test::call_service(&app, TestRequest::get().uri("/go/spam").to_request()).await;
    assert_eq!(resp.status(), StatusCode::GONE);

    let req = TestRequest::delete()
        .uri("/block/ghost")
        .cookie(session(&jwt, &admin))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[actix_web::test]
async fn test_health_check() {
    let env = TestEnv::new().await;
    let jwt = jwt();
    let app = init_app!(env, jwt);

    let resp = test::call_service(&app, TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "healthy");
    assert_eq!(body["data"]["database"]["backend"], "sqlite");
    assert_eq!(body["data"]["database"]["links_count"], 0);
}

#[actix_web::test]
async fn test_full_middleware_stack() {
    let env = TestEnv::new().await;
    let jwt = jwt();
    let alice = env.seed_user(1001, "alice").await;
    let app = test::init_service(
        App::new()
            .wrap(SessionAuth::new(jwt.clone()))
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
            .app_data(web::Data::new(env.storage.clone()))
            .app_data(web::Data::from(env.links.clone()))
            .app_data(web::Data::from(env.users.clone()))
            .app_data(web::Data::from(jwt.clone()))
            .app_data(web::Data::new(TrustedProxies::default()))
            .app_data(web::Data::new(AppStartTime::default()))
            .configure(configure),
    )
    .await;

    // 计时中间件读取会话中间件写入的 Principal
    let req = TestRequest::post()
        .uri("/create?name=stack&destination=https%3A%2F%2Fstack.example.com")
        .cookie(session(&jwt, &alice))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let request_id = resp
        .headers()
        .get(REQUEST_ID_HEADER)
        .expect("request id header")
        .to_str()
        .unwrap();
    assert_eq!(request_id.len(), 36);

    let resp = test::call_service(&app, TestRequest::get().uri("/go/missing").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(resp.headers().contains_key(REQUEST_ID_HEADER));
}
