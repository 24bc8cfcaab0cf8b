//! UserService 集成测试

mod common;

use common::{TestEnv, ip};
use cutter::errors::CutterError;
use cutter::services::IdentityClaims;
use cutter::storage::backend::vacated_username;
use cutter::storage::{LEGACY_USER_ID, LEGACY_USERNAME};

fn claims(id: u32, login: &str) -> IdentityClaims {
    IdentityClaims::from_raw(serde_json::json!({
        "id": id,
        "login": login,
        "name": "Mona Lisa",
    }))
    .unwrap()
}

#[tokio::test]
async fn test_legacy_user_is_seeded() {
    let env = TestEnv::new().await;

    let legacy = env.users.get_by_id(LEGACY_USER_ID).await.unwrap().unwrap();
    assert_eq!(legacy.username, LEGACY_USERNAME);
    assert!(!legacy.is_blocked);
    assert_eq!(env.storage.count_users().await.unwrap(), 1);
}

#[tokio::test]
async fn test_upsert_twice_merges_ips_into_one_row() {
    let env = TestEnv::new().await;

    let first = env
        .users
        .upsert_from_external_identity(&claims(583231, "octocat"), ip("198.51.100.1"))
        .await
        .unwrap();
    assert_eq!(first.ip_addresses, vec![ip("198.51.100.1")]);

    let second = env
        .users
        .upsert_from_external_identity(&claims(583231, "octocat"), ip("2001:db8::1"))
        .await
        .unwrap();
    assert_eq!(
        second.ip_addresses,
        vec![ip("198.51.100.1"), ip("2001:db8::1")]
    );
    assert_eq!(
        (second.created_at - first.created_at).num_seconds(),
        0,
        "created_at must not move on refresh"
    );

    // 重复 IP 不再追加
    let third = env
        .users
        .upsert_from_external_identity(&claims(583231, "octocat"), ip("198.51.100.1"))
        .await
        .unwrap();
    assert_eq!(third.ip_addresses.len(), 2);

    // legacy + octocat
    assert_eq!(env.storage.count_users().await.unwrap(), 2);
}

#[tokio::test]
async fn test_upsert_refreshes_username_and_raw_object() {
    let env = TestEnv::new().await;

    env.users
        .upsert_from_external_identity(&claims(42, "old-login"), ip("10.0.0.1"))
        .await
        .unwrap();
    let renamed = env
        .users
        .upsert_from_external_identity(&claims(42, "new-login"), ip("10.0.0.1"))
        .await
        .unwrap();

    assert_eq!(renamed.username, "new-login");
    assert_eq!(renamed.raw_object["login"], "new-login");
    assert!(env.users.get_by_username("old-login").await.unwrap().is_none());
    assert_eq!(
        env.users
            .get_by_username("new-login")
            .await
            .unwrap()
            .unwrap()
            .id,
        42
    );
}

#[tokio::test]
async fn test_disable_blocks_user_and_survives_login() {
    let env = TestEnv::new().await;
    env.seed_user(7, "mallory").await;

    let blocked = env.users.disable(7).await.unwrap();
    assert!(blocked.is_blocked);

    let after_login = env
        .users
        .upsert_from_external_identity(&claims(7, "mallory"), ip("10.0.0.9"))
        .await
        .unwrap();
    assert!(after_login.is_blocked);

    assert!(matches!(
        env.users.disable(999).await,
        Err(CutterError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_grant_role_is_idempotent() {
    let env = TestEnv::new().await;
    env.seed_user(11, "root").await;

    let user = env.users.grant_role(11, "admin").await.unwrap();
    assert!(user.has_role("admin"));

    let again = env.users.grant_role(11, "admin").await.unwrap();
    assert_eq!(again.roles.len(), 1);

    assert!(matches!(
        env.users.grant_role(11, "superuser").await,
        Err(CutterError::NotFound(_))
    ));
    assert!(matches!(
        env.users.grant_role(404, "admin").await,
        Err(CutterError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_login_taken_over_by_new_account() {
    let env = TestEnv::new().await;

    env.users
        .upsert_from_external_identity(&claims(100, "octocat"), ip("10.0.0.1"))
        .await
        .unwrap();

    // 旧账号改名后，另一个账号注册了同一个登录名
    let newcomer = env
        .users
        .upsert_from_external_identity(&claims(200, "octocat"), ip("10.0.0.2"))
        .await
        .unwrap();
    assert_eq!(newcomer.id, 200);
    assert_eq!(newcomer.username, "octocat");

    let previous = env.users.get_by_id(100).await.unwrap().unwrap();
    assert_eq!(previous.username, vacated_username(100));
    assert_eq!(
        env.users.get_by_username("octocat").await.unwrap().unwrap().id,
        200
    );

    // 旧账号再次登录时恢复自己的新登录名
    let returned = env
        .users
        .upsert_from_external_identity(&claims(100, "octo-renamed"), ip("10.0.0.1"))
        .await
        .unwrap();
    assert_eq!(returned.username, "octo-renamed");
    assert_eq!(env.storage.count_users().await.unwrap(), 3);
}
