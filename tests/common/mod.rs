//! 集成测试共享环境：每个测试一个临时 SQLite 数据库

#![allow(dead_code)]

use std::net::IpAddr;
use std::sync::Arc;

use tempfile::TempDir;

use cutter::services::{LinkService, NameGenerator, UserService};
use cutter::storage::{SeaOrmStorage, User, UserUpsert};

pub const LINKS_DOMAIN: &str = "https://s.example.com/go/";

pub struct TestEnv {
    // 持有临时目录，drop 时删除数据库文件
    _dir: TempDir,
    pub storage: Arc<SeaOrmStorage>,
    pub links: Arc<LinkService>,
    pub users: Arc<UserService>,
}

impl TestEnv {
    pub async fn new() -> Self {
        let dir = TempDir::new().expect("创建临时目录失败");
        let db_path = dir.path().join("cutter_test.db");
        let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

        let storage = Arc::new(
            SeaOrmStorage::new(&db_url, "sqlite", 5)
                .await
                .expect("创建存储失败"),
        );
        let names = Arc::new(NameGenerator::with_seed(7));
        let links = Arc::new(LinkService::new(storage.clone(), names, LINKS_DOMAIN));
        let users = Arc::new(UserService::new(storage.clone()));

        Self {
            _dir: dir,
            storage,
            links,
            users,
        }
    }

    /// 直接写入一个用户（绕过 OAuth）
    pub async fn seed_user(&self, id: u32, username: &str) -> User {
        self.storage
            .upsert_user(&UserUpsert {
                id,
                username: username.to_string(),
                raw_object: serde_json::json!({ "id": id, "login": username }),
                source_ip: ip("203.0.113.10"),
            })
            .await
            .expect("写入用户失败")
    }

    pub async fn seed_admin(&self, id: u32, username: &str) -> User {
        self.seed_user(id, username).await;
        self.users
            .grant_role(id, "admin")
            .await
            .expect("授予 admin 失败")
    }
}

pub fn ip(s: &str) -> IpAddr {
    s.parse().expect("invalid ip literal")
}
