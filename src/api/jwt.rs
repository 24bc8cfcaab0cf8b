use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::storage::User;

/// Session Token Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// 用户 ID
    pub sub: String,
    /// 用户名
    pub name: String,
    pub roles: Vec<String>,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// 已认证的调用方，由会话中间件写入 request extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: u32,
    pub username: String,
    pub roles: Vec<String>,
}

impl Principal {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

impl TryFrom<SessionClaims> for Principal {
    type Error = jsonwebtoken::errors::Error;

    fn try_from(claims: SessionClaims) -> Result<Self, Self::Error> {
        let user_id = claims.sub.parse::<u32>().map_err(|_| {
            jsonwebtoken::errors::Error::from(jsonwebtoken::errors::ErrorKind::InvalidSubject)
        })?;

        Ok(Self {
            user_id,
            username: claims.name,
            roles: claims.roles,
        })
    }
}

/// JWT Service for issuing and validating session tokens
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    session_hours: u64,
}

impl JwtService {
    pub fn new(secret: &str, session_hours: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            session_hours,
        }
    }

    pub fn session_hours(&self) -> u64 {
        self.session_hours
    }

    pub fn generate_session_token(
        &self,
        user: &User,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: user.id.to_string(),
            name: user.username.clone(),
            roles: user.role_names(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.session_hours as i64)).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
    }

    pub fn validate_session_token(
        &self,
        token: &str,
    ) -> Result<SessionClaims, jsonwebtoken::errors::Error> {
        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &Validation::default())?;
        Ok(token_data.claims)
    }

    /// 校验 token 并转换为 Principal
    pub fn principal_from_token(
        &self,
        token: &str,
    ) -> Result<Principal, jsonwebtoken::errors::Error> {
        Principal::try_from(self.validate_session_token(token)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Role;

    fn create_test_service() -> JwtService {
        JwtService::new("test_secret_key_32_bytes_long!!", 24)
    }

    fn create_test_user() -> User {
        User {
            id: 583231,
            username: "octocat".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            ip_addresses: vec![],
            raw_object: serde_json::json!({}),
            is_blocked: false,
            roles: vec![Role {
                id: 1,
                name: "admin".to_string(),
                description: String::new(),
            }],
        }
    }

    #[test]
    fn test_generate_and_validate_session_token() {
        let service = create_test_service();
        let token = service.generate_session_token(&create_test_user()).unwrap();
        let claims = service.validate_session_token(&token).unwrap();

        assert_eq!(claims.sub, "583231");
        assert_eq!(claims.name, "octocat");
        assert_eq!(claims.roles, vec!["admin".to_string()]);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_principal_from_token() {
        let service = create_test_service();
        let token = service.generate_session_token(&create_test_user()).unwrap();
        let principal = service.principal_from_token(&token).unwrap();

        assert_eq!(principal.user_id, 583231);
        assert!(principal.has_role("admin"));
    }

    #[test]
    fn test_invalid_token_rejected() {
        let service = create_test_service();
        assert!(service.validate_session_token("invalid.token.here").is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let service1 = create_test_service();
        let service2 = JwtService::new("different_secret_key_32_bytes!!", 24);

        let token = service1.generate_session_token(&create_test_user()).unwrap();
        assert!(service2.validate_session_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = create_test_service();

        let now = Utc::now();
        let claims = SessionClaims {
            sub: "583231".to_string(),
            name: "octocat".to_string(),
            roles: vec![],
            iat: (now - Duration::hours(2)).timestamp(),
            exp: (now - Duration::hours(1)).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
        };

        let encoding_key = EncodingKey::from_secret(b"test_secret_key_32_bytes_long!!");
        let token = encode(&Header::default(), &claims, &encoding_key).unwrap();

        assert!(service.validate_session_token(&token).is_err());
    }

    #[test]
    fn test_non_numeric_subject_rejected() {
        let service = create_test_service();
        let now = Utc::now();
        let claims = SessionClaims {
            sub: "admin".to_string(),
            name: "admin".to_string(),
            roles: vec![],
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
        };
        let encoding_key = EncodingKey::from_secret(b"test_secret_key_32_bytes_long!!");
        let token = encode(&Header::default(), &claims, &encoding_key).unwrap();

        assert!(service.principal_from_token(&token).is_err());
    }
}
