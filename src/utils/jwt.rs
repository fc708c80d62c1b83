//! Bearer 令牌校验
//!
//! 令牌由外部身份服务签发，这里只做 HS256 校验，不签发。

use crate::config::AppConfig;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

// JWT Claims 结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // 外部身份服务中的用户 uuid
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub exp: usize, // Expiration time (时间戳)
    pub iat: usize, // Issued at (签发时间)
}

pub struct JwtUtils;

impl JwtUtils {
    /// 使用全局配置校验令牌
    pub fn verify_access_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let config = &AppConfig::get().jwt;
        Self::verify_with_secret(token, &config.secret, config.issuer.as_deref(), config.leeway)
    }

    /// 使用给定密钥校验令牌
    pub fn verify_with_secret(
        token: &str,
        secret: &str,
        issuer: Option<&str>,
        leeway: u64,
    ) -> Result<Claims, jsonwebtoken::errors::Error> {
        // 未配置密钥时拒绝所有令牌
        if secret.is_empty() {
            return Err(jsonwebtoken::errors::Error::from(
                jsonwebtoken::errors::ErrorKind::InvalidKeyFormat,
            ));
        }

        let decoding_key = DecodingKey::from_secret(secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway;
        if let Some(iss) = issuer {
            validation.set_issuer(&[iss]);
        }

        let claims = decode::<Claims>(token, &decoding_key, &validation)?.claims;
        if claims.sub.trim().is_empty() {
            return Err(jsonwebtoken::errors::Error::from(
                jsonwebtoken::errors::ErrorKind::InvalidSubject,
            ));
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde_json::json;

    const SECRET: &str = "test-secret";

    fn sign(claims: serde_json::Value, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn claims_with_exp(exp: i64) -> serde_json::Value {
        json!({
            "sub": "7d3c0f1e-uuid",
            "name": "alice",
            "email": "alice@example.com",
            "exp": exp,
            "iat": chrono::Utc::now().timestamp(),
        })
    }

    #[test]
    fn test_valid_token() {
        let exp = chrono::Utc::now().timestamp() + 3600;
        let token = sign(claims_with_exp(exp), SECRET);
        let claims = JwtUtils::verify_with_secret(&token, SECRET, None, 0).unwrap();
        assert_eq!(claims.sub, "7d3c0f1e-uuid");
        assert_eq!(claims.email, "alice@example.com");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let exp = chrono::Utc::now().timestamp() + 3600;
        let token = sign(claims_with_exp(exp), "other-secret");
        assert!(JwtUtils::verify_with_secret(&token, SECRET, None, 0).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let exp = chrono::Utc::now().timestamp() - 600;
        let token = sign(claims_with_exp(exp), SECRET);
        assert!(JwtUtils::verify_with_secret(&token, SECRET, None, 30).is_err());
    }

    #[test]
    fn test_issuer_checked_when_configured() {
        let exp = chrono::Utc::now().timestamp() + 3600;
        let mut claims = claims_with_exp(exp);
        claims["iss"] = json!("https://id.example.com");
        let token = sign(claims, SECRET);

        assert!(
            JwtUtils::verify_with_secret(&token, SECRET, Some("https://id.example.com"), 0).is_ok()
        );
        assert!(JwtUtils::verify_with_secret(&token, SECRET, Some("https://other"), 0).is_err());
    }

    #[test]
    fn test_empty_secret_rejects_everything() {
        let exp = chrono::Utc::now().timestamp() + 3600;
        let token = sign(claims_with_exp(exp), SECRET);
        assert!(JwtUtils::verify_with_secret(&token, "", None, 0).is_err());
    }

    #[test]
    fn test_blank_subject_rejected() {
        let exp = chrono::Utc::now().timestamp() + 3600;
        let mut claims = claims_with_exp(exp);
        claims["sub"] = json!(" ");
        let token = sign(claims, SECRET);
        assert!(JwtUtils::verify_with_secret(&token, SECRET, None, 0).is_err());
    }
}
