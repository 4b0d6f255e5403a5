//! JWT bearer-token validation.
//!
//! Tokens are issued by the hosted auth provider. They are verified either
//! with a shared HS256 secret or, when a PEM public key is configured, as
//! RS256. The subject claim is the caller's user id.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims read from every bearer token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the auth provider's user id.
    pub sub: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    #[serde(default)]
    pub iat: i64,
    #[serde(default)]
    pub jti: Option<String>,
}

/// Key material used to verify tokens.
#[derive(Clone)]
pub enum JwtKey {
    /// HMAC-SHA256 shared secret.
    Secret(String),
    /// RSA public key in PEM form.
    RsaPublicKey(String),
}

impl std::fmt::Debug for JwtKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Secret(_) => f.write_str("Secret(<redacted>)"),
            Self::RsaPublicKey(_) => f.write_str("RsaPublicKey(..)"),
        }
    }
}

/// Configuration for JWT validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub key: JwtKey,
    /// Lifetime of tokens minted by [`generate_access_token`], in minutes.
    pub access_token_expiry_mins: i64,
}

const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 60;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                  | Required                      | Default |
    /// |--------------------------|-------------------------------|---------|
    /// | `JWT_PUBLIC_KEY`         | one of the two                | --      |
    /// | `JWT_SECRET`             | one of the two                | --      |
    /// | `JWT_ACCESS_EXPIRY_MINS` | no                            | `60`    |
    ///
    /// `JWT_PUBLIC_KEY` wins when both are set. Literal `\n` sequences in the
    /// PEM are turned into newlines so the key fits on one `.env` line.
    ///
    /// # Panics
    ///
    /// Panics if neither key is set or the configured one is empty.
    pub fn from_env() -> Self {
        let key = match std::env::var("JWT_PUBLIC_KEY") {
            Ok(pem) if !pem.is_empty() => JwtKey::RsaPublicKey(pem.replace("\\n", "\n")),
            _ => {
                let secret = std::env::var("JWT_SECRET")
                    .expect("JWT_SECRET or JWT_PUBLIC_KEY must be set in the environment");
                assert!(!secret.is_empty(), "JWT_SECRET must not be empty");
                JwtKey::Secret(secret)
            }
        };

        let access_token_expiry_mins: i64 = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_ACCESS_EXPIRY_MINS.to_string())
            .parse()
            .expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64");

        Self {
            key,
            access_token_expiry_mins,
        }
    }

    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            key: JwtKey::Secret(secret.into()),
            access_token_expiry_mins: DEFAULT_ACCESS_EXPIRY_MINS,
        }
    }
}

/// Mint an HS256 token for `user_id`. Only possible with a shared secret;
/// used for local development and tests.
pub fn generate_access_token(
    user_id: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let JwtKey::Secret(secret) = &config.key else {
        return Err(jsonwebtoken::errors::ErrorKind::InvalidAlgorithm.into());
    };

    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        exp: now + config.access_token_expiry_mins * 60,
        iat: now,
        jti: Some(Uuid::new_v4().to_string()),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Validate and decode a bearer token, returning the embedded [`Claims`].
///
/// Signature and expiration are checked.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let (key, algorithm) = match &config.key {
        JwtKey::Secret(secret) => (DecodingKey::from_secret(secret.as_bytes()), Algorithm::HS256),
        JwtKey::RsaPublicKey(pem) => (DecodingKey::from_rsa_pem(pem.as_bytes())?, Algorithm::RS256),
    };

    let token_data = decode::<Claims>(token, &key, &Validation::new(algorithm))?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig::with_secret("test-secret-that-is-long-enough-for-hmac")
    }

    #[test]
    fn test_generate_and_validate_access_token() {
        let config = test_config();
        let token = generate_access_token("user_2abc", &config).expect("token generation");

        let claims = validate_token(&token, &config).expect("token validation");
        assert_eq!(claims.sub, "user_2abc");
        assert!(claims.exp > claims.iat);
        assert!(claims.jti.is_some());
    }

    #[test]
    fn test_expired_token_fails() {
        let config = test_config();

        // Well beyond the default 60-second leeway.
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: "user_1".to_string(),
            exp: now - 300,
            iat: now - 600,
            jti: None,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret-that-is-long-enough-for-hmac"),
        )
        .expect("encoding should succeed");

        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn test_different_secrets_fail() {
        let token = generate_access_token("user_1", &JwtConfig::with_secret("secret-alpha"))
            .expect("token generation");
        assert!(validate_token(&token, &JwtConfig::with_secret("secret-bravo")).is_err());
    }

    #[test]
    fn test_hs256_token_rejected_by_rsa_config() {
        let token = generate_access_token("user_1", &test_config()).expect("token generation");
        let rsa = JwtConfig {
            key: JwtKey::RsaPublicKey("not a pem".into()),
            access_token_expiry_mins: 60,
        };
        assert!(validate_token(&token, &rsa).is_err());
    }

    #[test]
    fn test_cannot_mint_without_secret() {
        let rsa = JwtConfig {
            key: JwtKey::RsaPublicKey("pem".into()),
            access_token_expiry_mins: 60,
        };
        assert!(generate_access_token("user_1", &rsa).is_err());
    }

    #[test]
    fn test_key_is_redacted_in_debug() {
        assert!(!format!("{:?}", test_config()).contains("test-secret"));
    }
}
