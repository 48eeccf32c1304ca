use super::model::TokenIdentity;
use crate::core::config::AuthConfig;
use crate::core::error::AppError;
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use serde::Deserialize;
use std::sync::Arc;

use super::jwks::JwksClient;

/// Verifies RS256 ID tokens issued by the identity provider
pub struct JwtValidator {
    jwks_client: Arc<JwksClient>,
    issuer: String,
    audience: String,
    leeway: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct Claims {
    sub: String,
    #[serde(rename = "iss")]
    _iss: String,
    #[serde(rename = "aud")]
    _aud: String,
    #[serde(rename = "iat")]
    _iat: u64,
    #[serde(rename = "exp")]
    _exp: u64,

    /// Provider duplicate of `sub`, present on most ID tokens
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    phone_number: Option<String>,
}

impl JwtValidator {
    pub fn new(jwks_client: Arc<JwksClient>, config: &AuthConfig) -> Self {
        Self {
            jwks_client,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            leeway: config.jwt_leeway.as_secs(),
        }
    }

    pub async fn validate_token(&self, token: &str) -> Result<TokenIdentity, AppError> {
        let header = decode_header(token).map_err(|e| AppError::Auth(e.to_string()))?;

        if header.alg != Algorithm::RS256 {
            return Err(AppError::Auth(format!(
                "Unsupported algorithm: {:?}. Only RS256 is allowed",
                header.alg
            )));
        }

        let kid = header
            .kid
            .ok_or_else(|| AppError::Auth("Missing kid in token header".to_string()))?;

        let decoding_key = self
            .jwks_client
            .get_key(&kid)
            .await
            .map_err(|e| AppError::Auth(e.to_string()))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.leeway = self.leeway;

        let token_data = decode::<Claims>(token, &decoding_key, &validation)
            .map_err(|e| AppError::Auth(e.to_string()))?;

        token_data.claims.into_identity()
    }
}

impl Claims {
    fn into_identity(self) -> Result<TokenIdentity, AppError> {
        if self.sub.is_empty() {
            return Err(AppError::Auth("Token subject is empty".to_string()));
        }
        if let Some(user_id) = &self.user_id {
            if user_id != &self.sub {
                return Err(AppError::Auth("Token subject mismatch".to_string()));
            }
        }

        Ok(TokenIdentity {
            uid: self.sub,
            phone: self.phone_number.filter(|p| !p.is_empty()),
        })
    }
}
