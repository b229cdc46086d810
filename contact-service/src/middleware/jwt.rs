//! JWT authentication middleware

use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use std::sync::Arc;

use super::token::{extract_token, Claims, TokenValidator};
use crate::{config::JwtConfig, error::Error};

/// JWT authentication middleware state
#[derive(Clone)]
pub struct JwtAuth {
    decoding_key: Arc<DecodingKey>,
    validation: Validation,
}

impl std::fmt::Debug for JwtAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtAuth")
            .field("algorithms", &self.validation.algorithms)
            .finish_non_exhaustive()
    }
}

fn config_error(message: String) -> Error {
    Error::Config(Box::new(figment::Error::from(message)))
}

impl JwtAuth {
    /// Build the verifier from the key file named in `config`
    pub async fn new(config: &JwtConfig) -> Result<Self, Error> {
        let key = tokio::fs::read(&config.key_path).await.map_err(|e| {
            config_error(format!(
                "Failed to read JWT key from '{}': {}\n\
                 RS*/ES* expect a PEM public key, HS* a raw secret file",
                config.key_path.display(),
                e
            ))
        })?;

        Self::from_key(&key, config)
    }

    /// Build the verifier from key material already in memory
    pub fn from_key(key: &[u8], config: &JwtConfig) -> Result<Self, Error> {
        let algorithm = match config.algorithm.to_uppercase().as_str() {
            "RS256" => Algorithm::RS256,
            "RS384" => Algorithm::RS384,
            "RS512" => Algorithm::RS512,
            "ES256" => Algorithm::ES256,
            "ES384" => Algorithm::ES384,
            "HS256" => Algorithm::HS256,
            "HS384" => Algorithm::HS384,
            "HS512" => Algorithm::HS512,
            alg => return Err(config_error(format!("Unsupported JWT algorithm: {}", alg))),
        };

        let decoding_key = match algorithm {
            Algorithm::RS256 | Algorithm::RS384 | Algorithm::RS512 => {
                DecodingKey::from_rsa_pem(key)?
            }
            Algorithm::ES256 | Algorithm::ES384 => DecodingKey::from_ec_pem(key)?,
            _ => DecodingKey::from_secret(key),
        };

        let mut validation = Validation::new(algorithm);
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }
        if let Some(audience) = &config.audience {
            validation.set_audience(&[audience]);
        }

        Ok(Self {
            decoding_key: Arc::new(decoding_key),
            validation,
        })
    }

    /// Reject the request with 401 unless it carries a valid bearer token.
    ///
    /// On success the decoded [`Claims`] are added to the request extensions.
    pub async fn middleware(
        State(auth): State<Self>,
        mut request: Request<Body>,
        next: Next,
    ) -> Result<Response, Error> {
        let token = extract_token(request.headers())?;
        let claims = auth.validate_token(&token)?;

        tracing::debug!(sub = %claims.sub, "request authenticated");
        request.extensions_mut().insert(claims);

        Ok(next.run(request).await)
    }
}

impl TokenValidator for JwtAuth {
    fn validate_token(&self, token: &str) -> Result<Claims, Error> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }
}
