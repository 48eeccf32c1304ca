use jsonwebtoken::DecodingKey;
use reqwest::header::{HeaderMap, CACHE_CONTROL};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

#[derive(Debug, Deserialize)]
struct JwkSet {
    keys: Vec<Jwk>,
}

#[derive(Debug, Deserialize)]
struct Jwk {
    kid: String,
    kty: String,
    #[serde(default, rename = "use")]
    key_use: Option<String>,
    #[serde(default)]
    n: String,
    #[serde(default)]
    e: String,
}

impl Jwk {
    fn is_rsa_signing_key(&self) -> bool {
        self.kty == "RSA" && self.key_use.as_deref().map_or(true, |u| u == "sig")
    }
}

#[derive(Default)]
struct KeySet {
    keys: HashMap<String, DecodingKey>,
    expires_at: Option<Instant>,
}

impl KeySet {
    fn fresh_key(&self, kid: &str) -> Option<DecodingKey> {
        match self.expires_at {
            Some(expires_at) if Instant::now() < expires_at => self.keys.get(kid).cloned(),
            _ => None,
        }
    }
}

/// Signing keys for the provider's ID tokens.
///
/// The provider rotates its keys and publishes how long the current set stays
/// valid in the `Cache-Control: max-age` of the JWKS response. That lifetime is
/// honoured; `fallback_ttl` only applies when the header is missing. A token
/// signed with a `kid` we have not seen forces a refetch.
pub struct JwksClient {
    jwks_url: String,
    client: reqwest::Client,
    key_set: RwLock<KeySet>,
    fallback_ttl: Duration,
}

impl JwksClient {
    pub fn new(jwks_url: &str, fallback_ttl: Duration) -> Self {
        Self {
            jwks_url: jwks_url.to_string(),
            client: reqwest::Client::new(),
            key_set: RwLock::new(KeySet::default()),
            fallback_ttl,
        }
    }

    pub async fn get_key(&self, kid: &str) -> Result<DecodingKey, JwksError> {
        if let Some(key) = self.key_set.read().await.fresh_key(kid) {
            return Ok(key);
        }

        let mut key_set = self.key_set.write().await;
        // Another request may have refreshed while we waited for the lock
        if let Some(key) = key_set.fresh_key(kid) {
            return Ok(key);
        }

        *key_set = self.fetch().await?;
        key_set
            .keys
            .get(kid)
            .cloned()
            .ok_or_else(|| JwksError::UnknownKey(kid.to_string()))
    }

    async fn fetch(&self) -> Result<KeySet, JwksError> {
        let response = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| JwksError::Fetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(JwksError::Fetch(format!("HTTP {}", response.status())));
        }

        let ttl = max_age(response.headers()).unwrap_or(self.fallback_ttl);
        let jwk_set: JwkSet = response
            .json()
            .await
            .map_err(|e| JwksError::Parse(e.to_string()))?;

        let mut keys = HashMap::new();
        for jwk in jwk_set.keys.into_iter().filter(Jwk::is_rsa_signing_key) {
            match DecodingKey::from_rsa_components(&jwk.n, &jwk.e) {
                Ok(key) => {
                    keys.insert(jwk.kid, key);
                }
                Err(e) => tracing::warn!("Skipping unusable signing key {}: {}", jwk.kid, e),
            }
        }

        tracing::debug!(
            "Fetched {} signing keys from {} (valid for {}s)",
            keys.len(),
            self.jwks_url,
            ttl.as_secs()
        );

        Ok(KeySet {
            keys,
            expires_at: Some(Instant::now() + ttl),
        })
    }
}

/// `max-age` directive of a `Cache-Control` header
fn max_age(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(CACHE_CONTROL)?
        .to_str()
        .ok()?
        .split(',')
        .filter_map(|directive| directive.trim().strip_prefix("max-age="))
        .find_map(|secs| secs.trim_matches('"').parse::<u64>().ok())
        .map(Duration::from_secs)
}

#[derive(Debug, thiserror::Error)]
pub enum JwksError {
    #[error("Failed to fetch signing keys: {0}")]
    Fetch(String),

    #[error("Failed to parse signing keys: {0}")]
    Parse(String),

    #[error("Unknown signing key: {0}")]
    UnknownKey(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderValue};
    use axum::{extract::State, routing::get, Json, Router};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Serves `k1` on the first fetch and `k1` + `k2` afterwards
    async fn serve_rotating_keys(cache_control: &'static str) -> (String, Arc<AtomicUsize>) {
        let fetches = Arc::new(AtomicUsize::new(0));
        let app = Router::new()
            .route(
                "/jwks",
                get(
                    move |State(fetches): State<Arc<AtomicUsize>>| async move {
                        let served = fetches.fetch_add(1, Ordering::SeqCst);
                        let mut keys = vec![jwk("k1")];
                        if served > 0 {
                            keys.push(jwk("k2"));
                        }
                        (
                            [(header::CACHE_CONTROL, cache_control)],
                            Json(json!({ "keys": keys })),
                        )
                    },
                ),
            )
            .with_state(fetches.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}/jwks", addr), fetches)
    }

    fn jwk(kid: &str) -> Value {
        json!({ "kid": kid, "kty": "RSA", "use": "sig", "alg": "RS256", "n": "sXch", "e": "AQAB" })
    }

    #[tokio::test]
    async fn test_cached_key_is_served_without_refetch() {
        let (url, fetches) = serve_rotating_keys("public, max-age=3600, must-revalidate").await;
        let client = JwksClient::new(&url, Duration::from_secs(1));

        client.get_key("k1").await.unwrap();
        client.get_key("k1").await.unwrap();

        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unknown_kid_triggers_refetch() {
        let (url, fetches) = serve_rotating_keys("public, max-age=3600").await;
        let client = JwksClient::new(&url, Duration::from_secs(3600));

        client.get_key("k1").await.unwrap();
        client.get_key("k2").await.unwrap();
        assert_eq!(fetches.load(Ordering::SeqCst), 2);

        let err = client.get_key("retired").await.unwrap_err();
        assert!(matches!(err, JwksError::UnknownKey(_)));
        assert_eq!(fetches.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_zero_max_age_expires_immediately() {
        let (url, fetches) = serve_rotating_keys("max-age=0").await;
        let client = JwksClient::new(&url, Duration::from_secs(3600));

        client.get_key("k1").await.unwrap();
        client.get_key("k1").await.unwrap();

        assert_eq!(fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_reported() {
        let client = JwksClient::new("http://127.0.0.1:1/jwks", Duration::from_secs(60));
        let err = client.get_key("k1").await.unwrap_err();
        assert!(matches!(err, JwksError::Fetch(_)));
    }

    #[test]
    fn test_max_age_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(max_age(&headers), None);

        headers.insert(
            CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=19137, must-revalidate, no-transform"),
        );
        assert_eq!(max_age(&headers), Some(Duration::from_secs(19137)));

        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        assert_eq!(max_age(&headers), None);
    }

    #[test]
    fn test_only_rsa_signing_keys_are_used() {
        let set: JwkSet = serde_json::from_value(json!({
            "keys": [
                jwk("sig"),
                { "kid": "enc", "kty": "RSA", "use": "enc", "n": "sXch", "e": "AQAB" },
                { "kid": "ec", "kty": "EC", "crv": "P-256", "x": "a", "y": "b" },
            ]
        }))
        .unwrap();
        let usable: Vec<_> = set
            .keys
            .iter()
            .filter(|k| k.is_rsa_signing_key())
            .map(|k| k.kid.as_str())
            .collect();
        assert_eq!(usable, vec!["sig"]);
    }
}
