use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use super::types::{Data, ErrorResponse, Secret};
use super::{LogicalClient, VaultError};
use crate::config::VaultConfig;

const TOKEN_HEADER: &str = "x-vault-token";
const NAMESPACE_HEADER: &str = "x-vault-namespace";

#[derive(Clone)]
pub struct VaultClient {
    client: reqwest::Client,
    base_url: String,
}

impl VaultClient {
    pub fn new(config: &VaultConfig) -> Result<Self, VaultError> {
        let token = config.token.as_deref().ok_or_else(|| {
            VaultError::Config(
                "No Vault token provided. Set VAULT_TOKEN or use --token flag".to_string(),
            )
        })?;

        let mut headers = HeaderMap::new();
        let mut token_value = HeaderValue::from_str(token)
            .map_err(|_| VaultError::Config("Invalid token format".to_string()))?;
        token_value.set_sensitive(true);
        headers.insert(HeaderName::from_static(TOKEN_HEADER), token_value);

        if let Some(namespace) = &config.namespace {
            let ns_value = HeaderValue::from_str(namespace)
                .map_err(|_| VaultError::Config(format!("Invalid namespace '{}'", namespace)))?;
            headers.insert(HeaderName::from_static(NAMESPACE_HEADER), ns_value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("tfvr/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(VaultError::Network)?;

        Ok(Self {
            client,
            base_url: config.address.trim_end_matches('/').to_string(),
        })
    }

    /// NOTE: Primarily used for testing with mock servers.
    pub fn with_base_url(token: String, base_url: String) -> Result<Self, VaultError> {
        Self::new(&VaultConfig::new(base_url, Some(token)))
    }

    pub fn api_base(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.base_url, encode_path(path))
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Data>,
    ) -> Result<Option<Secret>, VaultError> {
        let url = self.url(path);
        let mut request = self.client.request(method.clone(), &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        // NOTE: Vault answers reads of absent paths with 404; deletes of absent
        // paths are treated the same way so that delete is idempotent.
        if status.as_u16() == 404 && method != Method::PUT {
            return Ok(None);
        }

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorResponse>(&bytes)
                .ok()
                .map(|body| body.errors.join("; "))
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("Unknown error")
                        .to_string()
                });

            return Err(match status.as_u16() {
                401 | 403 => VaultError::Auth {
                    status: status.as_u16(),
                    message,
                },
                code => VaultError::Api {
                    status: code,
                    message,
                },
            });
        }

        if status.as_u16() == 204 || bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        let secret: Secret = serde_json::from_slice(&bytes).map_err(|e| VaultError::Decode {
            path: path.to_string(),
            message: e.to_string(),
        })?;

        for warning in secret.warnings.iter().flatten() {
            tracing::warn!(path = %path, warning = %warning, "Vault returned a warning");
        }

        Ok(Some(secret))
    }
}

#[async_trait]
impl LogicalClient for VaultClient {
    async fn read(&self, path: &str) -> Result<Option<Secret>, VaultError> {
        self.send(Method::GET, path, None).await
    }

    async fn write(&self, path: &str, data: Data) -> Result<Option<Secret>, VaultError> {
        self.send(Method::PUT, path, Some(&data)).await
    }

    async fn delete(&self, path: &str) -> Result<Option<Secret>, VaultError> {
        self.send(Method::DELETE, path, None).await
    }
}

/// Percent-encode each segment of a slash-delimited logical path.
fn encode_path(path: &str) -> String {
    path.trim_matches('/')
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

impl std::fmt::Debug for VaultClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultClient")
            .field("base_url", &self.base_url)
            .field("token", &"[REDACTED]")
            .finish()
    }
}
