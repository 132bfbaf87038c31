use std::time::Duration;

pub const DEFAULT_ADDRESS: &str = "http://127.0.0.1:8200";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the Vault logical API.
#[derive(Clone)]
pub struct VaultConfig {
    pub address: String,
    pub token: Option<String>,
    pub namespace: Option<String>,
    pub timeout: Duration,
}

impl VaultConfig {
    pub fn new(address: impl Into<String>, token: Option<String>) -> Self {
        Self {
            address: address.into(),
            token,
            namespace: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_namespace(mut self, namespace: Option<String>) -> Self {
        self.namespace = namespace.filter(|ns| !ns.is_empty());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ADDRESS, None)
    }
}

impl std::fmt::Debug for VaultConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultConfig")
            .field("address", &self.address)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("namespace", &self.namespace)
            .field("timeout", &self.timeout)
            .finish()
    }
}
