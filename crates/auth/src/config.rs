#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub signature_window_ms: i64,
    pub nonce_ttl_ms: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { signature_window_ms: 120_000, nonce_ttl_ms: 300_000 }
    }
}
