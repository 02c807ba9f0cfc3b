use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Bytes of randomness in a generated secret key.
const GENERATED_SECRET_BYTES: usize = 16;

/// SmileCheck runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server bind address
    pub bind_address: String,
    /// HTTP server port
    pub port: u16,
    /// Directory holding prompts.json and state.json
    pub data_dir: PathBuf,
    /// Static root holding uploads/ and enhanced/
    pub static_dir: PathBuf,
    /// Flash cookie signing key
    pub secret_key: String,
    /// Whether `secret_key` was generated for this process
    pub secret_generated: bool,
    /// Rolling JSON log directory; console only when unset
    pub log_dir: Option<PathBuf>,
    /// Log level
    pub log_level: String,
    /// Largest accepted request body
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let (secret_key, secret_generated) = match var("SMILECHECK_SECRET_KEY").filter(|s| !s.is_empty()) {
            Some(key) => (key, false),
            None => (hex::encode(rand::random::<[u8; GENERATED_SECRET_BYTES]>()), true),
        };

        Self {
            bind_address: var("SMILECHECK_BIND").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: var("SMILECHECK_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            data_dir: var("SMILECHECK_DATA_DIR")
                .unwrap_or_else(|| "data".to_string())
                .into(),
            static_dir: var("SMILECHECK_STATIC_DIR")
                .unwrap_or_else(|| "static".to_string())
                .into(),
            secret_key,
            secret_generated,
            log_dir: var("SMILECHECK_LOG_DIR").filter(|d| !d.is_empty()).map(PathBuf::from),
            log_level: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            max_upload_bytes: var("SMILECHECK_MAX_UPLOAD_BYTES")
                .and_then(|n| n.parse().ok())
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.static_dir, PathBuf::from("static"));
        assert_eq!(config.log_dir, None);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.max_upload_bytes, 16 * 1024 * 1024);
        assert!(config.secret_generated);
        assert_eq!(config.secret_key.len(), 32);
    }

    #[test]
    fn generated_secrets_differ_per_load() {
        assert_ne!(Config::default().secret_key, Config::default().secret_key);
    }

    #[test]
    fn environment_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("SMILECHECK_BIND", "127.0.0.1"),
            ("SMILECHECK_PORT", "8081"),
            ("SMILECHECK_DATA_DIR", "/var/lib/smilecheck"),
            ("SMILECHECK_SECRET_KEY", "s3cret"),
            ("SMILECHECK_LOG_DIR", "/var/log/smilecheck"),
            ("SMILECHECK_MAX_UPLOAD_BYTES", "1024"),
        ]));
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.port, 8081);
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/smilecheck"));
        assert_eq!(config.secret_key, "s3cret");
        assert!(!config.secret_generated);
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/smilecheck")));
        assert_eq!(config.max_upload_bytes, 1024);
    }

    #[test]
    fn unparsable_numbers_fall_back() {
        let config = Config::from_lookup(lookup(&[
            ("SMILECHECK_PORT", "http"),
            ("SMILECHECK_MAX_UPLOAD_BYTES", "-1"),
        ]));
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
    }
}
