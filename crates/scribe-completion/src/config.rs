use std::fmt;
use std::time::Duration;

use crate::error::CompletionError;

pub const DEFAULT_API_URL: &str = "https://api.featherless.ai/v1/completions";
pub const DEFAULT_MODEL: &str = "mistralai/Mistral-7B-Instruct-v0.2";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Connection settings for the completion service, built once at startup and
/// handed to [`crate::CompletionClient::new`].
#[derive(Clone)]
pub struct CompletionConfig {
    pub api_url: String,
    pub model: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl CompletionConfig {
    pub fn new(api_url: impl Into<String>, model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            model: model.into(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load from the environment.
    ///
    /// | Env Var                          | Default                  |
    /// |----------------------------------|--------------------------|
    /// | `SCRIBE_COMPLETION_API_URL`      | [`DEFAULT_API_URL`]      |
    /// | `SCRIBE_COMPLETION_MODEL`        | [`DEFAULT_MODEL`]        |
    /// | `SCRIBE_COMPLETION_API_KEY`      | required                 |
    /// | `SCRIBE_COMPLETION_TIMEOUT_SECS` | `20`                     |
    pub fn from_env() -> Result<Self, CompletionError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env), reading variables through `var`.
    pub fn from_lookup<F>(var: F) -> Result<Self, CompletionError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = var("SCRIBE_COMPLETION_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into());
        let model = var("SCRIBE_COMPLETION_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into());

        let api_key = var("SCRIBE_COMPLETION_API_KEY").unwrap_or_default();
        if api_key.trim().is_empty() {
            return Err(CompletionError::MissingConfig("SCRIBE_COMPLETION_API_KEY"));
        }

        let timeout = match var("SCRIBE_COMPLETION_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| CompletionError::InvalidConfig {
                    name: "SCRIBE_COMPLETION_TIMEOUT_SECS",
                    value: raw.clone(),
                })?;
                Duration::from_secs(secs)
            }
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self::new(api_url, model, api_key.trim()).with_timeout(timeout))
    }
}

// Keep the credential out of logs.
impl fmt::Debug for CompletionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionConfig")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> Result<CompletionConfig, CompletionError> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        CompletionConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn missing_api_key_is_rejected() {
        let err = lookup(&[]).unwrap_err();
        assert!(matches!(err, CompletionError::MissingConfig("SCRIBE_COMPLETION_API_KEY")));

        let err = lookup(&[("SCRIBE_COMPLETION_API_KEY", "   ")]).unwrap_err();
        assert!(matches!(err, CompletionError::MissingConfig("SCRIBE_COMPLETION_API_KEY")));
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let config = lookup(&[("SCRIBE_COMPLETION_API_KEY", " sk-live ")]).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.api_key, "sk-live");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn overrides_are_read() {
        let config = lookup(&[
            ("SCRIBE_COMPLETION_API_KEY", "k"),
            ("SCRIBE_COMPLETION_API_URL", "http://localhost:9000/v1/completions"),
            ("SCRIBE_COMPLETION_MODEL", "tiny"),
            ("SCRIBE_COMPLETION_TIMEOUT_SECS", " 5 "),
        ])
        .unwrap();
        assert_eq!(config.api_url, "http://localhost:9000/v1/completions");
        assert_eq!(config.model, "tiny");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn bad_timeout_is_rejected() {
        let err = lookup(&[
            ("SCRIBE_COMPLETION_API_KEY", "k"),
            ("SCRIBE_COMPLETION_TIMEOUT_SECS", "abc"),
        ])
        .unwrap_err();
        match err {
            CompletionError::InvalidConfig { name, value } => {
                assert_eq!(name, "SCRIBE_COMPLETION_TIMEOUT_SECS");
                assert_eq!(value, "abc");
            }
            other => panic!("expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = CompletionConfig::new("http://localhost", "m", "sk-secret");
        let printed = format!("{:?}", config);
        assert!(!printed.contains("sk-secret"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn new_uses_default_timeout() {
        let config = CompletionConfig::new("http://localhost", "m", "k");
        assert_eq!(config.timeout, Duration::from_secs(20));
        let config = config.with_timeout(Duration::from_millis(50));
        assert_eq!(config.timeout, Duration::from_millis(50));
    }
}
