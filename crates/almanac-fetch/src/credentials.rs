//! API key loading from the environment and `.env` files.

use std::collections::HashMap;
use std::path::Path;

use almanac_catalog::Catalog;
use almanac_types::ProviderId;
use tracing::debug;

use crate::FetchError;

/// An API key. Formatting never reveals more than the last four characters.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wraps a key, rejecting blank values.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into().trim().to_string();
        (!key.is_empty()).then_some(Self(key))
    }

    /// Returns the raw key for use in a request.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    fn masked(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
        format!("****{tail}")
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ApiKey({})", self.masked())
    }
}

impl std::fmt::Display for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.masked())
    }
}

/// API keys for the providers that need one.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    keys: HashMap<ProviderId, ApiKey>,
}

impl Credentials {
    /// Loads keys from a `.env` file and the process environment.
    ///
    /// With `env_file = None` a `.env` in the current directory is used when
    /// present. Variables already set in the environment win over the file.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly given env file cannot be read.
    pub fn load(env_file: Option<&Path>) -> Result<Self, FetchError> {
        match env_file {
            Some(path) => {
                dotenvy::from_path(path).map_err(|e| FetchError::EnvFile {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })?;
                debug!(path = %path.display(), "Loaded env file");
            }
            None => {
                if let Ok(path) = dotenvy::dotenv() {
                    debug!(path = %path.display(), "Loaded env file");
                }
            }
        }
        Ok(Self::from_lookup(|var| std::env::var(var).ok()))
    }

    /// Builds credentials from an arbitrary variable lookup.
    ///
    /// Each provider's variables are tried in catalog order; the first
    /// non-blank value wins.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let catalog = Catalog::global();
        let keys = catalog
            .providers()
            .filter_map(|provider| {
                provider
                    .key_vars
                    .iter()
                    .find_map(|var| lookup(var).and_then(ApiKey::new))
                    .map(|key| (provider.id, key))
            })
            .collect();
        Self { keys }
    }

    /// Sets a key explicitly.
    #[must_use]
    pub fn with_key(mut self, provider: ProviderId, key: ApiKey) -> Self {
        self.keys.insert(provider, key);
        self
    }

    /// Returns the key for a provider, if configured.
    #[must_use]
    pub fn key(&self, provider: ProviderId) -> Option<&ApiKey> {
        self.keys.get(&provider)
    }

    /// Returns the key for a provider or an error naming the variable to set.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::MissingApiKey`] when no key is configured.
    pub fn require(&self, provider: ProviderId) -> Result<&ApiKey, FetchError> {
        self.key(provider).ok_or_else(|| FetchError::MissingApiKey {
            var: Catalog::global()
                .provider(provider)
                .key_vars
                .first()
                .cloned()
                .unwrap_or_else(|| format!("API_KEY_{}", provider.as_str().to_uppercase())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_api_key_masking() {
        let key = ApiKey::new("abcdef0123456789").unwrap();
        assert_eq!(key.to_string(), "****6789");
        assert_eq!(format!("{key:?}"), "ApiKey(****6789)");
        assert_eq!(key.expose(), "abcdef0123456789");
        assert_eq!(ApiKey::new("ab").unwrap().to_string(), "****ab");
    }

    #[test]
    fn test_blank_key_rejected() {
        assert!(ApiKey::new("").is_none());
        assert!(ApiKey::new("   ").is_none());
    }

    #[test]
    fn test_from_lookup() {
        let creds = Credentials::from_lookup(lookup(&[
            ("API_KEY_FRED", "fredkey"),
            ("API_KEY_EIA", "eiakey"),
        ]));
        assert_eq!(creds.key(ProviderId::Fred).unwrap().expose(), "fredkey");
        assert_eq!(creds.key(ProviderId::Eia).unwrap().expose(), "eiakey");
        assert!(creds.key(ProviderId::Yahoo).is_none());
    }

    #[test]
    fn test_eia_falls_back_to_plain_api_key() {
        let creds = Credentials::from_lookup(lookup(&[("API_KEY", "legacy")]));
        assert_eq!(creds.key(ProviderId::Eia).unwrap().expose(), "legacy");

        let creds = Credentials::from_lookup(lookup(&[("API_KEY", "legacy"), ("API_KEY_EIA", "new")]));
        assert_eq!(creds.key(ProviderId::Eia).unwrap().expose(), "new");
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let creds = Credentials::from_lookup(lookup(&[("API_KEY_FRED", "")]));
        let err = creds.require(ProviderId::Fred).unwrap_err();
        assert!(matches!(err, FetchError::MissingApiKey { ref var } if var == "API_KEY_FRED"));
    }

    #[test]
    fn test_require_names_primary_variable() {
        let err = Credentials::default().require(ProviderId::Eia).unwrap_err();
        assert_eq!(err.to_string(), "API_KEY_EIA not set; add it to your .env file");
    }

    #[test]
    fn test_load_missing_env_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does-not-exist.env");
        assert!(matches!(
            Credentials::load(Some(&path)),
            Err(FetchError::EnvFile { .. })
        ));
    }

    #[test]
    fn test_load_env_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "ALMANAC_TEST_UNUSED=1").unwrap();

        assert!(Credentials::load(Some(&path)).is_ok());
    }
}
