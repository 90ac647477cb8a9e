//! Credential file loading
//!
//! Credential files are plain `key = value` property files:
//!
//! ```text
//! # Robot web service user
//! login = "#ws+abcdefgh"
//! password = 'secret'
//! failover_ip = 198.51.100.5
//! local_ip = 203.0.113.1
//! ```

use crate::error::{FailoverError, Result};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Required key holding the Robot web service user
pub const KEY_LOGIN: &str = "login";
/// Required key holding the Robot web service password
pub const KEY_PASSWORD: &str = "password";
/// Optional default failover address
pub const KEY_FAILOVER_IP: &str = "failover_ip";
/// Optional default local address
pub const KEY_LOCAL_IP: &str = "local_ip";
/// Optional API base URL override
pub const KEY_URL: &str = "url";

/// Basic-auth credentials for the Robot API
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

impl Credentials {
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Contents of a credential file that yielded usable credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialFile {
    /// File the values were read from
    pub path: PathBuf,
    pub credentials: Credentials,
    pub failover_ip: Option<String>,
    pub local_ip: Option<String>,
    pub url: Option<String>,
}

/// Strip one matching pair of surrounding quotes.
///
/// Only a value that both starts and ends with the same quote character
/// (`'` or `"`) and is at least two characters long is changed.
pub fn unquote(value: &str) -> &str {
    let mut chars = value.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first), Some(last)) if first == last && (first == '\'' || first == '"') => {
            &value[1..value.len() - 1]
        }
        _ => value,
    }
}

/// Parse property lines into a map.
///
/// Blank lines and lines starting with `#` or `!` are ignored. Keys and
/// values are separated by the first `=` or `:`; surrounding whitespace is
/// trimmed and values are unquoted. Later keys win.
pub fn parse_properties(content: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();

    for (index, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }

        let Some(split) = line.find(|c: char| c == '=' || c == ':') else {
            warn!("Ignoring line {} without separator", index + 1);
            continue;
        };

        let key = line[..split].trim();
        let value = unquote(line[split + 1..].trim());
        if key.is_empty() {
            warn!("Ignoring line {} with empty key", index + 1);
            continue;
        }

        map.insert(key.to_string(), value.to_string());
    }

    map
}

impl CredentialFile {
    /// Build from file contents.
    ///
    /// # Errors
    ///
    /// Returns a credentials error if `login` or `password` is missing or empty.
    pub fn parse(path: impl Into<PathBuf>, content: &str) -> Result<Self> {
        let path = path.into();
        let mut props = parse_properties(content);

        let mut required = |key: &str| {
            props
                .remove(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| {
                    FailoverError::Credentials(format!("{} has no '{}'", path.display(), key))
                })
        };
        let login = required(KEY_LOGIN)?;
        let password = required(KEY_PASSWORD)?;

        let mut optional = |key: &str| props.remove(key).filter(|v| !v.is_empty());
        let failover_ip = optional(KEY_FAILOVER_IP);
        let local_ip = optional(KEY_LOCAL_IP);
        let url = optional(KEY_URL);

        Ok(Self {
            path,
            credentials: Credentials { login, password },
            failover_ip,
            local_ip,
            url,
        })
    }

    /// Read and parse a single file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(path, &content)
    }

    /// Return the first file in `paths` that yields credentials.
    ///
    /// Missing, unreadable and incomplete files are skipped.
    ///
    /// # Errors
    ///
    /// Returns a credentials error naming every searched path when none of
    /// them works.
    pub fn load_first(paths: &[PathBuf]) -> Result<Self> {
        for path in paths {
            match Self::load(path) {
                Ok(file) => {
                    debug!("Loaded credentials from {}", path.display());
                    return Ok(file);
                }
                Err(FailoverError::Io(e)) => {
                    debug!("Skipping {}: {}", path.display(), e);
                }
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                }
            }
        }

        let searched = paths
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        Err(FailoverError::Credentials(format!(
            "no credentials found (searched: {})",
            if searched.is_empty() {
                "nothing"
            } else {
                searched.as_str()
            }
        )))
    }
}
