//! Credential configuration
//!
//! Credentials live in a small property file, looked up first in the user's
//! home directory and then system-wide. See [`CredentialFile::load_first`].

mod credentials;
mod paths;

pub use credentials::{
    parse_properties, unquote, CredentialFile, Credentials, KEY_FAILOVER_IP, KEY_LOCAL_IP,
    KEY_LOGIN, KEY_PASSWORD, KEY_URL,
};
pub use paths::{default_credential_paths, SYSTEM_CREDENTIALS_PATH, USER_CREDENTIALS_FILE};
