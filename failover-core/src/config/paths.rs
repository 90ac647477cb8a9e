//! Default credential file locations

use std::path::PathBuf;

/// File name looked up in the user's home directory
pub const USER_CREDENTIALS_FILE: &str = ".hetzner.rc";

/// System-wide credential file
pub const SYSTEM_CREDENTIALS_PATH: &str = "/etc/hetzner-api.conf";

/// Returns the credential files to try, in order.
///
/// - `$HOME/.hetzner.rc`
/// - `/etc/hetzner-api.conf`
///
/// The home entry is left out when no home directory can be determined.
pub fn default_credential_paths() -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(2);
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(USER_CREDENTIALS_FILE));
    }
    paths.push(PathBuf::from(SYSTEM_CREDENTIALS_PATH));
    paths
}
