//! Credential resolution
//!
//! Loads a Personal Access Token through a fixed lookup chain:
//! explicit argument > `HELIO_PAT` environment variable > `~/.helio_config`
//! file. The library never prompts; a missing token is a configuration
//! error the caller must handle.

use std::path::PathBuf;

use crate::error::{ClientError, Result};

/// Environment variable holding the access token.
pub const ENV_PAT: &str = "HELIO_PAT";
/// Token file name under the home directory.
pub const CONFIG_FILE_NAME: &str = ".helio_config";

/// Resolve the access token.
///
/// Precedence: `explicit` > `HELIO_PAT` > `~/.helio_config` contents.
/// Whitespace-only values count as unset at every level.
pub fn resolve_token(explicit: Option<&str>) -> Result<String> {
    let env_token = std::env::var(ENV_PAT).ok();
    let file_token = config_file_path().and_then(|path| std::fs::read_to_string(path).ok());
    resolve_token_from(explicit, env_token.as_deref(), file_token.as_deref())
}

/// Pure resolution over already-fetched values; the testable core of
/// [`resolve_token`].
fn resolve_token_from(
    explicit: Option<&str>,
    env_token: Option<&str>,
    file_token: Option<&str>,
) -> Result<String> {
    let non_blank = |s: Option<&str>| {
        s.map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    };

    non_blank(explicit)
        .or_else(|| non_blank(env_token))
        .or_else(|| non_blank(file_token))
        .ok_or_else(|| {
            ClientError::Config(format!(
                "no access token found: pass one explicitly, set {ENV_PAT}, \
                 or create ~/{CONFIG_FILE_NAME}"
            ))
        })
}

fn config_file_path() -> Option<PathBuf> {
    std::env::home_dir().map(|home| home.join(CONFIG_FILE_NAME))
}
