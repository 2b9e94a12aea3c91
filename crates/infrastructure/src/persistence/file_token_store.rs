//! Credential file persistence.
//!
//! Stores the token as a single line in the platform-specific config
//! directory unless a path is given:
//! - Linux: ~/.config/marquee/token
//! - macOS: ~/Library/Application Support/marquee/token
//! - Windows: %APPDATA%/marquee/token

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use marquee_application::ports::{TokenPersistence, TokenPersistenceError};
use marquee_domain::AuthToken;
use tracing::debug;

use crate::config::default_token_path;

/// Token persistence backed by one file.
#[derive(Debug, Clone)]
pub struct FileTokenPersistence {
    path: PathBuf,
}

impl FileTokenPersistence {
    /// Creates persistence at an explicit path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates persistence at the platform default location.
    ///
    /// # Errors
    /// Returns `Unavailable` if the platform has no config directory.
    pub fn at_default_location() -> Result<Self, TokenPersistenceError> {
        default_token_path().map(Self::new).ok_or_else(|| {
            TokenPersistenceError::Unavailable("could not determine config directory".to_string())
        })
    }

    /// Location of the credential file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenPersistence for FileTokenPersistence {
    fn load(&self) -> Result<Option<AuthToken>, TokenPersistenceError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        // Only a line ending is stripped; the token itself is opaque.
        let raw = content
            .strip_suffix('\n')
            .map_or(content.as_str(), |line| line.strip_suffix('\r').unwrap_or(line));
        if raw.is_empty() {
            return Ok(None);
        }
        debug!(path = %self.path.display(), "loaded stored credential");
        Ok(Some(AuthToken::new(raw)))
    }

    fn save(&self, token: &AuthToken) -> Result<(), TokenPersistenceError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&self.path, token.as_str())?;
        restrict_permissions(&self.path)?;
        debug!(path = %self.path.display(), "stored credential");
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenPersistenceError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// The credential file is readable by its owner only.
#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
