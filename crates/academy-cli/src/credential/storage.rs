//! Credential storage for persisting login state.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Stored credential data.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCredential {
    /// API base the cookies belong to.
    pub api: String,
    /// Cookies as `name=value` pairs.
    pub cookies: Vec<String>,
}

impl std::fmt::Debug for StoredCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredCredential")
            .field("api", &self.api)
            .field("cookies", &format_args!("[{} REDACTED]", self.cookies.len()))
            .finish()
    }
}

/// Get the credential file path.
fn credential_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "academy").context("Could not determine data directory")?;

    let data_dir = dirs.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data directory")?;

    Ok(data_dir.join("session.json"))
}

/// Save the credential to disk.
pub fn save(credential: &StoredCredential) -> Result<()> {
    save_to(&credential_path()?, credential)
}

/// Load the credential from disk, if one was saved.
pub fn load() -> Result<Option<StoredCredential>> {
    load_from(&credential_path()?)
}

/// Remove the stored credential.
pub fn clear() -> Result<()> {
    clear_at(&credential_path()?)
}

fn save_to(path: &Path, credential: &StoredCredential) -> Result<()> {
    let json = serde_json::to_string_pretty(credential)?;

    fs::write(path, &json).context("Failed to write credential file")?;

    // Set restrictive permissions (Unix only)
    #[cfg(unix)]
    {
        let mut perms = fs::metadata(path)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(path, perms)?;
    }

    Ok(())
}

fn load_from(path: &Path) -> Result<Option<StoredCredential>> {
    if !path.exists() {
        return Ok(None);
    }

    let json = fs::read_to_string(path).context("Failed to read credential file")?;
    let stored = serde_json::from_str(&json).context("Invalid credential file")?;
    Ok(Some(stored))
}

fn clear_at(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).context("Failed to remove credential file")?;
    }
    Ok(())
}
