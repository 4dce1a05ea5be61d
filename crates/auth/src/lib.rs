use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

/// Builds the lookup key for a profile's secret. The base URL is part of the
/// key so re-pointing a profile at another server does not reuse its password.
pub fn token_key(base_url: &str, profile: &str) -> String {
    format!("{}|{}", base_url.trim_end_matches('/'), profile)
}

/// Passwords and API tokens kept in a JSON map file (mode 600 on unix).
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `~/.jira-rest/credentials`.
    pub fn default_location() -> Result<Self> {
        let path = dirs::home_dir()
            .map(|h| h.join(".jira-rest").join("credentials"))
            .context("Cannot determine home directory")?;
        Ok(Self::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get_secret(&self, account: &str) -> Result<Option<String>> {
        Ok(self.read()?.remove(account))
    }

    pub fn set_secret(&self, account: &str, secret: &str) -> Result<()> {
        let mut creds = self.read()?;
        creds.insert(account.to_string(), secret.to_string());
        self.write(&creds)?;
        debug!(account, "Secret stored");
        Ok(())
    }

    /// Removing an unknown account is not an error.
    pub fn delete_secret(&self, account: &str) -> Result<()> {
        let mut creds = self.read()?;
        if creds.remove(account).is_some() {
            self.write(&creds)?;
            debug!(account, "Secret removed");
        }
        Ok(())
    }

    fn read(&self) -> Result<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Unable to read credentials at {}", self.path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Malformed credentials file {}", self.path.display()))
    }

    fn write(&self, creds: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);

        let file = options
            .open(&self.path)
            .with_context(|| format!("Unable to write credentials to {}", self.path.display()))?;
        serde_json::to_writer_pretty(file, creds)?;
        Ok(())
    }
}
