use crate::error::{Error, Result};
use ini::Ini;
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

const SECTION: &str = "Preferences";
const API_KEY: &str = "api_key";

/// Stores the YouTube Data API key between runs.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        PreferenceStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing or unreadable files count as "no key stored".
    pub fn load(&self) -> Option<String> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                debug!("No preferences read from {}: {e}", self.path.display());
                return None;
            }
        };

        match Ini::load_from_str(&contents) {
            Ok(ini) => stored_api_key(&ini),
            Err(e) => {
                warn!(
                    "Ignoring unparsable preferences file {}: {e}",
                    self.path.display()
                );
                None
            }
        }
    }

    pub fn save(&self, api_key: &str) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| Error::io("failed to create directory", parent, e))?;
        }

        let mut ini = Ini::new();
        ini.with_section(Some(SECTION)).set(API_KEY, api_key.trim());
        ini.write_to_file(&self.path)
            .map_err(|e| Error::io("failed to write preferences", &self.path, e))?;
        debug!("Saved API key to {}", self.path.display());
        Ok(())
    }
}

/// Names are compared without case; `configparser` lowercases option names.
fn stored_api_key(ini: &Ini) -> Option<String> {
    let (_, section) = ini
        .iter()
        .find(|(name, _)| name.is_some_and(|n| n.eq_ignore_ascii_case(SECTION)))?;
    section
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(API_KEY))
        .map(|(_, value)| value.trim().to_string())
        .filter(|key| !key.is_empty())
}
