//! Directory-backed store: one JSON document per profile and per preset

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

use super::ProfileStore;
use crate::constants::storage::{EXTENSION, PRESETS_DIR, PROFILES_DIR};
use crate::error::{GatewayError, GatewayResult};
use crate::macros::{PresetId, PresetWire, ProfileWire};

#[derive(Debug, Clone)]
pub struct FileGateway {
    root: PathBuf,
}

impl FileGateway {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn profile_path(&self, name: &str) -> GatewayResult<PathBuf> {
        let file_stem = sanitize_name(name);
        if file_stem.is_empty() {
            return Err(GatewayError::Rejected(format!("unusable profile name: {name:?}")));
        }
        Ok(self.root.join(PROFILES_DIR).join(format!("{file_stem}.{EXTENSION}")))
    }

    fn preset_path(&self, id: PresetId) -> PathBuf {
        self.root.join(PRESETS_DIR).join(format!("{id}.{EXTENSION}"))
    }

    /// Parse every document in a subdirectory; a missing directory is empty
    async fn read_all<T: serde::de::DeserializeOwned>(&self, dir: &str) -> GatewayResult<Vec<T>> {
        let dir = self.root.join(dir);
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut documents = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            let contents = fs::read(&path).await?;
            match serde_json::from_slice(&contents) {
                Ok(document) => documents.push(document),
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable document"),
            }
        }
        Ok(documents)
    }
}

/// Keep only word characters, matching the agent's file naming
fn sanitize_name(name: &str) -> String {
    name.chars().filter(|c| c.is_ascii_alphanumeric() || *c == '_').collect()
}

/// Write through a temp file so readers never see a half-written document
async fn write_atomic(path: &Path, contents: &[u8]) -> GatewayResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    let tmp = path.with_extension(format!("{EXTENSION}.tmp"));
    fs::write(&tmp, contents).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}

impl ProfileStore for FileGateway {
    async fn get_profile(&self, name: &str) -> GatewayResult<Option<ProfileWire>> {
        let path = self.profile_path(name)?;
        match fs::read(&path).await {
            Ok(contents) => Ok(Some(serde_json::from_slice(&contents)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "Profile not stored yet");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn save_profile(&self, name: &str, body: &ProfileWire) -> GatewayResult<()> {
        let path = self.profile_path(name)?;
        let json = serde_json::to_vec_pretty(body)?;
        write_atomic(&path, &json).await?;
        info!(profile = %name, path = %path.display(), "Profile saved");
        Ok(())
    }

    async fn list_profiles(&self) -> GatewayResult<Vec<ProfileWire>> {
        let mut profiles: Vec<ProfileWire> = self.read_all(PROFILES_DIR).await?;
        profiles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(profiles)
    }

    async fn list_presets(&self) -> GatewayResult<Vec<PresetWire>> {
        let mut presets: Vec<PresetWire> = self.read_all(PRESETS_DIR).await?;
        presets.sort_by_key(|p| p.id);
        Ok(presets)
    }

    /// The id in the path wins over the id in the body
    async fn save_preset(&self, id: PresetId, body: &PresetWire) -> GatewayResult<()> {
        let mut stored = body.clone();
        stored.id = id;
        let path = self.preset_path(id);
        let json = serde_json::to_vec_pretty(&stored)?;
        write_atomic(&path, &json).await?;
        info!(preset_id = %id, name = %stored.name, "Preset saved");
        Ok(())
    }
}
