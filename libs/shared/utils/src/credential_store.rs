use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde_json::{Map, Value};
use tracing::{debug, error, warn};

use shared_models::{Credential, CredentialStore, StoreError, ACCESS_TOKEN_KEY};

/// Credential storage that lives as long as the process.
#[derive(Default)]
pub struct MemoryCredentialStore {
    slot: RwLock<Option<Credential>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: impl Into<Credential>) -> Self {
        Self {
            slot: RwLock::new(Some(credential.into())),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Option<Credential> {
        match self.slot.read() {
            Ok(slot) => slot.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn set(&self, credential: Credential) -> Result<(), StoreError> {
        match self.slot.write() {
            Ok(mut slot) => *slot = Some(credential),
            Err(poisoned) => *poisoned.into_inner() = Some(credential),
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match self.slot.write() {
            Ok(mut slot) => *slot = None,
            Err(poisoned) => *poisoned.into_inner() = None,
        }
        Ok(())
    }
}

/// Credential storage persisted as a small JSON document, with the token
/// kept under [`ACCESS_TOKEN_KEY`]. Other keys in the file are preserved.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Map<String, Value> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return Map::new(),
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                warn!("Credential file {} is not a JSON object, ignoring it", self.path.display());
                Map::new()
            }
        }
    }

    fn write_document(&self, document: &Map<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                error!("Failed to create credential directory {}: {}", parent.display(), e);
                StoreError::io(parent.display().to_string(), e)
            })?;
        }

        let contents = serde_json::to_string_pretty(document)?;

        fs::write(&self.path, contents).map_err(|e| {
            error!("Failed to write credential file {}: {}", self.path.display(), e);
            StoreError::io(self.path.display().to_string(), e)
        })
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Option<Credential> {
        self.read_document()
            .get(ACCESS_TOKEN_KEY)
            .and_then(Value::as_str)
            .map(Credential::from)
    }

    fn set(&self, credential: Credential) -> Result<(), StoreError> {
        let mut document = self.read_document();
        document.insert(ACCESS_TOKEN_KEY.to_string(), Value::String(credential.into_inner()));
        self.write_document(&document)?;
        debug!("Stored credential in {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut document = self.read_document();
        if document.remove(ACCESS_TOKEN_KEY).is_some() {
            self.write_document(&document)?;
            debug!("Cleared credential in {}", self.path.display());
        }
        Ok(())
    }
}
