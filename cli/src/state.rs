use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use potluck_core::{Favorites, FileKeyValueStore, KeyValueStore};

/// Key holding the session token in the local store.
pub const TOKEN_KEY: &str = "sessionToken";

const STORE_FILE: &str = "store.json";

/// Client-side state persisted under the state directory.
pub struct LocalState {
    path: PathBuf,
}

impl LocalState {
    pub fn open(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create state directory {}", dir.display()))?;
        Ok(Self {
            path: dir.join(STORE_FILE),
        })
    }

    fn store(&self) -> FileKeyValueStore {
        FileKeyValueStore::new(&self.path)
    }

    pub fn token(&self) -> Result<Option<String>> {
        Ok(self.store().get(TOKEN_KEY)?)
    }

    pub fn set_token(&self, token: &str) -> Result<()> {
        Ok(self.store().set(TOKEN_KEY, token)?)
    }

    pub fn clear_token(&self) -> Result<()> {
        Ok(self.store().remove(TOKEN_KEY)?)
    }

    pub fn favorites(&self) -> Favorites<FileKeyValueStore> {
        Favorites::new(self.store())
    }
}
