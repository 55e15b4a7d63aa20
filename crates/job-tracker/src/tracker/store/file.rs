use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::{CollectionStore, StoreError};

/// One `<key>.json` file per key under a data directory.
///
/// Writes go to a temporary sibling that is synced and then renamed over the
/// target, so readers only ever see a complete value.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl CollectionStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => {
                tracing::debug!(path = %path.display(), bytes = contents.len(), "read collection");
                Ok(Some(contents))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StoreError::Io(err)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root)?;
        let path = self.path_for(key);
        let temp_path = path.with_extension("json.tmp");

        let mut file = fs::File::create(&temp_path)?;
        file.write_all(value.as_bytes())?;
        file.sync_all()?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!(path = %path.display(), bytes = value.len(), "wrote collection");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StoreError::Io(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn creates_directory_and_round_trips() {
        let temp = TempDir::new().expect("temp dir");
        let store = FileStore::new(temp.path().join("nested").join("data"));

        assert!(store.get("collection").expect("missing is fine").is_none());
        store.set("collection", "[1,2,3]").expect("write succeeds");
        assert_eq!(
            store.get("collection").expect("read succeeds").as_deref(),
            Some("[1,2,3]")
        );
        assert!(!store.path_for("collection").with_extension("json.tmp").exists());

        store.remove("collection").expect("remove succeeds");
        store.remove("collection").expect("second remove is a no-op");
        assert!(store.get("collection").expect("read succeeds").is_none());
    }
}
