//! Household user registry persistence with file locking.
//!
//! The registry is a small JSON document saved atomically, so a crash
//! mid-write never leaves a truncated file behind.

use crate::types::User;
use crate::{Error, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use uuid::Uuid;

/// All known users, in creation order
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UserRegistry {
    #[serde(default)]
    pub users: Vec<User>,
}

impl UserRegistry {
    /// Register a new user, selected by default
    pub fn add(&mut self, name: &str) -> Result<&User> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Other("User name cannot be empty".into()));
        }
        if self.find(name).is_some() {
            return Err(Error::DuplicateUser(name.to_string()));
        }

        self.users.push(User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            selected: true,
        });
        tracing::debug!("Added user {}", name);
        Ok(&self.users[self.users.len() - 1])
    }

    /// Remove a user by name, returning it
    pub fn remove(&mut self, name: &str) -> Result<User> {
        let idx = self
            .position(name)
            .ok_or_else(|| Error::UnknownUser(name.to_string()))?;
        Ok(self.users.remove(idx))
    }

    /// Find a user by name (case-insensitive)
    pub fn find(&self, name: &str) -> Option<&User> {
        self.position(name).map(|idx| &self.users[idx])
    }

    fn position(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.users
            .iter()
            .position(|u| u.name.eq_ignore_ascii_case(name))
    }

    /// Select exactly the named users for the next session
    ///
    /// Fails without changing anything if a name is unknown.
    pub fn set_selected<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        let mut wanted = Vec::with_capacity(names.len());
        for name in names {
            let idx = self
                .position(name.as_ref())
                .ok_or_else(|| Error::UnknownUser(name.as_ref().to_string()))?;
            wanted.push(idx);
        }

        for (idx, user) in self.users.iter_mut().enumerate() {
            user.selected = wanted.contains(&idx);
        }
        Ok(())
    }

    /// Users taking part in the next session
    pub fn selected(&self) -> Vec<User> {
        self.users.iter().filter(|u| u.selected).cloned().collect()
    }

    /// Load the registry from a file with shared locking
    ///
    /// Returns an empty registry if the file doesn't exist.
    /// If the file is corrupted, logs a warning and returns an empty registry.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No users file found, starting with no users");
            return Ok(Self::default());
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("Unable to open users file {:?}: {}. Using defaults.", path, e);
                return Ok(Self::default());
            }
        };

        // Acquire shared lock for reading
        if let Err(e) = file.lock_shared() {
            tracing::warn!("Unable to lock users file {:?}: {}. Using defaults.", path, e);
            return Ok(Self::default());
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!("Failed to read users file {:?}: {}. Using defaults.", path, e);
            return Ok(Self::default());
        }

        file.unlock()?;

        match serde_json::from_str::<UserRegistry>(&contents) {
            Ok(registry) => {
                tracing::debug!("Loaded {} users from {:?}", registry.users.len(), path);
                Ok(registry)
            }
            Err(e) => {
                tracing::warn!("Failed to parse users file {:?}: {}. Using defaults.", path, e);
                Ok(Self::default())
            }
        }
    }

    /// Save the registry to a file with exclusive locking
    ///
    /// Writes to a temp file in the same directory, syncs it and renames it
    /// over the original.
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "users path missing parent")
        })?;
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved {} users to {:?}", self.users.len(), path);
        Ok(())
    }

    /// Load the registry, modify it, and save it back
    pub fn update<T, F>(path: &Path, f: F) -> Result<T>
    where
        F: FnOnce(&mut UserRegistry) -> Result<T>,
    {
        let mut registry = Self::load(path)?;
        let out = f(&mut registry)?;
        registry.save(path)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(names: &[&str]) -> UserRegistry {
        let mut registry = UserRegistry::default();
        for name in names {
            registry.add(name).unwrap();
        }
        registry
    }

    #[test]
    fn test_add_and_find() {
        let registry = registry(&["Ana", "Ben"]);
        assert_eq!(registry.users.len(), 2);
        assert!(registry.find("ana").is_some());
        assert!(registry.find("Cy").is_none());
        assert!(registry.users.iter().all(|u| u.selected));
    }

    #[test]
    fn test_add_rejects_duplicates_and_blank_names() {
        let mut registry = registry(&["Ana"]);
        assert!(matches!(registry.add(" ANA "), Err(Error::DuplicateUser(_))));
        assert!(registry.add("   ").is_err());
        assert_eq!(registry.users.len(), 1);
    }

    #[test]
    fn test_set_selected() {
        let mut registry = registry(&["Ana", "Ben", "Cy"]);
        registry.set_selected(&["Ben"]).unwrap();
        let names: Vec<_> = registry.selected().into_iter().map(|u| u.name).collect();
        assert_eq!(names, vec!["Ben"]);
    }

    #[test]
    fn test_set_selected_unknown_changes_nothing() {
        let mut registry = registry(&["Ana", "Ben"]);
        let err = registry.set_selected(&["Ben", "Zed"]).unwrap_err();
        assert!(matches!(err, Error::UnknownUser(name) if name == "Zed"));
        assert_eq!(registry.selected().len(), 2);
    }

    #[test]
    fn test_remove() {
        let mut registry = registry(&["Ana", "Ben"]);
        let removed = registry.remove("ana").unwrap();
        assert_eq!(removed.name, "Ana");
        assert!(matches!(registry.remove("Ana"), Err(Error::UnknownUser(_))));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("users.json");

        let registry = registry(&["Ana", "Ben"]);
        registry.save(&path).unwrap();

        let loaded = UserRegistry::load(&path).unwrap();
        assert_eq!(loaded, registry);
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let loaded = UserRegistry::load(&temp_dir.path().join("nonexistent.json")).unwrap();
        assert!(loaded.users.is_empty());
    }

    #[test]
    fn test_corrupted_file_returns_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("users.json");
        std::fs::write(&path, "{ invalid json }").unwrap();

        let loaded = UserRegistry::load(&path).unwrap();
        assert!(loaded.users.is_empty());
    }

    #[test]
    fn test_update_pattern() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("users.json");

        let id = UserRegistry::update(&path, |registry| Ok(registry.add("Ana")?.id)).unwrap();

        let loaded = UserRegistry::load(&path).unwrap();
        assert_eq!(loaded.users[0].id, id);
    }

    #[test]
    fn test_atomic_save_leaves_no_temp_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("users.json");
        registry(&["Ana"]).save(&path).unwrap();

        let extras: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "users.json")
            .collect();
        assert!(extras.is_empty(), "Found extras: {:?}", extras);
    }
}
