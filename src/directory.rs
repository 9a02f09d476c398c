//! Admin allowlist and shop settings.
//!
//! Both are small and read on every admin action, so they live in concurrent maps rather than
//! behind an actor. When a path is given, every change is written back as one JSON file.

use crate::model::UserId;
use actor_framework::snapshot::write_atomically;
use actor_framework::SnapshotError;
use dashmap::{DashMap, DashSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;
use tracing::{info, instrument};

/// Settings key holding the UPI id buyers pay to.
pub const PAYMENT_HANDLE_KEY: &str = "payment_upi";

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("User {0} is not an admin")]
    Unauthorized(UserId),
    #[error("Directory validation error: {0}")]
    Validation(String),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct DirectoryImage {
    admins: Vec<UserId>,
    settings: BTreeMap<String, String>,
}

#[derive(Debug)]
pub struct Directory {
    owner: UserId,
    admins: DashSet<UserId>,
    settings: DashMap<String, String>,
    path: Option<PathBuf>,
    write_lock: Mutex<()>,
}

impl Directory {
    /// In-memory directory with only the owner as admin.
    pub fn new(owner: UserId) -> Self {
        let admins = DashSet::new();
        admins.insert(owner);
        Self {
            owner,
            admins,
            settings: DashMap::new(),
            path: None,
            write_lock: Mutex::new(()),
        }
    }

    /// Loads the directory from `path` (if it exists) and makes sure the owner is an admin.
    pub fn open(owner: UserId, path: impl AsRef<Path>) -> Result<Self, DirectoryError> {
        let path = path.as_ref().to_path_buf();
        let image = match std::fs::read(&path) {
            Ok(bytes) => serde_json::from_slice::<DirectoryImage>(&bytes).map_err(|source| {
                SnapshotError::Encoding {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => DirectoryImage::default(),
            Err(source) => {
                return Err(SnapshotError::Io {
                    path: path.clone(),
                    source,
                }
                .into())
            }
        };

        let directory = Self {
            path: Some(path),
            ..Self::new(owner)
        };
        for admin in image.admins {
            directory.admins.insert(admin);
        }
        for (key, value) in image.settings {
            directory.settings.insert(key, value);
        }
        directory.write_image(&directory.image())?;
        info!(admins = directory.admins.len(), "Directory loaded");
        Ok(directory)
    }

    pub fn owner(&self) -> UserId {
        self.owner
    }

    pub fn is_admin(&self, user: UserId) -> bool {
        self.admins.contains(&user)
    }

    /// Admin ids in ascending order.
    pub fn admins(&self) -> Vec<UserId> {
        let mut admins: Vec<UserId> = self.admins.iter().map(|id| *id).collect();
        admins.sort();
        admins
    }

    /// Returns `false` if `user` already was an admin.
    #[instrument(skip(self))]
    pub fn grant_admin(&self, by: UserId, user: UserId) -> Result<bool, DirectoryError> {
        self.authorize(by)?;
        let _write = self.lock_writes();
        if self.is_admin(user) {
            return Ok(false);
        }
        let mut image = self.image();
        image.admins.push(user);
        image.admins.sort();
        self.write_image(&image)?;
        self.admins.insert(user);
        info!("Admin granted");
        Ok(true)
    }

    #[instrument(skip(self))]
    pub fn revoke_admin(&self, by: UserId, user: UserId) -> Result<bool, DirectoryError> {
        self.authorize(by)?;
        if user == self.owner {
            return Err(DirectoryError::Validation(
                "the owner cannot be removed".into(),
            ));
        }
        let _write = self.lock_writes();
        if !self.is_admin(user) {
            return Ok(false);
        }
        let mut image = self.image();
        image.admins.retain(|admin| *admin != user);
        self.write_image(&image)?;
        self.admins.remove(&user);
        info!("Admin revoked");
        Ok(true)
    }

    pub fn setting(&self, key: &str) -> Option<String> {
        self.settings.get(key).map(|value| value.clone())
    }

    #[instrument(skip(self, value))]
    pub fn set_setting(&self, by: UserId, key: &str, value: &str) -> Result<(), DirectoryError> {
        self.authorize(by)?;
        let key = key.trim();
        if key.is_empty() {
            return Err(DirectoryError::Validation("setting key must not be blank".into()));
        }
        let value = value.trim().to_string();
        let _write = self.lock_writes();
        let mut image = self.image();
        image.settings.insert(key.to_string(), value.clone());
        self.write_image(&image)?;
        self.settings.insert(key.to_string(), value);
        info!("Setting stored");
        Ok(())
    }

    pub fn payment_handle(&self) -> Option<String> {
        self.setting(PAYMENT_HANDLE_KEY).filter(|h| !h.is_empty())
    }

    pub fn set_payment_handle(&self, by: UserId, handle: &str) -> Result<(), DirectoryError> {
        if handle.trim().is_empty() {
            return Err(DirectoryError::Validation(
                "payment handle must not be blank".into(),
            ));
        }
        self.set_setting(by, PAYMENT_HANDLE_KEY, handle)
    }

    fn authorize(&self, user: UserId) -> Result<(), DirectoryError> {
        if self.is_admin(user) {
            Ok(())
        } else {
            Err(DirectoryError::Unauthorized(user))
        }
    }

    /// Serializes changes; the live maps only change after the file write succeeded.
    fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn image(&self) -> DirectoryImage {
        DirectoryImage {
            admins: self.admins(),
            settings: self
                .settings
                .iter()
                .map(|entry| (entry.key().clone(), entry.value().clone()))
                .collect(),
        }
    }

    fn write_image(&self, image: &DirectoryImage) -> Result<(), DirectoryError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let bytes = serde_json::to_vec_pretty(image).map_err(|source| SnapshotError::Encoding {
            path: path.clone(),
            source,
        })?;
        write_atomically(path, &bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: UserId = UserId(1);

    #[test]
    fn owner_is_seeded_and_protected() {
        let directory = Directory::new(OWNER);
        assert!(directory.is_admin(OWNER));
        assert!(matches!(
            directory.revoke_admin(OWNER, OWNER),
            Err(DirectoryError::Validation(_))
        ));
    }

    #[test]
    fn only_admins_manage_the_directory() {
        let directory = Directory::new(OWNER);
        assert!(matches!(
            directory.grant_admin(UserId(2), UserId(3)),
            Err(DirectoryError::Unauthorized(UserId(2)))
        ));
        assert!(directory.grant_admin(OWNER, UserId(2)).unwrap());
        assert!(!directory.grant_admin(UserId(2), UserId(2)).unwrap());
        assert_eq!(directory.admins(), vec![OWNER, UserId(2)]);

        assert!(directory.revoke_admin(OWNER, UserId(2)).unwrap());
        assert!(!directory.is_admin(UserId(2)));
    }

    #[test]
    fn payment_handle_round_trip() {
        let directory = Directory::new(OWNER);
        assert_eq!(directory.payment_handle(), None);
        assert!(directory.set_payment_handle(OWNER, "  ").is_err());
        directory.set_payment_handle(OWNER, " shop@upi ").unwrap();
        assert_eq!(directory.payment_handle().as_deref(), Some("shop@upi"));
        assert_eq!(directory.setting("payment_upi").as_deref(), Some("shop@upi"));
    }

    #[test]
    fn persisted_directory_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("directory.json");
        {
            let directory = Directory::open(OWNER, &path).unwrap();
            directory.grant_admin(OWNER, UserId(9)).unwrap();
            directory.set_payment_handle(OWNER, "shop@upi").unwrap();
        }

        let reopened = Directory::open(OWNER, &path).unwrap();
        assert_eq!(reopened.admins(), vec![OWNER, UserId(9)]);
        assert_eq!(reopened.payment_handle().as_deref(), Some("shop@upi"));
    }

    #[test]
    fn failed_write_leaves_directory_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("directory.json");
        let directory = Directory::open(OWNER, &path).unwrap();
        directory.grant_admin(OWNER, UserId(2)).unwrap();

        // The atomic write goes through `directory.tmp`; a directory there makes it fail
        let blocker = path.with_extension("tmp");
        std::fs::create_dir(&blocker).unwrap();

        assert!(directory.grant_admin(OWNER, UserId(9)).is_err());
        assert!(!directory.is_admin(UserId(9)));
        assert!(directory.revoke_admin(OWNER, UserId(2)).is_err());
        assert!(directory.is_admin(UserId(2)));
        assert!(directory.set_payment_handle(OWNER, "shop@upi").is_err());
        assert_eq!(directory.payment_handle(), None);

        std::fs::remove_dir(&blocker).unwrap();
        assert!(directory.grant_admin(OWNER, UserId(9)).unwrap());
        let reopened = Directory::open(OWNER, &path).unwrap();
        assert_eq!(reopened.admins(), vec![OWNER, UserId(2), UserId(9)]);
        assert_eq!(reopened.payment_handle(), None);
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("directory.json");
        std::fs::write(&path, b"{ nope").unwrap();
        assert!(matches!(
            Directory::open(OWNER, &path),
            Err(DirectoryError::Snapshot(SnapshotError::Encoding { .. }))
        ));
    }
}
