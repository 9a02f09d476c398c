//! # Store Persistence
//!
//! A `ResourceActor` keeps its store in memory. Attaching a [`Persistence`] backend makes it
//! durable: the store is loaded once when the actor is built and written after every committed
//! mutation. The write happens inside the actor's sequential loop, so what is on disk always
//! matches a state some caller observed.
//!
//! [`JsonSnapshot`] is the provided backend: the whole store as one JSON document, replaced
//! atomically (temp file + rename) on each save.
//!
//! Entities read back from a snapshot pass through [`ActorEntity::validate`]; a store that
//! breaks an entity's invariants is refused with [`SnapshotError::Invalid`].

use crate::entity::ActorEntity;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Errors raised while loading or saving a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("snapshot encoding error at {path}: {source}")]
    Encoding {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("snapshot holds invalid {entity}: {reason}")]
    Invalid { entity: String, reason: String },
}

/// The stored image of one actor: its id counter and every entity.
#[derive(Debug, Serialize, Deserialize)]
pub struct StoreImage<T> {
    pub next_id: u32,
    pub entities: Vec<T>,
}

/// Storage backend for a `ResourceActor`.
pub trait Persistence<T: ActorEntity>: Send {
    /// Reads the stored image, `None` when nothing has been saved yet.
    fn load(&mut self) -> Result<Option<StoreImage<T>>, SnapshotError>;

    /// Replaces the stored image.
    fn save(&mut self, next_id: u32, store: &HashMap<T::Id, T>) -> Result<(), SnapshotError>;
}

/// JSON file backend.
///
/// # Cost
/// Every save serializes the full store and `fsync`s it on the actor's task, blocking that
/// worker thread for the duration. The time grows with the number of entities, so this suits
/// stores of a few thousand entities; append-only stores like an order ledger will slow every
/// mutation as they grow. Larger stores need a backend that writes incrementally.
#[derive(Debug, Clone)]
pub struct JsonSnapshot {
    path: PathBuf,
}

impl JsonSnapshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[derive(Serialize)]
struct StoreImageRef<'a, T> {
    next_id: u32,
    entities: Vec<&'a T>,
}

impl<T> Persistence<T> for JsonSnapshot
where
    T: ActorEntity + Serialize + DeserializeOwned,
{
    fn load(&mut self) -> Result<Option<StoreImage<T>>, SnapshotError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(SnapshotError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| SnapshotError::Encoding {
                path: self.path.clone(),
                source,
            })
    }

    fn save(&mut self, next_id: u32, store: &HashMap<T::Id, T>) -> Result<(), SnapshotError> {
        let image = StoreImageRef {
            next_id,
            entities: store.values().collect(),
        };
        let bytes = serde_json::to_vec_pretty(&image).map_err(|source| SnapshotError::Encoding {
            path: self.path.clone(),
            source,
        })?;
        write_atomically(&self.path, &bytes)
    }
}

/// Writes `bytes` to a sibling temp file, syncs it, then renames it over `path`.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), SnapshotError> {
    let io_err = |source: std::io::Error| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let tmp = path.with_extension("tmp");
    let mut file = fs::File::create(&tmp).map_err(io_err)?;
    file.write_all(bytes).map_err(io_err)?;
    file.sync_all().map_err(io_err)?;
    fs::rename(&tmp, path).map_err(io_err)
}
