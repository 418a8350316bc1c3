// # File Registry Store
//
// File-based implementation of RegistryStore with crash recovery.
//
// ## Purpose
//
// Keeps the printer list across daemon restarts in a single JSON document.
//
// ## Crash Recovery
//
// - Atomic writes: Uses write-then-rename for atomicity
// - Corruption detection: Validates JSON on load
// - Automatic backup: Keeps .backup of last known good registry
// - Recovery: Falls back to backup if corruption detected
//
// ## File Format
//
// ```json
// {
//   "printers": [
//     {
//       "id": "6f1c0f3e-5a7e-4c43-9d55-0b8f0c7b1f2a",
//       "ip": "http://192.168.1.50",
//       "name": "Printer 1",
//       "webcam_available": true,
//       "added_at": "2026-01-09T12:00:00Z"
//     }
//   ]
// }
// ```
//
// Files written by older dashboards lack `id` and `added_at`; ids are
// assigned on load and written back.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{append_built, remove_from, resolve, update_in};
use crate::Error;
use crate::model::{PrinterPatch, PrinterRecord, PrinterRef};
use crate::traits::{RecordBuilder, RegistryStore};

/// File-based registry store with crash recovery
///
/// Every mutation runs on a copy of the list, writes the copy to disk and
/// only then replaces the in-memory list. Writers hold the write lock for
/// the whole cycle, so saves never interleave.
///
/// # Example
///
/// ```rust,no_run
/// use printfleet_core::store::FileRegistryStore;
/// use printfleet_core::traits::RegistryStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = FileRegistryStore::open("/var/lib/printfleet/config.json").await?;
///     for printer in store.list_all().await? {
///         println!("{} -> {}", printer.name, printer.ip);
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct FileRegistryStore {
    path: PathBuf,
    printers: RwLock<Vec<PrinterRecord>>,
}

/// Serializable registry file format
#[derive(Debug, Clone, serde::Serialize)]
struct RegistryFile<'a> {
    printers: &'a [PrinterRecord],
}

/// Registry file as read from disk (ids may be missing)
#[derive(Debug, Clone, Default, serde::Deserialize)]
struct StoredRegistry {
    #[serde(default)]
    printers: Vec<StoredPrinter>,
}

#[derive(Debug, Clone, serde::Deserialize)]
struct StoredPrinter {
    #[serde(default)]
    id: Option<Uuid>,
    ip: String,
    name: String,
    #[serde(default = "default_webcam_available")]
    webcam_available: bool,
    #[serde(default)]
    added_at: Option<chrono::DateTime<chrono::Utc>>,
}

fn default_webcam_available() -> bool {
    true
}

impl StoredRegistry {
    /// Convert to records, assigning ids where missing
    ///
    /// Returns the records and whether any id had to be assigned.
    fn into_records(self) -> (Vec<PrinterRecord>, bool) {
        let mut assigned = false;
        let records = self
            .printers
            .into_iter()
            .map(|p| {
                let id = p.id.unwrap_or_else(|| {
                    assigned = true;
                    Uuid::new_v4()
                });
                PrinterRecord {
                    id,
                    ip: p.ip,
                    name: p.name,
                    webcam_available: p.webcam_available,
                    added_at: p.added_at,
                }
            })
            .collect();
        (records, assigned)
    }
}

impl FileRegistryStore {
    /// Open or create a file registry
    ///
    /// This will:
    /// 1. Create parent directories if needed
    /// 2. Try to load the existing registry file
    /// 3. If corruption detected, try to load from backup
    /// 4. If both fail, start with an empty registry
    /// 5. Write the file if it was missing or needed ids assigned
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).await.map_err(|e| {
                Error::config(format!(
                    "Failed to create registry directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let existed = path.exists();
        let (printers, ids_assigned) = Self::load_with_recovery(&path).await?.into_records();

        if !existed || ids_assigned {
            Self::write_file(&path, &printers).await?;
            if ids_assigned {
                tracing::info!("Assigned stable ids to legacy registry entries");
            }
        }

        tracing::debug!(
            "Opened registry {}: {} printer(s)",
            path.display(),
            printers.len()
        );

        Ok(Self {
            path,
            printers: RwLock::new(printers),
        })
    }

    /// Path of the registry file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load registry from file with automatic recovery
    ///
    /// Recovery strategy:
    /// 1. Try to load main registry file
    /// 2. If JSON parse error, try loading backup
    /// 3. If backup also fails, start with an empty registry
    async fn load_with_recovery(path: &Path) -> Result<StoredRegistry, Error> {
        match Self::load(path).await {
            Ok(registry) => Ok(registry),
            Err(Error::Json(e)) => {
                tracing::warn!(
                    "Registry file appears corrupted: {}. Attempting recovery from backup.",
                    e
                );

                let backup_path = Self::backup_path(path);
                if !backup_path.exists() {
                    tracing::warn!("No backup file found. Starting with empty registry.");
                    return Ok(StoredRegistry::default());
                }

                match Self::load(&backup_path).await {
                    Ok(registry) => {
                        tracing::info!(
                            "Recovered registry from backup: {} printer(s)",
                            registry.printers.len()
                        );
                        if let Err(restore_err) = fs::copy(&backup_path, path).await {
                            tracing::error!(
                                "Failed to restore registry file from backup: {}",
                                restore_err
                            );
                        }
                        Ok(registry)
                    }
                    Err(backup_err) => {
                        tracing::error!(
                            "Backup also corrupted: {}. Starting with empty registry.",
                            backup_err
                        );
                        Ok(StoredRegistry::default())
                    }
                }
            }
            Err(e) => Err(e),
        }
    }

    /// Load registry from file; a missing file is an empty registry
    async fn load(path: &Path) -> Result<StoredRegistry, Error> {
        if !path.exists() {
            tracing::debug!("Registry file does not exist: {}", path.display());
            return Ok(StoredRegistry::default());
        }

        let content = fs::read_to_string(path).await.map_err(|e| {
            Error::persistence(format!(
                "Failed to read registry file {}: {}",
                path.display(),
                e
            ))
        })?;

        Ok(serde_json::from_str(&content)?)
    }

    /// Write the registry atomically (temp file, backup, rename)
    async fn write_file(path: &Path, printers: &[PrinterRecord]) -> Result<(), Error> {
        let json = serde_json::to_string_pretty(&RegistryFile { printers })
            .map_err(|e| Error::persistence(format!("Failed to serialize registry: {}", e)))?;

        let temp_path = Self::temp_path(path);
        {
            let mut file = fs::File::create(&temp_path).await.map_err(|e| {
                Error::persistence(format!(
                    "Failed to create temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.write_all(json.as_bytes()).await.map_err(|e| {
                Error::persistence(format!(
                    "Failed to write to temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.sync_all().await.map_err(|e| {
                Error::persistence(format!(
                    "Failed to flush temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
        }

        if path.exists() {
            let backup_path = Self::backup_path(path);
            if let Err(e) = fs::copy(path, &backup_path).await {
                tracing::warn!("Failed to create backup: {}", e);
            }
        }

        fs::rename(&temp_path, path).await.map_err(|e| {
            Error::persistence(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            ))
        })?;

        tracing::trace!("Registry written to file: {}", path.display());
        Ok(())
    }

    /// Run `mutate` on a copy of the list, persist it, then publish it
    async fn modify<T>(
        &self,
        mutate: impl FnOnce(&mut Vec<PrinterRecord>) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let mut guard = self.printers.write().await;
        let mut next = guard.clone();
        let out = mutate(&mut next)?;

        if let Err(e) = Self::write_file(&self.path, &next).await {
            tracing::error!("Failed to save registry: {}", e);
            return Err(e);
        }

        *guard = next;
        Ok(out)
    }

    fn temp_path(path: &Path) -> PathBuf {
        let mut temp = path.to_path_buf();
        temp.set_extension("tmp");
        temp
    }

    fn backup_path(path: &Path) -> PathBuf {
        let mut backup = path.to_path_buf();
        backup.set_extension("backup");
        backup
    }
}

#[async_trait]
impl RegistryStore for FileRegistryStore {
    async fn list_all(&self) -> Result<Vec<PrinterRecord>, Error> {
        Ok(self.printers.read().await.clone())
    }

    async fn get(&self, printer: &PrinterRef) -> Result<(usize, PrinterRecord), Error> {
        let guard = self.printers.read().await;
        resolve(&guard, printer)
    }

    async fn append_with(&self, build: RecordBuilder) -> Result<(usize, PrinterRecord), Error> {
        self.modify(|printers| append_built(printers, build)).await
    }

    async fn remove(&self, printer: &PrinterRef) -> Result<PrinterRecord, Error> {
        self.modify(|printers| remove_from(printers, printer)).await
    }

    async fn update(
        &self,
        printer: &PrinterRef,
        patch: &PrinterPatch,
    ) -> Result<PrinterRecord, Error> {
        self.modify(|printers| update_in(printers, printer, patch))
            .await
    }

    async fn flush(&self) -> Result<(), Error> {
        // Every mutation is written before it returns
        Ok(())
    }
}
