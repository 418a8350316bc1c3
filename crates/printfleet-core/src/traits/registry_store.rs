// # Registry Store Trait
//
// Defines the interface for the durable list of registered printers.
//
// ## Purpose
//
// The registry is an ordered sequence of `PrinterRecord`s. The dashboard
// addresses printers by position, so order is part of the contract:
// deleting entry `i` shifts every later entry down by one.
//
// Every mutation is a whole-collection read-modify-write. Implementations
// serialize writers so a failed or concurrent write never leaves a
// partially updated registry behind.
//
// ## Implementations
//
// - File-based: single JSON document, atomic replace
// - Memory: tests and ephemeral deployments
//
// ## Usage
//
// ```rust,ignore
// use printfleet_core::{PrinterPatch, RegistryStore};
//
// let printers = store.list_all().await?;
// store.update_at(0, &PrinterPatch::rename("Voron")).await?;
// store.delete_at(1).await?;
// ```

use async_trait::async_trait;

use crate::model::{PrinterPatch, PrinterRecord, PrinterRef};

/// Builds a new record from the registry length at insertion time
pub type RecordBuilder = Box<dyn FnOnce(usize) -> PrinterRecord + Send>;

/// Trait for registry store implementations
///
/// # Thread Safety
///
/// All methods must be safe to call concurrently from multiple tasks.
/// Writers must be serialized (single lock or equivalent).
///
/// # Failure Semantics
///
/// A method that returns `Err` must leave the registry exactly as it was.
#[async_trait]
pub trait RegistryStore: Send + Sync {
    /// Get every registered printer, in registry order
    async fn list_all(&self) -> Result<Vec<PrinterRecord>, crate::Error>;

    /// Resolve a reference to its current position and record
    ///
    /// # Returns
    ///
    /// - `Ok((index, record))`: the reference resolves
    /// - `Err(Error::NotFound)`: index out of range or unknown id
    async fn get(&self, printer: &PrinterRef) -> Result<(usize, PrinterRecord), crate::Error>;

    /// Append a record at the end of the registry
    ///
    /// # Returns
    ///
    /// - `Ok(index)`: position of the new record
    /// - `Err(Error::Duplicate)`: a record with the same endpoint exists
    /// - `Err(Error::Persistence)`: the registry could not be written
    async fn append(&self, record: PrinterRecord) -> Result<usize, crate::Error> {
        let (index, _) = self.append_with(Box::new(move |_| record)).await?;
        Ok(index)
    }

    /// Build a record from the current registry length and append it
    ///
    /// `build` runs under the store's write lock, so the length it sees is
    /// the position the record will take.
    ///
    /// # Returns
    ///
    /// - `Ok((index, record))`: position and the stored record
    /// - `Err(Error::Duplicate)`: a record with the same endpoint exists
    /// - `Err(Error::Persistence)`: the registry could not be written
    async fn append_with(
        &self,
        build: RecordBuilder,
    ) -> Result<(usize, PrinterRecord), crate::Error>;

    /// Remove the referenced record
    ///
    /// # Returns
    ///
    /// - `Ok(record)`: the removed record
    /// - `Err(Error::NotFound)`: nothing to remove
    /// - `Err(Error::Persistence)`: the registry could not be written
    async fn remove(&self, printer: &PrinterRef) -> Result<PrinterRecord, crate::Error>;

    /// Apply a patch to the referenced record
    ///
    /// # Returns
    ///
    /// - `Ok(record)`: the record after the patch
    /// - `Err(Error::NotFound)`: nothing to update
    /// - `Err(Error::Persistence)`: the registry could not be written
    async fn update(
        &self,
        printer: &PrinterRef,
        patch: &PrinterPatch,
    ) -> Result<PrinterRecord, crate::Error>;

    /// Persist any pending changes
    async fn flush(&self) -> Result<(), crate::Error>;

    /// Remove the record at `index`
    async fn delete_at(&self, index: usize) -> Result<PrinterRecord, crate::Error> {
        self.remove(&PrinterRef::Index(index)).await
    }

    /// Patch the record at `index`
    async fn update_at(
        &self,
        index: usize,
        patch: &PrinterPatch,
    ) -> Result<PrinterRecord, crate::Error> {
        self.update(&PrinterRef::Index(index), patch).await
    }
}
