// # Memory Registry Store
//
// In-memory implementation of RegistryStore.
//
// ## Purpose
//
// Provides a simple, fast registry that doesn't persist across restarts.
// Useful for testing and for throwaway deployments.
//
// ## Crash Behavior
//
// - All printers are lost on restart/crash
// - No recovery possible (state is in-memory only)

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{append_built, remove_from, resolve, update_in};
use crate::Error;
use crate::model::{PrinterPatch, PrinterRecord, PrinterRef};
use crate::traits::{RecordBuilder, RegistryStore};

/// In-memory registry store implementation
///
/// The printer list lives in a `Vec` protected by a RwLock.
///
/// # Example
///
/// ```rust,no_run
/// use printfleet_core::store::MemoryRegistryStore;
/// use printfleet_core::traits::RegistryStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = MemoryRegistryStore::new();
///     assert!(store.list_all().await?.is_empty());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryRegistryStore {
    inner: Arc<RwLock<Vec<PrinterRecord>>>,
}

impl MemoryRegistryStore {
    /// Create a new empty memory registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of printers in the registry
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Check if the registry is empty
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[async_trait]
impl RegistryStore for MemoryRegistryStore {
    async fn list_all(&self) -> Result<Vec<PrinterRecord>, Error> {
        Ok(self.inner.read().await.clone())
    }

    async fn get(&self, printer: &PrinterRef) -> Result<(usize, PrinterRecord), Error> {
        let guard = self.inner.read().await;
        resolve(&guard, printer)
    }

    async fn append_with(&self, build: RecordBuilder) -> Result<(usize, PrinterRecord), Error> {
        let mut guard = self.inner.write().await;
        append_built(&mut guard, build)
    }

    async fn remove(&self, printer: &PrinterRef) -> Result<PrinterRecord, Error> {
        let mut guard = self.inner.write().await;
        remove_from(&mut guard, printer)
    }

    async fn update(
        &self,
        printer: &PrinterRef,
        patch: &PrinterPatch,
    ) -> Result<PrinterRecord, Error> {
        let mut guard = self.inner.write().await;
        update_in(&mut guard, printer, patch)
    }

    async fn flush(&self) -> Result<(), Error> {
        // Nothing buffered
        Ok(())
    }
}
