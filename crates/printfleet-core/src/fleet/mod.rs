//! Printer fleet service
//!
//! [`PrinterFleet`] is what the HTTP facade talks to. It resolves printer
//! references through the [`RegistryStore`] and hands the resulting base
//! URL to the [`StatusAggregator`] or the [`CommandDispatcher`].
//!
//! ```text
//! facade ──▶ PrinterFleet ──▶ RegistryStore (ref → base URL)
//!                  │
//!                  ├──▶ StatusAggregator ──▶ DeviceClient
//!                  └──▶ CommandDispatcher ─▶ DeviceClient
//! ```
//!
//! The fleet holds no state of its own between calls.

use std::sync::Arc;
use tracing::info;

use crate::config::FleetConfig;
use crate::dispatch::{CommandDispatcher, CommandOutcome};
use crate::error::Result;
use crate::model::{PrinterPatch, PrinterRecord, PrinterRef, normalize_endpoint};
use crate::status::{StatusAggregator, StatusReport};
use crate::traits::{DeviceClient, RegistryStore};

/// Registry plus status and command access for every registered printer
pub struct PrinterFleet {
    store: Arc<dyn RegistryStore>,
    aggregator: StatusAggregator,
    dispatcher: CommandDispatcher,
}

impl PrinterFleet {
    /// Create a fleet over an opened registry and a device client
    pub fn new(
        store: Arc<dyn RegistryStore>,
        client: Arc<dyn DeviceClient>,
        config: &FleetConfig,
    ) -> Self {
        info!(
            "Printer fleet using {} device client ({} status texts)",
            client.client_name(),
            config.locale.as_str()
        );

        Self {
            store,
            aggregator: StatusAggregator::new(client.clone(), &config.device, config.locale),
            dispatcher: CommandDispatcher::new(client, &config.device),
        }
    }

    /// Every registered printer, in registry order
    pub async fn list(&self) -> Result<Vec<PrinterRecord>> {
        self.store.list_all().await
    }

    /// Register a printer by address
    ///
    /// The address is normalized to a base URL and the printer is named
    /// `Printer N`, N being its 1-based position at creation time.
    ///
    /// # Returns
    ///
    /// - `Ok((index, record))`: the stored record and its position
    /// - `Err(Error::InvalidInput)`: empty or unusable address
    /// - `Err(Error::Duplicate)`: the normalized address is already registered
    pub async fn add_printer(&self, address: &str) -> Result<(usize, PrinterRecord)> {
        let endpoint = normalize_endpoint(address)?;
        let (index, record) = self
            .store
            .append_with(Box::new(move |len| {
                PrinterRecord::new(endpoint, format!("Printer {}", len + 1))
            }))
            .await?;
        info!("Added printer {} at {} ({})", record.name, record.ip, record.id);
        Ok((index, record))
    }

    /// Unregister a printer
    pub async fn remove(&self, printer: &PrinterRef) -> Result<PrinterRecord> {
        let removed = self.store.remove(printer).await?;
        info!("Removed printer {} at {}", removed.name, removed.ip);
        Ok(removed)
    }

    /// Apply a patch (currently just the display name) to a printer
    pub async fn rename(&self, printer: &PrinterRef, patch: &PrinterPatch) -> Result<PrinterRecord> {
        let updated = self.store.update(printer, patch).await?;
        info!("Updated printer {} ({})", updated.name, updated.id);
        Ok(updated)
    }

    /// Live status of a printer
    ///
    /// Only an unknown reference is an error. Device problems are part of
    /// the returned [`StatusReport`].
    pub async fn status(&self, printer: &PrinterRef) -> Result<StatusReport> {
        let (_, record) = self.store.get(printer).await?;
        Ok(self
            .aggregator
            .status(&record.ip, record.webcam_available)
            .await)
    }

    pub async fn emergency_stop(&self, printer: &PrinterRef) -> Result<CommandOutcome> {
        let base_url = self.base_url(printer).await?;
        self.dispatcher.emergency_stop(&base_url).await
    }

    pub async fn pause_or_resume(&self, printer: &PrinterRef) -> Result<CommandOutcome> {
        let base_url = self.base_url(printer).await?;
        self.dispatcher.pause_or_resume(&base_url).await
    }

    pub async fn cancel_print(&self, printer: &PrinterRef) -> Result<CommandOutcome> {
        let base_url = self.base_url(printer).await?;
        self.dispatcher.cancel_print(&base_url).await
    }

    pub async fn toggle_light(&self, printer: &PrinterRef) -> Result<CommandOutcome> {
        let base_url = self.base_url(printer).await?;
        self.dispatcher.toggle_light(&base_url).await
    }

    async fn base_url(&self, printer: &PrinterRef) -> Result<String> {
        let (_, record) = self.store.get(printer).await?;
        Ok(record.ip)
    }
}
