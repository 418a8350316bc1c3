// # Registry Store Implementations
//
// This module provides implementations of the RegistryStore trait for
// different persistence strategies, plus the list operations they share.

pub mod file;
pub mod memory;

pub use file::FileRegistryStore;
pub use memory::MemoryRegistryStore;

use std::sync::Arc;

use crate::config::RegistryConfig;
use crate::model::{PrinterPatch, PrinterRecord, PrinterRef};
use crate::traits::{RecordBuilder, RegistryStore};
use crate::{Error, Result};

/// Build the registry store selected by `config`
pub async fn open_store(config: &RegistryConfig) -> Result<Arc<dyn RegistryStore>> {
    match config {
        RegistryConfig::File { path } => Ok(Arc::new(FileRegistryStore::open(path).await?)),
        RegistryConfig::Memory => Ok(Arc::new(MemoryRegistryStore::new())),
    }
}

fn not_found(printer: &PrinterRef) -> Error {
    Error::not_found(format!("Printer not found: {}", printer))
}

pub(crate) fn resolve(
    printers: &[PrinterRecord],
    printer: &PrinterRef,
) -> Result<(usize, PrinterRecord)> {
    printer
        .position(printers)
        .map(|index| (index, printers[index].clone()))
        .ok_or_else(|| not_found(printer))
}

pub(crate) fn append_to(printers: &mut Vec<PrinterRecord>, record: PrinterRecord) -> Result<usize> {
    if printers.iter().any(|p| p.ip == record.ip) {
        return Err(Error::duplicate(format!("Printer already added: {}", record.ip)));
    }
    printers.push(record);
    Ok(printers.len() - 1)
}

pub(crate) fn append_built(
    printers: &mut Vec<PrinterRecord>,
    build: RecordBuilder,
) -> Result<(usize, PrinterRecord)> {
    let record = build(printers.len());
    let index = append_to(printers, record.clone())?;
    Ok((index, record))
}

pub(crate) fn remove_from(
    printers: &mut Vec<PrinterRecord>,
    printer: &PrinterRef,
) -> Result<PrinterRecord> {
    let index = printer.position(printers).ok_or_else(|| not_found(printer))?;
    Ok(printers.remove(index))
}

pub(crate) fn update_in(
    printers: &mut [PrinterRecord],
    printer: &PrinterRef,
    patch: &PrinterPatch,
) -> Result<PrinterRecord> {
    let index = printer.position(printers).ok_or_else(|| not_found(printer))?;
    printers[index].apply(patch);
    Ok(printers[index].clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ip: &str) -> PrinterRecord {
        PrinterRecord::new(ip.to_string(), format!("Printer {}", ip))
    }

    #[test]
    fn duplicate_endpoint_leaves_list_unchanged() {
        let mut printers = vec![record("http://a")];
        let err = append_to(&mut printers, record("http://a")).unwrap_err();
        assert!(matches!(err, Error::Duplicate(_)));
        assert_eq!(printers.len(), 1);
    }

    #[test]
    fn remove_shifts_later_entries() {
        let mut printers = vec![record("http://a"), record("http://b"), record("http://c")];
        let removed = remove_from(&mut printers, &PrinterRef::Index(1)).unwrap();
        assert_eq!(removed.ip, "http://b");
        assert_eq!(printers[1].ip, "http://c");
    }

    #[test]
    fn out_of_range_is_not_found() {
        let mut printers = vec![record("http://a")];
        assert!(matches!(
            remove_from(&mut printers, &PrinterRef::Index(1)),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            update_in(&mut printers, &PrinterRef::Index(5), &PrinterPatch::rename("x")),
            Err(Error::NotFound(_))
        ));
        assert_eq!(printers.len(), 1);
    }

    #[test]
    fn built_record_sees_current_length() {
        let mut printers = vec![record("http://a")];
        let (index, built) = append_built(
            &mut printers,
            Box::new(|len| PrinterRecord::new("http://b".into(), format!("Printer {}", len + 1))),
        )
        .unwrap();
        assert_eq!(index, 1);
        assert_eq!(built.name, "Printer 2");
        assert_eq!(printers[1], built);
    }

    #[tokio::test]
    async fn open_memory_store() {
        let store = open_store(&RegistryConfig::Memory).await.unwrap();
        assert!(store.list_all().await.unwrap().is_empty());
    }
}
