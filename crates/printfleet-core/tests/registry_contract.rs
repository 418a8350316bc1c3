//! Contract Test: Printer Registry
//!
//! This test verifies registry behavior through the fleet service.
//!
//! Constraints verified:
//! - Addresses without a scheme are stored with `http://`
//! - Duplicate addresses are rejected and leave the registry unchanged
//! - Deleting index `i` shifts later entries down by one
//! - Out-of-range references leave the registry unchanged
//! - Ids stay valid across deletions of earlier entries
//! - Concurrent adds never hand out the same positional name
//!
//! If this test fails, printers may be lost, duplicated or mis-addressed.

mod common;

use common::*;
use printfleet_core::traits::RegistryStore;
use printfleet_core::{
    Error, FileRegistryStore, FleetConfig, PrinterFleet, PrinterPatch, PrinterRef, StatusReport,
};
use std::sync::Arc;

fn fleet() -> (PrinterFleet, printfleet_core::MemoryRegistryStore) {
    memory_fleet(Arc::new(ScriptedDeviceClient::new()))
}

async fn endpoints(fleet: &PrinterFleet) -> Vec<String> {
    fleet.list().await.unwrap().into_iter().map(|p| p.ip).collect()
}

#[tokio::test]
async fn scheme_is_added_only_when_missing() {
    let (fleet, _store) = fleet();

    fleet.add_printer("192.168.1.20").await.unwrap();
    fleet.add_printer("https://printer.local").await.unwrap();
    fleet.add_printer("  http://10.0.0.5:7125/  ").await.unwrap();

    assert_eq!(
        endpoints(&fleet).await,
        vec![
            "http://192.168.1.20",
            "https://printer.local",
            "http://10.0.0.5:7125",
        ]
    );
}

#[tokio::test]
async fn new_printers_get_positional_names() {
    let (fleet, _store) = fleet();

    let (first_index, first) = fleet.add_printer("10.0.0.1").await.unwrap();
    let (second_index, second) = fleet.add_printer("10.0.0.2").await.unwrap();

    assert_eq!((first_index, second_index), (0, 1));
    assert_eq!(first.name, "Printer 1");
    assert_eq!(second.name, "Printer 2");
    assert!(first.webcam_available);
    assert!(first.added_at.is_some());
    assert_ne!(first.id, second.id);
}

#[tokio::test]
async fn concurrent_adds_get_distinct_positional_names() {
    let (fleet, store) = fleet();
    let fleet = Arc::new(fleet);

    let handles: Vec<_> = (1..=10)
        .map(|i| {
            let fleet = fleet.clone();
            tokio::spawn(async move { fleet.add_printer(&format!("10.0.0.{}", i)).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let printers = store.list_all().await.unwrap();
    assert_eq!(printers.len(), 10);
    for (index, printer) in printers.iter().enumerate() {
        assert_eq!(printer.name, format!("Printer {}", index + 1));
    }
}

#[tokio::test]
async fn duplicate_after_normalization_is_rejected() {
    let (fleet, _store) = fleet();
    fleet.add_printer("10.0.0.1").await.unwrap();

    let err = fleet.add_printer("http://10.0.0.1").await.unwrap_err();

    assert!(matches!(err, Error::Duplicate(_)), "got {:?}", err);
    assert_eq!(endpoints(&fleet).await, vec!["http://10.0.0.1"]);
}

#[tokio::test]
async fn empty_address_is_invalid() {
    let (fleet, store) = fleet();

    let err = fleet.add_printer("   ").await.unwrap_err();

    assert!(matches!(err, Error::InvalidInput(_)));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn delete_shifts_later_indices() {
    let (fleet, _store) = fleet();
    for address in ["10.0.0.1", "10.0.0.2", "10.0.0.3"] {
        fleet.add_printer(address).await.unwrap();
    }

    let removed = fleet.remove(&PrinterRef::Index(1)).await.unwrap();

    assert_eq!(removed.ip, "http://10.0.0.2");
    assert_eq!(endpoints(&fleet).await, vec!["http://10.0.0.1", "http://10.0.0.3"]);
}

#[tokio::test]
async fn out_of_range_delete_leaves_registry_unchanged() {
    let (fleet, _store) = fleet();
    fleet.add_printer("10.0.0.1").await.unwrap();

    let err = fleet.remove(&PrinterRef::Index(3)).await.unwrap_err();

    assert!(matches!(err, Error::NotFound(_)));
    assert_eq!(endpoints(&fleet).await, vec!["http://10.0.0.1"]);
}

#[tokio::test]
async fn ids_survive_earlier_deletions() {
    let (fleet, _store) = fleet();
    fleet.add_printer("10.0.0.1").await.unwrap();
    let (_, second) = fleet.add_printer("10.0.0.2").await.unwrap();

    fleet.remove(&PrinterRef::Index(0)).await.unwrap();
    let renamed = fleet
        .rename(&PrinterRef::Id(second.id), &PrinterPatch::rename("Voron 2.4"))
        .await
        .unwrap();

    assert_eq!(renamed.ip, "http://10.0.0.2");
    assert_eq!(renamed.name, "Voron 2.4");
    assert_eq!(fleet.list().await.unwrap()[0].name, "Voron 2.4");
}

#[tokio::test]
async fn empty_patch_keeps_name() {
    let (fleet, _store) = fleet();
    fleet.add_printer("10.0.0.1").await.unwrap();

    let record = fleet
        .rename(&PrinterRef::Index(0), &PrinterPatch::default())
        .await
        .unwrap();

    assert_eq!(record.name, "Printer 1");
}

#[tokio::test]
async fn status_of_unknown_printer_is_not_found() {
    let client = Arc::new(ScriptedDeviceClient::new());
    let (fleet, _store) = memory_fleet(client.clone());

    let err = fleet.status(&PrinterRef::Index(0)).await.unwrap_err();

    assert!(matches!(err, Error::NotFound(_)));
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn status_of_registered_printer_queries_its_endpoint() {
    let client = Arc::new(ScriptedDeviceClient::new());
    script_online(&client, "printing", "cube.gcode");
    let (fleet, _store) = memory_fleet(client.clone());
    fleet.add_printer("10.0.0.9").await.unwrap();

    let report = fleet.status(&PrinterRef::Index(0)).await.unwrap();

    assert!(matches!(report, StatusReport::Online(_)));
    assert!(client.calls().iter().all(|c| c.base_url == "http://10.0.0.9"));
}

#[tokio::test]
async fn status_reports_the_registered_webcam_flag() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    tokio::fs::write(
        &path,
        r#"{"printers": [{"ip": "http://10.0.0.7", "name": "Bench", "webcam_available": false}]}"#,
    )
    .await
    .unwrap();
    let client = Arc::new(ScriptedDeviceClient::new());
    script_online(&client, "standby", "cube.gcode");
    let store = Arc::new(FileRegistryStore::open(&path).await.unwrap());
    let fleet = PrinterFleet::new(store, client, &FleetConfig::default());

    match fleet.status(&PrinterRef::Index(0)).await.unwrap() {
        StatusReport::Online(status) => assert!(!status.webcam_available),
        StatusReport::Offline(offline) => panic!("expected online, got {:?}", offline),
    }
}

#[tokio::test]
async fn file_backed_fleet_persists_between_runs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let client = Arc::new(ScriptedDeviceClient::new());

    {
        let store = Arc::new(FileRegistryStore::open(&path).await.unwrap());
        let fleet = PrinterFleet::new(store, client.clone(), &FleetConfig::default());
        fleet.add_printer("10.0.0.1").await.unwrap();
        fleet.add_printer("10.0.0.2").await.unwrap();
        fleet.remove(&PrinterRef::Index(0)).await.unwrap();
    }

    let store = FileRegistryStore::open(&path).await.unwrap();
    let printers = store.list_all().await.unwrap();
    assert_eq!(printers.len(), 1);
    assert_eq!(printers[0].ip, "http://10.0.0.2");
    assert_eq!(printers[0].name, "Printer 2");
}
