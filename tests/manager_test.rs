// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for control dispatch and state aggregation.

mod common;

use std::sync::atomic::Ordering;
use std::time::Duration;

use homelink_lib::device::NewDevice;
use homelink_lib::error::Error;
use homelink_lib::manager::InfoOptions;
use homelink_lib::store::DeviceStore;
use homelink_lib::types::{DeviceKind, Manufacturer, MeshNodeId, Power, PowerReading};

use common::{Harness, entry};

fn payload(name: &str, kind: DeviceKind, manufacturer: Manufacturer) -> NewDevice {
    NewDevice {
        name: name.to_string(),
        kind,
        manufacturer,
        ..NewDevice::default()
    }
}

// ============================================================================
// Control dispatch
// ============================================================================

mod dispatch {
    use super::*;

    #[tokio::test]
    async fn mesh_binding_routes_to_mesh_regardless_of_kind() {
        let h = Harness::new();
        let mut new = payload("Plug", DeviceKind::Lightbulb, Manufacturer::Yeelight);
        new.mesh_node_id = Some(MeshNodeId(7));
        let device = h.store.insert(new).await.unwrap();

        h.manager.turn_on(device.id).await.unwrap();
        h.manager.turn_off(device.id).await.unwrap();

        assert_eq!(
            *h.mesh.set_calls.lock(),
            vec![(MeshNodeId(7), true), (MeshNodeId(7), false)]
        );
        assert!(h.lighting.set_calls.lock().is_empty());
        assert!(h.wake.calls.lock().is_empty());
    }

    #[tokio::test]
    async fn yeelight_lightbulb_dispatches_to_resolved_address() {
        let h = Harness::new();
        let mut new = payload("Lamp", DeviceKind::Lightbulb, Manufacturer::Yeelight);
        new.mac = Some("AA:BB:CC:DD:EE:FF".parse().unwrap());
        new.address = Some("10.0.0.9".to_string());
        let device = h.store.insert(new).await.unwrap();

        // The router has since re-leased the bulb at a new address; the
        // MAC match must win over the stale stored address.
        *h.presence.entries.lock() = vec![entry("192.168.1.50", "aa:bb:cc:dd:ee:ff", true)];

        h.manager.turn_on(device.id).await.unwrap();

        assert_eq!(
            *h.lighting.set_calls.lock(),
            vec![("192.168.1.50".to_string(), true)]
        );
    }

    #[tokio::test]
    async fn yeelight_lightbulb_without_address_is_unsupported() {
        let h = Harness::new();
        let device = h
            .store
            .insert(payload("Lamp", DeviceKind::Lightbulb, Manufacturer::Yeelight))
            .await
            .unwrap();

        assert!(matches!(
            h.manager.turn_off(device.id).await,
            Err(Error::Unsupported)
        ));
        assert!(matches!(
            h.manager.turn_on(device.id).await,
            Err(Error::Unsupported)
        ));
    }

    #[tokio::test]
    async fn non_yeelight_lightbulb_is_unsupported() {
        let h = Harness::new();
        let mut new = payload("Ikea Bulb", DeviceKind::Lightbulb, Manufacturer::Other);
        new.address = Some("192.168.1.60".to_string());
        new.mac = Some("11:22:33:44:55:66".parse().unwrap());
        let device = h.store.insert(new).await.unwrap();

        assert!(matches!(
            h.manager.turn_on(device.id).await,
            Err(Error::Unsupported)
        ));
        assert!(matches!(
            h.manager.turn_off(device.id).await,
            Err(Error::Unsupported)
        ));
        assert!(h.wake.calls.lock().is_empty());
    }

    #[tokio::test]
    async fn generic_device_wakes_when_both_identifiers_resolve() {
        let h = Harness::new();
        let mut new = payload("TV", DeviceKind::Tv, Manufacturer::Other);
        new.mac = Some("AA:BB:CC:DD:EE:FF".parse().unwrap());
        new.address = Some("192.168.1.40".to_string());
        let device = h.store.insert(new).await.unwrap();

        h.manager.turn_on(device.id).await.unwrap();

        let calls = h.wake.calls.lock();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0.to_string(), "AA:BB:CC:DD:EE:FF");
        assert_eq!(calls[0].1, "192.168.1.40");
    }

    #[tokio::test]
    async fn generic_device_without_mac_is_unsupported() {
        let h = Harness::new();
        let mut new = payload("TV", DeviceKind::Tv, Manufacturer::Other);
        new.address = Some("192.168.1.40".to_string());
        let device = h.store.insert(new).await.unwrap();

        assert!(matches!(
            h.manager.turn_on(device.id).await,
            Err(Error::Unsupported)
        ));
        assert!(h.wake.calls.lock().is_empty());
    }

    #[tokio::test]
    async fn generic_device_never_turns_off() {
        let h = Harness::new();
        let mut new = payload("TV", DeviceKind::Tv, Manufacturer::Other);
        new.mac = Some("AA:BB:CC:DD:EE:FF".parse().unwrap());
        new.address = Some("192.168.1.40".to_string());
        let device = h.store.insert(new).await.unwrap();

        assert!(matches!(
            h.manager.turn_off(device.id).await,
            Err(Error::Unsupported)
        ));
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let h = Harness::new();
        assert!(matches!(
            h.manager.turn_on(homelink_lib::types::DeviceId(99)).await,
            Err(Error::DeviceNotFound)
        ));
    }
}

// ============================================================================
// State aggregation
// ============================================================================

mod state {
    use super::*;

    #[tokio::test]
    async fn mesh_bound_device_reports_mesh_power() {
        let h = Harness::new();
        let mut new = payload("Plug", DeviceKind::Socket, Manufacturer::Other);
        new.mesh_node_id = Some(MeshNodeId(7));
        let device = h.store.insert(new).await.unwrap();

        *h.mesh.node_power.lock() = Some(true);
        let info = h
            .manager
            .device_info(device.id, InfoOptions::default())
            .await
            .unwrap();

        assert_eq!(info.state.power, Power::On);
    }

    #[tokio::test]
    async fn mesh_query_failure_degrades_to_unknown() {
        let h = Harness::new();
        let mut new = payload("Plug", DeviceKind::Socket, Manufacturer::Other);
        new.mesh_node_id = Some(MeshNodeId(7));
        let device = h.store.insert(new).await.unwrap();

        h.mesh.fail_power_state.store(true, Ordering::SeqCst);
        let info = h
            .manager
            .device_info(device.id, InfoOptions::default())
            .await
            .unwrap();

        assert_eq!(info.state.power, Power::Unknown);
    }

    #[tokio::test]
    async fn presence_failure_degrades_to_offline() {
        let h = Harness::new();
        let mut new = payload("TV", DeviceKind::Tv, Manufacturer::Other);
        new.address = Some("192.168.1.40".to_string());
        let device = h.store.insert(new).await.unwrap();

        h.presence.unreachable.store(true, Ordering::SeqCst);
        let info = h
            .manager
            .device_info(device.id, InfoOptions::default())
            .await
            .unwrap();

        assert!(!info.state.online);
        assert_eq!(info.state.power, Power::Unknown);
    }

    #[tokio::test(start_paused = true)]
    async fn lighting_timeout_degrades_to_unknown() {
        let h = Harness::new();
        let mut new = payload("Lamp", DeviceKind::Lightbulb, Manufacturer::Yeelight);
        new.address = Some("192.168.1.50".to_string());
        let device = h.store.insert(new).await.unwrap();

        h.lighting.hang.store(true, Ordering::SeqCst);
        let info = h
            .manager
            .device_info(
                device.id,
                InfoOptions::default().with_timeout(Duration::from_secs(2)),
            )
            .await
            .unwrap();

        assert_eq!(info.state.power, Power::Unknown);
    }

    #[tokio::test]
    async fn lighting_reading_maps_to_power() {
        let h = Harness::new();
        let mut new = payload("Lamp", DeviceKind::Lightbulb, Manufacturer::Yeelight);
        new.address = Some("192.168.1.50".to_string());
        let device = h.store.insert(new).await.unwrap();

        *h.lighting.reading.lock() = Some(PowerReading::On);
        let info = h
            .manager
            .device_info(device.id, InfoOptions::default())
            .await
            .unwrap();
        assert_eq!(info.state.power, Power::On);

        *h.lighting.reading.lock() = Some(PowerReading::Off);
        let info = h
            .manager
            .device_info(device.id, InfoOptions::default())
            .await
            .unwrap();
        assert_eq!(info.state.power, Power::Off);
    }

    #[tokio::test]
    async fn lamp_scenario() {
        let h = Harness::new();

        // Added with no MAC while the router knows nothing about it.
        let mut new = payload("Lamp", DeviceKind::Lightbulb, Manufacturer::Yeelight);
        new.address = Some("192.168.1.50".to_string());
        let device = h.manager.add_device(new).await.unwrap();
        assert_eq!(device.mac, None);

        // The bulb shows up in the lease table; no reading from the bulb
        // yet, so power stays unknown but the device is online.
        *h.presence.entries.lock() = vec![entry("192.168.1.50", "AA:BB:CC:DD:EE:FF", true)];
        let info = h
            .manager
            .device_info(device.id, InfoOptions::default())
            .await
            .unwrap();
        assert!(info.state.online);
        assert_eq!(info.state.power, Power::Unknown);

        // Once the bulb answers, power reflects its reading.
        *h.lighting.reading.lock() = Some(PowerReading::On);
        let info = h
            .manager
            .device_info(device.id, InfoOptions::default())
            .await
            .unwrap();
        assert_eq!(info.state.power, Power::On);
    }

    #[tokio::test]
    async fn socket_without_backend_stays_unknown() {
        let h = Harness::new();
        let mut new = payload("Heater", DeviceKind::Socket, Manufacturer::Other);
        new.address = Some("192.168.1.70".to_string());
        let device = h.store.insert(new).await.unwrap();

        *h.presence.entries.lock() = vec![entry("192.168.1.70", "11:22:33:44:55:66", true)];
        let info = h
            .manager
            .device_info(device.id, InfoOptions::default())
            .await
            .unwrap();

        assert!(info.state.online);
        assert_eq!(info.state.power, Power::Unknown);
    }

    #[tokio::test]
    async fn bulk_listing_reuses_one_snapshot() {
        let h = Harness::new();
        let mut a = payload("TV", DeviceKind::Tv, Manufacturer::Other);
        a.address = Some("192.168.1.40".to_string());
        let mut b = payload("Heater", DeviceKind::Socket, Manufacturer::Other);
        b.address = Some("192.168.1.70".to_string());
        h.store.insert(a).await.unwrap();
        h.store.insert(b).await.unwrap();

        *h.presence.entries.lock() = vec![
            entry("192.168.1.40", "AA:AA:AA:AA:AA:AA", true),
            entry("192.168.1.70", "BB:BB:BB:BB:BB:BB", false),
        ];

        let infos = h.manager.device_infos(InfoOptions::default()).await.unwrap();
        assert_eq!(infos.len(), 2);
        assert!(infos[0].state.online);
        assert!(!infos[1].state.online);
    }
}

// ============================================================================
// Record lifecycle
// ============================================================================

mod lifecycle {
    use super::*;

    #[tokio::test]
    async fn add_device_fills_endpoint_from_presence() {
        let h = Harness::new();
        *h.presence.entries.lock() = vec![entry("192.168.1.50", "aa:bb:cc:dd:ee:ff", true)];

        let mut new = payload("Lamp", DeviceKind::Lightbulb, Manufacturer::Yeelight);
        new.address = Some("192.168.1.50".to_string());
        let device = h.manager.add_device(new).await.unwrap();

        assert_eq!(
            device.mac.map(|m| m.to_string()).as_deref(),
            Some("AA:BB:CC:DD:EE:FF")
        );
        assert_eq!(device.address.as_deref(), Some("192.168.1.50"));
    }

    #[tokio::test]
    async fn delete_decommissions_bound_node_first() {
        let h = Harness::new();
        let mut new = payload("Plug", DeviceKind::Socket, Manufacturer::Other);
        new.mesh_node_id = Some(MeshNodeId(42));
        let device = h.manager.add_device(new).await.unwrap();

        h.manager.delete_device(device.id).await.unwrap();

        assert_eq!(*h.mesh.decommissioned.lock(), vec![MeshNodeId(42)]);
        assert!(matches!(
            h.manager.get_device(device.id).await,
            Err(Error::DeviceNotFound)
        ));
    }

    #[tokio::test]
    async fn failed_decommission_keeps_record() {
        let h = Harness::new();
        let mut new = payload("Plug", DeviceKind::Socket, Manufacturer::Other);
        new.mesh_node_id = Some(MeshNodeId(42));
        let device = h.manager.add_device(new).await.unwrap();

        h.mesh.fail_decommission.store(true, Ordering::SeqCst);
        assert!(matches!(
            h.manager.delete_device(device.id).await,
            Err(Error::Backend(_))
        ));

        // The record survives and still owns its binding.
        let kept = h.manager.get_device(device.id).await.unwrap();
        assert_eq!(kept.mesh_node_id, Some(MeshNodeId(42)));
    }

    #[tokio::test]
    async fn commission_returns_node_descriptor() {
        let h = Harness::new();
        let node = h.manager.commission("1234-567-8901").await.unwrap();
        assert_eq!(node.node_id, MeshNodeId(42));
        assert_eq!(node.product_name.as_deref(), Some("Smart Plug"));
    }

    #[tokio::test]
    async fn find_device_by_name_or_synonym() {
        let h = Harness::new();
        h.manager
            .add_device(payload(
                "Bedroom Lamp",
                DeviceKind::Lightbulb,
                Manufacturer::Yeelight,
            ))
            .await
            .unwrap();

        let by_name = h.manager.find_device("bedroom").await.unwrap();
        assert_eq!(by_name.name, "Bedroom Lamp");

        let by_synonym = h.manager.find_device("bulb").await.unwrap();
        assert_eq!(by_synonym.name, "Bedroom Lamp");

        assert!(matches!(
            h.manager.find_device("toaster").await,
            Err(Error::DeviceNotFound)
        ));
    }
}
