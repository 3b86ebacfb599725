//! End-to-end tests for the conversion engine
//!
//! These tests bridge two API generations of a cluster resource (V2 is a
//! strict superset of V1) and verify that wire-visible fields round-trip,
//! wire-excluded fields survive, and the restoration walk recurses through
//! nested records, optionals, and sequences.

use recast_core::{
    convert, convert_to_map, convert_with_report, Error, Shape, SkipReason,
};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::HashMap;

#[derive(Shape, Serialize, Default, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
struct NodeConfig {
    machine_type: String,
    disk_size_gb: i64,
    #[serde(skip)]
    fingerprint: String,
}

#[derive(Shape, Serialize, Default, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
struct NodePool {
    name: String,
    initial_node_count: i64,
    config: NodeConfig,
    #[serde(skip)]
    etag: String,
}

#[derive(Shape, Serialize, Default, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
struct MasterAuth {
    username: String,
    #[serde(skip)]
    password: String,
}

#[derive(Shape, Serialize, Default, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
struct MaintenanceWindow {
    start_time: String,
    #[serde(skip)]
    reservation_id: String,
}

#[derive(Shape, Serialize, Default, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
struct ClusterV1 {
    name: String,
    description: String,
    node_pools: Vec<NodePool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    master_auth: Option<MasterAuth>,
    maintenance_windows: Vec<Option<MaintenanceWindow>>,
    resource_labels: HashMap<String, String>,
    #[serde(skip)]
    self_link: String,
}

/// V2 adds `location` and `network`; everything else matches V1.
#[derive(Shape, Serialize, Default, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
struct ClusterV2 {
    name: String,
    description: String,
    location: String,
    network: String,
    node_pools: Vec<NodePool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    master_auth: Option<MasterAuth>,
    maintenance_windows: Vec<Option<MaintenanceWindow>>,
    resource_labels: HashMap<String, String>,
    #[serde(skip)]
    self_link: String,
}

fn pool(name: &str, count: i64, fingerprint: &str, etag: &str) -> NodePool {
    NodePool {
        name: name.to_string(),
        initial_node_count: count,
        config: NodeConfig {
            machine_type: "n1-standard-1".to_string(),
            disk_size_gb: 100,
            fingerprint: fingerprint.to_string(),
        },
        etag: etag.to_string(),
    }
}

fn sample_cluster() -> ClusterV1 {
    ClusterV1 {
        name: "primary".to_string(),
        description: "production cluster".to_string(),
        node_pools: vec![
            pool("default", 3, "fp-0", "etag-0"),
            pool("batch", 1, "fp-1", "etag-1"),
            pool("gpu", 2, "fp-2", "etag-2"),
        ],
        master_auth: Some(MasterAuth {
            username: "admin".to_string(),
            password: "hunter2".to_string(),
        }),
        maintenance_windows: vec![
            Some(MaintenanceWindow {
                start_time: "03:00".to_string(),
                reservation_id: "res-a".to_string(),
            }),
            None,
            Some(MaintenanceWindow {
                start_time: "05:00".to_string(),
                reservation_id: "res-b".to_string(),
            }),
        ],
        resource_labels: HashMap::from([("env".to_string(), "prod".to_string())]),
        self_link: "projects/p/clusters/primary".to_string(),
    }
}

#[test]
fn test_included_fields_round_trip_across_versions() {
    let source = sample_cluster();
    let mut dest = ClusterV2 {
        location: "us-central1".to_string(),
        ..ClusterV2::default()
    };

    convert(&source, &mut dest).unwrap();

    assert_eq!(dest.name, source.name);
    assert_eq!(dest.description, source.description);
    assert_eq!(dest.node_pools.len(), 3);
    assert_eq!(dest.node_pools[1].initial_node_count, 1);
    assert_eq!(dest.resource_labels["env"], "prod");
    // Destination-only fields keep their pre-call values.
    assert_eq!(dest.location, "us-central1");
    assert!(dest.network.is_empty());
}

#[test]
fn test_excluded_fields_survive_conversion() {
    let source = sample_cluster();

    // The wire form genuinely lacks the excluded fields.
    let wire = convert_to_map(&source).unwrap();
    assert!(!wire.contains_key("selfLink"));
    assert!(!wire["nodePools"][0].as_object().unwrap().contains_key("etag"));

    let mut dest = ClusterV2::default();
    convert(&source, &mut dest).unwrap();
    assert_eq!(dest.self_link, "projects/p/clusters/primary");
}

#[test]
fn test_empty_excluded_does_not_clobber() {
    let mut source = sample_cluster();
    source.self_link = String::new();

    let mut dest = ClusterV2 {
        self_link: "pre-populated".to_string(),
        ..ClusterV2::default()
    };
    convert(&source, &mut dest).unwrap();
    assert_eq!(dest.self_link, "pre-populated");
}

#[test]
fn test_map_source_populates_wire_fields_only() {
    let mut source = Map::new();
    source.insert("name".to_string(), json!("from-api"));
    source.insert("location".to_string(), json!("europe-west1"));
    // Matches an excluded destination field: must be ignored, an excluded
    // field never arrives by wire.
    source.insert("selfLink".to_string(), json!("forged"));
    // No such field on the destination at all.
    source.insert("statusMessage".to_string(), json!("RUNNING"));

    let mut dest = ClusterV2 {
        self_link: "kept".to_string(),
        ..ClusterV2::default()
    };
    let report = convert_with_report(&source, &mut dest).unwrap();

    assert_eq!(dest.name, "from-api");
    assert_eq!(dest.location, "europe-west1");
    assert_eq!(dest.self_link, "kept");
    // A mapping declares no exclusions, so nothing ran and nothing skipped.
    assert!(report.is_clean());
}

#[test]
fn test_nested_record_recursion() {
    let source = sample_cluster();
    let mut dest = ClusterV2::default();
    convert(&source, &mut dest).unwrap();

    // cluster -> node_pools[i] -> config -> fingerprint is three levels of
    // walk recursion below the root.
    assert_eq!(dest.node_pools[0].config.fingerprint, "fp-0");
}

#[test]
fn test_sequence_elements_restored_at_matching_indices() {
    let source = sample_cluster();
    let mut dest = ClusterV2::default();
    convert(&source, &mut dest).unwrap();

    let etags: Vec<&str> = dest.node_pools.iter().map(|p| p.etag.as_str()).collect();
    assert_eq!(etags, vec!["etag-0", "etag-1", "etag-2"]);
}

#[test]
fn test_optional_record_recursion() {
    let source = sample_cluster();
    let mut dest = ClusterV2::default();
    convert(&source, &mut dest).unwrap();
    let auth = dest.master_auth.expect("auth present on the wire");
    assert_eq!(auth.username, "admin");
    assert_eq!(auth.password, "hunter2");

    // Absent optionals skip: nothing to dereference on either side.
    let mut source = sample_cluster();
    source.master_auth = None;
    let mut dest = ClusterV2::default();
    convert(&source, &mut dest).unwrap();
    assert_eq!(dest.master_auth, None);
}

#[test]
fn test_optional_sequence_elements() {
    let source = sample_cluster();
    let mut dest = ClusterV2::default();
    convert(&source, &mut dest).unwrap();

    assert_eq!(dest.maintenance_windows.len(), 3);
    assert_eq!(
        dest.maintenance_windows[0].as_ref().unwrap().reservation_id,
        "res-a"
    );
    assert_eq!(dest.maintenance_windows[1], None);
    assert_eq!(
        dest.maintenance_windows[2].as_ref().unwrap().reservation_id,
        "res-b"
    );
}

#[test]
fn test_source_only_fields_are_ignored() {
    // Downgrade: V2 -> V1 drops `location` and `network` silently.
    let mut source = ClusterV2::default();
    source.name = "downgraded".to_string();
    source.location = "us-east1".to_string();
    source.network = "default".to_string();

    let mut dest = ClusterV1::default();
    convert(&source, &mut dest).unwrap();
    assert_eq!(dest.name, "downgraded");
}

#[test]
fn test_wire_type_mismatch_is_decoding_error() {
    let mut source = Map::new();
    source.insert("name".to_string(), json!(42));

    let mut dest = ClusterV2::default();
    let err = convert(&source, &mut dest).unwrap_err();
    assert!(matches!(err, Error::Decoding { .. }));
    assert!(err.to_string().contains("$.name"));
}

#[test]
fn test_report_records_unmatched_excluded_field() {
    #[derive(Shape, Serialize, Default, Clone)]
    struct Renamed {
        id: i64,
        #[serde(skip)]
        checksum: String,
    }

    let source = Renamed {
        id: 1,
        checksum: "abc".to_string(),
    };
    let mut dest = ClusterV2::default();
    let report = convert_with_report(&source, &mut dest).unwrap();

    assert_eq!(report.skips().len(), 1);
    assert_eq!(report.skips()[0].path, "$.checksum");
    assert_eq!(report.skips()[0].reason, SkipReason::UnmatchedField);
}

#[test]
fn test_report_records_kind_mismatch() {
    #[derive(Shape, Serialize, Default, Clone)]
    struct SourceSide {
        #[serde(skip)]
        revision: i64,
    }

    #[derive(Shape, Serialize, Default, Clone)]
    struct DestSide {
        // Same name, different concrete type: the excluded copy must skip.
        #[serde(skip)]
        revision: String,
    }

    let source = SourceSide { revision: 7 };
    let mut dest = DestSide {
        revision: "untouched".to_string(),
    };
    let report = convert_with_report(&source, &mut dest).unwrap();

    assert_eq!(dest.revision, "untouched");
    assert!(report
        .skips()
        .iter()
        .any(|s| s.path == "$.revision" && s.reason == SkipReason::KindMismatch));
}

#[test]
fn test_report_records_length_mismatch() {
    // An included sequence is rebuilt from the wire array, so lengths
    // always agree after step 2; only an excluded sequence whose copy
    // failed can leave the pairing uneven.
    #[derive(Shape, Serialize, Default, Clone)]
    struct HiddenSeq {
        #[serde(skip)]
        pools: Vec<NodePool>,
    }

    #[derive(Shape, Serialize, Default, Clone)]
    struct HiddenSeqOther {
        #[serde(skip)]
        pools: Vec<MasterAuth>,
    }

    let source = HiddenSeq {
        pools: vec![pool("a", 1, "fp", "e"), pool("b", 2, "fp2", "e2")],
    };
    let mut dest = HiddenSeqOther::default();
    let report = convert_with_report(&source, &mut dest).unwrap();

    assert!(report
        .skips()
        .iter()
        .any(|s| s.path == "$.pools" && s.reason == SkipReason::KindMismatch));
    assert!(report
        .skips()
        .iter()
        .any(|s| s.path == "$.pools" && s.reason == SkipReason::LengthMismatch));
}

#[test]
fn test_excluded_sequence_copied_wholesale() {
    #[derive(Shape, Serialize, Default, Clone, Debug, PartialEq)]
    struct Hidden {
        visible: String,
        #[serde(skip)]
        pools: Vec<NodePool>,
    }

    let source = Hidden {
        visible: "x".to_string(),
        pools: vec![pool("a", 1, "fp", "e"), pool("b", 2, "fp2", "e2")],
    };
    let mut dest = Hidden::default();
    let report = convert_with_report(&source, &mut dest).unwrap();

    assert!(report.is_clean());
    assert_eq!(dest, source);
}

#[test]
fn test_convert_to_map_for_dynamic_merge() {
    let wire = convert_to_map(&sample_cluster()).unwrap();

    // Wire names honor the container's camelCase rule.
    assert!(wire.contains_key("nodePools"));
    assert!(wire.contains_key("resourceLabels"));
    assert_eq!(wire["name"], json!("primary"));

    // The schema-less view merges into other dynamic structures.
    let mut request = Map::new();
    request.insert("parent".to_string(), json!("projects/p"));
    request.insert("cluster".to_string(), Value::Object(wire));
    assert_eq!(request["cluster"]["name"], json!("primary"));
}
