use std::cell::RefCell;

use serde_json::{json, Value};

use rds_snapshot_info::client::{RawSnapshot, RdsClient};
use rds_snapshot_info::error::{ClientError, Error, ErrorKind, REMOTE_CONTEXT};
use rds_snapshot_info::query::request::{DescribeRequest, SnapshotKind, SnapshotType};
use rds_snapshot_info::query::{self, SnapshotFilter};
use rds_snapshot_info::report;

/// In-memory client that records every request it sees.
struct RecordingClient {
    instance: Result<Vec<RawSnapshot>, ClientError>,
    cluster: Result<Vec<RawSnapshot>, ClientError>,
    calls: RefCell<Vec<DescribeRequest>>,
}

impl RecordingClient {
    fn new(instance: Value, cluster: Value) -> Self {
        RecordingClient {
            instance: Ok(records(instance)),
            cluster: Ok(records(cluster)),
            calls: RefCell::new(Vec::new()),
        }
    }

    fn empty() -> Self {
        Self::new(json!([]), json!([]))
    }

    fn calls(&self) -> Vec<DescribeRequest> {
        self.calls.borrow().clone()
    }
}

impl RdsClient for RecordingClient {
    fn describe_db_snapshots(&self, request: &DescribeRequest) -> Result<Vec<RawSnapshot>, ClientError> {
        self.calls.borrow_mut().push(request.clone());
        self.instance.clone()
    }

    fn describe_db_cluster_snapshots(
        &self,
        request: &DescribeRequest,
    ) -> Result<Vec<RawSnapshot>, ClientError> {
        self.calls.borrow_mut().push(request.clone());
        self.cluster.clone()
    }
}

fn records(value: Value) -> Vec<RawSnapshot> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_object().cloned().unwrap())
        .collect()
}

fn instance_snapshot() -> Value {
    json!({
        "DBSnapshotIdentifier": "rds:db-1-2024-03-01-05-10",
        "DBInstanceIdentifier": "db-1",
        "SnapshotCreateTime": "2024-03-01T05:10:42.123000+00:00",
        "Engine": "postgres",
        "EngineVersion": "15.4",
        "AllocatedStorage": 20,
        "Status": "available",
        "SnapshotType": "automated",
        "StorageEncrypted": true,
        "IAMDatabaseAuthenticationEnabled": false,
        "DBSnapshotArn": "arn:aws:rds:us-east-1:123456789012:snapshot:rds:db-1-2024-03-01-05-10",
        "TagList": [{"Key": "env", "Value": "prod"}]
    })
}

fn cluster_snapshot() -> Value {
    json!({
        "DBClusterSnapshotIdentifier": "cluster-1-final",
        "DBClusterIdentifier": "cluster-1",
        "AvailabilityZones": ["ca-central-1a", "ca-central-1b"],
        "Engine": "aurora-mysql",
        "SnapshotType": "manual",
        "PercentProgress": 100,
        "TagList": []
    })
}

#[test]
fn no_filters_returns_both_categories() {
    let client = RecordingClient::new(json!([instance_snapshot()]), json!([cluster_snapshot()]));

    let result = query::run(&client, &SnapshotFilter::default()).unwrap();

    assert!(!result.changed());
    assert_eq!(result.snapshots.as_ref().map(Vec::len), Some(1));
    assert_eq!(result.cluster_snapshots.as_ref().map(Vec::len), Some(1));

    let kinds: Vec<_> = client.calls().iter().map(|r| r.kind).collect();
    assert_eq!(kinds, vec![SnapshotKind::Instance, SnapshotKind::Cluster]);
}

#[test]
fn both_keys_present_even_when_empty() {
    let client = RecordingClient::empty();

    let result = query::run(&client, &SnapshotFilter::default()).unwrap();
    let rendered: Value = serde_json::from_str(&report::json::render(&result)).unwrap();

    assert_eq!(
        rendered,
        json!({"changed": false, "snapshots": [], "cluster_snapshots": []})
    );
}

#[test]
fn instance_filter_returns_instance_snapshots_only() {
    let client = RecordingClient::new(json!([instance_snapshot()]), json!([cluster_snapshot()]));
    let filter = SnapshotFilter {
        db_instance_identifier: Some("db-1".to_string()),
        ..SnapshotFilter::default()
    };

    let result = query::run(&client, &filter).unwrap();
    let rendered: Value = serde_json::from_str(&report::json::render(&result)).unwrap();

    assert!(rendered.get("snapshots").is_some());
    assert!(rendered.get("cluster_snapshots").is_none());

    let calls = client.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].kind, SnapshotKind::Instance);
    assert_eq!(calls[0].source_identifier.as_deref(), Some("db-1"));
}

#[test]
fn cluster_filter_returns_cluster_snapshots_only() {
    let client = RecordingClient::new(json!([instance_snapshot()]), json!([cluster_snapshot()]));
    let filter = SnapshotFilter {
        db_cluster_identifier: Some("cluster-1".to_string()),
        ..SnapshotFilter::default()
    };

    let result = query::run(&client, &filter).unwrap();

    assert!(result.snapshots.is_none());
    let cluster = result.cluster_snapshots.unwrap();
    assert_eq!(cluster[0].str_field("db_cluster_identifier"), Some("cluster-1"));
    assert_eq!(
        cluster[0].get("availability_zones"),
        Some(&json!(["ca-central-1a", "ca-central-1b"]))
    );
    assert_eq!(client.calls().len(), 1);
}

#[test]
fn conflicting_identifiers_fail_before_any_call() {
    let identifiers = [
        "db_snapshot_identifier",
        "db_instance_identifier",
        "db_cluster_identifier",
        "db_cluster_snapshot_identifier",
    ];

    for (i, first) in identifiers.iter().enumerate() {
        for second in &identifiers[i + 1..] {
            let mut filter = SnapshotFilter::default();
            for name in [first, second] {
                let slot = match *name {
                    "db_snapshot_identifier" => &mut filter.db_snapshot_identifier,
                    "db_instance_identifier" => &mut filter.db_instance_identifier,
                    "db_cluster_identifier" => &mut filter.db_cluster_identifier,
                    _ => &mut filter.db_cluster_snapshot_identifier,
                };
                *slot = Some("x".to_string());
            }

            let client = RecordingClient::empty();
            let err = query::run(&client, &filter).unwrap_err();

            assert_eq!(err.kind(), ErrorKind::InvalidInput, "{first} + {second}");
            assert!(client.calls().is_empty(), "{first} + {second} reached the client");
        }
    }
}

#[test]
fn public_type_requests_public_snapshots_in_both_queries() {
    let client = RecordingClient::empty();
    let filter = SnapshotFilter {
        snapshot_type: Some(SnapshotType::Public),
        ..SnapshotFilter::default()
    };

    let result = query::run(&client, &filter).unwrap();

    assert!(result.snapshots.is_some());
    assert!(result.cluster_snapshots.is_some());
    for call in client.calls() {
        assert!(call.include_public);
        assert!(!call.include_shared);
        assert_eq!(call.snapshot_type, Some(SnapshotType::Public));
    }
}

#[test]
fn records_are_normalized() {
    let client = RecordingClient::new(json!([instance_snapshot()]), json!([]));
    let filter = SnapshotFilter {
        db_snapshot_identifier: Some("rds:db-1-2024-03-01-05-10".to_string()),
        ..SnapshotFilter::default()
    };

    let result = query::run(&client, &filter).unwrap();
    let snapshot = &result.snapshots.unwrap()[0];

    assert_eq!(snapshot.str_field("db_snapshot_identifier"), Some("rds:db-1-2024-03-01-05-10"));
    assert_eq!(snapshot.get("iam_database_authentication_enabled"), Some(&json!(false)));
    assert_eq!(snapshot.get("allocated_storage"), Some(&json!(20)));
    assert_eq!(snapshot.get("tags"), Some(&json!({"env": "prod"})));
    assert!(snapshot.get("tag_list").is_none());
    assert!(snapshot.as_map().keys().all(|k| !k.chars().any(|c| c.is_ascii_uppercase())));
}

#[test]
fn shared_snapshots_carry_no_tags() {
    let mut shared = instance_snapshot();
    shared["SnapshotType"] = json!("shared");
    let client = RecordingClient::new(json!([shared]), json!([]));
    let filter = SnapshotFilter {
        snapshot_type: Some(SnapshotType::Shared),
        ..SnapshotFilter::default()
    };

    let result = query::run(&client, &filter).unwrap();

    let snapshot = &result.snapshots.unwrap()[0];
    assert!(snapshot.get("tags").is_none());
    assert!(client.calls().iter().all(|c| c.include_shared));
}

#[test]
fn instance_failure_aborts_before_cluster_query() {
    let mut client = RecordingClient::empty();
    client.instance = Err(ClientError::from_code(
        "AccessDenied",
        "not authorized to perform: rds:DescribeDBSnapshots",
    ));

    let err = query::run(&client, &SnapshotFilter::default()).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Remote);
    assert_eq!(err.code(), Some("AccessDenied"));
    assert_eq!(err.context(), REMOTE_CONTEXT);
    assert_eq!(client.calls().len(), 1);
}

#[test]
fn cluster_failure_returns_no_partial_result() {
    let mut client = RecordingClient::new(json!([instance_snapshot()]), json!([]));
    client.cluster = Err(ClientError::from_code("Throttling", "Rate exceeded"));

    let err = query::run(&client, &SnapshotFilter::default()).unwrap_err();

    match err {
        Error::Remote { source, .. } => assert_eq!(source.message, "Rate exceeded"),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(client.calls().len(), 2);
}

#[test]
fn malformed_tags_surface_as_transform_failure() {
    let client = RecordingClient::new(
        json!([{"DBSnapshotIdentifier": "x", "SnapshotType": "manual", "TagList": [{"Name": "env"}]}]),
        json!([]),
    );
    let filter = SnapshotFilter {
        db_snapshot_identifier: Some("x".to_string()),
        ..SnapshotFilter::default()
    };

    let err = query::run(&client, &filter).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transform);
}

#[test]
fn provider_order_is_kept() {
    let client = RecordingClient::new(
        json!([
            {"DBSnapshotIdentifier": "z", "SnapshotType": "manual"},
            {"DBSnapshotIdentifier": "a", "SnapshotType": "manual"},
            {"DBSnapshotIdentifier": "m", "SnapshotType": "manual"}
        ]),
        json!([]),
    );
    let filter = SnapshotFilter {
        db_instance_identifier: Some("db-1".to_string()),
        ..SnapshotFilter::default()
    };

    let result = query::run(&client, &filter).unwrap();
    let ids: Vec<_> = result
        .snapshots
        .as_ref()
        .unwrap()
        .iter()
        .filter_map(|s| s.identifier())
        .collect();

    assert_eq!(ids, vec!["z", "a", "m"]);
}

#[test]
fn table_output_lists_both_sections() {
    let client = RecordingClient::new(json!([instance_snapshot()]), json!([cluster_snapshot()]));

    let result = query::run(&client, &SnapshotFilter::default()).unwrap();
    let table = report::table::render(&result);

    assert!(table.contains("Instance snapshots"));
    assert!(table.contains("Cluster snapshots"));
    assert!(table.contains("rds:db-1-2024-03-01-05-10"));
    assert!(table.contains("2024-03-01 05:10:42"));
    assert!(table.contains("20 GiB"));
    assert!(table.contains("cluster-1-final"));
}
