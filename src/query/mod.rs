//! Snapshot lookup.
//!
//! Decides which describe calls a filter needs, runs them one after the
//! other, and normalizes what comes back:
//! - no cluster identifier given: instance snapshots are queried
//! - no instance identifier given: cluster snapshots are queried
//! - no identifier at all: both are queried
//!
//! The first failing call aborts the whole lookup. Nothing here mutates remote
//! state, so every report says `changed: false`.

pub mod request;

use serde::Serialize;

use crate::client::RdsClient;
use crate::error::{Error, Result};
use crate::transform::{self, SnapshotRecord};
use request::{DescribeRequest, SnapshotKind, SnapshotType};

/// Caller-supplied filters. At most one identifier may be set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotFilter {
    pub db_snapshot_identifier: Option<String>,
    pub db_instance_identifier: Option<String>,
    pub db_cluster_identifier: Option<String>,
    pub db_cluster_snapshot_identifier: Option<String>,
    pub snapshot_type: Option<SnapshotType>,
}

impl SnapshotFilter {
    fn identifiers(&self) -> [(&'static str, Option<&str>); 4] {
        [
            ("db_snapshot_identifier", self.db_snapshot_identifier.as_deref()),
            ("db_instance_identifier", self.db_instance_identifier.as_deref()),
            ("db_cluster_identifier", self.db_cluster_identifier.as_deref()),
            ("db_cluster_snapshot_identifier", self.db_cluster_snapshot_identifier.as_deref()),
        ]
    }

    /// Reject more than one supplied identifier. An empty string counts as supplied.
    pub fn validate(&self) -> Result<()> {
        let supplied: Vec<&'static str> = self
            .identifiers()
            .into_iter()
            .filter(|(_, value)| value.is_some())
            .map(|(name, _)| name)
            .collect();

        if supplied.len() > 1 {
            return Err(Error::MutuallyExclusive(supplied));
        }
        Ok(())
    }

    pub fn wants_instance_snapshots(&self) -> bool {
        is_blank(&self.db_cluster_identifier) && is_blank(&self.db_cluster_snapshot_identifier)
    }

    pub fn wants_cluster_snapshots(&self) -> bool {
        is_blank(&self.db_snapshot_identifier) && is_blank(&self.db_instance_identifier)
    }

    pub fn instance_request(&self) -> DescribeRequest {
        DescribeRequest::builder(SnapshotKind::Instance)
            .snapshot_identifier(self.db_snapshot_identifier.as_deref())
            .source_identifier(self.db_instance_identifier.as_deref())
            .snapshot_type(self.snapshot_type)
            .build()
    }

    pub fn cluster_request(&self) -> DescribeRequest {
        DescribeRequest::builder(SnapshotKind::Cluster)
            .snapshot_identifier(self.db_cluster_snapshot_identifier.as_deref())
            .source_identifier(self.db_cluster_identifier.as_deref())
            .snapshot_type(self.snapshot_type)
            .build()
    }

    /// Describe requests this filter needs, instance first.
    pub fn plan(&self) -> Vec<DescribeRequest> {
        let mut requests = Vec::with_capacity(2);
        if self.wants_instance_snapshots() {
            requests.push(self.instance_request());
        }
        if self.wants_cluster_snapshots() {
            requests.push(self.cluster_request());
        }
        requests
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

/// Result envelope. A category is absent when its query was not run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotReport {
    changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshots: Option<Vec<SnapshotRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_snapshots: Option<Vec<SnapshotRecord>>,
}

impl SnapshotReport {
    pub fn empty() -> Self {
        SnapshotReport {
            changed: false,
            snapshots: None,
            cluster_snapshots: None,
        }
    }

    /// Always false: lookups never change remote state.
    pub fn changed(&self) -> bool {
        self.changed
    }

    pub fn total(&self) -> usize {
        self.snapshots.as_ref().map_or(0, Vec::len)
            + self.cluster_snapshots.as_ref().map_or(0, Vec::len)
    }

    fn insert(&mut self, kind: SnapshotKind, records: Vec<SnapshotRecord>) {
        match kind {
            SnapshotKind::Instance => self.snapshots = Some(records),
            SnapshotKind::Cluster => self.cluster_snapshots = Some(records),
        }
    }
}

/// Run one describe call and normalize its records.
pub fn resolve<C: RdsClient + ?Sized>(client: &C, request: &DescribeRequest) -> Result<Vec<SnapshotRecord>> {
    tracing::debug!(
        kind = request.kind.label(),
        operation = request.kind.operation(),
        params = ?request.parameters(),
        "describing snapshots"
    );

    let raw = client.describe(request).map_err(|e| {
        tracing::warn!(
            kind = request.kind.label(),
            code = e.code.as_deref().unwrap_or("-"),
            error = %e,
            "describe failed"
        );
        Error::remote(e)
    })?;

    let records = transform::normalize_batch(raw)?;
    tracing::info!(
        kind = request.kind.label(),
        count = records.len(),
        "resolved snapshots"
    );
    Ok(records)
}

/// Validate the filter, run the describe calls it needs, build the report.
pub fn run<C: RdsClient + ?Sized>(client: &C, filter: &SnapshotFilter) -> Result<SnapshotReport> {
    filter.validate()?;

    let mut report = SnapshotReport::empty();
    for request in filter.plan() {
        let records = resolve(client, &request)?;
        report.insert(request.kind, records);
    }

    Ok(report)
}
