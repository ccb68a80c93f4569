//! Typed describe requests.
//!
//! One [`DescribeRequest`] per describe call. The builder skips empty
//! identifiers and turns the `public`/`shared` snapshot types into the
//! matching include flags.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotType {
    Automated,
    Manual,
    Shared,
    Public,
}

impl SnapshotType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SnapshotType::Automated => "automated",
            SnapshotType::Manual => "manual",
            SnapshotType::Shared => "shared",
            SnapshotType::Public => "public",
        }
    }
}

impl fmt::Display for SnapshotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which of the two describe operations a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotKind {
    Instance,
    Cluster,
}

impl SnapshotKind {
    pub fn label(&self) -> &'static str {
        match self {
            SnapshotKind::Instance => "instance",
            SnapshotKind::Cluster => "cluster",
        }
    }

    /// Provider operation name, as it appears in error messages.
    pub fn operation(&self) -> &'static str {
        match self {
            SnapshotKind::Instance => "DescribeDBSnapshots",
            SnapshotKind::Cluster => "DescribeDBClusterSnapshots",
        }
    }

    /// Field of the describe response holding the records.
    pub fn response_key(&self) -> &'static str {
        match self {
            SnapshotKind::Instance => "DBSnapshots",
            SnapshotKind::Cluster => "DBClusterSnapshots",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeRequest {
    pub kind: SnapshotKind,
    /// DBSnapshotIdentifier or DBClusterSnapshotIdentifier
    pub snapshot_identifier: Option<String>,
    /// DBInstanceIdentifier or DBClusterIdentifier
    pub source_identifier: Option<String>,
    pub snapshot_type: Option<SnapshotType>,
    pub include_public: bool,
    pub include_shared: bool,
}

impl DescribeRequest {
    pub fn builder(kind: SnapshotKind) -> DescribeRequestBuilder {
        DescribeRequestBuilder {
            request: DescribeRequest {
                kind,
                snapshot_identifier: None,
                source_identifier: None,
                snapshot_type: None,
                include_public: false,
                include_shared: false,
            },
        }
    }

    /// Provider parameter names and values, in the order they are sent.
    pub fn parameters(&self) -> Vec<(&'static str, Value)> {
        let (snapshot_param, source_param) = match self.kind {
            SnapshotKind::Instance => ("DBSnapshotIdentifier", "DBInstanceIdentifier"),
            SnapshotKind::Cluster => ("DBClusterSnapshotIdentifier", "DBClusterIdentifier"),
        };

        let mut params = Vec::new();
        if let Some(id) = &self.snapshot_identifier {
            params.push((snapshot_param, Value::from(id.as_str())));
        }
        if let Some(id) = &self.source_identifier {
            params.push((source_param, Value::from(id.as_str())));
        }
        if let Some(snapshot_type) = self.snapshot_type {
            params.push(("SnapshotType", Value::from(snapshot_type.as_str())));
        }
        if self.include_public {
            params.push(("IncludePublic", Value::Bool(true)));
        }
        if self.include_shared {
            params.push(("IncludeShared", Value::Bool(true)));
        }
        params
    }
}

pub struct DescribeRequestBuilder {
    request: DescribeRequest,
}

impl DescribeRequestBuilder {
    pub fn snapshot_identifier(mut self, id: Option<&str>) -> Self {
        self.request.snapshot_identifier = non_empty(id);
        self
    }

    pub fn source_identifier(mut self, id: Option<&str>) -> Self {
        self.request.source_identifier = non_empty(id);
        self
    }

    pub fn snapshot_type(mut self, snapshot_type: Option<SnapshotType>) -> Self {
        self.request.snapshot_type = snapshot_type;
        self.request.include_public = snapshot_type == Some(SnapshotType::Public);
        self.request.include_shared = snapshot_type == Some(SnapshotType::Shared);
        self
    }

    pub fn build(self) -> DescribeRequest {
        self.request
    }
}

fn non_empty(id: Option<&str>) -> Option<String> {
    id.filter(|s| !s.is_empty()).map(str::to_string)
}
