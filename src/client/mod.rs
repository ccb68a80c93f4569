//! Access to the provider's describe operations.
//!
//! The query layer never builds its own client: anything implementing
//! [`RdsClient`] can be handed to [`crate::query::run`]. Pagination and
//! credential resolution are the client's job.

pub mod aws_cli;

use serde_json::{Map, Value};

use crate::error::ClientError;
use crate::query::request::{DescribeRequest, SnapshotKind};

pub use aws_cli::AwsCliClient;

/// A describe record exactly as the provider returned it.
pub type RawSnapshot = Map<String, Value>;

pub trait RdsClient {
    fn describe_db_snapshots(&self, request: &DescribeRequest) -> Result<Vec<RawSnapshot>, ClientError>;

    fn describe_db_cluster_snapshots(
        &self,
        request: &DescribeRequest,
    ) -> Result<Vec<RawSnapshot>, ClientError>;

    /// Route a request to the operation matching its kind.
    fn describe(&self, request: &DescribeRequest) -> Result<Vec<RawSnapshot>, ClientError> {
        match request.kind {
            SnapshotKind::Instance => self.describe_db_snapshots(request),
            SnapshotKind::Cluster => self.describe_db_cluster_snapshots(request),
        }
    }
}

impl<T: RdsClient + ?Sized> RdsClient for &T {
    fn describe_db_snapshots(&self, request: &DescribeRequest) -> Result<Vec<RawSnapshot>, ClientError> {
        (**self).describe_db_snapshots(request)
    }

    fn describe_db_cluster_snapshots(
        &self,
        request: &DescribeRequest,
    ) -> Result<Vec<RawSnapshot>, ClientError> {
        (**self).describe_db_cluster_snapshots(request)
    }
}
