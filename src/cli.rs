use clap::Parser;
use std::path::PathBuf;

use crate::query::request::SnapshotType;
use crate::query::SnapshotFilter;

#[derive(Parser, Debug, Default)]
#[command(name = "rds-snapshot-info")]
#[command(about = "Obtain information about RDS instance and cluster snapshots")]
#[command(version)]
pub struct Cli {
    /// Name of an RDS (unclustered) snapshot
    #[arg(long, visible_alias = "snapshot-name")]
    pub db_snapshot_identifier: Option<String>,

    /// RDS instance name for which to find snapshots
    #[arg(long)]
    pub db_instance_identifier: Option<String>,

    /// RDS cluster name for which to find snapshots
    #[arg(long)]
    pub db_cluster_identifier: Option<String>,

    /// Name of an RDS cluster snapshot
    #[arg(long)]
    pub db_cluster_snapshot_identifier: Option<String>,

    /// Type of snapshot to find (both automated and manual by default)
    #[arg(long, value_enum)]
    pub snapshot_type: Option<SnapshotType>,

    /// AWS region to query
    #[arg(long)]
    pub region: Option<String>,

    /// Named AWS profile to use
    #[arg(long)]
    pub profile: Option<String>,

    /// Override the RDS endpoint URL
    #[arg(long)]
    pub endpoint_url: Option<String>,

    /// Client timeout, e.g. "30s" or "2m"
    #[arg(long)]
    pub timeout: Option<String>,

    /// Output as JSON instead of table
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Config file (defaults to the platform config directory)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Show debug logging on stderr
    #[arg(long, short = 'v', default_value_t = false)]
    pub verbose: bool,
}

impl Cli {
    pub fn filter(&self) -> SnapshotFilter {
        SnapshotFilter {
            db_snapshot_identifier: self.db_snapshot_identifier.clone(),
            db_instance_identifier: self.db_instance_identifier.clone(),
            db_cluster_identifier: self.db_cluster_identifier.clone(),
            db_cluster_snapshot_identifier: self.db_cluster_snapshot_identifier.clone(),
            snapshot_type: self.snapshot_type,
        }
    }
}
