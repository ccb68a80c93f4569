//! RDS describe calls through the AWS CLI.
//!
//! Runs `aws rds describe-db-snapshots` / `describe-db-cluster-snapshots`
//! with `--output json`. The CLI follows pagination tokens on its own and
//! resolves credentials from the usual chain (env, profile, instance role).
//!
//! Handles gracefully:
//! - aws binary not installed
//! - missing credentials
//! - provider errors, parsed from `An error occurred (Code) when calling ...`

use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

use serde_json::Value;

use super::{RawSnapshot, RdsClient};
use crate::config::Config;
use crate::error::{ClientError, ClientErrorKind};
use crate::query::request::{DescribeRequest, SnapshotKind};
use crate::transform::camel_to_snake;

pub struct AwsCliClient {
    binary: PathBuf,
    region: Option<String>,
    profile: Option<String>,
    endpoint_url: Option<String>,
    timeout: Duration,
}

impl AwsCliClient {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        AwsCliClient {
            binary: binary.into(),
            region: None,
            profile: None,
            endpoint_url: None,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        AwsCliClient {
            binary: config.aws_binary.clone(),
            region: config.region.clone(),
            profile: config.profile.clone(),
            endpoint_url: config.endpoint_url.clone(),
            timeout: config.timeout,
        }
    }

    /// Full argument list for one describe call, binary excluded.
    pub fn command_args(&self, request: &DescribeRequest) -> Vec<String> {
        let subcommand = match request.kind {
            SnapshotKind::Instance => "describe-db-snapshots",
            SnapshotKind::Cluster => "describe-db-cluster-snapshots",
        };

        let mut args = vec![
            "rds".to_string(),
            subcommand.to_string(),
            "--output".to_string(),
            "json".to_string(),
        ];

        if let Some(region) = &self.region {
            args.push("--region".to_string());
            args.push(region.clone());
        }
        if let Some(profile) = &self.profile {
            args.push("--profile".to_string());
            args.push(profile.clone());
        }
        if let Some(endpoint) = &self.endpoint_url {
            args.push("--endpoint-url".to_string());
            args.push(endpoint.clone());
        }

        // 0 disables the timeout in the cli, so never send it
        let timeout_secs = self.timeout.as_secs().max(1).to_string();
        args.push("--cli-read-timeout".to_string());
        args.push(timeout_secs.clone());
        args.push("--cli-connect-timeout".to_string());
        args.push(timeout_secs);

        for (name, value) in request.parameters() {
            let flag = format!("--{}", camel_to_snake(name).replace('_', "-"));
            match value {
                Value::Bool(true) => args.push(flag),
                Value::Bool(false) => {}
                Value::String(s) => {
                    args.push(flag);
                    args.push(s);
                }
                other => {
                    args.push(flag);
                    args.push(other.to_string());
                }
            }
        }

        args
    }

    fn run(&self, request: &DescribeRequest) -> Result<Vec<RawSnapshot>, ClientError> {
        let args = self.command_args(request);
        tracing::debug!(
            binary = %self.binary.display(),
            args = ?args,
            "invoking aws cli"
        );

        let output = Command::new(&self.binary).args(&args).output().map_err(|e| {
            ClientError::new(
                ClientErrorKind::Unavailable,
                format!("aws: failed to run {}: {e}", self.binary.display()),
            )
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(parse_cli_error(&stderr));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_describe_output(request.kind, &stdout)
    }
}

impl RdsClient for AwsCliClient {
    fn describe_db_snapshots(&self, request: &DescribeRequest) -> Result<Vec<RawSnapshot>, ClientError> {
        self.run(request)
    }

    fn describe_db_cluster_snapshots(
        &self,
        request: &DescribeRequest,
    ) -> Result<Vec<RawSnapshot>, ClientError> {
        self.run(request)
    }
}

/// Pull the record list out of a describe response body.
pub fn parse_describe_output(kind: SnapshotKind, stdout: &str) -> Result<Vec<RawSnapshot>, ClientError> {
    let body: Value = serde_json::from_str(stdout).map_err(|e| {
        ClientError::new(ClientErrorKind::Other, format!("aws: failed to parse output: {e}"))
    })?;

    let records = match body.get(kind.response_key()) {
        Some(Value::Array(items)) => items,
        // an empty account still returns the key, but be lenient
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(other) => {
            return Err(ClientError::new(
                ClientErrorKind::Other,
                format!("aws: {} is not a list: {other}", kind.response_key()),
            ))
        }
    };

    records
        .iter()
        .map(|record| match record {
            Value::Object(map) => Ok(map.clone()),
            other => Err(ClientError::new(
                ClientErrorKind::Other,
                format!("aws: unexpected {} entry: {other}", kind.response_key()),
            )),
        })
        .collect()
}

/// Turn aws cli stderr into a structured error.
pub fn parse_cli_error(stderr: &str) -> ClientError {
    const MARKER: &str = "An error occurred (";

    let stderr = stderr.trim();

    if let Some(start) = stderr.find(MARKER) {
        let rest = &stderr[start + MARKER.len()..];
        if let Some(end) = rest.find(')') {
            let code = &rest[..end];
            return ClientError::from_code(code, provider_message(&rest[end + 1..]));
        }
    }

    // failures raised by the cli itself, before any request is sent
    if stderr.contains("Unable to locate credentials")
        || (stderr.contains("profile") && stderr.contains("could not be found"))
    {
        return ClientError::new(ClientErrorKind::AccessDenied, stderr);
    }

    if stderr.contains("Could not connect to the endpoint URL")
        || stderr.contains("Connect timeout on endpoint URL")
        || stderr.contains("Read timeout on endpoint URL")
    {
        return ClientError::new(ClientErrorKind::Unavailable, stderr);
    }

    if stderr.contains("Invalid choice") || (stderr.contains("usage:") && stderr.contains("argument")) {
        return ClientError::new(ClientErrorKind::InvalidRequest, stderr);
    }

    ClientError::new(ClientErrorKind::Other, format!("aws: command failed: {stderr}"))
}

// text after " when calling the X operation[ (reached max retries: N)]: "
fn provider_message(after_code: &str) -> String {
    let rest = match after_code.find(" operation") {
        Some(i) => &after_code[i + " operation".len()..],
        None => after_code,
    };

    let rest = match rest.trim_start().strip_prefix('(') {
        Some(inner) => inner.find(')').map_or(inner, |i| &inner[i + 1..]),
        None => rest,
    };

    rest.trim_start()
        .strip_prefix(':')
        .unwrap_or(rest)
        .trim()
        .to_string()
}
