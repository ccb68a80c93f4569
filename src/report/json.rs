//! JSON output.
//!
//! Success is the report envelope itself. Failure mirrors it with
//! `failed: true`, a context message and the structured error.

use serde::Serialize;

use crate::error::{ClientErrorKind, Error, ErrorKind};
use crate::query::SnapshotReport;

#[derive(Serialize)]
struct FailureEnvelope<'a> {
    changed: bool,
    failed: bool,
    msg: String,
    error: ErrorDetail<'a>,
}

#[derive(Serialize)]
struct ErrorDetail<'a> {
    kind: ErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    client_kind: Option<ClientErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'a str>,
    message: String,
}

pub fn render(report: &SnapshotReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|_| String::from("{}"))
}

pub fn render_failure(error: &Error) -> String {
    let (client_kind, message) = match error {
        Error::Remote { source, .. } => (Some(source.kind), source.message.clone()),
        other => (None, other.to_string()),
    };

    let envelope = FailureEnvelope {
        changed: false,
        failed: true,
        msg: error.context(),
        error: ErrorDetail {
            kind: error.kind(),
            client_kind,
            code: error.code(),
            message,
        },
    };

    serde_json::to_string_pretty(&envelope).unwrap_or_else(|_| String::from("{}"))
}
