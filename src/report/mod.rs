pub mod table;
pub mod json;

use crate::config::{Config, OutputFormat};
use crate::error::Error;
use crate::query::SnapshotReport;

pub fn print(report: &SnapshotReport, config: &Config) {
    match config.output {
        OutputFormat::Json => println!("{}", json::render(report)),
        OutputFormat::Table => {
            print!("{}", table::render(report));
            if config.verbose {
                println!("\n{} snapshot(s) total, changed: {}", report.total(), report.changed());
            }
        }
    }
}

/// Report a failed invocation. JSON goes to stdout so pipelines can parse it.
pub fn print_failure(error: &Error, output: OutputFormat) {
    match output {
        OutputFormat::Json => println!("{}", json::render_failure(error)),
        OutputFormat::Table => {
            eprintln!("error [{}]: {error}", error.kind().as_str());
            if let Some(code) = error.code() {
                eprintln!("  code: {code}");
            }
        }
    }
}
