use std::path::Path;
use std::process::Command;

/// True when the aws cli at `binary` runs and reports a version.
pub fn aws_available(binary: &Path) -> bool {
    Command::new(binary)
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}
