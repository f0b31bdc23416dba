// Common test utilities shared across test files

use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

/// Run `script` with `/bin/sh -c` and return its stdout
#[allow(dead_code)]
pub fn sh(script: &str) -> String {
    let output = Command::new("sh")
        .arg("-c")
        .arg(script)
        .output()
        .expect("Failed to run sh");
    assert!(
        output.status.success(),
        "sh failed for {:?}: {}",
        script,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("sh produced invalid UTF-8")
}

/// Run `script` with `/bin/sh -c` and report whether it exited successfully
#[allow(dead_code)]
pub fn sh_succeeds(script: &str) -> bool {
    Command::new("sh")
        .arg("-c")
        .arg(script)
        .output()
        .expect("Failed to run sh")
        .status
        .success()
}

/// Write `contents` to a temporary file that lives as long as the handle
#[allow(dead_code)]
pub fn temp_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write temp file");
    file
}
