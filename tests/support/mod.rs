use anyhow::{Context, Result, bail};
use charmstore_fake::CharmUrl;
use serde_json::Value;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::NamedTempFile;

pub fn url(text: &str) -> CharmUrl {
    CharmUrl::parse(text).expect("test URLs are canonical")
}

pub fn query_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_charmstore-query"))
}

/// Write `doc` to a temp file that lives as long as the returned handle.
pub fn write_fixture(doc: &Value) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new().context("failed to allocate fixture file")?;
    serde_json::to_writer(&mut file, doc)?;
    file.flush()?;
    Ok(file)
}

pub fn run_command(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {:?}", cmd))?;
    if output.status.success() {
        Ok(output)
    } else {
        bail!(
            "command {:?} failed: status {:?}\nstdout: {}\nstderr: {}",
            cmd,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    }
}

pub fn parse_stdout(output: &Output) -> Result<Value> {
    serde_json::from_slice(&output.stdout).context("stdout is not a JSON object")
}
