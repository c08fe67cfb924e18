//! `keel snapshot inspect`

use super::super::{parse_args, usage};
use super::sha256_hex;
use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Local};
use clap::Parser;
use keel_core::error::ConstructionError;
use keel_core::{Command, CommandContext, Ui};
use std::path::PathBuf;
use std::sync::Arc;

pub const SYNOPSIS: &str = "Displays information about a snapshot file";

#[derive(Parser, Debug)]
#[command(about = SYNOPSIS)]
struct InspectArgs {
    /// Snapshot file to inspect
    file: PathBuf,
}

/// What `inspect` reports about a snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotInfo {
    pub path: PathBuf,
    pub size: u64,
    pub modified: Option<DateTime<Local>>,
    pub sha256: String,
}

impl SnapshotInfo {
    /// Read metadata and hash the file; blocking
    pub fn read(path: PathBuf) -> anyhow::Result<Self> {
        let metadata = std::fs::metadata(&path)
            .with_context(|| format!("failed to read '{}'", path.display()))?;
        if !metadata.is_file() {
            anyhow::bail!("'{}' is not a file", path.display());
        }

        let sha256 = sha256_hex(&path)
            .with_context(|| format!("failed to hash '{}'", path.display()))?;
        Ok(Self {
            modified: metadata.modified().ok().map(DateTime::<Local>::from),
            size: metadata.len(),
            path,
            sha256,
        })
    }

    fn rows(&self) -> Vec<(&'static str, String)> {
        let modified = self
            .modified
            .map(|time| time.format("%Y-%m-%d %H:%M:%S %:z").to_string())
            .unwrap_or_else(|| "unknown".to_string());
        vec![
            ("Path", self.path.display().to_string()),
            ("Size", format!("{} bytes", self.size)),
            ("Modified", modified),
            ("SHA-256", self.sha256.clone()),
        ]
    }
}

pub struct InspectCommand {
    ui: Arc<dyn Ui>,
}

impl InspectCommand {
    pub fn new(ctx: &CommandContext) -> Result<Self, ConstructionError> {
        Ok(Self { ui: ctx.ui() })
    }
}

#[async_trait]
impl Command for InspectCommand {
    fn synopsis(&self) -> String {
        SYNOPSIS.to_string()
    }

    fn help(&self) -> String {
        usage::<InspectArgs>("snapshot inspect")
    }

    async fn run(&mut self, args: Vec<String>) -> i32 {
        let args = match parse_args::<InspectArgs>("snapshot inspect", args, self.ui.as_ref()) {
            Ok(args) => args,
            Err(code) => return code,
        };

        let info = match tokio::task::spawn_blocking(move || SnapshotInfo::read(args.file)).await {
            Ok(Ok(info)) => info,
            Ok(Err(e)) => {
                self.ui.error(&format!("Error inspecting snapshot: {e:#}"));
                return 1;
            }
            Err(e) => {
                self.ui.error(&format!("Error inspecting snapshot: {e}"));
                return 1;
            }
        };

        for (label, value) in info.rows() {
            self.ui.output(&format!("{:<10}{}", format!("{label}:"), value));
        }
        0
    }
}
