//! `keel snapshot save`
//!
//! Copies a snapshot into place atomically: the data is written to a
//! temporary file next to the destination, synced, renamed over the
//! destination and then hashed again to verify the copy.

use super::super::{parse_args, usage};
use super::sha256_hex;
use anyhow::{Context, bail};
use async_trait::async_trait;
use clap::Parser;
use keel_core::error::ConstructionError;
use keel_core::{Command, CommandContext, Ui};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;

pub const SYNOPSIS: &str = "Saves a snapshot to a file";

#[derive(Parser, Debug)]
#[command(about = SYNOPSIS)]
struct SaveArgs {
    /// Snapshot file to copy
    source: PathBuf,

    /// Destination file, or an existing directory to copy into
    destination: PathBuf,
}

/// Result of a verified save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedSnapshot {
    pub path: PathBuf,
    pub bytes: u64,
    pub sha256: String,
}

/// Copy `source` to `destination` atomically and verify the result; blocking
pub fn save_snapshot(source: &Path, destination: &Path) -> anyhow::Result<SavedSnapshot> {
    let target = if destination.is_dir() {
        let name = source
            .file_name()
            .with_context(|| format!("'{}' has no file name", source.display()))?;
        destination.join(name)
    } else {
        destination.to_path_buf()
    };

    let expected = sha256_hex(source)
        .with_context(|| format!("failed to read snapshot '{}'", source.display()))?;

    let directory = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let mut staged = NamedTempFile::new_in(&directory)
        .with_context(|| format!("failed to create temporary file in '{}'", directory.display()))?;

    let mut input = File::open(source)
        .with_context(|| format!("failed to open snapshot '{}'", source.display()))?;
    let bytes = io::copy(&mut input, staged.as_file_mut()).context("failed to copy snapshot")?;
    staged
        .as_file()
        .sync_all()
        .context("failed to sync snapshot to disk")?;

    staged
        .persist(&target)
        .map_err(|e| e.error)
        .with_context(|| format!("failed to move snapshot into '{}'", target.display()))?;

    let actual = sha256_hex(&target)
        .with_context(|| format!("failed to verify '{}'", target.display()))?;
    if actual != expected {
        bail!(
            "verification failed for '{}': expected {expected}, found {actual}",
            target.display()
        );
    }

    Ok(SavedSnapshot {
        path: target,
        bytes,
        sha256: actual,
    })
}

pub struct SaveCommand {
    ui: Arc<dyn Ui>,
}

impl SaveCommand {
    pub fn new(ctx: &CommandContext) -> Result<Self, ConstructionError> {
        Ok(Self { ui: ctx.ui() })
    }
}

#[async_trait]
impl Command for SaveCommand {
    fn synopsis(&self) -> String {
        SYNOPSIS.to_string()
    }

    fn help(&self) -> String {
        usage::<SaveArgs>("snapshot save")
    }

    async fn run(&mut self, args: Vec<String>) -> i32 {
        let args = match parse_args::<SaveArgs>("snapshot save", args, self.ui.as_ref()) {
            Ok(args) => args,
            Err(code) => return code,
        };

        let saved = tokio::task::spawn_blocking(move || {
            save_snapshot(&args.source, &args.destination)
        })
        .await;

        match saved {
            Ok(Ok(saved)) => {
                tracing::info!(path = %saved.path.display(), bytes = saved.bytes, "Snapshot saved");
                self.ui.output(&format!(
                    "Saved and verified snapshot to {}",
                    saved.path.display()
                ));
                self.ui.output(&format!("SHA-256: {}", saved.sha256));
                0
            }
            Ok(Err(e)) => {
                self.ui.error(&format!("Error saving snapshot: {e:#}"));
                1
            }
            Err(e) => {
                self.ui.error(&format!("Error saving snapshot: {e}"));
                1
            }
        }
    }
}
