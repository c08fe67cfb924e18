//! `keel watch` - print filesystem changes under a path until shutdown

use super::{parse_args, usage};
use anyhow::Context;
use async_trait::async_trait;
use clap::Parser;
use keel_core::error::ConstructionError;
use keel_core::{Command, CommandContext, ShutdownReceiver, Ui};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;

pub const SYNOPSIS: &str = "Watches a path for changes";

#[derive(Parser, Debug)]
#[command(about = SYNOPSIS)]
struct WatchArgs {
    /// File or directory to watch
    path: PathBuf,

    /// Watch subdirectories as well
    #[arg(short, long)]
    recursive: bool,
}

pub struct WatchCommand {
    ui: Arc<dyn Ui>,
    recursive: bool,
    shutdown: ShutdownReceiver,
}

impl WatchCommand {
    pub fn new(ctx: &CommandContext) -> Result<Self, ConstructionError> {
        Ok(Self {
            ui: ctx.ui(),
            recursive: ctx.config().watch.recursive,
            shutdown: ctx.shutdown_channel("watch")?,
        })
    }

    /// Start a watcher that forwards events into a tokio channel
    fn start(
        path: &Path,
        mode: RecursiveMode,
    ) -> anyhow::Result<(RecommendedWatcher, mpsc::UnboundedReceiver<notify::Result<Event>>)> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let _ = tx.send(res);
        })
        .context("failed to create filesystem watcher")?;

        watcher
            .watch(path, mode)
            .with_context(|| format!("failed to watch '{}'", path.display()))?;
        Ok((watcher, rx))
    }
}

fn describe(kind: &EventKind) -> &'static str {
    match kind {
        EventKind::Create(_) => "created",
        EventKind::Modify(_) => "modified",
        EventKind::Remove(_) => "removed",
        EventKind::Access(_) => "accessed",
        EventKind::Any | EventKind::Other => "changed",
    }
}

fn render(event: &Event) -> String {
    let paths = event
        .paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!("{}: {}", describe(&event.kind), paths)
}

#[async_trait]
impl Command for WatchCommand {
    fn synopsis(&self) -> String {
        SYNOPSIS.to_string()
    }

    fn help(&self) -> String {
        usage::<WatchArgs>("watch")
    }

    async fn run(&mut self, args: Vec<String>) -> i32 {
        let args = match parse_args::<WatchArgs>("watch", args, self.ui.as_ref()) {
            Ok(args) => args,
            Err(code) => return code,
        };

        let mode = if args.recursive || self.recursive {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };

        // The watcher stops when dropped, so it must live until the loop ends.
        let (_watcher, mut events) = match Self::start(&args.path, mode) {
            Ok(started) => started,
            Err(e) => {
                self.ui.error(&format!("Error: {e:#}"));
                return 1;
            }
        };

        self.ui
            .output(&format!("==> Watching {} ({mode:?})", args.path.display()));

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(Ok(event)) => self.ui.output(&render(&event)),
                    Some(Err(e)) => self.ui.error(&format!("watch error: {e}")),
                    None => break,
                },
                _ = self.shutdown.recv() => break,
            }
        }

        self.ui.output("==> Watch stopped");
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing;
    use keel_core::KeelConfig;
    use notify::event::CreateKind;
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio::time;

    #[test]
    fn test_render_event() {
        let event = Event::new(EventKind::Create(CreateKind::File)).add_path(PathBuf::from("/tmp/a"));
        assert_eq!(render(&event), "created: /tmp/a");
        assert_eq!(describe(&EventKind::Other), "changed");
    }

    #[tokio::test]
    async fn test_missing_path_fails() {
        let dir = TempDir::new().unwrap();
        let (ui, _source, ctx) = testing::context(KeelConfig::default());
        let mut command = WatchCommand::new(&ctx).unwrap();

        let missing = dir.path().join("absent");
        let code = command.run(vec![missing.display().to_string()]).await;
        assert_eq!(code, 1);
        assert!(ui.error_text().contains("failed to watch"));
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_reports_changes_until_shutdown() {
        let dir = TempDir::new().unwrap();
        let (ui, source, ctx) = testing::context(KeelConfig::default());
        let mut command = WatchCommand::new(&ctx).unwrap();

        let path = dir.path().to_path_buf();
        let task = tokio::spawn(async move { command.run(vec![path.display().to_string()]).await });
        time::sleep(Duration::from_millis(200)).await;
        std::fs::write(dir.path().join("touched.txt"), "data").unwrap();

        let seen = time::timeout(Duration::from_secs(5), async {
            while !ui.output_text().contains("touched.txt") {
                time::sleep(Duration::from_millis(20)).await;
            }
        })
        .await;
        assert!(seen.is_ok(), "no event reported: {:?}", ui.lines());

        source.interrupt();
        let code = time::timeout(Duration::from_secs(5), task)
            .await
            .expect("watch did not stop")
            .unwrap();
        assert_eq!(code, 0);
        assert!(ui.output_text().ends_with("==> Watch stopped"));
    }
}
