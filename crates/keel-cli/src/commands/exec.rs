//! `keel exec` - run a local process until it exits or Keel is asked to stop

use super::{parse_args, usage};
use anyhow::Context;
use async_trait::async_trait;
use clap::Parser;
use keel_core::error::ConstructionError;
use keel_core::{Command, CommandContext, ShutdownReceiver, Ui};
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

pub const SYNOPSIS: &str = "Executes a command and streams its output";

/// Exit status when the child was killed because of a shutdown event
const EXIT_INTERRUPTED: i32 = 2;

/// How long output may keep flowing after the child was killed
const DRAIN_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Parser, Debug)]
#[command(about = SYNOPSIS)]
struct ExecArgs {
    /// Program and arguments to run
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
}

enum Outcome {
    Exited(std::io::Result<ExitStatus>),
    Shutdown,
}

pub struct ExecCommand {
    ui: Arc<dyn Ui>,
    shutdown: ShutdownReceiver,
}

impl ExecCommand {
    pub fn new(ctx: &CommandContext) -> Result<Self, ConstructionError> {
        Ok(Self {
            ui: ctx.ui(),
            shutdown: ctx.shutdown_channel("exec")?,
        })
    }

    fn spawn(command: &[String]) -> anyhow::Result<Child> {
        let (program, args) = command.split_first().context("no command given")?;

        let mut process = tokio::process::Command::new(program);
        process
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        // A group of its own lets shutdown reach every descendant.
        #[cfg(unix)]
        process.process_group(0);

        process
            .spawn()
            .with_context(|| format!("failed to start '{program}'"))
    }

    /// Kill the child together with anything it started
    async fn terminate(child: &mut Child) {
        kill_group(child);
        if let Err(e) = child.kill().await {
            tracing::warn!("Failed to kill child process: {}", e);
        }
    }

    /// Wait for the output forwarders, giving up at `deadline` if one is set.
    ///
    /// Descendants that escaped the kill may hold the pipes open forever.
    async fn drain(forwarders: Vec<JoinHandle<()>>, deadline: Option<Instant>) {
        for mut forwarder in forwarders {
            let joined = match deadline {
                Some(deadline) => match time::timeout_at(deadline, &mut forwarder).await {
                    Ok(joined) => joined,
                    Err(_) => {
                        tracing::warn!("Child output still open after shutdown, abandoning it");
                        forwarder.abort();
                        continue;
                    }
                },
                None => forwarder.await,
            };
            if let Err(e) = joined {
                tracing::warn!("Output forwarder failed: {}", e);
            }
        }
    }

    /// Copy every line of `reader` to the UI until EOF
    fn forward<R>(ui: Arc<dyn Ui>, reader: R, to_error: bool) -> JoinHandle<()>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        tokio::spawn(async move {
            let mut lines = BufReader::new(reader).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) if to_error => ui.error(&line),
                    Ok(Some(line)) => ui.output(&line),
                    Ok(None) => break,
                    Err(e) => {
                        tracing::warn!("Failed to read child output: {}", e);
                        break;
                    }
                }
            }
        })
    }
}

#[async_trait]
impl Command for ExecCommand {
    fn synopsis(&self) -> String {
        SYNOPSIS.to_string()
    }

    fn help(&self) -> String {
        usage::<ExecArgs>("exec")
    }

    async fn run(&mut self, args: Vec<String>) -> i32 {
        let args = match parse_args::<ExecArgs>("exec", args, self.ui.as_ref()) {
            Ok(args) => args,
            Err(code) => return code,
        };

        let mut child = match Self::spawn(&args.command) {
            Ok(child) => child,
            Err(e) => {
                self.ui.error(&format!("Error: {e:#}"));
                return 1;
            }
        };
        tracing::info!(command = ?args.command, pid = ?child.id(), "Started child process");

        let mut forwarders = Vec::new();
        if let Some(stdout) = child.stdout.take() {
            forwarders.push(Self::forward(self.ui.clone(), stdout, false));
        }
        if let Some(stderr) = child.stderr.take() {
            forwarders.push(Self::forward(self.ui.clone(), stderr, true));
        }

        let outcome = tokio::select! {
            status = child.wait() => Outcome::Exited(status),
            Some(()) = self.shutdown.recv() => Outcome::Shutdown,
        };

        let (code, deadline) = match outcome {
            Outcome::Exited(Ok(status)) => (status.code().unwrap_or(1), None),
            Outcome::Exited(Err(e)) => {
                self.ui.error(&format!("Error waiting for command: {e}"));
                (1, None)
            }
            Outcome::Shutdown => {
                self.ui.error("==> Caught signal, terminating command");
                Self::terminate(&mut child).await;
                (EXIT_INTERRUPTED, Some(Instant::now() + DRAIN_TIMEOUT))
            }
        };

        Self::drain(forwarders, deadline).await;
        code
    }
}

#[cfg(unix)]
fn kill_group(child: &Child) {
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    let Some(pid) = child.id().and_then(|pid| i32::try_from(pid).ok()) else {
        return;
    };
    if let Err(e) = killpg(Pid::from_raw(pid), Signal::SIGKILL) {
        tracing::warn!("Failed to kill process group {}: {}", pid, e);
    }
}

#[cfg(not(unix))]
fn kill_group(_child: &Child) {}
