//! Command routing
//!
//! Resolves argv against the command registry and runs the matching command.
//! The registry only matches whole names, so the router tries the longest run
//! of leading non-flag tokens first and shortens it until a name matches.

use keel_core::error::{EXIT_FAILURE, EXIT_NOT_FOUND, RegistryError};
use keel_core::{CommandRegistry, RUN_RESULT_HELP, Ui};

const BINARY: &str = "keel";

/// Find the registered name matching the leading tokens of `args`.
///
/// Returns the name and the number of tokens it consumed.
pub fn resolve(registry: &CommandRegistry, args: &[String]) -> Option<(String, usize)> {
    let words = args
        .iter()
        .take_while(|arg| !arg.starts_with('-'))
        .count();

    (1..=words).rev().find_map(|len| {
        let name = args[..len].join(" ");
        registry.contains(&name).then_some((name, len))
    })
}

/// Run one command line and return the process exit code
pub async fn dispatch(registry: &CommandRegistry, ui: &dyn Ui, args: Vec<String>) -> i32 {
    let Some(first) = args.first() else {
        ui.error(&root_help(registry));
        return EXIT_FAILURE;
    };

    match first.as_str() {
        "-h" | "--help" | "-help" | "help" => {
            ui.output(&root_help(registry));
            return 0;
        }
        "-v" | "--version" | "-version" => {
            return run_named(registry, ui, "version", Vec::new()).await;
        }
        _ => {}
    }

    let Some((name, consumed)) = resolve(registry, &args) else {
        ui.error(&format!("{BINARY}: unknown command '{first}'"));
        ui.error(&format!("Run '{BINARY} --help' for a list of commands."));
        return EXIT_NOT_FOUND;
    };

    let rest: Vec<String> = args.into_iter().skip(consumed).collect();
    if wants_help(&rest) {
        return match registry.construct(&name) {
            Ok(command) => {
                ui.output(&command_help(registry, &name, &command.help()));
                0
            }
            Err(e) => report(ui, &name, e),
        };
    }

    run_named(registry, ui, &name, rest).await
}

async fn run_named(registry: &CommandRegistry, ui: &dyn Ui, name: &str, args: Vec<String>) -> i32 {
    let mut command = match registry.construct(name) {
        Ok(command) => command,
        Err(e) => return report(ui, name, e),
    };

    tracing::info!(command = name, "Running command");
    let code = command.run(args).await;
    tracing::debug!(command = name, code, "Command finished");

    if code == RUN_RESULT_HELP {
        ui.error(&command_help(registry, name, &command.help()));
        return EXIT_FAILURE;
    }
    code
}

fn report(ui: &dyn Ui, name: &str, error: RegistryError) -> i32 {
    match &error {
        RegistryError::Construction(e) => {
            ui.error(&format!("Error constructing command '{name}': {e}"));
        }
        other => ui.error(&format!("{BINARY}: {other}")),
    }
    error.exit_code()
}

/// `-h`/`--help` among the command's own flags, ignoring anything after `--`
fn wants_help(args: &[String]) -> bool {
    args.iter()
        .take_while(|arg| arg.as_str() != "--")
        .any(|arg| matches!(arg.as_str(), "-h" | "--help" | "-help"))
}

/// Top-level usage with every root command and its synopsis
pub fn root_help(registry: &CommandRegistry) -> String {
    let mut help = format!("Usage: {BINARY} [--version] [--help] <command> [<args>]\n\n");
    help.push_str("Available commands are:\n");
    help.push_str(&listing(registry, registry.top_level_names()));
    help
}

/// A command's own help followed by its direct subcommands, if any
pub fn command_help(registry: &CommandRegistry, name: &str, help: &str) -> String {
    let mut text = help.trim_end().to_string();
    let children = registry.children(name);
    if !children.is_empty() {
        text.push_str("\n\nSubcommands:\n");
        let prefix = format!("{name} ");
        let listed = children
            .iter()
            .map(|&child| (child.strip_prefix(prefix.as_str()).unwrap_or(child), child))
            .collect::<Vec<_>>();
        text.push_str(&aligned(registry, &listed));
    }
    text
}

fn listing(registry: &CommandRegistry, names: Vec<&str>) -> String {
    let pairs = names.iter().map(|name| (*name, *name)).collect::<Vec<_>>();
    aligned(registry, &pairs)
}

/// One `label  synopsis` row per entry, with the synopses in one column
fn aligned(registry: &CommandRegistry, entries: &[(&str, &str)]) -> String {
    let width = entries.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    entries
        .iter()
        .map(|(label, name)| {
            let synopsis = registry.synopsis(name).unwrap_or_default();
            format!("    {label:<width$}    {synopsis}").trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use keel_core::error::ConstructionError;
    use keel_core::{BufferUi, Command, CommandDescriptor};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fixed {
        code: i32,
    }

    #[async_trait]
    impl Command for Fixed {
        fn synopsis(&self) -> String {
            "Fixed exit code".to_string()
        }

        fn help(&self) -> String {
            "Usage: keel fixed".to_string()
        }

        async fn run(&mut self, _args: Vec<String>) -> i32 {
            self.code
        }
    }

    fn registry() -> CommandRegistry {
        let mut registry = CommandRegistry::new();
        for (name, code) in [
            ("version", 0),
            ("snapshot", RUN_RESULT_HELP),
            ("snapshot save", 0),
            ("snapshot inspect", 3),
        ] {
            registry
                .add(
                    CommandDescriptor::new(name, move || Ok(Box::new(Fixed { code })))
                        .with_synopsis(format!("About {name}")),
                )
                .unwrap();
        }
        registry
            .register("broken", || {
                Err(ConstructionError::new("broken", "no signal handler"))
            })
            .unwrap();
        registry
    }

    fn args(line: &str) -> Vec<String> {
        line.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_resolve_prefers_longest_name() {
        let registry = registry();
        assert_eq!(
            resolve(&registry, &args("snapshot save a b")),
            Some(("snapshot save".to_string(), 2))
        );
        assert_eq!(
            resolve(&registry, &args("snapshot restore")),
            Some(("snapshot".to_string(), 1))
        );
    }

    #[test]
    fn test_resolve_stops_at_flags() {
        let registry = registry();
        assert_eq!(
            resolve(&registry, &args("snapshot --force save")),
            Some(("snapshot".to_string(), 1))
        );
        assert_eq!(resolve(&registry, &args("--force snapshot")), None);
        assert_eq!(resolve(&registry, &args("snap")), None);
    }

    #[tokio::test]
    async fn test_no_args_prints_root_help() {
        let registry = registry();
        let ui = BufferUi::new();
        assert_eq!(dispatch(&registry, &ui, Vec::new()).await, 1);
        let text = ui.error_text();
        assert!(text.starts_with("Usage: keel"));
        assert!(text.contains("About version"));
        assert!(!text.contains("snapshot save"));
    }

    #[tokio::test]
    async fn test_help_flag_exits_zero() {
        let registry = registry();
        let ui = BufferUi::new();
        assert_eq!(dispatch(&registry, &ui, args("--help")).await, 0);
        assert!(ui.output_text().contains("Available commands are:"));
    }

    #[tokio::test]
    async fn test_unknown_command_is_127() {
        let registry = registry();
        let ui = BufferUi::new();
        assert_eq!(dispatch(&registry, &ui, args("frobnicate")).await, 127);
        assert!(ui.error_text().contains("unknown command 'frobnicate'"));
    }

    #[tokio::test]
    async fn test_parent_command_lists_children() {
        let registry = registry();
        let ui = BufferUi::new();
        assert_eq!(dispatch(&registry, &ui, args("snapshot")).await, 1);
        let text = ui.error_text();
        assert!(text.contains("Subcommands:"));
        assert!(text.contains("inspect"));
        assert!(text.contains("About snapshot save"));
    }

    #[tokio::test]
    async fn test_child_exit_code_passes_through() {
        let registry = registry();
        let ui = BufferUi::new();
        assert_eq!(
            dispatch(&registry, &ui, args("snapshot inspect file.snap")).await,
            3
        );
    }

    #[tokio::test]
    async fn test_command_help_flag_before_separator_only() {
        let registry = registry();
        let ui = BufferUi::new();
        assert_eq!(dispatch(&registry, &ui, args("version -h")).await, 0);
        assert_eq!(ui.output_text(), "Usage: keel fixed");

        let ui = BufferUi::new();
        assert_eq!(dispatch(&registry, &ui, args("version -- -h")).await, 0);
        assert!(ui.output_text().is_empty());
    }

    #[tokio::test]
    async fn test_construction_error_is_reported() {
        let registry = registry();
        let ui = BufferUi::new();
        assert_eq!(dispatch(&registry, &ui, args("broken")).await, 1);
        assert_eq!(
            ui.error_text(),
            "Error constructing command 'broken': no signal handler"
        );
    }

    #[tokio::test]
    async fn test_version_flag_runs_version_command() {
        let constructed = Arc::new(AtomicUsize::new(0));
        let counter = constructed.clone();
        let mut registry = CommandRegistry::new();
        registry
            .register("version", move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Box::new(Fixed { code: 0 }))
            })
            .unwrap();

        let ui = BufferUi::new();
        assert_eq!(dispatch(&registry, &ui, args("--version")).await, 0);
        assert_eq!(constructed.load(Ordering::SeqCst), 1);
    }
}
