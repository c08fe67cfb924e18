//! Built-in commands
//!
//! Every command Keel ships is registered here, in one table. Factories
//! capture a clone of the process [`CommandContext`]; long-running commands
//! take their shutdown channel while they are being constructed, so a
//! command that reaches `run` is always wired for shutdown.

pub mod agent;
pub mod configtest;
pub mod exec;
pub mod info;
pub mod monitor;
pub mod snapshot;
pub mod version;
pub mod watch;

use clap::Parser;
use clap::error::ErrorKind;
use keel_core::commands::ParentCommand;
use keel_core::error::{ConstructionError, RegistryError};
use keel_core::{Command, CommandContext, CommandDescriptor, CommandRegistry, Ui};

/// Build the command table for this process
pub fn table(ctx: &CommandContext) -> Result<CommandRegistry, RegistryError> {
    let mut registry = CommandRegistry::new();

    entry(&mut registry, ctx, "agent", agent::SYNOPSIS, |ctx| {
        boxed(agent::AgentCommand::new(ctx))
    })?;
    entry(&mut registry, ctx, "configtest", configtest::SYNOPSIS, |ctx| {
        boxed(configtest::ConfigTestCommand::new(ctx))
    })?;
    entry(&mut registry, ctx, "exec", exec::SYNOPSIS, |ctx| {
        boxed(exec::ExecCommand::new(ctx))
    })?;
    entry(&mut registry, ctx, "info", info::SYNOPSIS, |ctx| {
        boxed(info::InfoCommand::new(ctx))
    })?;
    entry(&mut registry, ctx, "monitor", monitor::SYNOPSIS, |ctx| {
        boxed(monitor::MonitorCommand::new(ctx))
    })?;
    entry(&mut registry, ctx, "snapshot", snapshot::SYNOPSIS, |_| {
        Ok(Box::new(ParentCommand::new(snapshot::SYNOPSIS, snapshot::HELP)))
    })?;
    entry(
        &mut registry,
        ctx,
        "snapshot inspect",
        snapshot::inspect::SYNOPSIS,
        |ctx| boxed(snapshot::inspect::InspectCommand::new(ctx)),
    )?;
    entry(
        &mut registry,
        ctx,
        "snapshot save",
        snapshot::save::SYNOPSIS,
        |ctx| boxed(snapshot::save::SaveCommand::new(ctx)),
    )?;
    entry(&mut registry, ctx, "version", version::SYNOPSIS, |ctx| {
        boxed(version::VersionCommand::new(ctx))
    })?;
    entry(&mut registry, ctx, "watch", watch::SYNOPSIS, |ctx| {
        boxed(watch::WatchCommand::new(ctx))
    })?;

    Ok(registry)
}

fn entry<F>(
    registry: &mut CommandRegistry,
    ctx: &CommandContext,
    name: &str,
    synopsis: &str,
    build: F,
) -> Result<(), RegistryError>
where
    F: Fn(&CommandContext) -> Result<Box<dyn Command>, ConstructionError> + Send + Sync + 'static,
{
    let ctx = ctx.clone();
    registry.add(CommandDescriptor::new(name, move || build(&ctx)).with_synopsis(synopsis))
}

fn boxed<C: Command + 'static>(
    command: Result<C, ConstructionError>,
) -> Result<Box<dyn Command>, ConstructionError> {
    command.map(|command| Box::new(command) as Box<dyn Command>)
}

/// Parse a command's arguments with clap.
///
/// On `Err` the message has already been written to the UI and the value is
/// the exit code to return: 0 for `--help`, 1 for anything else.
pub(crate) fn parse_args<T: Parser>(name: &str, args: Vec<String>, ui: &dyn Ui) -> Result<T, i32> {
    let argv = std::iter::once(format!("keel {name}")).chain(args);
    T::try_parse_from(argv).map_err(|e| {
        let rendered = e.render().to_string();
        match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                ui.output(rendered.trim_end());
                0
            }
            _ => {
                ui.error(rendered.trim_end());
                1
            }
        }
    })
}

/// Full clap-rendered help for a command's arguments
pub(crate) fn usage<T: clap::CommandFactory>(name: &str) -> String {
    let mut command = T::command().bin_name(format!("keel {name}"));
    command.render_long_help().to_string()
}

#[cfg(test)]
pub(crate) mod testing {
    use keel_core::shutdown::{ManualSignalSource, ShutdownBroadcaster};
    use keel_core::{BufferUi, CommandContext, KeelConfig};
    use std::sync::Arc;

    /// A context writing to a buffer, driven by a manual signal source
    pub(crate) fn context(config: KeelConfig) -> (Arc<BufferUi>, ManualSignalSource, CommandContext) {
        let ui = Arc::new(BufferUi::new());
        let source = ManualSignalSource::new();
        let broadcaster = ShutdownBroadcaster::new(source.clone())
            .with_capacity(config.shutdown.channel_capacity);
        let ctx = CommandContext::new(ui.clone(), broadcaster, Arc::new(config));
        (ui, source, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keel_core::KeelConfig;

    #[derive(Parser, Debug)]
    #[command(about = "Test arguments")]
    struct Args {
        #[arg(long)]
        count: Option<u32>,
    }

    #[tokio::test]
    async fn test_table_registers_every_builtin() {
        let (_ui, _source, ctx) = testing::context(KeelConfig::default());
        let registry = table(&ctx).unwrap();

        let names: Vec<&str> = registry.names().collect();
        assert_eq!(
            names,
            vec![
                "agent",
                "configtest",
                "exec",
                "info",
                "monitor",
                "snapshot",
                "snapshot inspect",
                "snapshot save",
                "version",
                "watch",
            ]
        );
        assert!(registry.names().all(|name| registry.synopsis(name).is_some()));
        assert_eq!(ctx.broadcaster().active_listeners(), 0);
    }

    #[test]
    fn test_parse_args_reports_errors() {
        let ui = keel_core::BufferUi::new();
        let parsed = parse_args::<Args>("test", vec!["--count".into(), "3".into()], &ui).unwrap();
        assert_eq!(parsed.count, Some(3));

        let code = parse_args::<Args>("test", vec!["--bogus".into()], &ui).unwrap_err();
        assert_eq!(code, 1);
        assert!(ui.error_text().contains("--bogus"));
    }

    #[test]
    fn test_parse_args_help_exits_zero() {
        let ui = keel_core::BufferUi::new();
        let code = parse_args::<Args>("test", vec!["--help".into()], &ui).unwrap_err();
        assert_eq!(code, 0);
        assert!(ui.output_text().contains("keel test"));
    }

    #[test]
    fn test_usage_names_the_command() {
        let help = usage::<Args>("snapshot save");
        assert!(help.contains("Usage: keel snapshot save"));
        assert!(help.contains("--count"));
    }
}
