//! End-to-end dispatch through the full command table

use keel_cli::App;
use keel_core::shutdown::ManualSignalSource;
use keel_core::{BufferUi, KeelConfig, RegistryError, VERSION};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::time;

fn app(config: KeelConfig) -> (App, Arc<BufferUi>, ManualSignalSource) {
    let ui = Arc::new(BufferUi::new());
    let source = ManualSignalSource::new();
    let app = App::with_parts(config, ui.clone(), source.clone()).unwrap();
    (app, ui, source)
}

fn args(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

fn fast_agent() -> KeelConfig {
    let mut config = KeelConfig::default();
    config.agent.heartbeat_interval = Duration::from_millis(20);
    config.agent.graceful_timeout = Duration::from_secs(2);
    config
}

#[tokio::test]
async fn every_builtin_constructs_and_only_long_running_ones_listen() {
    let (app, _ui, source) = app(KeelConfig::default());
    let registry = app.registry();
    let broadcaster = app.context().broadcaster();

    let long_running = ["agent", "exec", "monitor", "watch"];
    let names: Vec<String> = registry.names().map(str::to_string).collect();
    for name in &names {
        let before = broadcaster.active_listeners();
        let command = registry.construct(name).unwrap();
        assert!(!command.synopsis().is_empty(), "{name} has no synopsis");

        let spawned = broadcaster.active_listeners() - before;
        let expected = usize::from(long_running.contains(&name.as_str()));
        assert_eq!(spawned, expected, "listeners spawned by {name}");
    }
    assert_eq!(source.subscriber_count(), long_running.len());
}

#[tokio::test]
async fn hierarchical_names_resolve_independently() {
    let (app, _ui, _source) = app(KeelConfig::default());
    let registry = app.registry();

    let parent = registry.construct("snapshot").unwrap();
    let child = registry.construct("snapshot save").unwrap();
    assert_ne!(parent.synopsis(), child.synopsis());

    for missing in ["snap", "snapshot sav", "save", "snapshot save now", ""] {
        assert!(matches!(
            registry.lookup(missing),
            Err(RegistryError::NotFound { .. })
        ));
    }
}

#[tokio::test]
async fn version_command_and_flag() {
    let (app_a, ui, _source) = app(KeelConfig::default());
    assert_eq!(app_a.run(args("version")).await, 0);
    assert_eq!(ui.output_text(), format!("Keel v{VERSION}"));

    let (app_b, ui, _source) = app(KeelConfig::default());
    assert_eq!(app_b.run(args("--version")).await, 0);
    assert_eq!(ui.output_text(), format!("Keel v{VERSION}"));
}

#[tokio::test]
async fn unknown_command_exits_127() {
    let (app, ui, _source) = app(KeelConfig::default());
    assert_eq!(app.run(args("frobnicate now")).await, 127);
    assert!(ui.error_text().contains("unknown command 'frobnicate'"));
}

#[tokio::test]
async fn root_help_lists_top_level_commands() {
    let (app, ui, _source) = app(KeelConfig::default());
    assert_eq!(app.run(args("--help")).await, 0);

    let help = ui.output_text();
    assert!(help.starts_with("Usage: keel [--version] [--help] <command> [<args>]"));
    for name in ["agent", "configtest", "exec", "info", "monitor", "snapshot", "version", "watch"] {
        assert!(help.contains(&format!("    {name} ")), "{name} missing from help");
    }
    assert!(!help.contains("snapshot save"));
}

#[tokio::test]
async fn bare_parent_prints_children_and_fails() {
    let (app, ui, _source) = app(KeelConfig::default());
    assert_eq!(app.run(args("snapshot")).await, 1);

    let help = ui.error_text();
    assert!(help.starts_with("Usage: keel snapshot <subcommand>"));
    assert!(help.contains("Subcommands:"));
    assert!(help.contains("inspect"));
    assert!(help.contains("Saves a snapshot to a file"));
}

#[tokio::test]
async fn command_help_flag() {
    let (app, ui, _source) = app(KeelConfig::default());
    assert_eq!(app.run(args("snapshot save --help")).await, 0);
    assert!(ui.output_text().contains("Usage: keel snapshot save"));
}

#[tokio::test]
async fn snapshot_inspect_through_dispatcher() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.snap");
    std::fs::write(&path, b"abc").unwrap();

    let (app, ui, _source) = app(KeelConfig::default());
    let mut argv = args("snapshot inspect");
    argv.push(path.display().to_string());

    assert_eq!(app.run(argv).await, 0);
    assert!(
        ui.output_text()
            .contains("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad")
    );
}

#[tokio::test]
async fn agent_stops_gracefully_on_one_signal() {
    let (app, ui, source) = app(fast_agent());
    let task = tokio::spawn(app.run(args("agent")));

    time::sleep(Duration::from_millis(100)).await;
    assert_eq!(source.interrupt(), 1);

    let code = time::timeout(Duration::from_secs(5), task)
        .await
        .expect("agent did not stop")
        .unwrap();
    assert_eq!(code, 0);
    assert!(ui.output_text().contains("heartbeat #1"));
}

#[tokio::test]
async fn agent_forced_by_second_signal() {
    let (app, ui, source) = app(fast_agent());
    let task = tokio::spawn(app.run(args("agent")));

    time::sleep(Duration::from_millis(100)).await;
    source.interrupt();
    source.interrupt();

    let code = time::timeout(Duration::from_secs(5), task)
        .await
        .expect("agent did not stop")
        .unwrap();
    assert_eq!(code, 1);
    assert!(ui.error_text().contains("forcing exit"));
}

#[tokio::test]
async fn process_listeners_outlive_the_command() {
    let (app, _ui, source) = app(KeelConfig::default());
    let broadcaster = app.context().broadcaster().clone();
    let task = tokio::spawn(app.run(args("monitor --interval-ms 10")));

    time::sleep(Duration::from_millis(50)).await;
    source.interrupt();
    assert_eq!(task.await.unwrap(), 0);

    time::sleep(Duration::from_millis(50)).await;
    assert_eq!(broadcaster.active_listeners(), 1);
    assert_eq!(source.subscriber_count(), 1);
}

#[tokio::test]
async fn scoped_listeners_end_with_the_run() {
    let mut config = KeelConfig::default();
    config.shutdown.scoped_listeners = true;
    let (app, _ui, source) = app(config);
    let broadcaster = app.context().broadcaster().clone();
    let task = tokio::spawn(app.run(args("monitor --interval-ms 10")));

    time::sleep(Duration::from_millis(50)).await;
    source.interrupt();
    assert_eq!(task.await.unwrap(), 0);

    time::timeout(Duration::from_secs(5), async {
        while broadcaster.active_listeners() > 0 {
            time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("scoped listener still running");
}
