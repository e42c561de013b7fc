use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use gantry::settings::{ENV_CUSTOM, ENV_WORK_DIR};
use gantry::{Action, App, AppBuilder, CliError, CommandNode, StringFlag};

type Output = Arc<Mutex<Vec<u8>>>;

fn commands(builder: AppBuilder) -> AppBuilder {
    builder
        .command(
            CommandNode::new("web", "Start the web server")
                .flag(StringFlag::new("port", &["p"], "Port").with_default("3000"))
                .action(Action::run(|ctx| {
                    let port = ctx.string("port").unwrap_or_default();
                    writeln!(ctx.writer(), "web on {port}")?;
                    Ok(())
                })),
        )
        .command(
            CommandNode::new("admin", "Administrative operations").child(
                CommandNode::new("user", "Modify users").child(
                    CommandNode::new("create", "Create a user")
                        .action(Action::run(|ctx| {
                            writeln!(ctx.writer(), "created")?;
                            Ok(())
                        })),
                ),
            ),
        )
        .command(
            CommandNode::new("convert", "Legacy conversion")
                .hidden()
                .action(Action::run(|_| Ok(()))),
        )
}

fn build(app_path: &Path) -> (App, Output) {
    build_with_env(app_path, |_| None)
}

fn build_with_env<F>(app_path: &Path, env: F) -> (App, Output)
where
    F: Fn(&str) -> Option<String> + Send + Sync + 'static,
{
    let output: Output = Arc::new(Mutex::new(Vec::new()));
    let app = commands(App::builder("gantry"))
        .version("1.2.3")
        .app_path(app_path)
        .env_lookup(env)
        .writer(output.clone())
        .build()
        .unwrap();
    (app, output)
}

fn text(output: &Output) -> String {
    String::from_utf8(output.lock().clone()).unwrap()
}

fn conf(app: &App) -> PathBuf {
    app.paths().unwrap().custom_conf.clone()
}

#[test]
fn test_nearest_config_wins() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _) = build(&dir.path().join("gantry"));
    app.run([
        "gantry",
        "--config",
        "/tmp/a.ini",
        "web",
        "--config",
        "/tmp/b.ini",
    ])
    .unwrap();
    assert_eq!(conf(&app), PathBuf::from("/tmp/b.ini"));
}

#[test]
fn test_root_config_used_when_leaf_is_silent() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _) = build(&dir.path().join("gantry"));
    app.run(["gantry", "--config", "/tmp/a.ini", "web"]).unwrap();
    assert_eq!(conf(&app), PathBuf::from("/tmp/a.ini"));
}

#[test]
fn test_middle_level_beats_root() {
    let dir = tempfile::tempdir().unwrap();
    let (app, output) = build(&dir.path().join("gantry"));
    app.run([
        "gantry", "-c", "/tmp/root.ini", "admin", "-c", "/tmp/admin.ini", "user", "create",
    ])
    .unwrap();
    assert_eq!(conf(&app), PathBuf::from("/tmp/admin.ini"));
    assert_eq!(text(&output), "created\n");
}

#[test]
fn test_paths_default_next_to_binary() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _) = build(&dir.path().join("gantry"));
    app.run(["gantry", "web"]).unwrap();
    let paths = app.paths().unwrap();
    assert_eq!(paths.work_path, dir.path());
    assert_eq!(paths.custom_path, dir.path().join("custom"));
    assert_eq!(paths.custom_conf, dir.path().join("custom/conf/app.ini"));
}

#[test]
fn test_environment_fills_unset_flags() {
    let dir = tempfile::tempdir().unwrap();
    let work = dir.path().to_string_lossy().to_string();
    let (app, _) = build_with_env(Path::new("/nowhere/gantry"), move |key| match key {
        ENV_WORK_DIR => Some(work.clone()),
        ENV_CUSTOM => Some("site".to_string()),
        _ => None,
    });
    app.run(["gantry", "web", "--custom-path", "/srv/custom"]).unwrap();
    let paths = app.paths().unwrap();
    assert_eq!(paths.work_path, dir.path());
    assert_eq!(paths.custom_path, PathBuf::from("/srv/custom"));
}

#[test]
fn test_paths_initialized_once() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _) = build(&dir.path().join("gantry"));
    app.run(["gantry", "web", "--config", "/tmp/first.ini"]).unwrap();
    app.run(["gantry", "web", "--config", "/tmp/second.ini"]).unwrap();
    assert_eq!(conf(&app), PathBuf::from("/tmp/first.ini"));
}

#[test]
fn test_flag_defaults_reach_handler() {
    let dir = tempfile::tempdir().unwrap();
    let (app, output) = build(&dir.path().join("gantry"));
    app.run(["gantry", "web"]).unwrap();
    app.run(["gantry", "web", "-p", "8080"]).unwrap();
    assert_eq!(text(&output), "web on 3000\nweb on 8080\n");
}

#[test]
fn test_app_help_lists_commands() {
    let dir = tempfile::tempdir().unwrap();
    let (app, output) = build(&dir.path().join("gantry"));
    app.run(["gantry", "help"]).unwrap();
    let out = text(&output);
    assert!(out.contains("Usage: gantry [OPTIONS]"), "{out}");
    assert!(out.contains("web"));
    assert!(out.contains("admin"));
    assert!(!out.contains("Legacy conversion"));
    assert!(out.contains("DEFAULT CONFIGURATION:"));
    assert!(out.contains(&format!(
        "ConfigFile: {}",
        dir.path().join("custom/conf/app.ini").display()
    )));
}

#[test]
fn test_help_on_subcommand() {
    let dir = tempfile::tempdir().unwrap();
    let (app, output) = build(&dir.path().join("gantry"));
    app.run(["gantry", "web", "help"]).unwrap();
    let out = text(&output);
    assert!(out.contains("Usage: gantry web"), "{out}");
    assert!(out.contains("--port"));
    assert!(out.contains("--work-path"));
    assert!(out.contains("DEFAULT CONFIGURATION:"));
}

#[test]
fn test_help_at_depth_three() {
    let dir = tempfile::tempdir().unwrap();
    let (app, output) = build(&dir.path().join("gantry"));
    app.run(["gantry", "admin", "user", "help"]).unwrap();
    let out = text(&output);
    assert!(out.contains("Usage: gantry admin user"), "{out}");
    assert!(out.contains("create"));
    assert!(out.trim_end().ends_with(&format!(
        "ConfigFile: {}",
        dir.path().join("custom/conf/app.ini").display()
    )));
}

#[test]
fn test_help_topic() {
    let dir = tempfile::tempdir().unwrap();
    let (app, output) = build(&dir.path().join("gantry"));
    app.run(["gantry", "h", "web"]).unwrap();
    assert!(text(&output).contains("Usage: gantry web"));
}

#[test]
fn test_help_flag_shows_command_help() {
    let dir = tempfile::tempdir().unwrap();
    let (app, output) = build(&dir.path().join("gantry"));
    app.run(["gantry", "admin", "user", "create", "--help"]).unwrap();
    let out = text(&output);
    assert!(out.contains("Usage: gantry admin user create"), "{out}");
    assert!(!out.contains("created"));
}

#[test]
fn test_group_without_handler_shows_help() {
    let dir = tempfile::tempdir().unwrap();
    let (app, output) = build(&dir.path().join("gantry"));
    app.run(["gantry", "admin"]).unwrap();
    let out = text(&output);
    assert!(out.contains("Usage: gantry admin"), "{out}");
    assert!(out.contains("DEFAULT CONFIGURATION:"));
}

#[test]
fn test_unknown_help_topic_still_reports_paths() {
    let dir = tempfile::tempdir().unwrap();
    let (app, output) = build(&dir.path().join("gantry"));
    let err = app.run(["gantry", "help", "nope"]).unwrap_err();
    assert!(matches!(err, CliError::UnknownHelpTopic(ref topic) if topic == "nope"));
    assert!(text(&output).contains("DEFAULT CONFIGURATION:"));
}

#[test]
fn test_default_command() {
    let dir = tempfile::tempdir().unwrap();
    let output: Output = Arc::new(Mutex::new(Vec::new()));
    let app = commands(App::builder("gantry"))
        .default_command("web")
        .app_path(dir.path().join("gantry"))
        .writer(output.clone())
        .build()
        .unwrap();
    app.run(["gantry", "--config", "/tmp/a.ini"]).unwrap();
    assert_eq!(text(&output), "web on 3000\n");
    assert_eq!(conf(&app), PathBuf::from("/tmp/a.ini"));
}

#[test]
fn test_unknown_default_command() {
    let err = commands(App::builder("gantry"))
        .default_command("serve")
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, CliError::UnknownDefaultCommand(ref name) if name == "serve"));
}

#[test]
fn test_version() {
    let dir = tempfile::tempdir().unwrap();
    let (app, output) = build(&dir.path().join("gantry"));
    app.run(["gantry", "--version"]).unwrap();
    assert_eq!(text(&output), "gantry version 1.2.3\n");
}

#[test]
fn test_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _) = build(&dir.path().join("gantry"));
    let err = app.run(["gantry", "nope"]).unwrap_err();
    assert!(matches!(err, CliError::Clap(_)));
}

#[test]
fn test_handler_error_propagates() {
    let dir = tempfile::tempdir().unwrap();
    let app = App::builder("gantry")
        .command(
            CommandNode::new("fail", "Always fails")
                .action(Action::run(|_| Err(CliError::Handler("boom".into())))),
        )
        .app_path(dir.path().join("gantry"))
        .writer(Arc::new(Mutex::new(Vec::new())))
        .build()
        .unwrap();
    let err = app.run(["gantry", "fail"]).unwrap_err();
    assert_eq!(err.to_string(), "boom");
}

#[test]
fn test_app_named_help_has_no_target() {
    let dir = tempfile::tempdir().unwrap();
    let app = App::builder("help")
        .app_path(dir.path().join("help"))
        .writer(Arc::new(Mutex::new(Vec::new())))
        .build()
        .unwrap();
    let err = app.run(["help"]).unwrap_err();
    assert!(matches!(err, CliError::MalformedLineage(_)));
}

#[test]
fn test_identical_input_builds_identical_trees() {
    let shape = |app: &App| -> Vec<(String, Vec<String>)> {
        app.root()
            .all_nodes()
            .into_iter()
            .map(|node| {
                (
                    node.name.clone(),
                    node.flag_names().into_iter().map(String::from).collect(),
                )
            })
            .collect()
    };
    let first = commands(App::builder("gantry")).build().unwrap();
    let second = commands(App::builder("gantry")).build().unwrap();
    assert_eq!(shape(&first), shape(&second));
}

#[test]
fn test_reused_global_short_option_fails_build() {
    let err = App::builder("gantry")
        .command(
            CommandNode::new("dump", "Dump the database")
                .flag(StringFlag::new("count", &["c"], "Rows to dump")),
        )
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, CliError::InvalidFlags));
}

#[test]
fn test_every_built_node_is_runnable() {
    let app = commands(App::builder("gantry")).build().unwrap();
    for node in app.root().all_nodes() {
        assert!(node.action.is_runnable(), "{} was not wrapped", node.name);
    }
}

#[test]
fn test_completion_script() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _) = build(&dir.path().join("gantry"));
    let mut script = Vec::new();
    app.generate_completion(clap_complete::Shell::Bash, &mut script);
    let script = String::from_utf8(script).unwrap();
    assert!(script.contains("gantry"));
    assert!(script.contains("web"));
    assert!(script.contains("--work-path"));
}

#[test]
fn test_completion_from_handler() {
    let dir = tempfile::tempdir().unwrap();
    let output: Output = Arc::new(Mutex::new(Vec::new()));
    let app = commands(App::builder("gantry"))
        .command(
            CommandNode::new("completion", "Print completions").action(Action::run(|ctx| {
                ctx.write_completion(clap_complete::Shell::Fish);
                Ok(())
            })),
        )
        .app_path(dir.path().join("gantry"))
        .writer(output.clone())
        .build()
        .unwrap();
    app.run(["gantry", "completion"]).unwrap();
    let out = text(&output);
    assert!(out.contains("complete -c gantry"), "{out}");
}
