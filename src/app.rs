//! Building the prepared command tree and running it against process arguments

use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use clap_complete::Shell;
use log::debug;
use parking_lot::Mutex;
use thiserror::Error;

use crate::commands::flag::{FLAG_HELP, FLAG_VERSION, global_flags};
use crate::commands::node::{Action, CommandNode};
use crate::commands::prepare::prepare_subcommand_with_config;
use crate::context::{Context, Frame};
use crate::help::help_command;
use crate::resolve::with_work_path_and_custom_conf;
use crate::settings::AppPaths;
use crate::validate::check_command_flags;

/// Errors raised while building or running the command tree
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Clap(#[from] clap::Error),
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed command lineage: {0}")]
    MalformedLineage(String),
    #[error("No help topic for '{0}'")]
    UnknownHelpTopic(String),
    #[error("default command `{0}` is not a registered command")]
    UnknownDefaultCommand(String),
    #[error("some command flags are incorrect, see the log for details")]
    InvalidFlags,
    #[error(transparent)]
    Handler(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Lookup of environment variables
pub type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Destination of help and handler output
pub type SharedWriter = Arc<Mutex<dyn Write + Send>>;

/// A prepared and validated command tree, ready to run
pub struct App {
    root: CommandNode,
    version: String,
    default_command: Option<String>,
    pub(crate) app_path: PathBuf,
    pub(crate) env: EnvLookup,
    pub(crate) writer: SharedWriter,
    pub(crate) paths: OnceLock<AppPaths>,
}

impl App {
    #[must_use]
    pub fn builder(name: &str) -> AppBuilder {
        AppBuilder::new(name)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.root.name
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    #[must_use]
    pub fn root(&self) -> &CommandNode {
        &self.root
    }

    /// Paths of this run, set by the first invoked command
    #[must_use]
    pub fn paths(&self) -> Option<&AppPaths> {
        self.paths.get()
    }

    /// Parser definition of the whole tree, with bin names propagated
    #[must_use]
    pub fn parser(&self) -> clap::Command {
        let mut parser = self
            .root
            .to_clap()
            .bin_name(self.root.name.clone())
            .subcommand_required(false);
        parser.build();
        parser
    }

    /// Write the completion script of the whole tree for `shell`
    pub fn generate_completion(&self, shell: Shell, out: &mut dyn Write) {
        let mut parser = self.parser();
        clap_complete::generate(shell, &mut parser, self.root.name.clone(), out);
    }

    /// Parse `args` (binary name first) and run the invoked command.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Clap` on usage errors, and otherwise whatever the
    /// invoked handler or the help dispatcher returns.
    pub fn run<I, T>(&self, args: I) -> Result<(), CliError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let mut args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        let parser = self.parser();
        let mut matches = parser.clone().try_get_matches_from(&args)?;

        if let Some(default) = &self.default_command
            && matches.subcommand().is_none()
            && !Frame::new(&self.root, &matches).bool(FLAG_HELP)
            && !Frame::new(&self.root, &matches).bool(FLAG_VERSION)
        {
            debug!("No command given, running default command `{default}`");
            args.insert(args.len().min(1), OsString::from(default));
            matches = parser.clone().try_get_matches_from(&args)?;
        }

        let lineage = self.lineage(&matches)?;
        let leaf = *lineage
            .first()
            .ok_or_else(|| CliError::MalformedLineage("empty lineage".to_string()))?;
        let ctx = Context::new(leaf, lineage, self, &parser);
        debug!("Running command `{}`", ctx.command().name);

        if ctx.bool(FLAG_VERSION) {
            writeln!(ctx.writer(), "{} version {}", self.name(), self.version)?;
            return Ok(());
        }
        match &ctx.command().action {
            Action::Run(handler) => handler(&ctx),
            // only for trees that skipped preparation, `build` wraps every node
            Action::ShowHelp => crate::help::show_help(&ctx),
        }
    }

    /// Follow the parsed subcommands down the tree, returning leaf to root
    fn lineage<'a>(&'a self, matches: &'a clap::ArgMatches) -> Result<Vec<Frame<'a>>, CliError> {
        let mut node = &self.root;
        let mut level = matches;
        let mut lineage = vec![Frame::new(node, level)];
        while let Some((name, sub_matches)) = level.subcommand() {
            node = node.find_child(name).ok_or_else(|| {
                CliError::MalformedLineage(format!(
                    "`{}` has no subcommand `{name}`",
                    node.name
                ))
            })?;
            level = sub_matches;
            lineage.push(Frame::new(node, level));
        }
        lineage.reverse();
        Ok(lineage)
    }
}

/// Assembles the application tree; `build` is the only way to obtain an `App`
pub struct AppBuilder {
    name: String,
    usage: String,
    version: String,
    commands: Vec<CommandNode>,
    default_command: Option<String>,
    app_path: Option<PathBuf>,
    env: EnvLookup,
    writer: SharedWriter,
}

impl AppBuilder {
    fn new(name: &str) -> Self {
        AppBuilder {
            name: name.to_string(),
            usage: String::new(),
            version: String::new(),
            commands: Vec::new(),
            default_command: None,
            app_path: None,
            env: Arc::new(|key: &str| std::env::var(key).ok()),
            writer: Arc::new(Mutex::new(std::io::stdout())),
        }
    }

    #[must_use]
    pub fn usage(mut self, usage: &str) -> Self {
        self.usage = usage.to_string();
        self
    }

    #[must_use]
    pub fn version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    /// Add a top-level command; it and its subtree receive the global flags
    #[must_use]
    pub fn command(mut self, command: CommandNode) -> Self {
        self.commands.push(command);
        self
    }

    /// Command run when the root is invoked without a subcommand
    #[must_use]
    pub fn default_command(mut self, name: &str) -> Self {
        self.default_command = Some(name.to_string());
        self
    }

    /// Path of the running binary; defaults to the current executable
    #[must_use]
    pub fn app_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.app_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn env_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.env = Arc::new(lookup);
        self
    }

    #[must_use]
    pub fn writer(mut self, writer: SharedWriter) -> Self {
        self.writer = writer;
        self
    }

    /// Prepare every command, attach the help command and check the flags.
    ///
    /// # Errors
    ///
    /// Returns `CliError::InvalidFlags` if any command carries a malformed or
    /// duplicated flag name, and `CliError::UnknownDefaultCommand` if the
    /// default command is not part of the tree.
    pub fn build(self) -> Result<App, CliError> {
        let global = global_flags();

        let mut commands = self.commands;
        commands.push(help_command());
        for command in &mut commands {
            prepare_subcommand_with_config(command, &global);
        }

        let root = CommandNode {
            name: self.name,
            usage: self.usage,
            action: Action::Run(with_work_path_and_custom_conf(Action::ShowHelp)),
            flags: global,
            children: commands,
            hide_help: true,
            ..Default::default()
        };

        if !check_command_flags(&root) {
            return Err(CliError::InvalidFlags);
        }
        if let Some(default) = &self.default_command
            && root.find_child(default).is_none()
        {
            return Err(CliError::UnknownDefaultCommand(default.clone()));
        }

        let app_path = self
            .app_path
            .or_else(|| std::env::current_exe().ok())
            .unwrap_or_default();

        Ok(App {
            root,
            version: self.version,
            default_command: self.default_command,
            app_path,
            env: self.env,
            writer: self.writer,
            paths: OnceLock::new(),
        })
    }
}
