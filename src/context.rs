//! Invocation state handed to command handlers

use std::io::Write;

use clap::ArgMatches;
use clap::parser::ValueSource;
use clap_complete::Shell;
use log::debug;
use parking_lot::MutexGuard;

use crate::app::App;
use crate::commands::node::{ARGS_ID, CommandNode};
use crate::settings::{self, AppPaths, ArgWorkPathAndCustomConf};

/// Flag queries scoped to a single level of the invocation
pub trait FlagSource {
    /// Whether the flag was given on the command line at this level
    fn is_set(&self, name: &str) -> bool;

    /// The flag's value at this level, defaults included
    fn string(&self, name: &str) -> Option<String>;
}

/// One command of the lineage with the arguments parsed at its level
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub command: &'a CommandNode,
    matches: &'a ArgMatches,
}

impl<'a> Frame<'a> {
    #[must_use]
    pub fn new(command: &'a CommandNode, matches: &'a ArgMatches) -> Self {
        Frame { command, matches }
    }

    fn declares(&self, name: &str) -> bool {
        self.matches.ids().any(|id| id.as_str() == name)
    }

    #[must_use]
    pub fn bool(&self, name: &str) -> bool {
        self.matches
            .try_get_one::<bool>(name)
            .ok()
            .flatten()
            .copied()
            .unwrap_or(false)
    }

    #[must_use]
    pub fn args(&self) -> Vec<String> {
        self.matches
            .try_get_many::<String>(ARGS_ID)
            .ok()
            .flatten()
            .map(|values| values.cloned().collect())
            .unwrap_or_default()
    }
}

impl FlagSource for Frame<'_> {
    fn is_set(&self, name: &str) -> bool {
        self.declares(name) && self.matches.value_source(name) == Some(ValueSource::CommandLine)
    }

    fn string(&self, name: &str) -> Option<String> {
        self.matches
            .try_get_one::<String>(name)
            .ok()
            .flatten()
            .cloned()
    }
}

/// Everything a handler sees of the running invocation.
///
/// The lineage is ordered from the executing command to the root.
pub struct Context<'a> {
    leaf: Frame<'a>,
    lineage: Vec<Frame<'a>>,
    app: &'a App,
    parser: &'a clap::Command,
}

impl<'a> Context<'a> {
    pub(crate) fn new(
        leaf: Frame<'a>,
        lineage: Vec<Frame<'a>>,
        app: &'a App,
        parser: &'a clap::Command,
    ) -> Self {
        Context {
            leaf,
            lineage,
            app,
            parser,
        }
    }

    /// The executing command
    #[must_use]
    pub fn command(&self) -> &'a CommandNode {
        self.leaf.command
    }

    #[must_use]
    pub fn lineage(&self) -> &[Frame<'a>] {
        &self.lineage
    }

    #[must_use]
    pub fn bool(&self, name: &str) -> bool {
        self.leaf.bool(name)
    }

    #[must_use]
    pub fn string(&self, name: &str) -> Option<String> {
        self.leaf.string(name)
    }

    /// Positional arguments of the executing command
    #[must_use]
    pub fn args(&self) -> Vec<String> {
        self.leaf.args()
    }

    #[must_use]
    pub fn app_name(&self) -> &str {
        self.app.name()
    }

    #[must_use]
    pub fn version(&self) -> &str {
        self.app.version()
    }

    /// Paths of this run, available once the startup configuration ran
    #[must_use]
    pub fn paths(&self) -> Option<&'a AppPaths> {
        self.app.paths.get()
    }

    pub fn writer(&self) -> MutexGuard<'a, dyn Write + Send> {
        self.app.writer.lock()
    }

    /// Write the application's completion script for `shell` to the output
    pub fn write_completion(&self, shell: Shell) {
        self.app.generate_completion(shell, &mut *self.writer());
    }

    /// Built parser of the whole tree, used to render help
    pub(crate) fn parser(&self) -> &'a clap::Command {
        self.parser
    }

    /// Initialize the application paths; only the first call of a run has an effect
    pub(crate) fn init_paths(&self, args: &ArgWorkPathAndCustomConf) -> &'a AppPaths {
        if let Some(paths) = self.app.paths.get() {
            debug!("Application paths already initialized, ignoring {args:?}");
            return paths;
        }
        self.app.paths.get_or_init(|| {
            settings::init_work_path_and_common_config(&*self.app.env, &self.app.app_path, args)
        })
    }
}
