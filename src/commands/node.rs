use std::fmt;
use std::sync::Arc;

use clap::Arg;

use crate::app::CliError;
use crate::commands::flag::{Flag, FlagDescriptor};
use crate::context::Context;

/// Id of the positional arguments of a command declaring `args_usage`
pub const ARGS_ID: &str = "args";

/// Handler run when a command is invoked
pub type ActionFn = Arc<dyn Fn(&Context<'_>) -> Result<(), CliError> + Send + Sync>;

/// What a command does when it is the invoked leaf
#[derive(Clone, Default)]
pub enum Action {
    Run(ActionFn),
    /// Nothing to run, the command only groups children
    #[default]
    ShowHelp,
}

impl Action {
    pub fn run<F>(handler: F) -> Self
    where
        F: Fn(&Context<'_>) -> Result<(), CliError> + Send + Sync + 'static,
    {
        Action::Run(Arc::new(handler))
    }

    #[must_use]
    pub fn is_runnable(&self) -> bool {
        matches!(self, Action::Run(_))
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Run(_) => f.write_str("Run(..)"),
            Action::ShowHelp => f.write_str("ShowHelp"),
        }
    }
}

/// A named, executable node in the command tree
#[derive(Debug, Clone, Default)]
pub struct CommandNode {
    pub name: String,
    pub aliases: Vec<String>,
    pub usage: String,
    /// Label of the trailing positional arguments, if the command takes any
    pub args_usage: Option<String>,
    pub action: Action,
    pub flags: Vec<Flag>,
    pub children: Vec<CommandNode>,
    /// Suppress the parser's built-in help flag
    pub hide_help: bool,
    /// Keep the command out of help listings
    pub hidden: bool,
}

impl CommandNode {
    #[must_use]
    pub fn new(name: &str, usage: &str) -> Self {
        CommandNode {
            name: name.to_string(),
            usage: usage.to_string(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    #[must_use]
    pub fn args_usage(mut self, label: &str) -> Self {
        self.args_usage = Some(label.to_string());
        self
    }

    #[must_use]
    pub fn action(mut self, action: Action) -> Self {
        self.action = action;
        self
    }

    #[must_use]
    pub fn flag(mut self, flag: impl Into<Flag>) -> Self {
        self.flags.push(flag.into());
        self
    }

    #[must_use]
    pub fn child(mut self, child: CommandNode) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Whether `name` is this command's name or one of its aliases
    #[must_use]
    pub fn answers_to(&self, name: &str) -> bool {
        self.name == name || self.aliases.iter().any(|a| a == name)
    }

    #[must_use]
    pub fn find_child(&self, name: &str) -> Option<&CommandNode> {
        self.children.iter().find(|child| child.answers_to(name))
    }

    /// Returns this node followed by every descendant, depth first
    #[must_use]
    pub fn all_nodes(&self) -> Vec<&CommandNode> {
        std::iter::once(self)
            .chain(self.children.iter().flat_map(CommandNode::all_nodes))
            .collect()
    }

    #[must_use]
    pub fn flag_names(&self) -> Vec<&str> {
        self.flags.iter().map(FlagDescriptor::name).collect()
    }

    /// Build the parser definition of this subtree
    #[must_use]
    pub fn to_clap(&self) -> clap::Command {
        let mut cmd = clap::Command::new(self.name.clone())
            .about(self.usage.clone())
            .visible_aliases(self.aliases.clone())
            .hide(self.hidden)
            .disable_help_subcommand(true)
            .disable_version_flag(true)
            .disable_help_flag(self.hide_help)
            .args(self.flags.iter().map(FlagDescriptor::to_arg));
        if let Some(label) = &self.args_usage {
            cmd = cmd.arg(Arg::new(ARGS_ID).value_name(label.clone()).num_args(0..));
        }
        cmd.subcommands(self.children.iter().map(CommandNode::to_clap))
    }
}
