use crate::commands::flag::Flag;
use crate::commands::node::{Action, CommandNode};
use crate::help::{HELP_COMMAND, help_command};
use crate::resolve::with_work_path_and_custom_conf;

/// Prepare a command subtree to run with the global flags.
///
/// Every node gets `global_flags` ahead of its own flags, a handler that
/// initializes the startup paths first, and a `help` child replacing the
/// parser's built-in help. Run it once per tree, a second pass would add the
/// flags and help commands again.
pub fn prepare_subcommand_with_config(command: &mut CommandNode, global_flags: &[Flag]) {
    let own_flags = std::mem::take(&mut command.flags);
    command.flags = global_flags.iter().cloned().chain(own_flags).collect();

    let action = std::mem::take(&mut command.action);
    command.action = Action::Run(with_work_path_and_custom_conf(action));
    command.hide_help = true;

    if command.name != HELP_COMMAND {
        command.children.push(help_command());
    }
    for child in &mut command.children {
        prepare_subcommand_with_config(child, global_flags);
    }
}
