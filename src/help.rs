//! Contextual help: documents the command a `help` invocation refers to and
//! reports the paths the application resolved.

use log::debug;

use crate::app::CliError;
use crate::commands::node::{Action, CommandNode};
use crate::context::Context;
use crate::settings::AppPaths;

pub const HELP_COMMAND: &str = "help";

/// Our own help command, showing the resolved default paths after the usage
#[must_use]
pub fn help_command() -> CommandNode {
    CommandNode::new(HELP_COMMAND, "Shows a list of commands or help for one command")
        .alias("h")
        .args_usage("command")
        .action(Action::run(show_help))
}

/// Footer listing the resolved paths
#[must_use]
pub fn default_configuration(paths: &AppPaths) -> String {
    format!(
        "
DEFAULT CONFIGURATION:
   AppPath:    {}
   WorkPath:   {}
   CustomPath: {}
   ConfigFile: {}

",
        paths.app_path.display(),
        paths.work_path.display(),
        paths.custom_path.display(),
        paths.custom_conf.display()
    )
}

/// Show help for the command the invocation refers to.
///
/// The lineage runs from the executing command to the root. When the
/// executing command is `help` itself, the command to document is its parent
/// (index 1), otherwise the executing command (index 0). A target with a
/// command above it gets its own help, the root gets the application help.
/// Topics given to `help` (`app help web`) are looked up below the target.
///
/// # Errors
///
/// Returns `CliError::MalformedLineage` if the lineage is too short,
/// `CliError::UnknownHelpTopic` for a topic that names no command, and
/// `CliError::Io` if the help can't be written.
pub fn show_help(ctx: &Context<'_>) -> Result<(), CliError> {
    let lineage = ctx.lineage();
    let target_idx = usize::from(ctx.command().name == HELP_COMMAND);
    if lineage.get(target_idx).is_none() {
        return Err(CliError::MalformedLineage(format!(
            "`{}` has no command at index {target_idx} to document",
            ctx.command().name
        )));
    }

    // Path from below the root down to the target, empty when the target is the root
    let mut topic: Vec<String> = if lineage.get(target_idx + 1).is_some() {
        lineage
            .iter()
            .skip(target_idx)
            .rev()
            .skip(1)
            .map(|frame| frame.command.name.clone())
            .collect()
    } else {
        Vec::new()
    };
    if target_idx == 1 {
        topic.extend(ctx.args());
    }

    let rendered = render(ctx, &topic);
    let paths = ctx.paths().cloned().unwrap_or_default();
    if let Err(e) = write!(ctx.writer(), "{}", default_configuration(&paths)) {
        debug!("Unable to write the default configuration: {e}");
    }
    rendered
}

fn render(ctx: &Context<'_>, topic: &[String]) -> Result<(), CliError> {
    let mut command = ctx.parser();
    for name in topic {
        command = command
            .find_subcommand(name)
            .ok_or_else(|| CliError::UnknownHelpTopic(name.clone()))?;
    }
    let help = command.clone().render_help();
    write!(ctx.writer(), "{help}")?;
    Ok(())
}
