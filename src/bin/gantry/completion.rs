use clap_complete::Shell;

use gantry::{Action, CliError, CommandNode};

pub fn command() -> CommandNode {
    CommandNode::new("completion", "Print the shell completion script")
        .args_usage("shell")
        .action(Action::run(|ctx| {
            let name = ctx
                .args()
                .into_iter()
                .next()
                .ok_or_else(|| CliError::Handler("missing shell, eg: bash, zsh, fish".into()))?;
            let shell: Shell = name.parse().map_err(|e: String| CliError::Handler(e.into()))?;
            ctx.write_completion(shell);
            Ok(())
        }))
}
