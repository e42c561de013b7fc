use gantry::{Action, BoolFlag, CommandNode, Context};

const FLAG_ALL: &str = "all";

pub fn command() -> CommandNode {
    CommandNode::new("doctor", "Diagnose and optionally fix problems")
        .flag(BoolFlag::new(FLAG_ALL, &["a"], "Run all checks"))
        .action(Action::run(check))
        .child(
            CommandNode::new("check", "Run the health checks")
                .flag(BoolFlag::new(FLAG_ALL, &["a"], "Run all checks"))
                .action(Action::run(check)),
        )
        .child(convert_command())
}

/// Also registered at the top level, hidden, for older scripts
pub fn convert_command() -> CommandNode {
    CommandNode::new("convert", "Convert the database to the current character set")
        .action(Action::run(|ctx| {
            writeln!(ctx.writer(), "converting with {}", ctx.command().name)?;
            Ok(())
        }))
}

fn check(ctx: &Context<'_>) -> Result<(), gantry::CliError> {
    let scope = if ctx.bool(FLAG_ALL) { "all" } else { "default" };
    let mut out = ctx.writer();
    writeln!(out, "running {scope} checks")?;
    if let Some(paths) = ctx.paths() {
        writeln!(out, "custom path: {}", paths.custom_path.display())?;
    }
    Ok(())
}
