use gantry::{Action, CommandNode, Context, StringFlag};

pub const NAME: &str = "web";

const FLAG_PORT: &str = "port";

pub fn command() -> CommandNode {
    CommandNode::new(NAME, "Start the web server")
        .flag(StringFlag::new(FLAG_PORT, &["p"], "Listen on the given port").with_default("3000"))
        .action(Action::run(run))
}

fn run(ctx: &Context<'_>) -> Result<(), gantry::CliError> {
    let port = ctx.string(FLAG_PORT).unwrap_or_default();
    let mut out = ctx.writer();
    if let Some(paths) = ctx.paths() {
        writeln!(out, "config: {}", paths.custom_conf.display())?;
        writeln!(out, "work path: {}", paths.work_path.display())?;
    }
    writeln!(out, "listening on port {port}")?;
    Ok(())
}
