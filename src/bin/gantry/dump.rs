use gantry::{Action, CommandNode, StringFlag};

const FLAG_FILE: &str = "file";

pub fn command() -> CommandNode {
    CommandNode::new("dump", "Dump the application files and database")
        .flag(
            StringFlag::new(FLAG_FILE, &["f"], "Name of the dump file to create")
                .with_default("gantry-dump.zip"),
        )
        .action(Action::run(|ctx| {
            let file = ctx.string(FLAG_FILE).unwrap_or_default();
            let work = ctx
                .paths()
                .map(|paths| paths.work_path.join(&file))
                .unwrap_or_else(|| file.clone().into());
            writeln!(ctx.writer(), "dumping to {}", work.display())?;
            Ok(())
        }))
}
