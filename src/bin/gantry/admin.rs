use gantry::{Action, BoolFlag, CliError, CommandNode, Context, StringFlag};

const FLAG_USERNAME: &str = "username";
const FLAG_EMAIL: &str = "email";
const FLAG_ADMIN: &str = "admin";

pub fn command() -> CommandNode {
    CommandNode::new("admin", "Command line interface to perform common administrative operations")
        .child(
            CommandNode::new("user", "Modify users")
                .child(create())
                .child(
                    CommandNode::new("list", "List users")
                        .alias("ls")
                        .action(Action::run(list)),
                ),
        )
}

fn create() -> CommandNode {
    CommandNode::new("create", "Create a new user in database")
        .flag(StringFlag::new(FLAG_USERNAME, &["u"], "Username"))
        .flag(StringFlag::new(FLAG_EMAIL, &[], "User email address"))
        .flag(BoolFlag::new(FLAG_ADMIN, &[], "User is an admin"))
        .action(Action::run(|ctx| {
            let username = ctx
                .string(FLAG_USERNAME)
                .ok_or_else(|| CliError::Handler("--username is required".into()))?;
            let email = ctx.string(FLAG_EMAIL).unwrap_or_default();
            let role = if ctx.bool(FLAG_ADMIN) { "admin" } else { "user" };
            writeln!(ctx.writer(), "created {role} {username} <{email}>")?;
            Ok(())
        }))
}

fn list(ctx: &Context<'_>) -> Result<(), CliError> {
    let conf = ctx
        .paths()
        .map(|paths| paths.custom_conf.display().to_string())
        .unwrap_or_default();
    writeln!(ctx.writer(), "users from {conf}")?;
    Ok(())
}
