//! Core of the Gantry command-line bootstrapper
//!
//! Gantry builds a tree of subcommands on top of `clap` and propagates a set of
//! global flags (`--work-path`, `--custom-path`, `--config`) to every command.
//! Those flags may be given at any level of an invocation, and the level
//! closest to the invoked command wins. Every command also gets a `help`
//! subcommand that knows which command of the invocation to document and
//! reports the resolved paths.
//!
//! ```no_run
//! use gantry::{Action, App, CommandNode};
//!
//! let app = App::builder("gantry")
//!     .command(CommandNode::new("web", "Start the web server").action(Action::run(|ctx| {
//!         log::info!("config file: {:?}", ctx.paths().map(|p| &p.custom_conf));
//!         Ok(())
//!     })))
//!     .default_command("web")
//!     .build()?;
//! app.run(std::env::args_os())?;
//! # Ok::<(), gantry::CliError>(())
//! ```

pub mod app;
pub mod commands;
pub mod context;
pub mod help;
pub mod logger;
pub mod resolve;
pub mod settings;
pub mod validate;

pub use app::{App, AppBuilder, CliError};
pub use commands::flag::{BoolFlag, Flag, FlagDescriptor, StringFlag};
pub use commands::node::{Action, CommandNode};
pub use context::Context;
pub use settings::AppPaths;
