//! Nearest-wins resolution of the global path flags

use std::sync::Arc;

use log::debug;

use crate::app::CliError;
use crate::commands::flag::{FLAG_CONFIG, FLAG_CUSTOM_PATH, FLAG_HELP, FLAG_WORK_PATH};
use crate::commands::node::{Action, ActionFn};
use crate::context::{Context, FlagSource};
use crate::help::show_help;
use crate::settings::ArgWorkPathAndCustomConf;

/// Fill `field` from `level` unless a nearer level already did
fn take_first(field: &mut Option<String>, level: &impl FlagSource, name: &str) {
    if field.is_none() && level.is_set(name) {
        *field = level.string(name).filter(|value| !value.is_empty());
    }
}

/// Collect the path flags from a lineage ordered leaf to root.
///
/// For every flag the first level that explicitly set it supplies the value,
/// so a subcommand's `--config` beats the one given to its parents.
pub fn resolve_work_path_and_custom_conf<S: FlagSource>(lineage: &[S]) -> ArgWorkPathAndCustomConf {
    let mut args = ArgWorkPathAndCustomConf::default();
    for level in lineage {
        take_first(&mut args.work_path, level, FLAG_WORK_PATH);
        take_first(&mut args.custom_path, level, FLAG_CUSTOM_PATH);
        take_first(&mut args.custom_conf, level, FLAG_CONFIG);
    }
    args
}

/// Wrap `action` so the startup paths are initialized before it runs.
///
/// This can't happen in a per-level hook, each level of a nested invocation
/// would initialize again.
#[must_use]
pub fn with_work_path_and_custom_conf(action: Action) -> ActionFn {
    Arc::new(move |ctx: &Context<'_>| -> Result<(), CliError> {
        let args = resolve_work_path_and_custom_conf(ctx.lineage());
        debug!("Resolved startup arguments: {args:?}");
        ctx.init_paths(&args);

        match &action {
            Action::Run(handler) if !ctx.bool(FLAG_HELP) => handler(ctx),
            _ => show_help(ctx),
        }
    })
}
