//! Build-time check of the flag names in a command tree

use std::collections::HashSet;

use log::error;
use thiserror::Error;

use crate::commands::flag::{ALIAS_SEPARATOR, FlagDescriptor};
use crate::commands::node::CommandNode;

/// A flag declaration the parser would handle wrongly
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlagViolation {
    /// Aliases belong in `aliases`, a separator in the name is silently misparsed
    #[error("flag of `{command}` can't have a comma in its name: {flag:?}, use aliases instead")]
    SeparatorInName { command: String, flag: String },
    #[error("flag {flag:?} is declared more than once on `{command}`")]
    DuplicateName { command: String, flag: String },
    #[error("alias {alias:?} of flag {flag:?} is already taken on `{command}`")]
    DuplicateAlias {
        command: String,
        flag: String,
        alias: String,
    },
}

/// Find every malformed flag in the tree rooted at `root`
#[must_use]
pub fn collect_flag_violations(root: &CommandNode) -> Vec<FlagViolation> {
    let mut violations = Vec::new();
    check_command(root, &mut violations);
    violations
}

/// Option as typed on the command line; single-character aliases are short options
fn alias_option(alias: &str) -> String {
    if alias.chars().count() == 1 {
        format!("-{alias}")
    } else {
        format!("--{alias}")
    }
}

fn check_command(command: &CommandNode, violations: &mut Vec<FlagViolation>) {
    let mut seen = HashSet::new();
    for flag in &command.flags {
        let name = flag.name();
        if name.contains(ALIAS_SEPARATOR) {
            violations.push(FlagViolation::SeparatorInName {
                command: command.name.clone(),
                flag: name.to_string(),
            });
        }
        if !seen.insert(format!("--{name}")) {
            violations.push(FlagViolation::DuplicateName {
                command: command.name.clone(),
                flag: name.to_string(),
            });
        }
        for alias in flag.aliases() {
            if !seen.insert(alias_option(alias)) {
                violations.push(FlagViolation::DuplicateAlias {
                    command: command.name.clone(),
                    flag: name.to_string(),
                    alias: alias.clone(),
                });
            }
        }
    }
    for child in &command.children {
        check_command(child, violations);
    }
}

/// Log every malformed flag in the tree and report whether there were none
#[must_use]
pub fn check_command_flags(root: &CommandNode) -> bool {
    let violations = collect_flag_violations(root);
    for violation in &violations {
        error!("{violation}");
    }
    violations.is_empty()
}
