//! The command tree and its preparation
//!
//! Commands form a tree rooted at the application. Each node owns its flags
//! and children. Preparation copies the global flags onto every node, wraps
//! the handlers so the startup paths are resolved first, and gives every
//! command a `help` child in place of the parser's built-in help.

pub mod flag;
pub mod node;
pub mod prepare;
