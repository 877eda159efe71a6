//! Client management shell
//!
//! Registers the shell's routes on a [`platform_router::Router`], guards the
//! client views behind a simulated session and records rendered views.

pub mod shell;

#[cfg(test)]
mod tests;

pub use shell::{ShellContext, build_menu, create_router};
