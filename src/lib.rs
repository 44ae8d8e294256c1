//! Parley is a terminal-first chat client that relays conversations to a
//! remote AI worker.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the conversation transcript, the per-turn send guard,
//!   configuration, and the fixed strings the product is built around.
//! - [`api`] defines the worker wire payloads and the HTTP transport client.
//! - [`gateway`] is the host-rewriting proxy relay that fronts the worker.
//! - [`ui`] renders the terminal interface and runs the interactive event
//!   loop that drives user input and display updates.
//! - [`cli`] parses arguments and dispatches the chat, gateway, demo, and
//!   configuration commands.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod core;
pub mod gateway;
pub mod ui;
pub mod utils;
