//! The `smesh` command line: thin glue over the registry client and the
//! installer, plus a local development registry server.

pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod router;
