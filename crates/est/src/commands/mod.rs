//! Command handlers for the `est` CLI.

pub mod classify;
pub mod completion;
pub mod init;
pub mod next;
pub mod quote;
pub mod seed;
pub mod version;
