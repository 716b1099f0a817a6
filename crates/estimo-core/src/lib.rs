//! Core types for the estimo system.
//!
//! This crate contains the domain model shared by the question flow resolver,
//! the quote assembler, and the storage layer: question definitions, answers,
//! rate-table entries, historical jobs, and assembled scopes.

pub mod answer;
pub mod history;
pub mod idgen;
pub mod money;
pub mod question;
pub mod rate;
pub mod scope;
pub mod validation;
