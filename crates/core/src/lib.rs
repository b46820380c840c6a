//! Discount Rules Core - Shared domain types.
//!
//! This crate provides the types shared by the rule service and its tools:
//! - `admin` - Rule evaluation API and configuration screen
//! - `cli` - Migrations and plugin lifecycle commands
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. Collaborator traits live next to their implementations
//! in the admin crate.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, discount and directory entities, admin roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
