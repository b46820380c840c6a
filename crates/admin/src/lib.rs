//! Discount rules service library.
//!
//! Hosts discount requirement rules for the admin panel: the shipping
//! country rule, its configuration screen, and the evaluation endpoint the
//! host discount engine calls at checkout.
//!
//! # Security
//!
//! Configuration routes require an admin session with the
//! `ManageDiscounts` permission. The evaluation endpoint is meant for the
//! host only; bind the service to a private interface.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod rules;
pub mod services;
pub mod state;
