//! Core types for the discount rule service.
//!
//! This module provides type-safe wrappers for the host-owned entities the
//! rule reads and writes.

pub mod directory;
pub mod discount;
pub mod id;
pub mod role;

pub use directory::{Address, Country, Customer};
pub use discount::{Discount, DiscountRequirement};
pub use id::*;
pub use role::{AdminRole, Permission};
