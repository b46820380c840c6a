//! HTTP middleware for the discount rules service.
//!
//! Sessions are shared with the host admin, which performs login; this
//! service only reads the identity it stored.

pub mod auth;
pub mod session;

pub use auth::{RequireAdminAuth, RequireDiscountManager};
pub use session::{create_session_layer, postgres_session_store};
