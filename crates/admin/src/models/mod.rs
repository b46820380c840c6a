//! Domain models for the admin surface.

pub mod requirement;
pub mod session;

pub use requirement::{RequirementForm, RequirementModel, SelectListItem};
pub use session::CurrentAdmin;
