//! Services layer - Business logic
//!
//! Services sit between the HTTP handlers and the repositories. They own
//! validation and error mapping; storage stays in the repositories.

pub mod forms;

pub use forms::{FieldErrors, FormError, FormService};
