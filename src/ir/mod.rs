//! Template descriptor IR: types, co-visibility, and invariant validation.

pub mod types;
pub mod validate;
pub mod visibility;

pub use types::*;
pub use validate::validate_template;
pub use visibility::mutually_exclusive;
