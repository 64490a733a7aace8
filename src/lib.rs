//! A hand-rolled shared-ownership handle and the pattern demos built on it.
//!
//! [`SharedPtr`] is the object-reference primitive every demo in
//! [`patterns`] uses: copy adds an owner, drop removes one, and the last
//! owner destroys the resource. Casts between views share the same owners.

pub mod config;
pub mod error;
pub mod patterns;
pub mod smart_ptr;

pub use config::RunnerConfig;
pub use error::{CastError, ConfigError};
pub use smart_ptr::SharedPtr;
