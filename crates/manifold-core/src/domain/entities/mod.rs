pub mod artifact_set;
pub mod common;

pub use crate::domain::error::DomainError;
