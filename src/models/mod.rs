pub mod active_condition;
pub mod appointment;
pub mod condition;
pub mod enums;
pub mod family_history;
pub mod incompatibility;
pub mod patient;
pub mod provider;
pub mod side_effect;
pub mod treatment;

pub use active_condition::*;
pub use appointment::*;
pub use condition::*;
pub use family_history::*;
pub use incompatibility::*;
pub use patient::*;
pub use provider::*;
pub use side_effect::*;
pub use treatment::*;

use thiserror::Error;

/// Failure of a derived read-only computation over a record.
///
/// Derived computations fail fast instead of embedding placeholder text:
/// a missing required field is an error the caller sees, not a "None"
/// spliced into a formatted string.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DerivedError {
    #[error("required field missing: {field}")]
    MissingField { field: &'static str },

    #[error("required data missing: {data}")]
    MissingData { data: &'static str },
}
