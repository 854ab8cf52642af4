//! Error type shared by the selection and mask modules.
//!
//! Every variant describes an input the interactive loop can recover from:
//! the editor reports it and keeps its state unchanged.

use core::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum SelectionError {
    /// Fewer points than the operation needs.
    InsufficientPoints { required: usize, actual: usize },
    /// Geometry that cannot produce a usable result (zero length, zero area).
    DegenerateGeometry(&'static str),
    /// A requested value outside its allowed range.
    OutOfRange { what: &'static str, value: f32, min: f32, max: f32 },
    /// The configuration document could not be parsed.
    Config(String),
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientPoints { required, actual } => {
                write!(f, "insufficient points: need {required}, got {actual}")
            }
            Self::DegenerateGeometry(reason) => write!(f, "degenerate geometry: {reason}"),
            Self::OutOfRange { what, value, min, max } => {
                write!(f, "{what} out of range: {value} not in [{min}, {max}]")
            }
            Self::Config(msg) => write!(f, "invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for SelectionError {}

impl From<serde_json::Error> for SelectionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}
