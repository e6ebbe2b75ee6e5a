//!
//! # Error-Reporting Contexts
//!

/// Where a canvas walker was when it failed.
/// Pushed and popped by walkers such as the GDSII converter,
/// and reported alongside any failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorContext {
    /// Top-level library, by name
    Library(String),
    /// Canvas (cell), by name
    Canvas(String),
    /// Placed instance, by the name of what it places
    Instance(String),
    /// Array, by the name of its prim
    Array(String),
}
impl std::fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Library(s) => write!(f, "library `{}`", s),
            Self::Canvas(s) => write!(f, "canvas `{}`", s),
            Self::Instance(s) => write!(f, "instance of `{}`", s),
            Self::Array(s) => write!(f, "array of `{}`", s),
        }
    }
}
