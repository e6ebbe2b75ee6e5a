//!
//! # Layout Result and Error Types
//!

// Local Imports
use crate::utils::{self, ErrorContext};

/// # [LayoutError] Result Type
pub type LayoutResult<T> = Result<T, LayoutError>;

///
/// # Layout Error Enumeration
///
/// Configuration errors surface before any geometry is built.
/// Geometry and export errors carry the context stack of the walker which raised them,
/// outermost first.
///
pub enum LayoutError {
    /// Invalid generator parameter
    Config { param: String, message: String },
    /// Failure writing or converting the finished mask
    Export {
        message: String,
        stack: Vec<ErrorContext>,
    },
    /// Invalid geometric construction, e.g. duplicate port names or unknown keys
    Geometry {
        message: String,
        stack: Vec<ErrorContext>,
    },
    /// Boxed External Errors
    Boxed(Box<dyn std::error::Error + Send + Sync>),
    /// Uncategorized, with String Message
    Str(String),
}
impl LayoutError {
    /// Create a [LayoutError::Str] from anything String-convertible
    pub fn msg(s: impl Into<String>) -> Self {
        Self::Str(s.into())
    }
    /// Fail with a [LayoutError::Str] message
    pub fn fail<T>(s: impl Into<String>) -> Result<T, Self> {
        Err(Self::msg(s))
    }
    /// Create a [LayoutError::Config] for parameter `param`
    pub fn config(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config {
            param: param.into(),
            message: message.into(),
        }
    }
    /// Create a [LayoutError::Geometry] without context
    pub fn geometry(message: impl Into<String>) -> Self {
        Self::Geometry {
            message: message.into(),
            stack: Vec::new(),
        }
    }
}

/// Write `stack` as a trailing `(in a, in b)` clause
fn write_stack(f: &mut std::fmt::Formatter, stack: &[ErrorContext]) -> std::fmt::Result {
    if stack.is_empty() {
        return Ok(());
    }
    let ctx: Vec<String> = stack.iter().map(|c| format!("in {}", c)).collect();
    write!(f, " ({})", ctx.join(", "))
}

impl std::fmt::Display for LayoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Config { param, message } => {
                write!(f, "Invalid parameter `{}`: {}", param, message)
            }
            Self::Export { message, stack } => {
                write!(f, "Export failed: {}", message)?;
                write_stack(f, stack)
            }
            Self::Geometry { message, stack } => {
                write!(f, "Layout failed: {}", message)?;
                write_stack(f, stack)
            }
            Self::Boxed(err) => std::fmt::Display::fmt(err, f),
            Self::Str(err) => f.write_str(err),
        }
    }
}
impl std::fmt::Debug for LayoutError {
    /// Delegates to the [std::fmt::Display] implementation, so `main` reports readable errors
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}
impl std::error::Error for LayoutError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Boxed(e) => Some(&**e),
            _ => None,
        }
    }
}

impl From<String> for LayoutError {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}
impl From<&str> for LayoutError {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}
/// File-system failures only arise writing output, so they are reported as export errors
impl From<std::io::Error> for LayoutError {
    fn from(e: std::io::Error) -> Self {
        Self::Export {
            message: e.to_string(),
            stack: Vec::new(),
        }
    }
}
impl From<utils::ser::Error> for LayoutError {
    fn from(e: utils::ser::Error) -> Self {
        Self::Boxed(Box::new(e))
    }
}
impl<T: std::error::Error + Send + Sync + 'static> From<Box<T>> for LayoutError {
    fn from(e: Box<T>) -> Self {
        Self::Boxed(e)
    }
}
