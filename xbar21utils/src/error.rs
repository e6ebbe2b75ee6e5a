//!
//! # Error Helpers
//!
//! Walkers over canvases (lookups by key or name, the GDSII converter) carry some context,
//! a canvas name or an [crate::ErrorContext] stack, and attach it to every failure they report.
//! [ErrorHelper] builds those errors; [Unwrapper] applies one to failed lookups in post-fix position.
//!
//! ```rust
//! use xbar21utils::{ErrorHelper, Unwrapper};
//!
//! struct PortTable {
//!     canvas: String,
//!     names: Vec<String>,
//! }
//! impl ErrorHelper for PortTable {
//!     type Error = String;
//!     fn err(&self, msg: impl Into<String>) -> String {
//!         format!("{} in canvas `{}`", msg.into(), self.canvas)
//!     }
//! }
//! let table = PortTable {
//!     canvas: "front".into(),
//!     names: vec!["b0".into()],
//! };
//! let found = table.names.iter().position(|n| n == "t0").unwrapper(&table, "No port `t0`");
//! assert_eq!(found, Err("No port `t0` in canvas `front`".to_string()));
//! ```
//!

/// # Error Helper
///
/// Implementers provide `err`, decorating a message with their context.
/// The remaining methods build on it.
///
pub trait ErrorHelper {
    type Error;

    /// Create a [Self::Error] from `msg`
    fn err(&self, msg: impl Into<String>) -> Self::Error;
    /// Return failure
    fn fail<T>(&self, msg: impl Into<String>) -> Result<T, Self::Error> {
        Err(self.err(msg))
    }
    /// Fail with `msg` unless `cond` holds
    fn ensure(&self, cond: bool, msg: impl Into<String>) -> Result<(), Self::Error> {
        match cond {
            true => Ok(()),
            false => self.fail(msg),
        }
    }
}

/// # Unwrapper
///
/// Converts a missing value to an [ErrorHelper]'s error,
/// e.g. `self.arrays.get(key).unwrapper(self, "Array not found")`.
///
pub trait Unwrapper {
    type Ok;
    fn unwrapper<H>(self, helper: &H, msg: impl Into<String>) -> Result<Self::Ok, H::Error>
    where
        H: ErrorHelper;
}

impl<T> Unwrapper for Option<T> {
    type Ok = T;
    fn unwrapper<H>(self, helper: &H, msg: impl Into<String>) -> Result<T, H::Error>
    where
        H: ErrorHelper,
    {
        match self {
            Some(t) => Ok(t),
            None => helper.fail(msg),
        }
    }
}
