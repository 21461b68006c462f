//! Error types for Wicker
//!
//! Every fallible operation in the workspace returns a [`WickerResult`]. Errors are
//! constructed through the [`wicker_err`] and [`wicker_bail`] macros; invariant
//! violations that cannot be reported to the caller go through [`wicker_panic`].

use std::borrow::Cow;
use std::fmt::{Debug, Display, Formatter};
use std::ops::Deref;

pub use ext::*;

mod ext;

/// A string that can be owned or static, used in error payloads.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ErrString(Cow<'static, str>);

impl<T> From<T> for ErrString
where
    T: Into<Cow<'static, str>>,
{
    fn from(msg: T) -> Self {
        ErrString(msg.into())
    }
}

impl Display for ErrString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Deref for ErrString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// The top-level error type for all Wicker crates.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum WickerError {
    /// A caller-supplied argument violated the operation's contract.
    #[error("invalid argument: {0}")]
    InvalidArgument(ErrString),
    /// A positional index fell outside the addressable range.
    #[error("index {index} out of bounds for length {len}")]
    OutOfBounds {
        /// The requested index.
        index: usize,
        /// The length of the addressed table.
        len: usize,
    },
    /// A key expression was resolved against a layout that never registered it.
    ///
    /// Carries the rendered expression and the full registered set, since an
    /// unknown slot is a schema bug that should be diagnosable from the error
    /// alone.
    #[error("unknown key expression {expression}; registered expressions: [{}]", .registered.join(", "))]
    UnknownKeyExpression {
        /// Rendered form of the expression that failed to resolve.
        expression: String,
        /// Rendered forms of every expression the layout was built from.
        registered: Vec<String>,
    },
    /// A type was asked to act as a typed view without exposing the capability.
    #[error("type {type_name} does not satisfy the typed view capability")]
    UnsupportedCapability {
        /// Name of the offending type.
        type_name: String,
    },
    /// `set_target_type` was invoked with no target.
    #[error("target type must not be empty")]
    NullTarget,
    /// Persisted data could not be decoded back into its in-memory form.
    #[error("decode error: {0}")]
    Decode(ErrString),
}

/// The result type used across all Wicker crates.
pub type WickerResult<T> = Result<T, WickerError>;

#[doc(hidden)]
pub mod __private {
    #[allow(clippy::panic)]
    #[cold]
    pub fn panic_msg(msg: String) -> ! {
        panic!("{msg}")
    }
}

/// Construct a [`WickerError`].
///
/// The bare form builds an `InvalidArgument`; prefix with a variant name to
/// build the structured variants.
#[macro_export]
macro_rules! wicker_err {
    (OutOfBounds: $index:expr, $len:expr) => {
        $crate::WickerError::OutOfBounds { index: $index, len: $len }
    };
    (Decode: $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::WickerError::Decode(format!($fmt $(, $arg)*).into())
    };
    (NullTarget) => {
        $crate::WickerError::NullTarget
    };
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::WickerError::InvalidArgument(format!($fmt $(, $arg)*).into())
    };
}

/// Return early with a [`WickerError`].
#[macro_export]
macro_rules! wicker_bail {
    ($($tt:tt)+) => {
        return Err($crate::wicker_err!($($tt)+))
    };
}

/// Panic on a broken internal invariant.
///
/// Reserved for contract violations that no caller can meaningfully recover
/// from; recoverable conditions return [`WickerResult`] instead.
#[macro_export]
macro_rules! wicker_panic {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::__private::panic_msg(format!($fmt $(, $arg)*))
    };
}

/// Unwrap with a message, panicking through [`wicker_panic`].
pub trait WickerExpect {
    /// The unwrapped value type.
    type Output;

    /// Unwrap the value, panicking with `msg` if absent.
    fn wicker_expect(self, msg: &str) -> Self::Output;
}

impl<T> WickerExpect for Option<T> {
    type Output = T;

    fn wicker_expect(self, msg: &str) -> T {
        match self {
            Some(value) => value,
            None => wicker_panic!("expect failed: {}", msg),
        }
    }
}

impl<T, E: Display> WickerExpect for Result<T, E> {
    type Output = T;

    fn wicker_expect(self, msg: &str) -> T {
        match self {
            Ok(value) => value,
            Err(e) => wicker_panic!("expect failed: {}: {}", msg, e),
        }
    }
}

/// Unwrap, panicking with the error's own message.
pub trait WickerUnwrap {
    /// The unwrapped value type.
    type Output;

    /// Unwrap the value, panicking if it is an error.
    fn wicker_unwrap(self) -> Self::Output;
}

impl<T, E: Display> WickerUnwrap for Result<T, E> {
    type Output = T;

    fn wicker_unwrap(self) -> T {
        match self {
            Ok(value) => value,
            Err(e) => wicker_panic!("unwrap failed: {}", e),
        }
    }
}
