//! # tsprep Common
//!
//! Shared table model, CSV codec, error types and logging for the tsprep
//! workspace.
//!
//! Every other crate in the workspace exchanges data as [`Table`] values and
//! reports failures as [`TsPrepError`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod codec;
pub mod error;
pub mod logging;
pub mod table;
pub mod value;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use error::*;
pub use logging::*;
pub use table::*;
pub use value::*;
