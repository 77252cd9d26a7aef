//! # tsprep CLI
//!
//! Command-line front end for the tsprep workspace.
//!
//! Wires configuration, logging, the acquisition crate and the preparation
//! crate together behind the `tsprep` binary.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod cli;
pub mod error;

pub use app::*;
pub use cli::*;
pub use error::*;
