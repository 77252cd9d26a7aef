//! # tsprep Prepare
//!
//! Turns raw tables into date-indexed time series: the store sales
//! preparation, the Open Power Systems Data preparation, and per-column
//! distribution plots for inspecting either.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod dates;
pub mod ops;
pub mod plot;
pub mod sales;

pub use ops::*;
pub use plot::*;
pub use sales::*;
