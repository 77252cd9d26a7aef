//! # tsprep Acquire
//!
//! Retrieval of the store sales tables from the paginated JSON API, the
//! working-directory CSV cache in front of it, the join that combines the
//! three tables, and the static Open Power Systems Data CSV source.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod fetcher;
pub mod joiner;
pub mod ops;
pub mod registry;
pub mod source;

pub use cache::*;
pub use fetcher::*;
pub use joiner::*;
pub use ops::*;
pub use registry::*;
pub use source::*;
