//! Request limits

pub mod limits;

pub use limits::{SizeError, SizeValidator};
