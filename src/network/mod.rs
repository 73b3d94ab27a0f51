//! Endpoint addressing for the responder and its clients

pub mod address;

pub use address::{BindAddress, DEFAULT_BIND_ADDRESS};
