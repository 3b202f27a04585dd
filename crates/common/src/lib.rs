//! Shared error plumbing and small utilities used by every wagate crate.

pub mod error;
pub mod time;

pub use {error::FromMessage, time::now_millis};
