//! sw-core: sample-domain types and operations for Soundweld
//!
//! The planar PCM buffer model, the clip model with its range/order
//! validator, and the trim and concatenation engines. Everything here is
//! synchronous and free of I/O; container decoding and encoding live in
//! `sw-render`.

mod buffer;
mod clip;
mod concat;
mod error;
mod trim;
mod validate;

pub use buffer::*;
pub use clip::*;
pub use concat::*;
pub use error::*;
pub use trim::*;
pub use validate::*;
