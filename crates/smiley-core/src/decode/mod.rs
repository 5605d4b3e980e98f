//! Serial decoding.
//!
//! Follows a layered structure:
//! - `layout`: character positions, lengths and fixed strings
//! - `reader`: normalization and bounds-checked positional access
//! - `dispatch`: ordered shape rules selecting a [`DeviceFamily`]
//! - `parser`: field extraction and vocabulary resolution
//! - `error`: soft decode errors
//!
//! Decoding is pure: no I/O, no shared state, and no hard failures. Misses
//! are collected as [`DecodeError`] values in serial order.
//!
//! [`DeviceFamily`]: crate::DeviceFamily

pub mod error;
pub mod layout;
mod dispatch;
mod parser;
mod reader;

pub use dispatch::dispatch;
pub use error::{DecodeError, FieldLabel};
pub use parser::decode;
pub use reader::normalize;
