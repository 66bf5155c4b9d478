#![warn(clippy::pedantic)]
#![warn(missing_docs)]
#![warn(unreachable_pub)]
#![cfg_attr(feature = "_doc", doc = include_str!("../README.md"))]
//!
//! # Threading Notes
//!
//! Nothing in this crate is [`Sync`]. A [`RawSignal`] may only be used from the thread that owns it,
//! but it **may** be re-entered freely from within its own callbacks.

mod error;
pub mod raw;
pub mod traits;

pub use error::Error;
pub use raw::RawSignal;
pub use traits::{Counter, DefaultTraits, SignalTraits, Widths};
