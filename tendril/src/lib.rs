#![warn(clippy::pedantic)]
#![warn(missing_docs)]
#![warn(unreachable_pub)]
#![cfg_attr(feature = "_doc", doc = include_str!("../README.md"))]
//!
//! # Example
//!
//! ```
//! use std::{cell::RefCell, rc::Rc};
//! use tendril::Signal;
//!
//! let log = Rc::new(RefCell::new(Vec::new()));
//! let clicked = Signal::<(i32, i32)>::new();
//!
//! let connection = clicked
//! 	.connect({
//! 		let log = Rc::clone(&log);
//! 		move |&(x, y)| log.borrow_mut().push(x + y)
//! 	})
//! 	.unwrap();
//!
//! clicked.emit(&(1, 2));
//! clicked.disconnect(connection).unwrap();
//! clicked.emit(&(3, 4));
//!
//! assert_eq!(*log.borrow(), [3]);
//! assert!(clicked.disconnect(connection).is_err());
//! ```

mod adapter;
mod connection;
mod observed;
mod signal;

pub use connection::{Connection, SignalId};
pub use observed::Observed;
pub use phloem::{Counter, DefaultTraits, Error, SignalTraits, Widths};
pub use signal::Signal;
