//! Emission scope bookkeeping.

use core::cell::Cell;

use num_traits::{CheckedAdd, One};
use scopeguard::{guard, ScopeGuard};
use tracing::trace;

use super::RawSignal;
use crate::{traits::SignalTraits, Error};

/// Exists for the duration of one pass over a [`RawSignal`].
///
/// Opening a frame increments the signal's nesting depth.
/// Dropping it, including during unwinding, decrements the depth again and
/// compacts storage iff it was the outermost frame.
pub(crate) struct EmitFrame<'a, P, T: SignalTraits> {
	depth: T::Depth,
	_exit: ScopeGuard<&'a RawSignal<P, T>, fn(&'a RawSignal<P, T>)>,
}

impl<'a, P, T: SignalTraits> EmitFrame<'a, P, T> {
	/// # Panics
	///
	/// Iff the nesting depth would overflow [`SignalTraits::Depth`].
	pub(crate) fn enter(signal: &'a RawSignal<P, T>) -> Self {
		let depth = enter_depth(&signal.depth);
		trace!(depth = %depth, "emission frame opened");
		let exit: fn(&'a RawSignal<P, T>) = RawSignal::exit_frame;
		Self {
			depth,
			_exit: guard(signal, exit),
		}
	}

	/// The nesting depth this frame runs at. The outermost frame runs at depth 1.
	pub(crate) fn depth(&self) -> T::Depth {
		self.depth
	}
}

fn enter_depth<D: CheckedAdd + One + Copy>(depth: &Cell<D>) -> D {
	let Some(entered) = depth.get().checked_add(&D::one()) else {
		panic!("{}", Error::NestingDepthExhausted)
	};
	depth.set(entered);
	entered
}
