//! Callables layered over user slots.
//!
//! Every stored slot receives the emitting [`Signal`] and its own [`Connection`] at call time,
//! so no adapter needs a back-reference to its signal. A slot returns [`None`] to abstain,
//! i.e. when it delivered nothing and so contributes no result to the pass.

use std::{cell::Cell, rc::Rc};

use phloem::SignalTraits;
use tracing::debug;

use crate::{observed::Observed, Connection, Signal};

pub(crate) type Slot<A, R, T> = Rc<dyn Fn(&Signal<A, R, T>, Connection<T>, &A) -> Option<R>>;

pub(crate) fn extended<A: ?Sized, R, T: SignalTraits>(
	slot: impl 'static + Fn(&Signal<A, R, T>, Connection<T>, &A) -> Option<R>,
) -> Slot<A, R, T> {
	Rc::new(slot)
}

pub(crate) fn plain<A: ?Sized, R, T: SignalTraits>(
	slot: impl 'static + Fn(&A) -> R,
) -> Slot<A, R, T> {
	extended(move |_, _, args| Some(slot(args)))
}

/// Disconnects itself before the first delivery, so that neither a panic
/// nor reentrant emission can cause a second one.
pub(crate) fn once<A: ?Sized, R, T: SignalTraits>(
	slot: impl 'static + FnOnce(&A) -> R,
) -> Slot<A, R, T> {
	let slot = Cell::new(Some(slot));
	extended(move |signal, connection, args| {
		// Passes that were already running may still visit this slot.
		let slot = slot.take()?;
		signal.release(connection);
		Some(slot(args))
	})
}

pub(crate) fn observer<A: ?Sized, R, T: SignalTraits, O: 'static + Observed>(
	target: O,
	method: impl 'static + Fn(&O::Target, &A) -> R,
) -> Slot<A, R, T> {
	extended(move |signal, connection, args| {
		if let Some(strong) = target.resolve() {
			Some(method(&*strong, args))
		} else {
			debug!(%connection, "observed target is gone, pruning slot");
			signal.release(connection);
			None
		}
	})
}

pub(crate) fn forward<A: 'static + ?Sized, R: 'static, T: SignalTraits, U: SignalTraits>(
	target: std::rc::Weak<Signal<A, R, U>>,
) -> Slot<A, R, T> {
	extended(move |signal, connection, args| {
		if let Some(target) = target.upgrade() {
			target.emit_last(args)
		} else {
			debug!(%connection, "forwarding target is gone, pruning slot");
			signal.release(connection);
			None
		}
	})
}
