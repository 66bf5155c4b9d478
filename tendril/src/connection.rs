use core::{
	fmt::{self, Debug, Display, Formatter},
	hash::{Hash, Hasher},
	marker::PhantomData,
	num::NonZeroU64,
	sync::atomic::{AtomicU64, Ordering},
};

use phloem::{DefaultTraits, SignalTraits};

/// Process-unique identity of one [`Signal`](`crate::Signal`)'s set of slots.
///
/// Moves along with the slots when signals are [swapped](`crate::Signal::swap`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SignalId(NonZeroU64);

impl SignalId {
	pub(crate) fn next() -> Self {
		static COUNTER: AtomicU64 = AtomicU64::new(0);
		Self(
			(COUNTER.fetch_add(1, Ordering::Relaxed) + 1)
				.try_into()
				.expect("infallible within reasonable time"),
		)
	}
}

impl Display for SignalId {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// Names one registration on one [`Signal`](`crate::Signal`).
///
/// A plain value: it doesn't keep anything alive and can't dangle.  
/// Dropping it does **not** disconnect the slot.
pub struct Connection<T: SignalTraits = DefaultTraits> {
	signal: SignalId,
	slot: T::SlotId,
	_phantom: PhantomData<fn() -> T>,
}

impl<T: SignalTraits> Connection<T> {
	pub(crate) fn new(signal: SignalId, slot: T::SlotId) -> Self {
		Self {
			signal,
			slot,
			_phantom: PhantomData,
		}
	}

	/// The signal this connection was issued by.
	#[must_use]
	pub fn signal(&self) -> SignalId {
		self.signal
	}

	/// The raw slot id, unique within [`.signal()`](`Connection::signal`).
	#[must_use]
	pub fn slot(&self) -> T::SlotId {
		self.slot
	}
}

impl<T: SignalTraits> Clone for Connection<T> {
	fn clone(&self) -> Self {
		*self
	}
}
impl<T: SignalTraits> Copy for Connection<T> {}

impl<T: SignalTraits> PartialEq for Connection<T> {
	fn eq(&self, other: &Self) -> bool {
		self.signal == other.signal && self.slot == other.slot
	}
}
impl<T: SignalTraits> Eq for Connection<T> {}

impl<T: SignalTraits> Hash for Connection<T> {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.signal.hash(state);
		self.slot.hash(state);
	}
}

impl<T: SignalTraits> Debug for Connection<T> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Connection")
			.field("signal", &self.signal)
			.field("slot", &self.slot)
			.finish()
	}
}

impl<T: SignalTraits> Display for Connection<T> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}", self.signal, self.slot)
	}
}
