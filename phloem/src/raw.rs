//! Reentrant slot storage and dispatch.
//!
//! [`RawSignal`] is payload-agnostic: it stores any [`Clone`] payload and hands each one that
//! a pass must visit to a caller-supplied closure. Building callables on top is up to the user.

use core::{
	cell::{Cell, RefCell},
	fmt::{self, Debug, Formatter},
	ops::ControlFlow,
	ptr,
};

use num_traits::{Bounded, One, Zero};
use tracing::{debug, trace};

use crate::{
	traits::{DefaultTraits, SignalTraits},
	Error,
};

mod frame;
mod table;

use frame::EmitFrame;
pub use table::{SlotRecord, SlotState, SlotTable};

/// Ordered slot storage plus the nesting depth counter of the passes currently running over it.
///
/// All methods take `&self` and **may** be called from within [`RawSignal::dispatch`]'s visitor,
/// including [`RawSignal::dispatch`] itself.
///
/// # Logic
///
/// Within one pass, records are visited in ascending id order.  
/// A pass visits exactly the records that existed when it started, minus those disconnected
/// before it started. Disconnecting a record from within a pass at the same or a deeper level
/// does not prevent this pass from visiting it.
///
/// Storage is only compacted once the outermost pass ends.
pub struct RawSignal<P, T: SignalTraits = DefaultTraits> {
	table: RefCell<SlotTable<P, T>>,
	depth: Cell<T::Depth>,
}

impl<P, T: SignalTraits> Debug for RawSignal<P, T> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		let table = self.table.borrow();
		f.debug_struct("RawSignal")
			.field("slot_count", &table.active_count())
			.field("storage_len", &table.len())
			.field("depth", &self.depth.get())
			.finish_non_exhaustive()
	}
}

impl<P, T: SignalTraits> Default for RawSignal<P, T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<P, T: SignalTraits> RawSignal<P, T> {
	/// Creates a new [`RawSignal`] without slots. Does not allocate.
	#[must_use]
	pub fn new() -> Self {
		Self::with_capacity(0)
	}

	/// Creates a new [`RawSignal`] with storage for `capacity` slots.
	#[must_use]
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			table: SlotTable::with_capacity(capacity).into(),
			depth: T::Depth::zero().into(),
		}
	}

	/// Reserves storage for at least `additional` more slots.
	pub fn reserve(&self, additional: usize) {
		self.table.borrow_mut().reserve(additional);
	}

	/// Registers `payload` and returns its slot id.
	///
	/// Passes that are already running won't visit the new slot.
	///
	/// # Errors
	///
	/// [`Error::IdentifierSpaceExhausted`] iff this signal has issued every id of its [`SignalTraits::SlotId`] width.
	pub fn connect(&self, payload: P) -> Result<T::SlotId, Error> {
		let id = self.table.borrow_mut().append(payload)?;
		trace!(slot = %id, "slot connected");
		Ok(id)
	}

	/// Disconnects slot `id` at the current nesting depth.
	///
	/// Passes that are running at this or a shallower depth still visit it.
	///
	/// # Errors
	///
	/// [`Error::UnknownConnection`] iff `id` isn't currently connected.
	pub fn disconnect(&self, id: T::SlotId) -> Result<(), Error> {
		let depth = self.depth.get();
		self.table.borrow_mut().mark_inactive(id, depth)?;
		trace!(slot = %id, depth = %depth, "slot disconnected");
		Ok(())
	}

	/// Disconnects all slots.
	///
	/// While idle, storage is released immediately.  
	/// During a pass, this acts like disconnecting each slot individually at the current depth.
	pub fn disconnect_all(&self) {
		let depth = self.depth.get();
		let removed = self
			.table
			.borrow_mut()
			.bulk_clear(depth, self.is_running());
		trace!(depth = %depth, released = removed.len(), "all slots disconnected");
		drop(removed);
	}

	/// Whether `id` is currently connected.
	pub fn is_connected(&self, id: T::SlotId) -> bool {
		self.table.borrow().is_active(id)
	}

	/// The number of connected slots.
	pub fn slot_count(&self) -> usize {
		self.table.borrow().active_count()
	}

	/// Whether no slots are connected.
	pub fn is_empty(&self) -> bool {
		self.slot_count() == 0
	}

	/// The number of physically stored slot records, including ones awaiting compaction.
	///
	/// Equal to [`.slot_count()`](`RawSignal::slot_count`) whenever the outermost pass has just ended.
	pub fn storage_len(&self) -> usize {
		self.table.borrow().len()
	}

	/// How many slots this signal could ever register.
	pub fn max_size(&self) -> usize {
		self.table.borrow().max_size()
	}

	/// How many more slots can be registered before ids run out.
	pub fn remaining_slots(&self) -> usize {
		self.table.borrow().remaining_slots()
	}

	/// The number of currently running, nested passes.
	pub fn depth(&self) -> T::Depth {
		self.depth.get()
	}

	/// Whether a pass is currently running.
	pub fn is_running(&self) -> bool {
		!self.depth.get().is_zero()
	}

	/// The maximum nesting depth.
	#[must_use]
	pub fn max_depth() -> T::Depth {
		T::Depth::max_value()
	}

	/// Exchanges the slots of `self` and `other`.
	///
	/// # Errors
	///
	/// [`Error::IllegalStructuralMutation`] iff either signal is running.
	/// Swapping a signal with itself always succeeds.
	pub fn swap(&self, other: &Self) -> Result<(), Error> {
		if ptr::eq(self, other) {
			return Ok(());
		}
		if self.is_running() || other.is_running() {
			return Err(Error::IllegalStructuralMutation);
		}
		self.table.swap(&other.table);
		Ok(())
	}

	/// Runs one pass: hands each slot that this pass must visit to `visit`, in order.
	///
	/// Returns early with `Some` iff `visit` breaks.
	///
	/// No borrow of the signal is held while `visit` runs, so it **may** use this signal freely.
	/// If `visit` panics, bookkeeping still completes before the panic propagates.
	///
	/// # Panics
	///
	/// Iff the nesting depth would exceed [`.max_depth()`](`RawSignal::max_depth`).
	pub fn dispatch<B>(&self, mut visit: impl FnMut(T::SlotId, P) -> ControlFlow<B>) -> Option<B>
	where
		P: Clone,
	{
		let frame = EmitFrame::enter(self);
		let depth = frame.depth();
		let (start, end) = {
			let table = self.table.borrow();
			(table.start(), table.len())
		};

		for index in start..end {
			let next = self.table.borrow().visible(index, depth);
			if let Some((id, payload)) = next {
				if let ControlFlow::Break(b) = visit(id, payload) {
					return Some(b);
				}
			}
		}
		None
	}

	fn exit_frame(&self) {
		let depth = self.depth.get() - T::Depth::one();
		self.depth.set(depth);
		trace!(depth = %depth, "emission frame closed");

		if depth.is_zero() {
			let removed = self.table.borrow_mut().compact();
			if !removed.is_empty() {
				debug!(removed = removed.len(), "compacted slot storage");
			}
			drop(removed);
		}
	}
}
