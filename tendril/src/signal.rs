use std::{
	cell::Cell,
	convert::Infallible,
	fmt::{self, Debug, Formatter},
	ops::ControlFlow,
	ptr,
	rc::Rc,
};

use phloem::{DefaultTraits, Error, RawSignal, SignalTraits};
use tracing::trace;

use crate::{
	adapter::{self, Slot},
	observed::Observed,
	Connection, SignalId,
};

/// A typed event source that calls its connected slots, in connection order, whenever it is emitted.
///
/// Slots take the emitted arguments by reference as `&A`. Use a tuple for multiple arguments.  
/// `R` is the slot return type. `T` selects id and nesting depth widths.
///
/// Every method takes `&self`, and slots **may** call any of them on the signal that is
/// currently calling them, including [`.emit(…)`](`Signal::emit`).
///
/// # Logic
///
/// - A pass visits the slots that were connected when it started, in connection order.
/// - Slots connected during a pass are first called by the next pass.
/// - Disconnecting a slot during a pass does **not** prevent that pass (or any outer one) from calling it.
///   Passes starting afterwards don't see it, with one exception: while the enclosing outer pass
///   is still running, later nested passes at the very depth of the disconnect still call it.
/// - [`.disconnect_all()`](`Signal::disconnect_all`) behaves like disconnecting each slot individually.
///
/// # Threading
///
/// [`Signal`] is neither [`Send`] nor [`Sync`].
pub struct Signal<A: ?Sized, R = (), T: SignalTraits = DefaultTraits> {
	id: Cell<SignalId>,
	raw: RawSignal<Slot<A, R, T>, T>,
}

impl<A: ?Sized, R, T: SignalTraits> Debug for Signal<A, R, T> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Signal")
			.field("id", &self.id.get())
			.field("raw", &self.raw)
			.finish()
	}
}

impl<A: ?Sized, R, T: SignalTraits> Default for Signal<A, R, T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<A: ?Sized, R, T: SignalTraits> Signal<A, R, T> {
	/// Creates a new [`Signal`] without slots. Does not allocate.
	#[must_use]
	pub fn new() -> Self {
		Self::with_capacity(0)
	}

	/// Creates a new [`Signal`] with storage for `capacity` slots.
	#[must_use]
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			id: SignalId::next().into(),
			raw: RawSignal::with_capacity(capacity),
		}
	}

	/// Reserves storage for at least `additional` more slots.
	pub fn reserve(&self, additional: usize) {
		self.raw.reserve(additional);
	}

	/// This signal's current identity, as found in its [`Connection`]s.
	#[must_use]
	pub fn id(&self) -> SignalId {
		self.id.get()
	}

	fn insert(&self, slot: Slot<A, R, T>) -> Result<Connection<T>, Error> {
		let slot = self.raw.connect(slot)?;
		Ok(Connection::new(self.id(), slot))
	}

	/// Connects `slot`.
	///
	/// # Errors
	///
	/// [`Error::IdentifierSpaceExhausted`] iff this signal ran out of slot ids.
	pub fn connect(&self, slot: impl 'static + Fn(&A) -> R) -> Result<Connection<T>, Error> {
		self.insert(adapter::plain(slot))
	}

	/// Connects a `slot` that also receives this signal and its own [`Connection`],
	/// e.g. to disconnect itself or other slots.
	///
	/// # Errors
	///
	/// [`Error::IdentifierSpaceExhausted`] iff this signal ran out of slot ids.
	pub fn connect_extended(
		&self,
		slot: impl 'static + Fn(&Self, Connection<T>, &A) -> R,
	) -> Result<Connection<T>, Error> {
		self.insert(adapter::extended(move |signal, connection, args| {
			Some(slot(signal, connection, args))
		}))
	}

	/// Connects a `slot` that is called at most once.
	///
	/// The slot is disconnected right before it is called.
	///
	/// # Errors
	///
	/// [`Error::IdentifierSpaceExhausted`] iff this signal ran out of slot ids.
	pub fn connect_once(&self, slot: impl 'static + FnOnce(&A) -> R) -> Result<Connection<T>, Error> {
		self.insert(adapter::once(slot))
	}

	/// Connects a weakly-referenced callable.
	///
	/// The slot does not keep `target` alive. Once it can't be resolved anymore,
	/// the slot disconnects itself the next time it would be called.
	///
	/// # Errors
	///
	/// [`Error::IdentifierSpaceExhausted`] iff this signal ran out of slot ids.
	pub fn connect_weak<O>(&self, target: O) -> Result<Connection<T>, Error>
	where
		O: 'static + Observed,
		O::Target: Fn(&A) -> R,
	{
		self.connect_observer(target, |target, args| target(args))
	}

	/// Connects `method` for a weakly-referenced object.
	///
	/// The slot does not keep `target` alive. Once it can't be resolved anymore,
	/// the slot disconnects itself the next time it would be called.
	///
	/// # Errors
	///
	/// [`Error::IdentifierSpaceExhausted`] iff this signal ran out of slot ids.
	pub fn connect_observer<O: 'static + Observed>(
		&self,
		target: O,
		method: impl 'static + Fn(&O::Target, &A) -> R,
	) -> Result<Connection<T>, Error> {
		self.insert(adapter::observer(target, method))
	}

	/// Forwards emissions to `target` without keeping it alive.
	///
	/// Once `target` has been dropped, the slot disconnects itself the next time it would be called.
	///
	/// # Errors
	///
	/// [`Error::IdentifierSpaceExhausted`] iff this signal ran out of slot ids.
	pub fn connect_forward<U: SignalTraits>(
		&self,
		target: &Rc<Signal<A, R, U>>,
	) -> Result<Connection<T>, Error>
	where
		A: 'static,
		R: 'static,
	{
		self.insert(adapter::forward(Rc::downgrade(target)))
	}

	/// Disconnects the slot named by `connection`.
	///
	/// Passes that are already running still call it.
	///
	/// # Errors
	///
	/// [`Error::UnknownConnection`] iff `connection` wasn't issued by this signal or is already disconnected.
	pub fn disconnect(&self, connection: Connection<T>) -> Result<(), Error> {
		if connection.signal() != self.id() {
			return Err(Error::unknown_connection(connection.slot()));
		}
		self.raw.disconnect(connection.slot())
	}

	pub(crate) fn release(&self, connection: Connection<T>) {
		if let Err(error) = self.disconnect(connection) {
			trace!(%connection, %error, "slot was already disconnected");
		}
	}

	/// Disconnects all slots.
	pub fn disconnect_all(&self) {
		self.raw.disconnect_all();
	}

	/// Whether `connection` names a currently connected slot of this signal.
	#[must_use]
	pub fn connected(&self, connection: Connection<T>) -> bool {
		connection.signal() == self.id() && self.raw.is_connected(connection.slot())
	}

	/// The number of connected slots.
	#[must_use]
	pub fn slot_count(&self) -> usize {
		self.raw.slot_count()
	}

	/// Whether no slots are connected.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.raw.is_empty()
	}

	/// The number of stored slot records, including disconnected ones awaiting removal.
	///
	/// Equals [`.slot_count()`](`Signal::slot_count`) right after any outermost emission.
	#[must_use]
	pub fn storage_len(&self) -> usize {
		self.raw.storage_len()
	}

	/// How many slots this signal could ever register.
	#[must_use]
	pub fn max_size(&self) -> usize {
		self.raw.max_size()
	}

	/// How many more slots can be connected before ids run out.
	#[must_use]
	pub fn remaining_slots(&self) -> usize {
		self.raw.remaining_slots()
	}

	/// The number of currently running, nested emissions.
	#[must_use]
	pub fn depth(&self) -> T::Depth {
		self.raw.depth()
	}

	/// Whether this signal is currently emitting.
	#[must_use]
	pub fn is_running(&self) -> bool {
		self.raw.is_running()
	}

	/// The maximum nesting depth of emissions.
	#[must_use]
	pub fn max_depth() -> T::Depth {
		RawSignal::<Slot<A, R, T>, T>::max_depth()
	}

	/// Exchanges slots and identity with `other`.
	///
	/// [`Connection`]s follow their slots.
	///
	/// # Errors
	///
	/// [`Error::IllegalStructuralMutation`] iff either signal is emitting.
	pub fn swap(&self, other: &Self) -> Result<(), Error> {
		if ptr::eq(self, other) {
			return Ok(());
		}
		self.raw.swap(&other.raw)?;
		self.id.swap(&other.id);
		Ok(())
	}

	/// Moves all slots and the identity of this signal into a new one,
	/// leaving a fresh empty signal behind.
	///
	/// # Errors
	///
	/// [`Error::IllegalStructuralMutation`] iff this signal is emitting.
	pub fn take(&self) -> Result<Self, Error> {
		let taken = Self::with_capacity(0);
		self.swap(&taken)?;
		Ok(taken)
	}

	fn dispatch<B>(&self, args: &A, mut visit: impl FnMut(R) -> ControlFlow<B>) -> Option<B> {
		let id = self.id();
		self.raw.dispatch(|slot_id, slot| {
			match slot(self, Connection::new(id, slot_id), args) {
				Some(result) => visit(result),
				None => ControlFlow::Continue(()),
			}
		})
	}

	/// Calls each connected slot with `args` and returns the result of the last one that was called.
	///
	/// Returns [`None`] iff no slot delivered.
	///
	/// # Panics
	///
	/// Panics from slots propagate unchanged, after bookkeeping has completed.  
	/// Iff emissions would nest deeper than [`Signal::max_depth`].
	pub fn emit_last(&self, args: &A) -> Option<R> {
		let mut last = None;
		self.dispatch(args, |result| {
			last = Some(result);
			ControlFlow::<Infallible>::Continue(())
		});
		last
	}

	/// Calls each connected slot with `args`.
	///
	/// Returns the result of the last slot that was called, or [`R::default()`](`Default::default`).
	///
	/// # Panics
	///
	/// Panics from slots propagate unchanged, after bookkeeping has completed.  
	/// Iff emissions would nest deeper than [`Signal::max_depth`].
	pub fn emit(&self, args: &A) -> R
	where
		R: Default,
	{
		self.emit_last(args).unwrap_or_default()
	}

	/// Calls each connected slot with `args` and collects their results in call order.
	///
	/// # Panics
	///
	/// Panics from slots propagate unchanged, after bookkeeping has completed.  
	/// Iff emissions would nest deeper than [`Signal::max_depth`].
	pub fn emit_collect<C: FromIterator<R>>(&self, args: &A) -> C {
		let mut results = Vec::new();
		self.dispatch(args, |result| {
			results.push(result);
			ControlFlow::<Infallible>::Continue(())
		});
		results.into_iter().collect()
	}

	/// Borrows this signal as plain emitting function.
	pub fn as_fn(&self) -> impl '_ + Fn(&A) -> R
	where
		R: Default,
	{
		move |args: &A| self.emit(args)
	}
}

impl<A: ?Sized, V: Default, E, T: SignalTraits> Signal<A, Result<V, E>, T> {
	/// Calls each connected slot with `args`, stopping at the first one that returns [`Err`].
	///
	/// Returns that error, or else the last [`Ok`] value, or else [`V::default()`](`Default::default`).
	///
	/// # Errors
	///
	/// The first error returned by a slot.
	///
	/// # Panics
	///
	/// Panics from slots propagate unchanged, after bookkeeping has completed.  
	/// Iff emissions would nest deeper than [`Signal::max_depth`].
	pub fn try_emit(&self, args: &A) -> Result<V, E> {
		let mut last = None;
		match self.dispatch(args, |result| match result {
			Ok(value) => {
				last = Some(value);
				ControlFlow::Continue(())
			}
			Err(error) => ControlFlow::Break(error),
		}) {
			Some(error) => Err(error),
			None => Ok(last.unwrap_or_default()),
		}
	}
}
