//! Tombstoning slot storage.

use core::mem;

use num_traits::{Bounded, CheckedAdd, One, ToPrimitive, Zero};

use crate::{traits::SignalTraits, Error};

/// Whether a [`SlotRecord`] still receives emissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState<D> {
	/// Visible to every pass.
	Active,
	/// Marked for removal at nesting depth `depth`.
	///
	/// Passes at `depth` or shallower that were already running at that time still deliver to it.
	Disconnected {
		/// Nesting depth at the time of the disconnect.
		depth: D,
	},
}

/// One registration: id, payload and disconnect state.
pub struct SlotRecord<P, T: SignalTraits> {
	id: T::SlotId,
	payload: P,
	state: SlotState<T::Depth>,
}

impl<P, T: SignalTraits> SlotRecord<P, T> {
	/// This record's slot id.
	pub fn id(&self) -> T::SlotId {
		self.id
	}

	/// The stored payload.
	pub fn payload(&self) -> &P {
		&self.payload
	}

	/// This record's current state.
	pub fn state(&self) -> SlotState<T::Depth> {
		self.state
	}

	/// Whether the record hasn't been disconnected yet.
	pub fn is_active(&self) -> bool {
		self.state == SlotState::Active
	}

	/// Whether a pass running at nesting depth `depth` must still invoke this record.
	pub fn is_visible_at(&self, depth: T::Depth) -> bool {
		match self.state {
			SlotState::Active => true,
			SlotState::Disconnected { depth: disconnected } => disconnected >= depth,
		}
	}
}

/// Insertion-ordered slot storage, sorted by ascending id.
///
/// Removal only marks records. They are physically dropped by [`SlotTable::compact`],
/// which the owner **must** only call while no pass holds an index range into the table.
pub struct SlotTable<P, T: SignalTraits> {
	records: Vec<SlotRecord<P, T>>,
	next_id: Option<T::SlotId>,
	issued: usize,
	active_count: usize,
	logical_start: usize,
}

impl<P, T: SignalTraits> Default for SlotTable<P, T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<P, T: SignalTraits> SlotTable<P, T> {
	/// Creates an empty [`SlotTable`]. Does not allocate.
	#[must_use]
	pub fn new() -> Self {
		Self::with_capacity(0)
	}

	/// Creates an empty [`SlotTable`] with room for `capacity` records.
	#[must_use]
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			records: Vec::with_capacity(capacity),
			next_id: Some(T::SlotId::zero()),
			issued: 0,
			active_count: 0,
			logical_start: 0,
		}
	}

	/// Reserves room for at least `additional` more records.
	pub fn reserve(&mut self, additional: usize) {
		self.records.reserve(additional);
	}

	/// Appends a new active record and returns its freshly issued id.
	///
	/// # Errors
	///
	/// [`Error::IdentifierSpaceExhausted`] iff every id of the configured width has been issued.
	pub fn append(&mut self, payload: P) -> Result<T::SlotId, Error> {
		let id = self.next_id.ok_or(Error::IdentifierSpaceExhausted)?;
		self.next_id = id.checked_add(&T::SlotId::one());
		self.issued = self.issued.saturating_add(1);
		self.records.push(SlotRecord {
			id,
			payload,
			state: SlotState::Active,
		});
		self.active_count += 1;
		Ok(id)
	}

	fn position(&self, id: T::SlotId) -> Option<usize> {
		self.records[self.logical_start..]
			.binary_search_by_key(&id, SlotRecord::id)
			.ok()
			.map(|offset| self.logical_start + offset)
	}

	/// Looks up a record that hasn't been bulk-cleared. O(log n).
	///
	/// Disconnected records awaiting compaction are still found.
	pub fn find(&self, id: T::SlotId) -> Option<&SlotRecord<P, T>> {
		self.position(id).map(|index| &self.records[index])
	}

	/// Whether `id` names an active record.
	pub fn is_active(&self, id: T::SlotId) -> bool {
		self.find(id).is_some_and(SlotRecord::is_active)
	}

	/// Marks the record `id` as disconnected at nesting depth `depth`.
	///
	/// # Errors
	///
	/// [`Error::UnknownConnection`] iff there is no such record or it is already disconnected.
	pub fn mark_inactive(&mut self, id: T::SlotId, depth: T::Depth) -> Result<(), Error> {
		let unknown = || Error::unknown_connection(id);
		let index = self.position(id).ok_or_else(unknown)?;
		let record = &mut self.records[index];
		if !record.is_active() {
			return Err(unknown());
		}
		record.state = SlotState::Disconnected { depth };
		self.active_count -= 1;
		Ok(())
	}

	/// Disconnects every record.
	///
	/// Iff `running` is `false`, storage is truncated right away and the removed records are returned,
	/// so that they can be dropped outside of any borrow of the table.
	///
	/// Otherwise each active record is marked as disconnected at `depth`, exactly as if disconnected
	/// one by one, and the whole current range is excluded from lookups and from passes that start later.
	/// Storage is then reclaimed by the next [`SlotTable::compact`].
	#[must_use = "Dropping the removed records while borrowing the table may re-enter it."]
	pub fn bulk_clear(&mut self, depth: T::Depth, running: bool) -> Vec<SlotRecord<P, T>> {
		self.active_count = 0;
		if running {
			for record in &mut self.records[self.logical_start..] {
				if record.is_active() {
					record.state = SlotState::Disconnected { depth };
				}
			}
			self.logical_start = self.records.len();
			Vec::new()
		} else {
			self.logical_start = 0;
			mem::take(&mut self.records)
		}
	}

	/// Drops the bulk-cleared prefix and every disconnected record, preserving order.
	///
	/// Returns the removed records so the caller can drop them outside of any borrow.
	#[must_use = "Dropping the removed records while borrowing the table may re-enter it."]
	pub fn compact(&mut self) -> Vec<SlotRecord<P, T>> {
		if self.records.len() == self.active_count {
			debug_assert_eq!(self.logical_start, 0);
			return Vec::new();
		}

		let mut removed: Vec<_> = self.records.drain(..self.logical_start).collect();
		self.logical_start = 0;

		let mut kept = 0;
		for index in 0..self.records.len() {
			if self.records[index].is_active() {
				self.records.swap(kept, index);
				kept += 1;
			}
		}
		removed.extend(self.records.drain(kept..));

		debug_assert_eq!(self.records.len(), self.active_count);
		removed
	}

	/// Clones out the id and payload at `index` iff a pass at nesting depth `depth` must invoke it.
	pub fn visible(&self, index: usize, depth: T::Depth) -> Option<(T::SlotId, P)>
	where
		P: Clone,
	{
		self.records
			.get(index)
			.filter(|record| record.is_visible_at(depth))
			.map(|record| (record.id, record.payload.clone()))
	}

	/// Index of the first record not excluded by a bulk-clear.
	pub fn start(&self) -> usize {
		self.logical_start
	}

	/// Number of physically stored records, including ones awaiting compaction.
	pub fn len(&self) -> usize {
		self.records.len()
	}

	/// Whether no records are stored at all.
	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	/// Number of active records.
	pub fn active_count(&self) -> usize {
		self.active_count
	}

	/// How many registrations this table could ever hold,
	/// limited by both the id width and the largest possible allocation.
	pub fn max_size(&self) -> usize {
		let ids = T::SlotId::max_value()
			.to_usize()
			.map_or(usize::MAX, |max| max.saturating_add(1));
		let storage = isize::MAX.unsigned_abs() / mem::size_of::<SlotRecord<P, T>>().max(1);
		ids.min(storage)
	}

	/// How many more registrations can be made before ids run out.
	pub fn remaining_slots(&self) -> usize {
		if self.next_id.is_none() {
			0
		} else {
			self.max_size().saturating_sub(self.issued)
		}
	}

	/// Iterates over all stored records in table order, including disconnected ones.
	pub fn iter(&self) -> impl '_ + Iterator<Item = &SlotRecord<P, T>> {
		self.records.iter()
	}
}
