use thiserror::Error;

use crate::traits::Counter;

/// Errors reported by slot registration, removal and structural mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum Error {
	/// Every identifier of the configured [`SignalTraits::SlotId`](`crate::SignalTraits::SlotId`) width
	/// has already been issued by this signal.
	///
	/// Identifiers are never reused, so this usually means a signal is being misused as a queue.
	#[error("all available slot ids for this signal have been exhausted")]
	IdentifierSpaceExhausted,
	/// The slot is not registered with this signal.
	///
	/// It was either never issued by it, belongs to another signal or has already been disconnected.
	#[error("unknown connection (slot {slot})")]
	UnknownConnection {
		/// The raw slot id that failed to resolve.
		slot: u128,
	},
	/// A signal was swapped or moved out of while one of the two had an emission in progress.
	#[error("signals can not be swapped or moved while emitting")]
	IllegalStructuralMutation,
	/// Another nested emission would overflow the configured [`SignalTraits::Depth`](`crate::SignalTraits::Depth`) width.
	#[error("maximum emission nesting depth exceeded")]
	NestingDepthExhausted,
}

impl Error {
	/// Creates an [`Error::UnknownConnection`] for `slot`.
	pub fn unknown_connection(slot: impl Counter) -> Self {
		Self::UnknownConnection {
			slot: slot.to_u128().unwrap_or(u128::MAX),
		}
	}
}
