//! Type-level configuration of identifier and nesting depth widths.
//!
//! Widths only limit capacity. They never change dispatch semantics.

use core::{
	fmt::{Debug, Display},
	hash::Hash,
	marker::PhantomData,
};

use num_traits::{PrimInt, Unsigned};

/// An unsigned primitive integer usable as slot id or nesting depth.
///
/// Blanket-implemented for [`u8`], [`u16`], [`u32`], [`u64`], [`u128`] and [`usize`].
pub trait Counter: PrimInt + Unsigned + Debug + Display + Hash + 'static {}
impl<C: PrimInt + Unsigned + Debug + Display + Hash + 'static> Counter for C {}

/// Selects the numeric ranges a signal uses.
pub trait SignalTraits: 'static {
	/// Slot identifier type. One value is consumed per registration and never reused.
	type SlotId: Counter;
	/// Nesting depth counter type. Bounds how deeply emissions may re-enter the same signal.
	type Depth: Counter;
}

/// [`SignalTraits`] implementation from a pair of [`Counter`] types.
///
/// Never instantiated, only used as type argument.
pub struct Widths<I, D>(PhantomData<fn() -> (I, D)>);

impl<I: Counter, D: Counter> SignalTraits for Widths<I, D> {
	type SlotId = I;
	type Depth = D;
}

/// The widths used when none are specified: 64-bit slot ids and 32-bit nesting depth.
pub type DefaultTraits = Widths<u64, u32>;
