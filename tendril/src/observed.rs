use std::{
	ops::Deref,
	rc::{self, Rc},
	sync::{self, Arc},
};

/// A non-owning reference that can be resolved while its target is still alive.
///
/// Used by [`Signal::connect_observer`](`crate::Signal::connect_observer`) and
/// [`Signal::connect_weak`](`crate::Signal::connect_weak`), which disconnect themselves
/// the first time [`.resolve()`](`Observed::resolve`) fails.
pub trait Observed {
	/// The observed object.
	type Target: ?Sized;
	/// A temporary strong reference to [`Observed::Target`].
	type Strong: Deref<Target = Self::Target>;

	/// Returns a strong reference iff the target still exists.
	fn resolve(&self) -> Option<Self::Strong>;
}

impl<T: ?Sized> Observed for rc::Weak<T> {
	type Target = T;
	type Strong = Rc<T>;

	fn resolve(&self) -> Option<Self::Strong> {
		self.upgrade()
	}
}

impl<T: ?Sized> Observed for sync::Weak<T> {
	type Target = T;
	type Strong = Arc<T>;

	fn resolve(&self) -> Option<Self::Strong> {
		self.upgrade()
	}
}
