use std::panic::{catch_unwind, AssertUnwindSafe};

use tendril::Signal;
use _validator::Validator;

#[test]
fn delivers_exactly_once() {
	let v = Validator::new();
	let signal = Signal::<i32>::new();
	let once = signal
		.connect_once({
			let v = v.clone();
			move |x| v.push(*x)
		})
		.unwrap();

	signal.emit(&1);
	v.expect([1]);
	assert!(!signal.connected(once));
	assert!(signal.is_empty());

	signal.emit(&2);
	v.expect([]);
}

#[test]
fn can_move_its_capture() {
	let signal = Signal::<(), Option<String>>::new();
	let message = String::from("done");
	signal.connect_once(move |_| Some(message)).unwrap();

	assert_eq!(signal.emit(&()), Some("done".to_string()));
	assert_eq!(signal.emit(&()), None);
}

#[test]
fn reentrant_emission_delivers_once() {
	let v = Validator::new();
	let signal = Signal::<i32>::new();

	signal
		.connect_extended({
			let v = v.clone();
			move |signal, _, x| {
				v.push(("A", *x));
				if *x == 0 {
					signal.emit(&1);
				}
			}
		})
		.unwrap();
	signal
		.connect_once({
			let v = v.clone();
			move |x| v.push(("once", *x))
		})
		.unwrap();

	// The nested pass consumes the slot. The outer pass still visits it but gets nothing.
	signal.emit(&0);
	v.expect([("A", 0), ("A", 1), ("once", 1)]);
	assert_eq!(signal.slot_count(), 1);
}

#[test]
fn once_slots_abstain_from_results_after_firing() {
	let signal = Signal::<i32, i32>::new();
	signal
		.connect_extended(|signal, _, x| {
			if *x == 0 {
				assert_eq!(signal.emit_last(&1), Some(10));
			}
			*x
		})
		.unwrap();
	signal.connect_once(|x| x * 10).unwrap();

	assert_eq!(signal.emit_collect::<Vec<_>>(&0), [0]);
}

#[test]
fn panicking_slot_is_still_disconnected() {
	let signal = Signal::<i32>::new();
	let once = signal.connect_once(|_| panic!("slot failed")).unwrap();

	let result = catch_unwind(AssertUnwindSafe(|| signal.emit(&0)));
	assert!(result.is_err());
	assert!(!signal.connected(once));
	assert_eq!(signal.storage_len(), 0);

	signal.emit(&1);
}

#[test]
fn disconnect_before_firing() {
	let v = Validator::new();
	let signal = Signal::<i32>::new();
	let once = signal
		.connect_once({
			let v = v.clone();
			move |x| v.push(*x)
		})
		.unwrap();

	signal.disconnect(once).unwrap();
	assert!(signal.disconnect(once).is_err());

	signal.emit(&1);
	v.expect([]);
}
