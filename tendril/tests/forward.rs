use std::rc::Rc;

use tendril::{Signal, Widths};
use _validator::Validator;

#[test]
fn forwards_to_another_signal() {
	let v = Validator::new();
	let source = Signal::<i32, i32>::new();
	let target = Rc::new(Signal::<i32, i32>::new());
	target
		.connect({
			let v = v.clone();
			move |x| {
				v.push(*x);
				x * 2
			}
		})
		.unwrap();

	source.connect(|x| x + 1).unwrap();
	let forward = source.connect_forward(&target).unwrap();

	assert_eq!(source.emit(&3), 6);
	v.expect([3]);
	assert_eq!(source.emit_collect::<Vec<_>>(&4), [5, 8]);
	v.expect([4]);

	source.disconnect(forward).unwrap();
	assert_eq!(source.emit(&3), 4);
	v.expect([]);
}

#[test]
fn empty_target_abstains() {
	let source = Signal::<i32, i32>::new();
	let target = Rc::new(Signal::<i32, i32>::new());
	source.connect(|x| x + 1).unwrap();
	source.connect_forward(&target).unwrap();

	assert_eq!(source.emit_last(&1), Some(2));
}

#[test]
fn prunes_itself_once_the_target_is_gone() {
	let source = Signal::<i32, i32>::new();
	let target = Rc::new(Signal::<i32, i32>::new());
	target.connect(|x| *x).unwrap();
	let forward = source.connect_forward(&target).unwrap();

	drop(target);
	assert!(source.connected(forward));
	assert_eq!(source.emit_last(&1), None);
	assert!(!source.connected(forward));
	assert_eq!(source.storage_len(), 0);
}

#[test]
fn chains_across_identifier_widths() {
	let v = Validator::new();
	let source = Signal::<str, (), Widths<u8, u8>>::new();
	let middle = Rc::new(Signal::<str>::new());
	let target = Rc::new(Signal::<str, (), Widths<u16, u8>>::new());
	target
		.connect({
			let v = v.clone();
			move |text: &str| v.push(text.len())
		})
		.unwrap();

	middle.connect_forward(&target).unwrap();
	source.connect_forward(&middle).unwrap();

	source.emit("four");
	v.expect([4]);
}
