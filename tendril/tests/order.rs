use tendril::Signal;
use _validator::Validator;

#[test]
fn slots_run_in_connection_order() {
	_tracing::init();
	let v = Validator::new();
	let signal = Signal::<i32>::new();

	for name in ["A", "B", "C"] {
		let v = v.clone();
		signal.connect(move |x| v.push((name, *x))).unwrap();
	}

	signal.emit(&5);
	v.expect([("A", 5), ("B", 5), ("C", 5)]);

	signal.emit(&6);
	v.expect([("A", 6), ("B", 6), ("C", 6)]);
}

#[test]
fn disconnect_before_emit() {
	let v = Validator::new();
	let signal = Signal::<i32>::new();

	let a = signal
		.connect({
			let v = v.clone();
			move |x| v.push(("A", *x))
		})
		.unwrap();
	signal
		.connect({
			let v = v.clone();
			move |x| v.push(("B", *x))
		})
		.unwrap();

	signal.disconnect(a).unwrap();
	assert!(!signal.connected(a));
	assert_eq!(signal.slot_count(), 1);

	signal.emit(&1);
	v.expect([("B", 1)]);
	assert_eq!(signal.slot_count(), 1);
}

#[test]
fn storage_is_compacted_after_emission() {
	let signal = Signal::<()>::new();
	let connections: Vec<_> = (0..10).map(|_| signal.connect(|_| ()).unwrap()).collect();

	for connection in connections.iter().step_by(3) {
		signal.disconnect(*connection).unwrap();
	}
	assert_eq!(signal.slot_count(), 6);
	assert_eq!(signal.storage_len(), 10);

	signal.emit(&());
	assert_eq!(signal.storage_len(), signal.slot_count());
	assert_eq!(signal.slot_count(), 6);

	for connection in connections.iter().skip(1).step_by(3) {
		assert!(signal.connected(*connection));
	}
}

#[test]
fn empty_signal_returns_default() {
	let signal = Signal::<i32, i32>::new();
	assert!(signal.is_empty());
	assert_eq!(signal.emit(&3), 0);
	assert_eq!(signal.emit_last(&3), None);
	assert_eq!(signal.emit_collect::<Vec<_>>(&3), Vec::<i32>::new());
}

#[test]
fn results() {
	let signal = Signal::<i32, i32>::new();
	signal.connect(|x| x + 1).unwrap();
	signal.connect(|x| x * 10).unwrap();

	assert_eq!(signal.emit(&4), 40);
	assert_eq!(signal.emit_last(&4), Some(40));
	assert_eq!(signal.emit_collect::<Vec<_>>(&4), [5, 40]);

	let emit = signal.as_fn();
	assert_eq!(emit(&2), 20);
}

#[test]
fn unsized_arguments() {
	let v = Validator::new();
	let signal = Signal::<str>::new();
	signal
		.connect({
			let v = v.clone();
			move |text: &str| v.push(text.to_uppercase())
		})
		.unwrap();

	signal.emit("hello");
	v.expect(["HELLO".to_string()]);
}

#[test]
fn tuple_arguments() {
	let signal = Signal::<(i32, &'static str), String>::new();
	signal.connect(|&(count, unit)| format!("{count} {unit}")).unwrap();

	assert_eq!(signal.emit(&(3, "apples")), "3 apples");
}
