use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use jsdb_value::{
    create_value,
    test_utils::{mirror, static_loader, RecordingLoader},
    JsObjectProperty, JsVariable, PropertyDescriptor, PropertyProxy, RawName, SetValueCallback,
    SharedLoader, ValueMirror, ValueProxy, ValueType, VariableCapabilities, VariableError,
    VariableProxy,
};
use tracing::info;

fn init() {
    jsdb_common::logging::ensure_test_logging(None);
    info!("Running test");
}

fn all_tags() -> Vec<ValueMirror> {
    ["function", "error", "object", "date", "regexp", "array", "number", "string", "symbol"]
        .into_iter()
        .enumerate()
        .map(|(i, tag)| ValueMirror::new(ValueType::parse(tag), tag).with_handle(i as u64))
        .collect()
}

#[test]
fn test_every_variable_defaults_to_immutable_and_readable() {
    init();
    let loader = static_loader();

    for mirror in all_tags() {
        let variable = VariableProxy::new(Arc::clone(&loader), mirror.clone(), "v");
        assert!(!variable.is_mutable());
        assert!(variable.is_readable());

        let property = PropertyProxy::new(Arc::clone(&loader), mirror, "p");
        assert!(!property.is_mutable());
        assert!(property.is_readable());
    }
}

#[test]
fn test_set_value_rejected_when_immutable() {
    init();
    let recording = Arc::new(RecordingLoader::default());
    let loader: SharedLoader = recording.clone();
    let variable = VariableProxy::new(loader, mirror::number(1.0), "count");

    let called = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&called);
    let callback: Box<dyn SetValueCallback> = Box::new(move |_: Result<(), String>| {
        flag.store(true, Ordering::SeqCst);
    });

    let err = variable.set_value("2", Some(callback)).unwrap_err();
    assert!(matches!(err, VariableError::UnsupportedOperation { operation: "set_value", .. }));

    assert!(!called.load(Ordering::SeqCst));
    assert!(recording.writes().is_empty());
    assert_eq!(variable.value().value_string(), "1");
    assert_eq!(variable.to_string(), "[JsVariable: name=count,value=1]");
}

#[test]
fn test_set_value_on_property_rejected_when_immutable() {
    init();
    let property = PropertyProxy::new(static_loader(), mirror::string("a"), "s");
    let err = property.set_value("b", None).unwrap_err();
    assert!(matches!(err, VariableError::UnsupportedOperation { .. }));
    assert_eq!(property.value().value_string(), "a");
}

#[test]
fn test_set_value_delegates_when_mutable() {
    init();
    let recording = Arc::new(RecordingLoader::default());
    let loader: SharedLoader = recording.clone();
    let variable = VariableProxy::new(loader, mirror::number(1.0), 4u64)
        .with_capabilities(VariableCapabilities { mutable: true, readable: true });

    let outcome = Arc::new(parking_lot::Mutex::new(None));
    let sink = Arc::clone(&outcome);
    let callback: Box<dyn SetValueCallback> = Box::new(move |result: Result<(), String>| {
        *sink.lock() = Some(result);
    });

    variable.set_value("5", Some(callback)).unwrap();
    assert_eq!(*outcome.lock(), Some(Ok(())));
    assert_eq!(recording.writes(), [(RawName::Index(4), "5".to_string())]);
}

#[test]
fn test_set_value_reports_remote_failure() {
    init();
    let loader: SharedLoader = Arc::new(RecordingLoader::rejecting());
    let variable = VariableProxy::new(loader, mirror::number(1.0), "x")
        .with_capabilities(VariableCapabilities { mutable: true, readable: true });

    let outcome = Arc::new(parking_lot::Mutex::new(None));
    let sink = Arc::clone(&outcome);
    let callback: Box<dyn SetValueCallback> = Box::new(move |result: Result<(), String>| {
        *sink.lock() = Some(result);
    });

    let err = variable.set_value("2", Some(callback)).unwrap_err();
    assert!(matches!(err, VariableError::Load(_)));
    assert!(matches!(&*outcome.lock(), Some(Err(message)) if message.contains("write_variable")));
}

#[test]
fn test_evaluate_get_always_fails() {
    init();
    let loader = static_loader();

    let plain = PropertyProxy::new(Arc::clone(&loader), mirror::number(1.0), "plain");
    let with_getter = PropertyProxy::new(Arc::clone(&loader), mirror::undefined(), "computed")
        .with_descriptor(PropertyDescriptor {
            getter: Some(create_value(&loader, mirror::function(7, "get computed"))),
            ..Default::default()
        });

    for property in [&plain, &with_getter] {
        let called = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&called);
        let err = property
            .evaluate_get(Box::new(move |_: Result<ValueProxy, String>| {
                flag.store(true, Ordering::SeqCst);
            }))
            .unwrap_err();
        assert_eq!(err, VariableError::NotImplemented { operation: "evaluate_get" });
        assert!(!called.load(Ordering::SeqCst));
    }

    assert_eq!(with_getter.getter_as_function().unwrap().name(), "get computed");
}

#[test]
fn test_default_property_flags() {
    init();
    let property = PropertyProxy::new(static_loader(), mirror::number(1.0), "x");
    assert!(property.is_writable());
    assert!(property.is_configurable());
    assert!(property.is_enumerable());
    assert!(property.getter().is_none());
    assert!(property.setter().is_none());
}

#[test]
fn test_descriptor_overrides_are_per_instance() {
    init();
    let loader = static_loader();
    let locked = PropertyProxy::new(Arc::clone(&loader), mirror::number(1.0), "locked")
        .with_descriptor(PropertyDescriptor {
            writable: false,
            configurable: false,
            enumerable: false,
            ..Default::default()
        });
    let open = PropertyProxy::new(loader, mirror::number(1.0), "open");

    assert!(!locked.is_writable() && !locked.is_configurable() && !locked.is_enumerable());
    assert!(open.is_writable() && open.is_configurable() && open.is_enumerable());
}

#[test]
fn test_display_contract() {
    init();
    let variable = VariableProxy::new(static_loader(), mirror::number(42.0), "count");
    assert_eq!(variable.to_string(), "[JsVariable: name=count,value=42]");

    let element = VariableProxy::new(static_loader(), mirror::string("x"), 0u64);
    assert_eq!(element.to_string(), "[JsVariable: name=0,value=x]");
}

#[test]
fn test_same_mirror_bound_twice_gives_independent_values() {
    init();
    let loader = static_loader();
    let shared = Arc::new(mirror::object(5, "Object"));

    let first = VariableProxy::new(Arc::clone(&loader), Arc::clone(&shared), "a");
    let second = VariableProxy::new(Arc::clone(&loader), Arc::clone(&shared), "b");

    assert!(!std::ptr::eq(first.value(), second.value()));
    assert!(Arc::ptr_eq(first.value().mirror(), second.value().mirror()));
    assert_eq!(first.value().value_type(), second.value().value_type());
}

#[test]
fn test_narrowing_through_trait_objects() {
    init();
    let loader = static_loader();
    let variables: Vec<Box<dyn JsVariable>> = vec![
        Box::new(VariableProxy::new(Arc::clone(&loader), mirror::number(1.0), "v")),
        Box::new(PropertyProxy::new(loader, mirror::number(2.0), "p")),
    ];

    let properties: Vec<_> =
        variables.iter().filter_map(|variable| variable.as_object_property()).collect();
    assert_eq!(properties.len(), 1);
    assert_eq!(properties[0].name(), "p");
}
