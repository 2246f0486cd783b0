//! Field-level deserialization rules through derived classes.

use chrono::{DateTime, TimeZone, Utc};
use vc_meta::de::{DeserializeDriver, DeserializePolicy};
use vc_meta::derive::Mapped;
use vc_meta::info::{ClassMeta, FieldMeta, TypeDescriptor};
use vc_meta::native::{Handle, Native, ObjectRef};
use vc_meta::policy::Lenient;
use vc_meta::registry::{Class, ClassRegistry, ObjectFactory};
use vc_meta::ser::{DateTimeFormat, SerializeDriver};
use vc_meta::{MapError, Mapping, Value};

#[derive(Mapped, Default, Debug, PartialEq)]
#[mapped(type_path = "shop::Order")]
struct Order {
    #[mapped(ty = "int")]
    id: u32,
    #[mapped(ty = "?string", de(optional))]
    note: Option<String>,
    #[mapped(ty = "string[]")]
    tags: Vec<String>,
    #[mapped(ty = "bool")]
    paid: bool,
    #[mapped(ty = "float")]
    total: f64,
    #[mapped(ty = "DateTime")]
    placed: DateTime<Utc>,
    #[mapped(ty = "int", de(ignore))]
    revision: i64,
    #[mapped(skip)]
    cached: Option<String>,
}

fn registry() -> ClassRegistry {
    let mut registry = ClassRegistry::new();
    registry.register::<Order>();
    registry
}

fn json(text: &str) -> Mapping {
    serde_json::from_str(text).unwrap()
}

const ORDER: &str = r#"{
    "id": "17",
    "tags": [1, 2, 3],
    "paid": "0",
    "total": "12.5",
    "placed": "2024-05-01T12:00:00Z",
    "revision": 9
}"#;

#[test]
fn values_are_coerced_to_declared_types() {
    let registry = registry();
    let order = DeserializeDriver::new(&registry)
        .deserialize::<Order>(&json(ORDER))
        .unwrap();

    let order = order.read();
    assert_eq!(order.id, 17);
    assert_eq!(order.note, None);
    assert_eq!(order.tags, ["1", "2", "3"]);
    assert!(!order.paid);
    assert_eq!(order.total, 12.5);
    assert_eq!(
        order.placed,
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    );
    assert_eq!(order.revision, 0);
    assert_eq!(order.cached, None);
}

#[test]
fn skipped_fields_are_not_mapped() {
    let registry = registry();
    let meta = registry.get("shop::Order").unwrap();

    assert!(meta.field("cached").is_none());
    assert_eq!(meta.iter().len(), 7);
    assert_eq!(
        Handle::new(Order::default()).to_object_ref().read().field_names(),
        ["id", "note", "tags", "paid", "total", "placed", "revision"]
    );
}

#[test]
fn optional_field_absent_is_null() {
    let registry = registry();
    let mut input = json(ORDER);
    input.remove("note");

    let order = DeserializeDriver::new(&registry)
        .deserialize::<Order>(&input)
        .unwrap();
    assert_eq!(order.read().note, None);
}

#[test]
fn required_field_absent_is_missing() {
    let registry = registry();
    let mut input = json(ORDER);
    input.remove("id");

    let err = DeserializeDriver::new(&registry)
        .deserialize::<Order>(&input)
        .unwrap_err();

    assert_eq!(
        err,
        MapError::MissingValue {
            field: String::from("id")
        }
        .in_field("shop::Order", "id")
    );
}

#[test]
fn scalar_array_rejects_a_scalar() {
    let registry = registry();
    let mut input = json(ORDER);
    input.insert("tags", Value::from("x"));

    let err = DeserializeDriver::new(&registry)
        .deserialize::<Order>(&input)
        .unwrap_err();

    assert_eq!(
        err.root_cause(),
        &MapError::TypeMismatch {
            expected: String::from("string[]"),
            found: "string",
            field: String::from("tags"),
        }
    );
}

#[test]
fn null_for_a_required_type() {
    let registry = registry();
    let mut input = json(ORDER);
    input.insert("total", Value::Null);

    let strict = DeserializeDriver::new(&registry);
    let err = strict.deserialize::<Order>(&input).unwrap_err();
    assert_eq!(
        err.root_cause(),
        &MapError::NullNotAllowed {
            ty: String::from("float")
        }
    );

    let lenient = strict.with_policy(&Lenient);
    let order = lenient.deserialize::<Order>(&input).unwrap();
    assert_eq!(order.read().total, 0.0);
}

#[test]
fn invalid_temporal_value() {
    let registry = registry();
    let mut input = json(ORDER);
    input.insert("placed", Value::Bool(true));

    let err = DeserializeDriver::new(&registry)
        .deserialize::<Order>(&input)
        .unwrap_err();
    assert_eq!(
        err.root_cause(),
        &MapError::InvalidTemporalValue {
            field: String::from("placed"),
            value: String::from("bool"),
        }
    );
}

#[test]
fn out_of_range_integer_is_a_mismatch() {
    let registry = registry();
    let mut input = json(ORDER);
    input.insert("id", Value::Int(-1));

    let err = DeserializeDriver::new(&registry)
        .deserialize::<Order>(&input)
        .unwrap_err();
    assert!(matches!(
        err.root_cause(),
        MapError::Custom(_) | MapError::TypeMismatch { .. }
    ));
    assert_eq!(err.field_path(), ["id"]);
}

#[test]
fn explicit_field_list() {
    let registry = registry();
    let driver = DeserializeDriver::new(&registry);

    let object = driver
        .deserialize_object(&json(r#"{"id": 3}"#), "shop::Order", Some(&["id"]))
        .unwrap();
    let order = object.downcast::<Order>().unwrap();
    assert_eq!(order.read().id, 3);
    assert!(order.read().tags.is_empty());

    let err = driver
        .deserialize_object(&json("{}"), "shop::Order", Some(&["missing"]))
        .unwrap_err();
    assert_eq!(
        err,
        MapError::UnknownField {
            type_path: String::from("shop::Order"),
            field: String::from("missing"),
        }
    );
}

#[test]
fn populate_an_existing_object() {
    let registry = registry();
    let order = Handle::new(Order {
        id: 1,
        revision: 4,
        ..Order::default()
    });

    DeserializeDriver::new(&registry)
        .deserialize_into(&json(r#"{"paid": 1}"#), &order.to_object_ref(), Some(&["paid"]))
        .unwrap();

    let order = order.read();
    assert!(order.paid);
    assert_eq!(order.id, 1);
    assert_eq!(order.revision, 4);
}

#[test]
fn round_trip_is_deep_equal() {
    let registry = registry();
    let original = Handle::new(Order {
        id: 8,
        note: Some(String::from("fragile")),
        tags: vec![String::from("a"), String::from("b")],
        paid: true,
        total: 99.25,
        placed: Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap(),
        revision: 0,
        cached: None,
    });

    for format in [DateTimeFormat::Rfc3339, DateTimeFormat::Timestamp] {
        let output = SerializeDriver::new(&registry)
            .with_datetime_format(format)
            .serialize_object(&original.to_object_ref(), None)
            .unwrap();

        let copy = DeserializeDriver::new(&registry)
            .deserialize::<Order>(&output)
            .unwrap();
        assert_eq!(copy, original);
        assert!(!copy.ptr_eq(&original));
    }
}

#[test]
fn unknown_type_is_reported() {
    let registry = ClassRegistry::new();
    let err = DeserializeDriver::new(&registry)
        .deserialize::<Order>(&json(ORDER))
        .unwrap_err();
    assert_eq!(err, MapError::UnknownType(String::from("shop::Order")));
}

#[test]
fn custom_policy_fills_missing_values() {
    struct Defaults;

    impl DeserializePolicy for Defaults {
        fn on_no_value_provided(
            &self,
            field: &str,
            ty: Option<&TypeDescriptor>,
            factory: &dyn ObjectFactory,
        ) -> Result<Native, MapError> {
            match field {
                "id" => Ok(Native::Int(42)),
                _ => match ty {
                    Some(ty) => ty.default_native(factory),
                    None => Ok(Native::Null),
                },
            }
        }
    }

    let registry = registry();
    let order = DeserializeDriver::new(&registry)
        .with_policy(&Defaults)
        .deserialize::<Order>(&Mapping::new())
        .unwrap();

    let order = order.read();
    assert_eq!(order.id, 42);
    assert!(order.tags.is_empty());
    assert_eq!(order.placed, DateTime::UNIX_EPOCH);
}

#[test]
fn factory_can_be_replaced() {
    fn preset() -> ObjectRef {
        ObjectRef::new(Order {
            revision: 7,
            ..Order::default()
        })
    }

    let mut registry = ClassRegistry::new();
    registry.insert(Order::class_meta().with_factory(preset));

    let order = DeserializeDriver::new(&registry)
        .deserialize::<Order>(&json(ORDER))
        .unwrap();
    assert_eq!(order.read().revision, 7);
}

#[test]
fn metadata_can_be_built_by_hand() {
    #[derive(Mapped, Default)]
    #[mapped(type_path = "manual::Pair")]
    struct Pair {
        left: i64,
        right: i64,
    }

    let mut registry = ClassRegistry::new();
    registry.insert(ClassMeta::new::<Pair>(
        "manual::Pair",
        [
            FieldMeta::new("left").with_type("int"),
            FieldMeta::new("right").with_type("int"),
        ],
    ));

    let pair = DeserializeDriver::new(&registry)
        .deserialize::<Pair>(&json(r#"{"left": "1", "right": 2.9}"#))
        .unwrap();
    assert_eq!((pair.read().left, pair.read().right), (1, 2));
}
