//! Integration tests for view materialization
//!
//! Builds views from realistic flat configuration maps: scalar coercion,
//! defaults, arrays from sequences and dotted-index keys, and nested views.

use std::sync::Arc;

use scr_engine::materialize::{
    materialize, EnumDescriptor, Lookup, MaterializeOptions, Materializer, MemberDescriptor,
    MemberKind, ViewInstance, ViewSchema, ViewValue,
};
use scr_sdk::{Properties, PropertyValue, ResolveError, StaticTypeResolver, TypeHandle};

// ============================================================================
// Fixtures
// ============================================================================

fn e1() -> Arc<EnumDescriptor> {
    EnumDescriptor::new("E1", ["a", "b", "c"])
}

fn resolver() -> StaticTypeResolver {
    StaticTypeResolver::with_types(["java.lang.String", "java.lang.Integer"])
}

/// One member of every kind
fn members(array: bool) -> Vec<MemberDescriptor> {
    let declare = |name: &str, kind: MemberKind| {
        if array {
            MemberDescriptor::array(name, kind)
        } else {
            MemberDescriptor::scalar(name, kind)
        }
    };
    vec![
        declare("bool", MemberKind::Boolean),
        declare("byt", MemberKind::Byte),
        declare("clas", MemberKind::TypeRef),
        declare("e1", MemberKind::Enum(e1())),
        declare("doubl", MemberKind::Double),
        declare("floa", MemberKind::Float),
        declare("integer", MemberKind::Int),
        declare("lon", MemberKind::Long),
        declare("shor", MemberKind::Short),
        declare("string", MemberKind::String),
    ]
}

fn a1() -> Arc<ViewSchema> {
    ViewSchema::builder("A1").members(members(false)).build().unwrap()
}

fn a1_arrays() -> Arc<ViewSchema> {
    ViewSchema::builder("A1Arrays").members(members(true)).build().unwrap()
}

fn a2() -> Arc<ViewSchema> {
    ViewSchema::builder("A2")
        .member(MemberDescriptor::scalar("bool", MemberKind::Boolean).with_default(true))
        .member(MemberDescriptor::scalar("byt", MemberKind::Byte).with_default(5i64))
        .member(MemberDescriptor::scalar("clas", MemberKind::TypeRef).with_default("java.lang.Integer"))
        .member(MemberDescriptor::scalar("e1", MemberKind::Enum(e1())).with_default("b"))
        .member(MemberDescriptor::scalar("doubl", MemberKind::Double).with_default(-2i64))
        .member(MemberDescriptor::scalar("floa", MemberKind::Float).with_default(-4i64))
        .member(MemberDescriptor::scalar("integer", MemberKind::Int).with_default(-5i64))
        .member(MemberDescriptor::scalar("lon", MemberKind::Long).with_default(i64::MIN))
        .member(MemberDescriptor::scalar("shor", MemberKind::Short).with_default(-8i64))
        .member(MemberDescriptor::scalar("string", MemberKind::String).with_default("default"))
        .build()
        .unwrap()
}

fn b1() -> Arc<ViewSchema> {
    ViewSchema::builder("B1")
        .member(MemberDescriptor::scalar("a1", MemberKind::View(a1())))
        .member(MemberDescriptor::array("a1array", MemberKind::View(a1())))
        .build()
        .unwrap()
}

fn c1() -> Arc<ViewSchema> {
    ViewSchema::builder("C1")
        .member(MemberDescriptor::scalar("b1", MemberKind::View(b1())))
        .member(MemberDescriptor::array("b1array", MemberKind::View(b1())))
        .build()
        .unwrap()
}

fn props<const N: usize>(entries: [(&str, PropertyValue); N]) -> Properties {
    entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

fn all_values() -> Properties {
    props([
        ("bool", "true".into()),
        ("byt", 12i64.into()),
        ("clas", "java.lang.String".into()),
        ("e1", "a".into()),
        ("doubl", "3.14".into()),
        ("floa", 500i64.into()),
        ("integer", 3.0f64.into()),
        ("lon", "12345678".into()),
        ("shor", 3i64.into()),
        ("string", 3i64.into()),
    ])
}

fn array_values() -> Properties {
    props([
        ("bool", vec![true, false].into()),
        ("byt", vec![12i8, 3].into()),
        ("clas", vec!["java.lang.String", "java.lang.Integer"].into()),
        ("e1", vec!["a", "b"].into()),
        ("doubl", vec![3.14f64, 2.78, 9.0].into()),
        ("floa", vec![500f32, 37.44].into()),
        ("integer", vec![3i32, 6, 9].into()),
        ("lon", vec![12345678i64, -1].into()),
        ("shor", vec![3i16, 88].into()),
        ("string", PropertyValue::Array(vec![])),
    ])
}

/// Spread `nested` under `<key>.<index>.`
fn nest(target: &mut Properties, key: &str, index: usize, nested: &Properties) {
    for (member, value) in nested {
        target.insert(format!("{}.{}.{}", key, index, member), value.clone());
    }
}

fn b1_values() -> Properties {
    let a1_values = all_values();
    let mut values = Properties::new();
    nest(&mut values, "a1", 0, &a1_values);
    for i in 0..3 {
        nest(&mut values, "a1array", i, &a1_values);
    }
    values
}

fn enum_symbol(value: &ViewValue) -> Option<&str> {
    value.as_enum().map(|e| e.symbol.as_str())
}

fn check_a1(view: &ViewInstance) {
    assert_eq!(view.get("bool"), Some(&ViewValue::Bool(true)));
    assert_eq!(view.get("byt"), Some(&ViewValue::Byte(12)));
    assert_eq!(
        view.get("clas").and_then(ViewValue::as_type).map(TypeHandle::name),
        Some("java.lang.String")
    );
    assert_eq!(view.get("e1").and_then(enum_symbol), Some("a"));
    assert_eq!(view.get("doubl"), Some(&ViewValue::Double(3.14)));
    assert_eq!(view.get("floa"), Some(&ViewValue::Float(500.0)));
    assert_eq!(view.get("integer"), Some(&ViewValue::Int(3)));
    assert_eq!(view.get("lon"), Some(&ViewValue::Long(12345678)));
    assert_eq!(view.get("shor"), Some(&ViewValue::Short(3)));
    assert_eq!(view.get_str("string"), Some("3"));
}

fn check_b1(view: &ViewInstance) {
    check_a1(view.get_view("a1").expect("a1"));
    let array = view.get_array("a1array").expect("a1array");
    assert_eq!(array.len(), 3);
    for element in array {
        check_a1(element.as_view().expect("view element"));
    }
}

// ============================================================================
// Scalar Members
// ============================================================================

mod scalars {
    use super::*;

    #[test]
    fn test_all_kinds_coerced() {
        let view = materialize(&a1(), &all_values(), &resolver());
        assert_eq!(view.schema_name(), "A1");
        check_a1(&view);
    }

    #[test]
    fn test_empty_config_gives_zeros_and_absence() {
        let view = materialize(&a1(), &Properties::new(), &resolver());

        assert_eq!(view.get("bool"), Some(&ViewValue::Bool(false)));
        assert_eq!(view.get("byt"), Some(&ViewValue::Byte(0)));
        assert_eq!(view.get("doubl"), Some(&ViewValue::Double(0.0)));
        assert_eq!(view.get("floa"), Some(&ViewValue::Float(0.0)));
        assert_eq!(view.get("integer"), Some(&ViewValue::Int(0)));
        assert_eq!(view.get("lon"), Some(&ViewValue::Long(0)));
        assert_eq!(view.get("shor"), Some(&ViewValue::Short(0)));

        for absent in ["clas", "e1", "string"] {
            assert_eq!(view.lookup(absent), Lookup::Absent, "{}", absent);
        }
    }

    #[test]
    fn test_scalar_from_sequence_takes_first_element() {
        let view = materialize(&a1(), &array_values(), &resolver());

        assert_eq!(view.get("bool"), Some(&ViewValue::Bool(true)));
        assert_eq!(view.get("byt"), Some(&ViewValue::Byte(12)));
        assert_eq!(
            view.get("clas").and_then(ViewValue::as_type).map(TypeHandle::name),
            Some("java.lang.String")
        );
        assert_eq!(view.get("e1").and_then(enum_symbol), Some("a"));
        assert_eq!(view.get("doubl"), Some(&ViewValue::Double(3.14)));
        assert_eq!(view.get("integer"), Some(&ViewValue::Int(3)));
        assert_eq!(view.get("lon"), Some(&ViewValue::Long(12345678)));
        // empty sequence counts as no value
        assert_eq!(view.lookup("string"), Lookup::Absent);
    }

    #[test]
    fn test_defaults_apply_only_when_unset() {
        let defaulted = materialize(&a2(), &Properties::new(), &resolver());
        assert_eq!(defaulted.get("bool"), Some(&ViewValue::Bool(true)));
        assert_eq!(defaulted.get("byt"), Some(&ViewValue::Byte(5)));
        assert_eq!(
            defaulted.get("clas").and_then(ViewValue::as_type).map(TypeHandle::name),
            Some("java.lang.Integer")
        );
        assert_eq!(defaulted.get("e1").and_then(enum_symbol), Some("b"));
        assert_eq!(defaulted.get("doubl"), Some(&ViewValue::Double(-2.0)));
        assert_eq!(defaulted.get("floa"), Some(&ViewValue::Float(-4.0)));
        assert_eq!(defaulted.get("integer"), Some(&ViewValue::Int(-5)));
        assert_eq!(defaulted.get("lon"), Some(&ViewValue::Long(i64::MIN)));
        assert_eq!(defaulted.get("shor"), Some(&ViewValue::Short(-8)));
        assert_eq!(defaulted.get_str("string"), Some("default"));

        let configured = materialize(&a2(), &all_values(), &resolver());
        check_a1(&configured);
    }

    #[test]
    fn test_uncoercible_value_falls_back() {
        let schema = ViewSchema::builder("Fallback")
            .member(MemberDescriptor::scalar("port", MemberKind::Int).with_default(8080i64))
            .member(MemberDescriptor::scalar("retries", MemberKind::Int))
            .member(MemberDescriptor::scalar("mode", MemberKind::Enum(e1())))
            .build()
            .unwrap();
        let config = props([
            ("port", "eighty".into()),
            ("retries", "lots".into()),
            ("mode", "A".into()),
        ]);

        let view = materialize(&schema, &config, &resolver());
        assert_eq!(view.get("port"), Some(&ViewValue::Int(8080)));
        assert_eq!(view.get("retries"), Some(&ViewValue::Int(0)));
        assert_eq!(view.lookup("mode"), Lookup::Absent);
    }

    #[test]
    fn test_out_of_range_text_falls_back() {
        let schema = ViewSchema::builder("Narrow")
            .member(MemberDescriptor::scalar("b", MemberKind::Byte).with_default(5i64))
            .member(MemberDescriptor::scalar("i", MemberKind::Int).with_default(7i64))
            .member(MemberDescriptor::scalar("s", MemberKind::Short))
            .build()
            .unwrap();
        let config = props([
            ("b", "300".into()),
            ("i", "99999999999".into()),
            ("s", "40000".into()),
        ]);

        let view = materialize(&schema, &config, &resolver());
        assert_eq!(view.get("b"), Some(&ViewValue::Byte(5)));
        assert_eq!(view.get("i"), Some(&ViewValue::Int(7)));
        assert_eq!(view.get("s"), Some(&ViewValue::Short(0)));
    }

    #[test]
    fn test_member_keys_use_fixup() {
        let schema = ViewSchema::builder("Keys")
            .member(MemberDescriptor::scalar("service_ranking", MemberKind::Int))
            .member(MemberDescriptor::scalar("my__name", MemberKind::String))
            .member(MemberDescriptor::scalar("$$price", MemberKind::Double))
            .build()
            .unwrap();
        let config = props([
            ("service.ranking", 10i64.into()),
            ("my_name", "alpha".into()),
            ("$price", "9.5".into()),
        ]);

        let view = materialize(&schema, &config, &resolver());
        assert_eq!(view.get("service_ranking"), Some(&ViewValue::Int(10)));
        assert_eq!(view.get_str("my__name"), Some("alpha"));
        assert_eq!(view.get_f64("$$price"), Some(9.5));
        assert_eq!(view.lookup("service.ranking"), Lookup::Unknown);
    }
}

// ============================================================================
// Array Members
// ============================================================================

mod arrays {
    use super::*;

    #[test]
    fn test_empty_config_gives_absent_arrays() {
        let view = materialize(&a1_arrays(), &Properties::new(), &resolver());
        for member in a1_arrays().members() {
            assert_eq!(view.lookup(member.name()), Lookup::Absent, "{}", member.name());
        }
    }

    #[test]
    fn test_scalar_becomes_single_element() {
        let view = materialize(&a1_arrays(), &all_values(), &resolver());

        assert_eq!(view.get_array("bool"), Some(&[ViewValue::Bool(true)][..]));
        assert_eq!(view.get_array("byt"), Some(&[ViewValue::Byte(12)][..]));
        assert_eq!(view.get_array("integer"), Some(&[ViewValue::Int(3)][..]));
        assert_eq!(view.get_array("string"), Some(&[ViewValue::String("3".into())][..]));
        assert_eq!(view.get_array("e1").map(<[ViewValue]>::len), Some(1));
    }

    #[test]
    fn test_sequences_coerced_element_wise() {
        let view = materialize(&a1_arrays(), &array_values(), &resolver());

        assert_eq!(
            view.get_array("bool"),
            Some(&[ViewValue::Bool(true), ViewValue::Bool(false)][..])
        );
        assert_eq!(
            view.get_array("doubl"),
            Some(&[ViewValue::Double(3.14), ViewValue::Double(2.78), ViewValue::Double(9.0)][..])
        );
        assert_eq!(
            view.get_array("floa"),
            Some(&[ViewValue::Float(500.0), ViewValue::Float(37.44)][..])
        );
        assert_eq!(
            view.get_array("lon"),
            Some(&[ViewValue::Long(12345678), ViewValue::Long(-1)][..])
        );
        let classes: Vec<_> = view
            .get_array("clas")
            .unwrap()
            .iter()
            .filter_map(|v| v.as_type().map(TypeHandle::name))
            .collect();
        assert_eq!(classes, vec!["java.lang.String", "java.lang.Integer"]);
        let symbols: Vec<_> = view.get_array("e1").unwrap().iter().filter_map(enum_symbol).collect();
        assert_eq!(symbols, vec!["a", "b"]);

        // an explicitly empty sequence is an empty array, not absence
        assert_eq!(view.get_array("string"), Some(&[][..]));
    }

    #[test]
    fn test_dotted_index_keys() {
        let config = props([
            ("integer.0", 1i64.into()),
            ("integer.1", "2".into()),
            ("integer.2", 3.9f64.into()),
        ]);
        let view = materialize(&a1_arrays(), &config, &resolver());
        assert_eq!(
            view.get_array("integer"),
            Some(&[ViewValue::Int(1), ViewValue::Int(2), ViewValue::Int(3)][..])
        );
    }

    #[test]
    fn test_index_gap_stops_probing() {
        let config = props([("lon.0", 7i64.into()), ("lon.2", 9i64.into())]);
        let view = materialize(&a1_arrays(), &config, &resolver());
        assert_eq!(view.get_array("lon"), Some(&[ViewValue::Long(7)][..]));
    }

    #[test]
    fn test_failed_elements_keep_array_length() {
        let config = props([
            ("integer", vec!["1", "x", "3"].into()),
            ("clas", vec!["java.lang.String", "java.lang.Missing"].into()),
        ]);
        let view = materialize(&a1_arrays(), &config, &resolver());

        assert_eq!(
            view.get_array("integer"),
            Some(&[ViewValue::Int(1), ViewValue::Int(0), ViewValue::Int(3)][..])
        );
        let classes = view.get_array("clas").unwrap();
        assert_eq!(classes.len(), 2);
        assert!(classes[1].is_null());
    }

    #[test]
    fn test_array_default() {
        let schema = ViewSchema::builder("Hosts")
            .member(MemberDescriptor::array("hosts", MemberKind::String).with_default(vec!["localhost"]))
            .build()
            .unwrap();

        let view = materialize(&schema, &Properties::new(), &resolver());
        assert_eq!(view.get_array("hosts"), Some(&[ViewValue::String("localhost".into())][..]));
    }
}

// ============================================================================
// Nested Views
// ============================================================================

mod nested {
    use super::*;

    #[test]
    fn test_one_level() {
        let view = materialize(&b1(), &b1_values(), &resolver());
        check_b1(&view);
    }

    #[test]
    fn test_two_levels() {
        let b1_values = b1_values();
        let mut values = Properties::new();
        nest(&mut values, "b1", 0, &b1_values);
        for i in 0..3 {
            nest(&mut values, "b1array", i, &b1_values);
        }

        let view = materialize(&c1(), &values, &resolver());
        check_b1(view.get_view("b1").expect("b1"));
        let array = view.get_array("b1array").expect("b1array");
        assert_eq!(array.len(), 3);
        for element in array {
            check_b1(element.as_view().expect("view element"));
        }
    }

    #[test]
    fn test_empty_config_gives_absent_views() {
        let view = materialize(&c1(), &Properties::new(), &resolver());
        assert_eq!(view.lookup("b1"), Lookup::Absent);
        assert_eq!(view.lookup("b1array"), Lookup::Absent);
    }

    #[test]
    fn test_pre_shaped_sequence_of_maps() {
        let first = props([("integer", 1i64.into()), ("string", "one".into())]);
        let second = props([("integer", 2i64.into())]);
        let config = props([(
            "a1array",
            PropertyValue::Array(vec![PropertyValue::Map(first), PropertyValue::Map(second)]),
        )]);

        let view = materialize(&b1(), &config, &resolver());
        let array = view.get_array("a1array").expect("a1array");
        assert_eq!(array.len(), 2);

        let first = array[0].as_view().unwrap();
        let second = array[1].as_view().unwrap();
        assert_eq!(first.get("integer"), Some(&ViewValue::Int(1)));
        assert_eq!(first.get_str("string"), Some("one"));
        assert_eq!(second.get("integer"), Some(&ViewValue::Int(2)));
        assert_eq!(second.lookup("string"), Lookup::Absent);
    }

    #[test]
    fn test_map_value_for_single_view() {
        let config = props([("a1", PropertyValue::Map(all_values()))]);
        let view = materialize(&b1(), &config, &resolver());
        check_a1(view.get_view("a1").expect("a1"));
    }

    #[test]
    fn test_nested_views_disabled() {
        let engine = Materializer::new(MaterializeOptions { nested_views: false });
        let view = engine.materialize(&b1(), &b1_values(), &resolver());
        assert_eq!(view.lookup("a1"), Lookup::Absent);
        assert_eq!(view.lookup("a1array"), Lookup::Absent);
    }
}

// ============================================================================
// Purity and Resolver Failures
// ============================================================================

mod purity {
    use super::*;

    #[test]
    fn test_deterministic() {
        let values = b1_values();
        let first = materialize(&b1(), &values, &resolver());
        let second = materialize(&b1(), &values, &resolver());
        assert_eq!(first, second);
    }

    #[test]
    fn test_resolver_error_gives_absence() {
        let failing = |name: &str| -> Result<TypeHandle, ResolveError> {
            Err(ResolveError::LoadFailed {
                name: name.to_string(),
                reason: "bundle uninstalled".to_string(),
            })
        };
        let view = materialize(&a1(), &all_values(), &failing);
        assert_eq!(view.lookup("clas"), Lookup::Absent);
        assert_eq!(view.get("integer"), Some(&ViewValue::Int(3)));
    }

    #[test]
    fn test_resolver_panic_gives_absence() {
        let panicking = |_: &str| -> Result<TypeHandle, ResolveError> { panic!("loader crashed") };
        let view = materialize(&a1(), &all_values(), &panicking);
        assert_eq!(view.lookup("clas"), Lookup::Absent);
        assert_eq!(view.get_bool("bool"), Some(true));
    }

    #[test]
    fn test_concurrent_materialization() {
        let schema = b1();
        let values = b1_values();
        let resolver = resolver();
        let expected = materialize(&schema, &values, &resolver);

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| assert_eq!(materialize(&schema, &values, &resolver), expected));
            }
        });
    }
}
