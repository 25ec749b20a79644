//! Dynamic-value serialization.
//!
//! Converts a [`DynamicValue`] produced by an executed script into its
//! [`HostValue`] equivalent. Dispatch is by variant tag; container variants
//! recurse through the registry they were handed, so a replacement registry
//! sees nested values too.
//!
//! The registry is a capability, not a closed switch: supply an alternate
//! [`SerializerRegistry`] through `EngineConfig` to support additional
//! inner-language types, and the engine will use it exclusively.

mod registry;
mod serializers;

pub use registry::{DefaultRegistry, SerializerRegistry};
pub use serializers::{
    BoolSerializer, DictSerializer, FloatSerializer, IntSerializer, ListSerializer,
    NullSerializer, SetSerializer, StrSerializer,
};

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use crate::error::Error;
    use crate::host::HostValue;
    use crate::value::{DynamicValue, OpaqueValue};

    use super::*;

    fn serialize(value: &DynamicValue) -> crate::error::Result<HostValue> {
        DefaultRegistry.serialize(value)
    }

    #[test]
    fn scalars_map_to_their_host_types() {
        assert_eq!(serialize(&DynamicValue::Null).unwrap(), HostValue::Null);
        assert_eq!(
            serialize(&DynamicValue::Bool(true)).unwrap(),
            HostValue::Bool(true)
        );
        assert_eq!(
            serialize(&DynamicValue::Int(i64::MAX)).unwrap(),
            HostValue::Int(i64::MAX)
        );
        assert_eq!(
            serialize(&DynamicValue::Float(2.5)).unwrap(),
            HostValue::Float(2.5)
        );
        assert_eq!(
            serialize(&DynamicValue::Str("héllo".into())).unwrap(),
            HostValue::Str("héllo".into())
        );
    }

    #[test]
    fn list_preserves_length_and_order() {
        let value = DynamicValue::List(vec![
            DynamicValue::Int(3),
            DynamicValue::Int(1),
            DynamicValue::Int(2),
        ]);
        assert_eq!(
            serialize(&value).unwrap(),
            HostValue::List(vec![
                HostValue::Int(3),
                HostValue::Int(1),
                HostValue::Int(2),
            ])
        );
    }

    #[test]
    fn mixed_nested_list() {
        let value = DynamicValue::List(vec![
            DynamicValue::Int(1),
            DynamicValue::Str("a".into()),
            DynamicValue::Dict(vec![(DynamicValue::Str("k".into()), DynamicValue::Int(2))]),
        ]);

        let mut expected_map = BTreeMap::new();
        expected_map.insert(HostValue::Str("k".into()), HostValue::Int(2));
        assert_eq!(
            serialize(&value).unwrap(),
            HostValue::List(vec![
                HostValue::Int(1),
                HostValue::Str("a".into()),
                HostValue::Map(expected_map),
            ])
        );
    }

    #[test]
    fn dict_serializes_keys_and_values_independently() {
        let value = DynamicValue::Dict(vec![
            (DynamicValue::Int(1), DynamicValue::Str("one".into())),
            (DynamicValue::Bool(false), DynamicValue::Null),
        ]);
        let HostValue::Map(map) = serialize(&value).unwrap() else {
            panic!("expected a map");
        };
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&HostValue::Int(1)), Some(&HostValue::Str("one".into())));
        assert_eq!(map.get(&HostValue::Bool(false)), Some(&HostValue::Null));
    }

    #[test]
    fn colliding_dict_keys_resolve_last_write_wins() {
        // Two distinct dynamic keys that serialize to the same host key.
        let value = DynamicValue::Dict(vec![
            (DynamicValue::Int(1), DynamicValue::Str("first".into())),
            (DynamicValue::Int(1), DynamicValue::Str("second".into())),
        ]);
        let HostValue::Map(map) = serialize(&value).unwrap() else {
            panic!("expected a map");
        };
        assert_eq!(map.len(), 1);
        assert_eq!(
            map.get(&HostValue::Int(1)),
            Some(&HostValue::Str("second".into()))
        );
    }

    #[test]
    fn set_collapses_duplicates() {
        let value = DynamicValue::Set(vec![
            DynamicValue::Int(1),
            DynamicValue::Int(2),
            DynamicValue::Int(1),
        ]);
        assert_eq!(
            serialize(&value).unwrap(),
            HostValue::Set(BTreeSet::from([HostValue::Int(1), HostValue::Int(2)]))
        );
    }

    #[test]
    fn opaque_fails_naming_the_inner_type() {
        let value = DynamicValue::Opaque(OpaqueValue::new("PyGenerator"));
        match serialize(&value) {
            Err(Error::SerializationUnsupported { type_name }) => {
                assert_eq!(type_name, "PyGenerator");
            }
            other => panic!("expected SerializationUnsupported, got {other:?}"),
        }
    }

    #[test]
    fn nested_opaque_fails_the_whole_container() {
        let value = DynamicValue::List(vec![
            DynamicValue::Int(1),
            DynamicValue::Opaque(OpaqueValue::new("PyModule")),
        ]);
        assert!(matches!(
            serialize(&value),
            Err(Error::SerializationUnsupported { .. })
        ));
    }

    #[test]
    fn serializers_revalidate_their_variant() {
        // Direct construction with the wrong variant is caught.
        let wrong = DynamicValue::Str("not a bool".into());
        match BoolSerializer::new(&wrong).serialize() {
            Err(Error::TypeAssertion { expected, actual }) => {
                assert_eq!(expected, crate::value::ValueKind::Bool);
                assert_eq!(actual, crate::value::ValueKind::Str);
            }
            other => panic!("expected TypeAssertion, got {other:?}"),
        }
    }

    #[test]
    fn custom_registry_sees_nested_values() {
        // A registry that adds Opaque support on top of the default mapping.
        struct LenientRegistry;

        impl SerializerRegistry for LenientRegistry {
            fn serialize(&self, value: &DynamicValue) -> crate::error::Result<HostValue> {
                match value {
                    DynamicValue::Opaque(opaque) => {
                        Ok(HostValue::Str(format!("<{}>", opaque.type_name())))
                    }
                    DynamicValue::List(_) => ListSerializer::new(value, self).serialize(),
                    other => DefaultRegistry.serialize(other),
                }
            }
        }

        let value = DynamicValue::List(vec![
            DynamicValue::Int(1),
            DynamicValue::Opaque(OpaqueValue::new("PyModule")),
        ]);
        assert_eq!(
            LenientRegistry.serialize(&value).unwrap(),
            HostValue::List(vec![
                HostValue::Int(1),
                HostValue::Str("<PyModule>".into()),
            ])
        );
    }

    #[test]
    fn deep_nesting_has_no_special_cases() {
        let mut value = DynamicValue::Int(7);
        for _ in 0..50 {
            value = DynamicValue::List(vec![value]);
        }
        let mut host = serialize(&value).unwrap();
        for _ in 0..50 {
            let HostValue::List(mut items) = host else {
                panic!("expected a list");
            };
            assert_eq!(items.len(), 1);
            host = items.pop().unwrap();
        }
        assert_eq!(host, HostValue::Int(7));
    }
}
