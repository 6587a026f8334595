//! Contains functions for generating arbitrary values for use by [`Proptest`](https://crates.io/crates/proptest).

use proptest::{
    collection::{btree_map, vec},
    prelude::*,
};

use crate::{Address, TypedValue, TypedValueTag, I256, U256};

pub fn u256_arb() -> impl Strategy<Value = U256> {
    vec(any::<u8>(), 0..32).prop_map(|b| U256::from_little_endian(b.as_slice()))
}

pub fn i256_arb() -> impl Strategy<Value = I256> {
    u256_arb().prop_map(I256::from_raw)
}

pub fn address_arb() -> impl Strategy<Value = Address> {
    "[GC][A-Z2-7]{55}".prop_map(|s: String| s.parse().expect("should parse address"))
}

pub fn symbol_arb() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_]{1,32}"
}

/// Generates any non-container value.
pub fn leaf_arb() -> impl Strategy<Value = TypedValue> {
    // If compiler brings you here it most probably means you've added a variant to
    // `TypedValueTag` but forgot to add generator for it.
    let stub: Option<TypedValueTag> = None;
    if let Some(tag) = stub {
        match tag {
            TypedValueTag::Void
            | TypedValueTag::Bool
            | TypedValueTag::U32
            | TypedValueTag::I32
            | TypedValueTag::U64
            | TypedValueTag::I64
            | TypedValueTag::U128
            | TypedValueTag::I128
            | TypedValueTag::U256
            | TypedValueTag::I256
            | TypedValueTag::Timepoint
            | TypedValueTag::Duration
            | TypedValueTag::Bytes
            | TypedValueTag::String
            | TypedValueTag::Symbol
            | TypedValueTag::Address
            | TypedValueTag::Vector
            | TypedValueTag::Map => (),
        }
    };

    prop_oneof![
        Just(TypedValue::Void),
        any::<bool>().prop_map(TypedValue::Bool),
        any::<u32>().prop_map(TypedValue::U32),
        any::<i32>().prop_map(TypedValue::I32),
        any::<u64>().prop_map(TypedValue::U64),
        any::<i64>().prop_map(TypedValue::I64),
        any::<u128>().prop_map(TypedValue::U128),
        any::<i128>().prop_map(TypedValue::I128),
        u256_arb().prop_map(TypedValue::U256),
        i256_arb().prop_map(TypedValue::I256),
        any::<u64>().prop_map(TypedValue::Timepoint),
        any::<u64>().prop_map(TypedValue::Duration),
        vec(any::<u8>(), 0..64).prop_map(TypedValue::Bytes),
        ".*".prop_map(TypedValue::String),
        symbol_arb().prop_map(TypedValue::Symbol),
        address_arb().prop_map(TypedValue::Address),
    ]
}

/// Generates arbitrarily nested values. Maps are keyed by distinct symbols.
pub fn typed_value_arb() -> impl Strategy<Value = TypedValue> {
    leaf_arb().prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            vec(inner.clone(), 0..4).prop_map(TypedValue::Vector),
            btree_map(symbol_arb(), inner, 0..4).prop_map(|entries| {
                TypedValue::Map(
                    entries
                        .into_iter()
                        .map(|(key, value)| (TypedValue::Symbol(key), value))
                        .collect(),
                )
            }),
        ]
    })
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::typed_value_arb;
    use crate::bytesrepr;

    proptest! {
        #[test]
        fn test_typed_value_wire_roundtrip(value in typed_value_arb()) {
            bytesrepr::test_serialization_roundtrip(&value);
        }

        #[test]
        fn test_typed_value_rejects_truncation(value in typed_value_arb()) {
            let bytes = bytesrepr::ToBytes::to_bytes(&value).unwrap();
            let truncated = bytes[..bytes.len() - 1].to_vec();
            prop_assert!(bytesrepr::deserialize::<crate::TypedValue>(truncated).is_err());
        }
    }
}
