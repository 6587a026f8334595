//! Conversion between [`TypedValue`] and the representations used outside this crate.
//!
//! Values returned from contract execution may arrive as
//!
//! * rich JSON: `{"type": "<tag>", "value": <payload>}`, which is also what [`to_json`] emits,
//! * raw JSON: `{"<tag>": <payload>}`, the bare string `"void"`, or `null`,
//! * the hex-encoded wire bytes of the value.
//!
//! Tags are case-insensitive and may carry an `scv` prefix. Every form is converted to the
//! canonical `TypedValue` here, so the formatter never has to inspect external shapes.

use serde_json::{json, Map, Value};

use types::{
    bytesrepr::{self, ToBytes},
    is_valid_symbol, Address, TypedValue, TypedValueTag, I256, U256,
};

use crate::ConversionError;

const TYPE_KEY: &str = "type";
const VALUE_KEY: &str = "value";
const MAP_KEY_KEY: &str = "key";
const MAP_VAL_KEY: &str = "val";
const TAG_PREFIX: &str = "scv";
const HEX_PREFIX: &str = "0x";

/// The form in which a returned value is supplied.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Representation {
    /// Rich or raw JSON.
    Json,
    /// Hex-encoded wire bytes.
    WireHex,
}

/// Parses `input` in the given representation. Blank input is a missing value.
pub fn parse(
    input: &str,
    representation: Representation,
) -> Result<Option<TypedValue>, ConversionError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    let value = match representation {
        Representation::Json => from_json_str(input)?,
        Representation::WireHex => from_wire_hex(input)?,
    };
    Ok(Some(value))
}

pub fn from_json_str(input: &str) -> Result<TypedValue, ConversionError> {
    let json: Value = serde_json::from_str(input)?;
    from_json(&json)
}

/// Converts a rich or raw JSON value.
pub fn from_json(json: &Value) -> Result<TypedValue, ConversionError> {
    match json {
        Value::Null => Ok(TypedValue::Void),
        Value::String(name) => match resolve_tag(name)? {
            TypedValueTag::Void => Ok(TypedValue::Void),
            tag => Err(invalid_payload(tag, "missing payload")),
        },
        Value::Object(object) => {
            if let Some(type_name) = object.get(TYPE_KEY) {
                let type_name = type_name
                    .as_str()
                    .ok_or_else(|| ConversionError::UnknownType(type_name.to_string()))?;
                let payload = object.get(VALUE_KEY).unwrap_or(&Value::Null);
                return convert_payload(resolve_tag(type_name)?, payload);
            }
            let mut entries = object.iter();
            match (entries.next(), entries.next()) {
                (Some((type_name, payload)), None) => {
                    convert_payload(resolve_tag(type_name)?, payload)
                }
                _ => Err(ConversionError::Json(format!(
                    "expected a typed value, found {}",
                    json
                ))),
            }
        }
        other => Err(ConversionError::Json(format!(
            "expected a typed value, found {}",
            other
        ))),
    }
}

/// Decodes hex-encoded wire bytes, with or without a `0x` prefix.
pub fn from_wire_hex(input: &str) -> Result<TypedValue, ConversionError> {
    let bytes = base16::decode(strip_hex_prefix(input.trim()))?;
    Ok(bytesrepr::deserialize(bytes)?)
}

/// Encodes `value` as lowercase hex wire bytes.
pub fn to_wire_hex(value: &TypedValue) -> Result<String, ConversionError> {
    Ok(base16::encode_lower(&value.to_bytes()?))
}

/// Converts `value` to rich JSON.
///
/// 128- and 256-bit integers are written as decimal strings and bytes as lowercase hex.
pub fn to_json(value: &TypedValue) -> Value {
    let payload = match value {
        TypedValue::Void => Value::Null,
        TypedValue::Bool(value) => json!(value),
        TypedValue::U32(value) => json!(value),
        TypedValue::I32(value) => json!(value),
        TypedValue::U64(value) | TypedValue::Timepoint(value) | TypedValue::Duration(value) => {
            json!(value)
        }
        TypedValue::I64(value) => json!(value),
        TypedValue::U128(value) => json!(value.to_string()),
        TypedValue::I128(value) => json!(value.to_string()),
        TypedValue::U256(value) => json!(value.to_string()),
        TypedValue::I256(value) => json!(value.to_string()),
        TypedValue::Bytes(bytes) => json!(base16::encode_lower(bytes)),
        TypedValue::String(value) | TypedValue::Symbol(value) => json!(value),
        TypedValue::Address(address) => json!(address.as_str()),
        TypedValue::Vector(values) => Value::Array(values.iter().map(to_json).collect()),
        TypedValue::Map(entries) => Value::Array(
            entries
                .iter()
                .map(|(key, value)| json!({ MAP_KEY_KEY: to_json(key), MAP_VAL_KEY: to_json(value) }))
                .collect(),
        ),
    };
    json!({ TYPE_KEY: value.tag().name(), VALUE_KEY: payload })
}

fn strip_hex_prefix(input: &str) -> &str {
    if input.starts_with(HEX_PREFIX) {
        &input[HEX_PREFIX.len()..]
    } else {
        input
    }
}

fn resolve_tag(name: &str) -> Result<TypedValueTag, ConversionError> {
    let lower = name.to_lowercase();
    let unprefixed = if lower.len() > TAG_PREFIX.len() && lower.starts_with(TAG_PREFIX) {
        &lower[TAG_PREFIX.len()..]
    } else {
        lower.as_str()
    };
    let canonical = match unprefixed {
        "vector" => "vec",
        "sym" => "symbol",
        "str" => "string",
        "b" => "bool",
        other => other,
    };
    TypedValueTag::from_name(canonical).ok_or_else(|| ConversionError::UnknownType(name.to_string()))
}

fn invalid_payload(tag: TypedValueTag, reason: &str) -> ConversionError {
    ConversionError::InvalidPayload {
        tag: tag.name(),
        reason: reason.to_string(),
    }
}

/// Returns the text of an integer given as a JSON number or string.
fn integer_text(tag: TypedValueTag, payload: &Value) -> Result<String, ConversionError> {
    match payload {
        Value::Number(number) => Ok(number.to_string()),
        Value::String(text) => Ok(text.trim().to_string()),
        other => Err(invalid_payload(tag, &format!("expected an integer, found {}", other))),
    }
}

fn integer<T: std::str::FromStr>(tag: TypedValueTag, payload: &Value) -> Result<T, ConversionError> {
    let text = integer_text(tag, payload)?;
    text.parse()
        .map_err(|_| invalid_payload(tag, &format!("'{}' is out of range", text)))
}

fn part<T: std::str::FromStr>(
    tag: TypedValueTag,
    parts: &Map<String, Value>,
    name: &str,
) -> Result<T, ConversionError> {
    let value = parts
        .get(name)
        .ok_or_else(|| invalid_payload(tag, &format!("missing part '{}'", name)))?;
    integer(tag, value)
}

fn u256_from_parts(
    tag: TypedValueTag,
    parts: &Map<String, Value>,
    hi_hi: u64,
) -> Result<U256, ConversionError> {
    let hi_lo: u64 = part(tag, parts, "hi_lo")?;
    let lo_hi: u64 = part(tag, parts, "lo_hi")?;
    let lo_lo: u64 = part(tag, parts, "lo_lo")?;
    Ok((U256::from(hi_hi) << 192usize)
        | (U256::from(hi_lo) << 128usize)
        | (U256::from(lo_hi) << 64usize)
        | U256::from(lo_lo))
}

fn text(tag: TypedValueTag, payload: &Value) -> Result<&str, ConversionError> {
    payload
        .as_str()
        .ok_or_else(|| invalid_payload(tag, &format!("expected a string, found {}", payload)))
}

fn convert_payload(tag: TypedValueTag, payload: &Value) -> Result<TypedValue, ConversionError> {
    let value = match tag {
        TypedValueTag::Void => TypedValue::Void,
        TypedValueTag::Bool => TypedValue::Bool(
            payload
                .as_bool()
                .ok_or_else(|| invalid_payload(tag, &format!("expected a boolean, found {}", payload)))?,
        ),
        TypedValueTag::U32 => TypedValue::U32(integer(tag, payload)?),
        TypedValueTag::I32 => TypedValue::I32(integer(tag, payload)?),
        TypedValueTag::U64 => TypedValue::U64(integer(tag, payload)?),
        TypedValueTag::I64 => TypedValue::I64(integer(tag, payload)?),
        TypedValueTag::Timepoint => TypedValue::Timepoint(integer(tag, payload)?),
        TypedValueTag::Duration => TypedValue::Duration(integer(tag, payload)?),
        TypedValueTag::U128 => match payload {
            Value::Object(parts) => {
                let hi: u64 = part(tag, parts, "hi")?;
                let lo: u64 = part(tag, parts, "lo")?;
                TypedValue::U128((u128::from(hi) << 64) | u128::from(lo))
            }
            _ => TypedValue::U128(integer(tag, payload)?),
        },
        TypedValueTag::I128 => match payload {
            Value::Object(parts) => {
                let hi: i64 = part(tag, parts, "hi")?;
                let lo: u64 = part(tag, parts, "lo")?;
                TypedValue::I128((i128::from(hi) << 64) | i128::from(lo))
            }
            _ => TypedValue::I128(integer(tag, payload)?),
        },
        TypedValueTag::U256 => match payload {
            Value::Object(parts) => {
                let hi_hi: u64 = part(tag, parts, "hi_hi")?;
                TypedValue::U256(u256_from_parts(tag, parts, hi_hi)?)
            }
            _ => TypedValue::U256(U256::from_literal(&integer_text(tag, payload)?)?),
        },
        TypedValueTag::I256 => match payload {
            Value::Object(parts) => {
                // The high limb carries the sign; the combined bits are two's complement.
                let hi_hi: i64 = part(tag, parts, "hi_hi")?;
                let raw = u256_from_parts(tag, parts, hi_hi as u64)?;
                TypedValue::I256(I256::from_raw(raw))
            }
            _ => TypedValue::I256(I256::from_literal(&integer_text(tag, payload)?)?),
        },
        TypedValueTag::Bytes => {
            TypedValue::Bytes(base16::decode(strip_hex_prefix(text(tag, payload)?))?)
        }
        TypedValueTag::String => TypedValue::String(text(tag, payload)?.to_string()),
        TypedValueTag::Symbol => {
            let symbol = text(tag, payload)?;
            if !is_valid_symbol(symbol) {
                return Err(ConversionError::InvalidSymbol(symbol.to_string()));
            }
            TypedValue::symbol(symbol)
        }
        TypedValueTag::Address => TypedValue::Address(text(tag, payload)?.parse::<Address>()?),
        TypedValueTag::Vector => {
            let elements = payload
                .as_array()
                .ok_or_else(|| invalid_payload(tag, &format!("expected an array, found {}", payload)))?;
            TypedValue::Vector(elements.iter().map(from_json).collect::<Result<_, _>>()?)
        }
        TypedValueTag::Map => {
            let json_entries = payload
                .as_array()
                .ok_or_else(|| invalid_payload(tag, &format!("expected an array, found {}", payload)))?;
            let mut entries: Vec<(TypedValue, TypedValue)> = Vec::with_capacity(json_entries.len());
            for entry in json_entries {
                let key = entry
                    .get(MAP_KEY_KEY)
                    .ok_or_else(|| invalid_payload(tag, "entry without a key"))?;
                let value = entry
                    .get(MAP_VAL_KEY)
                    .or_else(|| entry.get(VALUE_KEY))
                    .ok_or_else(|| invalid_payload(tag, "entry without a value"))?;
                let key = from_json(key)?;
                if entries.iter().any(|(existing, _)| *existing == key) {
                    return Err(ConversionError::DuplicateKey(key.to_string()));
                }
                entries.push((key, from_json(value)?));
            }
            TypedValue::Map(entries)
        }
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_accept_raw_and_rich_forms() {
        let expected = TypedValue::I128(-123);
        assert_eq!(from_json_str(r#"{"i128": "-123"}"#), Ok(expected.clone()));
        assert_eq!(from_json_str(r#"{"scvI128": -123}"#), Ok(expected.clone()));
        assert_eq!(
            from_json_str(r#"{"type": "I128", "value": "-123"}"#),
            Ok(expected)
        );
    }

    #[test]
    fn should_accept_void_forms() {
        assert_eq!(from_json_str("null"), Ok(TypedValue::Void));
        assert_eq!(from_json_str(r#""void""#), Ok(TypedValue::Void));
        assert_eq!(from_json_str(r#""scvVoid""#), Ok(TypedValue::Void));
        assert_eq!(from_json_str(r#"{"type": "void"}"#), Ok(TypedValue::Void));
    }

    #[test]
    fn should_resolve_aliases() {
        assert_eq!(
            from_json_str(r#"{"vector": [{"sym": "a"}, {"str": "b"}, {"b": true}]}"#),
            Ok(TypedValue::Vector(vec![
                TypedValue::symbol("a"),
                TypedValue::string("b"),
                TypedValue::Bool(true)
            ]))
        );
    }

    #[test]
    fn should_combine_integer_parts() {
        assert_eq!(
            from_json_str(r#"{"i128": {"hi": -1, "lo": "18446744073709551615"}}"#),
            Ok(TypedValue::I128(-1))
        );
        assert_eq!(
            from_json_str(r#"{"u128": {"hi": 1, "lo": 0}}"#),
            Ok(TypedValue::U128(1u128 << 64))
        );
        assert_eq!(
            from_json_str(r#"{"u256": {"hi_hi": 0, "hi_lo": 0, "lo_hi": 0, "lo_lo": 1}}"#),
            Ok(TypedValue::U256(U256::one()))
        );
        let max = "18446744073709551615";
        assert_eq!(
            from_json_str(&format!(
                r#"{{"i256": {{"hi_hi": -1, "hi_lo": "{0}", "lo_hi": "{0}", "lo_lo": "{0}"}}}}"#,
                max
            )),
            Ok(TypedValue::I256(I256::from(-1i64)))
        );
    }

    #[test]
    fn should_convert_maps_in_order() {
        let json = r#"{"map": [
            {"key": {"symbol": "y"}, "val": {"i128": 20}},
            {"key": {"symbol": "x"}, "value": {"i128": 10}}
        ]}"#;
        assert_eq!(
            from_json_str(json),
            Ok(TypedValue::symbol_map(vec![
                ("y", TypedValue::I128(20)),
                ("x", TypedValue::I128(10))
            ]))
        );
    }

    #[test]
    fn should_reject_malformed_input() {
        assert!(matches!(
            from_json_str(r#"{"float": 1}"#),
            Err(ConversionError::UnknownType(_))
        ));
        assert!(matches!(
            from_json_str(r#"{"u32": 4294967296}"#),
            Err(ConversionError::InvalidPayload { .. })
        ));
        assert!(matches!(
            from_json_str(r#"{"symbol": "two words"}"#),
            Err(ConversionError::InvalidSymbol(_))
        ));
        assert!(matches!(
            from_json_str(r#"{"address": "GABC"}"#),
            Err(ConversionError::InvalidAddress(_))
        ));
        assert!(matches!(
            from_json_str(r#"{"map": [{"key": "void", "val": null}, {"key": null, "val": null}]}"#),
            Err(ConversionError::DuplicateKey(_))
        ));
        assert!(matches!(
            from_json_str("[1, 2]"),
            Err(ConversionError::Json(_))
        ));
        assert!(matches!(from_json_str("{"), Err(ConversionError::Json(_))));
    }

    #[test]
    fn should_decode_bytes_from_hex() {
        assert_eq!(
            from_json_str(r#"{"bytes": "6869"}"#),
            Ok(TypedValue::Bytes(b"hi".to_vec()))
        );
        assert_eq!(
            from_json_str(r#"{"bytes": "0x6869"}"#),
            Ok(TypedValue::Bytes(b"hi".to_vec()))
        );
    }

    #[test]
    fn should_roundtrip_rich_json() {
        let value = TypedValue::Map(vec![(
            TypedValue::symbol("owners"),
            TypedValue::Vector(vec![
                TypedValue::U256(U256::max_value()),
                TypedValue::Bytes(vec![0, 255]),
                TypedValue::Timepoint(5),
            ]),
        )]);
        assert_eq!(from_json(&to_json(&value)), Ok(value));
    }

    #[test]
    fn should_roundtrip_wire_hex() {
        let value = TypedValue::Vector(vec![TypedValue::I128(1), TypedValue::symbol("any")]);
        let hex = to_wire_hex(&value).unwrap();
        assert_eq!(from_wire_hex(&hex), Ok(value.clone()));
        assert_eq!(from_wire_hex(&format!("0x{}", hex)), Ok(value));
        assert!(matches!(from_wire_hex("zz"), Err(ConversionError::Hex(_))));
    }

    #[test]
    fn should_treat_blank_input_as_missing() {
        assert_eq!(parse("  \n", Representation::Json), Ok(None));
        assert_eq!(
            parse("null", Representation::Json),
            Ok(Some(TypedValue::Void))
        );
    }
}
