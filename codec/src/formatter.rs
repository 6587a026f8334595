//! Renders values returned by harness functions for display.
//!
//! Formatting never fails. A value whose shape doesn't match what the function returns is
//! rendered with placeholders (`0`, empty text, empty collections, `unknown`).

use log::{debug, warn};

use types::{ByteListing, TypedValue, TypedValueTag};

use crate::{
    external::{self, Representation},
    records::{self, Choice, NestedType, User},
    HarnessFunction,
};

/// Rendering of a missing value.
pub const MISSING_VALUE: &str = "null";

const FAIL_RENDERING: &str = "void (function executed successfully)";
const UNKNOWN_ELEMENT: &str = "unknown";
const UNKNOWN_CHOICE: &str = "Choice::Unknown";

/// Renders `value` as returned by `function`.
pub fn format(value: &TypedValue, function: HarnessFunction) -> String {
    debug!("formatting {:?} returned by {}", value.tag(), function);
    match function {
        HarnessFunction::Void => TypedValue::Void.to_string(),
        HarnessFunction::Bool => natural_or(value, TypedValueTag::Bool, "false"),
        HarnessFunction::U32 => natural_or(value, TypedValueTag::U32, "0"),
        HarnessFunction::I32 => natural_or(value, TypedValueTag::I32, "0"),
        HarnessFunction::U64 => natural_or(value, TypedValueTag::U64, "0"),
        HarnessFunction::I64 => natural_or(value, TypedValueTag::I64, "0"),
        HarnessFunction::U128 => natural_or(value, TypedValueTag::U128, "0"),
        HarnessFunction::I128 => natural_or(value, TypedValueTag::I128, "0"),
        HarnessFunction::U256 => natural_or(value, TypedValueTag::U256, "0"),
        HarnessFunction::I256 => natural_or(value, TypedValueTag::I256, "0"),
        HarnessFunction::Timepoint => match value {
            TypedValue::Timepoint(_) => value.to_string(),
            _ => TypedValue::Timepoint(0).to_string(),
        },
        HarnessFunction::Duration => match value {
            TypedValue::Duration(_) => value.to_string(),
            _ => TypedValue::Duration(0).to_string(),
        },
        HarnessFunction::Bytes | HarnessFunction::BytesN => match value {
            TypedValue::Bytes(bytes) => ByteListing(bytes).to_string(),
            _ => ByteListing(&[]).to_string(),
        },
        HarnessFunction::String => format!("\"{}\"", value.as_string().unwrap_or_default()),
        HarnessFunction::Symbol => symbol_text(value),
        HarnessFunction::Address => address_text(value),
        HarnessFunction::VecI128 => {
            let items = elements(value).iter().map(i128_text).collect::<Vec<_>>();
            format!("[{}]", items.join(", "))
        }
        HarnessFunction::VecAddress => {
            let items = elements(value).iter().map(address_text).collect::<Vec<_>>();
            format!("[\n  {}\n]", items.join(",\n  "))
        }
        HarnessFunction::MapSymI128 => map_block(value, symbol_text, i128_text),
        HarnessFunction::MapSymVecAddr => map_block(value, symbol_text, |addresses| {
            let items = elements(addresses).iter().map(address_text).collect::<Vec<_>>();
            format!("[{}]", items.join(", "))
        }),
        HarnessFunction::Any => value.to_string(),
        HarnessFunction::VecAny => {
            let items = elements(value)
                .iter()
                .map(|element| match element {
                    TypedValue::I128(_) | TypedValue::Symbol(_) => element.to_string(),
                    _ => UNKNOWN_ELEMENT.to_string(),
                })
                .collect::<Vec<_>>();
            format!("[{}]", items.join(", "))
        }
        HarnessFunction::MapSymAny => map_block(value, symbol_text, ToString::to_string),
        HarnessFunction::User => format!("{:#}", User::from_typed_value(value)),
        HarnessFunction::Choice => Choice::from_typed_value(value)
            .map(|choice| choice.to_string())
            .unwrap_or_else(|| UNKNOWN_CHOICE.to_string()),
        HarnessFunction::VecUser => {
            let users = elements(value)
                .iter()
                .map(|user| format!("    {}", User::from_typed_value(user)))
                .collect::<Vec<_>>();
            format!("[\n{}\n]", users.join(",\n"))
        }
        HarnessFunction::MapAddrUser => map_block(value, address_text, |user| {
            User::from_typed_value(user).to_string()
        }),
        HarnessFunction::OptionU32
        | HarnessFunction::OptionAddress
        | HarnessFunction::OptionUser => match function.option_inner() {
            Some(inner) if !value.is_void() => format!("Some({})", format(value, inner)),
            _ => "None".to_string(),
        },
        HarnessFunction::NestedType => NestedType::from_typed_value(value).to_string(),
        HarnessFunction::FlattenNestedType => {
            // Accepts a single tree, as the encoder builds it, or a vector of trees.
            let trees = match value {
                TypedValue::Vector(trees) => trees.iter().collect::<Vec<_>>(),
                _ => vec![value],
            };
            let items = trees
                .into_iter()
                .map(|tree| records::indent(&NestedType::from_typed_value(tree).to_string(), 2))
                .collect::<Vec<_>>();
            format!("[\n{}\n]", items.join(",\n"))
        }
        HarnessFunction::Fail => FAIL_RENDERING.to_string(),
    }
}

/// Renders `value` as returned by the function called `name`.
///
/// Returns `"null"` if there is no value and `"Unknown function: <name>"` if `name` isn't a
/// harness function.
pub fn format_named(value: Option<&TypedValue>, name: &str) -> String {
    let value = match value {
        Some(value) => value,
        None => return MISSING_VALUE.to_string(),
    };
    match name.parse::<HarnessFunction>() {
        Ok(function) => format(value, function),
        Err(_) => format!("Unknown function: {}", name),
    }
}

/// Converts `input` from the given external representation and renders it as returned by the
/// function called `name`.
///
/// Empty input is a missing value. Input which can't be converted is logged and rendered as if
/// the function had returned `Void`.
pub fn format_external(input: &str, representation: Representation, name: &str) -> String {
    match external::parse(input, representation) {
        Ok(value) => format_named(value.as_ref(), name),
        Err(error) => {
            warn!("could not convert value returned by {}: {}", name, error);
            format_named(Some(&TypedValue::Void), name)
        }
    }
}

fn natural_or(value: &TypedValue, expected: TypedValueTag, placeholder: &str) -> String {
    if value.tag() == expected {
        value.to_string()
    } else {
        placeholder.to_string()
    }
}

fn elements(value: &TypedValue) -> &[TypedValue] {
    value.as_vector().unwrap_or_default()
}

fn symbol_text(value: &TypedValue) -> String {
    value.as_symbol().unwrap_or_default().to_string()
}

fn address_text(value: &TypedValue) -> String {
    value
        .as_address()
        .map(ToString::to_string)
        .unwrap_or_default()
}

fn i128_text(value: &TypedValue) -> String {
    value.as_i128().unwrap_or(0).to_string()
}

fn map_block<K, V>(value: &TypedValue, key_text: K, value_text: V) -> String
where
    K: Fn(&TypedValue) -> String,
    V: Fn(&TypedValue) -> String,
{
    let items = value
        .as_map()
        .unwrap_or_default()
        .iter()
        .map(|(key, value)| format!("  {}: {}", key_text(key), value_text(value)))
        .collect::<Vec<_>>();
    format!("{{\n{}\n}}", items.join(",\n"))
}
