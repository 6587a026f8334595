use proptest::prelude::*;

use harness_codec::{
    external::{self, Representation},
    format, format_external, Encoder, HarnessFunction,
};
use types::gens::typed_value_arb;

const CALLER: &str = "CA3D5KRYM6CB7OWQ6TWYRR3Z4T7GNZLKERYNZGGA5SOAOPIFY6YQGAXE";

proptest! {
    #[test]
    fn test_rich_json_roundtrip(value in typed_value_arb()) {
        prop_assert_eq!(external::from_json(&external::to_json(&value)), Ok(value));
    }

    #[test]
    fn test_wire_hex_roundtrip(value in typed_value_arb()) {
        let hex = external::to_wire_hex(&value).unwrap();
        prop_assert_eq!(external::from_wire_hex(&hex), Ok(value));
    }

    #[test]
    fn test_formatting_is_total_and_deterministic(value in typed_value_arb()) {
        for function in HarnessFunction::ALL.iter().copied() {
            let first = format(&value, function);
            let second = format(&value.clone(), function);
            prop_assert_eq!(first, second);
        }
    }
}

#[test]
fn should_format_every_representation_alike() {
    let encoder = Encoder::new(CALLER.parse().unwrap());
    for function in HarnessFunction::ALL.iter().copied() {
        let args = [function.name(), "1", "2"];
        let args = match function {
            HarnessFunction::NestedType | HarnessFunction::FlattenNestedType => &args[..],
            _ => &args[..1],
        };
        let value = encoder.encode(function, args).unwrap();
        let expected = format(&value, function);

        let json = external::to_json(&value).to_string();
        assert_eq!(
            format_external(&json, Representation::Json, function.name()),
            expected
        );

        let hex = external::to_wire_hex(&value).unwrap();
        assert_eq!(
            format_external(&hex, Representation::WireHex, function.name()),
            expected
        );
    }
}

#[test]
fn should_accept_raw_json_results() {
    let raw = r#"{"scvMap": [
        {"key": {"scvSymbol": "id"}, "val": {"scvU32": 1}},
        {"key": {"scvSymbol": "name"}, "val": {"scvString": "Fifo"}},
        {"key": {"scvSymbol": "tags"}, "val": {"scvVec": [{"scvSymbol": "dev"}, {"scvSymbol": "sdk"}]}}
    ]}"#;
    assert_eq!(
        format_external(raw, Representation::Json, "user"),
        "User {\n  id: 1,\n  name: \"Fifo\",\n  tags: [dev, sdk]\n}"
    );
    assert_eq!(
        format_external(r#"{"i128": {"hi": 0, "lo": 5}}"#, Representation::Json, "vec_any"),
        "[]"
    );
    assert_eq!(
        format_external("\"void\"", Representation::Json, "option_user"),
        "None"
    );
}

#[test]
fn should_fall_back_to_placeholder_for_deeply_nested_wire_value() {
    let hex = "1001000000".repeat(200_000) + "00";
    assert_eq!(
        format_external(&hex, Representation::WireHex, "vec_any"),
        "[]"
    );
}
