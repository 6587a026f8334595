use serde::Serialize;

/// serializes value to json;
/// pretty_print: false = inline
/// pretty_print: true  = pretty printed / multiline
pub fn jsonify<T>(value: T, pretty_print: bool) -> String
where
    T: Serialize,
{
    let fj = if pretty_print {
        serde_json::to_string_pretty
    } else {
        serde_json::to_string
    };

    match fj(&value) {
        Ok(json) => json,
        Err(_) => "{\"error\": \"encountered error serializing value\"}".to_owned(),
    }
}

/// Replaces every `{key}` in `template` with the matching value from `properties`.
///
/// Placeholders without a matching property are left untouched.
pub fn transclude<'a, I>(template: &str, properties: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    properties
        .into_iter()
        .fold(template.to_string(), |description, (key, value)| {
            description.replace(&format!("{{{}}}", key), value)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
    struct Invocation {
        function: String,
        args: u32,
    }

    #[test]
    fn should_ser_to_json() {
        let invocation = Invocation {
            function: "u32".to_string(),
            args: 1,
        };

        let json = jsonify(invocation, false);

        assert_eq!(
            json, "{\"function\":\"u32\",\"args\":1}",
            "json expected to match"
        );
    }

    #[test]
    fn should_ser_to_pretty_json() {
        let invocation = Invocation {
            function: "u32".to_string(),
            args: 1,
        };

        let json = jsonify(invocation, true);

        let expected_value = "{\n  \"function\": \"u32\",\n  \"args\": 1\n}";

        assert_eq!(json, expected_value, "json expected to match");
    }

    #[test]
    fn should_deser_from_json() {
        let invocation = Invocation {
            function: "vec_user".to_string(),
            args: 2,
        };

        let json = jsonify(&invocation, false);

        let invocation_clone: Invocation = serde_json::from_str(&json).expect("should deser");

        assert_eq!(invocation, invocation_clone, "instances should match");
    }

    #[test]
    fn should_transclude_known_properties() {
        let description = transclude(
            "{function} took {elapsed} and {missing}",
            vec![("function", "u32"), ("elapsed", "3ms")],
        );
        assert_eq!(description, "u32 took 3ms and {missing}");
    }
}
