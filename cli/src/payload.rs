//! The request handed to the external transaction submitter.

use serde_json::{json, Value};

use harness_codec::{external, ConversionError, Invocation};
use types::Address;

use crate::config::Config;

/// Describes `invocation` together with everything the submitter needs to send it.
pub fn invocation_payload(invocation: &Invocation, source: &Address, config: &Config) -> Value {
    let args = invocation
        .args
        .iter()
        .map(external::to_json)
        .collect::<Vec<_>>();
    json!({
        "network": config.network.name(),
        "network_passphrase": config.network.passphrase(),
        "rpc_url": config.rpc_url,
        "contract_id": config.contract_id.as_ref().map(Address::as_str),
        "source": source.as_str(),
        "function": invocation.function.name(),
        "args": args,
    })
}

/// Returns the hex wire encoding of each argument of `invocation`.
pub fn wire_arguments(invocation: &Invocation) -> Result<Vec<String>, ConversionError> {
    invocation.args.iter().map(external::to_wire_hex).collect()
}

#[cfg(test)]
mod tests {
    use harness_codec::{Encoder, HarnessFunction};
    use types::TypedValue;

    use super::*;
    use crate::config::{Network, NETWORK_VAR};

    const ACCOUNT: &str = "GBZXN7PIRZGNMHGA7MUUUF4GWPY5AYPV6LY4UV2GL6VJGIQRXFDNMADI";
    const NO_ARGS: [&str; 0] = [];

    fn config() -> Config {
        Config::from_lookup(|key| {
            if key == NETWORK_VAR {
                Some("testnet".to_string())
            } else {
                None
            }
        })
        .unwrap()
    }

    #[test]
    fn should_describe_invocation() {
        let source: Address = ACCOUNT.parse().unwrap();
        let invocation = Encoder::new(source.clone())
            .invocation(HarnessFunction::U32, &NO_ARGS)
            .unwrap();

        let payload = invocation_payload(&invocation, &source, &config());

        assert_eq!(payload["network"], "testnet");
        assert_eq!(payload["network_passphrase"], Network::Testnet.passphrase());
        assert_eq!(payload["contract_id"], Value::Null);
        assert_eq!(payload["source"], ACCOUNT);
        assert_eq!(payload["function"], "u32");
        assert_eq!(payload["args"], json!([{"type": "u32", "value": 7}]));
    }

    #[test]
    fn should_encode_arguments_as_wire_hex() {
        let invocation = Invocation {
            function: HarnessFunction::Bool,
            args: vec![TypedValue::Bool(true)],
        };
        assert_eq!(wire_arguments(&invocation).unwrap(), vec!["0101".to_string()]);
    }
}
