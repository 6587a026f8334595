//! Configuration read from environment variables.

use std::{env, str::FromStr};

use failure::Fail;
use lazy_static::lazy_static;

use types::{Address, AddressKind, AddressParseError};

pub const NETWORK_VAR: &str = "NETWORK";
pub const SOURCE_ACCOUNT_VAR: &str = "SOURCE_ACCOUNT";
pub const CONTRACT_ID_VAR: &str = "CONTRACT_ID";
pub const RPC_URL_VAR: &str = "STELLAR_RPC_URL";
pub const LOG_LEVEL_VAR: &str = "HARNESS_LOG_LEVEL";

lazy_static! {
    static ref VALID_NETWORKS: String = Network::ALL
        .iter()
        .map(|network| network.name())
        .collect::<Vec<_>>()
        .join(", ");
}

#[derive(Fail, Debug, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[fail(
        display = "Environment variable {} is not set.\nCheck the 'Setup' section of the README.md \
                   file.",
        _0
    )]
    MissingVariable(&'static str),
    #[fail(display = "Invalid NETWORK value: {}. Must be one of: {}", value, valid)]
    InvalidNetwork { value: String, valid: String },
    #[fail(display = "Invalid address in {}: {}", variable, error)]
    InvalidAddress {
        variable: &'static str,
        #[fail(cause)]
        error: AddressParseError,
    },
    #[fail(
        display = "Invalid address in {}: expected {} address, got {}",
        variable, expected, address
    )]
    WrongAddressKind {
        variable: &'static str,
        expected: AddressKind,
        address: Address,
    },
}

/// The network the harness contract is deployed to.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Network {
    Testnet,
    Futurenet,
    Standalone,
    Sandbox,
    Public,
}

impl Network {
    const ALL: [Network; 5] = [
        Network::Testnet,
        Network::Futurenet,
        Network::Standalone,
        Network::Sandbox,
        Network::Public,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Network::Testnet => "testnet",
            Network::Futurenet => "futurenet",
            Network::Standalone => "standalone",
            Network::Sandbox => "sandbox",
            Network::Public => "public",
        }
    }

    /// The passphrase which identifies the network in signed transactions.
    pub fn passphrase(self) -> &'static str {
        match self {
            Network::Testnet => "Test SDF Network ; September 2015",
            Network::Futurenet => "Test SDF Future Network ; October 2022",
            Network::Standalone => "Standalone Network ; February 2017",
            Network::Sandbox => "Local Sandbox Stellar Network ; September 2022",
            Network::Public => "Public Global Stellar Network ; September 2015",
        }
    }
}

impl FromStr for Network {
    type Err = ConfigError;

    /// Case-insensitive; `mainnet` is accepted for `public`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let lower = value.to_lowercase();
        let name = if lower == "mainnet" {
            Network::Public.name()
        } else {
            lower.as_str()
        };
        Network::ALL
            .iter()
            .copied()
            .find(|network| network.name() == name)
            .ok_or_else(|| ConfigError::InvalidNetwork {
                value: value.to_string(),
                valid: VALID_NETWORKS.clone(),
            })
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub network: Network,
    pub source_account: Option<Address>,
    pub contract_id: Option<Address>,
    pub rpc_url: Option<String>,
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the configuration using `lookup` to resolve variables. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let network: Network = get(NETWORK_VAR)
            .ok_or(ConfigError::MissingVariable(NETWORK_VAR))?
            .parse()?;
        let source_account = get(SOURCE_ACCOUNT_VAR)
            .map(|value| parse_address(SOURCE_ACCOUNT_VAR, &value, AddressKind::Account))
            .transpose()?;
        let contract_id = get(CONTRACT_ID_VAR)
            .map(|value| parse_address(CONTRACT_ID_VAR, &value, AddressKind::Contract))
            .transpose()?;

        Ok(Config {
            network,
            source_account,
            contract_id,
            rpc_url: get(RPC_URL_VAR),
        })
    }

    /// Returns the caller's account, failing if `SOURCE_ACCOUNT` was not set.
    pub fn source_account(&self) -> Result<&Address, ConfigError> {
        self.source_account
            .as_ref()
            .ok_or(ConfigError::MissingVariable(SOURCE_ACCOUNT_VAR))
    }
}

/// Parses `value` as an address of the `expected` kind, naming `variable` in any error.
pub fn parse_address(
    variable: &'static str,
    value: &str,
    expected: AddressKind,
) -> Result<Address, ConfigError> {
    let address: Address = value
        .trim()
        .parse()
        .map_err(|error| ConfigError::InvalidAddress { variable, error })?;
    if address.kind() != expected {
        return Err(ConfigError::WrongAddressKind {
            variable,
            expected,
            address,
        });
    }
    Ok(address)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    const ACCOUNT: &str = "GBZXN7PIRZGNMHGA7MUUUF4GWPY5AYPV6LY4UV2GL6VJGIQRXFDNMADI";
    const CONTRACT: &str = "CA3D5KRYM6CB7OWQ6TWYRR3Z4T7GNZLKERYNZGGA5SOAOPIFY6YQGAXE";

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        let vars: HashMap<&str, &str> = vars.iter().copied().collect();
        move |key: &str| vars.get(key).map(|value| value.to_string())
    }

    #[test]
    fn should_parse_networks_case_insensitively() {
        assert_eq!("TESTNET".parse::<Network>(), Ok(Network::Testnet));
        assert_eq!("mainnet".parse::<Network>(), Ok(Network::Public));
        assert_eq!(
            "Public".parse::<Network>().unwrap().passphrase(),
            "Public Global Stellar Network ; September 2015"
        );
    }

    #[test]
    fn should_list_valid_networks_on_error() {
        let error = "moon".parse::<Network>().unwrap_err();
        assert_eq!(
            error.to_string(),
            "Invalid NETWORK value: moon. Must be one of: testnet, futurenet, standalone, \
             sandbox, public"
        );
    }

    #[test]
    fn should_require_network() {
        let error = Config::from_lookup(lookup(&[(NETWORK_VAR, "")])).unwrap_err();
        assert_eq!(error, ConfigError::MissingVariable(NETWORK_VAR));
        assert!(error.to_string().contains("'Setup' section of the README.md"));
    }

    #[test]
    fn should_read_optional_variables() {
        let config = Config::from_lookup(lookup(&[
            (NETWORK_VAR, "futurenet"),
            (SOURCE_ACCOUNT_VAR, ACCOUNT),
            (RPC_URL_VAR, "http://localhost:8000/soroban/rpc"),
        ]))
        .unwrap();
        assert_eq!(config.network, Network::Futurenet);
        assert_eq!(config.source_account().unwrap().as_str(), ACCOUNT);
        assert_eq!(config.contract_id, None);
        assert_eq!(
            config.rpc_url.as_deref(),
            Some("http://localhost:8000/soroban/rpc")
        );
    }

    #[test]
    fn should_reject_invalid_source_account() {
        let result = Config::from_lookup(lookup(&[
            (NETWORK_VAR, "testnet"),
            (SOURCE_ACCOUNT_VAR, "not-an-account"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidAddress {
                variable: SOURCE_ACCOUNT_VAR,
                ..
            })
        ));
    }

    #[test]
    fn should_report_missing_source_account() {
        let config = Config::from_lookup(lookup(&[(NETWORK_VAR, "standalone")])).unwrap();
        assert_eq!(
            config.source_account().unwrap_err(),
            ConfigError::MissingVariable(SOURCE_ACCOUNT_VAR)
        );
    }

    #[test]
    fn should_check_address_kinds() {
        let config = Config::from_lookup(lookup(&[
            (NETWORK_VAR, "testnet"),
            (SOURCE_ACCOUNT_VAR, ACCOUNT),
            (CONTRACT_ID_VAR, CONTRACT),
        ]))
        .unwrap();
        assert_eq!(config.contract_id.unwrap().as_str(), CONTRACT);

        let error = Config::from_lookup(lookup(&[
            (NETWORK_VAR, "testnet"),
            (SOURCE_ACCOUNT_VAR, CONTRACT),
        ]))
        .unwrap_err();
        assert_eq!(
            error.to_string(),
            format!(
                "Invalid address in SOURCE_ACCOUNT: expected account address, got {}",
                CONTRACT
            )
        );

        assert!(matches!(
            parse_address(CONTRACT_ID_VAR, ACCOUNT, AddressKind::Contract),
            Err(ConfigError::WrongAddressKind {
                expected: AddressKind::Contract,
                ..
            })
        ));
    }
}
