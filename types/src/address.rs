use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use failure::Fail;

use crate::bytesrepr::{self, Error, FromBytes, ToBytes};

/// Length of a strkey-encoded address.
pub const ADDRESS_LENGTH: usize = 56;

const ACCOUNT_PREFIX: char = 'G';
const CONTRACT_PREFIX: char = 'C';

/// The kind of entity an [`Address`] identifies.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum AddressKind {
    /// An account, identified by its public key.
    Account,
    /// A deployed contract.
    Contract,
}

impl Display for AddressKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            AddressKind::Account => write!(f, "account"),
            AddressKind::Contract => write!(f, "contract"),
        }
    }
}

/// Errors arising when parsing an [`Address`].
#[derive(Debug, Fail, PartialEq, Eq, Clone)]
pub enum AddressParseError {
    /// The input has the wrong length.
    #[fail(
        display = "Invalid address length: expected {}, actual {}",
        expected, actual
    )]
    InvalidLength { expected: usize, actual: usize },
    /// The input starts with a prefix other than `G` or `C`.
    #[fail(display = "Invalid address prefix '{}'", _0)]
    InvalidPrefix(char),
    /// The input contains a character outside the base32 alphabet.
    #[fail(display = "Invalid address character '{}'", _0)]
    InvalidCharacter(char),
}

/// An account or contract identifier on the network, in its strkey text form.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Address(String);

impl Address {
    /// Returns the kind of entity identified by this address.
    pub fn kind(&self) -> AddressKind {
        if self.0.starts_with(CONTRACT_PREFIX) {
            AddressKind::Contract
        } else {
            AddressKind::Account
        }
    }

    /// Returns the strkey text form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_base32(c: char) -> bool {
    c.is_ascii_uppercase() || ('2'..='7').contains(&c)
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let actual = input.chars().count();
        if actual != ADDRESS_LENGTH {
            return Err(AddressParseError::InvalidLength {
                expected: ADDRESS_LENGTH,
                actual,
            });
        }

        let mut chars = input.chars();
        if let Some(prefix) = chars.next() {
            if prefix != ACCOUNT_PREFIX && prefix != CONTRACT_PREFIX {
                return Err(AddressParseError::InvalidPrefix(prefix));
            }
        }

        if let Some(invalid) = chars.find(|c| !is_base32(*c)) {
            return Err(AddressParseError::InvalidCharacter(invalid));
        }

        Ok(Address(input.to_string()))
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ToBytes for Address {
    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        self.0.to_bytes()
    }
}

impl FromBytes for Address {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error> {
        let (text, rem): (String, &[u8]) = FromBytes::from_bytes(bytes)?;
        let address = text.parse().map_err(|_| bytesrepr::Error::FormattingError)?;
        Ok((address, rem))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCOUNT: &str = "GBZXN7PIRZGNMHGA7MUUUF4GWPY5AYPV6LY4UV2GL6VJGIQRXFDNMADI";
    const CONTRACT: &str = "CA3D5KRYM6CB7OWQ6TWYRR3Z4T7GNZLKERYNZGGA5SOAOPIFY6YQGAXE";

    #[test]
    fn should_parse_account_and_contract() {
        let account: Address = ACCOUNT.parse().unwrap();
        assert_eq!(account.kind(), AddressKind::Account);
        assert_eq!(account.to_string(), ACCOUNT);

        let contract: Address = CONTRACT.parse().unwrap();
        assert_eq!(contract.kind(), AddressKind::Contract);
        assert_eq!(contract.kind().to_string(), "contract");
    }

    #[test]
    fn should_reject_wrong_length() {
        assert_eq!(
            "GABC".parse::<Address>(),
            Err(AddressParseError::InvalidLength {
                expected: ADDRESS_LENGTH,
                actual: 4
            })
        );
    }

    #[test]
    fn should_reject_wrong_prefix() {
        let input = format!("S{}", &ACCOUNT[1..]);
        assert_eq!(
            input.parse::<Address>(),
            Err(AddressParseError::InvalidPrefix('S'))
        );
    }

    #[test]
    fn should_reject_non_base32_characters() {
        let input = format!("{}1", &ACCOUNT[..ADDRESS_LENGTH - 1]);
        assert_eq!(
            input.parse::<Address>(),
            Err(AddressParseError::InvalidCharacter('1'))
        );
    }

    #[test]
    fn should_roundtrip_through_bytesrepr() {
        bytesrepr::test_serialization_roundtrip(&ACCOUNT.parse::<Address>().unwrap());
    }
}
