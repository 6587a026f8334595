use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use failure::Fail;

use crate::bytesrepr::{self, Error, FromBytes, ToBytes, U256_SERIALIZED_LENGTH};

#[allow(
    clippy::assign_op_pattern,
    clippy::ptr_offset_with_cast,
    clippy::range_plus_one,
    clippy::transmute_ptr_to_ptr
)]
mod macro_code {
    use uint::construct_uint;

    construct_uint! {
        /// A 256-bit unsigned integer.
        pub struct U256(4);
    }
}

pub use self::macro_code::U256;

const HEX_PREFIX: &str = "0x";

/// Error type for parsing `U256` and `I256` from a string.
#[derive(Debug, Fail, PartialEq, Eq, Clone)]
pub enum UIntParseError {
    /// The input was empty.
    #[fail(display = "empty integer literal")]
    Empty,
    /// The input contained a character which is not a digit in the literal's radix.
    #[fail(display = "invalid digit in integer literal '{}'", _0)]
    InvalidDigit(String),
    /// The value doesn't fit in 256 bits.
    #[fail(display = "integer literal '{}' out of range", _0)]
    Overflow(String),
}

/// Parses a decimal or `0x`-prefixed hexadecimal literal into its magnitude.
fn parse_magnitude(input: &str) -> Result<U256, UIntParseError> {
    let (digits, radix) = if input.starts_with(HEX_PREFIX) {
        (&input[HEX_PREFIX.len()..], 16u64)
    } else {
        (input, 10u64)
    };
    if digits.is_empty() {
        return Err(UIntParseError::Empty);
    }

    let radix_value = U256::from(radix);
    let mut result = U256::zero();
    for c in digits.chars() {
        let digit = c
            .to_digit(radix as u32)
            .ok_or_else(|| UIntParseError::InvalidDigit(input.to_string()))?;
        let (shifted, mul_overflow) = result.overflowing_mul(radix_value);
        let (next, add_overflow) = shifted.overflowing_add(U256::from(u64::from(digit)));
        if mul_overflow || add_overflow {
            return Err(UIntParseError::Overflow(input.to_string()));
        }
        result = next;
    }
    Ok(result)
}

impl U256 {
    /// Parses a decimal or `0x`-prefixed hexadecimal literal, e.g. `"0x01"`.
    pub fn from_literal(input: &str) -> Result<U256, UIntParseError> {
        parse_magnitude(input.trim())
    }
}

impl ToBytes for U256 {
    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut buf = [0u8; U256_SERIALIZED_LENGTH];
        self.to_little_endian(&mut buf);
        let mut non_zero_bytes: Vec<u8> =
            buf.iter().rev().skip_while(|b| **b == 0).cloned().collect();
        let num_bytes = non_zero_bytes.len() as u8;
        non_zero_bytes.push(num_bytes);
        non_zero_bytes.reverse();
        Ok(non_zero_bytes)
    }
}

impl FromBytes for U256 {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error> {
        let (num_bytes, rem): (u8, &[u8]) = FromBytes::from_bytes(bytes)?;

        if num_bytes as usize > U256_SERIALIZED_LENGTH {
            Err(Error::FormattingError)
        } else {
            let (value, rem) = bytesrepr::safe_split_at(rem, num_bytes as usize)?;
            let result = U256::from_little_endian(value);
            Ok((result, rem))
        }
    }
}

/// A 256-bit signed integer, stored as the two's complement bit pattern of a [`U256`].
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash, Debug)]
pub struct I256(U256);

impl I256 {
    /// Constructs an `I256` from its raw two's complement bit pattern.
    pub fn from_raw(raw: U256) -> Self {
        I256(raw)
    }

    /// Returns the raw two's complement bit pattern.
    pub fn into_raw(self) -> U256 {
        self.0
    }

    /// Returns `true` if the value is strictly negative.
    pub fn is_negative(&self) -> bool {
        self.0.bit(255)
    }

    /// Returns the absolute value as a `U256`. `I256::MIN` maps to `2^255`.
    pub fn unsigned_abs(&self) -> U256 {
        if self.is_negative() {
            twos_complement(self.0)
        } else {
            self.0
        }
    }

    /// Parses a decimal or `0x`-prefixed hexadecimal literal with an optional leading `-`.
    pub fn from_literal(input: &str) -> Result<I256, UIntParseError> {
        let input = input.trim();
        let (negative, digits) = if input.starts_with('-') {
            (true, &input[1..])
        } else {
            (false, input)
        };
        let magnitude = parse_magnitude(digits)?;

        // The largest representable magnitude is 2^255 for negative values and 2^255 - 1
        // otherwise.
        let limit = U256::one() << 255usize;
        if magnitude > limit || (!negative && magnitude == limit) {
            return Err(UIntParseError::Overflow(input.to_string()));
        }

        if negative {
            Ok(I256(twos_complement(magnitude)))
        } else {
            Ok(I256(magnitude))
        }
    }
}

fn twos_complement(value: U256) -> U256 {
    (!value).overflowing_add(U256::one()).0
}

impl From<i64> for I256 {
    fn from(value: i64) -> Self {
        let magnitude = U256::from(value.unsigned_abs());
        if value < 0 {
            I256(twos_complement(magnitude))
        } else {
            I256(magnitude)
        }
    }
}

impl FromStr for I256 {
    type Err = UIntParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        I256::from_literal(s)
    }
}

impl Display for I256 {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if self.is_negative() {
            write!(f, "-{}", self.unsigned_abs())
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl ToBytes for I256 {
    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut buf = [0u8; U256_SERIALIZED_LENGTH];
        self.0.to_little_endian(&mut buf);
        Ok(buf.to_vec())
    }
}

impl FromBytes for I256 {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error> {
        let (value, rem) = bytesrepr::safe_split_at(bytes, U256_SERIALIZED_LENGTH)?;
        Ok((I256(U256::from_little_endian(value)), rem))
    }
}
