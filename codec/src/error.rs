use failure::Fail;

use types::{bytesrepr, AddressParseError, UIntParseError};

use crate::HarnessFunction;

/// Errors produced while building the arguments for a harness function.
#[derive(Fail, Debug, PartialEq, Eq, Clone)]
pub enum Error {
    #[fail(display = "Unrecognized function: {}", _0)]
    UnrecognizedCase(String),
    #[fail(display = "Missing argument '{}' for {}", argument, function)]
    MissingArgument {
        function: HarnessFunction,
        argument: &'static str,
    },
    #[fail(
        display = "Invalid value '{}' for argument '{}' of {}",
        value, argument, function
    )]
    InvalidArgument {
        function: HarnessFunction,
        argument: &'static str,
        value: String,
    },
}

/// Errors produced while converting an externally supplied representation into a
/// [`TypedValue`](types::TypedValue).
#[derive(Fail, Debug, PartialEq, Eq, Clone)]
pub enum ConversionError {
    #[fail(display = "Malformed JSON: {}", _0)]
    Json(String),
    #[fail(display = "Unknown value type: {}", _0)]
    UnknownType(String),
    #[fail(display = "Invalid {} payload: {}", tag, reason)]
    InvalidPayload { tag: &'static str, reason: String },
    #[fail(display = "Invalid symbol: {}", _0)]
    InvalidSymbol(String),
    #[fail(display = "Invalid address: {}", _0)]
    InvalidAddress(#[fail(cause)] AddressParseError),
    #[fail(display = "Invalid integer: {}", _0)]
    InvalidInteger(#[fail(cause)] UIntParseError),
    #[fail(display = "Duplicate map key: {}", _0)]
    DuplicateKey(String),
    #[fail(display = "Invalid hex: {}", _0)]
    Hex(String),
    #[fail(display = "Invalid wire encoding: {}", _0)]
    Wire(#[fail(cause)] bytesrepr::Error),
}

impl From<AddressParseError> for ConversionError {
    fn from(error: AddressParseError) -> Self {
        ConversionError::InvalidAddress(error)
    }
}

impl From<UIntParseError> for ConversionError {
    fn from(error: UIntParseError) -> Self {
        ConversionError::InvalidInteger(error)
    }
}

impl From<bytesrepr::Error> for ConversionError {
    fn from(error: bytesrepr::Error) -> Self {
        ConversionError::Wire(error)
    }
}

impl From<serde_json::Error> for ConversionError {
    fn from(error: serde_json::Error) -> Self {
        ConversionError::Json(error.to_string())
    }
}

impl From<base16::DecodeError> for ConversionError {
    fn from(error: base16::DecodeError) -> Self {
        ConversionError::Hex(error.to_string())
    }
}
