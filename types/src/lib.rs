//! Typed values exchanged with the `types_harness` contract, together with their wire encoding.

mod address;
pub mod bytesrepr;
#[cfg(any(feature = "gens", test))]
pub mod gens;
mod typed_value;
mod uint;

pub use address::{Address, AddressKind, AddressParseError, ADDRESS_LENGTH};
pub use typed_value::{
    is_valid_symbol, ByteListing, TypedValue, TypedValueTag, MAX_NESTING_DEPTH, SYMBOL_MAX_LENGTH,
};
pub use uint::{UIntParseError, I256, U256};
