//! Encoder and formatter for the values exchanged with the `types_harness` contract.
//!
//! The [`Encoder`] builds the argument each harness function is called with, and [`format`]
//! renders what the function returned. Values received from outside the process go through the
//! [`external`] conversion first.

mod encoder;
mod error;
pub mod external;
mod formatter;
mod function;
pub mod records;

pub use encoder::{Encoder, Invocation, OptionMode};
pub use error::{ConversionError, Error};
pub use formatter::{format, format_external, format_named, MISSING_VALUE};
pub use function::HarnessFunction;
