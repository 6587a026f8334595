use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use crate::Error;

/// Every function exposed by the `types_harness` contract.
///
/// Both the [`Encoder`](crate::Encoder) and the [`formatter`](crate::format) match on this
/// exhaustively, so a new case cannot be added without giving it both an argument and a
/// rendering.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum HarnessFunction {
    Void,
    Bool,
    U32,
    I32,
    U64,
    I64,
    Timepoint,
    Duration,
    U128,
    I128,
    U256,
    I256,
    Bytes,
    BytesN,
    String,
    Symbol,
    Address,
    VecI128,
    VecAddress,
    MapSymI128,
    MapSymVecAddr,
    Any,
    VecAny,
    MapSymAny,
    User,
    Choice,
    VecUser,
    MapAddrUser,
    OptionU32,
    OptionAddress,
    OptionUser,
    NestedType,
    FlattenNestedType,
    Fail,
}

impl HarnessFunction {
    /// All functions, in the order the contract declares them.
    pub const ALL: [HarnessFunction; 34] = [
        HarnessFunction::Void,
        HarnessFunction::Bool,
        HarnessFunction::U32,
        HarnessFunction::I32,
        HarnessFunction::U64,
        HarnessFunction::I64,
        HarnessFunction::Timepoint,
        HarnessFunction::Duration,
        HarnessFunction::U128,
        HarnessFunction::I128,
        HarnessFunction::U256,
        HarnessFunction::I256,
        HarnessFunction::Bytes,
        HarnessFunction::BytesN,
        HarnessFunction::String,
        HarnessFunction::Symbol,
        HarnessFunction::Address,
        HarnessFunction::VecI128,
        HarnessFunction::VecAddress,
        HarnessFunction::MapSymI128,
        HarnessFunction::MapSymVecAddr,
        HarnessFunction::Any,
        HarnessFunction::VecAny,
        HarnessFunction::MapSymAny,
        HarnessFunction::User,
        HarnessFunction::Choice,
        HarnessFunction::VecUser,
        HarnessFunction::MapAddrUser,
        HarnessFunction::OptionU32,
        HarnessFunction::OptionAddress,
        HarnessFunction::OptionUser,
        HarnessFunction::NestedType,
        HarnessFunction::FlattenNestedType,
        HarnessFunction::Fail,
    ];

    /// The contract-side name of the function.
    pub fn name(self) -> &'static str {
        match self {
            HarnessFunction::Void => "void",
            HarnessFunction::Bool => "bool",
            HarnessFunction::U32 => "u32",
            HarnessFunction::I32 => "i32",
            HarnessFunction::U64 => "u64",
            HarnessFunction::I64 => "i64",
            HarnessFunction::Timepoint => "timepoint",
            HarnessFunction::Duration => "duration",
            HarnessFunction::U128 => "u128",
            HarnessFunction::I128 => "i128",
            HarnessFunction::U256 => "u256",
            HarnessFunction::I256 => "i256",
            HarnessFunction::Bytes => "bytes",
            HarnessFunction::BytesN => "bytes_n",
            HarnessFunction::String => "string",
            HarnessFunction::Symbol => "symbol",
            HarnessFunction::Address => "address",
            HarnessFunction::VecI128 => "vec_i128",
            HarnessFunction::VecAddress => "vec_address",
            HarnessFunction::MapSymI128 => "map_sym_i128",
            HarnessFunction::MapSymVecAddr => "map_sym_vec_addr",
            HarnessFunction::Any => "any",
            HarnessFunction::VecAny => "vec_any",
            HarnessFunction::MapSymAny => "map_sym_any",
            HarnessFunction::User => "user",
            HarnessFunction::Choice => "choice",
            HarnessFunction::VecUser => "vec_user",
            HarnessFunction::MapAddrUser => "map_addr_user",
            HarnessFunction::OptionU32 => "option_u32",
            HarnessFunction::OptionAddress => "option_address",
            HarnessFunction::OptionUser => "option_user",
            HarnessFunction::NestedType => "nested_type",
            HarnessFunction::FlattenNestedType => "flatten_nested_type",
            HarnessFunction::Fail => "fail",
        }
    }

    /// For the `option_*` functions, returns the function whose value they optionally wrap.
    pub fn option_inner(self) -> Option<HarnessFunction> {
        match self {
            HarnessFunction::OptionU32 => Some(HarnessFunction::U32),
            HarnessFunction::OptionAddress => Some(HarnessFunction::Address),
            HarnessFunction::OptionUser => Some(HarnessFunction::User),
            _ => None,
        }
    }
}

impl FromStr for HarnessFunction {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        HarnessFunction::ALL
            .iter()
            .copied()
            .find(|function| function.name() == name)
            .ok_or_else(|| Error::UnrecognizedCase(name.to_string()))
    }
}

impl Display for HarnessFunction {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_roundtrip_every_name() {
        for function in HarnessFunction::ALL.iter() {
            assert_eq!(function.name().parse::<HarnessFunction>(), Ok(*function));
        }
    }

    #[test]
    fn should_have_unique_names() {
        for (index, function) in HarnessFunction::ALL.iter().enumerate() {
            assert!(HarnessFunction::ALL[..index]
                .iter()
                .all(|other| other.name() != function.name()));
        }
    }

    #[test]
    fn should_reject_unknown_name() {
        assert_eq!(
            "bogus".parse::<HarnessFunction>(),
            Err(Error::UnrecognizedCase("bogus".to_string()))
        );
        assert!("U32".parse::<HarnessFunction>().is_err());
    }

    #[test]
    fn should_map_options_to_inner_function() {
        assert_eq!(
            HarnessFunction::OptionUser.option_inner(),
            Some(HarnessFunction::User)
        );
        assert_eq!(HarnessFunction::User.option_inner(), None);
    }
}
