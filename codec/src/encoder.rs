use std::collections::BTreeMap;

use log::{debug, Level};

use harness_shared::logging;
use types::{Address, TypedValue, I256, U256};

use crate::{
    records::{Choice, NestedType, User},
    Error, HarnessFunction,
};

const MODE_ARG_INDEX: usize = 1;
const DEPTH_ARG_INDEX: usize = 1;
const WIDTH_ARG_INDEX: usize = 2;

const MODE_ARG_NAME: &str = "mode";
const DEPTH_ARG_NAME: &str = "depth";
const WIDTH_ARG_NAME: &str = "width";

const LARGE_TREE_LEAVES: u64 = 10_000;

const WIDE_INT_LITERAL: &str = "0x01";

/// Whether an `option_*` function is called with a value or with `Void`.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum OptionMode {
    Some,
    None,
}

impl OptionMode {
    const SOME: &'static str = "some";
    const NONE: &'static str = "none";

    /// Parses the mode argument. A missing or empty mode means `Some`.
    fn parse(function: HarnessFunction, mode: Option<&str>) -> Result<Self, Error> {
        match mode {
            None | Some("") | Some(OptionMode::SOME) => Ok(OptionMode::Some),
            Some(OptionMode::NONE) => Ok(OptionMode::None),
            Some(other) => Err(Error::InvalidArgument {
                function,
                argument: MODE_ARG_NAME,
                value: other.to_string(),
            }),
        }
    }
}

/// A call to a harness function, ready to be handed to the transaction submitter.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Invocation {
    pub function: HarnessFunction,
    pub args: Vec<TypedValue>,
}

/// Builds the argument for each harness function.
///
/// Mode arguments are positional and follow the command line they came from: `mode_args[0]`
/// is the function name itself, `mode_args[1]` the option mode or nesting depth and
/// `mode_args[2]` the nesting width.
#[derive(Clone, Debug)]
pub struct Encoder {
    caller: Address,
}

impl Encoder {
    /// Constructs an encoder which uses `caller` wherever a function takes an address.
    pub fn new(caller: Address) -> Self {
        Encoder { caller }
    }

    pub fn caller(&self) -> &Address {
        &self.caller
    }

    /// Looks up `name` and encodes its argument.
    pub fn encode_named<S: AsRef<str>>(
        &self,
        name: &str,
        mode_args: &[S],
    ) -> Result<TypedValue, Error> {
        let function = name.parse()?;
        self.encode(function, mode_args)
    }

    /// Encodes the argument passed to `function`.
    pub fn encode<S: AsRef<str>>(
        &self,
        function: HarnessFunction,
        mode_args: &[S],
    ) -> Result<TypedValue, Error> {
        let value = match function {
            HarnessFunction::Void => TypedValue::Void,
            HarnessFunction::Bool => TypedValue::Bool(true),
            HarnessFunction::U32 => TypedValue::U32(7),
            HarnessFunction::I32 => TypedValue::I32(-7),
            HarnessFunction::U64 => TypedValue::U64(77),
            HarnessFunction::I64 => TypedValue::I64(-77),
            HarnessFunction::Timepoint => TypedValue::Timepoint(1_725_000_000),
            HarnessFunction::Duration => TypedValue::Duration(3600),
            HarnessFunction::U128 => TypedValue::U128(123),
            HarnessFunction::I128 => TypedValue::I128(-123),
            HarnessFunction::U256 => TypedValue::U256(wide_int_literal(function, U256::from_literal)?),
            HarnessFunction::I256 => TypedValue::I256(wide_int_literal(function, I256::from_literal)?),
            HarnessFunction::Bytes | HarnessFunction::BytesN => TypedValue::Bytes(b"hi".to_vec()),
            HarnessFunction::String => TypedValue::string("hello"),
            HarnessFunction::Symbol => TypedValue::symbol("ok"),
            HarnessFunction::Address => self.caller_value(),
            HarnessFunction::VecI128 => TypedValue::Vector(vec![
                TypedValue::I128(1),
                TypedValue::I128(2),
                TypedValue::I128(3),
            ]),
            HarnessFunction::VecAddress => self.caller_pair(),
            HarnessFunction::MapSymI128 => TypedValue::symbol_map(vec![
                ("x", TypedValue::I128(10)),
                ("y", TypedValue::I128(20)),
            ]),
            HarnessFunction::MapSymVecAddr => {
                TypedValue::symbol_map(vec![("owners", self.caller_pair())])
            }
            HarnessFunction::Any => TypedValue::symbol("any"),
            HarnessFunction::VecAny => {
                TypedValue::Vector(vec![TypedValue::I128(1), TypedValue::symbol("any")])
            }
            HarnessFunction::MapSymAny => {
                TypedValue::symbol_map(vec![("k", TypedValue::symbol("any"))])
            }
            HarnessFunction::User => User::canonical().to_typed_value(),
            HarnessFunction::Choice => Choice::canonical().to_typed_value(),
            HarnessFunction::VecUser => TypedValue::Vector(vec![User::canonical().to_typed_value()]),
            HarnessFunction::MapAddrUser => TypedValue::Map(vec![(
                self.caller_value(),
                User::canonical().to_typed_value(),
            )]),
            HarnessFunction::OptionU32
            | HarnessFunction::OptionAddress
            | HarnessFunction::OptionUser => {
                match OptionMode::parse(function, arg(mode_args, MODE_ARG_INDEX))? {
                    OptionMode::None => TypedValue::Void,
                    OptionMode::Some => match function {
                        HarnessFunction::OptionU32 => TypedValue::U32(42),
                        HarnessFunction::OptionAddress => self.caller_value(),
                        _ => User::canonical().to_typed_value(),
                    },
                }
            }
            HarnessFunction::NestedType | HarnessFunction::FlattenNestedType => {
                let depth = numeric_arg(function, mode_args, DEPTH_ARG_INDEX, DEPTH_ARG_NAME)?;
                let width = numeric_arg(function, mode_args, WIDTH_ARG_INDEX, WIDTH_ARG_NAME)?;
                warn_if_large(function, depth, width);
                NestedType::build(depth, width).to_typed_value()
            }
            HarnessFunction::Fail => TypedValue::Bool(true),
        };

        debug!("encoded argument for {} as {:?}", function, value.tag());
        Ok(value)
    }

    /// Builds the call to `function`. `void` takes no argument; every other function takes
    /// exactly one.
    pub fn invocation<S: AsRef<str>>(
        &self,
        function: HarnessFunction,
        mode_args: &[S],
    ) -> Result<Invocation, Error> {
        let args = match function {
            HarnessFunction::Void => Vec::new(),
            _ => vec![self.encode(function, mode_args)?],
        };
        Ok(Invocation { function, args })
    }

    fn caller_value(&self) -> TypedValue {
        TypedValue::Address(self.caller.clone())
    }

    fn caller_pair(&self) -> TypedValue {
        TypedValue::Vector(vec![self.caller_value(), self.caller_value()])
    }
}

fn arg<S: AsRef<str>>(mode_args: &[S], index: usize) -> Option<&str> {
    mode_args.get(index).map(AsRef::as_ref)
}

fn numeric_arg<S: AsRef<str>>(
    function: HarnessFunction,
    mode_args: &[S],
    index: usize,
    argument: &'static str,
) -> Result<u32, Error> {
    let value = arg(mode_args, index).ok_or(Error::MissingArgument { function, argument })?;
    value.trim().parse().map_err(|_| Error::InvalidArgument {
        function,
        argument,
        value: value.to_string(),
    })
}

fn wide_int_literal<T, E>(
    function: HarnessFunction,
    parse: fn(&str) -> Result<T, E>,
) -> Result<T, Error> {
    parse(WIDE_INT_LITERAL).map_err(|_| Error::InvalidArgument {
        function,
        argument: "literal",
        value: WIDE_INT_LITERAL.to_string(),
    })
}

fn warn_if_large(function: HarnessFunction, depth: u32, width: u32) {
    let leaves = NestedType::leaf_count(depth, width);
    if leaves.map_or(true, |leaves| leaves > LARGE_TREE_LEAVES) {
        let mut properties = BTreeMap::new();
        properties.insert("function", function.to_string());
        properties.insert(DEPTH_ARG_NAME, depth.to_string());
        properties.insert(WIDTH_ARG_NAME, width.to_string());
        properties.insert(
            "leaves",
            leaves.map_or_else(|| "more than u64::MAX".to_string(), |leaves| leaves.to_string()),
        );
        logging::log_details(
            Level::Warn,
            "{function} builds a tree of {leaves} leaves (depth {depth}, width {width})"
                .to_string(),
            properties,
        );
    }
}
