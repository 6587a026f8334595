use std::fmt::{self, Display, Formatter};

use crate::{
    bytesrepr::{self, Error, FromBytes, ToBytes},
    Address, I256, U256,
};

/// Maximum number of characters in a [`TypedValue::Symbol`].
pub const SYMBOL_MAX_LENGTH: usize = 32;

/// Maximum nesting of vectors and maps accepted when decoding a value from the wire.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Returns `true` if `symbol` is 1 to 32 characters drawn from `[A-Za-z0-9_]`.
pub fn is_valid_symbol(symbol: &str) -> bool {
    !symbol.is_empty()
        && symbol.len() <= SYMBOL_MAX_LENGTH
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// A self-describing value passed to, or returned from, a harness contract function.
///
/// `Void` doubles as the encoding of an absent optional value; a present optional is encoded as
/// the wrapped value itself.
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum TypedValue {
    Void,
    Bool(bool),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    U128(u128),
    I128(i128),
    U256(U256),
    I256(I256),
    Timepoint(u64),
    Duration(u64),
    Bytes(Vec<u8>),
    String(String),
    Symbol(String),
    Address(Address),
    Vector(Vec<TypedValue>),
    /// Insertion-ordered entries; keys are unique within the map.
    Map(Vec<(TypedValue, TypedValue)>),
}

/// The discriminant of a [`TypedValue`], as written on the wire.
#[repr(u8)]
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TypedValueTag {
    Void = 0,
    Bool = 1,
    U32 = 2,
    I32 = 3,
    U64 = 4,
    I64 = 5,
    U128 = 6,
    I128 = 7,
    U256 = 8,
    I256 = 9,
    Timepoint = 10,
    Duration = 11,
    Bytes = 12,
    String = 13,
    Symbol = 14,
    Address = 15,
    Vector = 16,
    Map = 17,
}

impl TypedValueTag {
    const ALL: [TypedValueTag; 18] = [
        TypedValueTag::Void,
        TypedValueTag::Bool,
        TypedValueTag::U32,
        TypedValueTag::I32,
        TypedValueTag::U64,
        TypedValueTag::I64,
        TypedValueTag::U128,
        TypedValueTag::I128,
        TypedValueTag::U256,
        TypedValueTag::I256,
        TypedValueTag::Timepoint,
        TypedValueTag::Duration,
        TypedValueTag::Bytes,
        TypedValueTag::String,
        TypedValueTag::Symbol,
        TypedValueTag::Address,
        TypedValueTag::Vector,
        TypedValueTag::Map,
    ];

    /// Returns the tag with the given wire value, if any.
    pub fn from_u8(value: u8) -> Option<TypedValueTag> {
        TypedValueTag::ALL.get(value as usize).copied()
    }

    /// Returns the lower-case name of the tag, as used in JSON representations.
    pub fn name(self) -> &'static str {
        match self {
            TypedValueTag::Void => "void",
            TypedValueTag::Bool => "bool",
            TypedValueTag::U32 => "u32",
            TypedValueTag::I32 => "i32",
            TypedValueTag::U64 => "u64",
            TypedValueTag::I64 => "i64",
            TypedValueTag::U128 => "u128",
            TypedValueTag::I128 => "i128",
            TypedValueTag::U256 => "u256",
            TypedValueTag::I256 => "i256",
            TypedValueTag::Timepoint => "timepoint",
            TypedValueTag::Duration => "duration",
            TypedValueTag::Bytes => "bytes",
            TypedValueTag::String => "string",
            TypedValueTag::Symbol => "symbol",
            TypedValueTag::Address => "address",
            TypedValueTag::Vector => "vec",
            TypedValueTag::Map => "map",
        }
    }

    /// Looks up a tag by its [`name`](TypedValueTag::name).
    pub fn from_name(name: &str) -> Option<TypedValueTag> {
        TypedValueTag::ALL
            .iter()
            .copied()
            .find(|tag| tag.name() == name)
    }
}

impl TypedValue {
    /// Constructs a `Symbol`.
    pub fn symbol(symbol: &str) -> TypedValue {
        TypedValue::Symbol(symbol.to_string())
    }

    /// Constructs a `String`.
    pub fn string(string: &str) -> TypedValue {
        TypedValue::String(string.to_string())
    }

    /// Constructs a `Map` whose keys are the given symbols.
    pub fn symbol_map<'a, I>(entries: I) -> TypedValue
    where
        I: IntoIterator<Item = (&'a str, TypedValue)>,
    {
        TypedValue::Map(
            entries
                .into_iter()
                .map(|(key, value)| (TypedValue::symbol(key), value))
                .collect(),
        )
    }

    /// Returns the wire discriminant of this value.
    pub fn tag(&self) -> TypedValueTag {
        match self {
            TypedValue::Void => TypedValueTag::Void,
            TypedValue::Bool(_) => TypedValueTag::Bool,
            TypedValue::U32(_) => TypedValueTag::U32,
            TypedValue::I32(_) => TypedValueTag::I32,
            TypedValue::U64(_) => TypedValueTag::U64,
            TypedValue::I64(_) => TypedValueTag::I64,
            TypedValue::U128(_) => TypedValueTag::U128,
            TypedValue::I128(_) => TypedValueTag::I128,
            TypedValue::U256(_) => TypedValueTag::U256,
            TypedValue::I256(_) => TypedValueTag::I256,
            TypedValue::Timepoint(_) => TypedValueTag::Timepoint,
            TypedValue::Duration(_) => TypedValueTag::Duration,
            TypedValue::Bytes(_) => TypedValueTag::Bytes,
            TypedValue::String(_) => TypedValueTag::String,
            TypedValue::Symbol(_) => TypedValueTag::Symbol,
            TypedValue::Address(_) => TypedValueTag::Address,
            TypedValue::Vector(_) => TypedValueTag::Vector,
            TypedValue::Map(_) => TypedValueTag::Map,
        }
    }

    /// Returns `true` for `Void`.
    pub fn is_void(&self) -> bool {
        *self == TypedValue::Void
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            TypedValue::U32(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_i128(&self) -> Option<i128> {
        match self {
            TypedValue::I128(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            TypedValue::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            TypedValue::Symbol(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_address(&self) -> Option<&Address> {
        match self {
            TypedValue::Address(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<&[TypedValue]> {
        match self {
            TypedValue::Vector(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&[(TypedValue, TypedValue)]> {
        match self {
            TypedValue::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Returns the value stored under the symbol key `key`, if this is a map containing it.
    pub fn get(&self, key: &str) -> Option<&TypedValue> {
        self.as_map()?
            .iter()
            .find(|(entry_key, _)| entry_key.as_symbol() == Some(key))
            .map(|(_, value)| value)
    }

    /// Returns `true` if no two keys of `entries` are equal.
    pub fn has_unique_keys(entries: &[(TypedValue, TypedValue)]) -> bool {
        entries
            .iter()
            .enumerate()
            .all(|(index, (key, _))| entries[..index].iter().all(|(other, _)| other != key))
    }
}

/// Renders a byte sequence as `bytes[<n>]: ` followed by space-separated lowercase hex octets.
pub struct ByteListing<'a>(pub &'a [u8]);

impl Display for ByteListing<'_> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "bytes[{}]: ", self.0.len())?;
        for (index, byte) in self.0.iter().enumerate() {
            if index > 0 {
                write!(f, " ")?;
            }
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

fn write_joined<T: Display>(f: &mut Formatter, items: impl Iterator<Item = T>) -> fmt::Result {
    for (index, item) in items.enumerate() {
        if index > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

/// The natural, single-line rendering of a value, used where no case-specific layout applies.
impl Display for TypedValue {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            TypedValue::Void => write!(f, "void"),
            TypedValue::Bool(value) => write!(f, "{}", value),
            TypedValue::U32(value) => write!(f, "{}", value),
            TypedValue::I32(value) => write!(f, "{}", value),
            TypedValue::U64(value) => write!(f, "{}", value),
            TypedValue::I64(value) => write!(f, "{}", value),
            TypedValue::U128(value) => write!(f, "{}", value),
            TypedValue::I128(value) => write!(f, "{}", value),
            TypedValue::U256(value) => write!(f, "{}", value),
            TypedValue::I256(value) => write!(f, "{}", value),
            TypedValue::Timepoint(value) => write!(f, "timepoint({})", value),
            TypedValue::Duration(value) => write!(f, "duration({})", value),
            TypedValue::Bytes(bytes) => write!(f, "{}", ByteListing(bytes)),
            TypedValue::String(value) => write!(f, "\"{}\"", value),
            TypedValue::Symbol(value) => write!(f, "{}", value),
            TypedValue::Address(value) => write!(f, "{}", value),
            TypedValue::Vector(values) => {
                write!(f, "[")?;
                write_joined(f, values.iter())?;
                write!(f, "]")
            }
            TypedValue::Map(entries) => {
                write!(f, "{{")?;
                write_joined(
                    f,
                    entries
                        .iter()
                        .map(|(key, value)| format!("{}: {}", key, value)),
                )?;
                write!(f, "}}")
            }
        }
    }
}

impl ToBytes for Vec<TypedValue> {
    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut result = bytesrepr::length_to_bytes(self.len())?;
        for value in self {
            result.append(&mut value.to_bytes()?);
        }
        Ok(result)
    }
}

impl FromBytes for Vec<TypedValue> {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error> {
        read_values(bytes, MAX_NESTING_DEPTH)
    }
}

/// Takes one level off the remaining nesting budget, failing once it is used up.
fn enter_container(depth: usize) -> Result<usize, Error> {
    depth.checked_sub(1).ok_or(Error::FormattingError)
}

fn read_values(bytes: &[u8], depth: usize) -> Result<(Vec<TypedValue>, &[u8]), Error> {
    let (len, mut stream) = u32::from_bytes(bytes)?;
    // Every element takes at least its tag byte, which bounds the up-front allocation.
    if len as usize > stream.len() {
        return Err(Error::EarlyEndOfStream);
    }
    let mut result = Vec::with_capacity(len as usize);
    for _ in 0..len {
        let (value, rem) = read_value(stream, depth)?;
        result.push(value);
        stream = rem;
    }
    Ok((result, stream))
}

impl ToBytes for TypedValue {
    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut result = vec![self.tag() as u8];
        let mut payload = match self {
            TypedValue::Void => Vec::new(),
            TypedValue::Bool(value) => value.to_bytes()?,
            TypedValue::U32(value) => value.to_bytes()?,
            TypedValue::I32(value) => value.to_bytes()?,
            TypedValue::U64(value) | TypedValue::Timepoint(value) | TypedValue::Duration(value) => {
                value.to_bytes()?
            }
            TypedValue::I64(value) => value.to_bytes()?,
            TypedValue::U128(value) => value.to_bytes()?,
            TypedValue::I128(value) => value.to_bytes()?,
            TypedValue::U256(value) => value.to_bytes()?,
            TypedValue::I256(value) => value.to_bytes()?,
            TypedValue::Bytes(bytes) => bytes.to_bytes()?,
            TypedValue::String(value) | TypedValue::Symbol(value) => value.to_bytes()?,
            TypedValue::Address(address) => address.to_bytes()?,
            TypedValue::Vector(values) => values.to_bytes()?,
            TypedValue::Map(entries) => {
                let mut map_bytes = bytesrepr::length_to_bytes(entries.len())?;
                for (key, value) in entries {
                    map_bytes.append(&mut key.to_bytes()?);
                    map_bytes.append(&mut value.to_bytes()?);
                }
                map_bytes
            }
        };
        result.append(&mut payload);
        Ok(result)
    }
}

impl FromBytes for TypedValue {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error> {
        read_value(bytes, MAX_NESTING_DEPTH)
    }
}

/// Decodes one value; `depth` is the number of vector or map levels still allowed.
fn read_value(bytes: &[u8], depth: usize) -> Result<(TypedValue, &[u8]), Error> {
    let (tag_value, remainder) = u8::from_bytes(bytes)?;
    let tag = TypedValueTag::from_u8(tag_value).ok_or(Error::FormattingError)?;
    match tag {
        TypedValueTag::Void => Ok((TypedValue::Void, remainder)),
        TypedValueTag::Bool => {
            let (value, rem) = bool::from_bytes(remainder)?;
            Ok((TypedValue::Bool(value), rem))
        }
        TypedValueTag::U32 => {
            let (value, rem) = u32::from_bytes(remainder)?;
            Ok((TypedValue::U32(value), rem))
        }
        TypedValueTag::I32 => {
            let (value, rem) = i32::from_bytes(remainder)?;
            Ok((TypedValue::I32(value), rem))
        }
        TypedValueTag::U64 => {
            let (value, rem) = u64::from_bytes(remainder)?;
            Ok((TypedValue::U64(value), rem))
        }
        TypedValueTag::I64 => {
            let (value, rem) = i64::from_bytes(remainder)?;
            Ok((TypedValue::I64(value), rem))
        }
        TypedValueTag::U128 => {
            let (value, rem) = u128::from_bytes(remainder)?;
            Ok((TypedValue::U128(value), rem))
        }
        TypedValueTag::I128 => {
            let (value, rem) = i128::from_bytes(remainder)?;
            Ok((TypedValue::I128(value), rem))
        }
        TypedValueTag::U256 => {
            let (value, rem) = U256::from_bytes(remainder)?;
            Ok((TypedValue::U256(value), rem))
        }
        TypedValueTag::I256 => {
            let (value, rem) = I256::from_bytes(remainder)?;
            Ok((TypedValue::I256(value), rem))
        }
        TypedValueTag::Timepoint => {
            let (value, rem) = u64::from_bytes(remainder)?;
            Ok((TypedValue::Timepoint(value), rem))
        }
        TypedValueTag::Duration => {
            let (value, rem) = u64::from_bytes(remainder)?;
            Ok((TypedValue::Duration(value), rem))
        }
        TypedValueTag::Bytes => {
            let (bytes, rem) = Vec::<u8>::from_bytes(remainder)?;
            Ok((TypedValue::Bytes(bytes), rem))
        }
        TypedValueTag::String => {
            let (value, rem) = String::from_bytes(remainder)?;
            Ok((TypedValue::String(value), rem))
        }
        TypedValueTag::Symbol => {
            let (value, rem) = String::from_bytes(remainder)?;
            if !is_valid_symbol(&value) {
                return Err(Error::FormattingError);
            }
            Ok((TypedValue::Symbol(value), rem))
        }
        TypedValueTag::Address => {
            let (address, rem) = Address::from_bytes(remainder)?;
            Ok((TypedValue::Address(address), rem))
        }
        TypedValueTag::Vector => {
            let (values, rem) = read_values(remainder, enter_container(depth)?)?;
            Ok((TypedValue::Vector(values), rem))
        }
        TypedValueTag::Map => {
            let depth = enter_container(depth)?;
            let (len, mut stream) = u32::from_bytes(remainder)?;
            if len as usize > stream.len() {
                return Err(Error::EarlyEndOfStream);
            }
            let mut entries = Vec::with_capacity(len as usize);
            for _ in 0..len {
                let (key, rem) = read_value(stream, depth)?;
                let (value, rem) = read_value(rem, depth)?;
                entries.push((key, value));
                stream = rem;
            }
            if !TypedValue::has_unique_keys(&entries) {
                return Err(Error::FormattingError);
            }
            Ok((TypedValue::Map(entries), stream))
        }
    }
}
