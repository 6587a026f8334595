//! Contains serialization and deserialization code for the types sent to and returned from the
//! harness contract.

use std::mem::size_of;

use failure::Fail;

pub const I32_SERIALIZED_LENGTH: usize = size_of::<i32>();
pub const U8_SERIALIZED_LENGTH: usize = size_of::<u8>();
pub const U32_SERIALIZED_LENGTH: usize = size_of::<u32>();
pub const U64_SERIALIZED_LENGTH: usize = size_of::<u64>();
pub const U128_SERIALIZED_LENGTH: usize = size_of::<u128>();
pub const U256_SERIALIZED_LENGTH: usize = U128_SERIALIZED_LENGTH * 2;

/// Types which can be serialized into the harness wire format.
pub trait ToBytes {
    /// Serializes `&self` to a `Vec<u8>`.
    fn to_bytes(&self) -> Result<Vec<u8>, Error>;
}

/// Types which can be deserialized from the harness wire format.
pub trait FromBytes: Sized {
    /// Deserializes the slice into `Self`, returning the unconsumed remainder.
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error>;

    /// Deserializes the `Vec<u8>` into `Self`, returning the unconsumed remainder.
    fn from_vec(bytes: Vec<u8>) -> Result<(Self, Vec<u8>), Error> {
        Self::from_bytes(bytes.as_slice()).map(|(x, remainder)| (x, Vec::from(remainder)))
    }
}

/// Serialization and deserialization errors.
#[derive(Debug, Fail, PartialEq, Eq, Clone)]
#[repr(u8)]
pub enum Error {
    /// Early end of stream while deserializing.
    #[fail(display = "Deserialization error: early end of stream")]
    EarlyEndOfStream = 0,

    /// Formatting error while deserializing.
    #[fail(display = "Deserialization error: formatting error")]
    FormattingError,

    /// Not all input bytes were consumed in [`deserialize`].
    #[fail(display = "Deserialization error: left-over bytes")]
    LeftOverBytes,

    /// Out of memory error.
    #[fail(display = "Serialization error: out of memory")]
    OutOfMemoryError,
}

/// Deserializes `bytes` into an instance of `T`.
///
/// Returns an error if the bytes cannot be deserialized into `T` or if not all of the input bytes
/// are consumed in the operation.
pub fn deserialize<T: FromBytes>(bytes: Vec<u8>) -> Result<T, Error> {
    let (t, remainder) = T::from_vec(bytes)?;
    if remainder.is_empty() {
        Ok(t)
    } else {
        Err(Error::LeftOverBytes)
    }
}

/// Splits `bytes` at `n`, or returns `EarlyEndOfStream` when there are fewer than `n` bytes.
pub fn safe_split_at(bytes: &[u8], n: usize) -> Result<(&[u8], &[u8]), Error> {
    if n > bytes.len() {
        Err(Error::EarlyEndOfStream)
    } else {
        Ok(bytes.split_at(n))
    }
}

/// Serializes a collection length as a `u32`, rejecting lengths which can't be represented.
pub(crate) fn length_to_bytes(len: usize) -> Result<Vec<u8>, Error> {
    if len >= u32::max_value() as usize - U32_SERIALIZED_LENGTH {
        return Err(Error::OutOfMemoryError);
    }
    (len as u32).to_bytes()
}

impl ToBytes for bool {
    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        u8::from(*self).to_bytes()
    }
}

impl FromBytes for bool {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error> {
        match bytes.split_first() {
            None => Err(Error::EarlyEndOfStream),
            Some((byte, rem)) => match byte {
                1 => Ok((true, rem)),
                0 => Ok((false, rem)),
                _ => Err(Error::FormattingError),
            },
        }
    }
}

impl ToBytes for u8 {
    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        Ok(vec![*self])
    }
}

impl FromBytes for u8 {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error> {
        match bytes.split_first() {
            None => Err(Error::EarlyEndOfStream),
            Some((byte, rem)) => Ok((*byte, rem)),
        }
    }
}

macro_rules! impl_le_bytes {
    ($type:ty, $len:expr) => {
        impl ToBytes for $type {
            fn to_bytes(&self) -> Result<Vec<u8>, Error> {
                Ok(self.to_le_bytes().to_vec())
            }
        }

        impl FromBytes for $type {
            fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error> {
                let mut result = [0u8; $len];
                let (bytes, rem) = safe_split_at(bytes, $len)?;
                result.copy_from_slice(bytes);
                Ok((<$type>::from_le_bytes(result), rem))
            }
        }
    };
}

impl_le_bytes!(i32, I32_SERIALIZED_LENGTH);
impl_le_bytes!(u32, U32_SERIALIZED_LENGTH);
impl_le_bytes!(i64, U64_SERIALIZED_LENGTH);
impl_le_bytes!(u64, U64_SERIALIZED_LENGTH);
impl_le_bytes!(i128, U128_SERIALIZED_LENGTH);
impl_le_bytes!(u128, U128_SERIALIZED_LENGTH);

impl FromBytes for Vec<u8> {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error> {
        let (size, rem) = u32::from_bytes(bytes)?;
        let (vec_data, rem) = safe_split_at(&rem, size as usize)?;
        Ok((vec_data.to_vec(), rem))
    }
}

impl ToBytes for Vec<u8> {
    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut result = length_to_bytes(self.len())?;
        result.reserve(self.len());
        result.extend(self);
        Ok(result)
    }
}

impl ToBytes for String {
    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        self.as_str().to_bytes()
    }
}

impl ToBytes for str {
    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut result = length_to_bytes(self.len())?;
        result.extend_from_slice(self.as_bytes());
        Ok(result)
    }
}

impl FromBytes for String {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), Error> {
        let (str_bytes, rem): (Vec<u8>, &[u8]) = FromBytes::from_bytes(bytes)?;
        let result = String::from_utf8(str_bytes).map_err(|_| Error::FormattingError)?;
        Ok((result, rem))
    }
}

#[doc(hidden)]
/// Asserts that `t` survives a serialization round trip unchanged.
#[cfg(any(feature = "gens", test))]
pub fn test_serialization_roundtrip<T>(t: &T)
where
    T: ToBytes + FromBytes + PartialEq + std::fmt::Debug,
{
    let serialized = ToBytes::to_bytes(t).expect("Unable to serialize data");
    let deserialized = deserialize::<T>(serialized).expect("Unable to deserialize data");
    assert_eq!(*t, deserialized);
}
