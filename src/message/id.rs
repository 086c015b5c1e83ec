use nom::bytes::complete::take;
use nom::number::complete::be_u8;
use nom::IResult;
use rand::Rng;
use std::fmt;
use std::ops::Deref;

use crate::Error;

/// Opaque byte string with an 8-bit length prefix on the wire.
///
/// Storage is inline so values are `Copy` and decoding never allocates.
macro_rules! var_array {
    ($name:ident, $field:literal, $max:expr) => {
        #[derive(Clone, Copy)]
        pub struct $name([u8; $max], usize);

        impl $name {
            pub const MAX_LEN: usize = $max;

            pub fn empty() -> Self {
                $name([0; $max], 0)
            }

            pub fn try_new(data: &[u8]) -> Result<Self, Error> {
                if data.len() > $max {
                    return Err(Error::encoding($field, data.len(), $max));
                }
                let mut array = [0; $max];
                array[..data.len()].copy_from_slice(data);
                Ok($name(array, data.len()))
            }

            pub fn random(len: usize) -> Result<Self, Error> {
                if len > $max {
                    return Err(Error::encoding($field, len, $max));
                }
                let mut t = rand::thread_rng();
                let mut arr = [0; $max];
                for a in &mut arr[..len] {
                    *a = t.gen();
                }
                Ok(Self(arr, len))
            }

            pub fn parse(input: &[u8]) -> IResult<&[u8], Self, Error> {
                let (input, len) = be_u8(input)?;
                if len as usize > $max {
                    return Err(Error::encoding($field, len as usize, $max).fail());
                }
                let (input, data) = take(len as usize)(input)?;
                let mut array = [0; $max];
                array[..data.len()].copy_from_slice(data);
                Ok((input, $name(array, data.len())))
            }

            /// Length prefix followed by the bytes.
            pub fn serialize(&self, output: &mut Vec<u8>) {
                // MAX_LEN always fits the 8-bit prefix.
                output.push(self.1 as u8);
                output.extend_from_slice(self);
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::empty()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:02x?})", stringify!($name), &self.0[..self.1])
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.deref() == other.deref()
            }
        }

        impl Eq for $name {}

        impl Deref for $name {
            type Target = [u8];

            fn deref(&self) -> &Self::Target {
                &self.0[..self.1]
            }
        }

        impl<'a> TryFrom<&'a [u8]> for $name {
            type Error = Error;

            fn try_from(value: &'a [u8]) -> Result<Self, Self::Error> {
                Self::try_new(value)
            }
        }

        impl<'a> TryFrom<&'a str> for $name {
            type Error = Error;

            fn try_from(value: &'a str) -> Result<Self, Self::Error> {
                Self::try_new(value.as_bytes())
            }
        }
    };
}

var_array!(SessionId, "session_id", 32);
var_array!(Cookie, "cookie", 255);
