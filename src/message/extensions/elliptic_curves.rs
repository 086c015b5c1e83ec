use nom::bytes::complete::take;
use nom::number::complete::be_u16;
use nom::IResult;
use tinyvec::ArrayVec;

use super::typed_data;
use crate::message::{Extension, ExtensionType, HelloExtension};
use crate::Error;

/// Named elliptic curve as defined in RFC 4492 Section 5.1.1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamedCurve {
    #[default]
    Secp256r1,
    Secp384r1,
    Secp521r1,
    X25519,
    X448,
    Unknown(u16),
}

impl NamedCurve {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0x0017 => NamedCurve::Secp256r1,
            0x0018 => NamedCurve::Secp384r1,
            0x0019 => NamedCurve::Secp521r1,
            0x001D => NamedCurve::X25519,
            0x001E => NamedCurve::X448,
            _ => NamedCurve::Unknown(value),
        }
    }

    pub fn as_u16(&self) -> u16 {
        match self {
            NamedCurve::Secp256r1 => 0x0017,
            NamedCurve::Secp384r1 => 0x0018,
            NamedCurve::Secp521r1 => 0x0019,
            NamedCurve::X25519 => 0x001D,
            NamedCurve::X448 => 0x001E,
            NamedCurve::Unknown(value) => *value,
        }
    }

    pub fn parse(input: &[u8]) -> IResult<&[u8], NamedCurve, Error> {
        let (input, value) = be_u16(input)?;
        Ok((input, NamedCurve::from_u16(value)))
    }
}

/// EllipticCurves extension as defined in RFC 4492
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EllipticCurvesExtension {
    pub curves: ArrayVec<[NamedCurve; 16]>,
}

impl EllipticCurvesExtension {
    pub fn new(curves: ArrayVec<[NamedCurve; 16]>) -> Self {
        EllipticCurvesExtension { curves }
    }

    pub fn parse(input: &[u8]) -> IResult<&[u8], EllipticCurvesExtension, Error> {
        let (input, list_len) = be_u16(input)?;
        if list_len % 2 != 0 {
            return Err(Error::Framing("odd elliptic curve list length").fail());
        }
        let (input, mut list) = take(list_len)(input)?;

        let mut curves = ArrayVec::new();
        while !list.is_empty() {
            let (rest, curve) = NamedCurve::parse(list)?;
            if curves.try_push(curve).is_some() {
                return Err(Error::TooManyEntries("elliptic curves", 16).fail());
            }
            list = rest;
        }

        Ok((input, EllipticCurvesExtension { curves }))
    }

    /// Interpret a raw extension, which must contain exactly one curve list.
    pub fn from_extension(ext: &Extension) -> Result<Self, Error> {
        let data = typed_data(ext, ExtensionType::EllipticCurves)?;
        let (rest, parsed) = Self::parse(data)?;
        if !rest.is_empty() {
            return Err(Error::Framing("trailing bytes in elliptic_curves"));
        }
        Ok(parsed)
    }
}

impl Default for EllipticCurvesExtension {
    fn default() -> Self {
        let mut curves = ArrayVec::new();
        curves.push(NamedCurve::Secp256r1);
        curves.push(NamedCurve::Secp384r1);
        EllipticCurvesExtension { curves }
    }
}

impl HelloExtension for EllipticCurvesExtension {
    fn extension_type(&self) -> ExtensionType {
        ExtensionType::EllipticCurves
    }

    fn data_length(&self) -> usize {
        2 + self.curves.len() * 2
    }

    fn serialize_data(&self, output: &mut Vec<u8>) {
        // Write the total length of all curves (2 bytes per curve)
        output.extend_from_slice(&((self.curves.len() * 2) as u16).to_be_bytes());

        for curve in &self.curves {
            output.extend_from_slice(&curve.as_u16().to_be_bytes());
        }
    }
}
