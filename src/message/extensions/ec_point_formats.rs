use nom::bytes::complete::take;
use nom::number::complete::be_u8;
use nom::IResult;
use tinyvec::ArrayVec;

use super::typed_data;
use crate::message::{Extension, ExtensionType, HelloExtension};
use crate::Error;

/// EC Point Format as defined in RFC 4492 Section 5.1.2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EcPointFormat {
    #[default]
    Uncompressed,
    AnsiX962CompressedPrime,
    AnsiX962CompressedChar2,
    Unknown(u8),
}

impl EcPointFormat {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0x00 => EcPointFormat::Uncompressed,
            0x01 => EcPointFormat::AnsiX962CompressedPrime,
            0x02 => EcPointFormat::AnsiX962CompressedChar2,
            _ => EcPointFormat::Unknown(value),
        }
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            EcPointFormat::Uncompressed => 0x00,
            EcPointFormat::AnsiX962CompressedPrime => 0x01,
            EcPointFormat::AnsiX962CompressedChar2 => 0x02,
            EcPointFormat::Unknown(value) => *value,
        }
    }
}

/// ECPointFormats extension as defined in RFC 4492
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EcPointFormatsExtension {
    pub formats: ArrayVec<[EcPointFormat; 4]>,
}

impl EcPointFormatsExtension {
    pub fn new(formats: ArrayVec<[EcPointFormat; 4]>) -> Self {
        EcPointFormatsExtension { formats }
    }

    pub fn parse(input: &[u8]) -> IResult<&[u8], EcPointFormatsExtension, Error> {
        let (input, list_len) = be_u8(input)?;
        let (input, list) = take(list_len)(input)?;

        let mut formats = ArrayVec::new();
        for value in list {
            if formats.try_push(EcPointFormat::from_u8(*value)).is_some() {
                return Err(Error::TooManyEntries("ec point formats", 4).fail());
            }
        }

        Ok((input, EcPointFormatsExtension { formats }))
    }

    pub fn from_extension(ext: &Extension) -> Result<Self, Error> {
        let data = typed_data(ext, ExtensionType::EcPointFormats)?;
        let (rest, parsed) = Self::parse(data)?;
        if !rest.is_empty() {
            return Err(Error::Framing("trailing bytes in ec_point_formats"));
        }
        Ok(parsed)
    }
}

impl Default for EcPointFormatsExtension {
    fn default() -> Self {
        let mut formats = ArrayVec::new();
        formats.push(EcPointFormat::Uncompressed);
        EcPointFormatsExtension { formats }
    }
}

impl HelloExtension for EcPointFormatsExtension {
    fn extension_type(&self) -> ExtensionType {
        ExtensionType::EcPointFormats
    }

    fn data_length(&self) -> usize {
        1 + self.formats.len()
    }

    fn serialize_data(&self, output: &mut Vec<u8>) {
        output.push(self.formats.len() as u8);
        for format in &self.formats {
            output.push(format.as_u8());
        }
    }
}
