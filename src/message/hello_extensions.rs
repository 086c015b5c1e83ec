use std::fmt;

use nom::number::complete::be_u16;
use nom::IResult;

use super::extension::EXTENSION_HEADER_LEN;
use super::{Extension, ExtensionType, HelloExtension};
use crate::Error;

/// Ordered list of hello extensions behind a 16-bit aggregate length.
///
/// Wire order is preserved and repeated types are kept as they are;
/// enforcing one-per-type is up to whoever consumes the hello.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HelloExtensions {
    extensions: Vec<Extension>,
}

impl HelloExtensions {
    pub fn new() -> Self {
        HelloExtensions::default()
    }

    pub fn from_extensions(extensions: Vec<Extension>) -> Self {
        HelloExtensions { extensions }
    }

    pub fn push<E: HelloExtension + ?Sized>(&mut self, extension: &E) -> Result<(), Error> {
        self.extensions.push(Extension::from_typed(extension)?);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Extension> {
        self.extensions.iter()
    }

    /// First extension of the given type.
    pub fn get(&self, extension_type: ExtensionType) -> Option<&Extension> {
        self.extensions
            .iter()
            .find(|e| e.extension_type() == extension_type)
    }

    /// Aggregate length: the sum of data length plus 4 over all extensions.
    ///
    /// This is the value of the length field, which does not count itself.
    pub fn length(&self) -> usize {
        self.extensions
            .iter()
            .map(|e| e.data_length() + EXTENSION_HEADER_LEN)
            .sum()
    }

    /// Bytes written by [`HelloExtensions::serialize`].
    pub fn encoded_length(&self) -> usize {
        2 + self.length()
    }

    pub fn parse(input: &[u8]) -> IResult<&[u8], HelloExtensions, Error> {
        let (mut input, declared) = be_u16(input)?;

        // Each entry is charged against the declared length. Entries are at
        // least 4 bytes, so this terminates within declared / 4 rounds.
        let mut remaining = declared as isize;
        let mut extensions = Vec::new();

        while remaining > 0 {
            let (rest, extension) = Extension::parse(input)?;

            remaining -= (extension.data_length() + EXTENSION_HEADER_LEN) as isize;
            if remaining < 0 {
                debug!(
                    "Extension {} overruns declared extensions length {} by {}",
                    extension.extension_type(),
                    declared,
                    -remaining
                );
                return Err(Error::Framing("extension overruns declared length").fail());
            }

            extensions.push(extension);
            input = rest;
        }

        Ok((input, HelloExtensions { extensions }))
    }

    /// Decode a buffer holding exactly one extensions block.
    pub fn decode(bytes: &[u8]) -> Result<HelloExtensions, Error> {
        let (rest, extensions) = Self::parse(bytes)?;
        if !rest.is_empty() {
            debug!("{} bytes after extensions block", rest.len());
            return Err(Error::Framing("trailing bytes after extensions"));
        }
        Ok(extensions)
    }

    pub fn serialize(&self, output: &mut Vec<u8>) -> Result<(), Error> {
        let length = self.length();
        if length > u16::MAX as usize {
            return Err(Error::encoding("extensions", length, u16::MAX as usize));
        }

        output.extend_from_slice(&(length as u16).to_be_bytes());
        for extension in &self.extensions {
            extension.serialize(output)?;
        }

        Ok(())
    }
}

impl fmt::Display for HelloExtensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HelloExtensions (length {})", self.length())?;
        for extension in &self.extensions {
            write!(f, "\n  {}", extension)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a HelloExtensions {
    type Item = &'a Extension;
    type IntoIter = std::slice::Iter<'a, Extension>;

    fn into_iter(self) -> Self::IntoIter {
        self.extensions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{EcPointFormatsExtension, EllipticCurvesExtension};

    const MESSAGE: &[u8] = &[
        0x00, 0x06, // Extensions length
        0x00, 0x0A, // ExtensionType::EllipticCurves
        0x00, 0x02, // Extension length
        0xAA, 0xBB, // Extension data
    ];

    fn raw(extension_type: ExtensionType, data: &[u8]) -> Extension {
        Extension::new(extension_type, data.to_vec()).unwrap()
    }

    #[test]
    fn single_extension() {
        let extension = raw(ExtensionType::EllipticCurves, &[0xAA, 0xBB]);
        let extensions = HelloExtensions::from_extensions(vec![extension]);
        assert_eq!(extensions.length(), 6);

        let mut serialized = Vec::new();
        extensions.serialize(&mut serialized).unwrap();
        assert_eq!(serialized, MESSAGE);

        let parsed = HelloExtensions::decode(&serialized).unwrap();
        assert_eq!(parsed, extensions);
    }

    #[test]
    fn display_lists_entries() {
        let mut extensions = HelloExtensions::new();
        extensions.push(&EcPointFormatsExtension::default()).unwrap();
        extensions.push(&raw(ExtensionType::Unknown(0xFF01), &[0x00])).unwrap();

        assert_eq!(
            extensions.to_string(),
            "HelloExtensions (length 11)\n  \
             ec_point_formats (2 bytes): [01, 00]\n  \
             unknown(65281) (1 bytes): [00]"
        );
        assert_eq!(HelloExtensions::new().to_string(), "HelloExtensions (length 0)");
    }

    #[test]
    fn order_and_duplicates_preserved() {
        let mut extensions = HelloExtensions::new();
        extensions.push(&EcPointFormatsExtension::default()).unwrap();
        extensions.push(&EllipticCurvesExtension::default()).unwrap();
        extensions.push(&raw(ExtensionType::Unknown(0xFF01), &[0x00])).unwrap();
        extensions.push(&raw(ExtensionType::EcPointFormats, &[0x00])).unwrap();

        let mut serialized = Vec::new();
        extensions.serialize(&mut serialized).unwrap();
        assert_eq!(serialized.len(), extensions.encoded_length());

        let parsed = HelloExtensions::decode(&serialized).unwrap();
        assert_eq!(parsed, extensions);

        let types: Vec<_> = parsed.iter().map(|e| e.extension_type()).collect();
        assert_eq!(
            types,
            [
                ExtensionType::EcPointFormats,
                ExtensionType::EllipticCurves,
                ExtensionType::Unknown(0xFF01),
                ExtensionType::EcPointFormats,
            ]
        );

        let first = parsed.get(ExtensionType::EcPointFormats).unwrap();
        assert_eq!(first.data(), &[0x01, 0x00]);
    }

    #[test]
    fn empty() {
        let parsed = HelloExtensions::decode(&[0x00, 0x00]).unwrap();
        assert!(parsed.is_empty());

        let mut serialized = Vec::new();
        parsed.serialize(&mut serialized).unwrap();
        assert_eq!(serialized, [0x00, 0x00]);
    }

    #[test]
    fn unknown_type_passthrough() {
        let message: &[u8] = &[
            0x00, 0x07, // Extensions length
            0x00, 0x08, // Unassigned extension type
            0x00, 0x03, // Extension length
            0x01, 0x02, 0x03, // Extension data
        ];

        let parsed = HelloExtensions::decode(message).unwrap();
        assert_eq!(parsed.len(), 1);

        let ext = parsed.get(ExtensionType::Unknown(8)).unwrap();
        assert_eq!(ext.data(), &[0x01, 0x02, 0x03]);
    }

    #[test]
    fn declared_length_exceeds_entries() {
        let mut message = MESSAGE.to_vec();
        message[1] += 10; // Declare 10 bytes more than present

        let err = HelloExtensions::parse(&message).unwrap_err();
        assert_eq!(Error::from(err), Error::TruncatedMessage);
    }

    #[test]
    fn entry_length_exceeds_input() {
        let message: &[u8] = &[
            0x00, 0x08, // Extensions length
            0x00, 0x0A, // ExtensionType::EllipticCurves
            0x00, 0x04, // Extension length (only 2 bytes follow)
            0xAA, 0xBB, // Extension data
        ];

        let err = HelloExtensions::parse(message).unwrap_err();
        assert_eq!(Error::from(err), Error::TruncatedMessage);
    }

    #[test]
    fn entry_overruns_declared_length() {
        let message: &[u8] = &[
            0x00, 0x05, // Extensions length (one short)
            0x00, 0x0A, // ExtensionType::EllipticCurves
            0x00, 0x02, // Extension length
            0xAA, 0xBB, // Extension data
        ];

        let err = HelloExtensions::parse(message).unwrap_err();
        assert!(matches!(Error::from(err), Error::Framing(_)));
    }

    #[test]
    fn declared_length_undershoots() {
        let message: &[u8] = &[
            0x00, 0x04, // Extensions length, covers only the first entry
            0x00, 0x04, // ExtensionType::TruncatedHmac
            0x00, 0x00, // Extension length
            0x00, 0x04, // ExtensionType::TruncatedHmac
            0x00, 0x00, // Extension length
        ];

        // Nested parse leaves the rest for the enclosing structure.
        let (rest, parsed) = HelloExtensions::parse(message).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(rest.len(), 4);

        let err = HelloExtensions::decode(message).unwrap_err();
        assert!(matches!(err, Error::Framing(_)));
    }

    #[test]
    fn aggregate_too_long() {
        let mut extensions = HelloExtensions::new();
        extensions
            .push(&raw(ExtensionType::ServerName, &vec![0; 40_000]))
            .unwrap();
        extensions
            .push(&raw(ExtensionType::ServerName, &vec![0; 40_000]))
            .unwrap();

        let mut serialized = Vec::new();
        let err = extensions.serialize(&mut serialized).unwrap_err();
        assert_eq!(err, Error::encoding("extensions", 80_008, u16::MAX as usize));
    }
}
