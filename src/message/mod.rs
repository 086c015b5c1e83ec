mod client_hello;
mod extension;
mod extensions;
mod handshake;
mod hello_extensions;
mod hello_verify;
mod id;
mod random;

use std::fmt;

pub use client_hello::ClientHello;
pub use extension::{Extension, ExtensionType, HelloExtension};
pub use extensions::{EcPointFormat, EcPointFormatsExtension};
pub use extensions::{EllipticCurvesExtension, NamedCurve};
pub use handshake::{Body, Handshake, HandshakeMessage, Header, MessageType, HEADER_LEN};
pub use hello_extensions::HelloExtensions;
pub use hello_verify::HelloVerifyRequest;
pub use id::{Cookie, SessionId};
pub use random::Random;

use nom::number::complete::{be_u16, be_u8};
use nom::IResult;

use crate::Error;

/// Protocol version as two 8-bit fields.
///
/// DTLS versions are the one's complement of the TLS version they are
/// derived from, so DTLS 1.2 is `{254, 253}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProtocolVersion {
    pub major: u8,
    pub minor: u8,
}

impl ProtocolVersion {
    pub const DTLS1_0: ProtocolVersion = ProtocolVersion::new(254, 255);
    pub const DTLS1_2: ProtocolVersion = ProtocolVersion::new(254, 253);

    pub const fn new(major: u8, minor: u8) -> Self {
        ProtocolVersion { major, minor }
    }

    pub fn from_u16(value: u16) -> Self {
        let [major, minor] = value.to_be_bytes();
        ProtocolVersion { major, minor }
    }

    pub fn as_u16(&self) -> u16 {
        u16::from_be_bytes([self.major, self.minor])
    }

    pub fn parse(input: &[u8]) -> IResult<&[u8], ProtocolVersion, Error> {
        let (input, major) = be_u8(input)?;
        let (input, minor) = be_u8(input)?;
        Ok((input, ProtocolVersion { major, minor }))
    }

    pub fn serialize(&self, output: &mut Vec<u8>) {
        output.push(self.major);
        output.push(self.minor);
    }
}

impl Default for ProtocolVersion {
    fn default() -> Self {
        Self::DTLS1_2
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::DTLS1_0 => write!(f, "DTLS 1.0"),
            Self::DTLS1_2 => write!(f, "DTLS 1.2"),
            ProtocolVersion { major, minor } => write!(f, "{}.{}", major, minor),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum CipherSuite {
    PSK_AES128_CCM_8,
    ECDHE_ECDSA_AES128_CCM_8,
    ECDHE_ECDSA_AES128_GCM_SHA256,
    ECDHE_RSA_AES128_GCM_SHA256,
    ECDHE_ECDSA_AES256_GCM_SHA384,
    ECDHE_RSA_AES256_GCM_SHA384,
    Unknown(u16),
}

impl CipherSuite {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0xC0A8 => CipherSuite::PSK_AES128_CCM_8,
            0xC0AE => CipherSuite::ECDHE_ECDSA_AES128_CCM_8,
            0xC02B => CipherSuite::ECDHE_ECDSA_AES128_GCM_SHA256,
            0xC02F => CipherSuite::ECDHE_RSA_AES128_GCM_SHA256,
            0xC02C => CipherSuite::ECDHE_ECDSA_AES256_GCM_SHA384,
            0xC030 => CipherSuite::ECDHE_RSA_AES256_GCM_SHA384,
            _ => CipherSuite::Unknown(value),
        }
    }

    pub fn as_u16(&self) -> u16 {
        match self {
            CipherSuite::PSK_AES128_CCM_8 => 0xC0A8,
            CipherSuite::ECDHE_ECDSA_AES128_CCM_8 => 0xC0AE,
            CipherSuite::ECDHE_ECDSA_AES128_GCM_SHA256 => 0xC02B,
            CipherSuite::ECDHE_RSA_AES128_GCM_SHA256 => 0xC02F,
            CipherSuite::ECDHE_ECDSA_AES256_GCM_SHA384 => 0xC02C,
            CipherSuite::ECDHE_RSA_AES256_GCM_SHA384 => 0xC030,
            CipherSuite::Unknown(value) => *value,
        }
    }

    pub fn parse(input: &[u8]) -> IResult<&[u8], CipherSuite, Error> {
        let (input, value) = be_u16(input)?;
        Ok((input, CipherSuite::from_u16(value)))
    }
}

impl Default for CipherSuite {
    fn default() -> Self {
        Self::Unknown(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionMethod {
    #[default]
    Null,
    Deflate,
    Unknown(u8),
}

impl CompressionMethod {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0x00 => CompressionMethod::Null,
            0x01 => CompressionMethod::Deflate,
            _ => CompressionMethod::Unknown(value),
        }
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            CompressionMethod::Null => 0x00,
            CompressionMethod::Deflate => 0x01,
            CompressionMethod::Unknown(value) => *value,
        }
    }

    pub fn parse(input: &[u8]) -> IResult<&[u8], CompressionMethod, Error> {
        let (input, value) = be_u8(input)?;
        Ok((input, CompressionMethod::from_u8(value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_version_roundtrip() {
        let mut serialized = Vec::new();
        ProtocolVersion::new(254, 253).serialize(&mut serialized);
        assert_eq!(serialized, [0xFE, 0xFD]);

        let (rest, parsed) = ProtocolVersion::parse(&serialized).unwrap();
        assert_eq!(parsed, ProtocolVersion::DTLS1_2);
        assert_eq!(parsed.as_u16(), 0xFEFD);
        assert!(rest.is_empty());
    }

    #[test]
    fn protocol_version_truncated() {
        let err = ProtocolVersion::parse(&[0xFE]).unwrap_err();
        assert_eq!(Error::from(err), Error::TruncatedMessage);
    }

    #[test]
    fn protocol_version_display() {
        assert_eq!(ProtocolVersion::DTLS1_0.to_string(), "DTLS 1.0");
        assert_eq!(ProtocolVersion::from_u16(0x0303).to_string(), "3.3");
    }

    #[test]
    fn cipher_suite_unknown_passthrough() {
        let (_, suite) = CipherSuite::parse(&[0x13, 0x01]).unwrap();
        assert_eq!(suite, CipherSuite::Unknown(0x1301));
        assert_eq!(suite.as_u16(), 0x1301);
    }
}
