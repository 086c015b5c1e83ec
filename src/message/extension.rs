use std::fmt;

use nom::{bytes::complete::take, number::complete::be_u16, IResult};

use crate::Error;

/// Bytes of type and length prefix in front of every extension's data.
pub(crate) const EXTENSION_HEADER_LEN: usize = 4;

/// A single hello extension as it appears on the wire.
///
/// Implementors only describe their data; the type/length prefix is written
/// by the provided [`HelloExtension::serialize`].
pub trait HelloExtension {
    fn extension_type(&self) -> ExtensionType;

    /// Length of the extension data, excluding the type and length prefix.
    fn data_length(&self) -> usize;

    fn serialize_data(&self, output: &mut Vec<u8>);

    fn serialize(&self, output: &mut Vec<u8>) -> Result<(), Error> {
        let len = self.data_length();
        if len > u16::MAX as usize {
            return Err(Error::encoding("extension_data", len, u16::MAX as usize));
        }
        output.extend_from_slice(&self.extension_type().as_u16().to_be_bytes());
        output.extend_from_slice(&(len as u16).to_be_bytes());
        self.serialize_data(output);
        Ok(())
    }
}

/// Raw extension: resolved type and opaque data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    extension_type: ExtensionType,
    extension_data: Vec<u8>,
}

impl Extension {
    pub fn new(extension_type: ExtensionType, extension_data: Vec<u8>) -> Result<Self, Error> {
        if extension_data.len() > u16::MAX as usize {
            return Err(Error::encoding(
                "extension_data",
                extension_data.len(),
                u16::MAX as usize,
            ));
        }
        Ok(Extension {
            extension_type,
            extension_data,
        })
    }

    /// Capture any extension implementation as raw type and data.
    pub fn from_typed<E: HelloExtension + ?Sized>(ext: &E) -> Result<Self, Error> {
        let mut extension_data = Vec::with_capacity(ext.data_length());
        ext.serialize_data(&mut extension_data);
        Extension::new(ext.extension_type(), extension_data)
    }

    pub fn data(&self) -> &[u8] {
        &self.extension_data
    }

    pub fn parse(input: &[u8]) -> IResult<&[u8], Extension, Error> {
        let (input, extension_type) = ExtensionType::parse(input)?;
        let (input, extension_length) = be_u16(input)?;
        let (input, extension_data) = take(extension_length)(input)?;

        if let ExtensionType::Unknown(id) = extension_type {
            trace!("Passing through unknown extension type {}", id);
        }

        Ok((
            input,
            Extension {
                extension_type,
                extension_data: extension_data.to_vec(),
            },
        ))
    }
}

impl HelloExtension for Extension {
    fn extension_type(&self) -> ExtensionType {
        self.extension_type
    }

    fn data_length(&self) -> usize {
        self.extension_data.len()
    }

    fn serialize_data(&self, output: &mut Vec<u8>) {
        output.extend_from_slice(&self.extension_data);
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} bytes): {:02x?}",
            self.extension_type,
            self.extension_data.len(),
            self.extension_data
        )
    }
}

/// Registry of hello extension types.
///
/// Ids are not contiguous and the set is not exhaustive; anything
/// unregistered is carried as `Unknown` with its raw id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtensionType {
    /// RFC 3546
    ServerName,
    MaxFragmentLength,
    ClientCertificateUrl,
    TrustedCaKeys,
    TruncatedHmac,
    StatusRequest,
    /// RFC 4681
    UserMapping,
    /// RFC 4492
    EllipticCurves,
    EcPointFormats,
    Unknown(u16),
}

impl ExtensionType {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0 => ExtensionType::ServerName,
            1 => ExtensionType::MaxFragmentLength,
            2 => ExtensionType::ClientCertificateUrl,
            3 => ExtensionType::TrustedCaKeys,
            4 => ExtensionType::TruncatedHmac,
            5 => ExtensionType::StatusRequest,
            6 => ExtensionType::UserMapping,
            10 => ExtensionType::EllipticCurves,
            11 => ExtensionType::EcPointFormats,
            _ => ExtensionType::Unknown(value),
        }
    }

    pub fn as_u16(&self) -> u16 {
        match self {
            ExtensionType::ServerName => 0,
            ExtensionType::MaxFragmentLength => 1,
            ExtensionType::ClientCertificateUrl => 2,
            ExtensionType::TrustedCaKeys => 3,
            ExtensionType::TruncatedHmac => 4,
            ExtensionType::StatusRequest => 5,
            ExtensionType::UserMapping => 6,
            ExtensionType::EllipticCurves => 10,
            ExtensionType::EcPointFormats => 11,
            ExtensionType::Unknown(value) => *value,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ExtensionType::ServerName => "server_name",
            ExtensionType::MaxFragmentLength => "max_fragment_length",
            ExtensionType::ClientCertificateUrl => "client_certificate_url",
            ExtensionType::TrustedCaKeys => "trusted_ca_keys",
            ExtensionType::TruncatedHmac => "truncated_hmac",
            ExtensionType::StatusRequest => "status_request",
            ExtensionType::UserMapping => "user_mapping",
            ExtensionType::EllipticCurves => "elliptic_curves",
            ExtensionType::EcPointFormats => "ec_point_formats",
            ExtensionType::Unknown(_) => "unknown",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ExtensionType::Unknown(_))
    }

    pub fn parse(input: &[u8]) -> IResult<&[u8], ExtensionType, Error> {
        let (input, value) = be_u16(input)?;
        Ok((input, ExtensionType::from_u16(value)))
    }
}

impl fmt::Display for ExtensionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtensionType::Unknown(id) => write!(f, "unknown({})", id),
            known => f.write_str(known.name()),
        }
    }
}
