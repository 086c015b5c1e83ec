use super::{ClientHello, HelloVerifyRequest};
use nom::bytes::complete::take;
use nom::number::complete::be_u8;
use nom::{
    number::complete::{be_u16, be_u24},
    IResult,
};

use crate::{Config, Error};

/// Bytes in the handshake header preceding every message body.
pub const HEADER_LEN: usize = 12;

const MAX_U24: usize = 0x00FF_FFFF;

/// Framing shared by all handshake messages.
///
/// The header is always derived from the message at serialization time, so
/// the length on the wire cannot drift from the body that follows it.
pub trait HandshakeMessage {
    fn message_type(&self) -> MessageType;

    /// Length of the body, computed from the current field values.
    fn body_length(&self) -> usize;

    fn serialize_body(&self, output: &mut Vec<u8>) -> Result<(), Error>;

    /// Header followed by body. On error `output` is left as it was.
    fn serialize_handshake(&self, message_seq: u16, output: &mut Vec<u8>) -> Result<(), Error> {
        let length = self.body_length();
        if length > MAX_U24 {
            return Err(Error::encoding("handshake body", length, MAX_U24));
        }

        let start = output.len();
        Header::unfragmented(self.message_type(), length as u32, message_seq).serialize(output);

        if let Err(e) = self.serialize_body(output) {
            output.truncate(start);
            return Err(e);
        }
        debug_assert_eq!(output.len() - start - HEADER_LEN, length, "body_length() disagrees");

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Header {
    pub msg_type: MessageType,
    pub length: u32,
    pub message_seq: u16,
    pub fragment_offset: u32,
    pub fragment_length: u32,
}

impl Header {
    pub fn unfragmented(msg_type: MessageType, length: u32, message_seq: u16) -> Self {
        Header {
            msg_type,
            length,
            message_seq,
            fragment_offset: 0,
            fragment_length: length,
        }
    }

    pub fn is_fragment(&self) -> bool {
        self.fragment_offset > 0 || self.fragment_length != self.length
    }

    pub fn parse(input: &[u8]) -> IResult<&[u8], Header, Error> {
        let (input, msg_type) = MessageType::parse(input)?;
        let (input, length) = be_u24(input)?;
        let (input, message_seq) = be_u16(input)?;
        let (input, fragment_offset) = be_u24(input)?;
        let (input, fragment_length) = be_u24(input)?;

        Ok((
            input,
            Header {
                msg_type,
                length,
                message_seq,
                fragment_offset,
                fragment_length,
            },
        ))
    }

    pub fn serialize(&self, output: &mut Vec<u8>) {
        output.push(self.msg_type.as_u8());
        output.extend_from_slice(&self.length.to_be_bytes()[1..]);
        output.extend_from_slice(&self.message_seq.to_be_bytes());
        output.extend_from_slice(&self.fragment_offset.to_be_bytes()[1..]);
        output.extend_from_slice(&self.fragment_length.to_be_bytes()[1..]);
    }
}

/// A complete, unfragmented handshake message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handshake {
    pub message_seq: u16,
    pub body: Body,
}

impl Handshake {
    pub fn new(message_seq: u16, body: Body) -> Self {
        Handshake { message_seq, body }
    }

    /// Header as it would be written for the current body.
    pub fn header(&self) -> Header {
        Header::unfragmented(
            self.body.message_type(),
            self.body.body_length() as u32,
            self.message_seq,
        )
    }

    pub fn parse(input: &[u8], max_length: usize) -> IResult<&[u8], Handshake, Error> {
        let (input, header) = Header::parse(input)?;

        if header.is_fragment() {
            debug!(
                "Fragmented {:?} (offset {}, length {} of {})",
                header.msg_type, header.fragment_offset, header.fragment_length, header.length
            );
            return Err(Error::Framing("fragmented handshake").fail());
        }

        let length = header.length as usize;
        if length > max_length {
            return Err(Error::TooBigLength(length, max_length).fail());
        }

        let (input, body_bytes) = take(length)(input)?;
        let (rest, body) = Body::parse(body_bytes, header.msg_type)?;

        if !rest.is_empty() {
            debug!(
                "{:?} body has {} bytes beyond its fields",
                header.msg_type,
                rest.len()
            );
            return Err(Error::Framing("trailing bytes in handshake body").fail());
        }

        Ok((
            input,
            Handshake {
                message_seq: header.message_seq,
                body,
            },
        ))
    }

    /// Decode a buffer holding exactly one handshake message.
    pub fn decode(config: &Config, bytes: &[u8]) -> Result<Handshake, Error> {
        let (rest, handshake) = Self::parse(bytes, config.max_message_length())?;
        if !rest.is_empty() {
            return Err(Error::Framing("trailing bytes after handshake"));
        }
        Ok(handshake)
    }

    pub fn serialize(&self, output: &mut Vec<u8>) -> Result<(), Error> {
        self.body.serialize_handshake(self.message_seq, output)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    HelloRequest, // empty
    ClientHello,
    ServerHello,
    HelloVerifyRequest,
    Certificate,
    ServerKeyExchange,
    CertificateRequest,
    ServerHelloDone, // empty
    CertificateVerify,
    ClientKeyExchange,
    Finished,
    Unknown(u8),
}

impl Default for MessageType {
    fn default() -> Self {
        Self::Unknown(0xFF)
    }
}

impl MessageType {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => MessageType::HelloRequest,
            1 => MessageType::ClientHello,
            2 => MessageType::ServerHello,
            3 => MessageType::HelloVerifyRequest,
            11 => MessageType::Certificate,
            12 => MessageType::ServerKeyExchange,
            13 => MessageType::CertificateRequest,
            14 => MessageType::ServerHelloDone,
            15 => MessageType::CertificateVerify,
            16 => MessageType::ClientKeyExchange,
            20 => MessageType::Finished,
            _ => MessageType::Unknown(value),
        }
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            MessageType::HelloRequest => 0,
            MessageType::ClientHello => 1,
            MessageType::ServerHello => 2,
            MessageType::HelloVerifyRequest => 3,
            MessageType::Certificate => 11,
            MessageType::ServerKeyExchange => 12,
            MessageType::CertificateRequest => 13,
            MessageType::ServerHelloDone => 14,
            MessageType::CertificateVerify => 15,
            MessageType::ClientKeyExchange => 16,
            MessageType::Finished => 20,
            MessageType::Unknown(value) => *value,
        }
    }

    pub fn parse(input: &[u8]) -> IResult<&[u8], MessageType, Error> {
        let (input, byte) = be_u8(input)?;
        Ok((input, Self::from_u8(byte)))
    }
}

/// Handshake bodies this crate can decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    ClientHello(ClientHello),
    HelloVerifyRequest(HelloVerifyRequest),
}

impl Body {
    pub fn parse(input: &[u8], m: MessageType) -> IResult<&[u8], Body, Error> {
        match m {
            MessageType::ClientHello => {
                let (input, client_hello) = ClientHello::parse(input)?;
                Ok((input, Body::ClientHello(client_hello)))
            }
            MessageType::HelloVerifyRequest => {
                let (input, hello_verify_request) = HelloVerifyRequest::parse(input)?;
                Ok((input, Body::HelloVerifyRequest(hello_verify_request)))
            }
            other => {
                debug!("No decoder for handshake type {:?}", other);
                Err(Error::UnsupportedMessageType(other.as_u8()).fail())
            }
        }
    }
}

impl HandshakeMessage for Body {
    fn message_type(&self) -> MessageType {
        match self {
            Body::ClientHello(m) => m.message_type(),
            Body::HelloVerifyRequest(m) => m.message_type(),
        }
    }

    fn body_length(&self) -> usize {
        match self {
            Body::ClientHello(m) => m.body_length(),
            Body::HelloVerifyRequest(m) => m.body_length(),
        }
    }

    fn serialize_body(&self, output: &mut Vec<u8>) -> Result<(), Error> {
        match self {
            Body::ClientHello(m) => m.serialize_body(output),
            Body::HelloVerifyRequest(m) => m.serialize_body(output),
        }
    }
}

impl From<ClientHello> for Body {
    fn from(value: ClientHello) -> Self {
        Body::ClientHello(value)
    }
}

impl From<HelloVerifyRequest> for Body {
    fn from(value: HelloVerifyRequest) -> Self {
        Body::HelloVerifyRequest(value)
    }
}
