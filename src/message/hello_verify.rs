use std::fmt;

use nom::IResult;

use super::{Cookie, HandshakeMessage, MessageType, ProtocolVersion};
use crate::Error;

/// Stateless cookie challenge sent by a server in reply to a ClientHello.
///
/// See RFC 6347 section 4.2.1. The client proves it can receive at its
/// claimed address by echoing `cookie` in a second ClientHello.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelloVerifyRequest {
    pub server_version: ProtocolVersion,
    pub cookie: Cookie,
}

impl HelloVerifyRequest {
    pub fn new(server_version: ProtocolVersion, cookie: Cookie) -> Self {
        HelloVerifyRequest {
            server_version,
            cookie,
        }
    }

    pub fn parse(input: &[u8]) -> IResult<&[u8], HelloVerifyRequest, Error> {
        let (input, server_version) = ProtocolVersion::parse(input)?;
        let (input, cookie) = Cookie::parse(input)?;

        Ok((
            input,
            HelloVerifyRequest {
                server_version,
                cookie,
            },
        ))
    }

    pub fn serialize(&self, output: &mut Vec<u8>) {
        self.server_version.serialize(output);
        self.cookie.serialize(output);
    }
}

impl HandshakeMessage for HelloVerifyRequest {
    fn message_type(&self) -> MessageType {
        MessageType::HelloVerifyRequest
    }

    fn body_length(&self) -> usize {
        // version (2) + cookie length (1)
        3 + self.cookie.len()
    }

    fn serialize_body(&self, output: &mut Vec<u8>) -> Result<(), Error> {
        self.serialize(output);
        Ok(())
    }
}

impl fmt::Display for HelloVerifyRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HelloVerifyRequest {{ server_version: {}, cookie: {} }}",
            self.server_version, self.cookie
        )
    }
}
