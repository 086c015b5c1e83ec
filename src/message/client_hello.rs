use super::{CipherSuite, CompressionMethod, HandshakeMessage, HelloExtensions, MessageType};
use super::{Cookie, ProtocolVersion, Random, SessionId};
use nom::{
    bytes::complete::take,
    number::complete::{be_u16, be_u8},
    IResult,
};
use tinyvec::ArrayVec;

use crate::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientHello {
    pub client_version: ProtocolVersion,
    pub random: Random,
    pub session_id: SessionId,
    pub cookie: Cookie,
    pub cipher_suites: ArrayVec<[CipherSuite; 64]>,
    pub compression_methods: ArrayVec<[CompressionMethod; 4]>,
    pub extensions: HelloExtensions,
}

impl ClientHello {
    pub fn new(
        client_version: ProtocolVersion,
        random: Random,
        session_id: SessionId,
        cookie: Cookie,
        cipher_suites: ArrayVec<[CipherSuite; 64]>,
        compression_methods: ArrayVec<[CompressionMethod; 4]>,
    ) -> Self {
        ClientHello {
            client_version,
            random,
            session_id,
            cookie,
            cipher_suites,
            compression_methods,
            extensions: HelloExtensions::new(),
        }
    }

    pub fn with_extensions(mut self, extensions: HelloExtensions) -> Self {
        self.extensions = extensions;
        self
    }

    /// Same hello with the cookie from a HelloVerifyRequest filled in.
    pub fn with_cookie(mut self, cookie: Cookie) -> Self {
        self.cookie = cookie;
        self
    }

    pub fn parse(input: &[u8]) -> IResult<&[u8], ClientHello, Error> {
        let (input, client_version) = ProtocolVersion::parse(input)?;
        let (input, random) = Random::parse(input)?;
        let (input, session_id) = SessionId::parse(input)?;
        let (input, cookie) = Cookie::parse(input)?;

        let (input, cipher_suites_len) = be_u16(input)?;
        if cipher_suites_len == 0 || cipher_suites_len % 2 != 0 {
            return Err(Error::Framing("bad cipher suites length").fail());
        }
        let (input, mut input_cipher) = take(cipher_suites_len)(input)?;
        let mut cipher_suites = ArrayVec::new();
        while !input_cipher.is_empty() {
            let (rest, suite) = CipherSuite::parse(input_cipher)?;
            if cipher_suites.try_push(suite).is_some() {
                return Err(Error::TooManyEntries("cipher suites", 64).fail());
            }
            input_cipher = rest;
        }

        let (input, compression_methods_len) = be_u8(input)?;
        if compression_methods_len == 0 {
            return Err(Error::Framing("no compression methods").fail());
        }
        let (input, input_compression) = take(compression_methods_len)(input)?;
        let mut compression_methods = ArrayVec::new();
        for value in input_compression {
            if compression_methods
                .try_push(CompressionMethod::from_u8(*value))
                .is_some()
            {
                return Err(Error::TooManyEntries("compression methods", 4).fail());
            }
        }

        // Extensions are optional and present only if bytes remain
        let (input, extensions) = if input.is_empty() {
            (input, HelloExtensions::new())
        } else {
            HelloExtensions::parse(input)?
        };

        Ok((
            input,
            ClientHello {
                client_version,
                random,
                session_id,
                cookie,
                cipher_suites,
                compression_methods,
                extensions,
            },
        ))
    }

    /// Every field except the cookie and the extensions, as serialized.
    ///
    /// This is what a cookie is bound to, so that the echoed ClientHello
    /// verifies against the same input as the first one.
    pub fn serialize_cookie_input(&self, output: &mut Vec<u8>) {
        self.client_version.serialize(output);
        self.random.serialize(output);
        self.session_id.serialize(output);
        self.serialize_suites_and_methods(output);
    }

    fn serialize_suites_and_methods(&self, output: &mut Vec<u8>) {
        output.extend_from_slice(&(self.cipher_suites.len() as u16 * 2).to_be_bytes());
        for suite in &self.cipher_suites {
            output.extend_from_slice(&suite.as_u16().to_be_bytes());
        }
        output.push(self.compression_methods.len() as u8);
        for method in &self.compression_methods {
            output.push(method.as_u8());
        }
    }

    pub fn serialize(&self, output: &mut Vec<u8>) -> Result<(), Error> {
        // Nothing is written unless the whole hello is encodable.
        if self.cipher_suites.is_empty() {
            return Err(Error::EmptyList("cipher suites"));
        }
        if self.compression_methods.is_empty() {
            return Err(Error::EmptyList("compression methods"));
        }
        let extensions_length = self.extensions.length();
        if extensions_length > u16::MAX as usize {
            return Err(Error::encoding("extensions", extensions_length, u16::MAX as usize));
        }

        self.client_version.serialize(output);
        self.random.serialize(output);
        self.session_id.serialize(output);
        self.cookie.serialize(output);
        self.serialize_suites_and_methods(output);

        if !self.extensions.is_empty() {
            self.extensions.serialize(output)?;
        }

        Ok(())
    }
}

impl HandshakeMessage for ClientHello {
    fn message_type(&self) -> MessageType {
        MessageType::ClientHello
    }

    fn body_length(&self) -> usize {
        let extensions = if self.extensions.is_empty() {
            0
        } else {
            self.extensions.encoded_length()
        };

        2 + Random::LEN
            + 1
            + self.session_id.len()
            + 1
            + self.cookie.len()
            + 2
            + self.cipher_suites.len() * 2
            + 1
            + self.compression_methods.len()
            + extensions
    }

    fn serialize_body(&self, output: &mut Vec<u8>) -> Result<(), Error> {
        self.serialize(output)
    }
}

#[cfg(test)]
mod tests {
    use tinyvec::array_vec;

    use super::*;
    use crate::message::{EcPointFormatsExtension, Extension, ExtensionType};

    const MESSAGE: &[u8] = &[
        0xFE, 0xFD, // ProtocolVersion::DTLS1_2
        // Random
        0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F,
        0x10, 0x11, 0x12, 0x13, 0x14, 0x15, 0x16, 0x17, 0x18, 0x19, 0x1A, 0x1B, 0x1C, 0x1D, 0x1E,
        0x1F, 0x20, //
        0x01, // SessionId length
        0xAA, // SessionId
        0x01, // Cookie length
        0xBB, // Cookie
        0x00, 0x04, // CipherSuites length
        0xC0, 0x2F, // CipherSuite::ECDHE_RSA_AES128_GCM_SHA256
        0xC0, 0x30, // CipherSuite::ECDHE_RSA_AES256_GCM_SHA384
        0x01, // CompressionMethods length
        0x00, // CompressionMethod::Null
    ];

    const EXTENSIONS: &[u8] = &[
        0x00, 0x06, // Extensions length
        0x00, 0x0B, // ExtensionType::EcPointFormats
        0x00, 0x02, // Extension length
        0x01, 0x00, // Uncompressed
    ];

    fn client_hello() -> ClientHello {
        let random = Random::parse(&MESSAGE[2..34]).unwrap().1;
        let session_id = SessionId::try_new(&[0xAA]).unwrap();
        let cookie = Cookie::try_new(&[0xBB]).unwrap();
        let cipher_suites = array_vec![
            CipherSuite::ECDHE_RSA_AES128_GCM_SHA256,
            CipherSuite::ECDHE_RSA_AES256_GCM_SHA384
        ];
        let compression_methods = array_vec![[CompressionMethod; 4] => CompressionMethod::Null];

        ClientHello::new(
            ProtocolVersion::DTLS1_2,
            random,
            session_id,
            cookie,
            cipher_suites,
            compression_methods,
        )
    }

    #[test]
    fn roundtrip() {
        let client_hello = client_hello();
        assert_eq!(client_hello.body_length(), MESSAGE.len());

        // Serialize and compare to MESSAGE
        let mut serialized = Vec::new();
        client_hello.serialize(&mut serialized).unwrap();
        assert_eq!(serialized, MESSAGE);

        // Parse and compare with original
        let (rest, parsed) = ClientHello::parse(&serialized).unwrap();
        assert_eq!(parsed, client_hello);

        assert!(rest.is_empty());
    }

    #[test]
    fn roundtrip_with_extensions() {
        let mut extensions = HelloExtensions::new();
        extensions.push(&EcPointFormatsExtension::default()).unwrap();
        let client_hello = client_hello().with_extensions(extensions);

        let mut expected = MESSAGE.to_vec();
        expected.extend_from_slice(EXTENSIONS);
        assert_eq!(client_hello.body_length(), expected.len());

        let mut serialized = Vec::new();
        client_hello.serialize(&mut serialized).unwrap();
        assert_eq!(serialized, expected);

        let (rest, parsed) = ClientHello::parse(&serialized).unwrap();
        assert!(rest.is_empty());
        assert_eq!(parsed, client_hello);
        assert!(parsed
            .extensions
            .get(ExtensionType::EcPointFormats)
            .is_some());
    }

    #[test]
    fn cookie_input_ignores_cookie() {
        let first = client_hello().with_cookie(Cookie::empty());
        let second = client_hello().with_cookie(Cookie::try_new(&[1, 2, 3]).unwrap());

        let mut a = Vec::new();
        let mut b = Vec::new();
        first.serialize_cookie_input(&mut a);
        second.serialize_cookie_input(&mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn session_id_too_long() {
        let mut message = MESSAGE.to_vec();
        message[34] = 0x21; // SessionId length (33, which is too long)

        let result = ClientHello::parse(&message);
        assert!(result.is_err());
    }

    #[test]
    fn cookie_too_long() {
        let mut message = MESSAGE.to_vec();
        message[36] = 0xFF; // Cookie length (255, longer than the input)

        let err = ClientHello::parse(&message).unwrap_err();
        assert_eq!(Error::from(err), Error::TruncatedMessage);
    }

    #[test]
    fn odd_cipher_suites_length() {
        let mut message = MESSAGE.to_vec();
        message[39] = 0x03;

        let err = ClientHello::parse(&message).unwrap_err();
        assert!(matches!(Error::from(err), Error::Framing(_)));
    }

    #[test]
    fn truncated_extensions() {
        let mut message = MESSAGE.to_vec();
        message.extend_from_slice(&EXTENSIONS[..5]);

        let err = ClientHello::parse(&message).unwrap_err();
        assert_eq!(Error::from(err), Error::TruncatedMessage);
    }

    #[test]
    fn empty_lists_not_encoded() {
        let mut client_hello = client_hello();
        client_hello.cipher_suites.clear();

        let mut serialized = vec![0xEE];
        let err = client_hello.serialize(&mut serialized).unwrap_err();
        assert_eq!(err, Error::EmptyList("cipher suites"));
        assert_eq!(serialized, [0xEE]);

        let mut client_hello = self::client_hello();
        client_hello.compression_methods.clear();
        let err = client_hello.serialize(&mut serialized).unwrap_err();
        assert_eq!(err, Error::EmptyList("compression methods"));
        assert_eq!(serialized, [0xEE]);
    }

    #[test]
    fn oversized_extensions_leave_output_untouched() {
        let mut extensions = HelloExtensions::new();
        for id in [0xFF01, 0xFF02] {
            let extension = Extension::new(ExtensionType::Unknown(id), vec![0; 40_000]).unwrap();
            extensions.push(&extension).unwrap();
        }
        let client_hello = client_hello().with_extensions(extensions);

        let mut serialized = vec![0xEE];
        let err = client_hello.serialize(&mut serialized).unwrap_err();
        assert_eq!(err, Error::encoding("extensions", 80_008, 65_535));
        assert_eq!(serialized, [0xEE]);

        let err = client_hello.serialize_handshake(0, &mut serialized).unwrap_err();
        assert!(matches!(err, Error::Encoding { .. }));
        assert_eq!(serialized, [0xEE]);
    }
}
