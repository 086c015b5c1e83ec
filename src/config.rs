use crate::message::ProtocolVersion;
use crate::Error;

/// Output size of HMAC-SHA256, the longest cookie we can produce.
const MAX_COOKIE_LENGTH: usize = 32;

/// Codec and cookie configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    server_version: ProtocolVersion,
    cookie_length: usize,
    max_message_length: usize,
}

impl Config {
    /// Create a new configuration builder.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder {
            server_version: ProtocolVersion::DTLS1_2,
            cookie_length: 32,
            max_message_length: 16_384,
        }
    }

    /// Version announced in HelloVerifyRequest.
    #[inline(always)]
    pub fn server_version(&self) -> ProtocolVersion {
        self.server_version
    }

    /// Length of generated cookies.
    #[inline(always)]
    pub fn cookie_length(&self) -> usize {
        self.cookie_length
    }

    /// Largest handshake body length the decoder accepts.
    ///
    /// Checked against the header before any of the body is read.
    #[inline(always)]
    pub fn max_message_length(&self) -> usize {
        self.max_message_length
    }
}

impl Default for Config {
    fn default() -> Self {
        // Builder defaults are always valid.
        Config::builder().build_unchecked()
    }
}

/// Builder for [`Config`].
pub struct ConfigBuilder {
    server_version: ProtocolVersion,
    cookie_length: usize,
    max_message_length: usize,
}

impl ConfigBuilder {
    /// Set the version placed in HelloVerifyRequest.
    ///
    /// Defaults to DTLS 1.2. RFC 6347 recommends DTLS 1.0 here for maximum
    /// compatibility, since the version is not negotiated until ServerHello.
    pub fn server_version(mut self, server_version: ProtocolVersion) -> Self {
        self.server_version = server_version;
        self
    }

    /// Set the length of generated cookies.
    ///
    /// Must be between 1 and 32. Defaults to 32.
    pub fn cookie_length(mut self, cookie_length: usize) -> Self {
        self.cookie_length = cookie_length;
        self
    }

    /// Set the largest handshake body the decoder accepts.
    ///
    /// Defaults to 16384.
    pub fn max_message_length(mut self, max_message_length: usize) -> Self {
        self.max_message_length = max_message_length;
        self
    }

    pub fn build(self) -> Result<Config, Error> {
        if self.cookie_length == 0 || self.cookie_length > MAX_COOKIE_LENGTH {
            return Err(Error::encoding(
                "cookie_length",
                self.cookie_length,
                MAX_COOKIE_LENGTH,
            ));
        }
        Ok(self.build_unchecked())
    }

    fn build_unchecked(self) -> Config {
        Config {
            server_version: self.server_version,
            cookie_length: self.cookie_length,
            max_message_length: self.max_message_length,
        }
    }
}
