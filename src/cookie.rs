//! Stateless cookies for the HelloVerifyRequest exchange.
//!
//! The server answers a cookie-less ClientHello with a HelloVerifyRequest
//! without remembering anything about the client. The cookie is a MAC over
//! the client's address and hello, so when the client repeats the hello with
//! the cookie echoed, the server can recompute and compare it. Only then is
//! any per-client state worth allocating.

use std::net::{IpAddr, SocketAddr};

use hmac::{Hmac, Mac};
use rand::{rngs::OsRng, RngCore};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::message::{ClientHello, Cookie, HelloVerifyRequest};
use crate::{Config, Error};

type HmacSha256 = Hmac<Sha256>;

pub struct CookieGenerator {
    secret: Zeroizing<[u8; 32]>,
    config: Config,
}

impl CookieGenerator {
    /// Create a generator with a fresh random secret.
    pub fn new(config: Config) -> Self {
        let mut secret = Zeroizing::new([0u8; 32]);
        OsRng.fill_bytes(&mut secret[..]);
        CookieGenerator { secret, config }
    }

    pub fn with_secret(secret: [u8; 32], config: Config) -> Self {
        CookieGenerator {
            secret: Zeroizing::new(secret),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn mac(&self, peer: SocketAddr, hello: &ClientHello) -> Result<HmacSha256, Error> {
        let mut mac = HmacSha256::new_from_slice(&self.secret[..])
            .map_err(|_| Error::Crypto("invalid cookie secret"))?;

        match peer.ip() {
            IpAddr::V4(ip) => mac.update(&ip.octets()),
            IpAddr::V6(ip) => mac.update(&ip.octets()),
        }
        mac.update(&peer.port().to_be_bytes());

        let mut buf = Vec::with_capacity(128);
        hello.serialize_cookie_input(&mut buf);
        mac.update(&buf);

        Ok(mac)
    }

    /// cookie = trunc(HMAC(secret, peer || hello))
    pub fn compute(&self, peer: SocketAddr, hello: &ClientHello) -> Result<Cookie, Error> {
        let tag = self.mac(peer, hello)?.finalize().into_bytes();
        Cookie::try_new(&tag[..self.config.cookie_length()])
    }

    /// Check the cookie echoed in `hello`.
    pub fn verify(&self, peer: SocketAddr, hello: &ClientHello) -> bool {
        if hello.cookie.len() != self.config.cookie_length() {
            if !hello.cookie.is_empty() {
                debug!(
                    "Cookie from {} has length {}, expected {}",
                    peer,
                    hello.cookie.len(),
                    self.config.cookie_length()
                );
            }
            return false;
        }

        let ok = match self.mac(peer, hello) {
            Ok(mac) => mac.verify_truncated_left(&hello.cookie).is_ok(),
            Err(_) => false,
        };

        if !ok {
            debug!("Invalid cookie from {}", peer);
        }

        ok
    }

    /// The challenge to send back for `hello`.
    pub fn hello_verify_request(
        &self,
        peer: SocketAddr,
        hello: &ClientHello,
    ) -> Result<HelloVerifyRequest, Error> {
        let cookie = self.compute(peer, hello)?;
        trace!("Sending HelloVerifyRequest to {}", peer);
        Ok(HelloVerifyRequest::new(self.config.server_version(), cookie))
    }
}
