//! DTLS hello message codec.
//!
//! Wire encoding and decoding of the DTLS handshake messages that open a
//! session, their hello extensions, and the stateless cookie exchange
//! (RFC 6347 section 4.2.1) that protects a server from spoofed-source floods.
//!
//! ```
//! use dtls_hello::message::{Body, Cookie, Handshake, HelloVerifyRequest, ProtocolVersion};
//! use dtls_hello::Config;
//!
//! let cookie = Cookie::try_new(&[0x01, 0x02, 0x03])?;
//! let hvr = HelloVerifyRequest::new(ProtocolVersion::DTLS1_2, cookie);
//!
//! let mut out = Vec::new();
//! Handshake::new(0, hvr.into()).serialize(&mut out)?;
//! assert_eq!(&out[12..], &[0xFE, 0xFD, 0x03, 0x01, 0x02, 0x03]);
//!
//! let decoded = Handshake::decode(&Config::default(), &out)?;
//! assert_eq!(decoded.body, Body::from(hvr));
//! # Ok::<(), dtls_hello::Error>(())
//! ```
//!
//! Decoding is synchronous and never reads past the end of the input. Either
//! a complete value is returned or an [`Error`] is.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

#[macro_use]
extern crate log;

mod config;
pub use config::{Config, ConfigBuilder};

mod cookie;
pub use cookie::CookieGenerator;

mod error;
pub use error::Error;

pub mod message;
