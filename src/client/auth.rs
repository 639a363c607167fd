//! Security-type handlers for the handshake.
//!
//! Each handler owns one security-type code; the handshake picks the first
//! configured handler the server also supports and delegates the type's
//! sub-protocol to it. See RFC 6143 Section 7.2.

use crate::codec::{WireRead, WireWrite};
use crate::error::RfbError;
use crate::Transport;
use async_trait::async_trait;
use des::cipher::{generic_array::GenericArray, BlockEncrypt, KeyInit};
use des::Des;

pub(crate) const SECURITY_TYPE_NONE: u8 = 1;
pub(crate) const SECURITY_TYPE_VNC_AUTH: u8 = 2;

/// One authentication method the client is willing to perform.
///
/// The handshake writes the chosen type byte itself; `handshake` only runs
/// the bytes the sub-protocol exchanges after that, and nothing at all for
/// types that exchange none.
#[async_trait]
pub trait ClientAuth: Send + Sync + std::fmt::Debug {
    /// The security-type code negotiated for this method.
    fn security_type(&self) -> u8;

    /// Runs the method's part of the protocol on the open transport.
    async fn handshake(&self, stream: &mut dyn Transport) -> Result<(), RfbError>;
}

/// Security type 1: no authentication, no bytes exchanged.
#[derive(Debug, Default)]
pub struct AuthNone;

#[async_trait]
impl ClientAuth for AuthNone {
    fn security_type(&self) -> u8 {
        SECURITY_TYPE_NONE
    }

    async fn handshake(&self, _stream: &mut dyn Transport) -> Result<(), RfbError> {
        Ok(())
    }
}

/// Security type 2: the classic DES challenge-response.
///
/// See RFC 6143 Section 7.2.2.
#[derive(Debug)]
pub struct VncAuth {
    password: String,
}

impl VncAuth {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
        }
    }
}

#[async_trait]
impl ClientAuth for VncAuth {
    fn security_type(&self) -> u8 {
        SECURITY_TYPE_VNC_AUTH
    }

    async fn handshake(&self, stream: &mut dyn Transport) -> Result<(), RfbError> {
        let mut challenge = [0u8; 16];
        stream.read_exact_into(&mut challenge).await?;

        let response = encrypt_challenge(&self.password, &challenge);
        stream.write_wire_bytes(&response).await
    }
}

/// Encrypts the server's 16-byte challenge with the password.
///
/// The DES key is the password copied into 8 bytes (zero padded, silently
/// truncated past 8) with the bit order of every byte reversed. The reversal
/// is a historical quirk of VNC servers and clients, not part of DES or of
/// RFC 6143, and both sides must apply it to interoperate. The challenge is
/// then encrypted as two independent 8-byte ECB blocks, low block first.
pub(crate) fn encrypt_challenge(password: &str, challenge: &[u8; 16]) -> [u8; 16] {
    let mut key = [0u8; 8];
    for (slot, &byte) in key.iter_mut().zip(password.as_bytes().iter().take(8)) {
        *slot = byte.reverse_bits();
    }

    let cipher = Des::new(GenericArray::from_slice(&key));

    let mut response = [0u8; 16];
    for (dst, src) in response.chunks_exact_mut(8).zip(challenge.chunks_exact(8)) {
        let mut block = GenericArray::clone_from_slice(src);
        cipher.encrypt_block(&mut block);
        dst.copy_from_slice(&block);
    }
    response
}
