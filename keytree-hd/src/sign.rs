//! Curve-dispatched signing.

use core::fmt;

use keytree::{CurveKind, Error, HasherType, Result};

use crate::node::HdNode;
use crate::{eddsa, weierstrass};

/// Upper bound on nonce re-derivations while looking for a canonical ECDSA
/// signature.
pub const MAX_SIGN_ATTEMPTS: u32 = 10_000;

/// Caller-supplied predicate over `(recovery_id, r ‖ s)`; returning `false`
/// makes the signer try another nonce.
pub type CanonicalFn<'a> = dyn Fn(u8, &[u8; 64]) -> bool + 'a;

/// A 64-byte signature, with a recovery id on the ECDSA curves.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    bytes: [u8; 64],
    recovery_id: Option<u8>,
}

impl Signature {
    /// `r ‖ s` for ECDSA, `R ‖ S` for EdDSA.
    pub fn to_bytes(&self) -> [u8; 64] {
        self.bytes
    }

    /// Borrow the signature bytes.
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.bytes
    }

    /// Recovery id (bit 0: odd `y`, bit 1: `x` overflowed the order).
    /// `None` for EdDSA.
    pub fn recovery_id(&self) -> Option<u8> {
        self.recovery_id
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature(")?;
        for byte in &self.bytes {
            write!(f, "{byte:02x}")?;
        }
        write!(f, ", recovery_id: {:?})", self.recovery_id)
    }
}

impl HdNode {
    /// Sign `message` with the curve's signing hash.
    pub fn sign(&self, message: &[u8], canonical: Option<&CanonicalFn<'_>>) -> Result<Signature> {
        self.sign_with_hasher(message, self.curve.hasher_sign, canonical)
    }

    /// Sign `message`, hashing with `hasher` on the ECDSA curves.
    ///
    /// EdDSA variants hash internally, so `hasher` and `canonical` only
    /// matter for ECDSA.
    pub fn sign_with_hasher(
        &self,
        message: &[u8],
        hasher: HasherType,
        canonical: Option<&CanonicalFn<'_>>,
    ) -> Result<Signature> {
        if self.curve.is_group() {
            let digest = hasher
                .digest(message)
                .to_array32()
                .ok_or(Error::UnsupportedOperation("signing digest must be 32 bytes"))?;
            return self.sign_digest(&digest, canonical);
        }
        self.sign_edwards(message)
    }

    /// Sign a precomputed 32-byte digest.
    ///
    /// On the EdDSA curves the digest is signed as an ordinary message.
    pub fn sign_digest(
        &self,
        digest: &[u8; 32],
        canonical: Option<&CanonicalFn<'_>>,
    ) -> Result<Signature> {
        if !self.curve.is_group() {
            return self.sign_edwards(digest);
        }

        tracing::trace!(curve = self.curve.name, "signing digest");
        let (bytes, recovery_id) =
            weierstrass::sign_digest(self.curve.kind, self.secret()?, digest, canonical)?;
        Ok(Signature {
            bytes,
            recovery_id: Some(recovery_id),
        })
    }

    fn sign_edwards(&self, message: &[u8]) -> Result<Signature> {
        tracing::trace!(curve = self.curve.name, "signing message");
        let secret = self.secret()?;
        let tagged = self.public_key()?;
        let mut public = [0u8; 32];
        public.copy_from_slice(&tagged[1..]);

        let bytes = match self.curve.kind {
            CurveKind::Ed25519(digest) => eddsa::sign(digest, secret, &public, message)?,
            CurveKind::Ed25519Cardano => eddsa::cardano_sign(
                secret,
                self.private_key_extension.as_bytes(),
                &public,
                message,
            )?,
            CurveKind::Curve25519 => eddsa::curve25519_sign(secret, &public, message)?,
            CurveKind::Secp256k1 | CurveKind::Nist256p1 => {
                return Err(Error::UnsupportedOperation("ECDSA curves sign digests"))
            }
        };
        Ok(Signature {
            bytes,
            recovery_id: None,
        })
    }
}
