//! Shared-secret agreement.

use alloc::vec::Vec;

use keytree::{CurveKind, Error, Result};
use zeroize::Zeroizing;

use crate::node::HdNode;
use crate::{eddsa, weierstrass};

/// Tag byte in front of a 32-byte X25519 public key.
pub const CURVE25519_PUBLIC_TAG: u8 = 0x40;

impl HdNode {
    /// Diffie-Hellman with `peer`.
    ///
    /// ECDSA curves accept a SEC1 point (33 or 65 bytes) and return the
    /// 65-byte uncompressed shared point. X25519 expects `0x40 ‖ key` and
    /// returns `0x04 ‖ shared` (33 bytes).
    pub fn ecdh(&self, peer: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        let secret = self.secret()?;
        match self.curve.kind {
            kind @ (CurveKind::Secp256k1 | CurveKind::Nist256p1) => {
                let shared = Zeroizing::new(weierstrass::ecdh(kind, secret, peer)?);
                Ok(Zeroizing::new(shared.to_vec()))
            }
            CurveKind::Curve25519 => {
                let key = match peer {
                    [CURVE25519_PUBLIC_TAG, key @ ..] if key.len() == 32 => {
                        let mut out = [0u8; 32];
                        out.copy_from_slice(key);
                        out
                    }
                    [CURVE25519_PUBLIC_TAG, ..] => {
                        return Err(Error::InvalidLength {
                            expected: 33,
                            actual: peer.len(),
                        })
                    }
                    _ => return Err(Error::InvalidPublicKey),
                };
                let shared = Zeroizing::new(eddsa::curve25519_ecdh(secret, &key));
                let mut out = Zeroizing::new(Vec::with_capacity(33));
                out.push(0x04);
                out.extend_from_slice(&shared[..]);
                Ok(out)
            }
            CurveKind::Ed25519(_) | CurveKind::Ed25519Cardano => Err(Error::UnsupportedOperation(
                "ECDH is not defined for Ed25519 keys",
            )),
        }
    }
}
