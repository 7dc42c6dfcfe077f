//! Cardano extended-key (BIP32-Ed25519) roots and derivation.
//!
//! Keys are 64 bytes, `kL ‖ kR`, both little-endian. Child keys are formed
//! by plain integer addition instead of modular arithmetic, which keeps `kL`
//! a multiple of 8 and lets normal (non-hardened) children exist for Ed25519.

use keytree::curve::ED25519_CARDANO_NAME;
use keytree::{lookup, CurveKind, Error, Result, Secret32};
use sha2::Sha512;
use zeroize::Zeroizing;

use crate::node::{hmac_sha512, is_hardened, HdNode};

/// PBKDF2 rounds used to stretch a Cardano root secret.
pub const CARDANO_PBKDF2_ROUNDS: u32 = 4096;

/// `8 · bytes` where `bytes` is the low 28 bytes of a little-endian integer.
fn multiply8(bytes: &[u8]) -> Zeroizing<[u8; 32]> {
    let mut out = Zeroizing::new([0u8; 32]);
    let mut carry = 0u8;
    for (dst, src) in out.iter_mut().zip(bytes.iter().take(28)) {
        *dst = (src << 3) | carry;
        carry = src >> 5;
    }
    out[28] = carry;
    out
}

/// Little-endian 256-bit addition, final carry dropped.
fn add_256bits(x: &[u8; 32], y: &[u8]) -> Secret32 {
    let mut out = Secret32::zero();
    let mut carry = 0u16;
    for (i, dst) in out.as_bytes_mut().iter_mut().enumerate() {
        let sum = u16::from(x[i]) + u16::from(y[i]) + carry;
        *dst = (sum & 0xff) as u8;
        carry = sum >> 8;
    }
    out
}

impl HdNode {
    /// Cardano root node.
    ///
    /// PBKDF2-HMAC-SHA512 with `passphrase` as the password and `seed` (the
    /// mnemonic's entropy) as the salt yields 96 bytes: the clamped `kL`,
    /// then `kR`, then the chain code. The public key is filled right away.
    pub fn from_seed_cardano(passphrase: &[u8], seed: &[u8]) -> Result<Self> {
        let curve = lookup(ED25519_CARDANO_NAME)?;
        tracing::trace!(curve = curve.name, "deriving Cardano root node");

        let mut secret = Zeroizing::new([0u8; 96]);
        pbkdf2::pbkdf2_hmac::<Sha512>(passphrase, seed, CARDANO_PBKDF2_ROUNDS, &mut secret[..]);
        secret[0] &= 0b1111_1000;
        secret[31] &= 0b0001_1111;
        secret[31] |= 0b0100_0000;

        let mut node = Self::empty(curve);
        node.private_key.as_bytes_mut().copy_from_slice(&secret[..32]);
        node.private_key_extension
            .as_bytes_mut()
            .copy_from_slice(&secret[32..64]);
        node.chain_code.as_bytes_mut().copy_from_slice(&secret[64..]);
        node.fill_public_key()?;
        Ok(node)
    }

    /// Replace this node with its Cardano child at `index`.
    ///
    /// Hardened steps hash `0x00 ‖ kL ‖ kR ‖ index`, normal steps
    /// `0x02 ‖ A ‖ index`, with the index little-endian. The chain code comes
    /// from a second HMAC over the same data retagged `0x01` or `0x03`.
    pub fn private_ckd_cardano(&mut self, index: u32) -> Result<()> {
        if self.curve.kind != CurveKind::Ed25519Cardano {
            return Err(Error::InvalidDerivationStep(
                "Cardano derivation needs a Cardano node",
            ));
        }
        if !self.has_private_key() {
            return Err(Error::InvalidDerivationStep(
                "private derivation needs a private key",
            ));
        }
        let depth = self.next_depth()?;
        tracing::trace!(curve = self.curve.name, depth, index, "Cardano child derivation");

        let hardened = is_hardened(index);
        let mut data = Zeroizing::new([0u8; 69]);
        let len = if hardened {
            data[1..33].copy_from_slice(self.private_key.as_bytes());
            data[33..65].copy_from_slice(self.private_key_extension.as_bytes());
            data[65..].copy_from_slice(&index.to_le_bytes());
            69
        } else {
            let public = self.public_key()?;
            data[0] = 0x02;
            data[1..33].copy_from_slice(&public[1..]);
            data[33..37].copy_from_slice(&index.to_le_bytes());
            37
        };

        let z = Zeroizing::new(hmac_sha512(self.chain_code.as_bytes(), &[&data[..len]])?);
        let key = add_256bits(self.private_key.as_bytes(), &multiply8(&z[..32])[..]);
        let extension = add_256bits(self.private_key_extension.as_bytes(), &z[32..]);

        data[0] = if hardened { 0x01 } else { 0x03 };
        let chain = Zeroizing::new(hmac_sha512(self.chain_code.as_bytes(), &[&data[..len]])?);

        self.private_key = key;
        self.private_key_extension = extension;
        self.chain_code.as_bytes_mut().copy_from_slice(&chain[32..]);
        self.depth = depth;
        self.child_num = index;
        self.public_key = [0u8; 33];
        Ok(())
    }
}
