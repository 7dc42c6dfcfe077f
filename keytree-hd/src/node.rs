//! The key-tree node.
//!
//! An [`HdNode`] is one position in a derivation tree: a curve, its place in
//! the tree (depth and child number), a chain code and either a private key or
//! a public key. Derivation steps (see `derive` and `cardano`) mutate a node in
//! place; clone it first to branch.

use alloc::vec::Vec;
use core::fmt;

use hmac::{Hmac, Mac};
use keytree::{
    hash, lookup, CurveInfo, CurveKind, DerivationPath, Error, Result, Secret32, HARDENED_OFFSET,
};
use sha2::Sha512;
use subtle::{Choice, ConstantTimeEq};
use zeroize::{Zeroize, Zeroizing};

use crate::{eddsa, weierstrass};

type HmacSha512 = Hmac<Sha512>;

/// HMAC-SHA512 over the concatenation of `parts`.
pub(crate) fn hmac_sha512(key: &[u8], parts: &[&[u8]]) -> Result<[u8; 64]> {
    let mut mac = HmacSha512::new_from_slice(key).map_err(|_| Error::CryptoError)?;
    for part in parts {
        mac.update(part);
    }
    let mut out = [0u8; 64];
    out.copy_from_slice(&mac.finalize().into_bytes());
    Ok(out)
}

/// Split an HMAC output into its left and right halves.
pub(crate) fn halves(bytes: &[u8; 64]) -> (Secret32, Secret32) {
    let mut left = Secret32::zero();
    let mut right = Secret32::zero();
    left.as_bytes_mut().copy_from_slice(&bytes[..32]);
    right.as_bytes_mut().copy_from_slice(&bytes[32..]);
    (left, right)
}

/// Whether a raw child index is in the hardened range.
pub(crate) const fn is_hardened(index: u32) -> bool {
    index & HARDENED_OFFSET != 0
}

/// A node of a hierarchical deterministic key tree.
#[derive(Clone)]
pub struct HdNode {
    pub(crate) curve: &'static CurveInfo,
    pub(crate) depth: u8,
    pub(crate) child_num: u32,
    pub(crate) chain_code: Secret32,
    /// All zero when the node is public-only.
    pub(crate) private_key: Secret32,
    /// Right half of a Cardano extended key; zero for other curves.
    pub(crate) private_key_extension: Secret32,
    /// A leading zero byte means "not computed yet".
    pub(crate) public_key: [u8; 33],
}

impl Zeroize for HdNode {
    fn zeroize(&mut self) {
        self.chain_code.zeroize();
        self.private_key.zeroize();
        self.private_key_extension.zeroize();
        self.public_key.zeroize();
        self.depth = 0;
        self.child_num = 0;
    }
}

impl Drop for HdNode {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ConstantTimeEq for HdNode {
    /// Private nodes compare by key material; the cached public key only
    /// matters for public-only nodes.
    fn ct_eq(&self, other: &Self) -> Choice {
        let position = self.curve == other.curve
            && self.depth == other.depth
            && self.child_num == other.child_num;
        let secrets = self.chain_code.ct_eq(&other.chain_code)
            & self.private_key.ct_eq(&other.private_key)
            & self.private_key_extension.ct_eq(&other.private_key_extension);
        let public = if self.has_private_key() {
            Choice::from(1)
        } else {
            self.public_key[..].ct_eq(&other.public_key[..])
        };
        Choice::from(u8::from(position)) & secrets & public
    }
}

impl PartialEq for HdNode {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for HdNode {}

impl fmt::Debug for HdNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HdNode")
            .field("curve", &self.curve.name)
            .field("depth", &self.depth)
            .field("child_num", &self.child_num)
            .field("private_key", &"[REDACTED]")
            .field("has_private_key", &self.has_private_key())
            .finish_non_exhaustive()
    }
}

impl HdNode {
    pub(crate) fn empty(curve: &'static CurveInfo) -> Self {
        Self {
            curve,
            depth: 0,
            child_num: 0,
            chain_code: Secret32::zero(),
            private_key: Secret32::zero(),
            private_key_extension: Secret32::zero(),
            public_key: [0u8; 33],
        }
    }

    /// Root node for `seed` on the named curve.
    ///
    /// On the ECDSA curves the HMAC is re-applied to its own output until the
    /// left half is a valid scalar.
    pub fn from_seed(seed: &[u8], curve_name: &str) -> Result<Self> {
        let curve = lookup(curve_name)?;
        tracing::trace!(curve = curve.name, "deriving root node");

        let mut output = Zeroizing::new(hmac_sha512(curve.seed_key, &[seed])?);
        let (mut key, mut chain) = halves(&output);
        while !curve.is_valid_scalar(key.as_bytes()) {
            tracing::debug!(curve = curve.name, "root key candidate out of range, retrying");
            let previous = Zeroizing::new(*output);
            *output = hmac_sha512(curve.seed_key, &[previous.as_slice()])?;
            (key, chain) = halves(&output);
        }

        let mut node = Self::empty(curve);
        node.private_key = key;
        node.chain_code = chain;
        Ok(node)
    }

    /// Public-only node from its parts.
    pub fn from_xpub(
        depth: u8,
        child_num: u32,
        chain_code: &[u8; 32],
        public_key: &[u8; 33],
        curve_name: &str,
    ) -> Result<Self> {
        let curve = lookup(curve_name)?;
        if !matches!(public_key[0], 0x02 | 0x03) {
            return Err(Error::InvalidPublicKey);
        }

        let mut node = Self::empty(curve);
        node.depth = depth;
        node.child_num = child_num;
        node.chain_code = Secret32::new(*chain_code);
        node.public_key = *public_key;
        Ok(node)
    }

    /// Private node from its parts.
    pub fn from_xprv(
        depth: u8,
        child_num: u32,
        chain_code: &[u8; 32],
        private_key: &[u8; 32],
        curve_name: &str,
    ) -> Result<Self> {
        let curve = lookup(curve_name)?;
        if curve.is_group() && !curve.is_valid_scalar(private_key) {
            return Err(Error::InvalidPrivateKey);
        }

        let mut node = Self::empty(curve);
        node.depth = depth;
        node.child_num = child_num;
        node.chain_code = Secret32::new(*chain_code);
        node.private_key = Secret32::new(*private_key);
        Ok(node)
    }

    /// The curve this node lives on.
    pub fn curve(&self) -> &'static CurveInfo {
        self.curve
    }

    /// Distance from the root.
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Index of the step that produced this node, hardened bit included.
    pub fn child_num(&self) -> u32 {
        self.child_num
    }

    /// Chain code.
    pub fn chain_code(&self) -> &[u8; 32] {
        self.chain_code.as_bytes()
    }

    /// Whether the node carries private material.
    pub fn has_private_key(&self) -> bool {
        !self.private_key.is_zero()
    }

    /// Private key, if the node has one.
    pub fn private_key(&self) -> Option<&[u8; 32]> {
        self.has_private_key().then(|| self.private_key.as_bytes())
    }

    /// Cardano `kR`, if this is a private Cardano node.
    pub fn private_key_extension(&self) -> Option<&[u8; 32]> {
        (self.curve.kind == CurveKind::Ed25519Cardano && self.has_private_key())
            .then(|| self.private_key_extension.as_bytes())
    }

    pub(crate) fn secret(&self) -> Result<&[u8; 32]> {
        self.private_key().ok_or(Error::InvalidPrivateKey)
    }

    pub(crate) fn next_depth(&self) -> Result<u8> {
        self.depth.checked_add(1).ok_or(Error::MaxDepthExceeded)
    }

    /// 33-byte public key: a compressed point on the ECDSA curves, otherwise
    /// `0x01` followed by the 32-byte key.
    ///
    /// Computed from the private key when not cached.
    pub fn public_key(&self) -> Result<[u8; 33]> {
        if self.public_key[0] != 0 {
            return Ok(self.public_key);
        }
        self.compute_public_key()
    }

    /// Cache the public key on the node. Does nothing when already set.
    pub fn fill_public_key(&mut self) -> Result<()> {
        if self.public_key[0] == 0 {
            self.public_key = self.compute_public_key()?;
        }
        Ok(())
    }

    fn compute_public_key(&self) -> Result<[u8; 33]> {
        let secret = self.secret()?;
        let tagged = |key: [u8; 32]| {
            let mut out = [0x01; 33];
            out[1..].copy_from_slice(&key);
            out
        };

        match self.curve.kind {
            kind @ (CurveKind::Secp256k1 | CurveKind::Nist256p1) => {
                weierstrass::public_key(kind, secret)
            }
            CurveKind::Ed25519(digest) => Ok(tagged(eddsa::public_key(digest, secret))),
            CurveKind::Ed25519Cardano => Ok(tagged(eddsa::cardano_public_key(secret))),
            CurveKind::Curve25519 => Ok(tagged(eddsa::curve25519_public_key(secret))),
        }
    }

    /// Copy of this node with the private material removed.
    pub fn to_public(&self) -> Result<Self> {
        let mut node = self.clone();
        node.fill_public_key()?;
        node.private_key = Secret32::zero();
        node.private_key_extension = Secret32::zero();
        Ok(node)
    }

    /// First 20 bytes of the curve's pubkey hash over the 33-byte public key.
    pub fn pubkey_hash(&self) -> Result<[u8; 20]> {
        let digest = self.curve.hasher_pubkey.digest(&self.public_key()?);
        let mut out = [0u8; 20];
        out.copy_from_slice(digest.as_bytes().get(..20).ok_or(Error::CryptoError)?);
        Ok(out)
    }

    /// Fingerprint used as the parent reference in child serialization.
    pub fn fingerprint(&self) -> Result<u32> {
        let hash = self.pubkey_hash()?;
        Ok(u32::from_be_bytes([hash[0], hash[1], hash[2], hash[3]]))
    }

    /// Version prefix (big-endian, without leading zero bytes) followed by
    /// [`pubkey_hash`](Self::pubkey_hash).
    pub fn address_raw(&self, version: u32) -> Result<Vec<u8>> {
        let prefix = version.to_be_bytes();
        let skip = prefix.iter().take(3).take_while(|b| **b == 0).count();

        let mut out = Vec::with_capacity(4 - skip + 20);
        out.extend_from_slice(&prefix[skip..]);
        out.extend_from_slice(&self.pubkey_hash()?);
        Ok(out)
    }

    /// Last 20 bytes of Keccak-256 over the uncompressed secp256k1 point.
    pub fn ethereum_pubkey_hash(&self) -> Result<[u8; 20]> {
        if self.curve.kind != CurveKind::Secp256k1 {
            return Err(Error::UnsupportedOperation(
                "Ethereum hashes need a secp256k1 node",
            ));
        }
        let full = weierstrass::uncompressed(self.curve.kind, &self.public_key()?)?;
        let digest = hash::keccak256(&full[1..]);
        let mut out = [0u8; 20];
        out.copy_from_slice(&digest[12..]);
        Ok(out)
    }

    /// Derive one child into a new node.
    ///
    /// Uses private derivation when the node holds a private key and public
    /// derivation otherwise.
    pub fn derive(&self, index: u32) -> Result<Self> {
        let mut child = self.clone();
        if child.has_private_key() {
            child.private_ckd(index)?;
        } else {
            child.public_ckd(index)?;
        }
        Ok(child)
    }

    /// Derive along a whole path.
    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self> {
        let mut node = self.clone();
        for index in path.iter_raw() {
            if node.has_private_key() {
                node.private_ckd(index)?;
            } else {
                node.public_ckd(index)?;
            }
        }
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;
    use keytree::curve::{
        ED25519_NAME, NIST256P1_NAME, SECP256K1_DECRED_NAME, SECP256K1_NAME, SECP256K1_SMART_NAME,
    };

    const SEED: [u8; 16] = hex!("000102030405060708090a0b0c0d0e0f");

    #[test]
    fn test_bip32_master() {
        let node = HdNode::from_seed(&SEED, SECP256K1_NAME).unwrap();
        assert_eq!(node.depth(), 0);
        assert_eq!(node.child_num(), 0);
        assert_eq!(
            node.private_key().unwrap(),
            &hex!("e8f32e723decf4051aefac8e2c93c9c5b214313817cdb01a1494b917c8436b35")
        );
        assert_eq!(
            node.chain_code(),
            &hex!("873dff81c02f525623fd1fe5167eac3a55a049de3d314bb42ee227ffed37d508")
        );
        assert_eq!(
            node.public_key().unwrap(),
            hex!("0339a36013301597daef41fbe593a02cc513d0b55527ec2df1050e2e8ff49c85c2")
        );
        assert_eq!(node.fingerprint().unwrap(), 0x3442193e);
    }

    #[test]
    fn test_slip10_masters() {
        let node = HdNode::from_seed(&SEED, NIST256P1_NAME).unwrap();
        assert_eq!(
            node.private_key().unwrap(),
            &hex!("612091aaa12e22dd2abef664f8a01a82cae99ad7441b7ef8110424915c268bc2")
        );
        assert_eq!(
            node.public_key().unwrap(),
            hex!("0266874dc6ade47b3ecd096745ca09bcd29638dd52c2c12117b11ed3e458cfa9e8")
        );

        let node = HdNode::from_seed(&SEED, ED25519_NAME).unwrap();
        assert_eq!(
            node.public_key().unwrap(),
            hex!("01a4b2856bfec510abab89753fac1ac0e1112364e7d250545963f135f2a33188ed")
        );
    }

    #[test]
    fn test_unknown_curve() {
        assert_eq!(
            HdNode::from_seed(&SEED, "secp256r2").unwrap_err(),
            Error::UnknownCurve
        );
    }

    #[test]
    fn test_public_key_is_lazy() {
        let mut node = HdNode::from_seed(&SEED, SECP256K1_NAME).unwrap();
        assert_eq!(node.public_key[0], 0);
        let computed = node.public_key().unwrap();
        node.fill_public_key().unwrap();
        assert_eq!(node.public_key, computed);
    }

    #[test]
    fn test_from_xpub_prefix() {
        let chain = [0u8; 32];
        let mut public = hex!("0339a36013301597daef41fbe593a02cc513d0b55527ec2df1050e2e8ff49c85c2");
        assert!(HdNode::from_xpub(0, 0, &chain, &public, SECP256K1_NAME).is_ok());
        public[0] = 0x04;
        assert_eq!(
            HdNode::from_xpub(0, 0, &chain, &public, SECP256K1_NAME).unwrap_err(),
            Error::InvalidPublicKey
        );
    }

    #[test]
    fn test_from_xprv_range() {
        let chain = [0u8; 32];
        assert_eq!(
            HdNode::from_xprv(0, 0, &chain, &[0u8; 32], SECP256K1_NAME).unwrap_err(),
            Error::InvalidPrivateKey
        );
        assert_eq!(
            HdNode::from_xprv(0, 0, &chain, &keytree::curve::NIST256P1_ORDER, NIST256P1_NAME)
                .unwrap_err(),
            Error::InvalidPrivateKey
        );
        // Edwards keys are any 32 bytes
        assert!(HdNode::from_xprv(0, 0, &chain, &[0xff; 32], ED25519_NAME).is_ok());
    }

    #[test]
    fn test_public_only_has_no_secret() {
        let node = HdNode::from_seed(&SEED, SECP256K1_NAME).unwrap();
        let public = node.to_public().unwrap();
        assert!(public.private_key().is_none());
        assert_eq!(public.public_key().unwrap(), node.public_key().unwrap());
        assert_eq!(public.fingerprint().unwrap(), node.fingerprint().unwrap());
    }

    #[test]
    fn test_hash_profiles() {
        let bitcoin = HdNode::from_seed(&SEED, SECP256K1_NAME).unwrap();
        let decred = HdNode::from_seed(&SEED, SECP256K1_DECRED_NAME).unwrap();
        let smart = HdNode::from_seed(&SEED, SECP256K1_SMART_NAME).unwrap();
        assert_eq!(bitcoin.public_key().unwrap(), decred.public_key().unwrap());
        assert_ne!(bitcoin.fingerprint().unwrap(), decred.fingerprint().unwrap());
        assert_eq!(bitcoin.fingerprint().unwrap(), smart.fingerprint().unwrap());
    }

    #[test]
    fn test_address_raw_prefix() {
        let node = HdNode::from_seed(&SEED, SECP256K1_NAME).unwrap();
        let hash = node.pubkey_hash().unwrap();

        let raw = node.address_raw(0).unwrap();
        assert_eq!(raw.len(), 21);
        assert_eq!(raw[0], 0);
        assert_eq!(&raw[1..], &hash);

        let raw = node.address_raw(0x073f).unwrap();
        assert_eq!(&raw[..2], &[0x07, 0x3f]);
        assert_eq!(raw.len(), 22);
    }

    #[test]
    fn test_ethereum_hash_requires_secp256k1() {
        let node = HdNode::from_seed(&SEED, NIST256P1_NAME).unwrap();
        assert!(matches!(
            node.ethereum_pubkey_hash(),
            Err(Error::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn test_debug_redacts() {
        let node = HdNode::from_seed(&SEED, SECP256K1_NAME).unwrap();
        let rendered = alloc::format!("{node:?}");
        assert!(rendered.contains("REDACTED"));
        assert!(!rendered.contains("e8f32e"));
    }
}
