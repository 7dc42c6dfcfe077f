//! Registry of the curves an HD node can be built on.
//!
//! Every curve is described by a static [`CurveInfo`] entry: its name, the
//! HMAC key used to turn a seed into a root node, the algebraic family it
//! belongs to, and the hash functions it uses for checksums, signing digests,
//! public key hashes and script hashes. The table is immutable and shared.

use core::fmt;

use crate::error::{Error, Result};
use crate::hash::HasherType;

/// Name of the Bitcoin secp256k1 curve.
pub const SECP256K1_NAME: &str = "secp256k1";
/// Name of secp256k1 with Decred's BLAKE-256 hash profile.
pub const SECP256K1_DECRED_NAME: &str = "secp256k1-decred";
/// Name of secp256k1 with SmartCash's Keccak checksum.
pub const SECP256K1_SMART_NAME: &str = "secp256k1-smart";
/// Name of the NIST P-256 curve.
pub const NIST256P1_NAME: &str = "nist256p1";
/// Name of SLIP-10 Ed25519.
pub const ED25519_NAME: &str = "ed25519";
/// Name of the Cardano extended Ed25519 scheme.
pub const ED25519_CARDANO_NAME: &str = "ed25519 cardano seed";
/// Name of Ed25519 with BLAKE2b-512 (Nano).
pub const ED25519_BLAKE2B_NANO_NAME: &str = "ed25519-blake2b-nano";
/// Name of Ed25519 with SHA3-512.
pub const ED25519_SHA3_NAME: &str = "ed25519-sha3";
/// Name of Ed25519 with Keccak-512 (NEM).
pub const ED25519_KECCAK_NAME: &str = "ed25519-keccak";
/// Name of X25519.
pub const CURVE25519_NAME: &str = "curve25519";

/// secp256k1 group order, big-endian.
pub const SECP256K1_ORDER: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe,
    0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b, 0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36, 0x41, 0x41,
];

/// NIST P-256 group order, big-endian.
pub const NIST256P1_ORDER: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0x00, 0x00, 0x00, 0x00, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xbc, 0xe6, 0xfa, 0xad, 0xa7, 0x17, 0x9e, 0x84, 0xf3, 0xb9, 0xca, 0xc2, 0xfc, 0x63, 0x25, 0x51,
];

/// Hash function inside an EdDSA variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdDigest {
    /// SHA-512 (RFC 8032)
    Sha512,
    /// BLAKE2b-512
    Blake2b,
    /// SHA3-512
    Sha3,
    /// Keccak-512
    Keccak,
}

/// Algebraic family of a curve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CurveKind {
    /// secp256k1 short Weierstrass group.
    Secp256k1,
    /// NIST P-256 short Weierstrass group.
    Nist256p1,
    /// Ed25519 with the given internal hash.
    Ed25519(EdDigest),
    /// Cardano extended Ed25519 keys.
    Ed25519Cardano,
    /// Montgomery X25519.
    Curve25519,
}

impl CurveKind {
    /// Whether the curve has a prime-order group usable for ECDSA and
    /// public (non-hardened) derivation.
    pub const fn is_group(self) -> bool {
        matches!(self, Self::Secp256k1 | Self::Nist256p1)
    }
}

/// Static description of one curve.
pub struct CurveInfo {
    /// Registry name.
    pub name: &'static str,
    /// HMAC-SHA512 key used by root derivation.
    pub seed_key: &'static [u8],
    /// Algebraic family.
    pub kind: CurveKind,
    /// Checksum hash for base58check.
    pub hasher_base58: HasherType,
    /// Message digest for ECDSA signing.
    pub hasher_sign: HasherType,
    /// Public key hash for fingerprints and addresses.
    pub hasher_pubkey: HasherType,
    /// Script hash.
    pub hasher_script: HasherType,
}

impl CurveInfo {
    /// Group order, present only for ECDSA curves.
    pub const fn order(&self) -> Option<&'static [u8; 32]> {
        match self.kind {
            CurveKind::Secp256k1 => Some(&SECP256K1_ORDER),
            CurveKind::Nist256p1 => Some(&NIST256P1_ORDER),
            _ => None,
        }
    }

    /// Whether this curve is an ECDSA group curve.
    pub const fn is_group(&self) -> bool {
        self.kind.is_group()
    }

    /// Whether `scalar` (big-endian) lies in `1..order`.
    ///
    /// Always true for curves without a group order.
    pub fn is_valid_scalar(&self, scalar: &[u8; 32]) -> bool {
        match self.order() {
            Some(order) => scalar.iter().any(|b| *b != 0) && scalar < order,
            None => true,
        }
    }
}

impl fmt::Debug for CurveInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurveInfo")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

impl PartialEq for CurveInfo {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for CurveInfo {}

const fn bitcoin_like(
    name: &'static str,
    seed_key: &'static [u8],
    kind: CurveKind,
) -> CurveInfo {
    CurveInfo {
        name,
        seed_key,
        kind,
        hasher_base58: HasherType::Sha2d,
        hasher_sign: HasherType::Sha2d,
        hasher_pubkey: HasherType::Sha2Ripemd,
        hasher_script: HasherType::Sha2,
    }
}

/// All known curves.
pub static CURVES: [CurveInfo; 10] = [
    bitcoin_like(SECP256K1_NAME, b"Bitcoin seed", CurveKind::Secp256k1),
    CurveInfo {
        name: SECP256K1_DECRED_NAME,
        seed_key: b"Bitcoin seed",
        kind: CurveKind::Secp256k1,
        hasher_base58: HasherType::Blaked,
        hasher_sign: HasherType::Blake,
        hasher_pubkey: HasherType::BlakeRipemd,
        hasher_script: HasherType::Blake,
    },
    CurveInfo {
        name: SECP256K1_SMART_NAME,
        seed_key: b"Bitcoin seed",
        kind: CurveKind::Secp256k1,
        hasher_base58: HasherType::Sha3k,
        hasher_sign: HasherType::Sha2d,
        hasher_pubkey: HasherType::Sha2Ripemd,
        hasher_script: HasherType::Sha2,
    },
    bitcoin_like(NIST256P1_NAME, b"Nist256p1 seed", CurveKind::Nist256p1),
    bitcoin_like(ED25519_NAME, b"ed25519 seed", CurveKind::Ed25519(EdDigest::Sha512)),
    bitcoin_like(
        ED25519_CARDANO_NAME,
        b"ed25519 cardano seed",
        CurveKind::Ed25519Cardano,
    ),
    bitcoin_like(
        ED25519_BLAKE2B_NANO_NAME,
        b"ed25519 seed",
        CurveKind::Ed25519(EdDigest::Blake2b),
    ),
    bitcoin_like(
        ED25519_SHA3_NAME,
        b"ed25519-sha3 seed",
        CurveKind::Ed25519(EdDigest::Sha3),
    ),
    bitcoin_like(
        ED25519_KECCAK_NAME,
        b"ed25519-keccak seed",
        CurveKind::Ed25519(EdDigest::Keccak),
    ),
    bitcoin_like(CURVE25519_NAME, b"curve25519 seed", CurveKind::Curve25519),
];

/// Look up a curve by name.
pub fn lookup(name: &str) -> Result<&'static CurveInfo> {
    CURVES
        .iter()
        .find(|curve| curve.name == name)
        .ok_or(Error::UnknownCurve)
}
