//! Hash functions and the per-curve hash profiles built from them.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};
use sha3::{Keccak256, Sha3_256};

/// Compute SHA-256 hash
#[inline]
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Compute double SHA-256 hash (used in Bitcoin)
#[inline]
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// Compute RIPEMD-160 hash
#[inline]
pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(data).into()
}

/// Compute Hash160 (SHA-256 followed by RIPEMD-160, used in Bitcoin)
#[inline]
pub fn hash160(data: &[u8]) -> [u8; 20] {
    ripemd160(&sha256(data))
}

/// Compute Keccak-256 hash (used in Ethereum)
#[inline]
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

/// Compute FIPS-202 SHA3-256 hash
#[inline]
pub fn sha3_256(data: &[u8]) -> [u8; 32] {
    Sha3_256::digest(data).into()
}

/// Compute BLAKE-256 hash (used in Decred)
#[inline]
pub fn blake256(data: &[u8]) -> [u8; 32] {
    use blake_hash::Digest as _;

    let digest = blake_hash::Blake256::digest(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

/// Hash construction selected by a curve for one of its roles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HasherType {
    /// SHA-256
    Sha2,
    /// SHA-256 applied twice
    Sha2d,
    /// RIPEMD-160 of SHA-256
    Sha2Ripemd,
    /// SHA3-256
    Sha3,
    /// Keccak-256
    Sha3k,
    /// BLAKE-256
    Blake,
    /// BLAKE-256 applied twice
    Blaked,
    /// RIPEMD-160 of BLAKE-256
    BlakeRipemd,
}

/// Digest produced by a [`HasherType`], 20 or 32 bytes long.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct HashOutput {
    buf: [u8; 32],
    len: usize,
}

impl HashOutput {
    fn full(buf: [u8; 32]) -> Self {
        Self { buf, len: 32 }
    }

    fn short(digest: [u8; 20]) -> Self {
        let mut buf = [0u8; 32];
        buf[..20].copy_from_slice(&digest);
        Self { buf, len: 20 }
    }

    /// The digest bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// The digest as a 32-byte array, if it is that long.
    pub fn to_array32(&self) -> Option<[u8; 32]> {
        (self.len == 32).then_some(self.buf)
    }
}

impl AsRef<[u8]> for HashOutput {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl core::fmt::Debug for HashOutput {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("HashOutput").field(&self.as_bytes()).finish()
    }
}

impl HasherType {
    /// Hash `data` with this construction.
    pub fn digest(self, data: &[u8]) -> HashOutput {
        match self {
            Self::Sha2 => HashOutput::full(sha256(data)),
            Self::Sha2d => HashOutput::full(double_sha256(data)),
            Self::Sha2Ripemd => HashOutput::short(hash160(data)),
            Self::Sha3 => HashOutput::full(sha3_256(data)),
            Self::Sha3k => HashOutput::full(keccak256(data)),
            Self::Blake => HashOutput::full(blake256(data)),
            Self::Blaked => HashOutput::full(blake256(&blake256(data))),
            Self::BlakeRipemd => HashOutput::short(ripemd160(&blake256(data))),
        }
    }

    /// First four bytes of the digest, used as a base58check checksum.
    pub fn checksum(self, data: &[u8]) -> [u8; 4] {
        let digest = self.digest(data);
        let mut out = [0u8; 4];
        out.copy_from_slice(&digest.as_bytes()[..4]);
        out
    }
}
