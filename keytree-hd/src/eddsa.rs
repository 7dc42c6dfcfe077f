//! Edwards and Montgomery key handling for the non-group curves.

use curve25519_dalek::edwards::{CompressedEdwardsY, EdwardsPoint};
use curve25519_dalek::montgomery::MontgomeryPoint;
use curve25519_dalek::scalar::Scalar;
use ed25519_dalek::hazmat::{raw_sign, ExpandedSecretKey};
use ed25519_dalek::VerifyingKey;
use keytree::{EdDigest, Error, Result};
use sha2::digest::consts::U64;
use sha2::digest::Digest;
use sha2::Sha512;
use x25519_dalek::{x25519, X25519_BASEPOINT_BYTES};
use zeroize::Zeroizing;

/// Expand a 32-byte seed with `D` into a clamped scalar and a nonce prefix.
fn expand<D: Digest<OutputSize = U64>>(private_key: &[u8; 32]) -> ExpandedSecretKey {
    let mut hash = Zeroizing::new([0u8; 64]);
    hash.copy_from_slice(&D::digest(private_key));
    ExpandedSecretKey::from_bytes(&hash)
}

fn verifying_key(public_key: &[u8; 32]) -> Result<VerifyingKey> {
    VerifyingKey::from_bytes(public_key).map_err(|_| Error::InvalidPublicKey)
}

fn public_from_expanded(expanded: &ExpandedSecretKey) -> [u8; 32] {
    EdwardsPoint::mul_base(&expanded.scalar).compress().to_bytes()
}

fn sign_expanded<D: Digest<OutputSize = U64>>(
    expanded: &ExpandedSecretKey,
    public_key: &[u8; 32],
    message: &[u8],
) -> Result<[u8; 64]> {
    let verifying = verifying_key(public_key)?;
    Ok(raw_sign::<D>(expanded, message, &verifying).to_bytes())
}

macro_rules! with_digest {
    ($digest:expr, $func:ident::<D>($($arg:expr),*)) => {
        match $digest {
            EdDigest::Sha512 => $func::<Sha512>($($arg),*),
            EdDigest::Blake2b => $func::<blake2::Blake2b512>($($arg),*),
            EdDigest::Sha3 => $func::<sha3::Sha3_512>($($arg),*),
            EdDigest::Keccak => $func::<sha3::Keccak512>($($arg),*),
        }
    };
}

/// Ed25519 public key under the given hash variant.
pub fn public_key(digest: EdDigest, private_key: &[u8; 32]) -> [u8; 32] {
    fn inner<D: Digest<OutputSize = U64>>(private_key: &[u8; 32]) -> [u8; 32] {
        public_from_expanded(&expand::<D>(private_key))
    }
    with_digest!(digest, inner::<D>(private_key))
}

/// Ed25519 signature under the given hash variant.
pub fn sign(
    digest: EdDigest,
    private_key: &[u8; 32],
    public_key: &[u8; 32],
    message: &[u8],
) -> Result<[u8; 64]> {
    fn inner<D: Digest<OutputSize = U64>>(
        private_key: &[u8; 32],
        public_key: &[u8; 32],
        message: &[u8],
    ) -> Result<[u8; 64]> {
        sign_expanded::<D>(&expand::<D>(private_key), public_key, message)
    }
    with_digest!(digest, inner::<D>(private_key, public_key, message))
}

/// Multiply an Edwards point by the variant's expanded scalar, compressed.
///
/// Used for shared secrets, where the result is hashed by the caller.
pub fn scalar_mult(digest: EdDigest, private_key: &[u8; 32], point: &[u8; 32]) -> Result<[u8; 32]> {
    fn inner<D: Digest<OutputSize = U64>>(
        private_key: &[u8; 32],
        point: &[u8; 32],
    ) -> Result<[u8; 32]> {
        let point = CompressedEdwardsY(*point)
            .decompress()
            .ok_or(Error::InvalidPublicKey)?;
        let expanded = expand::<D>(private_key);
        Ok((point * expanded.scalar).compress().to_bytes())
    }
    with_digest!(digest, inner::<D>(private_key, point))
}

fn cardano_expanded(private_key: &[u8; 32], extension: &[u8; 32]) -> ExpandedSecretKey {
    ExpandedSecretKey {
        scalar: Scalar::from_bytes_mod_order(*private_key),
        hash_prefix: *extension,
    }
}

/// Cardano public key: the already-clamped `kL` is used as the scalar.
pub fn cardano_public_key(private_key: &[u8; 32]) -> [u8; 32] {
    EdwardsPoint::mul_base(&Scalar::from_bytes_mod_order(*private_key))
        .compress()
        .to_bytes()
}

/// Extended-key signature: `kL` signs, `kR` seeds the nonce.
pub fn cardano_sign(
    private_key: &[u8; 32],
    extension: &[u8; 32],
    public_key: &[u8; 32],
    message: &[u8],
) -> Result<[u8; 64]> {
    sign_expanded::<Sha512>(&cardano_expanded(private_key, extension), public_key, message)
}

/// X25519 public key (`k · 9`).
pub fn curve25519_public_key(private_key: &[u8; 32]) -> [u8; 32] {
    x25519(*private_key, X25519_BASEPOINT_BYTES)
}

/// X25519 shared secret with a raw 32-byte peer key.
pub fn curve25519_ecdh(private_key: &[u8; 32], peer: &[u8; 32]) -> [u8; 32] {
    x25519(*private_key, *peer)
}

/// Sign with an X25519 key.
///
/// The Montgomery public key is mapped to its Edwards form with a cleared
/// sign bit, the message is signed as plain Ed25519 under that key, and the
/// sign bit is copied into the top bit of `s`.
pub fn curve25519_sign(
    private_key: &[u8; 32],
    public_key: &[u8; 32],
    message: &[u8],
) -> Result<[u8; 64]> {
    let edwards = MontgomeryPoint(*public_key)
        .to_edwards(0)
        .ok_or(Error::InvalidPublicKey)?
        .compress()
        .to_bytes();

    let mut signature = sign_expanded::<Sha512>(&expand::<Sha512>(private_key), &edwards, message)?;
    signature[63] = (signature[63] & 0x7f) | (edwards[31] & 0x80);
    Ok(signature)
}
