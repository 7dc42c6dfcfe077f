//! Scalar and point arithmetic on the two short-Weierstrass curves.
//!
//! Both curves expose the same set of functions, generated once per backend
//! crate. Callers in the node code go through the [`CurveKind`] dispatchers at
//! the bottom of this file.

use keytree::{CurveKind, Error, Result};

use crate::sign::CanonicalFn;

macro_rules! weierstrass_curve {
    ($module:ident, $backend:ident, $curve:ident, $name:literal) => {
        #[doc = concat!("Operations on ", $name, ".")]
        pub mod $module {
            use ecdsa::hazmat::SignPrimitive;
            use ecdsa::RecoveryId;
            use keytree::{Error, Result};
            use rfc6979::HmacDrbg;
            use sha2::Sha256;
            use zeroize::Zeroizing;
            use $backend::elliptic_curve::ff::{Field, PrimeField};
            use $backend::elliptic_curve::group::{Curve as _, Group};
            use $backend::elliptic_curve::ops::Reduce;
            use $backend::elliptic_curve::sec1::ToEncodedPoint;
            use $backend::{$curve, FieldBytes, ProjectivePoint, PublicKey, Scalar, U256};

            use crate::sign::{CanonicalFn, MAX_SIGN_ATTEMPTS};

            /// Parse a big-endian scalar; `None` when it is not below the order.
            fn scalar(bytes: &[u8; 32]) -> Option<Scalar> {
                Option::from(Scalar::from_repr(FieldBytes::from(*bytes)))
            }

            fn secret_scalar(bytes: &[u8; 32]) -> Result<Scalar> {
                scalar(bytes)
                    .filter(|s| !bool::from(s.is_zero()))
                    .ok_or(Error::InvalidPrivateKey)
            }

            fn parse_point(bytes: &[u8]) -> Result<ProjectivePoint> {
                PublicKey::from_sec1_bytes(bytes)
                    .map(|key| key.to_projective())
                    .map_err(|_| Error::InvalidPublicKey)
            }

            fn compress(point: &ProjectivePoint) -> Result<[u8; 33]> {
                let encoded = point.to_affine().to_encoded_point(true);
                encoded
                    .as_bytes()
                    .try_into()
                    .map_err(|_| Error::InvalidPublicKey)
            }

            fn uncompress(point: &ProjectivePoint) -> Result<[u8; 65]> {
                let encoded = point.to_affine().to_encoded_point(false);
                encoded
                    .as_bytes()
                    .try_into()
                    .map_err(|_| Error::InvalidPublicKey)
            }

            /// Compressed public key of a private scalar.
            pub fn public_key(private_key: &[u8; 32]) -> Result<[u8; 33]> {
                let secret = secret_scalar(private_key)?;
                compress(&(ProjectivePoint::GENERATOR * secret))
            }

            /// Re-encode a SEC1 public key (33 or 65 bytes) in uncompressed form.
            pub fn uncompressed(public_key: &[u8]) -> Result<[u8; 65]> {
                uncompress(&parse_point(public_key)?)
            }

            /// `(tweak + private_key) mod n`.
            ///
            /// `Ok(None)` when the tweak is not below the order or the sum is
            /// zero; derivation retries in that case.
            pub fn tweak_add(tweak: &[u8; 32], private_key: &[u8; 32]) -> Result<Option<[u8; 32]>> {
                let parent = secret_scalar(private_key)?;
                let Some(tweak) = scalar(tweak) else {
                    return Ok(None);
                };
                let child = tweak + parent;
                if bool::from(child.is_zero()) {
                    return Ok(None);
                }
                let mut out = [0u8; 32];
                out.copy_from_slice(&child.to_repr());
                Ok(Some(out))
            }

            /// `tweak·G + public_key`, compressed.
            ///
            /// `Ok(None)` when the tweak is not below the order or the sum is
            /// the point at infinity.
            pub fn tweak_add_public(
                tweak: &[u8; 32],
                public_key: &[u8; 33],
            ) -> Result<Option<[u8; 33]>> {
                let parent = parse_point(public_key)?;
                let Some(tweak) = scalar(tweak) else {
                    return Ok(None);
                };
                let child = ProjectivePoint::GENERATOR * tweak + parent;
                if bool::from(child.is_identity()) {
                    return Ok(None);
                }
                compress(&child).map(Some)
            }

            /// Uncompressed `private_key · peer`.
            pub fn ecdh(private_key: &[u8; 32], peer: &[u8]) -> Result<[u8; 65]> {
                let secret = secret_scalar(private_key)?;
                let shared = parse_point(peer)? * secret;
                if bool::from(shared.is_identity()) {
                    return Err(Error::InvalidPublicKey);
                }
                uncompress(&shared)
            }

            /// Deterministic ECDSA over a 32-byte digest.
            ///
            /// Returns the low-S `r ‖ s` signature and its recovery id. Nonces
            /// come from one RFC 6979 HMAC-DRBG seeded with the key and the
            /// reduced digest; a rejected signature is re-signed with the next
            /// nonce that generator yields.
            pub fn sign_digest(
                private_key: &[u8; 32],
                digest: &[u8; 32],
                canonical: Option<&CanonicalFn<'_>>,
            ) -> Result<([u8; 64], u8)> {
                let secret = secret_scalar(private_key)?;
                let z = FieldBytes::from(*digest);
                let reduced = <Scalar as Reduce<U256>>::reduce_bytes(&z).to_repr();
                let mut drbg = HmacDrbg::<Sha256>::new(private_key, &reduced, &[]);

                for attempt in 0..MAX_SIGN_ATTEMPTS {
                    let mut k = Zeroizing::new([0u8; 32]);
                    drbg.fill_bytes(k.as_mut_slice());
                    let nonce = scalar(&k).filter(|candidate| !bool::from(candidate.is_zero()));
                    let Some(nonce) = nonce else {
                        continue;
                    };

                    let Ok((signature, recovery_id)) =
                        <Scalar as SignPrimitive<$curve>>::try_sign_prehashed(&secret, nonce, &z)
                    else {
                        continue;
                    };

                    let mut recovery = recovery_id.map_or(0, RecoveryId::to_byte);
                    let signature = match signature.normalize_s() {
                        Some(low) => {
                            recovery ^= 1;
                            low
                        }
                        None => signature,
                    };

                    let mut bytes = [0u8; 64];
                    bytes.copy_from_slice(&signature.to_bytes());
                    if canonical.map_or(true, |accept| accept(recovery, &bytes)) {
                        return Ok((bytes, recovery));
                    }
                    tracing::debug!(curve = $name, attempt, "signature not canonical, retrying");
                }

                Err(Error::SigningFailure)
            }
        }
    };
}

weierstrass_curve!(secp256k1, k256, Secp256k1, "secp256k1");
weierstrass_curve!(nist256p1, p256, NistP256, "nist256p1");

const NOT_WEIERSTRASS: Error = Error::UnsupportedOperation("operation requires an ECDSA curve");

macro_rules! dispatch {
    ($kind:expr, $func:ident($($arg:expr),*)) => {
        match $kind {
            CurveKind::Secp256k1 => secp256k1::$func($($arg),*),
            CurveKind::Nist256p1 => nist256p1::$func($($arg),*),
            _ => Err(NOT_WEIERSTRASS),
        }
    };
}

pub(crate) fn public_key(kind: CurveKind, private_key: &[u8; 32]) -> Result<[u8; 33]> {
    dispatch!(kind, public_key(private_key))
}

pub(crate) fn uncompressed(kind: CurveKind, public_key: &[u8]) -> Result<[u8; 65]> {
    dispatch!(kind, uncompressed(public_key))
}

pub(crate) fn tweak_add(
    kind: CurveKind,
    tweak: &[u8; 32],
    private_key: &[u8; 32],
) -> Result<Option<[u8; 32]>> {
    dispatch!(kind, tweak_add(tweak, private_key))
}

pub(crate) fn tweak_add_public(
    kind: CurveKind,
    tweak: &[u8; 32],
    public_key: &[u8; 33],
) -> Result<Option<[u8; 33]>> {
    dispatch!(kind, tweak_add_public(tweak, public_key))
}

pub(crate) fn ecdh(kind: CurveKind, private_key: &[u8; 32], peer: &[u8]) -> Result<[u8; 65]> {
    dispatch!(kind, ecdh(private_key, peer))
}

pub(crate) fn sign_digest(
    kind: CurveKind,
    private_key: &[u8; 32],
    digest: &[u8; 32],
    canonical: Option<&CanonicalFn<'_>>,
) -> Result<([u8; 64], u8)> {
    dispatch!(kind, sign_digest(private_key, digest, canonical))
}
