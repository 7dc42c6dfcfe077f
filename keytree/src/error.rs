//! Error types shared by the keytree crates.

use core::fmt;

/// Errors that can occur during mnemonic, derivation, and key-use operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Curve name is not present in the registry.
    UnknownCurve,
    /// Entropy length or mnemonic strength is not one of the BIP-39 sizes.
    InvalidEntropyLength,
    /// Mnemonic word count is not 12, 15, 18, 21, or 24.
    InvalidWordCount(usize),
    /// A mnemonic token is not in the wordlist.
    WordNotInList {
        /// Zero-based position of the offending token.
        position: usize,
    },
    /// Mnemonic checksum bits do not match the entropy.
    ChecksumMismatch,
    /// The requested derivation step is not possible for this node.
    InvalidDerivationStep(&'static str),
    /// Derivation would exceed the maximum depth of 255.
    MaxDepthExceeded,
    /// Derivation path string could not be parsed.
    InvalidDerivationPath,
    /// Extended key has the wrong length or a bad checksum.
    LengthOrChecksum,
    /// Extended key version matches neither supplied version.
    UnknownVersion(u32),
    /// Extended private key payload is malformed.
    CorruptData,
    /// Operation is not available on this curve.
    UnsupportedOperation(&'static str),
    /// Signature generation failed.
    SigningFailure,
    /// Public key bytes do not encode a valid point.
    InvalidPublicKey,
    /// Private key bytes are out of range for the curve.
    InvalidPrivateKey,
    /// Input has an unexpected length.
    InvalidLength {
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },
    /// The random source failed to produce bytes.
    EntropySource,
    /// Underlying primitive rejected its input.
    CryptoError,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCurve => write!(f, "unknown curve"),
            Self::InvalidEntropyLength => write!(f, "invalid entropy length"),
            Self::InvalidWordCount(n) => {
                write!(f, "invalid word count {n}, must be 12, 15, 18, 21, or 24")
            }
            Self::WordNotInList { position } => {
                write!(f, "mnemonic word at position {position} is not in the wordlist")
            }
            Self::ChecksumMismatch => write!(f, "mnemonic checksum mismatch"),
            Self::InvalidDerivationStep(reason) => write!(f, "invalid derivation step: {reason}"),
            Self::MaxDepthExceeded => write!(f, "maximum derivation depth exceeded"),
            Self::InvalidDerivationPath => write!(f, "invalid derivation path"),
            Self::LengthOrChecksum => write!(f, "extended key has invalid length or checksum"),
            Self::UnknownVersion(v) => write!(f, "unknown extended key version 0x{v:08x}"),
            Self::CorruptData => write!(f, "corrupt extended key data"),
            Self::UnsupportedOperation(op) => write!(f, "unsupported operation: {op}"),
            Self::SigningFailure => write!(f, "signing failed"),
            Self::InvalidPublicKey => write!(f, "invalid public key"),
            Self::InvalidPrivateKey => write!(f, "invalid private key"),
            Self::InvalidLength { expected, actual } => {
                write!(f, "invalid length: expected {expected}, got {actual}")
            }
            Self::EntropySource => write!(f, "random source failure"),
            Self::CryptoError => write!(f, "cryptographic primitive error"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// A convenient Result type alias for keytree operations.
pub type Result<T> = core::result::Result<T, Error>;
