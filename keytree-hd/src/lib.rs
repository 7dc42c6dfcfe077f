//! # keytree-hd - Multi-Curve HD Key Derivation
//!
//! Turns seeds into key trees on secp256k1 (with its Decred and Smart hash
//! profiles), NIST P-256, the Ed25519 hash variants, X25519 and Cardano
//! extended keys, and puts the resulting keys to use: extended-key strings,
//! fingerprints, signing and Diffie-Hellman.
//!
//! ## Features
//!
//! - `std` (default): Enable standard library support
//! - `nem` (default): AES-CBC payload encryption for `ed25519-keccak` nodes
//! - `rand`: Forwarded to `keytree` for random mnemonics
//!
//! ## Usage
//!
//! ```
//! use keytree::{mnemonic, DerivationPath};
//! use keytree_hd::{HdNode, VERSION_XPUB};
//!
//! let phrase = mnemonic::from_entropy(&[0u8; 16]).unwrap();
//! let seed = mnemonic::to_seed(&phrase, "").unwrap();
//!
//! let root = HdNode::from_seed(seed.as_slice(), "secp256k1").unwrap();
//! let path: DerivationPath = "m/44'/0'/0'/0/0".parse().unwrap();
//! let account = root.derive_path(&path).unwrap();
//!
//! let xpub = account.serialize_public(0, VERSION_XPUB).unwrap();
//! assert!(xpub.starts_with("xpub"));
//!
//! let signature = account.sign(b"message", None).unwrap();
//! assert!(signature.recovery_id().is_some());
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::doc_markdown,
    clippy::missing_const_for_fn,
    clippy::cast_possible_truncation,
    clippy::similar_names,
    clippy::many_single_char_names
)]
#![forbid(unsafe_code)]

extern crate alloc;

mod cardano;
mod derive;
pub mod eddsa;
mod ecdh;
#[cfg(feature = "nem")]
pub mod nem;
mod node;
pub mod serialize;
pub mod sign;
pub mod weierstrass;

pub use cardano::CARDANO_PBKDF2_ROUNDS;
pub use ecdh::CURVE25519_PUBLIC_TAG;
#[cfg(feature = "nem")]
pub use nem::NemNode;
pub use node::HdNode;
pub use serialize::{EXTENDED_KEY_LEN, VERSION_XPRV, VERSION_XPUB};
pub use sign::{CanonicalFn, Signature, MAX_SIGN_ATTEMPTS};

pub use keytree::{Error, Result};
