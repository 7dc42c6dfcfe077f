//! # keytree - Multi-Curve HD Key Tree Core
//!
//! Curve registry, hash profiles, Base58Check, derivation paths and BIP-39
//! mnemonics shared by the `keytree-hd` derivation engine.
//!
//! ## Features
//!
//! - `std` (default): Enable standard library support
//! - `rand`: Generate mnemonics from the operating system's random source
//!
//! ## Usage
//!
//! ```
//! use keytree::{curve, mnemonic};
//!
//! let phrase = mnemonic::from_entropy(&[0u8; 16]).unwrap();
//! assert!(mnemonic::check(&phrase));
//!
//! let seed = mnemonic::to_seed(&phrase, "TREZOR").unwrap();
//! assert_eq!(seed.len(), 64);
//!
//! let secp = curve::lookup("secp256k1").unwrap();
//! assert!(secp.is_group());
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
    clippy::unreadable_literal,
    clippy::similar_names,
    clippy::many_single_char_names
)]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod curve;
pub mod encoding;
pub mod error;
pub mod hash;
pub mod hdpath;
pub mod mnemonic;
pub mod types;
pub mod wordlist;

pub use curve::{lookup, CurveInfo, CurveKind, EdDigest};
pub use error::{Error, Result};
pub use hash::HasherType;
pub use hdpath::{ChildIndex, DerivationPath, HARDENED_OFFSET};
pub use types::{Secret32, SecretBytes};
pub use wordlist::{English, Wordlist};

// Re-export rand_core for consistent RNG trait versions
pub use rand_core;
