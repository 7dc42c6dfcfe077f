//! Base58Check extended-key strings.
//!
//! Layout (78 bytes before the checksum):
//! `version(4) ‖ depth(1) ‖ parent fingerprint(4) ‖ child number(4) ‖
//! chain code(32) ‖ key(33)`, integers big-endian. The key slot holds the
//! 33-byte public key or `0x00 ‖ private key`.

use alloc::string::String;

use keytree::encoding::{base58check_decode, base58check_encode};
use keytree::{lookup, Error, Result, Secret32};
use zeroize::Zeroizing;

use crate::node::HdNode;

/// Length of a decoded extended key, checksum excluded.
pub const EXTENDED_KEY_LEN: usize = 78;

/// Bitcoin mainnet `xpub` version.
pub const VERSION_XPUB: u32 = 0x0488_b21e;

/// Bitcoin mainnet `xprv` version.
pub const VERSION_XPRV: u32 = 0x0488_ade4;

fn read_be(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .take(4)
        .fold(0u32, |acc, b| (acc << 8) | u32::from(*b))
}

impl HdNode {
    fn serialize_with(&self, parent_fingerprint: u32, version: u32, key: &[u8; 33]) -> String {
        let mut data = Zeroizing::new([0u8; EXTENDED_KEY_LEN]);
        data[..4].copy_from_slice(&version.to_be_bytes());
        data[4] = self.depth;
        data[5..9].copy_from_slice(&parent_fingerprint.to_be_bytes());
        data[9..13].copy_from_slice(&self.child_num.to_be_bytes());
        data[13..45].copy_from_slice(self.chain_code.as_bytes());
        data[45..].copy_from_slice(key);
        base58check_encode(data.as_slice(), self.curve.hasher_base58)
    }

    /// Extended public key string.
    pub fn serialize_public(&self, parent_fingerprint: u32, version: u32) -> Result<String> {
        let public = self.public_key()?;
        Ok(self.serialize_with(parent_fingerprint, version, &public))
    }

    /// Extended private key string.
    pub fn serialize_private(&self, parent_fingerprint: u32, version: u32) -> Result<String> {
        let mut key = Zeroizing::new([0u8; 33]);
        key[1..].copy_from_slice(self.secret()?);
        Ok(self.serialize_with(parent_fingerprint, version, &key))
    }

    /// Parse an extended key string.
    ///
    /// The version decides whether the key slot is read as a public or a
    /// private key. Returns the node and the parent fingerprint.
    pub fn deserialize(
        text: &str,
        version_public: u32,
        version_private: u32,
        curve_name: &str,
    ) -> Result<(Self, u32)> {
        let curve = lookup(curve_name)?;
        let data = base58check_decode(text, curve.hasher_base58).map_err(|err| match err {
            Error::InvalidLength { .. } => Error::LengthOrChecksum,
            other => other,
        })?;
        if data.len() != EXTENDED_KEY_LEN {
            return Err(Error::LengthOrChecksum);
        }

        let version = read_be(&data[..4]);
        let mut node = Self::empty(curve);
        if version == version_public {
            if data[45] == 0 {
                return Err(Error::CorruptData);
            }
            node.public_key.copy_from_slice(&data[45..]);
        } else if version == version_private {
            if data[45] != 0 {
                return Err(Error::CorruptData);
            }
            node.private_key = Secret32::from_slice(&data[46..]).ok_or(Error::CorruptData)?;
        } else {
            return Err(Error::UnknownVersion(version));
        }

        node.depth = data[4];
        node.child_num = read_be(&data[9..13]);
        node.chain_code.as_bytes_mut().copy_from_slice(&data[13..45]);
        Ok((node, read_be(&data[5..9])))
    }
}
