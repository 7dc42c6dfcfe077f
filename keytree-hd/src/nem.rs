//! NEM message encryption for `ed25519-keccak` nodes.
//!
//! A shared AES-256 key is derived from the node's private key, the peer's
//! Ed25519 public key and a 32-byte salt; payloads are AES-CBC encrypted
//! with PKCS#7 padding.

use alloc::vec::Vec;

use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::{Aes256Dec, Aes256Enc, Block as AesBlock};
use keytree::curve::ED25519_KECCAK_NAME;
use keytree::{hash, EdDigest, Error, Result, Secret32};
use zeroize::Zeroizing;

use crate::eddsa;
use crate::node::HdNode;

/// AES block size.
pub const BLOCK_SIZE: usize = 16;

/// An `ed25519-keccak` node viewed as a NEM encryption endpoint.
#[derive(Debug, Clone, Copy)]
pub struct NemNode<'a> {
    node: &'a HdNode,
}

impl<'a> TryFrom<&'a HdNode> for NemNode<'a> {
    type Error = Error;

    fn try_from(node: &'a HdNode) -> Result<Self> {
        if node.curve().name != ED25519_KECCAK_NAME {
            return Err(Error::UnsupportedOperation(
                "NEM encryption needs an ed25519-keccak node",
            ));
        }
        Ok(Self { node })
    }
}

fn xor_into(block: &mut [u8; BLOCK_SIZE], other: &[u8]) {
    for (a, b) in block.iter_mut().zip(other) {
        *a ^= b;
    }
}

impl NemNode<'_> {
    /// The wrapped node.
    pub fn node(&self) -> &HdNode {
        self.node
    }

    /// `Keccak-256((a · peer) XOR salt)` where `a` is the Keccak-expanded
    /// private scalar.
    pub fn shared_key(&self, peer: &[u8; 32], salt: &[u8; 32]) -> Result<Secret32> {
        let secret = self.node.secret()?;
        let mut mixed = Zeroizing::new(eddsa::scalar_mult(EdDigest::Keccak, secret, peer)?);
        for (byte, mask) in mixed.iter_mut().zip(salt) {
            *byte ^= mask;
        }
        Ok(Secret32::new(hash::keccak256(mixed.as_slice())))
    }

    /// AES-256-CBC encrypt `payload`.
    ///
    /// The final block is padded PKCS#7 style, so the output is always one
    /// block longer than the payload rounded down to the block size.
    pub fn encrypt(
        &self,
        peer: &[u8; 32],
        iv: &[u8; BLOCK_SIZE],
        salt: &[u8; 32],
        payload: &[u8],
    ) -> Result<Vec<u8>> {
        let key = self.shared_key(peer, salt)?;
        let cipher = Aes256Enc::new(key.as_bytes().into());

        let body = payload.len() - payload.len() % BLOCK_SIZE;
        let remainder = &payload[body..];
        let mut last = Zeroizing::new([(BLOCK_SIZE - remainder.len()) as u8; BLOCK_SIZE]);
        last[..remainder.len()].copy_from_slice(remainder);

        let mut previous = *iv;
        let mut out = Vec::with_capacity(body + BLOCK_SIZE);
        let blocks = payload[..body]
            .chunks_exact(BLOCK_SIZE)
            .chain(core::iter::once(last.as_slice()));
        for chunk in blocks {
            xor_into(&mut previous, chunk);
            let mut block = AesBlock::from(previous);
            cipher.encrypt_block(&mut block);
            previous.copy_from_slice(&block);
            out.extend_from_slice(&block);
        }
        Ok(out)
    }

    /// AES-256-CBC decrypt `payload`.
    ///
    /// The padding is left in place. `payload` must be a whole number of
    /// blocks.
    pub fn decrypt(
        &self,
        peer: &[u8; 32],
        iv: &[u8; BLOCK_SIZE],
        salt: &[u8; 32],
        payload: &[u8],
    ) -> Result<Zeroizing<Vec<u8>>> {
        if payload.len() % BLOCK_SIZE != 0 {
            return Err(Error::InvalidLength {
                expected: payload.len() - payload.len() % BLOCK_SIZE + BLOCK_SIZE,
                actual: payload.len(),
            });
        }

        let key = self.shared_key(peer, salt)?;
        let cipher = Aes256Dec::new(key.as_bytes().into());

        let mut previous: &[u8] = iv;
        let mut out = Zeroizing::new(Vec::with_capacity(payload.len()));
        for chunk in payload.chunks_exact(BLOCK_SIZE) {
            let mut block = AesBlock::clone_from_slice(chunk);
            cipher.decrypt_block(&mut block);
            let mut plain = [0u8; BLOCK_SIZE];
            plain.copy_from_slice(&block);
            xor_into(&mut plain, previous);
            out.extend_from_slice(&plain);
            previous = chunk;
        }
        Ok(out)
    }
}
