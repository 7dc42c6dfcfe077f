//! BIP-32 / SLIP-10 child key derivation.

use keytree::{CurveKind, Error, Result, Secret32};
use zeroize::Zeroizing;

use crate::node::{halves, hmac_sha512, is_hardened, HdNode};
use crate::weierstrass;

impl HdNode {
    /// Replace this node with its private child at `index`.
    ///
    /// Hardened indices hash the private key, normal indices the compressed
    /// public key (ECDSA curves only). On the ECDSA curves the child key is
    /// `IL + parent mod n`, re-derived from `0x01 ‖ IR ‖ index` while that is
    /// out of range; other curves take `IL` as is. Cardano nodes use the
    /// Cardano scheme.
    pub fn private_ckd(&mut self, index: u32) -> Result<()> {
        if self.curve.kind == CurveKind::Ed25519Cardano {
            return self.private_ckd_cardano(index);
        }
        if !self.has_private_key() {
            return Err(Error::InvalidDerivationStep(
                "private derivation needs a private key",
            ));
        }
        let depth = self.next_depth()?;
        tracing::trace!(curve = self.curve.name, depth, index, "private child derivation");

        let mut data = Zeroizing::new([0u8; 37]);
        if is_hardened(index) {
            data[1..33].copy_from_slice(self.private_key.as_bytes());
        } else if self.curve.is_group() {
            data[..33].copy_from_slice(&self.public_key()?);
        } else {
            return Err(Error::InvalidDerivationStep(
                "non-hardened derivation needs an ECDSA curve",
            ));
        }
        data[33..].copy_from_slice(&index.to_be_bytes());

        let mut output =
            Zeroizing::new(hmac_sha512(self.chain_code.as_bytes(), &[data.as_slice()])?);

        let (key, chain_code) = if self.curve.is_group() {
            loop {
                let (tweak, right) = halves(&output);
                let sum = weierstrass::tweak_add(
                    self.curve.kind,
                    tweak.as_bytes(),
                    self.private_key.as_bytes(),
                )?;
                if let Some(child) = sum {
                    break (Secret32::new(child), right);
                }

                tracing::debug!(
                    curve = self.curve.name,
                    index,
                    "child key out of range, retrying"
                );
                data[0] = 0x01;
                data[1..33].copy_from_slice(right.as_bytes());
                *output = hmac_sha512(self.chain_code.as_bytes(), &[data.as_slice()])?;
            }
        } else {
            halves(&output)
        };

        self.private_key = key;
        self.chain_code = chain_code;
        self.depth = depth;
        self.child_num = index;
        self.public_key = [0u8; 33];
        Ok(())
    }

    /// Replace this node with its public child at a non-hardened `index`.
    ///
    /// The child point is `IL·G + parent`, re-derived from
    /// `0x01 ‖ IR ‖ index` while `IL` is out of range or the sum is the
    /// point at infinity. Any private key is dropped.
    pub fn public_ckd(&mut self, index: u32) -> Result<()> {
        if is_hardened(index) {
            return Err(Error::InvalidDerivationStep(
                "hardened derivation needs a private key",
            ));
        }
        if !self.curve.is_group() {
            return Err(Error::InvalidDerivationStep(
                "public derivation needs an ECDSA curve",
            ));
        }
        let depth = self.next_depth()?;
        tracing::trace!(curve = self.curve.name, depth, index, "public child derivation");

        let parent = self.public_key()?;
        let mut data = [0u8; 37];
        data[..33].copy_from_slice(&parent);
        data[33..].copy_from_slice(&index.to_be_bytes());

        let mut output =
            Zeroizing::new(hmac_sha512(self.chain_code.as_bytes(), &[data.as_slice()])?);
        let (public_key, chain_code) = loop {
            let (tweak, right) = halves(&output);
            if let Some(child) =
                weierstrass::tweak_add_public(self.curve.kind, tweak.as_bytes(), &parent)?
            {
                break (child, right);
            }

            tracing::debug!(curve = self.curve.name, index, "child point rejected, retrying");
            data[0] = 0x01;
            data[1..33].copy_from_slice(right.as_bytes());
            *output = hmac_sha512(self.chain_code.as_bytes(), &[data.as_slice()])?;
        };

        self.private_key = Secret32::zero();
        self.private_key_extension = Secret32::zero();
        self.public_key = public_key;
        self.chain_code = chain_code;
        self.depth = depth;
        self.child_num = index;
        Ok(())
    }
}
