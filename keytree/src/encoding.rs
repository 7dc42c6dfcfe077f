//! Base58Check encoding with a selectable checksum hash.

use alloc::string::String;
use alloc::vec::Vec;

use zeroize::Zeroizing;

use crate::error::{Error, Result};
use crate::hash::HasherType;

/// Encode bytes to Base58Check, appending the first four bytes of
/// `hasher(data)` as the checksum.
pub fn base58check_encode(data: &[u8], hasher: HasherType) -> String {
    let mut buf = Zeroizing::new(Vec::with_capacity(data.len() + 4));
    buf.extend_from_slice(data);
    buf.extend_from_slice(&hasher.checksum(data));

    bs58::encode(buf.as_slice()).into_string()
}

/// Decode a Base58Check string, verifying the checksum with `hasher`.
///
/// Returns the payload without the checksum.
pub fn base58check_decode(encoded: &str, hasher: HasherType) -> Result<Zeroizing<Vec<u8>>> {
    let data = Zeroizing::new(
        bs58::decode(encoded)
            .into_vec()
            .map_err(|_| Error::LengthOrChecksum)?,
    );

    if data.len() < 5 {
        return Err(Error::InvalidLength {
            expected: 5,
            actual: data.len(),
        });
    }

    let (payload, checksum) = data.split_at(data.len() - 4);
    if checksum != hasher.checksum(payload) {
        return Err(Error::LengthOrChecksum);
    }

    Ok(Zeroizing::new(payload.to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_base58check_encode_p2pkh_mainnet() {
        let data = hex!("0062e907b15cbf27d5425399ebf6f0fb50ebb88f18");
        let encoded = base58check_encode(&data, HasherType::Sha2d);
        assert_eq!(encoded, "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa");
    }

    #[test]
    fn test_base58check_encode_wif_compressed() {
        let data = hex!("800c28fca386c7a227600b2fe50b7cae11ec86d3bf1fbe471be89827e19d72aa1d01");
        let encoded = base58check_encode(&data, HasherType::Sha2d);
        assert_eq!(encoded, "KwdMAjGmerYanjeui5SHS7JkmpZvVipYvB2LJGU1ZxJwYvP98617");
    }

    #[test]
    fn test_base58check_decode_p2pkh_testnet() {
        let payload =
            base58check_decode("mpXwg4jMtRhuSpVq4xS3HFHmCmWp9NyGKt", HasherType::Sha2d).unwrap();
        assert_eq!(
            payload.as_slice(),
            hex!("6f62e907b15cbf27d5425399ebf6f0fb50ebb88f18")
        );
    }

    #[test]
    fn test_base58check_decode_invalid_checksum() {
        let result = base58check_decode("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNb", HasherType::Sha2d);
        assert_eq!(result.unwrap_err(), Error::LengthOrChecksum);
    }

    #[test]
    fn test_base58check_decode_wrong_hasher() {
        let result = base58check_decode("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa", HasherType::Blaked);
        assert!(result.is_err());
    }

    #[test]
    fn test_base58check_decode_too_short() {
        assert!(base58check_decode("1234", HasherType::Sha2d).is_err());
    }

    #[test]
    fn test_base58check_decode_invalid_base58() {
        assert_eq!(
            base58check_decode("0OIl", HasherType::Sha2d).unwrap_err(),
            Error::LengthOrChecksum
        );
    }

    #[test]
    fn test_base58check_roundtrip_each_hasher() {
        let data = hex!("0488b21e000000000000000000");
        for hasher in [
            HasherType::Sha2d,
            HasherType::Blaked,
            HasherType::Sha3k,
            HasherType::Sha2,
        ] {
            let encoded = base58check_encode(&data, hasher);
            let decoded = base58check_decode(&encoded, hasher).unwrap();
            assert_eq!(decoded.as_slice(), data);
        }
    }
}
