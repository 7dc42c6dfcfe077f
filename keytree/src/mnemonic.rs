//! BIP-39 mnemonic sentences and seed stretching.
//!
//! Mnemonics are handled as plain space-separated strings. Every buffer that
//! holds words, entropy or seed bytes is returned inside [`Zeroizing`] so it
//! is wiped when dropped.
//!
//! The plain functions use the [`English`] list; the `*_in` variants accept
//! any [`Wordlist`].

use alloc::string::String;
use alloc::vec::Vec;

use hmac::{Hmac, Mac};
use rand_core::{CryptoRng, RngCore};
use sha2::{Digest, Sha256, Sha512};
use zeroize::Zeroizing;

use crate::error::{Error, Result};
use crate::wordlist::{English, Wordlist};

type HmacSha512 = Hmac<Sha512>;

/// Number of PBKDF2 rounds for seed derivation.
pub const PBKDF2_ROUNDS: u32 = 2048;

/// Passphrases longer than this many bytes are truncated.
pub const MAX_PASSPHRASE_LEN: usize = 256;

/// Length of a BIP-39 seed in bytes.
pub const SEED_LEN: usize = 64;

const PROGRESS_INTERVAL: u32 = 128;

/// Longest token accepted when parsing a mnemonic.
const MAX_TOKEN_LEN: usize = 9;

/// Packed entropy and checksum bits of the longest (24-word) mnemonic.
const MAX_PACKED_LEN: usize = 33;

fn word_count_is_valid(count: usize) -> bool {
    matches!(count, 12 | 15 | 18 | 21 | 24)
}

fn read_index(bits: &[u8], word: usize) -> usize {
    let mut index = 0usize;
    for k in 0..11 {
        let bit = word * 11 + k;
        index = (index << 1) | usize::from((bits[bit / 8] >> (7 - bit % 8)) & 1);
    }
    index
}

/// Generate a mnemonic of `strength` bits (128, 160, 192, 224 or 256).
pub fn generate<R: RngCore + CryptoRng>(rng: &mut R, strength: usize) -> Result<Zeroizing<String>> {
    generate_in::<English, R>(rng, strength)
}

/// Generate a mnemonic with the given wordlist.
pub fn generate_in<W: Wordlist, R: RngCore + CryptoRng>(
    rng: &mut R,
    strength: usize,
) -> Result<Zeroizing<String>> {
    if strength % 32 != 0 || !(128..=256).contains(&strength) {
        return Err(Error::InvalidEntropyLength);
    }

    let mut entropy = Zeroizing::new([0u8; 32]);
    let len = strength / 8;
    rng.try_fill_bytes(&mut entropy[..len])
        .map_err(|_| Error::EntropySource)?;

    from_entropy_in::<W>(&entropy[..len])
}

/// Generate a mnemonic using the operating system's random source.
#[cfg(feature = "rand")]
pub fn generate_random(strength: usize) -> Result<Zeroizing<String>> {
    generate(&mut rand_core::OsRng, strength)
}

/// Encode entropy (16 to 32 bytes, a multiple of 4) as a mnemonic.
pub fn from_entropy(data: &[u8]) -> Result<Zeroizing<String>> {
    from_entropy_in::<English>(data)
}

/// Encode entropy as a mnemonic with the given wordlist.
pub fn from_entropy_in<W: Wordlist>(data: &[u8]) -> Result<Zeroizing<String>> {
    let len = data.len();
    if len % 4 != 0 || !(16..=32).contains(&len) {
        return Err(Error::InvalidEntropyLength);
    }

    let mut bits = Zeroizing::new([0u8; MAX_PACKED_LEN]);
    bits[..len].copy_from_slice(data);
    bits[len] = Sha256::digest(data)[0];

    let words = len * 3 / 4;
    let mut mnemonic = Zeroizing::new(String::with_capacity(words * 9));
    for i in 0..words {
        if i > 0 {
            mnemonic.push(' ');
        }
        let word = W::get_word(read_index(bits.as_slice(), i)).ok_or(Error::CryptoError)?;
        mnemonic.push_str(word);
    }

    Ok(mnemonic)
}

/// Packed entropy+checksum bits and the number of words they came from.
fn unpack<W: Wordlist>(mnemonic: &str) -> Result<(Zeroizing<[u8; MAX_PACKED_LEN]>, usize)> {
    let count = mnemonic.split(' ').count();
    if !word_count_is_valid(count) {
        return Err(Error::InvalidWordCount(count));
    }

    let mut bits = Zeroizing::new([0u8; MAX_PACKED_LEN]);
    for (position, token) in mnemonic.split(' ').enumerate() {
        let index = if token.len() > MAX_TOKEN_LEN {
            None
        } else {
            W::get_index(token)
        }
        .ok_or(Error::WordNotInList { position })?;

        for k in 0..11 {
            if index & (1 << (10 - k)) != 0 {
                let bit = position * 11 + k;
                bits[bit / 8] |= 1 << (7 - bit % 8);
            }
        }
    }

    Ok((bits, count))
}

/// Decode a mnemonic back to its entropy bytes.
///
/// The checksum is not verified; use [`validate`] for that.
pub fn to_entropy(mnemonic: &str) -> Result<Zeroizing<Vec<u8>>> {
    to_entropy_in::<English>(mnemonic)
}

/// Decode a mnemonic back to its entropy bytes with the given wordlist.
pub fn to_entropy_in<W: Wordlist>(mnemonic: &str) -> Result<Zeroizing<Vec<u8>>> {
    let (bits, words) = unpack::<W>(mnemonic)?;
    Ok(Zeroizing::new(bits[..words * 4 / 3].to_vec()))
}

/// Check that every word is known and the checksum matches.
pub fn validate(mnemonic: &str) -> Result<()> {
    validate_in::<English>(mnemonic)
}

/// [`validate`] with the given wordlist.
pub fn validate_in<W: Wordlist>(mnemonic: &str) -> Result<()> {
    let (bits, words) = unpack::<W>(mnemonic)?;
    let entropy_len = words * 4 / 3;
    let checksum_bits = words / 3;
    let shift = 8 - checksum_bits;

    let expected = Sha256::digest(&bits[..entropy_len])[0] >> shift;
    if expected == bits[entropy_len] >> shift {
        Ok(())
    } else {
        Err(Error::ChecksumMismatch)
    }
}

/// Whether `mnemonic` is a valid English BIP-39 sentence.
pub fn check(mnemonic: &str) -> bool {
    validate(mnemonic).is_ok()
}

/// Collapse whitespace runs to single spaces and trim both ends.
pub fn normalize(mnemonic: &str) -> Zeroizing<String> {
    let mut out = Zeroizing::new(String::with_capacity(mnemonic.len()));
    for word in mnemonic.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// `"mnemonic" ‖ passphrase`, with the passphrase cut to
/// [`MAX_PASSPHRASE_LEN`] bytes.
fn seed_salt(passphrase: &str) -> Zeroizing<Vec<u8>> {
    let passphrase = passphrase.as_bytes();
    let passphrase = &passphrase[..passphrase.len().min(MAX_PASSPHRASE_LEN)];

    let mut salt = Zeroizing::new(Vec::with_capacity(8 + passphrase.len()));
    salt.extend_from_slice(b"mnemonic");
    salt.extend_from_slice(passphrase);
    salt
}

/// Stretch a mnemonic and passphrase into a 64-byte seed.
pub fn to_seed(mnemonic: &str, passphrase: &str) -> Result<Zeroizing<[u8; SEED_LEN]>> {
    let mnemonic = normalize(mnemonic);
    let salt = seed_salt(passphrase);

    tracing::trace!(rounds = PBKDF2_ROUNDS, "stretching mnemonic");
    let mut seed = Zeroizing::new([0u8; SEED_LEN]);
    pbkdf2::pbkdf2_hmac::<Sha512>(mnemonic.as_bytes(), &salt, PBKDF2_ROUNDS, seed.as_mut_slice());
    Ok(seed)
}

/// Stretch a mnemonic into a seed, reporting progress.
///
/// `progress(done, total)` is called with `done = 0` before the first round
/// and then after every 128 rounds, ending with `done == total`. The result
/// equals [`to_seed`].
pub fn to_seed_with_progress<F>(
    mnemonic: &str,
    passphrase: &str,
    mut progress: F,
) -> Result<Zeroizing<[u8; SEED_LEN]>>
where
    F: FnMut(u32, u32),
{
    let mnemonic = normalize(mnemonic);
    let salt = seed_salt(passphrase);

    tracing::trace!(rounds = PBKDF2_ROUNDS, "stretching mnemonic with progress");

    // PBKDF2 unrolled here only so rounds can be reported.
    let prf = HmacSha512::new_from_slice(mnemonic.as_bytes()).map_err(|_| Error::CryptoError)?;

    // A 64-byte output is exactly one PBKDF2 block.
    let mut mac = prf.clone();
    mac.update(&salt);
    mac.update(&1u32.to_be_bytes());
    let mut block = Zeroizing::new([0u8; SEED_LEN]);
    block.copy_from_slice(&mac.finalize().into_bytes());
    let mut seed = Zeroizing::new(*block);

    progress(0, PBKDF2_ROUNDS);
    for round in 1..PBKDF2_ROUNDS {
        let mut mac = prf.clone();
        mac.update(block.as_slice());
        block.copy_from_slice(&mac.finalize().into_bytes());

        for (s, b) in seed.iter_mut().zip(block.iter()) {
            *s ^= b;
        }

        if (round + 1) % PROGRESS_INTERVAL == 0 {
            progress(round + 1, PBKDF2_ROUNDS);
        }
    }

    Ok(seed)
}

/// Index of `word` in the English list.
pub fn find_word(word: &str) -> Option<usize> {
    English::get_index(word)
}

/// English word at `index`.
pub fn word_at(index: usize) -> Option<&'static str> {
    English::get_word(index)
}

/// First English word starting with `prefix`.
pub fn complete_word(prefix: &str) -> Option<&'static str> {
    complete_word_in::<English>(prefix)
}

/// First word of `W` starting with `prefix`.
pub fn complete_word_in<W: Wordlist>(prefix: &str) -> Option<&'static str> {
    W::get_all().iter().copied().find(|w| w.starts_with(prefix))
}

/// Bit mask of letters that can follow `prefix` in some English word.
///
/// Bit `n` stands for the letter `'a' + n`. An empty prefix allows every
/// letter.
pub fn word_completion_mask(prefix: &str) -> u32 {
    word_completion_mask_in::<English>(prefix)
}

/// [`word_completion_mask`] for any wordlist.
pub fn word_completion_mask_in<W: Wordlist>(prefix: &str) -> u32 {
    if prefix.is_empty() {
        return 0x03ff_ffff;
    }

    W::get_all()
        .iter()
        .filter(|w| w.starts_with(prefix))
        .filter_map(|w| w.as_bytes().get(prefix.len()).copied())
        .filter(u8::is_ascii_lowercase)
        .fold(0, |mask, c| mask | 1 << (c - b'a'))
}
