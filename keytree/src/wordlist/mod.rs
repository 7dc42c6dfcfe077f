//! Wordlists for mnemonic sentences.
//!
//! Any fixed list of 2048 words can back the mnemonic codec through the
//! [`Wordlist`] trait. [`English`] is the BIP-39 reference list.

use core::fmt::Debug;

/// Number of words in a BIP-39 wordlist.
pub const WORDLIST_LEN: usize = 2048;

/// The interface for a BIP-39 wordlist.
pub trait Wordlist: Copy + Clone + Debug + Send + Sync + 'static + Eq + Sized {
    /// All words, in index order.
    fn get_all() -> &'static [&'static str; WORDLIST_LEN];

    /// Get the word at the given index.
    fn get_word(index: usize) -> Option<&'static str> {
        Self::get_all().get(index).copied()
    }

    /// Get the index of the given word.
    fn get_index(word: &str) -> Option<usize> {
        Self::get_all().iter().position(|w| *w == word)
    }
}

/// The BIP-39 English wordlist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct English;

impl Wordlist for English {
    fn get_all() -> &'static [&'static str; WORDLIST_LEN] {
        bip39::Language::English.word_list()
    }

    // The English list is sorted.
    fn get_index(word: &str) -> Option<usize> {
        Self::get_all().binary_search_by(|w| (*w).cmp(word)).ok()
    }
}
