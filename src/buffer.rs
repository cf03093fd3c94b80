// SPDX-FileCopyrightText: Copyright (c) 2017-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{Error, Word};

/// Fixed-capacity buffer of 16-bit words with a valid-length counter.
///
/// Every index-based access is checked against the capacity `N` and
/// rejected with [`Error::IllegalDataAddress`] instead of panicking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordBuffer<const N: usize> {
    words: [Word; N],
    len: usize,
}

impl<const N: usize> WordBuffer<N> {
    /// Number of words the buffer can hold.
    pub const CAPACITY: usize = N;

    #[must_use]
    pub const fn new() -> Self {
        Self {
            words: [0; N],
            len: 0,
        }
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of valid words.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The valid words.
    #[must_use]
    pub fn as_slice(&self) -> &[Word] {
        &self.words[..self.len]
    }

    /// Reads the word at `index`, which may lie beyond the valid length
    /// but not beyond the capacity.
    pub fn get(&self, index: usize) -> Result<Word, Error> {
        self.words
            .get(index)
            .copied()
            .ok_or(Error::IllegalDataAddress { index, capacity: N })
    }

    /// Stores `word` at `index` and extends the valid length to cover it.
    pub fn set(&mut self, index: usize, word: Word) -> Result<(), Error> {
        let slot = self
            .words
            .get_mut(index)
            .ok_or(Error::IllegalDataAddress { index, capacity: N })?;
        *slot = word;
        self.len = self.len.max(index + 1);
        Ok(())
    }

    /// Replaces the whole content with `words`.
    ///
    /// Nothing is written if `words` does not fit.
    pub fn set_words(&mut self, words: &[Word]) -> Result<(), Error> {
        let target = self.words.get_mut(..words.len()).ok_or(Error::IllegalDataAddress {
            index: words.len().saturating_sub(1),
            capacity: N,
        })?;
        target.copy_from_slice(words);
        self.len = words.len();
        Ok(())
    }

    /// The first `count` words regardless of the valid length.
    pub fn prefix(&self, count: usize) -> Result<&[Word], Error> {
        self.words.get(..count).ok_or(Error::IllegalDataAddress {
            index: count.saturating_sub(1),
            capacity: N,
        })
    }

    /// Zeroes all words and resets the valid length.
    pub fn clear(&mut self) {
        self.words = [0; N];
        self.len = 0;
    }

    /// Overwrites the content with the words yielded by `words`.
    ///
    /// Words that do not fit are dropped. Returns the number of words
    /// stored and the number of words yielded.
    pub(crate) fn overwrite(&mut self, words: impl IntoIterator<Item = Word>) -> (usize, usize) {
        let mut stored = 0;
        let mut total = 0;
        for word in words {
            if let Some(slot) = self.words.get_mut(total) {
                *slot = word;
                stored += 1;
            }
            total += 1;
        }
        self.len = stored;
        (stored, total)
    }
}

impl<const N: usize> Default for WordBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}
