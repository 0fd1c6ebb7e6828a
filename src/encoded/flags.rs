//! Fixed-width per-edge bit record.

/// The encoded attribute bundle of one edge.
///
/// A flat run of 32-bit words. Fields never straddle a word boundary, the
/// registry in [`super::EncodedValues`] guarantees it when it allocates
/// offsets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct EdgeFlags {
    ints: Vec<u32>,
}

impl EdgeFlags {
    /// An all-zero record of `words` 32-bit words.
    pub fn new(words: usize) -> Self {
        Self {
            ints: vec![0; words],
        }
    }

    /// Raw words, lowest bit of word 0 first.
    pub fn words(&self) -> &[u32] {
        &self.ints
    }

    /// True when no bit is set.
    pub fn is_empty(&self) -> bool {
        self.ints.iter().all(|w| *w == 0)
    }

    pub(crate) fn get_bits(&self, offset: u32, bits: u32) -> u32 {
        let word = (offset / 32) as usize;
        let shift = offset % 32;
        match self.ints.get(word) {
            Some(w) => (w >> shift) & mask(bits),
            None => 0,
        }
    }

    pub(crate) fn set_bits(&mut self, offset: u32, bits: u32, value: u32) {
        let word = (offset / 32) as usize;
        let shift = offset % 32;
        if word >= self.ints.len() {
            self.ints.resize(word + 1, 0);
        }
        let m = mask(bits) << shift;
        self.ints[word] = (self.ints[word] & !m) | ((value << shift) & m);
    }
}

fn mask(bits: u32) -> u32 {
    if bits >= 32 {
        u32::MAX
    } else {
        (1u32 << bits) - 1
    }
}
