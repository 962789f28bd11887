//! Code image: the immutable word stream a VM executes.
//!
//! Binary files are raw concatenations of little-endian 32-bit words with
//! no header; metadata travels out of band.

use crate::error::DecodeError;

/// Default call stack capacity when the image metadata requests none.
pub const DEFAULT_CALL_STACK_SIZE: u32 = 8;

/// Default data stack capacity when the image metadata requests none.
pub const DEFAULT_STACK_SIZE: u32 = 32;

/// Initial stack sizes for tasks spawned against an image.
///
/// Zero fields request the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImageMeta {
    /// Call stack capacity in return addresses; 0 = default.
    pub call_stack_size: u32,
    /// Data stack capacity in words; 0 = default.
    pub stack_size: u32,
}

impl ImageMeta {
    /// Call stack capacity with the default applied.
    pub fn effective_call_stack_size(&self) -> usize {
        if self.call_stack_size == 0 {
            DEFAULT_CALL_STACK_SIZE as usize
        } else {
            self.call_stack_size as usize
        }
    }

    /// Data stack capacity with the default applied.
    pub fn effective_stack_size(&self) -> usize {
        if self.stack_size == 0 {
            DEFAULT_STACK_SIZE as usize
        } else {
            self.stack_size as usize
        }
    }
}

/// An SVM code image: a word stream plus stack-size metadata.
///
/// The image is immutable once built; the VM only performs indexed reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeImage {
    words: Vec<i32>,
    /// Initial stack sizes for tasks running this image.
    pub meta: ImageMeta,
}

impl CodeImage {
    /// Create an image with default metadata.
    pub fn new(words: Vec<i32>) -> Self {
        Self {
            words,
            meta: ImageMeta::default(),
        }
    }

    /// Create an image with explicit metadata.
    pub fn with_meta(words: Vec<i32>, meta: ImageMeta) -> Self {
        Self { words, meta }
    }

    /// The word at `index`, or `None` past the end.
    pub fn word(&self, index: usize) -> Option<i32> {
        self.words.get(index).copied()
    }

    /// The full word stream.
    pub fn words(&self) -> &[i32] {
        &self.words
    }

    /// Image size in words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns true if the image has no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Encode the word stream to little-endian bytes.
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.words.len() * 4);
        for word in &self.words {
            bytes.extend_from_slice(&word.to_le_bytes());
        }
        bytes
    }

    /// Decode a little-endian byte stream into an image with default
    /// metadata. The length must be a multiple of 4.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() % 4 != 0 {
            return Err(DecodeError::InvalidLength(bytes.len()));
        }

        let words = bytes
            .chunks_exact(4)
            .map(|chunk| i32::from_le_bytes(chunk.try_into().expect("chunks_exact guarantees 4 bytes")))
            .collect();

        Ok(Self::new(words))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_image() {
        let image = CodeImage::new(vec![]);
        assert!(image.is_empty());
        assert_eq!(image.len(), 0);
        assert_eq!(image.encode(), Vec::<u8>::new());
        assert_eq!(image.word(0), None);
    }

    #[test]
    fn indexed_reads() {
        let image = CodeImage::new(vec![1, -2, 3]);
        assert_eq!(image.word(0), Some(1));
        assert_eq!(image.word(1), Some(-2));
        assert_eq!(image.word(2), Some(3));
        assert_eq!(image.word(3), None);
    }

    #[test]
    fn encode_is_little_endian() {
        let image = CodeImage::new(vec![0x0403_0201]);
        assert_eq!(image.encode(), vec![0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn encode_decode_roundtrip() {
        let image = CodeImage::new(vec![1, 0x11, -1, i32::MIN]);
        let decoded = CodeImage::decode(&image.encode()).unwrap();
        assert_eq!(decoded, image);
    }

    #[test]
    fn decode_rejects_ragged_length() {
        assert_eq!(
            CodeImage::decode(&[0; 6]),
            Err(DecodeError::InvalidLength(6))
        );
    }

    #[test]
    fn meta_defaults() {
        let meta = ImageMeta::default();
        assert_eq!(meta.effective_call_stack_size(), 8);
        assert_eq!(meta.effective_stack_size(), 32);

        let meta = ImageMeta {
            call_stack_size: 4,
            stack_size: 64,
        };
        assert_eq!(meta.effective_call_stack_size(), 4);
        assert_eq!(meta.effective_stack_size(), 64);
    }
}
