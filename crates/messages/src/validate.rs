use crate::{Error, Result};

/// Default maximum caption length, in UTF-8 bytes.
pub const MAX_CAPTION_LENGTH: usize = 4000;

/// Length of `text` in UTF-16 code units, the unit entity offsets use.
#[must_use]
pub fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Caption limits checked before any record is built.
#[derive(Debug, Clone, Copy)]
pub struct CaptionValidator {
    max_length: usize,
}

impl Default for CaptionValidator {
    fn default() -> Self {
        Self::new(MAX_CAPTION_LENGTH)
    }
}

impl CaptionValidator {
    #[must_use]
    pub fn new(max_length: usize) -> Self {
        Self { max_length }
    }

    /// Reject captions whose UTF-8 encoding exceeds the limit.
    pub fn validate(&self, caption: &str) -> Result<()> {
        let length = caption.len();
        if length > self.max_length {
            return Err(Error::CaptionTooLong {
                length,
                max: self.max_length,
            });
        }
        Ok(())
    }
}
