//! Content fingerprints.
//!
//! [`ContentHasher`] produces a SHA-256 digest over field content in field
//! order. Each component is written as a length-prefixed frame so adjacent
//! values cannot run together. The digest is a pure function of content;
//! there is no fallback identity.

use sha2::{Digest, Sha256};

use crate::features::FEATURE_VALIDATION_MESSAGE;
use crate::field::Field;

const FRAME_NAME: &[u8] = b"name";
const FRAME_TYPE: &[u8] = b"type";
const FRAME_TITLE: &[u8] = b"title";
const FRAME_FEATURE: &[u8] = b"feature";
const FRAME_VALUE: &[u8] = b"value";

/// Incremental digest over fields.
pub struct ContentHasher {
    hasher: Sha256,
    include_features: bool,
}

impl ContentHasher {
    pub fn new(include_features: bool) -> Self {
        ContentHasher {
            hasher: Sha256::new(),
            include_features,
        }
    }

    /// Feeds one field: name, type, title, features (optionally, excluding
    /// validation messages) and collapsed value.
    pub fn write_field(&mut self, field: &Field) {
        write_framed(&mut self.hasher, FRAME_NAME, field.name().as_bytes());
        write_framed(
            &mut self.hasher,
            FRAME_TYPE,
            field.field_type().as_str().as_bytes(),
        );
        write_framed(&mut self.hasher, FRAME_TITLE, field.title().as_bytes());

        if self.include_features {
            for (key, value) in field.features().entries() {
                if key == FEATURE_VALIDATION_MESSAGE {
                    continue;
                }
                write_framed(&mut self.hasher, FRAME_FEATURE, key.as_bytes());
                write_framed(&mut self.hasher, FRAME_FEATURE, value.as_bytes());
            }
        }

        write_framed(&mut self.hasher, FRAME_VALUE, field.collapse().as_bytes());
    }

    pub fn write_fields<'a, I>(&mut self, fields: I)
    where
        I: IntoIterator<Item = &'a Field>,
    {
        for field in fields {
            self.write_field(field);
        }
    }

    /// Lower-case hex digest.
    pub fn finish(self) -> String {
        hex::encode(self.hasher.finalize())
    }
}

/// CRC32 of `text`, widened to 64 bits. Used as a schema fingerprint.
pub fn type_id_of(text: &str) -> u64 {
    u64::from(crc32fast::hash(text.as_bytes()))
}

fn write_framed(hasher: &mut Sha256, label: &[u8], bytes: &[u8]) {
    let label_len = u32::try_from(label.len()).unwrap_or(u32::MAX);
    hasher.update(label_len.to_be_bytes());
    hasher.update(label);

    let bytes_len = u32::try_from(bytes.len()).unwrap_or(u32::MAX);
    hasher.update(bytes_len.to_be_bytes());
    hasher.update(bytes);
}
