//! Repair of ObjectId values stored in pre-canonical representations.
//!
//! Documents serialized by older library versions may carry an ObjectId not
//! as the canonical 12-byte buffer but as a sequence of twelve small
//! integers, one per byte. This module normalizes both shapes into
//! [`ObjectId`] eagerly, at construction, so that every constructed value is
//! canonical and repair never has to happen on read.

use std::fmt;

use crate::ObjectId;

/// An ObjectId payload as found in previously persisted documents.
///
/// # Examples
///
/// ```rust
/// use objectid::{LegacyRepr, ObjectId};
///
/// let stored = LegacyRepr::Integers(vec![
///     0x50, 0x7f, 0x1f, 0x77, 0xbc, 0xf8, 0x6c, 0xd7, 0x99, 0x43, 0x90, 0x11,
/// ]);
/// let id = ObjectId::try_from(stored)?;
/// assert_eq!(id, "507f1f77bcf86cd799439011".parse()?);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum LegacyRepr {
    /// A buffer already in the canonical 12-byte form.
    Bytes(Vec<u8>),
    /// Byte values stored individually as small integers.
    Integers(Vec<i64>),
}

impl TryFrom<LegacyRepr> for ObjectId {
    type Error = LegacyError;

    /// Normalizes a stored representation into the canonical 12-byte form.
    ///
    /// A canonical buffer is accepted unchanged, so repairing an already
    /// repaired value is a no-op. Every other shape fails with a
    /// [`LegacyError`] naming the offense.
    fn try_from(repr: LegacyRepr) -> Result<Self, Self::Error> {
        match repr {
            LegacyRepr::Bytes(buf) => match <[u8; 12]>::try_from(buf.as_slice()) {
                Ok(bytes) => Ok(ObjectId::from_bytes(bytes)),
                Err(_) => Err(LegacyError::BufferLength(buf.len())),
            },
            LegacyRepr::Integers(values) => {
                if values.len() != 12 {
                    return Err(LegacyError::ElementCount(values.len()));
                }
                let mut bytes = [0u8; 12];
                for (dst, &value) in bytes.iter_mut().zip(&values) {
                    if !(0..=0xff).contains(&value) {
                        return Err(LegacyError::ElementRange(value));
                    }
                    *dst = value as u8;
                }
                Ok(ObjectId::from_bytes(bytes))
            }
        }
    }
}

/// Error repairing a stored value that is neither a 12-byte buffer nor a
/// sequence of twelve byte-valued integers.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum LegacyError {
    /// A byte buffer whose length is not 12.
    BufferLength(usize),
    /// An integer sequence whose element count is not 12.
    ElementCount(usize),
    /// An integer outside the 0-255 byte range.
    ElementRange(i64),
}

impl fmt::Display for LegacyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferLength(len) => {
                write!(f, "cannot repair stored ObjectId: buffer of {} bytes", len)
            }
            Self::ElementCount(len) => write!(
                f,
                "cannot repair stored ObjectId: sequence of {} integers",
                len
            ),
            Self::ElementRange(value) => write!(
                f,
                "cannot repair stored ObjectId: integer {} out of byte range",
                value
            ),
        }
    }
}

impl std::error::Error for LegacyError {}

#[cfg(test)]
mod tests {
    use super::{LegacyError, LegacyRepr};
    use crate::ObjectId;

    /// Packs a sequence of twelve small integers into the canonical form
    #[test]
    fn packs_a_sequence_of_twelve_small_integers_into_the_canonical_form() {
        let stored = LegacyRepr::Integers(vec![
            0x50, 0x7f, 0x1f, 0x77, 0xbc, 0xf8, 0x6c, 0xd7, 0x99, 0x43, 0x90, 0x11,
        ]);

        let repaired = ObjectId::try_from(stored).unwrap();
        assert_eq!(
            repaired,
            "507f1f77bcf86cd799439011".parse::<ObjectId>().unwrap()
        );
    }

    /// Accepts a canonical buffer unchanged
    #[test]
    fn accepts_a_canonical_buffer_unchanged() {
        let e = "507f1f77bcf86cd799439011".parse::<ObjectId>().unwrap();

        let repaired = ObjectId::try_from(LegacyRepr::Bytes(e.as_bytes().to_vec())).unwrap();
        assert_eq!(repaired, e);

        // repairing the repaired value again is a no-op
        let again = ObjectId::try_from(LegacyRepr::Bytes(repaired.as_bytes().to_vec())).unwrap();
        assert_eq!(again, e);
    }

    /// Rejects buffers and sequences of the wrong shape
    #[test]
    fn rejects_buffers_and_sequences_of_the_wrong_shape() {
        assert_eq!(
            ObjectId::try_from(LegacyRepr::Bytes(vec![0; 11])),
            Err(LegacyError::BufferLength(11))
        );
        assert_eq!(
            ObjectId::try_from(LegacyRepr::Bytes(vec![0; 13])),
            Err(LegacyError::BufferLength(13))
        );
        assert_eq!(
            ObjectId::try_from(LegacyRepr::Integers(vec![0; 11])),
            Err(LegacyError::ElementCount(11))
        );
        assert_eq!(
            ObjectId::try_from(LegacyRepr::Integers(vec![0; 13])),
            Err(LegacyError::ElementCount(13))
        );
    }

    /// Rejects integers outside the byte range
    #[test]
    fn rejects_integers_outside_the_byte_range() {
        let mut values = vec![0i64; 12];
        values[7] = 256;
        assert_eq!(
            ObjectId::try_from(LegacyRepr::Integers(values)),
            Err(LegacyError::ElementRange(256))
        );

        let mut values = vec![0i64; 12];
        values[0] = -1;
        assert_eq!(
            ObjectId::try_from(LegacyRepr::Integers(values)),
            Err(LegacyError::ElementRange(-1))
        );
    }

    /// Describes the offending value in the error rendering
    #[test]
    fn describes_the_offending_value_in_the_error_rendering() {
        assert_eq!(
            LegacyError::BufferLength(11).to_string(),
            "cannot repair stored ObjectId: buffer of 11 bytes"
        );
        assert_eq!(
            LegacyError::ElementCount(13).to_string(),
            "cannot repair stored ObjectId: sequence of 13 integers"
        );
        assert_eq!(
            LegacyError::ElementRange(-1).to_string(),
            "cannot repair stored ObjectId: integer -1 out of byte range"
        );
    }
}
