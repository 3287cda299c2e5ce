use std::cmp::Ordering;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use std::{fmt, str};

use fstr::FStr;

/// Represents a 12-byte ObjectId document key.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct ObjectId([u8; 12]);

impl ObjectId {
    /// Returns a reference to the underlying byte array.
    pub const fn as_bytes(&self) -> &[u8; 12] {
        &self.0
    }

    /// Creates an ObjectId from a 12-byte buffer, stored verbatim.
    ///
    /// Any 12 bytes are accepted; the embedded timestamp is not checked for
    /// plausibility.
    pub const fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    /// Creates an ObjectId byte array from field values.
    pub const fn from_parts(secs: u32, machine_id: [u8; 3], process_id: u16, counter: u32) -> Self {
        if counter >= 1 << 24 {
            panic!("invalid field value");
        }

        Self([
            (secs >> 24) as u8,
            (secs >> 16) as u8,
            (secs >> 8) as u8,
            secs as u8,
            machine_id[0],
            machine_id[1],
            machine_id[2],
            (process_id >> 8) as u8,
            process_id as u8,
            (counter >> 16) as u8,
            (counter >> 8) as u8,
            counter as u8,
        ])
    }

    /// Creates an ObjectId with only the timestamp field populated and the
    /// remaining eight bytes zero.
    ///
    /// Such identifiers are the natural endpoints of time-range scans over
    /// byte-ordered ObjectId keys (e.g., "all keys issued after `time`"). Use
    /// [`Generator::generate_at`](crate::Generator::generate_at) instead when
    /// the identifier must also be distinct from others issued in this
    /// process.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use objectid::ObjectId;
    /// use std::time::{Duration, UNIX_EPOCH};
    ///
    /// let t = UNIX_EPOCH + Duration::from_secs(0x507f1f77);
    /// let id = ObjectId::from_timestamp(t);
    /// assert_eq!(&id.encode() as &str, "507f1f770000000000000000");
    /// assert_eq!(id.generation_time(), t);
    /// ```
    pub fn from_timestamp(time: SystemTime) -> Self {
        let secs = time
            .duration_since(UNIX_EPOCH)
            .expect("clock may have gone backward")
            .as_secs() as u32;
        Self::from_parts(secs, [0, 0, 0], 0, 0)
    }

    /// Returns the embedded timestamp field as seconds since the Unix epoch.
    pub const fn timestamp(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    /// Returns the generation time recorded in the first four bytes as a UTC
    /// point in time, at seconds resolution.
    pub fn generation_time(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(self.timestamp() as u64)
    }

    /// Returns the 24-character hexadecimal string representation stored in a
    /// stack-allocated string.
    ///
    /// Use the [`fmt::Display`] trait usually to get the canonical lowercase
    /// hexadecimal representation; this method is handy where an owned,
    /// heap-free form is preferred.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use objectid::ObjectId;
    ///
    /// let x = "507f1f77bcf86cd799439011".parse::<ObjectId>()?;
    /// let y = x.encode();
    /// assert_eq!(&y as &str, "507f1f77bcf86cd799439011");
    /// assert_eq!(format!("{}", y), "507f1f77bcf86cd799439011");
    /// # Ok::<(), objectid::ParseError>(())
    /// ```
    pub fn encode(&self) -> FStr<24> {
        const DIGITS: &[u8; 16] = b"0123456789abcdef";

        let mut buffer = [0u8; 24];
        let mut buf_iter = buffer.iter_mut();
        for e in self.0 {
            *buf_iter.next().unwrap() = DIGITS[(e >> 4) as usize];
            *buf_iter.next().unwrap() = DIGITS[(e & 15) as usize];
        }
        debug_assert!(buffer.is_ascii());
        unsafe { FStr::from_inner_unchecked(buffer) }
    }

    /// Returns the fixed extended JSON rendering of the identifier.
    ///
    /// The hexadecimal character set needs no escaping, so the rendering is a
    /// plain single-key template.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use objectid::ObjectId;
    ///
    /// let x = "507f1f77bcf86cd799439011".parse::<ObjectId>()?;
    /// assert_eq!(x.to_json(), r#"{"$oid": "507f1f77bcf86cd799439011"}"#);
    /// # Ok::<(), objectid::ParseError>(())
    /// ```
    pub fn to_json(&self) -> String {
        format!(r#"{{"$oid": "{}"}}"#, self.encode())
    }

    /// Returns true if `candidate` is a string of exactly 24 hexadecimal
    /// characters.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use objectid::ObjectId;
    ///
    /// assert!(ObjectId::is_valid_hex("507f1f77bcf86cd799439011"));
    /// assert!(!ObjectId::is_valid_hex("not-an-id"));
    /// ```
    pub fn is_valid_hex(candidate: &str) -> bool {
        candidate.len() == 24 && candidate.bytes().all(|b| b.is_ascii_hexdigit())
    }

    /// Tests equality with any value that can render itself in the canonical
    /// hexadecimal form.
    pub fn eq_canonical<T: CanonicalHex + ?Sized>(&self, other: &T) -> bool {
        self.cmp_canonical(other) == Ordering::Equal
    }

    /// Compares with any value that can render itself in the canonical
    /// hexadecimal form.
    ///
    /// The comparison is defined over the hexadecimal renderings, which
    /// coincides with the raw byte ordering whenever both sides are
    /// `ObjectId`s.
    pub fn cmp_canonical<T: CanonicalHex + ?Sized>(&self, other: &T) -> Ordering {
        let (lhs, rhs) = (self.encode(), other.canonical_hex());
        Ord::cmp(&lhs as &str, &rhs as &str)
    }
}

/// A value that can render itself in the canonical 24-character lowercase
/// hexadecimal form of an ObjectId.
///
/// External key types (e.g., string-typed identifiers handed over by another
/// system) implement this trait to become comparable with [`ObjectId`]
/// through [`ObjectId::eq_canonical`] and [`ObjectId::cmp_canonical`].
///
/// # Examples
///
/// ```rust
/// use objectid::{CanonicalHex, ObjectId};
///
/// struct HexKey(&'static str);
///
/// impl CanonicalHex for HexKey {
///     fn canonical_hex(&self) -> fstr::FStr<24> {
///         self.0.parse::<ObjectId>().unwrap().encode()
///     }
/// }
///
/// let x = "507f1f77bcf86cd799439011".parse::<ObjectId>()?;
/// assert!(x.eq_canonical(&HexKey("507F1F77BCF86CD799439011")));
/// # Ok::<(), objectid::ParseError>(())
/// ```
pub trait CanonicalHex {
    /// Returns the canonical 24-character lowercase hexadecimal rendering.
    fn canonical_hex(&self) -> FStr<24>;
}

impl CanonicalHex for ObjectId {
    fn canonical_hex(&self) -> FStr<24> {
        self.encode()
    }
}

impl fmt::Display for ObjectId {
    /// Returns the canonical 24-character lowercase hexadecimal string
    /// representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId(\"{}\")", self.encode())
    }
}

impl str::FromStr for ObjectId {
    type Err = ParseError;

    /// Creates an object from the 24-character hexadecimal string
    /// representation, accepting both lowercase and uppercase digits.
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        let err = || ParseError::new(src);
        let mut dst = [0u8; 12];
        let mut iter = src.chars();
        for e in dst.iter_mut() {
            let hi = iter.next().ok_or_else(err)?.to_digit(16).ok_or_else(err)? as u8;
            let lo = iter.next().ok_or_else(err)?.to_digit(16).ok_or_else(err)? as u8;
            *e = (hi << 4) | lo;
        }
        if iter.next().is_none() {
            Ok(Self(dst))
        } else {
            Err(err())
        }
    }
}

impl From<ObjectId> for String {
    fn from(src: ObjectId) -> Self {
        src.to_string()
    }
}

impl TryFrom<String> for ObjectId {
    type Error = ParseError;

    fn try_from(src: String) -> Result<Self, Self::Error> {
        src.parse()
    }
}

impl From<ObjectId> for [u8; 12] {
    fn from(src: ObjectId) -> Self {
        src.0
    }
}

impl From<[u8; 12]> for ObjectId {
    fn from(src: [u8; 12]) -> Self {
        Self(src)
    }
}

impl AsRef<[u8]> for ObjectId {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// Error parsing an invalid string representation of ObjectId.
///
/// The rejected input is carried for diagnostics and available through
/// [`ParseError::input`].
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ParseError {
    input: String,
}

impl ParseError {
    fn new(input: &str) -> Self {
        Self {
            input: input.to_owned(),
        }
    }

    /// Returns the input string that failed the 24-hex-character pattern.
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid ObjectId string representation: {:?}", self.input)
    }
}

impl std::error::Error for ParseError {}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::{fmt, ObjectId};
    use serde::{de, Deserializer, Serializer};

    impl serde::Serialize for ObjectId {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                serializer.serialize_str(&self.encode())
            } else {
                serializer.serialize_bytes(self.as_bytes())
            }
        }
    }

    impl<'de> serde::Deserialize<'de> for ObjectId {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            if deserializer.is_human_readable() {
                deserializer.deserialize_str(VisitorImpl)
            } else {
                deserializer.deserialize_bytes(VisitorImpl)
            }
        }
    }

    struct VisitorImpl;

    impl<'de> de::Visitor<'de> for VisitorImpl {
        type Value = ObjectId;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "an ObjectId representation")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            value.parse::<Self::Value>().map_err(de::Error::custom)
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            <[u8; 12]>::try_from(value)
                .map(Self::Value::from)
                .map_err(de::Error::custom)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::ObjectId;
        use serde_test::{assert_tokens, Configure, Token};

        /// Serializes and deserializes prepared cases correctly
        #[test]
        fn serializes_and_deserializes_prepared_cases_correctly() {
            let cases = [
                ("000000000000000000000000", &[0u8; 12]),
                ("ffffffffffffffffffffffff", &[0xffu8; 12]),
                (
                    "507f1f77bcf86cd799439011",
                    &[
                        0x50, 0x7f, 0x1f, 0x77, 0xbc, 0xf8, 0x6c, 0xd7, 0x99, 0x43, 0x90, 0x11,
                    ],
                ),
                (
                    "000004d20102031011000005",
                    &[0, 0, 4, 210, 1, 2, 3, 16, 17, 0, 0, 5],
                ),
            ];

            for (text, bytes) in cases {
                let e = text.parse::<ObjectId>().unwrap();
                assert_tokens(&e.readable(), &[Token::String(text)]);
                assert_tokens(&e.compact(), &[Token::Bytes(bytes)]);
            }
        }
    }
}
