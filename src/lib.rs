//! A Rust implementation of the 12-byte ObjectId document key
//!
//! ```rust
//! let id = objectid::object_id();
//! println!("{}", id); // e.g., "507f1f77bcf86cd799439011"
//! println!("{:?}", id.as_bytes()); // as 12-byte big-endian array
//! ```
//!
//! # Field and byte layout
//!
//! This implementation produces identifiers with the following byte layout:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                           timestamp                           |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |              machine fingerprint              |  process id   |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |  process id   |                    counter                    |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Where:
//!
//! - The 32-bit `timestamp` field carries the generation time as seconds
//!   since the Unix epoch.
//! - The 24-bit `machine fingerprint` field is derived once per process from
//!   a digest of the host name.
//! - The 16-bit `process id` field carries the low bits of the generating
//!   process's identity.
//! - The 24-bit `counter` field accommodates the per-process sequence number
//!   that keeps identifiers generated within the same second distinct. The
//!   counter is incremented by one for each generated identifier and wraps
//!   to zero past 0xffffff.
//!
//! All fields are big-endian, so identifiers compare by their raw byte
//! sequence in ascending generation order within one process; the counter
//! wrap boundary is the one point where issue order and byte order disagree.
//! A process restart resets the counter to zero: same-second collisions are
//! made improbable by the timestamp, machine, and process fields rather than
//! impossible.
//!
//! # Other features
//!
//! Identifiers round-trip through the canonical 24-character hexadecimal
//! form and repair pre-canonical stored representations:
//!
//! ```rust
//! use objectid::{LegacyRepr, ObjectId};
//!
//! let id: ObjectId = "507f1f77bcf86cd799439011".parse()?;
//! assert_eq!(id.to_json(), r#"{"$oid": "507f1f77bcf86cd799439011"}"#);
//!
//! let stored = LegacyRepr::Integers(vec![
//!     0x50, 0x7f, 0x1f, 0x77, 0xbc, 0xf8, 0x6c, 0xd7, 0x99, 0x43, 0x90, 0x11,
//! ]);
//! assert_eq!(ObjectId::try_from(stored)?, id);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod id;
pub use id::{CanonicalHex, ObjectId, ParseError};

mod legacy;
pub use legacy::{LegacyError, LegacyRepr};

pub mod generator;
#[doc(inline)]
pub use generator::Generator;

mod global_gen;
#[cfg(feature = "global_gen")]
pub use global_gen::{object_id, object_id_at};
