//! ObjectId generator and related types.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use md5::{Digest, Md5};

use crate::ObjectId;

/// Represents an ObjectId generator that encapsulates a per-process machine
/// fingerprint, a process identifier, and a wrapping counter.
///
/// The generator hands out identifiers through a shared reference, so one
/// instance can be owned by the application's composition root and used from
/// any number of threads without external synchronization: the only shared
/// mutable state is the 24-bit counter, advanced by a single atomic
/// fetch-and-increment per identifier. All other state is computed at
/// construction and read-only afterwards.
///
/// # Examples
///
/// ```rust
/// use objectid::Generator;
/// use std::thread;
///
/// let g = Generator::new();
/// thread::scope(|s| {
///     for i in 0..4 {
///         let g = &g;
///         s.spawn(move || {
///             for _ in 0..8 {
///                 println!("{} by thread {}", g.generate(), i);
///                 thread::yield_now();
///             }
///         });
///     }
/// });
/// ```
#[derive(Debug)]
pub struct Generator {
    machine_id: [u8; 3],
    process_id: u16,

    /// The counter value most recently consumed, in the low 24 bits.
    counter: AtomicU32,
}

impl Generator {
    /// Creates a generator with the identity of the current host and process.
    ///
    /// The machine fingerprint is the first three bytes of a 128-bit digest
    /// of the host name, computed once here; the process identifier is the
    /// low 16 bits of the OS process id (see [`Generator::with_identity`] for
    /// the platform fallback). The counter starts at zero.
    pub fn new() -> Self {
        Self::with_identity(machine_fingerprint(), process_identity())
    }

    /// Creates a generator with an explicitly supplied identity.
    ///
    /// This is the injection point for platforms or deployments where the
    /// default host-name digest and OS process id are not the right source of
    /// identity (the default resolver synthesizes the process identifier by
    /// hashing the calling thread's identity on targets without a stable OS
    /// process id). The supplied values are embedded verbatim in every
    /// generated identifier.
    pub const fn with_identity(machine_id: [u8; 3], process_id: u16) -> Self {
        Self::from_state(machine_id, process_id, 0)
    }

    /// Creates a generator from explicit identity and counter state.
    ///
    /// `counter` is the value most recently consumed; the next identifier
    /// carries `counter + 1` (mod 2^24). Primarily useful to make generated
    /// identifiers deterministic in tests.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use objectid::Generator;
    /// use std::time::{Duration, UNIX_EPOCH};
    ///
    /// let g = Generator::from_state([0xbc, 0xf8, 0x6c], 0xd799, 0x439010);
    /// let t = UNIX_EPOCH + Duration::from_secs(0x507f1f77);
    /// assert_eq!(g.generate_at(t).to_string(), "507f1f77bcf86cd799439011");
    /// ```
    pub const fn from_state(machine_id: [u8; 3], process_id: u16, counter: u32) -> Self {
        Self {
            machine_id,
            process_id,
            counter: AtomicU32::new(counter),
        }
    }

    /// Generates a new ObjectId from the current time.
    pub fn generate(&self) -> ObjectId {
        self.generate_at(SystemTime::now())
    }

    /// Generates a new ObjectId from the given time, truncated to seconds.
    ///
    /// The identifier still consumes one counter tick and therefore differs
    /// from every other identifier generated by this instance, which makes
    /// this the right entry point for backdating keys without sacrificing
    /// their distinctness. Use
    /// [`ObjectId::from_timestamp`](crate::ObjectId::from_timestamp) for
    /// zero-filled range-query endpoints instead.
    pub fn generate_at(&self, time: SystemTime) -> ObjectId {
        let secs = time
            .duration_since(UNIX_EPOCH)
            .expect("clock may have gone backward")
            .as_secs() as u32;
        ObjectId::from_parts(secs, self.machine_id, self.process_id, self.next_count())
    }

    /// Consumes one counter tick, wrapping to zero past 0xffffff.
    fn next_count(&self) -> u32 {
        // 2^24 divides 2^32, so masking the post-increment value stays
        // consistent across the u32 wrap as well
        self.counter.fetch_add(1, Ordering::Relaxed).wrapping_add(1) & 0xff_ffff
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

/// Supports operations as an infinite iterator that produces a new ObjectId
/// for each call of `next()`.
///
/// # Examples
///
/// ```rust
/// use objectid::Generator;
///
/// Generator::new()
///     .enumerate()
///     .skip(4)
///     .take(4)
///     .for_each(|(i, e)| println!("[{i}] {e}"));
/// ```
impl Iterator for Generator {
    type Item = ObjectId;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.generate())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl std::iter::FusedIterator for Generator {}

/// Derives the 3-byte machine fingerprint from a digest of the host name.
fn machine_fingerprint() -> [u8; 3] {
    let host = gethostname::gethostname();
    let digest = Md5::digest(host.to_string_lossy().as_bytes());
    [digest[0], digest[1], digest[2]]
}

/// Resolves the low 16 bits of the OS process id.
#[cfg(not(target_family = "wasm"))]
fn process_identity() -> u16 {
    std::process::id() as u16
}

/// Synthesizes a 16-bit process identity by hashing the calling thread's
/// identity, for targets without a stable OS process id.
#[cfg(target_family = "wasm")]
fn process_identity() -> u16 {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    std::thread::current().id().hash(&mut hasher);
    hasher.finish() as u16
}
