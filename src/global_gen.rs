//! Default generator and entry point functions.

#![cfg(feature = "global_gen")]
#![cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]

use std::sync;
use std::time::SystemTime;

use crate::ObjectId;
use inner::GlobalGenInner;

/// Returns the lock handle of the process-wide global generator, creating one if none exists.
fn lock_global_gen() -> sync::MutexGuard<'static, GlobalGenInner> {
    static G: sync::OnceLock<sync::Mutex<GlobalGenInner>> = sync::OnceLock::new();
    G.get_or_init(Default::default)
        .lock()
        .expect("objectid: could not lock global generator")
}

/// Generates an ObjectId from the current time.
///
/// This function employs a process-wide global generator, so identifiers
/// produced by concurrent threads share the machine fingerprint and process
/// id fields and never collide in the counter field. On Unix, this function
/// resets the generator when the process ID changes (i.e., upon process
/// forks) to prevent collisions across processes.
///
/// # Examples
///
/// ```rust
/// let id = objectid::object_id();
/// println!("{}", id); // e.g., "507f1f77bcf86cd799439011"
/// println!("{:?}", id.as_bytes()); // as 12-byte big-endian array
///
/// let id_string: String = objectid::object_id().into();
/// ```
pub fn object_id() -> ObjectId {
    lock_global_gen().get_mut().generate()
}

/// Generates an ObjectId from the given time through the process-wide global
/// generator.
///
/// The identifier consumes one counter tick and therefore stays distinct
/// from every other identifier generated in this process, unlike the
/// zero-filled [`ObjectId::from_timestamp`] form meant for range queries.
///
/// # Examples
///
/// ```rust
/// use std::time::{Duration, UNIX_EPOCH};
///
/// let t = UNIX_EPOCH + Duration::from_secs(0x507f1f77);
/// let id = objectid::object_id_at(t);
/// assert_eq!(id.generation_time(), t);
/// ```
pub fn object_id_at(time: SystemTime) -> ObjectId {
    lock_global_gen().get_mut().generate_at(time)
}

impl ObjectId {
    /// Generates a new ObjectId through the process-wide global generator.
    ///
    /// Equivalent to [`object_id()`]; this is the default construction path
    /// for fresh document keys.
    #[cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]
    pub fn new() -> Self {
        object_id()
    }
}

mod inner {
    use crate::Generator;

    /// A thin wrapper to reset the generator when the process ID changes (i.e., upon Unix forks).
    #[derive(Debug)]
    pub struct GlobalGenInner {
        #[cfg(unix)]
        pid: u32,
        generator: Generator,
    }

    impl Default for GlobalGenInner {
        fn default() -> Self {
            Self {
                #[cfg(unix)]
                pid: std::process::id(),
                generator: Generator::new(),
            }
        }
    }

    impl GlobalGenInner {
        /// Returns a mutable reference to the inner [`Generator`] instance, resetting the
        /// generator state on Unix if the process ID has changed.
        pub fn get_mut(&mut self) -> &mut Generator {
            #[cfg(unix)]
            if self.pid != std::process::id() {
                *self = Default::default();
            }
            &mut self.generator
        }
    }
}
