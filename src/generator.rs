//! UUID generator and related types.

use std::{fmt, sync::Arc, time::SystemTime};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    clock::{ClockSequence, Precision},
    hardware_addr::HardwareAddrCache,
    Error, HardwareAddrSource, OsRandom, RandSource, StdSystemTime, SystemHardwareAddr,
    TimeSource, Uuid,
};


/// The minimal interface shared by every generator in this crate.
///
/// [`Generator`] and [`MonotonicGenerator`](crate::MonotonicGenerator) both implement it, so code
/// that only needs single identifiers can accept either.
pub trait UuidGenerator {
    /// Generates a UUIDv1 from the current time and the node value.
    fn new_v1(&self) -> Result<Uuid, Error>;

    /// Generates a UUIDv1 from `at` and the node value.
    fn new_v1_at(&self, at: SystemTime) -> Result<Uuid, Error>;

    /// Generates a UUIDv3 from the MD5 hash of `namespace` and `name`.
    fn new_v3(&self, namespace: &Uuid, name: &[u8]) -> Uuid;

    /// Generates a random UUIDv4.
    fn new_v4(&self) -> Result<Uuid, Error>;

    /// Generates a UUIDv5 from the SHA-1 hash of `namespace` and `name`.
    fn new_v5(&self, namespace: &Uuid, name: &[u8]) -> Uuid;

    /// Generates a k-sortable UUIDv6 from the current time.
    fn new_v6(&self) -> Result<Uuid, Error>;

    /// Generates a k-sortable UUIDv6 from `at`.
    fn new_v6_at(&self, at: SystemTime) -> Result<Uuid, Error>;

    /// Generates a k-sortable UUIDv7 from the current time.
    fn new_v7(&self) -> Result<Uuid, Error>;

    /// Generates a k-sortable UUIDv7 from `at`.
    fn new_v7_at(&self, at: SystemTime) -> Result<Uuid, Error>;
}

/// Sources a [`Generator`] draws from.
///
/// Every field left as `None` falls back to its default:
///
/// | Field                  | Default                                                     |
/// | ---------------------- | ----------------------------------------------------------- |
/// | `hardware_addr_source` | [`SystemHardwareAddr`], the first network interface's MAC   |
/// | `time_source`          | [`StdSystemTime`], i.e. [`SystemTime::now()`]               |
/// | `rand_source`          | [`OsRandom`], the operating system's CSPRNG                 |
#[derive(Clone, Default)]
pub struct GeneratorOptions {
    /// Provides the node value of UUIDv1. Queried at most once per generator.
    pub hardware_addr_source: Option<Arc<dyn HardwareAddrSource>>,

    /// Provides the current time for the methods without an explicit timestamp.
    pub time_source: Option<Arc<dyn TimeSource>>,

    /// Provides every random byte the generator uses.
    pub rand_source: Option<Arc<dyn RandSource>>,
}

impl GeneratorOptions {
    /// Creates a set of options that selects every default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the hardware address source.
    pub fn hardware_addr_source(mut self, source: impl HardwareAddrSource + 'static) -> Self {
        self.hardware_addr_source = Some(Arc::new(source));
        self
    }

    /// Replaces the time source.
    pub fn time_source(mut self, source: impl TimeSource + 'static) -> Self {
        self.time_source = Some(Arc::new(source));
        self
    }

    /// Replaces the random source.
    pub fn rand_source(mut self, source: impl RandSource + 'static) -> Self {
        self.rand_source = Some(Arc::new(source));
        self
    }
}

impl fmt::Debug for GeneratorOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorOptions")
            .field("hardware_addr_source", &self.hardware_addr_source.is_some())
            .field("time_source", &self.time_source.is_some())
            .field("rand_source", &self.rand_source.is_some())
            .finish()
    }
}

/// Represents a UUID generator for versions 1, 3, 4, 5, 6 and 7.
///
/// A generator owns a clock sequence and a cached node value. Both live behind their own locks,
/// so one instance can be shared by any number of threads; independent instances share nothing.
///
/// Within one instance, every time-based identifier pairs its timestamp with a clock sequence
/// that is bumped whenever the timestamp fails to advance, so identifiers issued within the same
/// clock tick still differ.
///
/// # Examples
///
/// ```rust
/// use std::{sync::Arc, thread};
/// use uuidgen::Generator;
///
/// let g = Arc::new(Generator::new());
/// thread::scope(|s| {
///     for i in 0..4 {
///         let g = Arc::clone(&g);
///         s.spawn(move || {
///             for _ in 0..8 {
///                 println!("{} by thread {}", g.new_v7().unwrap(), i);
///                 thread::yield_now();
///             }
///         });
///     }
/// });
/// ```
///
/// # Generator functions
///
/// | Version | Method                     | Ordering                 | Fallible |
/// | ------- | -------------------------- | ------------------------ | -------- |
/// | 1       | [`new_v1`], [`new_v1_at`]  | none                     | yes      |
/// | 3       | [`new_v3`]                 | deterministic            | no       |
/// | 4       | [`new_v4`]                 | none                     | yes      |
/// | 5       | [`new_v5`]                 | deterministic            | no       |
/// | 6       | [`new_v6`], [`new_v6_at`]  | by 100 ns timestamp      | yes      |
/// | 7       | [`new_v7`], [`new_v7_at`]  | by millisecond timestamp | yes      |
///
/// [`new_v1`]: Generator::new_v1
/// [`new_v1_at`]: Generator::new_v1_at
/// [`new_v3`]: Generator::new_v3
/// [`new_v4`]: Generator::new_v4
/// [`new_v5`]: Generator::new_v5
/// [`new_v6`]: Generator::new_v6
/// [`new_v6_at`]: Generator::new_v6_at
/// [`new_v7`]: Generator::new_v7
/// [`new_v7_at`]: Generator::new_v7_at
pub struct Generator {
    rand: Arc<dyn RandSource>,
    time: Arc<dyn TimeSource>,
    clock: ClockSequence,
    hardware_addr: HardwareAddrCache,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl Generator {
    /// Creates a generator with the default sources.
    pub fn new() -> Self {
        Self::with_options(GeneratorOptions::default())
    }

    /// Creates a generator with the sources in `options`.
    pub fn with_options(options: GeneratorOptions) -> Self {
        let GeneratorOptions {
            hardware_addr_source,
            time_source,
            rand_source,
        } = options;

        Self {
            rand: rand_source.unwrap_or_else(|| Arc::new(OsRandom)),
            time: time_source.unwrap_or_else(|| Arc::new(StdSystemTime)),
            clock: ClockSequence::default(),
            hardware_addr: HardwareAddrCache::new(
                hardware_addr_source.unwrap_or_else(|| Arc::new(SystemHardwareAddr)),
            ),
        }
    }

    /// Creates a generator that takes the UUIDv1 node value from `source`.
    ///
    /// This is a shorthand for callers that do not want to expose the physical address of the
    /// machine. The source is queried once; switching addresses requires a new generator.
    pub fn with_hardware_addr_source(source: impl HardwareAddrSource + 'static) -> Self {
        Self::with_options(GeneratorOptions::new().hardware_addr_source(source))
    }

    /// Generates a UUIDv1 from the current time and the node value.
    pub fn new_v1(&self) -> Result<Uuid, Error> {
        self.new_v1_at(self.now())
    }

    /// Generates a UUIDv1 from `at` and the node value.
    ///
    /// The node value is resolved on first use and cached for the lifetime of the generator.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn new_v1_at(&self, at: SystemTime) -> Result<Uuid, Error> {
        let (timestamp, clock_seq) = self.clock.next(Precision::Gregorian, at, &*self.rand)?;
        let node = self.hardware_addr.resolve(&*self.rand)?;
        Ok(Uuid::from_fields_v1(timestamp, clock_seq, node))
    }

    /// Generates a UUIDv3 from the MD5 hash of `namespace` and `name`.
    ///
    /// The result is a pure function of its arguments.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self, name)))]
    pub fn new_v3(&self, namespace: &Uuid, name: impl AsRef<[u8]>) -> Uuid {
        Uuid::from_md5_name(namespace, name.as_ref())
    }

    /// Generates a random UUIDv4.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn new_v4(&self) -> Result<Uuid, Error> {
        let mut bytes = [0u8; 16];
        self.fill_random(&mut bytes)?;
        Ok(Uuid::from_random_bytes_v4(bytes))
    }

    /// Generates a UUIDv5 from the SHA-1 hash of `namespace` and `name`.
    ///
    /// The result is a pure function of its arguments.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self, name)))]
    pub fn new_v5(&self, namespace: &Uuid, name: impl AsRef<[u8]>) -> Uuid {
        Uuid::from_sha1_name(namespace, name.as_ref())
    }

    /// Generates a k-sortable UUIDv6 from the current time.
    pub fn new_v6(&self) -> Result<Uuid, Error> {
        self.new_v6_at(self.now())
    }

    /// Generates a k-sortable UUIDv6 from `at`.
    ///
    /// Carries the same timestamp as UUIDv1 in most-significant-first order, followed by 62
    /// random bits. The clock sequence is advanced but not encoded, and batches are not supported
    /// for this version.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn new_v6_at(&self, at: SystemTime) -> Result<Uuid, Error> {
        let (timestamp, _) = self.clock.next(Precision::Gregorian, at, &*self.rand)?;
        let mut rand_tail = [0u8; 8];
        self.fill_random(&mut rand_tail)?;
        Ok(Uuid::from_fields_v6(timestamp, rand_tail))
    }

    /// Generates a k-sortable UUIDv7 from the current time.
    pub fn new_v7(&self) -> Result<Uuid, Error> {
        self.new_v7_at(self.now())
    }

    /// Generates a k-sortable UUIDv7 from `at`.
    ///
    /// The 48-bit millisecond timestamp is followed by the clock sequence, of which the low 12
    /// bits survive the version nibble, and 62 random bits.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn new_v7_at(&self, at: SystemTime) -> Result<Uuid, Error> {
        let (unix_ts_ms, clock_seq) = self.clock.next(Precision::UnixMillis, at, &*self.rand)?;
        let mut rand_b = [0u8; 8];
        self.fill_random(&mut rand_b)?;
        Ok(Uuid::from_fields_v7(unix_ts_ms, clock_seq, rand_b))
    }

    pub(crate) fn now(&self) -> SystemTime {
        self.time.now()
    }

    pub(crate) fn fill_random(&self, dest: &mut [u8]) -> Result<(), Error> {
        self.rand
            .fill_bytes(dest)
            .map_err(Error::RandomSourceExhausted)
    }
}

impl UuidGenerator for Generator {
    fn new_v1(&self) -> Result<Uuid, Error> {
        self.new_v1()
    }

    fn new_v1_at(&self, at: SystemTime) -> Result<Uuid, Error> {
        self.new_v1_at(at)
    }

    fn new_v3(&self, namespace: &Uuid, name: &[u8]) -> Uuid {
        self.new_v3(namespace, name)
    }

    fn new_v4(&self) -> Result<Uuid, Error> {
        self.new_v4()
    }

    fn new_v5(&self, namespace: &Uuid, name: &[u8]) -> Uuid {
        self.new_v5(namespace, name)
    }

    fn new_v6(&self) -> Result<Uuid, Error> {
        self.new_v6()
    }

    fn new_v6_at(&self, at: SystemTime) -> Result<Uuid, Error> {
        self.new_v6_at(at)
    }

    fn new_v7(&self) -> Result<Uuid, Error> {
        self.new_v7()
    }

    fn new_v7_at(&self, at: SystemTime) -> Result<Uuid, Error> {
        self.new_v7_at(at)
    }
}
