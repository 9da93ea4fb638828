use std::time::SystemTime;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{clock::MonotonicCounter, Error, Generator, GeneratorOptions, Uuid, UuidGenerator};

/// Largest capacity reserved up front for a batch.
const MAX_PREALLOCATION: usize = 4096;

/// A [`Generator`] extended with a counter for batches of strictly ordered UUIDv7s.
///
/// Each batch entry takes its `(timestamp, counter)` pair from a dedicated counter instead of
/// the clock sequence: the counter restarts at zero whenever the millisecond advances and grows
/// by one otherwise, so entries sharing a millisecond still sort in issuance order. The counter
/// has its own lock, separate from the base generator's state.
///
/// Single identifiers are available through [`UuidGenerator`] or [`MonotonicGenerator::base`].
///
/// # Examples
///
/// ```rust
/// use uuidgen::{MonotonicGenerator, UuidGenerator};
///
/// let g = MonotonicGenerator::new();
/// let batch = g.generate_batch_v7(16)?;
/// assert!(batch.windows(2).all(|w| w[0] < w[1]));
///
/// let single = g.new_v4()?;
/// assert_eq!(single.version(), Some(4));
/// # Ok::<(), uuidgen::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct MonotonicGenerator {
    base: Generator,
    counter: MonotonicCounter,
}

impl MonotonicGenerator {
    /// Creates a generator with the default sources.
    pub fn new() -> Self {
        Self::with_options(GeneratorOptions::default())
    }

    /// Creates a generator with the sources in `options`.
    pub fn with_options(options: GeneratorOptions) -> Self {
        Self {
            base: Generator::with_options(options),
            counter: MonotonicCounter::default(),
        }
    }

    /// Returns the underlying generator.
    pub fn base(&self) -> &Generator {
        &self.base
    }

    /// Generates `count` UUIDv7s in strictly increasing order.
    ///
    /// Ordering holds while fewer than 4096 entries share one millisecond (the version nibble
    /// replaces the counter's top four bits) and while the clock does not go backwards.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidBatchSize`] if `count` is zero or negative; nothing is generated.
    /// - [`Error::RandomSourceExhausted`] if a random draw fails. The entries produced so far are
    ///   discarded, and the counter value of the failed entry is not reused.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn generate_batch_v7(&self, count: i64) -> Result<Vec<Uuid>, Error> {
        let len = match usize::try_from(count) {
            Ok(len) if len > 0 => len,
            _ => return Err(Error::InvalidBatchSize(count)),
        };

        let mut batch = Vec::with_capacity(len.min(MAX_PREALLOCATION));
        for _ in 0..len {
            batch.push(self.new_monotonic_v7()?);
        }
        Ok(batch)
    }

    fn new_monotonic_v7(&self) -> Result<Uuid, Error> {
        let (unix_ts_ms, counter) = self.counter.next(self.base.now());
        let mut rand_b = [0u8; 8];
        self.base.fill_random(&mut rand_b)?;
        Ok(Uuid::from_fields_v7(unix_ts_ms, counter, rand_b))
    }
}

impl UuidGenerator for MonotonicGenerator {
    fn new_v1(&self) -> Result<Uuid, Error> {
        self.base.new_v1()
    }

    fn new_v1_at(&self, at: SystemTime) -> Result<Uuid, Error> {
        self.base.new_v1_at(at)
    }

    fn new_v3(&self, namespace: &Uuid, name: &[u8]) -> Uuid {
        self.base.new_v3(namespace, name)
    }

    fn new_v4(&self) -> Result<Uuid, Error> {
        self.base.new_v4()
    }

    fn new_v5(&self, namespace: &Uuid, name: &[u8]) -> Uuid {
        self.base.new_v5(namespace, name)
    }

    fn new_v6(&self) -> Result<Uuid, Error> {
        self.base.new_v6()
    }

    fn new_v6_at(&self, at: SystemTime) -> Result<Uuid, Error> {
        self.base.new_v6_at(at)
    }

    fn new_v7(&self) -> Result<Uuid, Error> {
        self.base.new_v7()
    }

    fn new_v7_at(&self, at: SystemTime) -> Result<Uuid, Error> {
        self.base.new_v7_at(at)
    }
}
