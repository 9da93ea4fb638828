//! Integration with `rand` (v0.8) crate.

use parking_lot::Mutex;
use rand::RngCore;

use super::RandSource;

/// An adapter that implements [`RandSource`] for [`RngCore`] types.
///
/// `RngCore` needs `&mut self`, so the wrapped generator sits behind a lock; every call to
/// [`RandSource::fill_bytes`] holds it for the duration of one draw.
///
/// # Examples
///
/// ```rust
/// use rand::{rngs::StdRng, SeedableRng};
/// use uuidgen::{source::with_rand08::Adapter, Generator, GeneratorOptions};
///
/// let seeded = || Adapter::new(StdRng::seed_from_u64(42));
/// let a = Generator::with_options(GeneratorOptions::new().rand_source(seeded()));
/// let b = Generator::with_options(GeneratorOptions::new().rand_source(seeded()));
/// assert_eq!(a.new_v4()?, b.new_v4()?);
/// # Ok::<(), uuidgen::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct Adapter<T>(Mutex<T>);

impl<T> Adapter<T> {
    /// Wraps `rng`.
    pub fn new(rng: T) -> Self {
        Self(Mutex::new(rng))
    }

    /// Unwraps the inner generator.
    pub fn into_inner(self) -> T {
        self.0.into_inner()
    }
}

impl<T: RngCore + Send> RandSource for Adapter<T> {
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.0.lock().try_fill_bytes(dest)
    }
}
