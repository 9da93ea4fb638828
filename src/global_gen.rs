//! Default generator and entry point functions.

#![cfg(feature = "global_gen")]
#![cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]

use std::{fmt, process, sync::OnceLock, time::SystemTime};

use parking_lot::Mutex;
use rand::{
    rngs::{adapter::ReseedingRng, OsRng},
    RngCore, SeedableRng,
};
use rand_chacha::ChaCha12Core;

use crate::{Error, Generator, GeneratorOptions, RandSource, Uuid};

/// Returns the process-wide default generator, creating one if none exists.
///
/// The default generator uses [`ReseedingRandom`] and the default time and hardware address
/// sources. Nothing else in this crate depends on it; construct a [`Generator`] directly to
/// control its sources and lifetime.
pub fn default_generator() -> &'static Generator {
    static G: OnceLock<Generator> = OnceLock::new();
    G.get_or_init(|| {
        Generator::with_options(GeneratorOptions::new().rand_source(ReseedingRandom::new()))
    })
}

/// Generates a UUIDv1 with the default generator.
pub fn new_v1() -> Result<Uuid, Error> {
    default_generator().new_v1()
}

/// Generates a UUIDv1 from `at` with the default generator.
pub fn new_v1_at(at: SystemTime) -> Result<Uuid, Error> {
    default_generator().new_v1_at(at)
}

/// Generates a UUIDv3 with the default generator.
pub fn new_v3(namespace: &Uuid, name: impl AsRef<[u8]>) -> Uuid {
    default_generator().new_v3(namespace, name)
}

/// Generates a UUIDv4 with the default generator.
///
/// # Examples
///
/// ```rust
/// let uuid = uuidgen::new_v4()?;
/// println!("{uuid}"); // e.g., "2ca4b2ce-6c13-40d4-bccf-37d222820f6f"
/// # Ok::<(), uuidgen::Error>(())
/// ```
pub fn new_v4() -> Result<Uuid, Error> {
    default_generator().new_v4()
}

/// Generates a UUIDv5 with the default generator.
pub fn new_v5(namespace: &Uuid, name: impl AsRef<[u8]>) -> Uuid {
    default_generator().new_v5(namespace, name)
}

/// Generates a UUIDv6 with the default generator.
pub fn new_v6() -> Result<Uuid, Error> {
    default_generator().new_v6()
}

/// Generates a UUIDv6 from `at` with the default generator.
pub fn new_v6_at(at: SystemTime) -> Result<Uuid, Error> {
    default_generator().new_v6_at(at)
}

/// Generates a UUIDv7 with the default generator.
///
/// # Examples
///
/// ```rust
/// let uuid = uuidgen::new_v7()?;
/// println!("{uuid}"); // e.g., "01809424-3e59-7c05-9219-566f82fff672"
/// println!("{:?}", uuid.as_bytes()); // as 16-byte big-endian array
/// # Ok::<(), uuidgen::Error>(())
/// ```
pub fn new_v7() -> Result<Uuid, Error> {
    default_generator().new_v7()
}

/// Generates a UUIDv7 from `at` with the default generator.
pub fn new_v7_at(at: SystemTime) -> Result<Uuid, Error> {
    default_generator().new_v7_at(at)
}

/// Number of bytes a ChaCha core produces before it reseeds from the operating system.
const RESEED_THRESHOLD: u64 = 1024 * 64;

/// A [`RandSource`] built on [`ChaCha12Core`] with a [`ReseedingRng`] wrapper to emulate the
/// strategy used by [`rand::rngs::ThreadRng`].
///
/// The core is created from [`OsRng`] on first use and recreated whenever the process ID
/// changes (i.e., upon Unix forks), so a child process never replays its parent's stream.
#[derive(Default)]
pub struct ReseedingRandom {
    state: Mutex<Option<ForkAwareRng>>,
}

struct ForkAwareRng {
    pid: u32,
    rng: ReseedingRng<ChaCha12Core, OsRng>,
}

impl ForkAwareRng {
    fn new(pid: u32) -> Result<Self, rand::Error> {
        let core = ChaCha12Core::from_rng(OsRng)?;
        Ok(Self {
            pid,
            rng: ReseedingRng::new(core, RESEED_THRESHOLD, OsRng),
        })
    }
}

impl ReseedingRandom {
    /// Creates an unseeded instance; seeding happens on the first draw.
    pub fn new() -> Self {
        Self::default()
    }
}

impl RandSource for ReseedingRandom {
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), rand::Error> {
        let pid = process::id();
        let mut state = self.state.lock();
        let current = match state.take() {
            Some(current) if current.pid == pid => current,
            _previous => {
                #[cfg(feature = "tracing")]
                if let Some(previous) = &_previous {
                    tracing::debug!(previous.pid, pid, "process id changed; reseeding");
                }
                ForkAwareRng::new(pid)?
            }
        };
        state.insert(current).rng.try_fill_bytes(dest)
    }
}

impl fmt::Debug for ReseedingRandom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReseedingRandom")
            .field("seeded", &self.state.lock().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{
        default_generator, new_v1, new_v1_at, new_v3, new_v4, new_v5, new_v6_at, new_v7,
        new_v7_at, ReseedingRandom, RESEED_THRESHOLD,
    };
    use crate::{Generator, RandSource, Uuid, Variant};
    use std::{
        collections::HashSet,
        time::{Duration, SystemTime, UNIX_EPOCH},
    };

    const N_SAMPLES: usize = 100_000;

    fn collect_samples(f: fn() -> Result<Uuid, crate::Error>) -> Vec<Uuid> {
        (0..N_SAMPLES).map(|_| f().unwrap()).collect()
    }

    /// Asserts that the version and variant bits are fixed and that each of `random_bits` is set
    /// in about half of the samples.
    fn assert_bit_distribution(
        samples: &[Uuid],
        version: u8,
        random_bits: impl Iterator<Item = usize>,
    ) {
        // count '1' of each bit, most significant first
        let mut bins = [0u32; 128];
        for e in samples {
            let value = u128::from(*e);
            for (i, bin) in bins.iter_mut().enumerate() {
                *bin += (value >> (127 - i) & 1) as u32;
            }
        }

        let n = samples.len() as u32;
        for k in 0..4 {
            let expected = if version >> (3 - k) & 1 == 1 { n } else { 0 };
            assert_eq!(bins[48 + k], expected, "version bit {}", 48 + k);
        }
        assert_eq!(bins[64], n, "variant bit 64");
        assert_eq!(bins[65], 0, "variant bit 65");

        // set margin based on binom dist 99.999% confidence interval
        let margin = 4.417173 * (0.5 * 0.5 / samples.len() as f64).sqrt();
        for i in random_bits {
            let p = bins[i] as f64 / samples.len() as f64;
            assert!((p - 0.5).abs() < margin, "random bit {i}: {p}");
        }
    }

    fn assert_canonical(samples: &[Uuid], version: char) {
        let pattern = format!(
            r"^[0-9a-f]{{8}}-[0-9a-f]{{4}}-{version}[0-9a-f]{{3}}-[89ab][0-9a-f]{{3}}-[0-9a-f]{{12}}$"
        );
        let re = regex::Regex::new(&pattern).unwrap();
        for e in samples {
            assert!(re.is_match(&e.to_string()), "{e}");
        }
    }

    /// Generates unique UUIDv4s with proper bits
    #[test]
    fn generates_unique_uuid_v4s_with_proper_bits() {
        let samples = collect_samples(new_v4);
        assert_canonical(&samples, '4');
        assert_eq!(samples.iter().collect::<HashSet<_>>().len(), N_SAMPLES);
        assert_bit_distribution(&samples, 4, (0..48).chain(52..64).chain(66..128));
    }

    /// Generates unique UUIDv7s with proper bits and current timestamps
    #[test]
    fn generates_unique_uuid_v7s_with_proper_bits_and_current_timestamps() {
        let before = SystemTime::now();
        let samples = collect_samples(new_v7);
        let after = SystemTime::now();

        assert_canonical(&samples, '7');
        assert_eq!(samples.iter().collect::<HashSet<_>>().len(), N_SAMPLES);
        assert_bit_distribution(&samples, 7, 66..128);

        let unix_ts_ms = |at: SystemTime| at.duration_since(UNIX_EPOCH).unwrap().as_millis() as u64;
        let range = unix_ts_ms(before)..=unix_ts_ms(after);
        let mut prev = 0;
        for e in &samples {
            let ts = u128::from(*e) >> 80;
            assert!(range.contains(&(ts as u64)));
            assert!(prev <= ts);
            prev = ts;
        }
    }

    /// Generates no duplicates under multithreading
    #[test]
    fn generates_no_duplicates_under_multithreading() {
        use std::{sync::mpsc, thread};

        let (tx, rx) = mpsc::channel();
        for _ in 0..4 {
            let tx = tx.clone();
            thread::spawn(move || {
                for _ in 0..5_000 {
                    tx.send(new_v7().unwrap()).unwrap();
                    tx.send(new_v1().unwrap()).unwrap();
                }
            });
        }
        drop(tx);

        let s: HashSet<Uuid> = rx.iter().collect();
        assert_eq!(s.len(), 4 * 2 * 5_000);
    }

    /// Delegates to one shared generator
    #[test]
    fn delegates_to_one_shared_generator() {
        assert!(std::ptr::eq(default_generator(), default_generator()));

        let local = Generator::new();
        assert_eq!(
            new_v3(&Uuid::NAMESPACE_URL, "https://example.com/"),
            local.new_v3(&Uuid::NAMESPACE_URL, "https://example.com/")
        );
        assert_eq!(
            new_v5(&Uuid::NAMESPACE_URL, "https://example.com/"),
            local.new_v5(&Uuid::NAMESPACE_URL, "https://example.com/")
        );

        let at = UNIX_EPOCH + Duration::from_secs(1_645_557_742);
        assert_eq!(new_v1_at(at).unwrap().to_string()[..18], *"c232ab00-9414-11ec");
        assert_eq!(new_v6_at(at).unwrap().to_string()[..18], *"1ec9414c-232a-6b00");
        assert_eq!(new_v7_at(at).unwrap().to_string()[..13], *"017f22e2-79b0");

        for e in [new_v1_at(at).unwrap(), new_v7_at(at).unwrap()] {
            assert_eq!(e.variant(), Variant::Var10);
        }
    }

    /// Keeps producing fresh bytes across reseeds
    #[test]
    fn keeps_producing_fresh_bytes_across_reseeds() {
        let rng = ReseedingRandom::new();
        let mut seen = HashSet::new();
        let draws = (RESEED_THRESHOLD as usize / 16) * 3;
        for _ in 0..draws {
            let mut buf = [0u8; 16];
            rng.fill_bytes(&mut buf).unwrap();
            assert!(seen.insert(buf));
        }
        assert!(format!("{rng:?}").contains("seeded: true"));
    }

    /// Draws independent streams from independent instances
    #[test]
    fn draws_independent_streams_from_independent_instances() {
        let a = ReseedingRandom::new();
        let b = ReseedingRandom::new();
        assert!(format!("{a:?}").contains("seeded: false"));

        let mut x = [0u8; 32];
        let mut y = [0u8; 32];
        a.fill_bytes(&mut x).unwrap();
        b.fill_bytes(&mut y).unwrap();
        assert_ne!(x, y);
    }
}
