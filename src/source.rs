//! Random, time, and hardware address sources consumed by the generators.
//!
//! Each source is a trait so that tests and callers with special needs can plug in their own
//! implementation through [`GeneratorOptions`](crate::GeneratorOptions). Sources are shared by
//! all threads using a generator, hence the `Send + Sync` bounds and `&self` receivers.

use std::{sync::Arc, time::SystemTime};

use rand::RngCore;

use crate::HardwareAddrError;

pub mod with_rand08;

/// A trait for sources of cryptographically strong random bytes.
///
/// # Examples
///
/// ```rust
/// use uuidgen::{Generator, GeneratorOptions, RandSource};
///
/// struct ZeroRand;
/// impl RandSource for ZeroRand {
///     fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), rand::Error> {
///         dest.fill(0);
///         Ok(())
///     }
/// }
///
/// let g = Generator::with_options(GeneratorOptions::new().rand_source(ZeroRand));
/// assert_eq!(g.new_v4()?.to_string(), "00000000-0000-4000-8000-000000000000");
/// # Ok::<(), uuidgen::Error>(())
/// ```
pub trait RandSource: Send + Sync {
    /// Fills `dest` entirely with random data or fails without a partial guarantee.
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), rand::Error>;
}

/// A trait for sources of the current time.
pub trait TimeSource: Send + Sync {
    /// Returns the current wall-clock time.
    fn now(&self) -> SystemTime;
}

/// A trait for sources of the 48-bit node value used by UUIDv1.
pub trait HardwareAddrSource: Send + Sync {
    /// Returns a 6-byte hardware (MAC) address.
    fn hardware_addr(&self) -> Result<[u8; 6], HardwareAddrError>;
}

impl<T: RandSource + ?Sized> RandSource for Arc<T> {
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), rand::Error> {
        (**self).fill_bytes(dest)
    }
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn now(&self) -> SystemTime {
        (**self).now()
    }
}

impl<T: HardwareAddrSource + ?Sized> HardwareAddrSource for Arc<T> {
    fn hardware_addr(&self) -> Result<[u8; 6], HardwareAddrError> {
        (**self).hardware_addr()
    }
}

/// The default random source: the operating system's CSPRNG through [`rand::rngs::OsRng`].
#[derive(Clone, Copy, Eq, PartialEq, Debug, Default)]
pub struct OsRandom;

impl RandSource for OsRandom {
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), rand::Error> {
        rand::rngs::OsRng.try_fill_bytes(dest)
    }
}

/// The default time source based on [`SystemTime::now()`].
#[derive(Clone, Copy, Eq, PartialEq, Debug, Default)]
pub struct StdSystemTime;

impl TimeSource for StdSystemTime {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// The default hardware address source.
///
/// Reports the MAC address of the first suitable network interface when the `mac_address`
/// crate feature is enabled, and [`HardwareAddrError::NotFound`] otherwise.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Default)]
pub struct SystemHardwareAddr;

impl HardwareAddrSource for SystemHardwareAddr {
    #[cfg(feature = "mac_address")]
    fn hardware_addr(&self) -> Result<[u8; 6], HardwareAddrError> {
        match mac_address::get_mac_address() {
            Ok(Some(addr)) => Ok(addr.bytes()),
            Ok(None) => Err(HardwareAddrError::NotFound),
            Err(err) => Err(HardwareAddrError::Lookup(Box::new(err))),
        }
    }

    #[cfg(not(feature = "mac_address"))]
    fn hardware_addr(&self) -> Result<[u8; 6], HardwareAddrError> {
        Err(HardwareAddrError::NotFound)
    }
}

/// Unix timestamp in milliseconds; instants before the Unix epoch map to zero.
pub(crate) fn unix_ts_ms(at: SystemTime) -> u64 {
    at.duration_since(SystemTime::UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() as u64)
}

/// Difference in 100-nanosecond intervals between the Gregorian epoch (1582-10-15) and the Unix
/// epoch (1970-01-01).
const GREGORIAN_OFFSET: u64 = 122_192_928_000_000_000;

/// Count of 100-nanosecond intervals since 1582-10-15T00:00:00Z.
pub(crate) fn gregorian_ticks(at: SystemTime) -> u64 {
    match at.duration_since(SystemTime::UNIX_EPOCH) {
        Ok(d) => GREGORIAN_OFFSET.wrapping_add((d.as_nanos() / 100) as u64),
        Err(err) => GREGORIAN_OFFSET.saturating_sub((err.duration().as_nanos() / 100) as u64),
    }
}

#[cfg(test)]
mod tests {
    use super::{gregorian_ticks, unix_ts_ms, OsRandom, RandSource};
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    /// Converts instants to both timestamp scales
    #[test]
    fn converts_instants_to_both_timestamp_scales() {
        let at = UNIX_EPOCH + Duration::from_secs(1_645_557_742);
        assert_eq!(unix_ts_ms(at), 0x017f_22e2_79b0);
        assert_eq!(gregorian_ticks(at), 0x01ec_9414_c232_ab00);

        assert_eq!(unix_ts_ms(UNIX_EPOCH), 0);
        assert_eq!(gregorian_ticks(UNIX_EPOCH), 122_192_928_000_000_000);
    }

    /// Handles instants before the Unix epoch
    #[test]
    fn handles_instants_before_the_unix_epoch() {
        let before = UNIX_EPOCH - Duration::from_nanos(150);
        assert_eq!(unix_ts_ms(before), 0);
        assert_eq!(gregorian_ticks(before), 122_192_928_000_000_000 - 1);

        let ancient = UNIX_EPOCH - Duration::from_secs(500 * 366 * 86_400);
        assert_eq!(gregorian_ticks(ancient), 0);
    }

    /// Truncates sub-tick precision
    #[test]
    fn truncates_sub_tick_precision() {
        let at = UNIX_EPOCH + Duration::from_nanos(1_999);
        assert_eq!(gregorian_ticks(at), 122_192_928_000_000_000 + 19);
        assert_eq!(unix_ts_ms(at), 0);

        let now = SystemTime::now();
        assert!(gregorian_ticks(now) > 0x01ec_9414_c232_ab00);
    }

    /// Fills buffers from the operating system
    #[test]
    fn fills_buffers_from_the_operating_system() {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        OsRandom.fill_bytes(&mut a).unwrap();
        OsRandom.fill_bytes(&mut b).unwrap();
        assert_ne!(a, b);
    }
}
