use std::sync::Arc;

use parking_lot::Mutex;

use crate::{Error, HardwareAddrSource, RandSource};

/// Resolves the node value of a generator at most once and keeps it for the generator's
/// lifetime.
pub(crate) struct HardwareAddrCache {
    source: Arc<dyn HardwareAddrSource>,
    resolved: Mutex<Option<[u8; 6]>>,
}

impl HardwareAddrCache {
    pub(crate) fn new(source: Arc<dyn HardwareAddrSource>) -> Self {
        Self {
            source,
            resolved: Mutex::new(None),
        }
    }

    /// Returns the cached node value, resolving it on first use.
    ///
    /// When the source has no address, six random bytes with the multicast bit set stand in for
    /// it. Nothing is cached if that fallback fails, so a later call starts over.
    pub(crate) fn resolve(&self, rng: &dyn RandSource) -> Result<[u8; 6], Error> {
        let mut resolved = self.resolved.lock();
        if let Some(addr) = *resolved {
            return Ok(addr);
        }

        let addr = match self.source.hardware_addr() {
            Ok(addr) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(?addr, "resolved hardware address");
                addr
            }
            Err(_err) => {
                #[cfg(feature = "tracing")]
                trace_fallback(&_err);
                random_node(rng)?
            }
        };

        *resolved = Some(addr);
        Ok(addr)
    }
}

#[cfg(feature = "tracing")]
fn trace_fallback(err: &crate::HardwareAddrError) {
    match err {
        crate::HardwareAddrError::NotFound => {
            tracing::debug!("no hardware address found; using random node")
        }
        _ => tracing::warn!(%err, "hardware address lookup failed; using random node"),
    }
}

fn random_node(rng: &dyn RandSource) -> Result<[u8; 6], Error> {
    let mut addr = [0u8; 6];
    rng.fill_bytes(&mut addr)
        .map_err(Error::HardwareAddrUnavailable)?;
    // multicast bit marks the address as not belonging to a physical interface
    addr[0] |= 0x01;
    Ok(addr)
}

#[cfg(test)]
mod tests {
    use super::HardwareAddrCache;
    use crate::{Error, HardwareAddrError, HardwareAddrSource, RandSource};
    use parking_lot::Mutex;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    struct CountingAddr {
        addr: Mutex<Result<[u8; 6], ()>>,
        calls: AtomicUsize,
    }

    impl CountingAddr {
        fn new(addr: Result<[u8; 6], ()>) -> Arc<Self> {
            Arc::new(Self {
                addr: Mutex::new(addr),
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl HardwareAddrSource for CountingAddr {
        fn hardware_addr(&self) -> Result<[u8; 6], HardwareAddrError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (*self.addr.lock()).map_err(|()| HardwareAddrError::NotFound)
        }
    }

    struct FixedRand(u8);
    impl RandSource for FixedRand {
        fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), rand::Error> {
            dest.fill(self.0);
            Ok(())
        }
    }

    struct FailingRand;
    impl RandSource for FailingRand {
        fn fill_bytes(&self, _: &mut [u8]) -> Result<(), rand::Error> {
            Err(rand::Error::new(std::io::Error::other("entropy exhausted")))
        }
    }

    /// Queries the source once and caches the address
    #[test]
    fn queries_the_source_once_and_caches_the_address() {
        let source = CountingAddr::new(Ok([1, 2, 3, 4, 5, 6]));
        let cache = HardwareAddrCache::new(source.clone());

        assert_eq!(cache.resolve(&FixedRand(0)).unwrap(), [1, 2, 3, 4, 5, 6]);
        *source.addr.lock() = Ok([9; 6]);
        for _ in 0..10 {
            assert_eq!(cache.resolve(&FixedRand(0)).unwrap(), [1, 2, 3, 4, 5, 6]);
        }
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    /// Falls back to random bytes with the multicast bit set
    #[test]
    fn falls_back_to_random_bytes_with_the_multicast_bit_set() {
        let source = CountingAddr::new(Err(()));
        let cache = HardwareAddrCache::new(source.clone());

        assert_eq!(cache.resolve(&FixedRand(0)).unwrap(), [1, 0, 0, 0, 0, 0]);
        assert_eq!(cache.resolve(&FixedRand(0xaa)).unwrap(), [1, 0, 0, 0, 0, 0]);

        let cache = HardwareAddrCache::new(CountingAddr::new(Err(())));
        assert_eq!(cache.resolve(&FixedRand(0xaa)).unwrap(), [0xab, 0xaa, 0xaa, 0xaa, 0xaa, 0xaa]);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    /// Reports unavailability only when the fallback fails
    #[test]
    fn reports_unavailability_only_when_the_fallback_fails() {
        let cache = HardwareAddrCache::new(CountingAddr::new(Ok([7; 6])));
        assert_eq!(cache.resolve(&FailingRand).unwrap(), [7; 6]);

        let source = CountingAddr::new(Err(()));
        let cache = HardwareAddrCache::new(source.clone());
        let err = cache.resolve(&FailingRand).unwrap_err();
        assert!(matches!(err, Error::HardwareAddrUnavailable(_)));

        // nothing was cached, so the next call resolves again
        assert_eq!(cache.resolve(&FixedRand(0x10)).unwrap(), [0x11, 0x10, 0x10, 0x10, 0x10, 0x10]);
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }
}
