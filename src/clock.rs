//! Per-generator timestamp state: the clock sequence and the batch counter.

use std::time::SystemTime;

use parking_lot::Mutex;

use crate::{
    source::{gregorian_ticks, unix_ts_ms},
    Error, RandSource,
};

/// Timestamp scale requested from [`ClockSequence::next`].
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub(crate) enum Precision {
    /// 100-nanosecond intervals since 1582-10-15 (versions 1 and 6).
    Gregorian,
    /// Milliseconds since the Unix epoch (version 7).
    UnixMillis,
}

impl Precision {
    fn timestamp(self, at: SystemTime) -> u64 {
        match self {
            Self::Gregorian => gregorian_ticks(at),
            Self::UnixMillis => unix_ts_ms(at),
        }
    }
}

#[derive(Debug, Default)]
struct ClockState {
    seeded: bool,
    last_timestamp: u64,
    clock_seq: u16,
}

/// A randomly seeded 16-bit clock sequence that is bumped whenever the timestamp fails to
/// advance.
///
/// The whole read-compare-increment-write runs under one lock. One `last_timestamp` is shared by
/// both precisions.
#[derive(Debug, Default)]
pub(crate) struct ClockSequence {
    state: Mutex<ClockState>,
}

impl ClockSequence {
    /// Returns the timestamp of `at` in the requested precision and the clock sequence to pair
    /// with it.
    ///
    /// The first successful call seeds the sequence with 16 random bits. A failed seed leaves the
    /// state untouched, so the next call tries again.
    pub(crate) fn next(
        &self,
        precision: Precision,
        at: SystemTime,
        rng: &dyn RandSource,
    ) -> Result<(u64, u16), Error> {
        let timestamp = precision.timestamp(at);
        let mut state = self.state.lock();

        if !state.seeded {
            let mut seed = [0u8; 2];
            rng.fill_bytes(&mut seed)
                .map_err(Error::RandomSourceExhausted)?;
            state.clock_seq = u16::from_be_bytes(seed);
            state.seeded = true;
            #[cfg(feature = "tracing")]
            tracing::debug!(clock_seq = state.clock_seq, "seeded clock sequence");
        }

        if timestamp <= state.last_timestamp {
            state.clock_seq = state.clock_seq.wrapping_add(1);
            #[cfg(feature = "tracing")]
            tracing::trace!(
                timestamp,
                last_timestamp = state.last_timestamp,
                clock_seq = state.clock_seq,
                "clock did not advance; bumped clock sequence"
            );
        }
        state.last_timestamp = timestamp;

        Ok((timestamp, state.clock_seq))
    }
}

#[derive(Debug, Default)]
struct CounterState {
    last_timestamp: u64,
    counter: u16,
}

/// A millisecond counter for batch issuance: reset to zero when the timestamp advances and
/// incremented when it does not.
///
/// Guarded by its own lock, independent of [`ClockSequence`].
#[derive(Debug, Default)]
pub(crate) struct MonotonicCounter {
    state: Mutex<CounterState>,
}

impl MonotonicCounter {
    /// Returns the Unix timestamp of `at` in milliseconds and the counter value to pair with it.
    pub(crate) fn next(&self, at: SystemTime) -> (u64, u16) {
        let timestamp = unix_ts_ms(at);
        let mut state = self.state.lock();

        if timestamp > state.last_timestamp {
            state.counter = 0;
        } else {
            state.counter = state.counter.wrapping_add(1);
        }
        state.last_timestamp = timestamp;

        (timestamp, state.counter)
    }
}
