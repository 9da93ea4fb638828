/// All errors that a generator can return.
///
/// Every failure surfaces synchronously from the call that hit it; nothing is retried
/// internally. Locks are non-poisoning, so there is no lock-related variant.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A read from the random source failed.
    ///
    /// Returned by whichever operation needed randomness: clock sequence seeding, the payload
    /// bytes of versions 4, 6 and 7, or a batch entry.
    #[error("random source exhausted: {0}")]
    RandomSourceExhausted(#[source] rand::Error),

    /// The hardware address source failed and the random fallback failed too.
    #[error("hardware address unavailable: random fallback failed: {0}")]
    HardwareAddrUnavailable(#[source] rand::Error),

    /// A batch was requested with a count that is not positive.
    #[error("invalid batch size {0}: must be greater than zero")]
    InvalidBatchSize(i64),
}

/// Error reported by a [`HardwareAddrSource`](crate::HardwareAddrSource).
///
/// Generators never surface this error; it only selects the random node fallback.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum HardwareAddrError {
    /// No interface with a 6-byte hardware address exists.
    #[error("no hardware address found")]
    NotFound,

    /// The lookup itself failed.
    #[error("hardware address lookup failed: {0}")]
    Lookup(#[source] Box<dyn std::error::Error + Send + Sync>),
}
