//! UUID generator for the RFC 9562 versions 1, 3, 4, 5, 6 and 7
//!
//! ```rust
//! use uuidgen::{Generator, Uuid};
//!
//! let g = Generator::new();
//!
//! let uuid = g.new_v7()?;
//! println!("{}", uuid); // e.g. "01809424-3e59-7c05-9219-566f82fff672"
//! println!("{:?}", uuid.as_bytes()); // as 16-byte big-endian array
//!
//! let name_based = g.new_v5(&Uuid::NAMESPACE_DNS, "www.example.com");
//! assert_eq!(name_based.to_string(), "2ed6657d-e927-568b-95e1-2665a8aea6a2");
//! # Ok::<(), uuidgen::Error>(())
//! ```
//!
//! See [RFC 9562](https://www.rfc-editor.org/rfc/rfc9562).
//!
//! # Generators
//!
//! A [`Generator`] owns the state that time-based versions depend on: a randomly seeded 16-bit
//! clock sequence, the last timestamp it observed, and the node value of UUIDv1 (the first MAC
//! address of the machine, or six random bytes with the multicast bit set when none is
//! available). Instances are independent of one another and safe to share across threads.
//!
//! Whenever the clock fails to advance between two calls, the clock sequence is incremented, so
//! identifiers issued within the same tick still differ. Versions 1 and 7 embed the sequence;
//! version 6 carries 62 random bits instead.
//!
//! A [`MonotonicGenerator`] adds [`generate_batch_v7`](MonotonicGenerator::generate_batch_v7),
//! which issues UUIDv7s in strictly increasing order using a counter that restarts at zero every
//! millisecond:
//!
//! ```rust
//! use uuidgen::MonotonicGenerator;
//!
//! let batch = MonotonicGenerator::new().generate_batch_v7(8)?;
//! assert!(batch.windows(2).all(|w| w[0] < w[1]));
//! # Ok::<(), uuidgen::Error>(())
//! ```
//!
//! # Sources
//!
//! Randomness, time, and the hardware address come from the [`RandSource`], [`TimeSource`], and
//! [`HardwareAddrSource`] traits, replaceable through [`GeneratorOptions`]. The defaults are the
//! operating system's CSPRNG, [`std::time::SystemTime::now()`], and the MAC address lookup of the
//! `mac_address` crate.
//!
//! # Crate features
//!
//! Default features:
//!
//! - `global_gen`: enables the process-wide [`default_generator`] and the free functions that
//!   delegate to it, such as [`new_v7()`] and [`new_v4()`].
//! - `mac_address`: looks up the hardware address of the machine for UUIDv1. Without it, every
//!   generator uses a random node value.
//!
//! Optional features:
//!
//! - `tracing`: emits spans and events through the `tracing` crate.
//! - `serde`: enables serialization and deserialization of [`Uuid`] via serde.
//! - `uuid`: enables conversion from/to [`uuid::Uuid`](https://docs.rs/uuid).

#![cfg_attr(docsrs, feature(doc_cfg))]

mod clock;
mod error;
mod generator;
mod hardware_addr;
mod id;
mod layout;
mod monotonic;
pub mod source;

pub use error::{Error, HardwareAddrError};
pub use generator::{Generator, GeneratorOptions, UuidGenerator};
pub use id::{ParseError, Uuid, Variant};
pub use monotonic::MonotonicGenerator;
pub use source::{
    HardwareAddrSource, OsRandom, RandSource, StdSystemTime, SystemHardwareAddr, TimeSource,
};

#[cfg(feature = "global_gen")]
mod global_gen;
#[cfg(feature = "global_gen")]
pub use global_gen::{
    default_generator, new_v1, new_v1_at, new_v3, new_v4, new_v5, new_v6, new_v6_at, new_v7,
    new_v7_at, ReseedingRandom,
};
