//! Byte layouts of every version the generators produce.
//!
//! These are pure functions of their inputs; all state (clock sequence, counters, randomness)
//! is gathered by the generator beforehand.

use md5::{Digest, Md5};
use sha1::Sha1;

use crate::Uuid;

impl Uuid {
    /// Creates a UUIDv1 from a 60-bit count of 100-nanosecond intervals since 1582-10-15, a clock
    /// sequence, and a node value.
    ///
    /// ```text
    ///  0                   1                   2                   3
    ///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
    /// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    /// |                           time_low                            |
    /// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    /// |           time_mid            |  ver  |       time_high       |
    /// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    /// |var|         clock_seq         |             node              |
    /// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    /// |                              node                             |
    /// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    /// ```
    pub const fn from_fields_v1(timestamp: u64, clock_seq: u16, node: [u8; 6]) -> Self {
        Self::stamp(
            [
                (timestamp >> 24) as u8,
                (timestamp >> 16) as u8,
                (timestamp >> 8) as u8,
                timestamp as u8,
                (timestamp >> 40) as u8,
                (timestamp >> 32) as u8,
                (timestamp >> 56) as u8,
                (timestamp >> 48) as u8,
                (clock_seq >> 8) as u8,
                clock_seq as u8,
                node[0],
                node[1],
                node[2],
                node[3],
                node[4],
                node[5],
            ],
            1,
        )
    }

    /// Creates a UUIDv6 from the same timestamp as UUIDv1, reordered most significant bits first,
    /// and eight random bytes.
    ///
    /// ```text
    ///  0                   1                   2                   3
    ///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
    /// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    /// |                           time_high                           |
    /// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    /// |           time_mid            |  ver  |       time_low        |
    /// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    /// |var|                         rand                              |
    /// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    /// |                              rand                             |
    /// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    /// ```
    ///
    /// The two variant bits overwrite the top of `rand_tail[0]`, leaving 62 random bits.
    pub const fn from_fields_v6(timestamp: u64, rand_tail: [u8; 8]) -> Self {
        Self::stamp(
            [
                (timestamp >> 52) as u8,
                (timestamp >> 44) as u8,
                (timestamp >> 36) as u8,
                (timestamp >> 28) as u8,
                (timestamp >> 20) as u8,
                (timestamp >> 12) as u8,
                (timestamp >> 8) as u8 & 0x0f,
                timestamp as u8,
                rand_tail[0],
                rand_tail[1],
                rand_tail[2],
                rand_tail[3],
                rand_tail[4],
                rand_tail[5],
                rand_tail[6],
                rand_tail[7],
            ],
            6,
        )
    }

    /// Creates a UUIDv7 from a Unix timestamp in milliseconds, a sequence value, and eight random
    /// bytes.
    ///
    /// ```text
    ///  0                   1                   2                   3
    ///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
    /// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    /// |                          unix_ts_ms                           |
    /// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    /// |          unix_ts_ms           |  ver  |          seq          |
    /// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    /// |var|                         rand                              |
    /// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    /// |                              rand                             |
    /// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    /// ```
    ///
    /// Bits of `unix_ts_ms` above 48 are discarded, and the version nibble replaces the top four
    /// bits of `seq`.
    pub const fn from_fields_v7(unix_ts_ms: u64, seq: u16, rand_b: [u8; 8]) -> Self {
        Self::stamp(
            [
                (unix_ts_ms >> 40) as u8,
                (unix_ts_ms >> 32) as u8,
                (unix_ts_ms >> 24) as u8,
                (unix_ts_ms >> 16) as u8,
                (unix_ts_ms >> 8) as u8,
                unix_ts_ms as u8,
                (seq >> 8) as u8,
                seq as u8,
                rand_b[0],
                rand_b[1],
                rand_b[2],
                rand_b[3],
                rand_b[4],
                rand_b[5],
                rand_b[6],
                rand_b[7],
            ],
            7,
        )
    }

    /// Creates a UUIDv4 from 16 random bytes.
    pub const fn from_random_bytes_v4(bytes: [u8; 16]) -> Self {
        Self::stamp(bytes, 4)
    }

    /// Creates a UUIDv3 from the MD5 hash of `namespace` followed by `name`.
    pub fn from_md5_name(namespace: &Uuid, name: &[u8]) -> Self {
        let digest = Md5::new()
            .chain_update(namespace.as_bytes())
            .chain_update(name)
            .finalize();
        Self::stamp(leading_16(&digest), 3)
    }

    /// Creates a UUIDv5 from the SHA-1 hash of `namespace` followed by `name`.
    ///
    /// Only the first 16 of the 20 digest bytes are used.
    pub fn from_sha1_name(namespace: &Uuid, name: &[u8]) -> Self {
        let digest = Sha1::new()
            .chain_update(namespace.as_bytes())
            .chain_update(name)
            .finalize();
        Self::stamp(leading_16(&digest), 5)
    }
}

fn leading_16(digest: &[u8]) -> [u8; 16] {
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest[..16]);
    bytes
}
