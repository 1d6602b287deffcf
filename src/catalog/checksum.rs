//! CRC32 over packed catalog queries
//!
//! The packed form crosses from plan time to execution time through the
//! host; the checksum detects a plan that was altered in between.

use crc32fast::Hasher;

/// Checksum of the query text and its parameter count
pub fn query_checksum(text: &str, param_count: usize) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(text.as_bytes());
    hasher.update(&(param_count as u64).to_le_bytes());
    hasher.finalize()
}
