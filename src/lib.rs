//! bitbloom implements a byte-packed, fixed-length bitset and, layered on it,
//! a classic Bloom filter consulting several independent digest functions.
//!
//! The [`PackedBitSet`] stores 8 bits per byte, approaching a 64x memory
//! reduction over one machine word per bit, with `O(1)` get, set and clear, and
//! `O(n)` bitwise OR / XOR against another set of the same length.
//!
//! The [`MembershipFilter`] derives its optimal bit length and number of hash
//! projectors from the number of items it is expected to hold and a target
//! false positive rate, then answers membership queries with no false
//! negatives:
//!
//! ```rust
//! use bitbloom::MembershipFilter;
//!
//! let mut filter = MembershipFilter::new(10_000, 0.01)?;
//! filter.put("hello");
//! filter.put("world");
//!
//! assert!(filter.may_contain("hello"));
//! assert!((filter.expected_fpp() - 0.01).abs() < 1e-4);
//! # Ok::<(), bitbloom::Error>(())
//! ```
//!
//! Both types are plain single-owner values with no internal synchronisation;
//! the usual `&` / `&mut` rules are all the serialisation they need.
//!
//! ## Logging
//!
//! Filter construction and merges are reported through [tracing] at `debug`
//! level, bitset combines at `trace` level. No subscriber is installed.
//!
//! [tracing]: https://github.com/tokio-rs/tracing

mod bitmap;
mod bloom;
pub mod error;
pub mod hash;
pub mod params;

pub use bitmap::*;
pub use bloom::*;
pub use error::{Error, Result};
pub use hash::{CanonicalBytes, HashProjector, PROJECTORS, PROJECTOR_TABLE_VERSION};
