//! Item canonicalisation and the table of digest functions used to project
//! items onto bit positions.
//!
//! Every item put into a [`MembershipFilter`](crate::MembershipFilter) is first
//! reduced to a canonical byte sequence by [`CanonicalBytes`], then digested by
//! each of the filter's [`HashProjector`]s. Each digest is read as a big-endian
//! unsigned integer and reduced modulo the filter's bit length to select one
//! bucket.

use std::borrow::Cow;

use blake2::{Blake2b512, Blake2s256};
use digest::Digest;
use md5::Md5;
use sha1::Sha1;
use sha2::{Sha224, Sha256, Sha384, Sha512};
use sha3::{Sha3_224, Sha3_256, Sha3_384, Sha3_512};

/// Version of the [`PROJECTORS`] table.
///
/// Filters built against different table versions may select different digest
/// functions for the same `k` and must not be merged.
pub const PROJECTOR_TABLE_VERSION: u32 = 1;

/// The ordered table of digest functions a filter selects from.
///
/// A filter using `k` projectors always uses the first `k` entries. Only
/// fixed-output-length digests are listed; extendable-output functions (such as
/// SHAKE) have no natural digest size to derive a bucket from.
pub const PROJECTORS: [HashProjector; 12] = [
    HashProjector::Md5,
    HashProjector::Sha1,
    HashProjector::Sha224,
    HashProjector::Sha256,
    HashProjector::Sha384,
    HashProjector::Sha512,
    HashProjector::Sha3_224,
    HashProjector::Sha3_256,
    HashProjector::Sha3_384,
    HashProjector::Sha3_512,
    HashProjector::Blake2b512,
    HashProjector::Blake2s256,
];

/// A deterministic, fixed-output-length digest function used to derive one
/// bucket per item.
///
/// These are used purely for their dispersion; no cryptographic property of the
/// filter depends on them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HashProjector {
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    Sha3_224,
    Sha3_256,
    Sha3_384,
    Sha3_512,
    Blake2b512,
    Blake2s256,
}

impl HashProjector {
    /// The first `k` entries of [`PROJECTORS`], or `None` if the table holds
    /// fewer than `k` projectors.
    pub fn first(k: usize) -> Option<&'static [HashProjector]> {
        PROJECTORS.get(..k)
    }

    /// The conventional name of the digest algorithm.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha224 => "sha224",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
            Self::Sha3_224 => "sha3_224",
            Self::Sha3_256 => "sha3_256",
            Self::Sha3_384 => "sha3_384",
            Self::Sha3_512 => "sha3_512",
            Self::Blake2b512 => "blake2b",
            Self::Blake2s256 => "blake2s",
        }
    }

    /// Digest `data`.
    pub fn digest(&self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::Md5 => Md5::digest(data).to_vec(),
            Self::Sha1 => Sha1::digest(data).to_vec(),
            Self::Sha224 => Sha224::digest(data).to_vec(),
            Self::Sha256 => Sha256::digest(data).to_vec(),
            Self::Sha384 => Sha384::digest(data).to_vec(),
            Self::Sha512 => Sha512::digest(data).to_vec(),
            Self::Sha3_224 => Sha3_224::digest(data).to_vec(),
            Self::Sha3_256 => Sha3_256::digest(data).to_vec(),
            Self::Sha3_384 => Sha3_384::digest(data).to_vec(),
            Self::Sha3_512 => Sha3_512::digest(data).to_vec(),
            Self::Blake2b512 => Blake2b512::digest(data).to_vec(),
            Self::Blake2s256 => Blake2s256::digest(data).to_vec(),
        }
    }

    /// Map `data` to a bucket in `[0, m)`.
    ///
    /// `m` must be non-zero.
    pub fn bucket(&self, data: &[u8], m: usize) -> usize {
        reduce_be(&self.digest(data), m)
    }
}

/// Interpret `bytes` as a big-endian unsigned integer and return it modulo
/// `m`.
///
/// The accumulator stays below `m` after every step, so shifting in one more
/// byte never exceeds 72 bits.
fn reduce_be(bytes: &[u8], m: usize) -> usize {
    debug_assert!(m > 0);
    let m = m as u128;

    bytes
        .iter()
        .fold(0_u128, |acc, &byte| ((acc << 8) | byte as u128) % m) as usize
}

/// Reduce a value to the stable byte sequence that is hashed to derive its
/// buckets.
///
/// Two equal values must always produce the same bytes, on every platform and
/// in every build. The implementations provided by this crate are:
///
/// | Type | Canonical bytes |
/// |---|---|
/// | `str`, `String`, `Cow<str>` | the UTF-8 encoding |
/// | `char` | the UTF-8 encoding of the single character |
/// | integers | the UTF-8 encoding of the decimal form, e.g. `-42` |
/// | `bool` | `true` or `false` |
/// | `[u8]`, `[u8; N]`, `Vec<u8>` | the bytes themselves |
///
/// Note the integer `42` and the string `"42"` therefore share their buckets.
///
/// Implement this trait for application types to make them insertable:
///
/// ```rust
/// use std::borrow::Cow;
/// use bitbloom::{CanonicalBytes, MembershipFilter};
///
/// struct User {
///     id: u64,
/// }
///
/// impl CanonicalBytes for User {
///     fn canonical_bytes(&self) -> Cow<'_, [u8]> {
///         Cow::Owned(format!("user:{}", self.id).into_bytes())
///     }
/// }
///
/// let mut filter = MembershipFilter::new(100, 0.01)?;
/// filter.put(&User { id: 42 });
/// assert!(filter.may_contain(&User { id: 42 }));
/// # Ok::<(), bitbloom::Error>(())
/// ```
pub trait CanonicalBytes {
    /// Return the canonical byte form of `self`.
    fn canonical_bytes(&self) -> Cow<'_, [u8]>;
}

impl CanonicalBytes for str {
    fn canonical_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_bytes())
    }
}

impl CanonicalBytes for String {
    fn canonical_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_bytes())
    }
}

impl CanonicalBytes for Cow<'_, str> {
    fn canonical_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_bytes())
    }
}

impl CanonicalBytes for char {
    fn canonical_bytes(&self) -> Cow<'_, [u8]> {
        let mut buf = [0; 4];
        Cow::Owned(self.encode_utf8(&mut buf).as_bytes().to_vec())
    }
}

impl CanonicalBytes for bool {
    fn canonical_bytes(&self) -> Cow<'_, [u8]> {
        let s: &'static str = if *self { "true" } else { "false" };
        Cow::Borrowed(s.as_bytes())
    }
}

impl CanonicalBytes for [u8] {
    fn canonical_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self)
    }
}

impl<const N: usize> CanonicalBytes for [u8; N] {
    fn canonical_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_slice())
    }
}

impl CanonicalBytes for Vec<u8> {
    fn canonical_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_slice())
    }
}

impl<T: CanonicalBytes + ?Sized> CanonicalBytes for &T {
    fn canonical_bytes(&self) -> Cow<'_, [u8]> {
        (**self).canonical_bytes()
    }
}

impl<T: CanonicalBytes + ?Sized> CanonicalBytes for Box<T> {
    fn canonical_bytes(&self) -> Cow<'_, [u8]> {
        (**self).canonical_bytes()
    }
}

macro_rules! impl_canonical_decimal {
    ($($t:ty),+) => {
        $(
            impl CanonicalBytes for $t {
                fn canonical_bytes(&self) -> Cow<'_, [u8]> {
                    Cow::Owned(self.to_string().into_bytes())
                }
            }
        )+
    };
}

impl_canonical_decimal!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);
