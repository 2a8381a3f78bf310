use std::any::Any;
use std::iter::FusedIterator;
use std::ops::Index;

use tracing::trace;

use super::{bitmask_for_key, index_for_key, Bitmap};
use crate::error::{Error, Result};

/// A fixed-length, heap-allocated bitset packing 8 bits into every byte.
///
/// This bitset requires `O(n / 8)` space and can be read and wrote to in
/// `O(1)` time. Bit `i` is stored in byte `i / 8` at offset `i % 8` (least
/// significant bit first); the unused high bits of the final byte are always
/// zero.
///
/// ```rust
/// use bitbloom::PackedBitSet;
///
/// let mut bits = PackedBitSet::new(10)?;
/// bits.set(2)?;
/// bits.set(5)?;
///
/// assert!(bits.get(2)?);
/// assert!(bits[5]);
/// assert!(!bits.get(0)?);
/// assert_eq!(bits.storage_units(), 2);
/// # Ok::<(), bitbloom::Error>(())
/// ```
///
/// Only single bits can be indexed. A range of bits has no unambiguous
/// representation, so range indexing is rejected at compile time:
///
/// ```compile_fail
/// use bitbloom::PackedBitSet;
///
/// let bits = PackedBitSet::new(10).unwrap();
/// let _ = &bits[0..4];
/// ```
///
/// The length is fixed at construction: there is no way to grow or shrink an
/// existing set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackedBitSet {
    len: usize,
    storage: Vec<u8>,
}

impl PackedBitSet {
    /// Construct an all-zero `PackedBitSet` holding `len` bits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `len` is zero.
    pub fn new(len: usize) -> Result<Self> {
        if len == 0 {
            return Err(Error::InvalidArgument(
                "bitset length must be positive".to_string(),
            ));
        }

        Ok(Self {
            len,
            storage: vec![0; len.div_ceil(u8::BITS as usize)],
        })
    }

    /// Return the value of bit `index`.
    pub fn get(&self, index: usize) -> Result<bool> {
        self.check_index(index)?;
        Ok(self.get_bit(index))
    }

    /// Set bit `index` to 1.
    pub fn set(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        self.set_bit(index);
        Ok(())
    }

    /// Set bit `index` to 0.
    pub fn clear(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        self.storage[index_for_key(index)] &= !bitmask_for_key(index);
        Ok(())
    }

    /// OR every bit of `other` into `self`.
    ///
    /// `other` is only read. On error neither operand is modified.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if `other` is not a `PackedBitSet` and
    /// [`Error::LengthMismatch`] if the two sets differ in length.
    pub fn combine_or<B: Bitmap>(&mut self, other: &B) -> Result<()> {
        let other = self.combine_operand(other)?;
        trace!(len = self.len, "combining bitsets with OR");

        for (a, b) in self.storage.iter_mut().zip(&other.storage) {
            *a |= b;
        }
        Ok(())
    }

    /// XOR every bit of `other` into `self`.
    ///
    /// Fails under the same conditions as [`combine_or`](Self::combine_or).
    pub fn combine_xor<B: Bitmap>(&mut self, other: &B) -> Result<()> {
        let other = self.combine_operand(other)?;
        trace!(len = self.len, "combining bitsets with XOR");

        for (a, b) in self.storage.iter_mut().zip(&other.storage) {
            *a ^= b;
        }
        Ok(())
    }

    /// The number of addressable bits.
    #[allow(clippy::len_without_is_empty)] // a set holds at least one bit
    pub fn len(&self) -> usize {
        self.len
    }

    /// The number of bytes backing the set, `ceil(len / 8)`.
    pub fn storage_units(&self) -> usize {
        self.storage.len()
    }

    /// The number of bits set to 1.
    pub fn count_ones(&self) -> usize {
        self.storage.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Memory held by this set: the backing bytes plus the fixed size of the
    /// struct itself.
    pub fn byte_size(&self) -> usize {
        self.storage.capacity() + std::mem::size_of_val(self)
    }

    /// Iterate over every bit in index order.
    pub fn iter(&self) -> BitIter<'_> {
        BitIter { bits: self, next: 0 }
    }

    /// Read bit `key`, which the caller guarantees is below `len`.
    #[inline]
    pub(crate) fn get_bit(&self, key: usize) -> bool {
        debug_assert!(key < self.len);
        self.storage[index_for_key(key)] & bitmask_for_key(key) != 0
    }

    /// Set bit `key`, which the caller guarantees is below `len`.
    #[inline]
    pub(crate) fn set_bit(&mut self, key: usize) {
        debug_assert!(key < self.len);
        self.storage[index_for_key(key)] |= bitmask_for_key(key);
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.len {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.len,
            });
        }
        Ok(())
    }

    /// Validate `other` as the right hand side of a combine operation.
    fn combine_operand<'a, B: Bitmap>(&self, other: &'a B) -> Result<&'a PackedBitSet> {
        let other = (other as &dyn Any)
            .downcast_ref::<PackedBitSet>()
            .ok_or(Error::TypeMismatch)?;

        if other.len != self.len {
            return Err(Error::LengthMismatch {
                expected: self.len,
                actual: other.len,
            });
        }

        Ok(other)
    }
}

impl Bitmap for PackedBitSet {
    fn set(&mut self, key: usize, value: bool) -> Result<()> {
        if value {
            PackedBitSet::set(self, key)
        } else {
            PackedBitSet::clear(self, key)
        }
    }

    fn get(&self, key: usize) -> Result<bool> {
        PackedBitSet::get(self, key)
    }

    fn byte_size(&self) -> usize {
        PackedBitSet::byte_size(self)
    }
}

/// Read a single bit.
///
/// # Panics
///
/// Panics if `index` is out of range, like slice indexing does. Use
/// [`PackedBitSet::get`] for a checked read.
impl Index<usize> for PackedBitSet {
    type Output = bool;

    fn index(&self, index: usize) -> &bool {
        match self.get(index) {
            Ok(true) => &true,
            Ok(false) => &false,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<'a> IntoIterator for &'a PackedBitSet {
    type Item = bool;
    type IntoIter = BitIter<'a>;

    fn into_iter(self) -> BitIter<'a> {
        self.iter()
    }
}

/// An iterator over the bits of a [`PackedBitSet`], see
/// [`PackedBitSet::iter`].
#[derive(Debug, Clone)]
pub struct BitIter<'a> {
    bits: &'a PackedBitSet,
    next: usize,
}

impl Iterator for BitIter<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        if self.next >= self.bits.len {
            return None;
        }

        let key = self.next;
        self.next += 1;
        Some(self.bits.get_bit(key))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.bits.len - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for BitIter<'_> {}

impl FusedIterator for BitIter<'_> {}
