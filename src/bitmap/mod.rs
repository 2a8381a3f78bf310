//! Bit storage for the backing store of a
//! [`MembershipFilter`](crate::MembershipFilter).

use std::any::Any;

use crate::error::Result;

mod packed;
pub use packed::*;

/// A trait to abstract fixed-length bit storage.
///
/// Implementations are addressed by a bit index in `[0, len)` and report an
/// [`Error::IndexOutOfRange`](crate::Error::IndexOutOfRange) for anything
/// outside it.
pub trait Bitmap: Any {
    /// Set bit indexed by `key` to `value`.
    fn set(&mut self, key: usize, value: bool) -> Result<()>;

    /// Return `true` if the given bit index was previously set to `true`.
    fn get(&self, key: usize) -> Result<bool>;

    /// Return the size of the bitmap in bytes.
    fn byte_size(&self) -> usize;
}

/// Index of the storage byte holding bit `key`.
#[inline(always)]
pub(crate) fn index_for_key(key: usize) -> usize {
    key / u8::BITS as usize
}

/// Mask selecting bit `key` within its storage byte.
#[inline(always)]
pub(crate) fn bitmask_for_key(key: usize) -> u8 {
    1 << (key % u8::BITS as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_layout() {
        assert_eq!(index_for_key(0), 0);
        assert_eq!(index_for_key(7), 0);
        assert_eq!(index_for_key(8), 1);
        assert_eq!(index_for_key(17), 2);

        assert_eq!(bitmask_for_key(0), 0b0000_0001);
        assert_eq!(bitmask_for_key(5), 0b0010_0000);
        assert_eq!(bitmask_for_key(15), 0b1000_0000);
    }
}
