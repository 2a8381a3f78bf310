use std::any::Any;

use tracing::debug;

use crate::bitmap::PackedBitSet;
use crate::error::{Error, Result};
use crate::hash::{CanonicalBytes, HashProjector, PROJECTORS};
use crate::params;

/// The false positive rate used when none is configured.
pub const DEFAULT_FALSE_POSITIVE_RATE: f64 = 0.03;

/// Construct [`MembershipFilter`] instances with varying parameters.
///
/// ```rust
/// use bitbloom::MembershipFilterBuilder;
///
/// let mut filter = MembershipFilterBuilder::new(10_000)
///                     .false_positive_rate(0.01)
///                     .build()?;
///
/// filter.put("success!");
/// # Ok::<(), bitbloom::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MembershipFilterBuilder {
    expected_insertions: usize,
    false_positive_rate: f64,
}

impl MembershipFilterBuilder {
    /// Initialise a builder sized for `expected_insertions` items that, unless
    /// changed, targets a false positive rate of
    /// [`DEFAULT_FALSE_POSITIVE_RATE`].
    pub fn new(expected_insertions: usize) -> Self {
        Self {
            expected_insertions,
            false_positive_rate: DEFAULT_FALSE_POSITIVE_RATE,
        }
    }

    /// Set the number of items the filter is sized for.
    pub fn expected_insertions(self, expected_insertions: usize) -> Self {
        Self {
            expected_insertions,
            ..self
        }
    }

    /// Set the target false positive probability, within `(0, 1)`.
    pub fn false_positive_rate(self, false_positive_rate: f64) -> Self {
        Self {
            false_positive_rate,
            ..self
        }
    }

    /// Derive the optimal bit length and projector count, and allocate the
    /// [`MembershipFilter`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the expected insertions are zero,
    /// the false positive rate is outside `(0, 1)`, or the configuration needs
    /// more hash projectors than the [`PROJECTORS`] table holds.
    pub fn build(self) -> Result<MembershipFilter> {
        let n = self.expected_insertions;
        let p = self.false_positive_rate;

        let m = params::optimal_num_bits(n, p)?;
        let k = params::optimal_num_hashes(n, m);

        let projectors = HashProjector::first(k).ok_or_else(|| {
            Error::InvalidArgument(format!(
                "a false positive rate of {p} needs {k} hash projectors, only {} are available",
                PROJECTORS.len()
            ))
        })?;

        debug!(
            expected_insertions = n,
            false_positive_rate = p,
            num_bits = m,
            num_hashes = k,
            "constructed membership filter"
        );

        Ok(MembershipFilter {
            expected_insertions: n,
            false_positive_rate: p,
            bit_set: PackedBitSet::new(m)?,
            projectors,
        })
    }
}

/// A Bloom filter over a [`PackedBitSet`], consulting `k` independent digest
/// functions per item.
///
/// Construct one with the expected number of insertions `n` and a target false
/// positive rate `p`; the bit length `m` and projector count `k` are derived
/// optimally (see [`params`](crate::params)) and never change afterwards.
///
/// ```rust
/// use bitbloom::MembershipFilter;
///
/// let mut filter = MembershipFilter::new(10_000, 0.01)?;
/// filter.put("hello");
/// filter.put("world");
///
/// assert!(filter.may_contain("hello"));
/// assert!(!filter.may_contain("goodbye")); // almost certainly
/// # Ok::<(), bitbloom::Error>(())
/// ```
///
/// Items are hashed through their [`CanonicalBytes`] form. The filter has a
/// one-sided error: an item that was [`put`](Self::put) is always reported
/// present, while an item that never was is reported present with a
/// probability of roughly [`expected_fpp`](Self::expected_fpp).
///
/// There is no removal: clearing a bit could erase other items sharing it.
#[derive(Debug, Clone, PartialEq)]
pub struct MembershipFilter {
    expected_insertions: usize,
    false_positive_rate: f64,
    bit_set: PackedBitSet,
    projectors: &'static [HashProjector],
}

impl MembershipFilter {
    /// Construct a filter sized for `expected_insertions` items at a false
    /// positive rate of `false_positive_rate`.
    ///
    /// See [`MembershipFilterBuilder::build`] for the possible errors.
    pub fn new(expected_insertions: usize, false_positive_rate: f64) -> Result<Self> {
        MembershipFilterBuilder::new(expected_insertions)
            .false_positive_rate(false_positive_rate)
            .build()
    }

    /// Construct a filter sized for `expected_insertions` items at the
    /// [`DEFAULT_FALSE_POSITIVE_RATE`].
    pub fn with_expected_insertions(expected_insertions: usize) -> Result<Self> {
        MembershipFilterBuilder::new(expected_insertions).build()
    }

    /// Return a [`MembershipFilterBuilder`] for `expected_insertions` items.
    pub fn builder(expected_insertions: usize) -> MembershipFilterBuilder {
        MembershipFilterBuilder::new(expected_insertions)
    }

    /// Put `item` into the filter.
    ///
    /// Any subsequent call to [`may_contain`](Self::may_contain) for an equal
    /// item will return true. Putting the same item twice is a no-op.
    pub fn put<T>(&mut self, item: &T)
    where
        T: CanonicalBytes + ?Sized,
    {
        let bytes = item.canonical_bytes();
        let m = self.bit_set.len();

        for projector in self.projectors {
            self.bit_set.set_bit(projector.bucket(&bytes, m));
        }
    }

    /// Checks if `item` may have been put in the filter.
    ///
    /// If `may_contain` returns false, `item` has **definitely not** been put.
    /// If it returns true, `item` has **probably** been put.
    pub fn may_contain<T>(&self, item: &T) -> bool
    where
        T: CanonicalBytes + ?Sized,
    {
        let bytes = item.canonical_bytes();
        let m = self.bit_set.len();

        self.projectors
            .iter()
            .all(|projector| self.bit_set.get_bit(projector.bucket(&bytes, m)))
    }

    /// An alias of [`may_contain`](Self::may_contain), for uniformity with
    /// other collections.
    pub fn contains<T>(&self, item: &T) -> bool
    where
        T: CanonicalBytes + ?Sized,
    {
        self.may_contain(item)
    }

    /// The modelled probability that [`may_contain`](Self::may_contain)
    /// returns true for an item never put, once the filter holds
    /// [`expected_insertions`](Self::expected_insertions) items.
    ///
    /// This depends only on the construction parameters, not on the items
    /// actually put. In particular it is not adjusted by
    /// [`merge`](Self::merge): a merged filter is denser than this estimate
    /// suggests.
    pub fn expected_fpp(&self) -> f64 {
        params::false_positive_probability(
            self.expected_insertions,
            self.num_bits(),
            self.num_hashes(),
        )
    }

    /// Returns true if `other` is a distinct `MembershipFilter` with the same
    /// bit length and number of hash projectors, and can therefore be
    /// [merged](Self::merge) into this one.
    ///
    /// The expected insertions and false positive rate of the two filters may
    /// differ. Never fails: anything that is not a filter, or is this very
    /// filter, is simply incompatible.
    ///
    /// Pass filters by direct reference (`&filter`). The argument must be
    /// `'static` to be viewed as [`Any`], so a reference to a borrowed filter
    /// such as `&&filter` does not compile:
    ///
    /// ```compile_fail
    /// use bitbloom::MembershipFilter;
    ///
    /// let a = MembershipFilter::new(100, 0.01).unwrap();
    /// let b = MembershipFilter::new(100, 0.01).unwrap();
    /// let b_ref = &b;
    /// a.is_compatible(&b_ref);
    /// ```
    pub fn is_compatible(&self, other: &dyn Any) -> bool {
        let Some(other) = other.downcast_ref::<MembershipFilter>() else {
            return false;
        };

        !std::ptr::eq(self, other)
            && self.num_hashes() == other.num_hashes()
            && self.num_bits() == other.num_bits()
    }

    /// Merge `other` into this filter by OR-ing their bit sets.
    ///
    /// Afterwards this filter reports every item present in either filter.
    /// `other` is left unmodified. This is a union of membership, not of
    /// counts: [`expected_insertions`](Self::expected_insertions) and
    /// [`expected_fpp`](Self::expected_fpp) keep reporting this filter's own
    /// construction parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompatibleFilter`] if the filters are not
    /// [compatible](Self::is_compatible), in which case neither is modified.
    pub fn merge(&mut self, other: &MembershipFilter) -> Result<()> {
        if !self.is_compatible(other) {
            return Err(Error::IncompatibleFilter(format!(
                "cannot merge a filter of {} bits and {} projectors into one of {} bits and {} \
                 projectors",
                other.num_bits(),
                other.num_hashes(),
                self.num_bits(),
                self.num_hashes()
            )));
        }

        self.bit_set.combine_or(&other.bit_set)?;

        debug!(
            num_bits = self.num_bits(),
            num_hashes = self.num_hashes(),
            "merged membership filter"
        );
        Ok(())
    }

    /// The number of items this filter was sized for (`n`).
    pub fn expected_insertions(&self) -> usize {
        self.expected_insertions
    }

    /// The false positive rate this filter was sized for (`p`).
    pub fn false_positive_rate(&self) -> f64 {
        self.false_positive_rate
    }

    /// The length of the underlying bit set (`m`).
    pub fn num_bits(&self) -> usize {
        self.bit_set.len()
    }

    /// The number of hash projectors consulted per item (`k`).
    pub fn num_hashes(&self) -> usize {
        self.projectors.len()
    }

    /// The hash projectors in use, the first `k` entries of [`PROJECTORS`].
    pub fn projectors(&self) -> &[HashProjector] {
        self.projectors
    }

    /// The underlying bit set.
    pub fn bit_set(&self) -> &PackedBitSet {
        &self.bit_set
    }

    /// The fraction of bits currently set.
    ///
    /// Values approaching 0.5 mean the filter holds around the number of items
    /// it was sized for; beyond that the false positive rate degrades quickly.
    pub fn load_factor(&self) -> f64 {
        self.bit_set.count_ones() as f64 / self.num_bits() as f64
    }

    /// Return the byte size of this filter.
    pub fn byte_size(&self) -> usize {
        self.bit_set.byte_size() + std::mem::size_of_val(self) - std::mem::size_of::<PackedBitSet>()
    }
}

/// Put every item yielded by the iterator.
impl<'a, T> Extend<&'a T> for MembershipFilter
where
    T: CanonicalBytes + ?Sized + 'a,
{
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        for item in iter {
            self.put(item);
        }
    }
}
