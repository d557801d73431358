use core::num::NonZero;

use crate::MIN_ORDER;
use crate::error::{Error, Result};

/// A validated branching factor.
///
/// A node may transiently hold `order` keys during an insertion; at rest it holds at most
/// `order - 1`. Non-root nodes hold at least `(order - 1) / 2`, which is the smaller half a
/// split of `order` keys can produce.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub(crate) struct Order(NonZero<usize>);

impl Order {
    pub(crate) fn new(order: usize) -> Result<Self> {
        NonZero::new(order)
            .filter(|_| order >= MIN_ORDER)
            .map(Self)
            .ok_or(Error::InvalidOrder { order })
    }

    #[inline]
    pub(crate) const fn get(self) -> usize {
        self.0.get()
    }

    /// Largest key count a node may keep once an operation has returned.
    #[inline]
    pub(crate) const fn max_keys(self) -> usize {
        self.get() - 1
    }

    /// Smallest key count a non-root node may keep once an operation has returned.
    #[inline]
    pub(crate) const fn min_keys(self) -> usize {
        (self.get() - 1) / 2
    }

    /// Position of the median promoted when a node holding `len` keys splits.
    ///
    /// Even counts round down so the left half is never the larger one.
    #[inline]
    pub(crate) const fn split_index(len: usize) -> usize {
        let mid = len / 2;
        if len % 2 == 0 { mid - 1 } else { mid }
    }
}
