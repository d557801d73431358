use core::num::NonZero;

// Narrow handles under test so the addressable-slot limit is reachable.
#[cfg(test)]
type Raw = u16;
#[cfg(not(test))]
type Raw = u32;

/// Names one slot of a [`NodeArena`](super::arena::NodeArena).
///
/// The slot number is stored plus one, leaving zero free as the niche for `Option<Handle>`.
/// A live handle sits in exactly one place: the root pointer or a single parent's child
/// list. It is `Copy` only so a child can be read out before the arena is borrowed mutably.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub(crate) struct Handle(NonZero<Raw>);

impl Handle {
    /// How many distinct slots a handle can name.
    pub(crate) const SLOTS: usize = Raw::MAX as usize;

    pub(crate) fn for_slot(slot: usize) -> Self {
        slot.checked_add(1)
            .and_then(|shifted| Raw::try_from(shifted).ok())
            .and_then(NonZero::new)
            .map_or_else(|| panic!("node slot {slot} exceeds the {} addressable slots", Self::SLOTS), Self)
    }

    #[inline]
    pub(crate) const fn slot(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use static_assertions::assert_eq_size;

    assert_eq_size!(Option<Handle>, Raw);

    #[test]
    fn last_addressable_slot() {
        assert_eq!(Handle::for_slot(0).slot(), 0);
        assert_eq!(Handle::for_slot(Handle::SLOTS - 1).slot(), Handle::SLOTS - 1);
    }

    #[test]
    #[should_panic(expected = "exceeds the 65535 addressable slots")]
    fn slot_past_the_range() {
        let _ = Handle::for_slot(Handle::SLOTS);
    }

    proptest! {
        #[test]
        fn slot_survives_the_offset(slot in 0..Handle::SLOTS) {
            prop_assert_eq!(Handle::for_slot(slot).slot(), slot);
        }
    }
}
