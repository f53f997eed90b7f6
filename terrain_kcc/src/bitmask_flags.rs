use num_traits::{One, PrimInt};

/// Trait implemented by flag enums declared with [`define_bitmask_flags!`].
///
/// The enum's discriminant (via `#[repr(u8)]`) is the bit index.
pub trait FlagBitmask {
    type Storage: PrimInt;

    fn bit_index(&self) -> u8;

    fn mask(&self) -> Self::Storage {
        // `bit_index()` must be < number of bits in `Storage`.
        Self::Storage::one() << (self.bit_index() as usize)
    }
}

/// A plain bitmask container over any primitive integer.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BitmaskFlags<T: PrimInt> {
    pub bits: T,
}

impl<T: PrimInt> BitmaskFlags<T> {
    pub fn new(bits: T) -> Self {
        Self { bits }
    }

    /// Build from a list of flags.
    pub fn from_flags<U: FlagBitmask<Storage = T> + Copy>(tags: &[U]) -> Self {
        let mut flags = Self::new(T::zero());
        flags.add_many(tags);
        flags
    }

    // --- Single Tag Operations ---
    pub fn add<U: FlagBitmask<Storage = T>>(&mut self, tag: U) {
        self.bits = self.bits | tag.mask();
    }

    pub fn remove<U: FlagBitmask<Storage = T>>(&mut self, tag: U) {
        self.bits = self.bits & !tag.mask();
    }

    pub fn has<U: FlagBitmask<Storage = T>>(&self, tag: U) -> bool {
        (self.bits & tag.mask()) != T::zero()
    }

    // --- Bulk Operations ---
    pub fn add_many<U: FlagBitmask<Storage = T> + Copy>(&mut self, tags: &[U]) {
        for &tag in tags {
            self.add(tag);
        }
    }

    // --- Edge Detection ---
    /// Flags set in `self` but not in `previous`.
    pub fn rising(&self, previous: &Self) -> Self {
        Self::new(self.bits & !previous.bits)
    }

    pub fn has_any<U: FlagBitmask<Storage = T> + Copy>(&self, tags: &[U]) -> bool {
        let combined = tags.iter().fold(T::zero(), |acc, t| acc | t.mask());
        (self.bits & combined) != T::zero()
    }

    pub fn clear(&mut self) {
        self.bits = T::zero();
    }
}

/// Declare a bitmask-backed enum and implement `FlagBitmask` for it.
///
/// Example:
/// ```text
/// define_bitmask_flags!(InputButton, u16, {
///     Forward,
///     Back,
///     Jump,
/// });
/// ```
#[macro_export]
macro_rules! define_bitmask_flags {
    ($name:ident, $storage:ty, { $($variant:ident),* $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum $name {
            $($variant),*
        }

        impl $crate::bitmask_flags::FlagBitmask for $name {
            type Storage = $storage;

            fn bit_index(&self) -> u8 {
                *self as u8
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    define_bitmask_flags!(Probe, u8, { A, B, C });

    #[test]
    fn add_remove_has() {
        let mut flags = BitmaskFlags::<u8>::default();
        flags.add(Probe::A);
        flags.add(Probe::C);
        assert!(flags.has(Probe::A));
        assert!(!flags.has(Probe::B));
        assert_eq!(flags.bits, 0b101);
        flags.remove(Probe::A);
        assert!(!flags.has(Probe::A));
        assert!(flags.has_any(&[Probe::B, Probe::C]));
        flags.clear();
        assert_eq!(flags.bits, 0);
    }

    #[test]
    fn rising_keeps_newly_set_flags_only() {
        let previous = BitmaskFlags::from_flags(&[Probe::A, Probe::B]);
        let current = BitmaskFlags::from_flags(&[Probe::B, Probe::C]);
        let rising = current.rising(&previous);
        assert!(rising.has(Probe::C));
        assert!(!rising.has(Probe::B));
        assert!(!rising.has(Probe::A));
    }
}
