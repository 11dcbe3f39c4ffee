//! Strongly typed zone-system keys.
//!
//! Zone numbers, planning-district numbers and region numbers are all plain
//! integers in the input files, and mixing them up is an easy mistake to make
//! when building aggregation indexes.  Wrapping each in its own type lets the
//! compiler catch a planning district being looked up in a zone index.
//!
//! None of these are dense positions: a `ZoneNumber(4021)` says nothing about
//! where the zone sits in a matrix.  Use a [`SparseIndex`](crate::SparseIndex)
//! to get the flat position.

use std::fmt;

use crate::OdError;

/// Key type usable in a [`SparseIndex`](crate::SparseIndex).
///
/// `missing` builds the error reported when the key has no flat position, so
/// each key type surfaces its own "unknown X" message.
pub trait IndexKey: Copy + Ord + std::hash::Hash + fmt::Debug + fmt::Display + Send + Sync + 'static {
    fn missing(self) -> OdError;
}

/// Generate a typed key wrapper around a primitive integer.
macro_rules! typed_key {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty) => $err:ident;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        $vis struct $name(pub $inner);

        impl $name {
            /// The raw number as written in the input files.
            #[inline(always)]
            pub fn get(self) -> $inner {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$inner> for $name {
            #[inline(always)]
            fn from(n: $inner) -> $name {
                $name(n)
            }
        }

        impl IndexKey for $name {
            fn missing(self) -> OdError {
                OdError::$err(self)
            }
        }
    };
}

typed_key! {
    /// Externally meaningful zone number.  Arbitrary and non-contiguous.
    pub struct ZoneNumber(u32) => InvalidZone;
}

typed_key! {
    /// Planning-district number a zone belongs to.
    pub struct PlanningDistrict(u32) => InvalidDistrict;
}

typed_key! {
    /// Region number a zone belongs to.
    pub struct RegionNumber(u32) => InvalidRegion;
}
