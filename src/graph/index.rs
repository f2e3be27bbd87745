//! Index types for graph elements.
//!
//! Nodes, half-edges and faces live in flat arrays and reference each other by
//! integer index. The wrappers below keep those indices from being mixed up and
//! reserve `u32::MAX` as the "not assigned" sentinel.

use std::fmt::{self, Debug};

/// Raw value used for unassigned indices.
const INVALID: u32 = u32::MAX;

/// A type-safe node (point) index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct NodeId(u32);

/// A type-safe half-edge index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct HalfEdgeId(u32);

/// A type-safe face index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct FaceId(u32);

macro_rules! impl_index_type {
    ($name:ident, $display:literal) => {
        impl $name {
            /// Create a new index from a raw value.
            ///
            /// # Panics
            /// Panics in debug builds if the value does not fit below the sentinel.
            #[inline]
            pub fn new(index: usize) -> Self {
                debug_assert!(index < INVALID as usize, "index {} too large", index);
                Self(index as u32)
            }

            /// Create an invalid/null index.
            #[inline]
            pub const fn invalid() -> Self {
                Self(INVALID)
            }

            /// Get the index as `usize`.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Get the raw `u32` value.
            #[inline]
            pub fn raw(self) -> u32 {
                self.0
            }

            /// Check if this is a valid (non-null) index.
            #[inline]
            pub fn is_valid(self) -> bool {
                self.0 != INVALID
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}({})", $display, self.0)
                } else {
                    write!(f, "{}(INVALID)", $display)
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::invalid()
            }
        }

        impl From<usize> for $name {
            fn from(v: usize) -> Self {
                Self::new(v)
            }
        }
    };
}

impl_index_type!(NodeId, "N");
impl_index_type!(HalfEdgeId, "HE");
impl_index_type!(FaceId, "F");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id() {
        let n = NodeId::new(42);
        assert_eq!(n.index(), 42);
        assert_eq!(n.raw(), 42);
        assert!(n.is_valid());

        assert!(!NodeId::invalid().is_valid());
        assert_eq!(NodeId::default(), NodeId::invalid());
    }

    #[test]
    fn test_debug_format() {
        assert_eq!(format!("{:?}", NodeId::new(3)), "N(3)");
        assert_eq!(format!("{:?}", HalfEdgeId::new(7)), "HE(7)");
        assert_eq!(format!("{:?}", FaceId::invalid()), "F(INVALID)");
    }

    #[test]
    fn test_from_usize() {
        let f: FaceId = 5usize.into();
        assert_eq!(f.index(), 5);
    }
}
