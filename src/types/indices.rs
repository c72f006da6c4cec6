//! Strongly-typed index newtypes.
//!
//! These types keep field indices, postprocessor indices, and microscale
//! node indices from being mixed up at call sites.

use std::fmt;

/// Macro to generate index newtypes with common functionality.
macro_rules! define_index {
    (
        $(#[$meta:meta])*
        $name:ident, $display_prefix:literal
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(transparent)]
        pub struct $name(usize);

        impl $name {
            /// Create a new index.
            #[inline]
            pub const fn new(index: usize) -> Self {
                Self(index)
            }

            /// Get the raw index value.
            #[inline]
            pub const fn get(self) -> usize {
                self.0
            }

            /// First index (0).
            pub const ZERO: Self = Self(0);
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, self.0)
            }
        }

        impl From<usize> for $name {
            #[inline]
            fn from(index: usize) -> Self {
                Self(index)
            }
        }

        impl From<$name> for usize {
            #[inline]
            fn from(idx: $name) -> usize {
                idx.0
            }
        }

        // Allow using as slice index
        impl<T> std::ops::Index<$name> for [T] {
            type Output = T;
            #[inline]
            fn index(&self, idx: $name) -> &T {
                &self[idx.0]
            }
        }

        impl<T> std::ops::IndexMut<$name> for [T] {
            #[inline]
            fn index_mut(&mut self, idx: $name) -> &mut T {
                &mut self[idx.0]
            }
        }

        impl<T> std::ops::Index<$name> for Vec<T> {
            type Output = T;
            #[inline]
            fn index(&self, idx: $name) -> &T {
                &self[idx.0]
            }
        }

        impl<T> std::ops::IndexMut<$name> for Vec<T> {
            #[inline]
            fn index_mut(&mut self, idx: $name) -> &mut T {
                &mut self[idx.0]
            }
        }
    };
}

define_index!(
    /// Index of a field in the host's per-point field table.
    ///
    /// The host assigns one stable index per field; Jacobian contributions
    /// are routed to matrix columns by this index.
    ///
    /// # Example
    ///
    /// ```
    /// use fe_kernels::types::FieldId;
    ///
    /// let temperature = FieldId::new(3);
    /// assert_eq!(temperature.get(), 3);
    /// ```
    FieldId,
    "F"
);

define_index!(
    /// Index of a scalar postprocessor value supplied by the host.
    PostprocessorId,
    "P"
);

define_index!(
    /// Node index on a 1-D microscale fictitious mesh.
    ///
    /// # Example
    ///
    /// ```
    /// use fe_kernels::types::MicroNodeIndex;
    ///
    /// let node = MicroNodeIndex::new(2);
    /// assert_eq!(node.get(), 2);
    /// ```
    MicroNodeIndex,
    "N"
);

impl FieldId {
    /// Create an iterator over [0, n) field indices.
    pub fn iter(n: usize) -> impl ExactSizeIterator<Item = FieldId> {
        (0..n).map(FieldId)
    }
}

impl MicroNodeIndex {
    /// Node above this one, if it exists on a mesh of `num_nodes` nodes.
    #[inline]
    pub fn upper(self, num_nodes: usize) -> Option<Self> {
        (self.0 + 1 < num_nodes).then_some(Self(self.0 + 1))
    }

    /// Node below this one, if it exists.
    #[inline]
    pub fn lower(self) -> Option<Self> {
        self.0.checked_sub(1).map(Self)
    }
}
