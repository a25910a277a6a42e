//! Invalidation policy.
//!
//! A cached value is a function of its own item plus a window of neighbors.
//! The policy says how wide that window is and how aggressively moves are
//! treated; the invalidator reads nothing else.

/// How many neighbors a cached value reads on each side.
///
/// A value at position `p` depends on items `p - before ..= p + after`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Neighborhood {
    /// Number of previous items the value reads.
    pub before: usize,
    /// Number of following items the value reads.
    pub after: usize,
}

impl Neighborhood {
    /// Values that depend on their own item only.
    pub const NONE: Neighborhood = Neighborhood { before: 0, after: 0 };

    /// Values that read `radius` items on both sides.
    pub const fn radius(radius: usize) -> Neighborhood {
        return Neighborhood { before: radius, after: radius };
    }

    pub const fn new(before: usize, after: usize) -> Neighborhood {
        return Neighborhood { before, after };
    }

    pub fn is_none(&self) -> bool {
        return self.before == 0 && self.after == 0;
    }
}

impl Default for Neighborhood {
    /// `(previous, item, next)`.
    fn default() -> Neighborhood {
        return Neighborhood::radius(1);
    }
}

/// What a `Moved` update does besides relocating the slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MoveInvalidation {
    /// Keep every value, including the moved one. Neighbors whose rendering
    /// changes are expected to be reported as `Changed` by the differ.
    #[default]
    Preserve,
    /// Treat the move like a removal followed by an insertion: invalidate
    /// the neighbors of the vacated and the destination positions, and the
    /// moved slot itself.
    Around,
}

/// Configuration of a [`CacheInvalidator`](crate::invalidator::CacheInvalidator).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct InvalidationPolicy {
    pub neighborhood: Neighborhood,
    pub moves: MoveInvalidation,
}

impl InvalidationPolicy {
    pub fn new() -> InvalidationPolicy {
        return InvalidationPolicy::default();
    }

    pub fn with_neighborhood(mut self, neighborhood: Neighborhood) -> InvalidationPolicy {
        self.neighborhood = neighborhood;
        return self;
    }

    /// Shorthand for a symmetric neighborhood.
    pub fn with_radius(self, radius: usize) -> InvalidationPolicy {
        return self.with_neighborhood(Neighborhood::radius(radius));
    }

    pub fn with_moves(mut self, moves: MoveInvalidation) -> InvalidationPolicy {
        self.moves = moves;
        return self;
    }
}
