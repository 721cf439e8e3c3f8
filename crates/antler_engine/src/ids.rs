//! Arena identifiers for the network graph.
//!
//! Alpha nodes, beta nodes, productions, tokens, and facts form a cyclic
//! graph. All five live in engine-owned arenas and refer to one another by
//! stable `u32` indices instead of references; removal tombstones the arena
//! slot without reclaiming it before engine teardown.

use std::fmt;

macro_rules! arena_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash)]
        pub(crate) struct $name(u32);

        impl $name {
            /// Builds an id from an arena position.
            ///
            /// # Panics
            ///
            /// Panics if the arena outgrows the `u32` index space.
            pub(crate) fn from_index(index: usize) -> Self {
                Self(u32::try_from(index).expect("arena index space exhausted"))
            }

            /// Returns the arena position.
            pub(crate) const fn idx(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }
    };
}

arena_id! {
    /// Identifier of a fact in the engine's fact arena.
    FactId
}

arena_id! {
    /// Identifier of an alpha node.
    AlphaId
}

arena_id! {
    /// Identifier of a beta node.
    BetaId
}

arena_id! {
    /// Identifier of a production node.
    ProductionId
}

arena_id! {
    /// Identifier of a token.
    TokenId
}
