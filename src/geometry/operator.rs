//! Directional geometry operator algebra
//!
//! Sixteen bounding-box relations: the twelve operators of the 2D GiST
//! geometry operator class plus four commuted forms that have no operator of
//! their own (`box &< row` written with the row on the left).
//!
//! Three constant tables drive everything:
//! - the rendering symbol of each operator,
//! - the commutator (operand order swapped),
//! - the pushdown map keyed by `(operator, negated)`: the relation that the
//!   *containing* catalog footprint must satisfy against the query box for
//!   any row inside it to satisfy the original relation. Entries without a
//!   sound single-operator rewrite are `None`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of operators including commuted forms
pub const NUM_OPERATORS: usize = 16;

/// Number of operators that exist in the catalog database
pub const NUM_REAL_OPERATORS: usize = 12;

/// Directional bounding-box relation between a row footprint and a query box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeomOperator {
    Overlaps = 0,
    Contains = 1,
    Within = 2,
    Same = 3,
    Overleft = 4,
    Overright = 5,
    Overabove = 6,
    Overbelow = 7,
    Left = 8,
    Right = 9,
    Above = 10,
    Below = 11,
    CommLeft = 12,
    CommRight = 13,
    CommAbove = 14,
    CommBelow = 15,
}

use GeomOperator::*;

const ALL: [GeomOperator; NUM_OPERATORS] = [
    Overlaps, Contains, Within, Same, Overleft, Overright, Overabove, Overbelow, Left, Right,
    Above, Below, CommLeft, CommRight, CommAbove, CommBelow,
];

const SYMBOLS: [&str; NUM_OPERATORS] = [
    "&&", "~", "@", "~=", "&<", "&>", "|&>", "&<|", "<<", ">>", "|>>", "<<|",
    // commuted forms reuse the symbol with operands swapped
    "&<", "&>", "|&>", "&<|",
];

const COMMUTATORS: [GeomOperator; NUM_OPERATORS] = [
    Overlaps,  // Overlaps
    Within,    // Contains
    Contains,  // Within
    Same,      // Same
    CommLeft,  // Overleft
    CommRight, // Overright
    CommAbove, // Overabove
    CommBelow, // Overbelow
    Right,     // Left
    Left,      // Right
    Below,     // Above
    Above,     // Below
    Overleft,  // CommLeft
    Overright, // CommRight
    Overabove, // CommAbove
    Overbelow, // CommBelow
];

const fn rewrite(op: GeomOperator, negated: bool) -> Option<GeomPredicate> {
    Some(GeomPredicate { op, negated })
}

/// Indexed by `op as usize + if negated { 16 } else { 0 }`
const PUSHDOWN: [Option<GeomPredicate>; 2 * NUM_OPERATORS] = [
    rewrite(Overlaps, false),  // Overlaps
    rewrite(Contains, false),  // Contains
    rewrite(Overlaps, false),  // Within
    rewrite(Contains, false),  // Same
    rewrite(Right, true),      // Overleft
    rewrite(Left, true),       // Overright
    rewrite(Below, true),      // Overabove
    rewrite(Above, true),      // Overbelow
    rewrite(Overright, true),  // Left
    rewrite(Overleft, true),   // Right
    rewrite(Overbelow, true),  // Above
    rewrite(Overabove, true),  // Below
    rewrite(CommLeft, false),  // CommLeft
    rewrite(CommRight, false), // CommRight
    rewrite(CommAbove, false), // CommAbove
    rewrite(CommBelow, false), // CommBelow
    // negated
    rewrite(Within, true),    // NOT Overlaps
    None,                     // NOT Contains
    rewrite(Within, true),    // NOT Within
    None,                     // NOT Same
    rewrite(Overleft, true),  // NOT Overleft
    rewrite(Overright, true), // NOT Overright
    rewrite(Overabove, true), // NOT Overabove
    rewrite(Overbelow, true), // NOT Overbelow
    rewrite(Left, true),      // NOT Left
    rewrite(Right, true),     // NOT Right
    rewrite(Above, true),     // NOT Above
    rewrite(Below, true),     // NOT Below
    None,                     // NOT CommLeft
    None,                     // NOT CommRight
    None,                     // NOT CommAbove
    None,                     // NOT CommBelow
];

impl GeomOperator {
    /// All sixteen operators in table order
    pub fn all() -> &'static [GeomOperator; NUM_OPERATORS] {
        &ALL
    }

    /// Operators that have a catalog-side operator id
    pub fn real() -> &'static [GeomOperator] {
        &ALL[..NUM_REAL_OPERATORS]
    }

    /// Table index of this operator
    pub fn index(self) -> usize {
        self as usize
    }

    /// Rendering symbol
    pub fn symbol(self) -> &'static str {
        SYMBOLS[self.index()]
    }

    /// Operator to use when the operands are swapped
    pub fn commute(self) -> GeomOperator {
        COMMUTATORS[self.index()]
    }

    /// True for the four commuted forms, which render with the query
    /// operand on the left
    pub fn is_commuted(self) -> bool {
        self.index() >= NUM_REAL_OPERATORS
    }

    /// Looks up a real operator by symbol
    pub fn from_symbol(symbol: &str) -> Option<GeomOperator> {
        Self::real().iter().copied().find(|op| op.symbol() == symbol)
    }
}

impl fmt::Display for GeomOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// An operator together with a logical negation flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeomPredicate {
    pub op: GeomOperator,
    pub negated: bool,
}

/// Result of rewriting a row-level predicate for the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pushdown {
    /// Catalog footprint must satisfy this predicate
    Rewrite(GeomPredicate),
    /// No single catalog predicate is implied; the row-level check stays
    NotRepresentable,
}

impl Pushdown {
    /// Returns the rewritten predicate, if any
    pub fn predicate(&self) -> Option<GeomPredicate> {
        match self {
            Pushdown::Rewrite(p) => Some(*p),
            Pushdown::NotRepresentable => None,
        }
    }
}

impl GeomPredicate {
    pub const fn new(op: GeomOperator, negated: bool) -> Self {
        Self { op, negated }
    }

    pub const fn positive(op: GeomOperator) -> Self {
        Self::new(op, false)
    }

    pub const fn negative(op: GeomOperator) -> Self {
        Self::new(op, true)
    }

    /// Same relation with the operands swapped
    pub fn commute(self) -> Self {
        Self::new(self.op.commute(), self.negated)
    }

    /// Logical negation
    pub fn negate(self) -> Self {
        Self::new(self.op, !self.negated)
    }

    /// Rewrites `row <op> box` into the relation the catalog footprint of the
    /// containing file must satisfy
    pub fn pushdown(self) -> Pushdown {
        let mut idx = self.op.index();
        if self.negated {
            idx += NUM_OPERATORS;
        }
        match PUSHDOWN[idx] {
            Some(p) => Pushdown::Rewrite(p),
            None => Pushdown::NotRepresentable,
        }
    }
}

impl fmt::Display for GeomPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "NOT {}", self.op)
        } else {
            write!(f, "{}", self.op)
        }
    }
}
