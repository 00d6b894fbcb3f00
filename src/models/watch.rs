use std::fmt;

use rust_decimal::Decimal;

/// Stock code as listed on the exchange (e.g. 8267).
pub type Code = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// "over": fires once the price reaches the threshold from below.
    AtOrAbove,
    /// "under": fires once the price drops to the threshold.
    AtOrBelow,
}

impl Direction {
    pub const OVER: &'static str = "over";
    pub const UNDER: &'static str = "under";

    /// Parse the literal stored in the watch list's `trigger` column.
    pub fn from_literal(s: &str) -> Option<Self> {
        match s.trim() {
            Self::OVER => Some(Direction::AtOrAbove),
            Self::UNDER => Some(Direction::AtOrBelow),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> &'static str {
        match self {
            Direction::AtOrAbove => Self::OVER,
            Direction::AtOrBelow => Self::UNDER,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_literal())
    }
}

/// One validated row of the watch list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEntry {
    pub code: Code,
    pub threshold_price: Decimal,
    pub direction: Direction,
}

impl WatchEntry {
    pub fn threshold(&self) -> Threshold {
        Threshold {
            direction: self.direction,
            price: self.threshold_price,
        }
    }
}

/// Trigger predicate bound to one code's stored direction and price.
/// Both directions are inclusive at equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Threshold {
    pub direction: Direction,
    pub price: Decimal,
}

impl Threshold {
    pub fn new(direction: Direction, price: Decimal) -> Self {
        Self { direction, price }
    }

    pub fn is_triggered(&self, current: Decimal) -> bool {
        match self.direction {
            Direction::AtOrAbove => current - self.price >= Decimal::ZERO,
            Direction::AtOrBelow => self.price - current >= Decimal::ZERO,
        }
    }
}
