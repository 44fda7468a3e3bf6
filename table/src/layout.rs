//! Table regions and where they sit on the board.
//!
//! Numbers 1..=36 are laid out in twelve columns of three rows with
//! `n % 3 == 1` on the top row, `n % 3 == 2` in the middle and multiples of
//! three on the bottom. "0" spans the full height to the left of the grid.

use std::fmt;

use crate::geometry::{Point, Rect};

/// Highest number on the table.
pub const MAX_NUMBER: u8 = 36;

/// Red numbers on a roulette table.
pub const RED_NUMBERS: [u8; 18] = [1, 3, 5, 7, 9, 12, 14, 16, 18, 19, 21, 23, 25, 27, 30, 32, 34, 36];

/// Check if a number is red.
pub fn is_red(number: u8) -> bool {
    RED_NUMBERS.contains(&number)
}

/// Pocket colour of a number (0 is green).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pocket {
    Green,
    Red,
    Black,
}

pub fn pocket(number: u8) -> Pocket {
    match number {
        0 => Pocket::Green,
        n if is_red(n) => Pocket::Red,
        _ => Pocket::Black,
    }
}

/// Column selector ("row" on this layout, since columns run horizontally).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    First,
    Second,
    Third,
}

impl Column {
    pub const ALL: [Column; 3] = [Column::First, Column::Second, Column::Third];

    /// `n % 3` shared by every number in the column.
    pub const fn residue(self) -> u8 {
        match self {
            Column::First => 1,
            Column::Second => 2,
            Column::Third => 0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dozen {
    First,
    Second,
    Third,
}

impl Dozen {
    pub const ALL: [Dozen; 3] = [Dozen::First, Dozen::Second, Dozen::Third];

    pub const fn bounds(self) -> (u8, u8) {
        match self {
            Dozen::First => (1, 12),
            Dozen::Second => (13, 24),
            Dozen::Third => (25, 36),
        }
    }
}

/// Even-money selectors, in the order they are drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Special {
    Low,
    Even,
    Red,
    Black,
    Odd,
    High,
}

impl Special {
    pub const ALL: [Special; 6] = [
        Special::Low,
        Special::Even,
        Special::Red,
        Special::Black,
        Special::Odd,
        Special::High,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RegionKind {
    NumberCell,
    RowSelector,
    SectionSelector,
    SpecialSelector,
}

/// A labeled area of the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TableRegion {
    Number(u8),
    Row(Column),
    Section(Dozen),
    Special(Special),
}

impl TableRegion {
    pub const fn kind(&self) -> RegionKind {
        match self {
            TableRegion::Number(_) => RegionKind::NumberCell,
            TableRegion::Row(_) => RegionKind::RowSelector,
            TableRegion::Section(_) => RegionKind::SectionSelector,
            TableRegion::Special(_) => RegionKind::SpecialSelector,
        }
    }

    /// Only number cells are split into corners and edges when hit-tested.
    pub const fn is_number(&self) -> bool {
        matches!(self, TableRegion::Number(_))
    }

    pub fn label(&self) -> String {
        self.to_string()
    }

    /// Parse a board label. Digit-only labels above 36 and unknown strings
    /// yield `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        if !label.is_empty() && label.bytes().all(|b| b.is_ascii_digit()) {
            let number: u8 = label.parse().ok()?;
            return (number <= MAX_NUMBER).then_some(TableRegion::Number(number));
        }
        let region = match label {
            "1st" => TableRegion::Row(Column::First),
            "2nd" => TableRegion::Row(Column::Second),
            "3rd" => TableRegion::Row(Column::Third),
            "1-12" => TableRegion::Section(Dozen::First),
            "13-24" => TableRegion::Section(Dozen::Second),
            "25-36" => TableRegion::Section(Dozen::Third),
            "1-18" => TableRegion::Special(Special::Low),
            "19-36" => TableRegion::Special(Special::High),
            "even" => TableRegion::Special(Special::Even),
            "odd" => TableRegion::Special(Special::Odd),
            "red" => TableRegion::Special(Special::Red),
            "black" => TableRegion::Special(Special::Black),
            _ => return None,
        };
        Some(region)
    }
}

impl fmt::Display for TableRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TableRegion::Number(n) => return write!(f, "{n}"),
            TableRegion::Row(Column::First) => "1st",
            TableRegion::Row(Column::Second) => "2nd",
            TableRegion::Row(Column::Third) => "3rd",
            TableRegion::Section(Dozen::First) => "1-12",
            TableRegion::Section(Dozen::Second) => "13-24",
            TableRegion::Section(Dozen::Third) => "25-36",
            TableRegion::Special(Special::Low) => "1-18",
            TableRegion::Special(Special::High) => "19-36",
            TableRegion::Special(Special::Even) => "even",
            TableRegion::Special(Special::Odd) => "odd",
            TableRegion::Special(Special::Red) => "red",
            TableRegion::Special(Special::Black) => "black",
        };
        f.write_str(label)
    }
}

/// Screen placement of every region, derived from an origin and a cell size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoardLayout {
    pub origin: Point,
    pub cell: f64,
}

impl BoardLayout {
    pub const fn new(origin: Point, cell: f64) -> Self {
        Self { origin, cell }
    }

    /// All regions in draw order.
    pub fn regions(&self) -> Vec<(TableRegion, Rect)> {
        let (x, y, cell) = (self.origin.x, self.origin.y, self.cell);
        let mut out = Vec::with_capacity(49);

        out.push((TableRegion::Number(0), Rect::new(x, y, cell, 3.0 * cell)));

        for number in 1..=MAX_NUMBER {
            let index = f64::from(number - 1);
            let col = (index / 3.0).floor();
            let row = index - col * 3.0;
            out.push((
                TableRegion::Number(number),
                Rect::new(x + cell + col * cell, y + row * cell, cell, cell),
            ));
        }

        let rows_x = x + 13.0 * cell;
        for (row, column) in Column::ALL.into_iter().enumerate() {
            out.push((
                TableRegion::Row(column),
                Rect::new(rows_x, y + row as f64 * cell, cell, cell),
            ));
        }

        let sections_y = y + 3.0 * cell;
        for (idx, dozen) in Dozen::ALL.into_iter().enumerate() {
            out.push((
                TableRegion::Section(dozen),
                Rect::new(x + cell + idx as f64 * 4.0 * cell, sections_y, 4.0 * cell, cell),
            ));
        }

        let specials_y = y + 4.0 * cell;
        for (idx, special) in Special::ALL.into_iter().enumerate() {
            out.push((
                TableRegion::Special(special),
                Rect::new(x + cell + idx as f64 * 2.0 * cell, specials_y, 2.0 * cell, cell),
            ));
        }

        out
    }

    /// Bounding box of the whole board.
    pub fn extent(&self) -> Rect {
        Rect::new(self.origin.x, self.origin.y, 14.0 * self.cell, 5.0 * self.cell)
    }
}
