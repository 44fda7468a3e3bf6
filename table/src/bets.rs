//! Expansion of a hit into the numbers a bet placed there covers.
//!
//! Number cells use their `n % 3` class and the hit sub-region to pick a set of
//! neighbour offsets (splits, streets, corners, six-lines). The tables below
//! differ between the three classes and are pinned by the tests.

use std::collections::BTreeSet;

use crate::geometry::{HitResult, Point, Subregion};
use crate::layout::{is_red, Special, TableRegion, MAX_NUMBER};

/// Ordered set of numbers a bet pays out on.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Coverage(BTreeSet<u8>);

impl Coverage {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn covers(&self, number: u8) -> bool {
        self.0.contains(&number)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Numbers in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().copied()
    }

    /// Board labels ("0".."36") in ascending numeric order.
    pub fn labels(&self) -> Vec<String> {
        self.iter().map(|n| n.to_string()).collect()
    }

    pub fn is_disjoint(&self, other: &Coverage) -> bool {
        self.0.is_disjoint(&other.0)
    }
}

impl FromIterator<u8> for Coverage {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Clamp a computed neighbour: negatives collapse onto 0, anything past 36 is
/// dropped.
fn sanitize(number: i16) -> Option<u8> {
    if number < 0 {
        Some(0)
    } else if number > i16::from(MAX_NUMBER) {
        None
    } else {
        u8::try_from(number).ok()
    }
}

/// Neighbour offsets for a number cell with `n % 3 == residue`.
fn neighbour_offsets(residue: u8, subregion: Subregion) -> &'static [i16] {
    use Subregion::*;
    match (residue, subregion) {
        (_, Center) => &[],
        (_, Left) => &[-3],
        (_, Right) => &[3],

        (1, TopLeft) => &[-3, -2, -1, 1, 2],
        (1, TopRight) => &[1, 2, 3, 4, 5],
        (1, BottomLeft) => &[-3, -2, 1],
        (1, BottomRight) => &[1, 3, 4],
        (1, Top) => &[1, 2],
        (1, Bottom) => &[1],

        (2, TopLeft) => &[-4, -3, -1],
        (2, TopRight) => &[-1, 2, 3],
        (2, BottomLeft) => &[-3, -2, 1],
        (2, BottomRight) => &[1, 3, 4],
        (2, Top) => &[-1],
        (2, Bottom) => &[1],

        (_, TopLeft) => &[-4, -3, -1],
        (_, TopRight) => &[-1, 2, 3],
        (_, BottomLeft) => &[-5, -4, -3, -2, -1],
        (_, BottomRight) => &[-2, -1, 1, 2, 3],
        (_, Top) => &[-1],
        (_, Bottom) => &[-1, -2],
    }
}

fn number_coverage(number: u8, subregion: Subregion) -> Coverage {
    if number > MAX_NUMBER {
        return Coverage::empty();
    }
    let base = i16::from(number);
    std::iter::once(number)
        .chain(
            neighbour_offsets(number % 3, subregion)
                .iter()
                .filter_map(|offset| sanitize(base + offset)),
        )
        .collect()
}

fn zero_coverage(hit: &HitResult, cell_size: f64) -> Coverage {
    if hit.subregion != Subregion::Right || cell_size <= 0.0 {
        return std::iter::once(0).collect();
    }
    // The zero cell is three rows tall; the row under the pointer picks the
    // split partner.
    let row = (hit.local_position.y / cell_size).floor();
    let partner = if row.is_finite() {
        sanitize(row.clamp(-1.0, f64::from(MAX_NUMBER)) as i16 + 1)
    } else {
        None
    };
    std::iter::once(0).chain(partner).collect()
}

fn range(start: u8, end: u8, step: usize) -> Coverage {
    (start..=end).step_by(step).collect()
}

/// Numbers covered by a bet placed at `hit`. `cell_size` is the height of one
/// board row, used to find which number a split on "0" pairs with.
pub fn expand(hit: &HitResult, cell_size: f64) -> Coverage {
    match hit.region {
        TableRegion::Number(0) => zero_coverage(hit, cell_size),
        TableRegion::Number(number) => number_coverage(number, hit.subregion),
        TableRegion::Row(column) => (1..=MAX_NUMBER)
            .filter(|n| n % 3 == column.residue())
            .collect(),
        TableRegion::Section(dozen) => {
            let (start, end) = dozen.bounds();
            range(start, end, 1)
        }
        TableRegion::Special(special) => match special {
            Special::Low => range(1, 18, 1),
            Special::High => range(19, 36, 1),
            Special::Even => range(2, 36, 2),
            Special::Odd => range(1, 35, 2),
            Special::Red => (1..=MAX_NUMBER).filter(|n| is_red(*n)).collect(),
            Special::Black => (1..=MAX_NUMBER).filter(|n| !is_red(*n)).collect(),
        },
    }
}

/// Expand a raw board label. Unknown labels cover nothing.
pub fn expand_label(
    label: &str,
    subregion: Subregion,
    local_position: Point,
    cell_size: f64,
) -> Coverage {
    match TableRegion::from_label(label) {
        Some(region) => expand(
            &HitResult {
                region,
                subregion,
                local_position,
            },
            cell_size,
        ),
        None => Coverage::empty(),
    }
}
