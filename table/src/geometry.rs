//! Region registry and pointer hit-testing.
//!
//! Bounds are recorded as regions are drawn. The first registration of a
//! region wins so that later draw passes (or a resized viewport) never move
//! a region out from under chips that were already placed on it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::layout::{RegionKind, TableRegion};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Square of side `2 * radius` around `center`.
    pub fn around(center: Point, radius: f64) -> Self {
        Self::new(center.x - radius, center.y - radius, 2.0 * radius, 2.0 * radius)
    }

    /// Half-open containment: the left and top edges are inside, the right
    /// and bottom edges are not.
    pub fn contains(&self, point: Point) -> bool {
        self.x <= point.x
            && point.x < self.x + self.width
            && self.y <= point.y
            && point.y < self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn inset(&self, by: f64) -> Self {
        Self::new(
            self.x + by,
            self.y + by,
            (self.width - 2.0 * by).max(0.0),
            (self.height - 2.0 * by).max(0.0),
        )
    }
}

/// Where inside a region the pointer landed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Subregion {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Left,
    Right,
    Top,
    Bottom,
    Center,
}

impl Subregion {
    /// Probe order for number cells: corners, then edges.
    const PROBES: [Subregion; 8] = [
        Subregion::TopLeft,
        Subregion::TopRight,
        Subregion::BottomLeft,
        Subregion::BottomRight,
        Subregion::Left,
        Subregion::Top,
        Subregion::Right,
        Subregion::Bottom,
    ];

    pub const fn is_corner(self) -> bool {
        matches!(
            self,
            Subregion::TopLeft | Subregion::TopRight | Subregion::BottomLeft | Subregion::BottomRight
        )
    }

    pub const fn is_edge(self) -> bool {
        matches!(
            self,
            Subregion::Left | Subregion::Right | Subregion::Top | Subregion::Bottom
        )
    }

    /// Area of `bounds` this sub-region occupies for a boundary thickness.
    pub fn probe(self, bounds: Rect, boundary: f64) -> Rect {
        let Rect {
            x,
            y,
            width,
            height,
        } = bounds;
        match self {
            Subregion::TopLeft => Rect::new(x, y, boundary, boundary),
            Subregion::TopRight => Rect::new(x + width - boundary, y, boundary, boundary),
            Subregion::BottomLeft => Rect::new(x, y + height - boundary, boundary, boundary),
            Subregion::BottomRight => {
                Rect::new(x + width - boundary, y + height - boundary, boundary, boundary)
            }
            Subregion::Left => Rect::new(x, y, boundary, height),
            Subregion::Top => Rect::new(x, y, width, boundary),
            Subregion::Right => Rect::new(x + width - boundary, y, boundary, height),
            Subregion::Bottom => Rect::new(x, y + height - boundary, width, boundary),
            Subregion::Center => bounds,
        }
    }

    /// Point a chip placed with this classification is drawn at: the corner
    /// itself, the midpoint of the edge, or the middle of the region.
    pub fn anchor(self, bounds: Rect) -> Point {
        let Rect {
            x,
            y,
            width,
            height,
        } = bounds;
        match self {
            Subregion::TopLeft => Point::new(x, y),
            Subregion::TopRight => Point::new(x + width, y),
            Subregion::BottomLeft => Point::new(x, y + height),
            Subregion::BottomRight => Point::new(x + width, y + height),
            Subregion::Left => Point::new(x, y + height / 2.0),
            Subregion::Top => Point::new(x + width / 2.0, y),
            Subregion::Right => Point::new(x + width, y + height / 2.0),
            Subregion::Bottom => Point::new(x + width / 2.0, y + height),
            Subregion::Center => bounds.center(),
        }
    }
}

/// Classification of a pointer position against the board.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitResult {
    pub region: TableRegion,
    pub subregion: Subregion,
    /// Pointer position relative to the region origin.
    pub local_position: Point,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Region {
    pub region: TableRegion,
    pub bounds: Rect,
}

impl Region {
    pub fn kind(&self) -> RegionKind {
        self.region.kind()
    }
}

#[derive(Clone, Debug)]
pub struct GeometryRegistry {
    boundary_width: f64,
    regions: Vec<Region>,
    index: HashMap<TableRegion, usize>,
}

impl GeometryRegistry {
    pub fn new(boundary_width: f64) -> Self {
        Self {
            boundary_width,
            regions: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn boundary_width(&self) -> f64 {
        self.boundary_width
    }

    /// Record `bounds` for `region` unless it is already known. Returns
    /// whether the region was newly recorded.
    pub fn register(&mut self, region: TableRegion, bounds: Rect) -> bool {
        if self.index.contains_key(&region) {
            return false;
        }
        self.index.insert(region, self.regions.len());
        self.regions.push(Region { region, bounds });
        true
    }

    pub fn lookup(&self, region: TableRegion) -> Option<Rect> {
        self.index.get(&region).map(|&idx| self.regions[idx].bounds)
    }

    pub fn lookup_label(&self, label: &str) -> Option<Rect> {
        TableRegion::from_label(label).and_then(|region| self.lookup(region))
    }

    /// Regions in registration order.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Classify `pointer` against the first matching region in registration
    /// order.
    pub fn hit_test(&self, pointer: Point) -> Option<HitResult> {
        self.regions.iter().find_map(|entry| {
            let subregion = self.classify(entry, pointer)?;
            Some(HitResult {
                region: entry.region,
                subregion,
                local_position: Point::new(pointer.x - entry.bounds.x, pointer.y - entry.bounds.y),
            })
        })
    }

    fn classify(&self, entry: &Region, pointer: Point) -> Option<Subregion> {
        if entry.region.is_number() {
            let probed = Subregion::PROBES
                .into_iter()
                .find(|sub| sub.probe(entry.bounds, self.boundary_width).contains(pointer));
            if probed.is_some() {
                return probed;
            }
        }
        entry.bounds.contains(pointer).then_some(Subregion::Center)
    }
}
