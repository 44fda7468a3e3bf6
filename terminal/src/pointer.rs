//! Mouse events folded into per-frame pointer snapshots.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect as Area;
use roulette_table::{InputSnapshot, Point, Viewport};

/// Maps terminal cells inside `area` onto the table viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellMapper {
    pub area: Area,
    pub viewport: Viewport,
}

impl CellMapper {
    /// Centre of the cell at (`column`, `row`) in table units, or `None`
    /// outside the area.
    pub fn to_table(&self, column: u16, row: u16) -> Option<Point> {
        let area = self.area;
        if area.width == 0 || area.height == 0 {
            return None;
        }
        if column < area.x
            || row < area.y
            || column >= area.x + area.width
            || row >= area.y + area.height
        {
            return None;
        }
        let x = (f64::from(column - area.x) + 0.5) / f64::from(area.width) * self.viewport.width;
        let y = (f64::from(row - area.y) + 0.5) / f64::from(area.height) * self.viewport.height;
        Some(Point::new(x, y))
    }
}

/// Left-button state between frames.
///
/// A press that is released before the next frame is sampled is still
/// reported as pressed for that one frame, so quick clicks are not lost.
#[derive(Clone, Debug, Default)]
pub struct PointerTracker {
    position: Point,
    pressed: bool,
    latched: bool,
}

impl PointerTracker {
    pub fn handle(&mut self, event: &MouseEvent, mapper: &CellMapper) {
        if let Some(position) = mapper.to_table(event.column, event.row) {
            self.position = position;
        }
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.pressed = true;
                self.latched = true;
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.pressed = false;
            }
            _ => {}
        }
    }

    pub fn snapshot(&mut self) -> InputSnapshot {
        let pressed = self.pressed || self.latched;
        self.latched = false;
        InputSnapshot {
            pointer: self.position,
            pressed,
        }
    }
}
