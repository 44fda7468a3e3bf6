//! Drawing.
//!
//! The host supplies a [`Canvas`]; everything here only issues drawing calls
//! against it. The one side effect is that drawing the board records each
//! region's bounds in the [`GeometryRegistry`], and drawing the spin button
//! records where it can be pressed.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::bets::Coverage;
use crate::button::{SpinButton, BUTTON_FONT_HEIGHT, BUTTON_PADDING_X, BUTTON_PADDING_Y};
use crate::chips::{ChipRack, RackGeometry};
use crate::geometry::{GeometryRegistry, Point, Rect};
use crate::input::Viewport;
use crate::layout::{pocket, BoardLayout, Pocket, Special, TableRegion};
use crate::status::{StatusMessage, Wallet};
use crate::wheel::{WheelState, SLOT_ANGLE, WHEEL_ORDER};

const LABEL_HEIGHT: f64 = 20.0;

const CHIP_RING_RADIUS: f64 = 20.0;
const CHIP_RING_WIDTH: f64 = 10.0;
const CHIP_FONT_HEIGHT: f64 = 15.0;
/// Placed chips are drawn smaller than the ones in the rack.
const PLACED_CHIP_SCALE: f64 = 0.6;

const DIALOG_WIDTH: f64 = 400.0;
const DIALOG_HEIGHT: f64 = 500.0;
const WHEEL_RADIUS: f64 = 170.0;
const WHEEL_FONT_HEIGHT: f64 = 14.0;
const WHEEL_TEXT_SPACING: f64 = 18.0;
const BALL_RADIUS: f64 = 7.0;

const WALLET_FONT_HEIGHT: f64 = 25.0;
const WALLET_LINE_SPACING: f64 = 45.0;
const STATUS_FONT_HEIGHT: f64 = 14.0;
const STATUS_LINE_SPACING: f64 = 28.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
    Red,
    Green,
    Blue,
    Yellow,
    Brown,
    Purple,
}

impl From<Pocket> for Color {
    fn from(pocket: Pocket) -> Self {
        match pocket {
            Pocket::Green => Color::Green,
            Pocket::Red => Color::Red,
            Pocket::Black => Color::Black,
        }
    }
}

/// A 2D drawing surface.
///
/// Coordinates are in table units, relative to the current transform set up
/// with [`Canvas::translate`] and [`Canvas::rotate`]. Text is positioned by
/// the left end of its baseline. Angles are in radians, clockwise with y
/// pointing down.
pub trait Canvas {
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f64);
    /// Pie wedge from `center`; a full disc when `span` is a whole turn.
    fn fill_arc(&mut self, center: Point, radius: f64, start: f64, span: f64, color: Color);
    fn stroke_arc(
        &mut self,
        center: Point,
        radius: f64,
        start: f64,
        span: f64,
        color: Color,
        line_width: f64,
    );
    fn measure_text(&self, text: &str, size: f64) -> f64;
    fn fill_text(&mut self, text: &str, at: Point, size: f64, color: Color);
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, dx: f64, dy: f64);
    fn rotate(&mut self, angle: f64);
}

/// Affine map `(x, y) -> (a·x + c·y + e, b·x + d·y + f)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn translation(dx: f64, dy: f64) -> Self {
        Self {
            e: dx,
            f: dy,
            ..Self::IDENTITY
        }
    }

    pub fn rotation(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        }
    }

    /// `self ∘ inner`: apply `inner` first, then `self`.
    pub fn then(&self, inner: &Transform) -> Self {
        Self {
            a: self.a * inner.a + self.c * inner.b,
            b: self.b * inner.a + self.d * inner.b,
            c: self.a * inner.c + self.c * inner.d,
            d: self.b * inner.c + self.d * inner.d,
            e: self.a * inner.e + self.c * inner.f + self.e,
            f: self.b * inner.e + self.d * inner.f + self.f,
        }
    }

    pub fn apply(&self, point: Point) -> Point {
        Point::new(
            self.a * point.x + self.c * point.y + self.e,
            self.b * point.x + self.d * point.y + self.f,
        )
    }

    /// Rotation component, assuming no shear or scale.
    pub fn angle(&self) -> f64 {
        self.b.atan2(self.a)
    }
}

/// Current transform plus the saved ones, with canvas save/restore semantics.
#[derive(Clone, Debug, Default)]
pub struct TransformStack {
    current: Transform,
    saved: Vec<Transform>,
}

impl TransformStack {
    pub fn current(&self) -> Transform {
        self.current
    }

    pub fn save(&mut self) {
        self.saved.push(self.current);
    }

    /// Unbalanced restores are ignored.
    pub fn restore(&mut self) {
        if let Some(previous) = self.saved.pop() {
            self.current = previous;
        }
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.current = self.current.then(&Transform::translation(dx, dy));
    }

    pub fn rotate(&mut self, angle: f64) {
        self.current = self.current.then(&Transform::rotation(angle));
    }

    pub fn apply(&self, point: Point) -> Point {
        self.current.apply(point)
    }

    pub fn angle(&self) -> f64 {
        self.current.angle()
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }
}

/// Canvas that draws nothing. Text is measured as a fixed-width font.
#[derive(Clone, Debug, Default)]
pub struct NullCanvas {
    transforms: TransformStack,
}

/// Width of `text` in a fixed-width font of height `size`.
pub fn monospace_width(text: &str, size: f64) -> f64 {
    text.chars().count() as f64 * size * 0.6
}

impl Canvas for NullCanvas {
    fn fill_rect(&mut self, _rect: Rect, _color: Color) {}

    fn stroke_rect(&mut self, _rect: Rect, _color: Color, _line_width: f64) {}

    fn fill_arc(&mut self, _center: Point, _radius: f64, _start: f64, _span: f64, _color: Color) {}

    fn stroke_arc(
        &mut self,
        _center: Point,
        _radius: f64,
        _start: f64,
        _span: f64,
        _color: Color,
        _line_width: f64,
    ) {
    }

    fn measure_text(&self, text: &str, size: f64) -> f64 {
        monospace_width(text, size)
    }

    fn fill_text(&mut self, _text: &str, _at: Point, _size: f64, _color: Color) {}

    fn save(&mut self) {
        self.transforms.save();
    }

    fn restore(&mut self) {
        self.transforms.restore();
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.transforms.translate(dx, dy);
    }

    fn rotate(&mut self, angle: f64) {
        self.transforms.rotate(angle);
    }
}

/// Draw every region, highlighting the numbers in `highlighted`, and record
/// the bounds of each region in `registry`.
pub fn draw_board<C: Canvas + ?Sized>(
    canvas: &mut C,
    layout: &BoardLayout,
    registry: &mut GeometryRegistry,
    highlighted: &Coverage,
    line_width: f64,
) {
    for (region, bounds) in layout.regions() {
        if let TableRegion::Number(n) = region {
            if highlighted.covers(n) {
                canvas.fill_rect(bounds, Color::Yellow);
            }
        }
        match region {
            TableRegion::Number(0) => {
                canvas.fill_rect(bounds.inset(line_width), Color::Green);
            }
            TableRegion::Number(n) => {
                canvas.fill_arc(
                    bounds.center(),
                    layout.cell / 2.0 - line_width,
                    0.0,
                    TAU,
                    pocket(n).into(),
                );
            }
            TableRegion::Special(Special::Red) => {
                canvas.fill_rect(bounds.inset(line_width), Color::Red);
            }
            TableRegion::Special(Special::Black) => {
                canvas.fill_rect(bounds.inset(line_width), Color::Black);
            }
            _ => {}
        }
        canvas.stroke_rect(bounds, Color::Black, line_width);

        let label = region.label();
        let width = canvas.measure_text(&label, LABEL_HEIGHT);
        canvas.fill_text(
            &label,
            Point::new(
                bounds.x + (bounds.width - width) / 2.0,
                bounds.y + LABEL_HEIGHT / 2.0 + bounds.height / 2.0,
            ),
            LABEL_HEIGHT,
            Color::White,
        );
        registry.register(region, bounds);
    }
}

/// Where the spin button's label baseline starts for a viewport.
pub fn button_anchor(viewport: Viewport) -> Point {
    Point::new(viewport.width / 2.0 - 50.0, viewport.height - 100.0)
}

pub fn draw_button<C: Canvas + ?Sized>(canvas: &mut C, button: &mut SpinButton, viewport: Viewport) {
    let anchor = button_anchor(viewport);
    let width = canvas.measure_text(button.label(), BUTTON_FONT_HEIGHT);
    button.place(anchor, width);
    if let Some(bounds) = button.bounds() {
        canvas.fill_rect(bounds, Color::Red);
    }
    canvas.fill_text(
        button.label(),
        anchor.offset(BUTTON_PADDING_X, BUTTON_PADDING_Y),
        BUTTON_FONT_HEIGHT,
        Color::White,
    );
}

pub fn draw_wallet<C: Canvas + ?Sized>(canvas: &mut C, wallet: &Wallet, viewport: Viewport) {
    let origin = Point::new(viewport.width - 300.0, viewport.height - 100.0);
    for (idx, line) in wallet.lines().iter().enumerate() {
        canvas.fill_text(
            line,
            origin.offset(0.0, idx as f64 * WALLET_LINE_SPACING),
            WALLET_FONT_HEIGHT,
            Color::White,
        );
    }
}

pub fn draw_status<C: Canvas + ?Sized>(canvas: &mut C, status: &StatusMessage, viewport: Viewport) {
    let y = viewport.height - 30.0;
    for (idx, line) in status.lines().enumerate() {
        let width = canvas.measure_text(line, STATUS_FONT_HEIGHT);
        canvas.fill_text(
            line,
            Point::new(
                (viewport.width - width) / 2.0,
                y + idx as f64 * STATUS_LINE_SPACING,
            ),
            STATUS_FONT_HEIGHT,
            Color::White,
        );
    }
}

fn draw_chip<C: Canvas + ?Sized>(
    canvas: &mut C,
    center: Point,
    radius: f64,
    value: u64,
    color: Color,
    scale: f64,
) {
    canvas.fill_arc(center, radius * scale, 0.0, TAU, color);
    canvas.stroke_arc(
        center,
        CHIP_RING_RADIUS * scale,
        0.0,
        TAU,
        Color::White,
        CHIP_RING_WIDTH * scale,
    );
    let label = value.to_string();
    let size = CHIP_FONT_HEIGHT * scale;
    let width = canvas.measure_text(&label, size);
    canvas.fill_text(
        &label,
        center.offset(-width / 2.0, size / 3.0),
        size,
        Color::Black,
    );
}

/// The rack, the chips already placed on the board and, last, the chip being
/// dragged.
pub fn draw_chips<C: Canvas + ?Sized>(canvas: &mut C, rack: &ChipRack, viewport: Viewport) {
    let geometry: &RackGeometry = rack.geometry();
    for token in rack.tokens() {
        let home = geometry.home_center(token.anchor_slot(), viewport);
        draw_chip(
            canvas,
            home,
            geometry.chip_radius,
            token.face_value(),
            token.color(),
            1.0,
        );
    }
    for token in rack.tokens() {
        for bet in token.bets() {
            draw_chip(
                canvas,
                bet.render_position,
                geometry.chip_radius,
                token.face_value(),
                token.color(),
                PLACED_CHIP_SCALE,
            );
        }
    }
    if let Some(token) = rack.dragged() {
        if let Some(position) = token.drag_position() {
            draw_chip(
                canvas,
                position,
                geometry.chip_radius,
                token.face_value(),
                token.color(),
                1.0,
            );
        }
    }
}

/// The wheel dialog: pockets turned by the wheel angle and the ball on its
/// own angle. Nothing is drawn while the wheel is hidden.
pub fn draw_wheel<C: Canvas + ?Sized>(canvas: &mut C, wheel: &WheelState, viewport: Viewport) {
    if !wheel.is_visible() {
        return;
    }
    let center = viewport.center();
    canvas.fill_rect(
        Rect::new(
            center.x - DIALOG_WIDTH / 2.0,
            center.y - DIALOG_HEIGHT / 2.0,
            DIALOG_WIDTH,
            DIALOG_HEIGHT,
        ),
        Color::Blue,
    );

    let origin = Point::default();
    for (idx, number) in WHEEL_ORDER.iter().enumerate() {
        canvas.save();
        canvas.translate(center.x, center.y);
        canvas.rotate(wheel.wheel_angle() + idx as f64 * SLOT_ANGLE);
        canvas.fill_arc(origin, WHEEL_RADIUS, 0.0, SLOT_ANGLE, pocket(*number).into());
        canvas.stroke_arc(origin, WHEEL_RADIUS, 0.0, SLOT_ANGLE, Color::White, 1.0);
        let label = number.to_string();
        let width = canvas.measure_text(&label, WHEEL_FONT_HEIGHT);
        canvas.fill_text(
            &label,
            Point::new(WHEEL_RADIUS - width - 5.0, WHEEL_TEXT_SPACING),
            WHEEL_FONT_HEIGHT,
            Color::White,
        );
        canvas.restore();
    }
    canvas.fill_arc(center, 2.0 * WHEEL_RADIUS / 3.0, 0.0, TAU, Color::Brown);

    canvas.save();
    canvas.translate(center.x, center.y);
    canvas.rotate(wheel.ball_angle());
    canvas.fill_arc(
        Point::new(WHEEL_RADIUS - 10.0, 0.0),
        BALL_RADIUS,
        0.0,
        TAU,
        Color::White,
    );
    canvas.restore();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wheel::SpinProfile;
    use std::f64::consts::FRAC_PI_2;

    /// Records screen-space text and discs.
    #[derive(Default)]
    struct Recorder {
        transforms: TransformStack,
        texts: Vec<(String, Point)>,
        discs: Vec<(Point, f64, Color)>,
        rects: Vec<(Rect, Color)>,
    }

    impl Canvas for Recorder {
        fn fill_rect(&mut self, rect: Rect, color: Color) {
            self.rects.push((rect, color));
        }

        fn stroke_rect(&mut self, _rect: Rect, _color: Color, _line_width: f64) {}

        fn fill_arc(&mut self, center: Point, radius: f64, _start: f64, span: f64, color: Color) {
            if span >= TAU {
                self.discs.push((self.transforms.apply(center), radius, color));
            }
        }

        fn stroke_arc(&mut self, _: Point, _: f64, _: f64, _: f64, _: Color, _: f64) {}

        fn measure_text(&self, text: &str, size: f64) -> f64 {
            monospace_width(text, size)
        }

        fn fill_text(&mut self, text: &str, at: Point, _size: f64, _color: Color) {
            self.texts.push((text.to_string(), self.transforms.apply(at)));
        }

        fn save(&mut self) {
            self.transforms.save();
        }

        fn restore(&mut self) {
            self.transforms.restore();
        }

        fn translate(&mut self, dx: f64, dy: f64) {
            self.transforms.translate(dx, dy);
        }

        fn rotate(&mut self, angle: f64) {
            self.transforms.rotate(angle);
        }
    }

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn test_transform_stack() {
        let mut stack = TransformStack::default();
        stack.save();
        stack.translate(100.0, 50.0);
        stack.rotate(FRAC_PI_2);
        assert!(close(stack.apply(Point::new(10.0, 0.0)), Point::new(100.0, 60.0)));
        assert!((stack.angle() - FRAC_PI_2).abs() < 1e-12);
        assert_eq!(stack.depth(), 1);
        stack.restore();
        assert_eq!(stack.current(), Transform::IDENTITY);
        // Unbalanced restore is a no-op.
        stack.restore();
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn test_transform_composition_order() {
        let rotate_then_move = Transform::translation(5.0, 0.0).then(&Transform::rotation(FRAC_PI_2));
        assert!(close(rotate_then_move.apply(Point::new(1.0, 0.0)), Point::new(5.0, 1.0)));
        let move_then_rotate = Transform::rotation(FRAC_PI_2).then(&Transform::translation(5.0, 0.0));
        assert!(close(move_then_rotate.apply(Point::new(1.0, 0.0)), Point::new(0.0, 6.0)));
    }

    #[test]
    fn test_board_registers_regions() {
        let layout = BoardLayout::new(Point::new(10.0, 30.0), 70.0);
        let mut registry = GeometryRegistry::new(10.0);
        let mut canvas = Recorder::default();
        let highlighted: Coverage = [5u8].into_iter().collect();
        draw_board(&mut canvas, &layout, &mut registry, &highlighted, 5.0);

        assert_eq!(registry.len(), 49);
        assert_eq!(
            registry.lookup(TableRegion::Number(5)),
            Some(Rect::new(150.0, 100.0, 70.0, 70.0))
        );
        assert!(canvas
            .rects
            .contains(&(Rect::new(150.0, 100.0, 70.0, 70.0), Color::Yellow)));
        assert_eq!(canvas.texts.len(), 49);
        // Pocket discs for 1..=36.
        assert_eq!(canvas.discs.len(), 36);
    }

    #[test]
    fn test_redraw_keeps_first_bounds() {
        let mut registry = GeometryRegistry::new(10.0);
        let mut canvas = NullCanvas::default();
        let empty = Coverage::empty();
        draw_board(
            &mut canvas,
            &BoardLayout::new(Point::new(10.0, 30.0), 70.0),
            &mut registry,
            &empty,
            5.0,
        );
        draw_board(
            &mut canvas,
            &BoardLayout::new(Point::new(40.0, 60.0), 70.0),
            &mut registry,
            &empty,
            5.0,
        );
        assert_eq!(
            registry.lookup(TableRegion::Number(0)),
            Some(Rect::new(10.0, 30.0, 70.0, 210.0))
        );
    }

    #[test]
    fn test_button_is_placed_when_drawn() {
        let mut button = SpinButton::new("Spin", 0.4);
        let mut canvas = NullCanvas::default();
        draw_button(&mut canvas, &mut button, Viewport::default());
        let width = monospace_width("Spin", BUTTON_FONT_HEIGHT);
        assert_eq!(
            button.bounds(),
            Some(Rect::new(
                450.0,
                382.0,
                width + 2.0 * BUTTON_PADDING_X,
                BUTTON_FONT_HEIGHT + 2.0 * BUTTON_PADDING_Y
            ))
        );
    }

    #[test]
    fn test_wheel_labels_follow_rotation() {
        let mut wheel = WheelState::new(SpinProfile::default());
        let mut canvas = Recorder::default();
        draw_wheel(&mut canvas, &wheel, Viewport::default());
        assert!(canvas.texts.is_empty());

        wheel.start_spin(11).unwrap();
        draw_wheel(&mut canvas, &wheel, Viewport::default());
        assert_eq!(canvas.texts.len(), 37);
        assert_eq!(canvas.transforms.depth(), 0);

        // With the wheel at rest angle zero, the "0" label sits just inside
        // the rim on the right of the centre.
        let width = monospace_width("0", WHEEL_FONT_HEIGHT);
        let (label, at) = &canvas.texts[0];
        assert_eq!(label, "0");
        assert!(close(
            *at,
            Point::new(500.0 + WHEEL_RADIUS - width - 5.0, 250.0 + WHEEL_TEXT_SPACING)
        ));

        // Ball starts at angle zero on the right.
        let (ball, radius, color) = canvas.discs.last().copied().unwrap();
        assert_eq!((radius, color), (BALL_RADIUS, Color::White));
        assert!(close(ball, Point::new(500.0 + WHEEL_RADIUS - 10.0, 250.0)));
    }

    #[test]
    fn test_status_is_centred() {
        let mut status = StatusMessage::default();
        status.set("abcd");
        let mut canvas = Recorder::default();
        draw_status(&mut canvas, &status, Viewport::default());
        let width = monospace_width("abcd", STATUS_FONT_HEIGHT);
        assert_eq!(
            canvas.texts,
            vec![("abcd".to_string(), Point::new((1000.0 - width) / 2.0, 470.0))]
        );
    }

    #[test]
    fn test_pocket_colors() {
        assert_eq!(Color::from(pocket(0)), Color::Green);
        assert_eq!(Color::from(pocket(32)), Color::Red);
        assert_eq!(Color::from(pocket(26)), Color::Black);
    }
}
