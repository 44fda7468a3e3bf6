//! Table drawing calls rasterised into a ratatui canvas.

use std::f64::consts::TAU;

use ratatui::style::{Color as TermColor, Style};
use ratatui::text::Span;
use ratatui::widgets::canvas::{Context, Points};
use roulette_table::render::{Canvas, Color, TransformStack};
use roulette_table::{Point, Rect};

/// A drawing call resolved to screen coordinates (y down).
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Dots {
        coords: Vec<(f64, f64)>,
        color: Color,
    },
    Text {
        text: String,
        at: Point,
        color: Color,
    },
}

pub fn term_color(color: Color) -> TermColor {
    match color {
        Color::White => TermColor::White,
        Color::Black => TermColor::DarkGray,
        Color::Red => TermColor::Red,
        Color::Green => TermColor::Green,
        Color::Blue => TermColor::Blue,
        Color::Yellow => TermColor::Yellow,
        Color::Brown => TermColor::Rgb(139, 69, 19),
        Color::Purple => TermColor::Magenta,
    }
}

/// Collects one frame of drawing calls.
///
/// Filled shapes are sampled on a grid of `step` table units, roughly one
/// sample per braille dot. Text is one character per terminal column, so
/// `char_width` is the table width of a column.
#[derive(Debug)]
pub struct ShapeBuffer {
    height: f64,
    step: f64,
    char_width: f64,
    transforms: TransformStack,
    shapes: Vec<Shape>,
}

impl ShapeBuffer {
    pub fn new(height: f64, step: f64, char_width: f64) -> Self {
        Self {
            height,
            step: step.max(0.5),
            char_width,
            transforms: TransformStack::default(),
            shapes: Vec::new(),
        }
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Draw the collected shapes. The canvas has y pointing up, so rows are
    /// flipped against the table height.
    pub fn paint(&self, ctx: &mut Context<'_>) {
        for shape in &self.shapes {
            match shape {
                Shape::Dots { coords, color } => {
                    let flipped: Vec<(f64, f64)> =
                        coords.iter().map(|(x, y)| (*x, self.height - y)).collect();
                    ctx.draw(&Points {
                        coords: &flipped,
                        color: term_color(*color),
                    });
                }
                Shape::Text { text, at, color } => {
                    ctx.print(
                        at.x,
                        self.height - at.y,
                        Span::styled(text.clone(), Style::default().fg(term_color(*color))),
                    );
                }
            }
        }
    }

    fn push_dots(&mut self, coords: Vec<(f64, f64)>, color: Color) {
        if !coords.is_empty() {
            self.shapes.push(Shape::Dots { coords, color });
        }
    }

    fn screen(&self, point: Point) -> (f64, f64) {
        let p = self.transforms.apply(point);
        (p.x, p.y)
    }

    /// Whether `angle` falls in the arc `[start, start + span]`.
    fn in_span(angle: f64, start: f64, span: f64) -> bool {
        if span >= TAU {
            return true;
        }
        (angle - start).rem_euclid(TAU) <= span
    }
}

impl Canvas for ShapeBuffer {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let mut coords = Vec::new();
        let mut y = rect.y;
        while y < rect.y + rect.height {
            let mut x = rect.x;
            while x < rect.x + rect.width {
                coords.push(self.screen(Point::new(x, y)));
                x += self.step;
            }
            y += self.step;
        }
        self.push_dots(coords, color);
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, _line_width: f64) {
        let mut coords = Vec::new();
        let (right, bottom) = (rect.x + rect.width, rect.y + rect.height);
        let mut x = rect.x;
        while x <= right {
            coords.push(self.screen(Point::new(x, rect.y)));
            coords.push(self.screen(Point::new(x, bottom)));
            x += self.step;
        }
        let mut y = rect.y;
        while y <= bottom {
            coords.push(self.screen(Point::new(rect.x, y)));
            coords.push(self.screen(Point::new(right, y)));
            y += self.step;
        }
        self.push_dots(coords, color);
    }

    fn fill_arc(&mut self, center: Point, radius: f64, start: f64, span: f64, color: Color) {
        let mut coords = Vec::new();
        let mut dy = -radius;
        while dy <= radius {
            let mut dx = -radius;
            while dx <= radius {
                if dx * dx + dy * dy <= radius * radius
                    && Self::in_span(dy.atan2(dx), start, span)
                {
                    coords.push(self.screen(center.offset(dx, dy)));
                }
                dx += self.step;
            }
            dy += self.step;
        }
        self.push_dots(coords, color);
    }

    fn stroke_arc(
        &mut self,
        center: Point,
        radius: f64,
        start: f64,
        span: f64,
        color: Color,
        _line_width: f64,
    ) {
        let span = span.min(TAU);
        let steps = ((radius * span) / self.step).ceil().max(1.0) as usize;
        let coords = (0..=steps)
            .map(|i| {
                let angle = start + span * i as f64 / steps as f64;
                self.screen(center.offset(radius * angle.cos(), radius * angle.sin()))
            })
            .collect();
        self.push_dots(coords, color);
    }

    fn measure_text(&self, text: &str, _size: f64) -> f64 {
        text.chars().count() as f64 * self.char_width
    }

    fn fill_text(&mut self, text: &str, at: Point, _size: f64, color: Color) {
        let at = self.transforms.apply(at);
        self.shapes.push(Shape::Text {
            text: text.to_string(),
            at,
            color,
        });
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_fill_rect_samples_inside() {
        let mut buffer = ShapeBuffer::new(500.0, 5.0, 10.0);
        buffer.fill_rect(Rect::new(10.0, 20.0, 10.0, 10.0), Color::Red);
        let Shape::Dots { coords, color } = &buffer.shapes()[0] else {
            panic!("expected dots");
        };
        assert_eq!(*color, Color::Red);
        assert_eq!(coords.len(), 4);
        assert!(coords
            .iter()
            .all(|(x, y)| (10.0..20.0).contains(x) && (20.0..30.0).contains(y)));
    }

    #[test]
    fn test_wedge_respects_span() {
        let mut buffer = ShapeBuffer::new(500.0, 1.0, 10.0);
        buffer.fill_arc(Point::new(0.0, 0.0), 10.0, 0.0, FRAC_PI_2, Color::Green);
        let Shape::Dots { coords, .. } = &buffer.shapes()[0] else {
            panic!("expected dots");
        };
        // Quarter turn clockwise from +x with y down: the +x,+y quadrant.
        assert!(coords.iter().all(|(x, y)| *x >= 0.0 && *y >= 0.0));
    }

    #[test]
    fn test_text_follows_transform() {
        let mut buffer = ShapeBuffer::new(500.0, 5.0, 10.0);
        buffer.save();
        buffer.translate(100.0, 100.0);
        buffer.fill_text("7", Point::new(5.0, 0.0), 14.0, Color::White);
        buffer.restore();
        buffer.fill_text("8", Point::new(5.0, 0.0), 14.0, Color::White);
        assert_eq!(
            buffer.shapes(),
            &[
                Shape::Text {
                    text: "7".to_string(),
                    at: Point::new(105.0, 100.0),
                    color: Color::White,
                },
                Shape::Text {
                    text: "8".to_string(),
                    at: Point::new(5.0, 0.0),
                    color: Color::White,
                },
            ]
        );
    }

    #[test]
    fn test_measure_is_per_column() {
        let buffer = ShapeBuffer::new(500.0, 5.0, 12.5);
        assert_eq!(buffer.measure_text("Spin", 18.0), 50.0);
    }

    #[test]
    fn test_black_stays_visible() {
        assert_eq!(term_color(Color::Black), TermColor::DarkGray);
        assert_eq!(term_color(Color::Purple), TermColor::Magenta);
    }
}
