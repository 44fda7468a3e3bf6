//! Table configuration.

use serde::{Deserialize, Serialize};

use crate::chips::RackGeometry;
use crate::error::TableError;
use crate::geometry::Point;
use crate::layout::{BoardLayout, MAX_NUMBER};
use crate::render::Color;
use crate::wheel::SpinProfile;

pub mod defaults {
    pub const ORIGIN_X: f64 = 10.0;
    pub const ORIGIN_Y: f64 = 30.0;
    pub const CELL_SIZE: f64 = 70.0;
    pub const BOUNDARY_WIDTH: f64 = 10.0;
    pub const LINE_WIDTH: f64 = 5.0;
    pub const BUTTON_COOLDOWN_MS: u64 = 400;
    pub const HOLDINGS: u64 = 1000;
}

/// A chip offered in the rack.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChipSpec {
    pub value: u64,
    pub color: Color,
}

impl ChipSpec {
    pub const fn new(value: u64, color: Color) -> Self {
        Self { value, color }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TableConfig {
    #[serde(default = "default_origin_x")]
    pub origin_x: f64,
    #[serde(default = "default_origin_y")]
    pub origin_y: f64,
    #[serde(default = "default_cell_size")]
    pub cell_size: f64,
    /// Thickness of the corner and edge strips of a number cell.
    #[serde(default = "default_boundary_width")]
    pub boundary_width: f64,
    #[serde(default = "default_line_width")]
    pub line_width: f64,

    #[serde(default)]
    pub wheel: SpinProfile,

    #[serde(default = "default_chips")]
    pub chips: Vec<ChipSpec>,
    #[serde(default)]
    pub rack: RackGeometry,

    /// Minimum time between two spin button activations.
    #[serde(default = "default_button_cooldown_ms")]
    pub button_cooldown_ms: u64,
    /// Balance shown in the wallet.
    #[serde(default = "default_holdings")]
    pub holdings: u64,

    /// Seed for the lucky number generator. Entropy is used when unset.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Land every spin on this number instead of drawing one.
    #[serde(default)]
    pub lucky_number: Option<u8>,
}

fn default_origin_x() -> f64 {
    defaults::ORIGIN_X
}

fn default_origin_y() -> f64 {
    defaults::ORIGIN_Y
}

fn default_cell_size() -> f64 {
    defaults::CELL_SIZE
}

fn default_boundary_width() -> f64 {
    defaults::BOUNDARY_WIDTH
}

fn default_line_width() -> f64 {
    defaults::LINE_WIDTH
}

fn default_chips() -> Vec<ChipSpec> {
    vec![
        ChipSpec::new(10, Color::Blue),
        ChipSpec::new(50, Color::Green),
        ChipSpec::new(100, Color::Black),
        ChipSpec::new(500, Color::Purple),
    ]
}

fn default_button_cooldown_ms() -> u64 {
    defaults::BUTTON_COOLDOWN_MS
}

fn default_holdings() -> u64 {
    defaults::HOLDINGS
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            origin_x: default_origin_x(),
            origin_y: default_origin_y(),
            cell_size: default_cell_size(),
            boundary_width: default_boundary_width(),
            line_width: default_line_width(),
            wheel: SpinProfile::default(),
            chips: default_chips(),
            rack: RackGeometry::default(),
            button_cooldown_ms: default_button_cooldown_ms(),
            holdings: default_holdings(),
            seed: None,
            lucky_number: None,
        }
    }
}

fn ensure_positive(field: &'static str, value: f64) -> Result<(), TableError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TableError::InvalidConfig {
            field,
            reason: format!("must be finite and > 0, got {value}"),
        })
    }
}

fn ensure_finite(field: &'static str, value: f64) -> Result<(), TableError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(TableError::InvalidConfig {
            field,
            reason: format!("must be finite, got {value}"),
        })
    }
}

impl TableConfig {
    pub fn validate(&self) -> Result<(), TableError> {
        ensure_finite("origin_x", self.origin_x)?;
        ensure_finite("origin_y", self.origin_y)?;
        ensure_positive("cell_size", self.cell_size)?;
        ensure_positive("boundary_width", self.boundary_width)?;
        ensure_positive("line_width", self.line_width)?;
        if self.boundary_width * 2.0 > self.cell_size {
            return Err(TableError::InvalidConfig {
                field: "boundary_width",
                reason: format!(
                    "corner strips of {} overlap inside a cell of {}",
                    self.boundary_width, self.cell_size
                ),
            });
        }

        self.wheel.validate()?;

        ensure_positive("rack.chip_radius", self.rack.chip_radius)?;
        ensure_finite("rack.home_x", self.rack.home_x)?;
        ensure_finite("rack.slot_spacing", self.rack.slot_spacing)?;
        ensure_finite("rack.bottom_offset", self.rack.bottom_offset)?;
        if self.chips.is_empty() {
            return Err(TableError::InvalidConfig {
                field: "chips",
                reason: "at least one chip is required".to_string(),
            });
        }
        if let Some(chip) = self.chips.iter().find(|chip| chip.value == 0) {
            return Err(TableError::InvalidConfig {
                field: "chips",
                reason: format!("chip value must be > 0, got {}", chip.value),
            });
        }

        if let Some(lucky) = self.lucky_number {
            if lucky > MAX_NUMBER {
                return Err(TableError::InvalidLuckyNumber {
                    got: lucky,
                    max: MAX_NUMBER,
                });
            }
        }
        Ok(())
    }

    pub fn layout(&self) -> BoardLayout {
        BoardLayout::new(Point::new(self.origin_x, self.origin_y), self.cell_size)
    }

    /// Spin button cooldown in seconds of table time.
    pub fn button_cooldown(&self) -> f64 {
        self.button_cooldown_ms as f64 / 1000.0
    }
}
