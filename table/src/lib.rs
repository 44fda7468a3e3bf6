//! Interactive roulette table.
//!
//! Owns the betting grid (region registry, hit-testing and bet expansion), the
//! chip drag-and-drop state machine and the wheel physics that lands the ball
//! on a pre-selected number. Drawing is delegated to a [`render::Canvas`]
//! supplied by the host, and time/input arrive as an explicit [`input::Frame`]
//! on every tick.

pub mod bets;
pub mod button;
pub mod chips;
pub mod config;
mod error;
pub mod geometry;
pub mod input;
pub mod layout;
pub mod render;
pub mod status;
pub mod table;
pub mod wheel;

pub use bets::{expand, expand_label, Coverage};
pub use chips::{ChipRack, DragEvent, PlacedBet, RackGeometry, WagerToken};
pub use config::{ChipSpec, TableConfig};
pub use error::TableError;
pub use geometry::{GeometryRegistry, HitResult, Point, Rect, Region, Subregion};
pub use input::{Frame, InputSnapshot, Viewport};
pub use layout::{Column, Dozen, RegionKind, Special, TableRegion};
pub use table::{TableEvent, TableState};
pub use wheel::{SpinProfile, WheelPhase, WheelState};
