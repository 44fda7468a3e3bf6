//! Wager tokens and the drag-and-drop state machine that places them.
//!
//! At most one token is dragged at a time. A press on a token's home spot
//! picks it up, pointer movement while pressed marks the gesture as a drag,
//! and a release over a board region commits a [`PlacedBet`]. Releasing
//! without having moved, or away from the board, puts the token back.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::bets::{expand, Coverage};
use crate::error::TableError;
use crate::geometry::{GeometryRegistry, HitResult, Point, Rect, Subregion};
use crate::input::{InputSnapshot, Viewport};
use crate::layout::TableRegion;
use crate::render::Color;

/// A committed wager.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedBet {
    pub hit: HitResult,
    /// Where the chip is drawn: region centre, corner, or edge midpoint.
    pub render_position: Point,
    pub coverage: Coverage,
}

#[derive(Clone, Debug)]
pub struct WagerToken {
    face_value: u64,
    color: Color,
    anchor_slot: usize,
    is_dragged: bool,
    position: Option<Point>,
    bets: Vec<PlacedBet>,
}

impl WagerToken {
    pub fn face_value(&self) -> u64 {
        self.face_value
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn anchor_slot(&self) -> usize {
        self.anchor_slot
    }

    pub fn is_dragged(&self) -> bool {
        self.is_dragged
    }

    /// Pointer-tracking position while dragged.
    pub fn drag_position(&self) -> Option<Point> {
        self.position
    }

    pub fn bets(&self) -> &[PlacedBet] {
        &self.bets
    }
}

/// Where the rack of home spots sits, relative to the bottom of the viewport.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RackGeometry {
    /// Centre x of the first home spot.
    pub home_x: f64,
    /// Horizontal distance between consecutive home spots.
    pub slot_spacing: f64,
    /// Distance from the bottom of the viewport to the home spot centres.
    pub bottom_offset: f64,
    pub chip_radius: f64,
}

impl Default for RackGeometry {
    fn default() -> Self {
        Self {
            home_x: 50.0,
            slot_spacing: 70.0,
            bottom_offset: 100.0,
            chip_radius: 25.0,
        }
    }
}

impl RackGeometry {
    pub fn home_center(&self, anchor_slot: usize, viewport: Viewport) -> Point {
        Point::new(
            self.home_x + anchor_slot as f64 * self.slot_spacing,
            viewport.height - self.bottom_offset,
        )
    }

    pub fn home_box(&self, anchor_slot: usize, viewport: Viewport) -> Rect {
        Rect::around(self.home_center(anchor_slot, viewport), self.chip_radius)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DragState {
    Idle,
    Dragging { value: u64, moved: bool },
}

/// Transitions reported by [`ChipRack::sense`].
#[derive(Clone, Debug, PartialEq)]
pub enum DragEvent {
    Picked {
        value: u64,
    },
    Committed {
        value: u64,
        region: TableRegion,
        subregion: Subregion,
        coverage: Coverage,
    },
    Returned {
        value: u64,
    },
}

#[derive(Clone, Debug)]
pub struct ChipRack {
    geometry: RackGeometry,
    tokens: BTreeMap<u64, WagerToken>,
    state: DragState,
    previous: InputSnapshot,
}

impl ChipRack {
    pub fn new(geometry: RackGeometry) -> Self {
        Self {
            geometry,
            tokens: BTreeMap::new(),
            state: DragState::Idle,
            previous: InputSnapshot::default(),
        }
    }

    pub fn geometry(&self) -> &RackGeometry {
        &self.geometry
    }

    /// Add the token for `face_value`; its home spot is the next free slot.
    pub fn add_token(&mut self, face_value: u64, color: Color) -> Result<(), TableError> {
        if self.tokens.contains_key(&face_value) {
            return Err(TableError::DuplicateChip { value: face_value });
        }
        let anchor_slot = self.tokens.len();
        self.tokens.insert(
            face_value,
            WagerToken {
                face_value,
                color,
                anchor_slot,
                is_dragged: false,
                position: None,
                bets: Vec::new(),
            },
        );
        Ok(())
    }

    pub fn token(&self, face_value: u64) -> Option<&WagerToken> {
        self.tokens.get(&face_value)
    }

    /// Tokens ordered by face value.
    pub fn tokens(&self) -> impl Iterator<Item = &WagerToken> {
        self.tokens.values()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn dragged(&self) -> Option<&WagerToken> {
        match self.state {
            DragState::Dragging { value, .. } => self.tokens.get(&value),
            DragState::Idle => None,
        }
    }

    /// Sum of face values over every placed bet.
    pub fn placed_total(&self) -> u64 {
        self.tokens
            .values()
            .map(|token| token.face_value.saturating_mul(token.bets.len() as u64))
            .fold(0u64, u64::saturating_add)
    }

    /// All placed bets with the face value of the chip that carries them.
    pub fn placed_bets(&self) -> impl Iterator<Item = (u64, &PlacedBet)> {
        self.tokens
            .values()
            .flat_map(|token| token.bets.iter().map(move |bet| (token.face_value, bet)))
    }

    /// Remove every placed bet. Returns how many were removed.
    pub fn clear_bets(&mut self) -> usize {
        let mut removed = 0;
        for token in self.tokens.values_mut() {
            removed += token.bets.len();
            token.bets.clear();
        }
        if removed > 0 {
            info!(removed, "bets cleared");
        }
        removed
    }

    /// Hit under the pointer while a token is being dragged. The board is not
    /// probed at all otherwise.
    pub fn hover(&self, input: &InputSnapshot, registry: &GeometryRegistry) -> Option<HitResult> {
        if !self.is_dragging() {
            return None;
        }
        registry.hit_test(input.pointer)
    }

    /// Record `input` as the latest snapshot without running any transition.
    /// Used while another surface (the wheel) owns the pointer.
    pub fn observe(&mut self, input: &InputSnapshot) {
        self.previous = *input;
    }

    /// Run one frame of the drag state machine.
    pub fn sense(
        &mut self,
        input: &InputSnapshot,
        viewport: Viewport,
        registry: &GeometryRegistry,
        cell_size: f64,
    ) -> Option<DragEvent> {
        let previous = std::mem::replace(&mut self.previous, *input);

        match self.state {
            DragState::Idle => {
                if !input.pressed || previous.pressed {
                    return None;
                }
                let geometry = self.geometry;
                let token = self.tokens.values_mut().find(|token| {
                    geometry
                        .home_box(token.anchor_slot, viewport)
                        .contains(input.pointer)
                })?;
                token.is_dragged = true;
                token.position = Some(input.pointer);
                let value = token.face_value;
                self.state = DragState::Dragging {
                    value,
                    moved: false,
                };
                debug!(value, "chip picked up");
                Some(DragEvent::Picked { value })
            }
            DragState::Dragging { value, moved } => {
                if input.pressed {
                    if input.pointer != previous.pointer {
                        if let Some(token) = self.tokens.get_mut(&value) {
                            token.position = Some(input.pointer);
                        }
                        self.state = DragState::Dragging { value, moved: true };
                    }
                    return None;
                }

                self.state = DragState::Idle;
                let token = self.tokens.get_mut(&value)?;
                token.is_dragged = false;
                token.position = None;

                if !moved {
                    debug!(value, "chip released without dragging");
                    return Some(DragEvent::Returned { value });
                }
                let Some(hit) = registry.hit_test(input.pointer) else {
                    debug!(value, "chip dropped off the board");
                    return Some(DragEvent::Returned { value });
                };

                let render_position = registry
                    .lookup(hit.region)
                    .map(|bounds| hit.subregion.anchor(bounds))
                    .unwrap_or(input.pointer);
                let coverage = expand(&hit, cell_size);
                info!(
                    value,
                    region = %hit.region,
                    subregion = ?hit.subregion,
                    numbers = ?coverage.labels(),
                    "bet placed"
                );
                token.bets.push(PlacedBet {
                    hit,
                    render_position,
                    coverage: coverage.clone(),
                });
                Some(DragEvent::Committed {
                    value,
                    region: hit.region,
                    subregion: hit.subregion,
                    coverage,
                })
            }
        }
    }
}
