//! The table aggregate and its per-frame tick.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tracing::{info, warn};

use crate::bets::{expand, Coverage};
use crate::button::SpinButton;
use crate::chips::{ChipRack, DragEvent};
use crate::config::TableConfig;
use crate::error::TableError;
use crate::geometry::GeometryRegistry;
use crate::input::{Frame, Viewport};
use crate::layout::{BoardLayout, TableRegion, MAX_NUMBER};
use crate::render::{self, Canvas};
use crate::status::{StatusMessage, Wallet};
use crate::wheel::WheelState;

/// What happened during a tick.
#[derive(Clone, Debug, PartialEq)]
pub enum TableEvent {
    ChipPicked {
        value: u64,
    },
    BetPlaced {
        value: u64,
        region: TableRegion,
        coverage: Coverage,
    },
    ChipReturned {
        value: u64,
    },
    SpinStarted {
        lucky_number: u8,
    },
    WheelSettled {
        lucky_number: u8,
        winning_bets: usize,
    },
    WheelDismissed,
}

enum LuckySource {
    Fixed(u8),
    Random(ChaCha20Rng),
}

impl LuckySource {
    fn next(&mut self) -> u8 {
        match self {
            LuckySource::Fixed(number) => *number,
            LuckySource::Random(rng) => rng.gen_range(0..=MAX_NUMBER),
        }
    }
}

/// Everything on the table: the board, the chip rack, the wheel, the spin
/// button and the wallet and status displays.
///
/// The host calls [`TableState::tick`] and then [`TableState::draw`] once
/// per frame.
pub struct TableState {
    config: TableConfig,
    layout: BoardLayout,
    registry: GeometryRegistry,
    highlighted: Coverage,
    chips: ChipRack,
    wheel: WheelState,
    button: SpinButton,
    wallet: Wallet,
    status: StatusMessage,
    clock: f64,
    lucky: LuckySource,
}

impl TableState {
    pub fn new(config: TableConfig) -> Result<Self, TableError> {
        config.validate()?;

        let mut chips = ChipRack::new(config.rack);
        for chip in &config.chips {
            chips.add_token(chip.value, chip.color)?;
        }
        let lucky = match (config.lucky_number, config.seed) {
            (Some(number), _) => LuckySource::Fixed(number),
            (None, Some(seed)) => LuckySource::Random(ChaCha20Rng::seed_from_u64(seed)),
            (None, None) => LuckySource::Random(ChaCha20Rng::from_entropy()),
        };
        info!(
            chips = config.chips.len(),
            fixed_lucky = ?config.lucky_number,
            seed = ?config.seed,
            "table ready"
        );

        Ok(Self {
            layout: config.layout(),
            registry: GeometryRegistry::new(config.boundary_width),
            highlighted: Coverage::empty(),
            chips,
            wheel: WheelState::new(config.wheel),
            button: SpinButton::new("Spin", config.button_cooldown()),
            wallet: Wallet::new(config.holdings),
            status: StatusMessage::default(),
            clock: 0.0,
            lucky,
            config,
        })
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    pub fn registry(&self) -> &GeometryRegistry {
        &self.registry
    }

    /// Numbers the dragged chip would cover if dropped now.
    pub fn highlighted(&self) -> &Coverage {
        &self.highlighted
    }

    pub fn chips(&self) -> &ChipRack {
        &self.chips
    }

    pub fn wheel(&self) -> &WheelState {
        &self.wheel
    }

    pub fn button(&self) -> &SpinButton {
        &self.button
    }

    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    pub fn status(&self) -> &StatusMessage {
        &self.status
    }

    /// Seconds of table time: the sum of every tick's elapsed time.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Start a spin on the next lucky number. A spin already in progress is
    /// re-armed from the start. Refused while a chip is in hand, so no bet
    /// can land after the round has been scored.
    pub fn spin(&mut self) -> Result<u8, TableError> {
        self.ensure_hands_free()?;
        let lucky_number = self.lucky.next();
        self.spin_with(lucky_number)?;
        Ok(lucky_number)
    }

    pub fn spin_with(&mut self, lucky_number: u8) -> Result<(), TableError> {
        self.ensure_hands_free()?;
        self.wheel.start_spin(lucky_number)?;
        self.status.set("Spinning...");
        Ok(())
    }

    fn ensure_hands_free(&self) -> Result<(), TableError> {
        match self.chips.dragged() {
            Some(token) => Err(TableError::ChipInHand {
                value: token.face_value(),
            }),
            None => Ok(()),
        }
    }

    /// Remove every placed bet.
    pub fn clear_bets(&mut self) -> usize {
        let removed = self.chips.clear_bets();
        self.wallet.set_current_bet(self.chips.placed_total());
        removed
    }

    /// Bets whose coverage includes `number`.
    pub fn winning_bets(&self, number: u8) -> usize {
        self.chips
            .placed_bets()
            .filter(|(_, bet)| bet.coverage.covers(number))
            .count()
    }

    /// Run one frame: pointer sensing, then highlight expansion, then wheel
    /// physics.
    pub fn tick(&mut self, frame: &Frame) -> Vec<TableEvent> {
        let dt = frame.elapsed();
        self.clock += dt;
        let input = frame.input;
        let mut events = Vec::new();

        if self.wheel.is_visible() {
            // The wheel dialog owns the pointer.
            self.chips.observe(&input);
            self.button.observe(&input);
            if self.wheel.dismiss(input.pressed) {
                self.button.suppress(self.clock);
                self.status.clear();
                events.push(TableEvent::WheelDismissed);
            }
        } else if self.chips.is_dragging() {
            self.button.observe(&input);
            if let Some(event) = self.sense_chips(frame) {
                events.push(event);
            }
        } else if self.button.sense(&input, self.clock) {
            self.chips.observe(&input);
            match self.spin() {
                Ok(lucky_number) => events.push(TableEvent::SpinStarted { lucky_number }),
                Err(err) => warn!(?err, "spin rejected"),
            }
        } else if let Some(event) = self.sense_chips(frame) {
            events.push(event);
        }

        self.highlighted = if self.wheel.is_visible() {
            Coverage::empty()
        } else {
            self.chips
                .hover(&input, &self.registry)
                .map(|hit| expand(&hit, self.config.cell_size))
                .unwrap_or_default()
        };

        if self.wheel.advance(dt) {
            let lucky_number = self.wheel.lucky_number();
            let winning_bets = self.winning_bets(lucky_number);
            let message = match winning_bets {
                0 => format!("Ball landed on {lucky_number}"),
                1 => format!("Ball landed on {lucky_number}\n1 winning bet"),
                n => format!("Ball landed on {lucky_number}\n{n} winning bets"),
            };
            self.status.set(message);
            events.push(TableEvent::WheelSettled {
                lucky_number,
                winning_bets,
            });
        }

        self.wallet.set_current_bet(self.chips.placed_total());
        events
    }

    fn sense_chips(&mut self, frame: &Frame) -> Option<TableEvent> {
        let event = self.chips.sense(
            &frame.input,
            frame.viewport,
            &self.registry,
            self.config.cell_size,
        )?;
        Some(self.on_drag(event))
    }

    fn on_drag(&mut self, event: DragEvent) -> TableEvent {
        match event {
            DragEvent::Picked { value } => TableEvent::ChipPicked { value },
            DragEvent::Returned { value } => TableEvent::ChipReturned { value },
            DragEvent::Committed {
                value,
                region,
                coverage,
                ..
            } => {
                self.status.set(format!("Bet {value} on {region}"));
                TableEvent::BetPlaced {
                    value,
                    region,
                    coverage,
                }
            }
        }
    }

    /// Draw the whole table. Board regions are registered for hit-testing
    /// as they are drawn.
    pub fn draw<C: Canvas + ?Sized>(&mut self, canvas: &mut C, viewport: Viewport) {
        render::draw_board(
            canvas,
            &self.layout,
            &mut self.registry,
            &self.highlighted,
            self.config.line_width,
        );
        render::draw_button(canvas, &mut self.button, viewport);
        render::draw_wallet(canvas, &self.wallet, viewport);
        render::draw_status(canvas, &self.status, viewport);
        render::draw_chips(canvas, &self.chips, viewport);
        render::draw_wheel(canvas, &self.wheel, viewport);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point, Rect};
    use crate::input::InputSnapshot;
    use crate::layout::{Special, RED_NUMBERS};
    use crate::render::NullCanvas;
    use crate::wheel::WheelPhase;

    const DT: f64 = 1.0 / 60.0;

    fn table(config: TableConfig) -> TableState {
        let mut table = TableState::new(config).unwrap();
        table.draw(&mut NullCanvas::default(), Viewport::default());
        table
    }

    fn frame(point: Point, pressed: bool) -> Frame {
        Frame::new(
            InputSnapshot {
                pointer: point,
                pressed,
            },
            DT,
            Viewport::default(),
        )
    }

    fn home(table: &TableState, value: u64) -> Point {
        let slot = table.chips().token(value).unwrap().anchor_slot();
        table
            .chips()
            .geometry()
            .home_center(slot, Viewport::default())
    }

    fn drag(table: &mut TableState, value: u64, to: Point) -> Vec<TableEvent> {
        let from = home(table, value);
        let mut events = Vec::new();
        for (point, pressed) in [
            (from, false),
            (from, true),
            (Point::new((from.x + to.x) / 2.0, (from.y + to.y) / 2.0), true),
            (to, true),
            (to, false),
        ] {
            events.extend(table.tick(&frame(point, pressed)));
        }
        events
    }

    fn button_center(table: &TableState) -> Point {
        table.button().bounds().map(|b: Rect| b.center()).unwrap()
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = TableConfig {
            lucky_number: Some(40),
            ..TableConfig::default()
        };
        assert!(matches!(
            TableState::new(config),
            Err(TableError::InvalidLuckyNumber { got: 40, .. })
        ));

        let mut config = TableConfig::default();
        config.chips.push(config.chips[0].clone());
        assert_eq!(
            TableState::new(config).err(),
            Some(TableError::DuplicateChip { value: 10 })
        );
    }

    #[test]
    fn test_drag_token_onto_red() {
        let mut table = table(TableConfig::default());
        let red = table
            .registry()
            .lookup(TableRegion::Special(Special::Red))
            .unwrap()
            .center();

        let events = drag(&mut table, 10, red);
        let placed: Vec<_> = events
            .iter()
            .filter_map(|event| match event {
                TableEvent::BetPlaced {
                    value,
                    region,
                    coverage,
                } => Some((*value, *region, coverage.clone())),
                _ => None,
            })
            .collect();
        assert_eq!(placed.len(), 1);
        let (value, region, coverage) = &placed[0];
        assert_eq!(*value, 10);
        assert_eq!(*region, TableRegion::Special(Special::Red));
        assert_eq!(coverage.iter().collect::<Vec<_>>(), RED_NUMBERS.to_vec());

        assert_eq!(table.chips().token(10).unwrap().bets().len(), 1);
        assert_eq!(table.wallet().current_bet(), 10);
        assert_eq!(table.status().message(), "Bet 10 on red");
    }

    #[test]
    fn test_highlight_follows_dragged_chip() {
        let mut table = table(TableConfig::default());
        let from = home(&table, 50);
        table.tick(&frame(from, true));
        assert!(table.highlighted().is_empty());

        // Top-left corner of 5.
        table.tick(&frame(Point::new(152.0, 102.0), true));
        assert_eq!(table.highlighted().iter().collect::<Vec<_>>(), vec![1, 2, 4, 5]);

        table.tick(&frame(Point::new(152.0, 102.0), false));
        assert!(table.highlighted().is_empty());
    }

    #[test]
    fn test_spin_settles_and_dismisses() {
        let config = TableConfig {
            lucky_number: Some(11),
            ..TableConfig::default()
        };
        let mut table = table(config);
        // Straight bet on 11 and a bet on black, which includes 11.
        let eleven = table.registry().lookup(TableRegion::Number(11)).unwrap().center();
        let black = table
            .registry()
            .lookup(TableRegion::Special(Special::Black))
            .unwrap()
            .center();
        drag(&mut table, 10, eleven);
        drag(&mut table, 50, black);
        assert_eq!(table.wallet().current_bet(), 60);

        // Wait out the cooldown opened by the last chip press.
        let button = button_center(&table);
        for _ in 0..30 {
            table.tick(&frame(button, false));
        }
        let events = table.tick(&frame(button, true));
        assert_eq!(events, vec![TableEvent::SpinStarted { lucky_number: 11 }]);
        assert_eq!(table.wheel().phase(), WheelPhase::Spinning);

        let mut settled = None;
        for _ in 0..60 * 120 {
            for event in table.tick(&frame(button, false)) {
                if let TableEvent::WheelSettled {
                    lucky_number,
                    winning_bets,
                } = event
                {
                    settled = Some((lucky_number, winning_bets));
                }
            }
            if settled.is_some() {
                break;
            }
        }
        assert_eq!(settled, Some((11, 2)));
        assert_eq!(table.wheel().phase(), WheelPhase::Settled);
        assert_eq!(table.status().message(), "Ball landed on 11\n2 winning bets");

        // Pressing anywhere dismisses without starting another spin, even on
        // the button, and holding the press well past the cooldown does not
        // re-trigger it.
        assert_eq!(table.tick(&frame(button, true)), vec![TableEvent::WheelDismissed]);
        for _ in 0..40 {
            assert!(table.tick(&frame(button, true)).is_empty());
        }
        assert_eq!(table.wheel().phase(), WheelPhase::Hidden);
        assert_eq!(table.status().message(), "");

        // A fresh click spins again.
        assert!(table.tick(&frame(button, false)).is_empty());
        assert_eq!(
            table.tick(&frame(button, true)),
            vec![TableEvent::SpinStarted { lucky_number: 11 }]
        );
    }

    #[test]
    fn test_spin_refused_with_chip_in_hand() {
        let mut table = table(TableConfig {
            lucky_number: Some(11),
            ..TableConfig::default()
        });
        let black = table
            .registry()
            .lookup(TableRegion::Special(Special::Black))
            .unwrap()
            .center();
        let from = home(&table, 10);
        table.tick(&frame(from, false));
        table.tick(&frame(from, true));
        table.tick(&frame(black, true));
        assert!(table.chips().is_dragging());

        assert_eq!(table.spin(), Err(TableError::ChipInHand { value: 10 }));
        assert_eq!(
            table.spin_with(11),
            Err(TableError::ChipInHand { value: 10 })
        );
        assert_eq!(table.wheel().phase(), WheelPhase::Hidden);

        // The drop still lands before any round is scored.
        let events = table.tick(&frame(black, false));
        assert!(matches!(
            events.as_slice(),
            [TableEvent::BetPlaced { value: 10, .. }]
        ));
        assert_eq!(table.spin(), Ok(11));
        assert_eq!(table.winning_bets(11), 1);
    }

    #[test]
    fn test_no_highlight_while_wheel_visible() {
        let mut table = table(TableConfig {
            lucky_number: Some(3),
            ..TableConfig::default()
        });
        table.spin().unwrap();
        let from = home(&table, 50);
        table.tick(&frame(from, true));
        table.tick(&frame(Point::new(152.0, 102.0), true));
        assert!(!table.chips().is_dragging());
        assert!(table.highlighted().is_empty());
    }

    #[test]
    fn test_chips_ignored_while_wheel_visible() {
        let mut table = table(TableConfig {
            lucky_number: Some(0),
            ..TableConfig::default()
        });
        table.spin().unwrap();
        let from = home(&table, 10);
        assert!(table.tick(&frame(from, true)).is_empty());
        assert!(!table.chips().is_dragging());
    }

    #[test]
    fn test_button_ignored_while_dragging() {
        let mut table = table(TableConfig::default());
        let from = home(&table, 10);
        let button = button_center(&table);
        table.tick(&frame(from, true));
        // Let the press cooldown lapse while still holding the chip.
        for _ in 0..30 {
            table.tick(&frame(from.offset(1.0, 0.0), true));
        }
        let events = table.tick(&frame(button, true));
        assert!(events.is_empty());
        assert_eq!(table.wheel().phase(), WheelPhase::Hidden);
        let events = table.tick(&frame(button, false));
        assert_eq!(events, vec![TableEvent::ChipReturned { value: 10 }]);
    }

    #[test]
    fn test_seeded_spins_repeat() {
        let config = TableConfig {
            seed: Some(7),
            ..TableConfig::default()
        };
        let mut first = TableState::new(config.clone()).unwrap();
        let mut second = TableState::new(config).unwrap();
        for _ in 0..10 {
            let lucky = first.spin().unwrap();
            assert!(lucky <= MAX_NUMBER);
            assert_eq!(second.spin().unwrap(), lucky);
        }
    }

    #[test]
    fn test_clear_bets_resets_wallet() {
        let mut table = table(TableConfig::default());
        let red = table
            .registry()
            .lookup(TableRegion::Special(Special::Red))
            .unwrap()
            .center();
        drag(&mut table, 100, red);
        assert_eq!(table.wallet().current_bet(), 100);
        assert_eq!(table.clear_bets(), 1);
        assert_eq!(table.wallet().current_bet(), 0);
    }

    #[test]
    fn test_clock_ignores_bad_deltas() {
        let mut table = table(TableConfig::default());
        let input = InputSnapshot::default();
        table.tick(&Frame::new(input, 0.5, Viewport::default()));
        table.tick(&Frame::new(input, f64::NAN, Viewport::default()));
        table.tick(&Frame::new(input, -1.0, Viewport::default()));
        assert_eq!(table.clock(), 0.5);
    }
}
