//! Headless round: place one chip, press the spin button and wait for the
//! ball, driving the table with synthetic frames.

use anyhow::{anyhow, bail, Context, Result};
use roulette_table::render::NullCanvas;
use roulette_table::{
    Coverage, Frame, InputSnapshot, Point, TableConfig, TableEvent, TableState, Viewport,
};
use tracing::{debug, info};

/// Upper bound on simulated table time.
const MAX_SECONDS: f64 = 300.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Outcome {
    pub coverage: Coverage,
    pub lucky_number: u8,
    pub winning_bets: usize,
    pub seconds: f64,
}

struct Driver {
    table: TableState,
    canvas: NullCanvas,
    viewport: Viewport,
    dt: f64,
    events: Vec<TableEvent>,
}

impl Driver {
    fn step(&mut self, pointer: Point, pressed: bool) {
        let frame = Frame::new(InputSnapshot { pointer, pressed }, self.dt, self.viewport);
        for event in self.table.tick(&frame) {
            debug!(?event, "table event");
            self.events.push(event);
        }
        self.table.draw(&mut self.canvas, self.viewport);
    }

    fn idle(&mut self, pointer: Point, seconds: f64) {
        let frames = (seconds / self.dt).ceil() as usize;
        for _ in 0..frames {
            self.step(pointer, false);
        }
    }
}

pub fn run(config: TableConfig, chip: u64, bet: &str, fps: u32) -> Result<Outcome> {
    let viewport = Viewport::default();
    let cooldown = config.button_cooldown();
    let mut driver = Driver {
        table: TableState::new(config).context("Could not set up table")?,
        canvas: NullCanvas::default(),
        viewport,
        dt: 1.0 / f64::from(fps.max(1)),
        events: Vec::new(),
    };
    // First draw records the board and button geometry.
    driver.table.draw(&mut driver.canvas, viewport);

    let target = driver
        .table
        .registry()
        .lookup_label(bet)
        .ok_or_else(|| anyhow!("Unknown bet {bet:?}"))?
        .center();
    let token = driver
        .table
        .chips()
        .token(chip)
        .ok_or_else(|| anyhow!("No chip with value {chip}"))?;
    let home = driver
        .table
        .chips()
        .geometry()
        .home_center(token.anchor_slot(), viewport);

    info!(chip, bet, "placing chip");
    let midpoint = Point::new((home.x + target.x) / 2.0, (home.y + target.y) / 2.0);
    for (pointer, pressed) in [
        (home, false),
        (home, true),
        (midpoint, true),
        (target, true),
        (target, false),
    ] {
        driver.step(pointer, pressed);
    }
    let coverage = driver
        .events
        .iter()
        .find_map(|event| match event {
            TableEvent::BetPlaced { coverage, .. } => Some(coverage.clone()),
            _ => None,
        })
        .ok_or_else(|| anyhow!("Chip was not placed on {bet:?}"))?;

    let button = driver
        .table
        .button()
        .bounds()
        .ok_or_else(|| anyhow!("Spin button was never drawn"))?
        .center();
    driver.idle(button, cooldown);
    driver.step(button, true);
    let start = driver.table.clock();

    while driver.table.clock() - start < MAX_SECONDS {
        driver.step(button, false);
        if let Some(TableEvent::WheelSettled {
            lucky_number,
            winning_bets,
        }) = driver.events.last().cloned()
        {
            let seconds = driver.table.clock() - start;
            info!(lucky_number, winning_bets, seconds, "round finished");
            return Ok(Outcome {
                coverage,
                lucky_number,
                winning_bets,
                seconds,
            });
        }
    }
    bail!("Ball did not settle within {MAX_SECONDS} seconds")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_on_black() {
        let config = TableConfig {
            lucky_number: Some(11),
            ..TableConfig::default()
        };
        let outcome = run(config, 10, "black", 30).unwrap();
        assert_eq!(outcome.lucky_number, 11);
        assert_eq!(outcome.winning_bets, 1);
        assert_eq!(outcome.coverage.len(), 18);
        assert!(outcome.seconds > 30.0);
    }

    #[test]
    fn test_losing_round() {
        let config = TableConfig {
            lucky_number: Some(0),
            ..TableConfig::default()
        };
        let outcome = run(config, 50, "1-12", 60).unwrap();
        assert_eq!(outcome.lucky_number, 0);
        assert_eq!(outcome.winning_bets, 0);
    }

    #[test]
    fn test_unknown_inputs() {
        let err = run(TableConfig::default(), 10, "green", 30).unwrap_err();
        assert!(err.to_string().contains("Unknown bet"));
        let err = run(TableConfig::default(), 7, "red", 30).unwrap_err();
        assert!(err.to_string().contains("No chip"));
    }
}
