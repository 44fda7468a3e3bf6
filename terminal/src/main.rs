use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event as CEvent, EventStream, KeyCode, KeyEvent,
    KeyEventKind, KeyModifiers,
};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect as Area};
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::widgets::canvas::Canvas as CanvasWidget;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Terminal;
use roulette_table::{Frame, TableState, Viewport, WheelPhase};
use tokio::select;
use tracing::{info, warn, Level};

mod canvas;
mod pointer;
mod settings;
mod simulate;

use canvas::ShapeBuffer;
use pointer::{CellMapper, PointerTracker};
use settings::{Overrides, Settings};

const VIEWPORT: Viewport = Viewport::new(1000.0, 500.0);

/// CLI flags (override the config file)
#[derive(Parser, Debug)]
#[command(name = "roulette-terminal", about = "Mouse-driven roulette table in the terminal")]
struct Args {
    /// YAML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Land every spin on this number
    #[arg(long)]
    lucky: Option<u8>,

    /// Seed for drawing lucky numbers
    #[arg(long)]
    seed: Option<u64>,

    /// trace, debug, info, warn or error
    #[arg(long)]
    log_level: Option<String>,

    /// Log file used while the terminal UI is running
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Frames per second
    #[arg(long)]
    fps: Option<u32>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// Play one scripted round without the terminal UI, logging to stderr
    Simulate {
        /// Face value of the chip to place
        #[arg(long, default_value_t = 10)]
        chip: u64,

        /// Region label to bet on ("17", "red", "1-12", "2nd", ...)
        #[arg(long, default_value = "red")]
        bet: String,
    },
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            lucky: self.lucky,
            seed: self.seed,
            log_level: self.log_level.clone(),
            log_file: self.log_file.clone(),
            fps: self.fps,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = Settings::load(args.config.as_deref())?;
    settings.apply(args.overrides());
    let level = settings.validate()?;

    match args.command {
        Some(Command::Simulate { chip, bet }) => {
            tracing_subscriber::fmt()
                .with_max_level(level)
                .with_writer(io::stderr)
                .init();
            let outcome = simulate::run(settings.table, chip, &bet, settings.fps)?;
            println!(
                "bet {chip} on {bet} covering {:?}: ball landed on {} after {:.1}s, {} winning bet(s)",
                outcome.coverage.labels(),
                outcome.lucky_number,
                outcome.seconds,
                outcome.winning_bets
            );
            Ok(())
        }
        None => run_terminal(settings, level).await,
    }
}

fn init_file_logging(level: Level, path: &std::path::Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Could not create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

async fn run_terminal(settings: Settings, level: Level) -> Result<()> {
    init_file_logging(level, &settings.log_path())?;
    let table = TableState::new(settings.table.clone()).context("Could not set up table")?;

    // TUI setup
    let _guard = TerminalGuard::enter()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear()?;

    event_loop(&mut terminal, table, settings.fps).await
}

/// Raw mode, the alternate screen and mouse capture, undone on drop.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("enable raw mode")?;
        let guard = TerminalGuard;
        crossterm::execute!(
            io::stdout(),
            crossterm::terminal::EnterAlternateScreen,
            EnableMouseCapture
        )
        .context("enter alternate screen")?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(err) = disable_raw_mode() {
            warn!(?err, "could not disable raw mode");
        }
        if let Err(err) = crossterm::execute!(
            io::stdout(),
            crossterm::terminal::LeaveAlternateScreen,
            DisableMouseCapture,
            crossterm::cursor::Show
        ) {
            warn!(?err, "could not restore terminal");
        }
    }
}

enum Flow {
    Continue,
    Quit,
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut table: TableState,
    fps: u32,
) -> Result<()> {
    let mut events = EventStream::new();
    let mut ticker = tokio::time::interval(Duration::from_secs_f64(1.0 / f64::from(fps)));
    let mut pointer = PointerTracker::default();
    let mut mapper = CellMapper {
        area: Area::default(),
        viewport: VIEWPORT,
    };
    let mut last_tick = Instant::now();
    info!(fps, "terminal table started");

    loop {
        select! {
            maybe_ev = events.next() => {
                match maybe_ev {
                    Some(Ok(ev)) => {
                        if let Flow::Quit = handle_event(ev, &mut table, &mut pointer, &mapper) {
                            break;
                        }
                    }
                    Some(Err(err)) => return Err(err).context("read terminal event"),
                    None => break,
                }
            }
            _ = ticker.tick() => {
                let now = Instant::now();
                let dt = now.duration_since(last_tick).as_secs_f64();
                last_tick = now;

                let frame = Frame::new(pointer.snapshot(), dt, VIEWPORT);
                for event in table.tick(&frame) {
                    info!(?event, "table event");
                }
                terminal.draw(|f| {
                    mapper.area = draw_ui(f, &mut table);
                })?;
            }
        }
    }
    info!("terminal table stopped");
    Ok(())
}

fn handle_event(
    ev: CEvent,
    table: &mut TableState,
    pointer: &mut PointerTracker,
    mapper: &CellMapper,
) -> Flow {
    match ev {
        CEvent::Mouse(mouse) => {
            pointer.handle(&mouse, mapper);
            Flow::Continue
        }
        CEvent::Key(key) => handle_key(key, table),
        _ => Flow::Continue,
    }
}

fn handle_key(key: KeyEvent, table: &mut TableState) -> Flow {
    if key.kind != KeyEventKind::Press {
        return Flow::Continue;
    }
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) | (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => {
            Flow::Quit
        }
        (KeyCode::Char('s'), _) => {
            if table.wheel().phase() == WheelPhase::Hidden {
                if let Err(err) = table.spin() {
                    warn!(?err, "spin rejected");
                }
            }
            Flow::Continue
        }
        (KeyCode::Char('c'), _) => {
            if table.wheel().phase() == WheelPhase::Hidden {
                table.clear_bets();
            }
            Flow::Continue
        }
        _ => Flow::Continue,
    }
}

/// Draw the table and the key help line. Returns the cell area the table
/// occupies, for mapping mouse positions.
fn draw_ui(f: &mut ratatui::Frame, table: &mut TableState) -> Area {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)].as_ref())
        .split(f.area());

    let block = Block::default().borders(Borders::ALL).title("Roulette");
    let inner = block.inner(chunks[0]);
    let columns = f64::from(inner.width.max(1));
    let rows = f64::from(inner.height.max(1));
    // Braille markers give 2x4 dots per cell.
    let step = (VIEWPORT.width / (2.0 * columns)).max(VIEWPORT.height / (4.0 * rows));
    let mut buffer = ShapeBuffer::new(VIEWPORT.height, step, VIEWPORT.width / columns);
    table.draw(&mut buffer, VIEWPORT);

    let widget = CanvasWidget::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([0.0, VIEWPORT.width])
        .y_bounds([0.0, VIEWPORT.height])
        .paint(|ctx| buffer.paint(ctx));
    f.render_widget(widget, chunks[0]);

    let help = Paragraph::new("drag chips onto the board | s spin | c clear bets | q quit")
        .style(Style::default().fg(Color::Gray));
    f.render_widget(help, chunks[1]);
    inner
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let args = Args::parse_from(["roulette-terminal"]);
        assert_eq!(args.command, None);
        assert_eq!(args.overrides(), Overrides::default());
    }

    #[test]
    fn test_parse_overrides() {
        let args = Args::parse_from([
            "roulette-terminal",
            "--lucky",
            "11",
            "--seed",
            "42",
            "--log-level",
            "debug",
            "--fps",
            "60",
            "--config",
            "table.yaml",
        ]);
        assert_eq!(args.config, Some(PathBuf::from("table.yaml")));
        let overrides = args.overrides();
        assert_eq!(overrides.lucky, Some(11));
        assert_eq!(overrides.seed, Some(42));
        assert_eq!(overrides.log_level.as_deref(), Some("debug"));
        assert_eq!(overrides.fps, Some(60));
    }

    #[test]
    fn test_parse_simulate() {
        let args = Args::parse_from(["roulette-terminal", "--lucky", "3", "simulate", "--bet", "3rd"]);
        assert_eq!(
            args.command,
            Some(Command::Simulate {
                chip: 10,
                bet: "3rd".to_string()
            })
        );
        assert_eq!(args.lucky, Some(3));
    }

    #[test]
    fn test_lucky_out_of_u8_range_rejected() {
        assert!(Args::try_parse_from(["roulette-terminal", "--lucky", "300"]).is_err());
    }

    #[test]
    fn test_keys() {
        let mut table = TableState::new(roulette_table::TableConfig {
            lucky_number: Some(5),
            ..Default::default()
        })
        .unwrap();
        let press = |code, modifiers| KeyEvent::new(code, modifiers);
        assert!(matches!(
            handle_key(press(KeyCode::Char('s'), KeyModifiers::NONE), &mut table),
            Flow::Continue
        ));
        assert_eq!(table.wheel().phase(), WheelPhase::Spinning);
        assert!(matches!(
            handle_key(press(KeyCode::Char('c'), KeyModifiers::CONTROL), &mut table),
            Flow::Quit
        ));
        assert!(matches!(
            handle_key(press(KeyCode::Char('q'), KeyModifiers::NONE), &mut table),
            Flow::Quit
        ));
    }

    #[test]
    fn test_spin_key_ignored_with_chip_in_hand() {
        let mut table = TableState::new(roulette_table::TableConfig {
            lucky_number: Some(5),
            ..Default::default()
        })
        .unwrap();
        table.draw(&mut roulette_table::render::NullCanvas::default(), VIEWPORT);
        let slot = table.chips().token(10).unwrap().anchor_slot();
        let home = table.chips().geometry().home_center(slot, VIEWPORT);
        let input = |x: f64, y: f64, pressed| {
            Frame::new(roulette_table::InputSnapshot::new(x, y, pressed), 0.02, VIEWPORT)
        };
        table.tick(&input(home.x, home.y, true));
        table.tick(&input(300.0, 200.0, true));
        assert!(table.chips().is_dragging());

        handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE), &mut table);
        assert_eq!(table.wheel().phase(), WheelPhase::Hidden);
    }
}
