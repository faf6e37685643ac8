mod clock;
mod config;
mod logging;
mod pump;
mod stopwatch;
mod ui;

use std::io::{self, BufRead, Write};
use std::thread;

use anyhow::Context;
use crossbeam_channel::{Receiver, Sender};
use num_traits::FromPrimitive;
use stopwatch_core::Phase;

use crate::clock::{Clock, SystemClock};
use crate::config::AppConfig;
use crate::logging::{init_logging, LoggingConfig};
use crate::pump::Pump;
use crate::stopwatch::StopwatchEngine;

const APP_NAME: &str = "Stopwatch";

#[derive(Debug, Clone, Copy, PartialEq, Eq, num_derive::FromPrimitive)]
pub enum AppOp {
    Redraw = 0,
    Rawkeys,
    Pump,
    Quit,
}

/// Opcode plus one argument, the unit carried on the main channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalarMessage {
    pub id: usize,
    pub arg1: usize,
}

impl ScalarMessage {
    pub fn new(op: AppOp, arg1: usize) -> Self {
        Self { id: op as usize, arg1 }
    }
}

struct StopwatchApp<C: Clock, W: Write> {
    engine: StopwatchEngine<C>,
    config: AppConfig,
    out: W,
}

impl<C: Clock, W: Write> StopwatchApp<C, W> {
    fn new(engine: StopwatchEngine<C>, config: AppConfig, out: W) -> Self {
        Self { engine, config, out }
    }

    fn redraw(&mut self) -> anyhow::Result<()> {
        let mut screen = String::new();
        ui::clear_screen(&mut screen);
        ui::draw_stopwatch(
            &mut screen,
            &self.engine.snapshot(),
            self.engine.lap_scroll_offset(),
            self.config.visible_laps,
        )
        .context("can't format screen")?;
        self.out.write_all(screen.as_bytes()).context("can't write screen")?;
        self.out.flush().context("can't flush screen")?;
        Ok(())
    }

    fn handle_pump(&mut self, generation: usize) -> anyhow::Result<()> {
        if self.engine.handle_pump(generation) {
            self.redraw()?;
        }
        Ok(())
    }

    /// Returns false when the key asks to quit.
    fn handle_key(&mut self, key: char) -> anyhow::Result<bool> {
        let changed = match key {
            '\r' | '\n' | ' ' | 's' => self.engine.toggle(),
            'l' => self.engine.lap(),
            'r' => self.engine.reset(),
            'j' | '↓' => self.engine.scroll_down(),
            'k' | '↑' => self.engine.scroll_up(),
            'q' => return Ok(false),
            _ => false,
        };
        if changed {
            self.redraw()?;
        }
        Ok(true)
    }

    fn shutdown(&mut self) {
        if self.engine.phase() == Phase::Running {
            self.engine.stop();
        }
        let snap = self.engine.snapshot();
        log::info!(
            "final time {} ms over {} laps",
            snap.total_elapsed_ms,
            snap.laps.len()
        );
    }
}

fn run<C: Clock, W: Write>(app: &mut StopwatchApp<C, W>, rx: &Receiver<ScalarMessage>) -> anyhow::Result<()> {
    app.redraw()?;

    for msg in rx.iter() {
        match FromPrimitive::from_usize(msg.id) {
            Some(AppOp::Redraw) => app.redraw()?,
            Some(AppOp::Rawkeys) => {
                let key = char::from_u32(msg.arg1 as u32).unwrap_or('\u{0000}');
                if key != '\u{0000}' && !app.handle_key(key)? {
                    break;
                }
            }
            Some(AppOp::Pump) => app.handle_pump(msg.arg1)?,
            Some(AppOp::Quit) => break,
            None => log::error!("unknown opcode: {:?}", msg),
        }
    }

    app.shutdown();
    Ok(())
}

/// Turns stdin lines into key messages. An empty line is Enter.
fn input_thread(main_tx: Sender<ScalarMessage>) {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                log::error!("stdin read failed: {:?}", e);
                break;
            }
        };
        let keys: Vec<char> = if line.is_empty() {
            vec!['\n']
        } else {
            line.chars().collect()
        };
        for key in keys {
            if main_tx.send(ScalarMessage::new(AppOp::Rawkeys, key as usize)).is_err() {
                return;
            }
        }
    }
    main_tx.send(ScalarMessage::new(AppOp::Quit, 0)).ok();
}

fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    init_logging(LoggingConfig {
        env_filter: config.log_filter.clone(),
        ..LoggingConfig::default()
    });
    log::info!("{} PID is {}", APP_NAME, std::process::id());
    log::debug!("config: {:?}", config);

    // Unbounded: the pump thread must never block on a send while the loop
    // is joining it.
    let (main_tx, main_rx) = crossbeam_channel::unbounded();

    let input_tx = main_tx.clone();
    thread::Builder::new()
        .name("input".into())
        .spawn(move || input_thread(input_tx))
        .context("can't spawn input thread")?;

    let engine = StopwatchEngine::new(SystemClock, Pump::new(main_tx), &config);
    let mut app = StopwatchApp::new(engine, config, io::stdout());
    run(&mut app, &main_rx)?;

    log::info!("{} exiting", APP_NAME);
    Ok(())
}
