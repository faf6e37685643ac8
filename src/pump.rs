//! Periodic tick source for the main loop.
//!
//! A running pump is a background thread that posts `AppOp::Pump` into the
//! main channel every interval, tagged with the generation of the
//! registration that produced it. Stopping joins the thread, so nothing is
//! posted once `stop()` returns. Ticks already queued by an older
//! registration are recognised with `is_current()`.

use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

use crate::{AppOp, ScalarMessage};

struct Registration {
    stop_tx: Sender<()>,
    handle: thread::JoinHandle<()>,
}

pub struct Pump {
    main_tx: Sender<ScalarMessage>,
    generation: usize,
    active: Option<Registration>,
}

impl Pump {
    /// `main_tx` must be unbounded: `stop()` joins the pump thread and must
    /// never wait on a full queue drained by the caller.
    pub fn new(main_tx: Sender<ScalarMessage>) -> Self {
        Self {
            main_tx,
            generation: 0,
            active: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    /// True if `generation` belongs to the registration that is running now.
    pub fn is_current(&self, generation: usize) -> bool {
        self.active.is_some() && generation == self.generation
    }

    /// Starts ticking. Returns false if already running or the thread could
    /// not be spawned.
    pub fn start(&mut self, interval: Duration) -> bool {
        if self.is_running() {
            return false;
        }
        let generation = self.generation.wrapping_add(1);
        let (stop_tx, stop_rx) = crossbeam_channel::bounded(1);
        let main_tx = self.main_tx.clone();

        let spawned = thread::Builder::new()
            .name(format!("pump-{}", generation))
            .spawn(move || pump_thread(main_tx, stop_rx, interval, generation));

        match spawned {
            Ok(handle) => {
                self.generation = generation;
                self.active = Some(Registration { stop_tx, handle });
                log::debug!("pump {} started, interval {:?}", generation, interval);
                true
            }
            Err(e) => {
                log::error!("can't spawn pump thread: {:?}", e);
                false
            }
        }
    }

    /// Stops ticking and waits for the thread to exit.
    pub fn stop(&mut self) {
        if let Some(Registration { stop_tx, handle }) = self.active.take() {
            drop(stop_tx);
            if handle.join().is_err() {
                log::error!("pump {} thread panicked", self.generation);
            }
            log::debug!("pump {} stopped", self.generation);
        }
    }
}

impl Drop for Pump {
    fn drop(&mut self) {
        self.stop();
    }
}

fn pump_thread(
    main_tx: Sender<ScalarMessage>,
    stop_rx: Receiver<()>,
    interval: Duration,
    generation: usize,
) {
    loop {
        match stop_rx.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => {
                if main_tx.send(ScalarMessage::new(AppOp::Pump, generation)).is_err() {
                    log::debug!("pump {}: main loop gone", generation);
                    break;
                }
            }
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}
