//! Running the engine on its own thread with cooperative shutdown.

use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use bt_core::{Clock, RandomSource};
use bt_output::EventSink;

use crate::{SimEngine, SimError, SimResult};

// ── StopSignal ────────────────────────────────────────────────────────────────

/// Cooperative cancellation token.
///
/// Cloning shares the flag.  Waiting on it wakes immediately when another
/// clone calls [`request_stop`][Self::request_stop].
#[derive(Clone, Default)]
pub struct StopSignal {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_stop(&self) {
        let (flag, cvar) = &*self.inner;
        *flag.lock().unwrap_or_else(PoisonError::into_inner) = true;
        cvar.notify_all();
    }

    pub fn is_stopped(&self) -> bool {
        *self.inner.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sleep for up to `timeout`.  Returns `true` as soon as a stop has been
    /// requested, `false` if the full timeout elapsed.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let (flag, cvar) = &*self.inner;
        let deadline = Instant::now() + timeout;
        let mut stopped = flag.lock().unwrap_or_else(PoisonError::into_inner);
        while !*stopped {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            stopped = cvar
                .wait_timeout(stopped, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
        true
    }
}

// ── SimHandle ─────────────────────────────────────────────────────────────────

/// A running engine.  Dropping the handle without calling
/// [`stop`][Self::stop] detaches the thread.
pub struct SimHandle<R: RandomSource, S: EventSink, C: Clock> {
    stop:   StopSignal,
    thread: JoinHandle<(SimEngine<R, S, C>, SimResult<()>)>,
}

/// Move `engine` onto a dedicated thread and start [`SimEngine::run`].
pub fn spawn<R, S, C>(mut engine: SimEngine<R, S, C>) -> SimResult<SimHandle<R, S, C>>
where
    R: RandomSource + Send + 'static,
    S: EventSink + Send + 'static,
    C: Clock + Send + 'static,
{
    let stop = StopSignal::new();
    let thread_stop = stop.clone();
    let thread = thread::Builder::new()
        .name("bus-sim".into())
        .spawn(move || {
            let result = engine.run(&thread_stop);
            (engine, result)
        })
        .map_err(SimError::Spawn)?;
    Ok(SimHandle { stop, thread })
}

impl<R: RandomSource, S: EventSink, C: Clock> SimHandle<R, S, C> {
    /// `true` once the engine thread has returned (stopped or failed).
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Request a stop, wait for the in-flight tick to complete, and hand the
    /// engine back.  A sink failure during the run is returned as the error.
    pub fn stop(self) -> SimResult<SimEngine<R, S, C>> {
        self.stop.request_stop();
        let (engine, result) = self.thread.join().map_err(|_| SimError::Panicked)?;
        result.map(|()| engine)
    }
}
