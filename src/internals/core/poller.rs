use std::{
    io,
    sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError},
    thread::{self, JoinHandle},
    time::Duration,
};

use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

use crate::models::distance::DistanceToTarget;

use super::{
    monitor::StatusMonitor,
    ports::{MultiPort, StatusSource},
};

const THREAD_NAME: &str = "drive-status-poller";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    Running,
    AbortRequested,
}

/// Lifecycle of a poller.
/// `Idle -> Running -> Stopping -> Stopped`, or `Idle -> Stopped` if the
/// poller is stopped before it was ever started.
///
/// `Stopping` only exists while `stop` holds the exclusive borrow and joins
/// the worker, so `lifecycle()` never returns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Idle,
    Running,
    /// Transient. Never observed through `lifecycle()`.
    Stopping,
    Stopped,
}

#[derive(Error, Debug)]
pub enum PollerError {
    /// `start` was called on a poller that already ran.
    #[error("Poller can only be started while idle. Current lifecycle: {0:?}")]
    NotIdle(Lifecycle),

    /// The OS refused to create the worker thread.
    #[error("Failed to spawn poller thread.")]
    Spawn(#[source] io::Error),
}

/// Everything the worker and the owner share. Guarded by a single mutex.
struct PollerState<S: StatusSource> {
    run_state: RunState,
    monitor: StatusMonitor<S>,
}

struct Shared<S: StatusSource> {
    state: Mutex<PollerState<S>>,
    condition: Condvar,
}

impl<S: StatusSource> Shared<S> {
    /// A panicking port poisons the lock. The state itself stays consistent,
    /// so keep going with it.
    fn lock(&self) -> MutexGuard<'_, PollerState<S>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Background worker which samples a `StatusSource` every `interval` and
/// notifies its ports when the observation changes.
///
/// The worker runs on its own OS thread. `stop` wakes it immediately rather
/// than waiting out the current interval.
///
/// ```no_run
/// use std::time::Duration;
/// use drive_status::externals::simulation::adapters::ReplayStatusSource;
/// use drive_status::internals::core::{poller::StatusPoller, ports::MultiPort};
/// use drive_status::models::status_event::StatusEvent;
///
/// let ports: MultiPort = vec![Box::new(|event: StatusEvent| println!("{}", event))];
/// let mut poller = StatusPoller::new(ReplayStatusSource::recorded_descent(), ports, Duration::from_millis(500));
/// poller.start().expect("Failed to start poller.");
/// std::thread::sleep(Duration::from_secs(2));
/// poller.stop();
/// ```
pub struct StatusPoller<S: StatusSource + 'static> {
    shared: Arc<Shared<S>>,
    interval: Duration,
    lifecycle: Lifecycle,
    handle: Option<JoinHandle<()>>,
}

impl<S: StatusSource + 'static> StatusPoller<S> {
    pub fn new(source: S, ports: MultiPort, interval: Duration) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(PollerState {
                    run_state: RunState::Running,
                    monitor: StatusMonitor::new(source, ports),
                }),
                condition: Condvar::new(),
            }),
            interval,
            lifecycle: Lifecycle::Idle,
            handle: None,
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Last distance delivered to the ports. Unknown before the first tick.
    pub fn last_distance(&self) -> DistanceToTarget {
        self.shared.lock().monitor.previous_distance()
    }

    /// Spawn the worker thread. Only valid from `Lifecycle::Idle`.
    pub fn start(&mut self) -> Result<(), PollerError> {
        if self.lifecycle != Lifecycle::Idle {
            return Err(PollerError::NotIdle(self.lifecycle));
        }

        let shared = self.shared.clone();
        let interval = self.interval;
        let handle = thread::Builder::new()
            .name(THREAD_NAME.into())
            .spawn(move || run_poll_loop(shared, interval))
            .map_err(PollerError::Spawn)?;

        self.handle = Some(handle);
        self.lifecycle = Lifecycle::Running;
        debug!("Spawned poller thread. Interval: {:?}", interval);
        Ok(())
    }

    /// Request the worker to abort, wake it, and wait for it to exit.
    /// Calling this more than once, or on a poller that was never started,
    /// does nothing beyond marking it stopped.
    pub fn stop(&mut self) {
        let handle = match self.handle.take() {
            None => {
                if self.lifecycle != Lifecycle::Stopped {
                    debug!("Stopping a poller that was never started.");
                    self.lifecycle = Lifecycle::Stopped;
                }
                return;
            }
            Some(handle) => handle,
        };

        self.lifecycle = Lifecycle::Stopping;
        {
            let mut state = self.shared.lock();
            state.run_state = RunState::AbortRequested;
            self.shared.condition.notify_one();
        }

        if handle.join().is_err() {
            error!("Poller thread panicked before it could be stopped.");
        } else {
            debug!("Poller thread joined.");
        }
        self.lifecycle = Lifecycle::Stopped;
    }
}

impl<S: StatusSource + 'static> Drop for StatusPoller<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Worker body. Holds the lock except while waiting, so a tick and its
/// notifications never overlap with `stop` or with another tick.
#[instrument(skip_all)]
fn run_poll_loop<S: StatusSource>(shared: Arc<Shared<S>>, interval: Duration) {
    info!("Started.");
    let mut state = shared.lock();
    loop {
        let (guard, _) = shared
            .condition
            .wait_timeout_while(state, interval, |s| s.run_state == RunState::Running)
            .unwrap_or_else(PoisonError::into_inner);
        state = guard;

        if state.run_state == RunState::AbortRequested {
            warn!("Cancelled.");
            break;
        }

        state.monitor.tick();
    }
}

#[cfg(test)]
mod tests {
    use std::{
        panic,
        sync::{
            atomic::{AtomicBool, Ordering},
            mpsc,
        },
        time::Instant,
    };

    use super::*;
    use crate::{
        internals::core::monitor::tests::ScriptedSource,
        models::{distance::DistanceToTarget, status_event::StatusEvent},
    };

    /// Source that reports when a read begins, then takes `delay` to finish it.
    struct SlowSource {
        tx_read_started: mpsc::Sender<()>,
        delay: Duration,
    }

    impl StatusSource for SlowSource {
        fn read_distance_to_target(&mut self) -> DistanceToTarget {
            let _ = self.tx_read_started.send(());
            thread::sleep(self.delay);
            DistanceToTarget::from(1f32)
        }
    }

    const FAST: Duration = Duration::from_millis(5);
    const RECV_TIMEOUT: Duration = Duration::from_secs(5);

    fn channel_port() -> (mpsc::Receiver<StatusEvent>, MultiPort) {
        let (tx, rx) = mpsc::channel();
        let port = move |event: StatusEvent| {
            let _ = tx.send(event);
        };
        let ports: MultiPort = vec![Box::new(port)];
        (rx, ports)
    }

    fn next_distance(rx: &mpsc::Receiver<StatusEvent>) -> f32 {
        match rx.recv_timeout(RECV_TIMEOUT).expect("Timed out waiting for event.") {
            StatusEvent::DistanceToTargetChanged(d) => d.raw(),
            other => panic!("Unexpected event: {}", other),
        }
    }

    #[test]
    fn test_polls_and_notifies_on_change() {
        let (rx, ports) = channel_port();
        let mut poller = StatusPoller::new(ScriptedSource::new(&[9.499, 9.499, 7.491]), ports, FAST);
        poller.start().expect("Failed to start poller.");

        assert_eq!(next_distance(&rx), 9.499f32);
        assert_eq!(next_distance(&rx), 7.491f32);
        // Script exhausted: the source reports unknown from now on.
        assert!(next_distance(&rx).is_nan());

        poller.stop();
        assert_eq!(poller.lifecycle(), Lifecycle::Stopped);
    }

    #[test]
    fn test_stop_interrupts_long_interval() {
        let (_rx, ports) = channel_port();
        let mut poller =
            StatusPoller::new(ScriptedSource::new(&[1f32]), ports, Duration::from_secs(3600));
        poller.start().expect("Failed to start poller.");
        assert_eq!(poller.lifecycle(), Lifecycle::Running);

        // Give the worker time to enter its wait.
        thread::sleep(Duration::from_millis(20));
        let started = Instant::now();
        poller.stop();
        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(poller.lifecycle(), Lifecycle::Stopped);
        assert!(poller.last_distance().is_unknown());
    }

    #[test]
    fn test_stop_is_idempotent() {
        let (_rx, ports) = channel_port();
        let mut poller = StatusPoller::new(ScriptedSource::new(&[]), ports, FAST);
        poller.start().expect("Failed to start poller.");
        poller.stop();
        poller.stop();
        assert_eq!(poller.lifecycle(), Lifecycle::Stopped);
    }

    #[test]
    fn test_stop_without_start() {
        let (_rx, ports) = channel_port();
        let mut poller = StatusPoller::new(ScriptedSource::new(&[]), ports, FAST);
        assert_eq!(poller.lifecycle(), Lifecycle::Idle);
        poller.stop();
        assert_eq!(poller.lifecycle(), Lifecycle::Stopped);
        assert!(matches!(
            poller.start(),
            Err(PollerError::NotIdle(Lifecycle::Stopped))
        ));
    }

    #[test]
    fn test_start_twice_fails() {
        let (_rx, ports) = channel_port();
        let mut poller = StatusPoller::new(ScriptedSource::new(&[]), ports, FAST);
        poller.start().expect("Failed to start poller.");
        assert!(matches!(
            poller.start(),
            Err(PollerError::NotIdle(Lifecycle::Running))
        ));
    }

    #[test]
    fn test_drop_stops_worker() {
        let (rx, ports) = channel_port();
        let mut poller = StatusPoller::new(ScriptedSource::new(&[]), ports, FAST);
        poller.start().expect("Failed to start poller.");
        drop(poller);
        // The port (and its sender) is dropped with the joined worker.
        while rx.recv_timeout(RECV_TIMEOUT).is_ok() {}
        assert!(matches!(
            rx.try_recv(),
            Err(mpsc::TryRecvError::Disconnected)
        ));
    }

    #[test]
    fn test_notifications_never_overlap() {
        let in_flight = Arc::new(AtomicBool::new(false));
        let overlapped = Arc::new(AtomicBool::new(false));
        let (tx, rx) = mpsc::channel();

        let port_in_flight = in_flight.clone();
        let port_overlapped = overlapped.clone();
        let port = move |event: StatusEvent| {
            if port_in_flight.swap(true, Ordering::SeqCst) {
                port_overlapped.store(true, Ordering::SeqCst);
            }
            thread::sleep(Duration::from_millis(1));
            port_in_flight.store(false, Ordering::SeqCst);
            let _ = tx.send(event);
        };
        let ports: MultiPort = vec![Box::new(port)];

        let samples: Vec<f32> = (0..20).map(|i| i as f32).collect();
        let mut poller = StatusPoller::new(ScriptedSource::new(&samples), ports, FAST);
        poller.start().expect("Failed to start poller.");
        for expected in samples {
            assert_eq!(next_distance(&rx), expected);
        }
        poller.stop();
        assert!(!overlapped.load(Ordering::SeqCst));
    }

    #[test]
    fn test_last_distance_reflects_notified_value() {
        let (rx, ports) = channel_port();
        let mut poller = StatusPoller::new(ScriptedSource::new(&[3.25]), ports, FAST);
        poller.start().expect("Failed to start poller.");
        assert_eq!(next_distance(&rx), 3.25f32);
        poller.stop();
        // After the script runs out the last notification is an unknown sample,
        // so only the first value is guaranteed to have been observed here.
        let last = poller.last_distance();
        assert!(last.is_unknown() || last.millimeters() == Some(3.25f32));
    }

    #[test]
    fn test_stop_during_slow_read() {
        let (tx_read_started, rx_read_started) = mpsc::channel();
        let (_rx, ports) = channel_port();
        let source = SlowSource {
            tx_read_started,
            delay: Duration::from_millis(300),
        };
        let mut poller = StatusPoller::new(source, ports, Duration::from_millis(1));
        poller.start().expect("Failed to start poller.");

        rx_read_started
            .recv_timeout(RECV_TIMEOUT)
            .expect("Timed out waiting for a read to start.");
        let started = Instant::now();
        poller.stop();
        let elapsed = started.elapsed();

        assert_eq!(poller.lifecycle(), Lifecycle::Stopped);
        // The in-flight read finishes before the worker sees the abort.
        assert!(elapsed < Duration::from_secs(5));
    }

    #[test]
    fn test_panicking_port_does_not_reach_caller() {
        let port = |_event: StatusEvent| panic!("Port failed to handle event.");
        let ports: MultiPort = vec![Box::new(port)];
        let mut poller = StatusPoller::new(ScriptedSource::new(&[2f32]), ports, FAST);
        poller.start().expect("Failed to start poller.");

        // Give the worker time to tick and panic inside the locked section.
        thread::sleep(Duration::from_millis(100));

        let result = panic::catch_unwind(panic::AssertUnwindSafe(|| {
            poller.stop();
            let last = poller.last_distance();
            poller.stop();
            last
        }));

        let last = result.expect("Worker panic reached the caller.");
        // The panic happened before the notified value was recorded.
        assert!(last.is_unknown());
        assert_eq!(poller.lifecycle(), Lifecycle::Stopped);
    }
}
