//! Supervisor loop and watch-set wiring

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::thread;
use std::time::Duration;

use notify::{Config as NotifyConfig, Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::config::Config;
use crate::error::{DevloopError, DevloopResult};

use super::classify::{Classification, Classifier};
use super::debounce::{DebounceTimer, Ticket};
use super::event::{ChangeEvent, ChangeKind, SupervisorEvent};
use super::process::{run_to_completion, ProcessHandle};

/// Callback receiving supervisor events; called from observer and timer
/// threads as well as the caller's own.
pub type EventSink = Arc<dyn Fn(SupervisorEvent) + Send + Sync>;

/// Supervisor options
#[derive(Debug, Clone)]
pub struct SuperviseOptions {
    /// Working tree root, watched recursively
    pub root: PathBuf,
    /// Dependency roots, watched recursively
    pub dependencies: Vec<PathBuf>,
    /// Debounce delay
    pub debounce: Duration,
    /// Dependency-update command, run before a restart when a dependency
    /// tree changed
    pub update_command: Option<String>,
    /// Server command
    pub server_command: String,
}

impl SuperviseOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            root: config.watch.root.clone(),
            dependencies: config.watch.dependencies.clone(),
            debounce: config.debounce(),
            update_command: config.commands.update.clone(),
            server_command: config.commands.server.clone(),
        }
    }
}

/// State shared between observer threads, timer fires and shutdown.
///
/// Everything in here is mutated under one lock: the pending-update flag,
/// the server handle and the shutdown bit are a single critical section,
/// so a fire can never lose a dependency signal to a racing event.
struct SupervisorState {
    pending_update: bool,
    server: ProcessHandle,
    shutdown: bool,
    fatal: Option<DevloopError>,
}

/// The supervisor: receives classified change events, debounces bursts and
/// drives the update/restart protocol.
pub struct Supervisor {
    // Handle to ourselves for the timer fire-actions; set by `new_cyclic`.
    weak: Weak<Supervisor>,
    state: Mutex<SupervisorState>,
    timer: DebounceTimer,
    classifier: Classifier,
    update_command: Option<String>,
    server_command: String,
    emit: EventSink,
}

impl Supervisor {
    pub(crate) fn new(
        options: &SuperviseOptions,
        server: ProcessHandle,
        emit: EventSink,
    ) -> Arc<Self> {
        Arc::new_cyclic(|weak| Self {
            weak: weak.clone(),
            state: Mutex::new(SupervisorState {
                pending_update: false,
                server,
                shutdown: false,
                fatal: None,
            }),
            timer: DebounceTimer::new(options.debounce),
            classifier: Classifier::new(&options.dependencies),
            update_command: options.update_command.clone(),
            server_command: options.server_command.clone(),
            emit,
        })
    }

    /// Record one raw change event. Called concurrently from observer
    /// threads; ignored events cause no transition and no output.
    pub fn record_event(&self, event: ChangeEvent) {
        let classification = self.classifier.classify(&event);
        if classification == Classification::Ignored {
            return;
        }

        (self.emit)(SupervisorEvent::Change {
            path: event.path.display().to_string(),
            classification,
        });

        let mut state = self.lock_state();
        if state.shutdown {
            return;
        }
        if classification == Classification::Dependency {
            state.pending_update = true;
        }

        // Any non-ignored event restarts the full debounce delay; the flag
        // survives re-arms until a fire consumes it.
        let Some(supervisor) = self.weak.upgrade() else {
            return;
        };
        self.timer.arm(move |ticket| supervisor.fire(ticket));
    }

    /// Debounce fire-action: run the update step if one is pending, then
    /// replace the server child.
    ///
    /// The whole body holds the state lock, so at most one fire is ever in
    /// flight, the server handle is never mutated concurrently, and a fire
    /// that lost the race against a newer arm is discarded by the ticket
    /// check before it touches anything.
    fn fire(&self, ticket: Ticket) {
        let mut state = self.lock_state();
        if state.shutdown || !self.timer.is_current(ticket) {
            return;
        }
        // Consume the arm: back to idle until the next event.
        self.timer.cancel();

        let pending = std::mem::take(&mut state.pending_update);
        if pending {
            if let Some(update) = &self.update_command {
                (self.emit)(SupervisorEvent::UpdateStarted);
                match run_to_completion(update) {
                    Ok(success) => (self.emit)(SupervisorEvent::UpdateComplete { success }),
                    // Best effort: the restart still proceeds.
                    Err(e) => (self.emit)(SupervisorEvent::Error {
                        message: e.to_string(),
                    }),
                }
            }
        }

        match state.server.replace(&self.server_command) {
            Ok(()) => (self.emit)(SupervisorEvent::ServerStarted {
                pid: state.server.pid(),
            }),
            Err(e) => {
                // Respawn failure is fatal; hand the error to the
                // keep-alive loop instead of retrying.
                (self.emit)(SupervisorEvent::Error {
                    message: e.to_string(),
                });
                state.fatal = Some(e);
            }
        }
    }

    /// Scoped shutdown: no fire runs after this returns, and the server
    /// child is terminated.
    pub fn shutdown(&self) {
        let mut state = self.lock_state();
        state.shutdown = true;
        self.timer.cancel();
        state.server.terminate();
    }

    pub(crate) fn take_fatal(&self) -> Option<DevloopError> {
        self.lock_state().fatal.take()
    }

    fn lock_state(&self) -> MutexGuard<'_, SupervisorState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Start the supervisor and block until interrupted.
///
/// Runs the initial dependency update, starts the server, subscribes the
/// watch set and parks the calling thread in the keep-alive loop until
/// `running` is cleared (Ctrl-C) or a fire-action reports a fatal error.
pub fn supervise(
    options: SuperviseOptions,
    running: Arc<AtomicBool>,
    emit: impl Fn(SupervisorEvent) + Send + Sync + 'static,
) -> DevloopResult<()> {
    let emit: EventSink = Arc::new(emit);

    emit(SupervisorEvent::SupervisorStarted {
        root: options.root.display().to_string(),
        dependencies: options.dependencies.len(),
    });

    // Initial update, as if a dependency had just changed. A spawn failure
    // is fatal here; a non-zero exit is tolerated like in any later cycle.
    if let Some(update) = &options.update_command {
        emit(SupervisorEvent::UpdateStarted);
        let success = run_to_completion(update)?;
        emit(SupervisorEvent::UpdateComplete { success });
    }

    let server = ProcessHandle::start(&options.server_command)?;
    emit(SupervisorEvent::ServerStarted { pid: server.pid() });

    let supervisor = Supervisor::new(&options, server, Arc::clone(&emit));

    // Observer callbacks push events straight into the loop from notify's
    // threads. Paths are canonicalized where possible so they line up with
    // the classifier's canonical dependency roots.
    let observer = Arc::clone(&supervisor);
    let mut watcher = RecommendedWatcher::new(
        move |res: Result<Event, notify::Error>| {
            if let Ok(event) = res {
                let kind = ChangeKind::from(&event.kind);
                for path in event.paths {
                    let path = path.canonicalize().unwrap_or(path);
                    observer.record_event(ChangeEvent { path, kind });
                }
            }
        },
        NotifyConfig::default(),
    )?;

    watcher.watch(&options.root, RecursiveMode::Recursive)?;
    for dependency in &options.dependencies {
        watcher.watch(dependency, RecursiveMode::Recursive)?;
    }

    // Keep-alive loop: the main thread only waits for Ctrl-C or a fatal
    // error surfaced by a fire-action.
    let result = loop {
        if !running.load(Ordering::SeqCst) {
            break Ok(());
        }
        if let Some(err) = supervisor.take_fatal() {
            break Err(err);
        }
        thread::sleep(Duration::from_millis(50));
    };

    supervisor.shutdown();
    // Releases OS watch resources and joins the observer threads.
    drop(watcher);

    emit(SupervisorEvent::Shutdown);
    result
}
