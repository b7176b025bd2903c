use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use portal_logging::{portal_debug, portal_error};

use crate::search::run_search;
use crate::{
    ApiError, ApiSettings, EngineEvent, Generation, JobBoardApi, ReqwestApi, SearchQuery, TimerId,
};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("cannot build api client: {0}")]
    Client(#[from] ApiError),
    #[error("cannot start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

enum EngineCommand {
    Search {
        generation: Generation,
        query: SearchQuery,
    },
    LoadFilterOptions {
        generation: Generation,
    },
    LoadAppliedIds {
        generation: Generation,
    },
    LoadApplications {
        generation: Generation,
    },
    Apply {
        job_id: String,
    },
    StartTimer {
        timer_id: TimerId,
        after: Duration,
    },
}

/// Runs backend calls and timers on a background runtime. Commands run
/// concurrently; completions arrive as [`EngineEvent`]s in resolution
/// order, which is why every load carries its generation back.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
    in_flight: Arc<AtomicUsize>,
}

impl EngineHandle {
    pub fn new(settings: ApiSettings) -> Result<Self, EngineError> {
        let api = ReqwestApi::new(settings)?;
        Self::with_api(Arc::new(api))
    }

    pub fn with_api(api: Arc<dyn JobBoardApi>) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let in_flight = Arc::new(AtomicUsize::new(0));
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;

        let counter = in_flight.clone();
        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let api = api.clone();
                let event_tx = event_tx.clone();
                let counter = counter.clone();
                runtime.spawn(async move {
                    let event = handle_command(api.as_ref(), command).await;
                    if event_tx.send(event).is_err() {
                        portal_debug!("engine event dropped: receiver gone");
                    }
                    counter.fetch_sub(1, Ordering::SeqCst);
                });
            }
            portal_debug!("engine command loop finished");
        });

        Ok(Self {
            cmd_tx,
            event_rx,
            in_flight,
        })
    }

    pub fn search(&self, generation: Generation, query: SearchQuery) {
        self.send(EngineCommand::Search { generation, query });
    }

    pub fn load_filter_options(&self, generation: Generation) {
        self.send(EngineCommand::LoadFilterOptions { generation });
    }

    pub fn load_applied_ids(&self, generation: Generation) {
        self.send(EngineCommand::LoadAppliedIds { generation });
    }

    pub fn load_applications(&self, generation: Generation) {
        self.send(EngineCommand::LoadApplications { generation });
    }

    pub fn apply(&self, job_id: impl Into<String>) {
        self.send(EngineCommand::Apply {
            job_id: job_id.into(),
        });
    }

    pub fn start_timer(&self, timer_id: TimerId, after: Duration) {
        self.send(EngineCommand::StartTimer { timer_id, after });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    /// Commands accepted whose event has not been sent yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    fn send(&self, command: EngineCommand) {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        if self.cmd_tx.send(command).is_err() {
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            portal_error!("engine command loop is gone; command dropped");
        }
    }
}

async fn handle_command(api: &dyn JobBoardApi, command: EngineCommand) -> EngineEvent {
    match command {
        EngineCommand::Search { generation, query } => EngineEvent::SearchCompleted {
            generation,
            result: run_search(api, generation, &query).await,
        },
        EngineCommand::LoadFilterOptions { generation } => EngineEvent::FilterOptionsLoaded {
            generation,
            result: api.filter_options().await,
        },
        EngineCommand::LoadAppliedIds { generation } => EngineEvent::AppliedIdsLoaded {
            generation,
            result: api.my_applications().await,
        },
        EngineCommand::LoadApplications { generation } => EngineEvent::ApplicationsLoaded {
            generation,
            result: api.my_applications().await,
        },
        EngineCommand::Apply { job_id } => {
            let result = api.apply(&job_id).await;
            EngineEvent::ApplyCompleted { job_id, result }
        }
        EngineCommand::StartTimer { timer_id, after } => {
            tokio::time::sleep(after).await;
            EngineEvent::TimerElapsed { timer_id }
        }
    }
}
