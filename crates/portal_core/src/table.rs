//! The applications table: an independent view over the user's application
//! history that reloads whenever applications change anywhere in the app.

use serde_json::Value;

use crate::{normalize_applications, ApplicationRow, Effect, Generation, RequestFailure};

pub const NO_APPLICATIONS_MESSAGE: &str = "No applications yet.";
pub const APPLICATIONS_FAILED_MESSAGE: &str = "Could not load your applications.";

#[derive(Debug, Clone, PartialEq)]
pub enum TableMsg {
    Mounted,
    Unmounted,
    /// Some view announced that the user's applications changed.
    ApplicationsChanged,
    Loaded {
        generation: Generation,
        result: Result<Value, RequestFailure>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TableStatus {
    #[default]
    Loading,
    Empty,
    Ready,
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableViewModel {
    pub status: TableStatus,
    pub rows: Vec<ApplicationRow>,
    /// A reload is in flight while older rows stay visible.
    pub refreshing: bool,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApplicationsTable {
    mounted: bool,
    generation: Generation,
    loading: bool,
    loaded: bool,
    error: Option<String>,
    rows: Vec<ApplicationRow>,
    dirty: bool,
}

impl ApplicationsTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[ApplicationRow] {
        &self.rows
    }

    pub fn view(&self) -> TableViewModel {
        let status = if let Some(error) = &self.error {
            TableStatus::Error(error.clone())
        } else if !self.loaded {
            TableStatus::Loading
        } else if self.rows.is_empty() {
            TableStatus::Empty
        } else {
            TableStatus::Ready
        };
        TableViewModel {
            // Any reload past the first one keeps the previous outcome on screen.
            refreshing: self.loading && status != TableStatus::Loading,
            status,
            rows: self.rows.clone(),
            dirty: self.dirty,
        }
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    fn reload(&mut self) -> Vec<Effect> {
        self.generation += 1;
        self.loading = true;
        self.dirty = true;
        vec![Effect::LoadApplications {
            generation: self.generation,
        }]
    }
}

pub fn update_table(mut table: ApplicationsTable, msg: TableMsg) -> (ApplicationsTable, Vec<Effect>) {
    let effects = match msg {
        TableMsg::Mounted => {
            if table.mounted {
                return (table, Vec::new());
            }
            table.mounted = true;
            table.reload()
        }
        TableMsg::Unmounted => {
            table.mounted = false;
            table.loading = false;
            Vec::new()
        }
        TableMsg::ApplicationsChanged => {
            if !table.mounted {
                return (table, Vec::new());
            }
            table.reload()
        }
        TableMsg::Loaded { generation, result } => {
            if !table.mounted || generation != table.generation {
                return (table, Vec::new());
            }
            table.loading = false;
            table.dirty = true;
            match result {
                Ok(payload) => {
                    table.rows = normalize_applications(&payload);
                    table.loaded = true;
                    table.error = None;
                    Vec::new()
                }
                Err(failure) => {
                    table.error = Some(APPLICATIONS_FAILED_MESSAGE.to_string());
                    if failure == RequestFailure::Unauthorized {
                        vec![Effect::RequireLogin]
                    } else {
                        Vec::new()
                    }
                }
            }
        }
    };

    (table, effects)
}
