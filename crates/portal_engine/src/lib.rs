//! Job portal engine: backend client, search fallback, change bus and effect execution.
mod bus;
mod client;
mod engine;
mod search;
mod settings;
mod types;

pub use bus::{ApplicationsBus, ApplicationsChanged, Signal, Subscription, APPLICATIONS_CHANGED};
pub use client::{JobBoardApi, ReqwestApi};
pub use engine::{EngineError, EngineHandle};
pub use search::run_search;
pub use settings::{ApiSettings, Endpoints};
pub use types::{
    ApiError, EngineEvent, FailureKind, Generation, SearchQuery, SearchReport, TimerId,
};
