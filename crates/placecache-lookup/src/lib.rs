//! Cache-aside coordination between callers, the shared store, and the maps
//! provider.
//!
//! [`LookupService`] is the entry point. Everything below it is usable on its
//! own: [`ResultRanker`] classifies and orders candidates, [`QueryPlanner`]
//! runs the staged upstream search, and [`fallback`] reconstructs answers
//! when the provider has none.

pub mod bootstrap;
pub mod error;
pub mod fallback;
pub mod planner;
pub mod ranker;
pub mod service;
pub mod settings;

pub use bootstrap::{build_lookup_service, BootstrapError};
pub use error::LookupError;
pub use planner::{PlanOutcome, QueryPlanner, SearchStage};
pub use ranker::{Classification, ResultRanker};
pub use service::LookupService;
pub use settings::LookupSettings;
