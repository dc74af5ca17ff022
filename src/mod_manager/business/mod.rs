mod download;
mod effects;
mod events;
mod mm_state;
mod presentation;
mod profile_gate;
mod search_builder;
pub(crate) mod view_cache;

pub use download::{
    Attempt, AttemptId, DownloadFailure, DownloadOrchestrator, DownloadPhase, InstallError,
    InstallRequest, InstallStep, ProgressDialog, ProgressTransition,
};
pub use effects::{CreatePurpose, Effect};
pub use events::{Event, InternalEvent, Route};
pub use mm_state::{ManagerState, SharedManagerState};
pub use presentation::{
    ModCard, ModTablePage, ModTableQuery, SearchPresentation, SortDirection, present_profile_mods,
    present_search,
};
pub use profile_gate::{GateOption, ProfileGate};
pub use search_builder::SearchBuilder;
pub use view_cache::{AnyStateData, Persisted, ViewStateCache, keys};
