mod backend;
mod client;
mod config_manager;
#[cfg(test)]
pub(crate) mod fake_backend;
mod mm_runtime;

pub use backend::{Backend, BackendError, EventStream, Subscription, Unlisten};
pub use client::{BackendClient, DOWNLOAD_PROGRESS_EVENT};
pub use config_manager::ConfigManager;
pub use mm_runtime::MMRuntime;
