mod config;
mod install;
mod package;
mod profile;
mod progress;
mod search;

pub use config::*;
pub use install::*;
pub use package::*;
pub use profile::*;
pub use progress::*;
pub use search::*;

#[cfg(test)]
pub(crate) use package::fixtures;
