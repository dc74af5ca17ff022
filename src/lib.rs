//! Client-side coordination for a Thunderstore profile-based mod manager.
//!
//! The native backend is reached through the [`mod_manager::infra::Backend`]
//! trait. [`mod_manager::app::MMHandler`] wires the effect runtime and shared
//! state, and the view models in [`mod_manager::app`] drive each screen.

pub mod logging;
pub mod mod_manager;
