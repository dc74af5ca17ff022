mod game_status;
mod installs_view;
mod mm_handler;
mod profile_view;
mod profiles_view;
mod search_view;

pub use game_status::GameStatusPoller;
pub use installs_view::InstallsView;
pub use mm_handler::MMHandler;
pub use profile_view::ProfileView;
pub use profiles_view::ProfilesView;
pub use search_view::{ScrollTracker, SearchView};
