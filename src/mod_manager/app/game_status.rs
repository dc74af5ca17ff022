use crate::mod_manager::business::SharedManagerState;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Re-reads the game process state on a fixed interval while a screen needs it.
pub struct GameStatusPoller {
    task: Option<JoinHandle<()>>,
}

impl GameStatusPoller {
    pub fn start(state: &SharedManagerState) -> Self {
        let (rt_handle, period) = {
            let state = state.read();
            (
                state.rt_handle().clone(),
                state.config().game_status_poll_interval(),
            )
        };
        let weak_state = Arc::downgrade(state);

        let task = rt_handle.spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                let Some(state) = weak_state.upgrade() else {
                    break;
                };
                state.read().check_game_status();
            }
        });
        Self { task: Some(task) }
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for GameStatusPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mod_manager::app::MMHandler;
    use crate::mod_manager::business::{Event, keys};
    use crate::mod_manager::domain::{GameStatus, ManagerConfig};
    use crate::mod_manager::infra::fake_backend::FakeBackend;
    use serde_json::json;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_polls_every_interval_until_stopped() {
        let backend = FakeBackend::new();
        backend.reply(
            "get_game_status",
            json!({ "running": true, "profile": "Main" }),
        );
        let mut handler = MMHandler::new(
            tokio::runtime::Handle::current(),
            backend.clone(),
            ManagerConfig::default(),
        );

        let mut poller = GameStatusPoller::start(&handler.state());
        tokio::time::sleep(Duration::from_secs(11)).await;
        assert_eq!(backend.calls("get_game_status").len(), 3);

        let events = handler.poll_events();
        assert!(events.contains(&Event::GameStatusChanged));
        let status: GameStatus = handler
            .state()
            .read()
            .cache
            .get(keys::GAME_STATUS, GameStatus::default());
        assert!(status.is_running("Main"));

        poller.stop();
        assert!(!poller.is_running());
        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(backend.calls("get_game_status").len(), 3);
    }
}
