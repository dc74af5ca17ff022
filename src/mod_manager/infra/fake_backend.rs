use crate::mod_manager::infra::backend::{Backend, BackendError, EventStream};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

type Reply = (Duration, Result<Value, String>);
type Handler = Arc<dyn Fn(&Value) -> Reply + Send + Sync>;
type Listeners = Arc<Mutex<HashMap<u64, (String, mpsc::Sender<Value>)>>>;

/// Scriptable in-memory backend. Unscripted commands answer `null`.
#[derive(Default)]
pub(crate) struct FakeBackend {
    handlers: Mutex<HashMap<String, Handler>>,
    calls: Mutex<Vec<(String, Value)>>,
    listeners: Listeners,
    next_listener: AtomicU64,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on<F>(&self, command: &str, handler: F)
    where
        F: Fn(&Value) -> Reply + Send + Sync + 'static,
    {
        self.handlers
            .lock()
            .insert(command.to_string(), Arc::new(handler));
    }

    pub fn reply(&self, command: &str, value: Value) {
        self.on(command, move |_| (Duration::ZERO, Ok(value.clone())));
    }

    pub fn fail(&self, command: &str, message: &str) {
        let message = message.to_string();
        self.on(command, move |_| (Duration::ZERO, Err(message.clone())));
    }

    pub fn calls(&self, command: &str) -> Vec<Value> {
        self.calls
            .lock()
            .iter()
            .filter(|(c, _)| c == command)
            .map(|(_, args)| args.clone())
            .collect()
    }

    pub fn command_log(&self) -> Vec<String> {
        self.calls.lock().iter().map(|(c, _)| c.clone()).collect()
    }

    pub fn emit(&self, event: &str, payload: Value) -> usize {
        let listeners = self.listeners.lock();
        listeners
            .values()
            .filter(|(name, _)| name == event)
            .filter(|(_, tx)| tx.try_send(payload.clone()).is_ok())
            .count()
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners
            .lock()
            .values()
            .filter(|(name, _)| name == event)
            .count()
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn invoke(&self, command: &str, args: Value) -> Result<Value, BackendError> {
        self.calls.lock().push((command.to_string(), args.clone()));
        let handler = self.handlers.lock().get(command).cloned();
        let Some(handler) = handler else {
            return Ok(Value::Null);
        };

        let (delay, result) = handler(&args);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        result.map_err(|message| BackendError::Command {
            command: command.to_string(),
            message,
        })
    }

    fn listen(&self, event: &str) -> Result<EventStream, BackendError> {
        let (tx, rx) = mpsc::channel(64);
        let id = self.next_listener.fetch_add(1, Ordering::SeqCst);
        self.listeners.lock().insert(id, (event.to_string(), tx));

        let listeners = Arc::clone(&self.listeners);
        Ok(EventStream {
            payloads: rx,
            unlisten: Box::new(move || {
                listeners.lock().remove(&id);
            }),
        })
    }
}
