use async_trait::async_trait;
use futures::Stream;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("command `{command}` failed: {message}")]
    Command { command: String, message: String },

    #[error("could not decode response of `{command}`: {source}")]
    Decode {
        command: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not subscribe to `{event}`: {message}")]
    Subscribe { event: String, message: String },

    #[error("backend is not reachable")]
    Disconnected,
}

impl BackendError {
    /// The message worth showing to a user.
    pub fn reason(&self) -> String {
        match self {
            Self::Command { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

pub type Unlisten = Box<dyn FnOnce() + Send>;

/// Raw pushed payloads of one event name.
pub struct EventStream {
    pub payloads: mpsc::Receiver<Value>,
    pub unlisten: Unlisten,
}

/// The native side of the application: named commands and named events.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn invoke(&self, command: &str, args: Value) -> Result<Value, BackendError>;

    fn listen(&self, event: &str) -> Result<EventStream, BackendError>;
}

/// Typed, cancellable event subscription. Dropping it unlistens.
pub struct Subscription<T> {
    event: String,
    payloads: mpsc::Receiver<Value>,
    unlisten: Option<Unlisten>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> Subscription<T> {
    pub fn new(event: &str, stream: EventStream) -> Self {
        Self {
            event: event.to_string(),
            payloads: stream.payloads,
            unlisten: Some(stream.unlisten),
            _marker: PhantomData,
        }
    }

    pub fn event(&self) -> &str {
        &self.event
    }

    pub async fn recv(&mut self) -> Option<T> {
        std::future::poll_fn(|cx| Pin::new(&mut *self).poll_next(cx)).await
    }

    pub fn cancel(&mut self) {
        if let Some(unlisten) = self.unlisten.take() {
            log::debug!("Unlistening from `{}`", self.event);
            unlisten();
            self.payloads.close();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.unlisten.is_none()
    }
}

impl<T: DeserializeOwned> Stream for Subscription<T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        let this = self.get_mut();
        loop {
            match this.payloads.poll_recv(cx) {
                Poll::Ready(Some(raw)) => match serde_json::from_value::<T>(raw) {
                    Ok(payload) => return Poll::Ready(Some(payload)),
                    Err(e) => {
                        log::warn!("Dropping malformed `{}` payload: {e}", this.event);
                    }
                },
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Some(unlisten) = self.unlisten.take() {
            unlisten();
        }
    }
}
