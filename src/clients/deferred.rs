//! Single-resolution deferred results.
//!
//! Every outbound call settles exactly once: the first `resolve`/`reject`
//! wins and later attempts are discarded. This is the bridge that lets the
//! legacy spawned-task transport and the modern direct path share one
//! settlement contract.

use tokio::sync::oneshot;

use crate::error::ClientError;

/// The settling half of a deferred call.
pub struct Deferred<T> {
    tx: Option<oneshot::Sender<Result<T, ClientError>>>,
}

/// The awaiting half of a deferred call.
pub struct Settlement<T> {
    rx: oneshot::Receiver<Result<T, ClientError>>,
    service: &'static str,
    description: &'static str,
    correlation_id: String,
}

impl<T> Deferred<T> {
    /// Create a deferred/settlement pair for one call. The call context is
    /// kept on the settlement side so an abandoned call still reports a
    /// traceable error.
    pub fn new(
        service: &'static str,
        description: &'static str,
        correlation_id: impl Into<String>,
    ) -> (Self, Settlement<T>) {
        let (tx, rx) = oneshot::channel();
        (
            Self { tx: Some(tx) },
            Settlement {
                rx,
                service,
                description,
                correlation_id: correlation_id.into(),
            },
        )
    }

    /// Settle with a value. Returns false if already settled (the value is
    /// discarded).
    pub fn resolve(&mut self, value: T) -> bool {
        self.settle(Ok(value))
    }

    /// Settle with an error. Returns false if already settled (the error
    /// is discarded).
    pub fn reject(&mut self, error: ClientError) -> bool {
        self.settle(Err(error))
    }

    pub fn is_settled(&self) -> bool {
        self.tx.is_none()
    }

    fn settle(&mut self, result: Result<T, ClientError>) -> bool {
        match self.tx.take() {
            // The settlement side may already be gone; the result is
            // discarded then.
            Some(tx) => {
                let _ = tx.send(result);
                true
            }
            None => false,
        }
    }
}

impl<T> Settlement<T> {
    /// Wait for the call to settle.
    pub async fn wait(self) -> Result<T, ClientError> {
        let Self {
            rx,
            service,
            description,
            correlation_id,
        } = self;
        match rx.await {
            Ok(result) => result,
            Err(_) => Err(ClientError::Transport {
                service,
                description,
                correlation_id,
                reason: "call was dropped before settling".to_string(),
            }),
        }
    }
}
