//! Scripted event source for interceptor tests.

use crate::errors::AdmissionError;
use crate::ports::{ChannelEventSource, ChannelRequestStream, OpenRequest};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tokio::sync::mpsc;

/// One item a scripted session hands to the interceptor.
pub type StreamItem = Result<Option<OpenRequest>, AdmissionError>;

/// Event source backed by a queue of pre-arranged sessions. Each call to
/// `subscribe` consumes the next session; subscribing past the end of the
/// queue fails, which lets a test pin down how many subscriptions
/// happened.
#[derive(Default)]
pub struct MockSource {
    sessions: Mutex<VecDeque<mpsc::UnboundedReceiver<StreamItem>>>,
    subscribes: AtomicU64,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one session and return the handle that feeds it. Dropping
    /// the sender ends the session cleanly.
    pub fn push_session(&self) -> mpsc::UnboundedSender<StreamItem> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.sessions.lock().unwrap().push_back(rx);
        tx
    }

    /// How many sessions have been handed out.
    pub fn subscribe_count(&self) -> u64 {
        self.subscribes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChannelEventSource for MockSource {
    async fn subscribe(&self) -> Result<Box<dyn ChannelRequestStream>, AdmissionError> {
        let session = self.sessions.lock().unwrap().pop_front();
        match session {
            Some(rx) => {
                self.subscribes.fetch_add(1, Ordering::SeqCst);
                Ok(Box::new(MockStream { rx }))
            }
            None => Err(AdmissionError::Subscribe(
                "no scripted session left".to_string(),
            )),
        }
    }
}

struct MockStream {
    rx: mpsc::UnboundedReceiver<StreamItem>,
}

#[async_trait]
impl ChannelRequestStream for MockStream {
    async fn next_request(&mut self) -> Result<Option<OpenRequest>, AdmissionError> {
        match self.rx.recv().await {
            Some(item) => item,
            None => Ok(None),
        }
    }
}
