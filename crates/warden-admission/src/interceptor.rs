//! The channel interceptor state machine.
//!
//! States: Idle (no subscription) -> Subscribed (listening) ->
//! ReconnectPending (stream errored, timer armed) -> Subscribed again on
//! success, or -> Idle on explicit teardown from any state.
//!
//! All mutation of the subscription handle happens inside one spawned
//! task, so event handling, error handling, and the reconnect timer are
//! serialized even on a multi-threaded runtime. The teardown flag plus a
//! watch channel make teardown observable from both the pending sleep and
//! an in-flight `next_request`.

use crate::errors::AdmissionError;
use crate::ports::{ChannelEventSource, Decision, OpenRequest};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use warden_store::{PolicyCollection, WhitelistCollection};
use warden_types::{DEFAULT_REJECT_MESSAGE, RECONNECT_DELAY, UNKNOWN_ERROR_REJECT_MESSAGE};

/// Interceptor tuning.
#[derive(Debug, Clone)]
pub struct InterceptorConfig {
    /// Reject message used when no custom message is stored.
    pub default_reject_message: String,
    /// Fixed delay between resubscription attempts. No backoff growth,
    /// no retry cap: the upstream is a local, trusted process.
    pub reconnect_delay: Duration,
}

impl Default for InterceptorConfig {
    fn default() -> Self {
        Self {
            default_reject_message: DEFAULT_REJECT_MESSAGE.to_string(),
            reconnect_delay: RECONNECT_DELAY,
        }
    }
}

/// Subscribes to channel-open requests and answers each one.
pub struct ChannelInterceptor {
    inner: Arc<Inner>,
}

struct Inner {
    source: Arc<dyn ChannelEventSource>,
    whitelist: WhitelistCollection,
    policy: PolicyCollection,
    config: InterceptorConfig,
    tearing_down: AtomicBool,
    shutdown: watch::Sender<bool>,
    task: Mutex<Option<JoinHandle<()>>>,
    subscribe_attempts: AtomicU64,
}

impl ChannelInterceptor {
    pub fn new(
        source: Arc<dyn ChannelEventSource>,
        whitelist: WhitelistCollection,
        policy: PolicyCollection,
        config: InterceptorConfig,
    ) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            inner: Arc::new(Inner {
                source,
                whitelist,
                policy,
                config,
                tearing_down: AtomicBool::new(false),
                shutdown,
                task: Mutex::new(None),
                subscribe_attempts: AtomicU64::new(0),
            }),
        }
    }

    /// Enter `Subscribed`. No-op when a subscription task already exists;
    /// at most one live subscription handle exists at any time.
    pub async fn start(&self) {
        let mut slot = self.inner.task.lock().await;
        if slot.is_some() {
            debug!("Interceptor already running");
            return;
        }
        let _ = self.inner.shutdown.send(false);
        let shutdown_rx = self.inner.shutdown.subscribe();
        let inner = Arc::clone(&self.inner);
        *slot = Some(tokio::spawn(run(inner, shutdown_rx)));
    }

    /// Teardown: cancel any pending reconnect, detach from the stream,
    /// return to `Idle`. Idempotent and safe from any state, including
    /// with no active subscription.
    pub async fn stop(&self) {
        self.inner.tearing_down.store(true, Ordering::SeqCst);
        let _ = self.inner.shutdown.send(true);

        let task = self.inner.task.lock().await.take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                warn!(error = %e, "Interceptor task ended abnormally");
            }
        }
        self.inner.tearing_down.store(false, Ordering::SeqCst);
    }

    /// Number of subscribe calls made so far, successful or not (for
    /// observability and tests).
    pub fn subscribe_attempts(&self) -> u64 {
        self.inner.subscribe_attempts.load(Ordering::SeqCst)
    }
}

async fn run(inner: Arc<Inner>, mut shutdown: watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow() {
            return;
        }

        info!("Subscribing to channel open requests");
        inner.subscribe_attempts.fetch_add(1, Ordering::SeqCst);
        match inner.source.subscribe().await {
            Ok(mut stream) => {
                loop {
                    tokio::select! {
                        _ = shutdown.changed() => return,
                        item = stream.next_request() => match item {
                            Ok(Some(request)) => inner.decide(request),
                            Ok(None) => {
                                warn!("Channel request stream closed by the node");
                                break;
                            }
                            Err(e) => {
                                warn!(error = %e, "Channel interceptor disconnected from node");
                                break;
                            }
                        }
                    }
                }
                // Dropping the stream detaches it before the retry timer
                // is armed, so late transport events cannot be handled
                // twice.
                drop(stream);
            }
            Err(e) => warn!(error = %e, "Failed to subscribe to channel open requests"),
        }

        if inner.tearing_down.load(Ordering::SeqCst) || *shutdown.borrow() {
            return;
        }
        // ReconnectPending: one-shot fixed-delay timer, cancelled by
        // teardown.
        tokio::select! {
            _ = shutdown.changed() => return,
            _ = tokio::time::sleep(inner.config.reconnect_delay) => {}
        }
    }
}

impl Inner {
    /// Answer one request. Whatever happens while deciding, the peer
    /// receives exactly one accept-or-reject response.
    fn decide(&self, request: OpenRequest) {
        let peer = request.peer;
        let decision = match self.evaluate(&peer) {
            Ok(decision) => decision,
            Err(e) => {
                warn!(peer = %peer, error = %e, "Unexpected error handling channel request");
                Decision::Reject(UNKNOWN_ERROR_REJECT_MESSAGE.to_string())
            }
        };
        match &decision {
            Decision::Accept => info!(peer = %peer, "Accepting channel request"),
            Decision::Reject(reason) => {
                info!(peer = %peer, reason = %reason, "Rejecting channel request")
            }
        }
        request.respond(decision);
    }

    fn evaluate(&self, peer: &warden_types::PeerPubKey) -> Result<Decision, AdmissionError> {
        if self.whitelist.is_allowed(peer)? {
            return Ok(Decision::Accept);
        }
        // Message length was validated when the custom message was stored,
        // not here.
        let message = self
            .policy
            .reject_message()?
            .unwrap_or_else(|| self.config.default_reject_message.clone());
        Ok(Decision::Reject(message))
    }
}
