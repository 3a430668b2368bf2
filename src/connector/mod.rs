use std::{io, sync::Arc, time::Duration};

use rand::seq::SliceRandom;
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, warn};

use crate::{
    resolver::{DnsResolver, Resolve, ResolveError},
    session::{
        FromConfig, HttpFactory, HttpsFactory, SessionFactory, TcpFactory, TlsFactory, UdpFactory,
    },
    utils::{ConnectResult, Deadline, Error},
};

mod config;
mod resolve_loop;
mod state;

pub use config::*;
pub use state::Snapshot;

use resolve_loop::ResolveLoop;
use state::SharedState;


/// Hands out fresh sessions to one remote target.
///
/// A background task keeps the endpoint list of the target resolved. Each
/// [`acquire`](Connector::acquire) call takes a private copy of that list,
/// shuffles it and tries the endpoints one by one until a session is
/// established or the deadline passes. A failed call asks the background task
/// to resolve again.
///
/// A single instance supports any number of concurrent callers; wrap it in an
/// [`Arc`] to share it.
///
/// Dropping a connector only aborts the background task. Use
/// [`shutdown`](Connector::shutdown) to wait until it has exited.
pub struct Connector<F: SessionFactory> {
    config: ConnectorConfig,
    factory: F,
    state: Arc<SharedState>,
    stop: watch::Sender<bool>,
    resolving: Option<JoinHandle<()>>,
}

/// Connector for plain TCP.
pub type TcpConnector = Connector<TcpFactory>;
/// Connector for plain UDP.
pub type UdpConnector = Connector<UdpFactory>;
/// Connector for TLS over TCP.
pub type TlsConnector = Connector<TlsFactory>;
/// Connector for HTTP.
pub type HttpConnector = Connector<HttpFactory>;
/// Connector for HTTPS.
pub type HttpsConnector = Connector<HttpsFactory>;

impl<F: SessionFactory + FromConfig> Connector<F> {
    /// Build the session factory from `config` and start resolving with the system resolver.
    ///
    /// # Panics
    ///
    /// Panics when called outside of a tokio runtime.
    pub fn from_config(config: ConnectorConfig) -> io::Result<Self> {
        let factory = F::from_config(&config)?;
        Ok(Self::new(config, factory))
    }
}

impl<F: SessionFactory> Connector<F> {
    /// Start resolving `config`'s target with the system resolver.
    ///
    /// Does not wait for the first resolution.
    ///
    /// # Panics
    ///
    /// Panics when called outside of a tokio runtime.
    pub fn new(config: ConnectorConfig, factory: F) -> Self {
        let resolver = DnsResolver::new(
            config.host.clone(),
            config.port.clone(),
            config.ip_family,
            config.resolve_flags,
        );
        Self::with_resolver(config, resolver, factory)
    }

    /// Like [`Connector::new`] with a custom resolver.
    pub fn with_resolver<R: Resolve>(config: ConnectorConfig, resolver: R, factory: F) -> Self {
        let state = Arc::new(SharedState::new());
        let (stop, stop_rx) = watch::channel(false);

        let resolve_loop = ResolveLoop {
            resolver,
            state: state.clone(),
            target: config.target(),
            resolve_timeout: config.resolve_timeout,
            retry_interval: config.retry_interval,
        };
        let resolving = tokio::spawn(resolve_loop.run(stop_rx));

        Self {
            config,
            factory,
            state,
            stop,
            resolving: Some(resolving),
        }
    }

    /// Establish a new session before `deadline`.
    ///
    /// Waits for the first resolution if none has finished yet, then tries
    /// every known endpoint in random order. Each attempt only gets the time
    /// left until `deadline`. On failure the endpoint list is refreshed in the
    /// background before the next call.
    pub async fn acquire(&self, deadline: impl Into<Deadline>) -> ConnectResult<F::Session> {
        let deadline = deadline.into();

        let result = self.try_endpoints(deadline).await;
        if result.is_err() {
            self.state.notify_resolve_needed();
        }
        result
    }

    /// [`Connector::acquire`] with a relative timeout.
    pub async fn acquire_within(&self, timeout: Duration) -> ConnectResult<F::Session> {
        self.acquire(Deadline::after(timeout)).await
    }

    /// [`Connector::acquire`] with the configured connect timeout.
    pub async fn acquire_default(&self) -> ConnectResult<F::Session> {
        self.acquire_within(self.config.connect_timeout).await
    }

    async fn try_endpoints(&self, deadline: Deadline) -> ConnectResult<F::Session> {
        let mut endpoints = self.snapshot(deadline).await?.endpoints;

        // Spread the load over equally good endpoints.
        endpoints.shuffle(&mut rand::thread_rng());

        let mut last_error = None;
        for endpoint in endpoints {
            let attempt = self.factory.connect(endpoint, deadline);
            match deadline.run_io(attempt).await {
                Ok(session) => {
                    debug!(target_addr = %self.target(), %endpoint, "session established");
                    return Ok(session);
                }
                Err(source) => {
                    debug!(target_addr = %self.target(), %endpoint, %source, "connect failed");
                    last_error = Some(Error::Connect { endpoint, source });
                }
            }
        }

        match last_error {
            Some(e) => {
                warn!(target_addr = %self.target(), error = %e, "all endpoints failed");
                Err(e)
            }
            // An empty list is only explained by the resolver.
            None => Err(self
                .state
                .resolve_error()
                .map_or(Error::NoEndpoints, Error::Resolve)),
        }
    }

    /// Wait for the first resolution, then copy the endpoints.
    async fn snapshot(&self, deadline: Deadline) -> ConnectResult<Snapshot> {
        if !self.state.is_resolve_done() {
            let mut done = self.state.subscribe_resolve_done();
            let resolved = deadline
                .run(async move { done.wait_for(|v| *v).await.is_ok() })
                .await;
            if !matches!(resolved, Ok(true)) {
                return Err(Error::timeout_or(self.state.resolve_error()));
            }
        }

        deadline
            .run(self.state.snapshot())
            .await
            .map_err(|_| Error::timeout_or(self.state.resolve_error()))
    }

    /// The endpoints currently known, without waiting for a resolution.
    pub async fn endpoints(&self) -> Snapshot {
        self.state.snapshot().await
    }

    /// Error of the latest resolution, `None` once a resolution succeeded.
    pub fn last_resolve_error(&self) -> Option<ResolveError> {
        self.state.resolve_error()
    }

    /// Whether at least one resolution has succeeded.
    pub fn is_resolved(&self) -> bool {
        self.state.is_resolve_done()
    }

    /// Ask the background task to resolve again.
    pub fn refresh(&self) {
        self.state.notify_resolve_needed();
    }

    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn host(&self) -> &str {
        &self.config.host
    }

    pub fn port(&self) -> &str {
        &self.config.port
    }

    /// Get the target in the format of host:port.
    pub fn target(&self) -> String {
        self.config.target()
    }

    pub fn resolve_timeout(&self) -> Duration {
        self.config.resolve_timeout
    }

    pub fn connect_timeout(&self) -> Duration {
        self.config.connect_timeout
    }

    pub fn operation_timeout(&self) -> Duration {
        self.config.operation_timeout
    }

    /// Stop the background resolution and wait until it has exited.
    ///
    /// Calls still running keep their snapshot and finish on their own.
    pub async fn shutdown(mut self) {
        let _ = self.stop.send(true);
        if let Some(resolving) = self.resolving.take() {
            let _ = resolving.await;
        }
    }
}

impl<F: SessionFactory> Drop for Connector<F> {
    fn drop(&mut self) {
        // Without an async context the task can only be cut at its next await point.
        if let Some(resolving) = self.resolving.take() {
            let _ = self.stop.send(true);
            resolving.abort();
        }
    }
}
