use std::{sync::Arc, time::Duration};

use tokio::{
    select,
    sync::watch,
    time::{sleep, timeout},
};
use tracing::{debug, info, warn};

use crate::resolver::{Resolve, ResolveError, ResolveResult};

use super::state::SharedState;

pub(crate) struct ResolveLoop<R> {
    pub resolver: R,
    pub state: Arc<SharedState>,
    pub target: String,
    pub resolve_timeout: Duration,
    pub retry_interval: Duration,
}

impl<R: Resolve> ResolveLoop<R> {
    /// Keep the shared endpoints fresh until `stop` fires or its sender is dropped.
    pub async fn run(self, mut stop: watch::Receiver<bool>) {
        let mut needed = self.state.subscribe_resolve_needed();

        loop {
            // Sleep until somebody asks for a resolution.
            let requested = select! {
                biased;
                _ = stop.changed() => false,
                ok = async { needed.wait_for(|v| *v).await.is_ok() } => ok,
            };
            if !requested {
                break;
            }

            // Requests arriving while this round runs trigger another one.
            self.state.clear_resolve_needed();

            let result = select! {
                biased;
                _ = stop.changed() => break,
                result = self.resolve() => result,
            };

            match result {
                Ok(endpoints) => {
                    self.state.set_resolve_error(None);
                    let count = endpoints.len();
                    let generation = self.state.publish(endpoints).await;
                    self.state.notify_resolve_done();
                    debug!(target_addr = %self.target, count, generation, "endpoints updated");
                }
                Err(e) => {
                    // The old endpoints stay and the next round retries.
                    warn!(target_addr = %self.target, error = %e, "resolve failed");
                    self.state.set_resolve_error(Some(e));
                    self.state.notify_resolve_needed();

                    select! {
                        biased;
                        _ = stop.changed() => break,
                        _ = sleep(self.retry_interval) => (),
                    }
                }
            }
        }

        info!(target_addr = %self.target, "resolve loop stopped");
    }

    /// One resolution, cut at `resolve_timeout` even if the resolver overruns it.
    async fn resolve(&self) -> ResolveResult {
        let resolving = self.resolver.resolve(self.resolve_timeout);
        match timeout(self.resolve_timeout, resolving).await {
            Ok(result) => result,
            Err(_) => Err(ResolveError::Timeout(self.target.clone())),
        }
    }
}
