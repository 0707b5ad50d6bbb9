//! Users table loader.
//!
//! ## Lifecycle
//! 1) `load()` renders the loading placeholder right away, before anything is
//!    awaited, and returns a future owning the rest of the work.
//! 2) The future issues one GET, raced against the configured timeout.
//! 3) The outcome is classified into a [`LoadState`] and rendered. Nothing is
//!    returned to the caller; failures only show up on the surface and in logs.
//!
//! Overlapping loads are not serialized: each call runs its own request and the
//! one that settles last decides what the surface shows.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use log::{error, info, warn};
use serde_json::Value;
use tokio::task::JoinHandle;

use crate::cancel::{DeadlineExceeded, with_deadline};
use crate::config::LoaderConfig;
use crate::error::LoadError;
use crate::fetch_service::{FetchFuture, FetchService};
use crate::load_state::LoadState;
use crate::surface::RenderSurface;
use crate::users::{UserRecord, records_from_payload};

/// Loads the user list into a [`RenderSurface`].
///
/// Cheap to clone; clones share the fetcher and the surface.
#[derive(Debug, Clone)]
pub struct UserTableLoader {
    config: LoaderConfig,
    fetcher: Arc<dyn FetchService>,
    surface: Arc<dyn RenderSurface>,
}

impl UserTableLoader {
    /// Builds a loader; nothing is fetched or rendered until [`load`](Self::load).
    pub fn new(
        config: LoaderConfig,
        fetcher: Arc<dyn FetchService>,
        surface: Arc<dyn RenderSurface>,
    ) -> Self {
        Self {
            config,
            fetcher,
            surface,
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Renders the loading placeholder and returns the future completing the load.
    ///
    /// The placeholder is on the surface when this returns, whether or not the
    /// future is ever polled.
    pub fn load(&self) -> impl Future<Output = ()> + Send + 'static {
        let url = self.config.users_url().to_owned();
        let timeout = self.config.timeout();

        info!("UserTableLoader: Loading users from {url}");
        self.surface.render(&LoadState::Loading);

        let request = self.fetcher.get(&url);
        let surface = Arc::clone(&self.surface);

        async move {
            let state = settle(fetch_users(request, timeout).await, &url);
            surface.render(&state);
        }
    }

    /// Runs [`load`](Self::load) on the current tokio runtime.
    pub fn spawn_load(&self) -> JoinHandle<()> {
        tokio::spawn(self.load())
    }
}

async fn fetch_users(
    request: FetchFuture,
    timeout: Duration,
) -> Result<Option<Vec<UserRecord>>, LoadError> {
    let response = with_deadline(request, timeout)
        .await
        .map_err(|DeadlineExceeded| LoadError::Timeout)??;

    if !response.is_success() {
        return Err(LoadError::Status(response.status));
    }

    let payload: Value = response.json()?;
    Ok(records_from_payload(&payload))
}

fn settle(outcome: Result<Option<Vec<UserRecord>>, LoadError>, url: &str) -> LoadState {
    match outcome {
        Ok(Some(records)) => {
            info!(
                "UserTableLoader: Fetched {} users successfully",
                records.len()
            );
            LoadState::Loaded(records)
        }
        Ok(None) => {
            info!("UserTableLoader: No users returned by {url}");
            LoadState::Empty
        }
        Err(LoadError::Timeout) => {
            warn!("UserTableLoader: Request to {url} timed out");
            LoadState::Timeout
        }
        Err(LoadError::Status(status)) => {
            error!("UserTableLoader: Fetch failed: HTTP {status}");
            LoadState::HttpError(status)
        }
        Err(err) => {
            error!("UserTableLoader: Failed to load users: {err}");
            LoadState::from(err)
        }
    }
}
