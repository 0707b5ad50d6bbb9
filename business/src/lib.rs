//! Business logic for the people board.
//!
//! The core piece is [`UserTableLoader`]: it fetches the user list over HTTP,
//! races the request against a timeout and renders the outcome through a
//! [`RenderSurface`]. [`Page`] mounts the board around it on a
//! [`people_dom::Document`].

pub mod cancel;
pub mod config;
pub mod error;
pub mod fetch_service;
pub mod http;
pub mod load_state;
pub mod loader;
pub mod page;
pub mod surface;
pub mod users;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use cancel::{CancellableOperation, Cancelled, DeadlineExceeded, OperationHandle, with_deadline};
pub use config::LoaderConfig;
pub use error::LoadError;
pub use fetch_service::{FetchFuture, FetchService, ReqwestFetcher};
pub use http::{Client, HttpError, HttpErrorKind, HttpResult, Response};
pub use load_state::LoadState;
pub use loader::UserTableLoader;
pub use page::{Page, PageError, PageNodes};
pub use surface::{DomTableBody, RecordingSurface, RenderSurface, TableCell, TableRow};
pub use users::UserRecord;
