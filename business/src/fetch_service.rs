use std::fmt::Debug;
use std::future::Future;
use std::pin::Pin;

use crate::http::{Client, HttpResult, Response};

pub type FetchFuture = Pin<Box<dyn Future<Output = HttpResult<Response>> + Send + 'static>>;

/// Issues a single GET and resolves to the drained response.
///
/// Dropping the returned future must abandon the request.
pub trait FetchService: Send + Sync + Debug {
    fn get(&self, url: &str) -> FetchFuture;
}

#[derive(Debug, Clone, Default)]
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl FetchService for ReqwestFetcher {
    fn get(&self, url: &str) -> FetchFuture {
        let request = self.client.get(url).header("accept", "application/json");
        Box::pin(request.send())
    }
}
