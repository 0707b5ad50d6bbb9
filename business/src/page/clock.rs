use std::time::Duration;

use chrono::{Local, NaiveTime};
use log::error;
use people_dom::{DomResult, NodeId, SharedDocument};
use tokio::task::JoinHandle;

pub const CLOCK_PERIOD: Duration = Duration::from_secs(1);

pub fn clock_text(time: NaiveTime) -> String {
    format!("Heure actuelle : {}", time.format("%H:%M:%S"))
}

/// The heading that shows the current local time.
#[derive(Debug, Clone)]
pub struct Clock {
    document: SharedDocument,
    node: NodeId,
}

impl Clock {
    pub fn new(document: SharedDocument, node: NodeId) -> Self {
        Self { document, node }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn show(&self, time: NaiveTime) -> DomResult<()> {
        self.document
            .write(|doc| doc.set_text(self.node, &clock_text(time)))
    }

    pub fn tick(&self) -> DomResult<()> {
        self.show(Local::now().time())
    }

    /// Refreshes the clock every `period` until the handle is aborted.
    pub fn spawn(self, period: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                if let Err(err) = self.tick() {
                    error!("Clock: failed to update: {err}");
                    break;
                }
            }
        })
    }
}
