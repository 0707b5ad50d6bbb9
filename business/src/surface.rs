//! Render surfaces for the people table body.
//!
//! Rows are built as typed cells holding escaped [`Markup`]; a surface only
//! ever receives markup produced by the escaping routine.

use std::fmt::Debug;
use std::sync::{Arc, Mutex, PoisonError};

use log::error;
use people_dom::{DomResult, Markup, NodeId, SharedDocument};

use crate::load_state::LoadState;
use crate::users::UserRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCell {
    markup: Markup,
    colspan: usize,
}

impl TableCell {
    /// A single-column cell holding the escaped `text`.
    pub fn text(text: &str) -> Self {
        Self {
            markup: Markup::escape(text),
            colspan: 1,
        }
    }

    pub fn spanning(text: &str, colspan: usize) -> Self {
        Self {
            markup: Markup::escape(text),
            colspan: colspan.max(1),
        }
    }

    pub fn markup(&self) -> &Markup {
        &self.markup
    }

    pub fn colspan(&self) -> usize {
        self.colspan
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    cells: Vec<TableCell>,
}

impl TableRow {
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self { cells }
    }

    pub fn from_record(record: &UserRecord) -> Self {
        Self::new(record.columns().into_iter().map(TableCell::text).collect())
    }

    /// One cell spanning the whole table.
    pub fn message(text: &str, columns: usize) -> Self {
        Self::new(vec![TableCell::spanning(text, columns)])
    }

    pub fn cells(&self) -> &[TableCell] {
        &self.cells
    }
}

/// The body region the loader owns and rewrites on every state change.
pub trait RenderSurface: Send + Sync + Debug {
    /// Replaces the whole body with the rendering of `state`.
    fn render(&self, state: &LoadState);
}

/// A `tbody` element in a shared document.
#[derive(Debug, Clone)]
pub struct DomTableBody {
    document: SharedDocument,
    body: NodeId,
}

impl DomTableBody {
    /// Wraps `body`; every render replaces its children.
    pub fn new(document: SharedDocument, body: NodeId) -> Self {
        Self { document, body }
    }

    pub fn node(&self) -> NodeId {
        self.body
    }

    fn replace_rows(&self, rows: &[TableRow]) -> DomResult<()> {
        self.document.write(|doc| {
            doc.clear_children(self.body)?;
            for row in rows {
                let tr = doc.create_element("tr");
                for cell in row.cells() {
                    let td = doc.create_element("td");
                    if cell.colspan() > 1 {
                        doc.set_attribute(td, "colspan", &cell.colspan().to_string())?;
                    }
                    doc.set_markup(td, cell.markup().clone())?;
                    doc.append_child(tr, td)?;
                }
                doc.append_child(self.body, tr)?;
            }
            Ok(())
        })
    }

    /// Text of each cell, row by row.
    pub fn cell_texts(&self) -> DomResult<Vec<Vec<String>>> {
        self.document.read(|doc| {
            doc.descendants_by_tag(self.body, "tr")?
                .into_iter()
                .map(|tr| {
                    doc.descendants_by_tag(tr, "td")?
                        .into_iter()
                        .map(|td| doc.text_content(td))
                        .collect()
                })
                .collect()
        })
    }
}

impl RenderSurface for DomTableBody {
    fn render(&self, state: &LoadState) {
        if let Err(err) = self.replace_rows(&state.rows()) {
            error!("DomTableBody: failed to render {state:?}: {err}");
        }
    }
}

/// Keeps every rendered state in order; handy for headless runs and tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    states: Arc<Mutex<Vec<LoadState>>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<LoadState> {
        self.states
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recently rendered state, `Idle` if nothing was rendered yet.
    pub fn current(&self) -> LoadState {
        self.history().pop().unwrap_or_default()
    }
}

impl RenderSurface for RecordingSurface {
    fn render(&self, state: &LoadState) {
        self.states
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(state.clone());
    }
}
