//! The people board page.
//!
//! [`Page::mount`] takes a document holding the static skeleton (an `h1` and
//! the main image) and adds everything else: subtitle, clock, sample list,
//! users table, shake toggles. The users table body is handed to a
//! [`UserTableLoader`]; the header row is never touched after creation.
//!
//! Trigger points for the loader are [`Page::start`] and a double-click on the
//! table caption.

mod clock;
mod shake;

use std::sync::Arc;

use chrono::Local;
use log::{error, info, warn};
use people_dom::{Document, DomError, DomResult, EventKind, EventRegistry, NodeId, SharedDocument};
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::config::LoaderConfig;
use crate::fetch_service::FetchService;
use crate::loader::UserTableLoader;
use crate::surface::DomTableBody;

pub use clock::{CLOCK_PERIOD, Clock, clock_text};
pub use shake::{shake_label, toggle_shake_by_id};

pub const MAIN_IMAGE_ID: &str = "main-image";
pub const TABLE_ID: &str = "table-users";
pub const IMAGE_BUTTON_ID: &str = "btn-toggle-img";
pub const TABLE_BUTTON_ID: &str = "btn-toggle-table";
pub const LIST_ID: &str = "my-list";
pub const SHAKE_CLASS: &str = "shake";

pub const TABLE_CAPTION: &str = "People";
pub const TABLE_HEADERS: [&str; 3] = ["Name", "User name", "Email"];

#[derive(Debug, Error)]
pub enum PageError {
    #[error("Page skeleton is missing {0}")]
    MissingElement(&'static str),
    #[error(transparent)]
    Dom(#[from] DomError),
}

/// The static part of the page, as served before any script runs.
pub fn skeleton() -> DomResult<Document> {
    let mut doc = Document::new();
    let root = doc.root();

    let heading = doc.create_element("h1");
    doc.set_text(heading, "Hello world")?;
    doc.append_child(root, heading)?;

    let image = doc.create_element("img");
    doc.set_id(image, MAIN_IMAGE_ID)?;
    doc.set_attribute(image, "src", "image.jpg")?;
    doc.set_attribute(image, "alt", "Main image")?;
    doc.append_child(root, image)?;

    Ok(doc)
}

/// Elements the page created or looked up while mounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageNodes {
    pub heading: NodeId,
    pub subtitle: NodeId,
    pub clock: NodeId,
    pub list: NodeId,
    pub image: NodeId,
    pub image_button: NodeId,
    pub table: NodeId,
    pub caption: NodeId,
    pub table_body: NodeId,
    pub table_button: NodeId,
}

/// A mounted people board.
///
/// Owns the listeners wired during [`Page::mount`] and the loader feeding the
/// users table body.
#[derive(Debug, Clone)]
pub struct Page {
    document: SharedDocument,
    nodes: PageNodes,
    loader: UserTableLoader,
    events: EventRegistry,
}

impl Page {
    /// Completes the skeleton in `document` and wires the toggles and the
    /// caption reload. Fails when the skeleton lacks its `h1` or main image.
    pub fn mount(
        document: SharedDocument,
        config: LoaderConfig,
        fetcher: Arc<dyn FetchService>,
    ) -> Result<Self, PageError> {
        info!("Page: Hello world from the page script");

        let nodes = document.write(build)?;
        let surface = DomTableBody::new(document.clone(), nodes.table_body);
        let loader = UserTableLoader::new(config, fetcher, Arc::new(surface));

        let mut events = EventRegistry::new();
        for (button, target_id) in [
            (nodes.image_button, MAIN_IMAGE_ID),
            (nodes.table_button, TABLE_ID),
        ] {
            let document = document.clone();
            events.add_listener(button, EventKind::Click, move |_| {
                if let Err(err) = toggle_shake_by_id(&document, target_id, button) {
                    error!("Page: failed to toggle shake on #{target_id}: {err}");
                }
            });
        }

        let reload = loader.clone();
        events.add_listener(nodes.caption, EventKind::DoubleClick, move |_| {
            if tokio::runtime::Handle::try_current().is_ok() {
                drop(reload.spawn_load());
            } else {
                warn!("Page: caption double-clicked outside of a runtime, reload skipped");
            }
        });

        Ok(Self {
            document,
            nodes,
            loader,
            events,
        })
    }

    pub fn document(&self) -> &SharedDocument {
        &self.document
    }

    pub fn nodes(&self) -> &PageNodes {
        &self.nodes
    }

    pub fn loader(&self) -> &UserTableLoader {
        &self.loader
    }

    pub fn table_body(&self) -> DomTableBody {
        DomTableBody::new(self.document.clone(), self.nodes.table_body)
    }

    pub fn clock(&self) -> Clock {
        Clock::new(self.document.clone(), self.nodes.clock)
    }

    /// Initial load, run once the page is ready.
    pub fn start(&self) -> JoinHandle<()> {
        self.loader.spawn_load()
    }

    pub fn spawn_clock(&self) -> JoinHandle<()> {
        self.clock().spawn(CLOCK_PERIOD)
    }

    /// Dispatches a click; returns how many listeners ran.
    pub fn click(&self, node: NodeId) -> usize {
        self.events.dispatch(node, EventKind::Click)
    }

    pub fn double_click(&self, node: NodeId) -> usize {
        self.events.dispatch(node, EventKind::DoubleClick)
    }

    pub fn to_html(&self) -> String {
        self.document.to_html()
    }
}

fn build(doc: &mut Document) -> Result<PageNodes, PageError> {
    let root = doc.root();

    let heading = doc
        .first_descendant_by_tag(root, "h1")?
        .ok_or(PageError::MissingElement("h1"))?;
    doc.append_text(heading, " from JS")?;
    doc.set_attribute(heading, "style", "color: purple")?;

    let subtitle = doc.create_element("h2");
    doc.set_text(subtitle, "Welcome to the DOM")?;
    doc.insert_after(heading, subtitle)?;

    let clock = doc.create_element("h3");
    doc.insert_after(subtitle, clock)?;
    doc.set_text(clock, &clock_text(Local::now().time()))?;

    let list = build_list(doc, clock)?;

    let image = doc
        .get_element_by_id(MAIN_IMAGE_ID)
        .ok_or(PageError::MissingElement("#main-image"))?;

    let table = match doc.get_element_by_id(TABLE_ID) {
        Some(table) => table,
        None => create_table(doc, image)?,
    };
    let caption = doc
        .first_descendant_by_tag(table, "caption")?
        .ok_or(PageError::MissingElement("table caption"))?;
    let table_body = doc
        .first_descendant_by_tag(table, "tbody")?
        .ok_or(PageError::MissingElement("tbody"))?;

    let image_button = toggle_button(doc, IMAGE_BUTTON_ID, MAIN_IMAGE_ID, image)?;
    doc.insert_after(image, image_button)?;
    let table_button = toggle_button(doc, TABLE_BUTTON_ID, TABLE_ID, table)?;
    doc.insert_after(table, table_button)?;

    Ok(PageNodes {
        heading,
        subtitle,
        clock,
        list,
        image,
        image_button,
        table,
        caption,
        table_body,
        table_button,
    })
}

fn build_list(doc: &mut Document, after: NodeId) -> DomResult<NodeId> {
    let list = doc.create_element("ul");
    doc.set_id(list, LIST_ID)?;

    let mut items = Vec::new();
    for text in ["Élément 1", "Élément 2"] {
        let item = doc.create_element("li");
        doc.set_text(item, text)?;
        doc.append_child(list, item)?;
        items.push(item);
    }
    doc.insert_after(after, list)?;

    if let Some(first) = items.first() {
        doc.remove_child(list, *first)?;
    }
    let added = doc.create_element("li");
    doc.set_text(added, "Élément ajouté en JS")?;
    doc.append_child(list, added)?;

    Ok(list)
}

fn create_table(doc: &mut Document, image: NodeId) -> DomResult<NodeId> {
    let table = doc.create_element("table");
    doc.set_id(table, TABLE_ID)?;

    let caption = doc.create_element("caption");
    doc.set_text(caption, TABLE_CAPTION)?;

    let head = doc.create_element("thead");
    let header_row = doc.create_element("tr");
    for label in TABLE_HEADERS {
        let th = doc.create_element("th");
        doc.set_text(th, label)?;
        doc.append_child(header_row, th)?;
    }
    doc.append_child(head, header_row)?;

    let body = doc.create_element("tbody");
    for part in [caption, head, body] {
        doc.append_child(table, part)?;
    }

    let anchor = doc.get_element_by_id(IMAGE_BUTTON_ID).unwrap_or(image);
    doc.insert_after(anchor, table)?;
    Ok(table)
}

fn toggle_button(
    doc: &mut Document,
    button_id: &str,
    target_id: &'static str,
    target: NodeId,
) -> DomResult<NodeId> {
    let button = doc.create_element("button");
    doc.set_id(button, button_id)?;
    let shaking = doc.has_class(target, SHAKE_CLASS)?;
    doc.set_text(button, shake_label(target_id, shaking))?;
    Ok(button)
}
