//! Minimal document tree used by the people board page.
//!
//! The tree is an arena of element nodes addressed by [`NodeId`]. It supports the
//! handful of operations the page needs: creating elements, inserting them next to
//! or inside other elements, looking nodes up by id or tag, toggling classes,
//! and serializing the result back to HTML.
//!
//! Content is either plain text (escaped when serialized) or [`Markup`], which can
//! only be produced by [`escape_html`] and is emitted verbatim.

mod document;
mod error;
mod escape;
mod events;

pub use document::{Document, NodeId, SharedDocument};
pub use error::{DomError, DomResult};
pub use escape::{Markup, escape_html};
pub use events::{EventKind, EventRegistry, Listener};
