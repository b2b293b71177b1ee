//! Resolution and autocompletion of hierarchical object references typed
//! into chat messages, such as `&(Acme.Incidents.Phishing-Jan.Severity)`.
//!
//! A reference walks organization, section, record and widget, then
//! descends into the widget's own content (table rows, list items, graph
//! nodes). Accordion elements forward the walk to a record elsewhere.
#![allow(clippy::cargo_common_metadata, reason = "not published; there is no public repository to point at")]
pub mod config;
pub mod coordinate;
pub mod diagnostics;
pub mod ecosystem;
pub mod engine;
pub mod error;
pub mod fetch;
pub mod guard;
pub mod hyperlink;
pub mod relative;
mod resolver;
pub mod snapshot;
mod suggest;
pub mod tokenizer;
pub mod types;
mod widgets;

pub use coordinate::{Coordinate, Resolution, ResolveOptions, Suggestion, WidgetHash};
pub use engine::{Engine, MAX_FORWARD_DEPTH};
pub use error::{Error, Unresolved};
pub use guard::{Generation, Superseded, Ticket};
pub use hyperlink::Linker;
pub use relative::{ChannelContext, RelativeReference};
pub use widgets::MAX_SUGGESTION_LENGTH;
