//! Crate-level error types and the resolution taxonomy.
use std::path::PathBuf;

/// Errors that stop an operation outright: configuration loading, transport,
/// and payload decoding. Resolution itself never returns these; a failed
/// fetch is folded into "no data" by the stage that asked for it.
#[allow(clippy::error_impl_error, reason = "crate-level error type re-exported at the root")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A configuration file named on the command line does not exist.
    #[error("config not found: {}", path.display())]
    ConfigNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// A remote collaborator could not produce a payload.
    #[error("fetch failed: {url}: {reason}")]
    Fetch {
        /// Reason reported by the transport or decoder.
        reason: String,
        /// URL that was requested.
        url: String,
    },

    /// The marker configuration is unusable (for example an empty separator).
    #[error("invalid markers: {reason}")]
    InvalidMarkers {
        /// What is wrong with the configured markers.
        reason: String,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// JSON (de)serialization failed.
    #[error("json: {0}")]
    Json(
        /// The wrapped JSON error.
        #[from]
        serde_json::Error,
    ),

    /// A newer request was issued before this one settled.
    #[error(transparent)]
    Superseded(
        /// The stale request's marker.
        #[from]
        crate::guard::Superseded,
    ),

    /// TOML deserialization failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),
}

/// Why a resolution stopped short of the most specific coordinate the
/// reference names. Carried as data on a `Resolution`, never thrown.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Unresolved {
    /// Accordion forwarding recursed past the depth limit.
    #[error("forward references nested deeper than {depth}")]
    ForwardTooDeep {
        /// The depth limit that was hit.
        depth: usize,
    },

    /// An accordion element named a token that none of its elements carry.
    #[error("unknown element `{name}`")]
    UnknownElement {
        /// Token that was looked up.
        name: String,
    },

    /// No organization carries this exact name.
    #[error("unknown organization `{name}`")]
    UnknownOrganization {
        /// Token that was looked up.
        name: String,
    },

    /// The section's record list has no row with this name, or could not be fetched.
    #[error("unknown record `{name}` in section `{section}`")]
    UnknownRecord {
        /// Token that was looked up.
        name: String,
        /// Section whose records were searched.
        section: String,
    },

    /// Neither a section nor an organization-level widget carries this name.
    #[error("unknown section `{name}` in organization `{organization}`")]
    UnknownSection {
        /// Token that was looked up.
        name: String,
        /// Organization whose sections were searched.
        organization: String,
    },

    /// No configured, default, or organization-level widget carries this name,
    /// or a widget-internal lookup (row, item, node) found nothing.
    #[error("unknown widget element `{name}` under `{widget}`")]
    UnknownWidget {
        /// Token that was looked up.
        name: String,
        /// Widget, or enclosing coordinate, that was searched.
        widget: String,
    },
}
