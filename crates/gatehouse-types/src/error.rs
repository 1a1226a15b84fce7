//! Error types for the shared vocabulary.

/// Errors produced when converting raw values into Gatehouse types.
///
/// These only occur at the edges, when parsing a region code typed into a
/// config file or a console prompt. Index lookups never fail; they fall
/// back to [`Region::Best`](crate::Region::Best) instead.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TypesError {
    /// The string is not one of the backend's region codes.
    #[error("unknown region code: {0:?}")]
    UnknownRegion(String),
}
