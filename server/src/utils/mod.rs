pub mod error;
pub mod response;
pub mod validation;

/// Parses a path id. Anything that is not a UUID cannot name a stored record,
/// so callers treat `None` as "not found".
pub fn parse_id(raw: &str) -> Option<uuid::Uuid> {
    uuid::Uuid::parse_str(raw.trim()).ok()
}
