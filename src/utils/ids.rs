use uuid::Uuid;

/// Generate a unique identifier that sorts in creation order.
///
/// UUIDv7 carries a millisecond timestamp followed by a counter, so ids
/// produced within the same millisecond still compare in generation order.
pub fn generate_id() -> Uuid {
    Uuid::now_v7()
}

/// Parse an identifier received from a caller, ignoring surrounding whitespace.
pub fn parse_id(raw: &str) -> Option<Uuid> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Uuid::parse_str(trimmed).ok().filter(|id| !id.is_nil())
}
