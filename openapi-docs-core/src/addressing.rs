//! Mapping between service names and the keys their definitions are stored under.

const DEFINITION_SUFFIX: &str = ".yml";

/// Key of the stored definition for `service`: `<prefix>/<service>.yml`.
///
/// The name is used verbatim. Names containing `/` or `.` produce keys that
/// do not map back to the same name.
pub fn service_name_to_key(prefix: &str, service: &str) -> String {
    format!("{prefix}/{service}{DEFINITION_SUFFIX}")
}

/// Service name encoded in `key`: everything between the first `/` and the last `.`.
///
/// Returns `None` when the key has no `/`, or no `.` after it.
pub fn key_to_service_name(key: &str) -> Option<&str> {
    let start = key.find('/')? + 1;
    let end = key.rfind('.')?;
    if end < start {
        return None;
    }
    Some(&key[start..end])
}

/// Whether a listed key looks like a stored definition.
pub fn is_definition_key(key: &str) -> bool {
    key.ends_with(DEFINITION_SUFFIX)
}

/// The listing prefix for the definitions folder, with its trailing delimiter.
pub fn listing_prefix(prefix: &str) -> String {
    format!("{}/", prefix.trim_end_matches('/'))
}
