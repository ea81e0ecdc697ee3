//! Base addresses of the local API servers.

/// The API server started by the backend itself.
pub const PRIMARY_LOCAL_ADDRESS: &str = "http://localhost:3000/api";

/// A static dev server proxying `/api`.
pub const SECONDARY_LOCAL_ADDRESS: &str = "http://localhost:5501/api";

/// Candidates tried, in this order, when the current address cannot route a request.
pub const WELL_KNOWN_ADDRESSES: [&str; 2] = [PRIMARY_LOCAL_ADDRESS, SECONDARY_LOCAL_ADDRESS];

/// Strip one trailing slash so endpoint paths can be appended directly.
pub fn normalize_base(base: &str) -> String {
    base.strip_suffix('/').unwrap_or(base).to_string()
}

/// The well-known addresses minus the one `current` already points at.
///
/// Matching is on `host:port/api` at the end of `current`, so `https://` or a
/// `127.0.0.1` spelling of the same server is not excluded.
pub fn fallback_set(current: &str) -> Vec<String> {
    let current = normalize_base(current);
    WELL_KNOWN_ADDRESSES
        .iter()
        .filter(|address| {
            let suffix = address.trim_start_matches("http://");
            !current.ends_with(suffix)
        })
        .map(|address| address.to_string())
        .collect()
}
