//! Device and referrer classification for raw click events.

/// Substring rules for device classification, checked in order. The first
/// matching rule wins, so an iPhone UA never falls through to the
/// Macintosh rule even though both contain "Mac".
const DEVICE_RULES: &[(&str, &str)] = &[
    ("iPhone", "iPhone"),
    ("Android", "Android"),
    ("Macintosh", "Mac"),
    ("Windows", "Windows"),
];

/// Map a raw User-Agent string to a coarse device family.
///
/// Unrecognized agents (bots, curl, empty strings) fall back to `"Desktop"`.
pub fn classify_device(user_agent: &str) -> &'static str {
    for (needle, family) in DEVICE_RULES {
        if user_agent.contains(needle) {
            return family;
        }
    }
    "Desktop"
}

/// Reduce a referrer value to its host for grouping.
///
/// Strips an `http://` or `https://` scheme prefix and everything from the
/// first `/` of the remainder onward. Anything left empty collapses to the
/// literal `"direct"`, so clicks that arrived without a Referer header all
/// group under one name.
pub fn referrer_host(referrer: &str) -> &str {
    let rest = referrer
        .strip_prefix("https://")
        .or_else(|| referrer.strip_prefix("http://"))
        .unwrap_or(referrer);
    let host = match rest.find('/') {
        Some(pos) => &rest[..pos],
        None => rest,
    };
    if host.is_empty() {
        "direct"
    } else {
        host
    }
}
