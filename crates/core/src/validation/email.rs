//! Email canonicalization.
//!
//! Lowercases the address and folds provider-specific aliases so that one
//! mailbox always maps to one stored address.

const GMAIL_DOMAINS: &[&str] = &["gmail.com", "googlemail.com"];
const OUTLOOK_DOMAINS: &[&str] = &["hotmail.com", "live.com", "outlook.com", "msn.com"];
const YAHOO_DOMAINS: &[&str] = &["yahoo.com", "yahoo.es", "ymail.com", "rocketmail.com"];
const ICLOUD_DOMAINS: &[&str] = &["icloud.com", "me.com", "mac.com"];

/// Canonical form of an email address.
///
/// - The whole address is lowercased and trimmed.
/// - Gmail: dots and `+tag` are removed from the local part and
///   `googlemail.com` becomes `gmail.com`.
/// - Outlook family and iCloud: `+tag` is removed.
/// - Yahoo family: `-tag` is removed.
///
/// Applying it to its own output returns the same string.
pub fn normalize_email(raw: &str) -> String {
    let address = raw.trim().to_lowercase();
    let Some((local, domain)) = address.rsplit_once('@') else {
        return address;
    };

    let (local, domain) = if GMAIL_DOMAINS.contains(&domain) {
        (strip_tag(local, '+').replace('.', ""), "gmail.com")
    } else if OUTLOOK_DOMAINS.contains(&domain) || ICLOUD_DOMAINS.contains(&domain) {
        (strip_tag(local, '+').to_string(), domain)
    } else if YAHOO_DOMAINS.contains(&domain) {
        (strip_tag(local, '-').to_string(), domain)
    } else {
        (local.to_string(), domain)
    };

    format!("{local}@{domain}")
}

/// Local part up to the first `separator`, unless that would leave it empty.
fn strip_tag(local: &str, separator: char) -> &str {
    match local.split_once(separator) {
        Some((base, _)) if !base.is_empty() => base,
        _ => local,
    }
}
