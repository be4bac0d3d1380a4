//! Organization email-domain checks.
//!
//! An organization may claim an email domain so members can be recognized
//! by address. Public mail providers are allowed but flagged, since anyone
//! can hold an address there.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::ServiceError;

static DOMAIN_FORMAT: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,63}$"));

fn domain_format() -> Result<&'static Regex, ServiceError> {
    DOMAIN_FORMAT.as_ref().map_err(|e| ServiceError::Pattern(e.clone()))
}

const PUBLIC_DOMAINS: &[&str] = &[
    "gmail.com",
    "googlemail.com",
    "yahoo.com",
    "hotmail.com",
    "outlook.com",
    "live.com",
    "msn.com",
    "aol.com",
    "icloud.com",
    "me.com",
    "mac.com",
    "protonmail.com",
    "proton.me",
    "mail.com",
    "gmx.com",
    "gmx.de",
    "yandex.com",
    "zoho.com",
    "qq.com",
    "163.com",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainValidation {
    /// Normalized domain that was checked.
    pub domain: String,
    pub is_valid: bool,
    pub is_public: bool,
    pub warnings: Vec<String>,
}

/// Lowercase, trim, and drop a leading `@` or `www.`.
#[must_use]
pub fn normalize_domain(domain: &str) -> String {
    let d = domain.trim().to_ascii_lowercase();
    let d = d.strip_prefix('@').unwrap_or(&d);
    d.strip_prefix("www.").unwrap_or(d).trim_end_matches('.').to_string()
}

#[must_use]
pub fn is_public_domain(domain: &str) -> bool {
    PUBLIC_DOMAINS.contains(&normalize_domain(domain).as_str())
}

/// # Errors
///
/// Returns [`ServiceError::Pattern`] if the domain pattern fails to compile.
pub fn validate_domain(domain: &str) -> Result<DomainValidation, ServiceError> {
    let normalized = normalize_domain(domain);
    let well_formed = normalized.len() <= 253 && domain_format()?.is_match(&normalized);
    if !well_formed {
        return Ok(DomainValidation {
            domain: normalized,
            is_valid: false,
            is_public: false,
            warnings: vec!["Invalid domain format. Use a domain like example.com.".into()],
        });
    }

    let is_public = PUBLIC_DOMAINS.contains(&normalized.as_str());
    let mut warnings = Vec::new();
    if is_public {
        warnings.push(format!(
            "{normalized} is a public email provider. Anyone with an address there would match this organization."
        ));
    }
    if normalized.split('.').count() > 3 {
        warnings.push(format!("{normalized} is a deep subdomain. Addresses at the parent domain will not match."));
    }
    Ok(DomainValidation { domain: normalized, is_valid: true, is_public, warnings })
}

/// Domain part of an email address, normalized.
#[must_use]
pub fn email_domain(email: &str) -> Option<String> {
    let (_, domain) = email.trim().rsplit_once('@')?;
    (!domain.is_empty()).then(|| normalize_domain(domain))
}

#[cfg(test)]
#[path = "domain_test.rs"]
mod tests;
