use std::net::{IpAddr, Ipv6Addr};

/// An address split into its local part and domain. Splitting happens
/// exactly once, before any classifier runs, so a missing domain is an
/// explicit outcome rather than a string-indexing surprise downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedAddress<'a> {
    pub local: &'a str,
    pub domain: &'a str,
}

/// Splits an address at the first unquoted `@`. Returns `None` when there
/// is no separator, or when either side is empty. No validation beyond the
/// split itself.
pub fn parse(email: &str) -> Option<ParsedAddress<'_>> {
    let mut in_quotes = false;
    let mut escape = false;
    let mut split_index = None;

    for (i, c) in email.char_indices() {
        match c {
            '"' if !escape => in_quotes = !in_quotes,
            '\\' if in_quotes => escape = true,
            '@' if !in_quotes => {
                split_index = Some(i);
                break;
            }
            _ => escape = false,
        }
    }

    let at = split_index?;
    let (local, rest) = email.split_at(at);
    let domain = &rest[1..];
    if local.is_empty() || domain.is_empty() {
        return None;
    }
    Some(ParsedAddress { local, domain })
}

/// Validates an address against RFC 5322 / RFC 6531 syntax and, on success,
/// returns the canonical form: local part preserved, domain lowercased.
///
/// No network check of any kind happens here.
///
/// # Examples
/// ```
/// use email_vetter::validation::syntax::normalize;
///
/// assert_eq!(
///     normalize("Founder@BrandX.in").as_deref(),
///     Some("Founder@brandx.in")
/// );
/// assert!(normalize("not-an-address").is_none());
/// ```
pub fn normalize(email: &str) -> Option<String> {
    // Overall length constraint (RFC 5321 + 5322)
    if email.len() > 254 {
        return None;
    }

    let parsed = parse(email)?;

    // Local part length constraint (RFC 5321)
    if parsed.local.len() > 64 {
        return None;
    }

    if !is_valid_local_part(parsed.local) || !is_valid_domain_part(parsed.domain) {
        return None;
    }

    Some(format!("{}@{}", parsed.local, parsed.domain.to_lowercase()))
}

/// Local part: dot-atom or quoted-string, per RFC 5322 section 3.4.1.
fn is_valid_local_part(local: &str) -> bool {
    if local.starts_with('"') && local.ends_with('"') && local.len() >= 2 {
        is_valid_quoted_string(local)
    } else {
        is_valid_dot_atom(local, false)
    }
}

/// Domain part: domain name (internationalized per RFC 5890/6531) or a
/// bracketed IP literal.
fn is_valid_domain_part(domain: &str) -> bool {
    if let Some(literal) = domain.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        is_valid_domain_literal(literal)
    } else {
        is_valid_domain_name(domain)
    }
}

fn is_valid_quoted_string(quoted: &str) -> bool {
    let content = &quoted[1..quoted.len() - 1];
    let mut escape = false;

    for c in content.chars() {
        if escape {
            if !matches!(c, '\\' | '"') {
                return false;
            }
            escape = false;
        } else if c == '\\' {
            escape = true;
        } else if c == '"' {
            return false; // unescaped quote inside the string
        }
    }
    !escape // no dangling escape
}

fn is_valid_dot_atom(s: &str, is_domain: bool) -> bool {
    let parts: Vec<&str> = s.split('.').collect();
    if parts.is_empty() || parts.iter().any(|&p| p.is_empty()) {
        return false;
    }

    parts.iter().all(|part| {
        part.chars().all(|c| match c {
            '-' => !is_domain || (!part.starts_with('-') && !part.ends_with('-')),
            c if is_domain => c.is_alphanumeric() || c == '-',
            _ => c.is_alphanumeric() || "!#$%&'*+/=?^_`{|}~".contains(c),
        })
    })
}

fn is_valid_domain_literal(literal: &str) -> bool {
    literal.parse::<IpAddr>().is_ok()
        || literal
            .strip_prefix("IPv6:")
            .and_then(|ip| ip.parse::<Ipv6Addr>().ok())
            .is_some()
}

fn is_valid_domain_name(domain: &str) -> bool {
    let labels: Vec<&str> = domain.split('.').collect();
    !labels.is_empty()
        && labels.iter().all(|label| {
            label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && is_valid_dot_atom(label, true)
        })
}
