use crate::config::ReferenceTables;
use crate::validation::syntax;

/// Independent provider signals for one address. All three are computed
/// up front: free/disposable act as hard gates while role-based is a
/// scoring penalty and a late inclusion gate, so the pipeline needs them
/// even when an earlier gate short-circuits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProviderClassification {
    pub free: bool,
    pub disposable: bool,
    pub role_based: bool,
}

/// An address with no parseable domain fails safe toward exclusion.
pub fn is_free_provider(email: &str, tables: &ReferenceTables) -> bool {
    match syntax::parse(email) {
        Some(parsed) => tables.is_free_domain(parsed.domain),
        None => true,
    }
}

/// Same fail-safe rule as [`is_free_provider`].
pub fn is_disposable_provider(email: &str, tables: &ReferenceTables) -> bool {
    match syntax::parse(email) {
        Some(parsed) => tables.is_disposable_domain(parsed.domain),
        None => true,
    }
}

/// Role detection is a substring match on the lowercased local part; an
/// address with no local part is treated as role-based.
pub fn is_role_based(email: &str, tables: &ReferenceTables) -> bool {
    match syntax::parse(email) {
        Some(parsed) => tables.matches_role_token(parsed.local),
        None => true,
    }
}

pub fn classify(email: &str, tables: &ReferenceTables) -> ProviderClassification {
    ProviderClassification {
        free: is_free_provider(email, tables),
        disposable: is_disposable_provider(email, tables),
        role_based: is_role_based(email, tables),
    }
}
