/// RFC 5322 / RFC 6531 syntax validation and canonicalization. Parses an
/// address into {local part, domain} exactly once; everything downstream
/// works from that split.
pub mod syntax;

/// Free / disposable / role-based classification against the injected
/// reference tables. Pure string operations, no I/O.
pub mod provider;

/// Domain existence (A/AAAA) and mail-routing (MX) checks. All failures
/// are folded into the findings value, never raised.
pub mod dns;

/// Domain-age lookup over WHOIS and the age-to-risk classification.
pub mod reputation;

/// The deterministic confidence scorer: weighted signals in, a clamped
/// score, label and ordered factor list out.
pub mod scoring;

/// The state machine that sequences the checks, short-circuits on
/// disqualifying conditions and renders the inclusion verdict, plus the
/// order-preserving batch runner.
pub mod pipeline;
