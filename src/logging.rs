//! Tracing setup for the binary and the anonymised ids used in log events.
//!
//! Review text is never logged. Analyses are identified by a short SHA-256 prefix
//! of the combined text instead.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const ENV_LOG_JSON: &str = "ECO_SCORE_LOG_JSON";

const DEFAULT_FILTER: &str = "eco_score=info,warn";
const VERBOSE_FILTER: &str = "eco_score=debug,info";

/// Install a global subscriber. `RUST_LOG` wins over `verbose`.
/// Safe to call twice; the second call is a no-op.
pub fn init_tracing(verbose: bool) {
    let fallback = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let json = std::env::var(ENV_LOG_JSON).ok().as_deref() == Some("1");
    let registry = tracing_subscriber::registry().with(filter);
    let _ = if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init()
    };
}

/// First 6 bytes of SHA-256, hex encoded.
pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}
