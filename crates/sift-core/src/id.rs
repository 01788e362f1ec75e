use sha2::{Digest, Sha256};

use crate::model::Signal;

/// Prefix used for stable bead IDs when the caller does not supply one.
pub const DEFAULT_ID_PREFIX: &str = "sft-";

const HASH_LEN: usize = 8;

/// Stable, content-derived bead ID for a signal.
///
/// The same content and prefix always produce the same ID, across processes,
/// which is what lets dependency edges survive between separate runs.
pub fn signal_id(signal: &Signal, prefix: &str) -> String {
    let line = signal.line.map(|l| l.to_string()).unwrap_or_default();
    let key = format!(
        "{}\0{}\0{}\0{}\0{}",
        signal.source, signal.kind, signal.file_path, line, signal.title
    );
    let hash = format!("{:x}", Sha256::digest(key.as_bytes()));
    format!("{prefix}{}", &hash[..HASH_LEN])
}

/// Call-scoped reference for the signal at `index`: `sig-<index>`.
pub fn signal_ref(index: usize) -> String {
    format!("sig-{index}")
}

/// Resolve a `sig-<index>` reference against a slice of `len` signals.
pub fn resolve_signal_ref(reference: &str, len: usize) -> Option<usize> {
    let digits = reference.trim().strip_prefix("sig-")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let index: usize = digits.parse().ok()?;
    (index < len).then_some(index)
}
