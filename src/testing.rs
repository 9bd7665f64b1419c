//! Shared helpers for the unit and integration suites.

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use tempfile::TempDir;

/// Serializes tests that read or mutate process environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

pub(crate) fn env_guard() -> MutexGuard<'static, ()> {
    ENV_MUTEX
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Drop every variable this crate consults so a test starts from a known
/// state. Call while holding `env_guard`.
pub(crate) fn clear_gemini_env() {
    for key in ["GEMINI_API_KEY", "GOOGLE_API_KEY", "CHALLENGE_TRIAGE_MODEL"] {
        std::env::remove_var(key);
    }
}

/// PNG signature plus filler. Mock-server tests only need bytes on the wire;
/// nothing decodes the image.
pub(crate) const PNG_STUB: &[u8] = &[
    0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x00,
];

/// Write a stub screenshot into a fresh temp dir. The dir guard must stay
/// alive for as long as the path is used.
pub(crate) fn temp_screenshot() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("challenge.png");
    std::fs::write(&path, PNG_STUB).expect("write stub screenshot");
    (dir, path)
}

pub(crate) fn init_test_logging() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "challenge_triage=debug".parse().expect("static filter")),
        )
        .with_test_writer()
        .try_init();
}
