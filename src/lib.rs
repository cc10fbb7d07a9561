//! fivekit — cache cleaning and environment diagnostics for the FiveM
//! game client.
//!
//! The engine lives in this library: a fixed registry of cache locations
//! ([`registry`]), recursive size scanning ([`scanner`]), best-effort
//! cleaning ([`cleaner`]), a seven-check health battery ([`diagnostics`])
//! and a background runner ([`runner`]) so front ends never block on a
//! filesystem walk or a network probe. The CLI in `main.rs` is a thin
//! consumer of this API.

pub mod cleaner;
pub mod diagnostics;
pub mod paths;
pub mod registry;
pub mod runner;
pub mod scanner;
pub mod ui;

pub use cleaner::{CleanOutcome, CleanReport};
pub use diagnostics::{DiagnosticCheck, DiagnosticEngine, DiagnosticReport};
pub use registry::CacheTarget;
pub use scanner::{ScanReport, ScanResult};

/// The registered cache targets, in display order.
pub fn list_targets() -> &'static [CacheTarget] {
    registry::targets()
}

/// Scan every registered target and total up the reclaimable bytes.
pub fn scan_all() -> ScanReport {
    scanner::scan_all(registry::targets())
}

/// Clean every registered target.
pub fn clean_all() -> CleanReport {
    cleaner::clean_all(registry::targets())
}

/// Run the full diagnostic battery against this machine.
pub fn run_diagnostics() -> DiagnosticReport {
    DiagnosticEngine::new().run_all()
}
