//! The fixed catalog of cleanable locations.
//!
//! Every location fivekit will ever scan or delete is declared here, once,
//! at process start. The cleaner only accepts targets from this registry,
//! which is what keeps a stray path from ever widening a delete.

use serde::Serialize;
use std::sync::OnceLock;

/// Template for the FiveM application root, shared by several targets and
/// by the installation diagnostic.
pub const FIVEM_ROOT_TEMPLATE: &str = "${LOCALAPPDATA}/FiveM/FiveM.app";

/// Template for the GTA V shader cache folder.
pub const SHADER_CACHE_TEMPLATE: &str = "${LOCALAPPDATA}/Rockstar Games/GTA V/Shaders";

/// Template for the Windows temp root.
pub const TEMP_TEMPLATE: &str = "${TEMP}";

/// Template for the FiveM crash log folder.
pub const CRASH_LOG_TEMPLATE: &str = "${LOCALAPPDATA}/FiveM/FiveM.app/crashes";

/// A named filesystem location subject to scanning and cleaning.
#[derive(Debug, Clone, Serialize)]
pub struct CacheTarget {
    /// Display label, unique within the registry.
    pub label: String,
    /// Path template with environment placeholders, resolved per run.
    pub template: String,
    /// Recreate the root directory empty after cleaning. The OS keeps
    /// writing into the temp root, and GTA V expects its shader folder to
    /// exist, so deleting those outright would break the next run.
    pub recreate_root: bool,
}

impl CacheTarget {
    fn new(label: &str, template: &str, recreate_root: bool) -> Self {
        Self {
            label: label.to_string(),
            template: template.to_string(),
            recreate_root,
        }
    }
}

/// The registry, in display order. Built once, immutable afterwards.
pub fn targets() -> &'static [CacheTarget] {
    static TARGETS: OnceLock<Vec<CacheTarget>> = OnceLock::new();
    TARGETS.get_or_init(|| {
        vec![
            CacheTarget::new("FiveM Cache", "${LOCALAPPDATA}/FiveM/FiveM.app/data/cache", false),
            CacheTarget::new(
                "FiveM NUI Storage",
                "${LOCALAPPDATA}/FiveM/FiveM.app/data/nui-storage",
                false,
            ),
            CacheTarget::new(
                "FiveM Server Cache",
                "${LOCALAPPDATA}/FiveM/FiveM.app/data/server-cache",
                false,
            ),
            CacheTarget::new("FiveM Logs", "${LOCALAPPDATA}/FiveM/FiveM.app/logs", false),
            CacheTarget::new("FiveM Crashes", CRASH_LOG_TEMPLATE, false),
            CacheTarget::new(
                "FiveM Crash Reports",
                "${LOCALAPPDATA}/FiveM/FiveM.app/crash-reports",
                false,
            ),
            CacheTarget::new("GTA V Shader Cache", SHADER_CACHE_TEMPLATE, true),
            CacheTarget::new("Windows Temp", TEMP_TEMPLATE, true),
        ]
    })
}

/// Look up a target by its label.
pub fn lookup(label: &str) -> Option<&'static CacheTarget> {
    targets().iter().find(|t| t.label == label)
}

// ============================================================================
// Tests
// ============================================================================
