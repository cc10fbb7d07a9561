//! Environment health checks.
//!
//! Seven fixed checks, always run, always reported, in a stable order.
//! Checks never depend on each other: a DNS failure does not short-circuit
//! the connectivity probe, and a probe blowing up degrades to a failed
//! check with a message rather than aborting the run.

use serde::Serialize;
use std::net::ToSocketAddrs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::paths;
use crate::registry;
use crate::scanner;

/// Shader caches at or above this size are flagged for cleaning.
pub const SHADER_CACHE_WARN_BYTES: u64 = 300 * 1024 * 1024;

/// Temp folders at or above this size are flagged for cleaning.
pub const TEMP_WARN_BYTES: u64 = 500 * 1024 * 1024;

/// Minimum free space on the system drive before we warn.
pub const DISK_FREE_MIN_BYTES: u64 = 10 * 1024 * 1024 * 1024;

/// More crash logs than this suggests a recurring problem.
pub const CRASH_LOG_WARN_COUNT: usize = 20;

/// Hostname used for the DNS resolution check.
pub const DNS_PROBE_HOST: &str = "google.com";

/// URL used for the connectivity check.
pub const CONNECTIVITY_URL: &str = "https://google.com";

/// Upper bound on the connectivity probe.
pub const CONNECTIVITY_TIMEOUT: Duration = Duration::from_secs(4);

/// One health probe result. `status: true` means healthy; the message is
/// always present, whichever way the check went.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticCheck {
    pub name: String,
    pub status: bool,
    pub message: String,
}

/// The full battery, in fixed check order.
#[derive(Debug, Serialize)]
pub struct DiagnosticReport {
    pub checks: Vec<DiagnosticCheck>,
}

impl DiagnosticReport {
    pub fn get(&self, name: &str) -> Option<&DiagnosticCheck> {
        self.checks.iter().find(|c| c.name == name)
    }

    pub fn all_healthy(&self) -> bool {
        self.checks.iter().all(|c| c.status)
    }

    pub fn failed_count(&self) -> usize {
        self.checks.iter().filter(|c| !c.status).count()
    }
}

/// Network and disk probes, separated out so tests can swap in
/// deterministic stubs.
pub trait Probe: Send + Sync {
    fn resolve_dns(&self, host: &str) -> bool;
    fn http_reachable(&self, url: &str, timeout: Duration) -> bool;
    fn disk_free(&self, path: &Path) -> anyhow::Result<u64>;
}

/// The real thing: OS resolver, HTTPS GET via ureq, statvfs.
pub struct SystemProbe;

impl Probe for SystemProbe {
    fn resolve_dns(&self, host: &str) -> bool {
        (host, 443)
            .to_socket_addrs()
            .map(|mut addrs| addrs.next().is_some())
            .unwrap_or(false)
    }

    fn http_reachable(&self, url: &str, timeout: Duration) -> bool {
        // Any HTTP response proves reachability; only transport-level
        // failures and timeouts count against us.
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .new_agent();
        agent.get(url).call().is_ok()
    }

    #[cfg(unix)]
    #[allow(unsafe_code)]
    fn disk_free(&self, path: &Path) -> anyhow::Result<u64> {
        use anyhow::Context;
        use std::ffi::CString;
        use std::mem::MaybeUninit;

        let c_path = CString::new(path.to_string_lossy().as_bytes()).context("Invalid path")?;

        // SAFETY: statvfs is a standard POSIX call
        unsafe {
            let mut stat: MaybeUninit<libc::statvfs> = MaybeUninit::uninit();
            if libc::statvfs(c_path.as_ptr(), stat.as_mut_ptr()) != 0 {
                anyhow::bail!("statvfs failed for {}", path.display());
            }
            let stat = stat.assume_init();
            Ok(u64::from(stat.f_bavail) * stat.f_frsize)
        }
    }

    #[cfg(not(unix))]
    fn disk_free(&self, _path: &Path) -> anyhow::Result<u64> {
        anyhow::bail!("Disk space detection not supported on this platform")
    }
}

/// Runs the check battery against a set of filesystem locations and a probe.
///
/// [`DiagnosticEngine::new`] wires in the registry paths and the system
/// probe; tests point the fields at temp directories and a stub.
pub struct DiagnosticEngine {
    pub fivem_root: PathBuf,
    pub shader_dir: PathBuf,
    pub temp_dir: PathBuf,
    pub crash_log_dir: PathBuf,
    pub system_drive: PathBuf,
    pub probe: Box<dyn Probe>,
}

impl DiagnosticEngine {
    pub fn new() -> Self {
        Self {
            fivem_root: paths::resolve(registry::FIVEM_ROOT_TEMPLATE),
            shader_dir: paths::resolve(registry::SHADER_CACHE_TEMPLATE),
            temp_dir: paths::resolve(registry::TEMP_TEMPLATE),
            crash_log_dir: paths::resolve(registry::CRASH_LOG_TEMPLATE),
            system_drive: system_drive(),
            probe: Box::new(SystemProbe),
        }
    }

    /// Run all seven checks. Infallible by contract: every check appears in
    /// the report no matter what the machine looks like.
    pub fn run_all(&self) -> DiagnosticReport {
        let mut checks = Vec::with_capacity(7);

        checks.push(named("FiveM Installation", self.check_installation()));
        checks.push(named("GTA Shader Cache", self.check_shader_cache()));
        checks.push(named("Windows Temp Folder", self.check_temp_size()));
        checks.push(named("DNS Resolution", self.check_dns()));
        checks.push(named("Internet Connectivity", self.check_connectivity()));
        checks.push(named("Disk Space", self.check_disk_space()));
        checks.push(named("FiveM Crash Logs", self.check_crash_logs()));

        for check in &checks {
            log::info!(
                "{}: {} - {}",
                check.name,
                if check.status { "ok" } else { "fail" },
                check.message
            );
        }

        DiagnosticReport { checks }
    }

    fn check_installation(&self) -> (bool, String) {
        classify_installation(self.fivem_root.exists())
    }

    fn check_shader_cache(&self) -> (bool, String) {
        let (size, found) = scanner::scan_size(&self.shader_dir);
        classify_shader_cache(found, size)
    }

    fn check_temp_size(&self) -> (bool, String) {
        // A missing temp root scans as size 0; absence is not its own
        // failure mode for this check.
        let (size, _) = scanner::scan_size(&self.temp_dir);
        classify_temp(size)
    }

    fn check_dns(&self) -> (bool, String) {
        if self.probe.resolve_dns(DNS_PROBE_HOST) {
            (true, "DNS resolution working normally.".to_string())
        } else {
            (
                false,
                "DNS resolution failed. Check your network adapter settings.".to_string(),
            )
        }
    }

    fn check_connectivity(&self) -> (bool, String) {
        if self
            .probe
            .http_reachable(CONNECTIVITY_URL, CONNECTIVITY_TIMEOUT)
        {
            (true, "Internet connection looks good.".to_string())
        } else {
            (
                false,
                "Cannot reach the internet. Check your network.".to_string(),
            )
        }
    }

    fn check_disk_space(&self) -> (bool, String) {
        classify_disk_free(self.probe.disk_free(&self.system_drive).ok())
    }

    fn check_crash_logs(&self) -> (bool, String) {
        let count = std::fs::read_dir(&self.crash_log_dir)
            .map(|entries| entries.count())
            .unwrap_or(0);
        classify_crash_logs(count)
    }
}

impl Default for DiagnosticEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn named(name: &str, (status, message): (bool, String)) -> DiagnosticCheck {
    DiagnosticCheck {
        name: name.to_string(),
        status,
        message,
    }
}

#[cfg(windows)]
fn system_drive() -> PathBuf {
    std::env::var("SystemDrive")
        .map(|d| PathBuf::from(format!("{d}\\")))
        .unwrap_or_else(|_| PathBuf::from("C:\\"))
}

#[cfg(not(windows))]
fn system_drive() -> PathBuf {
    PathBuf::from("/")
}

// ============================================================================
// Classification
// ============================================================================

fn mib(bytes: u64) -> f64 {
    bytes as f64 / 1024.0 / 1024.0
}

fn gib(bytes: u64) -> f64 {
    bytes as f64 / 1024.0 / 1024.0 / 1024.0
}

fn classify_installation(exists: bool) -> (bool, String) {
    if exists {
        (true, "FiveM installation folder located.".to_string())
    } else {
        (
            false,
            "FiveM folder not found. Please ensure FiveM is installed.".to_string(),
        )
    }
}

fn classify_shader_cache(found: bool, size: u64) -> (bool, String) {
    if !found {
        return (
            false,
            "Shader folder missing. GTA V may not be installed correctly.".to_string(),
        );
    }
    if size >= SHADER_CACHE_WARN_BYTES {
        (
            false,
            format!(
                "Shader cache too large ({:.1} MB). Cleaning recommended.",
                mib(size)
            ),
        )
    } else {
        (true, "Shader cache healthy.".to_string())
    }
}

fn classify_temp(size: u64) -> (bool, String) {
    if size >= TEMP_WARN_BYTES {
        (
            false,
            format!(
                "Temp folder very large ({:.1} MB). Cleaning recommended.",
                mib(size)
            ),
        )
    } else {
        (true, format!("Temp folder size OK ({:.1} MB).", mib(size)))
    }
}

fn classify_disk_free(free: Option<u64>) -> (bool, String) {
    match free {
        Some(free) if free >= DISK_FREE_MIN_BYTES => {
            (true, format!("Free space OK ({:.1} GB free).", gib(free)))
        }
        Some(free) => (
            false,
            format!(
                "Low disk space ({:.1} GB free). Clean-up recommended.",
                gib(free)
            ),
        ),
        None => (false, "Unable to check disk space.".to_string()),
    }
}

fn classify_crash_logs(count: usize) -> (bool, String) {
    if count > CRASH_LOG_WARN_COUNT {
        (
            false,
            format!("High number of crash logs ({count}). Consider clearing them."),
        )
    } else {
        (true, format!("Crash log count OK ({count} files)."))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Probe with canned answers.
    struct StubProbe {
        dns: bool,
        http: bool,
        free: Option<u64>,
    }

    impl Probe for StubProbe {
        fn resolve_dns(&self, _host: &str) -> bool {
            self.dns
        }

        fn http_reachable(&self, _url: &str, _timeout: Duration) -> bool {
            self.http
        }

        fn disk_free(&self, _path: &Path) -> anyhow::Result<u64> {
            self.free.ok_or_else(|| anyhow::anyhow!("probe failure"))
        }
    }

    fn engine_in(temp: &TempDir, probe: StubProbe) -> DiagnosticEngine {
        DiagnosticEngine {
            fivem_root: temp.path().join("FiveM.app"),
            shader_dir: temp.path().join("Shaders"),
            temp_dir: temp.path().join("Temp"),
            crash_log_dir: temp.path().join("crashes"),
            system_drive: temp.path().to_path_buf(),
            probe: Box::new(probe),
        }
    }

    const CHECK_NAMES: [&str; 7] = [
        "FiveM Installation",
        "GTA Shader Cache",
        "Windows Temp Folder",
        "DNS Resolution",
        "Internet Connectivity",
        "Disk Space",
        "FiveM Crash Logs",
    ];

    #[test]
    fn test_report_is_always_complete() {
        // Everything missing, every probe failing: still seven checks,
        // every one with a message.
        let temp = TempDir::new().unwrap();
        let engine = engine_in(
            &temp,
            StubProbe {
                dns: false,
                http: false,
                free: None,
            },
        );

        let report = engine.run_all();
        let names: Vec<&str> = report.checks.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, CHECK_NAMES);
        for check in &report.checks {
            assert!(!check.message.is_empty(), "{} has no message", check.name);
        }
    }

    #[test]
    fn test_healthy_environment() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("FiveM.app")).unwrap();
        fs::create_dir_all(temp.path().join("Shaders")).unwrap();
        fs::create_dir_all(temp.path().join("Temp")).unwrap();
        fs::create_dir_all(temp.path().join("crashes")).unwrap();

        let engine = engine_in(
            &temp,
            StubProbe {
                dns: true,
                http: true,
                free: Some(50 * 1024 * 1024 * 1024),
            },
        );

        let report = engine.run_all();
        assert!(report.all_healthy(), "{report:?}");
        assert_eq!(report.failed_count(), 0);
    }

    #[test]
    fn test_missing_shader_folder_reports_missing_not_large() {
        let temp = TempDir::new().unwrap();
        let engine = engine_in(
            &temp,
            StubProbe {
                dns: true,
                http: true,
                free: Some(DISK_FREE_MIN_BYTES),
            },
        );

        let report = engine.run_all();
        let shader = report.get("GTA Shader Cache").unwrap();
        assert!(!shader.status);
        assert!(shader.message.contains("missing"), "{}", shader.message);
        assert!(!shader.message.contains("too large"));
    }

    #[test]
    fn test_dns_and_connectivity_are_independent() {
        // DNS resolves but the HTTPS probe times out.
        let temp = TempDir::new().unwrap();
        let engine = engine_in(
            &temp,
            StubProbe {
                dns: true,
                http: false,
                free: Some(DISK_FREE_MIN_BYTES),
            },
        );

        let report = engine.run_all();
        assert!(report.get("DNS Resolution").unwrap().status);
        assert!(!report.get("Internet Connectivity").unwrap().status);
    }

    #[test]
    fn test_missing_crash_folder_is_healthy() {
        let temp = TempDir::new().unwrap();
        let engine = engine_in(
            &temp,
            StubProbe {
                dns: true,
                http: true,
                free: Some(DISK_FREE_MIN_BYTES),
            },
        );

        let report = engine.run_all();
        let logs = report.get("FiveM Crash Logs").unwrap();
        assert!(logs.status);
        assert!(logs.message.contains("0 files"));
    }

    #[test]
    fn test_shader_threshold_boundary() {
        let (ok, _) = classify_shader_cache(true, SHADER_CACHE_WARN_BYTES - 1);
        assert!(ok);
        let (ok, msg) = classify_shader_cache(true, SHADER_CACHE_WARN_BYTES);
        assert!(!ok);
        assert!(msg.contains("too large"));
    }

    #[test]
    fn test_temp_threshold_boundary() {
        assert!(classify_temp(TEMP_WARN_BYTES - 1).0);
        assert!(!classify_temp(TEMP_WARN_BYTES).0);
    }

    #[test]
    fn test_disk_free_boundary() {
        assert!(classify_disk_free(Some(DISK_FREE_MIN_BYTES)).0);
        assert!(!classify_disk_free(Some(DISK_FREE_MIN_BYTES - 1)).0);
        let (ok, msg) = classify_disk_free(None);
        assert!(!ok);
        assert_eq!(msg, "Unable to check disk space.");
    }

    #[test]
    fn test_crash_log_boundary() {
        assert!(classify_crash_logs(CRASH_LOG_WARN_COUNT).0);
        let (ok, msg) = classify_crash_logs(CRASH_LOG_WARN_COUNT + 1);
        assert!(!ok);
        assert!(msg.contains("21"));
    }

    #[test]
    fn test_crash_log_count_from_directory() {
        let temp = TempDir::new().unwrap();
        let crashes = temp.path().join("crashes");
        fs::create_dir_all(&crashes).unwrap();
        for i in 0..21 {
            fs::write(crashes.join(format!("crash-{i}.dmp")), b"x").unwrap();
        }

        let engine = engine_in(
            &temp,
            StubProbe {
                dns: true,
                http: true,
                free: Some(DISK_FREE_MIN_BYTES),
            },
        );
        let report = engine.run_all();
        assert!(!report.get("FiveM Crash Logs").unwrap().status);
    }

    #[test]
    fn test_oversized_temp_reports_measured_size() {
        let (ok, msg) = classify_temp(600 * 1024 * 1024);
        assert!(!ok);
        assert!(msg.contains("600.0 MB"), "{msg}");
    }
}
