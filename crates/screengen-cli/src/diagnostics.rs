use std::backtrace::Backtrace;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, Once, PoisonError};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, anyhow};
use screengen_app::DiagnosticsSink;
use screengen_core::time::now_utc_rfc3339;

/// One `<epoch-ms>.log` file. Entries are stamped with the milliseconds
/// elapsed since the log was opened.
struct DiagnosticsLog {
    path: PathBuf,
    started: Instant,
    file: Mutex<File>,
}

impl DiagnosticsLog {
    fn create_in(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create diagnostics directory {}", dir.display()))?;

        let path = dir.join(format!("{}.log", epoch_millis()));
        let mut file = OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(&path)
            .with_context(|| format!("failed to create diagnostics log at {}", path.display()))?;

        let started_at = now_utc_rfc3339().unwrap_or_else(|_| "unavailable".to_string());
        let argv: Vec<String> = std::env::args().collect();
        write!(
            file,
            "screengen {} diagnostics\nstarted={started_at}\npid={}\nargv={argv:?}\n",
            env!("CARGO_PKG_VERSION"),
            std::process::id(),
        )
        .and_then(|()| file.flush())
        .with_context(|| format!("failed to write diagnostics header to {}", path.display()))?;

        Ok(Self {
            path,
            started: Instant::now(),
            file: Mutex::new(file),
        })
    }

    fn append(&self, entry: &str) {
        let elapsed = self.started.elapsed().as_millis();
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writeln!(file, "[+{elapsed}ms] {entry}");
        let _ = file.flush();
    }
}

/// The log the panic hook writes to, if diagnostics are on.
static ACTIVE_LOG: Mutex<Option<Arc<DiagnosticsLog>>> = Mutex::new(None);
static PANIC_HOOK: Once = Once::new();

fn set_active_log(log: Option<Arc<DiagnosticsLog>>) {
    *ACTIVE_LOG.lock().unwrap_or_else(PoisonError::into_inner) = log;
}

fn active_log() -> Option<Arc<DiagnosticsLog>> {
    ACTIVE_LOG
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

pub struct DiagnosticsSession {
    log: Option<Arc<DiagnosticsLog>>,
}

impl DiagnosticsSession {
    /// Installs the panic hook and, when `enabled`, opens a new log under
    /// the config directory's `diagnostics/` folder.
    pub fn initialize(enabled: bool) -> Result<Self> {
        install_panic_hook();
        let log = if enabled {
            Some(Arc::new(DiagnosticsLog::create_in(&diagnostics_dir()?)?))
        } else {
            None
        };
        set_active_log(log.clone());
        Ok(Self { log })
    }

    pub fn path(&self) -> Option<&Path> {
        self.log.as_deref().map(|log| log.path.as_path())
    }

    pub fn record<S: AsRef<str>>(&self, entry: S) {
        if let Some(log) = &self.log {
            log.append(entry.as_ref());
        }
    }
}

impl DiagnosticsSink for DiagnosticsSession {
    fn record(&self, entry: &str) {
        DiagnosticsSession::record(self, entry);
    }
}

fn diagnostics_dir() -> Result<PathBuf> {
    let config_path = screengen_core::config::resolve_config_path()
        .context("failed to resolve screengen config path for diagnostics")?;
    config_path
        .parent()
        .map(|dir| dir.join("diagnostics"))
        .ok_or_else(|| {
            anyhow!(
                "config path {} has no parent directory for diagnostics",
                config_path.display()
            )
        })
}

fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let log = active_log();
            if let Some(log) = &log {
                let location = info
                    .location()
                    .map(|at| format!("{}:{}", at.file(), at.line()))
                    .unwrap_or_else(|| "unknown".to_string());
                log.append(&format!("panic at {location}: {}", panic_message(info)));
                log.append(&format!("backtrace:\n{}", Backtrace::force_capture()));
            }

            eprintln!("screengen hit an internal error: {}", panic_message(info));
            match log {
                Some(log) => eprintln!("Details were written to {}", log.path.display()),
                None => eprintln!("Rerun with --diagnostics to capture a log."),
            }
        }));
    });
}

fn panic_message(info: &std::panic::PanicHookInfo<'_>) -> String {
    let payload = info.payload();
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string())
}

fn epoch_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}
