#[cfg(feature = "cli")]
use std::sync::atomic::{AtomicU64, Ordering};
#[cfg(feature = "cli")]
use std::sync::Mutex;
#[cfg(feature = "cli")]
use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

/// Process usage at one point of a run.
#[cfg(feature = "cli")]
#[derive(Debug, Clone)]
pub struct ResourceSnapshot {
    pub cpu_percent: f32,
    pub memory_mb: u64,
    pub peak_memory_mb: u64,
    pub elapsed: Duration,
}

#[cfg(feature = "cli")]
impl ResourceSnapshot {
    /// Units handled per second since the monitor started.
    pub fn rate(&self, units: usize) -> f64 {
        let seconds = self.elapsed.as_secs_f64();
        if seconds > 0.0 {
            units as f64 / seconds
        } else {
            0.0
        }
    }
}

/// Logs process usage after each phase of a run. Disabled monitors never
/// touch the process table.
#[cfg(feature = "cli")]
pub struct RunMonitor {
    // None when disabled or the pid could not be resolved
    tracked: Option<(Mutex<System>, Pid)>,
    started: Instant,
    peak_memory_mb: AtomicU64,
}

#[cfg(feature = "cli")]
impl RunMonitor {
    pub fn new(enabled: bool) -> Self {
        let tracked = if enabled {
            match sysinfo::get_current_pid() {
                Ok(pid) => {
                    let mut system = System::new();
                    // baseline for the first cpu reading
                    system.refresh_processes_specifics(
                        ProcessesToUpdate::Some(&[pid]),
                        true,
                        ProcessRefreshKind::everything(),
                    );
                    Some((Mutex::new(system), pid))
                }
                Err(e) => {
                    tracing::warn!("Could not resolve current PID, resource logging disabled: {}", e);
                    None
                }
            }
        } else {
            None
        };

        Self {
            tracked,
            started: Instant::now(),
            peak_memory_mb: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> Option<ResourceSnapshot> {
        let (system, pid) = self.tracked.as_ref()?;
        let mut system = system.lock().ok()?;
        system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[*pid]),
            true,
            ProcessRefreshKind::everything(),
        );

        let process = system.process(*pid)?;
        let memory_mb = process.memory() / 1024 / 1024;
        let previous_peak = self.peak_memory_mb.fetch_max(memory_mb, Ordering::Relaxed);

        Some(ResourceSnapshot {
            cpu_percent: process.cpu_usage(),
            memory_mb,
            peak_memory_mb: previous_peak.max(memory_mb),
            elapsed: self.started.elapsed(),
        })
    }

    /// Logs usage after a phase along with how many `unit`s it produced.
    pub fn log_phase(&self, phase: &str, count: usize, unit: &str) {
        if let Some(snapshot) = self.snapshot() {
            tracing::info!(
                "📊 {}: {} {} - CPU: {:.1}%, Memory: {}MB, Time: {:?}",
                phase,
                count,
                unit,
                snapshot.cpu_percent,
                snapshot.memory_mb,
                snapshot.elapsed
            );
        }
    }

    pub fn log_final(&self, tickets: usize) {
        if let Some(snapshot) = self.snapshot() {
            tracing::info!(
                "📊 Run finished: {} tickets in {:?} ({:.1} tickets/s), Peak Memory: {}MB",
                tickets,
                snapshot.elapsed,
                snapshot.rate(tickets),
                snapshot.peak_memory_mb
            );
        }
    }
}

#[cfg(feature = "cli")]
impl Default for RunMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}

// library builds without the cli feature get a no-op monitor
#[cfg(not(feature = "cli"))]
#[derive(Default)]
pub struct RunMonitor;

#[cfg(not(feature = "cli"))]
impl RunMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn log_phase(&self, _phase: &str, _count: usize, _unit: &str) {}

    pub fn log_final(&self, _tickets: usize) {}
}
