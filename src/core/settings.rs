//! Process-wide runtime settings: worker thread count and fast-math mode.
//!
//! Both knobs live in one static and are read/written atomically, so they can be
//! set once at startup and read by every resize/pack call without tearing.
//! Parallel kernels run inside [`install`], which keeps a rayon pool sized from
//! the current thread count and rebuilds it only when that count changes.
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Canonical value for "use every available core".
pub const ALL_THREADS: i32 = -1;

struct Runtime {
    threads: AtomicI32,
    fast_mode: AtomicBool,
}

static RUNTIME: Runtime = Runtime {
    threads: AtomicI32::new(ALL_THREADS),
    fast_mode: AtomicBool::new(false),
};

static POOL: Lazy<Mutex<Option<(usize, Arc<ThreadPool>)>>> = Lazy::new(|| Mutex::new(None));

fn available_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Sets the worker thread count. Values `<= 0` select all available cores.
pub fn set_thread_number(threads: i32) {
    let value = if threads <= 0 { ALL_THREADS } else { threads };
    RUNTIME.threads.store(value, Ordering::Release);
}

/// Effective worker thread count (always `>= 1`).
pub fn thread_number() -> usize {
    match RUNTIME.threads.load(Ordering::Acquire) {
        n if n > 0 => n as usize,
        _ => available_threads(),
    }
}

pub fn set_fast_mode(enabled: bool) {
    RUNTIME.fast_mode.store(enabled, Ordering::Release);
}

pub fn fast_mode() -> bool {
    RUNTIME.fast_mode.load(Ordering::Acquire)
}

/// Snapshot of the runtime knobs, suitable for config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeSettings {
    /// Worker threads; `-1` (or any value `<= 0`) means all cores
    pub threads: i32,
    pub fast_mode: bool,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            threads: ALL_THREADS,
            fast_mode: false,
        }
    }
}

impl RuntimeSettings {
    /// Reads the current process-wide values.
    pub fn current() -> Self {
        Self {
            threads: RUNTIME.threads.load(Ordering::Acquire),
            fast_mode: fast_mode(),
        }
    }

    /// Makes these values the process-wide settings.
    pub fn apply(&self) {
        set_thread_number(self.threads);
        set_fast_mode(self.fast_mode);
    }
}

fn pool() -> Result<Arc<ThreadPool>> {
    let threads = thread_number();
    let mut guard = POOL.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some((n, pool)) = guard.as_ref() {
        if *n == threads {
            return Ok(Arc::clone(pool));
        }
    }

    debug!("Building worker pool with {} threads", threads);
    let pool = Arc::new(
        ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("tensorprep-{}", i))
            .build()
            .map_err(Error::external)?,
    );
    *guard = Some((threads, Arc::clone(&pool)));
    Ok(pool)
}

/// Runs `op` on the worker pool configured by the current thread count.
pub fn install<R, F>(op: F) -> Result<R>
where
    F: FnOnce() -> R + Send,
    R: Send,
{
    let pool = pool()?;
    Ok(pool.install(op))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Settings are process-wide; keep all mutations in one test.
    #[test]
    fn get_set_restore() {
        let saved = RuntimeSettings::current();

        set_thread_number(-1);
        set_fast_mode(true);
        assert_eq!(thread_number(), available_threads());
        assert!(fast_mode());

        set_thread_number(0);
        assert_eq!(RuntimeSettings::current().threads, ALL_THREADS);

        set_thread_number(2);
        assert_eq!(thread_number(), 2);
        let width = install(rayon::current_num_threads).unwrap();
        assert_eq!(width, 2);

        saved.apply();
        assert_eq!(RuntimeSettings::current(), saved);
    }
}
