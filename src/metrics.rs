//! Per-move search metrics and best-effort allocation tracking
//!
//! Binaries install [`TrackingAllocator`] as the global allocator so that
//! [`MemoryProbe`] can report the peak heap growth seen while a root candidate
//! is searched. Without it every probe reads zero. The counters are process
//! wide, so figures taken while several searches run at once are approximate.

use serde::{Deserialize, Serialize};
use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::types::{GameOutcome, Position, PruningMode};

static ALLOCATED_BYTES: AtomicUsize = AtomicUsize::new(0);
static PEAK_BYTES: AtomicUsize = AtomicUsize::new(0);

/// System allocator wrapper that keeps live and peak byte counts
pub struct TrackingAllocator;

// SAFETY: every call forwards unchanged to `System` with the caller's layout;
// the wrapper only updates atomic counters and never touches the memory.
unsafe impl GlobalAlloc for TrackingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        // SAFETY: the caller upholds `GlobalAlloc::alloc`'s contract for `layout`
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            let now = ALLOCATED_BYTES.fetch_add(layout.size(), Ordering::Relaxed) + layout.size();
            PEAK_BYTES.fetch_max(now, Ordering::Relaxed);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        // SAFETY: `ptr` came from `alloc` above, which got it from `System`
        System.dealloc(ptr, layout);
        ALLOCATED_BYTES.fetch_sub(layout.size(), Ordering::Relaxed);
    }
}

/// Samples peak heap growth from the moment it was started
pub struct MemoryProbe {
    baseline: usize,
}

impl MemoryProbe {
    pub fn start() -> Self {
        let baseline = ALLOCATED_BYTES.load(Ordering::Relaxed);
        PEAK_BYTES.store(baseline, Ordering::Relaxed);
        MemoryProbe { baseline }
    }

    /// Peak bytes allocated above the baseline, in KiB
    pub fn peak_kb(&self) -> f64 {
        PEAK_BYTES
            .load(Ordering::Relaxed)
            .saturating_sub(self.baseline) as f64
            / 1024.0
    }
}

/// One record per root candidate evaluated during a computer turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveMetric {
    pub session_id: String,
    pub board_size: usize,
    pub pruning_mode: PruningMode,
    #[serde(rename = "move")]
    pub position: Position,
    pub score: i32,
    pub time_taken_ms: f64,
    pub memory_used_kb: f64,
    pub nodes: u64,
    pub cutoffs: u64,
    pub timed_out: bool,
    /// Outcome code, set once the game ends
    pub result: Option<u8>,
}

impl MoveMetric {
    pub fn finalize(&mut self, outcome: GameOutcome) {
        self.result = Some(outcome.code());
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.result.and_then(GameOutcome::from_code)
    }
}

pub fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}
