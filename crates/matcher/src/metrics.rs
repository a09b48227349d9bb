// Scan observers for the `matcher` crate.
//
// A process installs one `ScanMetrics` with [`set_scan_metrics`]. Every
// `PageScanner` lookup then reports its strategy, latency and page work, and
// each page that fails to decode is reported as it is skipped.
use std::sync::{Arc, RwLock};
use std::time::Duration;

use once_cell::sync::OnceCell;

use crate::types::{PageDecodeError, StrategyKind};

/// Observer for page scans.
pub trait ScanMetrics: Send + Sync {
    /// Record one finished lookup.
    ///
    /// `pages_decoded` counts pages whose fragments were indexed,
    /// `failed_pages` counts pages skipped because decoding failed, and
    /// `superseded` is set when a newer selection stopped the lookup early
    /// (in which case `found` is always `false`).
    fn record_scan(
        &self,
        strategy: StrategyKind,
        latency: Duration,
        pages_decoded: u32,
        failed_pages: usize,
        found: bool,
        superseded: bool,
    );

    /// Record a page skipped because its fragments could not be extracted.
    fn record_page_failure(&self, strategy: StrategyKind, error: &PageDecodeError) {
        let _ = (strategy, error);
    }
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn ScanMetrics>>> {
    static METRICS: OnceCell<RwLock<Option<Arc<dyn ScanMetrics>>>> = OnceCell::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

pub(crate) fn metrics_recorder() -> Option<Arc<dyn ScanMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

/// Install or clear the process-wide scan observer.
pub fn set_scan_metrics(recorder: Option<Arc<dyn ScanMetrics>>) {
    let mut guard = metrics_lock()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}
