//! Default pool size derived from the number of CPUs.
//!
//! ```
//! assert!(geomosaic_core::default_fetch_concurrency() >= 3);
//! ```

/// Concurrent image requests when none are configured: 3× the CPU count, since fetching mostly
/// waits on the network.
pub fn default_fetch_concurrency() -> usize {
	num_cpus::get().max(1) * 3
}
