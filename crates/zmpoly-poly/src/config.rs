//! Tuning parameters for strategy selection.

/// Thresholds used by the multiplication dispatcher.
///
/// The defaults favour the heap method except where a denser representation
/// is clearly cheaper.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Dense multiplication is used when the product's degree span is at most
    /// this many times `len(B) * len(C)`.
    pub dense_ratio: usize,
    /// Longest dense product, in coefficients.
    pub max_dense_len: usize,
    /// Array multiplication is used when its cell count is at most this many
    /// times `len(B) * len(C)`.
    pub array_ratio: usize,
    /// Replaces `array_ratio` when worker threads are available.
    pub array_ratio_threaded: usize,
    /// Largest number of cells in one array chunk.
    pub max_array_size: usize,
    /// Number of rows of the shorter operand per requested worker.
    pub thread_grain: usize,
    /// Upper bound on workers requested per operation.
    pub max_threads: usize,
    /// Number of heap divisions per participating thread.
    pub divisions_per_thread: usize,
    /// Ratio between the sizes of consecutive heap divisions, in `(0, 1]`.
    pub division_skew: f64,
    /// Permits the dense method.
    pub allow_dense: bool,
    /// Permits the array method.
    pub allow_array: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dense_ratio: 4,
            max_dense_len: 1 << 20,
            array_ratio: 32,
            array_ratio_threaded: 128,
            max_array_size: 300_000,
            thread_grain: 64,
            max_threads: usize::MAX,
            divisions_per_thread: 4,
            division_skew: 0.85,
            allow_dense: true,
            allow_array: true,
        }
    }
}

impl EngineConfig {
    /// A configuration that always uses the heap method.
    #[must_use]
    pub fn heap_only() -> Self {
        Self {
            allow_dense: false,
            allow_array: false,
            ..Self::default()
        }
    }

    /// Number of workers to request for operands of the given lengths.
    #[must_use]
    pub fn threads_for(&self, shorter: usize) -> usize {
        (shorter / self.thread_grain.max(1)).min(self.max_threads)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threads_for() {
        let config = EngineConfig::default();
        assert_eq!(config.threads_for(10), 0);
        assert_eq!(config.threads_for(640), 10);

        let capped = EngineConfig {
            max_threads: 3,
            ..EngineConfig::default()
        };
        assert_eq!(capped.threads_for(640), 3);
    }
}
