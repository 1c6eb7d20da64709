/// Configuration options for a parse
///
/// # Example
///
/// ```rust
/// use parslets::ParseConfig;
///
/// // Use default configuration
/// let config = ParseConfig::default();
/// assert!(config.memoize);
///
/// // Or customize it
/// let config = ParseConfig::default().with_memoize(false).with_max_depth(256);
/// assert_eq!(config.max_depth, 256);
/// ```
#[derive(Debug, Clone)]
pub struct ParseConfig {
    /// Enable memoization (packrat parsing)
    ///
    /// Outcomes are cached per parslet, position and skipping override, so
    /// repeated attempts at the same position replay the stored outcome.
    /// Unless a parse reaches `max_depth`, turning this off never changes
    /// the result, only the running time.
    pub memoize: bool,

    /// Maximum nesting of parslet invocations
    ///
    /// Exceeding it fails the current attempt with
    /// [`ParseErrorKind::DepthExceeded`](crate::ParseErrorKind::DepthExceeded)
    /// instead of exhausting the stack. This bounds indirect left recursion,
    /// which the single-slot recursion marker cannot detect.
    ///
    /// The cutoff itself is not memoized, but outcomes of enclosing
    /// parslets that depended on it are.
    pub max_depth: usize,

    /// Collect [`ParseStats`](crate::ParseStats)
    pub collect_stats: bool,

    /// Deliver [`ParseEvent`](crate::ParseEvent)s to the event handler
    pub trace_events: bool,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            memoize: true,
            max_depth: 1024,
            collect_stats: true,
            trace_events: false,
        }
    }
}

impl ParseConfig {
    #[must_use]
    pub const fn with_memoize(mut self, memoize: bool) -> Self {
        self.memoize = memoize;
        self
    }

    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub const fn with_trace_events(mut self, trace_events: bool) -> Self {
        self.trace_events = trace_events;
        self
    }

    #[must_use]
    pub const fn with_collect_stats(mut self, collect_stats: bool) -> Self {
        self.collect_stats = collect_stats;
        self
    }
}
