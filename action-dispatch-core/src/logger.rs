//! Action type filtering for [`LoggingMiddleware`](crate::LoggingMiddleware)
//!
//! # Example
//!
//! ```
//! use action_dispatch_core::{ActionLoggerConfig, LoggingMiddleware};
//!
//! // Log everything under `user/` except the noisy request actions
//! let filter = ActionLoggerConfig::new(Some("user/*"), Some("*/request"));
//! let middleware = LoggingMiddleware::verbose().with_filter(filter);
//! assert!(middleware.filter.should_log("user/fetch/success"));
//! assert!(!middleware.filter.should_log("user/fetch/request"));
//! ```

/// Configuration for action logging with glob pattern filtering.
///
/// Patterns support:
/// - `*` matches any sequence of characters
/// - `?` matches any single character
/// - Literal text matches exactly
///
/// # Examples
///
/// - `post/*` matches post/add, post/fetch/request, etc.
/// - `*/failure` matches every async failure type
/// - `heartbeat` matches only heartbeat
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionLoggerConfig {
    /// If non-empty, only log actions matching these patterns
    pub include_patterns: Vec<String>,
    /// Exclude actions matching these patterns (applied after include)
    pub exclude_patterns: Vec<String>,
}

impl ActionLoggerConfig {
    /// Create a new config from comma-separated pattern strings
    ///
    /// # Arguments
    /// - `include`: comma-separated glob patterns (or None for all)
    /// - `exclude`: comma-separated glob patterns (or None for no excludes)
    ///
    /// # Example
    /// ```
    /// use action_dispatch_core::ActionLoggerConfig;
    ///
    /// let config = ActionLoggerConfig::new(Some("post/*, heartbeat"), Some("*/request"));
    /// assert!(config.should_log("post/add"));
    /// assert!(config.should_log("heartbeat"));
    /// assert!(!config.should_log("post/fetch/request"));
    /// ```
    pub fn new(include: Option<&str>, exclude: Option<&str>) -> Self {
        Self {
            include_patterns: include.map(split_patterns).unwrap_or_default(),
            exclude_patterns: exclude.map(split_patterns).unwrap_or_default(),
        }
    }

    /// Create a config with specific pattern vectors
    pub fn with_patterns(include: Vec<String>, exclude: Vec<String>) -> Self {
        Self {
            include_patterns: include,
            exclude_patterns: exclude,
        }
    }

    /// Check if an action type should be logged based on include/exclude patterns
    pub fn should_log(&self, action_type: &str) -> bool {
        if !self.include_patterns.is_empty()
            && !self
                .include_patterns
                .iter()
                .any(|p| glob_match(p, action_type))
        {
            return false;
        }

        !self
            .exclude_patterns
            .iter()
            .any(|p| glob_match(p, action_type))
    }
}

fn split_patterns(patterns: &str) -> Vec<String> {
    patterns
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Simple glob pattern matching supporting `*` and `?`.
///
/// - `*` matches zero or more characters
/// - `?` matches exactly one character
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    let (mut pi, mut ti) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while ti < text.len() {
        match pattern.get(pi) {
            Some(&'*') => {
                backtrack = Some((pi, ti));
                pi += 1;
            }
            Some(&c) if c == '?' || c == text[ti] => {
                pi += 1;
                ti += 1;
            }
            _ => match backtrack {
                // let the last star swallow one more character
                Some((star, matched)) => {
                    backtrack = Some((star, matched + 1));
                    pi = star + 1;
                    ti = matched + 1;
                }
                None => return false,
            },
        }
    }

    pattern[pi..].iter().all(|&c| c == '*')
}
