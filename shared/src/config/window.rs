//! Plausible-date window used to disambiguate bare integer timestamps.
//!
//! A numeric timestamp string carries no unit. The classifier accepts it as Unix
//! seconds when it lands inside this window, and as Unix milliseconds when it lands
//! inside the same window scaled by 1000.

use serde::{Deserialize, Serialize};

/// 2025-01-01T00:00:00Z in Unix seconds.
pub const DEFAULT_WINDOW_START_SECS: i64 = 1_735_689_600;

/// 2100-12-31T23:59:59Z in Unix seconds.
pub const DEFAULT_WINDOW_END_SECS: i64 = 4_133_980_799;

/// An inclusive calendar range expressed in Unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlausibleWindow {
    /// First accepted instant (inclusive).
    pub start_secs: i64,
    /// Last accepted instant (inclusive).
    pub end_secs: i64,
}

impl PlausibleWindow {
    /// Creates a new window.
    ///
    /// # Examples
    ///
    /// ```
    /// use shared::config::PlausibleWindow;
    ///
    /// let window = PlausibleWindow::new(0, 100);
    /// assert!(window.contains_secs(100));
    /// assert!(!window.contains_secs(101));
    /// ```
    #[must_use]
    pub fn new(start_secs: i64, end_secs: i64) -> Self {
        Self {
            start_secs,
            end_secs,
        }
    }

    /// Returns true if `value` read as Unix seconds falls inside the window.
    #[must_use]
    pub fn contains_secs(&self, value: i64) -> bool {
        (self.start_secs..=self.end_secs).contains(&value)
    }

    /// Returns true if `value` read as Unix milliseconds falls inside the window.
    ///
    /// The bounds are scaled by 1000, so the last accepted millisecond value is
    /// `end_secs * 1000`, not `end_secs * 1000 + 999`.
    #[must_use]
    pub fn contains_millis(&self, value: i64) -> bool {
        let start = self.start_secs.saturating_mul(1000);
        let end = self.end_secs.saturating_mul(1000);
        (start..=end).contains(&value)
    }

    /// Validates the window.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The start is negative
    /// - The start is after the end
    pub fn validate(&self) -> Result<(), String> {
        if self.start_secs < 0 {
            return Err("Window start cannot be negative".to_string());
        }
        if self.start_secs > self.end_secs {
            return Err("Window start must not be after window end".to_string());
        }
        Ok(())
    }
}

impl Default for PlausibleWindow {
    /// Returns the 2025-01-01 through 2100-12-31 window.
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_START_SECS, DEFAULT_WINDOW_END_SECS)
    }
}
