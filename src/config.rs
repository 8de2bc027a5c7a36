//! Screen configuration.
//!
//! ```toml
//! title = "MentaliTTY"
//! smartCSR = true
//! escape_timeout_ms = 10
//! tick_ms = 50
//! idle_timeout_ms = 30000
//! ```

use std::time::Duration;

use serde::Deserialize;

use crate::error::Result;

/// Options for [`Screen::new`](crate::screen::Screen::new).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScreenOptions {
    /// Window title, sent when the terminal is entered.
    pub title: Option<String>,
    /// Diff against the previous frame (true) or redraw everything on
    /// every render (false).
    #[serde(alias = "smartCSR")]
    pub smart_csr: bool,
    /// How long a lone ESC waits for the rest of a sequence.
    pub escape_timeout_ms: u64,
    /// Run loop wakeup interval; the terminal size is re-queried on each.
    pub tick_ms: u64,
    /// Exit with code 0 after this long without input.
    pub idle_timeout_ms: Option<u64>,
}

impl Default for ScreenOptions {
    fn default() -> Self {
        Self {
            title: None,
            smart_csr: true,
            escape_timeout_ms: 10,
            tick_ms: 50,
            idle_timeout_ms: None,
        }
    }
}

impl ScreenOptions {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn escape_timeout(&self) -> Duration {
        Duration::from_millis(self.escape_timeout_ms)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }

    pub fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ScreenOptions::default();
        assert!(options.smart_csr);
        assert_eq!(options.escape_timeout(), Duration::from_millis(10));
        assert_eq!(options.idle_timeout(), None);
    }

    #[test]
    fn test_from_toml_with_alias() {
        let options = ScreenOptions::from_toml_str(
            r#"
            title = "MentaliTTY"
            smartCSR = false
            idle_timeout_ms = 500
            "#,
        )
        .unwrap();
        assert_eq!(options.title.as_deref(), Some("MentaliTTY"));
        assert!(!options.smart_csr);
        assert_eq!(options.tick_ms, 50);
        assert_eq!(options.idle_timeout(), Some(Duration::from_millis(500)));
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(ScreenOptions::from_toml_str("fullUnicode = true").is_err());
    }

    #[test]
    fn test_zero_tick_clamped() {
        let options = ScreenOptions {
            tick_ms: 0,
            ..Default::default()
        };
        assert_eq!(options.tick(), Duration::from_millis(1));
    }
}
