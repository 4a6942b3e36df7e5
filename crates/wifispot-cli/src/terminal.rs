//! Terminal styling and color utilities.
//!
//! ANSI escape codes for the result cards and route summaries, plus the
//! `NO_COLOR` / `TERM=dumb` detection that decides whether to use them.

/// ANSI escape codes for text styling and colors.
pub mod colors {
    /// Reset all styling.
    pub const RESET: &str = "\x1b[0m";

    /// Bold reverse green for route stop letters.
    pub const TAG_STOP: &str = "\x1b[1;7;32m";
    /// Bold reverse cyan for spot type badges.
    pub const TAG_TYPE: &str = "\x1b[1;7;36m";

    /// Bright bold white for spot names.
    pub const WHITE_BOLD: &str = "\x1b[1;97m";
    /// Gray for secondary details (addresses, links).
    pub const GRAY: &str = "\x1b[90m";
    /// Cyan for distances.
    pub const CYAN: &str = "\x1b[36m";
    /// Green for the selected-for-route marker.
    pub const GREEN: &str = "\x1b[32m";
    /// Yellow for hints such as "load more".
    pub const YELLOW: &str = "\x1b[33m";
}

/// Resolved color codes, either ANSI sequences or empty strings.
#[derive(Debug, Clone, Copy)]
pub struct ColorPalette {
    pub reset: &'static str,
    pub tag_stop: &'static str,
    pub tag_type: &'static str,
    pub white_bold: &'static str,
    pub gray: &'static str,
    pub cyan: &'static str,
    pub green: &'static str,
    pub yellow: &'static str,
}

impl ColorPalette {
    /// Create a palette with actual ANSI color codes.
    #[must_use]
    pub const fn colored() -> Self {
        Self {
            reset: colors::RESET,
            tag_stop: colors::TAG_STOP,
            tag_type: colors::TAG_TYPE,
            white_bold: colors::WHITE_BOLD,
            gray: colors::GRAY,
            cyan: colors::CYAN,
            green: colors::GREEN,
            yellow: colors::YELLOW,
        }
    }

    /// Create a palette with no colors (empty strings).
    #[must_use]
    pub const fn plain() -> Self {
        Self {
            reset: "",
            tag_stop: "",
            tag_type: "",
            white_bold: "",
            gray: "",
            cyan: "",
            green: "",
            yellow: "",
        }
    }

    /// `colored()` when the terminal supports ANSI colors, otherwise `plain()`.
    #[must_use]
    pub fn detect() -> Self {
        if supports_color() {
            Self::colored()
        } else {
            Self::plain()
        }
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::detect()
    }
}

/// Check if the terminal supports ANSI color codes.
///
/// Respects the `NO_COLOR` environment variable (https://no-color.org/) and
/// the `TERM=dumb` convention.
#[must_use]
pub fn supports_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if let Ok(term) = std::env::var("TERM") {
        if term.eq_ignore_ascii_case("dumb") {
            return false;
        }
    }
    true
}

/// Format a distance in miles with two decimals, e.g. `0.42 mi`.
///
/// ```
/// # use wifispot_cli::terminal::format_miles;
/// assert_eq!(format_miles(0.4166), "0.42 mi");
/// assert_eq!(format_miles(2.0), "2.00 mi");
/// ```
#[must_use]
pub fn format_miles(miles: f64) -> String {
    format!("{miles:.2} mi")
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::env;
    use std::sync::Mutex;

    /// Environment variables are process-global; serialise tests that touch them.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn with_env_vars<F, R>(vars: &[(&str, Option<&str>)], f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let saved: Vec<_> = vars.iter().map(|(k, _)| (*k, env::var_os(k))).collect();

        for (key, value) in vars {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }

        let result = f();

        for (key, value) in saved {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }

        result
    }

    #[test]
    fn colored_palette_has_codes() {
        let p = ColorPalette::colored();
        assert!(!p.reset.is_empty());
        assert!(!p.tag_stop.is_empty());
        assert!(!p.cyan.is_empty());
    }

    #[test]
    fn plain_palette_is_empty() {
        let p = ColorPalette::plain();
        assert!(p.reset.is_empty());
        assert!(p.tag_type.is_empty());
        assert!(p.yellow.is_empty());
    }

    #[test]
    fn no_color_disables_colors() {
        with_env_vars(&[("NO_COLOR", Some("1")), ("TERM", None)], || {
            assert!(!supports_color());
        });
    }

    #[test]
    fn dumb_terminal_disables_colors() {
        with_env_vars(&[("NO_COLOR", None), ("TERM", Some("dumb"))], || {
            assert!(!supports_color());
        });
    }

    #[test]
    fn regular_terminal_supports_colors() {
        with_env_vars(
            &[("NO_COLOR", None), ("TERM", Some("xterm-256color"))],
            || {
                assert!(supports_color());
            },
        );
    }
}
