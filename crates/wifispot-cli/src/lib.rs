//! WiFi spot finder CLI library.
//!
//! Terminal styling and the text/JSON renderers used by the `wifispot-cli`
//! binary.

pub mod output;
pub mod terminal;
