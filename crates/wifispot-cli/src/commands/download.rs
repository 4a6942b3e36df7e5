//! Download command handler.

use anyhow::Result;

use super::{display_path, AppContext};

/// Ensure the dataset is cached locally and report where it lives.
pub fn handle_download(context: &AppContext) -> Result<()> {
    let (path, catalog) = context.load_catalog()?;
    context
        .format
        .render_download(&display_path(&path), catalog.len())
}
