//! Vocab command handler: the values offered by the borough/type filters.

use anyhow::Result;

use wifispot_cli::output::Vocabulary;

use super::AppContext;

pub fn handle_vocab(context: &AppContext) -> Result<()> {
    let (_, catalog) = context.load_catalog()?;
    let vocabulary = Vocabulary {
        boroughs: catalog.boroughs(),
        types: catalog.types(),
    };
    context.format.render_vocabulary(&vocabulary)
}
