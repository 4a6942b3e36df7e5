//! Route command handler: plan a walking route through selected spots.

use anyhow::{anyhow, Context, Result};
use tracing::warn;

use wifispot_lib::{Error, OsrmRouter, RouteSummary, TravelProfile};

use super::AppContext;

/// Select `spot_ids` in order and plan a walking route through them.
///
/// Ids past the route capacity are logged and skipped.
pub fn handle_route(context: &AppContext, spot_ids: &[usize]) -> Result<()> {
    let mut session = context.session()?;
    session.toggle_route_mode();

    for &id in spot_ids {
        if session.route().contains(id) {
            warn!(id, "spot listed more than once; keeping its first position");
            continue;
        }
        match session.toggle_route_spot(id) {
            Ok(_) => {}
            Err(error @ Error::RouteSelectionFull { .. }) => {
                warn!("{error}; skipping spot {id}");
            }
            Err(error) => return Err(error.into()),
        }
    }

    let router =
        OsrmRouter::from_endpoints(&context.endpoints).context("failed to build routing client")?;
    let routes = session
        .plan_route(&router)
        .context("error creating route")?;

    let summary = RouteSummary::new(
        session.catalog(),
        session.route(),
        TravelProfile::Walking,
        &routes,
    )
    .ok_or_else(|| anyhow!("routing service returned no routes"))?;

    context.format.render_route(&summary)
}
