// CLI subcommand handlers.
//
// main.rs parses arguments and dispatches here; each module owns one
// subcommand and shares dataset loading through `AppContext`.

pub mod download;
pub mod route;
pub mod search;
pub mod vocab;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use wifispot_cli::output::OutputFormat;
use wifispot_lib::{
    ensure_dataset, load_catalog, DatasetSource, FilterCriteria, Geocoder, NominatimGeocoder,
    OfflineGeocoder, ServiceEndpoints, Session, SpotCatalog,
};

/// Options shared by every subcommand.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub data_dir: Option<PathBuf>,
    pub format: OutputFormat,
    pub offline: bool,
    pub endpoints: ServiceEndpoints,
}

impl AppContext {
    pub fn new(data_dir: Option<PathBuf>, format: OutputFormat, offline: bool) -> Self {
        Self {
            data_dir,
            format,
            offline,
            endpoints: ServiceEndpoints::from_env(),
        }
    }

    /// Locate (downloading if needed) the dataset and return its path.
    pub fn dataset_path(&self) -> Result<PathBuf> {
        let source = DatasetSource::from_env(&self.endpoints);
        ensure_dataset(self.data_dir.as_deref(), &source)
            .context("failed to locate or download the WiFi spots dataset")
    }

    pub fn load_catalog(&self) -> Result<(PathBuf, SpotCatalog)> {
        let path = self.dataset_path()?;
        let catalog = load_catalog(&path)
            .with_context(|| format!("error loading WiFi spots data from {}", path.display()))?;
        Ok((path, catalog))
    }

    pub fn session(&self) -> Result<Session> {
        let (_, catalog) = self.load_catalog()?;
        Ok(Session::new(Arc::new(catalog)))
    }

    /// The geocoder for free-text searches; offline mode never leaves the dataset.
    pub fn geocoder(&self) -> Result<Box<dyn Geocoder>> {
        if self.offline {
            debug!("offline mode: external geocoding disabled");
            return Ok(Box::new(OfflineGeocoder));
        }
        let geocoder = NominatimGeocoder::from_endpoints(&self.endpoints)
            .context("failed to build geocoding client")?;
        Ok(Box::new(geocoder))
    }
}

/// Pagination flag shared by the listing subcommands.
#[derive(Args, Debug, Clone, Copy)]
pub struct PageArgs {
    /// Number of result pages to show (10 spots per page).
    #[arg(long, default_value_t = 1)]
    pub page: usize,
}

impl PageArgs {
    /// Show the first `page` pages of the session's current results.
    pub fn apply(&self, session: &mut Session) {
        session.show_page(self.page);
    }
}

/// Structured filter flags.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Borough name, e.g. "Brooklyn".
    #[arg(long)]
    pub borough: Option<String>,
    /// Spot type, e.g. "Free".
    #[arg(long = "type")]
    pub kind: Option<String>,
    /// Substring to match across name, location, provider, borough, and ZIP.
    #[arg(long)]
    pub text: Option<String>,
}

impl From<FilterArgs> for FilterCriteria {
    fn from(args: FilterArgs) -> Self {
        FilterCriteria {
            borough: args.borough,
            kind: args.kind,
            text: args.text,
        }
    }
}

pub fn display_path(path: &Path) -> String {
    path.display().to_string()
}
