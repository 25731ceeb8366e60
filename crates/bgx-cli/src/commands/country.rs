//! Country command - resolve the country of a free-text address.

use clap::Args;
use tracing::{debug, warn};

use bgx_core::country::{Gazetteer, OpenCageGeocoder};

use super::load_config;

#[derive(Args)]
pub struct CountryArgs {
    /// Address to look up
    #[arg(required = true)]
    address: String,

    /// Ask the geocoding service before the offline tables
    #[arg(long)]
    geocode: bool,
}

pub async fn run(args: CountryArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if args.geocode || config.extraction.geocode {
        match OpenCageGeocoder::new(&config.geocoding) {
            Ok(geocoder) => match geocoder.resolve(&args.address).await {
                Ok(Some(country)) => {
                    println!("{}", country);
                    return Ok(());
                }
                Ok(None) => debug!("Geocoder found nothing for {:?}", args.address),
                Err(e) => warn!("Geocoding failed: {}", e),
            },
            Err(e) => warn!("Geocoding disabled: {}", e),
        }
    }

    match Gazetteer::from_config(&config.extraction).lookup(&args.address) {
        Some(found) => {
            debug!("Matched via {:?}", found.source);
            println!("{}", found.country);
            Ok(())
        }
        None => anyhow::bail!("Country not found"),
    }
}
