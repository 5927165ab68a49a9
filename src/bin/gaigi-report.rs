use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use gaigi_core::client::views::{self, DetailView};
use gaigi_core::client::{
    AddressResolver, ApiClient, ClientConfig, Coordinates, DeviceLocator, FixedDeviceLocation,
    GeolocationResolver, GoogleGeocoder, NoDeviceLocation, Photo, SubmissionWorkflow,
};
use gaigi_core::features::sightings::models::Category;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "gaigi-report")]
#[command(about = "Report and browse sightings of suspicious things", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Stand-in for the device location sensor
#[derive(Args)]
struct DeviceArgs {
    /// Device latitude
    #[arg(long, requires = "device_lng", allow_hyphen_values = true)]
    device_lat: Option<f64>,

    /// Device longitude
    #[arg(long, requires = "device_lat", allow_hyphen_values = true)]
    device_lng: Option<f64>,
}

impl DeviceArgs {
    fn position(&self) -> Option<Coordinates> {
        match (self.device_lat, self.device_lng) {
            (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
            _ => None,
        }
    }

    fn locator(&self) -> Arc<dyn DeviceLocator> {
        match self.position() {
            Some(at) => Arc::new(FixedDeviceLocation(at)),
            None => Arc::new(NoDeviceLocation),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Report a sighting from a photo
    Submit {
        /// Photo to upload
        photo: PathBuf,

        /// Category tag; defaults to the suggestion from image analysis
        #[arg(short, long)]
        category: Option<Category>,

        /// Free-text note
        #[arg(short, long)]
        note: Option<String>,

        /// Owner identifier; omitted reports are anonymous
        #[arg(long)]
        owner: Option<String>,

        /// Location as "<lat>,<lng>", overriding photo and device
        #[arg(long, allow_hyphen_values = true, conflicts_with = "address")]
        at: Option<String>,

        /// Address text to geocode instead of a resolved location
        #[arg(long)]
        address: Option<String>,

        #[command(flatten)]
        device: DeviceArgs,
    },

    /// All sightings, newest first
    List,

    /// Map markers for all sightings
    Map {
        #[command(flatten)]
        device: DeviceArgs,
    },

    /// One sighting in detail
    Show {
        id: Uuid,
    },
}

fn parse_point(raw: &str) -> anyhow::Result<Coordinates> {
    let (lat, lng) = raw
        .split_once(',')
        .context("location must look like <lat>,<lng>")?;
    let at = Coordinates::new(lat.trim().parse()?, lng.trim().parse()?);
    anyhow::ensure!(at.is_valid(), "location is out of range");
    Ok(at)
}

/// Detail screen text; an unknown id is a normal outcome, not an error
fn render_detail(view: &DetailView) -> String {
    let item = match view {
        DetailView::Found(item) => item,
        DetailView::NotFound => return "Sighting not found\n".to_string(),
    };

    let s = &item.sighting;
    let mut out = format!("{}\n", s.category_label);
    out.push_str(&format!("Category:    {}\n", s.category));
    out.push_str(&format!("Address:     {}\n", item.address));
    out.push_str(&format!("Coordinates: {}\n", item.coordinates_text));
    out.push_str(&format!(
        "Verified:    {}\n",
        if s.location_verified { "yes" } else { "no" }
    ));
    out.push_str(&format!("Reported:    {}\n", s.created_at.to_rfc3339()));
    out.push_str(&format!("Image:       {}\n", s.image_url));
    if !s.note.is_empty() {
        out.push_str(&format!("\n{}\n", s.note));
    }
    out
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ClientConfig::from_env().map_err(|e| anyhow::anyhow!(e))?;
    let api = Arc::new(ApiClient::new(&config)?);
    let addresses = Arc::new(AddressResolver::new(
        Arc::new(GoogleGeocoder::new(&config)?),
        config.geocode_timeout,
    ));

    match cli.command {
        Commands::Submit {
            photo,
            category,
            note,
            owner,
            at,
            address,
            device,
        } => {
            let photo = Photo::from_path(&photo)
                .await
                .with_context(|| format!("cannot read {}", photo.display()))?;
            let resolver = Arc::new(GeolocationResolver::new(
                device.locator(),
                config.device_location_timeout,
            ));
            let mut workflow = SubmissionWorkflow::new(api, resolver, addresses);

            workflow.set_owner(owner)?;
            if let Some(at) = at {
                workflow.set_coordinates(parse_point(&at)?)?;
            }
            workflow.select_photo(photo).await?;

            if let Some(category) = category {
                workflow.set_category(category)?;
            }
            if let Some(address) = address {
                workflow.edit_address(address)?;
            }
            if let Some(note) = note {
                workflow.set_note(note)?;
            }

            let draft = workflow.draft();
            println!(
                "Category: {}",
                draft
                    .category
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "-".to_string())
            );
            if !draft.labels.is_empty() {
                println!("Labels:   {}", draft.labels.join(", "));
            }
            println!(
                "Location: {} ({})",
                draft.address.as_deref().unwrap_or("-"),
                draft.location_source
            );

            let id = workflow.submit().await?;
            println!("Reported sighting {}", id);
        }

        Commands::List => {
            let view = views::load_list(&*api, &addresses, &config.maps_api_key).await?;
            println!("{} sighting(s)", view.count);
            for item in view.items {
                let s = &item.sighting;
                println!(
                    "{}  {:<8}  {}  {}",
                    s.created_at.format("%Y-%m-%d %H:%M"),
                    s.category.as_str(),
                    item.address,
                    s.id
                );
                if !s.category_label.is_empty() {
                    println!("    {}", s.category_label);
                }
            }
        }

        Commands::Map { device } => {
            let map = views::load_map(&*api, device.position()).await?;
            println!(
                "Center {:.4}, {:.4} at zoom {}",
                map.center.latitude, map.center.longitude, map.zoom
            );
            for marker in map.markers {
                println!(
                    "{:>10.4} {:>10.4}  {:<8}  {}",
                    marker.position.latitude,
                    marker.position.longitude,
                    marker.category.as_str(),
                    marker.title
                );
            }
        }

        Commands::Show { id } => {
            let view = views::load_detail(&*api, &addresses, id).await?;
            print!("{}", render_detail(&view));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use gaigi_core::client::views::DetailItem;
    use gaigi_core::features::sightings::dtos::SightingDto;
    use gaigi_core::features::sightings::models::LocationSource;

    #[test]
    fn test_unknown_sighting_renders_not_found() {
        assert_eq!(render_detail(&DetailView::NotFound), "Sighting not found\n");
    }

    #[test]
    fn test_found_sighting_renders_fields() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let view = DetailView::Found(Box::new(DetailItem {
            sighting: SightingDto {
                id: Uuid::now_v7(),
                owner_id: None,
                image_url: "http://files/a.jpg".to_string(),
                thumbnail_url: "http://files/a_t.jpg".to_string(),
                category: Category::Bags,
                category_label: Category::Bags.auto_label(),
                latitude: 35.0,
                longitude: 139.0,
                location_verified: false,
                location_source: LocationSource::Manual,
                note: "left on a bench".to_string(),
                created_at: at,
                updated_at: at,
                is_anonymous: true,
            },
            address: "Shibuya".to_string(),
            coordinates_text: "35.000000, 139.000000".to_string(),
        }));

        let text = render_detail(&view);
        assert!(text.starts_with("Auto-detected: bags\n"));
        assert!(text.contains("Address:     Shibuya\n"));
        assert!(text.contains("Verified:    no\n"));
        assert!(text.ends_with("\nleft on a bench\n"));
    }

    #[test]
    fn test_parse_point() {
        let at = parse_point("35.5, -139.25").unwrap();
        assert_eq!(at, Coordinates::new(35.5, -139.25));
        assert!(parse_point("95,0").is_err());
        assert!(parse_point("nowhere").is_err());
    }
}
