//! Read-side view models for the list, map and detail screens

use futures::future::join_all;
use uuid::Uuid;

use crate::client::address::AddressResolver;
use crate::client::api::ReportBackend;
use crate::client::error::ClientError;
use crate::client::geolocation::Coordinates;
use crate::features::sightings::dtos::SightingDto;
use crate::features::sightings::models::Category;
use crate::shared::constants::{
    COORDINATE_DISPLAY_PRECISION, DEFAULT_MAP_CENTER, DEFAULT_MAP_ZOOM,
};

const STATIC_MAP_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/staticmap";

/// Small map tile for one list row (zoom 14, 128x96, red marker)
pub fn static_map_url(at: Coordinates, api_key: &str) -> String {
    let center = format!("{},{}", at.latitude, at.longitude);
    format!(
        "{}?center={}&zoom=14&size=128x96&markers=color:red%7C{}&key={}",
        STATIC_MAP_ENDPOINT,
        center,
        center,
        urlencoding::encode(api_key)
    )
}

fn position(sighting: &SightingDto) -> Coordinates {
    Coordinates::new(sighting.latitude, sighting.longitude)
}

/// Newest first; ties keep server order
fn newest_first(mut sightings: Vec<SightingDto>) -> Vec<SightingDto> {
    sightings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sightings
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    pub sighting: SightingDto,
    pub address: String,
    pub static_map_url: String,
    pub badge_color: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListView {
    pub items: Vec<ListItem>,
    pub count: usize,
}

/// Every sighting, newest first, each with a display address
pub async fn load_list(
    backend: &dyn ReportBackend,
    addresses: &AddressResolver,
    maps_api_key: &str,
) -> Result<ListView, ClientError> {
    let sightings = newest_first(backend.list_sightings().await?);
    let resolved = join_all(
        sightings
            .iter()
            .map(|s| addresses.reverse_geocode(position(s))),
    )
    .await;

    let items: Vec<ListItem> = sightings
        .into_iter()
        .zip(resolved)
        .map(|(sighting, address)| ListItem {
            static_map_url: static_map_url(position(&sighting), maps_api_key),
            badge_color: sighting.category.badge_color(),
            sighting,
            address,
        })
        .collect();

    Ok(ListView {
        count: items.len(),
        items,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub id: Uuid,
    pub position: Coordinates,
    pub category: Category,
    pub title: String,
    pub icon_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub center: Coordinates,
    pub zoom: u8,
    pub markers: Vec<MapMarker>,
}

/// Center on the device if known, else the newest sighting, else the default
pub fn build_map(sightings: Vec<SightingDto>, device: Option<Coordinates>) -> MapView {
    let sightings = newest_first(sightings);
    let center = device
        .or_else(|| sightings.first().map(position))
        .unwrap_or_else(|| Coordinates::new(DEFAULT_MAP_CENTER.0, DEFAULT_MAP_CENTER.1));

    let markers = sightings
        .iter()
        .map(|s| MapMarker {
            id: s.id,
            position: position(s),
            category: s.category,
            title: s.category_label.clone(),
            icon_url: s.category.marker_icon_url(),
        })
        .collect();

    MapView {
        center,
        zoom: DEFAULT_MAP_ZOOM,
        markers,
    }
}

pub async fn load_map(
    backend: &dyn ReportBackend,
    device: Option<Coordinates>,
) -> Result<MapView, ClientError> {
    Ok(build_map(backend.list_sightings().await?, device))
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailItem {
    pub sighting: SightingDto,
    pub address: String,
    /// Exact coordinates for display
    pub coordinates_text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailView {
    Found(Box<DetailItem>),
    NotFound,
}

pub async fn load_detail(
    backend: &dyn ReportBackend,
    addresses: &AddressResolver,
    id: Uuid,
) -> Result<DetailView, ClientError> {
    let Some(sighting) = backend.get_sighting(id).await? else {
        return Ok(DetailView::NotFound);
    };

    let address = addresses.reverse_geocode(position(&sighting)).await;
    let coordinates_text = format!(
        "{:.prec$}, {:.prec$}",
        sighting.latitude,
        sighting.longitude,
        prec = COORDINATE_DISPLAY_PRECISION
    );

    Ok(DetailView::Found(Box::new(DetailItem {
        sighting,
        address,
        coordinates_text,
    })))
}
