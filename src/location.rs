/// Location and reverse geocoding
///
/// The device's one-shot position fetch (including its authorization
/// prompt) belongs to the embedding shell, which implements
/// [`LocationProvider`]. Reverse geocoding turns a post's coordinate into a
/// human-readable place name, strictly best-effort: failures are logged and
/// the row's place slot stays empty.
use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::models::GeoPoint;

/// One-shot current-location fetch. `Ok(None)` means the user declined or
/// the platform has no fix; posting proceeds without a geotag.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_location(&self) -> Result<Option<GeoPoint>>;
}

/// Provider pinned to a fixed coordinate, for demos and tests.
pub struct StaticLocationProvider(pub Option<GeoPoint>);

#[async_trait]
impl LocationProvider for StaticLocationProvider {
    async fn current_location(&self) -> Result<Option<GeoPoint>> {
        Ok(self.0)
    }
}

/// Nominatim-style reverse geocoder.
pub struct ReverseGeocoder {
    http: reqwest::Client,
    endpoint: String,
}

impl ReverseGeocoder {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        }
    }

    /// Best-effort place name for `point`. Never surfaces an error.
    pub async fn place_name(&self, point: GeoPoint) -> Option<String> {
        match self.lookup(point).await {
            Ok(name) => name,
            Err(err) => {
                tracing::debug!("reverse geocoding failed: {err}");
                None
            }
        }
    }

    async fn lookup(&self, point: GeoPoint) -> Result<Option<String>> {
        let body: Value = self
            .http
            .get(format!("{}/reverse", self.endpoint))
            .query(&[
                ("lat", point.latitude.to_string()),
                ("lon", point.longitude.to_string()),
                ("format", "jsonv2".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(parse_place_name(&body))
    }
}

/// Pick the most specific locality the geocoder offers, falling back to the
/// full display name.
fn parse_place_name(body: &Value) -> Option<String> {
    let address = body.get("address");
    if let Some(address) = address {
        let locality = ["city", "town", "village", "hamlet"]
            .iter()
            .find_map(|key| address.get(*key).and_then(Value::as_str));
        if let Some(locality) = locality {
            return match address.get("country").and_then(Value::as_str) {
                Some(country) => Some(format!("{locality}, {country}")),
                None => Some(locality.to_string()),
            };
        }
    }

    body.get("display_name")
        .and_then(Value::as_str)
        .map(str::to_string)
}
