/// Configuration management for the dayframe client core
///
/// Configuration is loaded from `DAYFRAME_`-prefixed environment variables
/// with development defaults, so an embedding shell can run against a local
/// object-store instance without any setup.
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the remote object store, e.g. `http://localhost:1337/parse`
    pub server_url: String,
    /// Application identifier sent with every store request
    pub application_id: String,
    /// REST API key sent with every store request
    pub rest_key: String,
    /// Base URL of the reverse-geocoding service
    pub geocoder_url: String,
    /// Delay between login and the best-effort post reminder
    pub reminder_delay: Duration,
    /// JPEG quality used when re-encoding picked images before upload (1-100)
    pub jpeg_quality: u8,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let reminder_delay_secs = match std::env::var("DAYFRAME_REMINDER_DELAY_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|_| format!("DAYFRAME_REMINDER_DELAY_SECS is not a number: {raw}"))?,
            Err(_) => 10,
        };

        let jpeg_quality = match std::env::var("DAYFRAME_JPEG_QUALITY") {
            Ok(raw) => raw
                .parse::<u8>()
                .ok()
                .filter(|q| (1..=100).contains(q))
                .ok_or_else(|| format!("DAYFRAME_JPEG_QUALITY must be 1-100, got: {raw}"))?,
            Err(_) => crate::media::UPLOAD_JPEG_QUALITY,
        };

        Ok(Config {
            server_url: std::env::var("DAYFRAME_SERVER_URL")
                .unwrap_or_else(|_| "http://localhost:1337/parse".to_string()),
            application_id: std::env::var("DAYFRAME_APPLICATION_ID")
                .unwrap_or_else(|_| "dayframe-dev".to_string()),
            rest_key: std::env::var("DAYFRAME_REST_KEY")
                .unwrap_or_else(|_| "dayframe-dev-rest-key".to_string()),
            geocoder_url: std::env::var("DAYFRAME_GEOCODER_URL")
                .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".to_string()),
            reminder_delay: Duration::from_secs(reminder_delay_secs),
            jpeg_quality,
        })
    }
}
