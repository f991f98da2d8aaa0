use std::time::Duration;

use log::debug;
use serde::Deserialize;

const DEFAULT_ENDPOINT: &str = "http://ip-api.com/json/";

/// Bounds the worst-case stall of a stop() call; the lookup is one attempt,
/// no retry.
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(3);

/// Where this host appears to be, per an IP geolocation service. All fields
/// null when the lookup failed in any way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoInfo {
    pub country_name: Option<String>,
    pub country_iso_code: Option<String>,
    pub region: Option<String>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct GeoPayload {
    country: Option<String>,
    #[serde(rename = "countryCode")]
    country_code: Option<String>,
    #[serde(rename = "regionName")]
    region_name: Option<String>,
    lon: Option<f64>,
    lat: Option<f64>,
}

pub struct GeoLookup {
    agent: ureq::Agent,
    endpoint: String,
}

impl GeoLookup {
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(LOOKUP_TIMEOUT).build();
        Self {
            agent,
            endpoint: endpoint.into(),
        }
    }

    /// Network errors, non-200 responses and malformed payloads all collapse
    /// to an empty `GeoInfo`; the record still gets written either way.
    pub fn lookup(&self) -> GeoInfo {
        match self.try_lookup() {
            Ok(info) => info,
            Err(err) => {
                debug!("geolocation lookup failed: {err:#}");
                GeoInfo::default()
            }
        }
    }

    fn try_lookup(&self) -> anyhow::Result<GeoInfo> {
        let payload: GeoPayload = self.agent.get(&self.endpoint).call()?.into_json()?;
        Ok(GeoInfo {
            country_name: payload.country,
            country_iso_code: payload.country_code,
            region: payload.region_name,
            longitude: payload.lon,
            latitude: payload.lat,
        })
    }
}

impl Default for GeoLookup {
    fn default() -> Self {
        Self::new()
    }
}
