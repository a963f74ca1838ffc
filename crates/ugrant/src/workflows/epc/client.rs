use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::{EpcCertificate, EpcLookup, EpcLookupError};
use crate::config::EpcConfig;

const PAGE_SIZE: u32 = 100;

/// Client for the domestic EPC register search API (Basic auth, `email:key`).
pub struct EpcClient {
    client: Client,
    base_url: String,
    credentials: Option<(String, String)>,
}

// Rows arrive either positionally (with `column-names`) or as keyed objects.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "column-names", default)]
    column_names: Vec<String>,
    #[serde(default)]
    rows: Vec<Value>,
}

impl EpcClient {
    pub fn new(config: &EpcConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials: config
                .credentials()
                .map(|(email, key)| (email.to_string(), key.to_string())),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }
}

#[async_trait]
impl EpcLookup for EpcClient {
    async fn search(&self, postcode: &str) -> Result<Vec<EpcCertificate>, EpcLookupError> {
        let Some((email, key)) = &self.credentials else {
            warn!("EPC API credentials not configured");
            return Err(EpcLookupError::NotConfigured);
        };

        let url = format!("{}/domestic/search", self.base_url);
        debug!(postcode = %postcode, url = %url, "requesting EPC certificates");

        let response = self
            .client
            .get(&url)
            .basic_auth(email, Some(key))
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[
                ("postcode", postcode.to_string()),
                ("size", PAGE_SIZE.to_string()),
            ])
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => return Ok(Vec::new()),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                warn!(status = %response.status(), "EPC API rejected credentials");
                return Err(EpcLookupError::AuthRejected);
            }
            status if !status.is_success() => {
                warn!(status = %status, "EPC API request failed");
                return Err(EpcLookupError::Upstream(format!("unexpected status {status}")));
            }
            _ => {}
        }

        // The register answers an empty body when a postcode has no certificates.
        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        let parsed: SearchResponse = serde_json::from_str(&body)
            .map_err(|err| EpcLookupError::Upstream(format!("unreadable EPC response: {err}")))?;

        Ok(parsed
            .rows
            .iter()
            .map(|row| certificate_from_row(row, &parsed.column_names))
            .collect())
    }
}

pub(crate) fn certificate_from_row(row: &Value, columns: &[String]) -> EpcCertificate {
    let field = |name: &str| -> String {
        let value = match row {
            Value::Object(map) => map.get(name),
            Value::Array(values) => columns
                .iter()
                .position(|column| column == name)
                .and_then(|index| values.get(index)),
            _ => None,
        };
        match value {
            Some(Value::String(text)) => text.clone(),
            Some(Value::Number(number)) => number.to_string(),
            _ => String::new(),
        }
    };

    EpcCertificate {
        address: field("address"),
        postcode: field("postcode"),
        current_energy_rating: field("current-energy-rating"),
        potential_energy_rating: field("potential-energy-rating"),
        property_type: field("property-type"),
        built_form: field("built-form"),
        floor_description: field("floor-description"),
        walls_description: field("walls-description"),
        roof_description: field("roof-description"),
        windows_description: field("windows-description"),
        main_heat_description: field("mainheat-description"),
        main_fuel: field("main-fuel"),
        hot_water_description: field("hotwater-description"),
        floor_area: field("total-floor-area").trim().parse().unwrap_or(0.0),
        lodgement_date: field("lodgement-date"),
        certificate_hash: field("lmk-key"),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn keyed_rows_read_by_name() {
        let row = json!({
            "address": "1 High Street",
            "current-energy-rating": "E",
            "total-floor-area": "84.5",
            "lmk-key": "abc123",
        });
        let certificate = certificate_from_row(&row, &[]);
        assert_eq!(certificate.address, "1 High Street");
        assert_eq!(certificate.current_energy_rating, "E");
        assert_eq!(certificate.floor_area, 84.5);
        assert_eq!(certificate.certificate_hash, "abc123");
        assert_eq!(certificate.roof_description, "");
    }

    #[test]
    fn positional_rows_use_column_names() {
        let columns = vec![
            "lmk-key".to_string(),
            "address".to_string(),
            "total-floor-area".to_string(),
        ];
        let row = json!(["xyz", "Flat 3", 61]);
        let certificate = certificate_from_row(&row, &columns);
        assert_eq!(certificate.certificate_hash, "xyz");
        assert_eq!(certificate.address, "Flat 3");
        assert_eq!(certificate.floor_area, 61.0);
        assert_eq!(certificate.postcode, "");
    }

    #[test]
    fn unparseable_floor_area_defaults_to_zero() {
        let certificate = certificate_from_row(&json!({ "total-floor-area": "n/a" }), &[]);
        assert_eq!(certificate.floor_area, 0.0);
    }
}
