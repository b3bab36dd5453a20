//! Google Civic Information API client.
//!
//! Looks up the federal legislators for an address (here, a normalized
//! zipcode) via the `representatives` endpoint.
//!
//! API Documentation: https://developers.google.com/civic-information/docs/v2
//!
//! A lookup never fails from the caller's point of view: any error (network,
//! bad key, unknown address) is logged with its classification and replaced
//! by `Representatives::Fallback` carrying a pointer to a public directory.

use std::time::Duration;

use serde::Deserialize;

use crate::config::CivicConfig;
use crate::logging::{log_lookup_failure, targets};
use crate::model::{LookupError, Official, Representatives};

// ============================================================================
// Lookup seam
// ============================================================================

/// Anything that can name an address's representatives.
///
/// The processor only depends on this trait, so batches can run against a
/// canned lookup in tests.
pub trait RepresentativeLookup {
    fn representatives(&self, zipcode: &str) -> Representatives;
}

// ============================================================================
// API Response Structures
// ============================================================================

/// Subset of the `representativeInfoByAddress` response.
#[derive(Debug, Deserialize)]
pub struct RepresentativeInfoResponse {
    /// Absent when the address resolved but no office matched the filters.
    pub officials: Option<Vec<Official>>,
}

// ============================================================================
// Client
// ============================================================================

pub struct CivicClient {
    http: reqwest::blocking::Client,
    endpoint: String,
    api_key: String,
    levels: Vec<String>,
    roles: Vec<String>,
    fallback_message: String,
}

impl CivicClient {
    pub fn new(config: &CivicConfig, api_key: String) -> Result<Self, reqwest::Error> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(CivicClient {
            http,
            endpoint: representatives_url(&config.base_url),
            api_key,
            levels: config.levels.clone(),
            roles: config.roles.clone(),
            fallback_message: config.fallback_message.clone(),
        })
    }

    /// Query pairs for one lookup, without the API key.
    pub fn query_for(&self, zipcode: &str) -> Vec<(&'static str, String)> {
        let mut query = vec![("address", zipcode.to_string())];
        query.extend(self.levels.iter().map(|l| ("levels", l.clone())));
        query.extend(self.roles.iter().map(|r| ("roles", r.clone())));
        query
    }

    /// Fetch the officials for `zipcode`, surfacing every failure.
    pub fn fetch_officials(&self, zipcode: &str) -> Result<Vec<Official>, LookupError> {
        let response = self
            .http
            .get(&self.endpoint)
            .header("Accept", "application/json")
            .query(&self.query_for(zipcode))
            .query(&[("key", self.api_key.as_str())])
            .send()?;

        if !response.status().is_success() {
            return Err(LookupError::Http(response.status().as_u16()));
        }

        let body = response.text()?;
        parse_officials(&body, zipcode)
    }
}

impl RepresentativeLookup for CivicClient {
    fn representatives(&self, zipcode: &str) -> Representatives {
        match self.fetch_officials(zipcode) {
            Ok(officials) => {
                log::debug!(
                    target: targets::CIVIC,
                    "[{}] {} officials found",
                    zipcode,
                    officials.len()
                );
                Representatives::Officials(officials)
            }
            Err(e) => {
                log_lookup_failure(zipcode, &e);
                Representatives::Fallback(self.fallback_message.clone())
            }
        }
    }
}

/// Lookup that always answers with the fallback message, for runs where
/// no API key is available.
pub struct FallbackLookup {
    pub message: String,
}

impl RepresentativeLookup for FallbackLookup {
    fn representatives(&self, _zipcode: &str) -> Representatives {
        Representatives::Fallback(self.message.clone())
    }
}

// ============================================================================
// Parsing
// ============================================================================

fn representatives_url(base_url: &str) -> String {
    format!("{}/representatives", base_url.trim_end_matches('/'))
}

/// Parse a `representatives` response body.
///
/// A body without an `officials` array is `LookupError::NotFound`.
pub fn parse_officials(body: &str, zipcode: &str) -> Result<Vec<Official>, LookupError> {
    let response: RepresentativeInfoResponse = serde_json::from_str(body)?;
    response
        .officials
        .ok_or_else(|| LookupError::NotFound(zipcode.to_string()))
}

// ============================================================================
// Tests
// ============================================================================
