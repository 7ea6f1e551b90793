//! Insight endpoints: yearly car ownership and CBD population series.

use parking_finder_insights_models::{CarOwnershipResponse, CbdPopulationResponse};

use crate::url::{QueryValue, to_query};
use crate::{ApiError, ParkingClient};

const CAR_OWNERSHIP_PATH: &str = "/insights/carOwnership";
const CBD_POPULATION_PATH: &str = "/insights/cbdPopulation";

/// Optional inclusive year bounds. The backend swaps them if reversed and
/// applies its own defaults for missing ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct YearRange {
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
}

impl YearRange {
    #[must_use]
    pub const fn new(start_year: Option<i32>, end_year: Option<i32>) -> Self {
        Self {
            start_year,
            end_year,
        }
    }
}

impl ParkingClient {
    /// Registered vehicles per year for a state (e.g. `"VIC"`).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the body is malformed.
    pub async fn car_ownership(
        &self,
        state_code: &str,
        years: YearRange,
    ) -> Result<CarOwnershipResponse, ApiError> {
        let path = format!(
            "{CAR_OWNERSHIP_PATH}{}",
            to_query([
                ("stateCode", Some(QueryValue::from(state_code))),
                ("startYear", years.start_year.map(QueryValue::from)),
                ("endYear", years.end_year.map(QueryValue::from)),
            ])
        );
        self.http.get(&path).await
    }

    /// Resident population per year for a region (e.g. `"CBD_MEL"`).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the body is malformed.
    pub async fn cbd_population(
        &self,
        region_id: &str,
        years: YearRange,
    ) -> Result<CbdPopulationResponse, ApiError> {
        let path = format!(
            "{CBD_POPULATION_PATH}{}",
            to_query([
                ("regionId", Some(QueryValue::from(region_id))),
                ("startYear", years.start_year.map(QueryValue::from)),
                ("endYear", years.end_year.map(QueryValue::from)),
            ])
        );
        self.http.get(&path).await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::ClientConfig;
    use crate::test_server::{CannedResponse, TestServer};

    fn client(server: &TestServer) -> ParkingClient {
        ParkingClient::new(ClientConfig::new(&server.base_url, Duration::from_secs(5))).unwrap()
    }

    #[tokio::test]
    async fn car_ownership_query_and_decode() {
        let mut server = TestServer::spawn(CannedResponse::json(
            200,
            r#"{
                "region": {"code": "Victoria", "name": "Victoria", "type": "STATE"},
                "values": [{"year": 2016, "value": 4000000}, {"year": 2021, "value": 4500000}],
                "yearlyPercentageChange": [{"year": 2021, "percent": 12.5}],
                "averageAnnualGrowthRate": 2.38
            }"#,
        ))
        .await;

        let response = client(&server)
            .car_ownership("VIC", YearRange::new(Some(2016), Some(2021)))
            .await
            .unwrap();
        assert_eq!(response.values.len(), 2);
        assert_eq!(response.average_annual_growth_rate, Some(2.38));
        assert!(response.vehicles_per_1000.is_none());

        assert_eq!(
            server.next_request().await.target,
            "/insights/carOwnership?stateCode=VIC&startYear=2016&endYear=2021"
        );
    }

    #[tokio::test]
    async fn cbd_population_omits_missing_years() {
        let mut server = TestServer::spawn(CannedResponse::json(
            200,
            r#"{"values": [{"year": 2001, "value": 20000}]}"#,
        ))
        .await;

        let response = client(&server)
            .cbd_population("CBD_MEL", YearRange::new(None, Some(2021)))
            .await
            .unwrap();
        assert!(response.yearly_percentage_change.is_none());
        assert!(response.growth_rate_or_computed().is_none());

        assert_eq!(
            server.next_request().await.target,
            "/insights/cbdPopulation?regionId=CBD_MEL&endYear=2021"
        );
    }

    #[tokio::test]
    async fn missing_region_is_http_error() {
        let server = TestServer::spawn(CannedResponse::json(
            404,
            r#"{"error": "no population data for CBD in 1990-1991"}"#,
        ))
        .await;
        let err = client(&server)
            .cbd_population("CBD_MEL", YearRange::new(Some(1990), Some(1991)))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "HTTP 404: no population data for CBD in 1990-1991"
        );
    }
}
