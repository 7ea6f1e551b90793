//! Parking endpoints: live spots, nearby search, availability prediction
//! and occupancy history.
//!
//! Each nearby query comes in three flavours sharing one request path:
//! `*_response` returns the decoded [`NearbyResponse`] variant, the plain
//! form returns only the observation list, and `*_envelope` returns the
//! origin alongside the list.

use parking_finder_parking_models::history::{
    HeatmapResponse, HistoryQuery, HistoryResponse, HistorySummaryQuery, TopSegmentsQuery,
    TopSegmentsResponse,
};
use parking_finder_parking_models::{
    LocationQuery, NearbyEnvelope, NearbyResponse, ParkingObservation,
};

use crate::payload::{build_nearby_payload, build_predict_payload};
use crate::url::{QueryValue, to_query};
use crate::{ApiError, ParkingClient};

const SPOTS_PATH: &str = "/parking/";
const NEARBY_PATH: &str = "/parking/nearby";
const PREDICT_PATH: &str = "/parking/nearby/predict";
const TOP_SEGMENTS_PATH: &str = "/parking/history/top-segments";
const HISTORY_PATH: &str = "/parking/history";
const HISTORY_SUMMARY_PATH: &str = "/parking/history/summary";

impl ParkingClient {
    /// Lists every sensor-equipped bay with its latest status.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the body is malformed.
    pub async fn list_spots(&self) -> Result<Vec<ParkingObservation>, ApiError> {
        self.http.get(SPOTS_PATH).await
    }

    /// Finds bays within walking distance of an address, in whichever
    /// shape the backend responds with.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the body is neither an
    /// envelope nor a list of observations.
    pub async fn fetch_nearby_response(
        &self,
        query: &LocationQuery,
    ) -> Result<NearbyResponse, ApiError> {
        let payload = build_nearby_payload(query);
        self.http.post(NEARBY_PATH, &payload).await
    }

    /// Finds bays near an address, returning only the observations.
    ///
    /// # Errors
    ///
    /// See [`Self::fetch_nearby_response`].
    pub async fn fetch_nearby(
        &self,
        query: &LocationQuery,
    ) -> Result<Vec<ParkingObservation>, ApiError> {
        Ok(self.fetch_nearby_response(query).await?.into_nearby())
    }

    /// Finds bays near an address, returning the resolved origin with the
    /// observations.
    ///
    /// # Errors
    ///
    /// See [`Self::fetch_nearby_response`].
    pub async fn fetch_nearby_envelope(
        &self,
        query: &LocationQuery,
    ) -> Result<NearbyEnvelope, ApiError> {
        Ok(self.fetch_nearby_response(query).await?.into_envelope())
    }

    /// Predicts availability of bays near an address at `query.datetime`
    /// (now, if unset).
    ///
    /// # Errors
    ///
    /// See [`Self::fetch_nearby_response`].
    pub async fn fetch_nearby_predict_response(
        &self,
        query: &LocationQuery,
    ) -> Result<NearbyResponse, ApiError> {
        let payload = build_predict_payload(query);
        self.http.post(PREDICT_PATH, &payload).await
    }

    /// List-only form of [`Self::fetch_nearby_predict_response`].
    ///
    /// # Errors
    ///
    /// See [`Self::fetch_nearby_response`].
    pub async fn fetch_nearby_predict(
        &self,
        query: &LocationQuery,
    ) -> Result<Vec<ParkingObservation>, ApiError> {
        Ok(self.fetch_nearby_predict_response(query).await?.into_nearby())
    }

    /// Envelope form of [`Self::fetch_nearby_predict_response`].
    ///
    /// # Errors
    ///
    /// See [`Self::fetch_nearby_response`].
    pub async fn fetch_nearby_predict_envelope(
        &self,
        query: &LocationQuery,
    ) -> Result<NearbyEnvelope, ApiError> {
        Ok(self
            .fetch_nearby_predict_response(query)
            .await?
            .into_envelope())
    }

    /// Ranks street segments by observation volume.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the body is malformed.
    pub async fn top_segments(
        &self,
        query: &TopSegmentsQuery,
    ) -> Result<TopSegmentsResponse, ApiError> {
        let path = format!(
            "{TOP_SEGMENTS_PATH}{}",
            to_query([
                ("startDate", query.start_date.as_ref().map(QueryValue::from)),
                ("endDate", query.end_date.as_ref().map(QueryValue::from)),
                ("limit", query.limit.map(QueryValue::from)),
            ])
        );
        self.http.get(&path).await
    }

    /// Hourly occupancy for a segment or bay.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the body is malformed.
    pub async fn history(&self, query: &HistoryQuery) -> Result<HistoryResponse, ApiError> {
        self.http.post(HISTORY_PATH, query).await
    }

    /// Day-of-week by hour heatmap plus suggested arrival windows.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the body is malformed.
    pub async fn history_summary(
        &self,
        query: &HistorySummaryQuery,
    ) -> Result<HeatmapResponse, ApiError> {
        self.http.post(HISTORY_SUMMARY_PATH, query).await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::{TimeZone, Utc};
    use parking_finder_parking_models::history::HistoryScope;

    use super::*;
    use crate::ClientConfig;
    use crate::test_server::{CannedResponse, TestServer};

    const ENVELOPE: &str = r#"{
        "origin": {
            "latitude": -37.8183,
            "longitude": 144.9671,
            "address": "Flinders Street Station",
            "formatted_address": "Flinders St, Melbourne VIC 3000, Australia"
        },
        "nearby": [
            {
                "kerbside_id": "K-1",
                "zone_number": "7301",
                "status_description": "Unoccupied",
                "status_timestamp": "2025-08-20T01:02:03Z",
                "latitude": -37.8179,
                "longitude": 144.9668,
                "is_occupied": false,
                "sign": "2P MTR",
                "days": "Mon-Fri",
                "start_time": "07:30",
                "end_time": "18:30",
                "walking_time": 1.2,
                "distance_km": 0.1,
                "probability": 0.73
            }
        ]
    }"#;

    fn client(server: &TestServer) -> ParkingClient {
        ParkingClient::new(ClientConfig::new(&server.base_url, Duration::from_secs(5))).unwrap()
    }

    #[tokio::test]
    async fn nearby_list_form_returns_exactly_the_nearby_array() {
        let server = TestServer::spawn(CannedResponse::json(200, ENVELOPE)).await;
        let list = client(&server)
            .fetch_nearby(&LocationQuery::new("Flinders Street Station"))
            .await
            .unwrap();

        let expected: serde_json::Value = serde_json::from_str(ENVELOPE).unwrap();
        assert_eq!(serde_json::to_value(&list).unwrap(), expected["nearby"]);
    }

    #[tokio::test]
    async fn nearby_envelope_form_keeps_origin_and_list() {
        let server = TestServer::spawn(CannedResponse::json(200, ENVELOPE)).await;
        let envelope = client(&server)
            .fetch_nearby_envelope(&LocationQuery::new("Flinders Street Station"))
            .await
            .unwrap();

        let expected: serde_json::Value = serde_json::from_str(ENVELOPE).unwrap();
        assert_eq!(serde_json::to_value(&envelope).unwrap(), expected);
    }

    #[tokio::test]
    async fn nearby_accepts_bare_list() {
        let server = TestServer::spawn(CannedResponse::json(
            200,
            r#"[{"kerbside_id": 12, "latitude": -37.0, "longitude": 144.0, "is_occupied": true}]"#,
        ))
        .await;
        let envelope = client(&server)
            .fetch_nearby_envelope(&LocationQuery::new("x"))
            .await
            .unwrap();
        assert!(envelope.origin.is_none());
        assert_eq!(envelope.nearby[0].kerbside_id, "12");
        assert!(envelope.nearby[0].is_occupied);
    }

    #[tokio::test]
    async fn nearby_posts_minimal_payload() {
        let mut server = TestServer::spawn(CannedResponse::json(200, "[]")).await;
        let query = LocationQuery::new("Queen Victoria Market").with_max_walk_time(5.0);
        client(&server).fetch_nearby(&query).await.unwrap();

        let recorded = server.next_request().await;
        assert_eq!(recorded.method, "POST");
        assert_eq!(recorded.target, NEARBY_PATH);
        assert_eq!(
            recorded.json(),
            serde_json::json!({"address": "Queen Victoria Market"})
        );
    }

    #[tokio::test]
    async fn predict_sends_iso_datetime_and_walk_time() {
        let mut server = TestServer::spawn(CannedResponse::json(200, ENVELOPE)).await;
        let at = Utc.with_ymd_and_hms(2025, 8, 20, 0, 0, 0).unwrap();
        let query = LocationQuery::new("Flinders Street Station")
            .with_max_walk_time(8.0)
            .at(at);

        let list = client(&server).fetch_nearby_predict(&query).await.unwrap();
        assert_eq!(list[0].probability, Some(0.73));
        assert!(list[0].has_valid_probability());

        let recorded = server.next_request().await;
        assert_eq!(recorded.target, PREDICT_PATH);
        assert_eq!(
            recorded.json(),
            serde_json::json!({
                "address": "Flinders Street Station",
                "max_walk_time": 8.0,
                "datetime": "2025-08-20T00:00:00.000Z"
            })
        );
    }

    #[tokio::test]
    async fn predict_passes_string_datetime_unchanged() {
        let mut server = TestServer::spawn(CannedResponse::json(200, "[]")).await;
        let query = LocationQuery::new("x").at("2025-08-20T10:00");
        client(&server)
            .fetch_nearby_predict_envelope(&query)
            .await
            .unwrap();
        assert_eq!(
            server.next_request().await.json()["datetime"],
            "2025-08-20T10:00"
        );
    }

    #[tokio::test]
    async fn top_segments_builds_query_string() {
        let mut server = TestServer::spawn(CannedResponse::json(
            200,
            r#"{"items": [{"segment_id": "20184", "samples": 99}], "window": {"startDate": "2025-07-01", "endDate": "2025-07-31"}}"#,
        ))
        .await;
        let response = client(&server)
            .top_segments(&TopSegmentsQuery {
                start_date: Some("2025-07-01".to_string()),
                end_date: None,
                limit: Some(5),
            })
            .await
            .unwrap();
        assert_eq!(response.items[0].samples, 99);

        let recorded = server.next_request().await;
        assert_eq!(recorded.method, "GET");
        assert_eq!(
            recorded.target,
            "/parking/history/top-segments?startDate=2025-07-01&limit=5"
        );
    }

    #[tokio::test]
    async fn history_posts_scope_and_dates() {
        let mut server = TestServer::spawn(CannedResponse::json(
            200,
            r#"{"items": [], "summary": {"count": 0}, "hint": "No observations"}"#,
        ))
        .await;
        let query = HistoryQuery::segment("20184").between("2025-07-01", "2025-07-31");
        let response = client(&server).history(&query).await.unwrap();
        assert!(response.items.is_empty());
        assert_eq!(response.hint.as_deref(), Some("No observations"));

        let recorded = server.next_request().await;
        assert_eq!(recorded.target, HISTORY_PATH);
        assert_eq!(
            recorded.json(),
            serde_json::json!({
                "scope": "segment",
                "id": "20184",
                "startDate": "2025-07-01",
                "endDate": "2025-07-31"
            })
        );
    }

    #[tokio::test]
    async fn history_summary_posts_tuning_fields() {
        let mut server = TestServer::spawn(CannedResponse::json(
            200,
            r#"{"heatmap": [{"dow": 2, "hh": 9, "samples": 30, "avg_free_ratio": 0.4}], "windows": []}"#,
        ))
        .await;
        let query = HistorySummaryQuery {
            min_samples_per_bucket: Some(20),
            top_n: Some(3),
            ..HistorySummaryQuery::from(HistoryQuery::bay("8812"))
        };
        let response = client(&server).history_summary(&query).await.unwrap();
        assert_eq!(response.cell(2, 9).map(|c| c.samples), Some(30));

        let body = server.next_request().await.json();
        assert_eq!(body["scope"], HistoryScope::Bay.to_string());
        assert_eq!(body["minSamplesPerBucket"], 20);
        assert_eq!(body["topN"], 3);
        assert!(body.get("startDate").is_none());
    }

    #[tokio::test]
    async fn backend_validation_error_is_surfaced() {
        let server = TestServer::spawn(CannedResponse::json(
            400,
            r#"{"error": "Provide either scope+id OR lat+lng."}"#,
        ))
        .await;
        let err = client(&server)
            .history(&HistoryQuery::segment(""))
            .await
            .unwrap_err();
        assert!(
            matches!(&err, ApiError::Http { status: 400, message } if message.contains("scope+id")),
            "got {err:?}"
        );
    }

    #[tokio::test]
    async fn list_spots_gets_root_path() {
        let mut server = TestServer::spawn(CannedResponse::json(
            200,
            r#"[{"kerbside_id": "A", "zone_number": 1, "status_description": "Present", "latitude": 1.0, "longitude": 2.0, "is_occupied": true, "last_updated": "2025-01-01T00:00:00Z"}]"#,
        ))
        .await;
        let spots = client(&server).list_spots().await.unwrap();
        assert_eq!(spots.len(), 1);
        assert_eq!(spots[0].last_updated.as_deref(), Some("2025-01-01T00:00:00Z"));
        assert_eq!(server.next_request().await.target, SPOTS_PATH);
    }
}
