use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::NaiveDate;
use serde_json::{Value, json};

use weatherwise::llm::{Prompt, SuggestionModel};
use weatherwise::models::{DayForecast, LocationQuery, UnitGroup};
use weatherwise::tips::fallback;
use weatherwise::weather::ForecastProvider;
use weatherwise::{TipsService, WeatherWiseError, web};

/// Returns fixed days and records what it was asked for
struct StubForecast {
    days: Vec<DayForecast>,
    seen: Mutex<Vec<(String, UnitGroup)>>,
}

#[async_trait]
impl ForecastProvider for StubForecast {
    async fn three_day_forecast(
        &self,
        location: &LocationQuery,
        units: UnitGroup,
    ) -> weatherwise::Result<Vec<DayForecast>> {
        self.seen
            .lock()
            .unwrap()
            .push((location.provider_param(), units));
        Ok(self.days.clone())
    }
}

struct DownForecast;

#[async_trait]
impl ForecastProvider for DownForecast {
    async fn three_day_forecast(
        &self,
        _location: &LocationQuery,
        _units: UnitGroup,
    ) -> weatherwise::Result<Vec<DayForecast>> {
        Err(WeatherWiseError::weather("Weather provider returned 401: API key is invalid."))
    }
}

struct FixedReply(&'static str);

#[async_trait]
impl SuggestionModel for FixedReply {
    async fn complete(&self, _prompt: &Prompt) -> weatherwise::Result<String> {
        Ok(self.0.to_string())
    }
}

fn day(d: u32, tempmax: f64, precip: f64, windspeed: f64, description: &str) -> DayForecast {
    DayForecast {
        date: NaiveDate::from_ymd_opt(2024, 8, d).unwrap(),
        tempmin: tempmax - 15.0,
        tempmax,
        humidity: 55.0,
        windspeed,
        precip,
        description: description.to_string(),
    }
}

fn stub() -> Arc<StubForecast> {
    Arc::new(StubForecast {
        days: vec![
            day(10, 90.0, 0.0, 20.0, "Sunny"),
            day(11, 72.0, 0.4, 6.0, "Patchy rain possible"),
            day(12, 58.0, 0.0, 10.0, "Overcast"),
        ],
        seen: Mutex::new(Vec::new()),
    })
}

fn server(service: TipsService) -> TestServer {
    TestServer::new(web::app(service, None)).unwrap()
}

#[tokio::test]
async fn missing_location_is_bad_request() {
    let forecast = stub();
    let server = server(TipsService::new(forecast.clone(), None));

    let response = server.post("/api/tips").json(&json!({})).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({ "error": "Location is required" }));

    let response = server
        .post("/api/tips")
        .json(&json!({ "location": "   " }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    assert!(forecast.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn three_days_with_three_tips_each() {
    let forecast = stub();
    let server = server(TipsService::new(forecast.clone(), None));

    let response = server
        .post("/api/tips")
        .json(&json!({ "location": "Phoenix", "unit_group": "us" }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["location"], "Phoenix");
    assert_eq!(body["unit_group"], "us");

    let days = body["days"].as_array().unwrap();
    assert_eq!(days.len(), 3);
    for d in days {
        assert_eq!(d["suggestions"].as_array().unwrap().len(), 3);
        assert!(d["weather"]["description"].is_string());
    }

    // Hot, dry and windy day from the rule table
    assert_eq!(
        days[0]["suggestions"],
        json!([fallback::DRY_TIP, fallback::HOT_TIP, fallback::WINDY_TIP])
    );
    assert_eq!(days[0]["date"], "2024-08-10");

    assert_eq!(
        forecast.seen.lock().unwrap().as_slice(),
        &[("Phoenix".to_string(), UnitGroup::Us)]
    );
}

#[tokio::test]
async fn coordinates_are_used_when_given() {
    let forecast = stub();
    let server = server(TipsService::new(forecast.clone(), None));

    let response = server
        .post("/api/tips")
        .json(&json!({ "location": "Ignored", "lat": 33.45, "lon": -112.07, "unit_group": "metric" }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["location"], "33.45,-112.07");
    assert_eq!(
        forecast.seen.lock().unwrap().as_slice(),
        &[("33.45,-112.07".to_string(), UnitGroup::Metric)]
    );
}

#[tokio::test]
async fn out_of_range_coordinates_are_bad_request() {
    let forecast = stub();
    let server = server(TipsService::new(forecast.clone(), None));

    let response = server
        .post("/api/tips")
        .json(&json!({ "lat": 95.0, "lon": 10.0 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(forecast.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_unit_group_is_bad_request() {
    let server = server(TipsService::new(stub(), None));

    let response = server
        .post("/api/tips")
        .json(&json!({ "location": "Phoenix", "unit_group": "kelvin" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("kelvin"));
}

#[tokio::test]
async fn short_model_reply_falls_back_to_rules() {
    let model = FixedReply(r#"{"suggestions": ["Only one", "And two"]}"#);
    let server = server(TipsService::new(stub(), Some(Arc::new(model))));

    let response = server
        .post("/api/tips")
        .json(&json!({ "location": "Phoenix" }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(
        body["days"][0]["suggestions"],
        json!([fallback::DRY_TIP, fallback::HOT_TIP, fallback::WINDY_TIP])
    );
    assert_eq!(body["days"][1]["suggestions"][0], fallback::RAIN_TIP);
}

#[tokio::test]
async fn model_suggestions_are_returned() {
    let model = FixedReply(
        "```json\n{\"suggestions\": [\"Close blinds on the sunny side.\", \"Run the dishwasher at night.\", \"Use a ceiling fan instead of AC.\"]}\n```",
    );
    let server = server(TipsService::new(stub(), Some(Arc::new(model))));

    let response = server
        .post("/api/tips")
        .json(&json!({ "location": "Phoenix", "focuses": ["sprinklers"] }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    // Rainy day: the sprinklers tip leads and the model's last tip drops off
    let suggestions = body["days"][1]["suggestions"].as_array().unwrap();
    assert_eq!(suggestions.len(), 3);
    assert_eq!(suggestions[0], weatherwise::tips::focus::SPRINKLERS_FOCUS_TIP);
    assert_eq!(suggestions[1], "Close blinds on the sunny side.");
    assert_eq!(suggestions[2], "Run the dishwasher at night.");

    // Dry day: model tips untouched
    assert_eq!(body["days"][2]["suggestions"][0], "Close blinds on the sunny side.");
}

#[tokio::test]
async fn weather_failure_is_server_error() {
    let server = server(TipsService::new(Arc::new(DownForecast), None));

    let response = server
        .post("/api/tips")
        .json(&json!({ "location": "Phoenix" }))
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    response.assert_json(&json!({ "error": "Weather provider returned 401: API key is invalid." }));
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let server = server(TipsService::new(stub(), None));

    let response = server
        .post("/api/tips")
        .text("{ not json")
        .content_type("application/json")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let forecast = stub();
    let server = server(TipsService::new(forecast.clone(), None));

    let location = "x".repeat(web::MAX_BODY_BYTES + 1);
    let response = server
        .post("/api/tips")
        .json(&json!({ "location": location }))
        .await;
    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    assert!(forecast.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn health_reports_ok() {
    let server = server(TipsService::new(stub(), None));

    let response = server.get("/api/health").await;
    response.assert_status_ok();
    response.assert_json(&json!({ "status": "ok" }));
}
