mod common;

use actix_web::test;
use chrono::Duration;
use serde_json::json;
use serial_test::serial;
use uuid::Uuid;

use common::{high_season_date, today, TestApp, TEST_TOUR};

#[actix_rt::test]
#[serial]
async fn test_get_pricing_configuration() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/tours/{}/pricing", TEST_TOUR))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["tour_id"], TEST_TOUR);
    assert_eq!(body["base_pricing"]["base_price"], 2500.0);
    // A fresh tour already carries a year-long derived calendar.
    assert_eq!(body["price_calendar"].as_array().unwrap().len(), 365);
}

#[actix_rt::test]
#[serial]
async fn test_unknown_tour_returns_not_found() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get()
        .uri("/api/tours/no-such-tour/pricing")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_rt::test]
#[serial]
async fn test_quote_high_season_with_demand() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    // 2500 * 1.4 (high season) * 1.3 (80% occupancy) = 4550
    let req = test::TestRequest::post()
        .uri(&format!("/api/tours/{}/pricing/quote", TEST_TOUR))
        .set_json(&json!({
            "date": high_season_date().to_string(),
            "group_size": 1,
            "occupancy_percentage": 80.0
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["base_price"], 2500.0);
    assert_eq!(body["final_price"], 4550.0);
    let breakdown = body["breakdown"].as_array().unwrap();
    assert_eq!(breakdown.len(), 2);
    assert_eq!(breakdown[0]["amount"], 1000.0);
    // 3500 * 1.3 - 3500: the delta reconciles the trail to 4550.
    assert_eq!(breakdown[1]["amount"], 1050.0);
}

#[actix_rt::test]
#[serial]
async fn test_quote_group_discount_tier() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    // Off season, empty tour, party of ten: only the 7-12 tier fires.
    let req = test::TestRequest::post()
        .uri(&format!("/api/tours/{}/pricing/quote", TEST_TOUR))
        .set_json(&json!({
            "date": (today() + Duration::days(10)).to_string(),
            "group_size": 10,
            "occupancy_percentage": 0.0
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["final_price"], 2250.0);
    assert_eq!(body["breakdown"][0]["rule"], "Medium group");
}

#[actix_rt::test]
#[serial]
async fn test_quote_zero_group_size_rejected() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/tours/{}/pricing/quote", TEST_TOUR))
        .set_json(&json!({
            "date": today().to_string(),
            "group_size": 0
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_rt::test]
#[serial]
async fn test_invalid_seasonal_update_rejected_and_not_persisted() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/tours/{}/pricing/seasonal-periods", TEST_TOUR))
        .set_json(&json!([{
            "id": Uuid::new_v4(),
            "name": "Broken",
            "start_date": (today() + Duration::days(10)).to_string(),
            "end_date": today().to_string(),
            "price_multiplier": -2.0
        }]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: serde_json::Value = test::read_body_json(resp).await;
    // Both the inverted dates and the negative multiplier are reported.
    assert_eq!(body["issues"].as_array().unwrap().len(), 2);

    let config = test_app.store.get_pricing_configuration(TEST_TOUR).unwrap();
    assert_eq!(config.seasonal_periods.len(), 1);
    assert_eq!(config.seasonal_periods[0].name, "High season");
}

#[actix_rt::test]
#[serial]
async fn test_seasonal_update_reprices_calendar() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/tours/{}/pricing/seasonal-periods", TEST_TOUR))
        .set_json(&json!([{
            "id": Uuid::new_v4(),
            "name": "Flash season",
            "start_date": today().to_string(),
            "end_date": (today() + Duration::days(10)).to_string(),
            "price_multiplier": 1.5
        }]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/tours/{}/pricing/calendar?start={}&end={}",
            TEST_TOUR,
            today(),
            today()
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let entries: serde_json::Value = test::read_body_json(resp).await;
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["price"], 3750.0);
    assert_eq!(entries[0]["deposit_price"], 750.0);
}

#[actix_rt::test]
#[serial]
async fn test_blackout_period_gates_calendar() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let period_id = Uuid::new_v4();
    let req = test::TestRequest::put()
        .uri(&format!("/api/tours/{}/pricing/blackout-periods", TEST_TOUR))
        .set_json(&json!({
            "id": period_id,
            "name": "Trail closed",
            "start_date": (today() + Duration::days(3)).to_string(),
            "end_date": (today() + Duration::days(5)).to_string(),
            "blocks_all_tours": true,
            "tour_ids": [],
            "allow_manual_override": false
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    // An empty tour still shows blackout, never available.
    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/tours/{}/pricing/calendar?status=blackout",
            TEST_TOUR
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let entries: serde_json::Value = test::read_body_json(resp).await;
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 3);
    assert!(entries.iter().all(|e| e["occupancy_percentage"] == 0.0));

    let req = test::TestRequest::delete()
        .uri(&format!(
            "/api/tours/{}/pricing/blackout-periods/{}",
            TEST_TOUR, period_id
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/tours/{}/pricing/calendar?status=blackout",
            TEST_TOUR
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let entries: serde_json::Value = test::read_body_json(resp).await;
    assert!(entries.as_array().unwrap().is_empty());
}

#[actix_rt::test]
#[serial]
async fn test_capacity_validation() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/tours/{}/pricing/capacity", TEST_TOUR))
        .set_json(&json!({
            "id": Uuid::new_v4(),
            "tour_id": TEST_TOUR,
            "min_capacity": 30,
            "max_capacity": 10
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_rt::test]
#[serial]
async fn test_price_history_limit() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    for group_size in [1, 2, 3] {
        let req = test::TestRequest::post()
            .uri(&format!("/api/tours/{}/pricing/quote", TEST_TOUR))
            .set_json(&json!({
                "date": (today() + Duration::days(10)).to_string(),
                "group_size": group_size,
                "occupancy_percentage": 0.0
            }))
            .to_request();
        test::call_service(&app, req).await;
    }

    let req = test::TestRequest::get()
        .uri(&format!("/api/tours/{}/pricing/history?limit=2", TEST_TOUR))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let history: serde_json::Value = test::read_body_json(resp).await;
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 2);
    // Most recent first.
    assert_eq!(history[0]["group_size"], 3);
    assert_eq!(history[1]["group_size"], 2);
}

#[actix_rt::test]
#[serial]
async fn test_bulk_update_applies_to_calendar() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/pricing/bulk-updates")
        .set_json(&json!({
            "id": Uuid::new_v4(),
            "name": "Off-season promo",
            "tour_ids": [TEST_TOUR],
            "start_date": today().to_string(),
            "end_date": (today() + Duration::days(4)).to_string(),
            "operation": "multiply",
            "value": 1.1,
            "value_is_percentage": false,
            "status": "draft",
            "created_at": chrono::Utc::now().to_rfc3339()
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "applied");
    assert!(body["applied_at"].is_string());

    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/tours/{}/pricing/calendar?start={}&end={}",
            TEST_TOUR,
            today(),
            today()
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let entries: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(entries.as_array().unwrap()[0]["price"], 2750.0);
}

#[actix_rt::test]
#[serial]
async fn test_record_booking_updates_occupancy_and_status() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;
    let departure = today() + Duration::days(10);

    let req = test::TestRequest::post()
        .uri(&format!("/api/tours/{}/bookings", TEST_TOUR))
        .set_json(&json!({
            "departure_date": departure.to_string(),
            "seats": 15,
            "total_amount": 37500.0,
            "payment_type": "ADVANCE"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["payment"]["payable_amount"], 7500.0);
    assert_eq!(body["payment"]["remaining_balance"], 30000.0);
    assert_eq!(body["booking"]["status"], "CONFIRMED");

    // 15 of 20 seats booked: 75% occupancy, limited, priced into the 1.3x
    // demand bracket.
    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/tours/{}/pricing/calendar?start={}&end={}",
            TEST_TOUR, departure, departure
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let entries: serde_json::Value = test::read_body_json(resp).await;
    let entry = &entries.as_array().unwrap()[0];
    assert_eq!(entry["occupancy_percentage"], 75.0);
    assert_eq!(entry["status"], "limited");
    assert_eq!(entry["available_spots"], 5);
    assert_eq!(entry["price"], 3250.0);
}
