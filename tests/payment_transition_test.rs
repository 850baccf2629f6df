//! Payment transition integration tests for billtrack.
//!
//! Exercises the paid/unpaid state machine through PUT /invoices/:id and
//! checks that `paid` and `paid_date` always move together.

mod common;

use chrono::{DateTime, Utc};
use common::TestApp;
use reqwest::{Client, StatusCode};

async fn put_invoice(
    app: &TestApp,
    client: &Client,
    id: i32,
    amt: i64,
    paid: bool,
) -> (StatusCode, serde_json::Value) {
    let response = client
        .put(&format!("{}/invoices/{}", app.address, id))
        .json(&serde_json::json!({ "amt": amt, "paid": paid }))
        .send()
        .await
        .expect("Failed to execute request");
    let status = response.status();
    let body = response.json().await.unwrap_or(serde_json::Value::Null);
    (status, body)
}

#[tokio::test]
async fn marking_invoice_paid_sets_paid_date() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    app.seed_company(&client, "ibm", "IBM").await;
    let id = app.seed_invoice(&client, "ibm", 100).await;

    let (status, body) = put_invoice(&app, &client, id, 100, true).await;

    assert!(status.is_success());
    let invoice = &body["invoice"];
    assert_eq!(invoice["paid"], true);
    assert!(invoice["paid_date"].is_string());

    let add_date: DateTime<Utc> = invoice["add_date"]
        .as_str()
        .unwrap()
        .parse()
        .expect("add_date should be a timestamp");
    let paid_date: DateTime<Utc> = invoice["paid_date"]
        .as_str()
        .unwrap()
        .parse()
        .expect("paid_date should be a timestamp");
    assert!(paid_date >= add_date);

    app.cleanup().await;
}

#[tokio::test]
async fn marking_paid_invoice_unpaid_clears_paid_date() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    app.seed_company(&client, "ibm", "IBM").await;
    let id = app.seed_invoice(&client, "ibm", 100).await;

    let (status, _) = put_invoice(&app, &client, id, 100, true).await;
    assert!(status.is_success());

    let (status, body) = put_invoice(&app, &client, id, 100, false).await;

    assert!(status.is_success());
    assert_eq!(body["invoice"]["paid"], false);
    assert!(body["invoice"]["paid_date"].is_null());

    app.cleanup().await;
}

#[tokio::test]
async fn amount_change_preserves_paid_date_exactly() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    app.seed_company(&client, "ibm", "IBM").await;
    let id = app.seed_invoice(&client, "ibm", 100).await;

    let (status, body) = put_invoice(&app, &client, id, 100, true).await;
    assert!(status.is_success());
    let original_paid_date = body["invoice"]["paid_date"].clone();
    assert!(original_paid_date.is_string());

    // Change the amount without touching the paid flag
    let (status, body) = put_invoice(&app, &client, id, 175, true).await;

    assert!(status.is_success());
    assert_eq!(body["invoice"]["amt"], "175");
    assert_eq!(body["invoice"]["paid"], true);
    assert_eq!(body["invoice"]["paid_date"], original_paid_date);

    app.cleanup().await;
}

#[tokio::test]
async fn unpaid_invoice_stays_unpaid_without_paid_date() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    app.seed_company(&client, "ibm", "IBM").await;
    let id = app.seed_invoice(&client, "ibm", 100).await;

    let (status, body) = put_invoice(&app, &client, id, 150, false).await;

    assert!(status.is_success());
    assert_eq!(body["invoice"]["paid"], false);
    assert!(body["invoice"]["paid_date"].is_null());

    app.cleanup().await;
}

#[tokio::test]
async fn updating_missing_invoice_returns_not_found() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let (status, _) = put_invoice(&app, &client, 999999, 100, true).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    app.cleanup().await;
}

#[tokio::test]
async fn update_with_missing_paid_flag_is_rejected() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    app.seed_company(&client, "ibm", "IBM").await;
    let id = app.seed_invoice(&client, "ibm", 100).await;

    let response = client
        .put(&format!("{}/invoices/{}", app.address, id))
        .json(&serde_json::json!({ "amt": 100 }))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_client_error());

    app.cleanup().await;
}

#[tokio::test]
async fn update_with_negative_amount_is_rejected() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    app.seed_company(&client, "ibm", "IBM").await;
    let id = app.seed_invoice(&client, "ibm", 100).await;

    let (status, _) = put_invoice(&app, &client, id, -1, true).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    app.cleanup().await;
}

#[tokio::test]
async fn full_invoice_lifecycle() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    // Create company
    let response = client
        .post(&format!("{}/companies", app.address))
        .json(&serde_json::json!({
            "code": "ibm",
            "name": "IBM",
            "description": "Big Blue"
        }))
        .send()
        .await
        .expect("Failed to create company");
    assert_eq!(response.status(), StatusCode::CREATED);

    // Create invoice
    let id = app.seed_invoice(&client, "ibm", 100).await;

    // Mark it paid
    let (status, body) = put_invoice(&app, &client, id, 100, true).await;
    assert!(status.is_success());
    assert_eq!(body["invoice"]["paid"], true);

    // Fetch it back
    let response = client
        .get(&format!("{}/invoices/{}", app.address, id))
        .send()
        .await
        .expect("Failed to fetch invoice");
    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    let invoice = &body["invoice"];

    assert_eq!(invoice["paid"], true);
    assert_eq!(invoice["amt"], "100");
    assert_eq!(invoice["company"]["code"], "ibm");

    let add_date: DateTime<Utc> = invoice["add_date"].as_str().unwrap().parse().unwrap();
    let paid_date: DateTime<Utc> = invoice["paid_date"].as_str().unwrap().parse().unwrap();
    assert!(paid_date >= add_date);

    app.cleanup().await;
}
