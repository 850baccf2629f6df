//! Invoice CRUD integration tests for billtrack.

mod common;

use common::TestApp;
use reqwest::{Client, StatusCode};

#[tokio::test]
async fn create_invoice_starts_unpaid() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    app.seed_company(&client, "ibm", "IBM").await;

    let response = client
        .post(&format!("{}/invoices", app.address))
        .json(&serde_json::json!({ "comp_code": "ibm", "amt": 500 }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    let invoice = &body["invoice"];
    assert_eq!(invoice["comp_code"], "ibm");
    assert_eq!(invoice["amt"], "500");
    assert_eq!(invoice["paid"], false);
    assert!(invoice["paid_date"].is_null());
    assert!(invoice["add_date"].is_string());

    app.cleanup().await;
}

#[tokio::test]
async fn create_invoice_for_unknown_company_returns_conflict() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .post(&format!("{}/invoices", app.address))
        .json(&serde_json::json!({ "comp_code": "ghost", "amt": 100 }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CONFLICT);

    app.cleanup().await;
}

#[tokio::test]
async fn create_invoice_with_negative_amount_is_rejected() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    app.seed_company(&client, "ibm", "IBM").await;

    let response = client
        .post(&format!("{}/invoices", app.address))
        .json(&serde_json::json!({ "comp_code": "ibm", "amt": -5 }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    app.cleanup().await;
}

#[tokio::test]
async fn create_invoice_with_non_numeric_amount_is_rejected() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    app.seed_company(&client, "ibm", "IBM").await;

    let response = client
        .post(&format!("{}/invoices", app.address))
        .json(&serde_json::json!({ "comp_code": "ibm", "amt": "lots" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_client_error());

    app.cleanup().await;
}

#[tokio::test]
async fn list_invoices_is_ordered_by_id() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    app.seed_company(&client, "ibm", "IBM").await;
    app.seed_company(&client, "apple", "Apple").await;
    let first = app.seed_invoice(&client, "ibm", 100).await;
    let second = app.seed_invoice(&client, "apple", 200).await;
    let third = app.seed_invoice(&client, "ibm", 300).await;

    let response = client
        .get(&format!("{}/invoices", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    let ids: Vec<i64> = body["invoices"]
        .as_array()
        .expect("invoices should be an array")
        .iter()
        .map(|inv| inv["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![first as i64, second as i64, third as i64]);

    app.cleanup().await;
}

#[tokio::test]
async fn get_invoice_includes_its_company() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    app.seed_company(&client, "ibm", "IBM").await;
    let id = app.seed_invoice(&client, "ibm", 250).await;

    let response = client
        .get(&format!("{}/invoices/{}", app.address, id))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    let invoice = &body["invoice"];
    assert_eq!(invoice["id"].as_i64(), Some(id as i64));
    assert_eq!(invoice["amt"], "250");
    assert_eq!(invoice["company"]["code"], "ibm");
    assert_eq!(invoice["company"]["name"], "IBM");

    app.cleanup().await;
}

#[tokio::test]
async fn get_missing_invoice_returns_not_found() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .get(&format!("{}/invoices/999999", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    app.cleanup().await;
}

#[tokio::test]
async fn delete_invoice_works() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    app.seed_company(&client, "ibm", "IBM").await;
    let id = app.seed_invoice(&client, "ibm", 100).await;

    let response = client
        .delete(&format!("{}/invoices/{}", app.address, id))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "deleted");

    let response = client
        .get(&format!("{}/invoices/{}", app.address, id))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    app.cleanup().await;
}

#[tokio::test]
async fn delete_missing_invoice_returns_not_found() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .delete(&format!("{}/invoices/999999", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    app.cleanup().await;
}
