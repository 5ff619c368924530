//! GraphQL adapter integration tests for gateway-service.

mod common;

use chrono::{DateTime, Utc};
use common::TestApp;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

async fn graphql(app: &TestApp, query: &str) -> serde_json::Value {
    app.client
        .post(format!("{}/graphql", app.address))
        .json(&json!({ "query": query }))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Response was not JSON")
}

#[tokio::test]
async fn get_invoice_returns_invoice() {
    let app = TestApp::spawn().await;
    app.stub_check("zoi-1", "tok2").await;

    let body = graphql(
        &app,
        r#"{ getInvoice(zoi: "zoi-1", token: "tok") { zoi tax amount date token } }"#,
    )
    .await;

    let invoice = &body["data"]["getInvoice"];
    assert_eq!(invoice["zoi"], "zoi-1");
    assert_eq!(invoice["tax"], "22.00");
    assert_eq!(invoice["amount"], "122.00");
    assert_eq!(invoice["date"], "2023-03-20T15:03:05.000Z");
    assert_eq!(invoice["token"], "tok2");
}

#[tokio::test]
async fn get_invoices_by_zois_preserves_input_order() {
    let app = TestApp::spawn().await;
    app.stub_check("z1", "t1").await;
    app.stub_check("z2", "t2").await;
    app.stub_check("z3", "t3").await;

    let body = graphql(
        &app,
        r#"{ getInvoicesByZois(zois: ["z1", "z2", "z3"], token: "tok") { zoi token } }"#,
    )
    .await;

    let invoices = body["data"]["getInvoicesByZois"]
        .as_array()
        .expect("Expected a list of invoices");
    assert_eq!(invoices.len(), 3);
    assert_eq!(invoices[0]["zoi"], "z1");
    assert_eq!(invoices[1]["zoi"], "z2");
    assert_eq!(invoices[2]["zoi"], "z3");
    assert_eq!(invoices[0]["token"], "t1");
    assert_eq!(invoices[2]["token"], "t3");
}

#[tokio::test]
async fn get_invoices_by_zois_aborts_on_first_failure() {
    let app = TestApp::spawn().await;
    app.stub_check("z1", "t1").await;
    Mock::given(method("GET"))
        .and(path("/check-invoice"))
        .and(query_param("zoi", "z2"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .mount(&app.furs)
        .await;

    let body = graphql(
        &app,
        r#"{ getInvoicesByZois(zois: ["z1", "z2", "z3"], token: "tok") { zoi } }"#,
    )
    .await;

    let errors = body["errors"].as_array().expect("Expected errors");
    assert!(!errors.is_empty());
    assert!(body["data"].is_null());

    // The failing call stops the batch; z3 is never looked up.
    let lookups = app.furs.received_requests().await.unwrap();
    assert_eq!(lookups.len(), 2);
}

#[tokio::test]
async fn rest_and_graphql_verification_agree() {
    let app = TestApp::spawn().await;
    app.stub_check("zoi-1", "tok2").await;

    let rest: serde_json::Value = app
        .client
        .get(format!("{}/api/invoice?zoi=zoi-1&token=tok", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let body = graphql(
        &app,
        r#"{ getInvoice(zoi: "zoi-1", token: "tok") { tax amount date token } }"#,
    )
    .await;
    let gql = &body["data"]["getInvoice"];

    assert_eq!(rest["tax"], gql["tax"]);
    assert_eq!(rest["amount"], gql["amount"]);
    assert_eq!(rest["token"], gql["token"]);

    // Same instant, different textual precision.
    let rest_date: DateTime<Utc> = rest["date"].as_str().unwrap().parse().unwrap();
    let gql_date: DateTime<Utc> = gql["date"].as_str().unwrap().parse().unwrap();
    assert_eq!(rest_date, gql_date);
}

#[tokio::test]
async fn playground_serves_html() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(format!("{}/graphql-playground", app.address))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("/graphql"));
}
