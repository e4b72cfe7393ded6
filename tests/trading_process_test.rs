mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, TestApp};
use serde_json::{json, Value};

async fn create_shipment(app: &TestApp, display_id: &str, client_name: &str) -> String {
    let response = app
        .request_authenticated(
            Method::POST,
            "/api/v1/shipments",
            Some(json!({
                "display_id": display_id,
                "client_id": "CL-ACME",
                "client_name": client_name,
                "client_email": "logistics@acme.example"
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string()
}

async fn add_step(app: &TestApp, shipment_id: &str) -> Value {
    let response = app
        .request_authenticated(
            Method::POST,
            &format!("/api/v1/shipments/{shipment_id}/steps"),
            Some(json!({})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].clone()
}

async fn toggle(app: &TestApp, shipment_id: &str, step: i32, action: &str) -> Value {
    let response = app
        .request_authenticated(
            Method::POST,
            &format!("/api/v1/shipments/{shipment_id}/steps/{step}/actions"),
            Some(json!({ "action": action })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].clone()
}

async fn list_steps(app: &TestApp, shipment_id: &str) -> Vec<Value> {
    let response = app
        .request_authenticated(
            Method::GET,
            &format!("/api/v1/shipments/{shipment_id}/steps"),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].as_array().unwrap().clone()
}

#[tokio::test]
async fn template_catalog_lists_the_seven_stages() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::GET, "/api/v1/process/steps", None, None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let templates = body["data"].as_array().unwrap();
    assert_eq!(templates.len(), 7);
    assert_eq!(templates[0]["title"], "Initial Inquiry");
    assert_eq!(templates[6]["title"], "Delivery");
    assert_eq!(templates[0]["default_actions"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn first_step_starts_current_with_template_actions() {
    let app = TestApp::new().await;
    let id = create_shipment(&app, "SHP-001", "Acme Co").await;

    let step = add_step(&app, &id).await;
    assert_eq!(step["step_number"], json!(1));
    assert_eq!(step["status"], "current");
    assert_eq!(step["title"], "Initial Inquiry");
    assert_eq!(step["required_actions"].as_array().unwrap().len(), 4);
    assert!(step["completed_actions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn toggling_actions_moves_through_partial_to_completed_and_advances() {
    let app = TestApp::new().await;
    let id = create_shipment(&app, "SHP-001", "Acme Co").await;
    add_step(&app, &id).await;

    let actions = [
        "Submit RFQ form",
        "Provide product specifications",
        "Indicate quantity required",
        "Specify delivery location",
    ];

    let after_one = toggle(&app, &id, 1, actions[0]).await;
    assert_eq!(after_one["status"], "partially_completed");

    let after_two = toggle(&app, &id, 1, actions[1]).await;
    assert_eq!(after_two["status"], "partially_completed");

    // Un-toggling goes back down
    let after_untoggle = toggle(&app, &id, 1, actions[1]).await;
    assert_eq!(after_untoggle["status"], "partially_completed");
    assert_eq!(after_untoggle["completed_actions"].as_array().unwrap().len(), 1);

    // Un-toggle the last one: zero done means current, not upcoming
    let after_zero = toggle(&app, &id, 1, actions[0]).await;
    assert_eq!(after_zero["status"], "current");

    for action in actions {
        toggle(&app, &id, 1, action).await;
    }

    let steps = list_steps(&app, &id).await;
    assert_eq!(steps.len(), 2, "completing step 1 opens step 2");
    assert_eq!(steps[0]["status"], "completed");
    assert_eq!(steps[1]["step_number"], json!(2));
    assert_eq!(steps[1]["status"], "current");
    assert_eq!(steps[1]["title"], "Quotation");
}

#[tokio::test]
async fn unknown_action_labels_are_rejected() {
    let app = TestApp::new().await;
    let id = create_shipment(&app, "SHP-001", "Acme Co").await;
    add_step(&app, &id).await;

    let response = app
        .request_authenticated(
            Method::POST,
            &format!("/api/v1/shipments/{id}/steps/1/actions"),
            Some(json!({ "action": "Paint the vessel" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Step is untouched
    let steps = list_steps(&app, &id).await;
    assert!(steps[0]["completed_actions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn force_complete_marks_everything_done_and_advances() {
    let app = TestApp::new().await;
    let id = create_shipment(&app, "SHP-001", "Acme Co").await;
    add_step(&app, &id).await;

    let response = app
        .request_authenticated(
            Method::POST,
            &format!("/api/v1/shipments/{id}/steps/1/complete"),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let step = body_json(response).await["data"].clone();
    assert_eq!(step["status"], "completed");
    assert_eq!(
        step["completed_actions"].as_array().unwrap().len(),
        step["required_actions"].as_array().unwrap().len()
    );

    let steps = list_steps(&app, &id).await;
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[1]["status"], "current");
}

#[tokio::test]
async fn adding_a_step_requires_the_previous_one_completed() {
    let app = TestApp::new().await;
    let id = create_shipment(&app, "SHP-001", "Acme Co").await;
    add_step(&app, &id).await;

    let blocked = app
        .request_authenticated(
            Method::POST,
            &format!("/api/v1/shipments/{id}/steps"),
            Some(json!({})),
        )
        .await;
    assert_eq!(blocked.status(), StatusCode::BAD_REQUEST);

    app.request_authenticated(
        Method::POST,
        &format!("/api/v1/shipments/{id}/steps/1/complete"),
        None,
    )
    .await;

    // Completion already opened step 2, so adding it again conflicts
    let duplicate = app
        .request_authenticated(
            Method::POST,
            &format!("/api/v1/shipments/{id}/steps"),
            Some(json!({ "step_number": 2 })),
        )
        .await;
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);

    let out_of_order = app
        .request_authenticated(
            Method::POST,
            &format!("/api/v1/shipments/{id}/steps"),
            Some(json!({ "step_number": 5 })),
        )
        .await;
    assert_eq!(out_of_order.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delayed_is_a_manual_overlay() {
    let app = TestApp::new().await;
    let id = create_shipment(&app, "SHP-001", "Acme Co").await;
    add_step(&app, &id).await;

    // Only a manual edit enters delayed
    let delayed = app
        .request_authenticated(
            Method::PUT,
            &format!("/api/v1/shipments/{id}/steps/1"),
            Some(json!({ "status": "delayed", "notes": "Customs hold" })),
        )
        .await;
    assert_eq!(delayed.status(), StatusCode::OK);
    let step = body_json(delayed).await["data"].clone();
    assert_eq!(step["status"], "delayed");
    assert_eq!(step["notes"], "Customs hold");

    // Toggles record progress but keep the overlay
    let toggled = toggle(&app, &id, 1, "Submit RFQ form").await;
    assert_eq!(toggled["status"], "delayed");
    assert_eq!(toggled["completed_actions"].as_array().unwrap().len(), 1);

    // No auto-advance happened while delayed
    assert_eq!(list_steps(&app, &id).await.len(), 1);

    // An edit without a status override keeps delayed
    let still_delayed = app
        .request_authenticated(
            Method::PUT,
            &format!("/api/v1/shipments/{id}/steps/1"),
            Some(json!({ "notes": "Escalated to broker" })),
        )
        .await;
    assert_eq!(body_json(still_delayed).await["data"]["status"], "delayed");

    // An explicit override leaves delayed; the derived state comes back
    let resumed = app
        .request_authenticated(
            Method::PUT,
            &format!("/api/v1/shipments/{id}/steps/1"),
            Some(json!({ "status": "partially_completed" })),
        )
        .await;
    assert_eq!(
        body_json(resumed).await["data"]["status"],
        "partially_completed"
    );
}

#[tokio::test]
async fn replacing_required_actions_intersects_completed_ones() {
    let app = TestApp::new().await;
    let id = create_shipment(&app, "SHP-001", "Acme Co").await;
    add_step(&app, &id).await;

    toggle(&app, &id, 1, "Submit RFQ form").await;
    toggle(&app, &id, 1, "Provide product specifications").await;

    let edited = app
        .request_authenticated(
            Method::PUT,
            &format!("/api/v1/shipments/{id}/steps/1"),
            Some(json!({
                "required_actions": ["Submit RFQ form", "Share import licence"]
            })),
        )
        .await;
    assert_eq!(edited.status(), StatusCode::OK);

    let step = body_json(edited).await["data"].clone();
    assert_eq!(
        step["completed_actions"],
        json!(["Submit RFQ form"]),
        "completed actions outside the new list are dropped"
    );
    assert_eq!(step["status"], "partially_completed");
}

#[tokio::test]
async fn empty_required_list_counts_as_completed() {
    let app = TestApp::new().await;
    let id = create_shipment(&app, "SHP-001", "Acme Co").await;
    add_step(&app, &id).await;

    let edited = app
        .request_authenticated(
            Method::PUT,
            &format!("/api/v1/shipments/{id}/steps/1"),
            Some(json!({ "required_actions": [] })),
        )
        .await;
    assert_eq!(body_json(edited).await["data"]["status"], "completed");
}

#[tokio::test]
async fn estimated_completion_date_can_be_set() {
    let app = TestApp::new().await;
    let id = create_shipment(&app, "SHP-001", "Acme Co").await;
    add_step(&app, &id).await;

    let edited = app
        .request_authenticated(
            Method::PUT,
            &format!("/api/v1/shipments/{id}/steps/1"),
            Some(json!({ "estimated_completion": "2026-09-15" })),
        )
        .await;
    assert_eq!(
        body_json(edited).await["data"]["estimated_completion"],
        "2026-09-15"
    );
}

#[tokio::test]
async fn process_runs_end_to_end_to_delivery() {
    let app = TestApp::new().await;
    let id = create_shipment(&app, "SHP-001", "Acme Co").await;
    add_step(&app, &id).await;

    for step_number in 1..=7 {
        let response = app
            .request_authenticated(
                Method::POST,
                &format!("/api/v1/shipments/{id}/steps/{step_number}/complete"),
                None,
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let steps = list_steps(&app, &id).await;
    assert_eq!(steps.len(), 7, "delivery has no successor to open");
    assert!(steps.iter().all(|s| s["status"] == "completed"));
}
