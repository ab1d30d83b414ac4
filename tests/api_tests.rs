//! Route-level tests driving the router in-process

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use lostfound_server::{build_state, create_router, AppConfig};

const BOUNDARY: &str = "lostfound-test-boundary";

struct TestApp {
    router: Router,
    dir: TempDir,
    cookie: Option<String>,
}

struct TestResponse {
    status: StatusCode,
    location: Option<String>,
    body: String,
}

impl TestResponse {
    fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("response is not JSON")
    }
}

impl TestApp {
    async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    async fn with_config(adjust: impl FnOnce(&mut AppConfig)) -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("users.json"),
            json!([
                {"id": 1, "student_id": "2021-0001", "role": "Admin"},
                {"id": 2, "student_id": "2021-0002"}
            ])
            .to_string(),
        )
        .unwrap();

        let mut config = AppConfig::with_data_dir(dir.path());
        adjust(&mut config);
        let state = build_state(config).await.unwrap();

        Self {
            router: create_router(state),
            dir,
            cookie: None,
        }
    }

    async fn send(&mut self, mut request: Request<Body>) -> TestResponse {
        if let Some(cookie) = &self.cookie {
            request
                .headers_mut()
                .insert(header::COOKIE, cookie.parse().unwrap());
        }

        let response = self.router.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
            // Removal cookies carry an empty value
            if pair.ends_with('=') {
                self.cookie = None;
            } else {
                self.cookie = Some(pair.to_string());
            }
        }

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = response.into_body().collect().await.unwrap().to_bytes();

        TestResponse {
            status,
            location,
            body: String::from_utf8_lossy(&bytes).to_string(),
        }
    }

    async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    async fn post_form(&mut self, uri: &str, body: &str) -> TestResponse {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn post_multipart(
        &mut self,
        uri: &str,
        fields: &[(&str, &str)],
        file: Option<(&str, &str, &[u8])>,
    ) -> TestResponse {
        let request = Request::post(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(multipart_body(fields, file)))
            .unwrap();
        self.send(request).await
    }

    async fn login(&mut self, student_id: &str) -> TestResponse {
        self.post_form("/login", &format!("student_id={}", student_id))
            .await
    }

    async fn add_item(&mut self, name: &str, category: &str) -> TestResponse {
        self.post_multipart(
            "/add",
            &[("name", name), ("description", "found in the library"), ("category", category)],
            None,
        )
        .await
    }

    fn stored_items(&self) -> Value {
        let raw = std::fs::read_to_string(self.dir.path().join("items.json")).unwrap();
        serde_json::from_str(&raw).unwrap()
    }
}

fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    if let Some((name, file_name, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                BOUNDARY, name, file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn claim_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        ("staff", "Maria Santos"),
        ("claimer_name", "Juan Dela Cruz"),
        ("college", "CAS"),
        ("course", "BS Biology"),
        ("year_section", "2-B"),
    ]
}

#[tokio::test]
async fn test_health_check() {
    let mut app = TestApp::new().await;

    let response = app.get("/health").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["status"], "healthy");

    let response = app.get("/ready").await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_protected_routes_redirect_to_login() {
    let mut app = TestApp::new().await;

    for uri in ["/", "/add", "/staff", "/claim/1", "/admin", "/admin/items"] {
        let response = app.get(uri).await;
        assert_eq!(response.status, StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(response.location.as_deref(), Some("/login"), "{uri}");
    }
}

#[tokio::test]
async fn test_unknown_student_stays_on_login() {
    let mut app = TestApp::new().await;

    let response = app.login("9999-9999").await;
    assert_eq!(response.status, StatusCode::OK);

    let body = response.json();
    assert_eq!(body["view"], "login");
    assert_eq!(body["flashes"][0]["category"], "danger");
    assert_eq!(body["flashes"][0]["message"], "Student not found!");
    assert!(app.cookie.is_none());
}

#[tokio::test]
async fn test_login_then_index() {
    let mut app = TestApp::new().await;

    let response = app.login("2021-0002").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/"));
    assert!(app.cookie.is_some());

    let body = app.get("/").await.json();
    assert_eq!(body["view"], "index");
    assert_eq!(body["flashes"][0]["message"], "Login successful!");
    assert_eq!(body["context"]["is_admin"], false);
    assert_eq!(body["context"]["items"], json!([]));

    // Flashes are shown once
    let body = app.get("/").await.json();
    assert_eq!(body["flashes"], json!([]));
}

#[tokio::test]
async fn test_add_and_filter_items() {
    let mut app = TestApp::new().await;
    app.login("2021-0002").await;

    let response = app.add_item("Black Umbrella", "Accessories").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/"));
    app.add_item("Calculus Book", "Books").await;
    app.add_item("Blue Pen", "").await;

    let stored = app.stored_items();
    assert_eq!(stored[0]["id"], 1);
    assert_eq!(stored[0]["status"], "Unclaimed");
    assert_eq!(stored[2]["id"], 3);

    let body = app.get("/?q=umbrella").await.json();
    let items = body["context"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "Black Umbrella");
    assert_eq!(items[0]["time_stored"], "Just now");
    assert_eq!(body["context"]["categories"], json!(["Accessories", "Books"]));

    let body = app.get("/?category=Books").await.json();
    let items = body["context"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "Calculus Book");
}

#[tokio::test]
async fn test_update_item() {
    let mut app = TestApp::new().await;
    app.login("2021-0002").await;
    app.add_item("Umbrela", "Accessories").await;

    let body = app.get("/update/1").await.json();
    assert_eq!(body["view"], "update_item");
    assert_eq!(body["context"]["item"]["name"], "Umbrela");

    let response = app
        .post_multipart(
            "/update/1",
            &[("name", "Umbrella"), ("description", "black, folding"), ("category", "Accessories")],
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);

    let body = app.get("/").await.json();
    assert_eq!(body["flashes"][0]["message"], "Item updated successfully!");
    assert_eq!(body["context"]["items"][0]["name"], "Umbrella");
}

#[tokio::test]
async fn test_missing_item_is_404() {
    let mut app = TestApp::new().await;
    app.login("2021-0002").await;

    assert_eq!(app.get("/update/42").await.status, StatusCode::NOT_FOUND);
    assert_eq!(app.get("/claim/42").await.status, StatusCode::NOT_FOUND);

    let response = app.post_multipart("/claim/42", &claim_fields(), None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body, "Item not found");
}

#[tokio::test]
async fn test_claim_flow() {
    let mut app = TestApp::new().await;
    app.login("2021-0002").await;
    app.add_item("Wallet", "Personal").await;
    app.post_form("/staff/add", "name=Maria+Santos&role=Staff").await;

    let body = app.get("/claim/1").await.json();
    assert_eq!(body["view"], "claim_item");
    assert_eq!(body["context"]["staff_list"][0]["name"], "Maria Santos");

    let response = app
        .post_multipart("/claim/1", &claim_fields(), Some(("proof", "id card.png", b"png-bytes")))
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/"));

    let item = &app.stored_items()[0];
    assert_eq!(item["status"], "Claimed");
    assert_eq!(item["assisting_staff"], "Maria Santos");
    assert_eq!(item["claimer_name"], "Juan Dela Cruz");
    assert_eq!(item["year_section"], "2-B");
    assert!(item["claimed_at"].is_string());
    assert!(item["proof_uploaded_at"].is_string());

    let proof = item["proof_image"].as_str().unwrap();
    assert!(proof.ends_with("_id_card.png"));
    assert!(app.dir.path().join("uploads").join(proof).exists());

    let response = app.get(&format!("/uploads/{}", proof)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "png-bytes");
}

#[tokio::test]
async fn test_disallowed_upload_is_ignored() {
    let mut app = TestApp::new().await;
    app.login("2021-0002").await;

    let response = app
        .post_multipart(
            "/add",
            &[("name", "Keys"), ("description", "three keys")],
            Some(("image", "notes.txt", b"not an image")),
        )
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);

    let item = &app.stored_items()[0];
    assert_eq!(item["name"], "Keys");
    assert!(item.get("image").map_or(true, Value::is_null));
    assert_eq!(
        std::fs::read_dir(app.dir.path().join("uploads")).unwrap().count(),
        0
    );
}

#[tokio::test]
async fn test_delete_item() {
    let mut app = TestApp::new().await;
    app.login("2021-0002").await;
    app.add_item("Umbrella", "Accessories").await;
    app.add_item("Book", "Books").await;

    let response = app.get("/delete/1").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/"));

    // Unknown ids are a no-op
    assert_eq!(app.get("/delete/99").await.status, StatusCode::SEE_OTHER);

    let stored = app.stored_items();
    assert_eq!(stored.as_array().unwrap().len(), 1);
    assert_eq!(stored[0]["id"], 2);

    // Ids are never reused after a delete
    app.get("/delete/2").await;
    app.add_item("Cap", "Accessories").await;
    assert_eq!(app.stored_items()[0]["id"], 3);
}

#[tokio::test]
async fn test_staff_roster() {
    let mut app = TestApp::new().await;
    app.login("2021-0002").await;

    let response = app.post_form("/staff/add", "name=Ana&role=Admin").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/staff"));
    app.post_form("/staff/add", "name=Ben&role=Staff").await;

    let body = app.get("/staff").await.json();
    assert_eq!(body["view"], "staff");
    assert_eq!(body["context"]["staff"].as_array().unwrap().len(), 2);

    let body = app.get("/staff?role=admin").await.json();
    let staff = body["context"]["staff"].as_array().unwrap();
    assert_eq!(staff.len(), 1);
    assert_eq!(staff[0]["name"], "Ana");
    assert_eq!(body["context"]["selected_role"], "admin");

    let response = app.post_form("/staff/add", "name=&role=Staff").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_registration_is_disabled() {
    let mut app = TestApp::new().await;

    let response = app.get("/register").await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert!(response.body.starts_with("Registration is disabled"));

    let response = app.post_form("/register", "student_id=1").await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_panel_requires_admin_role() {
    let mut app = TestApp::new().await;
    app.login("2021-0002").await;

    let response = app.get("/admin").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/"));

    let body = app.get("/").await.json();
    let flashes = body["flashes"].as_array().unwrap();
    assert_eq!(flashes.last().unwrap()["category"], "error");
    assert_eq!(flashes.last().unwrap()["message"], "Admin access required.");

    // Any identified user may see the raw listing
    let body = app.get("/admin/items").await.json();
    assert_eq!(body["view"], "items");
}

#[tokio::test]
async fn test_admin_panel_stats() {
    let mut app = TestApp::new().await;
    app.login("2021-0001").await;
    app.add_item("Umbrella", "Accessories").await;
    app.add_item("Pen", "").await;
    app.add_item("Cap", "Accessories").await;
    app.post_multipart("/claim/3", &claim_fields(), None).await;

    let body = app.get("/admin").await.json();
    assert_eq!(body["view"], "admin_panel");

    let stats = &body["context"]["stats"];
    assert_eq!(stats["total_items"], 3);
    assert_eq!(stats["claimed_items"], 1);
    assert_eq!(stats["unclaimed_items"], 2);
    assert_eq!(stats["total_staff"], 0);
    assert_eq!(stats["total_users"], 2);
    assert_eq!(
        stats["items_by_category"],
        json!({"Accessories": 2, "Uncategorized": 1})
    );
}

#[tokio::test]
async fn test_logout_clears_session() {
    let mut app = TestApp::new().await;
    app.login("2021-0001").await;
    app.get("/").await;

    let response = app.get("/logout").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/login"));

    let body = app.get("/login").await.json();
    assert_eq!(body["flashes"][0]["message"], "You have been logged out.");

    let response = app.get("/").await;
    assert_eq!(response.location.as_deref(), Some("/login"));
}

#[tokio::test]
async fn test_missing_url_encoded_fields_are_bad_requests() {
    let mut app = TestApp::new().await;

    let response = app.post_form("/login", "").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body.contains("student_id"));

    app.login("2021-0002").await;
    let response = app.post_form("/staff/add", "name=Ana").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body.contains("role"));

    let body = app.get("/staff").await.json();
    assert_eq!(body["context"]["staff"], json!([]));
}

#[tokio::test]
async fn test_update_image_only_changes_on_valid_upload() {
    let mut app = TestApp::new().await;
    app.login("2021-0002").await;
    app.post_multipart(
        "/add",
        &[("name", "Keys"), ("description", "on a red lanyard")],
        Some(("image", "keys.png", b"first")),
    )
    .await;
    let first = app.stored_items()[0]["image"].as_str().unwrap().to_string();

    let fields = [("name", "Keys"), ("description", "on a red lanyard"), ("category", "Keys")];
    let response = app
        .post_multipart("/update/1", &fields, Some(("image", "notes.txt", b"text")))
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(app.stored_items()[0]["image"], first.as_str());

    app.post_multipart("/update/1", &fields, Some(("image", "lanyard.png", b"second")))
        .await;
    let second = app.stored_items()[0]["image"].as_str().unwrap().to_string();
    assert_ne!(second, first);
    assert!(second.ends_with("_lanyard.png"));
    assert_eq!(app.get(&format!("/uploads/{}", second)).await.body, "second");
}

#[tokio::test]
async fn test_oversized_upload_is_rejected() {
    let mut app = TestApp::with_config(|config| config.uploads.max_body_bytes = 1024).await;
    app.login("2021-0002").await;

    let image = vec![0u8; 8 * 1024];
    let response = app
        .post_multipart(
            "/add",
            &[("name", "Bag"), ("description", "blue backpack")],
            Some(("image", "bag.png", image.as_slice())),
        )
        .await;

    assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(!app.dir.path().join("items.json").exists());
}
