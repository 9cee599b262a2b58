mod common;

use std::sync::{Arc, Mutex};

use adforge_core::scene::ProductProfile;
use adforge_providers::openai::{OpenAiClient, OpenAiConfig};
use adforge_providers::ProviderError;
use assert_matches::assert_matches;
use axum::body::Bytes;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

fn client(base: &str) -> OpenAiClient {
    OpenAiClient::new(OpenAiConfig {
        base_url: base.to_string(),
        ..OpenAiConfig::new("test-key")
    })
}

fn completion(content: &str) -> Json<Value> {
    Json(json!({ "choices": [{ "message": { "role": "assistant", "content": content } }] }))
}

/// Chat endpoint that fails for every model in `failing` with `status`.
fn chat_app(seen: Arc<Mutex<Vec<String>>>, failing: &'static [&'static str], status: StatusCode) -> Router {
    Router::new().route(
        "/chat/completions",
        post(move |Json(body): Json<Value>| {
            let seen = seen.clone();
            async move {
                let model = body["model"].as_str().unwrap_or_default().to_string();
                seen.lock().unwrap().push(model.clone());
                if failing.contains(&model.as_str()) {
                    (status, Json(json!({ "error": { "message": "upstream trouble" } })))
                } else {
                    (StatusCode::OK, completion(r#"{"ok":true}"#))
                }
            }
        }),
    )
}

// -- chat_json --

#[tokio::test]
async fn chat_falls_back_to_next_model() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let base = common::spawn(chat_app(seen.clone(), &["gpt-4o"], StatusCode::INTERNAL_SERVER_ERROR)).await;

    let content = client(&base).chat_json("system", "user").await.unwrap();

    assert_eq!(content, r#"{"ok":true}"#);
    assert_eq!(*seen.lock().unwrap(), vec!["gpt-4o", "gpt-4o-mini"]);
}

#[tokio::test]
async fn rate_limit_stops_fallback() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let all = &["gpt-4o", "gpt-4o-mini", "gpt-3.5-turbo"];
    let base = common::spawn(chat_app(seen.clone(), all, StatusCode::TOO_MANY_REQUESTS)).await;

    let err = client(&base).chat_json("system", "user").await.unwrap_err();

    assert_matches!(err, ProviderError::Api { status: 429, .. });
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn all_models_failing_returns_last_error() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let all = &["gpt-4o", "gpt-4o-mini", "gpt-3.5-turbo"];
    let base = common::spawn(chat_app(seen.clone(), all, StatusCode::BAD_GATEWAY)).await;

    let err = client(&base).chat_json("system", "user").await.unwrap_err();

    assert_matches!(err, ProviderError::Api { status: 502, .. });
    assert_eq!(seen.lock().unwrap().len(), 3);
}

// -- generate_copy --

#[tokio::test]
async fn copy_is_parsed_from_fenced_json() {
    let app = Router::new().route(
        "/chat/completions",
        post(|| async {
            completion("```json\n{\"headline\":\"Kaffee, der wach macht\",\"cta\":\"Jetzt testen\"}\n```")
        }),
    );
    let base = common::spawn(app).await;
    let prompt = adforge_core::brief::BriefPrompt {
        system: "system",
        user: "user".to_string(),
        style_id: "hero_product",
        image_prompt: String::new(),
        attempt_text_in_image: false,
    };

    let ad = client(&base).generate_copy(&prompt).await.unwrap();

    assert_eq!(ad.headline, "Kaffee, der wach macht");
    assert_eq!(ad.cta, "Jetzt testen");
}

// -- images --

#[tokio::test]
async fn generated_image_is_decoded_from_base64() {
    let app = Router::new().route(
        "/images/generations",
        post(|headers: HeaderMap, Json(body): Json<Value>| async move {
            assert_eq!(headers["authorization"], "Bearer test-key");
            assert_eq!(body["size"], "1024x1024");
            Json(json!({ "data": [{ "b64_json": "aGVsbG8=" }] }))
        }),
    );
    let base = common::spawn(app).await;

    let bytes = client(&base).generate_image("a studio backdrop").await.unwrap();

    assert_eq!(bytes, b"hello");
}

#[tokio::test]
async fn generated_image_url_is_downloaded() {
    let (listener, base) = common::bind().await;
    let image_url = format!("{base}/files/out.png");
    let app = Router::new()
        .route(
            "/images/generations",
            post(move || {
                let image_url = image_url.clone();
                async move { Json(json!({ "data": [{ "url": image_url }] })) }
            }),
        )
        .route("/files/out.png", get(|| async { b"png-bytes".to_vec() }));
    common::serve(listener, app);

    let bytes = client(&base).generate_image("prompt").await.unwrap();

    assert_eq!(bytes, b"png-bytes");
}

#[tokio::test]
async fn empty_image_list_is_no_image() {
    let app = Router::new().route("/images/generations", post(|| async { Json(json!({ "data": [] })) }));
    let base = common::spawn(app).await;

    let err = client(&base).generate_image("prompt").await.unwrap_err();

    assert_matches!(err, ProviderError::NoImage { provider: "OpenAI", .. });
}

#[tokio::test]
async fn edit_sends_multipart_form() {
    let app = Router::new().route(
        "/images/edits",
        post(|headers: HeaderMap| async move {
            let content_type = headers["content-type"].to_str().unwrap_or_default().to_string();
            if content_type.starts_with("multipart/form-data") {
                (StatusCode::OK, Json(json!({ "data": [{ "b64_json": "ZWRpdGVk" }] })))
            } else {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": content_type })))
            }
        }),
    );
    let base = common::spawn(app).await;

    let bytes = client(&base).edit_image(b"product", "place it on marble").await.unwrap();

    assert_eq!(bytes, b"edited");
}

#[tokio::test]
async fn edit_labels_jpeg_product_and_uses_supported_size() {
    let seen = Arc::new(Mutex::new(String::new()));
    let app = Router::new().route(
        "/images/edits",
        post({
            let seen = seen.clone();
            move |body: Bytes| async move {
                *seen.lock().unwrap() = String::from_utf8_lossy(&body).into_owned();
                Json(json!({ "data": [{ "b64_json": "ZWRpdGVk" }] }))
            }
        }),
    );
    let base = common::spawn(app).await;
    let jpeg = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

    client(&base).edit_image(&jpeg, "place it on marble").await.unwrap();

    let form = seen.lock().unwrap().clone();
    assert!(form.contains("filename=\"product.jpg\""), "{form}");
    assert!(form.contains("Content-Type: image/jpeg"), "{form}");
    assert!(form.contains("\r\n\r\n1024x1024\r\n"), "{form}");
    assert!(!form.contains("image/png"), "{form}");
}

// -- analyze_product --

#[tokio::test]
async fn analysis_failure_yields_default_profile() {
    let app = Router::new().route(
        "/chat/completions",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let base = common::spawn(app).await;

    let profile = client(&base).analyze_product(b"image").await;

    assert_eq!(profile, ProductProfile::default());
}

#[tokio::test]
async fn analysis_sends_jpeg_data_url() {
    let app = Router::new().route(
        "/chat/completions",
        post(|Json(body): Json<Value>| async move {
            let url = body["messages"][0]["content"][1]["image_url"]["url"]
                .as_str()
                .unwrap_or_default()
                .to_string();
            if url.starts_with("data:image/jpeg;base64,") {
                (StatusCode::OK, completion(r#"{"productType":"shoe"}"#))
            } else {
                (StatusCode::BAD_REQUEST, completion(&url))
            }
        }),
    );
    let base = common::spawn(app).await;

    let profile = client(&base)
        .try_analyze_product(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10])
        .await
        .unwrap();

    assert_eq!(profile.product_type, "shoe");
}

#[tokio::test]
async fn analysis_parses_vision_answer() {
    let app = Router::new().route(
        "/chat/completions",
        post(|| async { completion(r#"{"productType":"screenshot","isScreenContent":true,"mood":"tech"}"#) }),
    );
    let base = common::spawn(app).await;

    let profile = client(&base).try_analyze_product(b"image").await.unwrap();

    assert_eq!(profile.product_type, "screenshot");
    assert!(profile.wants_device());
    assert_eq!(profile.mood, "tech");
}
