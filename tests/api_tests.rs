//! API integration tests, run in-process against the in-memory store

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use catalog_server::{api, config::AppConfig, store::MemoryStore, AppState};

fn app() -> Router {
    api::router(AppState::new(AppConfig::default(), Arc::new(MemoryStore::new())))
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(format!("/api/v1{}", uri));
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create(app: &Router, kind: &str, body: Value) -> Value {
    let (status, created) = call(app, "POST", &format!("/catalog/{}/create", kind), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{}", created);
    created
}

fn id(value: &Value) -> &str {
    value["id"].as_str().unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = app();
    let (status, body) = call(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = call(&app, "GET", "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_author_without_death_date() {
    let app = app();
    let author = create(
        &app,
        "author",
        json!({ "first_name": "Jane", "family_name": "Austen", "date_of_birth": "1775-12-16" }),
    )
    .await;

    let (status, detail) = call(&app, "GET", &format!("/catalog/author/{}", id(&author)), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["name"], "Austen, Jane");
    assert!(detail["author"]["date_of_death"].is_null());
    assert_eq!(detail["books"], json!([]));
}

#[tokio::test]
async fn test_genres_listed_by_name() {
    let app = app();
    for name in ["Romance", "Action", "Biography"] {
        create(&app, "genre", json!({ "name": name })).await;
    }

    let (status, genres) = call(&app, "GET", "/catalog/genres", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = genres.as_array().unwrap().iter().map(|g| g["name"].clone()).collect();
    assert_eq!(names, vec![json!("Action"), json!("Biography"), json!("Romance")]);
}

#[tokio::test]
async fn test_duplicate_genre_is_conflict() {
    let app = app();
    let first = create(&app, "genre", json!({ "name": "Poetry" })).await;

    let (status, body) = call(&app, "POST", "/catalog/genre/create", Some(json!({ "name": "Poetry" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["details"]["id"], first["id"]);
}

#[tokio::test]
async fn test_delete_unreferenced_then_not_found() {
    let app = app();
    let genre = create(&app, "genre", json!({ "name": "Satire" })).await;
    let path = format!("/catalog/genre/{}", id(&genre));

    let (status, preview) = call(&app, "GET", &format!("{}/delete", path), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(preview["blocked"], false);

    let (status, deleted) = call(&app, "POST", &format!("{}/delete", path), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted, genre);

    let (status, body) = call(&app, "GET", &path, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], format!("Genre {} not found", id(&genre)));
}

#[tokio::test]
async fn test_referenced_delete_is_refused() {
    let app = app();
    let author = create(&app, "author", json!({ "first_name": "Jane", "family_name": "Austen" })).await;
    let genre = create(&app, "genre", json!({ "name": "Romance" })).await;
    for title in ["Emma", "Persuasion"] {
        create(
            &app,
            "book",
            json!({
                "title": title,
                "author": id(&author),
                "summary": "Courtship.",
                "isbn": "9780141439587",
                "genre": id(&genre),
            }),
        )
        .await;
    }

    let path = format!("/catalog/genre/{}", id(&genre));
    let (status, body) = call(&app, "POST", &format!("{}/delete", path), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "2 books still reference this genre");
    assert_eq!(body["details"]["dependents"].as_array().unwrap().len(), 2);
    assert_eq!(body["details"]["entity"], genre);

    let (status, _) = call(&app, "GET", &path, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call(&app, "POST", &format!("/catalog/author/{}/delete", id(&author)), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_update_book_keeps_identifier() {
    let app = app();
    let author = create(&app, "author", json!({ "first_name": "Jane", "family_name": "Austen" })).await;
    let book = json!({
        "title": "Emma",
        "author": id(&author),
        "summary": "Matchmaking.",
        "isbn": "9780141439587",
    });
    let b1 = create(&app, "book", book.clone()).await;

    let mut renamed = book;
    renamed["title"] = json!("Emma: A Novel");
    let path = format!("/catalog/book/{}", id(&b1));
    let (status, updated) = call(&app, "POST", &format!("{}/update", path), Some(renamed)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], b1["id"]);

    let (_, detail) = call(&app, "GET", &path, None).await;
    assert_eq!(detail["book"]["title"], "Emma: A Novel");
    assert_eq!(detail["author"]["family_name"], "Austen");
}

#[tokio::test]
async fn test_book_update_form_marks_genres() {
    let app = app();
    let author = create(&app, "author", json!({ "first_name": "Jane", "family_name": "Austen" })).await;
    let g1 = create(&app, "genre", json!({ "name": "Classic" })).await;
    let _g2 = create(&app, "genre", json!({ "name": "Mystery" })).await;
    let g3 = create(&app, "genre", json!({ "name": "Romance" })).await;
    let book = create(
        &app,
        "book",
        json!({
            "title": "Emma",
            "author": id(&author),
            "summary": "Matchmaking.",
            "isbn": "9780141439587",
            "genre": [id(&g1), id(&g3)],
        }),
    )
    .await;

    let (status, form) = call(&app, "GET", &format!("/catalog/book/{}/update", id(&book)), None).await;
    assert_eq!(status, StatusCode::OK);
    let marks: Vec<_> = form["genres"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| (g["name"].as_str().unwrap(), g["checked"].as_bool().unwrap()))
        .collect();
    assert_eq!(marks, vec![("Classic", true), ("Mystery", false), ("Romance", true)]);
}

#[tokio::test]
async fn test_invalid_book_returns_form_options() {
    let app = app();
    create(&app, "author", json!({ "first_name": "Jane", "family_name": "Austen" })).await;
    create(&app, "genre", json!({ "name": "Romance" })).await;

    let (status, body) = call(&app, "POST", "/catalog/book/create", Some(json!({ "title": "Emma" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<_> = body["details"]["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["author", "isbn", "summary"]);
    assert_eq!(body["details"]["authors"].as_array().unwrap().len(), 1);
    assert_eq!(body["details"]["genres"][0]["checked"], false);
}

#[tokio::test]
async fn test_dashboard_counts() {
    let app = app();
    let author = create(&app, "author", json!({ "first_name": "Jane", "family_name": "Austen" })).await;
    let mut books = Vec::new();
    for title in ["Emma", "Persuasion", "Sanditon"] {
        books.push(
            create(
                &app,
                "book",
                json!({ "title": title, "author": id(&author), "summary": "s", "isbn": "i" }),
            )
            .await,
        );
    }
    for status in ["Available", "Available", "Loaned"] {
        create(
            &app,
            "bookinstance",
            json!({ "book": id(&books[0]), "imprint": "Penguin", "status": status }),
        )
        .await;
    }

    let (status, counts) = call(&app, "GET", "/catalog", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(counts["book_count"], 3);
    assert_eq!(counts["book_instance_count"], 3);
    assert_eq!(counts["book_instance_available_count"], 2);
    assert_eq!(counts["author_count"], 1);
    assert_eq!(counts["genre_count"], 0);
}

#[tokio::test]
async fn test_book_instance_pages() {
    let app = app();
    let author = create(&app, "author", json!({ "first_name": "Jane", "family_name": "Austen" })).await;
    let book = create(
        &app,
        "book",
        json!({ "title": "Emma", "author": id(&author), "summary": "s", "isbn": "i" }),
    )
    .await;
    let copy = create(&app, "bookinstance", json!({ "book": id(&book), "imprint": "Penguin" })).await;
    assert_eq!(copy["status"], "Maintenance");

    let (_, form) = call(&app, "GET", "/catalog/bookinstance/create", None).await;
    assert_eq!(form["books"], json!([{ "id": book["id"], "title": "Emma" }]));

    let (_, listed) = call(&app, "GET", "/catalog/bookinstances", None).await;
    assert_eq!(listed[0]["book"]["title"], "Emma");

    // Copies block deleting their book until they are gone
    let book_delete = format!("/catalog/book/{}/delete", id(&book));
    let (status, _) = call(&app, "POST", &book_delete, None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = call(&app, "POST", &format!("/catalog/bookinstance/{}/delete", id(&copy)), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, "POST", &book_delete, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_malformed_and_missing_identifiers() {
    let app = app();
    for kind in ["author", "genre", "book", "bookinstance"] {
        let (status, body) = call(&app, "GET", &format!("/catalog/{}/not-a-key", kind), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", kind);
        assert_eq!(body["error"], "InvalidIdentifier");

        let missing = uuid::Uuid::new_v4();
        for suffix in ["", "/delete", "/update"] {
            let (status, _) = call(&app, "GET", &format!("/catalog/{}/{}{}", kind, missing, suffix), None).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{}{}", kind, suffix);
        }
    }
}

#[tokio::test]
async fn test_mistyped_body_is_validation_error() {
    let app = app();
    let (status, body) = call(&app, "POST", "/catalog/genre/create", Some(json!({ "name": 5 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");
    assert_eq!(body["code"], 5);
    assert_eq!(body["details"]["errors"][0]["field"], "body");

    let (status, genres) = call(&app, "GET", "/catalog/genres", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(genres, json!([]));
}
