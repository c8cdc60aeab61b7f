use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use theater::config::Config;
use tower::ServiceExt;

const MOVIES: &str = "/api/v1/theater/movies/";

async fn spawn_app() -> Router {
    let db_path =
        std::env::temp_dir().join(format!("theater-api-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());
    config.observability.metrics_enabled = false;

    let state = theater::api::create_app_state(config, None)
        .await
        .expect("Failed to create app state");
    theater::api::router(state)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref());
            Body::from(serde_json::to_vec(&value).unwrap())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn movie_payload(name: &str, date: &str, genres: &[&str]) -> Value {
    json!({
        "name": name,
        "date": date,
        "score": 82,
        "overview": "A noble family becomes embroiled in a war for control over the galaxy's most valuable asset.",
        "status": "Released",
        "budget": 165000000,
        "revenue": 400000000,
        "country": "USA",
        "genres": genres,
        "actors": ["Actor A"],
        "languages": ["English"]
    })
}

async fn create(app: &Router, name: &str, date: &str, genres: &[&str]) -> Value {
    let (status, body) = send(app, "POST", MOVIES, Some(movie_payload(name, date, genres))).await;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {body}");
    body
}

fn movie_uri(id: &Value) -> String {
    format!("{MOVIES}{id}/")
}

#[tokio::test]
async fn test_create_movie_returns_full_detail() {
    let app = spawn_app().await;

    let body = create(&app, "Dune", "2021-10-22", &["Sci-Fi"]).await;

    assert!(body["id"].is_number());
    assert_eq!(body["name"], "Dune");
    assert_eq!(body["date"], "2021-10-22");
    assert_eq!(body["status"], "Released");
    assert_eq!(body["score"].as_f64(), Some(82.0));
    assert_eq!(body["country"]["code"], "USA");
    assert!(body["country"]["name"].is_null());
    assert_eq!(body["genres"].as_array().unwrap().len(), 1);
    assert_eq!(body["genres"][0]["name"], "Sci-Fi");
    assert!(body["genres"][0]["id"].is_number());
    assert_eq!(body["actors"][0]["name"], "Actor A");
    assert_eq!(body["languages"][0]["name"], "English");
}

#[tokio::test]
async fn test_create_duplicate_name_and_date_conflicts() {
    let app = spawn_app().await;
    create(&app, "Dune", "2021-10-22", &["Sci-Fi"]).await;

    let mut payload = movie_payload("Dune", "2021-10-22", &["Drama"]);
    payload["score"] = json!(10);
    payload["country"] = json!("GBR");

    let (status, body) = send(&app, "POST", MOVIES, Some(payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["detail"],
        "A movie with the name 'Dune' and release date '2021-10-22' already exists."
    );

    // Same name on another date is a different movie.
    create(&app, "Dune", "1984-12-14", &["Sci-Fi"]).await;
}

#[tokio::test]
async fn test_existing_genre_is_reused() {
    let app = spawn_app().await;

    let first = create(&app, "Dune", "2021-10-22", &["Sci-Fi"]).await;
    let second = create(&app, "Arrival", "2016-11-11", &["Sci-Fi", "Drama"]).await;

    assert_eq!(first["genres"][0]["id"], second["genres"][0]["id"]);
    assert_eq!(first["country"]["id"], second["country"]["id"]);

    let (status, detail) = send(&app, "GET", &movie_uri(&first["id"]), None).await;
    assert_eq!(status, StatusCode::OK);
    let genres = detail["genres"].as_array().unwrap();
    assert_eq!(genres.len(), 1);
    assert_eq!(genres[0]["name"], "Sci-Fi");
}

#[tokio::test]
async fn test_repeated_names_in_one_payload_link_once() {
    let app = spawn_app().await;

    let body = create(&app, "Dune", "2021-10-22", &["Sci-Fi", "Sci-Fi"]).await;
    assert_eq!(body["genres"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_rejects_out_of_range_fields() {
    let app = spawn_app().await;

    let mut payload = movie_payload("Dune", "2999-01-01", &["Sci-Fi"]);
    payload["score"] = json!(101);
    payload["budget"] = json!(-5);

    let (status, body) = send(&app, "POST", MOVIES, Some(payload)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["budget", "date", "score"]);

    let (status, _) = send(&app, "GET", MOVIES, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_rejects_unknown_status() {
    let app = spawn_app().await;

    let mut payload = movie_payload("Dune", "2021-10-22", &["Sci-Fi"]);
    payload["status"] = json!("Cancelled");

    let (status, _) = send(&app, "POST", MOVIES, Some(payload)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_list_empty_catalog_is_not_found() {
    let app = spawn_app().await;

    let (status, body) = send(&app, "GET", MOVIES, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "No movies found.");
}

#[tokio::test]
async fn test_list_pagination() {
    let app = spawn_app().await;

    let first = create(&app, "First", "2001-01-01", &["Drama"]).await;
    let second = create(&app, "Second", "2002-02-02", &["Drama"]).await;
    let third = create(&app, "Third", "2000-03-03", &["Drama"]).await;

    let (status, body) = send(&app, "GET", &format!("{MOVIES}?page=1&per_page=2"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_items"], 3);
    assert_eq!(body["total_pages"], 2);
    assert!(body["prev_page"].is_null());
    assert_eq!(
        body["next_page"],
        "/api/v1/theater/movies/?page=2&per_page=2"
    );

    let movies = body["movies"].as_array().unwrap();
    assert_eq!(movies.len(), 2);
    // Newest insert first, regardless of release date.
    assert_eq!(movies[0]["id"], third["id"]);
    assert_eq!(movies[1]["id"], second["id"]);
    assert!(movies[0].get("status").is_none());
    assert!(movies[0]["overview"].is_string());

    let (status, body) = send(&app, "GET", &format!("{MOVIES}?page=2&per_page=2"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["movies"].as_array().unwrap().len(), 1);
    assert_eq!(body["movies"][0]["id"], first["id"]);
    assert_eq!(
        body["prev_page"],
        "/api/v1/theater/movies/?page=1&per_page=2"
    );
    assert!(body["next_page"].is_null());

    let (status, _) = send(&app, "GET", &format!("{MOVIES}?page=3&per_page=2"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_far_past_the_end_is_not_found() {
    let app = spawn_app().await;
    create(&app, "Dune", "2021-10-22", &["Sci-Fi"]).await;

    for page in ["1000000000000000000", "461168601842738792", "18446744073709551615"] {
        let (status, body) = send(
            &app,
            "GET",
            &format!("{MOVIES}?page={page}&per_page=20"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND, "page={page}");
        assert_eq!(body["detail"], "No movies found.");
    }

    // The server is still serving after the oversized requests.
    let (status, _) = send(&app, "GET", MOVIES, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_list_defaults_to_ten_per_page() {
    let app = spawn_app().await;
    create(&app, "Dune", "2021-10-22", &["Sci-Fi"]).await;

    let (status, body) = send(&app, "GET", MOVIES, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_pages"], 1);
    assert!(body["prev_page"].is_null());
    assert!(body["next_page"].is_null());
}

#[tokio::test]
async fn test_list_rejects_invalid_query() {
    let app = spawn_app().await;
    create(&app, "Dune", "2021-10-22", &["Sci-Fi"]).await;

    let (status, body) = send(&app, "GET", &format!("{MOVIES}?per_page=21"), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"][0]["field"], "per_page");

    let (status, body) = send(&app, "GET", &format!("{MOVIES}?page=0"), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"][0]["field"], "page");

    let (status, _) = send(&app, "GET", &format!("{MOVIES}?page=abc"), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_get_unknown_movie() {
    let app = spawn_app().await;

    let (status, body) = send(&app, "GET", &format!("{MOVIES}9999/"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Movie with the given ID was not found.");

    let (status, _) = send(&app, "GET", &format!("{MOVIES}not-a-number/"), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_id_outside_i32_range_is_rejected() {
    let app = spawn_app().await;
    create(&app, "Dune", "2021-10-22", &["Sci-Fi"]).await;

    let too_big = format!("{MOVIES}{}/", i64::from(i32::MAX) + 1);
    for method in ["GET", "DELETE"] {
        let (status, _) = send(&app, method, &too_big, None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{method}");
    }

    let (status, _) = send(&app, "PATCH", &too_big, Some(json!({ "score": 1 }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(&app, "GET", &format!("{MOVIES}{}/", i32::MAX), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Movie with the given ID was not found.");
}

#[tokio::test]
async fn test_delete_movie() {
    let app = spawn_app().await;
    let movie = create(&app, "Dune", "2021-10-22", &["Sci-Fi"]).await;
    let uri = movie_uri(&movie["id"]);

    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, _) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_keeps_related_entities() {
    let app = spawn_app().await;
    let movie = create(&app, "Dune", "2021-10-22", &["Sci-Fi"]).await;

    let (status, _) = send(&app, "DELETE", &movie_uri(&movie["id"]), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let again = create(&app, "Dune", "2021-10-22", &["Sci-Fi"]).await;
    assert_eq!(again["genres"][0]["id"], movie["genres"][0]["id"]);
    assert_eq!(again["actors"][0]["id"], movie["actors"][0]["id"]);
    assert_ne!(again["id"], movie["id"]);
}

#[tokio::test]
async fn test_partial_update_only_touches_given_fields() {
    let app = spawn_app().await;
    let movie = create(&app, "Dune", "2021-10-22", &["Sci-Fi"]).await;
    let uri = movie_uri(&movie["id"]);

    let (status, body) = send(&app, "PATCH", &uri, Some(json!({ "score": 90 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["detail"], "Movie updated successfully.");

    let (_, updated) = send(&app, "GET", &uri, None).await;
    assert_eq!(updated["score"].as_f64(), Some(90.0));

    let mut expected = movie.clone();
    expected["score"] = updated["score"].clone();
    assert_eq!(updated, expected);
}

#[tokio::test]
async fn test_update_status_stored_as_string() {
    let app = spawn_app().await;
    let movie = create(&app, "Dune", "2021-10-22", &["Sci-Fi"]).await;
    let uri = movie_uri(&movie["id"]);

    let (status, _) = send(
        &app,
        "PATCH",
        &uri,
        Some(json!({ "status": "Post Production", "overview": "Recut." })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, updated) = send(&app, "GET", &uri, None).await;
    assert_eq!(updated["status"], "Post Production");
    assert_eq!(updated["overview"], "Recut.");
    assert_eq!(updated["name"], "Dune");
}

#[tokio::test]
async fn test_update_rejects_null_and_out_of_range() {
    let app = spawn_app().await;
    let movie = create(&app, "Dune", "2021-10-22", &["Sci-Fi"]).await;
    let uri = movie_uri(&movie["id"]);

    let (status, _) = send(&app, "PATCH", &uri, Some(json!({ "score": null }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(&app, "PATCH", &uri, Some(json!({ "revenue": -1 }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"][0]["field"], "revenue");

    let (_, current) = send(&app, "GET", &uri, None).await;
    assert_eq!(current, movie);
}

#[tokio::test]
async fn test_update_unknown_movie() {
    let app = spawn_app().await;

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("{MOVIES}42/"),
        Some(json!({ "score": 50 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Movie with the given ID was not found.");
}

#[tokio::test]
async fn test_update_into_existing_name_and_date_conflicts() {
    let app = spawn_app().await;
    create(&app, "Dune", "2021-10-22", &["Sci-Fi"]).await;
    let other = create(&app, "Arrival", "2016-11-11", &["Sci-Fi"]).await;

    let (status, _) = send(
        &app,
        "PATCH",
        &movie_uri(&other["id"]),
        Some(json!({ "name": "Dune", "date": "2021-10-22" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Renaming a movie to its own current name is not a conflict.
    let (status, _) = send(
        &app,
        "PATCH",
        &movie_uri(&other["id"]),
        Some(json!({ "name": "Arrival" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_empty_update_is_a_no_op() {
    let app = spawn_app().await;
    let movie = create(&app, "Dune", "2021-10-22", &["Sci-Fi"]).await;
    let uri = movie_uri(&movie["id"]);

    let (status, _) = send(&app, "PATCH", &uri, Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, current) = send(&app, "GET", &uri, None).await;
    assert_eq!(current, movie);
}
