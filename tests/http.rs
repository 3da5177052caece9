use std::sync::Arc;

use log::o;
use once_cell::sync::OnceCell;
use serde_json::Value;
use uuid::Uuid;
use warp::http::StatusCode;
use warp::Filter;

use directory::config::DEFAULT_COLLECTION;
use directory::environment::{Config, Environment};
use directory::routes;
use directory::store::MemoryStore;
use directory::validation;

static SLOG_SCOPE_GUARD: OnceCell<slog_scope::GlobalLoggerGuard> = OnceCell::new();

const URLENCODED: &str = "application/x-www-form-urlencoded";

#[tokio::test]
async fn landing_page_offers_both_actions() {
    let (filter, _) = make_filter("landing_page_offers_both_actions");

    let response = warp::test::request().path("/").method("GET").reply(&filter).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("server-timing"));

    let body = parse_body(response.body());
    assert_eq!(body["title"], "The Fade");

    let actions = body["actions"].as_array().expect("get actions");
    assert_eq!(actions.len(), 2);
    assert_eq!(actions[0]["label"], "Add a Barbershop");
    assert_eq!(actions[0]["path"], "/submit");
    assert_eq!(actions[1]["label"], "View All Shops");
    assert_eq!(actions[1]["path"], "/shops");
}

#[tokio::test]
async fn form_lists_fields_in_order() {
    let (filter, _) = make_filter("form_lists_fields_in_order");

    let response = warp::test::request().path("/submit").method("GET").reply(&filter).await;

    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_body(response.body());
    let fields = body["fields"].as_array().expect("get fields");
    let names = fields.iter().map(|f| f["name"].as_str().expect("get name")).collect::<Vec<_>>();

    assert_eq!(
        names,
        vec!["name", "address", "city", "country", "website", "instagram", "description", "submittedBy"]
    );

    let required = fields
        .iter()
        .filter(|f| f["required"] == true)
        .map(|f| f["name"].as_str().expect("get name"))
        .collect::<Vec<_>>();
    assert_eq!(required, vec!["name", "city", "country"]);
}

#[tokio::test]
async fn urlencoded_submission_is_stored_normalized() {
    let (filter, store) = make_filter("urlencoded_submission_is_stored_normalized");

    let response = warp::test::request()
        .path("/submit")
        .method("POST")
        .header("content-type", URLENCODED)
        .body("name=Fresh+Cutz&city=Atlanta&country=USA&website=freshcutz.com&instagram=%40freshcutz")
        .reply(&filter)
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(response.headers().contains_key("server-timing"));

    let body = parse_body(response.body());
    let id = body["id"].as_str().expect("get ID from response");
    Uuid::parse_str(id).expect("parse ID as UUID");
    assert_eq!(body["listing"], "/shops");
    assert_eq!(store.len(DEFAULT_COLLECTION), 1);

    let listing = warp::test::request().path("/shops").method("GET").reply(&filter).await;
    let shops = parse_body(listing.body());
    let shop = &shops["shops"][0];

    assert_eq!(shop["id"], id);
    assert_eq!(shop["name"], "Fresh Cutz");
    assert_eq!(shop["website"], "https://freshcutz.com");
    assert_eq!(shop["instagram"], "freshcutz");
    assert_eq!(shop["instagramHandle"], "@freshcutz");
    assert_eq!(shop["location"], "Atlanta, USA");
    assert!(shop["createdAt"].is_i64());
}

#[tokio::test]
async fn json_submission_is_accepted() {
    let (filter, store) = make_filter("json_submission_is_accepted");

    let response = warp::test::request()
        .path("/submit")
        .method("POST")
        .json(&serde_json::json!({
            "name": "Kings Kutz",
            "city": "Lagos",
            "country": "Nigeria",
            "submittedBy": "Ade"
        }))
        .reply(&filter)
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(store.len(DEFAULT_COLLECTION), 1);
}

#[tokio::test]
async fn missing_required_fields_are_reported() {
    let (filter, store) = make_filter("missing_required_fields_are_reported");

    let response = warp::test::request()
        .path("/submit")
        .method("POST")
        .header("content-type", URLENCODED)
        .body("name=+++&description=Great+fades")
        .reply(&filter)
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = parse_body(response.body());
    let errors = body["errors"].as_object().expect("get errors");

    assert_eq!(errors.len(), 3);
    assert_eq!(errors["name"], validation::NAME_REQUIRED);
    assert_eq!(errors["city"], validation::CITY_REQUIRED);
    assert_eq!(errors["country"], validation::COUNTRY_REQUIRED);
    assert_eq!(body["form"]["description"], "Great fades");
    assert_eq!(store.len(DEFAULT_COLLECTION), 0);
}

#[tokio::test]
async fn invalid_website_is_reported() {
    let (filter, store) = make_filter("invalid_website_is_reported");

    let response = warp::test::request()
        .path("/submit")
        .method("POST")
        .header("content-type", URLENCODED)
        .body("name=Shop&city=Paris&country=France&website=http%3A%2F%2F")
        .reply(&filter)
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = parse_body(response.body());
    let errors = body["errors"].as_object().expect("get errors");

    assert_eq!(errors.len(), 1);
    assert_eq!(errors["website"], validation::INVALID_WEBSITE);
    assert_eq!(store.len(DEFAULT_COLLECTION), 0);
}

#[tokio::test]
async fn store_failure_keeps_the_values() {
    let (filter, store) = make_filter("store_failure_keeps_the_values");
    store.set_unavailable(true);

    let response = warp::test::request()
        .path("/submit")
        .method("POST")
        .header("content-type", URLENCODED)
        .body("name=Shop&city=Accra&country=Ghana&instagram=%40shop")
        .reply(&filter)
        .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = parse_body(response.body());
    assert_eq!(body["errors"]["submit"], "We couldn't save that. Please try again.");
    assert_eq!(body["form"]["name"], "Shop");
    assert_eq!(body["form"]["city"], "Accra");
    assert_eq!(body["form"]["instagram"], "@shop");

    store.set_unavailable(false);
    assert_eq!(store.len(DEFAULT_COLLECTION), 0);
}

#[tokio::test]
async fn unsupported_media_type_is_rejected() {
    let (filter, _) = make_filter("unsupported_media_type_is_rejected");

    let response = warp::test::request()
        .path("/submit")
        .method("POST")
        .header("content-type", "text/plain")
        .body("name=Shop")
        .reply(&filter)
        .await;

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let body = parse_body(response.body());
    assert_eq!(body["context"], "submit");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn malformed_json_is_rejected() {
    let (filter, store) = make_filter("malformed_json_is_rejected");

    let response = warp::test::request()
        .path("/submit")
        .method("POST")
        .header("content-type", "application/json")
        .body("{\"name\": ")
        .reply(&filter)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(store.len(DEFAULT_COLLECTION), 0);
}

#[tokio::test]
async fn listing_is_newest_first() {
    let (filter, _) = make_filter("listing_is_newest_first");

    for name in &["First", "Second", "Third"] {
        let response = warp::test::request()
            .path("/submit")
            .method("POST")
            .header("content-type", URLENCODED)
            .body(format!("name={}&city=Detroit&country=USA", name))
            .reply(&filter)
            .await;

        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = warp::test::request().path("/shops").method("GET").reply(&filter).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("server-timing"));

    let body = parse_body(response.body());
    let names = body["shops"]
        .as_array()
        .expect("get shops")
        .iter()
        .map(|s| s["name"].as_str().expect("get name").to_owned())
        .collect::<Vec<_>>();

    assert_eq!(names, vec!["Third", "Second", "First"]);
}

#[tokio::test]
async fn listing_failure_shows_empty_directory() {
    let (filter, store) = make_filter("listing_failure_shows_empty_directory");

    let response = warp::test::request()
        .path("/submit")
        .method("POST")
        .header("content-type", URLENCODED)
        .body("name=Shop&city=Detroit&country=USA")
        .reply(&filter)
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    store.set_unavailable(true);

    let response = warp::test::request().path("/shops").method("GET").reply(&filter).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_body(response.body());
    assert_eq!(body["shops"], serde_json::json!([]));
}

#[tokio::test]
async fn healthz_reports_version() {
    initialize_global_logger();

    let environment = make_environment("healthz_reports_version", Arc::new(MemoryStore::new()));
    let filter = routes::admin::make_healthz_route(environment);

    let response = warp::test::request().path("/healthz").method("GET").reply(&filter).await;

    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_body(response.body());
    assert_eq!(body["version"], info::VERSION);
}

fn make_filter(
    test_name: &str,
) -> (
    impl warp::Filter<Extract = (impl warp::Reply,), Error = warp::reject::Rejection> + Clone + 'static,
    Arc<MemoryStore>,
) {
    initialize_global_logger();

    let store = Arc::new(MemoryStore::new());
    let environment = make_environment(test_name, store.clone());
    let logger = environment.logger.clone();

    let filter = routes::make_home_route(environment.clone())
        .or(routes::make_form_route(environment.clone()))
        .or(routes::make_submit_route(environment.clone()))
        .or(routes::make_listing_route(environment))
        .recover(move |r| routes::format_rejection(logger.clone(), r));

    (filter, store)
}

fn make_environment(test_name: &str, store: Arc<MemoryStore>) -> Environment {
    let logger = slog_scope::logger().new(o!("test" => test_name.to_owned()));

    Environment::new(Arc::new(logger), store, Config::new(DEFAULT_COLLECTION))
}

fn initialize_global_logger() {
    SLOG_SCOPE_GUARD.get_or_init(|| slog_envlogger::init().expect("initialize slog-envlogger"));
}

fn parse_body(body: &[u8]) -> Value {
    serde_json::from_slice(body).expect("parse response as JSON")
}
