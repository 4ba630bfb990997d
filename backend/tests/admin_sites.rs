//! End-to-end coverage of the admin registration surface.

use actix_web::http::{StatusCode, header};
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::Value;
use wiremock::{MockServer, ResponseTemplate};

use weather_proxy::domain::{ClientrawFile, SITE_KEY_MIN_LEN};

mod support;

use support::{IDENTITY_HEADER, build_state, mount_file, mount_station, station_url, test_app};

const ADA: &str = "ada@example.com";
const GRACE: &str = "grace@example.com";

fn post_site(identity: &str, urlpath: &str) -> actix_http::Request {
    actix_test::TestRequest::post()
        .uri("/admin")
        .insert_header((IDENTITY_HEADER, identity))
        .set_form([("urlpath", urlpath)])
        .to_request()
}

fn get_sites(identity: &str) -> actix_http::Request {
    actix_test::TestRequest::get()
        .uri("/admin")
        .insert_header((IDENTITY_HEADER, identity))
        .to_request()
}

fn site_keys(listing: &Value) -> Vec<String> {
    listing["data"]["sites"]
        .as_array()
        .expect("sites array")
        .iter()
        .filter_map(|site| site["key"].as_str().map(str::to_owned))
        .collect()
}

#[rstest]
#[case::list(actix_test::TestRequest::get().uri("/admin"))]
#[case::register(actix_test::TestRequest::post().uri("/admin").set_form([("urlpath", "http://x/")]))]
#[actix_web::test]
async fn anonymous_requests_are_unauthorised(#[case] request: actix_test::TestRequest) {
    let app = actix_test::init_service(test_app(build_state(false))).await;

    let response = actix_test::call_service(&app, request.to_request()).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["status"], "error");
}

#[actix_web::test]
async fn registration_redirects_and_lists_the_site() {
    let server = MockServer::start().await;
    mount_station(&server).await;
    let app = actix_test::init_service(test_app(build_state(true))).await;

    let response = actix_test::call_service(&app, post_site(ADA, &station_url(&server))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok()),
        Some("/admin")
    );

    let listing: Value = actix_test::call_and_read_body_json(&app, get_sites(ADA)).await;
    assert_eq!(listing["status"], "success");
    let sites = listing["data"]["sites"].as_array().expect("sites array");
    assert_eq!(sites.len(), 1);
    assert_eq!(sites[0]["path"], station_url(&server));
    assert_eq!(
        sites[0]["key"].as_str().map(str::len),
        Some(SITE_KEY_MIN_LEN)
    );
    assert!(sites[0]["createdAt"].is_string());
}

#[actix_web::test]
async fn sites_are_scoped_to_their_owner() {
    let app = actix_test::init_service(test_app(build_state(false))).await;

    let response =
        actix_test::call_service(&app, post_site(ADA, "http://station.example/wx/")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let ada: Value = actix_test::call_and_read_body_json(&app, get_sites(ADA)).await;
    let grace: Value = actix_test::call_and_read_body_json(&app, get_sites(GRACE)).await;
    assert_eq!(site_keys(&ada).len(), 1);
    assert!(site_keys(&grace).is_empty());
}

#[actix_web::test]
async fn repeated_paths_receive_longer_unique_keys() {
    let app = actix_test::init_service(test_app(build_state(false))).await;

    for identity in [ADA, GRACE, ADA] {
        let response =
            actix_test::call_service(&app, post_site(identity, "http://station.example/wx/"))
                .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    let ada: Value = actix_test::call_and_read_body_json(&app, get_sites(ADA)).await;
    let grace: Value = actix_test::call_and_read_body_json(&app, get_sites(GRACE)).await;
    let mut keys = site_keys(&ada);
    keys.extend(site_keys(&grace));
    keys.sort_by_key(String::len);

    let lengths: Vec<usize> = keys.iter().map(String::len).collect();
    assert_eq!(
        lengths,
        vec![SITE_KEY_MIN_LEN, SITE_KEY_MIN_LEN + 1, SITE_KEY_MIN_LEN + 2]
    );
    assert!(keys[1].starts_with(&keys[0]));
    assert!(keys[2].starts_with(&keys[1]));
}

#[rstest]
#[case::empty("")]
#[case::no_scheme("not-a-url")]
#[case::ftp("ftp://station.example/wx/")]
#[actix_web::test]
async fn invalid_protocols_are_rejected_without_mutation(#[case] urlpath: &str) {
    let app = actix_test::init_service(test_app(build_state(false))).await;

    let response = actix_test::call_service(&app, post_site(ADA, urlpath)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["description"], "Protocol (http, https) must be included");
    let listing: Value = actix_test::call_and_read_body_json(&app, get_sites(ADA)).await;
    assert!(site_keys(&listing).is_empty());
}

#[rstest]
#[case::unrelated_field(actix_test::TestRequest::post().set_form([("unrelated", "value")]))]
#[case::no_body(actix_test::TestRequest::post())]
#[case::plain_text(
    actix_test::TestRequest::post()
        .insert_header((header::CONTENT_TYPE, "text/plain"))
        .set_payload("hello")
)]
#[actix_web::test]
async fn missing_urlpath_field_is_an_invalid_protocol(#[case] request: actix_test::TestRequest) {
    let app = actix_test::init_service(test_app(build_state(false))).await;

    let response = actix_test::call_service(
        &app,
        request
            .uri("/admin")
            .insert_header((IDENTITY_HEADER, ADA))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["description"], "Protocol (http, https) must be included");

    let listing: Value = actix_test::call_and_read_body_json(&app, get_sites(ADA)).await;
    assert!(site_keys(&listing).is_empty());
}

#[actix_web::test]
async fn unreachable_station_is_not_registered() {
    let server = MockServer::start().await;
    mount_file(&server, ClientrawFile::Current, ResponseTemplate::new(404)).await;
    let app = actix_test::init_service(test_app(build_state(true))).await;

    let response = actix_test::call_service(&app, post_site(ADA, &station_url(&server))).await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body: Value = actix_test::read_body_json(response).await;
    let description = body["description"].as_str().expect("description");
    assert!(description.starts_with("Error retrieving testing value from url: "));
    let listing: Value = actix_test::call_and_read_body_json(&app, get_sites(ADA)).await;
    assert!(site_keys(&listing).is_empty());
}
