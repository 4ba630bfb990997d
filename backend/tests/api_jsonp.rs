//! End-to-end coverage of `GET /api` against a stub weather station.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::Value;
use wiremock::{MockServer, ResponseTemplate};

use weather_proxy::domain::{ClientrawFile, StationFormat};

mod support;

use support::{
    IDENTITY_HEADER, build_state, build_state_with_format, clientraw_body, mount_file,
    mount_station, station_url, test_app,
};

fn unwrap_jsonp(body: &[u8], callback: &str) -> Value {
    let text = std::str::from_utf8(body).expect("utf-8 body");
    let inner = text
        .strip_prefix(&format!("{callback}("))
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or_else(|| panic!("body not wrapped in {callback}: {text}"));
    serde_json::from_str(inner).expect("envelope is JSON")
}

/// Register the stub station and return its key.
async fn register<S>(app: &S, server: &MockServer) -> String
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let response = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri("/admin")
            .insert_header((IDENTITY_HEADER, "ada@example.com"))
            .set_form([("urlpath", station_url(server))])
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let listing: Value = actix_test::call_and_read_body_json(
        app,
        actix_test::TestRequest::get()
            .uri("/admin")
            .insert_header((IDENTITY_HEADER, "ada@example.com"))
            .to_request(),
    )
    .await;
    listing["data"]["sites"][0]["key"]
        .as_str()
        .expect("registered key")
        .to_owned()
}

#[actix_web::test]
async fn registered_station_is_served_as_jsonp() {
    let server = MockServer::start().await;
    mount_station(&server).await;
    let app = actix_test::init_service(test_app(build_state(true))).await;
    let key = register(&app, &server).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api?id={key}&callback=weather.render"))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    assert!(content_type.starts_with("application/javascript"));

    let body = actix_test::read_body(response).await;
    let envelope = unwrap_jsonp(&body, "weather.render");
    assert_eq!(envelope["status"], "success");
    let data = &envelope["data"];
    assert_eq!(data["core"]["temperature"]["value"], "4");
    assert_eq!(data["current"]["outdoor_temperature"]["value"], "4");
    let hourly = data["lasthour"]["wind_speed"]["value"]
        .as_array()
        .expect("hourly series");
    assert_eq!(hourly.len(), 60);
    assert_eq!(hourly[0], "1");
    let daily = data["lastday"]["temperature"]["value"]
        .as_array()
        .expect("daily series");
    assert_eq!(daily.len(), 24);
    assert_eq!(daily[20], "566");
    assert!(data["lastmonth"]["max_temperature"]["value"].is_array());
}

const CUSTOM_FORMAT: &str = r#"{
    "version": 1,
    "name": "custom-station",
    "current": [
        { "name": "station_header", "unit": "" },
        { "name": "gust_mph", "unit": "mph" }
    ],
    "core": [{ "name": "headline_gust", "source": "gust_mph" }],
    "hourly": [{ "name": "rain_rate", "start": 5, "length": 3 }],
    "daily": [{
        "name": "solar",
        "first": { "start": 0, "length": 1 },
        "second": { "start": 10, "length": 2 }
    }],
    "monthly": [{ "name": "snow_depth", "start": 2, "length": 2 }],
    "units": { "rain_rate": "mm/h", "solar": "W/m2", "snow_depth": "cm" }
}"#;

#[actix_web::test]
async fn deployment_format_table_shapes_the_payload() {
    let file = tempfile::NamedTempFile::new().expect("temp file");
    std::fs::write(file.path(), CUSTOM_FORMAT).expect("write format");
    let format = StationFormat::load(file.path()).expect("custom format loads");
    assert_eq!(format.name(), "custom-station");

    let server = MockServer::start().await;
    mount_station(&server).await;
    let app = actix_test::init_service(test_app(build_state_with_format(true, format))).await;
    let key = register(&app, &server).await;

    let body = actix_test::call_and_read_body(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api?id={key}&callback=cb"))
            .to_request(),
    )
    .await;

    let envelope = unwrap_jsonp(&body, "cb");
    assert_eq!(envelope["status"], "success");
    let data = &envelope["data"];
    assert_eq!(
        data["current"],
        serde_json::json!({
            "station_header": { "value": "12345", "unit": "" },
            "gust_mph": { "value": "1", "unit": "mph" }
        })
    );
    assert_eq!(
        data["core"],
        serde_json::json!({ "headline_gust": { "value": "1", "unit": "mph" } })
    );
    assert_eq!(
        data["lasthour"],
        serde_json::json!({ "rain_rate": { "value": ["5", "6", "7"], "unit": "mm/h" } })
    );
    assert_eq!(
        data["lastday"],
        serde_json::json!({ "solar": { "value": ["12345", "10", "11"], "unit": "W/m2" } })
    );
    assert_eq!(
        data["lastmonth"],
        serde_json::json!({ "snow_depth": { "value": ["2", "3"], "unit": "cm" } })
    );
    assert!(data["current"].get("outdoor_temperature").is_none());
}

#[rstest]
#[case::no_callback("/api?id=0123456789abcde")]
#[case::no_id("/api?callback=cb")]
#[actix_web::test]
async fn missing_parameters_are_plain_json(#[case] uri: &str) {
    let app = actix_test::init_service(test_app(build_state(false))).await;

    let response =
        actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        body,
        serde_json::json!({
            "status": "error",
            "description": "id and callback parameter must be provided"
        })
    );
}

#[actix_web::test]
async fn unknown_site_is_reported_inside_callback() {
    let app = actix_test::init_service(test_app(build_state(false))).await;

    let body = actix_test::call_and_read_body(
        &app,
        actix_test::TestRequest::get()
            .uri("/api?id=0123456789abcde&callback=cb")
            .to_request(),
    )
    .await;

    assert_eq!(
        body.as_ref(),
        br#"cb({"status":"error","description":"site does not exist"})"#
    );
}

#[actix_web::test]
async fn empty_upstream_file_fails_without_data() {
    let server = MockServer::start().await;
    for file in [ClientrawFile::Current, ClientrawFile::Hourly, ClientrawFile::Extra] {
        mount_file(
            &server,
            file,
            ResponseTemplate::new(200).set_body_string(clientraw_body()),
        )
        .await;
    }
    mount_file(
        &server,
        ClientrawFile::Daily,
        ResponseTemplate::new(200).set_body_string(""),
    )
    .await;
    let app = actix_test::init_service(test_app(build_state(true))).await;
    let key = register(&app, &server).await;

    let body = actix_test::call_and_read_body(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api?id={key}&callback=cb"))
            .to_request(),
    )
    .await;

    let envelope = unwrap_jsonp(&body, "cb");
    assert_eq!(envelope["status"], "error");
    assert_eq!(envelope["description"], "unable to fetch data");
    assert!(envelope.get("data").is_none());
}

#[actix_web::test]
async fn upstream_outage_is_reported_with_url() {
    let server = MockServer::start().await;
    mount_file(
        &server,
        ClientrawFile::Current,
        ResponseTemplate::new(200).set_body_string(clientraw_body()),
    )
    .await;
    mount_file(&server, ClientrawFile::Hourly, ResponseTemplate::new(500)).await;
    let app = actix_test::init_service(test_app(build_state(true))).await;
    let key = register(&app, &server).await;

    let body = actix_test::call_and_read_body(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api?id={key}&callback=cb"))
            .to_request(),
    )
    .await;

    let envelope = unwrap_jsonp(&body, "cb");
    let description = envelope["description"].as_str().expect("description");
    assert!(description.starts_with("Error retrieving data from url: "));
    assert!(description.contains("clientrawhour.txt"));
}
