use super::*;

fn test_client(base_url: &str) -> MapsClient {
    MapsClient::with_base_url("test-key", 10, base_url)
        .expect("client construction should not fail")
}

#[test]
fn build_url_appends_path_and_key() {
    let client = test_client("https://maps.example.com/maps/api");
    let url = client
        .build_url(GEOCODE_PATH, &[("latlng", "33.749,-84.388")])
        .expect("url");
    assert_eq!(
        url.as_str(),
        "https://maps.example.com/maps/api/geocode/json?latlng=33.749%2C-84.388&key=test-key"
    );
}

#[test]
fn build_url_tolerates_trailing_slashes() {
    let a = test_client("https://maps.example.com/maps/api/");
    let b = test_client("https://maps.example.com/maps/api///");
    assert_eq!(
        a.build_url(DIRECTIONS_PATH, &[]).expect("url"),
        b.build_url(DIRECTIONS_PATH, &[]).expect("url")
    );
}

#[test]
fn build_url_encodes_special_characters() {
    let client = test_client("https://maps.example.com");
    let url = client
        .build_url(NEARBY_SEARCH_PATH, &[("type", "food & drink")])
        .expect("url");
    assert!(
        url.as_str().contains("food+%26+drink") || url.as_str().contains("food%20%26%20drink"),
        "query param should be percent-encoded: {url}"
    );
}

#[test]
fn invalid_base_url_is_rejected() {
    let result = MapsClient::with_base_url("k", 10, "not a url");
    assert!(matches!(result, Err(ProviderError::InvalidBaseUrl { .. })));
}

#[test]
fn check_status_distinguishes_empty_from_failure() {
    assert!(MapsClient::check_status("OK", None, true).expect("ok"));
    assert!(!MapsClient::check_status("ZERO_RESULTS", None, true).expect("empty"));
    assert!(matches!(
        MapsClient::check_status("ZERO_RESULTS", None, false),
        Err(ProviderError::Api { .. })
    ));
    match MapsClient::check_status("REQUEST_DENIED", Some("bad key"), true) {
        Err(ProviderError::Api { status, message }) => {
            assert_eq!(status, "REQUEST_DENIED");
            assert_eq!(message, "bad key");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}
