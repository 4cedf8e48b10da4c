use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use concert_front::backend_client::BackendClient;
use concert_front::booking::BookingModal;
use concert_front::catalog::FilterForm;
use concert_front::config::BackendConfig;
use concert_front::error::ApiError;
use concert_front::middleware::Session;
use concert_front::models::{AddToCartRequest, ConcertSelection, Coordinates, FavoriteAction, SeatCategory};

fn client(server: &MockServer) -> BackendClient {
    BackendClient::from_config(&BackendConfig { url: server.uri(), timeout_seconds: 5 }).unwrap()
}

fn vip_for_two() -> AddToCartRequest {
    let mut modal = BookingModal::opened(ConcertSelection {
        artist_id: 1,
        artist_name: "Queen".to_string(),
        artist_image: String::new(),
        location: "Stade de France".to_string(),
        city: None,
        country: None,
        date: "12-06-25".to_string(),
        all_dates: vec!["12-06-25".to_string(), "13-06-25".to_string()],
        time: "20:00".to_string(),
    });
    modal.select_seat(SeatCategory::Vip).unwrap();
    modal.increment().unwrap();
    modal.begin_submit().unwrap()
}

#[tokio::test]
async fn add_to_cart_forwards_cookie_and_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/cart/add"))
        .and(header("cookie", "sid=abc"))
        .and(body_partial_json(json!({
            "seatType": "vip",
            "seatName": "VIP",
            "quantity": 2,
            "price": 120,
            "total": 240,
            "concertData": {"artistName": "Queen", "location": "Stade de France", "time": "20:00"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .add_to_cart(&Session::with_cookie("sid=abc"), &vip_for_two())
        .await
        .unwrap();
}

#[tokio::test]
async fn unauthorized_is_distinguished() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/cart/add"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client(&server)
        .add_to_cart(&Session::anonymous(), &vip_for_two())
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn business_error_carries_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/cart/add"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "Concert complet"})))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/cart/clear"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": false})))
        .mount(&server)
        .await;

    let backend = client(&server);
    let session = Session::with_cookie("sid=abc");
    match backend.add_to_cart(&session, &vip_for_two()).await {
        Err(ApiError::Business(message)) => assert_eq!(message, "Concert complet"),
        other => panic!("unexpected result: {other:?}"),
    }
    match backend.clear_cart(&session).await {
        Err(ApiError::Business(message)) => assert_eq!(message, "Erreur inconnue"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn plain_text_failure_is_a_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/cart"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client(&server).cart(&Session::with_cookie("sid=abc")).await.unwrap_err();
    assert!(matches!(err, ApiError::Status(500)));
}

#[tokio::test]
async fn cart_with_null_items_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": null})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/cart/count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 3})))
        .mount(&server)
        .await;

    let backend = client(&server);
    let session = Session::with_cookie("sid=abc");
    assert!(backend.cart(&session).await.unwrap().is_empty());
    assert_eq!(backend.cart_count(&session).await.unwrap(), 3);
}

#[tokio::test]
async fn geocode_misses_are_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/geocode"))
        .and(query_param("location", "Paris, France"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"latitude": 48.85, "longitude": 2.35})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/geocode"))
        .and(query_param("location", "Atlantis"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/geocode"))
        .and(query_param("location", "Nowhere"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"lat": 123.0, "lng": 2.0})))
        .mount(&server)
        .await;

    let backend = client(&server);
    assert_eq!(
        backend.lookup_coordinates("Paris, France").await.unwrap(),
        Some(Coordinates { lat: 48.85, lng: 2.35 })
    );
    assert_eq!(backend.lookup_coordinates("Atlantis").await.unwrap(), None);
    assert_eq!(backend.lookup_coordinates("Nowhere").await.unwrap(), None);
}

#[tokio::test]
async fn filter_sends_only_filled_fields_and_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/filter"))
        .and(header("cookie", "sid=abc"))
        .and(query_param("creationMin", "1970"))
        .and(query_param("location", "Lyon, France"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "Queen", "creationDate": 1970, "members": ["Freddie Mercury"]}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let form = FilterForm::from_query("creationMin=1970&creationMax=&location=Lyon%2C+France");
    let artists = client(&server)
        .filter_artists(&Session::with_cookie("sid=abc"), &form)
        .await
        .unwrap();
    assert_eq!(artists.len(), 1);
    assert_eq!(artists[0].name, "Queen");
}

#[tokio::test]
async fn favorite_posts_camel_case_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/user/favorite"))
        .and(body_partial_json(json!({"artistId": 4, "action": "remove"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .set_favorite(&Session::with_cookie("sid=abc"), 4, FavoriteAction::Remove)
        .await
        .unwrap();
}
