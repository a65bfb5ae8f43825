//! `POST /webhook`: validate a trade signal and relay it as a market order.
//!
//! Each call is handled on its own: content-type check, payload decode,
//! field validation, translation, one brokerage call, one reply.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    Json,
};
use orders::{decode_payload, OrderRequest, Signal};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    types::{OrderPlaced, ORDER_PLACED},
    AppError, AppState,
};

#[tracing::instrument(name = "webhook", skip_all, fields(request_id = %Uuid::new_v4()))]
pub(crate) async fn receive_signal(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<OrderPlaced>, AppError> {
    if !is_json_content_type(&headers) {
        return Err(AppError::UnsupportedMediaType);
    }

    let payload = decode_payload(&body)?;
    info!("Received webhook payload: {}", payload);

    let signal = Signal::from_value(payload)?;
    for advisory in signal.advisories() {
        warn!("Forwarding questionable signal: {}", advisory);
    }

    let order = OrderRequest::market(&signal);
    info!(
        symbol = %order.symbol,
        side = ?order.side,
        qty = %order.qty.0,
        "Submitting market order"
    );

    let order_details = state.broker.submit_order(&order).await?;
    info!("Order accepted by brokerage");

    Ok(Json(OrderPlaced {
        message: ORDER_PLACED.to_string(),
        order_details,
    }))
}

/// True when the media type is `application/json`, ignoring parameters and case.
fn is_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        app,
        test_support::{spawn_broker, test_state},
        types::{ErrorBody, HealthStatus, INVALID_CONTENT_TYPE, ORDER_FAILED},
    };
    use axum::{
        body::{to_bytes, Body},
        http::{HeaderValue, Request, StatusCode},
    };
    use serde::de::DeserializeOwned;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const AAPL_LONG: &str = r#"{"stock":"AAPL","direction":"long","trade_size":10}"#;

    fn post_webhook(content_type: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder().method("POST").uri("/webhook");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn read_json<T: DeserializeOwned>(response: axum::response::Response) -> T {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn content_type_matching() {
        let mut headers = HeaderMap::new();
        assert!(!is_json_content_type(&headers));

        for (value, expected) in [
            ("application/json", true),
            ("application/json; charset=utf-8", true),
            ("Application/JSON", true),
            ("text/plain", false),
            ("application/x-www-form-urlencoded", false),
            ("application/jsonp", false),
        ] {
            headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(value));
            assert_eq!(is_json_content_type(&headers), expected, "{value}");
        }
    }

    #[tokio::test]
    async fn long_signal_places_buy_order() {
        let broker = spawn_broker(StatusCode::OK, r#"{"id":"ord-1","status":"accepted"}"#).await;

        let response = app(test_state(&broker.base_url))
            .oneshot(post_webhook(Some("application/json"), AAPL_LONG))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let reply: OrderPlaced = read_json(response).await;
        assert_eq!(reply.message, "Order placed successfully!");
        assert_eq!(reply.order_details, json!({"id": "ord-1", "status": "accepted"}));

        let received = broker.received();
        assert_eq!(received.len(), 1);
        assert_eq!(
            received[0].body,
            json!({"symbol":"AAPL","qty":10,"side":"buy","type":"market","time_in_force":"gtc"})
        );
        assert_eq!(received[0].key_id.as_deref(), Some("test-key-id"));
        assert_eq!(received[0].secret_key.as_deref(), Some("test-secret-key"));
    }

    #[tokio::test]
    async fn other_directions_place_sell_orders() {
        let broker = spawn_broker(StatusCode::OK, r#"{"id":"ord-2"}"#).await;

        for direction in ["short", "flat"] {
            let body = json!({"stock": "TSLA", "direction": direction, "trade_size": 2.5});
            let response = app(test_state(&broker.base_url))
                .oneshot(post_webhook(Some("application/json"), &body.to_string()))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let received = broker.received();
        assert_eq!(received.len(), 2);
        for captured in received {
            assert_eq!(captured.body["side"], "sell");
            assert_eq!(captured.body["qty"], 2.5);
        }
    }

    #[tokio::test]
    async fn wrong_content_type_is_415() {
        let broker = spawn_broker(StatusCode::OK, "{}").await;

        for content_type in [Some("text/plain"), None] {
            let response = app(test_state(&broker.base_url))
                .oneshot(post_webhook(content_type, AAPL_LONG))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
            let reply: ErrorBody = read_json(response).await;
            assert_eq!(reply.error, INVALID_CONTENT_TYPE);
        }

        assert!(broker.received().is_empty());
    }

    #[tokio::test]
    async fn charset_parameter_is_accepted() {
        let broker = spawn_broker(StatusCode::OK, r#"{"id":"ord-3"}"#).await;

        let response = app(test_state(&broker.base_url))
            .oneshot(post_webhook(Some("application/json; charset=utf-8"), AAPL_LONG))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn empty_or_invalid_body_is_400() {
        let broker = spawn_broker(StatusCode::OK, "{}").await;

        for body in ["", "{}", "not json", "null"] {
            let response = app(test_state(&broker.base_url))
                .oneshot(post_webhook(Some("application/json"), body))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body:?}");
            let reply: Value = read_json(response).await;
            assert_eq!(reply, json!({"error": "No JSON received"}));
        }

        assert!(broker.received().is_empty());
    }

    #[tokio::test]
    async fn missing_fields_is_400() {
        let broker = spawn_broker(StatusCode::OK, "{}").await;
        let bodies = [
            json!({"direction": "long", "trade_size": 10}),
            json!({"stock": "AAPL", "trade_size": 10}),
            json!({"stock": "AAPL", "direction": "long"}),
            json!({"stock": "", "direction": "long", "trade_size": 10}),
            json!({"stock": "AAPL", "direction": "long", "trade_size": null}),
        ];

        for body in bodies {
            let response = app(test_state(&broker.base_url))
                .oneshot(post_webhook(Some("application/json"), &body.to_string()))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
            let reply: Value = read_json(response).await;
            assert_eq!(reply, json!({"error": "Missing required fields"}));
        }

        assert!(broker.received().is_empty());
    }

    #[tokio::test]
    async fn broker_rejection_is_500_with_raw_details() {
        let raw = r#"{"code":40310000,"message":"insufficient buying power"}"#;
        let broker = spawn_broker(StatusCode::FORBIDDEN, raw).await;

        let response = app(test_state(&broker.base_url))
            .oneshot(post_webhook(Some("application/json"), AAPL_LONG))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let reply: ErrorBody = read_json(response).await;
        assert_eq!(reply.error, ORDER_FAILED);
        assert_eq!(reply.details.as_deref(), Some(raw));
    }

    #[tokio::test]
    async fn unreachable_broker_is_500() {
        let response = app(test_state("http://127.0.0.1:1"))
            .oneshot(post_webhook(Some("application/json"), AAPL_LONG))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let reply: ErrorBody = read_json(response).await;
        assert_eq!(reply.error, "Failed to place order");
        assert!(reply.details.is_some());
    }

    #[tokio::test]
    async fn health_reports_environment() {
        let response = app(test_state("http://127.0.0.1:1"))
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let health: HealthStatus = read_json(response).await;
        assert_eq!(health.status, "healthy");
        assert_eq!(health.service, "signal-relay");
        assert_eq!(health.environment, "paper");
    }
}
