//! Unit tests for the authentication service

use std::sync::Arc;

use serde_json::json;

use crate::domain::entities::session::{Session, KEY_PHONE_NUMBER, KEY_USER_DATA};
use crate::domain::value_objects::UserDataEnvelope;
use crate::errors::ErrorPayload;
use crate::repositories::session::{MemorySessionStore, SessionStore};
use crate::services::auth::{AuthService, AuthServiceConfig};

use super::mocks::MockAuthApi;

fn service() -> (
    AuthService<MemorySessionStore, MockAuthApi>,
    Arc<MemorySessionStore>,
    Arc<MockAuthApi>,
) {
    let store = Arc::new(MemorySessionStore::new());
    let api = Arc::new(MockAuthApi::new());
    let service = AuthService::new(
        Arc::clone(&store),
        Arc::clone(&api),
        AuthServiceConfig::default(),
    );
    (service, store, api)
}

#[tokio::test]
async fn test_restore_session_without_stored_identity() {
    let (service, _store, api) = service();

    assert!(!service.restore_session().await);
    let state = service.state().await;
    assert!(!state.is_authenticated);
    assert_eq!(api.network_call_count(), 0);
}

#[tokio::test]
async fn test_restore_session_success() {
    let (service, store, api) = service();
    store.persist(
        &Session::new()
            .with_phone_number("+94771234567")
            .with_user_data(json!({"Name": "Kasun"}))
            .with_sent_otp("48213"),
    );

    assert!(service.restore_session().await);
    let state = service.state().await;
    assert!(state.is_authenticated);
    assert_eq!(state.phone_number.as_deref(), Some("+94771234567"));
    assert_eq!(state.data.as_deref(), Some("+94771234567"));
    assert_eq!(state.user_data, Some(json!({"Name": "Kasun"})));
    assert_eq!(api.network_call_count(), 0);
}

#[tokio::test]
async fn test_restore_session_recovers_from_corrupt_user_data() {
    for raw in ["undefined", "null", "{broken", "[object Object]"] {
        let (service, store, _api) = service();
        store.seed_raw(KEY_PHONE_NUMBER, "+94771234567");
        store.seed_raw(KEY_USER_DATA, raw);

        assert!(service.restore_session().await, "raw value: {raw}");
        let state = service.state().await;
        assert!(state.is_authenticated);
        assert!(state.user_data.is_none(), "raw value: {raw}");
    }
}

#[tokio::test]
async fn test_restore_session_erases_malformed_user_data() {
    let (service, store, _api) = service();
    store.seed_raw(KEY_PHONE_NUMBER, "+94771234567");
    store.seed_raw(KEY_USER_DATA, "{broken");

    service.restore_session().await;
    assert!(store.raw(KEY_USER_DATA).is_none());
}

#[tokio::test]
async fn test_authenticate_by_phone_rejects_foreign_prefix_before_network() {
    for phone in ["0771234567", "+61412345678", "61412345678"] {
        let (service, _store, api) = service();

        let outcome = service.authenticate_by_phone(phone).await;
        assert!(!outcome.success, "phone: {phone}");
        assert_eq!(
            outcome.error.as_ref().map(|e| e.error.as_str()),
            Some("INVALID_PHONE_NUMBER")
        );
        assert_eq!(api.network_call_count(), 0, "phone: {phone}");

        let state = service.state().await;
        assert!(!state.loading);
        assert!(state.error.is_some());
    }
}

#[tokio::test]
async fn test_authenticate_by_phone_invalid_number() {
    let (service, _store, api) = service();
    api.script_validate(Ok(false));

    let outcome = service.authenticate_by_phone("+94771234567").await;
    assert!(!outcome.success);
    assert_eq!(outcome.error_message(), Some("Invalid phone number."));
    assert_eq!(api.calls(), vec!["validate:+94771234567"]);
}

#[tokio::test]
async fn test_authenticate_by_phone_success() {
    let (service, _store, api) = service();
    api.script_validate(Ok(true));
    api.script_dispatch(Ok("48213".to_string()));

    let outcome = service.authenticate_by_phone("+94771234567").await;
    assert!(outcome.success);
    assert_eq!(outcome.data, Some(json!("48213")));

    let state = service.state().await;
    assert!(!state.loading);
    assert!(state.error.is_none());
    assert_eq!(state.data.as_deref(), Some("+94771234567"));
    // Phone authentication alone never authenticates the state
    assert!(!state.is_authenticated);
}

#[tokio::test]
async fn test_authenticate_by_phone_server_rejection() {
    let (service, _store, api) = service();
    api.script_validate(Err(ErrorPayload::from_rejection(
        Some(json!({"message": "Number not registered."})),
        "Server Error. Unable to authenticate phone number.",
    )));

    let outcome = service.authenticate_by_phone("+94771234567").await;
    assert!(!outcome.success);
    assert_eq!(outcome.error_message(), Some("Number not registered."));

    let state = service.state().await;
    assert_eq!(
        state.error.as_ref().map(|e| e.message.as_str()),
        Some("Number not registered.")
    );
}

#[tokio::test]
async fn test_fallback_retries_opposite_format() {
    let (service, _store, api) = service();
    api.script_validate(Ok(false));
    api.script_validate(Ok(true));
    api.script_dispatch(Ok("90210".to_string()));

    let outcome = service
        .authenticate_by_phone_with_fallback("+94771234567")
        .await;
    assert!(outcome.success);
    assert_eq!(outcome.data, Some(json!("90210")));
    assert_eq!(
        api.calls(),
        vec![
            "validate:+94771234567",
            "validate:94771234567",
            "dispatch:94771234567",
        ]
    );
}

#[tokio::test]
async fn test_fallback_surfaces_failure_when_both_attempts_fail() {
    let (service, _store, api) = service();
    api.script_validate(Ok(false));
    api.script_validate(Ok(false));

    let outcome = service
        .authenticate_by_phone_with_fallback("94771234567")
        .await;
    assert!(!outcome.success);
    assert_eq!(outcome.error_message(), Some("Invalid phone number."));
    assert_eq!(
        api.calls(),
        vec!["validate:94771234567", "validate:+94771234567"]
    );
}

#[tokio::test]
async fn test_fallback_skips_retry_when_disabled() {
    let store = Arc::new(MemorySessionStore::new());
    let api = Arc::new(MockAuthApi::new());
    let config = AuthServiceConfig {
        dual_format_retry: false,
        ..AuthServiceConfig::default()
    };
    let service = AuthService::new(Arc::clone(&store), Arc::clone(&api), config);
    api.script_validate(Ok(false));

    let outcome = service
        .authenticate_by_phone_with_fallback("+94771234567")
        .await;
    assert!(!outcome.success);
    assert_eq!(api.calls(), vec!["validate:+94771234567"]);
}

#[tokio::test]
async fn test_authenticate_by_password_invalid_credentials() {
    let (service, store, api) = service();
    api.script_login(Ok(json!("")));

    let outcome = service.authenticate_by_password("E001", "wrong").await;
    assert!(!outcome.success);
    assert_eq!(
        outcome.error.as_ref().map(|e| e.error.as_str()),
        Some("INVALID_CREDENTIALS")
    );

    let state = service.state().await;
    assert!(!state.is_authenticated);
    assert!(store.restore().is_none());
}

#[tokio::test]
async fn test_authenticate_by_password_success_persists_session() {
    let (service, store, api) = service();
    api.script_login(Ok(json!({"Name": "Kasun", "ServiceNo": "E001"})));

    let outcome = service.authenticate_by_password("E001", "secret").await;
    assert!(outcome.success);

    let state = service.state().await;
    assert!(state.is_authenticated);
    assert_eq!(state.service_no.as_deref(), Some("E001"));
    assert_eq!(state.user_data, Some(json!({"Name": "Kasun", "ServiceNo": "E001"})));

    let session = store.restore().unwrap();
    assert_eq!(session.service_no.as_deref(), Some("E001"));
    assert_eq!(
        session.user_data,
        Some(json!({"Name": "Kasun", "ServiceNo": "E001"}))
    );
}

#[tokio::test]
async fn test_resend_otp_is_fire_and_report() {
    let (service, _store, api) = service();
    api.script_dispatch(Ok("90210".to_string()));

    let outcome = service.resend_otp("+94771234567").await;
    assert!(outcome.success);

    // No loading/error mutation either way
    let state = service.state().await;
    assert!(!state.loading);
    assert!(state.error.is_none());

    api.script_dispatch(Err(ErrorPayload::from_rejection(
        None,
        "Server Error. Unable to send verification call.",
    )));
    let outcome = service.resend_otp("+94771234567").await;
    assert!(!outcome.success);

    let state = service.state().await;
    assert!(state.error.is_none());
}

#[tokio::test]
async fn test_load_user_data_success() {
    let (service, _store, api) = service();
    api.script_fetch(Ok(UserDataEnvelope::found(
        json!({"Name": "Kasun"}),
        "+94771234567",
    )));

    let outcome = service.load_user_data("+94 77 123 4567").await;
    assert!(outcome.success);

    let state = service.state().await;
    assert_eq!(
        state.user_data,
        Some(json!({
            "success": true,
            "data": {"Name": "Kasun"},
            "phoneFormat": "+94771234567"
        }))
    );
}

#[tokio::test]
async fn test_load_user_data_failure_clears_payload() {
    let (service, _store, api) = service();
    api.script_fetch(Ok(UserDataEnvelope::found(json!({"Name": "Kasun"}), "+94771234567")));
    api.script_fetch(Err(ErrorPayload::from_rejection(
        None,
        "Server Error. Unable to fetch user data.",
    )));

    service.load_user_data("+94771234567").await;
    let outcome = service.load_user_data("+94771234567").await;
    assert!(!outcome.success);

    let state = service.state().await;
    assert!(state.user_data.is_none());
    assert_eq!(
        state.error.as_ref().map(|e| e.message.as_str()),
        Some("Server Error. Unable to fetch user data.")
    );
}

#[tokio::test]
async fn test_register_validates_locally_first() {
    let (service, _store, api) = service();

    let mut form = crate::domain::entities::registration::Registration::default();
    form.mobile_no = "0771234567".to_string();

    let outcome = service.register(&form).await;
    assert!(!outcome.success);
    assert_eq!(api.network_call_count(), 0);
}

#[tokio::test]
async fn test_register_maps_server_refusal() {
    let (service, _store, api) = service();
    api.script_register(Ok(false));

    let form = crate::domain::entities::registration::Registration {
        service_no: "E001".to_string(),
        name: "Kasun Perera".to_string(),
        mobile_no: "0771234567".to_string(),
        password: "secret".to_string(),
        ..Default::default()
    };

    let outcome = service.register(&form).await;
    assert!(!outcome.success);
    assert_eq!(
        outcome.error_message(),
        Some("Registration failed. Please check your details.")
    );
}

#[tokio::test]
async fn test_register_maps_transport_failure() {
    let (service, _store, api) = service();
    api.script_register(Err(ErrorPayload::from_rejection(None, "boom")));

    let form = crate::domain::entities::registration::Registration {
        service_no: "E001".to_string(),
        name: "Kasun Perera".to_string(),
        mobile_no: "0771234567".to_string(),
        password: "secret".to_string(),
        ..Default::default()
    };

    let outcome = service.register(&form).await;
    assert!(!outcome.success);
    assert_eq!(outcome.error_message(), Some("An error occurred. Please try again."));
}

#[tokio::test]
async fn test_logout_resets_state_and_storage() {
    let (service, store, api) = service();
    api.script_login(Ok(json!({"Name": "Kasun"})));
    service.authenticate_by_password("E001", "secret").await;
    assert!(service.state().await.is_authenticated);

    service.logout().await;

    assert!(store.restore().is_none());
    let state = service.state().await;
    assert!(!state.is_authenticated);
    assert!(state.user_data.is_none());
    assert!(state.service_no.is_none());
    assert!(state.error.is_none());
    assert!(!state.loading);
}
