mod common;

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use shop_client::api;
use shop_client::model::{LoginForm, ProductListParams, RegisterForm};
use shop_client::store::{MemoryStorage, Storage, AUTH_KEY, CART_KEY};
use shop_client::{ApiError, AppError, Route, Services};

use common::StubServer;

const LOGIN_OK: &str = r#"{"code":0,"message":"success","data":{"token":"tok-1","expires_at":4102444800,"user":{"id":1,"username":"alice","email":"alice@example.com","phone":"","role":"user","avatar":""}}}"#;
const REGISTERED_USER: &str = r#"{"code":0,"message":"注册成功","data":{"id":2,"username":"dave","email":"dave@example.com","role":"user"}}"#;
const PRODUCT: &str = r#"{"code":0,"data":{"id":1,"name":"Mug","price":10.00,"stock":5,"sku":"MUG-1"}}"#;
const UNAUTHORIZED: &str = r#"{"code":401,"message":"token expired"}"#;

fn services(server: &StubServer) -> (Services, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    let services = Services::with_storage(&server.config(), storage.clone()).unwrap();
    (services, storage)
}

fn login_form() -> LoginForm {
    LoginForm {
        username: "alice".into(),
        password: "secret1".into(),
    }
}

#[tokio::test]
async fn login_persists_session_and_goes_home() {
    let server = StubServer::start(vec![(200, LOGIN_OK)]).await;
    let (services, storage) = services(&server);
    services.navigator.navigate(Route::Login);

    let user = services.login(&login_form()).await.unwrap();

    assert_eq!(user.username, "alice");
    assert!(services.auth.is_authenticated());
    assert_eq!(services.auth.token().as_deref(), Some("tok-1"));
    assert!(storage.get(AUTH_KEY).unwrap().is_some());
    assert_eq!(services.navigator.current(), Route::Home);
    assert!(server.requests()[0].starts_with("POST /api/v1/auth/login"));
}

#[tokio::test]
async fn unauthorized_response_clears_session_and_redirects_to_login() {
    let server = StubServer::start(vec![(200, LOGIN_OK), (401, UNAUTHORIZED)]).await;
    let (services, storage) = services(&server);
    services.login(&login_form()).await.unwrap();
    services.visit(Route::Orders);
    let mut route = services.navigator.subscribe();

    let err = api::product::list(&services.api, &ProductListParams::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));

    tokio::time::timeout(Duration::from_secs(2), route.wait_for(|r| *r == Route::Login))
        .await
        .expect("observer did not redirect")
        .unwrap();

    assert!(!services.auth.is_authenticated());
    assert_eq!(services.auth.user(), None);
    assert_eq!(storage.get(AUTH_KEY).unwrap(), None);
    assert_eq!(services.navigator.current(), Route::Login);
}

#[tokio::test]
async fn other_failures_leave_session_alone() {
    let server = StubServer::start(vec![(200, LOGIN_OK), (403, "")]).await;
    let (services, _) = services(&server);
    services.login(&login_form()).await.unwrap();

    let err = api::order::admin_list(&services.api, &Default::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Forbidden));

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(services.auth.is_authenticated());
    assert_eq!(services.navigator.current(), Route::Home);
}

#[tokio::test]
async fn register_without_session_signs_in_afterwards() {
    let server = StubServer::start(vec![(200, REGISTERED_USER), (200, LOGIN_OK)]).await;
    let (services, _) = services(&server);

    let form = RegisterForm {
        username: "dave".into(),
        email: "dave@example.com".into(),
        phone: None,
        password: "secret1".into(),
        confirm: "secret1".into(),
    };
    services.register(&form).await.unwrap();

    let requests = server.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].starts_with("POST /api/v1/auth/register"));
    assert!(requests[1].starts_with("POST /api/v1/auth/login"));
    assert!(services.auth.is_authenticated());
}

#[tokio::test]
async fn invalid_forms_never_reach_the_network() {
    let server = StubServer::start(vec![(200, LOGIN_OK)]).await;
    let (services, _) = services(&server);

    let form = RegisterForm {
        username: "dave".into(),
        email: "dave@example.com".into(),
        phone: Some("123".into()),
        password: "secret1".into(),
        confirm: "secret2".into(),
    };
    match services.register(&form).await {
        Err(AppError::Validation(errors)) => {
            let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
            assert_eq!(fields, vec!["phone", "confirm"]);
        }
        other => panic!("expected validation failure, got {other:?}"),
    }

    assert!(matches!(
        services.login(&LoginForm::default()).await,
        Err(AppError::Validation(_))
    ));
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn logout_keeps_local_cart() {
    let server = StubServer::start(vec![(200, LOGIN_OK), (200, PRODUCT)]).await;
    let (mut services, storage) = services(&server);
    services.login(&login_form()).await.unwrap();

    let product = api::product::get(&services.api, 1).await.unwrap();
    services.cart.add_item(&product, 2);
    services.cart.add_item(&product, 3);
    assert_eq!(services.cart.len(), 1);
    assert_eq!(services.cart.total_price(), Decimal::from(50));

    services.logout().unwrap();
    assert!(!services.auth.is_authenticated());
    assert_eq!(storage.get(AUTH_KEY).unwrap(), None);
    assert!(storage.get(CART_KEY).unwrap().is_some());
    assert_eq!(services.cart.total_items(), 5);
}

#[tokio::test]
async fn protected_routes_redirect_when_logged_out() {
    let server = StubServer::start(vec![]).await;
    let (services, _) = services(&server);

    assert_eq!(services.visit(Route::Cart), Route::Login);
    assert_eq!(services.navigator.current(), Route::Login);
    assert_eq!(services.visit(Route::ProductDetail(3)), Route::ProductDetail(3));
}
