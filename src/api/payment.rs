use serde_json::Value;

use super::ApiClient;
use crate::common::ApiResult;
use crate::model::{CreatePayment, Payment, PaymentCallback};

pub async fn create(client: &ApiClient, payment: &CreatePayment) -> ApiResult<Payment> {
    client.post("/payments", payment).await
}

pub async fn get(client: &ApiClient, id: u64) -> ApiResult<Payment> {
    client.get(&format!("/payments/{}", id)).await
}

pub async fn mock_callback(client: &ApiClient, callback: &PaymentCallback) -> ApiResult<Value> {
    client.post("/payment-callback", callback).await
}
