use serde::Serialize;
use serde_json::Value;

use super::ApiClient;
use crate::common::ApiResult;
use crate::model::{CreateOrder, Order, OrderQuery, OrderStatus, Page};

pub async fn create(client: &ApiClient, order: &CreateOrder) -> ApiResult<Order> {
    client.post("/orders", order).await
}

pub async fn list(client: &ApiClient, query: &OrderQuery) -> ApiResult<Page<Order>> {
    client.get_with("/orders", query).await
}

pub async fn get(client: &ApiClient, id: u64) -> ApiResult<Order> {
    client.get(&format!("/orders/{}", id)).await
}

pub async fn cancel(client: &ApiClient, id: u64) -> ApiResult<Value> {
    client.post_empty(&format!("/orders/{}/cancel", id)).await
}

pub async fn confirm_receipt(client: &ApiClient, id: u64) -> ApiResult<Value> {
    client.post_empty(&format!("/orders/{}/confirm", id)).await
}

// ========== 管理端 ==========

pub async fn admin_list(client: &ApiClient, query: &OrderQuery) -> ApiResult<Page<Order>> {
    client.get_with("/orders/admin", query).await
}

pub async fn admin_update_status(client: &ApiClient, id: u64, status: OrderStatus) -> ApiResult<Value> {
    #[derive(Serialize)]
    struct Body {
        status: OrderStatus,
    }
    client
        .patch(&format!("/orders/admin/{}/status", id), &Body { status })
        .await
}
