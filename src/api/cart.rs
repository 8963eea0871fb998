//! 服务端购物车接口。商城流程用的是本地的 [`crate::store::CartStore`]，
//! 需要账号绑定购物车时才用这里。

use serde::Serialize;
use serde_json::Value;

use super::ApiClient;
use crate::common::ApiResult;
use crate::model::{AddCartItem, ServerCart};

pub async fn get(client: &ApiClient) -> ApiResult<ServerCart> {
    client.get("/cart").await
}

pub async fn add_item(client: &ApiClient, item: &AddCartItem) -> ApiResult<Value> {
    client.post("/cart/items", item).await
}

pub async fn update_item(client: &ApiClient, id: u64, quantity: i32) -> ApiResult<Value> {
    #[derive(Serialize)]
    struct Body {
        quantity: i32,
    }
    client
        .put(&format!("/cart/items/{}", id), &Body { quantity })
        .await
}

pub async fn remove_item(client: &ApiClient, id: u64) -> ApiResult<Value> {
    client.delete(&format!("/cart/items/{}", id)).await
}

pub async fn clear(client: &ApiClient) -> ApiResult<Value> {
    client.delete("/cart/clear").await
}

pub async fn select_item(client: &ApiClient, id: u64, selected: bool) -> ApiResult<Value> {
    #[derive(Serialize)]
    struct Body {
        selected: bool,
    }
    client
        .patch(&format!("/cart/items/{}/select", id), &Body { selected })
        .await
}
