use serde_json::Value;

use super::ApiClient;
use crate::common::ApiResult;
use crate::model::{Address, AddressInput};

pub async fn list(client: &ApiClient) -> ApiResult<Vec<Address>> {
    client.get("/addresses").await
}

pub async fn default_address(client: &ApiClient) -> ApiResult<Address> {
    client.get("/addresses/default").await
}

pub async fn get(client: &ApiClient, id: u64) -> ApiResult<Address> {
    client.get(&format!("/addresses/{}", id)).await
}

pub async fn create(client: &ApiClient, input: &AddressInput) -> ApiResult<Address> {
    client.post("/addresses", input).await
}

pub async fn update(client: &ApiClient, id: u64, input: &AddressInput) -> ApiResult<Value> {
    client.put(&format!("/addresses/{}", id), input).await
}

pub async fn delete(client: &ApiClient, id: u64) -> ApiResult<Value> {
    client.delete(&format!("/addresses/{}", id)).await
}

pub async fn set_default(client: &ApiClient, id: u64) -> ApiResult<Value> {
    client.patch_empty(&format!("/addresses/{}/default", id)).await
}
