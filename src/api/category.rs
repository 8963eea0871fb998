use serde::Deserialize;
use serde_json::Value;

use super::ApiClient;
use crate::common::ApiResult;
use crate::model::{Category, CategoryInput, CategoryQuery};

#[derive(Deserialize)]
struct CategoryList {
    #[serde(default)]
    categories: Vec<Category>,
}

pub async fn list(client: &ApiClient, query: &CategoryQuery) -> ApiResult<Vec<Category>> {
    let list: CategoryList = client.get_with("/categories", query).await?;
    Ok(list.categories)
}

pub async fn get(client: &ApiClient, id: u64) -> ApiResult<Category> {
    client.get(&format!("/categories/{}", id)).await
}

pub async fn create(client: &ApiClient, input: &CategoryInput) -> ApiResult<Category> {
    client.post("/categories", input).await
}

pub async fn update(client: &ApiClient, id: u64, input: &CategoryInput) -> ApiResult<Value> {
    client.put(&format!("/categories/{}", id), input).await
}

pub async fn delete(client: &ApiClient, id: u64) -> ApiResult<Value> {
    client.delete(&format!("/categories/{}", id)).await
}
