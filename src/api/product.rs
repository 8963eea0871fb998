use serde::Serialize;
use serde_json::Value;

use super::ApiClient;
use crate::common::ApiResult;
use crate::model::{Page, Product, ProductInput, ProductListParams, ProductStatus, StockUpdates};

const SEARCH_PAGE_SIZE: u32 = 20;

pub async fn list(client: &ApiClient, params: &ProductListParams) -> ApiResult<Page<Product>> {
    client.get_with("/products", params).await
}

pub async fn get(client: &ApiClient, id: u64) -> ApiResult<Product> {
    client.get(&format!("/products/{}", id)).await
}

/// 关键字搜索，page 默认 1，page_size 默认 20
pub async fn search(
    client: &ApiClient,
    keyword: &str,
    page: Option<u32>,
    page_size: Option<u32>,
) -> ApiResult<Page<Product>> {
    #[derive(Serialize)]
    struct Query<'a> {
        keyword: &'a str,
        page: u32,
        page_size: u32,
    }

    let query = Query {
        keyword,
        page: page.unwrap_or(1),
        page_size: page_size.unwrap_or(SEARCH_PAGE_SIZE),
    };
    client.get_with("/products/search", &query).await
}

// ========== 管理端 ==========

pub async fn create(client: &ApiClient, input: &ProductInput) -> ApiResult<Product> {
    client.post("/products", input).await
}

pub async fn update(client: &ApiClient, id: u64, input: &ProductInput) -> ApiResult<Value> {
    client.put(&format!("/products/{}", id), input).await
}

pub async fn delete(client: &ApiClient, id: u64) -> ApiResult<Value> {
    client.delete(&format!("/products/{}", id)).await
}

pub async fn update_status(client: &ApiClient, id: u64, status: ProductStatus) -> ApiResult<Value> {
    #[derive(Serialize)]
    struct Body {
        status: ProductStatus,
    }
    client
        .patch(&format!("/products/{}/status", id), &Body { status })
        .await
}

pub async fn batch_update_stock(client: &ApiClient, updates: &StockUpdates) -> ApiResult<Value> {
    client.post("/products/batch-stock", updates).await
}
