use serde::Serialize;
use serde_json::Value;

use super::ApiClient;
use crate::common::ApiResult;
use crate::model::{CreateReview, Page, PageQuery, Review};

pub async fn create(client: &ApiClient, review: &CreateReview) -> ApiResult<Review> {
    client.post("/reviews", review).await
}

pub async fn list_for_product(client: &ApiClient, product_id: u64, query: &PageQuery) -> ApiResult<Page<Review>> {
    client
        .get_with(&format!("/reviews/products/{}", product_id), query)
        .await
}

pub async fn list_mine(client: &ApiClient, query: &PageQuery) -> ApiResult<Page<Review>> {
    client.get_with("/reviews/my", query).await
}

pub async fn delete(client: &ApiClient, id: u64) -> ApiResult<Value> {
    client.delete(&format!("/reviews/{}", id)).await
}

pub async fn admin_reply(client: &ApiClient, id: u64, reply: &str) -> ApiResult<Value> {
    #[derive(Serialize)]
    struct Body<'a> {
        reply: &'a str,
    }
    client
        .post(&format!("/reviews/{}/reply", id), &Body { reply })
        .await
}
