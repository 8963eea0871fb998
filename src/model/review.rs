use serde::{Deserialize, Serialize};

use super::{empty_as_none, image_list};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: u64,
    pub user_id: u64,
    pub product_id: u64,
    #[serde(default)]
    pub order_id: u64,
    pub rating: u8,
    #[serde(default)]
    pub content: String,
    #[serde(default, deserialize_with = "image_list")]
    pub images: Vec<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateReview {
    pub product_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<u64>,
    pub rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<String>,
}
