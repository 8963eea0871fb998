//! 商城 HTTP 接口的类型化封装，所有调用都经过 [`ApiClient`]。

use crate::common::ApiError;

pub mod address;
pub mod auth;
pub mod cart;
pub mod category;
mod client;
pub mod order;
pub mod payment;
pub mod product;
pub mod review;

pub use client::ApiClient;

/// 一次失败调用的分类结果，由请求管道广播
#[derive(Debug, Clone)]
pub struct ApiEvent {
    pub method: String,
    pub path: String,
    pub error: ApiError,
}

impl ApiEvent {
    /// 给用户看的提示
    pub fn notice(&self) -> String {
        self.error.notice()
    }

    pub fn is_unauthorized(&self) -> bool {
        self.error.is_unauthorized()
    }
}
