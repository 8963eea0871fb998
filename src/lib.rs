//! 商城客户端：本地持久化的购物车和登录会话，以及商城 JSON 接口前的统一请求管道。

pub mod api;
pub mod common;
pub mod conf;
pub mod model;
pub mod service;
pub mod store;

pub use api::{ApiClient, ApiEvent};
pub use common::{ApiError, ApiResult, AppError, AppResult};
pub use service::{init_services, Route, Services};
pub use store::{AuthStore, CartStore};
