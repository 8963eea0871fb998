use serde::Deserialize;

use super::ApiClient;
use crate::common::ApiResult;
use crate::model::{LoginParams, LoginResponse, RegisterParams, User};

/// 注册接口可能直接返回会话，也可能只返回新建的用户
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RegisterOutcome {
    Session(LoginResponse),
    Account(User),
}

pub async fn login(client: &ApiClient, params: &LoginParams) -> ApiResult<LoginResponse> {
    client.post("/auth/login", params).await
}

pub async fn register(client: &ApiClient, params: &RegisterParams) -> ApiResult<RegisterOutcome> {
    client.post("/auth/register", params).await
}

pub async fn current_user(client: &ApiClient) -> ApiResult<User> {
    client.get("/auth/me").await
}
