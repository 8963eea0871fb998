use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use url::Url;

use super::ApiEvent;
use crate::common::{ApiError, ApiResult, AppResult};
use crate::conf::ApiConfig;
use crate::model::Envelope;
use crate::store::AuthStore;

const EVENT_CAPACITY: usize = 64;

/// 所有接口调用的唯一出口：附加令牌、拆信封、分类错误。
/// 失败时除了返回错误，还会在事件通道上广播一份。
/// 401 另走一个计数器通道，广播积压时也不会丢。
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    auth: AuthStore,
    events: broadcast::Sender<ApiEvent>,
    rejections: Arc<watch::Sender<u64>>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, auth: AuthStore) -> AppResult<Self> {
        let base = Url::parse(&config.base_url)?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .tcp_keepalive(Duration::from_secs(15))
            .tcp_nodelay(true)
            .build()?;
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let (rejections, _) = watch::channel(0);

        Ok(Self {
            http,
            base_url: base.as_str().trim_end_matches('/').to_string(),
            auth,
            events,
            rejections: Arc::new(rejections),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth(&self) -> &AuthStore {
        &self.auth
    }

    /// 订阅失败事件（给用户的提示）
    pub fn subscribe(&self) -> broadcast::Receiver<ApiEvent> {
        self.events.subscribe()
    }

    /// 服务端拒绝会话（401）的累计次数，每次 401 加一
    pub fn subscribe_rejections(&self) -> watch::Receiver<u64> {
        self.rejections.subscribe()
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.call(Method::GET, path, |b| b).await
    }

    pub async fn get_with<T, Q>(&self, path: &str, query: &Q) -> ApiResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.call(Method::GET, path, |b| b.query(query)).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.call(Method::POST, path, |b| b.json(body)).await
    }

    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.call(Method::POST, path, |b| b).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.call(Method::PUT, path, |b| b.json(body)).await
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.call(Method::PATCH, path, |b| b.json(body)).await
    }

    pub async fn patch_empty<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.call(Method::PATCH, path, |b| b).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.call(Method::DELETE, path, |b| b).await
    }

    async fn call<T, F>(&self, method: Method, path: &str, prepare: F) -> ApiResult<T>
    where
        T: DeserializeOwned,
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let url = format!("{}{}", self.base_url, path);
        let mut builder = self.http.request(method.clone(), &url);
        if let Some(token) = self.auth.token() {
            builder = builder.bearer_auth(token);
        }

        tracing::debug!(%method, path, "sending request");
        let result = self.execute(prepare(builder)).await;
        if let Err(error) = &result {
            self.publish(&method, path, error);
        }
        result
    }

    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<T> {
        let request = builder.build().map_err(|e| ApiError::Build(e.to_string()))?;
        let response = self.http.execute(request).await.map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            // 已收到状态码就按状态分类，响应体只用来取 message
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status.as_u16(), server_message(&body)));
        }

        let body = response.text().await.map_err(transport_error)?;
        unwrap_envelope(&body)
    }

    pub(crate) fn publish(&self, method: &Method, path: &str, error: &ApiError) {
        tracing::warn!(%method, path, status = ?error.status(), "request failed: {}", error);
        if error.is_unauthorized() {
            self.rejections.send_modify(|count| *count += 1);
        }
        let event = ApiEvent {
            method: method.to_string(),
            path: path.to_string(),
            error: error.clone(),
        };
        // 没有订阅者时 send 返回错误，忽略即可
        let _ = self.events.send(event);
    }
}

fn transport_error(e: reqwest::Error) -> ApiError {
    if e.is_builder() {
        ApiError::Build(e.to_string())
    } else {
        ApiError::Network(e.to_string())
    }
}

/// 拆开 2xx 响应的信封，code != 0 时带原始信封返回错误
pub(crate) fn unwrap_envelope<T: DeserializeOwned>(body: &str) -> ApiResult<T> {
    let envelope: Envelope<Value> =
        serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?;

    if !envelope.is_success() {
        return Err(ApiError::Application(envelope));
    }

    serde_json::from_value(envelope.data).map_err(|e| ApiError::Decode(e.to_string()))
}

// 错误响应体里的 message 字段（如果有）
fn server_message(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        #[serde(default)]
        message: Option<String>,
    }

    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
}
