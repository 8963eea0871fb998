use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::route::{Navigator, Route};
use crate::store::AuthStore;

/// 监听请求管道的 401 计数；任何接口返回 401 时清除会话并跳转登录页。
/// 计数器只保留最新值，连续多次 401 合并为一次清理。
pub struct SessionObserver;

impl SessionObserver {
    pub fn spawn(
        mut rejections: watch::Receiver<u64>,
        auth: AuthStore,
        navigator: Navigator,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            while rejections.changed().await.is_ok() {
                let count = *rejections.borrow_and_update();
                tracing::info!(count, "session rejected by server, logging out");
                expire(&auth, &navigator);
            }
            tracing::debug!("session observer stopped");
        })
    }
}

fn expire(auth: &AuthStore, navigator: &Navigator) {
    if let Err(e) = auth.logout() {
        tracing::error!("failed to clear persisted session: {}", e);
    }
    navigator.navigate(Route::Login);
}
