use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{load_state, save_state, Storage, AUTH_KEY};
use crate::common::AppResult;
use crate::model::{AuthSession, User};

/// 登录会话容器。克隆得到的句柄共享同一份状态，
/// 请求管道读取令牌，会话观察者在 401 时清空它。
#[derive(Clone)]
pub struct AuthStore {
    session: Arc<RwLock<Option<AuthSession>>>,
    storage: Arc<dyn Storage>,
}

impl AuthStore {
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let session = match load_state::<AuthSession>(storage.as_ref(), AUTH_KEY) {
            Ok(Some(s)) if s.is_expired() => {
                // 过期令牌发出去也只会换来 401，直接丢弃
                tracing::info!(user = %s.user.username, "stored session expired, discarding");
                if let Err(e) = storage.remove(AUTH_KEY) {
                    tracing::warn!("failed to remove expired session: {}", e);
                }
                None
            }
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("failed to restore session: {}", e);
                None
            }
        };
        if let Some(s) = &session {
            tracing::debug!(user = %s.user.username, "session restored");
        }
        Self {
            session: Arc::new(RwLock::new(session)),
            storage,
        }
    }

    pub fn token(&self) -> Option<String> {
        self.read().as_ref().map(|s| s.token.clone())
    }

    pub fn user(&self) -> Option<User> {
        self.read().as_ref().map(|s| s.user.clone())
    }

    pub fn session(&self) -> Option<AuthSession> {
        self.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.read().as_ref().is_some_and(|s| s.user.is_admin())
    }

    /// 登录或注册成功后保存会话
    pub fn set_auth(&self, session: AuthSession) -> AppResult<()> {
        tracing::info!(user = %session.user.username, "session established");
        save_state(self.storage.as_ref(), AUTH_KEY, &session)?;
        *self.write() = Some(session);
        Ok(())
    }

    /// 清除内存和存储中的令牌与用户
    pub fn logout(&self) -> AppResult<()> {
        let previous = self.write().take();
        if let Some(s) = previous {
            tracing::info!(user = %s.user.username, "session cleared");
        }
        self.storage.remove(AUTH_KEY)
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<AuthSession>> {
        self.session.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<AuthSession>> {
        self.session.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;
    use crate::store::MemoryStorage;

    fn session() -> AuthSession {
        AuthSession {
            token: "tok-1".into(),
            expires_at: i64::MAX,
            user: User {
                id: 1,
                username: "alice".into(),
                email: "alice@example.com".into(),
                phone: None,
                role: Role::Admin,
                avatar: None,
            },
        }
    }

    #[test]
    fn authenticated_iff_session_present() {
        let storage = Arc::new(MemoryStorage::new());
        let auth = AuthStore::load(storage.clone());
        assert!(!auth.is_authenticated());
        assert_eq!(auth.token(), None);

        auth.set_auth(session()).unwrap();
        assert!(auth.is_authenticated());
        assert!(auth.is_admin());
        assert_eq!(auth.token().as_deref(), Some("tok-1"));
        assert!(storage.get(AUTH_KEY).unwrap().is_some());
    }

    #[test]
    fn handles_share_state_and_survive_reload() {
        let storage = Arc::new(MemoryStorage::new());
        let auth = AuthStore::load(storage.clone());
        let handle = auth.clone();
        auth.set_auth(session()).unwrap();
        assert_eq!(handle.user().map(|u| u.username), Some("alice".to_string()));

        let reloaded = AuthStore::load(storage);
        assert_eq!(reloaded.session(), Some(session()));
    }

    #[test]
    fn expired_session_is_dropped_on_load() {
        let storage = Arc::new(MemoryStorage::new());
        let stale = AuthSession {
            expires_at: 1,
            ..session()
        };
        save_state(storage.as_ref(), AUTH_KEY, &stale).unwrap();

        let auth = AuthStore::load(storage.clone());
        assert!(!auth.is_authenticated());
        assert_eq!(auth.token(), None);
        assert_eq!(storage.get(AUTH_KEY).unwrap(), None);
    }

    #[test]
    fn logout_clears_memory_and_storage() {
        let storage = Arc::new(MemoryStorage::new());
        let auth = AuthStore::load(storage.clone());
        auth.set_auth(session()).unwrap();

        auth.logout().unwrap();
        assert!(!auth.is_authenticated());
        assert_eq!(auth.user(), None);
        assert_eq!(storage.get(AUTH_KEY).unwrap(), None);

        // 未登录时再次登出也不报错
        auth.logout().unwrap();
    }
}
