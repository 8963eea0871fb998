pub mod route;
pub mod session;

pub use route::{guard, Navigator, Route};
pub use session::SessionObserver;

use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::api::{self, auth::RegisterOutcome, ApiClient};
use crate::common::{AppError, AppResult};
use crate::conf::{ApiConfig, Settings};
use crate::model::{AuthSession, LoginForm, LoginParams, RegisterForm, User};
use crate::store::{AuthStore, CartStore, FileStorage, Storage};

/// 应用根：持有请求管道、会话、购物车和当前路由，由它注入到各个页面
pub struct Services {
    pub api: ApiClient,
    pub auth: AuthStore,
    pub cart: CartStore,
    pub navigator: Navigator,
    observer: JoinHandle<()>,
}

/// 初始化所有服务，必须在 tokio 运行时内调用
pub fn init_services(settings: &Settings) -> AppResult<Services> {
    let storage = FileStorage::open(&settings.storage.dir)?;
    tracing::info!(dir = %storage.dir().display(), "local storage opened");
    Services::with_storage(&settings.api, Arc::new(storage))
}

impl Services {
    pub fn with_storage(config: &ApiConfig, storage: Arc<dyn Storage>) -> AppResult<Self> {
        let auth = AuthStore::load(storage.clone());
        let cart = CartStore::load(storage);
        let api = ApiClient::new(config, auth.clone())?;
        let navigator = Navigator::new(Route::Home);

        // 在发出任何请求之前订阅，保证不漏掉 401
        let observer = SessionObserver::spawn(api.subscribe_rejections(), auth.clone(), navigator.clone());
        tracing::info!(base_url = api.base_url(), "services initialized");

        Ok(Self {
            api,
            auth,
            cart,
            navigator,
            observer,
        })
    }

    pub async fn login(&self, form: &LoginForm) -> AppResult<User> {
        let params = form.validate().map_err(AppError::Validation)?;
        self.sign_in(&params).await
    }

    /// 注册；服务端只返回用户时再用同一组凭据登录一次
    pub async fn register(&self, form: &RegisterForm) -> AppResult<User> {
        let params = form.validate().map_err(AppError::Validation)?;
        match api::auth::register(&self.api, &params).await? {
            RegisterOutcome::Session(resp) => self.establish(resp.into()),
            RegisterOutcome::Account(user) => {
                tracing::debug!(user = %user.username, "registered, signing in");
                let login = LoginParams {
                    username: params.username,
                    password: params.password,
                };
                self.sign_in(&login).await
            }
        }
    }

    /// 用户主动登出。购物车保留在本地。
    pub fn logout(&self) -> AppResult<()> {
        self.auth.logout()?;
        self.navigator.navigate(Route::Home);
        Ok(())
    }

    /// 按登录状态守卫后跳转，返回实际到达的路由
    pub fn visit(&self, route: Route) -> Route {
        let target = guard(route, &self.auth);
        self.navigator.navigate(target);
        target
    }

    async fn sign_in(&self, params: &LoginParams) -> AppResult<User> {
        let resp = api::auth::login(&self.api, params).await?;
        self.establish(resp.into())
    }

    fn establish(&self, session: AuthSession) -> AppResult<User> {
        let user = session.user.clone();
        self.auth.set_auth(session)?;
        self.navigator.navigate(Route::Home);
        Ok(user)
    }
}

impl Drop for Services {
    fn drop(&mut self) {
        self.observer.abort();
    }
}
