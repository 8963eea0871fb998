use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;

use crate::store::AuthStore;

/// 前端页面路由
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Products,
    ProductDetail(u64),
    Login,
    Register,
    Cart,
    Profile,
    Orders,
    AdminProducts,
}

impl Route {
    /// 解析路径，未知路径回到首页
    pub fn parse(path: &str) -> Route {
        let segments: Vec<&str> = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            [] => Route::Home,
            ["products"] => Route::Products,
            ["products", id] => id.parse().map(Route::ProductDetail).unwrap_or(Route::Home),
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["cart"] => Route::Cart,
            ["profile"] => Route::Profile,
            ["orders"] => Route::Orders,
            ["admin", "products"] => Route::AdminProducts,
            _ => Route::Home,
        }
    }

    pub fn requires_auth(&self) -> bool {
        matches!(
            self,
            Route::Cart | Route::Profile | Route::Orders | Route::AdminProducts
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Home => write!(f, "/"),
            Route::Products => write!(f, "/products"),
            Route::ProductDetail(id) => write!(f, "/products/{}", id),
            Route::Login => write!(f, "/login"),
            Route::Register => write!(f, "/register"),
            Route::Cart => write!(f, "/cart"),
            Route::Profile => write!(f, "/profile"),
            Route::Orders => write!(f, "/orders"),
            Route::AdminProducts => write!(f, "/admin/products"),
        }
    }
}

/// 需要登录的页面在未登录时跳到登录页
pub fn guard(route: Route, auth: &AuthStore) -> Route {
    if route.requires_auth() && !auth.is_authenticated() {
        Route::Login
    } else {
        route
    }
}

/// 当前路由，可被多个组件共享和订阅
#[derive(Clone)]
pub struct Navigator {
    current: Arc<watch::Sender<Route>>,
}

impl Navigator {
    pub fn new(initial: Route) -> Self {
        let (tx, _) = watch::channel(initial);
        Self {
            current: Arc::new(tx),
        }
    }

    pub fn navigate(&self, route: Route) {
        tracing::debug!(%route, "navigate");
        self.current.send_replace(route);
    }

    pub fn current(&self) -> Route {
        *self.current.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.current.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AuthSession, Role, User};
    use crate::store::MemoryStorage;

    #[test]
    fn parses_known_paths() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse(""), Route::Home);
        assert_eq!(Route::parse("/products"), Route::Products);
        assert_eq!(Route::parse("/products/42"), Route::ProductDetail(42));
        assert_eq!(Route::parse("/login?from=cart"), Route::Login);
        assert_eq!(Route::parse("/admin/products/"), Route::AdminProducts);
    }

    #[test]
    fn unknown_paths_fall_back_home() {
        assert_eq!(Route::parse("/nowhere"), Route::Home);
        assert_eq!(Route::parse("/products/abc"), Route::Home);
        assert_eq!(Route::parse("/admin"), Route::Home);
    }

    #[test]
    fn display_round_trips() {
        for route in [
            Route::Home,
            Route::Products,
            Route::ProductDetail(7),
            Route::Login,
            Route::Register,
            Route::Cart,
            Route::Profile,
            Route::Orders,
            Route::AdminProducts,
        ] {
            assert_eq!(Route::parse(&route.to_string()), route);
        }
    }

    #[test]
    fn guard_redirects_without_session() {
        let auth = AuthStore::load(Arc::new(MemoryStorage::new()));
        assert_eq!(guard(Route::Cart, &auth), Route::Login);
        assert_eq!(guard(Route::Orders, &auth), Route::Login);
        assert_eq!(guard(Route::Products, &auth), Route::Products);

        auth.set_auth(AuthSession {
            token: "t".into(),
            expires_at: i64::MAX,
            user: User {
                id: 1,
                username: "u".into(),
                email: "u@example.com".into(),
                phone: None,
                role: Role::User,
                avatar: None,
            },
        })
        .unwrap();
        assert_eq!(guard(Route::Cart, &auth), Route::Cart);
    }

    #[test]
    fn navigator_notifies_subscribers() {
        let nav = Navigator::new(Route::Home);
        let mut rx = nav.subscribe();
        assert!(!rx.has_changed().unwrap());

        nav.navigate(Route::Login);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), Route::Login);
        assert_eq!(nav.current(), Route::Login);
    }
}
