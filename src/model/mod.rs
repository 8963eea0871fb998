use serde::{Deserialize, Deserializer, Serialize};

pub mod address;
pub mod auth;
pub mod cart;
pub mod category;
pub mod order;
pub mod payment;
pub mod product;
pub mod review;

pub use address::{Address, AddressInput};
pub use auth::{AuthSession, LoginForm, LoginParams, LoginResponse, RegisterForm, RegisterParams, Role, User};
pub use cart::{AddCartItem, CartItem, CartLine, ServerCart};
pub use category::{Category, CategoryInput, CategoryQuery};
pub use order::{CreateOrder, Order, OrderItem, OrderQuery, OrderStatus};
pub use payment::{CreatePayment, Payment, PaymentCallback};
pub use product::{Product, ProductInput, ProductListParams, ProductStatus, StockUpdates};
pub use review::{CreateReview, Review};

/// 服务端统一响应信封 `{code, message, data}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub code: i32,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

/// 分页列表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub list: Vec<T>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
}

/// 分页查询参数
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

// 后端对未填写的可选字段返回空字符串
pub(crate) fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

// 图片字段可能是数组，也可能是存放 JSON 数组的字符串
pub(crate) fn image_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Images {
        List(Vec<String>),
        Text(String),
    }

    Ok(match Option::<Images>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(Images::List(list)) => list,
        Some(Images::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                Vec::new()
            } else {
                serde_json::from_str::<Vec<String>>(text).unwrap_or_else(|_| vec![text.to_string()])
            }
        }
    })
}
