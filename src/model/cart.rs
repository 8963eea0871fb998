use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Product;

/// 本地购物车中的一行：商品快照加上选择的数量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(rename = "id")]
    pub product_id: u64,
    pub name: String,
    #[serde(default)]
    pub sku: String,
    pub price: Decimal,
    #[serde(default)]
    pub stock: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub quantity: i32,
}

impl CartLine {
    pub fn new(product: &Product, quantity: i32) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            sku: product.sku.clone(),
            price: product.price,
            stock: product.stock,
            image: product.cover().map(str::to_string),
            quantity,
        }
    }

    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

// 以下为服务端购物车接口的数据结构

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerCart {
    pub id: u64,
    pub user_id: u64,
    #[serde(default)]
    pub cart_items: Vec<CartItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: u64,
    #[serde(default)]
    pub cart_id: u64,
    pub product_id: u64,
    pub quantity: i32,
    #[serde(default = "selected_default")]
    pub selected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
}

fn selected_default() -> bool {
    true
}

#[derive(Debug, Clone, Serialize)]
pub struct AddCartItem {
    pub product_id: u64,
    pub quantity: i32,
}
