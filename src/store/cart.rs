use rust_decimal::Decimal;
use std::sync::Arc;

use super::{load_state, save_state, Storage, CART_KEY};
use crate::model::{CartLine, Product};

/// 客户端购物车。每个商品最多一行，行按加入顺序排列。
/// 所有修改同步写回存储；写入失败只记日志，内存状态为准。
pub struct CartStore {
    lines: Vec<CartLine>,
    storage: Arc<dyn Storage>,
}

impl CartStore {
    /// 从存储恢复购物车，记录缺失或损坏时得到空购物车
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let lines = match load_state::<Vec<CartLine>>(storage.as_ref(), CART_KEY) {
            Ok(Some(lines)) => dedup_lines(lines),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("failed to restore cart, starting empty: {}", e);
                Vec::new()
            }
        };
        tracing::debug!(lines = lines.len(), "cart restored");
        Self { lines, storage }
    }

    pub fn items(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn get(&self, product_id: u64) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// 已有该商品时累加数量（饱和到 i32 边界），否则追加新行。不校验库存和数量正负。
    pub fn add_item(&mut self, product: &Product, quantity: i32) {
        match self.lines.iter_mut().find(|l| l.product_id == product.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self.lines.push(CartLine::new(product, quantity)),
        }
        self.persist();
    }

    pub fn remove_item(&mut self, product_id: u64) {
        self.lines.retain(|l| l.product_id != product_id);
        self.persist();
    }

    /// 数量 <= 0 等同于删除；商品不在购物车中时不做任何事
    pub fn update_quantity(&mut self, product_id: u64, quantity: i32) {
        if quantity <= 0 {
            self.remove_item(product_id);
            return;
        }
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            line.quantity = quantity;
        }
        self.persist();
    }

    pub fn clear_cart(&mut self) {
        self.lines.clear();
        self.persist();
    }

    pub fn total_price(&self) -> Decimal {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    pub fn total_items(&self) -> i64 {
        self.lines.iter().map(|l| i64::from(l.quantity)).sum()
    }

    fn persist(&self) {
        if let Err(e) = save_state(self.storage.as_ref(), CART_KEY, &self.lines) {
            tracing::warn!("failed to persist cart: {}", e);
        }
    }
}

// 手工改过的存储文件可能含重复商品，合并数量
fn dedup_lines(lines: Vec<CartLine>) -> Vec<CartLine> {
    let mut merged: Vec<CartLine> = Vec::with_capacity(lines.len());
    for line in lines {
        match merged.iter_mut().find(|l| l.product_id == line.product_id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
            None => merged.push(line),
        }
    }
    merged
}
