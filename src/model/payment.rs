use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: u64,
    pub order_id: u64,
    pub payment_no: String,
    pub payment_method: String,
    pub amount: Decimal,
    pub status: String, // pending, success, failed, refunded
    #[serde(default)]
    pub third_party_no: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatePayment {
    pub order_id: u64,
    pub payment_method: String,
}

/// 模拟第三方支付回调
#[derive(Debug, Clone, Serialize)]
pub struct PaymentCallback {
    pub payment_no: String,
    pub third_party_no: String,
    pub status: String,
}
