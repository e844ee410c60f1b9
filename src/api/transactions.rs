//! Share trading endpoints.

use crate::api::client::ApiClient;
use crate::api::error::ApiResponse;
use crate::api::types::{
    BuyRequest, MessageResponse, SellOrderRequest, TransactionListBody, TransactionRecord,
};

impl ApiClient {
    /// `POST /transactions/buy`
    pub async fn buy_from_order(&self, order_id: &str, shares_to_buy: u64) -> ApiResponse<MessageResponse> {
        let body = BuyRequest {
            order_id: order_id.to_string(),
            shares_to_buy,
        };
        self.post("/transactions/buy", &body).await
    }

    /// `POST /transactions/sell-order`
    pub async fn create_sell_order(
        &self,
        property_id: &str,
        shares: u64,
        price_per_share: f64,
    ) -> ApiResponse<MessageResponse> {
        let body = SellOrderRequest {
            property_id: property_id.to_string(),
            shares,
            price_per_share,
        };
        self.post("/transactions/sell-order", &body).await
    }

    /// `GET /transactions`
    pub async fn transactions(&self) -> ApiResponse<Vec<TransactionRecord>> {
        self.get::<TransactionListBody>("/transactions").await.map(Vec::from)
    }
}
