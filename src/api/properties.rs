//! Property endpoints.

use crate::api::client::ApiClient;
use crate::api::error::ApiResponse;
use crate::api::types::{
    LinkBlockchainRequest, NewProperty, Property, PropertyBody, PropertyListBody, SellOrder,
    SellOrderListBody,
};

impl ApiClient {
    /// `POST /properties`
    pub async fn create_property(&self, property: &NewProperty) -> ApiResponse<Property> {
        let created = self
            .post::<PropertyBody, _>("/properties", property)
            .await
            .map(Property::from)?;
        tracing::info!(backend_id = %created.property_id, "Property created on backend");
        Ok(created)
    }

    /// `GET /properties`
    pub async fn list_properties(&self) -> ApiResponse<Vec<Property>> {
        self.get::<PropertyListBody>("/properties").await.map(Vec::from)
    }

    /// `GET /properties/:id`
    pub async fn get_property(&self, property_id: &str) -> ApiResponse<Property> {
        self.get::<PropertyBody>(&format!("/properties/{}", property_id))
            .await
            .map(Property::from)
    }

    /// `GET /properties/:id/sell-orders`
    pub async fn sell_orders(&self, property_id: &str) -> ApiResponse<Vec<SellOrder>> {
        self.get::<SellOrderListBody>(&format!("/properties/{}/sell-orders", property_id))
            .await
            .map(Vec::from)
    }

    /// `PUT /properties/:id` with `{blockchainId}`: attach the on-chain id to an
    /// existing backend record.
    pub async fn link_blockchain_id(&self, property_id: &str, blockchain_id: u64) -> ApiResponse<Property> {
        let body = LinkBlockchainRequest { blockchain_id };
        let linked = self
            .put::<PropertyBody, _>(&format!("/properties/{}", property_id), &body)
            .await
            .map(Property::from)?;
        tracing::info!(backend_id = %property_id, blockchain_id, "Backend record linked to chain");
        Ok(linked)
    }
}
