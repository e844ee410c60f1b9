//! Wire types for the platform REST API.
//!
//! All bodies use camelCase keys. Response types tolerate both the wrapped
//! (`{"property": {...}}`) and bare forms the backend returns.
//!
//! Records may carry a storage key `_id` next to their domain id
//! (`propertyId`, `orderId`, ...). The domain id wins; `_id` is only used
//! when the domain id is absent.

use serde::{Deserialize, Serialize};

/// Domain id if present, otherwise the storage key.
fn resolve_id(
    domain_id: Option<String>,
    storage_id: Option<String>,
    key: &'static str,
) -> Result<String, String> {
    domain_id
        .or(storage_id)
        .ok_or_else(|| format!("missing field `{}` (or `_id`)", key))
}

/// A property record as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "PropertyRecord")]
pub struct Property {
    /// Backend identifier.
    pub property_id: String,
    pub name: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub current_price: f64,
    pub total_shares: u64,
    pub available_shares: u64,
    /// On-chain identifier, set once the chain-side creation is linked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blockchain_id: Option<u64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PropertyRecord {
    #[serde(default)]
    property_id: Option<String>,
    #[serde(default, rename = "_id")]
    storage_id: Option<String>,
    name: String,
    location: String,
    #[serde(default)]
    description: Option<String>,
    current_price: f64,
    total_shares: u64,
    #[serde(default)]
    available_shares: u64,
    #[serde(default)]
    blockchain_id: Option<u64>,
}

impl TryFrom<PropertyRecord> for Property {
    type Error = String;

    fn try_from(record: PropertyRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            property_id: resolve_id(record.property_id, record.storage_id, "propertyId")?,
            name: record.name,
            location: record.location,
            description: record.description,
            current_price: record.current_price,
            total_shares: record.total_shares,
            available_shares: record.available_shares,
            blockchain_id: record.blockchain_id,
        })
    }
}

impl Property {
    /// At least one share exists and available shares never exceed total shares.
    pub fn shares_consistent(&self) -> bool {
        self.total_shares > 0 && self.available_shares <= self.total_shares
    }

    pub fn is_on_chain(&self) -> bool {
        self.blockchain_id.is_some()
    }
}

/// Body of `POST /properties`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProperty {
    pub name: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub current_price: f64,
    pub total_shares: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blockchain_id: Option<u64>,
}

/// Body of `PUT /properties/:id` when linking the on-chain identifier.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkBlockchainRequest {
    pub blockchain_id: u64,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum PropertyBody {
    Wrapped { property: Property },
    Bare(Property),
}

impl From<PropertyBody> for Property {
    fn from(body: PropertyBody) -> Self {
        match body {
            PropertyBody::Wrapped { property } => property,
            PropertyBody::Bare(property) => property,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum PropertyListBody {
    Wrapped { properties: Vec<Property> },
    Bare(Vec<Property>),
}

impl From<PropertyListBody> for Vec<Property> {
    fn from(body: PropertyListBody) -> Self {
        match body {
            PropertyListBody::Wrapped { properties } => properties,
            PropertyListBody::Bare(properties) => properties,
        }
    }
}

/// Summary of a property inside a user's holdings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDetails {
    pub property_id: String,
    pub name: String,
    pub location: String,
    pub current_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub property_details: PropertyDetails,
    pub shares_owned: u64,
    pub total_value: f64,
}

/// The authenticated user's profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "UserRecord")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Platform balance.
    pub wallet: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
    pub holdings: Vec<Holding>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, rename = "_id")]
    storage_id: Option<String>,
    name: String,
    email: String,
    #[serde(default)]
    wallet: f64,
    #[serde(default)]
    wallet_address: Option<String>,
    #[serde(default)]
    holdings: Vec<Holding>,
}

impl TryFrom<UserRecord> for User {
    type Error = String;

    fn try_from(record: UserRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: resolve_id(record.id, record.storage_id, "id")?,
            name: record.name,
            email: record.email,
            wallet: record.wallet,
            wallet_address: record.wallet_address,
            holdings: record.holdings,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum UserBody {
    Wrapped { user: User },
    Bare(User),
}

impl From<UserBody> for User {
    fn from(body: UserBody) -> Self {
        match body {
            UserBody::Wrapped { user } => user,
            UserBody::Bare(user) => user,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkWalletRequest {
    pub wallet_address: String,
}

/// An open offer to sell shares of a property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "SellOrderRecord")]
pub struct SellOrder {
    pub order_id: String,
    pub property_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller: Option<String>,
    pub shares: u64,
    pub price_per_share: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SellOrderRecord {
    #[serde(default)]
    order_id: Option<String>,
    #[serde(default, rename = "_id")]
    storage_id: Option<String>,
    property_id: String,
    #[serde(default)]
    seller: Option<String>,
    shares: u64,
    price_per_share: f64,
    #[serde(default)]
    status: Option<String>,
}

impl TryFrom<SellOrderRecord> for SellOrder {
    type Error = String;

    fn try_from(record: SellOrderRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            order_id: resolve_id(record.order_id, record.storage_id, "orderId")?,
            property_id: record.property_id,
            seller: record.seller,
            shares: record.shares,
            price_per_share: record.price_per_share,
            status: record.status,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum SellOrderListBody {
    Wrapped {
        #[serde(alias = "sellOrders")]
        orders: Vec<SellOrder>,
    },
    Bare(Vec<SellOrder>),
}

impl From<SellOrderListBody> for Vec<SellOrder> {
    fn from(body: SellOrderListBody) -> Self {
        match body {
            SellOrderListBody::Wrapped { orders } => orders,
            SellOrderListBody::Bare(orders) => orders,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyRequest {
    pub order_id: String,
    pub shares_to_buy: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellOrderRequest {
    pub property_id: String,
    pub shares: u64,
    pub price_per_share: f64,
}

/// A trade recorded by the backend. Unknown fields are kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "TransactionWire")]
pub struct TransactionRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shares: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_per_share: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionWire {
    #[serde(default)]
    transaction_id: Option<String>,
    #[serde(default, rename = "_id")]
    storage_id: Option<String>,
    #[serde(default)]
    property_id: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    shares: Option<u64>,
    #[serde(default)]
    price_per_share: Option<f64>,
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

impl From<TransactionWire> for TransactionRecord {
    fn from(wire: TransactionWire) -> Self {
        Self {
            transaction_id: wire.transaction_id.or(wire.storage_id),
            property_id: wire.property_id,
            kind: wire.kind,
            shares: wire.shares,
            price_per_share: wire.price_per_share,
            extra: wire.extra,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum TransactionListBody {
    Wrapped { transactions: Vec<TransactionRecord> },
    Bare(Vec<TransactionRecord>),
}

impl From<TransactionListBody> for Vec<TransactionRecord> {
    fn from(body: TransactionListBody) -> Self {
        match body {
            TransactionListBody::Wrapped { transactions } => transactions,
            TransactionListBody::Bare(transactions) => transactions,
        }
    }
}

/// Generic acknowledgement (`{"message": ...}` plus whatever else the backend sends).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
