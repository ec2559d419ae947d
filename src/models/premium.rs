use crate::entities::{SubscriptionStatus, premium_subscription_entity as subs};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct SubscribeRequest {
    #[schema(example = "device_k2j4h5l1m0")]
    pub device_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PremiumStatusResponse {
    pub is_premium: bool,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionResponse {
    pub id: i32,
    pub device_id: String,
    /// Billing reference, named after the field existing clients read.
    pub stripe_subscription_id: Option<String>,
    pub status: SubscriptionStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<subs::Model> for SubscriptionResponse {
    fn from(s: subs::Model) -> Self {
        Self {
            id: s.id,
            device_id: s.device_id,
            stripe_subscription_id: s.external_reference,
            status: s.status,
            created_at: s.created_at,
            expires_at: s.expires_at,
        }
    }
}
