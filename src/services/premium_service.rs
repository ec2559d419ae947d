use crate::entities::{SubscriptionStatus, premium_subscription_entity as subs};
use crate::error::{AppError, AppResult};
use crate::models::*;
use chrono::{DateTime, Duration, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, Set, TransactionTrait,
};
use uuid::Uuid;

/// Length of a mock subscription.
pub const SUBSCRIPTION_DAYS: i64 = 30;

/// Outcome of evaluating a device's subscriptions at one instant.
///
/// Evaluation never writes. Subscriptions found active but past their expiry are listed in
/// `stale_ids`; the caller persists them with [`PremiumService::persist`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PremiumEvaluation {
    pub is_premium: bool,
    /// Latest expiry among valid subscriptions; `None` if nothing is valid or one never expires.
    pub expires_at: Option<DateTime<Utc>>,
    pub stale_ids: Vec<i32>,
}

impl PremiumEvaluation {
    pub fn needs_persist(&self) -> bool {
        !self.stale_ids.is_empty()
    }
}

pub fn evaluate(subscriptions: &[subs::Model], now: DateTime<Utc>) -> PremiumEvaluation {
    let mut evaluation = PremiumEvaluation::default();
    let mut never_expires = false;

    for sub in subscriptions
        .iter()
        .filter(|s| s.status == SubscriptionStatus::Active)
    {
        if !sub.is_valid_at(now) {
            evaluation.stale_ids.push(sub.id);
            continue;
        }
        evaluation.is_premium = true;
        match sub.expires_at {
            None => never_expires = true,
            Some(exp) => {
                evaluation.expires_at = Some(evaluation.expires_at.map_or(exp, |cur| cur.max(exp)))
            }
        }
    }

    if never_expires {
        evaluation.expires_at = None;
    }
    evaluation
}

#[derive(Clone)]
pub struct PremiumService {
    pool: DatabaseConnection,
}

impl PremiumService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// Phase one: read the device's active subscriptions and evaluate them.
    pub async fn evaluate_device<C: ConnectionTrait>(
        conn: &C,
        device_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<PremiumEvaluation> {
        let active = subs::Entity::find()
            .filter(subs::Column::DeviceId.eq(device_id))
            .filter(subs::Column::Status.eq(SubscriptionStatus::Active))
            .all(conn)
            .await?;
        Ok(evaluate(&active, now))
    }

    /// Phase two: mark the stale subscriptions as expired. Safe to repeat.
    pub async fn persist<C: ConnectionTrait>(
        conn: &C,
        evaluation: &PremiumEvaluation,
    ) -> AppResult<u64> {
        if !evaluation.needs_persist() {
            return Ok(0);
        }
        let result = subs::Entity::update_many()
            .col_expr(
                subs::Column::Status,
                Expr::value(SubscriptionStatus::Expired.to_value()),
            )
            .filter(subs::Column::Id.is_in(evaluation.stale_ids.clone()))
            .filter(subs::Column::Status.eq(SubscriptionStatus::Active))
            .exec(conn)
            .await?;
        Ok(result.rows_affected)
    }

    /// Evaluates a device and commits any lazy expiry. Pages without an owner are never premium.
    pub async fn check(&self, device_id: Option<&str>) -> AppResult<PremiumEvaluation> {
        let Some(device_id) = device_id.filter(|d| !d.is_empty()) else {
            return Ok(PremiumEvaluation::default());
        };

        let evaluation = Self::evaluate_device(&self.pool, device_id, Utc::now()).await?;
        if evaluation.needs_persist() {
            let txn = self.pool.begin().await?;
            let expired = Self::persist(&txn, &evaluation).await?;
            txn.commit().await?;
            log::info!("Expired {expired} premium subscription(s) for device {device_id}");
        }
        Ok(evaluation)
    }

    pub async fn is_premium(&self, device_id: &str) -> AppResult<bool> {
        Ok(self.check(Some(device_id)).await?.is_premium)
    }

    pub async fn get_status(&self, device_id: &str) -> AppResult<PremiumStatusResponse> {
        let evaluation = self.check(Some(device_id)).await?;
        Ok(PremiumStatusResponse {
            is_premium: evaluation.is_premium,
            expires_at: evaluation.expires_at,
        })
    }

    /// Mock purchase: always grants a fresh 30-day subscription, even if one is already running.
    pub async fn subscribe(&self, req: SubscribeRequest) -> AppResult<SubscriptionResponse> {
        let device_id = req
            .device_id
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .ok_or_else(|| AppError::ValidationError("Device ID is required".to_string()))?;
        if device_id.chars().count() > 64 {
            return Err(AppError::ValidationError(
                "Device ID must be at most 64 characters".to_string(),
            ));
        }

        let now = Utc::now();
        let reference = format!("sub_mock_{}", &Uuid::new_v4().simple().to_string()[..8]);

        let txn = self.pool.begin().await?;
        let created = subs::ActiveModel {
            device_id: Set(device_id),
            external_reference: Set(Some(reference)),
            status: Set(SubscriptionStatus::Active),
            created_at: Set(now),
            expires_at: Set(Some(now + Duration::days(SUBSCRIPTION_DAYS))),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        log::info!(
            "Created mock premium subscription {} for device {}",
            created.id,
            created.device_id
        );
        Ok(created.into())
    }
}
