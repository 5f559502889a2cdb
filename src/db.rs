use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::models::subscriptionmodel::{BillingCycle, Subscription};

#[derive(Debug, Clone)]
pub struct DBClient {
    pool: Pool<Postgres>,
}

impl DBClient {
    pub fn new(pool: Pool<Postgres>) -> Self {
        DBClient { pool }
    }
}

#[async_trait]
pub trait SubscriptionExt {
    async fn save_subscription<T: Into<String> + Send>(
        &self,
        name: T,
        cost: BigDecimal,
        billing_cycle: BillingCycle,
        start_date: NaiveDate,
        renewal_date: NaiveDate,
        is_active: bool,
        category: T,
    ) -> Result<Subscription, sqlx::Error>;

    async fn get_subscription(
        &self,
        subscription_id: Uuid,
    ) -> Result<Option<Subscription>, sqlx::Error>;

    async fn get_active_subscriptions(&self) -> Result<Vec<Subscription>, sqlx::Error>;

    async fn update_subscription(
        &self,
        subscription_id: Uuid,
        name: String,
        cost: BigDecimal,
        billing_cycle: BillingCycle,
        start_date: NaiveDate,
        renewal_date: NaiveDate,
        is_active: bool,
        category: String,
    ) -> Result<Option<Subscription>, sqlx::Error>;

    async fn cancel_subscription(
        &self,
        subscription_id: Uuid,
    ) -> Result<Option<Subscription>, sqlx::Error>;
}

#[async_trait]
impl SubscriptionExt for DBClient {
    async fn save_subscription<T: Into<String> + Send>(
        &self,
        name: T,
        cost: BigDecimal,
        billing_cycle: BillingCycle,
        start_date: NaiveDate,
        renewal_date: NaiveDate,
        is_active: bool,
        category: T,
    ) -> Result<Subscription, sqlx::Error> {
        sqlx::query_as::<_, Subscription>(
            r#"
            INSERT INTO subscriptions (name, cost, billing_cycle, start_date, renewal_date, is_active, category)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(name.into())
        .bind(cost)
        .bind(billing_cycle)
        .bind(start_date)
        .bind(renewal_date)
        .bind(is_active)
        .bind(category.into())
        .fetch_one(&self.pool)
        .await
    }

    async fn get_subscription(
        &self,
        subscription_id: Uuid,
    ) -> Result<Option<Subscription>, sqlx::Error> {
        sqlx::query_as::<_, Subscription>(
            r#"
            SELECT * FROM subscriptions
            WHERE id = $1 AND is_active = true
            "#,
        )
        .bind(subscription_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_active_subscriptions(&self) -> Result<Vec<Subscription>, sqlx::Error> {
        sqlx::query_as::<_, Subscription>(
            r#"
            SELECT * FROM subscriptions
            WHERE is_active = true
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn update_subscription(
        &self,
        subscription_id: Uuid,
        name: String,
        cost: BigDecimal,
        billing_cycle: BillingCycle,
        start_date: NaiveDate,
        renewal_date: NaiveDate,
        is_active: bool,
        category: String,
    ) -> Result<Option<Subscription>, sqlx::Error> {
        sqlx::query_as::<_, Subscription>(
            r#"
            UPDATE subscriptions
            SET name = $2, cost = $3, billing_cycle = $4, start_date = $5,
                renewal_date = $6, is_active = $7, category = $8, updated_at = NOW()
            WHERE id = $1 AND is_active = true
            RETURNING *
            "#,
        )
        .bind(subscription_id)
        .bind(name)
        .bind(cost)
        .bind(billing_cycle)
        .bind(start_date)
        .bind(renewal_date)
        .bind(is_active)
        .bind(category)
        .fetch_optional(&self.pool)
        .await
    }

    async fn cancel_subscription(
        &self,
        subscription_id: Uuid,
    ) -> Result<Option<Subscription>, sqlx::Error> {
        sqlx::query_as::<_, Subscription>(
            r#"
            UPDATE subscriptions
            SET is_active = false, updated_at = NOW()
            WHERE id = $1 AND is_active = true
            RETURNING *
            "#,
        )
        .bind(subscription_id)
        .fetch_optional(&self.pool)
        .await
    }
}
