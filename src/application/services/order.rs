use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use crate::domain::{ports::OrderStore, DomainError, Order, OrderStatus};

pub struct OrderService {
    store: Arc<dyn OrderStore>,
}

impl OrderService {
    pub fn new(store: Arc<dyn OrderStore>) -> Self {
        Self { store }
    }

    /// Records a pending order for a freshly created checkout session.
    #[instrument(skip(self))]
    pub async fn create_checkout(
        &self,
        user_id: Uuid,
        amount: i64,
        currency: &str,
        checkout_session_id: &str,
        price_id: &str,
    ) -> Result<Order, DomainError> {
        let order = Order::pending_checkout(user_id, amount, currency, checkout_session_id, price_id);
        self.store.insert(&order).await?;
        Ok(order)
    }

    pub async fn get_by_session(&self, session_id: &str) -> Result<Order, DomainError> {
        self.store
            .get_by_session(session_id)
            .await?
            .ok_or(DomainError::OrderNotFound)
    }

    #[instrument(skip(self))]
    pub async fn complete_by_session(&self, session_id: &str) -> Result<Order, DomainError> {
        let mut order = self.get_by_session(session_id).await?;
        order.mark(OrderStatus::Completed);
        self.store.update(&order).await?;
        Ok(order)
    }
}
