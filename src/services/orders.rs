use std::sync::Arc;

use super::load_user;
use crate::domain::aggregates::Order;
use crate::storage::UserStore;
use crate::{CommerceError, Result};

/// Read side of the append-only order list.
#[derive(Clone)]
pub struct OrderHistory {
    users: Arc<dyn UserStore>,
}

impl OrderHistory {
    pub fn new(users: Arc<dyn UserStore>) -> Self { Self { users } }

    /// Oldest first.
    pub async fn list(&self, user_id: &str) -> Result<Vec<Order>> {
        Ok(load_user(self.users.as_ref(), user_id).await?.orders)
    }

    pub async fn get(&self, user_id: &str, order_id: &str) -> Result<Order> {
        let user = load_user(self.users.as_ref(), user_id).await?;
        user.order(order_id).cloned().ok_or(CommerceError::OrderNotFound)
    }
}
