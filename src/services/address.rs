use std::sync::Arc;

use super::{load_user, modify_user};
use crate::domain::aggregates::{Address, AddressPatch, NewAddress};
use crate::storage::UserStore;
use crate::{CommerceError, Result};

#[derive(Clone)]
pub struct AddressBook {
    users: Arc<dyn UserStore>,
}

impl AddressBook {
    pub fn new(users: Arc<dyn UserStore>) -> Self { Self { users } }

    pub async fn list(&self, user_id: &str) -> Result<Vec<Address>> {
        Ok(load_user(self.users.as_ref(), user_id).await?.addresses)
    }

    #[tracing::instrument(skip(self, new))]
    pub async fn add(&self, user_id: &str, new: NewAddress) -> Result<Address> {
        let address = new
            .into_address()
            .ok_or_else(|| CommerceError::Validation("All address fields are required".into()))?;
        modify_user(self.users.as_ref(), user_id, |user| {
            user.add_address(address.clone());
            Ok(())
        })
        .await?;
        tracing::info!(user_id, address_id = %address.id, "address added");
        Ok(address)
    }

    #[tracing::instrument(skip(self, patch))]
    pub async fn update(&self, user_id: &str, address_id: &str, patch: AddressPatch) -> Result<Address> {
        let (address, _) = modify_user(self.users.as_ref(), user_id, |user| {
            user.update_address(address_id, patch.clone()).cloned().ok_or(CommerceError::AddressNotFound)
        })
        .await?;
        Ok(address)
    }

    /// Idempotent; deleting an unknown id succeeds.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, user_id: &str, address_id: &str) -> Result<usize> {
        let (removed, _) = modify_user(self.users.as_ref(), user_id, |user| Ok(user.remove_address(address_id))).await?;
        Ok(removed)
    }
}
