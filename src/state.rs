//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use crate::config::SessionConfig;
use crate::notify::Notifier;
use crate::services::{AddressBook, CartService, CatalogService, CheckoutService, Identity, OrderHistory, SessionIssuer};
use crate::storage::{Catalog, UserStore};

/// Cheaply cloneable handle to the services behind the router.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    identity: Identity,
    catalog: CatalogService,
    cart: CartService,
    checkout: CheckoutService,
    orders: OrderHistory,
    addresses: AddressBook,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserStore>,
        catalog: Arc<dyn Catalog>,
        notifier: Arc<dyn Notifier>,
        session: SessionConfig,
        notify_timeout: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                identity: Identity::new(Arc::clone(&users), SessionIssuer::new(session)),
                catalog: CatalogService::new(Arc::clone(&catalog)),
                cart: CartService::new(Arc::clone(&users), catalog),
                checkout: CheckoutService::new(Arc::clone(&users), notifier, notify_timeout),
                orders: OrderHistory::new(Arc::clone(&users)),
                addresses: AddressBook::new(users),
            }),
        }
    }

    pub fn identity(&self) -> &Identity { &self.inner.identity }
    pub fn sessions(&self) -> &SessionIssuer { self.inner.identity.sessions() }
    pub fn catalog(&self) -> &CatalogService { &self.inner.catalog }
    pub fn cart(&self) -> &CartService { &self.inner.cart }
    pub fn checkout(&self) -> &CheckoutService { &self.inner.checkout }
    pub fn orders(&self) -> &OrderHistory { &self.inner.orders }
    pub fn addresses(&self) -> &AddressBook { &self.inner.addresses }
}
