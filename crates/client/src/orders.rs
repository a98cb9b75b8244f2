//! Order creation form and order list view.

use rand::Rng;
use thiserror::Error;

use omniorder_core::{Address, DEFAULT_COUNTRY, OrderStatus, Price, PriceError};

use crate::api::{ApiClient, CreateOrderRequest, Order, User};
use crate::error::ErrorDetail;
use crate::routes::Route;

/// Order numbers are drawn uniformly from `0..ORDER_NUMBER_BOUND`.
pub const ORDER_NUMBER_BOUND: u32 = 100_000;

const CREATE_FAILED: &str = "Failed to create order";

/// Pseudo-random order number.
///
/// Not guaranteed unique; the backend owns collision handling.
#[must_use]
pub fn generate_order_number() -> u32 {
    rand::rng().random_range(0..ORDER_NUMBER_BOUND)
}

/// Split a free-text item field on commas, trimming and dropping empty entries.
///
/// ```
/// use omniorder_client::orders::parse_item_list;
///
/// assert_eq!(
///     parse_item_list("Apple, Banana ,, Orange"),
///     vec!["Apple", "Banana", "Orange"]
/// );
/// ```
#[must_use]
pub fn parse_item_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Problems caught before an order is submitted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderFormError {
    #[error("Item name is required")]
    MissingItemName,
    #[error("Invalid price: {0}")]
    Price(#[from] PriceError),
}

/// Values typed into the order form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    pub item_name: String,
    pub price: String,
    pub order_number: u32,
    /// Comma-separated items.
    pub items: String,
    pub address: Address,
}

impl OrderDraft {
    /// Blank draft with a fresh order number and the user's address pre-filled.
    ///
    /// Address fields the user lacks stay blank; the country falls back to
    /// [`DEFAULT_COUNTRY`].
    #[must_use]
    pub fn new(user: Option<&User>) -> Self {
        Self {
            item_name: String::new(),
            price: String::new(),
            order_number: generate_order_number(),
            items: String::new(),
            address: user
                .and_then(|u| u.address.as_ref())
                .map(prefill_address)
                .unwrap_or_default(),
        }
    }

    /// Build the request body for `user`.
    ///
    /// # Errors
    ///
    /// Returns an [`OrderFormError`] if the item name is blank or the price is not valid.
    pub fn to_request(&self, user: &User) -> Result<CreateOrderRequest, OrderFormError> {
        let item_name = self.item_name.trim();
        if item_name.is_empty() {
            return Err(OrderFormError::MissingItemName);
        }
        let price = Price::parse(&self.price)?;

        Ok(CreateOrderRequest {
            user_id: user.id.clone(),
            item_name: item_name.to_owned(),
            price,
            order_number: self.order_number,
            item_list: parse_item_list(&self.items),
            address: self.address.clone(),
            status: OrderStatus::Booked,
        })
    }
}

fn prefill_address(saved: &Address) -> Address {
    let country = if saved.country.trim().is_empty() {
        DEFAULT_COUNTRY.to_owned()
    } else {
        saved.country.clone()
    };
    Address {
        country,
        ..saved.clone()
    }
}

/// The order creation form.
#[derive(Debug, Clone)]
pub struct OrderForm {
    pub draft: OrderDraft,
    error: Option<String>,
    loading: bool,
}

impl OrderForm {
    /// Form pre-filled for `user`.
    #[must_use]
    pub fn new(user: Option<&User>) -> Self {
        Self {
            draft: OrderDraft::new(user),
            error: None,
            loading: false,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Submit the order as `user`.
    ///
    /// On success returns the route to navigate to (the order list). On
    /// failure the form keeps its values and shows an error.
    pub async fn submit(&mut self, api: &ApiClient, user: &User) -> Option<Route> {
        self.loading = true;
        self.error = None;

        let request = match self.draft.to_request(user) {
            Ok(request) => request,
            Err(e) => {
                self.loading = false;
                self.error = Some(e.to_string());
                return None;
            }
        };

        match api.create_order(&request).await {
            Ok(response) => {
                tracing::info!(
                    order_number = request.order_number,
                    items = request.item_list.len(),
                    "Order created"
                );
                if !response.message.is_empty() {
                    tracing::debug!(message = %response.message, "Backend acknowledged order");
                }
                Some(Route::Orders)
            }
            Err(e) => {
                tracing::error!(order_number = request.order_number, error = %e, "Order creation failed");
                self.loading = false;
                self.error = Some(match e.detail() {
                    Some(detail @ (ErrorDetail::Message(_) | ErrorDetail::Fields(_))) => {
                        detail.to_string()
                    }
                    _ => CREATE_FAILED.to_owned(),
                });
                None
            }
        }
    }
}

/// The order list view.
#[derive(Debug, Clone)]
pub struct OrderList {
    orders: Vec<Order>,
    loading: bool,
}

impl Default for OrderList {
    fn default() -> Self {
        Self {
            orders: Vec::new(),
            loading: true,
        }
    }
}

impl OrderList {
    /// Empty list, loading.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the orders. A failed fetch is logged and leaves the list empty.
    pub async fn load(&mut self, api: &ApiClient) {
        self.loading = true;
        match api.list_orders(None).await {
            Ok(response) => self.orders = response.orders,
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch orders");
                self.orders.clear();
            }
        }
        self.loading = false;
    }

    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}
