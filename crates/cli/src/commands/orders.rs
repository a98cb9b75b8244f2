//! Order list, order detail and order creation.

use omniorder_client::api::Order;
use omniorder_client::orders::{OrderForm, OrderList};
use omniorder_client::{Route, SessionStore};
use omniorder_core::{Address, OrderId};

use super::{CliError, prompt, require_user, show_nav};

/// Values for `orders new`; missing ones are prompted for.
#[derive(Debug, Default)]
pub struct NewOrderArgs {
    pub item_name: Option<String>,
    pub price: Option<String>,
    pub items: Option<String>,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

impl NewOrderArgs {
    /// Overlay the given address fields on the pre-filled address.
    fn apply_address(&mut self, address: &mut Address) {
        let overrides = [
            (self.street_address.take(), &mut address.street_address),
            (self.city.take(), &mut address.city),
            (self.state.take(), &mut address.state),
            (self.postal_code.take(), &mut address.postal_code),
            (self.country.take(), &mut address.country),
        ];
        for (value, field) in overrides {
            if let Some(value) = value {
                *field = value;
            }
        }
    }
}

/// Order list view.
pub async fn list(session: &SessionStore) -> Result<(), CliError> {
    require_user(session, Route::Orders)?;
    show_nav(session);

    let mut view = OrderList::new();
    view.load(session.api()).await;

    tracing::info!("My Orders");
    if view.is_empty() {
        tracing::info!("No orders yet. Create one with `omniorder orders new`.");
        return Ok(());
    }
    for order in view.orders() {
        render(order);
    }
    Ok(())
}

/// Show one order.
pub async fn show(session: &SessionStore, id: String) -> Result<(), CliError> {
    require_user(session, Route::Orders)?;

    let order = session.api().get_order(&OrderId::new(id)).await?;
    render(&order);
    if !order.item_list.is_empty() {
        tracing::info!("  Items: {}", order.item_list.join(", "));
    }
    tracing::info!("  Ship to: {}", order.address.one_line());
    Ok(())
}

/// Order creation view.
pub async fn create(session: &SessionStore, mut args: NewOrderArgs) -> Result<(), CliError> {
    let user = require_user(session, Route::NewOrder)?;
    show_nav(session);

    let mut form = OrderForm::new(Some(user));
    tracing::info!("Create New Order #{}", form.draft.order_number);

    form.draft.item_name = field(args.item_name.take(), "Item name")?;
    form.draft.price = field(args.price.take(), "Price")?;
    form.draft.items = field(args.items.take(), "Items (comma separated)")?;
    args.apply_address(&mut form.draft.address);

    match form.submit(session.api(), user).await {
        Some(route) => {
            tracing::info!("Order #{} placed", form.draft.order_number);
            tracing::debug!("Redirecting to {route}");
            list(session).await
        }
        None => Err(CliError::Form(
            form.error().unwrap_or("Failed to create order").to_owned(),
        )),
    }
}

fn field(value: Option<String>, label: &str) -> Result<String, CliError> {
    value.map_or_else(|| prompt(label), Ok)
}

fn render(order: &Order) {
    let count = order.item_list.len();
    tracing::info!(
        "{} #{} [{}] {} | {count} item{} | {}",
        order.item_name,
        order.order_number,
        order.status,
        order.price,
        if count == 1 { "" } else { "s" },
        order.item_created_at.format("%Y-%m-%d"),
    );
}
