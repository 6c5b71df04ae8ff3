//! Cart Fixtures

use serde::Deserialize;

use crate::cart::OrderType;

/// Wrapper for a starter cart in YAML
#[derive(Debug, Deserialize)]
pub struct CartFixture {
    /// How the order will be fulfilled
    pub order_type: OrderTypeFixture,

    /// Cart lines, in display order
    pub items: Vec<CartItemFixture>,
}

/// Order type from YAML
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderTypeFixture {
    /// Courier delivery
    Delivery,

    /// Collected in store
    Pickup,
}

impl From<OrderTypeFixture> for OrderType {
    fn from(fixture: OrderTypeFixture) -> Self {
        match fixture {
            OrderTypeFixture::Delivery => OrderType::Delivery,
            OrderTypeFixture::Pickup => OrderType::Pickup,
        }
    }
}

/// One cart line from YAML, referencing menu fixture keys
#[derive(Debug, Deserialize)]
pub struct CartItemFixture {
    /// Product key in the menu fixture
    pub product: String,

    /// Spec key within the product
    pub spec: String,

    /// Units ordered
    pub quantity: u32,

    /// Side item keys attached to this line
    #[serde(default)]
    pub sides: Vec<String>,

    /// Whether the line counts toward the current checkout pass
    #[serde(default = "selected_default")]
    pub selected: bool,
}

fn selected_default() -> bool {
    true
}
