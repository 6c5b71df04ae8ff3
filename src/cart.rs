//! Cart

use chrono::NaiveDate;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    coupons::{Coupon, CouponInapplicable},
    items::LineItem,
    pricing::{PricingError, selected_subtotal},
};

/// How an order will be fulfilled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderType {
    /// Courier delivery; the only order type that can carry a delivery fee.
    Delivery,

    /// Collected in store; never charges a fee.
    Pickup,
}

/// Errors related to cart construction or coupon application.
#[derive(Debug, Error)]
pub enum CartError {
    /// An item's currency differs from the cart currency (index, item currency, cart currency).
    #[error("Item {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(usize, &'static str, &'static str),

    /// The candidate coupon failed an eligibility check.
    #[error(transparent)]
    Inapplicable(#[from] CouponInapplicable),

    /// The subtotal needed for an eligibility check could not be computed.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// An order in progress: ordered line items, the fulfilment type, and at
/// most one active coupon.
///
/// The cart is a plain owned value with an explicit update API; every
/// operation runs to completion synchronously and invalid updates degrade
/// to no-ops rather than raising.
#[derive(Debug)]
pub struct Cart<'a> {
    line_items: Vec<LineItem<'a>>,
    coupon: Option<Coupon<'a>>,
    order_type: OrderType,
    currency: &'static Currency,
}

impl<'a> Cart<'a> {
    /// Create a new, empty cart.
    #[must_use]
    pub fn new(order_type: OrderType, currency: &'static Currency) -> Self {
        Cart {
            line_items: Vec::new(),
            coupon: None,
            order_type,
            currency,
        }
    }

    /// Create a new cart with the given line items.
    ///
    /// # Errors
    ///
    /// Returns a `CartError` if any item's unit or add-on price is
    /// denominated in a different currency than the cart.
    pub fn with_items(
        items: impl Into<Vec<LineItem<'a>>>,
        order_type: OrderType,
        currency: &'static Currency,
    ) -> Result<Self, CartError> {
        let items = items.into();

        items
            .iter()
            .enumerate()
            .try_for_each(|(i, item)| validate_item_currency(item, i, currency))?;

        Ok(Cart {
            line_items: items,
            coupon: None,
            order_type,
            currency,
        })
    }

    /// Add a line item, merging it into an existing entry when one has the
    /// same configuration (product, spec and add-on set).
    ///
    /// A merge only increments the existing entry's quantity; otherwise the
    /// item is appended, preserving the order of existing entries.
    ///
    /// # Errors
    ///
    /// Returns a `CartError` if the item's currency differs from the cart.
    pub fn add_or_merge(&mut self, item: LineItem<'a>) -> Result<(), CartError> {
        validate_item_currency(&item, self.line_items.len(), self.currency)?;

        if let Some(existing) = self
            .line_items
            .iter_mut()
            .find(|existing| existing.same_configuration(&item))
        {
            existing.merge_quantity(item.quantity());
        } else {
            self.line_items.push(item);
        }

        Ok(())
    }

    /// Replace an item's quantity.
    ///
    /// Quantities below 1 and out-of-range references are ignored.
    pub fn set_quantity(&mut self, item: usize, quantity: u32) {
        if quantity < 1 {
            return;
        }

        if let Some(line) = self.line_items.get_mut(item) {
            line.set_quantity(quantity);
        }
    }

    /// Remove an item from the cart.
    ///
    /// Out-of-range references are ignored; remaining items keep their
    /// relative order.
    pub fn remove_item(&mut self, item: usize) {
        if item < self.line_items.len() {
            self.line_items.remove(item);
        }
    }

    /// Toggle whether an item counts toward the current checkout pass.
    ///
    /// Out-of-range references are ignored.
    pub fn toggle_selection(&mut self, item: usize) {
        if let Some(line) = self.line_items.get_mut(item) {
            line.toggle_selected();
        }
    }

    /// Select every item, unless all are already selected, in which case
    /// deselect every item.
    pub fn toggle_select_all(&mut self) {
        let all_selected = self.line_items.iter().all(LineItem::is_selected);

        for line in &mut self.line_items {
            line.set_selected(!all_selected);
        }
    }

    /// Apply a coupon, replacing any previously active one.
    ///
    /// On failure the active coupon is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Inapplicable` with the first failing eligibility
    /// check, or a `CartError::Pricing` if the subtotal could not be
    /// computed.
    pub fn apply_coupon(
        &mut self,
        candidate: Coupon<'a>,
        today: NaiveDate,
    ) -> Result<&Coupon<'a>, CartError> {
        let subtotal = self.subtotal()?;

        candidate.eligibility(&subtotal, today)?;

        Ok(self.coupon.insert(candidate))
    }

    /// Clear the active coupon. Always succeeds.
    pub fn remove_coupon(&mut self) {
        self.coupon = None;
    }

    /// Calculate the subtotal over the selected items.
    ///
    /// # Errors
    ///
    /// Returns a `PricingError` if line arithmetic overflows or a money
    /// operation fails.
    pub fn subtotal(&self) -> Result<Money<'a, Currency>, PricingError> {
        selected_subtotal(&self.line_items, self.currency)
    }

    /// Get the active coupon, if any.
    pub fn coupon(&self) -> Option<&Coupon<'a>> {
        self.coupon.as_ref()
    }

    /// Get the fulfilment type of the order.
    #[must_use]
    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    /// Get the currency of the cart.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Iterate over the line items in the cart.
    pub fn iter(&self) -> impl Iterator<Item = &LineItem<'a>> {
        self.line_items.iter()
    }

    /// Iterate over the line items included in the current checkout pass.
    pub fn selected_items(&self) -> impl Iterator<Item = &LineItem<'a>> {
        self.line_items.iter().filter(|item| item.is_selected())
    }

    /// Get a line item from the cart.
    pub fn get_item(&self, item: usize) -> Option<&LineItem<'a>> {
        self.line_items.get(item)
    }

    /// Get the number of line items in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.line_items.len()
    }

    /// Check if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.line_items.is_empty()
    }

    /// Total units across all line items, selected or not.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.line_items
            .iter()
            .map(|item| u64::from(item.quantity()))
            .sum()
    }
}

/// Check an item's unit and add-on prices against the cart currency.
fn validate_item_currency(
    item: &LineItem<'_>,
    index: usize,
    currency: &'static Currency,
) -> Result<(), CartError> {
    let mut currencies = std::iter::once(item.unit_price().currency())
        .chain(item.add_ons().iter().map(|add_on| add_on.price().currency()));

    match currencies.find(|found| *found != currency) {
        None => Ok(()),
        Some(found) => Err(CartError::CurrencyMismatch(
            index,
            found.iso_alpha_code,
            currency.iso_alpha_code,
        )),
    }
}
