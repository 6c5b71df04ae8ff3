//! Line items

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;

use crate::catalog::{ProductKey, SideItemKey, SpecKey};

/// A side item attached to a line item, priced per unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AddOn<'a> {
    side: SideItemKey,
    price: Money<'a, Currency>,
}

impl<'a> AddOn<'a> {
    /// Creates a new add-on with the given per-unit price.
    #[must_use]
    pub fn new(side: SideItemKey, price: Money<'a, Currency>) -> Self {
        Self { side, price }
    }

    /// Returns the side item this add-on refers to.
    pub fn side(&self) -> SideItemKey {
        self.side
    }

    /// Returns the per-unit price of the add-on.
    pub fn price(&self) -> &Money<'a, Currency> {
        &self.price
    }
}

/// One purchasable unit in a cart: a product in a chosen spec, with optional
/// add-ons, at the unit price captured when it was added.
#[derive(Clone, Debug, PartialEq)]
pub struct LineItem<'a> {
    product: ProductKey,
    spec: SpecKey,
    unit_price: Money<'a, Currency>,
    quantity: u32,
    add_ons: SmallVec<[AddOn<'a>; 4]>,
    selected: bool,
}

impl<'a> LineItem<'a> {
    /// Creates a new, selected line item with no add-ons.
    #[must_use]
    pub fn new(
        product: ProductKey,
        spec: SpecKey,
        unit_price: Money<'a, Currency>,
        quantity: u32,
    ) -> Self {
        Self::with_add_ons(
            product,
            spec,
            unit_price,
            quantity,
            SmallVec::<[AddOn<'a>; 4]>::new(),
        )
    }

    /// Creates a new, selected line item with the given add-ons.
    ///
    /// Add-ons form a set: a side item selected more than once collapses to
    /// a single entry, keeping the first occurrence's position and price.
    pub fn with_add_ons(
        product: ProductKey,
        spec: SpecKey,
        unit_price: Money<'a, Currency>,
        quantity: u32,
        add_ons: impl IntoIterator<Item = AddOn<'a>>,
    ) -> Self {
        let mut deduped: SmallVec<[AddOn<'a>; 4]> = SmallVec::new();

        for add_on in add_ons {
            if !deduped.iter().any(|existing| existing.side == add_on.side) {
                deduped.push(add_on);
            }
        }

        Self {
            product,
            spec,
            unit_price,
            quantity,
            add_ons: deduped,
            selected: true,
        }
    }

    /// Returns the same line item with the given selection state.
    #[must_use]
    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Returns the product of the line item.
    pub fn product(&self) -> ProductKey {
        self.product
    }

    /// Returns the chosen spec of the line item.
    pub fn spec(&self) -> SpecKey {
        self.spec
    }

    /// Returns the unit price captured when the item was added.
    pub fn unit_price(&self) -> &Money<'a, Currency> {
        &self.unit_price
    }

    /// Returns the quantity of the line item.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Returns the add-ons attached to the line item, in selection order.
    pub fn add_ons(&self) -> &[AddOn<'a>] {
        &self.add_ons
    }

    /// Whether this line item counts toward the current checkout pass.
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Returns whether two line items are the same configuration for
    /// merging: same product, same spec, and the same add-on set (compared
    /// by side item and price).
    pub fn same_configuration(&self, other: &Self) -> bool {
        self.product == other.product
            && self.spec == other.spec
            && add_on_set(&self.add_ons) == add_on_set(&other.add_ons)
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }

    pub(crate) fn merge_quantity(&mut self, additional: u32) {
        self.quantity = self.quantity.saturating_add(additional);
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub(crate) fn toggle_selected(&mut self) {
        self.selected = !self.selected;
    }
}

/// Normalise add-ons for order-insensitive set comparison.
fn add_on_set<'a>(add_ons: &[AddOn<'a>]) -> SmallVec<[(SideItemKey, i64); 4]> {
    let mut set: SmallVec<[(SideItemKey, i64); 4]> = add_ons
        .iter()
        .map(|add_on| (add_on.side, add_on.price.to_minor_units()))
        .collect();

    set.sort_unstable();
    set
}
