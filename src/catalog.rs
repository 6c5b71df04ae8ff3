//! Menu catalog

use rusty_money::{Money, iso::Currency};
use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;
use thiserror::Error;

use crate::items::{AddOn, LineItem};

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

new_key_type! {
    /// Spec Key
    pub struct SpecKey;
}

new_key_type! {
    /// Side Item Key
    pub struct SideItemKey;
}

/// Errors related to catalog construction or lookups.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A price's currency differs from the menu currency (price currency, menu currency).
    #[error("Price has currency {0}, but menu has currency {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// Product not found
    #[error("Missing product")]
    MissingProduct(ProductKey),

    /// Spec not found
    #[error("Missing spec")]
    MissingSpec(SpecKey),

    /// Side item not found
    #[error("Missing side item")]
    MissingSideItem(SideItemKey),

    /// The selected spec belongs to a different product.
    #[error("Spec does not belong to the selected product")]
    SpecProductMismatch {
        /// The product the line item was built for.
        product: ProductKey,
        /// The spec that was selected.
        spec: SpecKey,
    },
}

/// Product
#[derive(Debug, Clone)]
pub struct Product {
    /// Product name
    pub name: String,

    /// The product's size/variant specs, in display order.
    pub specs: Vec<SpecKey>,
}

/// A named size/variant of a product, carrying its own price.
#[derive(Debug, Clone)]
pub struct ProductSpec<'a> {
    /// Spec name
    pub name: String,

    /// The product this spec belongs to.
    pub product: ProductKey,

    /// Unit price for this spec.
    pub price: Money<'a, Currency>,
}

/// An optional extra attachable to a line item, priced per unit.
#[derive(Debug, Clone)]
pub struct SideItem<'a> {
    /// Side item name
    pub name: String,

    /// Per-unit price.
    pub price: Money<'a, Currency>,
}

/// Menu
///
/// The catalog a cart's line items reference: products with their specs,
/// plus the side items that can be attached to a line. All prices share one
/// currency.
#[derive(Debug)]
pub struct Menu<'a> {
    products: SlotMap<ProductKey, Product>,
    specs: SlotMap<SpecKey, ProductSpec<'a>>,
    sides: SlotMap<SideItemKey, SideItem<'a>>,
    currency: &'static Currency,
}

impl<'a> Menu<'a> {
    /// Create an empty menu priced in the given currency.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Menu {
            products: SlotMap::with_key(),
            specs: SlotMap::with_key(),
            sides: SlotMap::with_key(),
            currency,
        }
    }

    /// Add a product with no specs yet.
    pub fn add_product(&mut self, name: impl Into<String>) -> ProductKey {
        self.products.insert(Product {
            name: name.into(),
            specs: Vec::new(),
        })
    }

    /// Add a spec to an existing product.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` if the product does not exist or the price
    /// currency differs from the menu currency.
    pub fn add_spec(
        &mut self,
        product: ProductKey,
        name: impl Into<String>,
        price: Money<'a, Currency>,
    ) -> Result<SpecKey, CatalogError> {
        self.require_currency(&price)?;

        if !self.products.contains_key(product) {
            return Err(CatalogError::MissingProduct(product));
        }

        let spec = self.specs.insert(ProductSpec {
            name: name.into(),
            product,
            price,
        });

        if let Some(entry) = self.products.get_mut(product) {
            entry.specs.push(spec);
        }

        Ok(spec)
    }

    /// Add a side item.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` if the price currency differs from the menu
    /// currency.
    pub fn add_side(
        &mut self,
        name: impl Into<String>,
        price: Money<'a, Currency>,
    ) -> Result<SideItemKey, CatalogError> {
        self.require_currency(&price)?;

        Ok(self.sides.insert(SideItem {
            name: name.into(),
            price,
        }))
    }

    /// Get a product from the menu.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError::MissingProduct` if the product is not found.
    pub fn product(&self, product: ProductKey) -> Result<&Product, CatalogError> {
        self.products
            .get(product)
            .ok_or(CatalogError::MissingProduct(product))
    }

    /// Get a spec from the menu.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError::MissingSpec` if the spec is not found.
    pub fn spec(&self, spec: SpecKey) -> Result<&ProductSpec<'a>, CatalogError> {
        self.specs.get(spec).ok_or(CatalogError::MissingSpec(spec))
    }

    /// Get a side item from the menu.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError::MissingSideItem` if the side item is not found.
    pub fn side(&self, side: SideItemKey) -> Result<&SideItem<'a>, CatalogError> {
        self.sides
            .get(side)
            .ok_or(CatalogError::MissingSideItem(side))
    }

    /// Build a line item for a product in a chosen spec, resolving unit and
    /// add-on prices from the menu at this moment.
    ///
    /// The quantity floor is 1; duplicate side selections collapse to one.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` if the product, spec or a side item is not
    /// found, or if the spec belongs to a different product.
    pub fn line_item(
        &self,
        product: ProductKey,
        spec: SpecKey,
        quantity: u32,
        sides: &[SideItemKey],
    ) -> Result<LineItem<'a>, CatalogError> {
        self.product(product)?;

        let spec_entry = self.spec(spec)?;

        if spec_entry.product != product {
            return Err(CatalogError::SpecProductMismatch { product, spec });
        }

        let add_ons: SmallVec<[AddOn<'a>; 4]> = sides
            .iter()
            .map(|&side| Ok(AddOn::new(side, self.side(side)?.price)))
            .collect::<Result<_, CatalogError>>()?;

        Ok(LineItem::with_add_ons(
            product,
            spec,
            spec_entry.price,
            quantity.max(1),
            add_ons,
        ))
    }

    /// Get the currency of the menu.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    fn require_currency(&self, price: &Money<'a, Currency>) -> Result<(), CatalogError> {
        if price.currency() == self.currency {
            Ok(())
        } else {
            Err(CatalogError::CurrencyMismatch(
                price.currency().iso_alpha_code,
                self.currency.iso_alpha_code,
            ))
        }
    }
}
