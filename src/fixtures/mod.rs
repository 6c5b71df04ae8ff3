//! Fixtures

use std::{fs, path::PathBuf};

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    cart::{Cart, CartError},
    catalog::{CatalogError, Menu, ProductKey, SideItemKey, SpecKey},
    coupons::Coupon,
    fixtures::{
        carts::CartFixture,
        coupons::CouponsFixture,
        menu::{MenuFixture, parse_price},
    },
    items::LineItem,
    pricing::DeliveryFeeConfig,
};

pub mod carts;
pub mod coupons;
pub mod menu;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Spec not found
    #[error("Spec not found: {0}")]
    SpecNotFound(String),

    /// Side item not found
    #[error("Side item not found: {0}")]
    SideItemNotFound(String),

    /// Coupon not found
    #[error("Coupon not found: {0}")]
    CouponNotFound(String),

    /// Currency mismatch between fixture values
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No menu loaded yet
    #[error("No menu loaded; currency and catalog unknown")]
    NoMenu,

    /// No starter cart loaded
    #[error("No cart fixture loaded")]
    NoCart,

    /// Catalog construction error
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Cart construction error
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// Fixture
///
/// Loads a named set of YAML files (`menu/`, `coupons/`, `carts/` under a
/// base path) and resolves their string keys into catalog keys.
#[derive(Debug)]
pub struct Fixture<'a> {
    /// Base path for fixture files
    base_path: PathBuf,

    /// The loaded catalog and its delivery configuration
    menu: Option<Menu<'a>>,
    delivery: Option<DeliveryFeeConfig<'a>>,

    /// String key -> catalog key mappings for lookups
    product_keys: FxHashMap<String, ProductKey>,
    spec_keys: FxHashMap<String, SpecKey>,
    side_keys: FxHashMap<String, SideItemKey>,

    /// Pre-built coupon catalog
    coupons: Vec<Coupon<'a>>,

    /// Parsed starter cart, built on demand
    cart: Option<CartFixture>,
}

impl<'a> Fixture<'a> {
    /// Create a new empty fixture with the default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with a custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            menu: None,
            delivery: None,
            product_keys: FxHashMap::default(),
            spec_keys: FxHashMap::default(),
            side_keys: FxHashMap::default(),
            coupons: Vec::new(),
            cart: None,
        }
    }

    /// Load a menu (products, side items and delivery configuration) from a
    /// YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if prices
    /// disagree on currency.
    pub fn load_menu(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("menu").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: MenuFixture = serde_norway::from_str(&contents)?;

        // The delivery threshold sets the currency for the whole set.
        let (threshold_minor, currency) = parse_price(&fixture.delivery.free_threshold)?;
        let (fee_minor, fee_currency) = parse_price(&fixture.delivery.flat_fee)?;

        require_currency(currency, fee_currency)?;

        let mut menu = Menu::new(currency);

        for (key, product_fixture) in fixture.products {
            let product_key = menu.add_product(product_fixture.name);

            for spec_fixture in product_fixture.specs {
                let (minor_units, spec_currency) = parse_price(&spec_fixture.price)?;

                require_currency(currency, spec_currency)?;

                let spec_key = menu.add_spec(
                    product_key,
                    spec_fixture.name,
                    Money::from_minor(minor_units, spec_currency),
                )?;

                self.spec_keys
                    .insert(format!("{key}/{}", spec_fixture.key), spec_key);
            }

            self.product_keys.insert(key, product_key);
        }

        for (key, side_fixture) in fixture.sides {
            let (minor_units, side_currency) = parse_price(&side_fixture.price)?;

            require_currency(currency, side_currency)?;

            let side_key = menu.add_side(
                side_fixture.name,
                Money::from_minor(minor_units, side_currency),
            )?;

            self.side_keys.insert(key, side_key);
        }

        self.delivery = Some(DeliveryFeeConfig::new(
            Money::from_minor(threshold_minor, currency),
            Money::from_minor(fee_minor, currency),
        ));

        self.menu = Some(menu);

        Ok(self)
    }

    /// Load coupons from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a
    /// coupon value cannot be converted.
    pub fn load_coupons(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("coupons").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: CouponsFixture = serde_norway::from_str(&contents)?;

        for coupon_fixture in fixture.coupons {
            self.coupons.push(coupon_fixture.try_into_coupon()?);
        }

        Ok(self)
    }

    /// Load a starter cart from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_cart(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("carts").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: CartFixture = serde_norway::from_str(&contents)?;

        self.cart = Some(fixture);

        Ok(self)
    }

    /// Load a complete fixture set (menu, coupons and cart with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture
            .load_menu(name)?
            .load_coupons(name)?
            .load_cart(name)?;

        Ok(fixture)
    }

    /// Get the loaded menu
    ///
    /// # Errors
    ///
    /// Returns an error if no menu has been loaded yet.
    pub fn menu(&self) -> Result<&Menu<'a>, FixtureError> {
        self.menu.as_ref().ok_or(FixtureError::NoMenu)
    }

    /// Get the loaded delivery fee configuration
    ///
    /// # Errors
    ///
    /// Returns an error if no menu has been loaded yet.
    pub fn delivery_config(&self) -> Result<&DeliveryFeeConfig<'a>, FixtureError> {
        self.delivery.as_ref().ok_or(FixtureError::NoMenu)
    }

    /// Get the currency of the loaded set
    ///
    /// # Errors
    ///
    /// Returns an error if no menu has been loaded yet.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        Ok(self.menu()?.currency())
    }

    /// Get all loaded coupons
    pub fn coupons(&self) -> &[Coupon<'a>] {
        &self.coupons
    }

    /// Get a coupon by its redemption code
    ///
    /// # Errors
    ///
    /// Returns an error if no coupon carries the code.
    pub fn coupon(&self, code: &str) -> Result<&Coupon<'a>, FixtureError> {
        self.coupons
            .iter()
            .find(|coupon| coupon.code() == code)
            .ok_or_else(|| FixtureError::CouponNotFound(code.to_string()))
    }

    /// Get a product key by its fixture key
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product_key(&self, key: &str) -> Result<ProductKey, FixtureError> {
        self.product_keys
            .get(key)
            .copied()
            .ok_or_else(|| FixtureError::ProductNotFound(key.to_string()))
    }

    /// Get a spec key by its product and spec fixture keys
    ///
    /// # Errors
    ///
    /// Returns an error if the spec is not found.
    pub fn spec_key(&self, product: &str, spec: &str) -> Result<SpecKey, FixtureError> {
        self.spec_keys
            .get(&format!("{product}/{spec}"))
            .copied()
            .ok_or_else(|| FixtureError::SpecNotFound(format!("{product}/{spec}")))
    }

    /// Get a side item key by its fixture key
    ///
    /// # Errors
    ///
    /// Returns an error if the side item is not found.
    pub fn side_key(&self, key: &str) -> Result<SideItemKey, FixtureError> {
        self.side_keys
            .get(key)
            .copied()
            .ok_or_else(|| FixtureError::SideItemNotFound(key.to_string()))
    }

    /// Build the starter cart from the loaded fixtures
    ///
    /// # Errors
    ///
    /// Returns an error if no menu or cart fixture has been loaded, or if a
    /// cart line references keys missing from the menu.
    pub fn cart(&self) -> Result<Cart<'a>, FixtureError> {
        let menu = self.menu()?;
        let cart_fixture = self.cart.as_ref().ok_or(FixtureError::NoCart)?;

        let mut items: Vec<LineItem<'a>> = Vec::with_capacity(cart_fixture.items.len());

        for line in &cart_fixture.items {
            let product = self.product_key(&line.product)?;
            let spec = self.spec_key(&line.product, &line.spec)?;

            let sides = line
                .sides
                .iter()
                .map(|side| self.side_key(side))
                .collect::<Result<Vec<_>, _>>()?;

            let item = menu
                .line_item(product, spec, line.quantity, &sides)?
                .with_selected(line.selected);

            items.push(item);
        }

        Ok(Cart::with_items(
            items,
            cart_fixture.order_type.into(),
            menu.currency(),
        )?)
    }
}

impl Default for Fixture<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Surface a currency that disagrees with the set's currency.
fn require_currency(
    expected: &'static Currency,
    found: &'static Currency,
) -> Result<(), FixtureError> {
    if expected == found {
        Ok(())
    } else {
        Err(FixtureError::CurrencyMismatch(
            expected.iso_alpha_code.to_string(),
            found.iso_alpha_code.to_string(),
        ))
    }
}
