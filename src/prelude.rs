//! Demae prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, OrderType},
    catalog::{CatalogError, Menu, Product, ProductKey, ProductSpec, SideItem, SideItemKey, SpecKey},
    coupons::{Coupon, CouponInapplicable, CouponKind, available_coupons},
    fixtures::{Fixture, FixtureError},
    items::{AddOn, LineItem},
    pricing::{
        DeliveryFeeConfig, PricingError, Quote, coupon_discount, delivery_fee, grand_total,
        line_total, quote, selected_subtotal,
    },
    summary::{OrderSummary, SummaryError},
};
