//! Integration tests for coupon application over the bundled fixture sets.
//!
//! The `ramen` set reproduces the storefront's menu and coupon catalog with
//! the threshold-30/fee-6 delivery pair; the starter cart holds a tonkotsu
//! with a marinated egg (¥49.00) and a miso (¥42.00) selected, plus two
//! unselected gyoza lines, for a selected subtotal of ¥91.00. The
//! `checkout` set carries the alternative threshold-50/fee-5 pair.

use chrono::NaiveDate;
use rusty_money::{Money, iso::CNY};
use testresult::TestResult;

use demae::{
    cart::CartError,
    coupons::{CouponInapplicable, available_coupons},
    fixtures::Fixture,
    pricing::quote,
};

fn today() -> Result<NaiveDate, chrono::ParseError> {
    "2025-08-04".parse()
}

#[test]
fn ramen_cart_prices_without_a_coupon() -> TestResult {
    let fixture = Fixture::from_set("ramen")?;
    let cart = fixture.cart()?;

    let quote = quote(&cart, fixture.delivery_config()?)?;

    assert_eq!(quote.subtotal(), Money::from_minor(9100, CNY));
    // ¥91.00 clears the ¥30 threshold.
    assert_eq!(quote.delivery_fee(), Money::from_minor(0, CNY));
    assert_eq!(quote.discount(), Money::from_minor(0, CNY));
    assert_eq!(quote.total(), Money::from_minor(9100, CNY));

    Ok(())
}

#[test]
fn fixed_coupon_comes_off_the_total() -> TestResult {
    let fixture = Fixture::from_set("ramen")?;
    let mut cart = fixture.cart()?;

    cart.apply_coupon(fixture.coupon("RAMEN10")?.clone(), today()?)?;

    let quote = quote(&cart, fixture.delivery_config()?)?;

    assert_eq!(quote.discount(), Money::from_minor(1000, CNY));
    assert_eq!(quote.total(), Money::from_minor(8100, CNY));

    Ok(())
}

#[test]
fn percentage_coupon_scales_with_the_subtotal() -> TestResult {
    let fixture = Fixture::from_set("ramen")?;
    let mut cart = fixture.cart()?;

    cart.apply_coupon(fixture.coupon("NEWUSER20")?.clone(), today()?)?;

    let quote = quote(&cart, fixture.delivery_config()?)?;

    // 20% of ¥91.00
    assert_eq!(quote.discount(), Money::from_minor(1820, CNY));
    assert_eq!(quote.total(), Money::from_minor(7280, CNY));

    Ok(())
}

#[test]
fn expired_coupon_is_rejected_with_a_reason() -> TestResult {
    let fixture = Fixture::from_set("ramen")?;
    let mut cart = fixture.cart()?;

    let result = cart.apply_coupon(fixture.coupon("EXPIRED")?.clone(), today()?);

    assert!(matches!(
        result,
        Err(CartError::Inapplicable(CouponInapplicable::Expired(_)))
    ));
    assert!(cart.coupon().is_none());

    Ok(())
}

#[test]
fn applying_a_new_coupon_replaces_the_old_one() -> TestResult {
    let fixture = Fixture::from_set("ramen")?;
    let mut cart = fixture.cart()?;

    cart.apply_coupon(fixture.coupon("RAMEN10")?.clone(), today()?)?;
    cart.apply_coupon(fixture.coupon("FREEDELIVERY")?.clone(), today()?)?;

    // Only one coupon is ever active.
    assert_eq!(cart.coupon().map(demae::coupons::Coupon::code), Some("FREEDELIVERY"));

    let quote = quote(&cart, fixture.delivery_config()?)?;

    assert_eq!(quote.discount(), Money::from_minor(600, CNY));
    assert_eq!(quote.total(), Money::from_minor(8500, CNY));

    Ok(())
}

#[test]
fn reapplying_the_active_coupon_is_idempotent() -> TestResult {
    let fixture = Fixture::from_set("ramen")?;
    let mut cart = fixture.cart()?;

    cart.apply_coupon(fixture.coupon("RAMEN10")?.clone(), today()?)?;
    let first = quote(&cart, fixture.delivery_config()?)?;

    cart.apply_coupon(fixture.coupon("RAMEN10")?.clone(), today()?)?;
    let second = quote(&cart, fixture.delivery_config()?)?;

    assert_eq!(first.discount(), second.discount());
    assert_eq!(first.total(), second.total());

    Ok(())
}

#[test]
fn removing_the_coupon_restores_the_undiscounted_total() -> TestResult {
    let fixture = Fixture::from_set("ramen")?;
    let mut cart = fixture.cart()?;

    cart.apply_coupon(fixture.coupon("RAMEN10")?.clone(), today()?)?;
    cart.remove_coupon();

    let quote = quote(&cart, fixture.delivery_config()?)?;

    assert_eq!(quote.discount(), Money::from_minor(0, CNY));
    assert_eq!(quote.total(), Money::from_minor(9100, CNY));

    Ok(())
}

#[test]
fn coupon_browse_filter_hides_expired_entries() -> TestResult {
    let fixture = Fixture::from_set("ramen")?;

    let available: Vec<_> = available_coupons(fixture.coupons(), today()?).collect();

    assert_eq!(available.len(), 3);
    assert!(available.iter().all(|coupon| coupon.code() != "EXPIRED"));

    Ok(())
}

#[test]
fn deselecting_items_can_invalidate_an_applied_threshold() -> TestResult {
    let fixture = Fixture::from_set("ramen")?;
    let mut cart = fixture.cart()?;

    // Deselect everything: the ¥50-minimum coupon no longer qualifies.
    cart.toggle_select_all();

    let result = cart.apply_coupon(fixture.coupon("RAMEN10")?.clone(), today()?);

    assert!(matches!(
        result,
        Err(CartError::Inapplicable(CouponInapplicable::BelowMinimum))
    ));

    Ok(())
}

#[test]
fn checkout_set_uses_the_alternative_delivery_pair() -> TestResult {
    let fixture = Fixture::from_set("checkout")?;
    let mut cart = fixture.cart()?;

    // Shoyu ¥39.00 + steamed rice ¥5.00 = ¥44.00, under the ¥50 threshold.
    let before = quote(&cart, fixture.delivery_config()?)?;

    assert_eq!(before.subtotal(), Money::from_minor(4400, CNY));
    assert_eq!(before.delivery_fee(), Money::from_minor(500, CNY));
    assert_eq!(before.total(), Money::from_minor(4900, CNY));

    cart.apply_coupon(fixture.coupon("WELCOME5")?.clone(), today()?)?;

    let after = quote(&cart, fixture.delivery_config()?)?;

    assert_eq!(after.discount(), Money::from_minor(500, CNY));
    assert_eq!(after.total(), Money::from_minor(4400, CNY));

    Ok(())
}
