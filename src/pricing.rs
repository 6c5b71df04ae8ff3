//! Pricing

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::{
    cart::{Cart, OrderType},
    coupons::{Coupon, CouponKind},
    items::LineItem,
};

/// Errors that can occur while pricing a cart.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// Line arithmetic overflowed the minor-unit range.
    #[error("line amount arithmetic overflowed")]
    AmountOverflow,

    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// A configured or coupon amount uses a different currency than the cart.
    #[error("expected currency {expected}, found {found}")]
    CurrencyMismatch {
        /// The cart currency.
        expected: &'static str,
        /// The currency of the offending amount.
        found: &'static str,
    },

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Delivery fee rule supplied by the caller: a flat fee charged on delivery
/// orders below the free-delivery threshold.
///
/// The threshold and fee are business configuration, not engine constants;
/// callers tune them without touching the pricing rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeliveryFeeConfig<'a> {
    free_delivery_threshold: Money<'a, Currency>,
    flat_fee: Money<'a, Currency>,
}

impl<'a> DeliveryFeeConfig<'a> {
    /// Creates a new delivery fee configuration.
    #[must_use]
    pub fn new(
        free_delivery_threshold: Money<'a, Currency>,
        flat_fee: Money<'a, Currency>,
    ) -> Self {
        Self {
            free_delivery_threshold,
            flat_fee,
        }
    }

    /// The subtotal (inclusive) at which delivery becomes free.
    pub fn free_delivery_threshold(&self) -> &Money<'a, Currency> {
        &self.free_delivery_threshold
    }

    /// The fee charged below the threshold.
    pub fn flat_fee(&self) -> &Money<'a, Currency> {
        &self.flat_fee
    }
}

/// Computed totals for one checkout pass over a cart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote<'a> {
    subtotal: Money<'a, Currency>,
    delivery_fee: Money<'a, Currency>,
    discount: Money<'a, Currency>,
    total: Money<'a, Currency>,
}

impl<'a> Quote<'a> {
    /// Sum of effective prices over the selected line items.
    #[must_use]
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Delivery fee after applying the free-delivery threshold.
    #[must_use]
    pub fn delivery_fee(&self) -> Money<'a, Currency> {
        self.delivery_fee
    }

    /// Coupon discount, capped at the subtotal.
    #[must_use]
    pub fn discount(&self) -> Money<'a, Currency> {
        self.discount
    }

    /// Grand total: `subtotal + delivery_fee - discount`, floored at zero.
    #[must_use]
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }
}

/// Calculates the effective price of a line item.
///
/// Add-on prices are per unit:
/// `(unit_price + sum(add_ons)) * quantity`.
///
/// # Errors
///
/// Returns [`PricingError::AmountOverflow`] if the minor-unit arithmetic
/// overflows.
pub fn line_total<'a>(item: &LineItem<'a>) -> Result<Money<'a, Currency>, PricingError> {
    let add_ons_minor = item
        .add_ons()
        .iter()
        .try_fold(0_i64, |acc, add_on| {
            acc.checked_add(add_on.price().to_minor_units())
        })
        .ok_or(PricingError::AmountOverflow)?;

    let per_unit = item
        .unit_price()
        .to_minor_units()
        .checked_add(add_ons_minor)
        .ok_or(PricingError::AmountOverflow)?;

    let total = per_unit
        .checked_mul(i64::from(item.quantity()))
        .ok_or(PricingError::AmountOverflow)?;

    Ok(Money::from_minor(total, item.unit_price().currency()))
}

/// Calculates the subtotal over the selected line items only.
///
/// Unselected items contribute nothing. An empty selection yields zero.
///
/// # Errors
///
/// Returns a [`PricingError`] if line arithmetic overflows or a money
/// operation fails.
pub fn selected_subtotal<'a>(
    items: &[LineItem<'a>],
    currency: &'static Currency,
) -> Result<Money<'a, Currency>, PricingError> {
    items
        .iter()
        .filter(|item| item.is_selected())
        .try_fold(Money::from_minor(0, currency), |acc, item| {
            Ok(acc.add(line_total(item)?)?)
        })
}

/// Calculates the delivery fee for an order.
///
/// Pickup orders never charge a fee. Delivery orders are free once the
/// subtotal reaches the configured threshold, and charge the flat fee below
/// it.
///
/// # Errors
///
/// Returns [`PricingError::CurrencyMismatch`] if the configured amounts use
/// a different currency than the subtotal.
pub fn delivery_fee<'a>(
    order_type: OrderType,
    subtotal: &Money<'a, Currency>,
    config: &DeliveryFeeConfig<'a>,
) -> Result<Money<'a, Currency>, PricingError> {
    let currency = subtotal.currency();

    if order_type != OrderType::Delivery {
        return Ok(Money::from_minor(0, currency));
    }

    let threshold = minor_in_currency(config.free_delivery_threshold(), currency)?;

    if subtotal.to_minor_units() >= threshold {
        Ok(Money::from_minor(0, currency))
    } else {
        let fee = minor_in_currency(config.flat_fee(), currency)?;

        Ok(Money::from_minor(fee, currency))
    }
}

/// Calculates the discount a coupon takes off the given subtotal.
///
/// Both kinds are capped at the subtotal: a discount can never exceed the
/// amount it discounts, even for malformed coupon data (a percentage above
/// one, or a fixed value above the subtotal). No coupon yields zero.
///
/// # Errors
///
/// Returns a [`PricingError`] if a fixed value uses a different currency
/// than the subtotal, or the percentage cannot be converted.
pub fn coupon_discount<'a>(
    coupon: Option<&Coupon<'a>>,
    subtotal: &Money<'a, Currency>,
) -> Result<Money<'a, Currency>, PricingError> {
    let currency = subtotal.currency();

    let Some(coupon) = coupon else {
        return Ok(Money::from_minor(0, currency));
    };

    let subtotal_minor = subtotal.to_minor_units();

    let raw = match coupon.kind() {
        CouponKind::Fixed(amount) => minor_in_currency(amount, currency)?,
        CouponKind::Percentage(percent) => percent_of_minor(*percent, subtotal_minor)?,
    };

    Ok(Money::from_minor(raw.min(subtotal_minor), currency))
}

/// Calculates the grand total: `subtotal + delivery_fee - discount`.
///
/// Floored at zero. With the discount capped at the subtotal and a
/// non-negative fee the floor never fires; it guards inconsistent inputs.
///
/// # Errors
///
/// Returns a [`PricingError::Money`] on a currency mismatch between the
/// three amounts.
pub fn grand_total<'a>(
    subtotal: Money<'a, Currency>,
    delivery_fee: Money<'a, Currency>,
    discount: Money<'a, Currency>,
) -> Result<Money<'a, Currency>, PricingError> {
    let total = subtotal.add(delivery_fee)?.sub(discount)?;

    if total.to_minor_units() < 0 {
        Ok(Money::from_minor(0, total.currency()))
    } else {
        Ok(total)
    }
}

/// Prices a cart against the given delivery configuration.
///
/// The discount reflects the cart's active coupon; eligibility was already
/// settled when the coupon was applied.
///
/// # Errors
///
/// Returns a [`PricingError`] if any of the component calculations fail.
pub fn quote<'a>(
    cart: &Cart<'a>,
    config: &DeliveryFeeConfig<'a>,
) -> Result<Quote<'a>, PricingError> {
    let subtotal = cart.subtotal()?;
    let fee = delivery_fee(cart.order_type(), &subtotal, config)?;
    let discount = coupon_discount(cart.coupon(), &subtotal)?;
    let total = grand_total(subtotal, fee, discount)?;

    Ok(Quote {
        subtotal,
        delivery_fee: fee,
        discount,
        total,
    })
}

/// Read an amount's minor units, insisting it is denominated in `currency`.
fn minor_in_currency(
    amount: &Money<'_, Currency>,
    currency: &Currency,
) -> Result<i64, PricingError> {
    if amount.currency() == currency {
        Ok(amount.to_minor_units())
    } else {
        Err(PricingError::CurrencyMismatch {
            expected: currency.iso_alpha_code,
            found: amount.currency().iso_alpha_code,
        })
    }
}

/// Calculate a percentage of a minor-unit amount, rounding half away from zero.
fn percent_of_minor(percent: Percentage, minor: i64) -> Result<i64, PricingError> {
    let Some(minor) = Decimal::from_i64(minor) else {
        unreachable!("always returns `Some` for every `i64`")
    };

    let applied = percent * minor;
    let rounded = applied.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    rounded.to_i64().ok_or(PricingError::PercentConversion)
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{CNY, USD};
    use testresult::TestResult;

    use crate::catalog::{ProductKey, SideItemKey, SpecKey};
    use crate::items::AddOn;

    use super::*;

    fn item(unit_minor: i64, quantity: u32) -> LineItem<'static> {
        LineItem::new(
            ProductKey::default(),
            SpecKey::default(),
            Money::from_minor(unit_minor, CNY),
            quantity,
        )
    }

    fn config(threshold_minor: i64, fee_minor: i64) -> DeliveryFeeConfig<'static> {
        DeliveryFeeConfig::new(
            Money::from_minor(threshold_minor, CNY),
            Money::from_minor(fee_minor, CNY),
        )
    }

    #[test]
    fn line_total_multiplies_add_ons_by_quantity() -> TestResult {
        let item = LineItem::with_add_ons(
            ProductKey::default(),
            SpecKey::default(),
            Money::from_minor(4500, CNY),
            2,
            [AddOn::new(SideItemKey::default(), Money::from_minor(400, CNY))],
        );

        // (45.00 + 4.00) * 2
        assert_eq!(line_total(&item)?, Money::from_minor(9800, CNY));

        Ok(())
    }

    #[test]
    fn line_total_overflow_returns_error() {
        let item = item(i64::MAX, 2);

        assert_eq!(line_total(&item), Err(PricingError::AmountOverflow));
    }

    #[test]
    fn selected_subtotal_skips_unselected_items() -> TestResult {
        let items = [
            item(4500, 1),
            item(4200, 1),
            item(1800, 2).with_selected(false),
        ];

        assert_eq!(
            selected_subtotal(&items, CNY)?,
            Money::from_minor(8700, CNY)
        );

        Ok(())
    }

    #[test]
    fn selected_subtotal_of_empty_cart_is_zero() -> TestResult {
        let items: [LineItem<'static>; 0] = [];

        assert_eq!(selected_subtotal(&items, CNY)?, Money::from_minor(0, CNY));

        Ok(())
    }

    #[test]
    fn delivery_fee_is_zero_for_pickup() -> TestResult {
        let subtotal = Money::from_minor(100, CNY);

        assert_eq!(
            delivery_fee(OrderType::Pickup, &subtotal, &config(3000, 600))?,
            Money::from_minor(0, CNY)
        );

        Ok(())
    }

    #[test]
    fn delivery_fee_waived_at_threshold() -> TestResult {
        let fee_config = config(3000, 600);

        let below = delivery_fee(
            OrderType::Delivery,
            &Money::from_minor(2500, CNY),
            &fee_config,
        )?;
        let at = delivery_fee(
            OrderType::Delivery,
            &Money::from_minor(3000, CNY),
            &fee_config,
        )?;
        let above = delivery_fee(
            OrderType::Delivery,
            &Money::from_minor(3500, CNY),
            &fee_config,
        )?;

        assert_eq!(below, Money::from_minor(600, CNY));
        assert_eq!(at, Money::from_minor(0, CNY));
        assert_eq!(above, Money::from_minor(0, CNY));

        Ok(())
    }

    #[test]
    fn delivery_fee_rejects_foreign_currency_config() {
        let fee_config = DeliveryFeeConfig::new(
            Money::from_minor(3000, USD),
            Money::from_minor(600, USD),
        );

        let result = delivery_fee(
            OrderType::Delivery,
            &Money::from_minor(2500, CNY),
            &fee_config,
        );

        assert_eq!(
            result,
            Err(PricingError::CurrencyMismatch {
                expected: "CNY",
                found: "USD",
            })
        );
    }

    #[test]
    fn fixed_discount_is_capped_at_subtotal() -> TestResult {
        let coupon = crate::coupons::Coupon::new(
            "coupon-1",
            "RAMEN10",
            "Ramen Discount Coupon",
            CouponKind::Fixed(Money::from_minor(1000, CNY)),
            Money::from_minor(0, CNY),
            "2025-12-31".parse()?,
        );

        let generous = coupon_discount(Some(&coupon), &Money::from_minor(500, CNY))?;
        let normal = coupon_discount(Some(&coupon), &Money::from_minor(8600, CNY))?;

        assert_eq!(generous, Money::from_minor(500, CNY));
        assert_eq!(normal, Money::from_minor(1000, CNY));

        Ok(())
    }

    #[test]
    fn percentage_discount_is_capped_for_malformed_values() -> TestResult {
        let coupon = crate::coupons::Coupon::new(
            "coupon-x",
            "OVER100",
            "Malformed Coupon",
            CouponKind::Percentage(Percentage::from(1.5)),
            Money::from_minor(0, CNY),
            "2025-12-31".parse()?,
        );

        let discount = coupon_discount(Some(&coupon), &Money::from_minor(2000, CNY))?;

        assert_eq!(discount, Money::from_minor(2000, CNY));

        Ok(())
    }

    #[test]
    fn percentage_discount_rounds_half_away_from_zero() -> TestResult {
        let coupon = crate::coupons::Coupon::new(
            "coupon-2",
            "NEWUSER20",
            "New User 20% Off",
            CouponKind::Percentage(Percentage::from(0.2)),
            Money::from_minor(0, CNY),
            "2025-11-30".parse()?,
        );

        // 20% of 86.25 is 17.25, kept exact in minor units.
        let exact = coupon_discount(Some(&coupon), &Money::from_minor(8625, CNY))?;
        // 20% of 0.33 is 0.066, rounded to 0.07.
        let rounded = coupon_discount(Some(&coupon), &Money::from_minor(33, CNY))?;

        assert_eq!(exact, Money::from_minor(1725, CNY));
        assert_eq!(rounded, Money::from_minor(7, CNY));

        Ok(())
    }

    #[test]
    fn no_coupon_means_zero_discount() -> TestResult {
        assert_eq!(
            coupon_discount(None, &Money::from_minor(8600, CNY))?,
            Money::from_minor(0, CNY)
        );

        Ok(())
    }

    #[test]
    fn grand_total_sums_components() -> TestResult {
        let total = grand_total(
            Money::from_minor(8600, CNY),
            Money::from_minor(0, CNY),
            Money::from_minor(1000, CNY),
        )?;

        assert_eq!(total, Money::from_minor(7600, CNY));

        Ok(())
    }

    #[test]
    fn grand_total_floors_at_zero() -> TestResult {
        // An uncapped discount larger than subtotal + fee; the floor holds.
        let total = grand_total(
            Money::from_minor(1000, CNY),
            Money::from_minor(600, CNY),
            Money::from_minor(5000, CNY),
        )?;

        assert_eq!(total, Money::from_minor(0, CNY));

        Ok(())
    }

    #[test]
    fn percent_of_minor_rounds_midpoint_away_from_zero() -> TestResult {
        assert_eq!(percent_of_minor(Percentage::from(0.5), 5)?, 3);
        assert_eq!(percent_of_minor(Percentage::from(0.25), 100)?, 25);

        Ok(())
    }
}
