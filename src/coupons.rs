//! Coupons

use chrono::NaiveDate;
use decimal_percentage::Percentage;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

/// Why a coupon could not be applied.
///
/// Checks run in a fixed order (expired, then used, then minimum) and the
/// first failure is reported, so callers surface one message at a time.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CouponInapplicable {
    /// The coupon's expiry date has passed.
    #[error("coupon expired on {0}")]
    Expired(NaiveDate),

    /// The coupon was already consumed.
    #[error("coupon has already been used")]
    Used,

    /// The qualifying subtotal has not been reached.
    #[error("order subtotal is below the coupon minimum")]
    BelowMinimum,
}

/// The discount rule a coupon carries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CouponKind<'a> {
    /// An absolute amount off the subtotal.
    Fixed(Money<'a, Currency>),

    /// A fraction of the subtotal, in `[0, 1]`.
    Percentage(Percentage),
}

/// A discount voucher gated by a minimum order amount and an expiry date.
///
/// Expiry is inclusive: the coupon remains usable through the end of its
/// expiry day.
#[derive(Debug, Clone, PartialEq)]
pub struct Coupon<'a> {
    id: String,
    code: String,
    name: String,
    kind: CouponKind<'a>,
    min_order_amount: Money<'a, Currency>,
    expiry_date: NaiveDate,
    is_used: bool,
}

impl<'a> Coupon<'a> {
    /// Creates a new, unused coupon.
    pub fn new(
        id: impl Into<String>,
        code: impl Into<String>,
        name: impl Into<String>,
        kind: CouponKind<'a>,
        min_order_amount: Money<'a, Currency>,
        expiry_date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            code: code.into(),
            name: name.into(),
            kind,
            min_order_amount,
            expiry_date,
            is_used: false,
        }
    }

    /// Returns the coupon id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the redemption code.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the discount rule.
    pub fn kind(&self) -> &CouponKind<'a> {
        &self.kind
    }

    /// Returns the minimum qualifying subtotal (inclusive).
    pub fn min_order_amount(&self) -> &Money<'a, Currency> {
        &self.min_order_amount
    }

    /// Returns the last day the coupon is usable.
    pub fn expiry_date(&self) -> NaiveDate {
        self.expiry_date
    }

    /// Whether the coupon has been consumed.
    pub fn is_used(&self) -> bool {
        self.is_used
    }

    /// Marks the coupon as consumed.
    pub fn mark_used(&mut self) {
        self.is_used = true;
    }

    /// Checks whether this coupon can be applied to the given subtotal.
    ///
    /// # Errors
    ///
    /// Returns the first failing check as a [`CouponInapplicable`] reason:
    /// expired, then used, then below the minimum order amount.
    pub fn eligibility(
        &self,
        subtotal: &Money<'_, Currency>,
        today: NaiveDate,
    ) -> Result<(), CouponInapplicable> {
        if today > self.expiry_date {
            return Err(CouponInapplicable::Expired(self.expiry_date));
        }

        if self.is_used {
            return Err(CouponInapplicable::Used);
        }

        if subtotal.to_minor_units() < self.min_order_amount.to_minor_units() {
            return Err(CouponInapplicable::BelowMinimum);
        }

        Ok(())
    }
}

/// Filters a coupon catalog down to the ones still selectable today:
/// unused and not yet expired (the expiry day itself remains valid).
pub fn available_coupons<'c, 'a>(
    coupons: &'c [Coupon<'a>],
    today: NaiveDate,
) -> impl Iterator<Item = &'c Coupon<'a>> {
    coupons
        .iter()
        .filter(move |coupon| !coupon.is_used && today <= coupon.expiry_date)
}
