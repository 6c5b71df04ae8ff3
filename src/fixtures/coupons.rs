//! Coupon Fixtures

use chrono::NaiveDate;
use rusty_money::Money;
use serde::Deserialize;

use crate::{
    coupons::{Coupon, CouponKind},
    fixtures::{
        FixtureError,
        menu::{parse_percentage, parse_price},
    },
};

/// Wrapper for coupons in YAML
#[derive(Debug, Deserialize)]
pub struct CouponsFixture {
    /// Coupon catalog, in display order
    pub coupons: Vec<CouponFixture>,
}

/// Coupon fixture from YAML
#[derive(Debug, Deserialize)]
pub struct CouponFixture {
    /// Coupon id
    pub id: String,

    /// Redemption code
    pub code: String,

    /// Display name
    pub name: String,

    /// Discount value configuration
    pub value: CouponValueFixture,

    /// Minimum qualifying subtotal (e.g., "50.00 CNY")
    pub min_order_amount: String,

    /// Last day the coupon is usable (YYYY-MM-DD)
    pub expiry_date: NaiveDate,

    /// Whether the coupon was already consumed
    #[serde(default)]
    pub is_used: bool,
}

/// Coupon value configuration from YAML
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CouponValueFixture {
    /// Fixed amount off (e.g., "10.00 CNY")
    Fixed {
        /// Amount string (e.g., "10.00 CNY")
        value: String,
    },

    /// Fraction of the subtotal (e.g., "20%" or "0.2")
    Percentage {
        /// Percentage string (e.g., "20%")
        value: String,
    },
}

impl CouponFixture {
    /// Convert to a [`Coupon`]
    ///
    /// # Errors
    ///
    /// Returns an error if the value or minimum amount cannot be parsed.
    pub fn try_into_coupon(self) -> Result<Coupon<'static>, FixtureError> {
        let kind = match self.value {
            CouponValueFixture::Fixed { value } => {
                let (minor_units, currency) = parse_price(&value)?;

                CouponKind::Fixed(Money::from_minor(minor_units, currency))
            }
            CouponValueFixture::Percentage { value } => {
                CouponKind::Percentage(parse_percentage(&value)?)
            }
        };

        let (min_minor, min_currency) = parse_price(&self.min_order_amount)?;

        let mut coupon = Coupon::new(
            self.id,
            self.code,
            self.name,
            kind,
            Money::from_minor(min_minor, min_currency),
            self.expiry_date,
        );

        if self.is_used {
            coupon.mark_used();
        }

        Ok(coupon)
    }
}

#[cfg(test)]
mod tests {
    use decimal_percentage::Percentage;
    use rusty_money::iso::CNY;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn coupon_fixture_parses_fixed_value() -> TestResult {
        let yaml = r#"
id: coupon-1
code: RAMEN10
name: Ramen Discount Coupon
value:
  type: fixed
  value: "10.00 CNY"
min_order_amount: "50.00 CNY"
expiry_date: "2025-12-31"
"#;

        let fixture: CouponFixture = serde_norway::from_str(yaml)?;
        let coupon = fixture.try_into_coupon()?;

        assert_eq!(coupon.code(), "RAMEN10");
        assert!(matches!(
            coupon.kind(),
            CouponKind::Fixed(money) if money.to_minor_units() == 1000
                && money.currency() == CNY
        ));
        assert_eq!(coupon.min_order_amount(), &Money::from_minor(5000, CNY));
        assert!(!coupon.is_used());

        Ok(())
    }

    #[test]
    fn coupon_fixture_parses_percentage_value() -> TestResult {
        let yaml = r#"
id: coupon-2
code: NEWUSER20
name: New User 20% Off
value:
  type: percentage
  value: "20%"
min_order_amount: "30.00 CNY"
expiry_date: "2025-11-30"
"#;

        let fixture: CouponFixture = serde_norway::from_str(yaml)?;
        let coupon = fixture.try_into_coupon()?;

        assert!(matches!(
            coupon.kind(),
            CouponKind::Percentage(percent) if *percent == Percentage::from(0.2)
        ));

        Ok(())
    }

    #[test]
    fn coupon_fixture_carries_used_flag() -> TestResult {
        let yaml = r#"
id: coupon-5
code: SPENT
name: Spent Coupon
value:
  type: fixed
  value: "5.00 CNY"
min_order_amount: "10.00 CNY"
expiry_date: "2025-12-31"
is_used: true
"#;

        let fixture: CouponFixture = serde_norway::from_str(yaml)?;

        assert!(fixture.try_into_coupon()?.is_used());

        Ok(())
    }

    #[test]
    fn coupon_fixture_rejects_unknown_value_type() {
        let yaml = r#"
id: coupon-9
code: WAT
name: Unknown
value:
  type: buy_one_get_one
min_order_amount: "10.00 CNY"
expiry_date: "2025-12-31"
"#;

        let result: Result<CouponFixture, _> = serde_norway::from_str(yaml);

        assert!(result.is_err());
    }
}
