//! Order summary

use std::io;

use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{Alignment, Color, Style, object::{Columns, Rows}},
};
use thiserror::Error;

use crate::{
    cart::{Cart, OrderType},
    catalog::{CatalogError, Menu},
    items::LineItem,
    pricing::{PricingError, Quote, line_total},
};

/// Errors that can occur when writing an order summary.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// A line item referenced catalog data that no longer exists.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Error computing a line total.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// IO error
    #[error("IO error")]
    Io,
}

/// Printable summary of a priced cart: an itemised table of the selected
/// lines followed by the totals block.
#[derive(Debug, Clone, Copy)]
pub struct OrderSummary<'a> {
    quote: Quote<'a>,
}

impl<'a> OrderSummary<'a> {
    /// Create a summary for a computed quote.
    #[must_use]
    pub fn new(quote: Quote<'a>) -> Self {
        Self { quote }
    }

    /// The quote this summary prints.
    #[must_use]
    pub fn quote(&self) -> &Quote<'a> {
        &self.quote
    }

    /// Prints the summary.
    ///
    /// Only selected line items are listed; the delivery row appears for
    /// delivery orders only (showing `FREE` above the threshold) and the
    /// discount row only when a coupon takes something off.
    ///
    /// # Errors
    ///
    /// Returns a [`SummaryError`] if a line item references missing catalog
    /// data or the output cannot be written.
    pub fn write_to(
        &self,
        mut out: impl io::Write,
        cart: &Cart<'a>,
        menu: &Menu<'a>,
    ) -> Result<(), SummaryError> {
        write_item_table(&mut out, cart, menu)?;
        write_totals(&mut out, &self.quote, cart.order_type())?;

        Ok(())
    }
}

fn write_item_table(
    out: &mut impl io::Write,
    cart: &Cart<'_>,
    menu: &Menu<'_>,
) -> Result<(), SummaryError> {
    let mut builder = Builder::default();

    builder.push_record(["Item", "Spec", "Add-ons", "Qty", "Line Total"]);

    for item in cart.selected_items() {
        builder.push_record(item_row(item, menu)?);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(3..5), Alignment::right());

    writeln!(out, "{table}").map_err(|_err| SummaryError::Io)
}

fn item_row(item: &LineItem<'_>, menu: &Menu<'_>) -> Result<[String; 5], SummaryError> {
    let product = menu.product(item.product())?;
    let spec = menu.spec(item.spec())?;

    let add_ons = item
        .add_ons()
        .iter()
        .map(|add_on| menu.side(add_on.side()).map(|side| side.name.clone()))
        .collect::<Result<Vec<_>, _>>()?
        .join(", ");

    let total = line_total(item)?;

    Ok([
        product.name.clone(),
        spec.name.clone(),
        add_ons,
        item.quantity().to_string(),
        format!("{total}"),
    ])
}

fn write_totals(
    out: &mut impl io::Write,
    quote: &Quote<'_>,
    order_type: OrderType,
) -> Result<(), SummaryError> {
    let mut rows: Vec<(&str, String)> = vec![("Subtotal:", format!("{}", quote.subtotal()))];

    if order_type == OrderType::Delivery {
        rows.push(("Delivery:", delivery_display(quote.delivery_fee())));
    }

    if quote.discount().to_minor_units() > 0 {
        rows.push(("Discount:", format!("-{}", quote.discount())));
    }

    rows.push(("Total:", format!("{}", quote.total())));

    let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let value_width = rows.iter().map(|(_, value)| value.len()).max().unwrap_or(0);

    for (label, value) in rows {
        writeln!(out, " {label:>label_width$}  {value:>value_width$}")
            .map_err(|_err| SummaryError::Io)?;
    }

    writeln!(out).map_err(|_err| SummaryError::Io)
}

/// A waived fee prints as `FREE`, matching the storefront label.
fn delivery_display(fee: Money<'_, Currency>) -> String {
    if fee.to_minor_units() == 0 {
        "FREE".to_string()
    } else {
        format!("{fee}")
    }
}
