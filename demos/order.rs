//! Order Demo
//!
//! This demo loads a fixture set, optionally applies a coupon, and prints
//! the priced order summary.
//!
//! Use `-f` to load a fixture set by name
//! Use `-c` to apply a coupon code at checkout

use std::io;

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use demae::{fixtures::Fixture, pricing, summary::OrderSummary, utils::DemoOrderArgs};

/// Order Demo
#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    let args = DemoOrderArgs::parse();

    let fixture = Fixture::from_set(&args.fixture)?;
    let mut cart = fixture.cart()?;

    let today = Local::now().date_naive();

    if let Some(code) = args.coupon.as_deref() {
        let candidate = fixture.coupon(code)?.clone();

        match cart.apply_coupon(candidate, today) {
            Ok(applied) => println!("Applied coupon {}", applied.code()),
            Err(err) => println!("Coupon not applied: {err}"),
        }
    }

    let quote = pricing::quote(&cart, fixture.delivery_config()?)?;

    let stdout = io::stdout();
    let handle = stdout.lock();

    OrderSummary::new(quote).write_to(handle, &cart, fixture.menu()?)?;

    Ok(())
}
