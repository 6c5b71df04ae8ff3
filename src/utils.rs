//! Utils

use clap::Parser;

/// Arguments for the order demo
#[derive(Debug, Parser)]
pub struct DemoOrderArgs {
    /// Fixture set to use for the menu, coupons and starter cart
    #[clap(short, long, default_value = "ramen")]
    pub fixture: String,

    /// Coupon code to apply at checkout
    #[clap(short, long)]
    pub coupon: Option<String>,
}
