use std::io;

use clap::Args;
use gran::{
    checkout::submit_order,
    orders::{CustomerDetails, OrderLog},
    pricing::format_price,
};
use jiff::Timestamp;

use super::{CommandError, Context, report};
use crate::render;

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Customer name
    #[arg(long)]
    name: String,

    /// Contact phone
    #[arg(long)]
    phone: String,

    /// Contact email
    #[arg(long)]
    email: String,

    /// Delivery address
    #[arg(long)]
    address: String,

    /// Optional comment for the shop
    #[arg(long)]
    message: Option<String>,
}

impl From<CheckoutArgs> for CustomerDetails {
    fn from(args: CheckoutArgs) -> Self {
        Self {
            name: args.name,
            phone: args.phone,
            email: args.email,
            address: args.address,
            message: args.message,
        }
    }
}

pub(crate) fn place(
    ctx: &Context,
    args: CheckoutArgs,
    out: &mut impl io::Write,
) -> Result<(), CommandError> {
    let mut cart = ctx.cart();
    let orders = OrderLog::new(ctx.storage.clone());

    let order = submit_order(&mut cart, &orders, args.into(), Timestamp::now())?;

    report(&cart, out)?;
    writeln!(
        out,
        "order total: {} ({} lines)",
        format_price(order.total, ctx.currency),
        order.items.len()
    )?;

    Ok(())
}

pub(crate) fn list(ctx: &Context, out: &mut impl io::Write) -> Result<(), CommandError> {
    let orders = OrderLog::new(ctx.storage.clone()).orders()?;

    writeln!(out, "{}", render::orders_table(&orders, ctx.currency))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use gran::{
        checkout::CheckoutError,
        messages,
        orders::OrderLogError,
        storage::{FileStorage, ORDERS_KEY, Storage},
    };
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use super::*;
    use crate::cli::test_support::{cli, output};

    const CUSTOMER: [&str; 9] = [
        "checkout",
        "--name",
        "Anna",
        "--phone",
        "+7 900 000 00 00",
        "--email",
        "anna@example.com",
        "--address",
        "Moscow",
    ];

    #[test]
    fn checkout_records_the_order_and_empties_the_cart() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = dir.path().join("storage.json");

        output(cli(&storage, &["add", "--id", "p1", "--name", "Pendant", "--price", "2500"])?)?;

        let placed = output(cli(&storage, &CUSTOMER)?)?;

        assert!(placed.starts_with(messages::ORDER_PLACED), "{placed}");
        assert!(placed.contains("(1 lines)"), "{placed}");

        let orders = OrderLog::new(FileStorage::new(&storage)).orders()?;

        assert_eq!(orders.len(), 1);
        assert_eq!(orders.first().map(|order| order.total), Some(Decimal::from(2500)));

        let listed = output(cli(&storage, &["orders"])?)?;

        assert!(listed.contains("Anna"), "{listed}");

        let shown = output(cli(&storage, &["show"])?)?;

        assert_eq!(shown, format!("{}\n", messages::CART_EMPTY));

        Ok(())
    }

    #[test]
    fn empty_cart_cannot_be_checked_out() -> TestResult {
        let dir = tempfile::tempdir()?;

        let result = output(cli(&dir.path().join("storage.json"), &CUSTOMER)?);

        assert!(matches!(
            result,
            Err(CommandError::Checkout(CheckoutError::EmptyCart))
        ));

        Ok(())
    }

    #[test]
    fn corrupt_order_log_is_reported() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = dir.path().join("storage.json");

        FileStorage::new(&storage).set_item(ORDERS_KEY, "not json")?;

        let result = output(cli(&storage, &["orders"])?);

        assert!(matches!(
            result,
            Err(CommandError::Orders(OrderLogError::Corrupt(_)))
        ));
        assert!(fs::read_to_string(&storage)?.contains("not json"));

        Ok(())
    }
}
