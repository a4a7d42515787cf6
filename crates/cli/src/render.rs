//! Terminal tables

use std::ops::Range;

use gran::{orders::Order, pricing::format_price, view::CartModalView};
use rusty_money::iso::Currency;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};

pub(crate) fn cart_table(view: &CartModalView) -> String {
    let mut builder = Builder::default();

    builder.push_record(["Id", "Item", "Qty", "Total"]);

    for line in &view.lines {
        builder.push_record([
            line.id.clone(),
            line.name.clone(),
            line.quantity.to_string(),
            line.line_total.clone(),
        ]);
    }

    builder.push_record([
        String::new(),
        "Total".to_string(),
        String::new(),
        view.total.clone(),
    ]);

    finish(builder, 2..4)
}

pub(crate) fn orders_table(orders: &[Order], currency: &Currency) -> String {
    let mut builder = Builder::default();

    builder.push_record(["Placed", "Customer", "Phone", "Email", "Lines", "Total"]);

    for order in orders {
        builder.push_record([
            order.timestamp.to_string(),
            order.customer.name.clone(),
            order.customer.phone.clone(),
            order.customer.email.clone(),
            order.items.len().to_string(),
            format_price(order.total, currency),
        ]);
    }

    finish(builder, 4..6)
}

fn finish(builder: Builder, numeric: Range<usize>) -> String {
    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(numeric), Alignment::right());

    table.to_string()
}
