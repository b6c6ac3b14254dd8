//! Terminal output formatting.

use bella_core::finance::MonthlySummary;
use bella_core::order::model::{Order, OrderStatus};
use bella_core::service_order::model::{ServiceOrder, ServiceOrderStatus};
use colored::{ColoredString, Colorize};
use rust_decimal::Decimal;
use unicode_width::UnicodeWidthStr;

/// Print orders as a table.
pub fn print_orders_table(orders: &[Order]) {
    if orders.is_empty() {
        println!("{}", "No orders found.".dimmed());
        return;
    }

    println!(
        "{} {} {} {} {}",
        pad_right("Code", 20),
        pad_right("Status", 14),
        pad_right("Total", 12),
        pad_right("Delivery", 12),
        "Items"
    );
    println!("{}", "─".repeat(66));

    for order in orders {
        let delivery = order
            .delivery_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        let status = pad_right(&order.status.to_string(), 14);

        println!(
            "{} {} {} {} {}",
            pad_right(&truncate_visual(&order.code, 20), 20),
            order_status_colored(order.status, &status),
            pad_left(&money(order.total_amount), 12),
            pad_right(&delivery, 12),
            order.items.len()
        );
    }

    let total: Decimal = orders.iter().map(|o| o.total_amount).sum();
    println!();
    println!(
        "{} order(s), {} in total",
        orders.len(),
        money(total).bold()
    );
}

/// Print service orders as a table.
pub fn print_service_orders_table(service_orders: &[ServiceOrder]) {
    if service_orders.is_empty() {
        println!("{}", "No service orders found.".dimmed());
        return;
    }

    println!(
        "{} {} {} {} {}",
        pad_right("Date", 12),
        pad_right("Order", 20),
        pad_right("Customer", 24),
        pad_right("Status", 10),
        "Responsible"
    );
    println!("{}", "─".repeat(84));

    for so in service_orders {
        let status = pad_right(so.status.label(), 10);
        println!(
            "{} {} {} {} {}",
            pad_right(&so.scheduled_date.format("%Y-%m-%d").to_string(), 12),
            pad_right(&truncate_visual(&so.order.code, 20), 20),
            pad_right(&truncate_visual(&so.customer.name, 24), 24),
            service_status_colored(so.status, &status),
            so.responsible.as_deref().unwrap_or("-")
        );
    }
}

/// Print a monthly financial summary.
pub fn print_summary(summary: &MonthlySummary) {
    println!(
        "{} {} → {}",
        "Period".bold(),
        summary.period_start,
        summary.period_end
    );
    println!();
    println!("  {} {}", pad_right("Delivered orders", 18), summary.total_orders);
    println!(
        "  {} {}",
        pad_right("Revenue", 18),
        money(summary.total_revenue).green()
    );
    println!(
        "  {} {}",
        pad_right("Expenses", 18),
        money(summary.total_expenses).red()
    );

    let balance = money(summary.balance);
    let balance = if summary.balance.is_sign_negative() {
        balance.red().bold()
    } else {
        balance.green().bold()
    };
    println!("  {} {}", pad_right("Balance", 18), balance);
}

fn order_status_colored(status: OrderStatus, text: &str) -> ColoredString {
    match status {
        OrderStatus::Pending => text.normal(),
        OrderStatus::InProduction => text.yellow(),
        OrderStatus::Shipped => text.cyan(),
        OrderStatus::Delivered => text.green(),
        OrderStatus::Cancelled => text.dimmed(),
    }
}

fn service_status_colored(status: ServiceOrderStatus, text: &str) -> ColoredString {
    match status {
        ServiceOrderStatus::Scheduled => text.normal(),
        ServiceOrderStatus::InRoute => text.yellow(),
        ServiceOrderStatus::Delivered => text.green(),
        ServiceOrderStatus::Cancelled => text.dimmed(),
    }
}

fn money(value: Decimal) -> String {
    format!("{:.2}", value)
}

/// Pad a string to `width` columns of visual width.
fn pad_right(s: &str, width: usize) -> String {
    let visual = UnicodeWidthStr::width(s);
    if visual >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - visual))
    }
}

fn pad_left(s: &str, width: usize) -> String {
    let visual = UnicodeWidthStr::width(s);
    if visual >= width {
        s.to_string()
    } else {
        format!("{}{}", " ".repeat(width - visual), s)
    }
}

/// Truncate a string to `max_width` visual columns, ending with an ellipsis.
fn truncate_visual(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for ch in s.chars() {
        let ch_width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if current_width + ch_width > max_width - 1 {
            break;
        }
        result.push(ch);
        current_width += ch_width;
    }
    result.push('…');
    result
}
