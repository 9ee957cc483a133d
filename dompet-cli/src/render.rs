//! Plain-text rendering of the screen view state

use dompet_core::view_state::LOADING_TEXT;
use dompet_core::{format_currency, BreakdownTab, HomeView, InsightView, LoadStatus, LoginView};
use std::fmt::Write;

const BAR_WIDTH: usize = 24;

pub fn render_home(view: &HomeView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}\n", view.greeting());
    let _ = writeln!(out, "Rekening transaksi kamu");

    match view.snapshot() {
        Some(account) => {
            let _ = writeln!(out, "  {}  [PRIMARY]", account.account_type);
            let _ = writeln!(out, "  {}", account.account_number);
        }
        None => {
            let _ = writeln!(out, "  -");
        }
    }
    let _ = writeln!(out, "  Available balance");
    let _ = writeln!(out, "  {}", view.balance_text());
    if !view.balance_visible() {
        let _ = writeln!(out, "  (hidden; pass --show-balance to reveal)");
    }

    push_status(&mut out, view.status());
    out
}

pub fn render_insight(view: &InsightView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Rekap keuanganmu");

    let Some(summary) = view.summary() else {
        if view.status().is_loading() || *view.status() == LoadStatus::Idle {
            let _ = writeln!(out, "{}", LOADING_TEXT);
        }
        push_status(&mut out, view.status());
        return out;
    };

    let ratios = view.ratios();
    let _ = writeln!(out, "Periode {}\n", summary.period_label);
    let _ = writeln!(out, "  Pemasukan    {}", format_currency(summary.total_income));
    let _ = writeln!(out, "  Pengeluaran  {}", format_currency(summary.total_expense));
    let _ = writeln!(out, "  Selisih      {}\n", format_currency(summary.difference));
    let _ = writeln!(out, "  {:<12} {}", "Pemasukan", bar(ratios.income));
    let _ = writeln!(out, "  {:<12} {}\n", "Pengeluaran", bar(ratios.expense));

    let tabs = [BreakdownTab::Income, BreakdownTab::Expense]
        .iter()
        .map(|tab| {
            if *tab == view.active_tab() {
                format!("[{}]", tab.title())
            } else {
                format!(" {} ", tab.title())
            }
        })
        .collect::<Vec<_>>()
        .join("  ");
    let _ = writeln!(out, "  {tabs}");
    let entries = view.active_breakdown();
    if entries.is_empty() {
        let _ = writeln!(out, "    (no categories)");
    }
    for entry in entries {
        let _ = writeln!(
            out,
            "    {:<20} {:>18}  {}%",
            entry.name,
            format_currency(entry.amount),
            entry.percentage
        );
    }

    if !summary.product_recommendations.is_empty() {
        let _ = writeln!(out, "\nSpecial Offer for You");
        for product in &summary.product_recommendations {
            let _ = writeln!(out, "  {}  {}", product.name, product.target_url);
        }
    }

    let _ = writeln!(out, "\nPromo Merchant");
    if summary.promo_merchants.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for promo in &summary.promo_merchants {
        let _ = writeln!(
            out,
            "  {}: {}  {}",
            promo.merchant_name, promo.display_name, promo.target_url
        );
    }

    push_status(&mut out, view.status());
    out
}

/// Login form as it stands: a field's label sits above its value once the
/// field has text, and inside the empty box otherwise
pub fn render_login(view: &LoginView) -> String {
    let mut out = String::new();
    push_field(&mut out, "Username", view.username_label_raised(), view.username());
    push_field(&mut out, "Password", view.password_label_raised(), &view.password_text());
    if let Some(error) = view.error() {
        let _ = writeln!(out, "! {error}");
    }
    out
}

fn push_field(out: &mut String, label: &str, raised: bool, value: &str) {
    if raised {
        let _ = writeln!(out, "  {label}");
        let _ = writeln!(out, "  [ {value} ]");
    } else {
        let _ = writeln!(out, "  [ {label} ]");
    }
}

fn bar(ratio: f64) -> String {
    let filled = ((ratio / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!("{}{} {:.0}%", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled), ratio)
}

fn push_status(out: &mut String, status: &LoadStatus) {
    if let LoadStatus::Failed { message, retryable } = status {
        let _ = writeln!(out, "\n! {message}");
        if *retryable {
            let _ = writeln!(out, "  (temporary problem; run the command again to retry)");
        }
    }
}
