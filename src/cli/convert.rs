use super::ui;
use crate::core::{Amount, Currency, Rate};
use crate::providers::Client;
use anyhow::{Context, Result};
use comfy_table::Cell;

pub fn display_rate(base: &Currency, target: &Currency, rate: Rate) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Base"),
        ui::header_cell("Target"),
        ui::header_cell("Rate"),
    ]);
    table.add_row(vec![
        Cell::new(base),
        Cell::new(target),
        ui::number_cell(rate, 6),
    ]);

    format!(
        "{}\n\n{table}",
        ui::style_text(&format!("{base} → {target}"), ui::StyleType::Title)
    )
}

pub fn display_amount(
    base: &Currency,
    target: &Currency,
    amount: Amount,
    converted: Amount,
) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell(&format!("Amount ({base})")),
        ui::header_cell(&format!("Converted ({target})")),
    ]);
    table.add_row(vec![ui::number_cell(amount, 2), ui::number_cell(converted, 2)]);

    format!(
        "{}\n\n{table}\n\n{} {}",
        ui::style_text(&format!("{base} → {target}"), ui::StyleType::Title),
        ui::style_text(&format!("{converted:.2}"), ui::StyleType::Value),
        target
    )
}

pub async fn run_rate(client: &Client, base: &Currency, target: &Currency) -> Result<()> {
    let spinner = ui::new_spinner(&format!("Fetching {base}/{target} rate"));
    let result = client.rate(base, target).await;
    spinner.finish_and_clear();

    let rate = result.with_context(|| format!("Failed to fetch rate for {base}/{target}"))?;
    println!("{}", display_rate(base, target, rate));
    Ok(())
}

pub async fn run_convert(
    client: &Client,
    base: &Currency,
    target: &Currency,
    amount: Amount,
) -> Result<()> {
    let spinner = ui::new_spinner(&format!("Converting {amount} {base} to {target}"));
    let result = client.amount(base, target, amount).await;
    spinner.finish_and_clear();

    let converted =
        result.with_context(|| format!("Failed to convert {amount} {base} to {target}"))?;
    println!("{}", display_amount(base, target, amount, converted));
    Ok(())
}
