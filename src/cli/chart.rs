//! Terminal renderer for fund history charts

use crate::cli::ui;
use crate::config::Fund;
use crate::core::chart::{ChartRenderer, normalized};
use crate::core::series::Series;
use console::style;

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Draws each fund as two sparklines over a shared 0..=1 axis, price in
/// red and share amount in blue, oldest observation on the left.
pub struct TerminalChart {
    width: usize,
}

impl TerminalChart {
    pub fn new() -> Self {
        TerminalChart { width: 60 }
    }
}

impl Default for TerminalChart {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps normalized values onto `width` block characters, sampling evenly
/// across the sequence.
fn sparkline(values: &[f64], width: usize) -> String {
    if values.is_empty() {
        return String::new();
    }
    let width = width.min(values.len());
    (0..width)
        .map(|column| {
            let index = column * values.len() / width;
            let value = values[index].clamp(0.0, 1.0);
            let level = ((value * 7.0).round() as usize).min(7);
            SPARK_LEVELS[level]
        })
        .collect()
}

impl ChartRenderer for TerminalChart {
    fn render(&self, fund: &Fund, series: &Series) {
        println!(
            "\n{} ({})",
            style(&fund.name).bold().underlined(),
            fund.code
        );

        let (Some(first), Some(last)) = (series.observations().first(), series.latest()) else {
            println!("{}", style("no data").dim());
            return;
        };

        let prices = normalized(&series.prices());
        let amounts = normalized(&series.amounts());

        println!(
            "{} {}",
            style("price ").red(),
            style(sparkline(&prices, self.width)).red()
        );
        println!(
            "{} {}",
            style("amount").blue(),
            style(sparkline(&amounts, self.width)).blue()
        );

        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("From"),
            ui::header_cell("To"),
            ui::header_cell("Days"),
            ui::header_cell("Price"),
            ui::header_cell("Amount"),
        ]);
        table.add_row(vec![
            ui::value_cell(&first.date.to_string()),
            ui::value_cell(&last.date.to_string()),
            ui::value_cell(&series.len().to_string()),
            ui::value_cell(&format!("{:.3}", last.price)),
            ui::value_cell(&format!("{:.2}", last.amount)),
        ]);
        println!("{table}");
    }
}
