//! Per-fund update workflow: load, fetch, merge, persist, render.

use crate::cli::ui;
use crate::config::Fund;
use crate::core::{ChartRenderer, QuoteProvider, TodayQuote};
use crate::store::SeriesStore;
use anyhow::Result;
use tracing::{debug, warn};

/// Runs the full update over the catalog. A failing fund is logged and
/// skipped; it never stops the remaining funds.
pub async fn update_funds(
    funds: &[Fund],
    provider: &(dyn QuoteProvider + Send + Sync),
    store: &SeriesStore,
    renderer: &dyn ChartRenderer,
) -> Result<()> {
    let codes: Vec<String> = funds.iter().map(|fund| fund.code.clone()).collect();

    // One list request covers every fund's intraday quote; losing it only
    // degrades the run to confirmed history.
    let today_quotes = match provider.fetch_today(&codes).await {
        Ok(quotes) => quotes,
        Err(e) => {
            warn!("Intraday fetch failed, continuing with history only: {e:#}");
            Vec::new()
        }
    };

    let pb = ui::new_progress_bar(funds.len() as u64, true);
    pb.set_message("Updating fund histories...");

    for fund in funds {
        if let Err(e) = update_fund(fund, &today_quotes, provider, store, renderer).await {
            warn!("Skipping fund {}: {e:#}", fund.code);
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok(())
}

async fn update_fund(
    fund: &Fund,
    today_quotes: &[TodayQuote],
    provider: &(dyn QuoteProvider + Send + Sync),
    store: &SeriesStore,
    renderer: &dyn ChartRenderer,
) -> Result<()> {
    let existing = store.load(&fund.code)?;

    let incoming = match provider.fetch_history(&fund.code).await {
        Ok(batch) => batch,
        Err(e) => {
            warn!(
                "History fetch failed for {}, keeping local data: {e:#}",
                fund.code
            );
            Vec::new()
        }
    };

    let today = today_quotes
        .iter()
        .find(|quote| quote.code == fund.code)
        .map(|quote| quote.observation.clone());

    let merged = existing.merge(&incoming, today);
    store.save(&fund.code, &merged)?;
    debug!("Saved {} observations for {}", merged.len(), fund.code);

    renderer.render(fund, &merged);
    Ok(())
}

/// Renders whatever is on disk without touching the network.
pub fn show_funds(
    funds: &[Fund],
    store: &SeriesStore,
    renderer: &dyn ChartRenderer,
) -> Result<()> {
    for fund in funds {
        match store.load(&fund.code) {
            Ok(series) => renderer.render(fund, &series),
            Err(e) => warn!("Skipping fund {}: {e}", fund.code),
        }
    }
    Ok(())
}
