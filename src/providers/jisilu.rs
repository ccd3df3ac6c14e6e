use crate::core::quote::{QuoteProvider, TodayQuote};
use crate::core::series::Observation;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{Local, NaiveDate, Timelike, Utc};
use serde::Deserialize;
use tracing::{debug, instrument};

// The endpoint rejects clients without a browser-like user agent.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/87.0.4280.67 Safari/537.36";

/// Fetches fund history and intraday quotes from jisilu.cn.
pub struct JisiluProvider {
    base_url: String,
    close_hour: u32,
}

impl JisiluProvider {
    pub fn new(base_url: &str, close_hour: u32) -> Self {
        JisiluProvider {
            base_url: base_url.to_string(),
            close_hour,
        }
    }

    fn client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(Into::into)
    }
}

/// jisilu serves numbers sometimes as JSON numbers, sometimes as strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumField {
    Num(f64),
    Text(String),
}

impl NumField {
    fn as_f64(&self) -> Result<f64> {
        match self {
            NumField::Num(value) => Ok(*value),
            NumField::Text(text) => text
                .trim()
                .parse()
                .with_context(|| format!("Non-numeric field '{text}'")),
        }
    }
}

#[derive(Debug, Deserialize)]
struct HistResponse {
    rows: Vec<HistRow>,
}

#[derive(Debug, Deserialize)]
struct HistRow {
    cell: HistCell,
}

#[derive(Debug, Deserialize)]
struct HistCell {
    hist_dt: String,
    trade_price: NumField,
    amount: NumField,
}

impl HistCell {
    fn to_observation(&self) -> Result<Observation> {
        let date = NaiveDate::parse_from_str(&self.hist_dt, "%Y-%m-%d")
            .with_context(|| format!("Invalid history date '{}'", self.hist_dt))?;
        Ok(Observation::new(
            date,
            self.trade_price.as_f64()?,
            self.amount.as_f64()?,
        ))
    }
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    rows: Vec<ListRow>,
}

#[derive(Debug, Deserialize)]
struct ListRow {
    cell: ListCell,
}

#[derive(Debug, Deserialize)]
struct ListCell {
    fund_id: String,
    price: NumField,
    amount: NumField,
}

#[async_trait]
impl QuoteProvider for JisiluProvider {
    #[instrument(name = "JisiluHistoryFetch", skip(self), fields(code = %code))]
    async fn fetch_history(&self, code: &str) -> Result<Vec<Observation>> {
        let url = format!(
            "{}/data/etf/detail_hists/?___jsl=LST___t={}",
            self.base_url,
            Utc::now().timestamp_millis()
        );
        debug!("Requesting share history from {}", url);

        let client = self.client()?;
        let response = client
            .post(&url)
            .header("Origin", &self.base_url)
            .header(
                "Referer",
                format!("{}/data/etf/detail/{}", self.base_url, code),
            )
            .form(&[
                ("is_search", "1"),
                ("fund_id", code),
                ("rp", "1"),
                ("page", "1"),
            ])
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for fund: {} URL: {}", e, code, url))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for fund: {}",
                response.status(),
                code
            ));
        }

        let text = response.text().await?;
        let data: HistResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse history response for fund {}: {}", code, e))?;

        let mut observations = data
            .rows
            .iter()
            .map(|row| row.cell.to_observation())
            .collect::<Result<Vec<_>>>()?;

        // Rows arrive newest first; history is kept ascending everywhere else.
        observations.reverse();

        debug!("Fetched {} history rows for {}", observations.len(), code);
        Ok(observations)
    }

    #[instrument(name = "JisiluTodayFetch", skip(self, codes))]
    async fn fetch_today(&self, codes: &[String]) -> Result<Vec<TodayQuote>> {
        let now = Local::now();
        if now.hour() >= self.close_hour {
            debug!(
                "Past market close ({}:00), intraday quotes are final",
                self.close_hour
            );
            return Ok(Vec::new());
        }

        let url = format!(
            "{}/data/etf/etf_list/?___jsl=LST___t={}&rp=25&page=1",
            self.base_url,
            Utc::now().timestamp_millis()
        );
        debug!("Requesting intraday quotes from {}", url);

        let client = self.client()?;
        let response = client
            .get(&url)
            .header("Referer", format!("{}/data/etf/", self.base_url))
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} URL: {}", e, url))?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP error: {} for intraday quotes", response.status()));
        }

        let text = response.text().await?;
        let data: ListResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse intraday quote response: {}", e))?;

        let today = now.date_naive();
        let mut quotes = Vec::new();
        for row in data.rows {
            let cell = row.cell;
            if !codes.contains(&cell.fund_id) {
                continue;
            }
            let observation =
                Observation::new(today, cell.price.as_f64()?, cell.amount.as_f64()?);
            quotes.push(TodayQuote {
                code: cell.fund_id,
                observation,
            });
        }

        debug!("Matched {} intraday quotes", quotes.len());
        Ok(quotes)
    }
}
