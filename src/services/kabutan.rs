use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use reqwest::Client;
use rust_decimal::Decimal;

use crate::error::PriceError;
use crate::models::Code;

/// Anything that can quote the current price of a code.
#[allow(async_fn_in_trait)]
pub trait PriceSource {
    async fn fetch(&self, code: Code) -> Result<Decimal, PriceError>;
}

pub const KABUTAN_BASE_URL: &str = "https://kabutan.jp";

static STOCK_INFO: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r#"<div\b[^>]*\bid="stockinfo_i1"[^>]*>"#));

static DIV_TAG: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"(?i)<(/?)div\b[^>]*>"));

// <div class="si_i1_2"><span>株価</span><span>2,700円</span>
static PRICE_SPAN: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)<div[^>]*class="si_i1_2"[^>]*>\s*<span[^>]*>.*?</span>\s*<span[^>]*>([^<]*)</span>"#,
    )
});

fn pattern(
    re: &'static LazyLock<Result<Regex, regex::Error>>,
) -> Result<&'static Regex, PriceError> {
    re.as_ref().map_err(|e| PriceError::Pattern(e.clone()))
}

/// Scrapes the stock page on kabutan.jp for the current price.
#[derive(Clone)]
pub struct KabutanClient {
    http: Client,
    base_url: String,
}

impl KabutanClient {
    pub fn new() -> Self {
        Self::with_base_url(KABUTAN_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn fetch_html(&self, code: Code) -> Result<String, PriceError> {
        let url = format!("{}/stock/", self.base_url);
        let res = self
            .http
            .get(url)
            .query(&[("code", code.to_string())])
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(PriceError::Status(res.status().as_u16()));
        }

        Ok(res.text().await?)
    }
}

impl Default for KabutanClient {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceSource for KabutanClient {
    async fn fetch(&self, code: Code) -> Result<Decimal, PriceError> {
        let html = self.fetch_html(code).await?;
        let price = extract_price(&html)?;
        tracing::debug!(code, %price, "price fetched");
        Ok(price)
    }
}

/// Pull the price out of a kabutan stock page, e.g. `2,700円` -> `2700`.
/// Only the `stockinfo_i1` element is searched.
pub fn extract_price(html: &str) -> Result<Decimal, PriceError> {
    let block = stock_info_block(html)?.ok_or(PriceError::MissingElement)?;

    let raw = pattern(&PRICE_SPAN)?
        .captures(block)
        .and_then(|c| c.get(1))
        .ok_or(PriceError::MissingElement)?
        .as_str();

    let text = raw.replace('円', "").replace(',', "");
    let text = text.trim();

    Decimal::from_str(text).map_err(|source| PriceError::Parse {
        text: raw.to_string(),
        source,
    })
}

/// Inner HTML of `<div id="stockinfo_i1">`, up to its matching `</div>`.
fn stock_info_block(html: &str) -> Result<Option<&str>, PriceError> {
    let Some(open) = pattern(&STOCK_INFO)?.find(html) else {
        return Ok(None);
    };

    let body = &html[open.end()..];
    let mut depth = 1usize;
    for tag in pattern(&DIV_TAG)?.captures_iter(body) {
        let closing = tag.get(1).is_some_and(|m| !m.as_str().is_empty());
        if !closing {
            depth += 1;
            continue;
        }

        depth -= 1;
        if depth == 0 {
            let end = tag.get(0).map_or(body.len(), |m| m.start());
            return Ok(Some(&body[..end]));
        }
    }

    // unterminated element
    Ok(None)
}
