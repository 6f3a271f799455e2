use anyhow::{bail, Context, Result};
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{Html, Selector};
use url::Url;

/// The bulletin endpoints we scrape, keyed by year label.
/// `lst1.asp` serves the current-year listing, `lst3.asp` the year before.
pub static BULLETIN_SOURCES: &[(&str, &str)] = &[
    ("2024", "http://www.koeri.boun.edu.tr/scripts/lst1.asp"),
    ("2023", "http://www.koeri.boun.edu.tr/scripts/lst3.asp"),
];

static PRE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("pre").expect("CSS selector for <pre> should be valid"));

/// Fetch one bulletin page and return the text of its listing block.
///
/// Single GET, no retries. Non-2xx statuses and transport failures surface
/// as errors; the caller decides whether the run continues without this
/// endpoint.
pub async fn fetch_bulletin(client: &Client, url_str: &str) -> Result<String> {
    let url = Url::parse(url_str).with_context(|| format!("parsing bulletin URL {}", url_str))?;

    let resp = client
        .get(url.as_str())
        .send()
        .await
        .with_context(|| format!("GET {}", url))?
        .error_for_status()
        .with_context(|| format!("bulletin request to {}", url))?;

    // The endpoint declares a legacy charset but serves UTF-8; decode the
    // raw bytes ourselves instead of trusting the header.
    let bytes = resp
        .bytes()
        .await
        .with_context(|| format!("reading body from {}", url))?;
    let html = String::from_utf8_lossy(&bytes).into_owned();

    match extract_preformatted(&html) {
        Some(text) => Ok(text),
        None => bail!("no <pre> block in response from {}", url),
    }
}

/// Pull the text content of the first `<pre>` element out of an HTML page.
pub fn extract_preformatted(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&PRE_SELECTOR)
        .next()
        .map(|elem| elem.text().collect::<String>())
}
