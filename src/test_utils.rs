//! Test fixtures: HTML pages shaped like the IAR Platform home page and a
//! scriptable `PageFetcher`.
//!
//! Shared by unit tests across modules.

use bytes::Bytes;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::rest::{FetchError, PageFetcher, PageResponse};

/// Fetcher returning a fixed response until told otherwise
pub struct StubFetcher {
    response: Mutex<Result<PageResponse, FetchError>>,
    calls: AtomicUsize,
}

impl StubFetcher {
    pub fn page(html: &'static str) -> Self {
        Self {
            response: Mutex::new(Ok(ok_page(html))),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: FetchError) -> Self {
        Self {
            response: Mutex::new(Err(error)),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_page(&self, html: &'static str) {
        *self.response.lock() = Ok(ok_page(html));
    }

    pub fn set_error(&self, error: FetchError) {
        *self.response.lock() = Err(error);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl PageFetcher for StubFetcher {
    async fn fetch(&self) -> Result<PageResponse, FetchError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.response.lock().clone()
    }
}

fn ok_page(html: &'static str) -> PageResponse {
    PageResponse {
        status: 200,
        body: Bytes::from_static(html.as_bytes()),
    }
}

/// Page with a navigation table followed by the market table
pub fn market_page() -> &'static str {
    r#"<!DOCTYPE html>
<html lang="tr">
<head><meta charset="utf-8"><title>IAR Platform</title></head>
<body>
  <table class="nav"><tr><td>Anasayfa</td><td>Hakkımızda</td><td>İletişim</td></tr></table>
  <table class="market">
    <thead>
      <tr><th>Ürün</th><th>Alış</th><th>Satış</th><th>Değişim</th></tr>
    </thead>
    <tbody>
      <tr><td>USD/TRY</td><td>32,50</td><td>32,80</td><td>-</td></tr>
      <tr><td>EUR/TRY</td><td>35,10</td><td>35,45</td><td>%0,12</td></tr>
      <tr><td>ALTIN ONS</td><td>2.345,10</td><td>2.347,90</td><td>0,45</td></tr>
      <tr><td>GÜMÜŞ KG</td><td>31.250,00</td><td>31.900,00</td><td>-</td></tr>
      <tr><td>ESKİ ÇEYREK</td><td>3.950,00</td><td>4.050,00</td><td>-</td></tr>
      <tr><td>ESKİ ATA</td><td>15.800,00</td><td>16.200,00</td><td>1,10</td></tr>
      <tr><td colspan="4">Fiyatlar bilgi amaçlıdır</td></tr>
    </tbody>
  </table>
</body>
</html>"#
}

/// Same market table with all quotes moved
pub fn updated_market_page() -> &'static str {
    r#"<html><body>
  <table>
    <tr><td>USD/TRY</td><td>32,70</td><td>33,00</td><td>0,20</td></tr>
    <tr><td>EUR/TRY</td><td>35,30</td><td>35,65</td><td>0,20</td></tr>
  </table>
</body></html>"#
}

/// Market table whose rows name no known instrument
pub fn unknown_rows_page() -> &'static str {
    r#"<html><body>
  <table>
    <tr><td>USD/JPY</td><td>151,20</td><td>151,40</td></tr>
    <tr><td>GBP/TRY</td><td>40,10</td><td>40,60</td></tr>
  </table>
</body></html>"#
}

/// Page rendered client-side: no tables, prices in classed divs and scripts
pub fn no_table_page() -> &'static str {
    r#"<html>
<head><script>window.__RATES__ = { "usd": "32,50", "eur": "35,10" };</script></head>
<body>
  <div class="price-card">USD/TRY <span>32,50</span></div>
  <div class="footer">© IAR</div>
</body>
</html>"#
}
