//! Benchmarks for price normalization and page extraction

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use iar_price_feed::parsing::{classify_row, extract_page, normalize, RawRow};

// Market table shaped like the source page
const MARKET_PAGE: &str = r#"<html><body>
<table><tr><td>Anasayfa</td><td>Hakkımızda</td></tr></table>
<table>
  <tr><th>Ürün</th><th>Alış</th><th>Satış</th><th>Değişim</th></tr>
  <tr><td>USD/TRY</td><td>32,50</td><td>32,80</td><td>-</td></tr>
  <tr><td>EUR/TRY</td><td>35,10</td><td>35,45</td><td>%0,12</td></tr>
  <tr><td>ALTIN ONS</td><td>2.345,10</td><td>2.347,90</td><td>0,45</td></tr>
  <tr><td>GÜMÜŞ KG</td><td>31.250,00</td><td>31.900,00</td><td>-</td></tr>
  <tr><td>ESKİ ÇEYREK</td><td>3.950,00</td><td>4.050,00</td><td>-</td></tr>
  <tr><td>ESKİ ATA</td><td>15.800,00</td><td>16.200,00</td><td>1,10</td></tr>
</table>
</body></html>"#;

const NO_TABLE_PAGE: &str = r#"<html><head><script>var r = {usd: 1};</script></head>
<body><div class="price">USD/TRY 32,50</div></body></html>"#;

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    group.bench_function("turkish", |b| {
        b.iter(|| black_box(normalize(black_box("₺ 1.234.567,89"))))
    });

    group.bench_function("anglo", |b| {
        b.iter(|| black_box(normalize(black_box("$1,234,567.89"))))
    });

    group.bench_function("placeholder", |b| {
        b.iter(|| black_box(normalize(black_box("-"))))
    });

    group.finish();
}

fn bench_classify_row(c: &mut Criterion) {
    let row = RawRow::new(["ESKİ ATA", "15.800,00", "16.200,00", "1,10"]);

    c.bench_function("classify_row", |b| {
        b.iter(|| black_box(classify_row(black_box(&row))))
    });
}

fn bench_extract_page(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_page");

    group.throughput(Throughput::Bytes(MARKET_PAGE.len() as u64));
    group.bench_function("market_table", |b| {
        b.iter(|| black_box(extract_page(black_box(MARKET_PAGE))))
    });

    group.throughput(Throughput::Bytes(NO_TABLE_PAGE.len() as u64));
    group.bench_function("fallback", |b| {
        b.iter(|| black_box(extract_page(black_box(NO_TABLE_PAGE))))
    });

    group.finish();
}

criterion_group!(benches, bench_normalize, bench_classify_row, bench_extract_page);

criterion_main!(benches);
