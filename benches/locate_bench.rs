use std::hint::black_box;
use std::sync::Arc;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use quotelight::{
    AnchorSet, DocumentLoader, MemoryDocument, MemoryLoader, PageScanner, ScanConfig, Ticket,
    build_index, locate_quote, mark_anchors,
};

fn sample_page(fragments: usize) -> Vec<String> {
    (0..fragments)
        .map(|i| format!("line {i}: payment \u{2013} due within {} days ", i % 90))
        .collect()
}

/// Phrase lookup on pages of increasing size, quote on the last fragment.
fn bench_locate(c: &mut Criterion) {
    let mut group = c.benchmark_group("locate_quote");

    for fragments in [32usize, 512, 4096] {
        let mut page = sample_page(fragments);
        page.push("Signed by the \u{201C}Buyer\u{201D}".into());
        let index = build_index(&page);
        group.throughput(Throughput::Bytes(index.len() as u64));
        group.bench_function(format!("fragments_{fragments}"), |b| {
            b.iter(|| locate_quote(black_box("signed by the \"buyer\""), black_box(&index)))
        });
    }

    group.finish();
}

fn bench_mark_anchors(c: &mut Criterion) {
    let page = sample_page(512);
    let anchors = AnchorSet::new(["due within 42", "INV-2024", "net 30"]);
    c.bench_function("mark_anchors_512", |b| {
        b.iter(|| mark_anchors(black_box(&anchors), black_box(&page)))
    });
}

/// Full scan over a 50-page in-memory document with the quote on the last page.
fn bench_scan(c: &mut Criterion) {
    let document = (1..=50).fold(MemoryDocument::new("bench"), |doc, page| {
        if page == 50 {
            doc.page(["Signed by the", "\u{201C}Buyer\u{201D}"])
        } else {
            doc.page(sample_page(64))
        }
    });
    let loader = Arc::new(MemoryLoader::new().with_document(document));
    let scanner = PageScanner::new(Arc::clone(&loader), ScanConfig::default()).expect("config");
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime");
    let handle = runtime
        .block_on(loader.open("bench", None))
        .expect("document opens");
    let ticket = Ticket::detached();

    c.bench_function("scan_50_pages", |b| {
        b.iter(|| {
            let report =
                runtime.block_on(scanner.scan(&handle, black_box("signed by the \"buyer\""), &ticket));
            loader.clear_requests();
            report
        })
    });
}

criterion_group!(benches, bench_locate, bench_mark_anchors, bench_scan);
criterion_main!(benches);
