use canonical::{build_index, normalize, NormalizeProfile, RawFragment};

fn main() {
    let fragments = vec![
        RawFragment::text_only("The buyer shall pay "),
        RawFragment::text_only("within 30 days \u{2014} "),
        RawFragment::text_only("\u{201C}net\u{201D}"),
    ];

    let page = build_index(&fragments);
    println!("canonical: {}", page.canonical_text());
    println!("index map: {:?}", page.index_map());

    let needle = normalize("within 30 days - \"net\"", NormalizeProfile::Collapsing);
    match page.find(&needle) {
        Some(range) => println!("fragments: {:?}", page.fragments_in(range)),
        None => println!("not found"),
    }
}
