//! Compile a few filters against an inventory header and run them over
//! a handful of rows.
//!
//! Run with `RUST_LOG=debug cargo run --example filter_demo` to see the
//! compiled form of each filter.

use anyhow::Result;
use rowfilter::{Affinity, Filter, Header, HeaderItem, Variant};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let header = Header::new(vec![
        HeaderItem::new("Name", Affinity::String),
        HeaderItem::new("qty", Affinity::Integer),
        HeaderItem::new("price", Affinity::Double),
        HeaderItem::new("active", Affinity::Boolean),
    ]);

    let rows = vec![
        vec![
            Variant::from("apple"),
            Variant::Integer(12),
            Variant::Double(0.5),
            Variant::Boolean(true),
        ],
        vec![
            Variant::from("banana"),
            Variant::Integer(3),
            Variant::Double(0.25),
            Variant::Boolean(true),
        ],
        vec![
            Variant::from("cherry"),
            Variant::Integer(40),
            Variant::Double(6.0),
            Variant::Boolean(false),
        ],
    ];

    let filters = [
        "qty >= 10 and qty <= 20",
        r#"contains(NAME, "an") or price * 2 > 10"#,
        "not active or if(qty > 10, price, 0) > 0.4",
        "price > true",
        "",
    ];

    for text in filters {
        println!("filter: {:?}", text);
        let filter = match Filter::compile(text, &header) {
            Ok(filter) => filter,
            Err(e) => {
                println!("  {}", e);
                continue;
            }
        };
        println!("  compiled: {}", filter);
        for row in rows.iter().filter(|row| filter.matches(row)) {
            println!("  match: {}", serde_json::to_string(row)?);
        }
    }
    Ok(())
}
