#![no_main]

use libfuzzer_sys::fuzz_target;
use mdframe::query::{Mode, Query, QueryEvaluator};
use mdframe::record::{Record, RowElement, Scalar};

fuzz_target!(|data: &str| {
    // Any accepted query must evaluate without panicking
    let record = Record::new(51)
        .with_field("weight", vec![RowElement::Scalar(Scalar::Int(321))])
        .with_field(
            "texture_sources",
            vec![RowElement::Nested(vec![Scalar::from("IMG_7082"), Scalar::from("IMG_7083")])],
        );

    for mode in [Mode::And, Mode::Or] {
        if let Ok(query) = Query::parse(mode, data) {
            let mut warnings = Vec::new();
            let _ = QueryEvaluator::new(&query).evaluate(&record, &mut warnings);
        }
    }
});
