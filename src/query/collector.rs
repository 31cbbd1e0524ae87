use crate::config::Config;
use crate::error::Result;
use crate::query::evaluator::{QueryEvaluator, QueryWarning};
use crate::query::value::Query;
use crate::record::loader::load_records;
use crate::record::types::{Record, RecordId};
use rayon::prelude::*;

/// Identifiers matched by a query plus the warnings raised on the way
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOutcome {
    /// Strictly ascending, no duplicates
    pub ids: Vec<RecordId>,
    /// In record order; the same field may be reported for many records
    pub warnings: Vec<QueryWarning>,
}

/// Evaluate `query` against every record and gather the matching identifiers
///
/// Records are evaluated in parallel, each into its own warning buffer.
pub fn collect(records: &[Record], query: &Query) -> QueryOutcome {
    let evaluator = QueryEvaluator::new(query);

    let evaluated: Vec<(Option<RecordId>, Vec<QueryWarning>)> = records
        .par_iter()
        .map(|record| {
            let mut warnings = Vec::new();
            let matched = evaluator.evaluate(record, &mut warnings);
            (matched.then_some(record.identifier), warnings)
        })
        .collect();

    let mut ids = Vec::new();
    let mut warnings = Vec::new();
    for (id, record_warnings) in evaluated {
        ids.extend(id);
        warnings.extend(record_warnings);
    }

    ids.sort_unstable();
    ids.dedup();

    let mut unknown: Vec<&str> = warnings
        .iter()
        .map(|QueryWarning::UnknownField { field, .. }| field.as_str())
        .collect();
    unknown.sort_unstable();
    unknown.dedup();
    for field in unknown {
        log::warn!("`{}` is not a valid parameter", field);
    }

    log::info!(
        "query ({} mode, {} fields) matched {} of {} records",
        query.mode,
        query.terms.len(),
        ids.len(),
        records.len()
    );

    QueryOutcome { ids, warnings }
}

/// Load the records described by `config` and run `query` over them
pub fn filter_records(config: &Config, query: &Query) -> Result<QueryOutcome> {
    let records = load_records(config)?;
    Ok(collect(&records, query))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::value::{Mode, OrTerm, QueryValue};
    use crate::record::types::{RowElement, Scalar};

    fn record(id: RecordId, weight: i64, textures: &[&str]) -> Record {
        Record::new(id)
            .with_field("weight", vec![RowElement::Scalar(Scalar::Int(weight))])
            .with_field(
                "texture_sources",
                vec![RowElement::Nested(textures.iter().map(|t| Scalar::from(*t)).collect())],
            )
    }

    #[test]
    fn test_sorted_ascending() {
        let records = vec![record(9, 1, &[]), record(3, 1, &[]), record(5, 2, &[]), record(1, 1, &[])];
        let outcome = collect(&records, &Query::new(Mode::And).field("weight", 1));
        assert_eq!(outcome.ids, vec![1, 3, 9]);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_duplicate_identifiers_are_reported_once() {
        let records = vec![record(4, 1, &[]), record(2, 1, &[]), record(4, 1, &["x"]), record(2, 1, &[])];
        let outcome = collect(&records, &Query::new(Mode::And).field("weight", 1));
        assert_eq!(outcome.ids, vec![2, 4]);
    }

    #[test]
    fn test_sort_dedup_law() {
        let records: Vec<Record> = (0..200).map(|i| record((i * 7919) % 61, 1, &[])).collect();
        let outcome = collect(&records, &Query::new(Mode::And));
        assert!(outcome.ids.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(outcome.ids.len(), 61);
    }

    #[test]
    fn test_and_groups_across_records() {
        let records = vec![
            record(51, 321, &["IMG_7082", "IMG_7083"]),
            record(52, 22, &["IMG_7088"]),
            record(53, 150, &["IMG_7090"]),
        ];
        let query = Query::new(Mode::And).field(
            "texture_sources",
            QueryValue::Any(vec![
                OrTerm::all(["IMG_7088"]).unwrap(),
                OrTerm::all(["IMG_7082"]).unwrap(),
            ]),
        );
        assert_eq!(collect(&records, &query).ids, vec![51, 52]);
    }

    #[test]
    fn test_unknown_field_warns_per_record() {
        let records = vec![record(1, 1, &[]), record(2, 2, &[])];
        let query = Query::new(Mode::Or).field("colour", "red").field("weight", 2);

        let outcome = collect(&records, &query);
        assert_eq!(outcome.ids, vec![2]);
        assert_eq!(outcome.warnings.len(), 2);
        assert!(outcome
            .warnings
            .iter()
            .all(|w| w.to_string() == "`colour` is not a valid parameter"));
    }

    #[test]
    fn test_empty_record_set() {
        let outcome = collect(&[], &Query::new(Mode::And).field("weight", 1));
        assert_eq!(outcome, QueryOutcome::default());
    }
}
