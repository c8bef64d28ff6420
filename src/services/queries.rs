//! Timed field extraction over a loaded document.
//!
//! The catalogue reproduces the comparison queries used against the other
//! parsers, one entry per query number, as JSON pointers.

use crate::domain::error::{HarnessError, HarnessResult};
use crate::cli::ScanKind;
use crate::domain::models::{QueryHit, QueryReport, ScanReport};
use serde_json::Value;
use std::hint::black_box;
use std::time::Instant;

#[derive(Debug)]
pub struct QueryDef {
    pub id: u8,
    pub dataset: &'static str,
    pub pointers: &'static [&'static str],
}

pub const QUERIES: &[QueryDef] = &[
    QueryDef {
        id: 1,
        dataset: "twitter",
        pointers: &["/0/user/lang", "/0/lang"],
    },
    QueryDef {
        id: 2,
        dataset: "twitter",
        pointers: &["/0/user/id", "/0/user/lang"],
    },
    QueryDef {
        id: 3,
        dataset: "twitter",
        pointers: &["/0/user/id"],
    },
    QueryDef {
        id: 4,
        dataset: "twitter",
        pointers: &["/0/entities/urls/0/indices/0"],
    },
    QueryDef {
        id: 5,
        dataset: "walmart",
        pointers: &["/items/0"],
    },
    QueryDef {
        id: 6,
        dataset: "wiki",
        pointers: &["/0/descriptions"],
    },
    QueryDef {
        id: 7,
        dataset: "wiki",
        pointers: &["/0/claims/P1245/0/mainsnak/property"],
    },
    QueryDef {
        id: 8,
        dataset: "google_map",
        pointers: &["/0/routes"],
    },
    QueryDef {
        id: 9,
        dataset: "google_map",
        pointers: &["/0/routes/0/legs/0/steps/0/distance/text"],
    },
    QueryDef {
        id: 10,
        dataset: "bestbuy",
        pointers: &["/products/0/regularPrice"],
    },
    QueryDef {
        id: 11,
        dataset: "bestbuy",
        pointers: &[
            "/products/0/categoryPath/1/id",
            "/products/0/categoryPath/2/id",
        ],
    },
];

pub fn find_query(id: u8) -> HarnessResult<&'static QueryDef> {
    QUERIES
        .iter()
        .find(|q| q.id == id)
        .ok_or(HarnessError::UnknownQuery(id))
}

pub fn queries_for_dataset(name: &str) -> Vec<&'static QueryDef> {
    QUERIES
        .iter()
        .filter(|q| q.dataset.eq_ignore_ascii_case(name))
        .collect()
}

pub fn validate_pointer(pointer: &str) -> HarnessResult<()> {
    if pointer.is_empty() || pointer.starts_with('/') {
        Ok(())
    } else {
        Err(HarnessError::InvalidPointer(pointer.to_string()))
    }
}

/// Resolves every pointer, timing the look-ups only. Missing paths are misses, not errors.
pub fn run<S: AsRef<str>>(root: &Value, pointers: &[S]) -> (u64, Vec<QueryHit>) {
    let start = Instant::now();
    let found: Vec<Option<&Value>> = pointers
        .iter()
        .map(|p| black_box(root.pointer(p.as_ref())))
        .collect();
    let elapsed_ns = u64::try_from(start.elapsed().as_nanos()).unwrap_or(u64::MAX);

    let hits = pointers
        .iter()
        .zip(found)
        .map(|(p, v)| QueryHit {
            pointer: p.as_ref().to_string(),
            found: v.is_some(),
            value: v.cloned(),
        })
        .collect();
    (elapsed_ns, hits)
}

pub fn run_catalogue(root: &Value, def: &QueryDef) -> QueryReport {
    let (elapsed_ns, hits) = run(root, def.pointers);
    tracing::debug!(query = def.id, elapsed_ns, "query executed");
    QueryReport {
        id: Some(def.id),
        dataset: Some(def.dataset.to_string()),
        elapsed_ns,
        hits,
    }
}

pub fn run_pointers(root: &Value, pointers: &[String]) -> HarnessResult<QueryReport> {
    for p in pointers {
        validate_pointer(p)?;
    }
    let (elapsed_ns, hits) = run(root, pointers);
    Ok(QueryReport {
        id: None,
        dataset: None,
        elapsed_ns,
        hits,
    })
}

fn scan_matches(record: &Value, kind: ScanKind) -> bool {
    match kind {
        ScanKind::Ids => record.get("id").is_some(),
        ScanKind::PushRepos => {
            record.get("type").and_then(Value::as_str) == Some("PushEvent")
                && record.pointer("/repo/name").is_some_and(Value::is_string)
        }
    }
}

/// Walks every top-level record once and counts matches. The whole pass is timed.
pub fn scan(root: &Value, kind: ScanKind) -> HarnessResult<ScanReport> {
    let records = root.as_array().ok_or(HarnessError::ExpectedArray)?;
    let start = Instant::now();
    let matched = records
        .iter()
        .filter(|r| black_box(scan_matches(r, kind)))
        .count();
    let elapsed_ns = u64::try_from(start.elapsed().as_nanos()).unwrap_or(u64::MAX);
    tracing::debug!(scan = kind.label(), matched, elapsed_ns, "scan executed");
    Ok(ScanReport {
        scan: kind,
        scanned: records.len(),
        matched,
        elapsed_ns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tweets() -> Value {
        json!([
            {
                "lang": "en",
                "user": {"id": 42, "lang": "ja"},
                "entities": {"urls": [{"indices": [23, 46]}]}
            },
            {"lang": "fr"}
        ])
    }

    #[test]
    fn catalogue_ids_are_unique_and_ordered() {
        let ids: Vec<u8> = QUERIES.iter().map(|q| q.id).collect();
        assert_eq!(ids, (1..=11).collect::<Vec<u8>>());
    }

    #[test]
    fn twitter_queries_resolve() {
        let doc = tweets();
        let q1 = run_catalogue(&doc, find_query(1).expect("q1"));
        let values: Vec<Option<Value>> = q1.hits.into_iter().map(|h| h.value).collect();
        assert_eq!(values, vec![Some(json!("ja")), Some(json!("en"))]);

        let q4 = run_catalogue(&doc, find_query(4).expect("q4"));
        assert_eq!(q4.hits[0].value, Some(json!(23)));
    }

    #[test]
    fn missing_fields_are_misses() {
        let doc = json!([{"user": {}}]);
        let report = run_catalogue(&doc, find_query(2).expect("q2"));
        assert!(report.hits.iter().all(|h| !h.found && h.value.is_none()));
    }

    #[test]
    fn bestbuy_category_ids() {
        let doc = json!({"products": [{"categoryPath": [{"id": "a"}, {"id": "b"}, {"id": "c"}]}]});
        let report = run_catalogue(&doc, find_query(11).expect("q11"));
        let ids: Vec<Value> = report.hits.into_iter().filter_map(|h| h.value).collect();
        assert_eq!(ids, vec![json!("b"), json!("c")]);
    }

    #[test]
    fn unknown_query_number() {
        assert!(matches!(find_query(12), Err(HarnessError::UnknownQuery(12))));
    }

    #[test]
    fn dataset_lookup_is_case_insensitive() {
        let ids: Vec<u8> = queries_for_dataset("Google_Map").iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![8, 9]);
        assert!(queries_for_dataset("nspl").is_empty());
    }

    #[test]
    fn custom_pointers_are_validated() {
        let doc = tweets();
        let report = run_pointers(&doc, &["/1/lang".to_string()]).expect("valid");
        assert_eq!(report.hits[0].value, Some(json!("fr")));
        assert!(matches!(
            run_pointers(&doc, &["user.lang".to_string()]),
            Err(HarnessError::InvalidPointer(_))
        ));
    }

    fn events() -> Value {
        json!([
            {"id": "1", "type": "PushEvent", "repo": {"name": "a/b"}},
            {"id": 2, "type": "PushEvent", "repo": {"name": 5}},
            {"type": "PushEvent", "repo": {"name": "c/d"}},
            {"id": null, "type": "WatchEvent", "repo": {"name": "e/f"}},
            {"id": 4, "type": "PushEvent", "repo": "g/h"},
            "not an object"
        ])
    }

    #[test]
    fn id_scan_counts_records_with_the_field() {
        let report = scan(&events(), ScanKind::Ids).expect("array");
        assert_eq!((report.scanned, report.matched), (6, 4));
    }

    #[test]
    fn push_scan_needs_a_string_repo_name() {
        let report = scan(&events(), ScanKind::PushRepos).expect("array");
        assert_eq!(report.matched, 2);
        assert_eq!(report.scan, ScanKind::PushRepos);
    }

    #[test]
    fn scans_reject_a_single_object() {
        let err = scan(&json!({"id": 1}), ScanKind::Ids).expect_err("object root");
        assert!(matches!(err, HarnessError::ExpectedArray));
    }
}
