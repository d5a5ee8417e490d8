//! Offset/limit pagination over the usage ledger.
//!
//! Pages are fetched strictly in sequence: page N+1 is only requested once
//! page N's size is known. A page shorter than the limit ends the loop; the
//! platform never returns a full-sized final page.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

use sourcebridge_platform::{Platform, UsageQuery, requests};
use sourcebridge_shared::{Result, SourceBridgeError, UsageRecord};

/// Drive `fetch(offset, limit)` until a short page.
///
/// Stops after `max_pages` pages even if the last one was full, logging a
/// warning; the records gathered so far are returned.
pub async fn paginate<F, Fut>(page_size: u32, max_pages: u32, mut fetch: F) -> Result<Vec<Value>>
where
    F: FnMut(u32, u32) -> Fut,
    Fut: Future<Output = Result<Vec<Value>>>,
{
    if page_size == 0 {
        return Err(SourceBridgeError::validation("page size must be at least 1"));
    }
    if max_pages == 0 {
        return Err(SourceBridgeError::validation("page cap must be at least 1"));
    }

    let mut records = Vec::new();
    let mut offset: u32 = 0;

    for page in 0..max_pages {
        let batch = fetch(offset, page_size).await?;
        let len = batch.len();
        records.extend(batch);

        debug!(page, offset, len, total = records.len(), "page fetched");

        if len < page_size as usize {
            return Ok(records);
        }
        offset = offset.saturating_add(page_size);
    }

    warn!(
        max_pages,
        total = records.len(),
        "page limit reached before a short page; results may be incomplete"
    );
    Ok(records)
}

/// Drop null, empty-string, empty-array and empty-object fields.
pub fn clean_record(record: Value) -> Option<UsageRecord> {
    match record {
        Value::Object(fields) => Some(
            fields
                .into_iter()
                .filter(|(_, v)| !is_empty_value(v))
                .collect::<Map<_, _>>(),
        ),
        _ => None,
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        _ => false,
    }
}

/// Every usage record in `[start, start + duration)`, cleaned.
#[instrument(skip_all, fields(start = %start, duration = %duration))]
pub async fn collect_usage(
    platform: &dyn Platform,
    start: DateTime<Utc>,
    duration: &str,
    page_size: u32,
    max_pages: u32,
) -> Result<Vec<UsageRecord>> {
    let raw = paginate(page_size, max_pages, |offset, limit| {
        let query = UsageQuery {
            start_date: start,
            duration: duration.to_string(),
            offset,
            limit,
        };
        async move { requests::query_usage(platform, &query).await }
    })
    .await?;

    Ok(raw.into_iter().filter_map(clean_record).collect())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;

    fn page(n: usize) -> Vec<Value> {
        (0..n).map(|i| json!({ "i": i })).collect()
    }

    /// Serves pages of the given sizes and records each (offset, limit).
    async fn run(sizes: &[usize], limit: u32, max_pages: u32) -> (Vec<Value>, Vec<(u32, u32)>) {
        let calls = Mutex::new(Vec::new());
        let result = paginate(limit, max_pages, |offset, limit| {
            let mut calls = calls.lock().unwrap();
            let n = sizes.get(calls.len()).copied().unwrap_or(0);
            calls.push((offset, limit));
            async move { Ok(page(n)) }
        })
        .await
        .unwrap();
        (result, calls.into_inner().unwrap())
    }

    #[tokio::test]
    async fn short_first_page_makes_one_call() {
        let (records, calls) = run(&[3], 1000, 100).await;
        assert_eq!(records.len(), 3);
        assert_eq!(calls, vec![(0, 1000)]);
    }

    #[tokio::test]
    async fn sums_all_pages_until_short_page() {
        let (records, calls) = run(&[4, 4, 4, 1], 4, 100).await;
        assert_eq!(records.len(), 13);
        assert_eq!(calls, vec![(0, 4), (4, 4), (8, 4), (12, 4)]);
    }

    #[tokio::test]
    async fn empty_final_page_terminates() {
        let (records, calls) = run(&[2, 2, 0], 2, 100).await;
        assert_eq!(records.len(), 4);
        assert_eq!(calls.len(), 3);
    }

    #[tokio::test]
    async fn page_guard_stops_runaway_loops() {
        let (records, calls) = run(&[5; 50], 5, 3).await;
        assert_eq!(calls.len(), 3);
        assert_eq!(records.len(), 15);
    }

    #[tokio::test]
    async fn fetch_errors_propagate() {
        let result = paginate(10, 10, |_, _| async {
            Err::<Vec<Value>, _>(SourceBridgeError::Network("down".into()))
        })
        .await;
        assert!(matches!(result, Err(SourceBridgeError::Network(_))));
    }

    #[tokio::test]
    async fn zero_page_size_is_rejected() {
        let result = paginate(0, 10, |_, _| async { Ok(Vec::new()) }).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn zero_page_cap_is_rejected_without_fetching() {
        let mut calls = 0;
        let result = paginate(10, 0, |_, _| {
            calls += 1;
            async { Ok(Vec::new()) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls, 0);
    }

    #[test]
    fn clean_record_strips_empty_fields() {
        let cleaned = clean_record(json!({
            "name": "completion",
            "credits": 0.25,
            "tokens": 0,
            "model": null,
            "workflow": "",
            "entities": [],
            "metadata": {},
            "ok": false
        }))
        .unwrap();
        assert_eq!(
            Value::Object(cleaned),
            json!({ "name": "completion", "credits": 0.25, "tokens": 0, "ok": false })
        );
        assert!(clean_record(json!("not an object")).is_none());
    }
}
