use futures::TryStreamExt;
use magview_search::backend::{MockBackend, SearchBackend};
use magview_search::browse::{BrowseEvent, BrowseOptions, LoadOutcome, browse, load_more};
use magview_search::{OrderBy, PageState, Paginator, TorrentSummary};
use rstest::rstest;
use std::cmp::Ordering;

const EPOCH: i64 = 10_000;

fn catalogue() -> Vec<TorrentSummary> {
    (1..=23)
        .map(|id: u64| TorrentSummary {
            id,
            info_hash: format!("{id:040x}"),
            name: format!("record {id}"),
            size: (id * 7) % 5 * 100,
            discovered_on: (id % 4) as i64 * 1_000,
            n_files: (id % 3) as u32,
            relevance: (id % 6) as f64 * 0.25,
        })
        .collect()
}

/// The order the backend is expected to return every record in.
fn expected(order_by: OrderBy, ascending: bool) -> Vec<u64> {
    let mut records = catalogue();
    records.sort_by(|a, b| {
        let ordering = match order_by {
            OrderBy::TotalSize => a.size.cmp(&b.size),
            OrderBy::DiscoveredOn => a.discovered_on.cmp(&b.discovered_on),
            OrderBy::NFiles => a.n_files.cmp(&b.n_files),
            OrderBy::Relevance => a.relevance.total_cmp(&b.relevance),
            other => panic!("{other} is not populated"),
        }
        .then(a.id.cmp(&b.id));
        match ascending {
            true => ordering,
            false => ordering.reverse(),
        }
    });
    records.into_iter().map(|r| r.id).collect()
}

#[rstest]
#[case(OrderBy::TotalSize, true)]
#[case(OrderBy::TotalSize, false)]
#[case(OrderBy::DiscoveredOn, true)]
#[case(OrderBy::DiscoveredOn, false)]
#[case(OrderBy::NFiles, true)]
#[case(OrderBy::NFiles, false)]
#[case(OrderBy::Relevance, true)]
#[case(OrderBy::Relevance, false)]
#[tokio::test]
async fn test_every_record_once_in_order(#[case] order_by: OrderBy, #[case] ascending: bool) {
    let backend = MockBackend::with_records(catalogue());
    let mut paginator = Paginator::new(None::<String>)
        .with_epoch(EPOCH)
        .with_limit(Some(3))
        .with_order(order_by, ascending);
    let mut seen: Vec<TorrentSummary> = Vec::new();

    while let LoadOutcome::Appended(_) = load_more(&backend, &mut paginator, &mut seen).await.unwrap() {}

    let ids: Vec<u64> = seen.iter().map(|r| r.id).collect();
    assert_eq!(ids, expected(order_by, ascending));
    assert_eq!(paginator.state(), PageState::Exhausted);
    // Eight pages of three (the last one partial), then the empty page.
    assert_eq!(backend.requests(), 9);
}

#[tokio::test]
async fn test_new_discoveries_do_not_shift_the_listing() {
    let backend = MockBackend::with_records(catalogue());
    let mut paginator = Paginator::new(None::<String>).with_epoch(EPOCH).with_limit(Some(5));
    let mut seen: Vec<TorrentSummary> = Vec::new();

    load_more(&backend, &mut paginator, &mut seen).await.unwrap();
    for id in 100..105 {
        backend
            .insert(TorrentSummary {
                id,
                info_hash: format!("{id:040x}"),
                name: format!("late {id}"),
                size: 1,
                discovered_on: EPOCH + 1,
                n_files: 1,
                relevance: 0.0,
            })
            .await;
    }
    while let LoadOutcome::Appended(_) = load_more(&backend, &mut paginator, &mut seen).await.unwrap() {}

    let ids: Vec<u64> = seen.iter().map(|r| r.id).collect();
    assert_eq!(ids, expected(OrderBy::DiscoveredOn, false));
}

#[tokio::test]
async fn test_retried_request_is_identical() {
    let backend = MockBackend::with_records(catalogue());
    let mut paginator = Paginator::new(None::<String>).with_epoch(EPOCH).with_limit(Some(4));
    let mut seen: Vec<TorrentSummary> = Vec::new();
    load_more(&backend, &mut paginator, &mut seen).await.unwrap();

    let first = paginator.next_page().unwrap().unwrap();
    backend.fail_next(1);
    assert!(backend.torrents(&first).await.is_err());
    paginator.fail(first.ticket()).unwrap();

    let second = paginator.next_page().unwrap().unwrap();
    assert_eq!(first.to_params(), second.to_params());
    assert_ne!(first.ticket(), second.ticket());
}

#[tokio::test]
async fn test_reset_restarts_from_the_top() {
    let backend = MockBackend::with_records(catalogue());
    let mut paginator = Paginator::new(None::<String>).with_epoch(EPOCH).with_limit(Some(4));
    let options = BrowseOptions {
        max_pages: Some(2),
        retries: 0,
    };
    let events: Vec<BrowseEvent> = browse(&backend, &mut paginator, options).try_collect().await.unwrap();
    assert_eq!(events.last(), Some(&BrowseEvent::Complete { pages: 2, records: 8 }));

    paginator.reset(Some("record 1".to_string()), OrderBy::TotalSize, true);
    let mut seen: Vec<TorrentSummary> = Vec::new();
    while let LoadOutcome::Appended(_) = load_more(&backend, &mut paginator, &mut seen).await.unwrap() {}

    // "record 1" and "record 10" to "record 19".
    assert_eq!(seen.len(), 11);
    let sizes: Vec<u64> = seen.iter().map(|r| r.size).collect();
    assert!(sizes.windows(2).all(|pair| pair[0].cmp(&pair[1]) != Ordering::Greater));
}
