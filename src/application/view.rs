use chrono::NaiveDate;

use super::app::Application;
use crate::domain::filter::TransactionFilter;
use crate::domain::models::TransactionRecord;

/// Page size the view requests from the history service.
pub const VIEW_PAGE_LIMIT: usize = 100;

/// A fetch the view wants issued.
///
/// Carries the generation it was created under, so a late-arriving response
/// for a superseded view identity (account or end-date change mid-flight) is
/// discarded instead of clobbering the new list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchRequest {
    pub pub_key: String,
    pub limit: usize,
    pub before: Option<String>,
    generation: u64,
}

/// Deterministic state behind the paginated, filterable transaction list.
///
/// The view accumulates pages for one tracked account, decides after each
/// page whether more history may remain, and filters in memory at render
/// time. All transitions happen through the methods below; the view owns its
/// state exclusively.
#[derive(Debug)]
pub struct TransactionListView {
    transactions: Vec<TransactionRecord>,
    pub_key: String,
    filter: TransactionFilter,
    has_more: bool,
    loading: bool,
    generation: u64,
    page_limit: usize,
}

impl Default for TransactionListView {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionListView {
    pub fn new() -> Self {
        Self {
            transactions: Vec::new(),
            pub_key: String::new(),
            filter: TransactionFilter::default(),
            has_more: true,
            loading: false,
            generation: 0,
            page_limit: VIEW_PAGE_LIMIT,
        }
    }

    /// Tracks a new account: clears the accumulated list and returns the
    /// first-page fetch. An empty key resets the view but fetches nothing.
    pub fn set_pub_key(&mut self, pub_key: impl Into<String>) -> Option<FetchRequest> {
        self.pub_key = pub_key.into();
        self.refresh()
    }

    /// Changing the end of the date window invalidates the accumulated pages
    /// and refetches from the top, mirroring an account change.
    pub fn set_end_date(&mut self, end_date: Option<NaiveDate>) -> Option<FetchRequest> {
        self.filter.end_date = end_date;
        self.refresh()
    }

    /// Filter-only edit; the accumulated list is kept.
    pub fn set_start_date(&mut self, start_date: Option<NaiveDate>) {
        self.filter.start_date = start_date;
    }

    /// Filter-only edit; the accumulated list is kept.
    pub fn set_min_amount(&mut self, min_amount: Option<f64>) {
        self.filter.min_amount = min_amount;
    }

    /// Filter-only edit; the accumulated list is kept.
    pub fn set_max_amount(&mut self, max_amount: Option<f64>) {
        self.filter.max_amount = max_amount;
    }

    fn refresh(&mut self) -> Option<FetchRequest> {
        self.transactions.clear();
        self.has_more = true;
        // Bumping the generation orphans any in-flight fetch; its response
        // will be discarded, so it can no longer clear the loading state.
        self.loading = false;
        self.generation += 1;
        if self.pub_key.is_empty() {
            return None;
        }
        self.loading = true;
        Some(FetchRequest {
            pub_key: self.pub_key.clone(),
            limit: self.page_limit,
            before: None,
            generation: self.generation,
        })
    }

    /// Next page, cursored on the last accumulated transaction's primary
    /// signature. A no-op while nothing is accumulated: there is no cursor
    /// to derive.
    pub fn load_more(&mut self) -> Option<FetchRequest> {
        let cursor = self.transactions.last()?.primary_signature()?.to_string();
        self.loading = true;
        Some(FetchRequest {
            pub_key: self.pub_key.clone(),
            limit: self.page_limit,
            before: Some(cursor),
            generation: self.generation,
        })
    }

    /// Folds a fetched page into the view. Responses from a superseded
    /// generation are discarded wholesale.
    pub fn apply_page(&mut self, request: &FetchRequest, page: Vec<TransactionRecord>) {
        if request.generation != self.generation {
            tracing::debug!("Discarding stale page for {}", request.pub_key);
            return;
        }
        self.loading = false;

        if page.is_empty() {
            self.has_more = false;
            return;
        }

        // The oldest record of the just-fetched page drives the continuation
        // decision. With no start date set, more history may always remain.
        // Known to over- and under-signal on ledgers with large time gaps.
        self.has_more = match (
            self.filter.start_date,
            page.last().and_then(|tx| tx.block_datetime()),
        ) {
            (None, _) => true,
            (Some(start), Some(oldest)) => oldest.date_naive() >= start,
            (Some(_), None) => false,
        };

        if request.before.is_some() {
            self.transactions.extend(page);
        } else {
            self.transactions = page;
        }
    }

    /// A failed fetch stops the loading state and leaves the list and
    /// `has_more` untouched. Nothing is retried.
    pub fn fetch_failed(&mut self, request: &FetchRequest) {
        if request.generation == self.generation {
            self.loading = false;
        }
    }

    /// Render-time filter over the accumulated set; the accumulated list
    /// itself is never mutated by filtering.
    pub fn filtered(&self) -> Vec<&TransactionRecord> {
        self.transactions
            .iter()
            .filter(|tx| self.filter.matches(tx, &self.pub_key))
            .collect()
    }

    pub fn transactions(&self) -> &[TransactionRecord] {
        &self.transactions
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Runs a fetch request against the application and folds the outcome
    /// back into the view.
    pub async fn dispatch<A>(&mut self, app: &A, request: FetchRequest)
    where
        A: Application + Sync,
    {
        match app
            .transaction_history(&request.pub_key, request.limit, request.before.as_deref())
            .await
        {
            Ok(page) => self.apply_page(&request, page),
            Err(e) => {
                tracing::error!("Error fetching transactions: {}", e);
                self.fetch_failed(&request);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::app::MockApplication;
    use crate::domain::errors::HistoryError;
    use crate::domain::models::{TransactionBody, TransactionMessage, TransactionMeta};

    const PUB_KEY: &str = "TrackedAccount1111111111111111111111111111";

    fn record(signature: &str, block_time: i64) -> TransactionRecord {
        TransactionRecord {
            block_time: Some(block_time),
            slot: 7,
            meta: Some(TransactionMeta {
                err: None,
                fee: 5000,
                pre_balances: vec![1_000_000_000, 0],
                post_balances: vec![900_000_000, 100_000_000],
            }),
            transaction: TransactionBody {
                message: TransactionMessage {
                    account_keys: vec![PUB_KEY.to_string(), "Counterparty".to_string()],
                    recent_blockhash: "hash".to_string(),
                },
                signatures: vec![signature.to_string()],
            },
        }
    }

    // 2024-05-01 and 2024-05-03, midnight UTC
    const MAY_FIRST: i64 = 1_714_521_600;
    const MAY_THIRD: i64 = 1_714_694_400;

    #[test]
    fn tracking_an_account_requests_the_first_page() {
        let mut view = TransactionListView::new();
        let request = view.set_pub_key(PUB_KEY).unwrap();
        assert_eq!(request.pub_key, PUB_KEY);
        assert_eq!(request.limit, VIEW_PAGE_LIMIT);
        assert_eq!(request.before, None);
        assert!(view.is_loading());
    }

    #[test]
    fn empty_pub_key_resets_but_fetches_nothing() {
        let mut view = TransactionListView::new();
        let request = view.set_pub_key(PUB_KEY).unwrap();
        view.apply_page(&request, vec![record("sig-1", MAY_THIRD)]);
        assert_eq!(view.transactions().len(), 1);

        assert!(view.set_pub_key("").is_none());
        assert!(view.transactions().is_empty());
        assert!(view.has_more());
        assert!(!view.is_loading());
    }

    #[test]
    fn refresh_replaces_and_load_more_appends() {
        let mut view = TransactionListView::new();
        let first = view.set_pub_key(PUB_KEY).unwrap();
        view.apply_page(&first, vec![record("sig-1", MAY_THIRD)]);

        let more = view.load_more().unwrap();
        assert_eq!(more.before.as_deref(), Some("sig-1"));
        view.apply_page(&more, vec![record("sig-2", MAY_FIRST)]);
        assert_eq!(view.transactions().len(), 2);

        let refreshed = view.set_pub_key(PUB_KEY).unwrap();
        view.apply_page(&refreshed, vec![record("sig-3", MAY_THIRD)]);
        assert_eq!(view.transactions().len(), 1);
        assert_eq!(view.transactions()[0].primary_signature(), Some("sig-3"));
    }

    #[test]
    fn load_more_without_accumulated_pages_is_a_noop() {
        let mut view = TransactionListView::new();
        let _ = view.set_pub_key(PUB_KEY);
        assert!(view.load_more().is_none());
    }

    #[test]
    fn empty_page_clears_has_more() {
        let mut view = TransactionListView::new();
        let request = view.set_pub_key(PUB_KEY).unwrap();
        view.apply_page(&request, vec![]);
        assert!(!view.has_more());
        assert!(!view.is_loading());
    }

    #[test]
    fn continuation_follows_the_oldest_record_and_start_date() {
        let mut view = TransactionListView::new();

        // No start date: more history may always remain.
        let request = view.set_pub_key(PUB_KEY).unwrap();
        view.apply_page(&request, vec![record("sig-1", MAY_THIRD)]);
        assert!(view.has_more());

        // Oldest record still on/after the start date.
        view.set_start_date(NaiveDate::from_ymd_opt(2024, 5, 1));
        let request = view.set_pub_key(PUB_KEY).unwrap();
        view.apply_page(&request, vec![record("sig-1", MAY_THIRD)]);
        assert!(view.has_more());

        // Oldest record precedes the start date: stop.
        view.set_start_date(NaiveDate::from_ymd_opt(2024, 5, 2));
        let request = view.set_pub_key(PUB_KEY).unwrap();
        view.apply_page(&request, vec![record("sig-1", MAY_FIRST)]);
        assert!(!view.has_more());
    }

    #[test]
    fn stale_generation_pages_are_discarded() {
        let mut view = TransactionListView::new();
        let stale = view.set_pub_key(PUB_KEY).unwrap();
        let current = view.set_pub_key(PUB_KEY).unwrap();

        view.apply_page(&stale, vec![record("sig-old", MAY_FIRST)]);
        assert!(view.transactions().is_empty());
        assert!(view.is_loading());

        view.apply_page(&current, vec![record("sig-new", MAY_THIRD)]);
        assert_eq!(view.transactions().len(), 1);
        assert!(!view.is_loading());
    }

    #[test]
    fn clearing_the_key_mid_flight_does_not_leave_loading_stuck() {
        let mut view = TransactionListView::new();
        let in_flight = view.set_pub_key(PUB_KEY).unwrap();
        assert!(view.is_loading());

        // Tracking stops before the response lands; nothing is in flight
        // anymore, so the view must not report loading.
        assert!(view.set_pub_key("").is_none());
        assert!(!view.is_loading());

        view.apply_page(&in_flight, vec![record("sig-late", MAY_THIRD)]);
        assert!(view.transactions().is_empty());
        assert!(!view.is_loading());

        view.fetch_failed(&in_flight);
        assert!(!view.is_loading());
    }

    #[test]
    fn failure_clears_loading_and_keeps_state() {
        let mut view = TransactionListView::new();
        let first = view.set_pub_key(PUB_KEY).unwrap();
        view.apply_page(&first, vec![record("sig-1", MAY_THIRD)]);

        let more = view.load_more().unwrap();
        view.fetch_failed(&more);
        assert!(!view.is_loading());
        assert!(view.has_more());
        assert_eq!(view.transactions().len(), 1);
    }

    #[test]
    fn unset_filter_returns_the_full_set_and_is_idempotent() {
        let mut view = TransactionListView::new();
        let request = view.set_pub_key(PUB_KEY).unwrap();
        view.apply_page(
            &request,
            vec![record("sig-1", MAY_THIRD), record("sig-2", MAY_FIRST)],
        );

        let once: Vec<_> = view
            .filtered()
            .iter()
            .filter_map(|tx| tx.primary_signature())
            .collect();
        assert_eq!(once, vec!["sig-1", "sig-2"]);

        let twice: Vec<_> = view
            .filtered()
            .iter()
            .filter_map(|tx| tx.primary_signature())
            .collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn filter_skips_records_the_tracked_key_is_absent_from() {
        let mut view = TransactionListView::new();
        let request = view.set_pub_key(PUB_KEY).unwrap();
        let mut foreign = record("sig-foreign", MAY_THIRD);
        foreign.transaction.message.account_keys =
            vec!["Other".to_string(), "Counterparty".to_string()];
        view.apply_page(&request, vec![record("sig-1", MAY_THIRD), foreign]);

        view.set_min_amount(Some(-1.0));
        let kept: Vec<_> = view
            .filtered()
            .iter()
            .filter_map(|tx| tx.primary_signature())
            .collect();
        assert_eq!(kept, vec!["sig-1"]);
    }

    #[tokio::test]
    async fn dispatch_applies_successful_pages() {
        let mut app = MockApplication::new();
        app.expect_transaction_history()
            .withf(|pub_key, limit, before| {
                pub_key == PUB_KEY && *limit == VIEW_PAGE_LIMIT && before.is_none()
            })
            .returning(|_, _, _| Ok(vec![record("sig-1", MAY_THIRD)]));

        let mut view = TransactionListView::new();
        let request = view.set_pub_key(PUB_KEY).unwrap();
        view.dispatch(&app, request).await;

        assert_eq!(view.transactions().len(), 1);
        assert!(!view.is_loading());
    }

    #[tokio::test]
    async fn dispatch_records_failures_without_touching_the_list() {
        let mut app = MockApplication::new();
        app.expect_transaction_history()
            .returning(|pub_key, _, _| Err(HistoryError::InvalidPubKey(pub_key.to_string())));

        let mut view = TransactionListView::new();
        let request = view.set_pub_key(PUB_KEY).unwrap();
        view.dispatch(&app, request).await;

        assert!(view.transactions().is_empty());
        assert!(view.has_more());
        assert!(!view.is_loading());
    }
}
