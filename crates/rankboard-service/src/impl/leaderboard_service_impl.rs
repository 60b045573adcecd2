//! Cache-aside leaderboard service implementation.

use crate::cache::{cache_keys, CacheStore, SingleFlight};
use crate::dto::{LeaderboardPage, LeaderboardQuery};
use crate::leaderboard_service::{CacheStatus, LeaderboardResponse, LeaderboardService};
use crate::metrics::ServiceMetrics;
use async_trait::async_trait;
use rankboard_core::{PageRequest, RankboardResult};
use rankboard_repository::LeaderboardRepository;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Leaderboard service backed by a repository and a shared cache store.
pub struct LeaderboardServiceImpl {
    repository: Arc<dyn LeaderboardRepository>,
    cache: Arc<dyn CacheStore<LeaderboardPage>>,
    flights: SingleFlight,
    ttl: Duration,
}

impl LeaderboardServiceImpl {
    /// Creates a new leaderboard service.
    pub fn new(
        repository: Arc<dyn LeaderboardRepository>,
        cache: Arc<dyn CacheStore<LeaderboardPage>>,
        ttl: Duration,
    ) -> Self {
        Self {
            repository,
            cache,
            flights: SingleFlight::new(),
            ttl,
        }
    }

    fn cached(&self, key: &str) -> Option<LeaderboardResponse> {
        let page = self.cache.get(key)?;
        ServiceMetrics::cache_hit();
        debug!(key, "Leaderboard cache hit");
        Some(LeaderboardResponse {
            page,
            cache: CacheStatus::Hit,
        })
    }

    async fn load(&self, request: &PageRequest) -> RankboardResult<LeaderboardPage> {
        let total_count = self.repository.count(&request.search).await?;
        let players = self
            .repository
            .fetch(request.limit(), request.offset(), &request.search)
            .await?;

        Ok(LeaderboardPage::new(players, total_count, request))
    }
}

#[async_trait]
impl LeaderboardService for LeaderboardServiceImpl {
    async fn get_leaderboard(&self, query: LeaderboardQuery) -> RankboardResult<LeaderboardResponse> {
        let request = query.normalize();
        let key = cache_keys::players(&request);

        if let Some(response) = self.cached(&key) {
            return Ok(response);
        }

        let _flight = self.flights.acquire(&key).await;

        // The previous holder of this key may have just stored it.
        if let Some(response) = self.cached(&key) {
            return Ok(response);
        }

        ServiceMetrics::cache_miss();
        debug!(key = %key, "Leaderboard cache miss");

        let page = match self.load(&request).await {
            Ok(page) => Arc::new(page),
            Err(e) => {
                ServiceMetrics::leaderboard_failure();
                warn!(key = %key, error = %e, "Leaderboard query failed");
                return Err(e);
            }
        };

        self.cache.set(key, Arc::clone(&page), self.ttl);
        ServiceMetrics::cache_entries(self.cache.len());

        Ok(LeaderboardResponse {
            page,
            cache: CacheStatus::Miss,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{MemoryCacheStore, DEFAULT_TTL};
    use crate::metrics::names;
    use metrics_util::debugging::{DebugValue, DebuggingRecorder};
    use futures::future::join_all;
    use mockall::mock;
    use mockall::predicate::eq;
    use rankboard_core::{PlayerRecord, RankboardError};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    mock! {
        Repo {}

        #[async_trait]
        impl LeaderboardRepository for Repo {
            async fn count(&self, search: &str) -> RankboardResult<u64>;
            async fn fetch(&self, limit: i64, offset: i64, search: &str) -> RankboardResult<Vec<PlayerRecord>>;
        }
    }

    /// In-memory repository reproducing the ranking rules of the SQL queries.
    #[derive(Default)]
    struct FakeRepository {
        rows: Mutex<Vec<(i64, String, i32, Option<f64>)>>,
        fetch_calls: AtomicUsize,
        count_calls: AtomicUsize,
        fail: AtomicBool,
        delay: Option<Duration>,
    }

    impl FakeRepository {
        fn with_players(count: i64) -> Self {
            let repo = Self::default();
            for id in 1..=count {
                repo.add(id, &format!("player{id:02}"), Some(1000.0 - id as f64));
            }
            repo
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        fn add(&self, char_id: i64, username: &str, score: Option<f64>) {
            self.rows
                .lock()
                .unwrap()
                .push((char_id, username.to_string(), 1, score));
        }

        fn matching(&self, search: &str) -> Vec<(i64, String, i32, Option<f64>)> {
            let needle = search.to_lowercase();
            self.rows
                .lock()
                .unwrap()
                .iter()
                .filter(|(_, name, _, _)| name.to_lowercase().contains(&needle))
                .cloned()
                .collect()
        }

        async fn pause(&self) -> RankboardResult<()> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail.load(Ordering::SeqCst) {
                return Err(RankboardError::database("connection refused"));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl LeaderboardRepository for FakeRepository {
        async fn count(&self, search: &str) -> RankboardResult<u64> {
            self.count_calls.fetch_add(1, Ordering::SeqCst);
            self.pause().await?;
            Ok(self.matching(search).len() as u64)
        }

        async fn fetch(&self, limit: i64, offset: i64, search: &str) -> RankboardResult<Vec<PlayerRecord>> {
            self.fetch_calls.fetch_add(1, Ordering::SeqCst);
            self.pause().await?;

            let mut rows = self.matching(search);
            rows.sort_by(|a, b| match (a.3, b.3) {
                (Some(x), Some(y)) => y.total_cmp(&x).then(a.0.cmp(&b.0)),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => a.0.cmp(&b.0),
            });

            Ok(rows
                .into_iter()
                .skip(offset as usize)
                .take(limit as usize)
                .map(|(id, name, class, score)| PlayerRecord::new(id, name, class, score.unwrap_or(0.0)))
                .collect())
        }
    }

    fn service_with(repo: Arc<dyn LeaderboardRepository>) -> (LeaderboardServiceImpl, Arc<MemoryCacheStore<LeaderboardPage>>) {
        let cache = Arc::new(MemoryCacheStore::new());
        let service = LeaderboardServiceImpl::new(repo, cache.clone(), DEFAULT_TTL);
        (service, cache)
    }

    fn query(page: Option<i64>, limit: Option<i64>, search: Option<&str>) -> LeaderboardQuery {
        LeaderboardQuery {
            page,
            limit,
            search: search.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_first_request_misses_then_hits() {
        let mut repo = MockRepo::new();
        repo.expect_count().with(eq("")).times(1).returning(|_| Ok(1));
        repo.expect_fetch()
            .with(eq(10), eq(0), eq(""))
            .times(1)
            .returning(|_, _, _| Ok(vec![PlayerRecord::new(1, "alice", 2, 50.0)]));
        let (service, _) = service_with(Arc::new(repo));

        let first = service.get_leaderboard(LeaderboardQuery::default()).await.unwrap();
        let second = service.get_leaderboard(LeaderboardQuery::default()).await.unwrap();

        assert_eq!(first.cache, CacheStatus::Miss);
        assert_eq!(second.cache, CacheStatus::Hit);
        assert_eq!(
            serde_json::to_vec(&*first.page).unwrap(),
            serde_json::to_vec(&*second.page).unwrap()
        );
    }

    #[tokio::test]
    async fn test_equivalent_raw_requests_share_cache_entry() {
        let mut repo = MockRepo::new();
        repo.expect_count().times(1).returning(|_| Ok(0));
        repo.expect_fetch().times(1).returning(|_, _, _| Ok(Vec::new()));
        let (service, _) = service_with(Arc::new(repo));

        let raw = service
            .get_leaderboard(query(Some(-3), Some(0), Some("")))
            .await
            .unwrap();
        let canonical = service.get_leaderboard(query(Some(1), Some(10), None)).await.unwrap();

        assert_eq!(raw.cache, CacheStatus::Miss);
        assert_eq!(canonical.cache, CacheStatus::Hit);
    }

    #[tokio::test]
    async fn test_count_failure_skips_fetch_and_cache() {
        let mut repo = MockRepo::new();
        repo.expect_count()
            .times(2)
            .returning(|_| Err(RankboardError::database("timeout")));
        repo.expect_fetch().times(0);
        let (service, cache) = service_with(Arc::new(repo));

        assert!(service.get_leaderboard(LeaderboardQuery::default()).await.is_err());
        assert!(cache.is_empty());
        assert!(service.get_leaderboard(LeaderboardQuery::default()).await.is_err());
    }

    #[tokio::test]
    async fn test_fetch_failure_is_not_cached() {
        let mut repo = MockRepo::new();
        repo.expect_count().times(2).returning(|_| Ok(3));
        let mut fetches = 0;
        repo.expect_fetch().times(2).returning(move |_, _, _| {
            fetches += 1;
            if fetches == 1 {
                Err(RankboardError::database("connection reset"))
            } else {
                Ok(Vec::new())
            }
        });
        let (service, cache) = service_with(Arc::new(repo));

        let err = service.get_leaderboard(LeaderboardQuery::default()).await.unwrap_err();
        assert!(err.is_data_access());
        assert!(cache.is_empty());

        let retry = service.get_leaderboard(LeaderboardQuery::default()).await.unwrap();
        assert_eq!(retry.cache, CacheStatus::Miss);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_second_page_of_25() {
        let (service, _) = service_with(Arc::new(FakeRepository::with_players(25)));

        let response = service
            .get_leaderboard(query(Some(2), Some(10), None))
            .await
            .unwrap();
        let page = &response.page;

        assert_eq!(page.current_page, 2);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_count, 25);
        assert_eq!(page.players.len(), 10);
        let ids: Vec<i64> = page.players.iter().map(|p| p.char_id).collect();
        assert_eq!(ids, (11..=20).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_search_counts_only_matches() {
        let repo = FakeRepository::default();
        repo.add(1, "Alice", Some(10.0));
        repo.add(2, "bob", Some(20.0));
        repo.add(3, "VALERIE", Some(30.0));
        repo.add(4, "Kalani", None);
        let (service, _) = service_with(Arc::new(repo));

        let response = service
            .get_leaderboard(query(None, Some(1), Some("al")))
            .await
            .unwrap();

        assert_eq!(response.page.total_count, 3);
        assert_eq!(response.page.total_pages, 3);
        assert_eq!(response.page.players.len(), 1);
        assert_eq!(response.page.players[0].username, "VALERIE");
    }

    #[tokio::test]
    async fn test_empty_dataset() {
        let (service, _) = service_with(Arc::new(FakeRepository::default()));

        let response = service.get_leaderboard(LeaderboardQuery::default()).await.unwrap();

        assert_eq!(
            serde_json::to_value(&*response.page).unwrap(),
            serde_json::json!({"players": [], "total_count": 0, "current_page": 1, "total_pages": 0})
        );
    }

    #[tokio::test]
    async fn test_unscored_players_follow_scored() {
        let repo = FakeRepository::default();
        repo.add(1, "zero", None);
        repo.add(2, "low", Some(1.0));
        repo.add(3, "none", None);
        repo.add(4, "high", Some(99.0));
        let (service, _) = service_with(Arc::new(repo));

        let response = service.get_leaderboard(LeaderboardQuery::default()).await.unwrap();
        let scores: Vec<f64> = response.page.players.iter().map(|p| p.reward_score).collect();

        assert_eq!(scores, vec![99.0, 1.0, 0.0, 0.0]);
        assert_eq!(response.page.players[2].char_id, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hits_are_stale_until_ttl() {
        let repo = Arc::new(FakeRepository::with_players(25));
        let (service, _) = service_with(repo.clone());

        let first = service.get_leaderboard(LeaderboardQuery::default()).await.unwrap();
        repo.add(26, "latecomer", Some(5000.0));

        tokio::time::advance(DEFAULT_TTL - Duration::from_secs(1)).await;
        let cached = service.get_leaderboard(LeaderboardQuery::default()).await.unwrap();
        assert_eq!(cached.cache, CacheStatus::Hit);
        assert_eq!(cached.page.total_count, 25);
        assert_eq!(cached.page.total_pages, first.page.total_pages);

        tokio::time::advance(Duration::from_secs(1)).await;
        let refreshed = service.get_leaderboard(LeaderboardQuery::default()).await.unwrap();
        assert_eq!(refreshed.cache, CacheStatus::Miss);
        assert_eq!(refreshed.page.total_count, 26);
        assert_eq!(refreshed.page.players[0].username, "latecomer");
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_misses_query_once() {
        let repo = Arc::new(FakeRepository::with_players(25).with_delay(Duration::from_millis(50)));
        let (service, _) = service_with(repo.clone());

        let responses = join_all((0..8).map(|_| service.get_leaderboard(query(Some(2), None, None)))).await;

        assert_eq!(repo.count_calls.load(Ordering::SeqCst), 1);
        assert_eq!(repo.fetch_calls.load(Ordering::SeqCst), 1);

        let misses = responses
            .iter()
            .filter(|r| r.as_ref().unwrap().cache == CacheStatus::Miss)
            .count();
        assert_eq!(misses, 1);

        let first = &responses[0].as_ref().unwrap().page;
        assert!(responses
            .iter()
            .all(|r| Arc::ptr_eq(&r.as_ref().unwrap().page, first)));
        assert_eq!(service.flights.in_flight(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_waiters_recompute_after_failure() {
        let repo = Arc::new(FakeRepository::with_players(5).with_delay(Duration::from_millis(50)));
        repo.fail.store(true, Ordering::SeqCst);
        let (service, cache) = service_with(repo.clone());

        let responses = join_all((0..3).map(|_| service.get_leaderboard(LeaderboardQuery::default()))).await;

        assert!(responses.iter().all(Result::is_err));
        assert_eq!(repo.count_calls.load(Ordering::SeqCst), 3);
        assert_eq!(repo.fetch_calls.load(Ordering::SeqCst), 0);
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_request_writes_nothing() {
        let repo = Arc::new(FakeRepository::with_players(5).with_delay(Duration::from_secs(10)));
        let (service, cache) = service_with(repo.clone());

        let timed_out = tokio::time::timeout(
            Duration::from_secs(1),
            service.get_leaderboard(LeaderboardQuery::default()),
        )
        .await;

        assert!(timed_out.is_err());
        assert!(cache.is_empty());
        assert_eq!(service.flights.in_flight(), 0);

        let next = service.get_leaderboard(LeaderboardQuery::default()).await.unwrap();
        assert_eq!(next.cache, CacheStatus::Miss);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_disabled_cache_always_misses() {
        let repo = Arc::new(FakeRepository::with_players(3));
        let service = LeaderboardServiceImpl::new(
            repo.clone(),
            Arc::new(MemoryCacheStore::disabled()),
            DEFAULT_TTL,
        );

        for _ in 0..2 {
            let response = service.get_leaderboard(LeaderboardQuery::default()).await.unwrap();
            assert_eq!(response.cache, CacheStatus::Miss);
        }
        assert_eq!(repo.fetch_calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_cache_and_single_flight_metrics() {
        let recorder = DebuggingRecorder::new();
        let snapshotter = recorder.snapshotter();

        metrics::with_local_recorder(&recorder, || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .start_paused(true)
                .build()
                .unwrap();

            runtime.block_on(async {
                let repo = Arc::new(FakeRepository::with_players(5).with_delay(Duration::from_millis(50)));
                let (service, _) = service_with(repo);

                join_all((0..4).map(|_| service.get_leaderboard(LeaderboardQuery::default()))).await;
                service.get_leaderboard(LeaderboardQuery::default()).await.unwrap();
            });
        });

        let snapshot = snapshotter.snapshot().into_vec();
        let counter = |name: &str, result: Option<&str>| {
            snapshot.iter().find_map(|(key, _, _, value)| {
                let key = key.key();
                let labelled = result.map_or(true, |expected| {
                    key.labels().any(|l| l.key() == "result" && l.value() == expected)
                });
                match value {
                    DebugValue::Counter(v) if key.name() == name && labelled => Some(*v),
                    _ => None,
                }
            })
        };

        assert_eq!(counter(names::CACHE_REQUESTS_TOTAL, Some("miss")), Some(1));
        assert_eq!(counter(names::CACHE_REQUESTS_TOTAL, Some("hit")), Some(4));
        assert_eq!(counter(names::SINGLE_FLIGHT_WAITS_TOTAL, None), Some(3));
    }
}
