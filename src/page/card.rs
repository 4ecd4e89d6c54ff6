use crate::github::{CommitRecord, ContributorStats};
use crate::model::{CacheKey, DataKind, Milestone};
use crate::page::carousel::{spawn_auto_advance, Carousel, AUTO_ADVANCE};
use crate::page::chart::{chart_series, ChartPoint};
use crate::page::feed::FeedEntry;
use crate::page::source::{load_json, DataSource};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Display state owned by one card. Starts empty and stays empty for
/// whatever fails to load.
#[derive(Debug, Clone, Default)]
pub struct CardState {
    pub commits: Vec<CommitRecord>,
    pub chart: Vec<ChartPoint>,
}

/// What a card shows at one instant.
#[derive(Debug, Clone)]
pub struct CardView {
    pub milestone: Milestone,
    pub feed: Vec<FeedEntry>,
    pub chart: Vec<ChartPoint>,
    pub carousel: Option<Carousel>,
}

/// A mounted milestone card. Its loads and carousel timer live as long as
/// the card: dropping it cancels them.
pub struct Card {
    milestone: Milestone,
    state: Arc<Mutex<CardState>>,
    carousel: Option<Arc<Mutex<Carousel>>>,
    token: CancellationToken,
    loads: Vec<JoinHandle<()>>,
    timer: Option<JoinHandle<()>>,
}

impl Card {
    /// Starts both loads. Must be called inside a tokio runtime.
    pub fn mount(milestone: Milestone, source: Arc<dyn DataSource>) -> Self {
        let token = CancellationToken::new();
        let state = Arc::new(Mutex::new(CardState::default()));

        let loads = vec![
            tokio::spawn(load(
                source.clone(),
                milestone.key(DataKind::Commits),
                state.clone(),
                token.clone(),
                |state: &mut CardState, commits: Vec<CommitRecord>| state.commits = commits,
            )),
            tokio::spawn(load(
                source,
                milestone.key(DataKind::Contribution),
                state.clone(),
                token.clone(),
                |state: &mut CardState, stats: Vec<ContributorStats>| {
                    state.chart = chart_series(&stats)
                },
            )),
        ];

        let carousel = Carousel::new(&milestone);
        let (carousel, timer) = if carousel.is_empty() {
            (None, None)
        } else {
            let carousel = Arc::new(Mutex::new(carousel));
            let timer = spawn_auto_advance(carousel.clone(), AUTO_ADVANCE, token.clone());
            (Some(carousel), Some(timer))
        };

        Self {
            milestone,
            state,
            carousel,
            token,
            loads,
            timer,
        }
    }

    /// Waits until both loads have finished, successfully or not.
    pub async fn settled(&mut self) {
        for load in self.loads.drain(..) {
            if let Err(e) = load.await {
                warn!(milestone = %self.milestone.slug(), error = %e, "Card load task ended abnormally");
            }
        }
    }

    pub async fn snapshot(&self) -> CardView {
        let carousel = match &self.carousel {
            Some(carousel) => Some(carousel.lock().await.clone()),
            None => None,
        };
        let state = self.state.lock().await;
        CardView {
            milestone: self.milestone.clone(),
            feed: state.commits.iter().map(FeedEntry::from).collect(),
            chart: state.chart.clone(),
            carousel,
        }
    }

    /// Cancels everything the card started and waits for it to stop.
    pub async fn unmount(mut self) {
        self.token.cancel();
        let tasks = self.loads.drain(..).chain(self.timer.take()).collect::<Vec<_>>();
        for task in tasks {
            let _ = task.await;
        }
    }

    #[cfg(test)]
    fn state(&self) -> Arc<Mutex<CardState>> {
        self.state.clone()
    }

    #[cfg(test)]
    fn carousel(&self) -> Option<Arc<Mutex<Carousel>>> {
        self.carousel.clone()
    }
}

impl Drop for Card {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

async fn load<T, F>(
    source: Arc<dyn DataSource>,
    key: CacheKey,
    state: Arc<Mutex<CardState>>,
    token: CancellationToken,
    apply: F,
) where
    T: DeserializeOwned + Send + 'static,
    F: FnOnce(&mut CardState, T) + Send + 'static,
{
    let location = source.location(&key);
    tokio::select! {
        _ = token.cancelled() => {
            debug!(%location, "Card unmounted before {} loaded", key.kind);
        }
        result = load_json::<T>(source.as_ref(), &key) => match result {
            Ok(value) => {
                let mut state = state.lock().await;
                if !token.is_cancelled() {
                    apply(&mut *state, value);
                }
            }
            Err(e) => warn!(%location, error = %e, "Failed to fetch {}", key.kind),
        },
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::{PortfolioError, Result};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use reqwest::StatusCode;
    use serde_json::json;
    use std::collections::HashMap;
    use std::time::Duration;
    use tokio::sync::Notify;

    /// Serves files from memory; anything else answers 404.
    #[derive(Default)]
    pub(crate) struct MemorySource {
        pub files: HashMap<String, Vec<u8>>,
        pub gate: Option<Arc<Notify>>,
    }

    impl MemorySource {
        pub fn with(mut self, key: CacheKey, body: serde_json::Value) -> Self {
            self.files.insert(key.data_path(), body.to_string().into_bytes());
            self
        }
    }

    #[async_trait]
    impl DataSource for MemorySource {
        fn location(&self, key: &CacheKey) -> String {
            key.data_path()
        }

        async fn load(&self, key: &CacheKey) -> Result<Vec<u8>> {
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.files
                .get(&key.data_path())
                .cloned()
                .ok_or_else(|| PortfolioError::Status(StatusCode::NOT_FOUND, "Not Found".into()))
        }
    }

    pub(crate) fn commits_json() -> serde_json::Value {
        json!([{
            "sha": "abc",
            "html_url": "https://github.com/octocat/demo/commit/abc",
            "author": { "login": "octocat", "avatar_url": "https://avatars.example/1" },
            "commit": {
                "message": "Add the landing page",
                "author": { "name": "Octo", "email": "octo@example.com", "date": "2024-03-01T10:00:00Z" }
            }
        }])
    }

    pub(crate) fn contribution_json() -> serde_json::Value {
        json!([{ "weeks": [{ "w": 1000, "a": 5, "d": 2 }] }])
    }

    fn demo() -> Milestone {
        Milestone::new("octocat", "demo", "main")
    }

    #[tokio::test]
    async fn loads_commits_and_chart() {
        let source = MemorySource::default()
            .with(demo().key(DataKind::Commits), commits_json())
            .with(demo().key(DataKind::Contribution), contribution_json());
        let mut card = Card::mount(demo(), Arc::new(source));

        card.settled().await;
        let view = card.snapshot().await;

        assert_eq!(view.feed.len(), 1);
        assert_eq!(view.feed[0].message, "Add the landing page");
        assert_eq!(view.chart.len(), 1);
        assert_eq!(view.chart[0].additions, 5);
        assert!(view.carousel.is_none());
    }

    #[tokio::test]
    async fn failed_commits_load_leaves_feed_empty() {
        let source = MemorySource::default()
            .with(demo().key(DataKind::Contribution), contribution_json());
        let mut card = Card::mount(demo(), Arc::new(source));

        card.settled().await;
        let view = card.snapshot().await;

        assert!(view.feed.is_empty());
        assert_eq!(view.chart.len(), 1);
    }

    #[tokio::test]
    async fn malformed_file_leaves_chart_empty() {
        let source = MemorySource::default()
            .with(demo().key(DataKind::Contribution), json!({ "not": "a list" }));
        let mut card = Card::mount(demo(), Arc::new(source));

        card.settled().await;
        assert!(card.snapshot().await.chart.is_empty());
    }

    #[tokio::test]
    async fn unmount_stops_pending_loads() {
        let gate = Arc::new(Notify::new());
        let source = MemorySource {
            gate: Some(gate.clone()),
            ..MemorySource::default()
        }
        .with(demo().key(DataKind::Commits), commits_json());
        let card = Card::mount(demo(), Arc::new(source));
        let state = card.state();

        card.unmount().await;
        gate.notify_waiters();
        tokio::task::yield_now().await;

        assert!(state.lock().await.commits.is_empty());
        assert_eq!(Arc::strong_count(&state), 1);
    }

    #[tokio::test]
    async fn images_mount_a_carousel() {
        let mut milestone = demo();
        milestone.image_links = vec!["images/a.png".into(), "images/b.png".into()];
        let mut card = Card::mount(milestone, Arc::new(MemorySource::default()));

        card.settled().await;
        let view = card.snapshot().await;

        let carousel = view.carousel.expect("carousel");
        assert_eq!(carousel.slides().len(), 2);
        assert_eq!(carousel.dots(), "●○");
        card.unmount().await;
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_a_card_stops_its_carousel() {
        let mut milestone = demo();
        milestone.image_links = vec![
            "images/a.png".into(),
            "images/b.png".into(),
            "images/c.png".into(),
        ];
        let card = Card::mount(milestone, Arc::new(MemorySource::default()));
        let carousel = card.carousel().expect("carousel");

        tokio::time::sleep(AUTO_ADVANCE + Duration::from_millis(100)).await;
        assert_eq!(carousel.lock().await.position(), 1);

        drop(card);
        tokio::time::sleep(AUTO_ADVANCE * 5).await;

        assert_eq!(carousel.lock().await.position(), 1);
        assert_eq!(Arc::strong_count(&carousel), 1);
    }
}
