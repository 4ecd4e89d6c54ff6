pub mod card;
pub mod carousel;
pub mod chart;
pub mod feed;
pub mod source;

pub use card::{Card, CardView};
pub use source::{DataSource, StaticDir, StaticHttp};

use crate::model::Milestone;
use futures::future;
use itertools::Itertools;
use std::sync::Arc;
use tracing::info;

/// All cards of the page, one per config entry, in config order.
pub struct Page {
    cards: Vec<Card>,
}

impl Page {
    pub fn mount(milestones: &[Milestone], source: Arc<dyn DataSource>) -> Self {
        for (slug, count) in milestones.iter().map(Milestone::slug).counts() {
            if count > 1 {
                info!(milestone = %slug, count, "Milestone listed more than once, cards share data files");
            }
        }
        let cards = milestones
            .iter()
            .map(|milestone| Card::mount(milestone.clone(), source.clone()))
            .collect();
        Self { cards }
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub async fn settled(&mut self) {
        future::join_all(self.cards.iter_mut().map(|card| card.settled())).await;
    }

    pub async fn snapshot(&self) -> Vec<CardView> {
        future::join_all(self.cards.iter().map(|card| card.snapshot())).await
    }

    pub async fn unmount(self) {
        future::join_all(self.cards.into_iter().map(Card::unmount)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DataKind;
    use crate::page::card::tests::{commits_json, contribution_json, MemorySource};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn cards_keep_config_order_and_load_independently() {
        let mut again = Milestone::new("octocat", "zeta", "main");
        again.title = "Zeta, second look".to_string();
        let milestones = vec![
            Milestone::new("octocat", "zeta", "main"),
            Milestone::new("octocat", "alpha", "main"),
            again,
        ];
        let source = MemorySource::default()
            .with(milestones[0].key(DataKind::Commits), commits_json())
            .with(milestones[1].key(DataKind::Contribution), contribution_json());

        let mut page = Page::mount(&milestones, Arc::new(source));
        assert!(!page.is_empty());

        page.settled().await;
        let views = page.snapshot().await;

        assert_eq!(
            views.iter().map(|v| v.milestone.repo.as_str()).collect::<Vec<_>>(),
            vec!["zeta", "alpha", "zeta"]
        );
        assert_eq!((views[0].feed.len(), views[0].chart.len()), (1, 0));
        assert_eq!((views[1].feed.len(), views[1].chart.len()), (0, 1));
        assert_eq!(views[2].milestone.title, "Zeta, second look");
        assert_eq!(views[2].feed.len(), 1);
        page.unmount().await;
    }
}
