use crate::model::Milestone;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

pub const AUTO_ADVANCE: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    pub src: String,
    pub alt: String,
}

/// Looping image carousel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Carousel {
    slides: Vec<Slide>,
    current: usize,
}

impl Carousel {
    pub fn new(milestone: &Milestone) -> Self {
        let slides = milestone
            .image_links
            .iter()
            .enumerate()
            .map(|(index, src)| Slide {
                src: src.clone(),
                alt: milestone.image_descriptions.get(index).cloned().unwrap_or_default(),
            })
            .collect();
        Self { slides, current: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    #[cfg(test)]
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn current(&self) -> Option<&Slide> {
        self.slides.get(self.current)
    }

    #[cfg(test)]
    pub fn position(&self) -> usize {
        self.current
    }

    pub fn advance(&mut self) {
        if !self.slides.is_empty() {
            self.current = (self.current + 1) % self.slides.len();
        }
    }

    /// Dot indicator, the filled dot marks the current slide.
    pub fn dots(&self) -> String {
        (0..self.slides.len())
            .map(|index| if index == self.current { '●' } else { '○' })
            .collect()
    }
}

/// Advances `carousel` every `period` until `token` is cancelled.
pub fn spawn_auto_advance(
    carousel: Arc<Mutex<Carousel>>,
    period: Duration,
    token: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = ticker.tick() => carousel.lock().await.advance(),
            }
        }
    })
}
