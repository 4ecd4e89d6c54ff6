use crate::model::{PortfolioError, Result};
use crate::page::carousel::Carousel;
use crate::page::chart::ChartPoint;
use crate::page::feed::FeedEntry;
use crate::page::CardView;
use itertools::Itertools;
use markdown_builder::Markdown;
use markdown_table::{Heading, HeadingAlignment, MarkdownTable};
use std::fs;
use std::path::Path;

const BAR_WIDTH: u64 = 20;
const NO_DATA: &str = "*No data*";

pub trait MarkdownReport {
    fn report_render(&self, title: &str) -> Result<String>;

    fn report_create(&self, title: &str, path: &Path) -> Result<()> {
        let doc = self.report_render(title)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, doc)?;
        Ok(())
    }
}

impl MarkdownReport for [CardView] {
    fn report_render(&self, title: &str) -> Result<String> {
        let mut doc = Document::default();
        doc.header(title, 1);
        for view in self {
            doc.add_card(view)?;
        }
        Ok(doc.render())
    }
}

/// Blocks separated by blank lines. `Markdown::paragraph` wraps at 80
/// columns, so only prose goes through it; tables and link lists are kept
/// verbatim.
#[derive(Debug, Default)]
struct Document {
    blocks: Vec<String>,
}

impl Document {
    fn header(&mut self, text: &str, level: usize) {
        let mut md = Markdown::new();
        match level {
            1 => md.header1(text),
            _ => md.header2(text),
        };
        self.verbatim(md.render());
    }

    fn prose(&mut self, text: &str) {
        let mut md = Markdown::new();
        md.paragraph(text);
        self.verbatim(md.render());
    }

    fn verbatim(&mut self, block: String) {
        let block = block.trim_matches('\n');
        if !block.is_empty() {
            self.blocks.push(block.to_string());
        }
    }

    fn render(&self) -> String {
        format!("{}\n", self.blocks.join("\n\n"))
    }
}

trait MarkdownExt {
    fn add_card(&mut self, view: &CardView) -> Result<()>;
    fn add_carousel(&mut self, carousel: &Carousel);
    fn add_chart(&mut self, chart: &[ChartPoint]) -> Result<()>;
    fn add_feed(&mut self, feed: &[FeedEntry]);
}

impl MarkdownExt for Document {
    fn add_card(&mut self, view: &CardView) -> Result<()> {
        let milestone = &view.milestone;
        let title = if milestone.title.is_empty() {
            milestone.slug()
        } else {
            milestone.title.clone()
        };
        self.header(&title, 2);
        if !milestone.subtitle.is_empty() {
            self.prose(&format!("*{}*", milestone.subtitle));
        }
        if !milestone.description.is_empty() {
            self.prose(&milestone.description);
        }

        match &view.carousel {
            Some(carousel) => self.add_carousel(carousel),
            None => self.add_chart(&view.chart)?,
        }
        self.add_feed(&view.feed);
        Ok(())
    }

    fn add_carousel(&mut self, carousel: &Carousel) {
        if let Some(slide) = carousel.current() {
            self.verbatim(format!("![{}]({})", escape(&slide.alt), slide.src));
        }
        self.verbatim(carousel.dots());
    }

    fn add_chart(&mut self, chart: &[ChartPoint]) -> Result<()> {
        if chart.is_empty() {
            self.verbatim(NO_DATA.to_string());
            return Ok(());
        }

        let max = chart
            .iter()
            .map(|p| p.additions.max(p.deletions))
            .max()
            .unwrap_or(0)
            .max(1);
        let bar = |value: u64, glyph: &str| glyph.repeat((value * BAR_WIDTH / max) as usize);

        let header = vec![
            Heading::new("Week".to_string(), None),
            Heading::new("Additions".to_string(), Some(HeadingAlignment::Center)),
            Heading::new("Deletions".to_string(), Some(HeadingAlignment::Center)),
            Heading::new("".to_string(), None),
        ];
        let table = chart
            .iter()
            .map(|point| {
                vec![
                    point.label.clone(),
                    format!("+{}", point.additions),
                    format!("-{}", point.deletions),
                    format!(
                        "`{}` `{}`",
                        bar(point.additions, "+"),
                        bar(point.deletions, "-")
                    ),
                ]
            })
            .collect::<Vec<_>>();

        let mut md_table = MarkdownTable::new(table);
        md_table.with_headings(header);
        let rendered = md_table
            .as_markdown()
            .map_err(|_| PortfolioError::Render("contribution table".to_string()))?;
        self.verbatim(rendered);
        Ok(())
    }

    fn add_feed(&mut self, feed: &[FeedEntry]) {
        self.verbatim("**Commits**".to_string());
        if feed.is_empty() {
            self.verbatim(NO_DATA.to_string());
            return;
        }
        let lines = feed
            .iter()
            .map(|entry| {
                format!(
                    "- ![{}]({} =32x) [{}]({}) *{}* {}",
                    escape(&entry.author_name),
                    entry.avatar_url,
                    escape(&entry.message.split_whitespace().join(" ")),
                    entry.link,
                    entry.author_name,
                    entry.date,
                )
            })
            .join("\n");
        self.verbatim(lines);
    }
}

fn escape(text: &str) -> String {
    text.replace('[', "\\[").replace(']', "\\]")
}
