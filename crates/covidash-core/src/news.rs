use tracing::info;

use crate::types::Article;

/// Articles currently shown plus the ones the user dismissed.
///
/// The dismissed list lives for the process lifetime and filters every
/// subsequent refresh, so a dismissed story never comes back.
#[derive(Debug, Default)]
pub struct NewsFeed {
    articles: Vec<Article>,
    dismissed: Vec<Article>,
}

impl NewsFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn dismissed(&self) -> &[Article] {
        &self.dismissed
    }

    /// Swap in a fresh article list, dropping anything previously dismissed.
    pub fn replace(&mut self, fresh: Vec<Article>) {
        let before = fresh.len();
        self.articles = fresh
            .into_iter()
            .filter(|a| !self.is_dismissed(a))
            .collect();
        let hidden = before - self.articles.len();
        if hidden > 0 {
            info!(hidden, "filtered previously dismissed articles");
        }
    }

    /// Move every shown article titled `title` into the dismissed list.
    ///
    /// Returns `true` when something was removed.
    pub fn dismiss(&mut self, title: &str) -> bool {
        let (gone, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.articles)
            .into_iter()
            .partition(|a| a.title == title);
        self.articles = kept;
        if gone.is_empty() {
            return false;
        }
        for article in gone {
            info!(title = %article.title, "article dismissed");
            self.dismissed.push(article);
        }
        true
    }

    fn is_dismissed(&self, article: &Article) -> bool {
        self.dismissed.iter().any(|d| d.title == article.title)
    }
}
