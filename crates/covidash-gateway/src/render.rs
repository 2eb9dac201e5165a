use covidash_core::{Article, CovidSnapshot, NotificationDescriptor};

static INDEX_HTML: &str = include_str!("../static/index.html");

pub const PAGE_TITLE: &str = "Covid Dashboard";

/// Everything the page shows, borrowed from the locked dashboard state.
pub struct PageView<'a> {
    pub location: &'a str,
    pub nation: &'a str,
    pub snapshot: &'a CovidSnapshot,
    pub articles: &'a [Article],
    pub updates: &'a [NotificationDescriptor],
}

/// Fill the embedded template. All user and provider text is escaped.
pub fn render_page(view: &PageView<'_>) -> String {
    let s = view.snapshot;
    let slots: [(&str, String); 11] = [
        ("title", escape_html(PAGE_TITLE)),
        ("location", escape_html(view.location)),
        ("nation_location", escape_html(view.nation)),
        ("local_7day_infections", s.local.cases_7_day.to_string()),
        ("local_hospital_cases", s.local.hospital_cases.to_string()),
        ("local_deaths_total", s.local.cumulative_deaths.to_string()),
        ("national_7day_infections", s.national.cases_7_day.to_string()),
        ("hospital_cases", s.national.hospital_cases.to_string()),
        ("deaths_total", s.national.cumulative_deaths.to_string()),
        ("updates", render_updates(view.updates)),
        ("news_articles", render_articles(view.articles)),
    ];

    let mut page = INDEX_HTML.to_string();
    for (key, value) in &slots {
        page = page.replace(&format!("{{{{{key}}}}}"), value);
    }
    page
}

fn render_updates(updates: &[NotificationDescriptor]) -> String {
    if updates.is_empty() {
        return "<p>No updates scheduled.</p>".to_string();
    }
    updates
        .iter()
        .map(|u| {
            format!(
                "<div class=\"toast\"><a class=\"dismiss\" href=\"/index?update_item={}\">&times;</a><h3>{}</h3><p>{}</p></div>",
                urlencoding::encode(&u.title),
                escape_html(&u.title),
                escape_html(&u.content),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_articles(articles: &[Article]) -> String {
    if articles.is_empty() {
        return "<p>No articles.</p>".to_string();
    }
    articles
        .iter()
        .map(|a| {
            let heading = match a.url.as_deref() {
                Some(url) if url.starts_with("http://") || url.starts_with("https://") => format!(
                    "<a href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a>",
                    escape_html(url),
                    escape_html(&a.title)
                ),
                _ => escape_html(&a.title),
            };
            format!(
                "<div class=\"article\"><a class=\"dismiss\" href=\"/index?notif={}\">&times;</a><h3>{}</h3><p>{}</p></div>",
                urlencoding::encode(&a.title),
                heading,
                escape_html(a.description.as_deref().unwrap_or_default()),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            // keeps inserted text from forming template slots
            '{' => out.push_str("&#123;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use covidash_core::AreaStatistics;

    fn snapshot() -> CovidSnapshot {
        CovidSnapshot {
            local: AreaStatistics {
                cases_7_day: 70,
                hospital_cases: 3,
                cumulative_deaths: 210,
            },
            national: AreaStatistics {
                cases_7_day: 240_299,
                hospital_cases: 7_019,
                cumulative_deaths: 141_544,
            },
        }
    }

    #[test]
    fn fills_every_placeholder() {
        let snap = snapshot();
        let page = render_page(&PageView {
            location: "Exeter",
            nation: "England",
            snapshot: &snap,
            articles: &[],
            updates: &[],
        });
        assert!(!page.contains("{{"), "unfilled placeholder left in page");
        assert!(page.contains("<h2>Exeter</h2>"));
        assert!(page.contains("<strong>240299</strong>"));
        assert!(page.contains("Total deaths: 141544"));
        assert!(page.contains("No updates scheduled."));
    }

    #[test]
    fn toasts_and_articles_link_back_with_encoded_names() {
        let snap = snapshot();
        let updates = [NotificationDescriptor::for_update("morning run", "9:30", true, false, true)];
        let mut article = Article::new("Jabs & boosters");
        article.url = Some("https://example.com/a".to_string());
        let page = render_page(&PageView {
            location: "Exeter",
            nation: "England",
            snapshot: &snap,
            articles: &[article],
            updates: &updates,
        });
        assert!(page.contains("href=\"/index?update_item=morning%20run\""));
        assert!(page.contains("REPEATING: Updating covid at 9:30"));
        assert!(page.contains("href=\"/index?notif=Jabs%20%26%20boosters\""));
        assert!(page.contains(">Jabs &amp; boosters</a>"));
    }

    #[test]
    fn provider_text_is_escaped() {
        assert_eq!(
            escape_html("<script>alert('x')</script>"),
            "&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"
        );
        let snap = CovidSnapshot::default();
        let mut article = Article::new("<b>bold</b>");
        article.url = Some("javascript:alert(1)".to_string());
        let page = render_page(&PageView {
            location: "X",
            nation: "Y",
            snapshot: &snap,
            articles: &[article],
            updates: &[],
        });
        assert!(page.contains("&lt;b&gt;bold&lt;/b&gt;"));
        assert!(!page.contains("javascript:"));
    }
}
