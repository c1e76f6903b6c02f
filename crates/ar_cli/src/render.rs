use std::fmt::Write;

use ar_core::{Article, ArticleStatus, FilterCriteria};
use ar_views::{DetailSnapshot, ListSnapshot};
use crossterm::style::Stylize;

fn list_label(status: ArticleStatus) -> &'static str {
    match status {
        ArticleStatus::Original => "Original",
        ArticleStatus::AiUpdated => "AI-Updated",
    }
}

fn detail_label(status: ArticleStatus) -> &'static str {
    match status {
        ArticleStatus::Original => "Original",
        ArticleStatus::AiUpdated => "AI-Generated",
    }
}

fn error_line(msg: &str, color: bool) -> String {
    if color {
        msg.red().to_string()
    } else {
        msg.to_string()
    }
}

fn heading(text: &str, color: bool) -> String {
    if color {
        text.bold().to_string()
    } else {
        text.to_string()
    }
}

fn describe_filter(filter: &FilterCriteria) -> String {
    let mut parts = Vec::new();
    if !filter.search_term.is_empty() {
        parts.push(format!("title contains {:?}", filter.search_term));
    }
    if let Some(status) = filter.status {
        parts.push(format!("status {}", list_label(status)));
    }
    parts.join(", ")
}

fn write_card(out: &mut String, index: usize, article: &Article, color: bool) {
    let _ = writeln!(out, "[{}] {}", index, heading(&article.title, color));
    if !article.excerpt.is_empty() {
        let _ = writeln!(out, "    {}", article.excerpt);
    }
    let _ = writeln!(out, "    Status: {}", list_label(article.status));
    let _ = writeln!(out, "    Publish Date: {}", article.published_date);
    if let Some(source) = &article.source {
        let _ = writeln!(out, "    Source: {}", source);
    }
    let _ = writeln!(out, "    Read more: /article/{}", article.id);
}

pub fn render_list(snapshot: &ListSnapshot<'_>, color: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", heading("Articles", color));
    if let Some(msg) = snapshot.state.error() {
        let _ = writeln!(out, "{}", error_line(msg, color));
    }
    if !snapshot.filter.is_empty() {
        let _ = writeln!(out, "Filter: {}", describe_filter(snapshot.filter));
    }
    let _ = writeln!(out);

    if snapshot.state.is_loading() {
        let _ = writeln!(out, "Loading...");
    } else if snapshot.articles.is_empty() {
        let _ = writeln!(out, "No articles.");
    } else {
        for (i, article) in snapshot.articles.iter().enumerate() {
            write_card(&mut out, i + 1, article, color);
        }
    }

    let mut footer = Vec::new();
    if snapshot.can_prev {
        footer.push("‹ Prev".to_string());
    }
    footer.push(format!("Page {} of {}", snapshot.page, snapshot.total_pages));
    if snapshot.can_next {
        footer.push("Next ›".to_string());
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", footer.join("  "));
    out
}

pub fn render_detail(snapshot: &DetailSnapshot<'_>, color: bool) -> String {
    let mut out = String::new();
    if let Some(msg) = snapshot.state.error() {
        let _ = writeln!(out, "{}", error_line(msg, color));
        return out;
    }
    let Some(article) = snapshot.article() else {
        let _ = writeln!(out, "Loading...");
        return out;
    };

    let _ = writeln!(out, "{}", heading(&article.title, color));
    let _ = writeln!(out, "Publish Date: {}", article.published_date);
    let _ = writeln!(out, "Type: {}", detail_label(article.status));
    let _ = writeln!(out, "Last Updated: {}", article.updated_at.date_naive());
    let _ = writeln!(out);
    for line in article.content.lines() {
        let _ = writeln!(out, "{}", line);
    }

    let references = article.references();
    if !references.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", heading("References", color));
        for reference in references {
            let _ = writeln!(out, "  - {}", reference);
        }
    }
    out
}
