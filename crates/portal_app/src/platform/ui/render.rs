use std::fmt::Write;

use portal_core::{
    Banner, BannerKind, BoardViewModel, FilterState, JobCardView, ListingStatus, TableStatus,
    TableViewModel, Toast, ToastKind, NO_APPLICATIONS_MESSAGE, NO_JOBS_MESSAGE,
};

pub const LOGIN_REQUIRED_NOTICE: &str = "[login] Your session is not valid. Please sign in.";

pub fn render_board(view: &BoardViewModel) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Jobs (sorted by {}){}",
        view.filters.sort,
        describe_filters(&view.filters)
    );
    if let Some(banner) = &view.banner {
        let _ = writeln!(out, "{}", render_banner(banner));
    }
    match &view.status {
        ListingStatus::Idle => {}
        ListingStatus::Loading => out.push_str("  Loading...\n"),
        ListingStatus::Empty => {
            let _ = writeln!(out, "  {NO_JOBS_MESSAGE}");
        }
        ListingStatus::Error(message) => {
            let _ = writeln!(out, "  {message}");
        }
        ListingStatus::Ready => {
            for (index, card) in view.cards.iter().enumerate() {
                out.push_str(&render_card(index + 1, card));
            }
        }
    }
    let _ = writeln!(out, "Applied to {} job(s).", view.applied_count);
    out
}

fn describe_filters(filters: &FilterState) -> String {
    let parts: Vec<String> = [
        ("keyword", &filters.keyword),
        ("type", &filters.job_type),
        ("location", &filters.location),
        ("salary", &filters.salary_range),
        ("experience", &filters.max_experience_range),
    ]
    .into_iter()
    .filter(|(_, value)| !value.trim().is_empty())
    .map(|(name, value)| format!("{name}={}", value.trim()))
    .collect();
    if parts.is_empty() {
        String::new()
    } else {
        format!(" filtered by {}", parts.join(", "))
    }
}

fn render_card(position: usize, card: &JobCardView) -> String {
    let mut out = String::new();
    let mut headline = format!("  {position}. {}", card.title);
    if !card.company.is_empty() {
        let _ = write!(headline, " - {}", card.company);
    }
    let place: Vec<&str> = [card.location.as_str(), card.job_type.as_str()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect();
    if !place.is_empty() {
        let _ = write!(headline, " ({})", place.join(", "));
    }
    let _ = writeln!(out, "{headline}");

    let mut details = vec![format!("id: {}", display_or_dash(&card.job_id))];
    if !card.salary.is_empty() {
        details.push(format!("salary: {}", card.salary));
    }
    if !card.posted_on.is_empty() {
        details.push(format!("posted: {}", card.posted_on));
    }
    if let Some(score) = card.match_score {
        details.push(format!("match: {score:.0}%"));
    }
    let _ = writeln!(out, "     {}", details.join(" | "));
    if !card.summary.is_empty() {
        let _ = writeln!(out, "     {}", card.summary);
    }
    if !card.skills.is_empty() {
        let _ = writeln!(out, "     skills: {}", card.skills.join(", "));
    }
    let _ = write!(out, "     [{}]", card.apply.label());
    if let Some(error) = &card.apply_error {
        let _ = write!(out, " {error}");
    }
    out.push('\n');
    out
}

pub fn render_table(view: &TableViewModel) -> String {
    let mut out = String::from("My applications");
    if view.refreshing {
        out.push_str(" (refreshing)");
    }
    out.push('\n');
    match &view.status {
        TableStatus::Loading => out.push_str("  Loading...\n"),
        TableStatus::Empty => {
            let _ = writeln!(out, "  {NO_APPLICATIONS_MESSAGE}");
        }
        TableStatus::Error(message) => {
            let _ = writeln!(out, "  {message}");
        }
        TableStatus::Ready => {
            for row in &view.rows {
                let applied_on = row
                    .applied_at
                    .map(|at| at.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "-".to_string());
                let mut line = format!(
                    "  {:<12} {:<10} {}",
                    display_or_dash(&row.status),
                    applied_on,
                    display_or_dash(&row.job_title)
                );
                if !row.company.is_empty() {
                    let _ = write!(line, " - {}", row.company);
                }
                if !row.job_id.is_empty() {
                    let _ = write!(line, " (job {})", row.job_id);
                }
                let _ = writeln!(out, "{line}");
            }
        }
    }
    out
}

pub fn render_banner(banner: &Banner) -> String {
    let tag = match banner.kind {
        BannerKind::Advisory => "notice",
        BannerKind::Error => "error",
    };
    format!("[{tag}] {}", banner.text)
}

pub fn render_toast(toast: &Toast) -> String {
    let tag = match toast.kind {
        ToastKind::Success => "ok",
        ToastKind::Info => "info",
        ToastKind::Error => "failed",
    };
    format!("[{tag}] {}", toast.text)
}

fn display_or_dash(text: &str) -> &str {
    if text.is_empty() {
        "-"
    } else {
        text
    }
}
