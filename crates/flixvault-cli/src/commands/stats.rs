use super::{titled_table, Session};
use crate::output::Output;
use color_eyre::Result;
use comfy_table::Cell;
use owo_colors::OwoColorize;
use watchlist_models::{Category, RatingBucket, StatisticsSnapshot};

/// Months shown in the human activity table
const RECENT_MONTHS: usize = 12;

pub async fn run_stats(session: &Session, output: &Output) -> Result<()> {
    let snapshot = session.service.stats_get(&session.identity).await?;

    if !output.is_human() {
        output.json(&serde_json::to_value(&snapshot)?);
        return Ok(());
    }
    if output.is_quiet() {
        return Ok(());
    }

    println!("\n{} {}", "Statistics for".bright_white(), session.identity.as_str().bright_cyan().bold());
    println!();
    for table in render(&snapshot) {
        println!("{}", table);
        println!();
    }
    Ok(())
}

fn render(snapshot: &StatisticsSnapshot) -> Vec<comfy_table::Table> {
    let overview = &snapshot.overview;
    let mut tables = Vec::new();

    let mut overview_table = titled_table("Overview");
    let rows: [(&str, String); 8] = [
        ("Total movies", overview.total_movies.to_string()),
        ("Watch time", format_minutes(overview.total_watch_time)),
        ("Average rating", format!("{:.1}", overview.average_rating)),
        ("Average runtime", format_minutes(overview.average_runtime)),
        ("Added this month", overview.movies_this_month.to_string()),
        ("Added this year", overview.movies_this_year.to_string()),
        ("Account age", format!("{} days", overview.account_age)),
        ("Rated movies", snapshot.distributions.rating_distribution.total().to_string()),
    ];
    for (label, value) in rows {
        overview_table.add_row(vec![Cell::new(label), Cell::new(value)]);
    }
    tables.push(overview_table);

    let mut list_table = titled_table("Lists");
    for category in Category::ALL {
        let count = snapshot
            .distributions
            .list_distribution
            .get(&category)
            .copied()
            .unwrap_or(0);
        list_table.add_row(vec![Cell::new(category.as_str()), Cell::new(count)]);
    }
    tables.push(list_table);

    let ratings = &snapshot.distributions.rating_distribution;
    if ratings.total() > 0 {
        let mut rating_table = titled_table("Ratings");
        for bucket in RatingBucket::ALL {
            rating_table.add_row(vec![Cell::new(bucket.label()), Cell::new(ratings.count(bucket))]);
        }
        tables.push(rating_table);
    }

    let top = &snapshot.top_stats;
    if !top.most_common_years.is_empty() {
        let mut years_table = titled_table("Most common years");
        for entry in &top.most_common_years {
            years_table.add_row(vec![Cell::new(entry.year), Cell::new(entry.count)]);
        }
        tables.push(years_table);

        let mut decades_table = titled_table("Decades");
        for entry in &top.most_common_decades {
            decades_table.add_row(vec![Cell::new(format!("{}s", entry.decade)), Cell::new(entry.count)]);
        }
        tables.push(decades_table);
    }

    let monthly = &snapshot.distributions.monthly_distribution;
    if !monthly.is_empty() {
        let mut monthly_table = titled_table("Recently added");
        for (month, count) in monthly.iter().rev().take(RECENT_MONTHS) {
            monthly_table.add_row(vec![Cell::new(month), Cell::new(count)]);
        }
        tables.push(monthly_table);
    }

    tables
}

fn format_minutes(minutes: u64) -> String {
    match (minutes / 60, minutes % 60) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}
