use std::io::IsTerminal;
use chrono::Duration;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use crate::rank::ScoredListing;
use crate::scoring::Tier;
use crate::stats::{BrandPotential, ResaleStats};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Scores are shown with one decimal ("78.0", "45.5")
pub fn format_score(score: f64) -> String {
    format!("{:.1}", score)
}

/// "R$ 2800" for BRL, "USD 450" otherwise, "-" when unpriced
pub fn format_price(price: Option<f64>, currency: &str) -> String {
    match price {
        Some(p) if p > 0.0 => {
            let symbol = if currency.eq_ignore_ascii_case("BRL") { "R$" } else { currency };
            format!("{} {:.0}", symbol, p)
        }
        _ => "-".to_string(),
    }
}

fn colored_tier(tier: Tier, text: &str, use_colors: bool) -> String {
    if !use_colors {
        return text.to_string();
    }
    match tier {
        Tier::Excellent => text.green().bold().to_string(),
        Tier::Good => text.cyan().to_string(),
        Tier::Medium => text.yellow().to_string(),
        Tier::Low => text.red().to_string(),
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate title to fit available width, accounting for Unicode
fn truncate_title(title: &str, max_width: usize) -> String {
    let chars: Vec<char> = title.chars().collect();
    if chars.len() <= max_width {
        title.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format listings as a ranked table: index, score, tier marker, title, price, URL.
/// No headers. Index is 1-based so `show N` and `open N` line up with it.
pub fn format_scored_table(listings: &[&ScoredListing], use_colors: bool) -> String {
    if listings.is_empty() {
        return "No listings found.".to_string();
    }

    let term_width = get_terminal_width();

    // Index: 3 + 1, score: 5 + 1, marker: 3 + 2, price: 10 + 2
    let index_width = 3;
    let score_width = 5;
    let marker_width = 3;
    let price_width = 10;
    let separator = "  ";

    listings
        .iter()
        .enumerate()
        .map(|(idx, scored)| {
            let listing = &scored.listing;
            let tier = scored.score.classification;

            let index_str = format!("{:>2}.", idx + 1);
            let score_padded = format!("{:>width$}", format_score(scored.total()), width = score_width);
            let marker = format!("{:<width$}", tier.marker(), width = marker_width);
            let price = format!(
                "{:>width$}",
                format_price(listing.price, &listing.currency),
                width = price_width
            );
            let url = listing.post_url.clone().unwrap_or_default();

            let fixed_width = index_width
                + 1
                + score_width
                + 1
                + marker_width
                + separator.len() * 3
                + price_width
                + url.chars().count();

            let full_title = listing.title();
            let title = if let Some(width) = term_width {
                if width > fixed_width + 10 {
                    truncate_title(&full_title, width - fixed_width)
                } else {
                    // Very narrow terminal, show truncated
                    truncate_title(&full_title, 20)
                }
            } else {
                // No terminal (pipe), don't truncate
                full_title
            };

            if use_colors {
                format!(
                    "{} {} {}{}{}{}{}{}{}",
                    index_str.dimmed(),
                    score_padded.bold(),
                    colored_tier(tier, &marker, true),
                    separator,
                    title,
                    separator,
                    price,
                    separator,
                    url.underline()
                )
            } else {
                format!(
                    "{} {} {}{}{}{}{}{}{}",
                    index_str, score_padded, marker, separator, title, separator, price, separator, url
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format listings as tab-separated values for scripting
/// Columns: score, tier, brand, model, price, url (no headers, no colors)
pub fn format_tsv(listings: &[&ScoredListing]) -> String {
    listings
        .iter()
        .map(|scored| {
            let listing = &scored.listing;
            format!(
                "{}\t{:?}\t{}\t{}\t{}\t{}",
                format_score(scored.total()),
                scored.score.classification,
                listing.brand.as_deref().unwrap_or(""),
                listing.model.as_deref().unwrap_or(""),
                listing.price.map(|p| format!("{:.2}", p)).unwrap_or_default(),
                listing.post_url.as_deref().unwrap_or("")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Multi-line view of one listing with its factor breakdown
pub fn format_listing_detail(scored: &ScoredListing, use_colors: bool) -> String {
    let listing = &scored.listing;
    let score = &scored.score;
    let or_na = |v: Option<&str>| v.filter(|s| !s.trim().is_empty()).unwrap_or("N/A").to_string();

    let repair = if listing.has_repair {
        match listing.repair_description.as_deref() {
            Some(desc) if !desc.trim().is_empty() => format!("yes ({})", desc),
            _ => "yes".to_string(),
        }
    } else {
        "no".to_string()
    };

    let title = listing.title();
    let header = format!("{}/100  {}", format_score(score.total_score), score.classification.label());

    let mut lines = vec![
        if use_colors { title.bold().to_string() } else { title },
        format!("  Score: {}", colored_tier(score.classification, &header, use_colors)),
        format!("  Type: {} | Size: {}", listing.equipment_type.as_str(), or_na(listing.size.as_deref())),
        format!(
            "  Year: {} | Condition: {} | Repair: {}",
            listing.year.map(|y| y.to_string()).unwrap_or_else(|| "N/A".to_string()),
            listing.condition.as_str(),
            repair
        ),
        format!("  Price: {}", format_price(listing.price, &listing.currency)),
        format!("  Location: {}", listing.location().unwrap_or_else(|| "N/A".to_string())),
        format!("  Seller: {}", or_na(listing.seller_name.as_deref())),
        format!(
            "  Engagement: {} comments, {} likes",
            listing.comments_count, listing.likes_count
        ),
    ];

    if let Some(url) = listing.post_url.as_deref() {
        lines.push(format!(
            "  URL: {}",
            if use_colors { url.underline().to_string() } else { url.to_string() }
        ));
    }

    lines.push(String::new());
    lines.extend(score.breakdown.lines().map(|l| format!("  {}", l)));
    lines.push(String::new());
    lines.push(format!("  {}", score.recommendation));

    lines.join("\n")
}

/// Summary of the score distribution, prices, types and states
pub fn format_stats(stats: &ResaleStats) -> String {
    let pct = |n: usize| n as f64 / stats.count as f64 * 100.0;
    let mut lines = vec![
        format!("Listings: {} ({} with repair)", stats.count, stats.with_repair),
        format!(
            "Score: avg {} | min {} | max {}",
            format_score(stats.average),
            format_score(stats.min),
            format_score(stats.max)
        ),
        format!("  High (>=70):   {:>4} ({:>3.0}%)", stats.high, pct(stats.high)),
        format!("  Medium (50-70):{:>4} ({:>3.0}%)", stats.medium, pct(stats.medium)),
        format!("  Low (<50):     {:>4} ({:>3.0}%)", stats.low, pct(stats.low)),
    ];

    if let Some(prices) = &stats.prices {
        lines.push(format!(
            "Price: avg {} | median {} | min {} | max {}",
            format_price(Some(prices.average), "BRL"),
            format_price(Some(prices.median), "BRL"),
            format_price(Some(prices.min), "BRL"),
            format_price(Some(prices.max), "BRL")
        ));
    }

    lines.push("By type:".to_string());
    lines.extend(stats.by_equipment.iter().map(|e| {
        format!(
            "  {:<14}{:>4}  avg {}",
            e.equipment_type.as_str(),
            e.count,
            format_price(e.average_price, "BRL")
        )
    }));

    if !stats.by_state.is_empty() {
        lines.push("By state:".to_string());
        lines.extend(
            stats
                .by_state
                .iter()
                .map(|st| format!("  {:<14}{:>4}", st.state, st.count)),
        );
    }

    lines.join("\n")
}

/// Brand table: name, average score, average price, high-potential share, count
pub fn format_brand_table(brands: &[BrandPotential]) -> String {
    if brands.is_empty() {
        return "No branded listings.".to_string();
    }

    let mut lines = vec![format!(
        "{:<20} {:>9} {:>12} {:>14} {:>6}",
        "Brand", "Avg score", "Avg price", "High potential", "Total"
    )];
    lines.extend(brands.iter().map(|b| {
        format!(
            "{:<20} {:>9} {:>12} {:>6}/{:<2}({:>3.0}%) {:>6}",
            truncate_title(&b.brand, 18),
            format_score(b.average_score),
            format_price(b.average_price, "BRL"),
            b.high_potential,
            b.count,
            b.high_share(),
            b.count
        )
    }));
    lines.join("\n")
}

/// Format a duration into a human-readable age string
/// "2h" for hours, "3d" for days, "1w" for weeks
pub fn format_age(duration: Duration) -> String {
    let hours = duration.num_hours();
    let days = duration.num_days();
    let weeks = days / 7;

    if weeks >= 1 {
        format!("{}w", weeks)
    } else if days >= 1 {
        format!("{}d", days)
    } else if hours >= 1 {
        format!("{}h", hours)
    } else {
        let minutes = duration.num_minutes();
        if minutes >= 1 {
            format!("{}m", minutes)
        } else {
            "now".to_string()
        }
    }
}
