use super::types::Listing;
use anyhow::{bail, Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Expand input paths and glob patterns into concrete files, in pattern order.
///
/// A pattern that matches nothing is an error so typos don't silently
/// produce an empty ranking.
pub fn expand_inputs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut seen = HashSet::new();

    for pattern in patterns {
        let expanded = expand_home(pattern);
        let mut matched = false;
        for entry in glob::glob(&expanded)
            .with_context(|| format!("Invalid input pattern '{}'", pattern))?
        {
            let path = entry.with_context(|| format!("Failed to read match for '{}'", pattern))?;
            if path.is_file() {
                matched = true;
                if seen.insert(path.clone()) {
                    files.push(path);
                }
            }
        }
        if !matched {
            bail!("No input files match '{}'", pattern);
        }
    }

    Ok(files)
}

fn expand_home(pattern: &str) -> String {
    if let Some(rest) = pattern.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest).to_string_lossy().into_owned();
        }
    }
    pattern.to_string()
}

/// Parse one file: either a JSON array of listings or JSON lines.
pub fn parse_listings(content: &str, path: &Path) -> Result<Vec<Listing>> {
    let trimmed = content.trim_start();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed)
            .with_context(|| format!("Failed to parse listing array in {}", path.display()));
    }

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).with_context(|| {
                format!("Failed to parse listing at {}:{}", path.display(), i + 1)
            })
        })
        .collect()
}

/// Load every advertisement from the given inputs.
///
/// Posts the extraction layer marked as non-advertisements are skipped and
/// duplicate post ids keep their first occurrence.
pub fn load_listings(patterns: &[String]) -> Result<Vec<Listing>> {
    let files = expand_inputs(patterns)?;
    let mut listings = Vec::new();
    let mut seen_ids = HashSet::new();
    let mut skipped = 0usize;
    let mut duplicates = 0usize;

    for path in &files {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file at {}", path.display()))?;
        let parsed = parse_listings(&content, path)?;
        debug!(file = %path.display(), records = parsed.len(), "parsed input file");

        for listing in parsed {
            if !listing.is_advertisement {
                skipped += 1;
                continue;
            }
            if !seen_ids.insert(listing.post_id.clone()) {
                duplicates += 1;
                continue;
            }
            listings.push(listing);
        }
    }

    if duplicates > 0 {
        warn!(duplicates, "dropped listings with repeated post ids");
    }
    debug!(
        files = files.len(),
        listings = listings.len(),
        skipped,
        "loaded listings"
    );

    Ok(listings)
}
