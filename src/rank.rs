use crate::listing::{EquipmentType, Listing};
use crate::scoring::{calculate_score, ResaleScore};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;
use std::time::Duration;
use tracing::debug;

/// A listing with its resale score.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredListing {
    pub listing: Listing,
    pub score: ResaleScore,
}

impl ScoredListing {
    pub fn total(&self) -> f64 {
        self.score.total_score
    }
}

/// Score every listing and sort by total score descending.
///
/// Ties go to the cheaper listing (unpriced ones last), then to the lower
/// post id, so the order is stable across runs.
pub fn score_listings(listings: Vec<Listing>) -> Vec<ScoredListing> {
    let mut scored: Vec<_> = listings
        .into_iter()
        .map(|listing| {
            let score = calculate_score(&listing.score_input());
            ScoredListing { listing, score }
        })
        .collect();

    scored.sort_by(compare_ranked);
    debug!(count = scored.len(), "scored listings");
    scored
}

fn compare_ranked(a: &ScoredListing, b: &ScoredListing) -> Ordering {
    // Primary: score descending
    let score_cmp = b.total().partial_cmp(&a.total()).unwrap_or(Ordering::Equal);
    if score_cmp != Ordering::Equal {
        return score_cmp;
    }

    let price_cmp = match (a.listing.price, b.listing.price) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    if price_cmp != Ordering::Equal {
        return price_cmp;
    }

    a.listing.post_id.cmp(&b.listing.post_id)
}

/// Keep listings scoring at least `min_score`. Input order is preserved.
pub fn filter_min_score(scored: Vec<ScoredListing>, min_score: f64) -> Vec<ScoredListing> {
    scored
        .into_iter()
        .filter(|s| s.total() >= min_score)
        .collect()
}

/// High-scoring listings at an affordable price. Unpriced listings never qualify.
pub fn hot_deals(
    scored: &[ScoredListing],
    min_score: f64,
    max_price: f64,
    limit: usize,
) -> Vec<&ScoredListing> {
    scored
        .iter()
        .filter(|s| s.total() >= min_score)
        .filter(|s| matches!(s.listing.price, Some(p) if p <= max_price))
        .take(limit)
        .collect()
}

/// Attribute predicates for `search`. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct ListingFilter {
    pub equipment_type: Option<EquipmentType>,
    /// Case-insensitive substring of the brand.
    pub brand: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Two-letter state code, compared case-insensitively.
    pub state: Option<String>,
    pub has_repair: Option<bool>,
    pub min_score: Option<f64>,
}

impl ListingFilter {
    pub fn matches(&self, scored: &ScoredListing) -> bool {
        let listing = &scored.listing;

        if let Some(kind) = self.equipment_type {
            if listing.equipment_type != kind {
                return false;
            }
        }

        if let Some(needle) = self.brand.as_deref().map(str::trim).filter(|b| !b.is_empty()) {
            let needle = needle.to_lowercase();
            match listing.brand.as_deref() {
                Some(brand) if brand.to_lowercase().contains(&needle) => {}
                _ => return false,
            }
        }

        // A price bound excludes unpriced listings
        if self.min_price.is_some() || self.max_price.is_some() {
            let Some(price) = listing.price else {
                return false;
            };
            if self.min_price.is_some_and(|min| price < min) {
                return false;
            }
            if self.max_price.is_some_and(|max| price > max) {
                return false;
            }
        }

        if let Some(state) = self.state.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            match listing.state.as_deref() {
                Some(own) if own.trim().eq_ignore_ascii_case(state) => {}
                _ => return false,
            }
        }

        if let Some(repair) = self.has_repair {
            if listing.has_repair != repair {
                return false;
            }
        }

        self.min_score.map_or(true, |min| scored.total() >= min)
    }
}

/// Listings matching every set predicate, in ranking order, capped at `limit`.
pub fn search<'a>(
    scored: &'a [ScoredListing],
    filter: &ListingFilter,
    limit: usize,
) -> Vec<&'a ScoredListing> {
    let found: Vec<_> = scored
        .iter()
        .filter(|s| filter.matches(s))
        .take(limit)
        .collect();
    debug!(?filter, matched = found.len(), "searched listings");
    found
}

/// Listings analyzed within `window` of `now` that score at least `min_score`.
/// Listings without an analysis timestamp are excluded.
pub fn recent_opportunities(
    scored: &[ScoredListing],
    now: DateTime<Utc>,
    window: Duration,
    min_score: f64,
    limit: usize,
) -> Vec<&ScoredListing> {
    let window = chrono::Duration::from_std(window).unwrap_or(chrono::Duration::MAX);
    let cutoff = now.checked_sub_signed(window).unwrap_or(DateTime::<Utc>::MIN_UTC);

    scored
        .iter()
        .filter(|s| s.total() >= min_score)
        .filter(|s| matches!(s.listing.analyzed_at, Some(at) if at >= cutoff))
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::Condition;
    use chrono::Duration as ChronoDuration;

    fn listing(id: &str, brand: &str, price: Option<f64>) -> Listing {
        serde_json::from_value(serde_json::json!({
            "post_id": id,
            "brand": brand,
            "price": price,
            "equipment_type": "kite",
            "condition": "seminovo",
            "year": 2023,
        }))
        .unwrap()
    }

    #[test]
    fn test_sorted_by_score_descending() {
        let scored = score_listings(vec![
            listing("low", "", None),
            listing("high", "Duotone", Some(2500.0)),
            listing("mid", "Naish", Some(5000.0)),
        ]);
        let ids: Vec<&str> = scored.iter().map(|s| s.listing.post_id.as_str()).collect();
        assert_eq!(ids, vec!["high", "mid", "low"]);
        assert!(scored[0].total() >= scored[1].total());
        assert_eq!(scored[0].listing.equipment_type, EquipmentType::Kite);
        assert_eq!(scored[0].listing.condition, Condition::LikeNew);
    }

    #[test]
    fn test_ties_prefer_cheaper_then_id() {
        // Same price bucket, same score; cheaper first
        let scored = score_listings(vec![
            listing("b", "Core", Some(2700.0)),
            listing("a", "Core", Some(2800.0)),
            listing("c", "Core", Some(2700.0)),
        ]);
        let ids: Vec<&str> = scored.iter().map(|s| s.listing.post_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_filter_min_score() {
        let scored = score_listings(vec![
            listing("high", "Duotone", Some(2500.0)),
            listing("low", "", None),
        ]);
        let kept = filter_min_score(scored, 50.0);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].listing.post_id, "high");
    }

    #[test]
    fn test_hot_deals_requires_price_under_cap() {
        let mut cheap = listing("cheap", "Duotone", Some(2500.0));
        cheap.comments = vec!["quanto?".to_string(), "zap?".to_string(), "compro".to_string()];
        cheap.comments_count = 30;
        let mut unpriced = listing("unpriced", "Duotone", None);
        unpriced.comments_count = 30;

        let scored = score_listings(vec![cheap, unpriced]);
        let deals = hot_deals(&scored, 75.0, 6000.0, 10);
        assert_eq!(deals.len(), 1);
        assert_eq!(deals[0].listing.post_id, "cheap");

        assert!(hot_deals(&scored, 75.0, 1000.0, 10).is_empty());
        assert!(hot_deals(&scored, 75.0, 6000.0, 0).is_empty());
    }

    #[test]
    fn test_recent_opportunities_window() {
        let now = Utc::now();
        let mut fresh = listing("fresh", "Duotone", Some(2500.0));
        fresh.analyzed_at = Some(now - ChronoDuration::hours(2));
        let mut stale = listing("stale", "Duotone", Some(2500.0));
        stale.analyzed_at = Some(now - ChronoDuration::hours(72));
        let undated = listing("undated", "Duotone", Some(2500.0));

        let scored = score_listings(vec![fresh, stale, undated]);
        let recent = recent_opportunities(&scored, now, Duration::from_secs(48 * 3600), 65.0, 10);
        let ids: Vec<&str> = recent.iter().map(|s| s.listing.post_id.as_str()).collect();
        assert_eq!(ids, vec!["fresh"]);
    }

    fn search_ids(scored: &[ScoredListing], filter: &ListingFilter) -> Vec<String> {
        let mut ids: Vec<String> = search(scored, filter, 100)
            .iter()
            .map(|s| s.listing.post_id.clone())
            .collect();
        ids.sort();
        ids
    }

    fn search_fixture() -> Vec<ScoredListing> {
        let mut board = listing("board", "Core", Some(1800.0));
        board.equipment_type = EquipmentType::Board;
        board.state = Some("RN".to_string());
        let mut repaired = listing("repaired", "North Kiteboarding", Some(3200.0));
        repaired.has_repair = true;
        repaired.state = Some("ce".to_string());
        let mut duotone = listing("duotone", "Duotone", Some(5500.0));
        duotone.state = Some("CE".to_string());
        let unbranded = listing("unbranded", "", None);
        score_listings(vec![board, repaired, duotone, unbranded])
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let scored = search_fixture();
        assert_eq!(search(&scored, &ListingFilter::default(), 100).len(), 4);
    }

    #[test]
    fn test_search_by_equipment_type() {
        let filter = ListingFilter {
            equipment_type: Some(EquipmentType::Board),
            ..Default::default()
        };
        assert_eq!(search_ids(&search_fixture(), &filter), vec!["board"]);
    }

    #[test]
    fn test_search_brand_is_case_insensitive_substring() {
        let filter = ListingFilter {
            brand: Some("NORTH".to_string()),
            ..Default::default()
        };
        assert_eq!(search_ids(&search_fixture(), &filter), vec!["repaired"]);

        let filter = ListingFilter {
            brand: Some("o".to_string()),
            ..Default::default()
        };
        assert_eq!(
            search_ids(&search_fixture(), &filter),
            vec!["board", "duotone", "repaired"]
        );
    }

    #[test]
    fn test_search_price_range_is_inclusive_and_skips_unpriced() {
        let filter = ListingFilter {
            min_price: Some(1800.0),
            max_price: Some(3200.0),
            ..Default::default()
        };
        assert_eq!(search_ids(&search_fixture(), &filter), vec!["board", "repaired"]);

        let filter = ListingFilter {
            min_price: Some(5000.0),
            ..Default::default()
        };
        assert_eq!(search_ids(&search_fixture(), &filter), vec!["duotone"]);
    }

    #[test]
    fn test_search_state_ignores_case() {
        let filter = ListingFilter {
            state: Some("ce".to_string()),
            ..Default::default()
        };
        assert_eq!(search_ids(&search_fixture(), &filter), vec!["duotone", "repaired"]);
    }

    #[test]
    fn test_search_by_repair_flag() {
        let repaired_only = ListingFilter {
            has_repair: Some(true),
            ..Default::default()
        };
        assert_eq!(search_ids(&search_fixture(), &repaired_only), vec!["repaired"]);

        let intact_only = ListingFilter {
            has_repair: Some(false),
            ..Default::default()
        };
        assert_eq!(search_ids(&search_fixture(), &intact_only).len(), 3);
    }

    #[test]
    fn test_search_min_score_and_limit() {
        let scored = search_fixture();
        let filter = ListingFilter {
            min_score: Some(50.0),
            ..Default::default()
        };
        let found = search(&scored, &filter, 100);
        assert!(found.iter().all(|s| s.total() >= 50.0));
        assert!(found.iter().all(|s| s.listing.post_id != "unbranded"));

        let capped = search(&scored, &ListingFilter::default(), 2);
        let ids: Vec<&str> = capped.iter().map(|s| s.listing.post_id.as_str()).collect();
        assert_eq!(ids, vec![scored[0].listing.post_id.as_str(), scored[1].listing.post_id.as_str()]);
    }
}
