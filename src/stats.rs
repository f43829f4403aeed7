use crate::listing::{EquipmentType, Listing};
use crate::rank::ScoredListing;
use serde::Serialize;
use std::collections::HashMap;

/// Score at or above which a listing counts as high potential.
pub const HIGH_POTENTIAL: f64 = 70.0;

/// Score below which a listing counts as low potential.
pub const LOW_POTENTIAL: f64 = 50.0;

/// Distribution of resale scores over a set of listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResaleStats {
    pub count: usize,
    pub average: f64,
    pub min: f64,
    pub max: f64,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub with_repair: usize,
    /// None when no listing has a price.
    pub prices: Option<PriceStats>,
    pub by_equipment: Vec<EquipmentSummary>,
    pub by_state: Vec<StateCount>,
}

/// Asking-price summary over priced listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceStats {
    pub average: f64,
    /// Upper middle element of the sorted prices.
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

impl PriceStats {
    pub fn from_prices(mut prices: Vec<f64>) -> Option<Self> {
        if prices.is_empty() {
            return None;
        }
        prices.sort_by(f64::total_cmp);
        let sum: f64 = prices.iter().sum();
        Some(Self {
            average: sum / prices.len() as f64,
            median: prices[prices.len() / 2],
            min: prices[0],
            max: prices[prices.len() - 1],
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquipmentSummary {
    pub equipment_type: EquipmentType,
    pub count: usize,
    pub average_price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateCount {
    pub state: String,
    pub count: usize,
}

fn positive_price(listing: &Listing) -> Option<f64> {
    listing.price.filter(|p| p.is_finite() && *p > 0.0)
}

impl ResaleStats {
    /// Returns None for an empty set.
    pub fn from_scored(scored: &[ScoredListing]) -> Option<Self> {
        if scored.is_empty() {
            return None;
        }

        let totals: Vec<f64> = scored.iter().map(|s| s.total()).collect();
        let sum: f64 = totals.iter().sum();

        Some(Self {
            count: totals.len(),
            average: sum / totals.len() as f64,
            min: totals.iter().copied().fold(f64::INFINITY, f64::min),
            max: totals.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            high: totals.iter().filter(|t| **t >= HIGH_POTENTIAL).count(),
            medium: totals
                .iter()
                .filter(|t| **t >= LOW_POTENTIAL && **t < HIGH_POTENTIAL)
                .count(),
            low: totals.iter().filter(|t| **t < LOW_POTENTIAL).count(),
            with_repair: scored.iter().filter(|s| s.listing.has_repair).count(),
            prices: PriceStats::from_prices(
                scored.iter().filter_map(|s| positive_price(&s.listing)).collect(),
            ),
            by_equipment: equipment_summary(scored),
            by_state: state_counts(scored),
        })
    }
}

/// Count and average price per equipment type, most common first.
pub fn equipment_summary(scored: &[ScoredListing]) -> Vec<EquipmentSummary> {
    let mut groups: HashMap<EquipmentType, (usize, f64, usize)> = HashMap::new();
    for s in scored {
        let entry = groups.entry(s.listing.equipment_type).or_default();
        entry.0 += 1;
        if let Some(price) = positive_price(&s.listing) {
            entry.1 += price;
            entry.2 += 1;
        }
    }

    let mut summary: Vec<EquipmentSummary> = groups
        .into_iter()
        .map(|(equipment_type, (count, price_sum, priced))| EquipmentSummary {
            equipment_type,
            count,
            average_price: (priced > 0).then(|| price_sum / priced as f64),
        })
        .collect();
    summary.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.equipment_type.as_str().cmp(b.equipment_type.as_str()))
    });
    summary
}

/// Listings per state code, most common first. Listings without a state are
/// left out.
pub fn state_counts(scored: &[ScoredListing]) -> Vec<StateCount> {
    let mut groups: HashMap<String, usize> = HashMap::new();
    for s in scored {
        if let Some(state) = s.listing.state.as_deref().map(str::trim).filter(|st| !st.is_empty()) {
            *groups.entry(state.to_uppercase()).or_default() += 1;
        }
    }

    let mut counts: Vec<StateCount> = groups
        .into_iter()
        .map(|(state, count)| StateCount { state, count })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.state.cmp(&b.state)));
    counts
}

/// Aggregated resale potential for one brand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrandPotential {
    pub brand: String,
    pub average_score: f64,
    /// Average over listings that have a price.
    pub average_price: Option<f64>,
    pub count: usize,
    pub high_potential: usize,
}

impl BrandPotential {
    pub fn high_share(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.high_potential as f64 / self.count as f64 * 100.0
        }
    }
}

#[derive(Default)]
struct BrandAccumulator {
    display: String,
    score_sum: f64,
    price_sum: f64,
    priced: usize,
    count: usize,
    high: usize,
}

/// Group listings by brand (case-insensitive) and rank brands by average score.
///
/// Listings without a brand are left out. The first spelling seen is used
/// for display.
pub fn brand_potential(scored: &[ScoredListing], limit: usize) -> Vec<BrandPotential> {
    let mut groups: HashMap<String, BrandAccumulator> = HashMap::new();

    for s in scored {
        let Some(brand) = s.listing.brand.as_deref().map(str::trim).filter(|b| !b.is_empty()) else {
            continue;
        };
        let acc = groups.entry(brand.to_lowercase()).or_insert_with(|| BrandAccumulator {
            display: brand.to_string(),
            ..Default::default()
        });
        acc.count += 1;
        acc.score_sum += s.total();
        if s.total() >= HIGH_POTENTIAL {
            acc.high += 1;
        }
        if let Some(price) = s.listing.price.filter(|p| *p > 0.0) {
            acc.price_sum += price;
            acc.priced += 1;
        }
    }

    let mut brands: Vec<BrandPotential> = groups
        .into_values()
        .map(|acc| BrandPotential {
            brand: acc.display,
            average_score: acc.score_sum / acc.count as f64,
            average_price: (acc.priced > 0).then(|| acc.price_sum / acc.priced as f64),
            count: acc.count,
            high_potential: acc.high,
        })
        .collect();

    brands.sort_by(|a, b| {
        b.average_score
            .partial_cmp(&a.average_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.brand.to_lowercase().cmp(&b.brand.to_lowercase()))
    });
    brands.truncate(limit);
    brands
}
