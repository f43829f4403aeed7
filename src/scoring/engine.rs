use super::ladder::{ENGAGEMENT, PRICE_RATIO};
use super::tables::{
    condition_base, reference_prices, BASELINE_YEAR, BRAND_TIERS, DISINTEREST_KEYWORDS,
    EMPTY_BRAND_SCORE, FACTOR_MAX, INTEREST_KEYWORDS, MISSING_PRICE_SCORE,
    NEW_PRICE_DEPRECIATION, PARTIAL_BRAND_FACTOR, RECENT_YEAR_CUTOFF, REPAIR_CONDITION_FACTOR,
    UNKNOWN_BRAND_SCORE,
};
use super::verdict::{recommend, render_breakdown, Tier};
use crate::listing::{Condition, EquipmentType, ScoreInput};
use serde::Serialize;

/// The four sub-scores, each in [0, 25].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Factors {
    #[serde(rename = "brand_score")]
    pub brand: f64,
    #[serde(rename = "price_score")]
    pub price: f64,
    #[serde(rename = "condition_score")]
    pub condition: f64,
    #[serde(rename = "interest_score")]
    pub interest: f64,
}

impl Factors {
    /// Factors in display order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> {
        [
            ("Brand", self.brand),
            ("Price", self.price),
            ("Condition", self.condition),
            ("Interest", self.interest),
        ]
        .into_iter()
    }

    pub fn total(&self) -> f64 {
        self.brand + self.price + self.condition + self.interest
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResaleScore {
    pub total_score: f64,
    pub classification: Tier,
    pub factors: Factors,
    pub recommendation: String,
    pub breakdown: String,
}

/// Score one listing. Total: every input has a fallback, so this never fails.
pub fn calculate_score(input: &ScoreInput) -> ResaleScore {
    let factors = Factors {
        brand: score_brand(&input.brand),
        price: score_price(input.equipment_type, input.year, input.price, input.has_repair),
        condition: score_condition(input.condition, input.has_repair),
        interest: score_interest(&input.comments, input.comments_count, input.likes_count),
    };

    let total_score = factors.total();

    ResaleScore {
        total_score,
        classification: Tier::from_score(total_score),
        factors,
        recommendation: recommend(total_score, &factors),
        breakdown: render_breakdown(&factors),
    }
}

/// Brand desirability (0-25).
pub fn score_brand(brand: &str) -> f64 {
    // Padding from the extraction layer is not part of the name, so " Duotone"
    // is an exact match rather than a partial one.
    let brand = brand.trim().to_lowercase();
    if brand.is_empty() {
        return EMPTY_BRAND_SCORE;
    }

    if let Some((_, points)) = BRAND_TIERS.iter().find(|(name, _)| *name == brand) {
        return *points;
    }

    BRAND_TIERS
        .iter()
        .find(|(name, _)| brand.contains(name) || name.contains(brand.as_str()))
        .map(|(_, points)| points * PARTIAL_BRAND_FACTOR)
        .unwrap_or(UNKNOWN_BRAND_SCORE)
}

/// Market price the listing is judged against.
pub fn reference_price(equipment: EquipmentType, year: Option<i32>, has_repair: bool) -> f64 {
    let row = reference_prices(equipment);
    if has_repair {
        row.with_repair
    } else if year.unwrap_or(BASELINE_YEAR) >= RECENT_YEAR_CUTOFF {
        row.new * NEW_PRICE_DEPRECIATION
    } else {
        row.used
    }
}

/// Price relative to market (0-25). Missing, zero or negative prices are neutral.
pub fn score_price(
    equipment: EquipmentType,
    year: Option<i32>,
    price: Option<f64>,
    has_repair: bool,
) -> f64 {
    let price = match price {
        Some(p) if p > 0.0 && p.is_finite() => p,
        _ => return MISSING_PRICE_SCORE,
    };

    let ratio = price / reference_price(equipment, year, has_repair);
    PRICE_RATIO.lookup(ratio)
}

/// Condition (0-25). A repair halves the score whatever the tag says.
pub fn score_condition(condition: Condition, has_repair: bool) -> f64 {
    let base = condition_base(condition);
    if has_repair {
        base * REPAIR_CONDITION_FACTOR
    } else {
        base
    }
}

/// Interested/disinterested comment tallies. One comment can count for both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommentTally {
    pub interested: u32,
    pub disinterested: u32,
}

pub fn tally_comments(comments: &[String]) -> CommentTally {
    let mut tally = CommentTally::default();
    for comment in comments {
        let lower = comment.to_lowercase();
        if INTEREST_KEYWORDS.iter().any(|k| lower.contains(k)) {
            tally.interested += 1;
        }
        if DISINTEREST_KEYWORDS.iter().any(|k| lower.contains(k)) {
            tally.disinterested += 1;
        }
    }
    tally
}

/// Comment sentiment points (0-15).
fn comment_points(tally: CommentTally) -> f64 {
    if tally.interested > tally.disinterested {
        (tally.interested as f64 * 3.0).min(15.0)
    } else if tally.disinterested > 0 {
        (5.0 - tally.disinterested as f64 * 2.0).max(0.0)
    } else {
        5.0
    }
}

/// Audience interest (0-25): engagement volume plus comment sentiment.
pub fn score_interest(comments: &[String], comments_count: u32, likes_count: u32) -> f64 {
    let engagement = comments_count as f64 + likes_count as f64 * 0.5;
    let mut score = ENGAGEMENT.lookup(engagement);

    // Sentiment only counts when the comment text actually came through.
    if !comments.is_empty() {
        score += comment_points(tally_comments(comments));
    }

    score.min(FACTOR_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn sample_input() -> ScoreInput {
        ScoreInput {
            equipment_type: EquipmentType::Kite,
            brand: "Duotone".to_string(),
            year: Some(2024),
            price: Some(2800.0),
            condition: Condition::New,
            has_repair: false,
            comments: strings(&["quanto custa?"]),
            comments_count: 1,
            likes_count: 0,
        }
    }

    #[test]
    fn test_recent_duotone_kite_at_half_price() {
        let result = calculate_score(&sample_input());
        assert_eq!(result.factors.brand, 25.0);
        assert_eq!(result.factors.price, 25.0);
        assert_eq!(result.factors.condition, 25.0);
        assert_eq!(result.factors.interest, 3.0);
        assert_eq!(result.total_score, 78.0);
        assert_eq!(result.classification, Tier::Good);
        assert_eq!(
            result.recommendation,
            "Worth considering for strong brand and competitive price."
        );
    }

    #[test]
    fn test_everything_missing() {
        let input = ScoreInput {
            condition: Condition::from_tag("desconhecido"),
            ..ScoreInput::default()
        };
        let result = calculate_score(&input);
        assert_eq!(result.factors.brand, 10.0);
        assert_eq!(result.factors.price, 10.0);
        assert_eq!(result.factors.condition, 12.0);
        assert_eq!(result.factors.interest, 0.0);
        assert_eq!(result.total_score, 32.0);
        assert_eq!(result.classification, Tier::Low);
    }

    #[test]
    fn test_repaired_rrd_with_mixed_comments() {
        let input = ScoreInput {
            equipment_type: EquipmentType::Kite,
            brand: "RRD".to_string(),
            year: Some(2019),
            price: Some(2000.0),
            condition: Condition::NeedsRepair,
            has_repair: true,
            comments: strings(&["caro demais", "vendido"]),
            comments_count: 25,
            likes_count: 10,
        };
        let result = calculate_score(&input);
        assert_eq!(result.factors.brand, 12.0);
        assert_eq!(result.factors.condition, 2.5);
        // 2000 / 2500 (with_repair reference) = 0.8
        assert_eq!(result.factors.price, 18.0);
        assert_eq!(result.factors.interest, 13.0);
        let sum = result.factors.brand
            + result.factors.price
            + result.factors.condition
            + result.factors.interest;
        assert_eq!(result.total_score, sum);
        assert_eq!(result.total_score, 45.5);
        assert_eq!(result.classification, Tier::Low);
    }

    #[test]
    fn test_brand_exact_match_is_case_insensitive() {
        assert_eq!(score_brand("DUOTONE"), 25.0);
        assert_eq!(score_brand("Ride Engine"), 20.0);
        assert_eq!(score_brand("  core "), 23.0);
    }

    #[test]
    fn test_brand_padding_counts_as_exact_match() {
        assert_eq!(score_brand(" Duotone"), 25.0);
        assert_eq!(score_brand("Duotone\t"), score_brand("duotone"));
    }

    #[test]
    fn test_brand_partial_match_penalized() {
        // "north" is contained in the input
        assert!((score_brand("North Kiteboarding") - 21.6).abs() < 1e-9);
        // input contained in "cabrinha"
        assert!((score_brand("cabri") - 21.0 * 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_brand_partial_match_uses_declared_order() {
        // Contains both "duotone" and "north"; duotone is declared first.
        assert!((score_brand("north duotone") - 22.5).abs() < 1e-9);
    }

    #[test]
    fn test_brand_fallback_ordering() {
        let exact = score_brand("cabrinha");
        let partial = score_brand("cabrinha kites");
        let unknown = score_brand("zzzz");
        let empty = score_brand("");
        assert!(exact > partial);
        assert!(partial > unknown);
        assert_eq!(unknown, 8.0);
        assert_eq!(empty, 10.0);
        assert_eq!(score_brand("   "), 10.0);
    }

    #[test]
    fn test_price_missing_or_zero_is_neutral() {
        assert_eq!(score_price(EquipmentType::Kite, None, None, false), 10.0);
        assert_eq!(score_price(EquipmentType::Kite, None, Some(0.0), false), 10.0);
        assert_eq!(score_price(EquipmentType::Kite, None, Some(-50.0), false), 10.0);
    }

    #[test]
    fn test_reference_price_selection() {
        // repair wins over a recent year
        assert_eq!(reference_price(EquipmentType::Board, Some(2024), true), 1200.0);
        assert!((reference_price(EquipmentType::Board, Some(2022), false) - 2450.0).abs() < 1e-9);
        assert_eq!(reference_price(EquipmentType::Board, Some(2021), false), 1800.0);
        // missing year is treated as an older item
        assert_eq!(reference_price(EquipmentType::Bar, None, false), 1200.0);
        // categories without a row use kite prices
        assert_eq!(reference_price(EquipmentType::Wetsuit, None, false), 4000.0);
    }

    #[test]
    fn test_price_ladder_over_used_reference() {
        let score = |p: f64| score_price(EquipmentType::Kite, Some(2018), Some(p), false);
        assert_eq!(score(2000.0), 25.0);
        assert_eq!(score(2800.0), 22.0);
        assert_eq!(score(3600.0), 18.0);
        assert_eq!(score(4000.0), 15.0);
        assert_eq!(score(5200.0), 10.0);
        assert_eq!(score(9000.0), 5.0);
    }

    #[test]
    fn test_price_monotonic_as_price_drops() {
        for has_repair in [false, true] {
            for year in [Some(2015), Some(2023), None] {
                let mut previous = 0.0;
                for step in (1..=200).rev() {
                    let price = step as f64 * 100.0;
                    let score = score_price(EquipmentType::Board, year, Some(price), has_repair);
                    assert!(score >= previous, "score fell at price {}", price);
                    previous = score;
                }
            }
        }
    }

    #[test]
    fn test_repair_halves_condition() {
        for tag in ["novo", "seminovo", "bom_estado", "usado", "precisa_reparo", "desconhecido", "??"] {
            let condition = Condition::from_tag(tag);
            assert_eq!(
                score_condition(condition, true),
                score_condition(condition, false) * 0.5
            );
        }
        assert_eq!(score_condition(Condition::New, true), 12.5);
    }

    #[test]
    fn test_engagement_points() {
        assert_eq!(score_interest(&[], 0, 0), 0.0);
        assert_eq!(score_interest(&[], 1, 2), 3.0);
        assert_eq!(score_interest(&[], 4, 2), 5.0);
        assert_eq!(score_interest(&[], 0, 20), 7.0);
        assert_eq!(score_interest(&[], 15, 10), 10.0);
    }

    #[test]
    fn test_empty_comment_list_ignores_sentiment() {
        // comments_count may be high while the text list was truncated upstream
        assert_eq!(score_interest(&[], 3, 0), 3.0);
    }

    #[test]
    fn test_tally_counts_once_per_comment() {
        let tally = tally_comments(&strings(&["quanto? aceita troca? chama no zap"]));
        assert_eq!(tally.interested, 1);
        assert_eq!(tally.disinterested, 0);
    }

    #[test]
    fn test_comment_can_count_both_ways() {
        let tally = tally_comments(&strings(&["muito caro, mas quanto no pix?"]));
        assert_eq!(tally, CommentTally { interested: 1, disinterested: 1 });
        // tie: disinterest branch, 5 - 2
        assert_eq!(score_interest(&strings(&["muito caro, mas quanto no pix?"]), 0, 0), 3.0);
    }

    #[test]
    fn test_keywords_match_case_insensitively() {
        let tally = tally_comments(&strings(&["VENDIDO", "Não Vale isso"]));
        assert_eq!(tally, CommentTally { interested: 1, disinterested: 1 });
    }

    #[test]
    fn test_comment_sentiment_points() {
        assert_eq!(comment_points(CommentTally { interested: 2, disinterested: 0 }), 6.0);
        assert_eq!(comment_points(CommentTally { interested: 9, disinterested: 1 }), 15.0);
        assert_eq!(comment_points(CommentTally { interested: 0, disinterested: 1 }), 3.0);
        assert_eq!(comment_points(CommentTally { interested: 1, disinterested: 3 }), 0.0);
        assert_eq!(comment_points(CommentTally { interested: 0, disinterested: 0 }), 5.0);
    }

    #[test]
    fn test_neutral_comments_score_five() {
        assert_eq!(score_interest(&strings(&["bonito", "show"]), 0, 0), 5.0);
    }

    #[test]
    fn test_interest_capped() {
        let comments = strings(&["quanto", "valor?", "compro", "zap", "vendido", "inbox"]);
        assert_eq!(score_interest(&comments, 100, 100), 25.0);
    }

    #[test]
    fn test_bounds_and_sum_hold_across_inputs() {
        let brands = ["", "Duotone", "north kites", "unknown co", "rrd"];
        let conditions = [Condition::New, Condition::NeedsRepair, Condition::Unknown];
        let prices = [None, Some(1.0), Some(3000.0), Some(100_000.0)];
        for brand in brands {
            for condition in conditions {
                for price in prices {
                    for has_repair in [false, true] {
                        let input = ScoreInput {
                            equipment_type: EquipmentType::Board,
                            brand: brand.to_string(),
                            year: Some(2023),
                            price,
                            condition,
                            has_repair,
                            comments: strings(&["caro", "lixo", "ruim"]),
                            comments_count: 40,
                            likes_count: 3,
                        };
                        let result = calculate_score(&input);
                        for (_, value) in result.factors.iter() {
                            assert!((0.0..=25.0).contains(&value));
                        }
                        assert!((0.0..=100.0).contains(&result.total_score));
                        assert_eq!(result.total_score, result.factors.total());
                    }
                }
            }
        }
    }

    #[test]
    fn test_scoring_is_idempotent() {
        let input = sample_input();
        let first = calculate_score(&input);
        let second = calculate_score(&input);
        assert_eq!(first, second);
        assert_eq!(first.total_score.to_bits(), second.total_score.to_bits());
    }

    #[test]
    fn test_score_serializes_factor_names() {
        let json = serde_json::to_value(calculate_score(&sample_input())).unwrap();
        assert_eq!(json["factors"]["brand_score"], 25.0);
        assert_eq!(json["factors"]["interest_score"], 3.0);
        assert_eq!(json["classification"], "GOOD - worth considering");
        assert_eq!(json["total_score"], 78.0);
    }
}
