//! Static lookup tables used by the resale scorer.
//!
//! Every table is an ordered slice. The fuzzy brand lookup returns the first
//! substring match, so declaration order is part of the scoring contract.

use crate::listing::{Condition, EquipmentType};

/// Upper bound of every individual factor.
pub const FACTOR_MAX: f64 = 25.0;

/// Score for a listing without any brand.
pub const EMPTY_BRAND_SCORE: f64 = 10.0;

/// Score for a brand that matches nothing in [`BRAND_TIERS`].
pub const UNKNOWN_BRAND_SCORE: f64 = 8.0;

/// Multiplier applied to a brand found by substring instead of exact match.
pub const PARTIAL_BRAND_FACTOR: f64 = 0.9;

/// Price score when the listing has no usable price.
pub const MISSING_PRICE_SCORE: f64 = 10.0;

/// Gear from this year on is priced against the depreciated "new" reference.
pub const RECENT_YEAR_CUTOFF: i32 = 2022;

/// Year assumed when the extraction layer could not find one.
pub const BASELINE_YEAR: i32 = 2020;

/// Fraction of the new price a nearly-new item is expected to sell for.
pub const NEW_PRICE_DEPRECIATION: f64 = 0.7;

/// Multiplier applied to the condition score of repaired gear.
pub const REPAIR_CONDITION_FACTOR: f64 = 0.5;

/// Brand tiers, lowercase, in lookup order.
///
/// Tier S is 25 points, tier E is 12.
pub const BRAND_TIERS: &[(&str, f64)] = &[
    // Tier S
    ("duotone", 25.0),
    ("mystic", 25.0),
    // Tier A
    ("north", 24.0),
    ("core", 23.0),
    ("manera", 23.0),
    ("ion", 23.0),
    ("liewe", 22.0),
    // Tier B
    ("cabrinha", 21.0),
    ("prolimit", 20.0),
    ("slingshot", 20.0),
    ("ride engine", 20.0),
    // Tier C
    ("reedin", 18.0),
    ("crazy fly", 19.0),
    ("ozone", 18.0),
    ("dakine", 18.0),
    ("rip curl", 19.0),
    ("oneill", 19.0),
    ("shinn", 18.0),
    ("patagonia", 18.0),
    ("naish", 17.0),
    ("f-one", 17.0),
    // Tier D
    ("eleveight", 15.0),
    ("airush", 15.0),
    ("liquid force", 16.0),
    ("crazyfly", 16.0),
    ("billabong", 16.0),
    ("nobile", 15.0),
    ("appletree", 15.0),
    ("flysurfer", 14.0),
    ("brunotti", 14.0),
    // Tier E
    ("carved", 13.0),
    ("gaastra", 12.0),
    ("best", 12.0),
    ("hurley", 12.0),
    ("roxy", 12.0),
    ("quiksilver", 12.0),
    ("rrd", 12.0),
];

/// Expected market prices (BRL) for one equipment category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferencePrices {
    pub new: f64,
    pub used: f64,
    pub with_repair: f64,
}

const KITE_PRICES: ReferencePrices = ReferencePrices {
    new: 8000.0,
    used: 4000.0,
    with_repair: 2500.0,
};

const BOARD_PRICES: ReferencePrices = ReferencePrices {
    new: 3500.0,
    used: 1800.0,
    with_repair: 1200.0,
};

const BAR_PRICES: ReferencePrices = ReferencePrices {
    new: 2500.0,
    used: 1200.0,
    with_repair: 800.0,
};

/// Reference row for a category. Only kites, boards and bars have their own
/// row; everything else is judged against kite prices.
pub fn reference_prices(equipment: EquipmentType) -> ReferencePrices {
    match equipment {
        EquipmentType::Board => BOARD_PRICES,
        EquipmentType::Bar => BAR_PRICES,
        _ => KITE_PRICES,
    }
}

/// Base condition score before the repair penalty.
pub fn condition_base(condition: Condition) -> f64 {
    match condition {
        Condition::New => 25.0,
        Condition::LikeNew => 22.0,
        Condition::Good => 18.0,
        Condition::Used => 12.0,
        Condition::NeedsRepair => 5.0,
        Condition::Unknown => 12.0,
    }
}

/// Comment fragments signalling buyer interest.
pub const INTEREST_KEYWORDS: &[&str] = &[
    "quanto",
    "preço",
    "valor",
    "comprar",
    "compro",
    "interessado",
    "interesse",
    "disponível",
    "vendo",
    "aceita",
    "troca",
    "pago",
    "whatsapp",
    "zap",
    "reservado",
    "vendido",
    "sold",
    "dm",
    "direct",
    "inbox",
    "chamei",
];

/// Comment fragments complaining about price or quality.
pub const DISINTEREST_KEYWORDS: &[&str] = &[
    "caro",
    "carão",
    "absurdo",
    "exagerado",
    "não vale",
    "zuado",
    "ruim",
    "péssimo",
    "lixo",
];
