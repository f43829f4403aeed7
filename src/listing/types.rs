use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Equipment category tag assigned by the extraction layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentType {
    Kite,
    Board,
    Bar,
    Harness,
    Wetsuit,
    Pump,
    Accessories,
    CompleteSet,
    #[default]
    Other,
}

impl EquipmentType {
    /// Parse a category tag. Unrecognized tags become `Other`.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "kite" => EquipmentType::Kite,
            "board" => EquipmentType::Board,
            "bar" => EquipmentType::Bar,
            "harness" => EquipmentType::Harness,
            "wetsuit" => EquipmentType::Wetsuit,
            "pump" => EquipmentType::Pump,
            "accessories" => EquipmentType::Accessories,
            "complete_set" => EquipmentType::CompleteSet,
            _ => EquipmentType::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentType::Kite => "kite",
            EquipmentType::Board => "board",
            EquipmentType::Bar => "bar",
            EquipmentType::Harness => "harness",
            EquipmentType::Wetsuit => "wetsuit",
            EquipmentType::Pump => "pump",
            EquipmentType::Accessories => "accessories",
            EquipmentType::CompleteSet => "complete_set",
            EquipmentType::Other => "other",
        }
    }
}

impl<'de> Deserialize<'de> for EquipmentType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = Option::<String>::deserialize(deserializer)?;
        Ok(tag.map(|t| Self::from_tag(&t)).unwrap_or_default())
    }
}

/// Condition tag. The wire tags are the Portuguese ones the extraction
/// prompt asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
pub enum Condition {
    #[serde(rename = "novo")]
    New,
    #[serde(rename = "seminovo")]
    LikeNew,
    #[serde(rename = "bom_estado")]
    Good,
    #[serde(rename = "usado")]
    Used,
    #[serde(rename = "precisa_reparo")]
    NeedsRepair,
    #[serde(rename = "desconhecido")]
    #[default]
    Unknown,
}

impl Condition {
    /// Parse a condition tag (Portuguese or English). Unrecognized tags become `Unknown`.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "novo" | "new" => Condition::New,
            "seminovo" | "like_new" => Condition::LikeNew,
            "bom_estado" | "good" => Condition::Good,
            "usado" | "used" => Condition::Used,
            "precisa_reparo" | "needs_repair" => Condition::NeedsRepair,
            _ => Condition::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::New => "novo",
            Condition::LikeNew => "seminovo",
            Condition::Good => "bom_estado",
            Condition::Used => "usado",
            Condition::NeedsRepair => "precisa_reparo",
            Condition::Unknown => "desconhecido",
        }
    }
}

impl<'de> Deserialize<'de> for Condition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = Option::<String>::deserialize(deserializer)?;
        Ok(tag.map(|t| Self::from_tag(&t)).unwrap_or_default())
    }
}

/// Everything the scorer looks at. Optional fields carry their documented
/// fallbacks, so any value of this type can be scored.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScoreInput {
    pub equipment_type: EquipmentType,
    pub brand: String,
    pub year: Option<i32>,
    pub price: Option<f64>,
    pub condition: Condition,
    pub has_repair: bool,
    pub comments: Vec<String>,
    pub comments_count: u32,
    pub likes_count: u32,
}

/// Scraped comments arrive either as bare strings or as objects with a `text` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawComment {
    Text(String),
    Object {
        #[serde(default)]
        text: Option<String>,
    },
}

fn deserialize_comments<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let raw = Option::<Vec<RawComment>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|c| match c {
            RawComment::Text(t) => Some(t),
            RawComment::Object { text } => text,
        })
        .collect())
}

/// Treat an explicit `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_true<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}

fn null_as_default_currency<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_currency))
}

fn default_currency() -> String {
    "BRL".to_string()
}

fn default_true() -> bool {
    true
}

/// An analyzed marketplace post, as written by the extraction layer.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Listing {
    pub post_id: String,
    #[serde(default)]
    pub post_url: Option<String>,
    #[serde(default)]
    pub analyzed_at: Option<DateTime<Utc>>,
    #[serde(default = "default_true", deserialize_with = "null_as_true")]
    pub is_advertisement: bool,
    #[serde(default)]
    pub confidence_score: Option<f64>,

    #[serde(default)]
    pub equipment_type: EquipmentType,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub condition: Condition,
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_repair: bool,
    #[serde(default)]
    pub repair_description: Option<String>,

    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default = "default_currency", deserialize_with = "null_as_default_currency")]
    pub currency: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub price_negotiable: bool,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub seller_name: Option<String>,

    #[serde(default, deserialize_with = "deserialize_comments")]
    pub comments: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub comments_count: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub likes_count: u32,
}

impl Listing {
    /// Project the listing onto the scorer's input, applying the
    /// best-effort defaults for missing attributes.
    pub fn score_input(&self) -> ScoreInput {
        ScoreInput {
            equipment_type: self.equipment_type,
            brand: self.brand.clone().unwrap_or_default(),
            year: self.year,
            price: self.price,
            condition: self.condition,
            has_repair: self.has_repair,
            comments: self.comments.clone(),
            comments_count: self.comments_count,
            likes_count: self.likes_count,
        }
    }

    /// Short human title: "Duotone Evo 12m", falling back to the category.
    pub fn title(&self) -> String {
        let parts: Vec<&str> = [self.brand.as_deref(), self.model.as_deref(), self.size.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if parts.is_empty() {
            self.equipment_type.as_str().to_string()
        } else {
            parts.join(" ")
        }
    }

    /// "City/ST" when known.
    pub fn location(&self) -> Option<String> {
        match (self.city.as_deref(), self.state.as_deref()) {
            (Some(city), Some(state)) => Some(format!("{}/{}", city, state)),
            (Some(city), None) => Some(city.to_string()),
            (None, Some(state)) => Some(state.to_string()),
            (None, None) => None,
        }
    }
}
