pub mod formatter;

pub use formatter::{
    format_age, format_brand_table, format_listing_detail, format_price, format_score,
    format_scored_table, format_stats, format_tsv, should_use_colors,
};
