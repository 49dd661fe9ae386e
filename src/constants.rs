pub const RECIPE_COUNT_PER_PAGE: i64 = 12;

/// Bounds of the sweetness/sourness/strength scale.
pub const TASTE_SCALE_MIN: i32 = 0;
pub const TASTE_SCALE_MAX: i32 = 10;

/// A recipe qualifies as a match while it is missing at most this many
/// ingredients. Fixed by design, not configurable.
pub const NEAR_MATCH_MISSING_LIMIT: i64 = 1;
