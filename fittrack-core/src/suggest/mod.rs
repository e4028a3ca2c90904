//! Pure suggestion and aggregation functions over the daily logs.

mod nutrition;
mod weight;

pub use nutrition::{
    macro_percentages, remaining_macros, week_start, weekly_nutrition_averages, MacroPercentages,
    MacroStatus, MacroTrends, Remaining, RemainingMacros, Trend, WeeklyNutrition,
};
pub use weight::{
    is_personal_record, round_half_up, suggest_weight, suggest_weight_from_feedback,
    FeedbackSuggestion, WeightSuggestion, OVERLOAD_FACTOR,
};
