//! Focus-driven tips that take precedence over generated ones

use super::fallback::{HOT_THRESHOLD, RAIN_THRESHOLD};
use crate::models::{DayForecast, Focus, TIPS_PER_DAY};

pub const SPRINKLERS_FOCUS_TIP: &str =
    "Rain expected — skip sprinklers tomorrow to save water and energy.";
pub const THERMOSTAT_FOCUS_TIP: &str =
    "Hot day tomorrow — set thermostat ~3°F higher and use fans to save A/C costs.";
pub const SOLAR_FOCUS_TIP: &str =
    "Sunny tomorrow — prioritize solar-powered usage for appliances/EV charging.";

/// Prepend the tips the selected focuses call for, keeping three in total
#[must_use]
pub fn apply_focus_rules(
    day: &DayForecast,
    focuses: &[Focus],
    tips: [String; TIPS_PER_DAY],
) -> [String; TIPS_PER_DAY] {
    if focuses.is_empty() {
        return tips;
    }

    let description = day.description.to_lowercase();
    let mut prefix: Vec<String> = Vec::new();

    if focuses.contains(&Focus::Sprinklers) && day.precip > RAIN_THRESHOLD {
        prefix.push(SPRINKLERS_FOCUS_TIP.to_string());
    }
    if focuses.contains(&Focus::Thermostat) && day.tempmax > HOT_THRESHOLD {
        prefix.push(THERMOSTAT_FOCUS_TIP.to_string());
    }
    if focuses.contains(&Focus::Solar)
        && (description.contains("sunny") || description.contains("clear"))
    {
        prefix.push(SOLAR_FOCUS_TIP.to_string());
    }

    if prefix.is_empty() {
        return tips;
    }

    let mut prefix = prefix.into_iter();
    let mut tips = tips.into_iter();
    std::array::from_fn(|_| prefix.next().or_else(|| tips.next()).unwrap_or_default())
}
