//! Deterministic rule table used whenever the model is unavailable

use crate::models::DayForecast;

/// Precipitation (inches) above which sprinklers should stay off
pub const RAIN_THRESHOLD: f64 = 0.1;
/// Maximum temperature above which the day counts as hot
pub const HOT_THRESHOLD: f64 = 85.0;
/// Maximum temperature below which the day counts as cool
pub const COOL_THRESHOLD: f64 = 60.0;
/// Wind speed above which the day counts as windy
pub const WIND_THRESHOLD: f64 = 15.0;

pub const RAIN_TIP: &str = "Rain expected — skip sprinklers, save water and pump energy.";
pub const DRY_TIP: &str = "Dry conditions — water in evening for efficiency.";
pub const HOT_TIP: &str = "Hot day — set thermostat 3°F higher; use fans to cut A/C use.";
pub const COOL_TIP: &str = "Cool weather — lower heat by 2°F and wear layers to save energy.";
pub const MILD_TIP: &str = "Mild temps — open windows instead of running HVAC systems.";
pub const WINDY_TIP: &str = "High winds — expect good turbine output; delay noisy generator use.";
pub const CALM_TIP: &str = "Calm conditions — run appliances during off-peak hours for savings.";

/// Watering, thermostat and wind tips for one day
#[must_use]
pub fn fallback_tips(day: &DayForecast) -> [String; 3] {
    let water = if day.precip > RAIN_THRESHOLD {
        RAIN_TIP
    } else {
        DRY_TIP
    };

    let thermostat = if day.tempmax > HOT_THRESHOLD {
        HOT_TIP
    } else if day.tempmax < COOL_THRESHOLD {
        COOL_TIP
    } else {
        MILD_TIP
    };

    let wind = if day.windspeed > WIND_THRESHOLD {
        WINDY_TIP
    } else {
        CALM_TIP
    };

    [water.to_string(), thermostat.to_string(), wind.to_string()]
}
