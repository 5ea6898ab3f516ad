//! Demand tiers and narrative recommendations
//!
//! Pure functions over scalar inputs: a predicted value plus historical
//! percentile thresholds map to a discrete tier with a fixed pair of
//! recommendation templates, and a second function layers weather- and
//! holiday-conditional narrative adjustments on top.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete demand level derived from historical percentile thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DemandTier {
    Critical,
    High,
    Normal,
    Low,
}

impl DemandTier {
    /// Upper-case level label
    pub fn label(&self) -> &'static str {
        match self {
            DemandTier::Critical => "CRITICAL",
            DemandTier::High => "HIGH",
            DemandTier::Normal => "NORMAL",
            DemandTier::Low => "LOW",
        }
    }

    /// Priority label for display
    pub fn priority(&self) -> &'static str {
        match self {
            DemandTier::Critical => "Critical",
            DemandTier::High => "High",
            DemandTier::Normal => "Normal",
            DemandTier::Low => "Low",
        }
    }

    /// Display color
    pub fn color(&self) -> &'static str {
        match self {
            DemandTier::Critical => "red",
            DemandTier::High => "orange",
            DemandTier::Normal => "green",
            DemandTier::Low => "blue",
        }
    }

    /// Display icon
    pub fn icon(&self) -> &'static str {
        match self {
            DemandTier::Critical => "🔴",
            DemandTier::High => "🟠",
            DemandTier::Normal => "🟢",
            DemandTier::Low => "🔵",
        }
    }
}

impl fmt::Display for DemandTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Percentile thresholds over the full historical demand distribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DemandThresholds {
    pub p25: f64,
    pub p75: f64,
    pub p90: f64,
}

/// Tier plus the fixed pair of base narratives
#[derive(Debug, Clone, PartialEq)]
pub struct DemandAssessment {
    pub tier: DemandTier,
    /// Demand-focused summary for delivery platforms
    pub platform_summary: &'static str,
    /// Demand-focused summary for restaurants
    pub restaurant_summary: &'static str,
}

const CRITICAL_PLATFORM: &str = "Demand is expected to be much higher than on a normal day. \
    Plan significantly more active riders (e.g. +20-30% vs a typical day), ensure enough budget \
    for boosts and surges, and closely monitor delivery times and service quality.";
const CRITICAL_RESTAURANT: &str = "Prepare for a very busy service compared with a typical day. \
    Add extra kitchen staff for peak periods, simplify the menu if needed, and pre-prepare your \
    best-selling dishes to avoid bottlenecks and stock-outs.";

const HIGH_PLATFORM: &str = "Demand should be above average. Schedule a few additional riders \
    (e.g. +10-15%), and consider moderate incentives during the main peak periods.";
const HIGH_RESTAURANT: &str = "Expect a busy but manageable service. Slightly increase kitchen \
    staffing and make sure you have enough stock of your core dishes so you don't run out at \
    peak time.";

const LOW_PLATFORM: &str = "Demand is likely to be below normal. No need to push for maximum \
    volume; you can keep incentives low and focus on targeted marketing or retention campaigns.";
const LOW_RESTAURANT: &str = "Expect a quieter day than usual. Avoid over-staffing and be \
    careful with fresh-product orders to keep waste under control. If you want more volume, use \
    small promotions rather than large stock increases.";

const NORMAL_PLATFORM: &str = "Demand is expected to be close to a typical day. Keep your usual \
    number of active riders and standard incentive schemes, but monitor the forecast in case \
    local events change the picture.";
const NORMAL_RESTAURANT: &str = "Plan for a normal service. Maintain your standard staffing and \
    stock levels and treat this as a baseline week to compare with future high- or low-demand \
    periods.";

/// Map a predicted value to a demand tier and its base recommendations.
///
/// Evaluation order matters and must not be rearranged: the LOW branch uses
/// `<= p25` but runs only after the CRITICAL and HIGH checks fail. Percentile
/// bands computed from a small or skewed historical sample can overlap, and
/// this order keeps the result unambiguous even then.
pub fn classify(value: f64, thresholds: &DemandThresholds) -> DemandAssessment {
    if value >= thresholds.p90 {
        DemandAssessment {
            tier: DemandTier::Critical,
            platform_summary: CRITICAL_PLATFORM,
            restaurant_summary: CRITICAL_RESTAURANT,
        }
    } else if value >= thresholds.p75 {
        DemandAssessment {
            tier: DemandTier::High,
            platform_summary: HIGH_PLATFORM,
            restaurant_summary: HIGH_RESTAURANT,
        }
    } else if value <= thresholds.p25 {
        DemandAssessment {
            tier: DemandTier::Low,
            platform_summary: LOW_PLATFORM,
            restaurant_summary: LOW_RESTAURANT,
        }
    } else {
        DemandAssessment {
            tier: DemandTier::Normal,
            platform_summary: NORMAL_PLATFORM,
            restaurant_summary: NORMAL_RESTAURANT,
        }
    }
}

/// Scalar weather inputs for the narrative adjustment
#[derive(Debug, Clone, Copy)]
pub struct DayConditions {
    pub temp_max: f64,
    pub temp_min: f64,
    pub precipitation: f64,
    pub is_holiday: bool,
}

/// Weather- and holiday-conditional narrative paragraphs
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherAdvice {
    pub platform: String,
    pub restaurant: String,
}

/// Build the weather adjustment paragraphs for one day.
///
/// Branches are checked in order and the first match wins; a public holiday
/// appends one extra platform sentence regardless of which branch matched.
pub fn weather_adjustments(conditions: &DayConditions) -> WeatherAdvice {
    let avg_temp = (conditions.temp_max + conditions.temp_min) / 2.0;
    let precip = conditions.precipitation;

    let (platform, restaurant) = if precip >= 5.0 && avg_temp <= 10.0 {
        (
            "Because the day is cold and rainy, deliveries are likely to take longer than on a \
             dry day. Plan for slightly longer ETAs and consider concentrating riders in dense \
             urban areas.",
            "Cold and rainy conditions usually mean fewer guests on the terrace and more people \
             ordering from home. You can rely more on delivery and indoor seating and focus on \
             warm, comforting dishes.",
        )
    } else if precip >= 5.0 && avg_temp > 10.0 {
        (
            "With rainy but relatively mild weather, people are less inclined to go out to eat, \
             which tends to support delivery demand, especially in the evening.",
            "Rain will reduce terrace usage, so expect more indoor and delivery orders. Make \
             sure your indoor capacity and packaging for delivery orders are well prepared.",
        )
    } else if precip < 1.0 && avg_temp >= 25.0 {
        (
            "On very warm, dry days, people may spend more time outside during the day and \
             order more in the late evening when it is cooler. Expect demand to be more \
             concentrated in the evening.",
            "Hot weather can mean fewer people at lunch but more activity in the evening. For \
             stocks, expect more cold and refreshing dishes (salads, cold drinks, ice cream) \
             and relatively fewer heavy hot dishes.",
        )
    } else if precip < 1.0 && avg_temp > 10.0 && avg_temp < 25.0 {
        (
            "The weather is mild and dry, which is fairly neutral for delivery. Demand will be \
             driven more by day of week and events than by weather alone.",
            "Mild and dry conditions mean terrace usage is attractive but not extreme. Stocks \
             can follow normal patterns without strong weather-driven shifts.",
        )
    } else if avg_temp <= 10.0 && precip < 5.0 {
        (
            "It will be cold, even if not very rainy. People are more likely to stay at home, \
             which can support delivery demand, especially in the evening.",
            "Cold weather reduces terrace usage and increases the appeal of hot, comforting \
             dishes. Make sure you have enough ingredients for your main warm meals.",
        )
    } else {
        (
            "Weather conditions are relatively neutral. Use the forecast mainly as a guide vs \
             the historical average and adjust based on local events or promotions.",
            "From a stock and staffing point of view, the weather does not require strong \
             adjustments beyond what the demand level already suggests.",
        )
    };

    let mut platform = platform.to_string();
    if conditions.is_holiday {
        platform.push_str(
            " Since this is a public holiday, traffic patterns can be irregular and certain \
             areas may be busier. Drivers in cars or scooters should anticipate possible \
             traffic around shopping and leisure areas.",
        );
    }

    WeatherAdvice {
        platform,
        restaurant: restaurant.to_string(),
    }
}
