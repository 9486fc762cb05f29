//! Report Enrichment
//!
//! Optional side data (weather at the time of the report, social media
//! volume, official alerts) keyed by report id. Kept out of `Report` and
//! joined only where a consumer asks for it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherConditions {
    pub wind_speed_kmh: f64,
    pub wave_height_m: f64,
    pub temperature_c: f64,
    pub visibility_km: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Enrichment {
    #[serde(default)]
    pub weather: Option<WeatherConditions>,
    #[serde(default)]
    pub social_media_mentions: u32,
    #[serde(default)]
    pub official_alert: bool,
}

/// Rolled-up side data for one hotspot's members
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentRollup {
    /// Members that had an entry in the table
    pub enriched_reports: usize,
    pub social_media_mentions: u64,
    pub official_alerts: usize,
    pub max_wave_height_m: Option<f64>,
    pub max_wind_speed_kmh: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnrichmentTable {
    entries: HashMap<String, Enrichment>,
}

impl EnrichmentTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, report_id: impl Into<String>, enrichment: Enrichment) {
        self.entries.insert(report_id.into(), enrichment);
    }

    pub fn get(&self, report_id: &str) -> Option<&Enrichment> {
        self.entries.get(report_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Join the table against a member list; ids without an entry are ignored
    pub fn for_members(&self, members: &[String]) -> EnrichmentRollup {
        let mut rollup = EnrichmentRollup::default();

        for enrichment in members.iter().filter_map(|id| self.entries.get(id)) {
            rollup.enriched_reports += 1;
            rollup.social_media_mentions += u64::from(enrichment.social_media_mentions);
            if enrichment.official_alert {
                rollup.official_alerts += 1;
            }
            if let Some(weather) = &enrichment.weather {
                rollup.max_wave_height_m = max_of(rollup.max_wave_height_m, weather.wave_height_m);
                rollup.max_wind_speed_kmh = max_of(rollup.max_wind_speed_kmh, weather.wind_speed_kmh);
            }
        }

        rollup
    }
}

impl FromIterator<(String, Enrichment)> for EnrichmentTable {
    fn from_iter<T: IntoIterator<Item = (String, Enrichment)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

fn max_of(current: Option<f64>, value: f64) -> Option<f64> {
    if !value.is_finite() {
        return current;
    }
    Some(current.map_or(value, |c| c.max(value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weather(wave: f64, wind: f64) -> Option<WeatherConditions> {
        Some(WeatherConditions {
            wind_speed_kmh: wind,
            wave_height_m: wave,
            temperature_c: 29.0,
            visibility_km: 8.0,
        })
    }

    #[test]
    fn test_rollup_over_members() {
        let table: EnrichmentTable = vec![
            (
                "a".to_string(),
                Enrichment {
                    weather: weather(2.5, 40.0),
                    social_media_mentions: 12,
                    official_alert: true,
                },
            ),
            (
                "b".to_string(),
                Enrichment {
                    weather: weather(3.1, 35.0),
                    social_media_mentions: 30,
                    official_alert: false,
                },
            ),
            (
                "elsewhere".to_string(),
                Enrichment {
                    social_media_mentions: 1000,
                    ..Default::default()
                },
            ),
        ]
        .into_iter()
        .collect();

        let members = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let rollup = table.for_members(&members);

        assert_eq!(rollup.enriched_reports, 2);
        assert_eq!(rollup.social_media_mentions, 42);
        assert_eq!(rollup.official_alerts, 1);
        assert_eq!(rollup.max_wave_height_m, Some(3.1));
        assert_eq!(rollup.max_wind_speed_kmh, Some(40.0));
    }

    #[test]
    fn test_rollup_without_weather() {
        let mut table = EnrichmentTable::new();
        table.insert("a", Enrichment { social_media_mentions: 3, ..Default::default() });

        let rollup = table.for_members(&["a".to_string()]);
        assert_eq!(rollup.social_media_mentions, 3);
        assert!(rollup.max_wave_height_m.is_none());
    }

    #[test]
    fn test_table_deserializes_as_map() {
        let table: EnrichmentTable =
            serde_json::from_str(r#"{"r1": {"social_media_mentions": 7}}"#).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("r1").map(|e| e.social_media_mentions), Some(7));
    }
}
