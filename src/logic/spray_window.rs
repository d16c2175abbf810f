use crate::models::{HourlyObservation, SprayReason, SprayRecommendation, SprayState, SprayWindow};

/// Forward horizon (hours) the advisory is computed over.
pub const ADVISORY_HORIZON_HOURS: u32 = 12;

/// Rain probability (%) at or above which spraying is ruled out.
pub const RAIN_NO_SPRAY_PERCENT: f64 = 40.0;
/// Wind speed (km/h) at or above which spraying is ruled out (drift).
pub const WIND_NO_SPRAY_KMH: f64 = 18.0;
/// Rain probability (%) at or above which conditions are marginal.
pub const RAIN_CAUTION_PERCENT: f64 = 20.0;
/// Wind speed (km/h) at or above which conditions are marginal.
pub const WIND_CAUTION_KMH: f64 = 12.0;

/// An hour counts as spray-safe only below both caution thresholds.
pub fn is_good_hour(hour: &HourlyObservation) -> bool {
    hour.rain_prob() < RAIN_CAUTION_PERCENT && hour.wind_speed() < WIND_CAUTION_KMH
}

/// Classify a chronological forecast horizon into a spray advisory.
///
/// Each rule is an existence check over the whole sequence, evaluated in
/// priority order: rain rules out spraying before wind is even considered,
/// so one wet hour anywhere in the horizon yields `Dont`/`Rain` regardless
/// of hour order. Hours with missing rain or wind data read as 0 and can
/// never trip a rule.
pub fn compute_spray_state(hours: &[HourlyObservation]) -> SprayRecommendation {
    let max_rain_prob = hours.iter().map(|h| h.rain_prob()).fold(0.0, f64::max);
    let max_wind_kmh = hours.iter().map(|h| h.wind_speed()).fold(0.0, f64::max);

    let (state, reason) = if hours.iter().any(|h| h.rain_prob() >= RAIN_NO_SPRAY_PERCENT) {
        (SprayState::Dont, SprayReason::Rain)
    } else if hours.iter().any(|h| h.wind_speed() >= WIND_NO_SPRAY_KMH) {
        (SprayState::Dont, SprayReason::Wind)
    } else if hours.iter().any(|h| {
        h.rain_prob() >= RAIN_CAUTION_PERCENT || h.wind_speed() >= WIND_CAUTION_KMH
    }) {
        (SprayState::Caution, SprayReason::Caution)
    } else {
        (SprayState::Good, SprayReason::Good)
    };

    SprayRecommendation {
        state,
        reason,
        max_rain_prob,
        max_wind_kmh,
        next_window: next_good_window(hours),
    }
}

/// First contiguous run of spray-safe hours, or `None` when the horizon has
/// none. Later runs after a gap are deliberately not reported.
pub fn next_good_window(hours: &[HourlyObservation]) -> Option<SprayWindow> {
    let start = hours.iter().position(is_good_hour)?;
    let end = hours[start..]
        .iter()
        .take_while(|h| is_good_hour(h))
        .count()
        + start
        - 1;

    Some(SprayWindow {
        start: hours[start].time,
        end: hours[end].time,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn t(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 10, hour, 0, 0).unwrap()
    }

    fn obs(hour: u32, rain: f64, wind: f64) -> HourlyObservation {
        HourlyObservation {
            time: t(hour),
            temp_c: Some(18.0),
            rain_prob_percent: Some(rain),
            wind_speed_kmh: Some(wind),
        }
    }

    fn blank(hour: u32) -> HourlyObservation {
        HourlyObservation {
            time: t(hour),
            temp_c: None,
            rain_prob_percent: None,
            wind_speed_kmh: None,
        }
    }

    #[test]
    fn high_rain_rules_out_spraying() {
        let rec = compute_spray_state(&[obs(0, 50.0, 5.0)]);
        assert_eq!(rec.state, SprayState::Dont);
        assert_eq!(rec.reason, SprayReason::Rain);
        assert_eq!(rec.max_rain_prob, 50.0);
        assert_eq!(rec.max_wind_kmh, 5.0);
        assert!(rec.next_window.is_none());
    }

    #[test]
    fn high_wind_rules_out_spraying() {
        let rec = compute_spray_state(&[obs(0, 0.0, 20.0)]);
        assert_eq!(rec.state, SprayState::Dont);
        assert_eq!(rec.reason, SprayReason::Wind);
    }

    #[test]
    fn rain_wins_over_wind_regardless_of_hour_order() {
        // Wind hazard comes first chronologically; rain later still decides.
        let rec = compute_spray_state(&[obs(0, 0.0, 25.0), obs(1, 45.0, 2.0)]);
        assert_eq!(rec.state, SprayState::Dont);
        assert_eq!(rec.reason, SprayReason::Rain);
    }

    #[test]
    fn marginal_rain_yields_caution() {
        let rec = compute_spray_state(&[obs(0, 25.0, 5.0)]);
        assert_eq!(rec.state, SprayState::Caution);
        assert_eq!(rec.reason, SprayReason::Caution);
    }

    #[test]
    fn marginal_wind_yields_caution() {
        let rec = compute_spray_state(&[obs(0, 5.0, 14.0)]);
        assert_eq!(rec.state, SprayState::Caution);
        assert_eq!(rec.reason, SprayReason::Caution);
    }

    #[test]
    fn calm_horizon_is_good() {
        let rec = compute_spray_state(&[obs(0, 10.0, 5.0), obs(1, 15.0, 8.0)]);
        assert_eq!(rec.state, SprayState::Good);
        assert_eq!(rec.reason, SprayReason::Good);
    }

    #[test]
    fn thresholds_are_inclusive() {
        assert_eq!(
            compute_spray_state(&[obs(0, 40.0, 0.0)]).reason,
            SprayReason::Rain
        );
        assert_eq!(
            compute_spray_state(&[obs(0, 0.0, 18.0)]).reason,
            SprayReason::Wind
        );
        assert_eq!(
            compute_spray_state(&[obs(0, 20.0, 0.0)]).reason,
            SprayReason::Caution
        );
        assert_eq!(
            compute_spray_state(&[obs(0, 0.0, 12.0)]).reason,
            SprayReason::Caution
        );
        assert_eq!(
            compute_spray_state(&[obs(0, 19.9, 11.9)]).reason,
            SprayReason::Good
        );
    }

    #[test]
    fn missing_fields_never_trigger_a_hazard() {
        let rec = compute_spray_state(&[blank(0), blank(1)]);
        assert_eq!(rec.state, SprayState::Good);
        assert_eq!(rec.max_rain_prob, 0.0);
        assert_eq!(rec.max_wind_kmh, 0.0);
        let window = rec.next_window.unwrap();
        assert_eq!(window.start, t(0));
        assert_eq!(window.end, t(1));
    }

    #[test]
    fn empty_horizon_defaults_to_good_with_no_window() {
        let rec = compute_spray_state(&[]);
        assert_eq!(rec.state, SprayState::Good);
        assert_eq!(rec.reason, SprayReason::Good);
        assert_eq!(rec.max_rain_prob, 0.0);
        assert_eq!(rec.max_wind_kmh, 0.0);
        assert!(rec.next_window.is_none());
    }

    #[test]
    fn aggregates_cover_the_whole_horizon() {
        let rec = compute_spray_state(&[obs(0, 10.0, 16.0), obs(1, 35.0, 4.0), obs(2, 5.0, 9.0)]);
        assert_eq!(rec.max_rain_prob, 35.0);
        assert_eq!(rec.max_wind_kmh, 16.0);
    }

    #[test]
    fn window_reported_even_when_state_is_dont() {
        // Calm run up front, rain hazard at the end: the advisory is Dont
        // but the safe run is still surfaced.
        let hours = [obs(0, 0.0, 0.0), obs(1, 0.0, 0.0), obs(2, 50.0, 0.0)];
        let rec = compute_spray_state(&hours);
        assert_eq!(rec.state, SprayState::Dont);
        assert_eq!(rec.reason, SprayReason::Rain);
        let window = rec.next_window.unwrap();
        assert_eq!(window.start, t(0));
        assert_eq!(window.end, t(1));
    }

    #[test]
    fn only_the_first_safe_run_is_reported() {
        let hours = [
            obs(0, 30.0, 5.0),  // not safe
            obs(1, 5.0, 5.0),   // first run
            obs(2, 5.0, 5.0),   // first run
            obs(3, 25.0, 5.0),  // gap
            obs(4, 5.0, 5.0),   // second run, ignored
            obs(5, 5.0, 5.0),
        ];
        let window = compute_spray_state(&hours).next_window.unwrap();
        assert_eq!(window.start, t(1));
        assert_eq!(window.end, t(2));
    }

    #[test]
    fn single_safe_hour_has_equal_bounds() {
        let hours = [obs(0, 30.0, 5.0), obs(1, 5.0, 5.0), obs(2, 30.0, 5.0)];
        let window = compute_spray_state(&hours).next_window.unwrap();
        assert_eq!(window.start, t(1));
        assert_eq!(window.end, t(1));
    }

    #[test]
    fn safe_run_extends_to_horizon_end() {
        let hours = [obs(0, 50.0, 5.0), obs(1, 5.0, 5.0), obs(2, 5.0, 5.0)];
        let window = compute_spray_state(&hours).next_window.unwrap();
        assert_eq!(window.start, t(1));
        assert_eq!(window.end, t(2));
    }

    #[test]
    fn no_window_when_no_hour_is_safe() {
        // Every hour fails the safe predicate even though none reaches the
        // no-spray thresholds.
        let hours = [obs(0, 25.0, 5.0), obs(1, 5.0, 14.0)];
        let rec = compute_spray_state(&hours);
        assert_eq!(rec.state, SprayState::Caution);
        assert!(rec.next_window.is_none());
    }

    #[test]
    fn safe_hour_predicate_is_tighter_than_caution_trigger() {
        // 19%/11 km/h passes, 20%/anything or anything/12 km/h fails.
        assert!(is_good_hour(&obs(0, 19.0, 11.0)));
        assert!(!is_good_hour(&obs(0, 20.0, 0.0)));
        assert!(!is_good_hour(&obs(0, 0.0, 12.0)));
    }

    #[test]
    fn recomputation_is_deterministic() {
        let hours = [obs(0, 25.0, 5.0), obs(1, 5.0, 5.0), obs(2, 45.0, 19.0)];
        assert_eq!(compute_spray_state(&hours), compute_spray_state(&hours));
    }
}
