//! Relative-time text

/// Unit words used by [`ago_text`]
#[derive(Debug, Clone, Copy)]
pub struct LangPeriods {
    /// Plural minute unit
    pub minutes: &'static str,
    /// Plural hour unit
    pub hours: &'static str,
    /// Plural day unit
    pub days: &'static str,
    /// Trailing word
    pub ago: &'static str,
}

const ENGLISH: LangPeriods = LangPeriods {
    minutes: "minutes",
    hours: "hours",
    days: "days",
    ago: "ago",
};

/// Unit words for `lang`
///
/// Only English is provided; other codes fall back to it.
#[must_use]
pub fn lang_periods(_lang: &str) -> LangPeriods {
    ENGLISH
}

/// "N minutes/hours/days ago" for a unix timestamp, relative to now
#[must_use]
pub fn ago_text(event_timestamp: i64, lang: &str) -> String {
    ago_text_at(event_timestamp, chrono::Utc::now().timestamp(), lang)
}

/// [`ago_text`] against an explicit `now`
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn ago_text_at(event_timestamp: i64, now: i64, lang: &str) -> String {
    let lp = lang_periods(lang);

    let mut ago = ((now - event_timestamp) as f64 / 60.0).round_ties_even().max(0.0);
    let mut units = lp.minutes;
    if ago >= 60.0 {
        ago = (ago / 60.0).round_ties_even();
        if ago >= 24.0 {
            ago = (ago / 24.0).round_ties_even();
            units = lp.days;
        } else {
            units = lp.hours;
        }
    }

    // singular: drop the trailing "s"
    if (ago - 1.0).abs() < f64::EPSILON {
        units = &units[..units.len() - 1];
    }
    format!("{ago:.0} {units} {}", lp.ago)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    #[test]
    fn minutes() {
        assert_eq!(ago_text_at(NOW - 5 * 60, NOW, "en"), "5 minutes ago");
        assert_eq!(ago_text_at(NOW - 60, NOW, "en"), "1 minute ago");
        assert_eq!(ago_text_at(NOW, NOW, "en"), "0 minutes ago");
    }

    #[test]
    fn hours_and_days() {
        assert_eq!(ago_text_at(NOW - 3 * 3600, NOW, "en"), "3 hours ago");
        assert_eq!(ago_text_at(NOW - 3600, NOW, "en"), "1 hour ago");
        assert_eq!(ago_text_at(NOW - 2 * 86_400, NOW, "en"), "2 days ago");
        assert_eq!(ago_text_at(NOW - 86_400, NOW, "fr"), "1 day ago");
    }

    #[test]
    fn future_events_clamp_to_zero() {
        assert_eq!(ago_text_at(NOW + 600, NOW, "en"), "0 minutes ago");
    }
}
