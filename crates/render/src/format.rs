use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use num_format::{Locale, ToFormattedString};

/// en-US display formatting, with timestamps shown at a fixed UTC offset.
#[derive(Debug, Clone, Copy)]
pub struct Formatter {
    offset: FixedOffset,
}

impl Default for Formatter {
    fn default() -> Self {
        Self { offset: utc() }
    }
}

fn utc() -> FixedOffset {
    Utc.fix()
}

impl Formatter {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Out-of-range offsets fall back to UTC.
    pub fn from_offset_minutes(minutes: i32) -> Self {
        let offset = minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(utc);
        Self { offset }
    }

    /// `$1,234.50`. Always two fraction digits.
    pub fn currency(&self, amount: f64) -> String {
        if !amount.is_finite() {
            return format!("${}", js_number(amount));
        }
        let Some(cents) = scaled(amount, 100.0) else {
            let sign = if amount < 0.0 { "-" } else { "" };
            return format!("{sign}${}", js_number(amount.abs()));
        };
        let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
        format!(
            "{sign}${}.{:02}",
            (cents / 100).to_formatted_string(&Locale::en),
            cents % 100
        )
    }

    /// Grouped, at most three fraction digits, no trailing zeros.
    pub fn number(&self, value: f64) -> String {
        if !value.is_finite() {
            return js_number(value);
        }
        let Some(thousandths) = scaled(value, 1000.0) else {
            return js_number(value);
        };
        let sign = if value < 0.0 && thousandths > 0 { "-" } else { "" };
        let whole = (thousandths / 1000).to_formatted_string(&Locale::en);
        let frac = thousandths % 1000;
        if frac == 0 {
            format!("{sign}{whole}")
        } else {
            let digits = format!("{frac:03}");
            format!("{sign}{whole}.{}", digits.trim_end_matches('0'))
        }
    }

    /// `3/5/2024, 2:07:09 PM`, or `raw` unchanged when it does not parse.
    pub fn date_time(&self, raw: &str) -> String {
        match self.parse(raw) {
            Some(at) => at.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string(),
            None => raw.to_string(),
        }
    }

    /// `Mar 5`, or `raw` unchanged when it does not parse.
    pub fn short_date(&self, raw: &str) -> String {
        match self.parse(raw) {
            Some(at) => at.format("%b %-d").to_string(),
            None => raw.to_string(),
        }
    }

    /// Parses RFC 3339, naive date-times (read at the display offset) and
    /// bare dates (UTC midnight).
    pub fn parse(&self, raw: &str) -> Option<DateTime<FixedOffset>> {
        let raw = raw.trim();
        if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
            return Some(at.with_timezone(&self.offset));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return self.offset.from_local_datetime(&naive).single();
        }
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            let midnight = date.and_hms_opt(0, 0, 0)?;
            return Some(utc().from_utc_datetime(&midnight).with_timezone(&self.offset));
        }
        None
    }
}

/// `|value| * factor` rounded, or `None` when it does not fit a `u64`.
fn scaled(value: f64, factor: f64) -> Option<u64> {
    let scaled = (value.abs() * factor).round();
    (scaled < u64::MAX as f64).then_some(scaled as u64)
}

/// How JavaScript prints a plain number: no `.0` on integral values.
pub fn js_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// First `limit` characters plus `...`; stories at or under the limit are untouched.
pub fn truncate_story(story: &str, limit: usize) -> String {
    match story.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &story[..cut]),
        None => story.to_string(),
    }
}
