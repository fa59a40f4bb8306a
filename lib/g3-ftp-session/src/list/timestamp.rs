/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use chrono::{
    DateTime, Datelike, Days, FixedOffset, Local, NaiveDate, NaiveDateTime, Offset, TimeZone,
    Utc,
};

use crate::config::FtpListingConfig;
use crate::error::FtpConfigError;

const ENGLISH_MONTHS: &str = "Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec";

fn language_months(code: &str) -> &'static str {
    match code {
        "de" => "Jan|Feb|Mär|Apr|Mai|Jun|Jul|Aug|Sep|Okt|Nov|Dez",
        "it" => "gen|feb|mar|apr|mag|giu|lug|ago|set|ott|nov|dic",
        "es" => "ene|feb|mar|abr|may|jun|jul|ago|sep|oct|nov|dic",
        "pt" => "jan|fev|mar|abr|mai|jun|jul|ago|set|out|nov|dez",
        "da" | "sv" => "jan|feb|mar|apr|maj|jun|jul|aug|sep|okt|nov|dec",
        "no" => "jan|feb|mar|apr|mai|jun|jul|aug|sep|okt|nov|des",
        "nl" => "jan|feb|mrt|apr|mei|jun|jul|aug|sep|okt|nov|dec",
        "fr" => "jan|fév|mar|avr|mai|jun|jui|aoû|sep|oct|nov|déc",
        _ => ENGLISH_MONTHS,
    }
}

fn split_month_names(names: &str) -> Result<[String; 12], FtpConfigError> {
    let tokens: Vec<String> = names.split('|').map(|s| s.to_lowercase()).collect();
    <[String; 12]>::try_from(tokens)
        .map_err(|_| FtpConfigError::InvalidShortMonthNames(names.to_string()))
}

/// Parse `UTC`, `GMT`, `Z`, `+08:00`, `-0500`, `+8` or any of them with a `GMT`/`UTC` prefix.
pub(crate) fn parse_fixed_offset(tz: &str) -> Result<FixedOffset, FtpConfigError> {
    let invalid = || FtpConfigError::InvalidTimeZone(tz.to_string());

    let s = tz.trim();
    let s = s
        .strip_prefix("GMT")
        .or_else(|| s.strip_prefix("UTC"))
        .unwrap_or(s);
    if s.is_empty() || s == "Z" {
        return FixedOffset::east_opt(0).ok_or_else(invalid);
    }

    let (sign, rest) = match s.as_bytes()[0] {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return Err(invalid()),
    };
    if !rest.bytes().all(|b| b.is_ascii_digit() || b == b':') {
        return Err(invalid());
    }
    let (hours, minutes) = match rest.split_once(':') {
        Some((h, m)) => (h, m),
        None if rest.len() > 2 => rest.split_at(rest.len() - 2),
        None => (rest, "0"),
    };
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if hours > 14 || minutes > 59 {
        return Err(invalid());
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Field {
    Year,
    Month,
    MonthName,
    Day,
    /// `H`, 0-23
    Hour23,
    /// `k`, 1-24
    Hour24,
    /// `h`, 1-12
    Hour12,
    /// `K`, 0-11
    Hour11,
    Minute,
    Second,
    AmPm,
}

impl Field {
    fn is_numeric(&self) -> bool {
        !matches!(self, Field::MonthName | Field::AmPm)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Item {
    Field(Field, usize),
    Space,
    Literal(char),
}

/// A compiled date pattern using the letters of `SimpleDateFormat`.
#[derive(Clone, Debug)]
struct DateFormat {
    pattern: String,
    items: Vec<Item>,
    has_year: bool,
}

impl DateFormat {
    fn compile(pattern: &str) -> Result<Self, FtpConfigError> {
        let invalid = |reason| FtpConfigError::InvalidDateFormat(pattern.to_string(), reason);

        let mut items = Vec::new();
        let mut chars = pattern.chars().peekable();
        while let Some(c) = chars.next() {
            if c.is_whitespace() {
                while chars.next_if(|c| c.is_whitespace()).is_some() {}
                items.push(Item::Space);
                continue;
            }
            if c == '\'' {
                if chars.next_if_eq(&'\'').is_some() {
                    items.push(Item::Literal('\''));
                    continue;
                }
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(c) => items.push(Item::Literal(c)),
                        None => return Err(invalid("unterminated quote")),
                    }
                }
                continue;
            }
            if !c.is_ascii_alphabetic() {
                items.push(Item::Literal(c));
                continue;
            }

            let mut count = 1;
            while chars.next_if_eq(&c).is_some() {
                count += 1;
            }
            let field = match c {
                'y' => Field::Year,
                'M' if count >= 3 => Field::MonthName,
                'M' => Field::Month,
                'd' => Field::Day,
                'H' => Field::Hour23,
                'k' => Field::Hour24,
                'h' => Field::Hour12,
                'K' => Field::Hour11,
                'm' => Field::Minute,
                's' => Field::Second,
                'a' => Field::AmPm,
                _ => return Err(invalid("unsupported pattern letter")),
            };
            items.push(Item::Field(field, count));
        }

        let has_year = items
            .iter()
            .any(|item| matches!(item, Item::Field(Field::Year, _)));
        let has_month = items
            .iter()
            .any(|item| matches!(item, Item::Field(Field::Month | Field::MonthName, _)));
        if !has_month {
            return Err(invalid("no month field"));
        }
        Ok(DateFormat {
            pattern: pattern.to_string(),
            items,
            has_year,
        })
    }

    /// Match the whole input, nothing may be left over.
    fn parse(&self, s: &str, months: &[String; 12]) -> Option<ParsedFields> {
        let mut fields = ParsedFields::default();
        let mut rest = s;

        for (i, item) in self.items.iter().enumerate() {
            match item {
                Item::Space => {
                    let trimmed = rest.trim_start();
                    if trimmed.len() == rest.len() {
                        return None;
                    }
                    rest = trimmed;
                }
                Item::Literal(c) => rest = rest.strip_prefix(*c)?,
                Item::Field(field, width) => {
                    rest = rest.trim_start();
                    if field.is_numeric() {
                        // adjacent numeric fields are fixed width, like `yyyyMMdd`
                        let fixed = matches!(
                            self.items.get(i + 1),
                            Some(Item::Field(next, _)) if next.is_numeric()
                        );
                        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
                        let len = if fixed { *width } else { digits };
                        if len == 0 || digits < len {
                            return None;
                        }
                        let value: u32 = rest[..len].parse().ok()?;
                        fields.set(*field, *width, len, value)?;
                        rest = &rest[len..];
                    } else if *field == Field::MonthName {
                        let (month, len) = match_month(rest, months)?;
                        fields.month = Some(month);
                        rest = &rest[len..];
                    } else {
                        let head = rest.get(..2)?;
                        if head.eq_ignore_ascii_case("AM") {
                            fields.pm = Some(false);
                        } else if head.eq_ignore_ascii_case("PM") {
                            fields.pm = Some(true);
                        } else {
                            return None;
                        }
                        rest = &rest[2..];
                    }
                }
            }
        }

        if rest.is_empty() { Some(fields) } else { None }
    }
}

fn match_month(s: &str, months: &[String; 12]) -> Option<(u32, usize)> {
    let mut best: Option<(u32, usize)> = None;
    for (i, name) in months.iter().enumerate() {
        let mut input = s.char_indices();
        let mut matched = 0;
        let mut ok = true;
        for expected in name.chars() {
            match input.next() {
                Some((pos, c)) if c.to_lowercase().eq(expected.to_lowercase()) => {
                    matched = pos + c.len_utf8();
                }
                _ => {
                    ok = false;
                    break;
                }
            }
        }
        if ok && matched > 0 && best.map(|(_, len)| matched > len).unwrap_or(true) {
            best = Some((i as u32 + 1, matched));
        }
    }
    best
}

#[derive(Default)]
struct ParsedFields {
    year: Option<i32>,
    two_digit_year: bool,
    month: Option<u32>,
    day: Option<u32>,
    hour: Option<u32>,
    hour12: bool,
    pm: Option<bool>,
    minute: Option<u32>,
    second: Option<u32>,
}

impl ParsedFields {
    fn set(&mut self, field: Field, width: usize, len: usize, value: u32) -> Option<()> {
        match field {
            Field::Year => {
                self.year = Some(value as i32);
                self.two_digit_year = width <= 2 && len == 2;
            }
            Field::Month => self.month = Some(value),
            Field::Day => self.day = Some(value),
            Field::Hour23 if value < 24 => self.hour = Some(value),
            Field::Hour24 if (1..=24).contains(&value) => self.hour = Some(value % 24),
            Field::Hour12 if (1..=12).contains(&value) => {
                self.hour = Some(value % 12);
                self.hour12 = true;
            }
            Field::Hour11 if value < 12 => {
                self.hour = Some(value);
                self.hour12 = true;
            }
            Field::Minute => self.minute = Some(value),
            Field::Second => self.second = Some(value),
            _ => return None,
        }
        Some(())
    }

    fn to_naive(&self, year: i32) -> Option<NaiveDateTime> {
        let mut hour = self.hour.unwrap_or(0);
        if self.hour12 && self.pm == Some(true) {
            hour += 12;
        }
        NaiveDate::from_ymd_opt(year, self.month?, self.day.unwrap_or(1))?.and_hms_opt(
            hour,
            self.minute.unwrap_or(0),
            self.second.unwrap_or(0),
        )
    }

    fn full_year(&self, now_year: i32) -> Option<i32> {
        let year = self.year?;
        if !self.two_digit_year {
            return Some(year);
        }
        // within 80 years before and 20 years after now
        let low = now_year - 80;
        let century = low - low.rem_euclid(100);
        let candidate = century + year;
        Some(if candidate < low {
            candidate + 100
        } else {
            candidate
        })
    }
}

/// Parser for the timestamps shown in directory listings.
///
/// Listings show a year for old entries and only a time for recent ones. The
/// recent format is tried first, a recent timestamp that lies in the future is
/// taken to be from the previous year.
#[derive(Clone, Debug)]
pub struct FtpTimestampParser {
    default_format: DateFormat,
    recent_format: Option<DateFormat>,
    months: [String; 12],
    offset: FixedOffset,
    lenient_future_dates: bool,
}

impl FtpTimestampParser {
    /// English month names and the local time zone.
    pub fn new(default_format: &str, recent_format: Option<&str>) -> Result<Self, FtpConfigError> {
        Ok(FtpTimestampParser {
            default_format: DateFormat::compile(default_format)?,
            recent_format: recent_format.map(DateFormat::compile).transpose()?,
            months: split_month_names(ENGLISH_MONTHS)?,
            offset: Local::now().offset().fix(),
            lenient_future_dates: false,
        })
    }

    /// Apply the listing config, with the given formats used where it sets none.
    pub fn with_config(
        config: &FtpListingConfig,
        default_format: &str,
        recent_format: Option<&str>,
    ) -> Result<Self, FtpConfigError> {
        let mut parser = FtpTimestampParser::new(
            config.default_date_format().unwrap_or(default_format),
            config.recent_date_format().or(recent_format),
        )?;

        if let Some(names) = config.short_month_names() {
            parser.months = split_month_names(names)?;
        } else if let Some(code) = config.server_language_code() {
            parser.months = split_month_names(language_months(code))?;
        }
        if let Some(tz) = config.server_time_zone() {
            parser.offset = parse_fixed_offset(tz)?;
        }
        parser.lenient_future_dates = config.lenient_future_dates();
        Ok(parser)
    }

    pub fn default_format(&self) -> &str {
        &self.default_format.pattern
    }

    pub fn recent_format(&self) -> Option<&str> {
        self.recent_format.as_ref().map(|f| f.pattern.as_str())
    }

    pub fn server_offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn parse_timestamp(&self, s: &str) -> Option<DateTime<FixedOffset>> {
        self.parse_timestamp_at(s, Utc::now())
    }

    /// Parse with `now` as the current server time.
    pub fn parse_timestamp_at(&self, s: &str, now: DateTime<Utc>) -> Option<DateTime<FixedOffset>> {
        let now = now.with_timezone(&self.offset);

        if let Some(recent) = &self.recent_format
            && let Some(fields) = recent.parse(s, &self.months)
        {
            let dt = if recent.has_year {
                fields
                    .full_year(now.year())
                    .and_then(|year| fields.to_naive(year))
            } else {
                self.resolve_recent(&fields, &now)
            };
            if let Some(dt) = dt {
                return self.offset.from_local_datetime(&dt).single();
            }
        }

        let fields = self.default_format.parse(s, &self.months)?;
        let year = if self.default_format.has_year {
            fields.full_year(now.year())?
        } else {
            now.year()
        };
        let dt = fields.to_naive(year)?;
        self.offset.from_local_datetime(&dt).single()
    }

    fn resolve_recent(
        &self,
        fields: &ParsedFields,
        now: &DateTime<FixedOffset>,
    ) -> Option<NaiveDateTime> {
        let mut limit = now.naive_local();
        if self.lenient_future_dates {
            limit = limit.checked_add_days(Days::new(1))?;
        }
        let this_year = fields.to_naive(now.year())?;
        if this_year <= limit {
            return Some(this_year);
        }
        // Feb 29 of a leap year rolls back to Feb 28
        fields.to_naive(now.year() - 1).or_else(|| {
            NaiveDate::from_ymd_opt(now.year() - 1, 2, 28).map(|d| d.and_time(this_year.time()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc_parser(default: &str, recent: Option<&str>) -> FtpTimestampParser {
        let mut config = FtpListingConfig::default();
        config.set_server_time_zone("UTC");
        config.set_lenient_future_dates(false);
        FtpTimestampParser::with_config(&config, default, recent).unwrap()
    }

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn time_zones() {
        assert_eq!(parse_fixed_offset("UTC").unwrap().local_minus_utc(), 0);
        assert_eq!(parse_fixed_offset("GMT").unwrap().local_minus_utc(), 0);
        assert_eq!(parse_fixed_offset("+08:00").unwrap().local_minus_utc(), 8 * 3600);
        assert_eq!(parse_fixed_offset("-0530").unwrap().local_minus_utc(), -19800);
        assert_eq!(parse_fixed_offset("GMT+8").unwrap().local_minus_utc(), 8 * 3600);
        assert!(parse_fixed_offset("Europe/Paris").is_err());
        assert!(parse_fixed_offset("+25:00").is_err());
    }

    #[test]
    fn invalid_config() {
        assert!(DateFormat::compile("MMM d yyyy").is_ok());
        assert!(DateFormat::compile("MMM d zzzz").is_err());
        assert!(DateFormat::compile("HH:mm").is_err());

        let mut config = FtpListingConfig::default();
        config.set_short_month_names("jan|feb");
        assert!(matches!(
            FtpTimestampParser::with_config(&config, "MMM d yyyy", None),
            Err(FtpConfigError::InvalidShortMonthNames(_))
        ));
    }

    #[test]
    fn default_format() {
        let p = utc_parser("MMM d yyyy", Some("MMM d HH:mm"));
        let now = at("2021-06-01T00:00:00Z");
        let ts = p.parse_timestamp_at("Mar 13  2010", now).unwrap();
        assert_eq!(ts, at("2010-03-13T00:00:00Z"));
        assert!(p.parse_timestamp_at("Foo 13 2010", now).is_none());
        assert!(p.parse_timestamp_at("Feb 30 2010", now).is_none());
        assert!(p.parse_timestamp_at("Mar 13 2010 extra", now).is_none());
    }

    #[test]
    fn recent_format() {
        let p = utc_parser("MMM d yyyy", Some("MMM d HH:mm"));
        let now = at("2021-06-01T12:00:00Z");
        let ts = p.parse_timestamp_at("Jan  5 10:20", now).unwrap();
        assert_eq!(ts, at("2021-01-05T10:20:00Z"));

        // in the future, so last year
        let ts = p.parse_timestamp_at("Dec 24 08:00", now).unwrap();
        assert_eq!(ts, at("2020-12-24T08:00:00Z"));
    }

    #[test]
    fn lenient_future() {
        let mut config = FtpListingConfig::default();
        config.set_server_time_zone("UTC");
        let p = FtpTimestampParser::with_config(&config, "MMM d yyyy", Some("MMM d HH:mm"))
            .unwrap();
        let now = at("2021-06-01T12:00:00Z");
        let ts = p.parse_timestamp_at("Jun  1 18:00", now).unwrap();
        assert_eq!(ts, at("2021-06-01T18:00:00Z"));
    }

    #[test]
    fn server_zone() {
        let mut config = FtpListingConfig::default();
        config.set_server_time_zone("+08:00");
        let p = FtpTimestampParser::with_config(&config, "yyyy-MM-dd HH:mm", None).unwrap();
        let ts = p.parse_timestamp("2020-01-02 08:30").unwrap();
        assert_eq!(ts.with_timezone(&Utc), at("2020-01-02T00:30:00Z"));
    }

    #[test]
    fn twelve_hour() {
        let p = utc_parser("MM-dd-yy hh:mma", None);
        let now = at("2021-06-01T00:00:00Z");
        let ts = p.parse_timestamp_at("11-09-01 12:30PM", now).unwrap();
        assert_eq!(ts, at("2001-11-09T12:30:00Z"));
        let ts = p.parse_timestamp_at("11-09-01 12:30AM", now).unwrap();
        assert_eq!(ts, at("2001-11-09T00:30:00Z"));
        let ts = p.parse_timestamp_at("05-20-97 03:04PM", now).unwrap();
        assert_eq!(ts, at("1997-05-20T15:04:00Z"));
        assert!(p.parse_timestamp_at("11-09-01 13:30PM", now).is_none());

        let p = utc_parser("MM-dd-yy kk:mm", None);
        let ts = p.parse_timestamp_at("11-09-01 17:30", now).unwrap();
        assert_eq!(ts, at("2001-11-09T17:30:00Z"));
    }

    #[test]
    fn month_names_by_language() {
        let mut config = FtpListingConfig::default();
        config.set_server_time_zone("UTC");
        config.set_server_language_code("fr");
        let p = FtpTimestampParser::with_config(&config, "d MMM yyyy", None).unwrap();
        let ts = p.parse_timestamp("3 fév 2010").unwrap();
        assert_eq!(ts, at("2010-02-03T00:00:00Z"));
        let ts = p.parse_timestamp("3 DÉC 2010").unwrap();
        assert_eq!(ts, at("2010-12-03T00:00:00Z"));
    }

    #[test]
    fn adjacent_numeric() {
        let p = utc_parser("yyyyMMddHHmm", None);
        let ts = p.parse_timestamp("202101021530").unwrap();
        assert_eq!(ts, at("2021-01-02T15:30:00Z"));
    }
}
