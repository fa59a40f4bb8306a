/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use chrono::format::{Fixed, Item, Numeric, Pad, Parsed, parse};
use chrono::{DateTime, ParseResult, Utc};

/// RFC 3659 time-val, `YYYYMMDDHHMMSS[.sss]`, always in UTC.
const RFC3659_TIME_VAL: &[Item<'static>] = &[
    Item::Numeric(Numeric::Year, Pad::Zero),
    Item::Numeric(Numeric::Month, Pad::Zero),
    Item::Numeric(Numeric::Day, Pad::Zero),
    Item::Numeric(Numeric::Hour, Pad::Zero),
    Item::Numeric(Numeric::Minute, Pad::Zero),
    Item::Numeric(Numeric::Second, Pad::Zero),
    Item::Fixed(Fixed::Nanosecond),
];

#[inline]
pub(crate) fn parse_from_str(s: &str) -> ParseResult<DateTime<Utc>> {
    let mut parsed = Parsed::new();
    parse(&mut parsed, s, RFC3659_TIME_VAL.iter())?;
    parsed.to_datetime_with_timezone(&Utc)
}

#[inline]
pub(crate) fn format(dt: &DateTime<Utc>) -> String {
    dt.format("%Y%m%d%H%M%S").to_string()
}
