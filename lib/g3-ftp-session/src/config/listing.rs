/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

/// Settings for the directory listing entry parsers.
///
/// Unset date formats fall back to the defaults of the selected parser.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FtpListingConfig {
    server_system_key: String,
    default_date_format: Option<String>,
    recent_date_format: Option<String>,
    server_language_code: Option<String>,
    short_month_names: Option<String>,
    server_time_zone: Option<String>,
    lenient_future_dates: bool,
}

impl Default for FtpListingConfig {
    fn default() -> Self {
        FtpListingConfig::new(crate::system_key::UNIX)
    }
}

impl FtpListingConfig {
    pub fn new(server_system_key: &str) -> Self {
        FtpListingConfig {
            server_system_key: server_system_key.to_string(),
            default_date_format: None,
            recent_date_format: None,
            server_language_code: None,
            short_month_names: None,
            server_time_zone: None,
            lenient_future_dates: true,
        }
    }

    #[inline]
    pub fn server_system_key(&self) -> &str {
        &self.server_system_key
    }

    pub fn set_server_system_key(&mut self, key: &str) {
        self.server_system_key = key.to_string();
    }

    #[inline]
    pub fn default_date_format(&self) -> Option<&str> {
        self.default_date_format.as_deref()
    }

    /// Date format pattern like `MMM d yyyy`.
    pub fn set_default_date_format(&mut self, format: &str) {
        self.default_date_format = Some(format.to_string());
    }

    #[inline]
    pub fn recent_date_format(&self) -> Option<&str> {
        self.recent_date_format.as_deref()
    }

    /// Date format pattern without year for entries of the last year, like `MMM d HH:mm`.
    pub fn set_recent_date_format(&mut self, format: &str) {
        self.recent_date_format = Some(format.to_string());
    }

    #[inline]
    pub fn server_language_code(&self) -> Option<&str> {
        self.server_language_code.as_deref()
    }

    pub fn set_server_language_code(&mut self, code: &str) {
        self.server_language_code = Some(code.to_string());
    }

    #[inline]
    pub fn short_month_names(&self) -> Option<&str> {
        self.short_month_names.as_deref()
    }

    /// 12 month names separated by `|`, takes precedence over the language code.
    pub fn set_short_month_names(&mut self, names: &str) {
        self.short_month_names = Some(names.to_string());
    }

    #[inline]
    pub fn server_time_zone(&self) -> Option<&str> {
        self.server_time_zone.as_deref()
    }

    /// `UTC`, `GMT`, `+08:00`, `-0500` or `GMT+08:00`, the local zone is used if not set.
    pub fn set_server_time_zone(&mut self, tz: &str) {
        self.server_time_zone = Some(tz.to_string());
    }

    #[inline]
    pub fn lenient_future_dates(&self) -> bool {
        self.lenient_future_dates
    }

    pub fn set_lenient_future_dates(&mut self, lenient: bool) {
        self.lenient_future_dates = lenient;
    }
}
