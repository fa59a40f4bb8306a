/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::collections::HashMap;

use log::debug;

use super::FtpClient;
use crate::connection::FtpConnectionProvider;
use crate::control::reply_code;
use crate::error::FtpError;

/// Parse the feature lines of a FEAT reply, each starts with a single space.
fn parse_feature_lines(lines: &[String]) -> HashMap<String, Vec<String>> {
    let mut map: HashMap<String, Vec<String>> = HashMap::new();
    for line in lines {
        let Some(entry) = line.strip_prefix(' ') else {
            continue;
        };
        let (key, value) = entry.split_once(' ').unwrap_or((entry, ""));
        let values = map.entry(key.to_ascii_uppercase()).or_default();
        if !values.iter().any(|v| v == value) {
            values.push(value.to_string());
        }
    }
    map
}

impl<P: FtpConnectionProvider> FtpClient<P> {
    /// Send FEAT, `true` on positive completion. The reply is not cached.
    pub async fn features(&mut self) -> Result<bool, FtpError> {
        let code = self.feat().await?;
        Ok(reply_code::is_positive_completion(code))
    }

    /// Returns `false` if FEAT failed, the failure is cached as well.
    async fn init_feature_map(&mut self) -> Result<bool, FtpError> {
        if self.state.features.is_some() {
            return Ok(self.state.features_ok);
        }

        let code = self.feat().await?;
        if !reply_code::is_positive_completion(code) {
            debug!("FEAT rejected with reply code {code}, treat as no feature");
            self.state.features = Some(HashMap::new());
            self.state.features_ok = false;
            return Ok(false);
        }
        self.state.features = Some(parse_feature_lines(self.reply_lines()));
        self.state.features_ok = true;
        Ok(true)
    }

    /// The values of the feature, empty strings for features without value.
    ///
    /// FEAT is sent at most once per connection.
    pub async fn feature_values(&mut self, feature: &str) -> Result<Option<Vec<String>>, FtpError> {
        if !self.init_feature_map().await? {
            return Ok(None);
        }
        Ok(self
            .state
            .features
            .as_ref()
            .and_then(|m| m.get(&feature.to_ascii_uppercase()))
            .cloned())
    }

    pub async fn feature_value(&mut self, feature: &str) -> Result<Option<String>, FtpError> {
        let values = self.feature_values(feature).await?;
        Ok(values.and_then(|v| v.into_iter().next()))
    }

    pub async fn has_feature(&mut self, feature: &str) -> Result<bool, FtpError> {
        if !self.init_feature_map().await? {
            return Ok(false);
        }
        Ok(self
            .state
            .features
            .as_ref()
            .is_some_and(|m| m.contains_key(&feature.to_ascii_uppercase())))
    }

    /// Check for a feature with the given value, e.g. `AUTH TLS`.
    pub async fn has_feature_value(&mut self, feature: &str, value: &str) -> Result<bool, FtpError> {
        let values = self.feature_values(feature).await?;
        Ok(values.is_some_and(|v| v.iter().any(|s| s == value)))
    }
}
