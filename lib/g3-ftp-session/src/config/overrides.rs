/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::collections::HashMap;

/// Remap of SYST reply strings to entry parser keys.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SystemTypeOverrides {
    inner: HashMap<String, String>,
}

impl SystemTypeOverrides {
    pub fn insert(&mut self, system_type: &str, parser_key: &str) {
        self.inner
            .insert(system_type.to_string(), parser_key.to_string());
    }

    pub fn get(&self, system_type: &str) -> Option<&str> {
        self.inner.get(system_type).map(|s| s.as_str())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Load from properties style text.
    ///
    /// Keys may contain escaped separators, e.g. `UNIX\ Type\:\ L8=UNIX`.
    pub fn parse_properties(text: &str) -> Self {
        let mut overrides = SystemTypeOverrides::default();
        for line in text.lines() {
            let line = line.trim_start();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }

            let mut key = String::with_capacity(line.len());
            let mut chars = line.chars();
            let mut separator = None;
            while let Some(c) = chars.next() {
                match c {
                    '\\' => {
                        if let Some(escaped) = chars.next() {
                            key.push(escaped);
                        }
                    }
                    c if c == '=' || c == ':' || c.is_whitespace() => {
                        separator = Some(c);
                        break;
                    }
                    c => key.push(c),
                }
            }

            let value = match separator {
                Some(c) if c.is_whitespace() => {
                    // a key ended by whitespace may still be followed by one `=` or `:`
                    let rest = chars.as_str().trim_start();
                    rest.strip_prefix(['=', ':']).unwrap_or(rest).trim()
                }
                Some(_) => chars.as_str().trim(),
                None => "",
            };
            overrides.inner.insert(key, value.to_string());
        }
        overrides
    }
}
