/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::net::IpAddr;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, anyhow};
use humanize_rs::ParseError;
use humanize_rs::bytes::Bytes;
use yaml_rust::{Yaml, yaml};

pub(super) fn foreach_kv<F>(table: &yaml::Hash, mut f: F) -> anyhow::Result<()>
where
    F: FnMut(&str, &Yaml) -> anyhow::Result<()>,
{
    for (k, v) in table.iter() {
        if let Yaml::String(key) = k {
            f(key, v).context(format!("failed to parse value of key {key}"))?;
        } else {
            return Err(anyhow!("key in hash should be string"));
        }
    }
    Ok(())
}

pub(super) fn normalize_key(raw: &str) -> String {
    raw.to_lowercase().replace('-', "_")
}

pub(super) fn as_duration(v: &Yaml) -> anyhow::Result<Duration> {
    match v {
        Yaml::String(value) => match humanize_rs::duration::parse(value) {
            Ok(v) => Ok(v),
            Err(ParseError::MissingUnit) => {
                if let Ok(u) = u64::from_str(value) {
                    Ok(Duration::from_secs(u))
                } else {
                    Err(anyhow!("invalid duration string"))
                }
            }
            Err(e) => Err(anyhow!("invalid humanize duration string: {e}")),
        },
        Yaml::Integer(value) => {
            if let Ok(u) = u64::try_from(*value) {
                Ok(Duration::from_secs(u))
            } else {
                Err(anyhow!("unsupported duration string"))
            }
        }
        _ => Err(anyhow!(
            "yaml value type for humanize duration should be 'string' or 'integer'"
        )),
    }
}

pub(super) fn as_humanize_usize(v: &Yaml) -> anyhow::Result<usize> {
    match v {
        Yaml::String(value) => {
            let v = value.parse::<Bytes>()?;
            Ok(v.size())
        }
        Yaml::Integer(value) => Ok(usize::try_from(*value)?),
        _ => Err(anyhow!(
            "yaml value type for humanize usize should be 'string' or 'integer'"
        )),
    }
}

pub(super) fn as_usize(v: &Yaml) -> anyhow::Result<usize> {
    match v {
        Yaml::String(s) => Ok(usize::from_str(s)?),
        Yaml::Integer(i) => Ok(usize::try_from(*i)?),
        _ => Err(anyhow!(
            "yaml value type for 'usize' should be 'string' or 'integer'"
        )),
    }
}

pub(super) fn as_u16(v: &Yaml) -> anyhow::Result<u16> {
    match v {
        Yaml::String(s) => Ok(u16::from_str(s)?),
        Yaml::Integer(i) => Ok(u16::try_from(*i)?),
        _ => Err(anyhow!(
            "yaml value type for 'u16' should be 'string' or 'integer'"
        )),
    }
}

pub(super) fn as_bool(v: &Yaml) -> anyhow::Result<bool> {
    match v {
        Yaml::String(s) => match s.to_lowercase().as_str() {
            "on" | "true" | "yes" | "1" => Ok(true),
            "off" | "false" | "no" | "0" => Ok(false),
            _ => Err(anyhow!("invalid yaml string value for 'bool': {s}")),
        },
        Yaml::Boolean(value) => Ok(*value),
        Yaml::Integer(i) => Ok(*i != 0),
        _ => Err(anyhow!(
            "yaml value type for 'bool' should be 'boolean' / 'string' / 'integer'"
        )),
    }
}

pub(super) fn as_string(v: &Yaml) -> anyhow::Result<String> {
    match v {
        Yaml::String(s) => Ok(s.to_string()),
        Yaml::Integer(i) => Ok(i.to_string()),
        _ => Err(anyhow!(
            "yaml value type for string should be 'string' or 'integer'"
        )),
    }
}

pub(super) fn as_ip_addr(v: &Yaml) -> anyhow::Result<IpAddr> {
    if let Yaml::String(s) = v {
        IpAddr::from_str(s).map_err(|e| anyhow!("invalid ip address {s}: {e}"))
    } else {
        Err(anyhow!("yaml value type for ip address should be 'string'"))
    }
}
