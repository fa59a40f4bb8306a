/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::str::FromStr;

use anyhow::{Context, anyhow};
use yaml_rust::Yaml;

use super::{FtpClientConfig, FtpControlConfig, FtpListingConfig, FtpTransferConfig};
use crate::control::FtpControlEncoding;

mod value;
use value::normalize_key;

impl FtpControlConfig {
    pub fn parse_yaml(value: &Yaml) -> anyhow::Result<Self> {
        if let Yaml::Hash(map) = value {
            let mut config = FtpControlConfig::default();
            value::foreach_kv(map, |k, v| match normalize_key(k).as_str() {
                "max_line_len" | "max_line_length" => {
                    config.max_line_len = value::as_humanize_usize(v)
                        .context(format!("invalid humanize usize value for key {k}"))?;
                    Ok(())
                }
                "max_multi_lines" => {
                    config.max_multi_lines = value::as_usize(v)
                        .context(format!("invalid usize value for key {k}"))?;
                    Ok(())
                }
                "strict_multiline" | "strict_multiline_parsing" => {
                    config.strict_multiline =
                        value::as_bool(v).context(format!("invalid bool value for key {k}"))?;
                    Ok(())
                }
                "command_timeout" => {
                    config.command_timeout = value::as_duration(v)
                        .context(format!("invalid humanize duration value for key {k}"))?;
                    Ok(())
                }
                "encoding" => {
                    let s = value::as_string(v)
                        .context(format!("invalid string value for key {k}"))?;
                    config.encoding = FtpControlEncoding::from_str(&s)
                        .map_err(|_| anyhow!("unsupported control encoding {s}"))?;
                    Ok(())
                }
                _ => Err(anyhow!("invalid key {k}")),
            })?;
            Ok(config)
        } else {
            Err(anyhow!("invalid yaml type"))
        }
    }
}

impl FtpTransferConfig {
    pub fn parse_yaml(value: &Yaml) -> anyhow::Result<Self> {
        if let Yaml::Hash(map) = value {
            let mut config = FtpTransferConfig::default();
            value::foreach_kv(map, |k, v| match normalize_key(k).as_str() {
                "buffer_size" => {
                    config.buffer_size = value::as_humanize_usize(v)
                        .context(format!("invalid humanize usize value for key {k}"))?;
                    Ok(())
                }
                "data_timeout" => {
                    let timeout = value::as_duration(v)
                        .context(format!("invalid humanize duration value for key {k}"))?;
                    config.data_timeout = (!timeout.is_zero()).then_some(timeout);
                    Ok(())
                }
                "list_max_line_len" | "list_max_line_length" => {
                    config.list_max_line_len = value::as_humanize_usize(v)
                        .context(format!("invalid humanize usize value for key {k}"))?;
                    Ok(())
                }
                "list_max_entries" => {
                    config.list_max_entries = value::as_usize(v)
                        .context(format!("invalid usize value for key {k}"))?;
                    Ok(())
                }
                "control_keepalive_timeout" | "keepalive_timeout" => {
                    let timeout = value::as_duration(v)
                        .context(format!("invalid humanize duration value for key {k}"))?;
                    config.control_keepalive_timeout = (!timeout.is_zero()).then_some(timeout);
                    Ok(())
                }
                "control_keepalive_reply_timeout" | "keepalive_reply_timeout" => {
                    config.control_keepalive_reply_timeout = value::as_duration(v)
                        .context(format!("invalid humanize duration value for key {k}"))?;
                    Ok(())
                }
                _ => Err(anyhow!("invalid key {k}")),
            })?;
            Ok(config)
        } else {
            Err(anyhow!("invalid yaml type"))
        }
    }
}

impl FtpClientConfig {
    pub fn parse_yaml(value: &Yaml) -> anyhow::Result<Self> {
        if let Yaml::Hash(map) = value {
            let mut config = FtpClientConfig::default();
            value::foreach_kv(map, |k, v| match normalize_key(k).as_str() {
                "control" => {
                    config.control = FtpControlConfig::parse_yaml(v).context(format!(
                        "invalid ftp control connection config value for key {k}"
                    ))?;
                    Ok(())
                }
                "transfer" => {
                    config.transfer = FtpTransferConfig::parse_yaml(v).context(format!(
                        "invalid ftp transfer connection config value for key {k}"
                    ))?;
                    Ok(())
                }
                "connect_timeout" => {
                    config.connect_timeout = value::as_duration(v)
                        .context(format!("invalid humanize duration value for key {k}"))?;
                    Ok(())
                }
                "greeting_timeout" => {
                    config.greeting_timeout = value::as_duration(v)
                        .context(format!("invalid humanize duration value for key {k}"))?;
                    Ok(())
                }
                "use_epsv_with_ipv4" | "always_try_epsv" => {
                    config.use_epsv_with_ipv4 =
                        value::as_bool(v).context(format!("invalid bool value for key {k}"))?;
                    Ok(())
                }
                "remote_verification" => {
                    config.remote_verification =
                        value::as_bool(v).context(format!("invalid bool value for key {k}"))?;
                    Ok(())
                }
                "autodetect_utf8" => {
                    config.autodetect_utf8 =
                        value::as_bool(v).context(format!("invalid bool value for key {k}"))?;
                    Ok(())
                }
                "active_port_range" => {
                    let (min, max) = parse_port_range(v)
                        .context(format!("invalid port range value for key {k}"))?;
                    config.set_active_port_range(min, max);
                    Ok(())
                }
                "active_external_ip" => {
                    let ip = value::as_ip_addr(v)
                        .context(format!("invalid ip address value for key {k}"))?;
                    config.active_external_ip = Some(ip);
                    Ok(())
                }
                "report_active_external_ip" => {
                    let ip = value::as_ip_addr(v)
                        .context(format!("invalid ip address value for key {k}"))?;
                    config.report_active_external_ip = Some(ip);
                    Ok(())
                }
                "list_hidden_files" => {
                    config.list_hidden_files =
                        value::as_bool(v).context(format!("invalid bool value for key {k}"))?;
                    Ok(())
                }
                "system_type" => {
                    let s = value::as_string(v)
                        .context(format!("invalid string value for key {k}"))?;
                    config.system_type = Some(s);
                    Ok(())
                }
                "default_system_type" => {
                    let s = value::as_string(v)
                        .context(format!("invalid string value for key {k}"))?;
                    config.default_system_type = Some(s);
                    Ok(())
                }
                _ => Err(anyhow!("invalid key {k}")),
            })?;
            Ok(config)
        } else {
            Err(anyhow!("invalid yaml type"))
        }
    }
}

fn parse_port_range(v: &Yaml) -> anyhow::Result<(u16, u16)> {
    match v {
        Yaml::String(s) => {
            let Some((min, max)) = s.split_once('-') else {
                return Err(anyhow!("no '-' delimiter found in {s}"));
            };
            let min = u16::from_str(min.trim()).map_err(|e| anyhow!("invalid min port: {e}"))?;
            let max = u16::from_str(max.trim()).map_err(|e| anyhow!("invalid max port: {e}"))?;
            if min > max {
                return Err(anyhow!("min port {min} is greater than max port {max}"));
            }
            Ok((min, max))
        }
        Yaml::Hash(map) => {
            let mut min = 0;
            let mut max = 0;
            value::foreach_kv(map, |k, v| match normalize_key(k).as_str() {
                "min" | "start" => {
                    min = value::as_u16(v)?;
                    Ok(())
                }
                "max" | "end" => {
                    max = value::as_u16(v)?;
                    Ok(())
                }
                _ => Err(anyhow!("invalid key {k}")),
            })?;
            if min > max {
                return Err(anyhow!("min port {min} is greater than max port {max}"));
            }
            Ok((min, max))
        }
        _ => Err(anyhow!(
            "yaml value type for port range should be 'string' or 'map'"
        )),
    }
}

impl FtpListingConfig {
    pub fn parse_yaml(value: &Yaml) -> anyhow::Result<Self> {
        match value {
            Yaml::String(key) => Ok(FtpListingConfig::new(key)),
            Yaml::Hash(map) => {
                let mut config = FtpListingConfig::default();
                value::foreach_kv(map, |k, v| {
                    let as_string =
                        || value::as_string(v).context(format!("invalid string value for key {k}"));
                    match normalize_key(k).as_str() {
                        "server_system_key" | "system_key" => {
                            config.set_server_system_key(&as_string()?)
                        }
                        "default_date_format" => config.set_default_date_format(&as_string()?),
                        "recent_date_format" => config.set_recent_date_format(&as_string()?),
                        "server_language_code" | "language_code" => {
                            config.set_server_language_code(&as_string()?)
                        }
                        "short_month_names" => config.set_short_month_names(&as_string()?),
                        "server_time_zone" | "time_zone" => {
                            config.set_server_time_zone(&as_string()?)
                        }
                        "lenient_future_dates" => {
                            let lenient = value::as_bool(v)
                                .context(format!("invalid bool value for key {k}"))?;
                            config.set_lenient_future_dates(lenient);
                        }
                        _ => return Err(anyhow!("invalid key {k}")),
                    }
                    Ok(())
                })?;
                Ok(config)
            }
            _ => Err(anyhow!("invalid yaml type")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use yaml_rust::YamlLoader;

    macro_rules! yaml_doc {
        ($s:expr) => {
            YamlLoader::load_from_str($s)
                .unwrap()
                .into_iter()
                .next()
                .unwrap()
        };
    }

    #[test]
    fn ftp_control_config_parse_ok() {
        let yaml = yaml_doc!(
            r#"
                max_line_len: "2KB"
                max_multi_lines: 256
                command_timeout: "30s"
                strict-multiline: true
                encoding: utf8
            "#
        );
        let config = FtpControlConfig::parse_yaml(&yaml).unwrap();
        assert_eq!(config.max_line_len, 2000);
        assert_eq!(config.max_multi_lines, 256);
        assert_eq!(config.command_timeout, Duration::from_secs(30));
        assert!(config.strict_multiline);
        assert_eq!(config.encoding, FtpControlEncoding::Utf8);

        let yaml = yaml_doc!(
            r#"
                max_line_length: "1KB"
            "#
        );
        let config = FtpControlConfig::parse_yaml(&yaml).unwrap();
        assert_eq!(config.max_line_len, 1000);
    }

    #[test]
    fn ftp_control_config_parse_err() {
        let yaml = yaml_doc!(
            r#"
                invalid_key: "value"
            "#
        );
        assert!(FtpControlConfig::parse_yaml(&yaml).is_err());

        let yaml = yaml_doc!(
            r#"
                max_multi_lines: -1
            "#
        );
        assert!(FtpControlConfig::parse_yaml(&yaml).is_err());

        let yaml = yaml_doc!(
            r#"
                encoding: ebcdic
            "#
        );
        assert!(FtpControlConfig::parse_yaml(&yaml).is_err());

        let yaml = Yaml::String("invalid".to_string());
        assert!(FtpControlConfig::parse_yaml(&yaml).is_err());
    }

    #[test]
    fn ftp_transfer_config_parse_ok() {
        let yaml = yaml_doc!(
            r#"
                buffer_size: "64KB"
                data_timeout: "2m"
                list_max_line_len: "4KB"
                list_max_entries: 2048
                control_keepalive_timeout: "5m"
                control_keepalive_reply_timeout: "500ms"
            "#
        );
        let config = FtpTransferConfig::parse_yaml(&yaml).unwrap();
        assert_eq!(config.buffer_size, 64000);
        assert_eq!(config.data_timeout, Some(Duration::from_secs(120)));
        assert_eq!(config.list_max_line_len, 4000);
        assert_eq!(config.list_max_entries, 2048);
        assert_eq!(
            config.control_keepalive_timeout,
            Some(Duration::from_secs(300))
        );
        assert_eq!(
            config.control_keepalive_reply_timeout,
            Duration::from_millis(500)
        );

        let yaml = yaml_doc!(
            r#"
                data_timeout: 0
            "#
        );
        let config = FtpTransferConfig::parse_yaml(&yaml).unwrap();
        assert!(config.data_timeout.is_none());
    }

    #[test]
    fn ftp_transfer_config_parse_err() {
        let yaml = yaml_doc!(
            r#"
                list_max_entries: -2048
            "#
        );
        assert!(FtpTransferConfig::parse_yaml(&yaml).is_err());

        let yaml = yaml_doc!(
            r#"
                control_keepalive_timeout: "5x"
            "#
        );
        assert!(FtpTransferConfig::parse_yaml(&yaml).is_err());

        let yaml = Yaml::Integer(1);
        assert!(FtpTransferConfig::parse_yaml(&yaml).is_err());
    }

    #[test]
    fn ftp_client_config_parse_ok() {
        let yaml = yaml_doc!(
            r#"
                control:
                  max_line_len: "2KB"
                  max_multi_lines: 128
                  command_timeout: "15s"
                transfer:
                  list_max_line_len: "4KB"
                  list_max_entries: 1024
                connect_timeout: "10s"
                greeting_timeout: "5s"
                use_epsv_with_ipv4: true
                remote_verification: false
                autodetect_utf8: yes
                active_port_range: "40000-40100"
                active_external_ip: "192.0.2.1"
                report_active_external_ip: "198.51.100.1"
                list_hidden_files: true
                system_type: "UNIX"
                default_system_type: "WINDOWS"
            "#
        );
        let config = FtpClientConfig::parse_yaml(&yaml).unwrap();
        assert_eq!(config.control.max_line_len, 2000);
        assert_eq!(config.control.max_multi_lines, 128);
        assert_eq!(config.control.command_timeout, Duration::from_secs(15));
        assert_eq!(config.transfer.list_max_line_len, 4000);
        assert_eq!(config.transfer.list_max_entries, 1024);
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.greeting_timeout, Duration::from_secs(5));
        assert!(config.use_epsv_with_ipv4);
        assert!(!config.remote_verification);
        assert!(config.autodetect_utf8);
        assert_eq!(config.active_port_range(), (40000, 40100));
        assert_eq!(
            config.active_external_ip,
            Some("192.0.2.1".parse().unwrap())
        );
        assert_eq!(
            config.report_active_external_ip,
            Some("198.51.100.1".parse().unwrap())
        );
        assert!(config.list_hidden_files);
        assert_eq!(config.system_type.as_deref(), Some("UNIX"));
        assert_eq!(config.default_system_type.as_deref(), Some("WINDOWS"));

        let yaml = yaml_doc!(
            r#"
                active_port_range:
                  min: 50000
                  max: 50010
            "#
        );
        let config = FtpClientConfig::parse_yaml(&yaml).unwrap();
        assert_eq!(config.active_port_range(), (50000, 50010));
    }

    #[test]
    fn ftp_client_config_parse_err() {
        let yaml = yaml_doc!(
            r#"
                control: "invalid"
            "#
        );
        assert!(FtpClientConfig::parse_yaml(&yaml).is_err());

        let yaml = yaml_doc!(
            r#"
                active_port_range: "50010-50000"
            "#
        );
        assert!(FtpClientConfig::parse_yaml(&yaml).is_err());

        let yaml = yaml_doc!(
            r#"
                active_external_ip: "not an ip"
            "#
        );
        assert!(FtpClientConfig::parse_yaml(&yaml).is_err());

        let yaml = yaml_doc!(
            r#"
                remote_verification: "not_a_boolean"
            "#
        );
        assert!(FtpClientConfig::parse_yaml(&yaml).is_err());
    }

    #[test]
    fn ftp_listing_config_parse() {
        let yaml = Yaml::String("WINDOWS".to_string());
        let config = FtpListingConfig::parse_yaml(&yaml).unwrap();
        assert_eq!(config.server_system_key(), "WINDOWS");

        let yaml = yaml_doc!(
            r#"
                recent_date_format: "d MMM HH:mm"
                system_key: "UNIX"
                language_code: "de"
                time_zone: "+01:00"
                lenient_future_dates: false
            "#
        );
        let config = FtpListingConfig::parse_yaml(&yaml).unwrap();
        assert_eq!(config.server_system_key(), "UNIX");
        assert_eq!(config.recent_date_format(), Some("d MMM HH:mm"));
        assert_eq!(config.server_language_code(), Some("de"));
        assert_eq!(config.server_time_zone(), Some("+01:00"));
        assert!(!config.lenient_future_dates());

        let yaml = yaml_doc!(
            r#"
                unknown: "x"
            "#
        );
        assert!(FtpListingConfig::parse_yaml(&yaml).is_err());
    }
}
