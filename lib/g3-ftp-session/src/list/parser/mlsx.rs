/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use super::FtpEntryParser;
use crate::list::{FtpAccess, FtpFile, FtpFileKind, FtpPermission};
use crate::time_val;

/// Parser for the RFC 3659 MLSD / MLST fact lines, like
/// `type=file;size=1024;modify=20210525083610; name`.
#[derive(Clone, Copy, Debug, Default)]
pub struct MlsxEntryParser;

impl MlsxEntryParser {
    fn set_unix_mode(file: &mut FtpFile, mode: &str) {
        // only the last 3 octal digits matter
        let Some(digits) = mode.get(mode.len().saturating_sub(3)..) else {
            return;
        };
        for (access, c) in [FtpAccess::User, FtpAccess::Group, FtpAccess::World]
            .into_iter()
            .zip(digits.chars())
        {
            let Some(bits) = c.to_digit(8) else {
                continue;
            };
            file.set_permission(access, FtpPermission::Read, bits & 0b100 != 0);
            file.set_permission(access, FtpPermission::Write, bits & 0b010 != 0);
            file.set_permission(access, FtpPermission::Execute, bits & 0b001 != 0);
        }
    }

    fn set_perm_fact(file: &mut FtpFile, perm: &str) {
        for c in perm.chars() {
            let permission = match c.to_ascii_lowercase() {
                'a' | 'c' | 'd' | 'm' | 'p' | 'w' => FtpPermission::Write,
                'e' | 'r' => FtpPermission::Read,
                'l' => FtpPermission::Execute,
                _ => continue,
            };
            file.set_permission(FtpAccess::User, permission, true);
        }
    }
}

impl FtpEntryParser for MlsxEntryParser {
    fn parse_entry(&self, entry: &str) -> Option<FtpFile> {
        // the path may contain spaces
        let (facts, name) = entry.split_once(' ')?;

        let mut file = FtpFile::new(entry);
        file.set_name(name);

        let has_unix_mode = facts.to_ascii_lowercase().contains("unix.mode=");
        for fact in facts.split(';') {
            let Some((key, value)) = fact.split_once('=') else {
                continue;
            };
            if value.contains('=') {
                continue;
            }
            match key.to_ascii_lowercase().as_str() {
                "size" | "sizd" => {
                    if let Ok(size) = value.parse() {
                        file.set_size(size);
                    }
                }
                "modify" => {
                    // a bad modify fact invalidates the whole entry
                    let dt = time_val::parse_from_str(value).ok()?;
                    file.set_timestamp(dt.fixed_offset());
                }
                "type" => {
                    let kind = match value.to_ascii_lowercase().as_str() {
                        "file" => FtpFileKind::File,
                        "dir" | "cdir" | "pdir" => FtpFileKind::Directory,
                        _ => FtpFileKind::Unknown,
                    };
                    file.set_kind(kind);
                }
                "unix.owner" => file.set_user(value),
                "unix.group" => file.set_group(value),
                "unix.mode" => Self::set_unix_mode(&mut file, value),
                "perm" if !has_unix_mode => Self::set_perm_fact(&mut file, value),
                _ => {}
            }
        }
        Some(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[test]
    fn file_facts() {
        let f = MlsxEntryParser
            .parse_entry("type=file;size=1024;modify=20210525083610;perm=adfrw; my file.txt")
            .unwrap();
        assert!(f.is_file());
        assert_eq!(f.name(), "my file.txt");
        assert_eq!(f.size(), 1024);
        let expected = DateTime::parse_from_rfc3339("2021-05-25T08:36:10+00:00").unwrap();
        assert_eq!(f.timestamp(), Some(&expected));
        assert!(f.has_permission(FtpAccess::User, FtpPermission::Read));
        assert!(f.has_permission(FtpAccess::User, FtpPermission::Write));
        assert!(!f.has_permission(FtpAccess::User, FtpPermission::Execute));
    }

    #[test]
    fn unix_mode_wins() {
        let f = MlsxEntryParser
            .parse_entry(
                "modify=20100313224553;perm=;type=dir;unique=811U282598;UNIX.group=500;UNIX.mode=0750;UNIX.owner=501; subversion",
            )
            .unwrap();
        assert!(f.is_directory());
        assert_eq!(f.user(), "501");
        assert_eq!(f.group(), "500");
        assert!(f.has_permission(FtpAccess::User, FtpPermission::Write));
        assert!(f.has_permission(FtpAccess::Group, FtpPermission::Execute));
        assert!(!f.has_permission(FtpAccess::Group, FtpPermission::Write));
        assert!(!f.has_permission(FtpAccess::World, FtpPermission::Read));
    }

    #[test]
    fn sizd_and_malformed() {
        let f = MlsxEntryParser
            .parse_entry("type=pdir;sizd=4096;bogus; ..")
            .unwrap();
        assert!(f.is_directory());
        assert_eq!(f.size(), 4096);
        assert!(f.timestamp().is_none());

        assert!(MlsxEntryParser.parse_entry("nospace").is_none());
    }

    #[test]
    fn bad_modify_rejected() {
        assert!(
            MlsxEntryParser
                .parse_entry("type=file;size=10;modify=notatime; a.txt")
                .is_none()
        );
        assert!(
            MlsxEntryParser
                .parse_entry("type=file;modify=20211345000000; a.txt")
                .is_none()
        );
    }
}
