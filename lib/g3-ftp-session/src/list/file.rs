/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::fmt;
use std::fmt::Write;

use chrono::{DateTime, FixedOffset};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FtpFileKind {
    File,
    Directory,
    SymbolicLink,
    #[default]
    Unknown,
}

impl FtpFileKind {
    fn type_char(&self) -> char {
        match self {
            FtpFileKind::File => '-',
            FtpFileKind::Directory => 'd',
            FtpFileKind::SymbolicLink => 'l',
            FtpFileKind::Unknown => '?',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FtpAccess {
    User = 0,
    Group = 1,
    World = 2,
}

impl FtpAccess {
    const ALL: [FtpAccess; 3] = [FtpAccess::User, FtpAccess::Group, FtpAccess::World];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FtpPermission {
    Read = 0,
    Write = 1,
    Execute = 2,
}

/// One entry of a directory listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FtpFile {
    kind: FtpFileKind,
    name: String,
    link: Option<String>,
    size: i64,
    hard_link_count: u32,
    user: String,
    group: String,
    timestamp: Option<DateTime<FixedOffset>>,
    permissions: [[bool; 3]; 3],
    raw_listing: String,
}

impl FtpFile {
    pub fn new(raw_listing: &str) -> Self {
        FtpFile {
            kind: FtpFileKind::Unknown,
            name: String::new(),
            link: None,
            size: -1,
            hard_link_count: 0,
            user: String::new(),
            group: String::new(),
            timestamp: None,
            permissions: [[false; 3]; 3],
            raw_listing: raw_listing.to_string(),
        }
    }

    #[inline]
    pub fn kind(&self) -> FtpFileKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: FtpFileKind) {
        self.kind = kind;
    }

    #[inline]
    pub fn is_file(&self) -> bool {
        self.kind == FtpFileKind::File
    }

    #[inline]
    pub fn is_directory(&self) -> bool {
        self.kind == FtpFileKind::Directory
    }

    #[inline]
    pub fn is_symbolic_link(&self) -> bool {
        self.kind == FtpFileKind::SymbolicLink
    }

    #[inline]
    pub fn is_unknown(&self) -> bool {
        self.kind == FtpFileKind::Unknown
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// The target of a symbolic link.
    #[inline]
    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    pub fn set_link(&mut self, link: &str) {
        self.link = Some(link.to_string());
    }

    /// The size in bytes, `-1` if unknown.
    #[inline]
    pub fn size(&self) -> i64 {
        self.size
    }

    pub fn set_size(&mut self, size: i64) {
        self.size = size;
    }

    #[inline]
    pub fn hard_link_count(&self) -> u32 {
        self.hard_link_count
    }

    pub fn set_hard_link_count(&mut self, count: u32) {
        self.hard_link_count = count;
    }

    #[inline]
    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn set_user(&mut self, user: &str) {
        self.user = user.to_string();
    }

    #[inline]
    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn set_group(&mut self, group: &str) {
        self.group = group.to_string();
    }

    #[inline]
    pub fn timestamp(&self) -> Option<&DateTime<FixedOffset>> {
        self.timestamp.as_ref()
    }

    pub fn set_timestamp(&mut self, timestamp: DateTime<FixedOffset>) {
        self.timestamp = Some(timestamp);
    }

    #[inline]
    pub fn has_permission(&self, access: FtpAccess, permission: FtpPermission) -> bool {
        self.permissions[access as usize][permission as usize]
    }

    pub fn set_permission(&mut self, access: FtpAccess, permission: FtpPermission, value: bool) {
        self.permissions[access as usize][permission as usize] = value;
    }

    #[inline]
    pub fn raw_listing(&self) -> &str {
        &self.raw_listing
    }

    /// Render the entry like `ls -l` does, with an ISO timestamp.
    pub fn to_formatted_string(&self) -> String {
        let mut s = String::with_capacity(64 + self.name.len());
        s.push(self.kind.type_char());
        for access in FtpAccess::ALL {
            let perms = &self.permissions[access as usize];
            s.push(if perms[0] { 'r' } else { '-' });
            s.push(if perms[1] { 'w' } else { '-' });
            s.push(if perms[2] { 'x' } else { '-' });
        }
        let _ = write!(
            s,
            " {:>4} {:<8} {:<8} {:>8}",
            self.hard_link_count, self.user, self.group, self.size
        );
        if let Some(ts) = &self.timestamp {
            let _ = write!(s, " {}", ts.format("%Y-%m-%d %H:%M:%S %:z"));
        }
        s.push(' ');
        s.push_str(&self.name);
        if let Some(link) = &self.link {
            s.push_str(" -> ");
            s.push_str(link);
        }
        s
    }
}

impl fmt::Display for FtpFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw_listing)
    }
}
