/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

//! Entry filters for bulk listing results.

use super::FtpFile;

pub trait FtpFileFilter {
    /// `None` is an entry that could not be parsed.
    fn accept(&self, file: Option<&FtpFile>) -> bool;
}

impl<F> FtpFileFilter for F
where
    F: Fn(Option<&FtpFile>) -> bool,
{
    fn accept(&self, file: Option<&FtpFile>) -> bool {
        self(file)
    }
}

/// Drop the entries that could not be parsed.
pub struct NonNull;

impl FtpFileFilter for NonNull {
    fn accept(&self, file: Option<&FtpFile>) -> bool {
        file.is_some()
    }
}

pub struct All;

impl FtpFileFilter for All {
    fn accept(&self, _file: Option<&FtpFile>) -> bool {
        true
    }
}

pub struct Directories;

impl FtpFileFilter for Directories {
    fn accept(&self, file: Option<&FtpFile>) -> bool {
        file.map(|f| f.is_directory()).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FtpFileKind;

    #[test]
    fn builtin() {
        let mut dir = FtpFile::new("");
        dir.set_kind(FtpFileKind::Directory);
        let file = FtpFile::new("");

        assert!(NonNull.accept(Some(&file)));
        assert!(!NonNull.accept(None));
        assert!(All.accept(None));
        assert!(Directories.accept(Some(&dir)));
        assert!(!Directories.accept(Some(&file)));
        assert!(!Directories.accept(None));
    }

    #[test]
    fn closure() {
        let big = |f: Option<&FtpFile>| f.map(|f| f.size() > 100).unwrap_or(false);
        let mut file = FtpFile::new("");
        assert!(!big.accept(Some(&file)));
        file.set_size(1000);
        assert!(big.accept(Some(&file)));
    }
}
