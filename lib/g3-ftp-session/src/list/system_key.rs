/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

//! Server system keys, as seen in SYST replies.

pub const UNIX: &str = "UNIX";
pub const WINDOWS: &str = "WINDOWS";
pub const VMS: &str = "VMS";
pub const OS2: &str = "OS/2";
pub const OS400: &str = "OS/400";
pub const AS400: &str = "AS/400";
pub const MVS: &str = "MVS";
pub const NETWARE: &str = "NETWARE";
pub const MACOS_PETER: &str = "MACOS PETER";
/// Unix-like on most servers, so it is matched last.
pub const L8: &str = "TYPE: L8";
