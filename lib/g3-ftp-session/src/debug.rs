/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use log::Level;

pub const FTP_DEBUG_LOG_LEVEL: Level = Level::Debug;
pub const FTP_DEBUG_LOG_TARGET: &str = "g3_ftp_session::raw";

#[cfg(feature = "log-raw-io")]
#[inline]
pub(crate) fn log_cmd(cmd: &str) {
    // never leak the password into the trace
    let cmd = match cmd.get(..5) {
        Some(prefix) if prefix.eq_ignore_ascii_case("PASS ") => "PASS ******",
        _ => cmd,
    };
    log::log!(
        target: FTP_DEBUG_LOG_TARGET,
        FTP_DEBUG_LOG_LEVEL,
        "> {}",
        cmd
    );
}

#[cfg(feature = "log-raw-io")]
#[inline]
pub(crate) fn log_rsp(rsp: &str) {
    log::log!(
        target: FTP_DEBUG_LOG_TARGET,
        FTP_DEBUG_LOG_LEVEL,
        "< {}",
        rsp
    );
}
