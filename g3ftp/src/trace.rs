/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::io::{self, Write};

use g3_ftp_session::FtpProtocolListener;

/// Print the control channel exchange to stderr.
pub(crate) struct StderrProtocolTrace {
    show_password: bool,
}

impl StderrProtocolTrace {
    pub(crate) fn new(show_password: bool) -> Self {
        StderrProtocolTrace { show_password }
    }
}

impl FtpProtocolListener for StderrProtocolTrace {
    fn command_sent(&self, command: &str, message: &str) {
        let mut stderr = io::stderr().lock();
        let _ = if !self.show_password && command.eq_ignore_ascii_case("PASS") {
            writeln!(stderr, "> {command} *******")
        } else {
            write!(stderr, "> {message}")
        };
    }

    fn reply_received(&self, code: u16, message: &str) {
        let mut stderr = io::stderr().lock();
        if code == 0 {
            let _ = writeln!(stderr, "* {}", message.trim_end());
        } else {
            let _ = write!(stderr, "< {message}");
        }
    }
}
