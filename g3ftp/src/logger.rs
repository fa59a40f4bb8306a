/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::io::{self, Write};

use chrono::Local;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

pub(crate) struct SyncLogger {
    level: LevelFilter,
}

impl SyncLogger {
    pub(crate) fn new(verbose_level: u8) -> Self {
        let level = match verbose_level {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };
        SyncLogger { level }
    }

    pub(crate) fn into_global_logger(self) -> Result<(), SetLoggerError> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(level);
        Ok(())
    }
}

impl Log for SyncLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let mut stderr = io::stderr().lock();
        let time = Local::now().format("%H:%M:%S%.3f");
        let _ = if record.level() <= Level::Info {
            writeln!(stderr, "{time} {} {}", record.level(), record.args())
        } else {
            writeln!(
                stderr,
                "{time} {} [{}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        };
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}
