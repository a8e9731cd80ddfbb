//! Terminal stand-ins for the toast area and the loading indicator

use std::io::Write;

use vod_catalog_core::fetch::{LoadingIndicator, Notice, NoticeLevel, Notifier};

/// Prints notices to stderr so stdout stays clean for listings
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: &Notice) {
        match notice.level {
            NoticeLevel::Info => eprintln!("\r\x1b[Kℹ️  {}", notice.message),
            NoticeLevel::Error => eprintln!("\r\x1b[K❌ {}", notice.message),
        }
    }
}

pub struct ConsoleLoading;

impl LoadingIndicator for ConsoleLoading {
    fn show(&self) {
        eprint!("Loading...");
        let _ = std::io::stderr().flush();
    }

    fn hide(&self) {
        eprint!("\r\x1b[K");
        let _ = std::io::stderr().flush();
    }
}
