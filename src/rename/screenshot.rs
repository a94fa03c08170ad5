use crate::content::ContentCache;
use crate::models::{DetectionResult, FileInfo, RenameResult};
use crate::rename::Renamer;
use crate::utils::format_datetime;
use chrono::{NaiveDate, NaiveDateTime};
use regex::{Regex, RegexBuilder};

/// Renamer for screenshots, normalizing every tool's filename format to
/// `Screenshot_{YYYY-MM-DD_HH-MM-SS}.{ext}`.
///
/// The date/time is parsed out of the original filename; files whose
/// name carries no timestamp fall back to the modified time.
pub struct ScreenshotRenamer {
    // macOS: "Screen Shot 2024-01-15 at 10.30.45 AM.png" (12-hour clock)
    macos: Regex,
    // macOS newer / CleanShot: "... 2024-01-15 at 10.30.45.png"
    macos_new: Regex,
    cleanshot: Regex,
    // Windows Snipping Tool: "Screenshot 2024-01-15 103045.png"
    windows: Regex,
    // German: "Bildschirmfoto 2024-01-15 um 10.30.45.png"
    german: Regex,
    // Spanish, date only: "Captura de pantalla 2024-01-15.png"
    spanish: Regex,
}

fn ci(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .unwrap()
}

impl ScreenshotRenamer {
    pub fn new() -> Self {
        Self {
            macos: ci(
                r"Screen Shot (\d{4})-(\d{2})-(\d{2}) at (\d{1,2})\.(\d{2})\.(\d{2})( [AP]M)?",
            ),
            macos_new: ci(r"Screenshot (\d{4})-(\d{2})-(\d{2}) at (\d{1,2})\.(\d{2})\.(\d{2})"),
            cleanshot: ci(r"CleanShot (\d{4})-(\d{2})-(\d{2}) at (\d{1,2})\.(\d{2})\.(\d{2})"),
            windows: ci(r"Screenshot (\d{4})-(\d{2})-(\d{2}) (\d{2})(\d{2})(\d{2})"),
            german: ci(r"Bildschirmfoto (\d{4})-(\d{2})-(\d{2}) um (\d{1,2})\.(\d{2})\.(\d{2})"),
            spanish: ci(r"Captura de pantalla (\d{4})-(\d{2})-(\d{2})"),
        }
    }

    /// Pull the capture timestamp out of a screenshot filename.
    pub fn extract_datetime(&self, filename: &str) -> Option<NaiveDateTime> {
        if let Some(caps) = self.macos.captures(filename) {
            let mut hour: u32 = caps[4].parse().ok()?;
            // 12-hour clock correction
            if let Some(ampm) = caps.get(7) {
                let ampm = ampm.as_str().trim().to_uppercase();
                if ampm == "PM" && hour != 12 {
                    hour += 12;
                } else if ampm == "AM" && hour == 12 {
                    hour = 0;
                }
            }
            return build_datetime(&caps[1], &caps[2], &caps[3], hour, &caps[5], &caps[6]);
        }

        for pattern in [&self.macos_new, &self.cleanshot, &self.windows, &self.german] {
            if let Some(caps) = pattern.captures(filename) {
                let hour: u32 = caps[4].parse().ok()?;
                return build_datetime(&caps[1], &caps[2], &caps[3], hour, &caps[5], &caps[6]);
            }
        }

        if let Some(caps) = self.spanish.captures(filename) {
            let date = parse_date(&caps[1], &caps[2], &caps[3])?;
            return date.and_hms_opt(0, 0, 0);
        }

        None
    }
}

fn parse_date(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

fn build_datetime(
    year: &str,
    month: &str,
    day: &str,
    hour: u32,
    minute: &str,
    second: &str,
) -> Option<NaiveDateTime> {
    parse_date(year, month, day)?.and_hms_opt(hour, minute.parse().ok()?, second.parse().ok()?)
}

impl Default for ScreenshotRenamer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renamer for ScreenshotRenamer {
    fn name(&self) -> &'static str {
        "ScreenshotRenamer"
    }

    fn rename(
        &self,
        file: &FileInfo,
        detection: &DetectionResult,
        _content: &ContentCache,
    ) -> Option<RenameResult> {
        if detection.detector_name != "ScreenshotDetector" {
            return None;
        }

        let dt = self
            .extract_datetime(&file.name)
            .unwrap_or_else(|| file.modified.naive_local());

        let new_name = format!("Screenshot_{}.{}", format_datetime(&dt), file.extension);
        if new_name == file.name {
            return None;
        }

        Some(RenameResult {
            original_name: file.name.clone(),
            new_name,
            renamer_name: self.name().to_string(),
            date_extracted: Some(dt.date()),
            title_extracted: None,
        })
    }
}
