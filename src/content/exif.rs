use chrono::NaiveDateTime;
use exif::{In, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// EXIF date fields in order of preference.
const DATE_TAGS: [Tag; 3] = [Tag::DateTimeOriginal, Tag::DateTimeDigitized, Tag::DateTime];

/// Extract the capture date from an image's EXIF metadata.
///
/// Prefers DateTimeOriginal, then DateTimeDigitized, then DateTime,
/// parsing the fixed "YYYY:MM:DD HH:MM:SS" EXIF format. Any failure
/// (unreadable image, missing tags, malformed value) yields None.
pub fn extract_exif_date(path: &Path) -> Option<NaiveDateTime> {
    let file = File::open(path).ok()?;
    let mut reader = BufReader::new(file);
    let exif = exif::Reader::new().read_from_container(&mut reader).ok()?;

    for tag in DATE_TAGS {
        let field = match exif.get_field(tag, In::PRIMARY) {
            Some(field) => field,
            None => continue,
        };

        if let Value::Ascii(ref values) = field.value {
            for raw in values {
                let text = String::from_utf8_lossy(raw);
                if let Ok(dt) = NaiveDateTime::parse_from_str(text.trim(), "%Y:%m:%d %H:%M:%S") {
                    return Some(dt);
                }
            }
        }
    }

    None
}
