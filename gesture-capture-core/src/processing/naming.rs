use chrono::{DateTime, Utc};

use crate::models::label::Label;

/// Archive entry naming.
///
/// The exported layout is fixed:
/// ```text
/// <label>/
///   <label>_<NNN>/
///     frame_<NNN>.<ext>
/// ```
/// with indices zero-padded to three digits. Frame names use the frame's
/// stored sequence position, so numbering always reflects capture order
/// even when empty frames were skipped.
/// Directory name for one session: `<label>_<NNN>`.
pub fn session_dir_name(label: &Label, recording_index: u32) -> String {
    format!("{}_{:03}", label, recording_index)
}

/// File name for one frame entry: `frame_<NNN>.<ext>`.
pub fn frame_file_name(position: u32, extension: &str) -> String {
    format!("frame_{:03}.{}", position, extension)
}

/// Download file name for the archive: `<label>_<YYYY-MM-DD>.zip`.
pub fn archive_file_name(label: &Label, date: DateTime<Utc>) -> String {
    format!("{}_{}.zip", label, date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::models::config::LabelRules;

    fn label(s: &str) -> Label {
        Label::parse(s, &LabelRules::default()).unwrap()
    }

    #[test]
    fn session_dir_names_are_zero_padded() {
        assert_eq!(session_dir_name(&label("hola"), 1), "hola_001");
        assert_eq!(session_dir_name(&label("hola"), 42), "hola_042");
        assert_eq!(session_dir_name(&label("hola"), 1234), "hola_1234");
    }

    #[test]
    fn frame_file_names_are_zero_padded() {
        assert_eq!(frame_file_name(3, "jpg"), "frame_003.jpg");
        assert_eq!(frame_file_name(50, "jpg"), "frame_050.jpg");
        assert_eq!(frame_file_name(7, "png"), "frame_007.png");
    }

    #[test]
    fn archive_name_carries_iso_date() {
        let date = Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap();
        assert_eq!(archive_file_name(&label("hola"), date), "hola_2024-03-09.zip");
    }
}
