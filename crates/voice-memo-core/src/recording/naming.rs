use chrono::Utc;
use uuid::Uuid;

const RANDOM_SUFFIX_LEN: usize = 12;

/// `recording_<unix_millis>_<random>.<ext>`
pub(crate) fn stable_file_name(extension: &str) -> String {
    let timestamp = Utc::now().timestamp_millis();
    let random = Uuid::new_v4().simple().to_string();
    format!(
        "recording_{}_{}.{}",
        timestamp,
        &random[..RANDOM_SUFFIX_LEN],
        extension.trim_start_matches('.')
    )
}
