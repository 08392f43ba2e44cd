pub struct FileSizeUtils;

impl FileSizeUtils {
    const UNITS: [&'static str; 4] = ["Bytes", "KB", "MB", "GB"];

    /// Picks the largest 1024-based unit that keeps the value at or above one
    /// and prints it with at most two decimals, dropping trailing zeros.
    pub fn format_size(bytes: u64) -> String {
        if bytes == 0 {
            return "0 Bytes".to_string();
        }

        let mut size = bytes as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < Self::UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        let rounded = format!("{:.2}", size);
        let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
        format!("{} {}", trimmed, Self::UNITS[unit_index])
    }
}
