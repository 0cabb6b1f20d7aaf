//! CLI command handlers

pub mod book;
pub mod circulation;
pub mod reader;
pub mod stats;

/// Truncate string for table display
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::truncate;

    #[test]
    fn test_truncate_short_string_unchanged() {
        assert_eq!(truncate("Doan Gioi", 20), "Doan Gioi");
    }

    #[test]
    fn test_truncate_long_string() {
        assert_eq!(truncate("Dat rung phuong Nam", 10), "Dat run...");
    }

    #[test]
    fn test_truncate_tiny_width() {
        // Độ rộng dưới 3 cắt về còn mỗi dấu ba chấm
        assert_eq!(truncate("Doan Gioi", 2), "...");
        assert_eq!(truncate("ab", 2), "ab");
    }

    #[test]
    fn test_truncate_multibyte_name() {
        // Tên tiếng Việt có dấu không được cắt giữa ký tự
        let name = "Nguyễn Thị Minh Khai";
        let cut = truncate(name, 10);
        assert_eq!(cut.chars().count(), 10);
        assert!(cut.ends_with("..."));
    }
}
