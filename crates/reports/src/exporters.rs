//! Report exporters - CSV, JSON, Markdown
//!
//! This module provides different export formats for reports.

/// Trait for exporting reports to different formats
pub trait ReportExporter {
    /// Export to the target format
    fn export(&self, report: &dyn ReportData) -> String;

    /// Get the file extension for this format
    fn extension(&self) -> &'static str;
}

/// Trait for data that can be exported
pub trait ReportData {
    /// Get the report title
    fn title(&self) -> &str;

    /// Get column headers
    fn headers(&self) -> Vec<String>;

    /// Get data rows
    fn rows(&self) -> Vec<Vec<String>>;

    /// Get summary statistics as key-value pairs
    fn summary(&self) -> Vec<(String, String)>;
}

// ============================================================================
// CSV Exporter
// ============================================================================

/// CSV format exporter
pub struct CsvExporter {
    delimiter: char,
    include_header: bool,
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self {
            delimiter: ',',
            include_header: true,
        }
    }
}

impl CsvExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn without_header(mut self) -> Self {
        self.include_header = false;
        self
    }

    fn escape_csv_field(&self, field: &str) -> String {
        if field.contains(self.delimiter) || field.contains('"') || field.contains('\n') {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }
}

impl ReportExporter for CsvExporter {
    fn export(&self, report: &dyn ReportData) -> String {
        let mut output = String::new();

        // Header
        if self.include_header {
            let headers: Vec<String> = report
                .headers()
                .iter()
                .map(|h| self.escape_csv_field(h))
                .collect();
            output.push_str(&headers.join(&self.delimiter.to_string()));
            output.push('\n');
        }

        // Data rows
        for row in report.rows() {
            let escaped: Vec<String> = row
                .iter()
                .map(|field| self.escape_csv_field(field))
                .collect();
            output.push_str(&escaped.join(&self.delimiter.to_string()));
            output.push('\n');
        }

        output
    }

    fn extension(&self) -> &'static str {
        "csv"
    }
}

// ============================================================================
// JSON Exporter
// ============================================================================

/// JSON format exporter
pub struct JsonExporter {
    pretty: bool,
}

impl Default for JsonExporter {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl JsonExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }
}

impl ReportExporter for JsonExporter {
    fn export(&self, report: &dyn ReportData) -> String {
        let headers = report.headers();
        let rows = report.rows();
        let summary = report.summary();

        // Build JSON structure
        let json_rows: Vec<serde_json::Value> = rows
            .iter()
            .map(|row| {
                let mut obj = serde_json::Map::new();
                for (i, header) in headers.iter().enumerate() {
                    let value = row.get(i).cloned().unwrap_or_default();
                    obj.insert(header.clone(), serde_json::Value::String(value));
                }
                serde_json::Value::Object(obj)
            })
            .collect();

        let summary_obj: serde_json::Map<String, serde_json::Value> = summary
            .into_iter()
            .map(|(k, v)| (k, serde_json::Value::String(v)))
            .collect();

        let output = serde_json::json!({
            "title": report.title(),
            "summary": summary_obj,
            "data": json_rows,
        });

        if self.pretty {
            serde_json::to_string_pretty(&output).unwrap_or_default()
        } else {
            serde_json::to_string(&output).unwrap_or_default()
        }
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}

// ============================================================================
// Markdown Exporter
// ============================================================================

/// Markdown format exporter
pub struct MarkdownExporter {
    include_summary: bool,
}

impl Default for MarkdownExporter {
    fn default() -> Self {
        Self {
            include_summary: true,
        }
    }
}

impl MarkdownExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_summary(mut self) -> Self {
        self.include_summary = false;
        self
    }
}

impl ReportExporter for MarkdownExporter {
    fn export(&self, report: &dyn ReportData) -> String {
        let mut output = String::new();

        // Title
        output.push_str(&format!("# {}\n\n", report.title()));

        // Summary section
        if self.include_summary {
            output.push_str("## Summary\n\n");
            for (key, value) in report.summary() {
                output.push_str(&format!("- **{}**: {}\n", key, value));
            }
            output.push('\n');
        }

        // Data table
        output.push_str("## Data\n\n");

        let headers = report.headers();
        if !headers.is_empty() {
            // Header row
            output.push_str("| ");
            output.push_str(&headers.join(" | "));
            output.push_str(" |\n");

            // Separator row
            output.push_str("| ");
            output.push_str(&headers.iter().map(|_| "---").collect::<Vec<_>>().join(" | "));
            output.push_str(" |\n");

            // Data rows
            for row in report.rows() {
                output.push_str("| ");
                output.push_str(&row.join(" | "));
                output.push_str(" |\n");
            }
        }

        output
    }

    fn extension(&self) -> &'static str {
        "md"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SampleReport;

    impl ReportData for SampleReport {
        fn title(&self) -> &str {
            "Sample Report"
        }

        fn headers(&self) -> Vec<String> {
            vec!["ISBN".to_string(), "Title".to_string(), "Fine".to_string()]
        }

        fn rows(&self) -> Vec<Vec<String>> {
            vec![
                vec![
                    "1234567890".to_string(),
                    "Dat rung phuong Nam".to_string(),
                    "5000".to_string(),
                ],
                vec![
                    "0987654321".to_string(),
                    "Toi, \"robot\", va ban".to_string(),
                    "0".to_string(),
                ],
            ]
        }

        fn summary(&self) -> Vec<(String, String)> {
            vec![
                ("Rows".to_string(), "2".to_string()),
                ("Total Fine".to_string(), "5000 VND".to_string()),
            ]
        }
    }

    #[test]
    fn test_csv_exporter() {
        let exporter = CsvExporter::new();
        let output = exporter.export(&SampleReport);

        assert!(output.starts_with("ISBN,Title,Fine\n"));
        assert!(output.contains("1234567890,Dat rung phuong Nam,5000"));
        assert_eq!(exporter.extension(), "csv");
    }

    #[test]
    fn test_csv_escapes_special_chars() {
        let exporter = CsvExporter::new();
        let output = exporter.export(&SampleReport);

        // Dấu phẩy và nháy kép phải được escape
        assert!(output.contains("\"Toi, \"\"robot\"\", va ban\""));
    }

    #[test]
    fn test_csv_without_header() {
        let exporter = CsvExporter::new().without_header();
        let output = exporter.export(&SampleReport);
        assert!(output.starts_with("1234567890"));
    }

    #[test]
    fn test_json_exporter() {
        let exporter = JsonExporter::new();
        let output = exporter.export(&SampleReport);

        assert!(output.contains("\"title\": \"Sample Report\""));
        assert!(output.contains("\"1234567890\""));
        assert!(output.contains("\"Total Fine\": \"5000 VND\""));
        assert_eq!(exporter.extension(), "json");
    }

    #[test]
    fn test_json_compact() {
        let exporter = JsonExporter::new().compact();
        let output = exporter.export(&SampleReport);
        assert!(!output.contains("  "));
    }

    #[test]
    fn test_markdown_exporter() {
        let exporter = MarkdownExporter::new();
        let output = exporter.export(&SampleReport);

        assert!(output.contains("# Sample Report"));
        assert!(output.contains("## Summary"));
        assert!(output.contains("- **Rows**: 2"));
        assert!(output.contains("| ISBN | Title | Fine |"));
        assert!(output.contains("| --- | --- | --- |"));
        assert!(output.contains("| 1234567890 |"));
        assert_eq!(exporter.extension(), "md");
    }

    #[test]
    fn test_markdown_without_summary() {
        let exporter = MarkdownExporter::new().without_summary();
        let output = exporter.export(&SampleReport);
        assert!(!output.contains("## Summary"));
        assert!(output.contains("## Data"));
    }
}
