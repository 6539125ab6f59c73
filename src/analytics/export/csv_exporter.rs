use super::{ExportConfig, ExportError, ExportScope, FormatHandler, ReportData};

/// CSV形式エクスポーター
pub struct CsvExporter {
    delimiter: u8,
    include_headers: bool,
}

impl CsvExporter {
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            include_headers: true,
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_headers(mut self, include_headers: bool) -> Self {
        self.include_headers = include_headers;
        self
    }

    /// `#` で始まるメタデータ行
    fn metadata_lines(&self, data: &ReportData) -> String {
        let meta = &data.metadata;
        let mut lines = String::new();
        lines.push_str(&format!(
            "# Generated at: {}\n",
            meta.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        lines.push_str(&format!(
            "# Date range: {} to {}\n",
            meta.start_date.format("%Y-%m-%d"),
            meta.end_date.format("%Y-%m-%d")
        ));
        lines.push_str(&format!(
            "# Platforms: {}\n",
            meta.selected_platforms.join(", ")
        ));
        if meta.no_data {
            lines.push_str("# No pageviews found\n");
        }
        lines
    }

    fn write_rows(&self, data: &ReportData, scope: ExportScope) -> Result<Vec<u8>, ExportError> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .from_writer(Vec::new());

        let map_err = |e: csv::Error| ExportError::Serialization(format!("CSV write failed: {}", e));

        match scope {
            ExportScope::MonthlyViews => {
                if self.include_headers {
                    writer
                        .write_record(["platform", "month", "period_end", "views"])
                        .map_err(map_err)?;
                }
                for row in &data.monthly {
                    writer
                        .write_record([
                            row.platform.clone(),
                            row.month.clone(),
                            row.period_end.format("%Y-%m-%d").to_string(),
                            row.views.to_string(),
                        ])
                        .map_err(map_err)?;
                }
            }
            ExportScope::PlatformTotals => {
                if self.include_headers {
                    writer.write_record(["platform", "views"]).map_err(map_err)?;
                }
                for row in &data.totals {
                    writer
                        .write_record([row.platform.clone(), row.views.to_string()])
                        .map_err(map_err)?;
                }
            }
        }

        writer
            .into_inner()
            .map_err(|e| ExportError::Serialization(format!("CSV flush failed: {}", e)))
    }
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatHandler for CsvExporter {
    fn export(&self, data: &ReportData, config: &ExportConfig) -> Result<Vec<u8>, ExportError> {
        let mut output = Vec::new();
        if config.include_metadata {
            output.extend_from_slice(self.metadata_lines(data).as_bytes());
        }
        output.extend(self.write_rows(data, config.scope)?);
        Ok(output)
    }

    fn file_extension(&self) -> &str {
        "csv"
    }
}
