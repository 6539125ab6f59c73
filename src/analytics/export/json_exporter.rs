use super::{ExportConfig, ExportError, ExportScope, FormatHandler, ReportData};
use serde_json::{json, Value};

/// JSON形式エクスポーター
pub struct JsonExporter {
    pretty_print: bool,
}

impl JsonExporter {
    pub fn new() -> Self {
        Self { pretty_print: true }
    }

    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    /// 出力するJSON構造を組み立てる
    fn build_document(&self, data: &ReportData, config: &ExportConfig) -> Result<Value, ExportError> {
        let rows = match config.scope {
            ExportScope::MonthlyViews => serde_json::to_value(&data.monthly),
            ExportScope::PlatformTotals => serde_json::to_value(&data.totals),
        }
        .map_err(|e| ExportError::Serialization(e.to_string()))?;

        let key = match config.scope {
            ExportScope::MonthlyViews => "monthly_views",
            ExportScope::PlatformTotals => "platform_totals",
        };

        let mut document = json!({ key: rows });

        if config.include_metadata {
            let metadata = serde_json::to_value(&data.metadata)
                .map_err(|e| ExportError::Serialization(e.to_string()))?;
            if let Value::Object(map) = &mut document {
                map.insert("metadata".to_string(), metadata);
            }
        }

        Ok(document)
    }
}

impl Default for JsonExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatHandler for JsonExporter {
    fn export(&self, data: &ReportData, config: &ExportConfig) -> Result<Vec<u8>, ExportError> {
        let document = self.build_document(data, config)?;

        let result = if self.pretty_print {
            serde_json::to_vec_pretty(&document)
        } else {
            serde_json::to_vec(&document)
        };

        result.map_err(|e| ExportError::Serialization(e.to_string()))
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}
