use super::{ExportConfig, ExportError, ExportScope, FormatHandler, ReportData};
use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook, Worksheet, XlsxError};

/// Excel形式エクスポーター
pub struct ExcelExporter {
    multi_sheet: bool,
    cell_formatting: bool,
}

impl ExcelExporter {
    pub fn new() -> Self {
        Self {
            multi_sheet: true,
            cell_formatting: true,
        }
    }

    /// 有効時は両方のテーブルをそれぞれのシートに出力する
    pub fn with_multi_sheet(mut self, multi_sheet: bool) -> Self {
        self.multi_sheet = multi_sheet;
        self
    }

    pub fn with_cell_formatting(mut self, cell_formatting: bool) -> Self {
        self.cell_formatting = cell_formatting;
        self
    }

    fn header_format(&self) -> Option<Format> {
        self.cell_formatting.then(|| {
            Format::new()
                .set_bold()
                .set_background_color(Color::RGB(0x4472C4))
                .set_font_color(Color::White)
                .set_border(FormatBorder::Thin)
        })
    }

    fn number_format(&self) -> Option<Format> {
        self.cell_formatting
            .then(|| Format::new().set_num_format("#,##0"))
    }

    /// ワークブックを作成してデータを書き込み
    fn create_workbook(
        &self,
        data: &ReportData,
        config: &ExportConfig,
    ) -> Result<Vec<u8>, ExportError> {
        let mut workbook = Workbook::new();

        let scopes: &[ExportScope] = if self.multi_sheet {
            &[ExportScope::PlatformTotals, ExportScope::MonthlyViews]
        } else {
            std::slice::from_ref(&config.scope)
        };

        for scope in scopes {
            match scope {
                ExportScope::MonthlyViews => self.create_monthly_sheet(&mut workbook, data)?,
                ExportScope::PlatformTotals => self.create_totals_sheet(&mut workbook, data)?,
            }
        }

        if config.include_metadata {
            self.create_metadata_sheet(&mut workbook, data)?;
        }

        let buffer = workbook
            .save_to_buffer()
            .map_err(|e| ExportError::Serialization(format!("Excel generation failed: {}", e)))?;

        Ok(buffer)
    }

    fn write_headers(&self, worksheet: &mut Worksheet, headers: &[&str]) -> Result<(), XlsxError> {
        let header_format = self.header_format();
        for (col, header) in headers.iter().enumerate() {
            match header_format {
                Some(ref format) => {
                    worksheet.write_string_with_format(0, col as u16, *header, format)?;
                }
                None => {
                    worksheet.write_string(0, col as u16, *header)?;
                }
            }
        }
        Ok(())
    }

    fn write_views(
        &self,
        worksheet: &mut Worksheet,
        row: u32,
        col: u16,
        views: i64,
    ) -> Result<(), XlsxError> {
        match self.number_format() {
            Some(format) => {
                worksheet.write_number_with_format(row, col, views as f64, &format)?;
            }
            None => {
                worksheet.write_number(row, col, views as f64)?;
            }
        }
        Ok(())
    }

    /// プラットフォーム別合計シート
    fn create_totals_sheet(
        &self,
        workbook: &mut Workbook,
        data: &ReportData,
    ) -> Result<(), ExportError> {
        let worksheet = workbook.add_worksheet().set_name("Platform Totals")?;
        self.write_headers(worksheet, &["Platform", "Pageviews"])?;

        for (idx, row) in data.totals.iter().enumerate() {
            let row_idx = (idx + 1) as u32;
            worksheet.write_string(row_idx, 0, &row.platform)?;
            self.write_views(worksheet, row_idx, 1, row.views)?;
        }

        worksheet.set_column_width(0, 18.0)?;
        worksheet.set_column_width(1, 16.0)?;
        Ok(())
    }

    /// 月次集計シート
    fn create_monthly_sheet(
        &self,
        workbook: &mut Workbook,
        data: &ReportData,
    ) -> Result<(), ExportError> {
        let worksheet = workbook.add_worksheet().set_name("Monthly Views")?;
        self.write_headers(worksheet, &["Platform", "Month", "Period End", "Pageviews"])?;

        for (idx, row) in data.monthly.iter().enumerate() {
            let row_idx = (idx + 1) as u32;
            worksheet.write_string(row_idx, 0, &row.platform)?;
            worksheet.write_string(row_idx, 1, &row.month)?;
            worksheet.write_string(row_idx, 2, row.period_end.format("%Y-%m-%d").to_string())?;
            self.write_views(worksheet, row_idx, 3, row.views)?;
        }

        worksheet.set_column_width(0, 18.0)?;
        worksheet.set_column_width(1, 10.0)?;
        worksheet.set_column_width(2, 12.0)?;
        worksheet.set_column_width(3, 16.0)?;
        Ok(())
    }

    /// メタデータシート
    fn create_metadata_sheet(
        &self,
        workbook: &mut Workbook,
        data: &ReportData,
    ) -> Result<(), ExportError> {
        let worksheet = workbook.add_worksheet().set_name("Metadata")?;
        self.write_headers(worksheet, &["Field", "Value"])?;

        let meta = &data.metadata;
        let entries = [
            (
                "Generated at",
                meta.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            ),
            ("Start date", meta.start_date.format("%Y-%m-%d").to_string()),
            ("End date", meta.end_date.format("%Y-%m-%d").to_string()),
            ("Platforms", meta.selected_platforms.join(", ")),
            ("Total pageviews", data.grand_total().to_string()),
            (
                "Status",
                if meta.no_data {
                    "No pageviews found".to_string()
                } else {
                    "OK".to_string()
                },
            ),
        ];

        for (idx, (field, value)) in entries.iter().enumerate() {
            let row_idx = (idx + 1) as u32;
            worksheet.write_string(row_idx, 0, *field)?;
            worksheet.write_string(row_idx, 1, value)?;
        }

        worksheet.set_column_width(0, 18.0)?;
        worksheet.set_column_width(1, 40.0)?;
        Ok(())
    }
}

impl FormatHandler for ExcelExporter {
    fn export(&self, data: &ReportData, config: &ExportConfig) -> Result<Vec<u8>, ExportError> {
        self.create_workbook(data, config)
    }

    fn file_extension(&self) -> &str {
        "xlsx"
    }
}

impl Default for ExcelExporter {
    fn default() -> Self {
        Self::new()
    }
}

// XlsxErrorをExportErrorに変換
impl From<XlsxError> for ExportError {
    fn from(error: XlsxError) -> Self {
        ExportError::Serialization(format!("Excel error: {}", error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::export::{MonthlyRow, ReportMetadata, TotalRow};
    use chrono::{NaiveDate, Utc};

    fn create_test_report() -> ReportData {
        ReportData {
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                start_date: NaiveDate::from_ymd_opt(2019, 1, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2019, 12, 31).unwrap(),
                selected_platforms: vec!["Youtube".to_string()],
                no_data: false,
            },
            monthly: vec![MonthlyRow {
                platform: "Youtube".to_string(),
                month: "2019-01".to_string(),
                period_end: NaiveDate::from_ymd_opt(2019, 1, 31).unwrap(),
                views: 1_234_567,
            }],
            totals: vec![TotalRow {
                platform: "Youtube".to_string(),
                views: 1_234_567,
            }],
        }
    }

    #[test]
    fn test_excel_export() {
        let exporter = ExcelExporter::new();
        let result = exporter.export(&create_test_report(), &ExportConfig::default());
        assert!(result.is_ok());

        let excel_bytes = result.unwrap();
        // Excel形式はZIPコンテナ
        assert_eq!(&excel_bytes[0..2], b"PK");
    }

    #[test]
    fn test_excel_export_single_sheet() {
        let exporter = ExcelExporter::new().with_multi_sheet(false);
        let config = ExportConfig {
            scope: ExportScope::MonthlyViews,
            include_metadata: false,
            ..Default::default()
        };
        assert!(exporter.export(&create_test_report(), &config).is_ok());
    }

    #[test]
    fn test_excel_export_without_formatting() {
        let exporter = ExcelExporter::new().with_cell_formatting(false);
        assert!(exporter
            .export(&create_test_report(), &ExportConfig::default())
            .is_ok());
    }
}
