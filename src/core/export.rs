use crate::domain::model::{ProjectRecord, ABSENT_SENTINEL};
use crate::domain::options::ExportSchema;
use crate::utils::error::{EtlError, Result};

/// Expands `{timestamp}` in the configured output name (UTC, `%Y%m%d_%H%M%S`).
pub fn render_file_name(template: &str) -> String {
    if template.contains("{timestamp}") {
        template.replace(
            "{timestamp}",
            &chrono::Utc::now().format("%Y%m%d_%H%M%S").to_string(),
        )
    } else {
        template.to_string()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CsvExporter {
    schema: ExportSchema,
    include_id: bool,
}

impl CsvExporter {
    pub fn new(schema: ExportSchema, include_id: bool) -> Self {
        Self { schema, include_id }
    }

    pub fn header(&self) -> Vec<&'static str> {
        self.schema.columns(self.include_id)
    }

    fn row(&self, record: &ProjectRecord) -> Vec<String> {
        let mut row = Vec::with_capacity(4);
        if self.include_id {
            row.push(record.id().to_string());
        }
        row.push(record.name().to_string());
        row.push(record.symbol().to_string());
        // 未經解析的紀錄視同沒有帳號
        row.push(
            record
                .handle()
                .map(|h| h.to_string())
                .unwrap_or_else(|| ABSENT_SENTINEL.to_string()),
        );
        row
    }

    pub fn to_bytes(&self, records: &[ProjectRecord]) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(self.header())?;

        for record in records {
            writer.write_record(self.row(record))?;
        }

        writer.into_inner().map_err(|e| EtlError::ProcessingError {
            message: format!("Failed to finalize CSV output: {}", e),
        })
    }
}
