// Upload domain model: client-side checks and the ingestion summary
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;
pub const ACCEPTED_EXTENSIONS: [&str; 2] = ["xlsx", "xls"];

/// Sheets the workbook is expected to carry, with their columns.
pub const EXPECTED_SHEETS: [(&str, &str); 6] = [
    ("Production", "Date, Plant, Line, Cement_MT, Clinker_MT, Capacity_Util_%, Downtime_Hrs"),
    ("Energy", "Date, Plant, Power_kWh_Ton, Heat_kcal_kg, Fuel_Cost_Rs_Ton, AFR_%"),
    ("Maintenance", "Date, Plant, Equipment, Breakdown_Hrs, MTBF_Hrs, MTTR_Hrs"),
    ("Quality", "Date, Plant, Blaine, Strength_28D, Clinker_Factor"),
    ("Sales_Logistics", "Date, Plant, Region, Dispatch_MT, Realization_Rs_Ton, Freight_Rs_Ton, OTIF_%"),
    ("Finance", "Date, Plant, Cost_Rs_Ton, EBITDA_Rs_Ton, Margin_%"),
];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UploadRejection {
    #[error("Please select a file first")]
    Missing,
    #[error("Please upload an Excel file (.xlsx or .xls)")]
    NotExcel,
    #[error("File size exceeds 50MB limit ({size} bytes)")]
    TooLarge { size: u64 },
}

/// Extensions match exactly: the backend refuses `.XLSX`, so it is refused here too.
pub fn is_excel_file_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ACCEPTED_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

/// Name and size checks made before anything is read or sent.
pub fn check_upload(file_name: &str, size: u64) -> Result<(), UploadRejection> {
    if !is_excel_file_name(file_name) {
        return Err(UploadRejection::NotExcel);
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(UploadRejection::TooLarge { size });
    }
    Ok(())
}

/// A workbook that passed the local checks, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub content: Bytes,
}

impl UploadFile {
    pub fn size_mb(&self) -> f64 {
        self.content.len() as f64 / 1024.0 / 1024.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadStats {
    #[serde(default)]
    pub plants: Vec<String>,
    #[serde(default, rename = "rowsPerSheet")]
    pub rows_per_sheet: BTreeMap<String, u64>,
}

/// Body of a successful `POST /upload`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadResult {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub stats: UploadStats,
    #[serde(default)]
    pub preview: BTreeMap<String, Value>,
}

impl UploadResult {
    pub fn total_rows(&self) -> u64 {
        self.stats.rows_per_sheet.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excel_names() {
        assert!(is_excel_file_name("plant_data.xlsx"));
        assert!(is_excel_file_name("legacy.xls"));
        assert!(!is_excel_file_name("LEGACY.XLS"));
        assert!(!is_excel_file_name("plant_data.csv"));
        assert!(!is_excel_file_name("xlsx"));
        assert!(!is_excel_file_name("report.xlsx.pdf"));
    }

    #[test]
    fn test_check_upload_limits() {
        assert_eq!(check_upload("data.csv", 10), Err(UploadRejection::NotExcel));
        assert_eq!(check_upload("PLANT_DATA.XLSX", 10), Err(UploadRejection::NotExcel));
        assert_eq!(
            check_upload("data.xlsx", MAX_UPLOAD_BYTES + 1),
            Err(UploadRejection::TooLarge {
                size: MAX_UPLOAD_BYTES + 1
            })
        );
        assert!(check_upload("data.xlsx", MAX_UPLOAD_BYTES).is_ok());
    }

    #[test]
    fn test_upload_result_shape() {
        let result: UploadResult = serde_json::from_str(
            r#"{
                "status": "ok",
                "message": "Data uploaded and ingested successfully",
                "stats": {"plants": ["Sonapur", "Siliguri"], "rowsPerSheet": {"Production": 120, "Energy": 60}},
                "preview": {"Production": [{"Plant": "Sonapur"}]},
                "mapping": {}
            }"#,
        )
        .unwrap();
        assert_eq!(result.stats.plants.len(), 2);
        assert_eq!(result.total_rows(), 180);
        assert!(result.preview.contains_key("Production"));
    }
}
