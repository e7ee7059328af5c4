//! 데이터셋 모듈 - 다중 시트 FAQ 입력
//!
//! 스프레드시트 형태의 FAQ 데이터를 읽습니다. 디렉토리 하나가 워크북,
//! CSV 파일 하나가 시트에 해당하며 파일 이름(확장자 제외)이 카테고리가
//! 됩니다. 열 구성: `Question`, `Answer`, `Additional Info`.
//!
//! 읽기 실패는 시작 시 한 번 보고되는 치명 오류이며, 셸은 빈 카탈로그로
//! 강등하여 계속 동작해야 합니다.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// 기본 데이터 디렉토리 (~/.faqbot/)
pub fn get_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".faqbot")
}

/// 기본 데이터셋 디렉토리 (~/.faqbot/dataset/)
pub fn default_dataset_dir() -> PathBuf {
    get_data_dir().join("dataset")
}

// ============================================================================
// Types
// ============================================================================

/// 시트의 원시 행 (열 누락 허용)
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub additional_info: Option<String>,
}

/// 시트 하나 (이름 + 행 목록, 파일 내 순서 유지)
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<RawRow>,
}

/// 워크북 전체 (시트는 파일 이름 사전순)
#[derive(Debug, Clone, Default)]
pub struct SheetSet {
    pub sheets: Vec<Sheet>,
}

impl SheetSet {
    /// 전체 행 수
    pub fn row_count(&self) -> usize {
        self.sheets.iter().map(|s| s.rows.len()).sum()
    }
}

/// 데이터셋 로드 오류
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset directory not found: {0}")]
    NotFound(PathBuf),

    #[error("dataset directory contains no .csv sheets: {0}")]
    Empty(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed sheet {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

// ============================================================================
// Loader
// ============================================================================

/// 고정 헤더 열 이름
const COL_QUESTION: &str = "Question";
const COL_ANSWER: &str = "Answer";
const COL_ADDITIONAL: &str = "Additional Info";

/// 디렉토리에서 워크북 로드
///
/// 시트 순서는 파일 이름 사전순으로 고정되어 카탈로그 삽입 순서가
/// 결정적입니다.
pub fn load_sheets(dir: &Path) -> Result<SheetSet, DatasetError> {
    if !dir.is_dir() {
        return Err(DatasetError::NotFound(dir.to_path_buf()));
    }

    let entries = std::fs::read_dir(dir).map_err(|source| DatasetError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        })
        .collect();
    paths.sort();

    if paths.is_empty() {
        return Err(DatasetError::Empty(dir.to_path_buf()));
    }

    let mut sheets = Vec::with_capacity(paths.len());
    for path in paths {
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("Uncategorized")
            .to_string();

        let rows = load_sheet_rows(&path)?;
        tracing::debug!("Loaded sheet '{}' ({} rows)", name, rows.len());
        sheets.push(Sheet { name, rows });
    }

    let set = SheetSet { sheets };
    tracing::info!(
        "Loaded dataset: {} sheets, {} rows",
        set.sheets.len(),
        set.row_count()
    );
    Ok(set)
}

/// CSV 시트 하나 읽기
fn load_sheet_rows(path: &Path) -> Result<Vec<RawRow>, DatasetError> {
    let mut reader = csv::Reader::from_path(path).map_err(|source| DatasetError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;

    // 헤더에서 열 위치 찾기 (앞뒤 공백 허용)
    let headers = reader
        .headers()
        .map_err(|source| DatasetError::Malformed {
            path: path.to_path_buf(),
            source,
        })?
        .clone();

    let find_col = |wanted: &str| headers.iter().position(|h| h.trim() == wanted);
    let question_col = find_col(COL_QUESTION);
    let answer_col = find_col(COL_ANSWER);
    let additional_col = find_col(COL_ADDITIONAL);

    if question_col.is_none() {
        tracing::warn!("Sheet {:?} has no '{}' column", path, COL_QUESTION);
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| DatasetError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;

        let cell = |col: Option<usize>| {
            col.and_then(|i| record.get(i))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        rows.push(RawRow {
            question: cell(question_col),
            answer: cell(answer_col),
            additional_info: cell(additional_col),
        });
    }

    Ok(rows)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_sheet(dir: &Path, name: &str, body: &str) {
        let mut file = std::fs::File::create(dir.join(name)).unwrap();
        file.write_all(body.as_bytes()).unwrap();
    }

    #[test]
    fn test_load_sheets_in_name_order() {
        let dir = TempDir::new().unwrap();
        write_sheet(
            dir.path(),
            "b_library.csv",
            "Question,Answer,Additional Info\nlibrary hours?,9 to 5,Main branch\n",
        );
        write_sheet(
            dir.path(),
            "a_admissions.csv",
            "Question,Answer,Additional Info\nhow to apply?,Online form,\n",
        );

        let set = load_sheets(dir.path()).unwrap();
        assert_eq!(set.sheets.len(), 2);
        assert_eq!(set.sheets[0].name, "a_admissions");
        assert_eq!(set.sheets[1].name, "b_library");
        assert_eq!(set.row_count(), 2);
    }

    #[test]
    fn test_missing_optional_columns() {
        let dir = TempDir::new().unwrap();
        write_sheet(dir.path(), "faq.csv", "Question\nwhere is the gym?\n");

        let set = load_sheets(dir.path()).unwrap();
        let row = &set.sheets[0].rows[0];
        assert_eq!(row.question.as_deref(), Some("where is the gym?"));
        assert!(row.answer.is_none());
        assert!(row.additional_info.is_none());
    }

    #[test]
    fn test_blank_cells_become_none() {
        let dir = TempDir::new().unwrap();
        write_sheet(
            dir.path(),
            "faq.csv",
            "Question,Answer,Additional Info\n,no question here,\n   ,also none,\n",
        );

        let set = load_sheets(dir.path()).unwrap();
        assert_eq!(set.sheets[0].rows.len(), 2);
        assert!(set.sheets[0].rows[0].question.is_none());
        assert!(set.sheets[0].rows[1].question.is_none());
    }

    #[test]
    fn test_missing_directory() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            load_sheets(&missing),
            Err(DatasetError::NotFound(_))
        ));
    }

    #[test]
    fn test_empty_directory() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(load_sheets(dir.path()), Err(DatasetError::Empty(_))));
    }

    #[test]
    fn test_non_csv_files_ignored() {
        let dir = TempDir::new().unwrap();
        write_sheet(dir.path(), "notes.txt", "not a sheet");
        write_sheet(
            dir.path(),
            "faq.csv",
            "Question,Answer\nlibrary hours?,9 to 5\n",
        );

        let set = load_sheets(dir.path()).unwrap();
        assert_eq!(set.sheets.len(), 1);
        assert_eq!(set.sheets[0].name, "faq");
    }
}
