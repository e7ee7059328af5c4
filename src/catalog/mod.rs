//! 카탈로그 모듈 - 인메모리 FAQ 코퍼스
//!
//! 원시 시트 행을 정규화된 `FaqRecord`로 변환하여 순서가 고정된
//! 카탈로그를 만듭니다. 카탈로그는 빌드 후 불변이며 세션이 단독
//! 소유합니다.

use serde::Serialize;

use crate::dataset::SheetSet;
use crate::nlp::Normalizer;

/// Answer 열이 비어 있을 때의 기본 답변
pub const DEFAULT_ANSWER: &str = "No answer available.";

// ============================================================================
// Types
// ============================================================================

/// FAQ 레코드 하나
///
/// `question`은 정규화된 형태로 저장되며 항상 비어 있지 않습니다.
#[derive(Debug, Clone, Serialize)]
pub struct FaqRecord {
    /// 출처 시트 이름
    pub category: String,
    /// 정규화된 질문
    pub question: String,
    /// 답변
    pub answer: String,
    /// 추가 정보 (없으면 빈 문자열)
    pub additional_info: String,
}

/// FAQ 카탈로그 - 순서가 고정된 레코드 시퀀스
///
/// 삽입 순서는 시트 순회 순서 x 시트 내 행 순서입니다.
/// 비어 있을 수 있으며, 그 경우 모든 인덱스가 부재로 처리됩니다.
#[derive(Debug, Clone, Default)]
pub struct FaqCatalog {
    records: Vec<FaqRecord>,
}

impl FaqCatalog {
    /// 레코드 목록으로 직접 생성 (테스트/임베디드 데이터용)
    pub fn from_records(records: Vec<FaqRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FaqRecord> {
        self.records.get(index)
    }

    pub fn records(&self) -> &[FaqRecord] {
        &self.records
    }

    /// 정규화된 질문 목록 (카탈로그 순서)
    pub fn questions(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.question.as_str())
    }

    /// 카테고리별 레코드 수 (등장 순서 유지)
    pub fn category_counts(&self) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for record in &self.records {
            match counts.iter_mut().find(|(name, _)| *name == record.category) {
                Some((_, count)) => *count += 1,
                None => counts.push((record.category.clone(), 1)),
            }
        }
        counts
    }
}

// ============================================================================
// CatalogBuilder
// ============================================================================

/// 코퍼스 빌더
///
/// 주입된 정규화기로 각 행의 질문을 정규화하고, 정규화 결과가 빈
/// 행은 버립니다 (어떤 인덱스에도 참여할 수 없음).
pub struct CatalogBuilder<'a> {
    normalizer: &'a Normalizer,
}

impl<'a> CatalogBuilder<'a> {
    pub fn new(normalizer: &'a Normalizer) -> Self {
        Self { normalizer }
    }

    /// 워크북에서 카탈로그 빌드
    pub fn build(&self, sheets: &SheetSet) -> FaqCatalog {
        let mut records = Vec::new();
        let mut dropped = 0usize;

        for sheet in &sheets.sheets {
            for row in &sheet.rows {
                let question = self
                    .normalizer
                    .normalize(row.question.as_deref().unwrap_or(""));

                if question.trim().is_empty() {
                    dropped += 1;
                    continue;
                }

                records.push(FaqRecord {
                    category: sheet.name.clone(),
                    question,
                    answer: row
                        .answer
                        .clone()
                        .unwrap_or_else(|| DEFAULT_ANSWER.to_string()),
                    additional_info: row.additional_info.clone().unwrap_or_default(),
                });
            }
        }

        if dropped > 0 {
            tracing::debug!("Dropped {} rows with empty normalized question", dropped);
        }
        tracing::info!("Built catalog: {} records", records.len());

        FaqCatalog { records }
    }
}

// ============================================================================
// Tests
// ============================================================================
