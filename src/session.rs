//! 세션 - 로드된 카탈로그와 인덱스의 묶음
//!
//! 데이터 디렉터리에서 시트를 읽어 카탈로그를 만들고, 그 위에
//! 키워드/벡터 인덱스를 구축한 뒤 질의 해석에 필요한 모든 구성
//! 요소를 한 곳에 모아 둡니다. 세션은 빌드 후 불변이며 `&self`
//! 질의만 받으므로 공유에 안전합니다.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use crate::catalog::{CatalogBuilder, FaqCatalog};
use crate::dataset::{self, SheetSet};
use crate::embedding::{self, EmbeddingProvider};
use crate::index::{self, KeywordIndex, VectorIndex};
use crate::nlp::{Normalizer, VocabularyCorrector};
use crate::resolver::{MatchResult, Resolver, ResolverConfig, UNRESOLVED_MESSAGE};

// ============================================================================
// Types
// ============================================================================

/// 질의 한 건에 대한 최종 답변
#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    /// 답변 본문 (미해결 시 안내 문구)
    pub answer: String,
    /// 출처 카테고리 (미해결 시 None)
    pub category: Option<String>,
    /// 추가 정보 (없으면 None)
    pub additional_info: Option<String>,
    /// 확정 단계 점수 (미해결 시 None)
    pub score: Option<f32>,
    /// 확정 단계 이름 (미해결 시 None)
    pub tier: Option<&'static str>,
}

impl Answer {
    fn unresolved() -> Self {
        Self {
            answer: UNRESOLVED_MESSAGE.to_string(),
            category: None,
            additional_info: None,
            score: None,
            tier: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.tier.is_some()
    }
}

/// 세션 통계 (status 명령용)
#[derive(Debug, Serialize)]
pub struct SessionStats {
    pub records: usize,
    pub categories: Vec<(String, usize)>,
    pub vocabulary_size: usize,
    pub embedding_dimension: Option<usize>,
    pub embedding_provider: &'static str,
}

// ============================================================================
// Session
// ============================================================================

/// 질의 세션
pub struct Session {
    catalog: FaqCatalog,
    keyword: Option<KeywordIndex>,
    vector: Option<VectorIndex>,
    resolver: Resolver,
    embedder: Box<dyn EmbeddingProvider>,
}

impl Session {
    /// 데이터 디렉터리에서 세션 구축
    pub async fn load(dir: &Path) -> Result<Self> {
        let sheets = dataset::load_sheets(dir)
            .with_context(|| format!("Failed to load dataset from {}", dir.display()))?;
        info!(
            sheets = sheets.sheets.len(),
            rows = sheets.row_count(),
            "Dataset loaded"
        );

        let embedder = embedding::create_embedder()?;
        Self::from_sheets(&sheets, embedder).await
    }

    /// 이미 로드된 시트로 세션 구축 (임베더 주입)
    pub async fn from_sheets(
        sheets: &SheetSet,
        embedder: Box<dyn EmbeddingProvider>,
    ) -> Result<Self> {
        let normalizer = Normalizer::default();
        let catalog = CatalogBuilder::new(&normalizer).build(sheets);

        let (keyword, vector) = index::build_indices(&catalog, embedder.as_ref()).await?;

        let corrector = VocabularyCorrector::from_texts(catalog.questions());
        let resolver = Resolver::new(Box::new(corrector), ResolverConfig::default());

        Ok(Self {
            catalog,
            keyword,
            vector,
            resolver,
            embedder,
        })
    }

    /// 카탈로그가 빈 세션 (모든 질의가 미해결로 귀결)
    ///
    /// 데이터 로드 실패 시 챗봇을 죽이는 대신 이 세션으로 강등합니다.
    pub fn empty() -> Self {
        warn!("Running with an empty session, every query will be unresolved");
        Self {
            catalog: FaqCatalog::default(),
            keyword: None,
            vector: None,
            resolver: Resolver::default(),
            embedder: Box::new(embedding::HashEmbedding::default()),
        }
    }

    pub fn catalog(&self) -> &FaqCatalog {
        &self.catalog
    }

    /// 질의 하나를 답변으로 해석
    ///
    /// 실패하지 않습니다. 내부 오류는 로그로 남기고 미해결로
    /// 처리합니다.
    pub async fn ask(&self, query: &str) -> Answer {
        let questions: Vec<&str> = self.catalog.questions().collect();
        let result = self
            .resolver
            .resolve(
                query,
                &questions,
                self.keyword.as_ref(),
                self.vector.as_ref(),
                self.embedder.as_ref(),
            )
            .await;

        match result {
            MatchResult::Match { index, score, tier } => match self.catalog.get(index) {
                Some(record) => Answer {
                    answer: record.answer.clone(),
                    category: Some(record.category.clone()),
                    additional_info: if record.additional_info.is_empty() {
                        None
                    } else {
                        Some(record.additional_info.clone())
                    },
                    score: Some(score),
                    tier: Some(tier.as_str()),
                },
                None => {
                    warn!(index, "Resolved index out of catalog bounds");
                    Answer::unresolved()
                }
            },
            MatchResult::Unresolved => Answer::unresolved(),
        }
    }

    /// status 명령용 통계
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            records: self.catalog.len(),
            categories: self.catalog.category_counts(),
            vocabulary_size: self
                .keyword
                .as_ref()
                .map(|k| k.vocabulary_size())
                .unwrap_or(0),
            embedding_dimension: self.vector.as_ref().map(|v| v.dimension()),
            embedding_provider: self.embedder.name(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
