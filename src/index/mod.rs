//! 검색 인덱스 계층
//!
//! 카탈로그의 정규화 질문 위에 두 개의 인덱스를 구축합니다:
//! - 키워드: TF-IDF 희소 벡터 + 코사인 유사도
//! - 벡터: 밀집 임베딩 + 내적 전수 탐색
//!
//! 두 인덱스 모두 카탈로그 레코드 위치를 그대로 인덱스로 사용합니다.

pub mod keyword;
pub mod vector;

pub use keyword::{KeywordIndex, TfidfModel};
pub use vector::VectorIndex;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::catalog::FaqCatalog;
use crate::embedding::EmbeddingProvider;

/// 카탈로그 전체에 대해 키워드/벡터 인덱스를 함께 구축
///
/// 빈 카탈로그는 인덱스 없이 `(None, None)`을 돌려주며, 호출부는
/// 이를 "모든 질의 미해결" 상태로 다룹니다.
pub async fn build_indices(
    catalog: &FaqCatalog,
    embedder: &dyn EmbeddingProvider,
) -> Result<(Option<KeywordIndex>, Option<VectorIndex>)> {
    if catalog.is_empty() {
        info!("Catalog is empty, skipping index construction");
        return Ok((None, None));
    }

    let questions: Vec<&str> = catalog.questions().collect();

    let keyword = KeywordIndex::fit(&questions);
    debug!(
        rows = catalog.len(),
        vocabulary = keyword.vocabulary_size(),
        "Keyword index built"
    );

    let texts: Vec<String> = questions.iter().map(|q| q.to_string()).collect();
    let embeddings = embedder
        .embed_batch(&texts)
        .await
        .context("Failed to embed catalog questions")?;
    let vector = VectorIndex::build(embeddings).context("Failed to build vector index")?;
    info!(
        rows = catalog.len(),
        dimension = vector.dimension(),
        provider = embedder.name(),
        "Vector index built"
    );

    Ok((Some(keyword), Some(vector)))
}

// ============================================================================
// Tests
// ============================================================================
