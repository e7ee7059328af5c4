//! 벡터 인덱스 - 내적 기반 평탄(flat) 최근접 탐색
//!
//! 질문당 고정 차원 임베딩 하나를 카탈로그 순서로 보관하고, 질의
//! 벡터와의 내적으로 전수 탐색합니다. 카탈로그 규모(시트 수백 행)에는
//! 평탄 탐색으로 충분하며 결과가 완전히 결정적입니다.

use anyhow::Result;

// ============================================================================
// VectorIndex
// ============================================================================

/// 밀집 임베딩 행렬 + 내적 탐색
pub struct VectorIndex {
    dimension: usize,
    vectors: Vec<Vec<f32>>,
}

impl VectorIndex {
    /// 임베딩 목록으로 인덱스 구축
    ///
    /// 입력 순서가 곧 카탈로그 레코드 위치입니다. 차원이 서로 다른
    /// 임베딩이 섞여 있으면 실패합니다.
    pub fn build(embeddings: Vec<Vec<f32>>) -> Result<Self> {
        let dimension = match embeddings.first() {
            Some(first) => first.len(),
            None => anyhow::bail!("Cannot build vector index from zero embeddings"),
        };

        for (i, embedding) in embeddings.iter().enumerate() {
            if embedding.len() != dimension {
                anyhow::bail!(
                    "Embedding {} has dimension {} (expected {})",
                    i,
                    embedding.len(),
                    dimension
                );
            }
        }

        Ok(Self {
            dimension,
            vectors: embeddings,
        })
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// 상위 k개 (인덱스, 내적) 반환, 내적 내림차순
    ///
    /// 동률은 낮은 인덱스가 앞섭니다.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<(usize, f32)> {
        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(index, vector)| (index, inner_product(query, vector)))
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        scored.truncate(k);
        scored
    }

    /// 최근접 1개 (순회 순서상 첫 최대값)
    pub fn top(&self, query: &[f32]) -> Option<(usize, f32)> {
        let mut best: Option<(usize, f32)> = None;
        for (index, vector) in self.vectors.iter().enumerate() {
            let score = inner_product(query, vector);
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((index, score));
            }
        }
        best
    }
}

/// 내적 (차원 불일치 시 0)
fn inner_product(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

// ============================================================================
// Tests
// ============================================================================
