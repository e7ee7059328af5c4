//! 키워드 인덱스 - TF-IDF 가중 단어-문서 행렬
//!
//! 카탈로그의 정규화된 질문 전체에 대해 가중 모델을 한 번 적합(fit)하고,
//! 질의는 같은 어휘/가중치로 사영(transform)합니다. 행 벡터는 L2
//! 정규화되어 있어 내적이 곧 코사인 유사도입니다.
//!
//! IDF는 smooth 방식입니다: `ln((1 + n) / (1 + df)) + 1`
//! ref: https://scikit-learn.org/stable/modules/feature_extraction.html#tfidf-term-weighting

use std::collections::HashMap;

/// 희소 벡터: (어휘 인덱스, 가중치), 인덱스 오름차순
pub type SparseVector = Vec<(usize, f32)>;

// ============================================================================
// TfidfModel
// ============================================================================

/// 적합된 TF-IDF 모델 (어휘 + IDF 가중치)
///
/// 적합 후 읽기 전용입니다. 질의 사영은 항상 적합 시점의 어휘를
/// 사용하므로 카탈로그와 질의가 같은 벡터 공간에 놓입니다.
#[derive(Debug, Clone)]
pub struct TfidfModel {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
}

impl TfidfModel {
    /// 문서 목록에 대해 모델 적합
    fn fit(documents: &[&str]) -> Self {
        // 문서 빈도 집계
        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        for doc in documents {
            let mut seen: Vec<&str> = terms_of(doc).collect();
            seen.sort_unstable();
            seen.dedup();
            for term in seen {
                *doc_freq.entry(term.to_string()).or_insert(0) += 1;
            }
        }

        // 어휘는 사전순으로 번호를 부여 (재현성)
        let mut terms: Vec<String> = doc_freq.keys().cloned().collect();
        terms.sort_unstable();

        let n = documents.len() as f32;
        let mut vocabulary = HashMap::with_capacity(terms.len());
        let mut idf = Vec::with_capacity(terms.len());

        for (index, term) in terms.into_iter().enumerate() {
            let df = doc_freq[&term] as f32;
            idf.push(((1.0 + n) / (1.0 + df)).ln() + 1.0);
            vocabulary.insert(term, index);
        }

        Self { vocabulary, idf }
    }

    /// 어휘 크기
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// 텍스트를 L2 정규화된 TF-IDF 희소 벡터로 사영
    ///
    /// 어휘에 없는 토큰은 무시됩니다. 어휘와 겹치는 토큰이 없으면
    /// 빈 벡터를 반환합니다.
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut counts: HashMap<usize, f32> = HashMap::new();
        for term in terms_of(text) {
            if let Some(&index) = self.vocabulary.get(term) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let mut vector: SparseVector = counts
            .into_iter()
            .map(|(index, tf)| (index, tf * self.idf[index]))
            .collect();
        vector.sort_unstable_by_key(|(index, _)| *index);

        let norm = vector.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut vector {
                *w /= norm;
            }
        }
        vector
    }
}

/// TF-IDF 토큰화: 소문자 영숫자 연속 구간, 2자 이상
///
/// scikit-learn 벡터라이저의 기본 토큰 패턴(`\w\w+`)과 같은 규약입니다.
fn terms_of(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() >= 2)
}

/// 정렬된 희소 벡터 내적
fn sparse_dot(a: &SparseVector, b: &SparseVector) -> f32 {
    let mut sum = 0.0;
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                sum += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    sum
}

// ============================================================================
// KeywordIndex
// ============================================================================

/// 키워드 인덱스 - 질문당 한 행의 희소 TF-IDF 행렬
pub struct KeywordIndex {
    model: TfidfModel,
    rows: Vec<SparseVector>,
}

impl KeywordIndex {
    /// 정규화된 질문 목록으로 인덱스 구축
    ///
    /// 행 순서는 입력 순서를 그대로 따릅니다 (카탈로그 위치 매핑).
    pub fn fit(questions: &[&str]) -> Self {
        let model = TfidfModel::fit(questions);
        let rows = questions.iter().map(|q| model.transform(q)).collect();
        Self { model, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 적합된 어휘 크기
    pub fn vocabulary_size(&self) -> usize {
        self.model.vocabulary_size()
    }

    /// 적합된 모델 접근
    pub fn model(&self) -> &TfidfModel {
        &self.model
    }

    /// 질의를 사영하여 전 행에 대한 코사인 유사도 계산
    pub fn scores(&self, query: &str) -> Vec<f32> {
        let projected = self.model.transform(query);
        self.rows.iter().map(|row| sparse_dot(row, &projected)).collect()
    }

    /// 최고 점수 행 (동률이면 순회 순서상 첫 행)
    pub fn best(&self, query: &str) -> Option<(usize, f32)> {
        let scores = self.scores(query);
        let mut best: Option<(usize, f32)> = None;
        for (index, score) in scores.into_iter().enumerate() {
            // 엄격한 초과 비교: 최초 등장 행 유지
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((index, score));
            }
        }
        best
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_vocabulary_and_idf() {
        let index = KeywordIndex::fit(&["library hour", "library fee", "campus parking"]);
        // {campus, fee, hour, library, parking}
        assert_eq!(index.vocabulary_size(), 5);
        assert_eq!(index.model().vocabulary_size(), 5);
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_exact_match_scores_one() {
        let index = KeywordIndex::fit(&["library hour", "campus parking"]);
        let scores = index.scores("library hour");
        assert!((scores[0] - 1.0).abs() < 1e-5);
        assert!(scores[1].abs() < 1e-5);
    }

    #[test]
    fn test_partial_overlap_ranks_correctly() {
        let index = KeywordIndex::fit(&[
            "tuition payment deadline",
            "library opening hour",
            "campus parking permit",
        ]);

        let (best_idx, best_score) = index.best("when is the tuition deadline").unwrap();
        assert_eq!(best_idx, 0);
        assert!(best_score > 0.35, "score {best_score} below threshold");
    }

    #[test]
    fn test_no_overlap_scores_zero() {
        let index = KeywordIndex::fit(&["library hour"]);
        let scores = index.scores("completely unrelated weather");
        assert_eq!(scores, vec![0.0]);
    }

    #[test]
    fn test_out_of_vocabulary_terms_ignored() {
        let index = KeywordIndex::fit(&["library hour"]);
        let with_noise = index.scores("library hour zzqx")[0];
        let clean = index.scores("library hour")[0];
        assert!((with_noise - clean).abs() < 1e-5);
    }

    #[test]
    fn test_best_tie_break_first_row() {
        let index = KeywordIndex::fit(&["library hour", "library hour"]);
        let (best_idx, _) = index.best("library hour").unwrap();
        assert_eq!(best_idx, 0);
    }

    #[test]
    fn test_single_char_terms_dropped() {
        let index = KeywordIndex::fit(&["a b campus"]);
        assert_eq!(index.model().vocabulary_size(), 1);
    }

    #[test]
    fn test_deterministic_rebuild() {
        let questions = ["library hour", "tuition fee", "campus map"];
        let a = KeywordIndex::fit(&questions);
        let b = KeywordIndex::fit(&questions);
        assert_eq!(a.scores("library fee"), b.scores("library fee"));
    }
}
