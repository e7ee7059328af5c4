//! 3단 폴백 해석기
//!
//! 질의를 퍼지 -> 키워드 -> 시맨틱 순서로 해석합니다. 각 단계는
//! 자기 임계값을 넘는 후보를 찾으면 즉시 확정하고, 못 찾으면 다음
//! 단계로 넘어갑니다. 세 단계 모두 실패하면 `Unresolved`입니다.
//!
//! 해석 자체는 실패하지 않습니다. 시맨틱 단계의 임베딩 오류는
//! 경고 로그 후 해당 단계를 건너뛰는 것으로 처리합니다.

pub mod fuzzy;

use serde::Serialize;
use tracing::{debug, warn};

use crate::embedding::EmbeddingProvider;
use crate::index::{KeywordIndex, VectorIndex};
use crate::nlp::SpellingCorrector;

/// 모든 단계가 실패했을 때의 안내 문구
pub const UNRESOLVED_MESSAGE: &str = "I'm not sure. Please try rephrasing.";

// ============================================================================
// Types
// ============================================================================

/// 단계별 임계값 설정
#[derive(Debug, Clone, Copy)]
pub struct ResolverConfig {
    /// 퍼지 단계 통과 점수 (0~100, 초과)
    pub fuzzy_threshold: f32,
    /// 키워드 단계 통과 코사인 유사도 (초과)
    pub keyword_threshold: f32,
    /// 시맨틱 단계 통과 내적 (초과)
    pub semantic_threshold: f32,
    /// 철자 교정을 적용할 최대 단어 수
    pub max_correction_words: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 60.0,
            keyword_threshold: 0.35,
            semantic_threshold: 0.6,
            max_correction_words: 3,
        }
    }
}

/// 매칭을 확정한 단계
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchTier {
    Fuzzy,
    Keyword,
    Semantic,
}

impl MatchTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchTier::Fuzzy => "fuzzy",
            MatchTier::Keyword => "keyword",
            MatchTier::Semantic => "semantic",
        }
    }
}

/// 해석 결과
#[derive(Debug, Clone, PartialEq)]
pub enum MatchResult {
    /// 카탈로그 레코드 매칭 성공
    Match {
        index: usize,
        score: f32,
        tier: MatchTier,
    },
    /// 어느 단계도 임계값을 넘지 못함
    Unresolved,
}

// ============================================================================
// Resolver
// ============================================================================

/// 질의 해석기
///
/// 철자 교정기는 주입되며, 인덱스들은 호출 시점에 받아 세션이
/// 수명을 관리합니다.
pub struct Resolver {
    corrector: Box<dyn SpellingCorrector>,
    config: ResolverConfig,
}

impl Resolver {
    pub fn new(corrector: Box<dyn SpellingCorrector>, config: ResolverConfig) -> Self {
        Self { corrector, config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// 질의 전처리: 짧은 질의만 철자 교정 후 소문자화
    ///
    /// 긴 질의는 문맥상 오타보다 자연스러운 변형일 가능성이 크므로
    /// 교정하지 않습니다.
    pub fn prepare(&self, query: &str) -> String {
        let trimmed = query.trim();
        let word_count = trimmed.split_whitespace().count();

        let corrected = if word_count > 0 && word_count <= self.config.max_correction_words {
            let corrected = self.corrector.correct(trimmed);
            if corrected != trimmed {
                debug!(original = trimmed, corrected = %corrected, "Spelling corrected");
            }
            corrected
        } else {
            trimmed.to_string()
        };

        corrected.to_lowercase()
    }

    /// 3단 폴백 해석
    ///
    /// `questions`는 카탈로그 순서의 정규화 질문 목록이며, 반환되는
    /// 인덱스는 그 목록(= 카탈로그)의 위치입니다.
    pub async fn resolve(
        &self,
        query: &str,
        questions: &[&str],
        keyword: Option<&KeywordIndex>,
        vector: Option<&VectorIndex>,
        embedder: &dyn EmbeddingProvider,
    ) -> MatchResult {
        let prepared = self.prepare(query);
        if prepared.is_empty() || questions.is_empty() {
            return MatchResult::Unresolved;
        }

        // 1단계: 퍼지 매칭
        if let Some((index, score)) = fuzzy::extract_best(&prepared, questions) {
            if score > self.config.fuzzy_threshold {
                debug!(index, score, "Resolved at fuzzy tier");
                return MatchResult::Match {
                    index,
                    score,
                    tier: MatchTier::Fuzzy,
                };
            }
            debug!(score, "Fuzzy tier below threshold");
        }

        // 2단계: TF-IDF 키워드 매칭
        if let Some(keyword) = keyword {
            if let Some((index, score)) = keyword.best(&prepared) {
                if score > self.config.keyword_threshold {
                    debug!(index, score, "Resolved at keyword tier");
                    return MatchResult::Match {
                        index,
                        score,
                        tier: MatchTier::Keyword,
                    };
                }
                debug!(score, "Keyword tier below threshold");
            }
        }

        // 3단계: 시맨틱 매칭
        if let Some(vector) = vector {
            match embedder.embed(&prepared).await {
                Ok(query_vector) => {
                    if let Some((index, score)) = vector.top(&query_vector) {
                        if score > self.config.semantic_threshold {
                            debug!(index, score, "Resolved at semantic tier");
                            return MatchResult::Match {
                                index,
                                score,
                                tier: MatchTier::Semantic,
                            };
                        }
                        debug!(score, "Semantic tier below threshold");
                    }
                }
                Err(e) => {
                    warn!("Query embedding failed, skipping semantic tier: {:#}", e);
                }
            }
        }

        MatchResult::Unresolved
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(
            Box::new(crate::nlp::NoopCorrector),
            ResolverConfig::default(),
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashEmbedding;
    use crate::nlp::VocabularyCorrector;
    use anyhow::Result;
    use async_trait::async_trait;

    /// 고정 벡터를 돌려주는 테스트용 임베더
    struct FixedEmbedding {
        vector: Vec<f32>,
    }

    #[async_trait]
    impl EmbeddingProvider for FixedEmbedding {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(self.vector.clone())
        }

        fn dimension(&self) -> usize {
            self.vector.len()
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    /// 항상 실패하는 테스트용 임베더
    struct FailingEmbedding;

    #[async_trait]
    impl EmbeddingProvider for FailingEmbedding {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            anyhow::bail!("embedding backend unavailable")
        }

        fn dimension(&self) -> usize {
            8
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    const QUESTIONS: &[&str] = &["library hour", "apply", "tuition payment deadline"];

    fn resolver() -> Resolver {
        Resolver::default()
    }

    #[tokio::test]
    async fn test_exact_match_resolves_at_fuzzy_tier() {
        let embedder = HashEmbedding::new(64);
        let result = resolver()
            .resolve("apply", QUESTIONS, None, None, &embedder)
            .await;
        assert_eq!(
            result,
            MatchResult::Match {
                index: 1,
                score: 100.0,
                tier: MatchTier::Fuzzy,
            }
        );
    }

    #[tokio::test]
    async fn test_longer_phrasing_resolves_at_fuzzy_tier() {
        let embedder = HashEmbedding::new(64);
        let result = resolver()
            .resolve("What are the library hours?", QUESTIONS, None, None, &embedder)
            .await;
        match result {
            MatchResult::Match { index, score, tier } => {
                assert_eq!(index, 0);
                assert!(score > 60.0);
                assert_eq!(tier, MatchTier::Fuzzy);
            }
            other => panic!("expected fuzzy match, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fuzzy_threshold_boundary() {
        let questions = ["library hour"];
        let embedder = HashEmbedding::new(64);
        let resolver = resolver();

        // 한 글자 오타가 있어도 임계값을 넘는다
        let hit = resolver
            .resolve("what are the librery hours", &questions, None, None, &embedder)
            .await;
        assert!(matches!(hit, MatchResult::Match { index: 0, .. }));

        // 무관한 질의는 임계값 아래로 떨어진다
        let miss = resolver
            .resolve(
                "completely unrelated gibberish zzqx",
                &questions,
                None,
                None,
                &embedder,
            )
            .await;
        assert_eq!(miss, MatchResult::Unresolved);
    }

    #[tokio::test]
    async fn test_fuzzy_tie_keeps_first_question() {
        let questions = ["library hour", "library hour"];
        let embedder = HashEmbedding::new(64);
        let result = resolver()
            .resolve("library hour", &questions, None, None, &embedder)
            .await;
        match result {
            MatchResult::Match { index, .. } => assert_eq!(index, 0),
            other => panic!("expected match, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_keyword_tier_reachable_past_fuzzy() {
        // 공유 토큰이 하나뿐이라 퍼지 점수는 낮지만 TF-IDF로는 잡힌다
        let questions = ["library hour", "apply", "visa cost breakdown enrollment paperwork"];
        let keyword = KeywordIndex::fit(&questions);
        let embedder = HashEmbedding::new(64);

        let result = resolver()
            .resolve(
                "roughly how much will my visa end up costing me overall",
                &questions,
                Some(&keyword),
                None,
                &embedder,
            )
            .await;
        match result {
            MatchResult::Match { index, score, tier } => {
                assert_eq!(index, 2);
                assert!(score > 0.35);
                assert_eq!(tier, MatchTier::Keyword);
            }
            other => panic!("expected keyword match, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_semantic_tier_reachable_past_keyword() {
        let questions = ["library hour", "apply"];
        let keyword = KeywordIndex::fit(&questions);
        let vector = VectorIndex::build(vec![vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
        // 어휘가 전혀 겹치지 않는 질의도 임베딩 공간에서는 1번에 근접
        let embedder = FixedEmbedding {
            vector: vec![0.0, 1.0],
        };

        let result = resolver()
            .resolve(
                "qqqq zzzz vvvv",
                &questions,
                Some(&keyword),
                Some(&vector),
                &embedder,
            )
            .await;
        assert_eq!(
            result,
            MatchResult::Match {
                index: 1,
                score: 1.0,
                tier: MatchTier::Semantic,
            }
        );
    }

    #[tokio::test]
    async fn test_unresolved_when_no_tier_crosses() {
        let questions = ["library hour", "apply", "tuition payment deadline"];
        let keyword = KeywordIndex::fit(&questions);
        let vector = VectorIndex::build(vec![
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
        ])
        .unwrap();
        let embedder = FixedEmbedding {
            vector: vec![0.0, 0.0, 0.0],
        };

        let result = resolver()
            .resolve(
                "what is the weather",
                &questions,
                Some(&keyword),
                Some(&vector),
                &embedder,
            )
            .await;
        assert_eq!(result, MatchResult::Unresolved);
    }

    #[tokio::test]
    async fn test_embed_failure_falls_through_to_unresolved() {
        let questions = ["library hour"];
        let vector = VectorIndex::build(vec![vec![1.0, 0.0]]).unwrap();

        let result = resolver()
            .resolve(
                "qqqq zzzz vvvv",
                &questions,
                None,
                Some(&vector),
                &FailingEmbedding,
            )
            .await;
        assert_eq!(result, MatchResult::Unresolved);
    }

    #[tokio::test]
    async fn test_empty_query_unresolved() {
        let embedder = HashEmbedding::new(64);
        let result = resolver()
            .resolve("   ", QUESTIONS, None, None, &embedder)
            .await;
        assert_eq!(result, MatchResult::Unresolved);
    }

    #[tokio::test]
    async fn test_empty_question_list_unresolved() {
        let embedder = HashEmbedding::new(64);
        let result = resolver().resolve("apply", &[], None, None, &embedder).await;
        assert_eq!(result, MatchResult::Unresolved);
    }

    #[test]
    fn test_prepare_corrects_short_queries_only() {
        let corrector = VocabularyCorrector::from_texts(QUESTIONS.iter().copied());
        let resolver = Resolver::new(Box::new(corrector), ResolverConfig::default());

        // 3단어 이하: 교정 적용
        assert_eq!(resolver.prepare("librry hour"), "library hour");
        // 정확히 3단어인 경계에서도 교정된다
        assert_eq!(resolver.prepare("the librry hour"), "the library hour");
        // 4단어 이상: 교정 없이 소문자화만
        assert_eq!(
            resolver.prepare("What about the librry"),
            "what about the librry"
        );
    }

    #[tokio::test]
    async fn test_corrected_query_resolves() {
        let corrector = VocabularyCorrector::from_texts(QUESTIONS.iter().copied());
        let resolver = Resolver::new(Box::new(corrector), ResolverConfig::default());
        let embedder = HashEmbedding::new(64);

        let result = resolver
            .resolve("librry hour", QUESTIONS, None, None, &embedder)
            .await;
        match result {
            MatchResult::Match { index, tier, .. } => {
                assert_eq!(index, 0);
                assert_eq!(tier, MatchTier::Fuzzy);
            }
            other => panic!("expected fuzzy match, got {:?}", other),
        }
    }
}
