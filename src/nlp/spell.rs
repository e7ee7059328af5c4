//! 철자 교정
//!
//! 짧은 질의에 한해 오타를 교정합니다. 교정 사전은 외부 모델이 아니라
//! 카탈로그 질문에서 추출한 어휘를 사용하므로 결정적으로 동작합니다.

use std::collections::HashSet;

use strsim::levenshtein;

/// 교정 허용 최대 편집 거리
const MAX_EDIT_DISTANCE: usize = 2;

/// 교정 대상 최소 토큰 길이 (짧은 토큰은 오교정 위험이 큼)
const MIN_TOKEN_LEN: usize = 3;

// ============================================================================
// SpellingCorrector Trait
// ============================================================================

/// 철자 교정 트레이트
///
/// 질의 전체를 받아 교정된 질의를 반환합니다. 교정 불가 토큰은
/// 원형을 유지해야 합니다.
pub trait SpellingCorrector: Send + Sync {
    /// 질의 철자 교정
    fn correct(&self, query: &str) -> String;

    /// 구현 이름
    fn name(&self) -> &'static str;
}

/// 교정을 수행하지 않는 구현 (테스트/비활성화용)
#[derive(Debug, Default)]
pub struct NoopCorrector;

impl SpellingCorrector for NoopCorrector {
    fn correct(&self, query: &str) -> String {
        query.to_string()
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}

// ============================================================================
// VocabularyCorrector
// ============================================================================

/// 어휘 기반 철자 교정기
///
/// 어휘에 없는 토큰을 편집 거리 `MAX_EDIT_DISTANCE` 이내의
/// 가장 가까운 어휘 단어로 치환합니다. 거리가 같으면 사전순으로
/// 앞서는 단어를 선택합니다 (결정성).
#[derive(Debug)]
pub struct VocabularyCorrector {
    /// 정렬된 중복 제거 어휘
    vocabulary: Vec<String>,
    known: HashSet<String>,
}

impl VocabularyCorrector {
    /// 텍스트 목록에서 어휘를 추출하여 생성
    pub fn from_texts<'a>(texts: impl IntoIterator<Item = &'a str>) -> Self {
        let mut vocabulary: Vec<String> = texts
            .into_iter()
            .flat_map(|text| {
                text.split(|c: char| !c.is_alphanumeric())
                    .filter(|t| !t.is_empty())
                    .map(|t| t.to_lowercase())
            })
            .collect();

        vocabulary.sort_unstable();
        vocabulary.dedup();

        let known = vocabulary.iter().cloned().collect();
        Self { vocabulary, known }
    }

    /// 어휘 크기
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// 토큰 하나 교정
    fn correct_token<'a>(&self, token: &'a str) -> std::borrow::Cow<'a, str> {
        let lowered = token.to_lowercase();

        if lowered.len() < MIN_TOKEN_LEN || self.known.contains(&lowered) {
            return std::borrow::Cow::Borrowed(token);
        }

        let mut best: Option<(&str, usize)> = None;
        for word in &self.vocabulary {
            let dist = levenshtein(&lowered, word);
            // 엄격한 미만 비교: 동률이면 사전순 첫 단어 유지
            if dist <= MAX_EDIT_DISTANCE && best.map_or(true, |(_, d)| dist < d) {
                best = Some((word, dist));
            }
        }

        match best {
            Some((word, _)) => std::borrow::Cow::Owned(word.to_string()),
            None => std::borrow::Cow::Borrowed(token),
        }
    }
}

impl SpellingCorrector for VocabularyCorrector {
    fn correct(&self, query: &str) -> String {
        query
            .split_whitespace()
            .map(|token| self.correct_token(token))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn name(&self) -> &'static str {
        "vocabulary"
    }
}

// ============================================================================
// Tests
// ============================================================================
