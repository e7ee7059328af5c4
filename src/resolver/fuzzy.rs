//! 퍼지 문자열 매칭
//!
//! 레벤슈타인 거리 기반 유사도 비율(0~100)과 토큰 정렬/토큰 집합
//! 변형을 제공합니다. `wratio`는 세 비율의 최댓값으로, 질의와 질문의
//! 길이가 크게 다를 때도 공통 토큰을 잡아냅니다.

use strsim::levenshtein;

/// 단순 유사도 비율
///
/// `(len_a + len_b - 거리) / (len_a + len_b) * 100`. 두 문자열이 모두
/// 비어 있으면 100입니다.
pub fn ratio(a: &str, b: &str) -> f32 {
    let total = a.chars().count() + b.chars().count();
    if total == 0 {
        return 100.0;
    }
    let distance = levenshtein(a, b);
    (total.saturating_sub(distance)) as f32 / total as f32 * 100.0
}

/// 토큰을 사전순으로 재배열한 뒤 비교
///
/// 어순만 다른 질의("hours library" vs "library hours")를 동일하게
/// 취급합니다.
pub fn token_sort_ratio(a: &str, b: &str) -> f32 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

/// 공통 토큰 집합 기반 비교
///
/// 교집합 문자열과 각 측의 전체 토큰 문자열 사이의 비율 중 최댓값을
/// 취합니다. 한쪽이 다른 쪽의 부분 집합이면 높은 점수가 나옵니다.
pub fn token_set_ratio(a: &str, b: &str) -> f32 {
    let tokens_a: Vec<&str> = a.split_whitespace().collect();
    let tokens_b: Vec<&str> = b.split_whitespace().collect();

    let mut common: Vec<&str> = tokens_a
        .iter()
        .filter(|t| tokens_b.contains(t))
        .copied()
        .collect();
    common.sort_unstable();
    common.dedup();

    let mut only_a: Vec<&str> = tokens_a
        .iter()
        .filter(|t| !common.contains(t))
        .copied()
        .collect();
    only_a.sort_unstable();
    only_a.dedup();

    let mut only_b: Vec<&str> = tokens_b
        .iter()
        .filter(|t| !common.contains(t))
        .copied()
        .collect();
    only_b.sort_unstable();
    only_b.dedup();

    let base = common.join(" ");
    let full_a = join_parts(&base, &only_a.join(" "));
    let full_b = join_parts(&base, &only_b.join(" "));

    ratio(&base, &full_a)
        .max(ratio(&base, &full_b))
        .max(ratio(&full_a, &full_b))
}

/// 세 비율의 최댓값
pub fn wratio(a: &str, b: &str) -> f32 {
    ratio(a, b)
        .max(token_sort_ratio(a, b))
        .max(token_set_ratio(a, b))
}

/// 후보 목록에서 최고 `wratio` 후보 선택
///
/// 동점이면 먼저 나온 후보가 이깁니다.
pub fn extract_best(query: &str, choices: &[&str]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (index, choice) in choices.iter().enumerate() {
        let score = wratio(query, choice);
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((index, score));
        }
    }
    best
}

fn sorted_tokens(text: &str) -> String {
    let mut tokens: Vec<&str> = text.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn join_parts(base: &str, rest: &str) -> String {
    match (base.is_empty(), rest.is_empty()) {
        (true, _) => rest.to_string(),
        (_, true) => base.to_string(),
        _ => format!("{} {}", base, rest),
    }
}

// ============================================================================
// Tests
// ============================================================================
