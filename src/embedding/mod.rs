//! 임베딩 모듈 - 질문 텍스트 벡터화
//!
//! 시맨틱 검색 티어가 사용하는 문장 임베딩 프로바이더입니다.
//! 임베딩 모델은 고정된 블랙박스로 취급하며, 전역이 아니라 세션
//! 생성 시 주입됩니다.
//!
//! - `GeminiEmbedding`: Gemini API 원격 모델 (API 키 필요)
//! - `HashEmbedding`: 결정적 로컬 폴백 (키 없음 / 테스트용)

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

// ============================================================================
// EmbeddingProvider Trait
// ============================================================================

/// 임베딩 프로바이더 트레이트
///
/// 같은 입력에 대해 같은 벡터를 돌려줘야 합니다 (인덱스 재현성).
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// 단일 텍스트 임베딩
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// 배치 임베딩 (기본 구현: 순차 호출)
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for (i, text) in texts.iter().enumerate() {
            tracing::debug!("Embedding {}/{}", i + 1, texts.len());
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// 임베딩 차원 수
    fn dimension(&self) -> usize;

    /// 프로바이더 이름
    fn name(&self) -> &'static str;
}

// ============================================================================
// Gemini Embedding
// ============================================================================

/// Gemini 임베딩 API 엔드포인트
/// ref: https://ai.google.dev/gemini-api/docs/embeddings
const GEMINI_EMBED_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-embedding-001:embedContent";

/// Gemini 기본 임베딩 차원
pub const GEMINI_DIMENSION: usize = 768;

/// 호출 간 최소 딜레이 (무료 티어 60 RPM 준수)
const MIN_DELAY: Duration = Duration::from_millis(1000);
/// 429 에러 시 최대 재시도 횟수
const MAX_RETRIES: u32 = 3;
/// 재시도 초기 백오프
const INITIAL_BACKOFF_MS: u64 = 2000;

/// Google Gemini 임베딩 구현체
#[derive(Debug)]
pub struct GeminiEmbedding {
    api_key: String,
    client: reqwest::Client,
    dimension: usize,
    last_request: Mutex<Option<Instant>>,
}

#[derive(Debug, Serialize)]
struct EmbedRequest {
    model: String,
    content: EmbedContent,
    #[serde(rename = "taskType")]
    task_type: String,
    #[serde(rename = "outputDimensionality")]
    output_dimensionality: usize,
}

#[derive(Debug, Serialize)]
struct EmbedContent {
    parts: Vec<EmbedPart>,
}

#[derive(Debug, Serialize)]
struct EmbedPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embedding: EmbeddingValues,
}

#[derive(Debug, Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

impl GeminiEmbedding {
    /// API 키로 생성
    pub fn new(api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            api_key,
            client,
            dimension: GEMINI_DIMENSION,
            last_request: Mutex::new(None),
        })
    }

    /// 환경변수에서 API 키를 읽어 생성
    pub fn from_env() -> Result<Self> {
        Self::new(get_api_key()?)
    }

    /// 호출 간 최소 딜레이 적용
    async fn throttle(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(at) = *last {
            let elapsed = at.elapsed();
            if elapsed < MIN_DELAY {
                tokio::time::sleep(MIN_DELAY - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    async fn request_embedding(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbedRequest {
            model: "models/gemini-embedding-001".to_string(),
            content: EmbedContent {
                parts: vec![EmbedPart {
                    text: text.to_string(),
                }],
            },
            task_type: "RETRIEVAL_DOCUMENT".to_string(),
            output_dimensionality: self.dimension,
        };

        let mut last_error: Option<anyhow::Error> = None;

        for attempt in 0..=MAX_RETRIES {
            self.throttle().await;

            let response = self
                .client
                .post(GEMINI_EMBED_URL)
                .header("x-goog-api-key", &self.api_key)
                .json(&request)
                .send()
                .await;

            let response = match response {
                Ok(resp) => resp,
                Err(e) => {
                    last_error = Some(anyhow::anyhow!("Embedding request failed: {}", e));
                    if attempt < MAX_RETRIES {
                        backoff(attempt).await;
                        continue;
                    }
                    break;
                }
            };

            let status = response.status();
            let body = response
                .text()
                .await
                .context("Failed to read embedding response body")?;

            if status.is_success() {
                let parsed: EmbedResponse =
                    serde_json::from_str(&body).context("Failed to parse embedding response")?;
                return Ok(parsed.embedding.values);
            }

            if status.as_u16() == 429 {
                tracing::warn!(
                    "Rate limit hit (429), attempt {}/{}",
                    attempt + 1,
                    MAX_RETRIES
                );
                last_error = Some(anyhow::anyhow!("Rate limit exceeded (429)"));
                if attempt < MAX_RETRIES {
                    backoff(attempt).await;
                    continue;
                }
            } else {
                anyhow::bail!("Gemini API error ({}): {}", status, body);
            }
        }

        Err(last_error
            .unwrap_or_else(|| anyhow::anyhow!("Embedding failed after {} retries", MAX_RETRIES)))
    }
}

/// 지수 백오프 대기
async fn backoff(attempt: u32) {
    let wait = Duration::from_millis(INITIAL_BACKOFF_MS * 2u64.pow(attempt));
    tracing::warn!("Backing off {:?}", wait);
    tokio::time::sleep(wait).await;
}

#[async_trait]
impl EmbeddingProvider for GeminiEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if text.trim().is_empty() {
            return Ok(vec![0.0; self.dimension]);
        }
        self.request_embedding(text).await
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &'static str {
        "gemini-embedding-001"
    }
}

// ============================================================================
// Hash Embedding (로컬 폴백)
// ============================================================================

/// 로컬 폴백 기본 차원
pub const HASH_DIMENSION: usize = 384;

/// FNV-1a 토큰 해싱 기반 결정적 임베딩
///
/// 토큰을 해시 버킷에 누적한 뒤 L2 정규화합니다. 의미 모델은 아니지만
/// 어휘가 겹치는 텍스트에 높은 내적을 주며, 네트워크 없이 재현 가능해
/// 테스트와 오프라인 실행에 사용됩니다.
#[derive(Debug, Clone)]
pub struct HashEmbedding {
    dimension: usize,
}

impl HashEmbedding {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(8),
        }
    }

    fn fnv1a(token: &str) -> u64 {
        let mut hash: u64 = 0xcbf29ce484222325;
        for byte in token.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x100000001b3);
        }
        hash
    }

    fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];

        for token in text
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let idx = (Self::fnv1a(token) as usize) % self.dimension;
            vector[idx] += 1.0;
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut vector {
                *x /= norm;
            }
        }
        vector
    }
}

impl Default for HashEmbedding {
    fn default() -> Self {
        Self::new(HASH_DIMENSION)
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_sync(text))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &'static str {
        "hash-fnv1a"
    }
}

// ============================================================================
// API Key / Factory
// ============================================================================

/// API 키 로드 (GEMINI_API_KEY > GOOGLE_AI_API_KEY)
pub fn get_api_key() -> Result<String> {
    for var in ["GEMINI_API_KEY", "GOOGLE_AI_API_KEY"] {
        if let Ok(key) = std::env::var(var) {
            if !key.is_empty() {
                tracing::debug!("Using API key from {}", var);
                return Ok(key);
            }
        }
    }
    anyhow::bail!("API key not found. Set GEMINI_API_KEY or GOOGLE_AI_API_KEY.")
}

/// API 키 존재 여부
pub fn has_api_key() -> bool {
    get_api_key().is_ok()
}

/// 임베딩 프로바이더 생성
///
/// API 키가 있으면 Gemini, 없으면 로컬 해시 임베딩으로 폴백합니다.
pub fn create_embedder() -> Result<Box<dyn EmbeddingProvider>> {
    if has_api_key() {
        let embedder = GeminiEmbedding::from_env()?;
        tracing::info!(
            "Using Gemini embedding (dimension: {})",
            embedder.dimension()
        );
        Ok(Box::new(embedder))
    } else {
        tracing::info!("No API key set, using local hash embedding");
        Ok(Box::new(HashEmbedding::default()))
    }
}

// ============================================================================
// Tests
// ============================================================================
