//! Instagram post, profile and hashtag mocks.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::Instrument;

use crate::config::schema::{Config, InstagramLatency};
use crate::error::ServiceError;
use crate::ids::random_base36;
use crate::sim::SimRng;
use crate::social::{capitalize, handle_from_url, unix_millis};

const DEFAULT_OWNER: &str = "nike";
const DEFAULT_POST_LIMIT: usize = 12;

const OFFER_TEXT: &str = "Limited Time Offer\nSave 30% Now!\nUse code: SAVE30";

struct CannedPost {
    caption: &'static str,
    likes: u64,
    comments: u64,
    saves: u64,
    kind: PostType,
    hashtags: &'static [&'static str],
}

const POSTS: &[CannedPost] = &[
    CannedPost {
        caption: "Just Do It. 💪 #motivation #nike #sports #fitness",
        likes: 2_345_678,
        comments: 12_345,
        saves: 89_012,
        kind: PostType::Image,
        hashtags: &["motivation", "nike", "sports", "fitness"],
    },
    CannedPost {
        caption: "New collection dropping soon 🔥 #fashion #style #streetwear",
        likes: 1_876_543,
        comments: 8_934,
        saves: 67_234,
        kind: PostType::Carousel,
        hashtags: &["fashion", "style", "streetwear"],
    },
    CannedPost {
        caption: "Behind the scenes of our latest campaign 🎬 #bts #production",
        likes: 4_123_456,
        comments: 23_456,
        saves: 156_789,
        kind: PostType::Video,
        hashtags: &["bts", "production"],
    },
];

const LOCATIONS: &[&str] = &[
    "New York, NY",
    "Los Angeles, CA",
    "Paris, France",
    "Tokyo, Japan",
];

const POST_TYPES: &[PostType] = &[PostType::Image, PostType::Video, PostType::Carousel];
const POPULARITIES: &[Popularity] = &[
    Popularity::Low,
    Popularity::Medium,
    Popularity::High,
    Popularity::VeryHigh,
];
const TRENDS: &[TrendStatus] = &[TrendStatus::Rising, TrendStatus::Stable, TrendStatus::Declining];
const DIFFICULTIES: &[Difficulty] = &[Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

// ─── Enums ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    Image,
    Video,
    Carousel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Popularity {
    Low,
    Medium,
    High,
    VeryHigh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendStatus {
    Rising,
    Stable,
    Declining,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

// ─── Options ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostAnalysisOptions {
    #[serde(default)]
    pub extract_text: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileScrapeOptions {
    /// Number of recent posts to return. Defaults to 12.
    #[serde(default)]
    pub post_limit: Option<usize>,
}

// ─── Post analysis ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstagramPostAnalysis {
    pub job_id: String,
    pub post: PostInfo,
    pub media: Vec<MediaItem>,
    pub caption: Caption,
    pub hashtags: Vec<HashtagInsight>,
    pub engagement: Engagement,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocr: Option<OcrBlock>,
    pub ai_analysis: AiAnalysis,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostInfo {
    pub id: String,
    pub shortcode: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: PostType,
    pub timestamp: DateTime<Utc>,
    pub owner: PostOwner,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostOwner {
    pub username: String,
    pub full_name: String,
    pub is_verified: bool,
    pub follower_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
    pub thumbnail_url: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Caption {
    pub text: String,
    pub language: String,
    pub sentiment: Sentiment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sentiment {
    pub score: f64,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HashtagInsight {
    pub tag: String,
    pub posts: u64,
    pub popularity: Popularity,
    pub performance_score: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Engagement {
    pub likes: u64,
    pub comments: u64,
    pub saves: u64,
    pub shares: u64,
    pub engagement_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrBlock {
    pub extracted_text: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiAnalysis {
    pub objects: Vec<DetectedObject>,
    pub colors: Vec<ColorShare>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectedObject {
    pub name: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorShare {
    pub hex: String,
    pub percentage: u32,
    pub name: String,
}

impl AiAnalysis {
    fn canned() -> Self {
        let objects = [("person", 0.95), ("product", 0.89), ("logo", 0.87)]
            .into_iter()
            .map(|(name, confidence)| DetectedObject {
                name: name.to_string(),
                confidence,
            })
            .collect();
        let colors = [
            ("#FF6B35", 23, "Coral"),
            ("#F7931E", 18, "Orange"),
            ("#4A90E2", 22, "Blue"),
            ("#FFFFFF", 20, "White"),
            ("#000000", 17, "Black"),
        ]
        .into_iter()
        .map(|(hex, percentage, name)| ColorShare {
            hex: hex.to_string(),
            percentage,
            name: name.to_string(),
        })
        .collect();

        Self { objects, colors }
    }
}

// ─── Profile & hashtag ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstagramProfile {
    pub username: String,
    pub full_name: String,
    pub bio: String,
    pub is_verified: bool,
    pub follower_count: u64,
    pub following_count: u64,
    pub post_count: u64,
    pub engagement_rate: f64,
    pub recent_posts: Vec<RecentPost>,
    pub top_hashtags: Vec<String>,
    pub best_posting_times: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentPost {
    pub id: String,
    pub likes: u64,
    pub comments: u64,
    #[serde(rename = "type")]
    pub kind: PostType,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HashtagReport {
    pub hashtag: String,
    pub total_posts: u64,
    pub daily_growth: u64,
    pub trend_status: TrendStatus,
    pub difficulty: Difficulty,
    pub related_hashtags: Vec<RelatedHashtag>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelatedHashtag {
    pub tag: String,
    pub posts: u64,
    pub popularity: Popularity,
}

// ─── Service ────────────────────────────────────────────────────────────────

#[async_trait]
pub trait InstagramService: Send + Sync {
    async fn analyze_post(
        &self,
        url: &str,
        options: &PostAnalysisOptions,
    ) -> Result<InstagramPostAnalysis, ServiceError>;

    async fn scrape_profile(
        &self,
        username: &str,
        options: &ProfileScrapeOptions,
    ) -> Result<InstagramProfile, ServiceError>;

    async fn analyze_hashtag(&self, hashtag: &str) -> Result<HashtagReport, ServiceError>;
}

pub struct MockInstagramService {
    latency: InstagramLatency,
    rng: SimRng,
}

impl MockInstagramService {
    pub fn new(latency: InstagramLatency, seed: Option<u64>) -> Self {
        Self {
            latency,
            rng: SimRng::new(seed),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.latency.instagram.clone(), config.seed)
    }
}

fn pick<T: Copy, R: Rng + ?Sized>(rng: &mut R, items: &[T]) -> T {
    *items.choose(rng).unwrap_or(&items[0])
}

#[async_trait]
impl InstagramService for MockInstagramService {
    async fn analyze_post(
        &self,
        url: &str,
        options: &PostAnalysisOptions,
    ) -> Result<InstagramPostAnalysis, ServiceError> {
        let span = tracing::info_span!("instagram.post", url);
        async {
            self.rng.simulate_latency(&self.latency.post).await;

            let username = handle_from_url(url).unwrap_or_else(|| DEFAULT_OWNER.to_string());
            let now = Utc::now();
            debug!("Generating Instagram post analysis for @{}", username);

            let analysis = self.rng.with(|rng| {
                let post = POSTS.choose(rng).unwrap_or(&POSTS[0]);
                let age_ms = rng.gen_range(0..7 * 24 * 60 * 60 * 1000);

                InstagramPostAnalysis {
                    job_id: format!("job_inst_{}", unix_millis()),
                    post: PostInfo {
                        id: random_base36(rng, 9),
                        shortcode: random_base36(rng, 11),
                        url: url.to_string(),
                        kind: post.kind,
                        timestamp: now - Duration::milliseconds(age_ms),
                        owner: PostOwner {
                            username: username.clone(),
                            full_name: capitalize(&username),
                            is_verified: rng.gen_bool(0.5),
                            follower_count: rng.gen_range(10_000..100_010_000),
                        },
                    },
                    media: vec![MediaItem {
                        kind: "image".to_string(),
                        url: format!(
                            "https://images.unsplash.com/photo-{}?w=1080&h=1080&fit=crop",
                            rng.gen_range(0..1_000_000_000_000u64)
                        ),
                        thumbnail_url: format!(
                            "https://images.unsplash.com/photo-{}?w=400&h=400&fit=crop",
                            rng.gen_range(0..1_000_000_000_000u64)
                        ),
                        width: 1080,
                        height: 1080,
                    }],
                    caption: Caption {
                        text: post.caption.to_string(),
                        language: "en".to_string(),
                        sentiment: Sentiment {
                            score: rng.gen_range(0.85..=0.99),
                            label: "positive".to_string(),
                        },
                    },
                    hashtags: post
                        .hashtags
                        .iter()
                        .map(|tag| HashtagInsight {
                            tag: tag.to_string(),
                            posts: rng.gen_range(1_000_000..1_001_000_000),
                            popularity: pick(rng, POPULARITIES),
                            performance_score: rng.gen_range(60..100),
                        })
                        .collect(),
                    engagement: Engagement {
                        likes: post.likes,
                        comments: post.comments,
                        saves: post.saves,
                        shares: post.saves / 2,
                        engagement_rate: rng.gen_range(0.02..0.12),
                    },
                    location: rng.gen_bool(0.5).then(|| Location {
                        name: pick(rng, LOCATIONS).to_string(),
                        latitude: rng.gen_range(-90.0..90.0),
                        longitude: rng.gen_range(-180.0..180.0),
                    }),
                    ocr: options.extract_text.then(|| OcrBlock {
                        extracted_text: OFFER_TEXT.to_string(),
                        confidence: rng.gen_range(0.92..=0.99),
                    }),
                    ai_analysis: AiAnalysis::canned(),
                }
            });

            Ok(analysis)
        }
        .instrument(span)
        .await
    }

    async fn scrape_profile(
        &self,
        username: &str,
        options: &ProfileScrapeOptions,
    ) -> Result<InstagramProfile, ServiceError> {
        self.rng.simulate_latency(&self.latency.profile).await;

        let limit = options.post_limit.unwrap_or(DEFAULT_POST_LIMIT);
        let now = Utc::now();

        let profile = self.rng.with(|rng| InstagramProfile {
            username: username.to_string(),
            full_name: capitalize(username),
            bio: "Official account | Inspiring athletes worldwide 🌍".to_string(),
            is_verified: true,
            follower_count: rng.gen_range(1_000_000..101_000_000),
            following_count: rng.gen_range(100..1_100),
            post_count: rng.gen_range(500..5_500),
            engagement_rate: rng.gen_range(0.01..0.06),
            recent_posts: (0..limit)
                .map(|i| RecentPost {
                    id: format!("post_{}", i),
                    likes: rng.gen_range(100_000..5_100_000),
                    comments: rng.gen_range(1_000..51_000),
                    kind: pick(rng, POST_TYPES),
                    timestamp: now - Duration::days(i as i64),
                })
                .collect(),
            top_hashtags: ["justdoit", "nike", "sports", "fitness", "motivation"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            best_posting_times: ["Mon 11AM", "Wed 2PM", "Fri 10AM"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        });

        Ok(profile)
    }

    async fn analyze_hashtag(&self, hashtag: &str) -> Result<HashtagReport, ServiceError> {
        self.rng.simulate_latency(&self.latency.hashtag).await;

        let tag = hashtag.strip_prefix('#').unwrap_or(hashtag);
        let report = self.rng.with(|rng| HashtagReport {
            hashtag: tag.to_string(),
            total_posts: rng.gen_range(1_000_000..1_001_000_000),
            daily_growth: rng.gen_range(1_000..51_000),
            trend_status: pick(rng, TRENDS),
            difficulty: pick(rng, DIFFICULTIES),
            related_hashtags: vec![
                related("marketing", 187_000_000, Popularity::VeryHigh),
                related("socialmedia", 89_000_000, Popularity::High),
                related("contentcreator", 34_000_000, Popularity::Medium),
                related("digitalmarketing", 47_000_000, Popularity::High),
            ],
        });

        Ok(report)
    }
}

fn related(tag: &str, posts: u64, popularity: Popularity) -> RelatedHashtag {
    RelatedHashtag {
        tag: tag.to_string(),
        posts,
        popularity,
    }
}
