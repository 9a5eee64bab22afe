//! TikTok video, profile and sound mocks.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::schema::{Config, TikTokLatency};
use crate::error::ServiceError;
use crate::ids::random_base36;
use crate::sim::SimRng;
use crate::social::{capitalize, handle_from_url, unix_millis};

const DEFAULT_USERNAME: &str = "creator";

const CAPTIONS: &[&str] = &[
    "Check out this amazing transformation! 🔥 #fyp #viral #trending #transformation",
    "POV: When you finally figure it out 😂 #comedy #relatable #foryou",
    "This recipe will change your life! 🍕 #cooking #foodtok #recipe #chef",
    "Day in my life as a content creator 📱 #dayinmylife #creator #vlog",
    "You need to try this hack! 💡 #lifehack #tips #tutorial #helpful",
];

struct CannedSound {
    title: &'static str,
    is_original: bool,
    trending_rank: u32,
}

const SOUNDS: &[CannedSound] = &[
    CannedSound {
        title: "Original Sound - @creator",
        is_original: true,
        trending_rank: 5,
    },
    CannedSound {
        title: "Trending Sound 2024",
        is_original: false,
        trending_rank: 1,
    },
    CannedSound {
        title: "Viral Audio",
        is_original: false,
        trending_rank: 3,
    },
    CannedSound {
        title: "Popular Track",
        is_original: false,
        trending_rank: 12,
    },
];

const SOUND_CATEGORIES: &[&str] = &["Dance", "Lip Sync", "Comedy", "Transition"];

const TRANSCRIPT: &str =
    "Hey guys, welcome back to my channel. Today I'm going to show you something amazing...";

// ─── Response types ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadOptions {
    #[serde(default)]
    pub generate_transcript: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TikTokVideoData {
    pub job_id: String,
    pub video: VideoInfo,
    pub audio: AudioInfo,
    pub metadata: VideoMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<Transcript>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoInfo {
    pub id: String,
    pub url: String,
    pub thumbnail_url: String,
    /// Seconds.
    pub duration: f64,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioInfo {
    pub url: String,
    pub format: String,
    pub duration: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoMetadata {
    pub caption: String,
    pub author: TikTokAuthor,
    pub sound: SoundInfo,
    pub stats: VideoStats,
    pub hashtags: Vec<HashtagReach>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TikTokAuthor {
    pub username: String,
    pub nickname: String,
    pub verified: bool,
    pub follower_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoundInfo {
    pub title: String,
    pub author: String,
    pub is_original: bool,
    pub trending_rank: u32,
    pub usage_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStats {
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    pub saves: u64,
    pub engagement_rate: f64,
}

impl VideoStats {
    /// Derives interaction counts from a view count.
    fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let views: u64 = rng.gen_range(100_000..10_100_000);
        let likes = (views as f64 * rng.gen_range(0.05..0.20)) as u64;
        let comments = (likes as f64 * rng.gen_range(0.01..0.06)) as u64;
        let shares = (likes as f64 * rng.gen_range(0.01..0.04)) as u64;
        let saves = (likes as f64 * rng.gen_range(0.01..0.05)) as u64;
        let engagement_rate = (likes + comments + shares + saves) as f64 / views as f64;

        Self {
            views,
            likes,
            comments,
            shares,
            saves,
            engagement_rate,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HashtagReach {
    pub name: String,
    pub views: u64,
    pub popularity: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transcript {
    pub text: String,
    pub language: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TikTokProfile {
    pub username: String,
    pub nickname: String,
    pub bio: String,
    pub verified: bool,
    pub follower_count: u64,
    pub following_count: u64,
    pub total_likes: u64,
    pub video_count: u64,
    pub recent_videos: Vec<RecentVideo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentVideo {
    pub id: String,
    pub views: u64,
    pub likes: u64,
    #[serde(rename = "type")]
    pub kind: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoundTrend {
    pub id: String,
    pub title: String,
    pub author: String,
    pub duration: u32,
    pub usage_count: u64,
    pub trending_rank: u32,
    pub category: String,
    pub top_videos: Vec<VideoEngagement>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoEngagement {
    pub id: String,
    pub views: u64,
    pub likes: u64,
}

// ─── Service ────────────────────────────────────────────────────────────────

#[async_trait]
pub trait TikTokService: Send + Sync {
    async fn download_video(
        &self,
        url: &str,
        options: &DownloadOptions,
    ) -> Result<TikTokVideoData, ServiceError>;

    async fn analyze_profile(&self, username: &str) -> Result<TikTokProfile, ServiceError>;

    async fn track_sound(&self, sound_id: &str) -> Result<SoundTrend, ServiceError>;
}

pub struct MockTikTokService {
    latency: TikTokLatency,
    rng: SimRng,
}

impl MockTikTokService {
    pub fn new(latency: TikTokLatency, seed: Option<u64>) -> Self {
        Self {
            latency,
            rng: SimRng::new(seed),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.latency.tiktok.clone(), config.seed)
    }
}

#[async_trait]
impl TikTokService for MockTikTokService {
    async fn download_video(
        &self,
        url: &str,
        options: &DownloadOptions,
    ) -> Result<TikTokVideoData, ServiceError> {
        self.rng.simulate_latency(&self.latency.download).await;

        let username = handle_from_url(url).unwrap_or_else(|| DEFAULT_USERNAME.to_string());
        let stamp = unix_millis();
        debug!("Generating TikTok video data for @{}", username);

        let data = self.rng.with(|rng| {
            let caption = CAPTIONS.choose(rng).copied().unwrap_or(CAPTIONS[0]);
            let sound = SOUNDS.choose(rng).unwrap_or(&SOUNDS[0]);

            TikTokVideoData {
                job_id: format!("job_tiktok_{}", stamp),
                video: VideoInfo {
                    id: random_base36(rng, 15),
                    url: format!("https://cdn.example.com/tiktok_video_{}.mp4", stamp),
                    thumbnail_url: format!(
                        "https://images.unsplash.com/photo-{}?w=1080&h=1920&fit=crop",
                        rng.gen_range(0..1_000_000_000_000u64)
                    ),
                    duration: rng.gen_range(10.0..60.0),
                    width: 1080,
                    height: 1920,
                },
                audio: AudioInfo {
                    url: format!("https://cdn.example.com/tiktok_audio_{}.mp3", stamp),
                    format: "mp3".to_string(),
                    duration: rng.gen_range(10.0..60.0),
                },
                metadata: VideoMetadata {
                    caption: caption.to_string(),
                    author: TikTokAuthor {
                        username: username.clone(),
                        nickname: capitalize(&username),
                        verified: rng.gen_bool(0.3),
                        follower_count: rng.gen_range(10_000..5_010_000),
                    },
                    sound: SoundInfo {
                        title: sound.title.to_string(),
                        author: if sound.is_original {
                            username.clone()
                        } else {
                            "Various Artists".to_string()
                        },
                        is_original: sound.is_original,
                        trending_rank: sound.trending_rank,
                        usage_count: rng.gen_range(10_000..1_010_000),
                    },
                    stats: VideoStats::generate(rng),
                    hashtags: vec![
                        hashtag("fyp", 1_200_000_000_000),
                        hashtag("viral", 890_000_000_000),
                        hashtag("trending", 567_000_000_000),
                    ],
                },
                transcript: options.generate_transcript.then(|| Transcript {
                    text: TRANSCRIPT.to_string(),
                    language: "en".to_string(),
                    confidence: rng.gen_range(0.85..=0.99),
                }),
            }
        });

        Ok(data)
    }

    async fn analyze_profile(&self, username: &str) -> Result<TikTokProfile, ServiceError> {
        self.rng.simulate_latency(&self.latency.profile).await;

        let now = Utc::now();
        let profile = self.rng.with(|rng| TikTokProfile {
            username: username.to_string(),
            nickname: capitalize(username),
            bio: "Creating content that matters 🎬✨".to_string(),
            verified: rng.gen_bool(0.4),
            follower_count: rng.gen_range(50_000..10_050_000),
            following_count: rng.gen_range(100..2_100),
            total_likes: rng.gen_range(1_000_000..101_000_000),
            video_count: rng.gen_range(50..1_050),
            recent_videos: (0..12)
                .map(|i| RecentVideo {
                    id: format!("video_{}", i),
                    views: rng.gen_range(100_000..5_100_000),
                    likes: rng.gen_range(10_000..510_000),
                    kind: "video".to_string(),
                    timestamp: now - Duration::days(i),
                })
                .collect(),
        });

        Ok(profile)
    }

    async fn track_sound(&self, sound_id: &str) -> Result<SoundTrend, ServiceError> {
        self.rng.simulate_latency(&self.latency.sound).await;

        let trend = self.rng.with(|rng| SoundTrend {
            id: sound_id.to_string(),
            title: SOUNDS[0].title.to_string(),
            author: "Artist Name".to_string(),
            duration: 15,
            usage_count: rng.gen_range(10_000..1_010_000),
            trending_rank: rng.gen_range(1..=50),
            category: SOUND_CATEGORIES
                .choose(rng)
                .copied()
                .unwrap_or(SOUND_CATEGORIES[0])
                .to_string(),
            top_videos: (0..5)
                .map(|i| VideoEngagement {
                    id: format!("video_{}", i),
                    views: rng.gen_range(100_000..10_100_000),
                    likes: rng.gen_range(10_000..1_010_000),
                })
                .collect(),
        });

        Ok(trend)
    }
}

fn hashtag(name: &str, views: u64) -> HashtagReach {
    HashtagReach {
        name: name.to_string(),
        views,
        popularity: "extreme".to_string(),
    }
}
