//! Social media mock generators driven through their service traits.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::ConfigBuilder;
use snapscribe::config::Config;
use snapscribe::social::instagram::{PostAnalysisOptions, ProfileScrapeOptions};
use snapscribe::social::tiktok::DownloadOptions;
use snapscribe::social::{InstagramService, MockInstagramService, MockTikTokService, TikTokService};

#[tokio::test]
async fn tiktok_services_are_substitutable() {
    let config = ConfigBuilder::new().build();
    let service: Arc<dyn TikTokService> = Arc::new(MockTikTokService::from_config(&config));

    let video = service
        .download_video(
            "https://www.tiktok.com/@baker/video/7",
            &DownloadOptions {
                generate_transcript: true,
            },
        )
        .await
        .unwrap();
    assert_eq!(video.metadata.author.username, "baker");
    assert!(video.transcript.is_some());

    let profile = service.analyze_profile("baker").await.unwrap();
    assert_eq!(profile.username, "baker");

    let sound = service.track_sound("s1").await.unwrap();
    assert_eq!(sound.top_videos.len(), 5);
}

#[tokio::test]
async fn instagram_payloads_serialize_camel_case() {
    let config = ConfigBuilder::new().build();
    let service: Arc<dyn InstagramService> = Arc::new(MockInstagramService::from_config(&config));

    let analysis = service
        .analyze_post(
            "https://instagram.com/@studio/p/xyz",
            &PostAnalysisOptions { extract_text: true },
        )
        .await
        .unwrap();
    let json = serde_json::to_value(&analysis).unwrap();
    assert!(json["jobId"].as_str().unwrap().starts_with("job_inst_"));
    assert_eq!(json["post"]["owner"]["fullName"], "Studio");
    assert!(json["aiAnalysis"]["colors"].is_array());
    assert!(json["ocr"]["extractedText"].is_string());

    let profile = service
        .scrape_profile("studio", &ProfileScrapeOptions { post_limit: Some(4) })
        .await
        .unwrap();
    let json = serde_json::to_value(&profile).unwrap();
    assert_eq!(json["recentPosts"].as_array().unwrap().len(), 4);
    assert_eq!(json["bestPostingTimes"][0], "Mon 11AM");

    let hashtag = service.analyze_hashtag("#travel").await.unwrap();
    let json = serde_json::to_value(&hashtag).unwrap();
    assert_eq!(json["hashtag"], "travel");
    assert_eq!(json["relatedHashtags"][0]["popularity"], "very_high");
}

#[tokio::test(start_paused = true)]
async fn default_delays_are_applied() {
    let config = Config {
        seed: Some(2),
        ..Config::default()
    };

    let tiktok = MockTikTokService::from_config(&config);
    let start = tokio::time::Instant::now();
    tiktok.track_sound("s").await.unwrap();
    assert!(start.elapsed() >= Duration::from_millis(1500));

    let instagram = MockInstagramService::from_config(&config);
    let start = tokio::time::Instant::now();
    instagram
        .scrape_profile("x", &ProfileScrapeOptions::default())
        .await
        .unwrap();
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(3000));
    assert!(elapsed <= Duration::from_millis(5100));
}
