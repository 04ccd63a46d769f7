use facesnap_common::config::AiConfig;
use facesnap_region_model::{NormalizedRegion, RasterImage};
use facesnap_vision_ai::{FixedProposer, GeminiProposer, RegionProposer};
use image::{Rgba, RgbaImage};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serves one HTTP request with a canned `generateContent` answer and
/// hands back the raw request it received.
async fn serve_once(answer: &'static str) -> (String, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = format!("http://{}/v1beta", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut chunk = [0u8; 8192];
        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            assert!(n > 0, "client closed before sending the whole request");
            request.extend_from_slice(&chunk[..n]);
            if let Some(head_end) = find(&request, b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&request[..head_end]).to_ascii_lowercase();
                let body_len = head
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if request.len() >= head_end + 4 + body_len {
                    break;
                }
            }
        }

        let response = format!(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            answer.len(),
            answer
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.ok();
        String::from_utf8_lossy(&request).into_owned()
    });

    (endpoint, handle)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn frame() -> RasterImage {
    RasterImage::from_rgba(RgbaImage::from_pixel(32, 24, Rgba([90, 120, 150, 255])))
}

#[tokio::test]
async fn fixed_proposer_counts_calls() {
    let region = NormalizedRegion::new(0.2, 0.1, 0.5, 0.5);
    let proposer = FixedProposer::found(region);

    assert_eq!(proposer.propose(&frame()).await, Some(region));
    assert_eq!(proposer.propose(&frame()).await, Some(region));
    assert_eq!(proposer.calls(), 2);
}

#[tokio::test]
async fn empty_proposer_finds_nothing() {
    let proposer = FixedProposer::empty();
    assert_eq!(proposer.propose(&frame()).await, None);
    assert_eq!(proposer.name(), "fixed");
}

#[tokio::test]
async fn gemini_without_key_yields_none() {
    let proposer = GeminiProposer::with_api_key(&AiConfig::default(), None).unwrap();
    assert_eq!(proposer.propose(&frame()).await, None);
}

#[tokio::test]
async fn gemini_unreachable_endpoint_yields_none() {
    let config = AiConfig {
        endpoint: "http://127.0.0.1:9".to_string(),
        timeout_secs: 2,
        ..AiConfig::default()
    };
    let proposer = GeminiProposer::with_api_key(&config, Some("test-key".to_string())).unwrap();
    assert_eq!(proposer.propose(&frame()).await, None);
}

#[tokio::test]
async fn gemini_maps_provider_box_to_region() {
    let answer = r#"{"candidates":[{"content":{"parts":[{"text":"{\"box\": [100, 200, 600, 700]}"}]}}]}"#;
    let (endpoint, server) = serve_once(answer).await;
    let config = AiConfig {
        endpoint,
        timeout_secs: 5,
        ..AiConfig::default()
    };
    let proposer = GeminiProposer::with_api_key(&config, Some("test-key".to_string())).unwrap();

    let region = proposer.propose(&frame()).await.unwrap();
    // Default convention: [ymin, xmin, ymax, xmax] on a 0..1000 scale.
    assert!((region.x - 0.2).abs() < 1e-9);
    assert!((region.y - 0.1).abs() < 1e-9);
    assert!((region.width - 0.5).abs() < 1e-9);
    assert!((region.height - 0.5).abs() < 1e-9);

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /v1beta/models/gemini-3-flash-preview:generateContent "));
    assert!(request.to_ascii_lowercase().contains("x-goog-api-key: test-key"));
    assert!(request.contains("\"inlineData\""));
    assert!(request.contains("image/jpeg"));
}

#[tokio::test]
async fn gemini_empty_box_is_no_face() {
    let answer = r#"{"candidates":[{"content":{"parts":[{"text":"{\"box\": []}"}]}}]}"#;
    let (endpoint, server) = serve_once(answer).await;
    let config = AiConfig {
        endpoint,
        timeout_secs: 5,
        ..AiConfig::default()
    };
    let proposer = GeminiProposer::with_api_key(&config, Some("test-key".to_string())).unwrap();

    assert_eq!(proposer.propose(&frame()).await, None);
    server.await.unwrap();
}
