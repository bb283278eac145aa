use serde_json::{Value, json};
use tokio::process::Command;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

#[tokio::test]
async fn json_output_stays_parseable_without_video_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/extract"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "url": "https://example.com/talk",
                "start_time": "0",
                "end_time": "60",
                "summary": "A talk.",
                "transcription": "hello",
                "books": [],
                "people": [],
                "places": [],
                "facts": [],
                "topics": [],
                "processed_at": "2024-05-01 12:00:00",
            }
        })))
        .mount(&server)
        .await;

    let output = Command::new(env!("CARGO_BIN_EXE_ytknow"))
        .args(["extract", "https://example.com/talk", "--end", "60", "--json"])
        .arg("--backend-url")
        .arg(server.uri())
        .env_remove("RUST_LOG")
        .env_remove("LOG_FORMAT")
        .output()
        .await
        .unwrap();

    assert!(output.status.success());
    let view: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(view["mode"], "results");
    assert!(view["results"]["player"].is_null());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No YouTube video id"));
}
