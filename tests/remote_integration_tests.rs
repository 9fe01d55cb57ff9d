//! Integration tests for the remote model route against a mock Ollama server

use nova::{
    assistant::Assistant,
    config::{Config, RemoteProvider},
    matcher::KnowledgeBase,
    memory::MemoryStore,
    ReplySource, Responder,
};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn ollama_config(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.remote.provider = RemoteProvider::Ollama;
    config.remote.ollama_url = server.uri();
    config.remote.ollama_model = "qwen".to_string();
    config.remote.timeout_secs = 5;
    config.search.enabled = false;
    config
}

fn assistant_for(config: &Config) -> Assistant {
    let responder = Responder::from_config(config, KnowledgeBase::builtin())
        .unwrap()
        .with_seed(9);
    Assistant::new(responder, Arc::new(MemoryStore::new()))
}

#[tokio::test]
async fn test_remote_model_answers_first() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({"model": "qwen", "stream": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "qwen",
            "response": "Halo dari model lokal!",
            "done": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut assistant = assistant_for(&ollama_config(&server));
    assert!(assistant.responder().has_generator());

    let reply = assistant.turn("halo").await;
    assert_eq!(reply.source, ReplySource::Remote);
    assert_eq!(reply.text, "Halo dari model lokal!");

    // Remote turns are still remembered
    assert_eq!(assistant.state().log.len(), 1);
}

#[tokio::test]
async fn test_remote_failure_falls_back_to_local_pipeline() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
        .mount(&server)
        .await;

    let mut assistant = assistant_for(&ollama_config(&server));

    let reply = assistant.turn("5 + 3").await;
    assert_eq!(reply.source, ReplySource::Math);

    let reply = assistant.turn("ibukota indonesia seharusnya: Nusantara").await;
    assert_eq!(reply.source, ReplySource::CorrectionLearned);
}

#[tokio::test]
async fn test_offline_config_skips_remote() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "unused"})))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = ollama_config(&server);
    config.remote.provider = RemoteProvider::None;

    let mut assistant = assistant_for(&config);
    let reply = assistant.turn("halo").await;
    assert_eq!(reply.source, ReplySource::Greeting);
}
