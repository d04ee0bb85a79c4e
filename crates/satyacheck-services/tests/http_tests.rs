use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;
use std::time::Duration;

use satyacheck_nlp::{EntityExtractionError, EntityExtractor};
use satyacheck_scoring::SemanticSimilarity;
use satyacheck_services::{
    Classification, ClassifierClient, JsonClient, NerClient, NewsClassifier, ServiceError,
    SimilarityClient,
};

/// Serve one canned HTTP response and return the request body.
fn serve_once(status: &'static str, body: &'static str) -> (String, thread::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let url = format!("http://{}/", listener.local_addr().expect("addr"));
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = stream.read(&mut chunk).expect("read");
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(head_end) = text.find("\r\n\r\n") {
                let length = text[..head_end]
                    .lines()
                    .find_map(|l| {
                        let (k, v) = l.split_once(':')?;
                        k.eq_ignore_ascii_case("content-length")
                            .then(|| v.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= head_end + 4 + length || n == 0 {
                    break;
                }
            }
            if n == 0 {
                break;
            }
        }
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).expect("write");
        let text = String::from_utf8_lossy(&buf).to_string();
        text.split_once("\r\n\r\n").map(|(_, b)| b.to_string()).unwrap_or_default()
    });
    (url, handle)
}

fn http() -> JsonClient {
    JsonClient::new(Some(Duration::from_secs(10))).expect("client")
}

#[test]
fn ner_client_posts_text_and_decodes_entities() {
    let (url, server) = serve_once("200 OK", r#"{"persons":["මහින්ද"],"locations":[],"organizations":[],"events":[]}"#);
    let entities = NerClient::new(http(), url).extract_entities("මහින්ද කතා කළේය").expect("entities");
    assert_eq!(entities.persons, vec!["මහින්ද"]);

    let request: serde_json::Value = serde_json::from_str(&server.join().expect("server")).expect("json body");
    assert_eq!(request["text"], "මහින්ද කතා කළේය");
}

#[test]
fn non_success_status_is_a_service_error() {
    let (url, server) = serve_once("503 Service Unavailable", r#"{"detail":"warming up"}"#);
    let err = NerClient::new(http(), url).extract_entities("x").expect_err("503");
    server.join().expect("server");
    assert!(matches!(err, EntityExtractionError::Service(m) if m.contains("503")));
}

#[test]
fn similarity_client_sends_trusted_texts() {
    let (url, server) = serve_once("200 OK", r#"{"max_similarity":0.64}"#);
    let score = SimilarityClient::new(http(), url)
        .max_similarity("අලුත් පුවත", &["පැරණි පුවත".to_string(), "වෙනත්".to_string()])
        .expect("score");
    assert_eq!(score, 0.64);

    let request: serde_json::Value = serde_json::from_str(&server.join().expect("server")).expect("json body");
    assert_eq!(request["news_text"], "අලුත් පුවත");
    assert_eq!(request["trusted_texts"].as_array().map(|a| a.len()), Some(2));
}

#[test]
fn classifier_client_decodes_labels() {
    let (url, server) = serve_once("200 OK", r#"{"category":"politics","subcategory":"local_politics"}"#);
    let classification = ClassifierClient::new(http(), url).classify("ඡන්දය").expect("classify");
    server.join().expect("server");
    assert_eq!(
        classification,
        Classification {
            category: "politics".to_string(),
            subcategory: "local_politics".to_string(),
        }
    );
}

#[test]
fn unreachable_service_is_an_http_error() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let url = format!("http://{}/", listener.local_addr().expect("addr"));
    drop(listener);
    let err = ClassifierClient::new(http(), url).classify("x").expect_err("refused");
    assert!(matches!(err, ServiceError::Http { .. }));
}
