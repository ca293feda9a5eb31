use markup::{Child, LazyConfig, StructuralTag};
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use wiki_api::{ApiError, ArticleRef, ClientConfig, WikiClient};

/// Serve `routes` (path and query -> status, body) for `requests`
/// connections; every request target seen is sent back on the channel.
fn spawn_stub(
    routes: Vec<(&'static str, u16, &'static str)>,
    requests: usize,
) -> (String, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub server");
    let port = listener.local_addr().expect("local addr").port();
    let (seen_tx, seen_rx) = mpsc::channel();

    thread::spawn(move || {
        for stream in listener.incoming().take(requests) {
            let Ok(mut stream) = stream else {
                continue;
            };
            let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
            let mut request_line = String::new();
            reader.read_line(&mut request_line).expect("request line");
            loop {
                let mut header = String::new();
                let read = reader.read_line(&mut header).expect("header line");
                if read == 0 || header == "\r\n" {
                    break;
                }
            }
            let target = request_line
                .split_whitespace()
                .nth(1)
                .unwrap_or_default()
                .to_string();
            let (status, body) = routes
                .iter()
                .find(|(path, _, _)| *path == target)
                .map(|(_, status, body)| (*status, *body))
                .unwrap_or((404, "{}"));
            let reason = if status == 200 { "OK" } else { "Not Found" };
            let response = format!(
                "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).expect("write response");
            let _ = seen_tx.send(target);
        }
    });

    (format!("http://127.0.0.1:{port}/{{wiki}}/api/v1/"), seen_rx)
}

fn client_for(api_root: String) -> WikiClient {
    let config = ClientConfig {
        api_root,
        min_interval: Duration::from_millis(1),
        timeout: Duration::from_secs(5),
        ..ClientConfig::default()
    };
    WikiClient::new("testwiki", &config).expect("client")
}

#[test]
fn lists_articles_and_parses_content() {
    let (root, seen) = spawn_stub(
        vec![
            (
                "/testwiki/api/v1/Articles/List?limit=2",
                200,
                r#"{"items":[{"id":1,"title":"Alpha","url":"/wiki/Alpha","ns":0},{"id":2,"title":"Beta"}]}"#,
            ),
            (
                "/testwiki/api/v1/Articles/AsJson?title=Alpha",
                200,
                r#"{"content":"<h2>Intro</h2><p>First.</p><p>Second.</p>"}"#,
            ),
        ],
        2,
    );
    let client = client_for(root);

    let articles = client.fetch_articles(&[("limit", "2")]).expect("listing");
    assert_eq!(articles.len(), 2);
    assert_eq!(articles[0].namespace, Some(0));
    assert_eq!(articles[1].title.as_deref(), Some("Beta"));
    assert_eq!(articles[1].url, None);

    let target = ArticleRef::from_parts(None, articles[0].title.as_deref()).expect("title");
    let tree = client.article(target).content().expect("content");
    let labels: Vec<_> = tree.elements().map(|node| node.label()).collect();
    assert_eq!(labels, vec![Some(StructuralTag::H2), Some(StructuralTag::P)]);
    let paragraph = tree.elements().nth(1).expect("paragraph");
    assert_eq!(paragraph.children(), &[Child::Text("First.\nSecond.".to_string())]);

    let targets: Vec<String> = (0..2)
        .map(|_| seen.recv_timeout(Duration::from_secs(5)).expect("request seen"))
        .collect();
    assert_eq!(
        targets,
        vec![
            "/testwiki/api/v1/Articles/List?limit=2",
            "/testwiki/api/v1/Articles/AsJson?title=Alpha",
        ]
    );
}

#[test]
fn tables_use_lazy_builder() {
    let (root, _seen) = spawn_stub(
        vec![(
            "/testwiki/api/v1/Articles/AsJson?id=5",
            200,
            r#"{"content":"<table><tr><td>Born</td><td>1900</td></tr></table>"}"#,
        )],
        1,
    );
    let client = client_for(root);
    let entries = client
        .article(ArticleRef::Id(5))
        .tables(LazyConfig::default())
        .expect("tables");
    assert_eq!(
        entries,
        vec![markup::Entry::Titled {
            title: "Born".to_string(),
            body: Box::new(markup::Entry::Cell(markup::Cell::Text("1900".to_string()))),
        }]
    );
}

#[test]
fn non_success_status_is_an_error() {
    let (root, _seen) = spawn_stub(Vec::new(), 1);
    let client = client_for(root);
    let err = client.query("Articles/List", &[]).expect_err("404");
    match err {
        ApiError::Status { status, url } => {
            assert_eq!(status, 404);
            assert!(url.ends_with("/testwiki/api/v1/Articles/List"), "{url}");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}
