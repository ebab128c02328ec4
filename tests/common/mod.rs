//! Shared test infrastructure: minimal TCP mock upstreams.
//!
//! Raw sockets instead of a real HTTP server keep failure modes under exact
//! control (dropped connections, slow responses, echoed request heads).

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

fn http_response(status: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}

async fn read_request_head(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = vec![0u8; 8192];
    let mut head = Vec::new();
    loop {
        let n = match socket.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        head.extend_from_slice(&buf[..n]);
        if head.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }
    String::from_utf8_lossy(&head).into_owned()
}

/// Upstream that answers every request with 200 and a fixed body. Returns
/// the address and a hit counter.
pub async fn start_mock_upstream(body: &'static str) -> (SocketAddr, Arc<AtomicU32>) {
    start_programmable_upstream(move |_head| http_response("200 OK", body)).await
}

/// Upstream whose response is computed from the request head.
pub async fn start_programmable_upstream<F>(respond: F) -> (SocketAddr, Arc<AtomicU32>)
where
    F: Fn(&str) -> String + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicU32::new(0));
    let counter = hits.clone();
    let respond = Arc::new(respond);

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            counter.fetch_add(1, Ordering::SeqCst);
            let respond = respond.clone();
            tokio::spawn(async move {
                let head = read_request_head(&mut socket).await;
                let _ = socket.write_all(respond(&head).as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (addr, hits)
}

/// Upstream that drops the first `fail_first` connections without writing a
/// byte, then serves 200 "recovered".
pub async fn start_flaky_upstream(fail_first: u32) -> (SocketAddr, Arc<AtomicU32>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicU32::new(0));
    let counter = hits.clone();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let attempt = counter.fetch_add(1, Ordering::SeqCst) + 1;
            tokio::spawn(async move {
                if attempt <= fail_first {
                    drop(socket);
                    return;
                }
                let _ = read_request_head(&mut socket).await;
                let _ = socket
                    .write_all(http_response("200 OK", "recovered").as_bytes())
                    .await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (addr, hits)
}

/// Upstream that answers 200 with the raw request head as the body, so tests
/// can assert on the forwarded method, path, and headers.
pub async fn start_echo_upstream() -> (SocketAddr, Arc<AtomicU32>) {
    start_programmable_upstream(|head| http_response("200 OK", head)).await
}

/// Upstream that sleeps before answering, for timeout tests.
pub async fn start_slow_upstream(delay: Duration) -> (SocketAddr, Arc<AtomicU32>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicU32::new(0));
    let counter = hits.clone();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::spawn(async move {
                let _ = read_request_head(&mut socket).await;
                tokio::time::sleep(delay).await;
                let _ = socket
                    .write_all(http_response("200 OK", "late").as_bytes())
                    .await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (addr, hits)
}
