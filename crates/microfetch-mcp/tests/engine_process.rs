//! End-to-end dispatch against a real engine process (a shell script).

#![cfg(unix)]

use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::sync::Arc;

use serde_json::{json, Value};

use microfetch_mcp::config::ServerConfig;
use microfetch_mcp::context::ServerContext;
use microfetch_mcp::tools::ToolRegistry;

const FAKE_ENGINE: &str = r#"
case "$1" in
  fetch)
    if [ "$2" = "https://slow.test" ]; then sleep 5; fi
    printf '{"url":"%s","status":200}\n<p>%s</p>' "$2" "$2"
    ;;
  auth)
    echo "No credentials found for $2"
    ;;
  *)
    echo "unsupported: $1" >&2
    exit 2
    ;;
esac
"#;

fn fake_engine(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("microfetch");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "#!/bin/sh{FAKE_ENGINE}").unwrap();
    drop(file);
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn context(dir: &tempfile::TempDir) -> ServerContext {
    let mut config = ServerConfig::new(fake_engine(dir));
    config.default_timeout = std::time::Duration::from_millis(500);
    ServerContext::new(config)
}

async fn call(ctx: &ServerContext, name: &str, args: Value) -> (String, bool) {
    let result = ToolRegistry::call(name, Some(args), ctx).await;
    (result.joined_text(), result.is_error())
}

#[tokio::test]
async fn test_batch_through_real_processes() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(&dir);
    assert!(ctx.binary().is_available());

    let (text, is_error) = call(
        &ctx,
        "fetch_batch",
        json!({ "urls": ["https://a.test", "https://slow.test", "https://b.test"] }),
    )
    .await;

    assert!(!is_error);
    let a = text.find("=== https://a.test ===\n<p>https://a.test</p>\n").unwrap();
    let slow = text.find("=== https://slow.test ===\nError: Timeout after 0.5s\n").unwrap();
    let b = text.find("=== https://b.test ===\n<p>https://b.test</p>\n").unwrap();
    assert!(a < slow && slow < b);
}

#[tokio::test]
async fn test_lookup_and_unsupported_command() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(&dir);

    let (text, is_error) = call(&ctx, "auth_lookup", json!({ "url": "https://x.test" })).await;
    assert!(!is_error);
    assert_eq!(text, "No credentials found for https://x.test\n");

    let (text, is_error) = call(&ctx, "validate", json!({})).await;
    assert!(is_error);
    assert_eq!(text, "Error: unsupported: validate\n");
}
