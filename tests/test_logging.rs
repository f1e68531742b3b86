use gatehouse::logging::{format_line, LogFile, LogSink};
use std::sync::Arc;
use tempfile::TempDir;

fn assert_log_line(line: &str, message: &str) {
    // [YYYY-MM-DD HH:MM:SS] message
    assert_eq!(&line[0..1], "[");
    assert_eq!(&line[20..22], "] ");
    assert_eq!(&line[5..6], "-");
    assert_eq!(&line[11..12], " ");
    assert_eq!(&line[22..], message);
}

#[test]
fn test_format_line() {
    let line = format_line("hello");
    assert!(line.ends_with('\n'));
    assert_log_line(line.trim_end_matches('\n'), "hello");
}

#[tokio::test]
async fn test_open_creates_files_and_parents() {
    let dir = TempDir::new().unwrap();
    let access = dir.path().join("nested/logs/access.log");
    let error = dir.path().join("other/error.log");

    let sink = LogSink::open(&access, &error).await.unwrap();

    assert!(access.is_file());
    assert!(error.is_file());
    assert_eq!(sink.access_path(), access.as_path());
    assert_eq!(sink.error_path(), error.as_path());
}

#[tokio::test]
async fn test_access_and_error_go_to_separate_files() {
    let dir = TempDir::new().unwrap();
    let sink = LogSink::new(dir.path().join("access.log"), dir.path().join("error.log"));

    sink.access("served /index.html").await;
    sink.error("refused 203.0.113.1").await;
    sink.access("served /a.txt").await;

    let access = std::fs::read_to_string(dir.path().join("access.log")).unwrap();
    let error = std::fs::read_to_string(dir.path().join("error.log")).unwrap();

    let access_lines: Vec<&str> = access.lines().collect();
    assert_eq!(access_lines.len(), 2);
    assert_log_line(access_lines[0], "served /index.html");
    assert_log_line(access_lines[1], "served /a.txt");

    let error_lines: Vec<&str> = error.lines().collect();
    assert_eq!(error_lines.len(), 1);
    assert_log_line(error_lines[0], "refused 203.0.113.1");
}

#[tokio::test]
async fn test_append_keeps_existing_content() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("access.log");
    std::fs::write(&path, "previous run\n").unwrap();

    let file = LogFile::new(&path);
    file.append("next\n").await.unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "previous run\nnext\n");
}

#[tokio::test]
async fn test_concurrent_writers_do_not_interleave() {
    let dir = TempDir::new().unwrap();
    let sink = LogSink::new(dir.path().join("access.log"), dir.path().join("error.log"));
    let sink = Arc::new(sink);

    let mut tasks = Vec::new();
    for worker in 0..8 {
        let sink = sink.clone();
        tasks.push(tokio::spawn(async move {
            for i in 0..50 {
                sink.access(format!("worker-{} line-{} {}", worker, i, "x".repeat(200)))
                    .await;
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    let access = std::fs::read_to_string(dir.path().join("access.log")).unwrap();
    let lines: Vec<&str> = access.lines().collect();
    assert_eq!(lines.len(), 400);
    for line in lines {
        assert!(line.starts_with('['));
        assert!(line.contains("worker-"));
        assert!(line.ends_with(&"x".repeat(200)));
    }
}
