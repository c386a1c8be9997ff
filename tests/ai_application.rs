//! AI Studio application client against a mock server.

mod common;

use aiplatform::studio::{
    ChatMessageOutput, ChatMessageRequest, FeedbackRating, FileObject, ResponseMode,
};
use aiplatform::RequestErrorKind;
use common::{app, server, sse_body, BEARER};
use futures::StreamExt;
use mockito::Matcher;
use serde_json::json;

#[tokio::test]
async fn blocking_chat_maps_answer_and_zero_usage() {
    let mut server = server().await;
    let mock = server
        .mock("POST", "/chat-messages")
        .match_header("authorization", BEARER)
        .match_body(Matcher::PartialJson(json!({
            "query": "hello",
            "user": "u1",
            "response_mode": "blocking",
            "inputs": {}
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "event": "message",
                "message_id": "m1",
                "conversation_id": "c1",
                "mode": "chat",
                "answer": "hi",
                "created_at": 1700000000
            })
            .to_string(),
        )
        .create_async()
        .await;

    let output = app(&server)
        .chat_message(ChatMessageRequest::new("hello", "u1"))
        .await
        .unwrap();
    let resp = output.into_blocking().expect("blocking response");
    assert_eq!(resp.answer, "hi");
    assert_eq!(resp.conversation_id, "c1");
    assert_eq!(resp.metadata.usage.total_tokens, 0);
    assert_eq!(resp.metadata.usage.currency, "INR");
    assert!(resp.metadata.retriever_resources.is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn streaming_chat_yields_deltas_in_order() {
    let mut server = server().await;
    let body = sse_body(&[
        r#"{"event":"message","answer":"Hel"}"#,
        "",
        ": keep-alive",
        "not json at all",
        r#"{"event":"message","answer":"lo"}"#,
        "[DONE]",
        r#"{"event":"message","answer":"never"}"#,
    ]);
    let mock = server
        .mock("POST", "/chat-messages")
        .match_header("accept", "text/event-stream")
        .match_body(Matcher::PartialJson(json!({"response_mode": "streaming"})))
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(body)
        .create_async()
        .await;

    let request = ChatMessageRequest::new("hello", "u1").response_mode(ResponseMode::Streaming);
    let stream = match app(&server).chat_message(request).await.unwrap() {
        ChatMessageOutput::Streaming(stream) => stream,
        ChatMessageOutput::Blocking(_) => panic!("expected a stream"),
    };
    let stats = stream.stats();
    let deltas = stream.collect_all().await.unwrap();
    let answers: Vec<_> = deltas.iter().filter_map(|d| d.answer.as_deref()).collect();
    assert_eq!(answers, vec!["Hel", "lo"]);
    assert_eq!(stats.frames(), 2);
    assert_eq!(stats.skipped_malformed(), 1);
    mock.assert_async().await;
}

#[tokio::test]
async fn forbidden_surfaces_service_message() {
    let mut server = server().await;
    server
        .mock("POST", "/chat-messages")
        .with_status(403)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message":"forbidden"}"#)
        .create_async()
        .await;

    let err = app(&server)
        .chat_message(ChatMessageRequest::new("hello", "u1"))
        .await
        .unwrap_err();
    assert_eq!(err.message(), "forbidden");
    assert_eq!(err.status(), Some(403));
    match err {
        aiplatform::Error::Request(e) => assert_eq!(e.kind, RequestErrorKind::Status),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn chat_with_remote_image_and_conversation() {
    let mut server = server().await;
    let mock = server
        .mock("POST", "/chat-messages")
        .match_body(Matcher::PartialJson(json!({
            "conversation_id": "c9",
            "files": [{"type": "image", "transfer_method": "remote_url", "url": "https://img.example.com/cat.png"}]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"answer":"a cat"}"#)
        .create_async()
        .await;

    let request = ChatMessageRequest::new("what is this?", "u1")
        .conversation_id("c9")
        .file(FileObject::remote_image("https://img.example.com/cat.png"));
    let resp = app(&server)
        .chat_message(request)
        .await
        .unwrap()
        .into_blocking()
        .unwrap();
    assert_eq!(resp.answer, "a cat");
    mock.assert_async().await;
}

#[tokio::test]
async fn file_upload_sends_multipart() {
    let mut server = server().await;
    let mock = server
        .mock("POST", "/files/upload")
        .match_header("content-type", Matcher::Regex("multipart/form-data".into()))
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="user""#.into()),
            Matcher::Regex(r#"filename="cat.png""#.into()),
        ]))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "id": "f1",
                "name": "cat.png",
                "size": 7,
                "extension": "png",
                "mime_type": "image/png",
                "created_by": "u1",
                "created_at": 1700000001
            })
            .to_string(),
        )
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cat.png");
    std::fs::write(&path, b"PNGDATA").unwrap();

    let uploaded = app(&server).file_upload(&path, "u1").await.unwrap();
    assert_eq!(uploaded.id, "f1");
    assert_eq!(uploaded.size, 7);
    assert_eq!(uploaded.mime_type, "image/png");
    mock.assert_async().await;
}

#[tokio::test]
async fn conversation_history_paging() {
    let mut server = server().await;
    let mock = server
        .mock("GET", "/messages")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("user".into(), "u1".into()),
            Matcher::UrlEncoded("conversation_id".into(), "c1".into()),
            Matcher::UrlEncoded("limit".into(), "20".into()),
            Matcher::UrlEncoded("first_id".into(), "m5".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "limit": 20,
                "has_more": false,
                "data": [{
                    "id": "m4",
                    "conversation_id": "c1",
                    "query": "q",
                    "answer": "a",
                    "feedback": {"rating": "like"},
                    "agent_thoughts": [{"id": "t1", "position": 1, "tool": "search;calc", "message_files": ["f1"]}],
                    "created_at": 1
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let page = app(&server)
        .get_conversation_messages("u1", "c1", Some("m5"), None)
        .await
        .unwrap();
    assert_eq!(page.limit, 20);
    assert_eq!(page.data.len(), 1);
    let message = &page.data[0];
    assert_eq!(message.feedback.get("rating"), Some(&json!("like")));
    assert_eq!(message.agent_thoughts[0].tool, "search;calc");
    assert_eq!(message.agent_thoughts[0].message_files, vec!["f1"]);
    assert!(message.retriever_resources.is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn conversations_default_limit_and_pinned() {
    let mut server = server().await;
    let mock = server
        .mock("GET", "/conversations")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("limit".into(), "20".into()),
            Matcher::UrlEncoded("pinned".into(), "true".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"limit":20,"has_more":true,"data":[{"id":"c1","name":"Trip","status":"normal"}]}"#)
        .create_async()
        .await;

    let page = app(&server)
        .get_conversations("u1", None, None, Some(true))
        .await
        .unwrap();
    assert!(page.has_more);
    assert_eq!(page.data[0].name, "Trip");
    mock.assert_async().await;
}

#[tokio::test]
async fn feedback_rename_and_stop() {
    let mut server = server().await;
    let feedback = server
        .mock("POST", "/messages/m1/feedbacks")
        .match_body(Matcher::Json(json!({"rating": "dislike", "user": "u1"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"result":"success"}"#)
        .create_async()
        .await;
    let rename = server
        .mock("POST", "/conversations/c1/name")
        .match_body(Matcher::Json(json!({"auto_generate": true, "user": "u1"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":"c1","name":"Generated title"}"#)
        .create_async()
        .await;
    let stop = server
        .mock("POST", "/chat-messages/task-1/stop")
        .match_body(Matcher::Json(json!({"user": "u1"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"result":"success"}"#)
        .create_async()
        .await;

    let app = app(&server);
    assert!(app
        .send_message_feedback("m1", "u1", FeedbackRating::Dislike)
        .await
        .unwrap()
        .is_success());
    let conversation = app.rename_conversation("c1", "u1", None, true).await.unwrap();
    assert_eq!(conversation.name, "Generated title");
    assert!(app.stop_generate_message("task-1", "u1").await.unwrap().is_success());

    feedback.assert_async().await;
    rename.assert_async().await;
    stop.assert_async().await;
}

#[tokio::test]
async fn message_id_is_percent_encoded_in_path() {
    let mut server = server().await;
    let feedback = server
        .mock("POST", "/messages/m%2F1%3Fadmin/feedbacks")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"result":"success"}"#)
        .create_async()
        .await;

    let ok = app(&server)
        .send_message_feedback("m/1?admin", "u1", FeedbackRating::Like)
        .await
        .unwrap();
    assert!(ok.is_success());
    feedback.assert_async().await;
}

#[tokio::test]
async fn html_error_pages_are_condensed() {
    let mut server = server().await;
    server
        .mock("GET", "/conversations")
        .match_query(Matcher::Any)
        .with_status(502)
        .with_header("content-type", "text/html")
        .with_body("<html><body>Bad Gateway</body></html>")
        .create_async()
        .await;

    let err = app(&server)
        .get_conversations("u1", None, None, None)
        .await
        .unwrap_err();
    assert_eq!(err.message(), "HTML Error: <html><body>Bad Gateway</body></html>");
    assert_eq!(err.status(), Some(502));
}

#[tokio::test]
async fn stream_can_be_consumed_incrementally() {
    let mut server = server().await;
    server
        .mock("POST", "/chat-messages")
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(sse_body(&[
            "event: ping",
            r#"{"event":"message","answer":"a","task_id":"t"}"#,
            r#"{"event":"message_end","metadata":{"usage":{"total_tokens":3}}}"#,
        ]))
        .create_async()
        .await;

    let mut stream = app(&server)
        .chat_message(ChatMessageRequest::new("q", "u").streaming())
        .await
        .unwrap()
        .into_stream()
        .unwrap();
    let first = stream.next().await.unwrap().unwrap();
    assert_eq!(first.task_id.as_deref(), Some("t"));
    let second = stream.next().await.unwrap().unwrap();
    assert_eq!(second.event.as_deref(), Some("message_end"));
    assert_eq!(second.answer, None);
    assert!(second.metadata.is_some());
    assert!(stream.next().await.is_none());
    assert!(stream.next().await.is_none());
}
