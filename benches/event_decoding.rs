//! Benchmarks for server-sent-event decoding
//!
//! This benchmark measures:
//! - Single-line classification speed
//! - End-to-end throughput from raw bytes to typed chat chunks

use aiplatform::models::ChatCompletionChunk;
use aiplatform::pipeline::{EventStream, SseDecoder};
use aiplatform::transport::{byte_lines, RequestError};
use bytes::Bytes;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use futures::stream;

/// A typical MaaS chat stream
const CHAT_FRAMES: &[&str] = &[
    r#"data: {"id":"chatcmpl-7","object":"chat.completion.chunk","created":1700000000,"model":"llama-3-8b","choices":[{"index":0,"delta":{"role":"assistant","content":""},"finish_reason":null}]}"#,
    r#"data: {"id":"chatcmpl-7","object":"chat.completion.chunk","created":1700000000,"model":"llama-3-8b","choices":[{"index":0,"delta":{"content":"Hello"},"finish_reason":null}]}"#,
    ": keep-alive",
    r#"data: {"id":"chatcmpl-7","object":"chat.completion.chunk","created":1700000000,"model":"llama-3-8b","choices":[{"index":0,"delta":{"content":" there"},"finish_reason":null}]}"#,
    r#"data: {"id":"chatcmpl-7","object":"chat.completion.chunk","created":1700000000,"model":"llama-3-8b","choices":[{"index":0,"delta":{},"finish_reason":"stop"}],"usage":{"prompt_tokens":9,"completion_tokens":2,"total_tokens":11}}"#,
    "data: [DONE]",
];

/// AI Studio answers arrive with the `data:` marker but no space
const STUDIO_FRAME: &str = r#"data:{"event":"message","task_id":"t-1","message_id":"m-1","conversation_id":"c-1","answer":"Hel","created_at":1700000000}"#;

fn bench_decode_line(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_line");
    let decoder = SseDecoder::new();

    let frame = CHAT_FRAMES[1];
    group.throughput(Throughput::Bytes(frame.len() as u64));
    group.bench_function("maas_delta", |b| {
        b.iter(|| decoder.decode_line(black_box(frame)))
    });

    group.throughput(Throughput::Bytes(STUDIO_FRAME.len() as u64));
    group.bench_function("studio_delta", |b| {
        b.iter(|| decoder.decode_line(black_box(STUDIO_FRAME)))
    });

    group.bench_function("comment", |b| {
        b.iter(|| decoder.decode_line(black_box(": keep-alive")))
    });

    group.bench_function("malformed", |b| {
        b.iter(|| decoder.decode_line(black_box("data: {\"choices\":[")))
    });

    group.finish();
}

fn bench_typed_stream(c: &mut Criterion) {
    let mut group = c.benchmark_group("typed_stream");
    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");

    let mut body = String::new();
    for _ in 0..200 {
        for frame in &CHAT_FRAMES[..CHAT_FRAMES.len() - 1] {
            body.push_str(frame);
            body.push_str("\n\n");
        }
    }
    body.push_str("data: [DONE]\n");
    let body = Bytes::from(body);
    group.throughput(Throughput::Bytes(body.len() as u64));

    // Small chunks exercise line reassembly across reads.
    for chunk_size in [64usize, 4096] {
        group.bench_function(format!("chat_chunks_{chunk_size}b"), |b| {
            b.to_async(&runtime).iter(|| {
                let chunks: Vec<Result<Bytes, RequestError>> = body
                    .chunks(chunk_size)
                    .map(|c| Ok(Bytes::copy_from_slice(c)))
                    .collect();
                async move {
                    let events: EventStream<ChatCompletionChunk> =
                        EventStream::from_lines(byte_lines(stream::iter(chunks)), &SseDecoder::new());
                    let chunks = events.collect_all().await.expect("decoded stream");
                    black_box(chunks.len())
                }
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_decode_line, bench_typed_stream);
criterion_main!(benches);
