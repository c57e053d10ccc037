//! Benchmarks for entry serialization
//!
//! Run with: cargo bench -p logged-core
//!
//! Compares the hand-rolled JSON serializer against a serde_json baseline
//! and the text serializer, all writing to an in-memory sink.

use std::borrow::Cow;
use std::io::{self, Write};

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use logged_core::entry::timestamp_now;
use logged_core::{Data, Entry, JsonSerializer, Level, Serializer, TextSerializer};
use parking_lot::Mutex;

/// Baseline: the same entry encoded with serde_json.
struct SerdeJsonSerializer<W: Write> {
    writer: Mutex<io::BufWriter<W>>,
}

impl<W: Write + Send> Serializer for SerdeJsonSerializer<W> {
    fn write(&self, entry: &Entry<'_>) -> logged_core::LogResult<()> {
        let mut writer = self.writer.lock();
        serde_json::to_writer(&mut *writer, entry).map_err(io::Error::from)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

fn sample_data() -> Data {
    Data::from([
        ("app_name".to_string(), "fldsmdfr".to_string()),
        ("version".to_string(), "1.2.3.4".to_string()),
    ])
}

fn bench_serializers(c: &mut Criterion) {
    let data = sample_data();
    let message = "this is a test of the serializer for a message";
    let entry = Entry::new(Level::Debug, message, Cow::Borrowed(&data))
        .with_timestamp(timestamp_now());

    let mut group = c.benchmark_group("serialize_entry");

    let json = JsonSerializer::new(io::sink());
    group.bench_function("hand_rolled_json", |b| {
        b.iter(|| json.write(black_box(&entry)).unwrap())
    });

    let serde = SerdeJsonSerializer {
        writer: Mutex::new(io::BufWriter::new(io::sink())),
    };
    group.bench_function("serde_json", |b| {
        b.iter(|| serde.write(black_box(&entry)).unwrap())
    });

    let text = TextSerializer::new(io::sink());
    group.bench_function("text", |b| {
        b.iter(|| text.write(black_box(&entry)).unwrap())
    });

    group.finish();
}

fn bench_escaping(c: &mut Criterion) {
    let plain = "a plain ascii message without anything to escape".repeat(4);
    let noisy = "quote \" slash \\ newline \n tab \t bell \u{7} 世界".repeat(4);

    let mut group = c.benchmark_group("escape");
    let mut out = Vec::with_capacity(1024);

    group.bench_function("plain", |b| {
        b.iter(|| {
            out.clear();
            logged_core::escape::write_json_str(&mut out, black_box(plain.as_bytes())).unwrap();
        })
    });

    group.bench_function("noisy", |b| {
        b.iter(|| {
            out.clear();
            logged_core::escape::write_json_str(&mut out, black_box(noisy.as_bytes())).unwrap();
        })
    });

    group.finish();
}

criterion_group!(benches, bench_serializers, bench_escaping);
criterion_main!(benches);
