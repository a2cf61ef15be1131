//! Бенчмарки разбора текста
//!
//! Run with: cargo bench --bench segmenter

use async_trait::async_trait;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tts_narrator::speaker::{Resolution, SpeakerAttribution};
use tts_narrator::text::segment::Gender;
use tts_narrator::text::segmenter::split_quotes;
use tts_narrator::text::{chunk_text, TextSegmenter};
use tts_narrator::Result;

struct AlternatingSpeakers {
    calls: usize,
}

#[async_trait]
impl SpeakerAttribution for AlternatingSpeakers {
    async fn resolve(&mut self, _context: &str, _quote: &str) -> Result<Resolution> {
        self.calls += 1;
        Ok(if self.calls % 2 == 0 {
            Resolution::new("Ann", Gender::Female)
        } else {
            Resolution::new("Tom", Gender::Male)
        })
    }
}

fn sample_text(paragraphs: usize) -> String {
    (0..paragraphs)
        .map(|i| match i % 3 {
            0 => format!("[Chapter {}]", i),
            1 => "\"Where were you?\" she asked. He shrugged. \"Out.\"".to_string(),
            _ => "The rain kept falling on the empty street for hours.".to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn bench_segment(c: &mut Criterion) {
    let mut group = c.benchmark_group("segment");
    let segmenter = TextSegmenter::new();

    for paragraphs in [30, 300, 3000] {
        let text = sample_text(paragraphs);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("stub_attribution", paragraphs), &text, |b, text| {
            b.iter(|| {
                let mut resolver = AlternatingSpeakers { calls: 0 };
                tokio_test::block_on(segmenter.segment(text, &mut resolver))
            })
        });
    }

    group.finish();
}

fn bench_split_quotes(c: &mut Criterion) {
    let paragraph = "\"One,\" he said. \"Two,\" she said. \"Three\" and \"four\" and an open \"quote";
    c.bench_function("split_quotes", |b| b.iter(|| split_quotes(paragraph).len()));
}

fn bench_chunk_text(c: &mut Criterion) {
    let text = sample_text(3000);
    c.bench_function("chunk_text_4096", |b| b.iter(|| chunk_text(&text, 4096)));
}

criterion_group!(benches, bench_segment, bench_split_quotes, bench_chunk_text);
criterion_main!(benches);
