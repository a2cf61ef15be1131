//! Пример озвучивания книги с отслеживанием прогресса
//!
//! cargo run --example narrate_book -- path/to/book.txt

use tts_narrator::notification::{CompositeProgressObserver, FileProgressObserver, ProgressBarObserver};
use tts_narrator::progress::{DefaultProgressReporter, ProgressReporter};
use tts_narrator::{Narration, Narrator, NarratorConfig, TtsModel, WorkSource};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let book = std::env::args().nth(1).unwrap_or_else(|| "book.txt".to_string());

    let mut config = NarratorConfig {
        tts_model: TtsModel::Standard,
        output_dir: "narrated".into(),
        ..NarratorConfig::default()
    };
    config.apply_env();

    let mut composite_observer = CompositeProgressObserver::new();
    composite_observer.add_observer(Box::new(ProgressBarObserver::new(50)));
    composite_observer.add_observer(Box::new(FileProgressObserver::new("progress.log")));

    let mut reporter = DefaultProgressReporter::new();
    reporter.add_observer(Box::new(composite_observer));

    let narrator = Narrator::with_progress_reporter(config, Box::new(reporter));
    match narrator.narrate(WorkSource::Book(book.into())).await? {
        Narration::Saved(path) => println!("Готово: {}", path.display()),
        Narration::Skipped(_) | Narration::Exhausted => println!("Нечего озвучивать"),
    }

    Ok(())
}
