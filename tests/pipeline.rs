use std::collections::VecDeque;
use std::sync::Mutex;
use async_trait::async_trait;
use bytes::Bytes;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tts_narrator::notification::MemoryProgressObserver;
use tts_narrator::source::{filter_and_save_posts, Post};
use tts_narrator::speaker::{
    ChatMessage, InferenceService, OpenAiChatClient, Resolution, SpeakerAttribution, SpeakerResolver,
};
use tts_narrator::text::segment::{Gender, UNKNOWN_SPEAKER};
use tts_narrator::tts::{chunk_file_path, generate_audio_files, OpenAiSpeechClient, SpeechSynthesizer};
use tts_narrator::voice::VoiceAssigner;
use tts_narrator::{
    ChunkPipeline, Narration, NarrationMode, Narrator, NarratorConfig, NarratorError, PostTracker, Result, TtsVoice,
    WorkSource,
};

/// Отвечает заранее заданными репликами по очереди
struct ScriptedService {
    replies: Mutex<VecDeque<Result<Option<String>>>>,
}

impl ScriptedService {
    fn new(replies: Vec<Result<Option<String>>>) -> Self {
        Self { replies: Mutex::new(replies.into_iter().collect()) }
    }
}

#[async_trait]
impl InferenceService for ScriptedService {
    async fn complete(&self, _messages: &[ChatMessage], _max_tokens: u32) -> Result<Option<String>> {
        self.replies.lock().unwrap().pop_front().unwrap_or(Ok(None))
    }
}

fn scripted_resolver(replies: Vec<Result<Option<String>>>) -> SpeakerResolver {
    SpeakerResolver::new(Box::new(ScriptedService::new(replies)), &NarratorConfig::default())
}

struct SilentSynthesizer;

#[async_trait]
impl SpeechSynthesizer for SilentSynthesizer {
    async fn synthesize(&self, voice: TtsVoice, _text: &str) -> Result<Bytes> {
        Ok(Bytes::from(voice.as_str().to_string()))
    }
}

struct NobodySpeaks;

#[async_trait]
impl SpeakerAttribution for NobodySpeaks {
    async fn resolve(&mut self, _context: &str, _quote: &str) -> Result<Resolution> {
        Ok(Resolution::new(UNKNOWN_SPEAKER, Gender::Male))
    }
}

#[tokio::test]
async fn unknown_speaker_takes_next_male_voice() {
    let resolver = scripted_resolver(vec![Ok(Some("UNKNOWN".to_string()))]);
    let mut pipeline = ChunkPipeline::new(resolver, VoiceAssigner::default());

    let requests = pipeline.build_requests("\"Who goes there?\"").await.unwrap();

    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].speaker, UNKNOWN_SPEAKER);
    assert_eq!(requests[0].voice, TtsVoice::Echo);
}

#[tokio::test]
async fn speaker_keeps_voice_across_paragraphs() {
    let resolver = scripted_resolver(vec![
        Ok(Some("Mary,female".to_string())),
        Ok(Some("John,male".to_string())),
        Ok(Some("Mary,female".to_string())),
    ]);
    let mut pipeline = ChunkPipeline::new(resolver, VoiceAssigner::default());

    let text = "\"Morning.\"\n\n\"Is it?\"\n\n\"It was.\"";
    let requests = pipeline.build_requests(text).await.unwrap();

    let voices: Vec<TtsVoice> = requests.iter().map(|r| r.voice).collect();
    assert_eq!(voices, vec![TtsVoice::Shimmer, TtsVoice::Echo, TtsVoice::Shimmer]);
    assert_eq!(pipeline.voices().assigned("Mary"), Some(TtsVoice::Shimmer));
    assert_eq!(pipeline.voices().len(), 2);
}

#[tokio::test]
async fn inference_failure_aborts_segmentation() {
    let resolver = scripted_resolver(vec![
        Ok(Some("Tom,male".to_string())),
        Err(NarratorError::Inference("status 500".to_string())),
    ]);
    let mut pipeline = ChunkPipeline::new(resolver, VoiceAssigner::default());

    let result = pipeline.build_requests("\"One.\" \"Two.\" \"Three.\"").await;

    assert!(matches!(result, Err(NarratorError::Inference(_))));
    // Вопрос без ответа остается в истории
    assert_eq!(pipeline.resolver().history().len(), 4);
}

#[tokio::test]
async fn single_voice_mode_skips_attribution() {
    let config = NarratorConfig {
        narration_mode: NarrationMode::SingleVoice,
        single_voice: TtsVoice::Fable,
        max_chunk_chars: 20,
        ..NarratorConfig::default()
    };
    let narrator = Narrator::new(config);

    let requests = narrator
        .build_requests_with("\"Quoted\" first paragraph.\n\nSecond paragraph here.", NobodySpeaks)
        .await
        .unwrap();

    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|r| r.voice == TtsVoice::Fable));
    assert!(requests[0].text.contains("\"Quoted\""));
}

#[tokio::test]
async fn openai_clients_produce_chunks_in_reading_order() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "Tom,male"}}]
        })))
        .expect(2)
        .mount(&server)
        .await;
    for voice in ["echo", "onyx"] {
        Mock::given(method("POST"))
            .and(path("/audio/speech"))
            .and(body_partial_json(serde_json::json!({"voice": voice, "model": "tts-1-hd"})))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(voice.to_uppercase().into_bytes()))
            .mount(&server)
            .await;
    }

    let config = NarratorConfig {
        openai_api_key: "test-key".to_string(),
        api_base_url: server.uri(),
        ..NarratorConfig::default()
    };
    let resolver = SpeakerResolver::new(Box::new(OpenAiChatClient::new(&config).unwrap()), &config);
    let narrator = Narrator::new(config.clone());

    let text = "\"Hello,\" said Tom.\n\n\"Hi again,\" Tom added.";
    let requests = narrator.build_requests_with(text, resolver).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let synthesizer = OpenAiSpeechClient::new(&config).unwrap();
    let files = generate_audio_files(&requests, &synthesizer, dir.path(), None).await.unwrap();

    let contents: Vec<String> = files.iter().map(|f| std::fs::read_to_string(f).unwrap()).collect();
    assert_eq!(contents, vec!["ECHO", "ONYX", "ECHO", "ONYX"]);
    assert_eq!(files[3], chunk_file_path(dir.path(), 3));
}

#[tokio::test]
async fn no_unread_posts_finishes_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let posts_file = dir.path().join("posts.json");
    let books_dir = dir.path().join("books");

    let post: Post = serde_json::from_value(serde_json::json!({
        "id": 1, "title": "Only chapter", "content": "<p>Done.</p>"
    }))
    .unwrap();
    filter_and_save_posts(&[post], "", &posts_file).unwrap();

    let tracker = PostTracker::new(&posts_file, &books_dir);
    let pending = tracker.next_unread().unwrap().unwrap();
    tracker.confirm(&pending).unwrap();

    let observer = MemoryProgressObserver::new();
    let mut narrator = Narrator::new(NarratorConfig::default());
    narrator.add_observer(Box::new(observer.clone()));

    let result = narrator
        .narrate_with(&WorkSource::NextPost(tracker), NobodySpeaks, &SilentSynthesizer)
        .await
        .unwrap();

    assert_eq!(result, Narration::Exhausted);
    let history = observer.history();
    assert_eq!(history.last().map(|p| p.total_progress), Some(100.0));
}

#[tokio::test]
async fn narrate_requires_api_key() {
    let result = Narrator::new(NarratorConfig::default())
        .narrate(WorkSource::Book("missing.txt".into()))
        .await;
    assert!(matches!(result, Err(NarratorError::Configuration(_))));
}

#[tokio::test]
async fn blank_book_produces_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let book = dir.path().join("blank.txt");
    std::fs::write(&book, "\n\n   \n\n[ ]\n\n").unwrap();

    let config = NarratorConfig {
        chunks_dir: dir.path().join("chunks"),
        ..NarratorConfig::default()
    };
    let observer = MemoryProgressObserver::new();
    let mut narrator = Narrator::new(config);
    narrator.add_observer(Box::new(observer.clone()));

    let result = narrator
        .narrate_with(&WorkSource::Book(book), NobodySpeaks, &SilentSynthesizer)
        .await
        .unwrap();

    assert_eq!(result, Narration::Skipped("blank".to_string()));
    assert!(!dir.path().join("chunks").exists());
    let last = observer.history().pop().unwrap();
    assert_eq!(last.total_progress, 100.0);
    assert_eq!(last.details.as_deref(), Some("Процесс завершен"));
}

#[tokio::test]
async fn image_only_post_is_marked_read_and_queue_moves_on() {
    let dir = tempfile::tempdir().unwrap();
    let posts_file = dir.path().join("posts.json");
    let books_dir = dir.path().join("books");

    let posts: Vec<Post> = serde_json::from_value(serde_json::json!([
        {"id": 1, "title": "Image only", "content": "<p><img src='x.png'></p>"},
        {"id": 2, "title": "Real chapter", "content": "<p>Real text.</p>"}
    ]))
    .unwrap();
    filter_and_save_posts(&posts, "", &posts_file).unwrap();

    let tracker = PostTracker::new(&posts_file, &books_dir);
    let narrator = Narrator::new(NarratorConfig {
        chunks_dir: dir.path().join("chunks"),
        ..NarratorConfig::default()
    });

    let result = narrator
        .narrate_with(&WorkSource::NextPost(tracker.clone()), NobodySpeaks, &SilentSynthesizer)
        .await
        .unwrap();

    assert_eq!(result, Narration::Skipped("Image only".to_string()));
    assert!(books_dir.join("1_Image only.txt").exists());

    let next = tracker.next_unread().unwrap().unwrap();
    assert_eq!(next.path, books_dir.join("2_Real chapter.txt"));
    assert_eq!(next.text, "Real text.");
}
