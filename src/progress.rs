//! Модуль для отслеживания прогресса озвучивания
//!
//! Реализация паттерна Observer: трекер пересчитывает общий прогресс по весам
//! этапов и передает его репортеру, который рассылает наблюдателям.

use std::collections::HashMap;
use std::sync::Mutex;
use serde::{Deserialize, Serialize};

/// Информация о прогрессе выполнения операции
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressInfo {
    /// Текущий этап
    pub step: String,
    /// Процент выполнения текущего этапа (0.0 - 100.0)
    pub step_progress: f32,
    /// Общий процент выполнения (0.0 - 100.0)
    pub total_progress: f32,
    /// Дополнительная информация
    pub details: Option<String>,
}

impl ProgressInfo {
    pub fn new(step: impl Into<String>, step_progress: f32, total_progress: f32, details: Option<String>) -> Self {
        Self {
            step: step.into(),
            step_progress: step_progress.clamp(0.0, 100.0),
            total_progress: total_progress.clamp(0.0, 100.0),
            details,
        }
    }
}

/// Наблюдатель, получающий уведомления о прогрессе
pub trait ProgressObserver: Send + Sync {
    fn on_progress_update(&self, progress: ProgressInfo);
}

/// Объект, рассылающий уведомления наблюдателям
pub trait ProgressReporter: Send + Sync {
    /// Добавить наблюдателя, возвращает его идентификатор
    fn add_observer(&mut self, observer: Box<dyn ProgressObserver>) -> usize;

    /// Удалить наблюдателя по идентификатору
    fn remove_observer(&mut self, id: usize) -> Option<Box<dyn ProgressObserver>>;

    fn notify_progress(&self, progress: ProgressInfo);
}

/// Синхронный репортер
#[derive(Default)]
pub struct DefaultProgressReporter {
    observers: Vec<(usize, Box<dyn ProgressObserver>)>,
    next_id: usize,
}

impl DefaultProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressReporter for DefaultProgressReporter {
    fn add_observer(&mut self, observer: Box<dyn ProgressObserver>) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    fn remove_observer(&mut self, id: usize) -> Option<Box<dyn ProgressObserver>> {
        let position = self.observers.iter().position(|(observer_id, _)| *observer_id == id)?;
        Some(self.observers.remove(position).1)
    }

    fn notify_progress(&self, progress: ProgressInfo) {
        for (_, observer) in &self.observers {
            observer.on_progress_update(progress.clone());
        }
    }
}

/// Этапы озвучивания
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessStep {
    /// Чтение книги или следующего поста
    SourceLoading,
    /// Сегментация и определение говорящих
    Segmentation,
    /// Синтез фрагментов
    SpeechGeneration,
    /// Склейка аудио
    AudioAssembly,
}

impl ProcessStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SourceLoading => "Загрузка текста",
            Self::Segmentation => "Сегментация и определение говорящих",
            Self::SpeechGeneration => "Генерация речи",
            Self::AudioAssembly => "Склейка аудио",
        }
    }

    /// Вес этапа в процентах от всего процесса
    pub fn weight(&self) -> f32 {
        match self {
            Self::SourceLoading => 5.0,
            Self::Segmentation => 25.0,
            Self::SpeechGeneration => 60.0,
            Self::AudioAssembly => 10.0,
        }
    }
}

struct TrackerState {
    current_step: ProcessStep,
    step_progress: f32,
    total_progress: f32,
    completed_steps: HashMap<ProcessStep, f32>,
}

impl TrackerState {
    fn recalculate(&mut self) {
        let mut total = 0.0;
        let mut total_weight = 0.0;

        for (step, progress) in &self.completed_steps {
            if *step != self.current_step {
                total += step.weight() * progress / 100.0;
                total_weight += step.weight();
            }
        }
        total += self.current_step.weight() * self.step_progress / 100.0;
        total_weight += self.current_step.weight();

        self.total_progress = (total / total_weight * 100.0).clamp(0.0, 100.0);
    }
}

/// Трекер прогресса одного прогона
pub struct ProgressTracker {
    reporter: Option<Box<dyn ProgressReporter>>,
    state: Mutex<TrackerState>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self {
            reporter: None,
            state: Mutex::new(TrackerState {
                current_step: ProcessStep::SourceLoading,
                step_progress: 0.0,
                total_progress: 0.0,
                completed_steps: HashMap::new(),
            }),
        }
    }

    pub fn with_reporter(reporter: Box<dyn ProgressReporter>) -> Self {
        let mut tracker = Self::new();
        tracker.reporter = Some(reporter);
        tracker
    }

    pub fn set_reporter(&mut self, reporter: Box<dyn ProgressReporter>) {
        self.reporter = Some(reporter);
    }

    pub fn add_observer(&mut self, observer: Box<dyn ProgressObserver>) -> Option<usize> {
        self.reporter.as_mut().map(|reporter| reporter.add_observer(observer))
    }

    /// Перейти к этапу; предыдущий считается завершенным
    pub fn set_step(&self, step: ProcessStep) {
        let info = {
            let mut state = self.lock_state();
            if state.current_step == step {
                return;
            }
            let previous = state.current_step;
            state.completed_steps.insert(previous, 100.0);
            state.current_step = step;
            state.step_progress = 0.0;
            state.recalculate();
            Self::snapshot(&state, None)
        };
        self.report(info);
    }

    /// Обновить прогресс текущего этапа
    pub fn update_step_progress(&self, progress: f32, details: Option<String>) {
        let info = {
            let mut state = self.lock_state();
            state.step_progress = progress.clamp(0.0, 100.0);
            state.recalculate();
            Self::snapshot(&state, details)
        };
        self.report(info);
    }

    /// Отметить завершение всего процесса
    pub fn complete(&self) {
        let info = {
            let mut state = self.lock_state();
            let current = state.current_step;
            state.completed_steps.insert(current, 100.0);
            state.step_progress = 100.0;
            state.total_progress = 100.0;
            Self::snapshot(&state, Some("Процесс завершен".to_string()))
        };
        self.report(info);
    }

    /// Текущий общий прогресс
    pub fn total_progress(&self) -> f32 {
        self.lock_state().total_progress
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, TrackerState> {
        // Отравленный мьютекс не мешает читать проценты
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn snapshot(state: &TrackerState, details: Option<String>) -> ProgressInfo {
        ProgressInfo::new(state.current_step.as_str(), state.step_progress, state.total_progress, details)
    }

    fn report(&self, info: ProgressInfo) {
        if let Some(reporter) = &self.reporter {
            reporter.notify_progress(info);
        }
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct TestObserver {
        updates: Arc<Mutex<Vec<ProgressInfo>>>,
    }

    impl ProgressObserver for TestObserver {
        fn on_progress_update(&self, progress: ProgressInfo) {
            self.updates.lock().unwrap().push(progress);
        }
    }

    fn tracker_with_observer() -> (ProgressTracker, Arc<Mutex<Vec<ProgressInfo>>>) {
        let updates = Arc::new(Mutex::new(Vec::new()));
        let mut reporter = DefaultProgressReporter::new();
        reporter.add_observer(Box::new(TestObserver { updates: updates.clone() }));
        (ProgressTracker::with_reporter(Box::new(reporter)), updates)
    }

    #[test]
    fn test_progress_tracker_steps() {
        let (tracker, updates) = tracker_with_observer();

        tracker.update_step_progress(50.0, None);
        tracker.set_step(ProcessStep::Segmentation);
        tracker.set_step(ProcessStep::Segmentation);
        tracker.complete();

        let updates = updates.lock().unwrap();
        assert_eq!(updates.len(), 3);
        assert_eq!(updates[0].step, ProcessStep::SourceLoading.as_str());
        assert_eq!(updates[0].step_progress, 50.0);
        assert_eq!(updates[1].step, ProcessStep::Segmentation.as_str());
        assert_eq!(updates[1].step_progress, 0.0);
        assert_eq!(updates[2].total_progress, 100.0);
        assert_eq!(updates[2].details, Some("Процесс завершен".to_string()));
    }

    #[test]
    fn test_weighted_total() {
        let tracker = ProgressTracker::new();
        tracker.set_step(ProcessStep::Segmentation);
        tracker.update_step_progress(100.0, None);
        // Оба пройденных этапа завершены полностью
        assert_eq!(tracker.total_progress(), 100.0);

        tracker.set_step(ProcessStep::SpeechGeneration);
        let total = tracker.total_progress();
        assert!((total - 33.333).abs() < 0.01, "total = {}", total);
    }

    #[test]
    fn test_remove_observer() {
        let mut reporter = DefaultProgressReporter::new();
        let updates = Arc::new(Mutex::new(Vec::new()));
        let id = reporter.add_observer(Box::new(TestObserver { updates: updates.clone() }));

        assert!(reporter.remove_observer(id).is_some());
        assert!(reporter.remove_observer(id).is_none());
        reporter.notify_progress(ProgressInfo::new("x", 1.0, 1.0, None));
        assert!(updates.lock().unwrap().is_empty());
    }
}
