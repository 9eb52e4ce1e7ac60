use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use question_validation::error::{ExternalCallError, FileError};
use question_validation::services::{parse_report, sample_csv};
use question_validation::workflow::RowOutcome;
use question_validation::{
    AnswerLetter, App, AppError, AppResult, ChatModel, Config, ExtractedAnswer, GradeStatus, QuestionFlow,
    QuestionRecord, RowCtx, RunObserver, RunState, SearchProvider, ValidationRun,
};

const HEADER: &str =
    "id,sub_category,category,question_name,question_description,A,B,C,D,Answer,Level";

/// 固定返回一段文本的搜索
struct MockSearch;

impl SearchProvider for MockSearch {
    async fn search(&self, query: &str, _limit: usize) -> AppResult<String> {
        Ok(format!("search results about {query}"))
    }
}

/// 第 `fail_on` 次调用（从 1 开始）起失败的搜索
struct FlakySearch {
    calls: AtomicUsize,
    fail_on: usize,
}

impl SearchProvider for FlakySearch {
    async fn search(&self, query: &str, _limit: usize) -> AppResult<String> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call >= self.fail_on {
            let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "search timed out");
            return Err(ExternalCallError::search_failed(query, io).into());
        }
        Ok(String::new())
    }
}

/// 固定回复的模型
struct MockModel(&'static str);

impl ChatModel for MockModel {
    fn model_name(&self) -> &str {
        "mock-model"
    }

    async fn complete(&self, _prompt: &str) -> AppResult<String> {
        Ok(self.0.to_string())
    }
}

/// 记录所有回调
#[derive(Default)]
struct RecordingObserver {
    loaded: Option<usize>,
    started: Vec<i64>,
    completed: Vec<(i64, ExtractedAnswer)>,
    progress: Vec<f64>,
}

impl RunObserver for RecordingObserver {
    fn on_loaded(&mut self, total: usize) {
        self.loaded = Some(total);
    }

    fn on_row_start(&mut self, ctx: &RowCtx, _record: &QuestionRecord) {
        self.started.push(ctx.question_id);
    }

    fn on_row_complete(&mut self, _ctx: &RowCtx, record: &QuestionRecord, outcome: &RowOutcome) {
        self.completed
            .push((record.id, outcome.result.extracted_answer));
    }

    fn on_progress(&mut self, fraction: f64) {
        self.progress.push(fraction);
    }
}

fn flow<S: SearchProvider>(search: S, reply: &'static str) -> QuestionFlow<S, MockModel> {
    QuestionFlow::new(search, MockModel(reply), &Config::default()).unwrap()
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("qv_it_{}_{}", std::process::id(), name))
}

fn test_config(tag: &str) -> Config {
    Config {
        output_log_file: temp_path(&format!("{tag}.log")).to_string_lossy().to_string(),
        ..Config::default()
    }
}

#[tokio::test]
async fn test_hardware_question_is_graded_correct() {
    let input = format!(
        "{HEADER}\n1,Basic Hardware,Technical,Which component stores the OS?,Identify where the OS is stored.,RAM,Hard Drive,GPU,Cache,B,1\n"
    );
    let flow = flow(MockSearch, "Based on context, ANSWER: B");
    let mut run = ValidationRun::new();
    let mut observer = RecordingObserver::default();

    let summary = run
        .execute(input.as_bytes(), &flow, &mut observer)
        .await
        .unwrap();

    assert_eq!(summary.total, 1);
    assert_eq!(summary.correct, 1);
    let result = &run.report().results()[0];
    assert_eq!(result.extracted_answer, ExtractedAnswer::Letter(AnswerLetter::B));
    assert_eq!(result.status, GradeStatus::Correct);
    assert_eq!(run.state(), RunState::Complete);
}

#[tokio::test]
async fn test_unsure_model_is_unknown_and_incorrect() {
    let flow = flow(MockSearch, "I'm not sure.");
    let mut run = ValidationRun::new();
    let mut observer = RecordingObserver::default();

    let summary = run
        .execute(&sample_csv().unwrap(), &flow, &mut observer)
        .await
        .unwrap();

    assert_eq!(summary.total, 2);
    assert_eq!(summary.correct, 0);
    assert_eq!(summary.unknown, 2);
    for result in run.report().results() {
        assert_eq!(result.extracted_answer, ExtractedAnswer::Unknown);
        assert_eq!(result.status, GradeStatus::Incorrect);
    }
}

#[tokio::test]
async fn test_one_result_per_row_in_input_order() {
    let mut input = format!("{HEADER}\n");
    for id in [5, 3, 9, 1] {
        input.push_str(&format!("{id},s,c,n,Question {id},a,b,c,d,A,1\n"));
    }
    let flow = flow(MockSearch, "ANSWER: A");
    let mut run = ValidationRun::new();
    let mut observer = RecordingObserver::default();

    run.execute(input.as_bytes(), &flow, &mut observer)
        .await
        .unwrap();

    let ids: Vec<i64> = run.report().results().iter().map(|r| r.question_id).collect();
    assert_eq!(ids, vec![5, 3, 9, 1]);
    assert_eq!(observer.started, vec![5, 3, 9, 1]);
    assert_eq!(observer.loaded, Some(4));
    assert_eq!(observer.completed.len(), 4);

    // 进度从 0 单调增加到 1
    assert_eq!(observer.progress.first(), Some(&0.0));
    assert_eq!(observer.progress.last(), Some(&1.0));
    assert!(observer.progress.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test]
async fn test_report_file_round_trip() {
    let config = test_config("report");
    let report_path = temp_path("report.csv");
    let flow = flow(MockSearch, "Reasoning...\nANSWER: b");
    let mut app = App::initialize(config).unwrap();
    let mut observer = RecordingObserver::default();

    let summary = app
        .validate_bytes(&sample_csv().unwrap(), &flow, &report_path, &mut observer)
        .await
        .unwrap();
    assert_eq!(summary.correct, 2);

    let rows = parse_report(&std::fs::read(&report_path).unwrap()).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, 1);
    assert_eq!(rows[0].question, "Identify where the OS is stored.");
    assert_eq!(rows[0].correct_answer, "B");
    assert_eq!(rows[0].ai_answer, "B");
    assert_eq!(rows[0].status, "✅ Correct");
    assert_eq!(rows[1].id, 2);

    let _ = std::fs::remove_file(&report_path);
}

#[tokio::test]
async fn test_external_failure_flushes_partial_report() {
    let config = test_config("partial");
    let report_path = temp_path("partial.csv");
    let mut input = format!("{HEADER}\n");
    for id in 1..=3 {
        input.push_str(&format!("{id},s,c,n,Question {id},a,b,c,d,C,1\n"));
    }
    let flow = flow(
        FlakySearch {
            calls: AtomicUsize::new(0),
            fail_on: 3,
        },
        "ANSWER: C",
    );
    let mut app = App::initialize(config).unwrap();
    let mut observer = RecordingObserver::default();

    let err = app
        .validate_bytes(input.as_bytes(), &flow, &report_path, &mut observer)
        .await
        .unwrap_err();

    assert!(err.is_external());
    assert_eq!(app.validation_run().state(), RunState::Failed);
    assert_eq!(app.validation_run().processed(), 2);

    let rows = parse_report(&std::fs::read(&report_path).unwrap()).unwrap();
    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert!(rows.iter().all(|r| r.status == "✅ Correct"));

    let _ = std::fs::remove_file(&report_path);
}

#[tokio::test]
async fn test_unwritable_partial_report_keeps_search_error() {
    let config = test_config("unwritable");
    let report_path = temp_path("missing_dir").join("partial.csv");
    let flow = flow(
        FlakySearch {
            calls: AtomicUsize::new(0),
            fail_on: 1,
        },
        "ANSWER: A",
    );
    let mut app = App::initialize(config).unwrap();
    let mut observer = RecordingObserver::default();

    let err = app
        .validate_bytes(&sample_csv().unwrap(), &flow, &report_path, &mut observer)
        .await
        .unwrap_err();

    assert!(err.is_external());
    assert!(err.to_string().contains("搜索请求失败"));
    assert!(!report_path.exists());
    assert_eq!(app.validation_run().state(), RunState::Failed);
}

#[tokio::test]
async fn test_missing_input_file_is_file_error() {
    let mut app = App::initialize(test_config("missing_input")).unwrap();
    let flow = flow(MockSearch, "ANSWER: A");
    let report_path = temp_path("missing_input.csv");

    let err = app
        .validate_file(&temp_path("no_such_input.csv"), &flow, &report_path)
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<AppError>(),
        Some(AppError::File(FileError::ReadFailed { .. }))
    ));
    assert!(!report_path.exists());
}

#[tokio::test]
async fn test_malformed_input_writes_no_report() {
    let config = test_config("malformed");
    let report_path = temp_path("never.csv");
    let _ = std::fs::remove_file(&report_path);
    let flow = flow(MockSearch, "ANSWER: A");
    let mut app = App::initialize(config).unwrap();
    let mut observer = RecordingObserver::default();

    let err = app
        .validate_bytes(b"id,question\n1,what?\n", &flow, &report_path, &mut observer)
        .await
        .unwrap_err();

    assert!(!err.is_external());
    assert!(!report_path.exists());
    assert!(observer.started.is_empty());
    assert_eq!(app.validation_run().state(), RunState::Failed);
}

#[tokio::test]
async fn test_malformed_ground_truth_is_kept_and_incorrect() {
    let input = format!("{HEADER}\n1,s,c,n,Q,a,b,c,d,,1\n2,s,c,n,Q,a,b,c,d,AB,1\n");
    let flow = flow(MockSearch, "ANSWER: A");
    let mut run = ValidationRun::new();
    let mut observer = RecordingObserver::default();

    let summary = run
        .execute(input.as_bytes(), &flow, &mut observer)
        .await
        .unwrap();

    assert_eq!(summary.total, 2);
    assert_eq!(summary.incorrect, 2);
    assert_eq!(run.report().results()[1].correct_answer, "AB");
}
