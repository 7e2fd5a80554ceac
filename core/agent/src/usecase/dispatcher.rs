//! メッセージのディスパッチ（ユースケース本体）
//!
//! 1 回の `process` の流れ:
//!
//! 1. 前処理を登録順に適用（失敗 → stage=preprocessor、保存しない）
//! 2. ルールを登録順に評価し、最初に真になったもののハンドラを実行（無ければフォールバック）
//! 3. ハンドラはメモリの作業用コピーを更新する。成功時のみ確定
//! 4. `received_at` / `original_message` / `rule` をメタデータに付ける
//! 5. メモリ全体を保存（失敗はログのみ）
//! 6. 後処理を登録順に適用（失敗 → stage=postprocessor、保存は取り消さない）
//!
//! 述語・ハンドラ・前後処理の panic は catch_unwind で捕まえ、エラー応答に変換する。
//! メモリの Mutex は `process` の間ずっと保持するため、同時呼び出しは直列化される。

use crate::domain::{Context, Memory, Response, Stage};
use crate::ports::inbound::Dispatch;
use crate::ports::outbound::MemoryStore;
use crate::rule::{IntentContext, IntentError, Rule, RuleRegistry};
use crate::usecase::intents::FallbackRule;
use crate::usecase::processors::{Postprocessor, Preprocessor, Trim};
use common::adapter::NoopLog;
use common::ports::outbound::{Clock, Log, LogLevel, LogRecord};
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard};

pub struct Dispatcher {
    rules: RuleRegistry,
    fallback: Arc<dyn Rule>,
    preprocessors: Vec<Arc<dyn Preprocessor>>,
    postprocessors: Vec<Arc<dyn Postprocessor>>,
    store: Arc<dyn MemoryStore>,
    clock: Arc<dyn Clock>,
    log: Arc<dyn Log>,
    memory: Mutex<Memory>,
}

/// Dispatcher の組み立て
///
/// 既定では前処理は `Trim` のみ、後処理なし、フォールバックは `FallbackRule`。
pub struct DispatcherBuilder {
    rules: RuleRegistry,
    fallback: Arc<dyn Rule>,
    preprocessors: Vec<Arc<dyn Preprocessor>>,
    postprocessors: Vec<Arc<dyn Postprocessor>>,
    store: Arc<dyn MemoryStore>,
    clock: Arc<dyn Clock>,
    log: Arc<dyn Log>,
}

impl DispatcherBuilder {
    pub fn new(store: Arc<dyn MemoryStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            rules: RuleRegistry::new(),
            fallback: Arc::new(FallbackRule),
            preprocessors: vec![Arc::new(Trim)],
            postprocessors: Vec::new(),
            store,
            clock,
            log: Arc::new(NoopLog),
        }
    }

    /// ルール列をまとめて追加する（既存のルールの後ろ）
    pub fn rules(mut self, rules: RuleRegistry) -> Self {
        for rule in rules.iter() {
            self.rules.push(Arc::clone(rule));
        }
        self
    }

    /// フォールバックより前、既存ルールの後ろに 1 つ追加する
    pub fn rule(mut self, rule: Arc<dyn Rule>) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn fallback(mut self, rule: Arc<dyn Rule>) -> Self {
        self.fallback = rule;
        self
    }

    pub fn preprocessor(mut self, p: Arc<dyn Preprocessor>) -> Self {
        self.preprocessors.push(p);
        self
    }

    /// 既定の Trim も含めて前処理を空にする
    pub fn clear_preprocessors(mut self) -> Self {
        self.preprocessors.clear();
        self
    }

    pub fn postprocessor(mut self, p: Arc<dyn Postprocessor>) -> Self {
        self.postprocessors.push(p);
        self
    }

    pub fn log(mut self, log: Arc<dyn Log>) -> Self {
        self.log = log;
        self
    }

    /// ストアからメモリを読み込んで Dispatcher を作る
    pub fn build(self) -> Dispatcher {
        let memory = self.store.load();
        Dispatcher {
            rules: self.rules,
            fallback: self.fallback,
            preprocessors: self.preprocessors,
            postprocessors: self.postprocessors,
            store: self.store,
            clock: self.clock,
            log: self.log,
            memory: Mutex::new(memory),
        }
    }
}

/// ハンドラ境界の結果
enum Outcome {
    /// ハンドラ（フォールバック含む）が作った応答。作業用メモリを確定してよいか
    Handled { response: Response, commit: bool },
    /// 述語・ハンドラの想定外の失敗
    Failed { detail: String },
}

impl Dispatcher {
    pub fn builder(store: Arc<dyn MemoryStore>, clock: Arc<dyn Clock>) -> DispatcherBuilder {
        DispatcherBuilder::new(store, clock)
    }

    /// 現在のメモリの複製
    pub fn memory_snapshot(&self) -> Memory {
        self.lock_memory().clone()
    }

    /// 登録順のルール名（フォールバックを除く）
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.names()
    }

    fn lock_memory(&self) -> MutexGuard<'_, Memory> {
        match self.memory.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn emit(&self, record: LogRecord) {
        let _ = self.log.log(&record.layer("usecase"));
    }

    fn preprocess(&self, message: &str, context: &Context) -> Result<String, String> {
        let mut text = message.to_string();
        for p in &self.preprocessors {
            let input = std::mem::take(&mut text);
            text = guarded(|| p.preprocess(input, context))?.map_err(|e| e.to_string())?;
        }
        Ok(text)
    }

    fn postprocess(&self, response: Response, context: &Context) -> Result<Response, String> {
        let mut response = response;
        for p in &self.postprocessors {
            let input = response;
            response = guarded(|| p.postprocess(input, context))?.map_err(|e| e.to_string())?;
        }
        Ok(response)
    }

    /// 最初に述語が真になったルールを実行する。作業用メモリは成功時のみ `memory` に書き戻す。
    fn route(&self, text: &str, context: &Context, memory: &mut Memory) -> (&'static str, Outcome) {
        let candidates = self.rules.iter().chain(std::iter::once(&self.fallback));
        for rule in candidates {
            let name = rule.name();
            match guarded(|| rule.matches(text, context)) {
                Ok(false) => continue,
                Ok(true) => {}
                Err(detail) => return (name, Outcome::Failed { detail }),
            }

            let mut working = memory.clone();
            let result = guarded(|| {
                let mut ctx = IntentContext::new(context, &mut working, self.clock.as_ref());
                rule.handle(text, &mut ctx)
            });
            let outcome = match result {
                Ok(Ok(response)) => {
                    *memory = working;
                    Outcome::Handled {
                        response,
                        commit: true,
                    }
                }
                Ok(Err(IntentError::Internal(detail))) | Err(detail) => Outcome::Failed { detail },
                Ok(Err(e)) => Outcome::Handled {
                    response: Response::error(e.to_string()),
                    commit: false,
                },
            };
            return (name, outcome);
        }
        // フォールバックの述語が偽を返した場合
        (
            self.fallback.name(),
            Outcome::Failed {
                detail: "no rule accepted the message".to_string(),
            },
        )
    }
}

impl Dispatch for Dispatcher {
    fn process(&self, message: &str, context: Option<&Context>) -> Response {
        let empty = Context::new();
        let context = context.unwrap_or(&empty);
        let mut memory = self.lock_memory();

        let text = match self.preprocess(message, context) {
            Ok(t) => t,
            Err(detail) => {
                self.emit(
                    LogRecord::new(LogLevel::Warn, "preprocessor failed")
                        .kind("error")
                        .field("stage", Stage::Preprocessor.as_str())
                        .field("error", detail.clone()),
                );
                return Response::stage_error(Stage::Preprocessor, detail);
            }
        };

        let (rule, outcome) = self.route(&text, context, &mut memory);
        let (mut response, commit) = match outcome {
            Outcome::Handled { response, commit } => (response, commit),
            Outcome::Failed { detail } => {
                self.emit(
                    LogRecord::new(LogLevel::Error, "handler failed")
                        .kind("error")
                        .field("stage", Stage::Handler.as_str())
                        .field("rule", rule)
                        .field("error", detail.clone()),
                );
                return Response::stage_error(Stage::Handler, detail).with_meta("rule", rule);
            }
        };

        response.set_meta_if_absent("received_at", self.clock.now().to_rfc3339());
        response.set_meta_if_absent("original_message", message);
        response.set_meta_if_absent("rule", rule);

        if let Err(e) = self.store.save(&memory) {
            self.emit(
                LogRecord::new(LogLevel::Error, "memory save failed")
                    .kind("memory")
                    .field("error", e.to_string()),
            );
        }
        drop(memory);

        self.emit(
            LogRecord::new(LogLevel::Info, "message dispatched")
                .kind("dispatch")
                .field("rule", rule)
                .field("intent", response.intent.clone())
                .field("confidence", response.confidence)
                .field("committed", commit),
        );

        match self.postprocess(response, context) {
            Ok(r) => r,
            Err(detail) => {
                self.emit(
                    LogRecord::new(LogLevel::Warn, "postprocessor failed")
                        .kind("error")
                        .field("stage", Stage::Postprocessor.as_str())
                        .field("error", detail.clone()),
                );
                Response::stage_error(Stage::Postprocessor, detail)
            }
        }
    }
}

/// panic を捕まえてメッセージ文字列にする
fn guarded<T>(f: impl FnOnce() -> T) -> Result<T, String> {
    catch_unwind(AssertUnwindSafe(f)).map_err(|payload| panic_message(payload.as_ref()))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panic: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panic: {}", s)
    } else {
        "panic".to_string()
    }
}
