//! バックオフ付きリトライ
//!
//! 生成呼び出しを合計 3 回まで試行する。待ち時間は 1 秒から倍々で増え、
//! 10 秒を上限とする（ジッタ無しの決定的バックオフ）。
//! 最終試行の失敗はそのまま呼び出し側へ返す。

use crate::error::Error;
use crate::llm::request::GenerateRequest;
use crate::llm::response::{parse_response, GenerateResponse};
use crate::llm::transport::LlmTransport;
use std::thread;
use std::time::Duration;

/// 合計試行回数の上限
const MAX_ATTEMPTS: u32 = 3;
/// 初回リトライまでの待ち時間（秒）
const BASE_DELAY_SECS: u64 = 1;
/// 待ち時間の上限（秒）
const MAX_DELAY_SECS: u64 = 10;

/// 生成エンドポイントをリトライ付きで呼び、型付きレスポンスを返す。
/// transient（ネットワーク/API 呼び出し自体の失敗）のみリトライし、
/// それ以外の失敗は即座に返す。
pub fn generate_with_retry(
    transport: &dyn LlmTransport,
    request: &GenerateRequest,
) -> Result<GenerateResponse, Error> {
    let payload = request.payload();
    let mut delay = BASE_DELAY_SECS;
    let mut attempt = 1;
    loop {
        match transport.generate(&request.model, &payload) {
            Ok(raw) => return parse_response(&raw),
            Err(e) if e.is_transient() && attempt < MAX_ATTEMPTS => {
                thread::sleep(Duration::from_secs(delay));
                delay = (delay * 2).min(MAX_DELAY_SECS);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::cell::Cell;

    // 指定回数失敗してから成功するモック
    struct FlakyTransport {
        calls: Cell<u32>,
        failures: u32,
        error: Error,
    }

    impl FlakyTransport {
        fn new(failures: u32, error: Error) -> Self {
            Self {
                calls: Cell::new(0),
                failures,
                error,
            }
        }
    }

    impl LlmTransport for FlakyTransport {
        fn generate(&self, _model: &str, _payload: &Value) -> Result<Value, Error> {
            let call = self.calls.get() + 1;
            self.calls.set(call);
            if call <= self.failures {
                Err(self.error.clone())
            } else {
                Ok(json!({
                    "candidates": [{"content": {"parts": [{"text": "ok"}]}}]
                }))
            }
        }
    }

    #[test]
    fn test_success_on_first_attempt_calls_once() {
        let transport = FlakyTransport::new(0, Error::http("unused"));
        let req = GenerateRequest::new("gemini-2.5-flash", "hi");
        let resp = generate_with_retry(&transport, &req).unwrap();
        assert_eq!(transport.calls.get(), 1);
        assert_eq!(resp.text().unwrap(), "ok");
    }

    #[test]
    fn test_success_on_second_attempt_calls_exactly_twice() {
        let transport = FlakyTransport::new(1, Error::http("connection reset"));
        let req = GenerateRequest::new("gemini-2.5-flash", "hi");
        let resp = generate_with_retry(&transport, &req).unwrap();
        assert_eq!(transport.calls.get(), 2);
        assert_eq!(resp.text().unwrap(), "ok");
    }

    #[test]
    fn test_persistent_failure_stops_after_three_attempts() {
        let transport = FlakyTransport::new(10, Error::http("rate limited"));
        let req = GenerateRequest::new("gemini-2.5-flash", "hi");
        let err = generate_with_retry(&transport, &req).unwrap_err();
        assert_eq!(transport.calls.get(), 3);
        // 最終試行の失敗がそのまま返る
        assert_eq!(err, Error::http("rate limited"));
    }

    #[test]
    fn test_non_transient_failure_is_not_retried() {
        let transport = FlakyTransport::new(10, Error::invalid_argument("bad request"));
        let req = GenerateRequest::new("gemini-2.5-flash", "hi");
        let err = generate_with_retry(&transport, &req).unwrap_err();
        assert_eq!(transport.calls.get(), 1);
        assert_eq!(err, Error::invalid_argument("bad request"));
    }
}
