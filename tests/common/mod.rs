//! 测试用的可编排后端
//!
//! 每次调用都会登记一个待响应的请求，由测试决定何时、以何种结果响应

#![allow(dead_code)]

use document_analysis::{
    AnalysisBackend, AnalysisDocument, AnalysisError, AnalysisReport, AnalysisResult, Extractions,
};
use futures::future::{BoxFuture, FutureExt};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, Mutex};

/// JPEG 文件头
pub const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];
/// PDF 文件头
pub const PDF: &[u8] = b"%PDF-1.7\n%test document";

/// 等待中的后端请求
pub struct PendingCall {
    pub payload: Vec<u8>,
    pub document: AnalysisDocument,
    responder: oneshot::Sender<AnalysisResult<AnalysisReport>>,
}

impl PendingCall {
    /// 以成功结果响应
    pub fn succeed(self, result: Extractions, document: AnalysisDocument) {
        let _ = self.responder.send(Ok(AnalysisReport::new(result, document)));
    }

    /// 以本地文档和给定结果响应
    pub fn succeed_with(self, result: Extractions) {
        let document = self.document.clone();
        self.succeed(result, document);
    }

    /// 以错误响应
    pub fn fail(self, error: AnalysisError) {
        let _ = self.responder.send(Err(error));
    }
}

pub struct ScriptedBackend {
    calls_tx: mpsc::UnboundedSender<PendingCall>,
    calls_rx: Mutex<mpsc::UnboundedReceiver<PendingCall>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        let (calls_tx, calls_rx) = mpsc::unbounded_channel();
        Self {
            calls_tx,
            calls_rx: Mutex::new(calls_rx),
        }
    }

    /// 等待下一个后端请求
    pub async fn next_call(&self) -> PendingCall {
        let mut calls = self.calls_rx.lock().await;
        tokio::time::timeout(Duration::from_secs(5), calls.recv())
            .await
            .expect("后端请求超时未到达")
            .expect("后端通道已关闭")
    }
}

impl AnalysisBackend for ScriptedBackend {
    fn analyze<'a>(
        &'a self,
        payload: Vec<u8>,
        document: &'a AnalysisDocument,
    ) -> BoxFuture<'a, AnalysisResult<AnalysisReport>> {
        let (responder, response) = oneshot::channel();
        let _ = self.calls_tx.send(PendingCall {
            payload,
            document: document.clone(),
            responder,
        });

        async move {
            response
                .await
                .unwrap_or_else(|_| Err(AnalysisError::backend_failure("scripted", "响应被丢弃")))
        }
        .boxed()
    }
}

/// 构造提取结果
pub fn extractions(pairs: &[(&str, &str)]) -> Extractions {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// 构造后端文档
pub fn remote_document(id: &str) -> AnalysisDocument {
    AnalysisDocument::from_payload(id, JPEG).expect("JPEG 文件头应能识别")
}
