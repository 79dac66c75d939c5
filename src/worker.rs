//! 后台请求线程
//!
//! 界面线程不能阻塞在网络请求上，请求在独立线程里执行，
//! 结果通过 channel 送回，由主循环轮询。

use std::sync::Arc;
use std::thread;

use crossbeam_channel::{Receiver, Sender, TryRecvError, unbounded};
use tracing::warn;

use crate::api::Shortener;
use crate::error::ApiError;
use crate::models::{ShortenRequest, ShortenResult};

pub type Response = Result<ShortenResult, ApiError>;

pub struct RequestWorker {
    shortener: Arc<dyn Shortener>,
    tx: Sender<Response>,
    rx: Receiver<Response>,
}

impl RequestWorker {
    pub fn new(shortener: Arc<dyn Shortener>) -> Self {
        let (tx, rx) = unbounded();
        Self { shortener, tx, rx }
    }

    /// 在新线程中发送请求，完成后恰好产生一个响应
    pub fn dispatch(&self, request: ShortenRequest) {
        let shortener = Arc::clone(&self.shortener);
        let tx = self.tx.clone();
        let spawned = thread::Builder::new()
            .name("shortqr-request".to_string())
            .spawn(move || {
                let response = shortener.shorten(&request);
                // 接收端只会在退出时被丢弃
                let _ = tx.send(response);
            });

        if let Err(e) = spawned {
            warn!("failed to spawn request thread: {}", e);
            let _ = self
                .tx
                .send(Err(ApiError::Transport(format!("无法启动请求线程: {}", e))));
        }
    }

    /// 非阻塞地取出一个已完成的响应
    pub fn try_recv(&self) -> Option<Response> {
        match self.rx.try_recv() {
            Ok(response) => Some(response),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    #[cfg(test)]
    pub fn recv_timeout(&self, timeout: std::time::Duration) -> Option<Response> {
        self.rx.recv_timeout(timeout).ok()
    }
}
