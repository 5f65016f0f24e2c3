//! Outcome stream handed to callers of the download manager

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;

use crate::app::models::DownloadOutcome;

/// Receiving end of a download session
///
/// Yields one `DownloadOutcome` per scheduled collection in completion
/// order, then `None` once every run has finished. The stream is closed
/// exactly once, by the session supervisor.
#[derive(Debug)]
pub struct OutcomeStream {
    receiver: mpsc::Receiver<DownloadOutcome>,
    expected: usize,
}

impl OutcomeStream {
    pub(crate) fn new(receiver: mpsc::Receiver<DownloadOutcome>, expected: usize) -> Self {
        Self { receiver, expected }
    }

    /// Wait for the next outcome; `None` means the session is complete
    pub async fn recv(&mut self) -> Option<DownloadOutcome> {
        self.receiver.recv().await
    }

    /// Number of outcomes this stream will yield in total
    pub fn expected(&self) -> usize {
        self.expected
    }

    /// Drain the stream into a vector
    pub async fn collect_all(mut self) -> Vec<DownloadOutcome> {
        let mut outcomes = Vec::with_capacity(self.expected);
        while let Some(outcome) = self.recv().await {
            outcomes.push(outcome);
        }
        outcomes
    }
}

impl Stream for OutcomeStream {
    type Item = DownloadOutcome;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().receiver.poll_recv(cx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.expected))
    }
}
