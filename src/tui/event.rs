use anyhow::Result;
use crossterm::event::{Event as CrosstermEvent, KeyEvent, KeyEventKind};
use futures::StreamExt;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::api::{ApiError, QuestionRequest, ResumeAnalysis};

/// Result of a backend call started by a stage screen.
#[derive(Debug)]
pub enum ApiOutcome {
    ResumeAnalyzed(Result<ResumeAnalysis, ApiError>),
    QuestionsGenerated {
        request: QuestionRequest,
        result: Result<Value, ApiError>,
    },
    AnswerSubmitted {
        index: usize,
        result: Result<(), ApiError>,
    },
    InterviewCompleted(Result<Value, ApiError>),
}

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Paste(String),
    Tick,
    Resize,
    /// `screen` identifies the screen instance that asked; replies for a
    /// screen that is no longer active are dropped.
    Api { screen: u64, outcome: ApiOutcome },
}

pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    tx: mpsc::UnboundedSender<Event>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let event_tx = tx.clone();

        tokio::spawn(async move {
            let mut event_stream = crossterm::event::EventStream::new();
            let mut tick_interval = tokio::time::interval(tick_rate);

            loop {
                tokio::select! {
                    maybe_event = event_stream.next() => {
                        let event = match maybe_event {
                            Some(Ok(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                                Event::Key(key)
                            }
                            Some(Ok(CrosstermEvent::Paste(text))) => Event::Paste(text),
                            Some(Ok(CrosstermEvent::Resize(_, _))) => Event::Resize,
                            Some(Err(_)) | None => break,
                            _ => continue,
                        };
                        if event_tx.send(event).is_err() {
                            break;
                        }
                    }
                    _ = tick_interval.tick() => {
                        if event_tx.send(Event::Tick).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        Self { rx, tx }
    }

    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.tx.clone()
    }

    pub async fn next(&mut self) -> Result<Event> {
        self.rx
            .recv()
            .await
            .ok_or_else(|| anyhow::anyhow!("Event channel closed"))
    }
}
