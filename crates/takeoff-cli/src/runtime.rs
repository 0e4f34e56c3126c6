// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use std::collections::VecDeque;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use takeoff_app::{AppCommand, AppEvent, AppState, ListKind};
use takeoff_catalog::{CatalogSource, fulfill};

/// Destination for copied takeoff text.
pub trait ClipboardSink {
    fn write_text(&mut self, text: &str) -> Result<()>;
}

impl<T: ClipboardSink + ?Sized> ClipboardSink for Box<T> {
    fn write_text(&mut self, text: &str) -> Result<()> {
        (**self).write_text(text)
    }
}

#[derive(Debug, Default)]
pub struct StdoutClipboard;

impl ClipboardSink for StdoutClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{text}").context("write copied text to stdout")?;
        stdout.flush().context("flush stdout")
    }
}

/// Overwrites `path` with each copy.
#[derive(Debug, Clone)]
pub struct FileClipboard {
    path: PathBuf,
}

impl FileClipboard {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl ClipboardSink for FileClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        fs::write(&self.path, text).with_context(|| {
            format!(
                "write clipboard file {} -- check [clipboard].path",
                self.path.display()
            )
        })
    }
}

/// Drives an [`AppState`] against a catalog source, fulfilling fetch
/// requests as the reducer emits them.
pub struct Session<S, C> {
    state: AppState,
    source: S,
    clipboard: C,
    last_failure: Option<String>,
}

impl<S, C> Session<S, C> {
    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    /// The most recent fetch failure, cleared on read.
    pub fn take_failure(&mut self) -> Option<String> {
        self.last_failure.take()
    }
}

impl<S: CatalogSource, C: ClipboardSink> Session<S, C> {
    pub fn new(source: S, clipboard: C, history_limit: usize) -> Self {
        Self {
            state: AppState::with_history_limit(history_limit),
            source,
            clipboard,
            last_failure: None,
        }
    }

    pub fn start(&mut self) -> Vec<AppEvent> {
        self.dispatch(AppCommand::Start)
    }

    /// Applies `command`, then answers every fetch request it triggers in
    /// emission order. Returns all events, fetch results included.
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        let mut events = Vec::new();
        let mut queue = VecDeque::from([command]);
        while let Some(command) = queue.pop_front() {
            for event in self.state.dispatch(command) {
                if let AppEvent::FetchRequested(request) = &event {
                    match fulfill(&self.source, *request) {
                        Ok(loaded) => queue.push_back(loaded),
                        Err(error) => {
                            let message = format!("{error:#}");
                            tracing::warn!(?request, error = %message, "catalog fetch failed");
                            self.last_failure = Some(message);
                        }
                    }
                }
                events.push(event);
            }
        }
        events
    }

    pub fn copy(&mut self, list: Option<ListKind>) -> Result<()> {
        let text = self.state.clipboard_text(list);
        tracing::debug!(bytes = text.len(), ?list, "copying takeoff");
        self.clipboard.write_text(&text)
    }
}
