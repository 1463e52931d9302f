use std::{
    io::{self, Write},
    sync::Arc,
    time::Duration,
};

use anyhow::Result;
use chrono_tz::Tz;
use serde::Serialize;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    time::{sleep, Instant},
};

use crate::{
    infrastructure::shutdown::ShutdownListener,
    pipeline::{Command, CommandReply, FilterCore},
    storage::SettingsFile,
};

use super::{
    types::{CommentFeed, HostInput},
    utils::parse_line,
};

/// Reads comments and slash commands from stdin and feeds them to the core.
pub struct HostService {
    core: Arc<FilterCore>,
    feed: Arc<CommentFeed>,
    settings_file: SettingsFile,
    timezone: Tz,
}

impl HostService {
    pub fn new(
        core: Arc<FilterCore>,
        feed: Arc<CommentFeed>,
        settings_file: SettingsFile,
        timezone: Tz,
    ) -> Self {
        Self {
            core,
            feed,
            settings_file,
            timezone,
        }
    }

    pub async fn run(&self, mut shutdown: ShutdownListener) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            tokio::select! {
                _ = shutdown.notified() => break,
                line = lines.next_line() => match line? {
                    Some(line) => self.handle_line(&line),
                    None => {
                        tracing::info!(target: "host", comments = self.feed.len(), "입력 스트림 종료");
                        break;
                    }
                }
            }
        }
        Ok(())
    }

    /// Waits until nothing is queued, debouncing or draining, up to `limit`.
    pub async fn wait_idle(&self, limit: Duration) -> bool {
        let deadline = Instant::now() + limit;
        loop {
            let queue = self.core.status().queue;
            if queue.queued == 0 && !queue.draining && !queue.debouncing {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            sleep(Duration::from_millis(20)).await;
        }
    }

    fn handle_line(&self, line: &str) {
        match parse_line(line) {
            Ok(None) => {}
            Ok(Some(HostInput::Comment(text))) => {
                let comment = self.feed.push(text);
                self.core.discovered(vec![comment]);
            }
            Ok(Some(HostInput::Command(command))) => self.handle_command(command),
            Err(err) => {
                tracing::warn!(target: "host", error = %err, "잘못된 입력을 무시합니다");
                emit(&ErrorLine {
                    error: err.to_string(),
                });
            }
        }
    }

    fn handle_command(&self, command: Command) {
        match &command {
            Command::Navigate(_) => self.feed.clear(),
            Command::SettingsUpdated(settings) => {
                if let Err(err) = self.settings_file.save(settings) {
                    tracing::warn!(
                        target: "storage",
                        error = %err,
                        path = %self.settings_file.path().display(),
                        "설정 저장 실패"
                    );
                }
            }
            _ => {}
        }

        let reply = self.core.handle(command);
        if let CommandReply::Pong(pong) = &reply {
            let local = pong.timestamp.with_timezone(&self.timezone);
            tracing::info!(
                target: "host",
                context = %pong.context,
                generation = pong.generation,
                at = %local.format("%Y-%m-%d %H:%M:%S"),
                "핑 응답"
            );
        }
        emit(&reply);
    }
}

#[derive(Serialize)]
struct ErrorLine {
    error: String,
}

fn emit<T: Serialize>(value: &T) {
    match serde_json::to_string(value) {
        Ok(line) => {
            let mut stdout = io::stdout().lock();
            if let Err(err) = writeln!(stdout, "{line}") {
                tracing::warn!(target: "host", error = %err, "응답 출력 실패");
            }
        }
        Err(err) => tracing::warn!(target: "host", error = %err, "응답 직렬화 실패"),
    }
}
