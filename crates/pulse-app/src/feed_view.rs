//! Terminal feed view: the host-side consumer of the notification stream.
//!
//! Presentation policy lives here, not in the stream client: a non-empty
//! buffer emission makes the banner visible, and visibility reverts on its
//! own after a fixed six-second window.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::Instant;

use pulse_common::Result;
use pulse_stream::{Notification, NotificationClient};

/// How long the banner stays visible after a non-empty buffer emission.
const BANNER_WINDOW: Duration = Duration::from_secs(6);

/// How many notifications the banner shows at once.
const BANNER_LINES: usize = 5;

pub async fn run(client: &NotificationClient) -> Result<()> {
    let mut buffer_rx = client.subscribe_buffer();
    let mut count_rx = client.subscribe_count();
    let mut state_rx = client.subscribe_state();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let mut visible = false;
    let mut hide_at: Option<Instant> = None;

    println!("pulse — live notification feed ('d' dismisses newest, 'q' quits)");

    loop {
        let hide_timer = async {
            match hide_at {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            changed = buffer_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let buffer = buffer_rx.borrow_and_update().clone();
                if !buffer.is_empty() {
                    visible = true;
                    hide_at = Some(Instant::now() + BANNER_WINDOW);
                    render_banner(&buffer);
                }
            }

            changed = count_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let count = *count_rx.borrow_and_update();
                println!("unread: {count}");
            }

            changed = state_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = *state_rx.borrow_and_update();
                tracing::info!(%state, "Connection state changed");
            }

            _ = hide_timer => {
                if visible {
                    visible = false;
                    println!("(banner hidden)");
                }
                hide_at = None;
            }

            line = lines.next_line() => match line? {
                Some(command) => match command.trim() {
                    "d" => client.consume_newest(),
                    "q" => break,
                    "" => {}
                    other => println!("unknown command: {other}"),
                },
                // stdin closed
                None => break,
            },

            _ = tokio::signal::ctrl_c() => break,
        }
    }

    Ok(())
}

fn render_banner(buffer: &[Notification]) {
    println!("--- notifications ({}) ---", buffer.len());
    for notification in buffer.iter().take(BANNER_LINES) {
        match notification.message() {
            Some(message) => println!("  * {message}"),
            None => println!("  * {}", notification.payload()),
        }
    }
    if buffer.len() > BANNER_LINES {
        println!("  ... and {} more", buffer.len() - BANNER_LINES);
    }
}
