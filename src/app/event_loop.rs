use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::app::{App, Message, Model, update};
use crate::convert::{Debouncer, LivePreview};

/// Longest the loop sleeps while nothing is scheduled.
const IDLE_POLL_MS: u64 = 250;

/// Terminal resizes are applied once the size settles.
pub(super) type ResizeDebouncer = Debouncer<(u16, u16)>;

const RESIZE_SETTLE_MS: u64 = 100;

/// Apply `msg` to the model, run its side effects, and schedule a
/// conversion if the document changed.
pub(super) fn dispatch(model: &mut Model, live: &mut LivePreview, msg: Message, now_ms: u64) {
    let before = model.buffer.revision();
    let side_msg = msg.clone();
    *model = update(std::mem::take(model), msg);
    App::handle_message_side_effects(model, live, &side_msg);
    let after = model.buffer.revision();
    if after != before {
        live.note_edit(after, now_ms);
    }
}

/// How long to wait for input before the loop runs again.
pub(super) fn poll_timeout_ms(
    needs_render: bool,
    resize_pending: bool,
    conversion_due_in: Option<u64>,
) -> u64 {
    if needs_render {
        0
    } else if resize_pending {
        10
    } else {
        conversion_due_in.map_or(IDLE_POLL_MS, |ms| ms.min(IDLE_POLL_MS))
    }
}

impl App {
    /// Run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal initialization or the event loop
    /// encounters an I/O failure.
    pub fn run(&mut self) -> Result<()> {
        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal - markpane requires an interactive terminal")?;
        let size = terminal.size()?;
        execute!(stdout(), EnableMouseCapture, EnableBracketedPaste)?;

        let mut model = Model::new(&self.initial_text, (size.width, size.height))
            .with_view(self.view)
            .with_source_name(self.source_name.clone());
        model
            .config_global_path
            .clone_from(&self.config_global_path);
        model.config_local_path.clone_from(&self.config_local_path);
        let mut live = LivePreview::new(self.pipeline(), self.debounce_ms);
        tracing::info!(
            view = model.view.mode.as_str(),
            theme = model.view.theme.as_str(),
            debounce_ms = live.debounce_ms(),
            "session started"
        );

        let initial = live.flush(model.buffer.revision(), &model.buffer.text());
        model = update(model, Message::Rendered(initial));

        let result = Self::event_loop(&mut terminal, &mut model, &mut live);

        // Restore terminal
        let _ = execute!(stdout(), DisableBracketedPaste, DisableMouseCapture);
        ratatui::restore();
        tracing::info!(conversions = live.conversions(), "session ended");

        result
    }

    fn event_loop(
        terminal: &mut DefaultTerminal,
        model: &mut Model,
        live: &mut LivePreview,
    ) -> Result<()> {
        let start = Instant::now();
        let elapsed_ms = || u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        let mut resize_debouncer = ResizeDebouncer::new(RESIZE_SETTLE_MS);
        let mut frame_idx: u64 = 0;
        let mut needs_render = true;

        loop {
            if model.expire_toast(Instant::now()) {
                needs_render = true;
            }

            let now_ms = elapsed_ms();

            if let Some((width, height)) = resize_debouncer.take_ready(now_ms) {
                tracing::debug!(width, height, "applying resize");
                *model = update(std::mem::take(model), Message::Resize(width, height));
                needs_render = true;
            }

            if let Some(conversion) =
                live.poll(now_ms, model.buffer.revision(), || model.buffer.text())
            {
                *model = update(std::mem::take(model), Message::Rendered(conversion));
                needs_render = true;
            }

            // Handle events
            let poll_ms = poll_timeout_ms(
                needs_render,
                resize_debouncer.is_pending(),
                live.due_in(now_ms),
            );
            if event::poll(Duration::from_millis(poll_ms))? {
                // Refresh timestamp after poll wait so debouncers use accurate times.
                let event_ms = elapsed_ms();
                if let Some(msg) =
                    Self::handle_event(&event::read()?, model, event_ms, &mut resize_debouncer)
                {
                    tracing::trace!(frame = frame_idx, ?msg, "message");
                    dispatch(model, live, msg, event_ms);
                    needs_render = true;
                }

                // Coalesce key repeat and paste bursts into a single render.
                let mut drained = 0_u32;
                while event::poll(Duration::from_millis(0))? {
                    let drain_ms = elapsed_ms();
                    if let Some(msg) =
                        Self::handle_event(&event::read()?, model, drain_ms, &mut resize_debouncer)
                    {
                        drained += 1;
                        dispatch(model, live, msg, drain_ms);
                        needs_render = true;
                    }
                }
                if drained > 0 {
                    tracing::trace!(frame = frame_idx, drained, "drained events");
                }
            }

            if needs_render {
                frame_idx += 1;
                let draw_start = Instant::now();
                terminal.draw(|frame| crate::ui::render(model, frame))?;
                tracing::trace!(
                    frame = frame_idx,
                    draw_ms = draw_start.elapsed().as_secs_f64() * 1000.0,
                    "frame drawn"
                );
                needs_render = false;
            }

            if model.should_quit {
                break;
            }
        }
        Ok(())
    }
}
