//! Headless Window Example
//!
//! Drives a window through its lifecycle on the headless backend:
//! property changes flow to the platform, simulated OS events flow back.
//!
//! Run with: RUST_LOG=debug cargo run -p casement_gui --example headless_window

use anyhow::Result;
use casement_gui::prelude::*;
use casement_platform::headless::HeadlessPlatform;
use std::cell::RefCell;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

/// Logs key presses and closes the window on Escape
struct DemoHandler;

impl WindowHandler for DemoHandler {
    fn resize_event(&mut self, window: &mut Window, event: &ResizeEvent) {
        tracing::info!(
            width = event.width,
            height = event.height,
            scale = window.scale_factor.get(),
            "resized"
        );
    }

    fn key_press_event(&mut self, window: &mut Window, event: &KeyEvent) {
        tracing::info!(key = ?event.key, "key pressed");
        if event.key == Key::Escape {
            window.visible.set(false);
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let platform = HeadlessPlatform::with_scale_factor(2.0);
    let mut window = Window::with_handler(Rc::new(platform.clone()), DemoHandler);
    let extent = window.extent_watcher();

    let input_log = Rc::new(RefCell::new(Vec::new()));
    let input_log_clone = input_log.clone();
    let receiver = Rc::new(RefCell::new(move |_: WindowId, event: &Event| {
        if event.is_input() {
            input_log_clone.borrow_mut().push(event.kind());
        }
    }));
    window.register_event_receiver(&receiver);

    window.title.set("Headless demo".to_string());
    window.create()?;
    window.visible.set(true);

    let id = window.id();
    platform.simulate_resize(id, 1280, 720);
    platform.post_event(id, Event::mouse_move(100, 120));
    platform.post_event(id, Event::mouse_press(MouseButton::Left, 100, 120));
    platform.post_event(id, Event::key_press(Key::Escape, Modifiers::NONE));
    let dispatched = window.process_events();

    tracing::info!(
        dispatched,
        width = extent.width(),
        height = extent.height(),
        scale = extent.scale_factor(),
        cursor = ?window.cursor_position.get(),
        visible = window.visible.get(),
        "events processed"
    );
    tracing::info!(inputs = ?input_log.borrow(), "receiver saw");

    for call in platform.calls() {
        tracing::debug!(?call, "platform call");
    }

    window.destroy();
    Ok(())
}
