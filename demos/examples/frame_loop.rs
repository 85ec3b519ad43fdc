// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A headless host driving Canopy with scripted input.
//!
//! The "application" builds a window with a menu bar, a checkbox, a button that
//! opens a modal dialog, and a tooltip. The "host" records where those items were
//! laid out and replays clicks on them through queued input events, printing a
//! summary of the draw data produced each frame.
//!
//! Run:
//! - `cargo run -p canopy_demos --example frame_loop`

use std::collections::HashMap;

use canopy::{Cond, Context, HoveredFlags, WindowFlags};
use canopy_input::{InputEvent, MouseButton};
use kurbo::{Point, Rect, Size};

#[derive(Debug, Default)]
struct App {
    wireframe: bool,
    dialog_count: u32,
    quit: bool,
    /// Screen rectangles of the items the script clicks, keyed by label.
    targets: HashMap<&'static str, Rect>,
}

impl App {
    fn build(&mut self, ctx: &mut Context) {
        ctx.set_next_window_pos(Point::new(20.0, 20.0), Cond::FirstUseEver);
        ctx.set_next_window_size(Size::new(320.0, 220.0), Cond::FirstUseEver);
        let window = ctx.begin("Demo", WindowFlags::MENU_BAR);

        if let Some(bar) = ctx.begin_menu_bar() {
            if let Some(menu) = ctx.begin_menu("File", true) {
                ctx.menu_item("New", None, false, true);
                if ctx.menu_item("Quit", Some("Ctrl+Q"), false, true) {
                    self.quit = true;
                }
                self.targets.insert("Quit", ctx.last_item_rect());
                ctx.end_menu(menu);
            }
            // Back in the menu bar, so this is the "File" entry itself.
            self.targets.insert("File", ctx.last_item_rect());
            ctx.end_menu_bar(bar);
        }

        if window.is_visible() {
            ctx.text("Canopy frame loop");
            ctx.checkbox("Wireframe", &mut self.wireframe);
            self.targets.insert("Wireframe", ctx.last_item_rect());

            if ctx.button("Open dialog") {
                ctx.open_popup("Dialog");
            }
            self.targets.insert("Open dialog", ctx.last_item_rect());
            if ctx.is_item_hovered(HoveredFlags::empty()) {
                ctx.set_tooltip("Opens a modal dialog");
            }

            if let Some(popup) = ctx.begin_popup_modal("Dialog", WindowFlags::ALWAYS_AUTO_RESIZE) {
                ctx.text("Nothing behind this dialog reacts to the mouse.");
                if ctx.button("Close") {
                    self.dialog_count += 1;
                    ctx.close_current_popup();
                }
                self.targets.insert("Close", ctx.last_item_rect());
                ctx.end_popup(popup);
            }
        }
        ctx.end(window);
    }
}

/// Queue a press and release over the centre of `rect`.
///
/// The events are trickled, so the press and the release land on separate frames.
fn queue_click(ctx: &mut Context, rect: Rect) {
    let io = ctx.input_mut();
    io.push_event(InputEvent::MousePos(rect.center()));
    io.push_event(InputEvent::MouseButton {
        button: MouseButton::Left,
        down: true,
    });
    io.push_event(InputEvent::MouseButton {
        button: MouseButton::Left,
        down: false,
    });
}

fn main() {
    let mut ctx = Context::new();
    let mut app = App::default();
    let mut script = ["Open dialog", "Close", "Wireframe", "File", "Quit"].into_iter();

    for frame in 0..40 {
        {
            let io = ctx.input_mut();
            io.display_size = Size::new(640.0, 480.0);
            io.delta_time = 1.0 / 60.0;
        }
        // Give every click a few frames to settle before the next one.
        if frame % 6 == 3
            && ctx.input_mut().queued_events() == 0
            && let Some(label) = script.next()
            && let Some(&rect) = app.targets.get(label)
        {
            println!("frame {frame:2}: clicking {label:?}");
            queue_click(&mut ctx, rect);
        }
        if let Err(err) = ctx.new_frame() {
            eprintln!("frame {frame}: {err}");
            return;
        }
        app.build(&mut ctx);

        let focused = ctx
            .nav_window()
            .and_then(|h| ctx.windows().get(h))
            .map_or("<none>", |w| w.name())
            .to_owned();
        let data = ctx.render();
        println!(
            "frame {frame:2}: {} lists, {} commands, {} vertices, {} indices, focus {focused}",
            data.cmd_lists.len(),
            data.cmd_count(),
            data.total_vtx_count,
            data.total_idx_count,
        );
        if app.quit {
            break;
        }
    }

    println!(
        "wireframe: {}, dialogs closed: {}, quit: {}",
        app.wireframe, app.dialog_count, app.quit
    );
}
