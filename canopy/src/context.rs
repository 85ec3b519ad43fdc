// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`Context`] value and its scoped stacks.

use canopy_draw::{Color, DrawDataBuilder, DrawList, DrawListSharedData};
use canopy_input::{FrameInput, InputConfig, InputState};
use kurbo::{Point, Rect, Size, Vec2};

use crate::begin::WindowToken;
use crate::flags::{Cond, ConfigFlags, ItemFlags};
use crate::font::{FixedFont, FontProvider};
use crate::id::{Id, IdFragment};
use crate::nav::NavState;
use crate::popup::PopupRef;
use crate::registry::{WindowHandle, WindowRegistry};
use crate::settings::Settings;
use crate::style::{Style, StyleBackup, StyleColor, StyleToken, StyleVar};
use crate::window::Window;

/// Context-wide options.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Navigation and capture switches.
    pub flags: ConfigFlags,
    /// Seconds between a settings change and the save request.
    pub ini_saving_rate: f64,
    /// Scale applied to every font size.
    pub font_global_scale: f64,
    /// Ctrl + wheel zooms the hovered window.
    pub font_allow_user_scaling: bool,
    /// Click, drag and repeat thresholds.
    pub input: InputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            flags: ConfigFlags::empty(),
            ini_saving_rate: 5.0,
            font_global_scale: 1.0,
            font_allow_user_scaling: false,
            input: InputConfig::default(),
        }
    }
}

/// Device that claimed the active id.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum InputSource {
    /// Nothing is active.
    #[default]
    None,
    /// Mouse press.
    Mouse,
    /// Keyboard or gamepad activation.
    Nav,
}

/// Directives stored by `set_next_window_*` for the next `begin`.
#[derive(Clone, Debug, Default)]
pub(crate) struct NextWindowData {
    pub pos: Option<(Point, Cond, Vec2)>,
    pub size: Option<(Size, Cond)>,
    pub content_size: Option<Size>,
    pub collapsed: Option<(bool, Cond)>,
    pub focus: bool,
    pub bg_alpha: Option<f64>,
}

/// Scope of a [`Context::push_id`].
#[must_use = "hand the token back to Context::pop_id"]
#[derive(Debug, PartialEq, Eq)]
pub struct IdToken {
    window: WindowHandle,
    depth: usize,
}

/// Scope of a [`Context::push_clip_rect`].
#[must_use = "hand the token back to Context::pop_clip_rect"]
#[derive(Debug, PartialEq, Eq)]
pub struct ClipToken {
    window: WindowHandle,
    depth: usize,
}

/// Scope of a [`Context::push_item_flag`].
#[must_use = "hand the token back to Context::pop_item_flag"]
#[derive(Debug, PartialEq, Eq)]
pub struct ItemFlagsToken {
    window: WindowHandle,
    depth: usize,
}

/// All state of one immediate-mode UI.
///
/// The host owns the context. Each frame it writes input through
/// [`input_mut`](Self::input_mut), calls [`new_frame`](Self::new_frame), submits
/// windows and widgets, and finally calls [`render`](Self::render).
pub struct Context {
    pub(crate) config: Config,
    pub(crate) style: Style,
    pub(crate) font: Box<dyn FontProvider>,
    pub(crate) font_size: f64,
    pub(crate) raw: FrameInput,
    pub(crate) input: InputState,
    pub(crate) shared: DrawListSharedData,

    pub(crate) frame_count: i64,
    pub(crate) frame_count_ended: i64,
    pub(crate) frame_count_rendered: i64,
    pub(crate) within_frame: bool,
    pub(crate) time: f64,

    pub(crate) windows: WindowRegistry,
    pub(crate) window_stack: Vec<WindowHandle>,
    pub(crate) current_window: Option<WindowHandle>,
    pub(crate) implicit_window: Option<WindowToken>,
    pub(crate) begin_order_counter: u32,
    pub(crate) hovered_window: Option<WindowHandle>,
    pub(crate) hovered_root_window: Option<WindowHandle>,
    pub(crate) moving_window: Option<WindowHandle>,
    pub(crate) render_front_most: Option<WindowHandle>,

    pub(crate) hovered_id: Id,
    pub(crate) hovered_id_prev: Id,
    pub(crate) hovered_id_allow_overlap: bool,
    pub(crate) hovered_id_timer: f64,
    pub(crate) active_id: Id,
    pub(crate) active_id_prev_frame: Id,
    pub(crate) active_id_is_alive: bool,
    pub(crate) active_id_is_just_activated: bool,
    pub(crate) active_id_allow_overlap: bool,
    pub(crate) active_id_timer: f64,
    pub(crate) active_id_click_offset: Vec2,
    pub(crate) active_id_window: Option<WindowHandle>,
    pub(crate) active_id_source: InputSource,

    pub(crate) style_stack: Vec<StyleBackup>,
    pub(crate) next_window: NextWindowData,
    pub(crate) open_popups: Vec<PopupRef>,
    pub(crate) begin_popups: Vec<PopupRef>,
    pub(crate) nav: NavState,
    pub(crate) settings: Settings,

    pub(crate) draw_data_builder: DrawDataBuilder<WindowHandle>,
    pub(crate) overlay_list: DrawList,
    pub(crate) modal_darkening_ratio: f64,
    pub(crate) want_capture_mouse: bool,
    pub(crate) want_capture_keyboard: bool,
}

impl core::fmt::Debug for Context {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Context")
            .field("frame_count", &self.frame_count)
            .field("windows", &self.windows.len())
            .field("hovered_id", &self.hovered_id)
            .field("active_id", &self.active_id)
            .field("nav_id", &self.nav.id)
            .field("open_popups", &self.open_popups.len())
            .finish_non_exhaustive()
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// A context measuring text with [`FixedFont`].
    pub fn new() -> Self {
        Self::with_font(Box::new(FixedFont::default()))
    }

    /// A context measuring text with `font`.
    pub fn with_font(font: Box<dyn FontProvider>) -> Self {
        let config = Config::default();
        let shared = DrawListSharedData::default();
        let font_size = font.font_size();
        Self {
            input: InputState::new(config.input),
            config,
            style: Style::default(),
            font,
            font_size,
            raw: FrameInput::default(),
            overlay_list: DrawList::new(shared.clone()),
            shared,
            frame_count: 0,
            frame_count_ended: -1,
            frame_count_rendered: -1,
            within_frame: false,
            time: 0.0,
            windows: WindowRegistry::new(),
            window_stack: Vec::new(),
            current_window: None,
            implicit_window: None,
            begin_order_counter: 0,
            hovered_window: None,
            hovered_root_window: None,
            moving_window: None,
            render_front_most: None,
            hovered_id: Id::NONE,
            hovered_id_prev: Id::NONE,
            hovered_id_allow_overlap: false,
            hovered_id_timer: 0.0,
            active_id: Id::NONE,
            active_id_prev_frame: Id::NONE,
            active_id_is_alive: false,
            active_id_is_just_activated: false,
            active_id_allow_overlap: false,
            active_id_timer: 0.0,
            active_id_click_offset: Vec2::ZERO,
            active_id_window: None,
            active_id_source: InputSource::None,
            style_stack: Vec::new(),
            next_window: NextWindowData::default(),
            open_popups: Vec::new(),
            begin_popups: Vec::new(),
            nav: NavState::default(),
            settings: Settings::default(),
            draw_data_builder: DrawDataBuilder::new(),
            modal_darkening_ratio: 0.0,
            want_capture_mouse: false,
            want_capture_keyboard: false,
        }
    }

    /// Context-wide options.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Mutable context-wide options; read at the next frame.
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Current style.
    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Mutable style. Prefer [`push_style_var`](Self::push_style_var) inside a frame.
    pub fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }

    /// Raw input the host writes before [`new_frame`](Self::new_frame).
    pub fn input_mut(&mut self) -> &mut FrameInput {
        &mut self.raw
    }

    /// Input snapshot of the current frame.
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Number of frames started.
    pub fn frame_count(&self) -> i64 {
        self.frame_count
    }

    /// Accumulated time in seconds.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Font size of the current window.
    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    /// Every window ever begun and not discarded.
    pub fn windows(&self) -> &WindowRegistry {
        &self.windows
    }

    /// Window being built, if inside a `begin`/`end` pair.
    pub fn current_window(&self) -> Option<WindowHandle> {
        self.current_window
    }

    /// Item hovered this frame so far.
    pub fn hovered_id(&self) -> Id {
        self.hovered_id
    }

    /// Item being interacted with.
    pub fn active_id(&self) -> Id {
        self.active_id
    }

    /// Window under the mouse.
    pub fn hovered_window(&self) -> Option<WindowHandle> {
        self.hovered_window
    }

    /// Focused window.
    pub fn nav_window(&self) -> Option<WindowHandle> {
        self.nav.window
    }

    /// Item under the navigation cursor.
    pub fn nav_id(&self) -> Id {
        self.nav.id
    }

    /// The UI wants mouse input; the host should not forward it to the application.
    pub fn want_capture_mouse(&self) -> bool {
        self.want_capture_mouse
    }

    /// The UI wants keyboard input.
    pub fn want_capture_keyboard(&self) -> bool {
        self.want_capture_keyboard
    }

    /// Draw list drawn over every window this frame.
    pub fn overlay_draw_list(&mut self) -> &mut DrawList {
        &mut self.overlay_list
    }

    pub(crate) fn cur(&self) -> WindowHandle {
        let Some(h) = self.current_window else {
            panic!("no window is being built; call begin first");
        };
        h
    }

    pub(crate) fn cur_window(&self) -> &Window {
        self.windows.at(self.cur())
    }

    pub(crate) fn cur_window_mut(&mut self) -> &mut Window {
        let h = self.cur();
        self.windows.at_mut(h)
    }

    pub(crate) fn set_current_window(&mut self, window: Option<WindowHandle>) {
        self.current_window = window;
        let scale = window.map_or(1.0, |h| self.windows.at(h).font_window_scale);
        self.font_size = self.font.font_size() * self.config.font_global_scale * scale;
    }

    pub(crate) fn calc_text_size(&self, text: &str) -> Size {
        self.font.calc_text_size(text, self.font_size)
    }

    /// Hash `fragment` on top of the current window's ID stack.
    pub fn get_id<'a>(&self, fragment: impl Into<IdFragment<'a>>) -> Id {
        self.cur_window().get_id(fragment)
    }

    /// Push `fragment` onto the current window's ID stack.
    pub fn push_id<'a>(&mut self, fragment: impl Into<IdFragment<'a>>) -> IdToken {
        let window = self.cur();
        let w = self.windows.at_mut(window);
        let id = w.get_id(fragment);
        w.id_stack.push(id);
        IdToken {
            window,
            depth: w.id_stack.len(),
        }
    }

    /// Pop the ID pushed by the matching [`push_id`](Self::push_id).
    pub fn pop_id(&mut self, token: IdToken) {
        assert_eq!(self.current_window, Some(token.window), "pop_id called in another window");
        let w = self.windows.at_mut(token.window);
        assert_eq!(w.id_stack.len(), token.depth, "pop_id does not match the innermost push_id");
        w.id_stack.pop();
    }

    /// Run `f` with `fragment` pushed onto the ID stack.
    pub fn with_id<'a, R>(&mut self, fragment: impl Into<IdFragment<'a>>, f: impl FnOnce(&mut Self) -> R) -> R {
        let token = self.push_id(fragment);
        let r = f(self);
        self.pop_id(token);
        r
    }

    /// Replace one colour until the token is popped.
    pub fn push_style_color(&mut self, slot: StyleColor, color: Color) -> StyleToken {
        let old = core::mem::replace(&mut self.style.colors[slot.index()], color);
        self.style_stack.push(StyleBackup::Color(slot, old));
        StyleToken {
            depth: self.style_stack.len(),
        }
    }

    /// Replace one style variable until the token is popped.
    pub fn push_style_var(&mut self, var: StyleVar) -> StyleToken {
        let old = self.style.apply(var);
        self.style_stack.push(StyleBackup::Var(old));
        StyleToken {
            depth: self.style_stack.len(),
        }
    }

    /// Restore the value replaced by the matching push.
    pub fn pop_style(&mut self, token: StyleToken) {
        assert_eq!(
            self.style_stack.len(),
            token.depth,
            "pop_style does not match the innermost style push"
        );
        match self.style_stack.pop() {
            Some(StyleBackup::Color(slot, color)) => self.style.colors[slot.index()] = color,
            Some(StyleBackup::Var(var)) => {
                self.style.apply(var);
            }
            None => {}
        }
    }

    /// Clip drawing of the current window, intersected with the current clip by default.
    pub fn push_clip_rect(&mut self, min: Point, max: Point, intersect_with_current: bool) -> ClipToken {
        let window = self.cur();
        let w = self.windows.at_mut(window);
        w.draw_list.push_clip_rect(min, max, intersect_with_current);
        w.clip_rect = w.draw_list.clip_rect();
        ClipToken {
            window,
            depth: w.draw_list.clip_rect_depth(),
        }
    }

    /// Restore the clip rectangle replaced by the matching push.
    pub fn pop_clip_rect(&mut self, token: ClipToken) {
        assert_eq!(self.current_window, Some(token.window), "pop_clip_rect called in another window");
        let w = self.windows.at_mut(token.window);
        assert_eq!(
            w.draw_list.clip_rect_depth(),
            token.depth,
            "pop_clip_rect does not match the innermost push_clip_rect"
        );
        w.draw_list.pop_clip_rect();
        w.clip_rect = w.draw_list.clip_rect();
    }

    /// Set or clear `flag` for the following items of the current window.
    pub fn push_item_flag(&mut self, flag: ItemFlags, enabled: bool) -> ItemFlagsToken {
        let window = self.cur();
        let dc = &mut self.windows.at_mut(window).dc;
        dc.item_flags.set(flag, enabled);
        dc.item_flags_stack.push(dc.item_flags);
        ItemFlagsToken {
            window,
            depth: dc.item_flags_stack.len(),
        }
    }

    /// Restore the item flags replaced by the matching push.
    pub fn pop_item_flag(&mut self, token: ItemFlagsToken) {
        assert_eq!(self.current_window, Some(token.window), "pop_item_flag called in another window");
        let dc = &mut self.windows.at_mut(token.window).dc;
        assert_eq!(
            dc.item_flags_stack.len(),
            token.depth,
            "pop_item_flag does not match the innermost push_item_flag"
        );
        dc.item_flags_stack.pop();
        dc.item_flags = dc.item_flags_stack.last().copied().unwrap_or_default();
    }

    pub(crate) fn clip_rect(&self) -> Rect {
        self.cur_window().clip_rect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(ctx: &mut Context) {
        ctx.input_mut().display_size = Size::new(800.0, 600.0);
        ctx.new_frame().unwrap();
    }

    #[test]
    fn id_stack_restores_identifiers() {
        let mut ctx = Context::new();
        frame(&mut ctx);
        let w = ctx.begin("Ids", crate::WindowFlags::empty());
        let before = ctx.get_id("x");
        let inner = ctx.with_id(7, |ctx| ctx.get_id("x"));
        assert_ne!(before, inner);
        assert_eq!(ctx.get_id("x"), before);
        let t = ctx.push_id("node");
        assert_eq!(ctx.get_id("x"), Id::from_str_seeded("x", Id::from_str_seeded("node", ctx.cur_window().id())));
        ctx.pop_id(t);
        ctx.end(w);
        ctx.end_frame();
    }

    #[test]
    fn triple_hash_ignores_the_path() {
        let mut ctx = Context::new();
        frame(&mut ctx);
        let w = ctx.begin("A", crate::WindowFlags::empty());
        let a = ctx.with_id("deep", |ctx| ctx.get_id("Label###stable"));
        ctx.end(w);
        let w = ctx.begin("B", crate::WindowFlags::empty());
        let b = ctx.get_id("Other###stable");
        ctx.end(w);
        assert_eq!(a, b);
        ctx.end_frame();
    }

    #[test]
    #[should_panic(expected = "pop_id does not match")]
    fn mismatched_id_tokens_panic() {
        let mut ctx = Context::new();
        frame(&mut ctx);
        let outer = ctx.push_id("outer");
        let inner = ctx.push_id("inner");
        ctx.pop_id(outer);
        ctx.pop_id(inner);
    }

    #[test]
    fn style_tokens_restore_in_order() {
        let mut ctx = Context::new();
        let a = ctx.push_style_var(StyleVar::ItemSpacing(Vec2::new(1.0, 1.0)));
        let b = ctx.push_style_color(StyleColor::Text, Color::BLACK);
        assert_eq!(ctx.style().colors[StyleColor::Text.index()], Color::BLACK);
        ctx.pop_style(b);
        ctx.pop_style(a);
        assert_eq!(ctx.style(), &Style::default());
    }

    #[test]
    fn item_flags_nest() {
        let mut ctx = Context::new();
        frame(&mut ctx);
        let t = ctx.push_item_flag(ItemFlags::DISABLED, true);
        assert!(ctx.cur_window().dc.item_flags.contains(ItemFlags::DISABLED));
        ctx.pop_item_flag(t);
        assert_eq!(ctx.cur_window().dc.item_flags, ItemFlags::default());
        ctx.end_frame();
    }
}
