//! Main application module for PrevueMD
//!
//! This module implements the eframe App trait: the toolbar, the editor and
//! preview panes with synchronized scrolling, the status bar, and the
//! unsaved-changes dialog shown when the window is closed.

use std::sync::Arc;
use std::time::{Duration, Instant};

use eframe::egui;
use log::{debug, info, warn};

use crate::config::{
    save_config_silent, FilePreferenceStore, MemoryPreferenceStore, PreferenceStore, Settings,
    WindowSize,
};
use crate::error::Result;
use crate::export::{
    generate_html_document, write_preview_file, ClipboardWriter, DialogFileSaver, FileSaver,
    SaveOutcome, SystemClipboard,
};
use crate::fonts::{create_font_definitions, preview_font_id};
use crate::markdown::{MarkdownRenderer, RenderWorker};
use crate::preview::{ScrollPane, SyncScroll};
use crate::state::{DocumentStore, ExitGuard, PaneLayout};
use crate::theme::ThemeManager;
use crate::ui::{Notifier, ToastLevel, ToastQueue, Toolbar, ToolbarAction, ToolbarState};

/// Application name shown in the window title.
pub const APP_NAME: &str = "PrevueMD";

/// Title of the document opened in the browser.
const BROWSER_PREVIEW_TITLE: &str = "PrevueMD Preview";

/// The main application struct that holds all state.
pub struct PrevueApp {
    /// Markdown source and rendered markup
    document: DocumentStore,
    /// Shared renderer, also owned by the render thread
    renderer: Arc<MarkdownRenderer>,
    /// Debounced background rendering
    worker: RenderWorker,
    /// Scroll synchronizer bound to the editor pane
    editor_sync: SyncScroll<ScrollPane>,
    /// Scroll synchronizer bound to the preview pane
    preview_sync: SyncScroll<ScrollPane>,
    /// Split view or maximized preview
    layout: PaneLayout,
    /// Theme manager for handling theme switching
    theme_manager: ThemeManager,
    /// Where the theme choice is remembered
    preferences: Box<dyn PreferenceStore>,
    clipboard: SystemClipboard,
    saver: DialogFileSaver,
    /// Status bar notifications
    toasts: ToastQueue,
    toolbar: Toolbar,
    /// Confirmation state for closing with unsaved changes
    exit_guard: ExitGuard,
    /// Track if we should exit (after confirmation)
    should_exit: bool,
    settings: Settings,
    /// Last title sent to the window
    last_title: String,
    /// Last known window size (for detecting changes)
    last_window_size: Option<egui::Vec2>,
    /// Last known window position (for detecting changes)
    last_window_pos: Option<egui::Pos2>,
    /// Application start time for timing toast messages
    start_time: Instant,
}

impl PrevueApp {
    /// Create the application.
    ///
    /// Starts the render thread, warms the render pipeline and applies the
    /// remembered theme.
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings) -> Result<Self> {
        info!("Initializing {}", APP_NAME);

        let preferences: Box<dyn PreferenceStore> = match FilePreferenceStore::open_default() {
            Ok(store) => Box::new(store),
            Err(e) => {
                warn!("Preferences unavailable, theme will not be remembered: {}", e);
                Box::new(MemoryPreferenceStore::new())
            }
        };

        cc.egui_ctx.set_fonts(create_font_definitions());

        let mut theme_manager = ThemeManager::load(preferences.as_ref());
        theme_manager.apply_if_needed(&cc.egui_ctx);

        let renderer = Arc::new(MarkdownRenderer::new());
        let repaint_ctx = cc.egui_ctx.clone();
        let mut worker = RenderWorker::spawn(
            Arc::clone(&renderer),
            settings.render_debounce(),
            move || repaint_ctx.request_repaint(),
        )?;
        // Builds the pipeline off the UI thread before the first keystroke
        worker.render_now(String::new());

        Ok(Self {
            document: DocumentStore::new(),
            renderer,
            worker,
            editor_sync: SyncScroll::new(),
            preview_sync: SyncScroll::new(),
            layout: PaneLayout::default(),
            theme_manager,
            preferences,
            clipboard: SystemClipboard::new(),
            saver: DialogFileSaver::new(),
            toasts: ToastQueue::new(),
            toolbar: Toolbar::new(),
            exit_guard: ExitGuard::new(),
            should_exit: false,
            settings,
            last_title: String::new(),
            last_window_size: None,
            last_window_pos: None,
            start_time: Instant::now(),
        })
    }

    /// Get elapsed time since app start in seconds.
    fn get_app_time(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    /// Get the window title based on current state.
    fn window_title(&self) -> String {
        if self.document.has_unsaved_changes() {
            format!("{}*", APP_NAME)
        } else {
            APP_NAME.to_string()
        }
    }

    /// Update the window title only when it changed.
    fn update_title(&mut self, ctx: &egui::Context) {
        let title = self.window_title();
        if title != self.last_title {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
            self.last_title = title;
        }
    }

    /// Update window size/position tracking for persistence.
    fn update_window_state(&mut self, ctx: &egui::Context) {
        let Some(rect) = ctx.input(|i| i.viewport().outer_rect) else {
            return;
        };
        let current_size = rect.size();
        let current_pos = rect.min;

        let size_changed = self
            .last_window_size
            .map(|s| (s - current_size).length() > 1.0)
            .unwrap_or(true);
        let pos_changed = self
            .last_window_pos
            .map(|p| (p - current_pos).length() > 1.0)
            .unwrap_or(true);
        if !size_changed && !pos_changed {
            return;
        }

        self.last_window_size = Some(current_size);
        self.last_window_pos = Some(current_pos);
        let maximized = ctx.input(|i| i.viewport().maximized.unwrap_or(false));
        self.settings.window_size = WindowSize {
            width: current_size.x,
            height: current_size.y,
            x: Some(current_pos.x),
            y: Some(current_pos.y),
            maximized,
        };
    }

    /// Handle close request from the window.
    ///
    /// Returns `true` if the application should close.
    fn handle_close_request(&mut self) -> bool {
        self.should_exit || self.exit_guard.request_exit(&self.document)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────────

    /// Store finished renders. A failed render keeps the previous preview.
    fn receive_renders(&mut self) {
        let Some(output) = self.worker.poll() else {
            return;
        };
        match output.result {
            Ok(markup) => {
                debug!(
                    "Render #{} ready ({} bytes), pipeline builds: {}",
                    output.generation,
                    markup.len(),
                    self.renderer.builds()
                );
                self.document.set_markup(markup);
            }
            Err(e) => self.toasts.show(ToastLevel::Error, e.to_string()),
        }
    }

    /// Submit the pending edit if its quiet period has passed.
    fn pump_renders(&mut self, ctx: &egui::Context, now: Instant) {
        if let Some(remaining) = self.worker.pump(now) {
            ctx.request_repaint_after(remaining);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Scroll Synchronization
    // ─────────────────────────────────────────────────────────────────────────

    /// Forward this frame's scroll events to the opposite pane.
    ///
    /// Both synchronizers settle afterwards, which ends the suppression
    /// window of any programmatic scroll applied during this frame. Nothing
    /// is forwarded while the editor is hidden.
    fn sync_scroll(&mut self, editor_scrolled: bool, preview_scrolled: bool) {
        if self.settings.sync_scroll && self.layout.shows_editor() {
            let (editor, preview) = (&mut self.editor_sync, &mut self.preview_sync);
            if editor_scrolled {
                editor.on_scroll(|fraction| preview.set_scroll_fraction(fraction));
            }
            if preview_scrolled {
                preview.on_scroll(|fraction| editor.set_scroll_fraction(fraction));
            }
        }
        self.editor_sync.settle();
        self.preview_sync.settle();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Toolbar Actions
    // ─────────────────────────────────────────────────────────────────────────

    fn handle_action(&mut self, action: ToolbarAction) {
        debug!("Toolbar action: {:?}", action);
        match action {
            ToolbarAction::Copy => {
                copy_document(&self.document, &mut self.clipboard, &mut self.toasts);
            }
            ToolbarAction::Download => {
                download_document(&mut self.document, &mut self.saver, &mut self.toasts);
            }
            ToolbarAction::Reset => self.handle_reset(),
            ToolbarAction::ToggleTheme => self.handle_toggle_theme(),
            ToolbarAction::ToggleSyncScroll => {
                self.settings.sync_scroll = !self.settings.sync_scroll;
                let state = if self.settings.sync_scroll { "on" } else { "off" };
                self.toasts
                    .show(ToastLevel::Info, format!("Scroll sync {}", state));
            }
            ToolbarAction::ToggleMaximizedPreview => {
                self.layout = self.layout.toggled();
                debug!("Pane layout: {:?}", self.layout);
            }
            ToolbarAction::TogglePreviewFont => {
                self.settings.preview_font = self.settings.preview_font.toggled();
                self.toasts.show(
                    ToastLevel::Info,
                    format!("Preview font: {}", self.settings.preview_font.display_name()),
                );
            }
            ToolbarAction::OpenInBrowser => self.handle_open_in_browser(),
        }
    }

    fn handle_reset(&mut self) {
        self.document.clear();
        self.worker.cancel();
        self.worker.render_now(String::new());
        self.toasts.show(ToastLevel::Info, "Editor cleared");
    }

    fn handle_toggle_theme(&mut self) {
        match self.theme_manager.toggle(self.preferences.as_mut()) {
            Ok(theme) => info!("Theme switched to {:?}", theme),
            Err(e) => self.toasts.show(
                ToastLevel::Warning,
                format!("Theme changed but could not be remembered: {}", e),
            ),
        }
    }

    fn handle_open_in_browser(&mut self) {
        let document = generate_html_document(
            self.document.markup(),
            BROWSER_PREVIEW_TITLE,
            &self.theme_manager.colors(),
            self.settings.preview_font,
        );
        let opened = write_preview_file(&std::env::temp_dir(), &document)
            .and_then(|path| open::that(&path).map_err(Into::into));
        if let Err(e) = opened {
            self.toasts
                .show(ToastLevel::Error, format!("Failed to open browser: {}", e));
        }
    }

    /// Handle keyboard shortcuts.
    fn handle_keyboard_shortcuts(&mut self, ctx: &egui::Context) {
        let save = ctx.input_mut(|i| i.consume_key(egui::Modifiers::COMMAND, egui::Key::S));
        if save {
            self.handle_action(ToolbarAction::Download);
        }

        if self.layout.is_preview_maximized()
            && !self.exit_guard.is_confirming()
            && ctx.input_mut(|i| i.consume_key(egui::Modifiers::NONE, egui::Key::Escape))
        {
            self.handle_action(ToolbarAction::ToggleMaximizedPreview);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // UI
    // ─────────────────────────────────────────────────────────────────────────

    /// Render the main UI.
    ///
    /// Returns the toolbar action of this frame, whether the markdown was
    /// edited, and which panes scrolled.
    fn render_ui(&mut self, ctx: &egui::Context) -> FrameEvents {
        let mut events = FrameEvents::default();
        let colors = self.theme_manager.colors();

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            let state = ToolbarState {
                theme: self.theme_manager.current_theme(),
                has_content: !self.document.markdown().is_empty(),
                has_markup: self.document.has_markup(),
                sync_scroll: self.settings.sync_scroll,
                preview_maximized: self.layout.is_preview_maximized(),
                preview_font: self.settings.preview_font,
            };
            events.action = self.toolbar.show(ui, &colors, state);
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if self.worker.has_pending() {
                    ui.label(egui::RichText::new("Rendering…").color(colors.muted));
                } else if self.document.has_unsaved_changes() {
                    ui.label(egui::RichText::new("Unsaved").color(colors.muted));
                }

                // Center: Toast message (temporary notifications)
                if let Some(toast) = self.toasts.current_text(&colors) {
                    ui.with_layout(
                        egui::Layout::centered_and_justified(egui::Direction::LeftToRight),
                        |ui| {
                            ui.label(toast);
                        },
                    );
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let text = self.document.markdown();
                    ui.label(format!(
                        "{} words, {} chars",
                        text.split_whitespace().count(),
                        text.chars().count()
                    ));
                });
            });
        });

        if self.layout.shows_editor() {
            let screen_width = ctx.screen_rect().width();
            let editor_panel = egui::SidePanel::left("editor_panel")
                .resizable(true)
                .default_width(screen_width * self.settings.split_ratio)
                .width_range(
                    screen_width * Settings::MIN_SPLIT_RATIO
                        ..=screen_width * Settings::MAX_SPLIT_RATIO,
                )
                .show(ctx, |ui| self.show_editor(ui));
            (events.edited, events.editor_scrolled) = editor_panel.inner;
            if screen_width > 0.0 {
                self.settings.split_ratio = (editor_panel.response.rect.width() / screen_width)
                    .clamp(Settings::MIN_SPLIT_RATIO, Settings::MAX_SPLIT_RATIO);
            }
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            events.preview_scrolled = self.show_preview(ui);
        });

        events
    }

    /// Draw the editor. Returns `(edited, scrolled)`.
    fn show_editor(&mut self, ui: &mut egui::Ui) -> (bool, bool) {
        if self.editor_sync.target().is_none() {
            self.editor_sync
                .mount(ScrollPane::new(self.settings.min_scroll_delta));
        }
        let requested = self
            .editor_sync
            .target_mut()
            .and_then(ScrollPane::take_requested_offset);

        let mut area = egui::ScrollArea::vertical()
            .id_source("editor_scroll")
            .auto_shrink([false, false]);
        if let Some(offset) = requested {
            area = area.vertical_scroll_offset(offset);
        }

        let font = egui::FontId::monospace(self.settings.font_size);
        let document = &mut self.document;
        let output = area.show(ui, |ui| {
            let editor = egui::TextEdit::multiline(document.markdown_mut())
                .hint_text("Write some Markdown")
                .font(font)
                .frame(false)
                .desired_width(f32::INFINITY)
                .desired_rows(40);
            ui.add(editor).changed()
        });

        let edited = output.inner;
        if edited {
            self.document.touch();
        }
        let scrolled = self
            .editor_sync
            .target_mut()
            .is_some_and(|pane| pane.observe_output(&output));
        (edited, scrolled)
    }

    /// Draw the rendered markup. Returns whether the pane scrolled.
    fn show_preview(&mut self, ui: &mut egui::Ui) -> bool {
        if self.preview_sync.target().is_none() {
            self.preview_sync
                .mount(ScrollPane::new(self.settings.min_scroll_delta));
        }
        let requested = self
            .preview_sync
            .target_mut()
            .and_then(ScrollPane::take_requested_offset);

        let mut area = egui::ScrollArea::vertical()
            .id_source("preview_scroll")
            .auto_shrink([false, false]);
        if let Some(offset) = requested {
            area = area.vertical_scroll_offset(offset);
        }

        let font = preview_font_id(self.settings.font_size, self.settings.preview_font);
        let document = &self.document;
        let output = area.show(ui, |ui| {
            let mut markup = document.markup();
            ui.add(
                egui::TextEdit::multiline(&mut markup)
                    .hint_text("The rendered HTML appears here")
                    .font(font)
                    .frame(false)
                    .desired_width(f32::INFINITY),
            );
        });

        self.preview_sync
            .target_mut()
            .is_some_and(|pane| pane.observe_output(&output))
    }

    /// Render the unsaved-changes dialog.
    fn render_dialogs(&mut self, ctx: &egui::Context) {
        if !self.exit_guard.is_confirming() {
            return;
        }
        egui::Window::new("Unsaved Changes")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("You have unsaved changes. Exit anyway?");
                ui.separator();
                ui.horizontal(|ui| {
                    // "Download" button - save then exit
                    if ui.button("Download").clicked() {
                        download_document(&mut self.document, &mut self.saver, &mut self.toasts);
                        if !self.document.has_unsaved_changes() {
                            self.exit_guard.confirm();
                            self.should_exit = true;
                        }
                    }

                    // "Discard" button - exit without saving
                    if ui.button("Discard").clicked() {
                        self.exit_guard.confirm();
                        self.should_exit = true;
                    }

                    // "Cancel" button - keep editing
                    if ui.button("Cancel").clicked() {
                        self.exit_guard.cancel();
                    }
                });
            });
    }
}

/// What happened while drawing one frame.
#[derive(Debug, Default)]
struct FrameEvents {
    action: Option<ToolbarAction>,
    edited: bool,
    editor_scrolled: bool,
    preview_scrolled: bool,
}

impl eframe::App for PrevueApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        // Apply theme if it changed
        self.theme_manager.apply_if_needed(ctx);

        self.receive_renders();

        let time = self.get_app_time();
        if let Some(remaining) = self.toasts.update(time) {
            ctx.request_repaint_after(Duration::from_secs_f64(remaining));
        }

        self.update_title(ctx);
        self.update_window_state(ctx);

        // Handle close request from window
        if ctx.input(|i| i.viewport().close_requested()) && !self.handle_close_request() {
            // Cancel the close request - we need to show a confirmation dialog
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
        }

        self.handle_keyboard_shortcuts(ctx);

        let events = self.render_ui(ctx);
        if events.edited {
            self.worker.schedule(self.document.markdown(), now);
        }
        if let Some(action) = events.action {
            self.handle_action(action);
        }

        self.sync_scroll(events.editor_scrolled, events.preview_scrolled);
        self.pump_renders(ctx, now);
        self.render_dialogs(ctx);

        // Request exit if confirmed
        if self.should_exit {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }

    /// Called when the application is about to close.
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Application exiting");
        save_config_silent(&self.settings);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Action Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Copy the markdown source and report the outcome.
fn copy_document(
    document: &DocumentStore,
    clipboard: &mut dyn ClipboardWriter,
    notifier: &mut dyn Notifier,
) {
    match document.copy_to_clipboard(clipboard) {
        Ok(()) => notifier.notify(ToastLevel::Success, "Copied to clipboard".to_string()),
        Err(e) => notifier.notify(ToastLevel::Error, format!("Failed to copy: {}", e)),
    }
}

/// Save the markdown source and report the outcome.
fn download_document(
    document: &mut DocumentStore,
    saver: &mut dyn FileSaver,
    notifier: &mut dyn Notifier,
) {
    match document.download(saver) {
        Ok(SaveOutcome::Saved(path)) => {
            notifier.notify(ToastLevel::Success, format!("Saved: {}", path.display()))
        }
        Ok(SaveOutcome::Empty) => notifier.notify(
            ToastLevel::Warning,
            "Nothing to download, the editor is empty".to_string(),
        ),
        Ok(SaveOutcome::Cancelled) => debug!("Download cancelled"),
        Err(e) => notifier.notify(ToastLevel::Error, format!("Failed to save: {}", e)),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
