//! Toolbar above the editor and preview panes.

use eframe::egui::{self, Color32, Response, RichText, Ui, Vec2};

use crate::config::PreviewFont;
use crate::theme::{Theme, ThemeColors};

/// Height of the toolbar.
const TOOLBAR_HEIGHT: f32 = 36.0;

/// Minimum size of toolbar buttons.
const BUTTON_SIZE: Vec2 = Vec2::new(28.0, 26.0);

/// Actions that can be triggered from the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    /// Copy the markdown source to the clipboard
    Copy,
    /// Save the markdown source to a file
    Download,
    /// Clear the editor and preview
    Reset,
    /// Switch between light and dark
    ToggleTheme,
    /// Toggle scroll synchronization between the panes
    ToggleSyncScroll,
    /// Show the preview over the full window width, or return to the split
    ToggleMaximizedPreview,
    /// Switch the preview between sans and serif
    TogglePreviewFont,
    /// Open the rendered preview in the system browser
    OpenInBrowser,
}

/// What the toolbar needs to know to draw itself.
#[derive(Debug, Clone, Copy)]
pub struct ToolbarState {
    pub theme: Theme,
    pub has_content: bool,
    pub has_markup: bool,
    pub sync_scroll: bool,
    pub preview_maximized: bool,
    pub preview_font: PreviewFont,
}

impl ToolbarState {
    /// Copy, Download and Reset need typed markdown.
    pub fn can_edit_actions(&self) -> bool {
        self.has_content
    }

    /// The browser preview needs a finished render.
    pub fn can_open_in_browser(&self) -> bool {
        self.has_markup
    }
}

/// Stateless toolbar renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Toolbar;

impl Toolbar {
    pub fn new() -> Self {
        Self
    }

    /// Render the toolbar and return any triggered action.
    pub fn show(
        &self,
        ui: &mut Ui,
        colors: &ThemeColors,
        state: ToolbarState,
    ) -> Option<ToolbarAction> {
        let mut action = None;

        ui.horizontal(|ui| {
            ui.set_height(TOOLBAR_HEIGHT);
            ui.spacing_mut().item_spacing.x = 4.0;

            ui.label(RichText::new("PrevueMD").strong().color(colors.heading));
            ui.add_space(8.0);
            vertical_separator(ui, colors.border, TOOLBAR_HEIGHT - 12.0);
            ui.add_space(4.0);

            let editing = state.can_edit_actions();
            if tool_button(ui, "📋 Copy", "Copy markdown", editing).clicked() {
                action = Some(ToolbarAction::Copy);
            }
            if tool_button(ui, "💾 Download", "Save as prevued.md", editing).clicked() {
                action = Some(ToolbarAction::Download);
            }
            if tool_button(ui, "🗑 Reset", "Clear the editor", editing).clicked() {
                action = Some(ToolbarAction::Reset);
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if tool_button(ui, state.theme.toggle_label(), "Toggle theme", true).clicked() {
                    action = Some(ToolbarAction::ToggleTheme);
                }

                let sync_label = if state.sync_scroll {
                    RichText::new("⇅ Sync").color(colors.accent)
                } else {
                    RichText::new("⇅ Sync").color(colors.muted)
                };
                let sync = ui
                    .add(egui::Button::new(sync_label).min_size(BUTTON_SIZE))
                    .on_hover_text("Synchronize editor and preview scrolling");
                if sync.clicked() {
                    action = Some(ToolbarAction::ToggleSyncScroll);
                }

                if tool_button(
                    ui,
                    "🌐 Browser",
                    "Open the preview in your browser",
                    state.can_open_in_browser(),
                )
                .clicked()
                {
                    action = Some(ToolbarAction::OpenInBrowser);
                }

                let (maximize_label, maximize_tooltip) = if state.preview_maximized {
                    ("🗗 Split", "Show the editor again (Esc)")
                } else {
                    ("🗖 Maximize", "Show the preview full width")
                };
                if tool_button(ui, maximize_label, maximize_tooltip, true).clicked() {
                    action = Some(ToolbarAction::ToggleMaximizedPreview);
                }

                let font_label = format!("Aa {}", state.preview_font.display_name());
                if tool_button(ui, &font_label, "Switch the preview font", true).clicked() {
                    action = Some(ToolbarAction::TogglePreviewFont);
                }
            });
        });

        action
    }
}

fn tool_button(ui: &mut Ui, label: &str, tooltip: &str, enabled: bool) -> Response {
    ui.add_enabled(enabled, egui::Button::new(label).min_size(BUTTON_SIZE))
        .on_hover_text(tooltip)
}

fn vertical_separator(ui: &mut Ui, color: Color32, height: f32) {
    let (rect, _response) = ui.allocate_exact_size(Vec2::new(1.0, height), egui::Sense::hover());
    ui.painter().line_segment(
        [rect.center_top(), rect.center_bottom()],
        egui::Stroke::new(1.0, color),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_toolbar(state: ToolbarState) -> Option<ToolbarAction> {
        let ctx = egui::Context::default();
        let mut action = None;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                action = Toolbar::new().show(ui, &ThemeColors::light(), state);
            });
        });
        action
    }

    fn state() -> ToolbarState {
        ToolbarState {
            theme: Theme::Dark,
            has_content: true,
            has_markup: true,
            sync_scroll: true,
            preview_maximized: false,
            preview_font: PreviewFont::Sans,
        }
    }

    #[test]
    fn test_toolbar_idle_frame_has_no_action() {
        assert_eq!(run_toolbar(state()), None);

        let maximized = ToolbarState {
            preview_maximized: true,
            preview_font: PreviewFont::Serif,
            ..state()
        };
        assert_eq!(run_toolbar(maximized), None);
    }

    #[test]
    fn test_empty_document_disables_download() {
        let empty = ToolbarState {
            has_content: false,
            has_markup: false,
            ..state()
        };
        assert!(!empty.can_edit_actions());
        assert!(!empty.can_open_in_browser());

        assert!(state().can_edit_actions());
        assert!(state().can_open_in_browser());
    }
}
