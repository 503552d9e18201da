//! Paints a [`RenderFrame`] into the terminal with ratatui.

use magic7ball::assets::{ShowAssets, TextArt};
use magic7ball::hardware::LampDevice;
use magic7ball::show::{RenderFrame, StateKind, TextLayer};
use magic7ball::text_layout::{truncate_to_width, wrap_to_width};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span, Text},
    widgets::{
        canvas::{Canvas, Line as CanvasLine},
        Block, Paragraph,
    },
    Frame,
};

use crate::theme::{scale_alpha, Palette};

/// Share of the screen width the answer text may use.
const OUTCOME_WIDTH_RATIO: f32 = 0.86;
/// The emblem stays dim behind an answer so the text reads cleanly.
const RESULT_EMBLEM_FACTOR: f64 = 0.35;

/// Lamp rendered as a dot in the corner of the screen.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LampIndicator {
    enabled: bool,
    level: f32,
}

impl LampIndicator {
    pub(crate) fn new(enabled: bool) -> Self {
        Self {
            enabled,
            level: 0.0,
        }
    }

    pub(crate) fn level(&self) -> f32 {
        self.level
    }
}

impl LampDevice for LampIndicator {
    fn is_available(&self) -> bool {
        self.enabled
    }

    fn set_level(&mut self, level: f32) {
        self.level = level.clamp(0.0, 1.0);
    }
}

/// Everything `draw` needs besides the frame itself.
pub(crate) struct ScreenView<'a> {
    pub frame: &'a RenderFrame,
    pub palette: &'a Palette,
    pub assets: &'a ShowAssets,
    /// Session seconds, for the emblem's pulse and wobble.
    pub t: f64,
    pub lamp_level: Option<f32>,
    pub hud: Option<&'a [String]>,
}

pub(crate) fn draw(f: &mut Frame<'_>, view: &ScreenView<'_>) {
    let area = f.size();
    let palette = view.palette;
    f.render_widget(
        Block::default().style(Style::default().bg(palette.background())),
        area,
    );
    if area.width < 8 || area.height < 6 {
        return;
    }

    let frame = view.frame;
    let emblem_alpha = match frame.state {
        StateKind::FadeInPrompt | StateKind::Prompt => frame.identity_alpha,
        StateKind::FadeInThinking | StateKind::Thinking => frame.screen_alpha,
        StateKind::Result | StateKind::FadeOut => {
            scale_alpha(frame.screen_alpha, RESULT_EMBLEM_FACTOR)
        }
    };
    let emblem_area = emblem_rect(area);
    if emblem_alpha > 0 {
        let icon = view
            .assets
            .icon
            .as_ref()
            .filter(|_| frame.state.is_prompt_family());
        draw_emblem(f, emblem_area, view, emblem_alpha);
        if let Some(icon) = icon {
            draw_art(f, emblem_area, icon, palette, palette.text, emblem_alpha);
        }
    }
    if frame.logo_alpha > 0 {
        if let Some(logo) = view.assets.logo.as_ref() {
            draw_art(f, area, logo, palette, palette.text, frame.logo_alpha);
        }
    }

    let bottom = area.y + area.height;
    if let Some(title) = &frame.title {
        draw_line(f, row(area, area.y + 1), title, palette, palette.text, true);
    }
    if let Some(prompt) = &frame.prompt {
        draw_line(f, row(area, area.y + 3), prompt, palette, palette.accent, false);
    }
    if let Some(subtitle) = visible_subtitle(frame) {
        draw_line(f, row(area, bottom - 3), subtitle, palette, palette.text, false);
    }
    if let Some(outcome) = &frame.outcome {
        draw_outcome(f, area, outcome, palette);
    }
    if let (Some(number), Some(outcome)) = (frame.answer_number, &frame.outcome) {
        let label = TextLayer::new(format!("Answer #{number}"), outcome.alpha);
        draw_line(f, row(area, area.y + 1), &label, palette, palette.dim, false);
    }
    if let Some(footer) = &frame.footer {
        draw_line(f, row(area, bottom - 2), footer, palette, palette.dim, false);
    }

    if let Some(level) = view.lamp_level {
        draw_lamp(f, area, level, palette);
    }
    if let Some(lines) = view.hud {
        draw_hud(f, area, lines, palette);
    }
}

fn row(area: Rect, y: u16) -> Rect {
    Rect::new(area.x, y.min(area.y + area.height - 1), area.width, 1)
}

/// Square-ish box in the middle of the screen; cells are about twice as tall as wide.
fn emblem_rect(area: Rect) -> Rect {
    let height = (area.height / 2).max(4);
    let width = (height * 2).min(area.width);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// During a subtitle cross-fade only one line fits, so show whichever is stronger.
fn visible_subtitle(frame: &RenderFrame) -> Option<&TextLayer> {
    match (&frame.subtitle, &frame.incoming_subtitle) {
        (Some(current), Some(incoming)) if incoming.alpha > current.alpha => Some(incoming),
        (Some(current), _) => Some(current),
        (None, incoming) => incoming.as_ref(),
    }
}

fn draw_line(
    f: &mut Frame<'_>,
    area: Rect,
    layer: &TextLayer,
    palette: &Palette,
    colour: [u8; 3],
    bold: bool,
) {
    if !layer.is_visible() {
        return;
    }
    let text = truncate_to_width(&layer.text, usize::from(area.width));
    let mut style = Style::default()
        .fg(palette.fade(colour, layer.alpha))
        .bg(palette.background());
    if bold {
        style = style.add_modifier(Modifier::BOLD);
    }
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(text.to_string(), style)))
            .alignment(Alignment::Center),
        area,
    );
}

fn draw_outcome(f: &mut Frame<'_>, area: Rect, outcome: &TextLayer, palette: &Palette) {
    if !outcome.is_visible() {
        return;
    }
    let max_width = ((f32::from(area.width) * OUTCOME_WIDTH_RATIO) as usize).max(1);
    let lines = wrap_to_width(&outcome.text, max_width);
    let height = (lines.len() as u16).min(area.height.saturating_sub(4)).max(1);
    let style = Style::default()
        .fg(palette.fade(palette.text, outcome.alpha))
        .bg(palette.background())
        .add_modifier(Modifier::BOLD);
    let text = Text::from(
        lines
            .into_iter()
            .map(|line| Line::from(Span::styled(line, style)))
            .collect::<Vec<_>>(),
    );
    let target = Rect::new(
        area.x,
        area.y + (area.height - height) / 2,
        area.width,
        height,
    );
    f.render_widget(Paragraph::new(text).alignment(Alignment::Center), target);
}

fn draw_art(
    f: &mut Frame<'_>,
    area: Rect,
    art: &TextArt,
    palette: &Palette,
    colour: [u8; 3],
    alpha: u8,
) {
    let height = (art.height() as u16).min(area.height);
    let style = Style::default()
        .fg(palette.fade(colour, alpha))
        .bg(palette.background());
    let width = usize::from(area.width);
    let lines: Vec<Line> = art
        .lines()
        .iter()
        .take(usize::from(height))
        .map(|line| {
            // Pad to the art's width so centring keeps columns aligned.
            let padded = format!("{line:<w$}", w = art.width());
            Line::from(Span::styled(truncate_to_width(&padded, width).to_string(), style))
        })
        .collect();
    let target = Rect::new(
        area.x,
        area.y + (area.height - height) / 2,
        area.width,
        height,
    );
    f.render_widget(
        Paragraph::new(Text::from(lines)).alignment(Alignment::Center),
        target,
    );
}

fn square(angle: f64, half: f64) -> [(f64, f64); 4] {
    let (sin, cos) = angle.sin_cos();
    let rotate = |x: f64, y: f64| (x * cos - y * sin, x * sin + y * cos);
    [
        rotate(-half, -half),
        rotate(half, -half),
        rotate(half, half),
        rotate(-half, half),
    ]
}

/// Rotating outer square with a counter-rotating inner square. Motion intensity
/// drives the pulse and wobble so the emblem calms down as it settles.
fn draw_emblem(f: &mut Frame<'_>, area: Rect, view: &ScreenView<'_>, alpha: u8) {
    let palette = view.palette;
    let motion = view.frame.motion;
    let energy = if view.frame.state.is_thinking_family() {
        motion.intensity
    } else {
        motion.intensity * 0.3
    };
    let pulse = 0.5 + 0.5 * (view.t * 7.0).sin();
    let wobble = 0.08 * (view.t * 9.0).sin() * energy;
    let outer = square(motion.angle, 0.62);
    let inner = square(-motion.angle * 1.3, 0.62 * (0.55 + wobble));
    let outer_colour = palette.fade(palette.accent, alpha);
    let shade = (0.55 + 0.45 * pulse * energy).clamp(0.0, 1.0);
    let inner_colour = palette.fade(palette.text, scale_alpha(alpha, shade));

    let canvas = Canvas::default()
        .background_color(palette.background())
        .marker(Marker::Braille)
        .x_bounds([-1.0, 1.0])
        .y_bounds([-1.0, 1.0])
        .paint(move |ctx| {
            for (points, colour) in [(outer, outer_colour), (inner, inner_colour)] {
                for i in 0..points.len() {
                    let (x1, y1) = points[i];
                    let (x2, y2) = points[(i + 1) % points.len()];
                    ctx.draw(&CanvasLine {
                        x1,
                        y1,
                        x2,
                        y2,
                        color: colour,
                    });
                }
            }
        });
    f.render_widget(canvas, area);
}

fn draw_lamp(f: &mut Frame<'_>, area: Rect, level: f32, palette: &Palette) {
    let alpha = (level.clamp(0.0, 1.0) * 255.0).round() as u8;
    let style = Style::default()
        .fg(palette.fade(palette.accent, alpha.max(24)))
        .bg(palette.background());
    let target = Rect::new(area.x + area.width - 4, area.y + area.height - 2, 3, 1);
    f.render_widget(Paragraph::new(Span::styled(" ● ", style)), target);
}

fn draw_hud(f: &mut Frame<'_>, area: Rect, lines: &[String], palette: &Palette) {
    let height = (lines.len() as u16).min(area.height);
    let style = Style::default().fg(palette.fade(palette.dim, 200));
    let text = Text::from(
        lines
            .iter()
            .take(usize::from(height))
            .map(|line| Line::from(Span::styled(line.clone(), style)))
            .collect::<Vec<_>>(),
    );
    let width = area.width.min(48);
    let target = Rect::new(area.x + 1, area.y + area.height - height, width, height);
    f.render_widget(Paragraph::new(text), target);
}

#[cfg(test)]
mod tests {
    use super::*;
    use magic7ball::hardware::LampMode;
    use magic7ball::show::MotionSample;
    use ratatui::{backend::TestBackend, Terminal};

    fn frame(state: StateKind) -> RenderFrame {
        RenderFrame {
            state,
            motion: MotionSample {
                angle: 0.3,
                intensity: 1.0,
            },
            screen_alpha: 255,
            identity_alpha: 255,
            logo_alpha: 0,
            idle_phase: None,
            title: None,
            prompt: None,
            subtitle: None,
            incoming_subtitle: None,
            outcome: None,
            footer: None,
            answer_number: None,
            lamp: LampMode::Idle,
        }
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer.get(x, y).symbol());
            }
            out.push('\n');
        }
        out
    }

    fn render(frame: &RenderFrame) -> String {
        let palette = Palette::from_config(&magic7ball::config::ThemeConfig {
            background: [5, 5, 8],
            text: [240, 240, 240],
            accent: [90, 95, 140],
        });
        let assets = ShowAssets::default();
        let view = ScreenView {
            frame,
            palette: &palette,
            assets: &assets,
            t: 1.0,
            lamp_level: Some(0.5),
            hud: None,
        };
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        terminal.draw(|f| draw(f, &view)).unwrap();
        buffer_text(&terminal)
    }

    #[test]
    fn result_screen_shows_answer_and_number() {
        let mut result = frame(StateKind::Result);
        result.outcome = Some(TextLayer::new("Signs point to yes", 255));
        result.answer_number = Some(3);
        result.footer = Some(TextLayer::new("Press button", 255));
        let text = render(&result);
        assert!(text.contains("Signs point to yes"));
        assert!(text.contains("Answer #3"));
        assert!(text.contains("Press button"));
        assert!(text.contains('●'));
    }

    #[test]
    fn transparent_text_is_not_drawn() {
        let mut prompt = frame(StateKind::Prompt);
        prompt.title = Some(TextLayer::new("MAGIC 7-BALL", 0));
        assert!(!render(&prompt).contains("MAGIC"));
        prompt.title = Some(TextLayer::new("MAGIC 7-BALL", 255));
        assert!(render(&prompt).contains("MAGIC 7-BALL"));
    }

    #[test]
    fn stronger_subtitle_wins_during_cross_fade() {
        let mut prompt = frame(StateKind::Prompt);
        prompt.subtitle = Some(TextLayer::new("Old line", 40));
        prompt.incoming_subtitle = Some(TextLayer::new("New line", 200));
        assert_eq!(visible_subtitle(&prompt).map(|s| s.text.as_str()), Some("New line"));
        prompt.incoming_subtitle = Some(TextLayer::new("New line", 10));
        assert_eq!(visible_subtitle(&prompt).map(|s| s.text.as_str()), Some("Old line"));
    }

    #[test]
    fn lamp_indicator_clamps_level() {
        let mut lamp = LampIndicator::new(true);
        lamp.set_level(1.7);
        assert_eq!(lamp.level(), 1.0);
        assert!(lamp.is_available());
        assert!(!LampIndicator::new(false).is_available());
    }
}
