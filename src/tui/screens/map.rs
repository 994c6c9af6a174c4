//! Map screen: the target on a world map, its resolved name and the
//! save-as-favorite dialog

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Line as CanvasLine, Map, MapResolution},
        Block, Borders, Clear, Paragraph,
    },
    Frame,
};
use std::time::{Duration, Instant};

use crate::geocoding::LOADING_LABEL;
use crate::map::{CameraAnimation, CameraPosition, ZoomPlan};
use crate::models::{Coordinate, MapMode};
use crate::tui::{
    components::FormField,
    events::ScreenAction,
    ui::{centered_rect, MapPalette, Styles},
};

/// Zoom level from which the detailed coastline is drawn
const HIGH_RESOLUTION_ZOOM: f64 = 3.0;

pub struct MapScreen {
    pub target: Coordinate,
    pub location_name: String,
    pub show_info: bool,
    pub save_dialog: Option<FormField>,
    animation: CameraAnimation,
    started_at: Instant,
}

impl Default for MapScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl MapScreen {
    pub fn new() -> Self {
        let target = Coordinate::default();
        Self {
            target,
            location_name: LOADING_LABEL.to_string(),
            show_info: false,
            save_dialog: None,
            animation: CameraAnimation::new(target, ZoomPlan::default()),
            started_at: Instant::now(),
        }
    }

    /// Reset for a new target and restart the zoom animation
    pub fn open(&mut self, target: Coordinate) {
        self.target = target;
        self.location_name = LOADING_LABEL.to_string();
        self.show_info = false;
        self.save_dialog = None;
        self.animation = CameraAnimation::new(target, ZoomPlan::default());
        self.started_at = Instant::now();
    }

    pub fn set_location_name(&mut self, name: String) {
        self.location_name = name;
    }

    pub fn camera(&self) -> CameraPosition {
        self.animation.camera_at(self.elapsed())
    }

    fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    pub fn open_save_dialog(&mut self) {
        let mut field = FormField::new("Location Name");
        field.set_focus(true);
        self.save_dialog = Some(field);
    }

    pub fn close_save_dialog(&mut self) {
        self.save_dialog = None;
    }

    /// Show a rejection from the favorites store inside the dialog
    pub fn set_save_error(&mut self, message: String) {
        if let Some(field) = self.save_dialog.as_mut() {
            field.validation_error = Some(message);
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> ScreenAction {
        if let Some(field) = self.save_dialog.as_mut() {
            return match key.code {
                KeyCode::Esc => {
                    self.close_save_dialog();
                    ScreenAction::None
                }
                KeyCode::Enter => {
                    if field.is_empty() {
                        ScreenAction::None
                    } else {
                        ScreenAction::SaveFavorite(field.value.clone())
                    }
                }
                KeyCode::Char(c) => {
                    field.insert_char(c);
                    ScreenAction::None
                }
                KeyCode::Backspace => {
                    field.delete_char();
                    ScreenAction::None
                }
                KeyCode::Delete => {
                    field.delete_char_forward();
                    ScreenAction::None
                }
                KeyCode::Left => {
                    field.move_cursor_left();
                    ScreenAction::None
                }
                KeyCode::Right => {
                    field.move_cursor_right();
                    ScreenAction::None
                }
                _ => ScreenAction::None,
            };
        }

        match key.code {
            KeyCode::Esc | KeyCode::Backspace => ScreenAction::GoBack,
            KeyCode::Char('i') => {
                self.show_info = !self.show_info;
                ScreenAction::None
            }
            KeyCode::Char('m') => ScreenAction::SetMapMode(MapMode::Standard),
            KeyCode::Char('s') => ScreenAction::SetMapMode(MapMode::Satellite),
            KeyCode::Char('n') => ScreenAction::SetMapMode(MapMode::Night),
            KeyCode::Char('a') | KeyCode::Char('*') => {
                self.open_save_dialog();
                ScreenAction::None
            }
            _ => ScreenAction::None,
        }
    }

    /// Draw the map screen
    pub fn draw(&self, f: &mut Frame, area: Rect, mode: MapMode) {
        let info_height = if self.show_info { 6 } else { 0 };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),           // Location header
                Constraint::Length(info_height), // Details
                Constraint::Min(0),              // Map
                Constraint::Length(3),           // Controls
            ])
            .split(area);

        let header = Paragraph::new(format!("📍 {}", self.location_name))
            .style(Styles::title())
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(header, chunks[0]);

        if self.show_info {
            self.draw_details(f, chunks[1]);
        }

        self.draw_map(f, chunks[2], mode);
        self.draw_controls(f, chunks[3], mode);

        if let Some(ref field) = self.save_dialog {
            self.draw_save_dialog(f, area, field);
        }
    }

    fn draw_details(&self, f: &mut Frame, area: Rect) {
        let details = vec![
            Line::from(Span::styled("Location Details", Styles::key())),
            Line::from(format!("Latitude: {}", self.target.latitude)),
            Line::from(format!("Longitude: {}", self.target.longitude)),
            Line::from(format!("Address: {}", self.location_name)),
        ];
        let paragraph = Paragraph::new(details).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Styles::inactive_border()),
        );
        f.render_widget(paragraph, area);
    }

    fn draw_map(&self, f: &mut Frame, area: Rect, mode: MapMode) {
        let palette = MapPalette::for_mode(mode);
        let camera = self.camera();
        let (x_bounds, y_bounds) = camera.bounds();
        let resolution = if camera.zoom >= HIGH_RESOLUTION_ZOOM {
            MapResolution::High
        } else {
            MapResolution::Low
        };
        let target = self.target;
        let marker_title = format!(" {}", self.location_name);

        let canvas = Canvas::default()
            .block(
                Block::default()
                    .title(format!("Map - {} (zoom {:.1})", mode.as_str(), camera.zoom))
                    .borders(Borders::ALL),
            )
            .marker(Marker::Braille)
            .background_color(palette.background)
            .x_bounds(x_bounds)
            .y_bounds(y_bounds)
            .paint(move |ctx| {
                ctx.draw(&Map {
                    color: palette.land,
                    resolution,
                });
                ctx.layer();
                ctx.draw(&CanvasLine {
                    x1: x_bounds[0],
                    y1: target.latitude,
                    x2: x_bounds[1],
                    y2: target.latitude,
                    color: palette.grid,
                });
                ctx.draw(&CanvasLine {
                    x1: target.longitude,
                    y1: y_bounds[0],
                    x2: target.longitude,
                    y2: y_bounds[1],
                    color: palette.grid,
                });
                ctx.print(
                    target.longitude,
                    target.latitude,
                    Line::from(vec![
                        Span::styled("●", Style::default().fg(palette.marker)),
                        Span::styled(
                            marker_title.clone(),
                            Style::default().fg(palette.marker).add_modifier(Modifier::BOLD),
                        ),
                    ]),
                );
            });

        f.render_widget(canvas, area);
    }

    fn draw_controls(&self, f: &mut Frame, area: Rect, mode: MapMode) {
        let mut spans = vec![
            Span::styled("Esc", Styles::key()),
            Span::raw(" Back   "),
        ];
        for option in MapMode::ALL {
            let style = if option == mode {
                Styles::selected()
            } else {
                Styles::inactive()
            };
            spans.push(Span::styled(format!(" {} ", option.short_label()), style));
            spans.push(Span::raw(" "));
        }
        spans.extend([
            Span::raw("  "),
            Span::styled("a", Styles::key()),
            Span::raw(" ★ Save   "),
            Span::styled("i", Styles::key()),
            Span::raw(" Details"),
        ]);

        let controls = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Styles::inactive_border()),
        );
        f.render_widget(controls, area);
    }

    fn draw_save_dialog(&self, f: &mut Frame, area: Rect, field: &FormField) {
        let popup_area = centered_rect(60, 30, area);
        f.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Save Location")
            .borders(Borders::ALL)
            .border_style(Styles::active_border());
        let inner = block.inner(popup_area);
        f.render_widget(block, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Min(0),
            ])
            .split(inner);

        f.render_widget(Paragraph::new("Enter a name for this location:"), chunks[0]);
        field.render(f, chunks[1]);
        f.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("Enter", Styles::key()),
                Span::raw(" Save   "),
                Span::styled("Esc", Styles::key()),
                Span::raw(" Cancel"),
            ])),
            chunks[2],
        );
    }
}
