use crate::app::{App, CaptureField, LoginFocus};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Paragraph, Tabs, Wrap},
};
use registry_core::dashboard::heading;
use registry_core::{
    CaptureScreen, DashboardScreen, DashboardTab, HistoryStatus, LoginScreen, Role, Session,
    Severity, SubmissionStatus, View,
};

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Screen
            Constraint::Length(3), // Footer
        ])
        .split(f.area());

    let hints = match app.coordinator.view() {
        View::LoggedOut(login) => {
            draw_login(f, app, login, chunks[0]);
            if login.otp_sent() {
                " [ENTER] Verify | [ESC] Back to Phone Number "
            } else {
                " [UP/DOWN] Role | [TAB] Phone | [ENTER] Select / Send OTP | [ESC] Quit "
            }
        }
        View::Dashboard(signed) => {
            draw_dashboard(f, &signed.session, &signed.dashboard, chunks[0]);
            " [TAB] Overview/History | [C] New Capture | [L] Logout | [Q] Quit | [F2] Network "
        }
        View::Capturing(_, capture) => {
            draw_capture(f, app, capture, chunks[0]);
            if capture.status().is_terminal() {
                " [N] Submit Another Entry | [B] Return to Dashboard | [F2] Network "
            } else {
                " [TAB] Next Field | [ENTER] Activate | [ESC] Back to Dashboard | [F2] Network "
            }
        }
    };

    draw_footer(f, app, hints, chunks[1]);

    if let Some(input) = &app.photo_prompt {
        draw_photo_prompt(f, input);
    }
    if let Some(toast) = &app.toast {
        draw_toast(f, &toast.notice.title, &toast.notice.description, toast.notice.severity);
    }
}

fn draw_footer(f: &mut Frame, app: &App, hints: &str, area: Rect) {
    let (text, style) = match &app.last_error {
        Some(err) => (format!(" {} ", err), Style::default().fg(Color::Red)),
        None => (hints.to_string(), Style::default().fg(Color::DarkGray)),
    };
    f.render_widget(
        Paragraph::new(text)
            .style(style)
            .block(Block::default().borders(Borders::ALL)),
        area,
    );
}

fn draw_login(f: &mut Frame, app: &App, login: &LoginScreen, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    let hero = Paragraph::new(vec![
        Line::from(Span::styled(
            "Blue Carbon Registry",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from("Restoring Our Coastal Ecosystems"),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(hero, chunks[0]);

    let card = centered_rect(60, 90, chunks[1]);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Welcome Back ")
        .title_alignment(Alignment::Center);
    let inner = block.inner(card);
    f.render_widget(block, card);

    if login.otp_sent() {
        draw_otp_entry(f, login, inner);
    } else {
        draw_role_and_phone(f, app, login, inner);
    }
}

fn draw_role_and_phone(f: &mut Frame, app: &App, login: &LoginScreen, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(Role::ALL.len() as u16 * 2 + 2),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    let roles_focused = app.login_ui.focus == LoginFocus::Roles;
    let items: Vec<ListItem> = Role::ALL
        .iter()
        .enumerate()
        .map(|(i, role)| {
            let selected = login.role() == Some(*role);
            let cursor = if roles_focused && i == app.login_ui.cursor {
                ">"
            } else {
                " "
            };
            let badge = if selected { "  [Selected]" } else { "" };
            let style = if selected {
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(vec![
                Line::from(format!("{} {}{}", cursor, role.title(), badge)),
                Line::from(Span::styled(
                    format!("    {}", role.description()),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
            .style(style)
        })
        .collect();
    f.render_widget(
        List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Select Your Role ")
                .border_style(focus_style(roles_focused)),
        ),
        chunks[0],
    );

    let phone_focused = app.login_ui.focus == LoginFocus::Phone;
    let phone = if login.phone().is_empty() && !phone_focused {
        Span::styled("+91 98765 43210", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(login.phone().to_string())
    };
    f.render_widget(
        Paragraph::new(Line::from(phone)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Phone Number ")
                .border_style(focus_style(phone_focused)),
        ),
        chunks[1],
    );

    f.render_widget(button("Send OTP ->", login.can_send_otp()), chunks[2]);
}

fn draw_otp_entry(f: &mut Frame, login: &LoginScreen, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    f.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled(
                "Verify OTP",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from("Enter the 6-digit code sent to"),
            Line::from(Span::styled(
                login.phone().to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
        ])
        .alignment(Alignment::Center),
        chunks[0],
    );

    let otp = if login.otp().is_empty() {
        Span::styled("Enter 6-digit OTP", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(login.otp().chars().map(|c| format!("{} ", c)).collect::<String>())
    };
    f.render_widget(
        Paragraph::new(Line::from(otp))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(focus_style(true)),
            ),
        chunks[1],
    );

    f.render_widget(button("Verify & Continue", login.can_verify()), chunks[2]);
}

fn draw_dashboard(f: &mut Frame, session: &Session, dash: &DashboardScreen, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Header
            Constraint::Length(3), // Tabs
            Constraint::Min(0),    // Content
        ])
        .split(area);

    f.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled(
                heading(session),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                session.phone.clone(),
                Style::default().fg(Color::Gray),
            )),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Cyan)),
        ),
        chunks[0],
    );

    let selected = match dash.tab {
        DashboardTab::Overview => 0,
        DashboardTab::History => 1,
    };
    f.render_widget(
        Tabs::new(vec!["Overview", "History"])
            .select(selected)
            .block(Block::default().borders(Borders::ALL))
            .highlight_style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
        chunks[1],
    );

    match dash.tab {
        DashboardTab::Overview => draw_overview(f, dash, chunks[2]),
        DashboardTab::History => draw_history(f, dash, chunks[2]),
    }
}

fn draw_overview(f: &mut Frame, dash: &DashboardScreen, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Stats
            Constraint::Length(4), // Data capture
            Constraint::Min(5),    // Recent submissions
            Constraint::Length(4), // Monthly progress
        ])
        .split(area);

    let stats = dash.stats();
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25); 4])
        .split(chunks[0]);
    let figures = [
        (thousands(stats.total_planted), "Trees Planted", Color::Green),
        (thousands(stats.approved), "Approved", Color::Blue),
        (thousands(stats.pending), "Pending", Color::Yellow),
        (format!("{}t", stats.carbon_offset_tons), "CO₂ Offset", Color::Cyan),
    ];
    for ((value, label, color), cell) in figures.into_iter().zip(cells.iter()) {
        f.render_widget(
            Paragraph::new(vec![
                Line::from(Span::styled(
                    value,
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(label, Style::default().fg(Color::DarkGray))),
            ])
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
            *cell,
        );
    }

    f.render_widget(
        Paragraph::new(vec![
            Line::from("Capture and submit new restoration data"),
            Line::from(Span::styled(
                "[ Start New Capture ]",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Data Capture "),
        ),
        chunks[1],
    );

    let items: Vec<ListItem> = dash
        .recent_submissions()
        .iter()
        .map(|s| {
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(
                        s.location.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    status_badge(s.status),
                ]),
                Line::from(format!("  {} • {} plants", s.species, s.count)),
                Line::from(Span::styled(
                    format!("  {}  {}", s.date, s.coordinates),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
        })
        .collect();
    f.render_widget(
        List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Recent Submissions "),
        ),
        chunks[2],
    );

    let progress = dash.progress();
    f.render_widget(
        Gauge::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(
                        " Monthly Progress (Target: {} plants) ",
                        progress.target_plants
                    )),
            )
            .gauge_style(Style::default().fg(Color::Green))
            .percent(u16::from(progress.percent)),
        chunks[3],
    );
}

fn draw_history(f: &mut Frame, dash: &DashboardScreen, area: Rect) {
    let items: Vec<ListItem> = dash
        .history()
        .iter()
        .map(|entry| {
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(
                        entry.plant_name.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    status_badge(entry.status),
                ]),
                Line::from(format!("  {}", entry.location)),
                Line::from(Span::styled(
                    format!("  {}", entry.timestamp),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
        })
        .collect();
    f.render_widget(
        List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Capture History "),
        ),
        area,
    );
}

fn draw_capture(f: &mut Frame, app: &App, capture: &CaptureScreen, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let (badge, badge_color) = if app.is_online() {
        ("Online", Color::Green)
    } else {
        ("Offline", Color::Red)
    };
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::raw("<- Back to Dashboard"),
            Span::raw("    "),
            Span::styled(
                format!("[{}]", badge),
                Style::default().fg(badge_color).add_modifier(Modifier::BOLD),
            ),
        ]))
        .block(Block::default().borders(Borders::ALL)),
        chunks[0],
    );

    match capture.status() {
        SubmissionStatus::Submitted | SubmissionStatus::Queued => {
            draw_capture_result(f, capture.status(), chunks[1])
        }
        SubmissionStatus::Idle | SubmissionStatus::Uploading => {
            draw_capture_form(f, app, capture, chunks[1])
        }
    }
}

fn draw_capture_result(f: &mut Frame, status: SubmissionStatus, area: Rect) {
    let (title, body, color) = if status == SubmissionStatus::Submitted {
        (
            "Submission Complete!",
            "Your restoration data has been submitted and will be reviewed within 24-48 hours.",
            Color::Green,
        )
    } else {
        (
            "Queued for Upload",
            concat!(
                "Your data is safely stored locally and will upload automatically ",
                "when you're back online."
            ),
            Color::Blue,
        )
    };
    let card = centered_rect(60, 60, area);
    f.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled(
                title,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(body),
            Line::from(""),
            Line::from("[ N ] Submit Another Entry"),
            Line::from("[ B ] Return to Dashboard"),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL)),
        card,
    );
}

fn draw_capture_form(f: &mut Frame, app: &App, capture: &CaptureScreen, area: Rect) {
    let draft = capture.draft();
    let uploading = capture.status() == SubmissionStatus::Uploading;

    let placeholder =
        |text: &str| Span::styled(text.to_string(), Style::default().fg(Color::DarkGray));
    let value = |text: &str, hint: &str| {
        if text.is_empty() {
            placeholder(hint)
        } else {
            Span::raw(text.to_string())
        }
    };

    let rows: Vec<(CaptureField, &str, Span)> = vec![
        (
            CaptureField::Photo,
            "Plant Photo *",
            match &draft.photo {
                Some(photo) => Span::styled(
                    format!("{}  [GPS Tagged]", photo.file_name),
                    Style::default().fg(Color::Green),
                ),
                None => placeholder("Press ENTER to capture photo (GPS will be auto-captured)"),
            },
        ),
        (
            CaptureField::Contributor,
            "Contributor Name *",
            value(&draft.contributor_name, "Enter your full name"),
        ),
        (
            CaptureField::Species,
            "Plant Species *",
            match draft.species {
                Some(s) => Span::raw(format!("< {} >", s.label())),
                None => placeholder("< Select plant species >"),
            },
        ),
        (
            CaptureField::Count,
            "Number of Plants *",
            value(&draft.plant_count, "e.g. 25"),
        ),
        (
            CaptureField::Location,
            "Location Name",
            value(&draft.location_name, "e.g. Mangrove Area A1"),
        ),
        (
            CaptureField::Coordinates,
            "GPS Coordinates",
            match draft.coordinates {
                Some(c) => Span::raw(c.to_string()),
                None => placeholder("Will be auto-captured"),
            },
        ),
        (
            CaptureField::Notes,
            "Additional Notes",
            value(&draft.notes, "Soil, weather, growth conditions..."),
        ),
    ];

    let items: Vec<ListItem> = rows
        .into_iter()
        .map(|(field, label, content)| {
            let focused = !uploading && app.capture_focus == field;
            let marker = if focused { "> " } else { "  " };
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{}{:<20}", marker, label),
                    focus_style(focused).add_modifier(Modifier::BOLD),
                ),
                content,
            ]))
        })
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    f.render_widget(
        List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Restoration Data Capture "),
        ),
        chunks[0],
    );

    let label = if uploading {
        "Submitting Data..."
    } else {
        "Submit Restoration Data"
    };
    let submit_focused = !uploading && app.capture_focus == CaptureField::Submit;
    f.render_widget(
        Paragraph::new(label)
            .alignment(Alignment::Center)
            .style(if uploading {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::SLOW_BLINK)
            } else {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(focus_style(submit_focused)),
            ),
        chunks[1],
    );
}

fn draw_photo_prompt(f: &mut Frame, input: &str) {
    let area = centered_rect(60, 20, f.area());
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(vec![
            Line::from(format!("> {}", input)),
            Line::from(Span::styled(
                "[ENTER] Load | [ESC] Cancel",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Photo file path ")
                .border_style(Style::default().fg(Color::Yellow)),
        ),
        area,
    );
}

fn draw_toast(f: &mut Frame, title: &str, description: &str, severity: Severity) {
    let full = f.area();
    let width = full.width.min(50);
    let area = Rect::new(full.x + full.width - width, full.y, width, 4u16.min(full.height));
    let color = match severity {
        Severity::Info => Color::Green,
        Severity::Destructive => Color::Red,
    };
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled(
                title.to_string(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(description.to_string()),
        ])
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        ),
        area,
    );
}

fn status_badge(status: HistoryStatus) -> Span<'static> {
    let color = match status {
        HistoryStatus::Approved => Color::Green,
        HistoryStatus::Review => Color::Blue,
        HistoryStatus::Pending => Color::DarkGray,
    };
    Span::styled(format!("[{}]", status.as_str()), Style::default().fg(color))
}

fn button(label: &str, enabled: bool) -> Paragraph<'_> {
    let style = if enabled {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Paragraph::new(label)
        .alignment(Alignment::Center)
        .style(style)
        .block(Block::default().borders(Borders::ALL))
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

/// 2847 -> "2,847".
pub fn thousands(n: u32) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
