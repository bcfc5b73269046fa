use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{MessageList, TitleBar, chat_block};

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;

const HINTS_AUTHENTICATED: &str = "Enter send | ↑/↓ PgUp/PgDn scroll | Ctrl+End newest | Esc quit";
const HINTS_ANONYMOUS: &str = "↑/↓ PgUp/PgDn scroll | Ctrl+End newest | Esc quit";

/// The four vertical regions of the screen. `input` is zero-height when the
/// session is anonymous.
struct Regions {
    title: Rect,
    chat: Rect,
    input: Rect,
    footer: Rect,
}

fn split(area: Rect, input_height: Option<u16>) -> Regions {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Min(0), Length(input_height.unwrap_or(0)), Length(1)]);
    let [title, chat, input, footer] = layout.areas(area);
    Regions {
        title,
        chat,
        input,
        footer,
    }
}

/// Inner area of the chat pane for a terminal of `area`. This is what the
/// scroll state needs as its viewport.
pub fn chat_viewport(area: Rect, input_height: Option<u16>, channel: &str) -> Rect {
    chat_block(channel).inner(split(area, input_height).chat)
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    let area = frame.area();
    let input_height = tui.input_box.as_ref().map(|b| b.calculate_height(area.width));
    let regions = split(area, input_height);

    let mut title_bar = TitleBar::new(
        app.session.channel.clone(),
        app.status_message.clone(),
        app.scroll.has_unseen(app.history.len()),
        !app.session.authenticated,
    );
    title_bar.render(frame, regions.title);

    MessageList::new(app, tui.show_timestamps).render(frame, regions.chat);

    if let Some(input_box) = tui.input_box.as_mut() {
        input_box.render(frame, regions.input);
    }

    let hints = if app.session.authenticated {
        HINTS_AUTHENTICATED
    } else {
        HINTS_ANONYMOUS
    };
    frame.render_widget(
        Span::styled(hints, Style::default().add_modifier(Modifier::DIM)),
        regions.footer,
    );
}
