use std::io;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Terminal;

use crate::api::client::ConfigClient;
use crate::core::format::summarize_config;
use crate::core::page::Page;
use crate::core::render::{
    version_label, MethodClass, NO_PLUGINS_CONFIGURED, NO_ROUTES_CONFIGURED, NO_SERVER,
};
use crate::core::{Dashboard, LoadState};

/// 菜单面板
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuPanel {
    Server,
    Plugins,
    Routes,
}

impl MenuPanel {
    const ALL: [MenuPanel; 3] = [MenuPanel::Server, MenuPanel::Plugins, MenuPanel::Routes];

    fn label(self) -> &'static str {
        match self {
            MenuPanel::Server => "Server",
            MenuPanel::Plugins => "Plugins",
            MenuPanel::Routes => "Routes",
        }
    }
}

/// 焦点区域：菜单 or 内容
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Menu,
    Content,
}

/// 输入模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// 浏览
    Normal,
    /// 编辑路由过滤串
    Filtering,
}

/// 配置来源：HTTP 客户端 + 用于阻塞等待的 runtime
pub struct Loader {
    client: ConfigClient,
    runtime: tokio::runtime::Handle,
}

impl Loader {
    pub fn new(client: ConfigClient, runtime: tokio::runtime::Handle) -> Self {
        Self { client, runtime }
    }
}

/// TUI 应用状态
pub struct App {
    dashboard: Dashboard,
    loader: Option<Loader>,
    selected_menu: usize,
    focus: Focus,
    status_message: String,
    running: bool,
    input_mode: InputMode,
    /// 过滤输入框内容
    filter_input: String,
    /// 当前选中的路由卡片
    content_selected: usize,
}

impl App {
    /// 创建 App 实例并立即加载一次配置
    pub fn new(loader: Loader) -> Self {
        let mut app = Self::build(Dashboard::new(Page::new()), Some(loader));
        app.refresh();
        app
    }

    /// 从已有 Dashboard 创建（用于测试）
    pub fn with_dashboard(dashboard: Dashboard) -> Self {
        Self::build(dashboard, None)
    }

    fn build(dashboard: Dashboard, loader: Option<Loader>) -> Self {
        Self {
            dashboard,
            loader,
            selected_menu: 0,
            focus: Focus::Menu,
            status_message: "Ready".to_string(),
            running: true,
            input_mode: InputMode::Normal,
            filter_input: String::new(),
            content_selected: 0,
        }
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn selected_panel(&self) -> MenuPanel {
        MenuPanel::ALL[self.selected_menu]
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    pub fn filter_input(&self) -> &str {
        &self.filter_input
    }

    pub fn content_selected(&self) -> usize {
        self.content_selected
    }

    fn route_count(&self) -> usize {
        self.dashboard
            .route_list()
            .map(|v| v.cards().len())
            .unwrap_or(0)
    }

    /// 重新拉取配置
    pub fn refresh(&mut self) {
        let loader = match self.loader.as_ref() {
            Some(l) => l,
            None => {
                self.set_status("No config source");
                return;
            }
        };
        let seq = self.dashboard.begin_load();
        let result = loader.runtime.block_on(loader.client.fetch_config());
        self.dashboard.complete_load(seq, result);

        self.filter_input.clear();
        self.content_selected = 0;
        let status = match self.dashboard.state() {
            LoadState::Loaded => format!("Loaded from {}", loader.client.base_url()),
            LoadState::Failed(msg) => format!("Failed to load config: {}", msg),
            LoadState::Loading => "Loading".to_string(),
        };
        self.set_status(status);
    }

    /// 启动 TUI 事件循环
    pub fn run(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal);

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> io::Result<()> {
        while self.running {
            terminal.draw(|frame| self.render(frame))?;

            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                self.handle_key(key.code);
            }
        }
        Ok(())
    }

    /// 处理键盘输入
    fn handle_key(&mut self, code: KeyCode) {
        if self.input_mode == InputMode::Filtering {
            self.handle_filter_key(code);
            return;
        }

        match code {
            KeyCode::Char('q') => self.running = false,
            KeyCode::Char('r') => self.refresh(),
            KeyCode::Char('/') => self.start_filtering(),
            KeyCode::Tab => {
                self.focus = match self.focus {
                    Focus::Menu => Focus::Content,
                    Focus::Content => Focus::Menu,
                };
            }
            _ if self.focus == Focus::Menu => self.handle_menu_key(code),
            _ if self.focus == Focus::Content => self.handle_content_key(code),
            _ => {}
        }
    }

    /// 菜单区域按键处理
    fn handle_menu_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up => {
                if self.selected_menu > 0 {
                    self.selected_menu -= 1;
                }
            }
            KeyCode::Down => {
                if self.selected_menu < MenuPanel::ALL.len() - 1 {
                    self.selected_menu += 1;
                }
            }
            KeyCode::Enter => {
                let panel = self.selected_panel();
                self.set_status(format!("Selected: {}", panel.label()));
            }
            _ => {}
        }
    }

    /// 内容区域按键处理：只有路由面板可交互
    fn handle_content_key(&mut self, code: KeyCode) {
        if self.selected_panel() != MenuPanel::Routes {
            return;
        }
        match code {
            KeyCode::Up => {
                if self.content_selected > 0 {
                    self.content_selected -= 1;
                }
            }
            KeyCode::Down => {
                let count = self.route_count();
                if count > 0 && self.content_selected < count - 1 {
                    self.content_selected += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.toggle_selected(),
            _ => {}
        }
    }

    fn toggle_selected(&mut self) {
        let idx = self.content_selected;
        match self.dashboard.toggle_route(idx) {
            Some(true) => self.set_status(format!("Expanded route #{}", idx + 1)),
            Some(false) => self.set_status(format!("Collapsed route #{}", idx + 1)),
            None => {}
        }
    }

    /// 进入过滤模式，切到路由面板
    fn start_filtering(&mut self) {
        if !matches!(self.dashboard.state(), LoadState::Loaded) {
            self.set_status("Nothing to filter");
            return;
        }
        self.selected_menu = MenuPanel::ALL
            .iter()
            .position(|p| *p == MenuPanel::Routes)
            .unwrap_or(0);
        self.focus = Focus::Content;
        self.input_mode = InputMode::Filtering;
        self.set_status("Filtering routes");
    }

    fn handle_filter_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char(c) => {
                self.filter_input.push(c);
                self.apply_filter();
            }
            KeyCode::Backspace => {
                self.filter_input.pop();
                self.apply_filter();
            }
            KeyCode::Enter | KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.set_status(format!("{} route(s) shown", self.route_count()));
            }
            _ => {}
        }
    }

    /// 每次输入都整体重渲染路由列表，选中项回到第一张
    fn apply_filter(&mut self) {
        let query = self.filter_input.clone();
        self.dashboard.set_filter_query(&query);
        self.content_selected = 0;
    }

    /// 渲染整个界面
    fn render(&self, frame: &mut ratatui::Frame) {
        let area = frame.area();

        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(3),
            ])
            .split(area);

        self.render_title(frame, outer[0]);
        self.render_body(frame, outer[1]);
        self.render_status(frame, outer[2]);
    }

    fn render_title(&self, frame: &mut ratatui::Frame, area: Rect) {
        let version = self
            .dashboard
            .config()
            .map(|c| version_label(c.version.as_deref()))
            .unwrap_or_else(|| version_label(None));
        let title = Paragraph::new(format!("Gateway Admin {}", version))
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, area);
    }

    fn render_body(&self, frame: &mut ratatui::Frame, area: Rect) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(20), Constraint::Min(1)])
            .split(area);

        self.render_menu(frame, cols[0]);
        self.render_content(frame, cols[1]);
    }

    fn render_menu(&self, frame: &mut ratatui::Frame, area: Rect) {
        let items: Vec<ListItem> = MenuPanel::ALL
            .iter()
            .enumerate()
            .map(|(i, panel)| {
                let style = if i == self.selected_menu {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                let prefix = if i == self.selected_menu { "> " } else { "  " };
                ListItem::new(format!("{}{}", prefix, panel.label())).style(style)
            })
            .collect();

        let menu = List::new(items).block(
            Block::default()
                .title(" Menu ")
                .borders(Borders::ALL)
                .border_style(self.border_style(Focus::Menu)),
        );
        frame.render_widget(menu, area);
    }

    fn border_style(&self, focus: Focus) -> Style {
        if self.focus == focus {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    }

    fn render_content(&self, frame: &mut ratatui::Frame, area: Rect) {
        let panel = self.selected_panel();
        let block = Block::default()
            .title(self.content_title(panel))
            .borders(Borders::ALL)
            .border_style(self.border_style(Focus::Content));

        // 加载失败：整个内容区替换为错误信息，菜单保留
        if let LoadState::Failed(msg) = self.dashboard.state() {
            let content = Paragraph::new(format!("Failed to load config: {}", msg))
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: false })
                .block(block);
            frame.render_widget(content, area);
            return;
        }
        let config = match self.dashboard.config() {
            Some(c) => c,
            None => {
                frame.render_widget(Paragraph::new("Loading…").block(block), area);
                return;
            }
        };

        match panel {
            MenuPanel::Server => {
                let lines = match &config.server {
                    Some(server) => vec![
                        Line::from(vec![
                            Span::styled("Port     ", Style::default().fg(Color::DarkGray)),
                            Span::raw(server.port.to_string()),
                        ]),
                        Line::from(vec![
                            Span::styled("Timeout  ", Style::default().fg(Color::DarkGray)),
                            Span::raw(format!("{} ms", server.timeout)),
                        ]),
                    ],
                    None => vec![Line::from(NO_SERVER)],
                };
                frame.render_widget(Paragraph::new(lines).block(block), area);
            }
            MenuPanel::Plugins => {
                if config.plugins.is_empty() {
                    frame.render_widget(Paragraph::new(NO_PLUGINS_CONFIGURED).block(block), area);
                    return;
                }
                let items: Vec<ListItem> = config
                    .plugins
                    .iter()
                    .map(|p| {
                        ListItem::new(vec![
                            Line::from(Span::styled(
                                p.name.clone(),
                                Style::default().add_modifier(Modifier::BOLD),
                            )),
                            Line::from(Span::styled(
                                format!("  {}", summarize_config(&p.config)),
                                Style::default().fg(Color::DarkGray),
                            )),
                        ])
                    })
                    .collect();
                frame.render_widget(List::new(items).block(block), area);
            }
            MenuPanel::Routes => self.render_routes(frame, area, block),
        }
    }

    fn render_routes(&self, frame: &mut ratatui::Frame, area: Rect, block: Block) {
        let area = if self.input_mode == InputMode::Filtering {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(1)])
                .split(area);
            let input = Paragraph::new(Line::from(vec![
                Span::raw(self.filter_input.as_str()),
                Span::styled("█", Style::default().fg(Color::Cyan)),
            ]))
            .block(Block::default().title(" Filter ").borders(Borders::ALL));
            frame.render_widget(input, rows[0]);
            rows[1]
        } else {
            area
        };

        let view = match self.dashboard.route_list() {
            Some(v) if !v.is_empty() => v,
            _ => {
                frame.render_widget(Paragraph::new(NO_ROUTES_CONFIGURED).block(block), area);
                return;
            }
        };

        let accordion = view.accordion();
        let items: Vec<ListItem> = view
            .cards()
            .iter()
            .enumerate()
            .map(|(i, card)| {
                let selected = i == self.content_selected;
                let mut lines = vec![Line::from(vec![
                    Span::raw(format!("{} ", accordion.glyph(i))),
                    Span::styled(
                        format!("{:<7}", card.method),
                        Style::default()
                            .fg(method_color(card.method_class))
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        card.path.clone(),
                        if selected {
                            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                        } else {
                            Style::default()
                        },
                    ),
                ])];
                if accordion.is_open(i) {
                    lines.extend(card.body_lines().into_iter().map(|l| {
                        Line::from(Span::styled(
                            format!("    {}", l),
                            Style::default().fg(Color::Gray),
                        ))
                    }));
                }
                ListItem::new(lines)
            })
            .collect();

        let mut state = ListState::default().with_selected(Some(self.content_selected));
        let list = List::new(items)
            .block(block)
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, area, &mut state);
    }

    /// 内容面板标题
    fn content_title(&self, panel: MenuPanel) -> String {
        match panel {
            MenuPanel::Routes => {
                let query = self.dashboard.filter_query();
                if query.is_empty() {
                    " Routes (/=filter, Enter=toggle) ".to_string()
                } else {
                    format!(" Routes [filter: {}] (/=filter, Enter=toggle) ", query)
                }
            }
            other => format!(" {} ", other.label()),
        }
    }

    fn render_status(&self, frame: &mut ratatui::Frame, area: Rect) {
        let status = Line::from(vec![
            Span::styled("Status: ", Style::default().fg(Color::DarkGray)),
            Span::styled(&self.status_message, Style::default().fg(Color::Green)),
            Span::raw(" | "),
            Span::styled(
                "q:Quit  Tab:Switch  ↑↓:Navigate  Enter:Toggle  /:Filter  r:Refresh",
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        let bar = Paragraph::new(status).block(Block::default().borders(Borders::ALL));
        frame.render_widget(bar, area);
    }
}

fn method_color(class: MethodClass) -> Color {
    match class {
        MethodClass::Get => Color::Green,
        MethodClass::Post => Color::Yellow,
        MethodClass::Put => Color::Blue,
        MethodClass::Delete => Color::Red,
        MethodClass::Patch => Color::Magenta,
        MethodClass::Other => Color::Gray,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::accordion::{GLYPH_CLOSED, GLYPH_OPEN};
    use crate::error::DashboardError;
    use ratatui::backend::TestBackend;

    fn config_json() -> &'static str {
        r#"{
            "version": "1.0",
            "server": {"port": 8080, "timeout": 5000},
            "plugins": [{"name": "logger", "config": {"level": "info"}}],
            "routes": [
                {"path": "/users", "method": "GET",
                 "backends": [{"url": "http://users", "method": "GET", "timeout": 200}]},
                {"path": "/users", "method": "POST"},
                {"path": "/orders", "method": "DELETE"}
            ]
        }"#
    }

    fn test_app() -> App {
        let mut dash = Dashboard::new(Page::new());
        let seq = dash.begin_load();
        dash.complete_load(seq, Ok(serde_json::from_str(config_json()).unwrap()));
        App::with_dashboard(dash)
    }

    fn failed_app() -> App {
        let mut dash = Dashboard::new(Page::new());
        let seq = dash.begin_load();
        dash.complete_load(seq, Err(DashboardError::Load { status: 500 }));
        App::with_dashboard(dash)
    }

    fn goto_routes(app: &mut App) {
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Tab);
    }

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_initial_state() {
        let app = test_app();
        assert_eq!(app.selected_panel(), MenuPanel::Server);
        assert_eq!(app.focus(), Focus::Menu);
        assert_eq!(app.status_message(), "Ready");
        assert!(app.is_running());
        assert_eq!(app.input_mode(), InputMode::Normal);
    }

    #[test]
    fn test_menu_navigation() {
        let mut app = test_app();
        app.handle_key(KeyCode::Down);
        assert_eq!(app.selected_panel(), MenuPanel::Plugins);
        for _ in 0..5 {
            app.handle_key(KeyCode::Down);
        }
        assert_eq!(app.selected_panel(), MenuPanel::Routes);
        app.handle_key(KeyCode::Up);
        app.handle_key(KeyCode::Up);
        app.handle_key(KeyCode::Up);
        assert_eq!(app.selected_panel(), MenuPanel::Server);
    }

    #[test]
    fn test_tab_switches_focus() {
        let mut app = test_app();
        app.handle_key(KeyCode::Tab);
        assert_eq!(app.focus(), Focus::Content);
        app.handle_key(KeyCode::Tab);
        assert_eq!(app.focus(), Focus::Menu);
    }

    #[test]
    fn test_quit() {
        let mut app = test_app();
        app.handle_key(KeyCode::Char('q'));
        assert!(!app.is_running());
    }

    #[test]
    fn test_enter_toggles_route() {
        let mut app = test_app();
        goto_routes(&mut app);
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Enter);
        let acc = app.dashboard().route_list().unwrap().accordion();
        assert!(acc.is_open(1));
        assert!(!acc.is_open(0));
        assert_eq!(app.status_message(), "Expanded route #2");

        app.handle_key(KeyCode::Enter);
        let acc = app.dashboard().route_list().unwrap().accordion();
        assert_eq!(acc.glyph(1), GLYPH_CLOSED);
    }

    #[test]
    fn test_multiple_cards_open() {
        let mut app = test_app();
        goto_routes(&mut app);
        app.handle_key(KeyCode::Enter);
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Char(' '));
        assert_eq!(app.dashboard().route_list().unwrap().accordion().open_count(), 2);
    }

    #[test]
    fn test_content_navigation_bounds() {
        let mut app = test_app();
        goto_routes(&mut app);
        for _ in 0..10 {
            app.handle_key(KeyCode::Down);
        }
        assert_eq!(app.content_selected(), 2);
        app.handle_key(KeyCode::Up);
        assert_eq!(app.content_selected(), 1);
    }

    #[test]
    fn test_filter_typing() {
        let mut app = test_app();
        app.handle_key(KeyCode::Char('/'));
        assert_eq!(app.input_mode(), InputMode::Filtering);
        assert_eq!(app.selected_panel(), MenuPanel::Routes);

        for c in "post".chars() {
            app.handle_key(KeyCode::Char(c));
        }
        let view = app.dashboard().route_list().unwrap();
        assert_eq!(view.cards().len(), 1);
        assert_eq!(view.cards()[0].method, "POST");

        app.handle_key(KeyCode::Char('x'));
        assert!(app.dashboard().route_list().unwrap().is_empty());

        app.handle_key(KeyCode::Backspace);
        assert_eq!(app.filter_input(), "post");
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.input_mode(), InputMode::Normal);
        assert_eq!(app.status_message(), "1 route(s) shown");
    }

    #[test]
    fn test_q_does_not_quit_while_filtering() {
        let mut app = test_app();
        app.handle_key(KeyCode::Char('/'));
        app.handle_key(KeyCode::Char('q'));
        assert!(app.is_running());
        assert_eq!(app.filter_input(), "q");
    }

    #[test]
    fn test_filter_resets_accordion() {
        let mut app = test_app();
        goto_routes(&mut app);
        app.handle_key(KeyCode::Enter);
        app.handle_key(KeyCode::Char('/'));
        app.handle_key(KeyCode::Char('u'));
        let view = app.dashboard().route_list().unwrap();
        assert_eq!(view.accordion().open_count(), 0);
        assert_eq!(app.content_selected(), 0);
    }

    #[test]
    fn test_refresh_without_source() {
        let mut app = test_app();
        app.handle_key(KeyCode::Char('r'));
        assert_eq!(app.status_message(), "No config source");
        assert_eq!(app.dashboard().state(), &LoadState::Loaded);
    }

    #[test]
    fn test_filter_unavailable_after_failure() {
        let mut app = failed_app();
        app.handle_key(KeyCode::Char('/'));
        assert_eq!(app.input_mode(), InputMode::Normal);
        assert_eq!(app.status_message(), "Nothing to filter");
    }

    #[test]
    fn test_render_server_panel() {
        let screen = draw(&test_app());
        assert!(screen.contains("Gateway Admin v1.0"));
        assert!(screen.contains("8080"));
        assert!(screen.contains("5000 ms"));
    }

    #[test]
    fn test_render_routes_expanded() {
        let mut app = test_app();
        goto_routes(&mut app);
        app.handle_key(KeyCode::Enter);
        let screen = draw(&app);
        assert!(screen.contains(&format!("{} GET", GLYPH_OPEN)));
        assert!(screen.contains("GET http://users (200ms)"));
        assert!(screen.contains("No plugins"));
    }

    #[test]
    fn test_render_failure() {
        let screen = draw(&failed_app());
        assert!(screen.contains("Failed to load config: Config load failed: 500"));
        assert!(screen.contains("Menu"));
    }
}
