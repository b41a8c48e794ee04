// SwiftBar / xbar menu protocol rendering
use crate::expiry::{format_expiry, ExpiryStatus};
use crate::session::SessionState;
use chrono::TimeZone;
use std::fmt::{self, Display};
use std::path::Path;

const ICON: &str = "☁️";
const SELECT_PROFILE_COMMAND: &str = "select-profile";
const CHECKMARK: &str = "✓ ";

/// One line of the menu: a label plus optional `key=value` attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    label: String,
    depth: usize,
    attrs: Vec<(String, String)>,
}

impl MenuItem {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            depth: 0,
            attrs: Vec::new(),
        }
    }

    /// Submenu nesting level, rendered as `--` per level
    pub fn depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((key.into(), value.into()));
        self
    }

    pub fn color(self, color: &str) -> Self {
        self.attr("color", color)
    }

    /// Run an external command with positional params
    pub fn bash(mut self, command: &Path, params: &[&str]) -> Self {
        self = self.attr("bash", command.display().to_string());
        for (idx, param) in params.iter().enumerate() {
            self = self.attr(format!("param{}", idx + 1), *param);
        }
        self
    }

    pub fn terminal(self, terminal: bool) -> Self {
        self.attr("terminal", terminal.to_string())
    }

    pub fn refresh(self, refresh: bool) -> Self {
        self.attr("refresh", refresh.to_string())
    }

    pub fn href(self, url: &str) -> Self {
        self.attr("href", url)
    }
}

impl Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", "--".repeat(self.depth), self.label)?;
        if !self.attrs.is_empty() {
            f.write_str(" |")?;
            for (key, value) in &self.attrs {
                write!(f, " {}={}", key, value)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum MenuLine {
    Item(MenuItem),
    Separator,
}

/// A full plugin output: title line, then dropdown body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    lines: Vec<MenuLine>,
}

impl Menu {
    pub fn new(title: MenuItem) -> Self {
        Self {
            lines: vec![MenuLine::Item(title), MenuLine::Separator],
        }
    }

    pub fn item(&mut self, item: MenuItem) -> &mut Self {
        self.lines.push(MenuLine::Item(item));
        self
    }

    pub fn text(&mut self, label: impl Into<String>) -> &mut Self {
        self.item(MenuItem::new(label))
    }

    pub fn separator(&mut self) -> &mut Self {
        self.lines.push(MenuLine::Separator);
        self
    }
}

impl Display for Menu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            match line {
                MenuLine::Item(item) => writeln!(f, "{}", item)?,
                MenuLine::Separator => writeln!(f, "---")?,
            }
        }
        Ok(())
    }
}

/// Inputs besides the session state needed to build a menu
pub struct MenuContext<'a> {
    /// This executable, re-invoked for profile switching
    pub plugin_path: &'a Path,
    /// External login/refresh script, called with the profile name
    pub login_script: &'a Path,
    pub selected_profile: &'a str,
    pub profiles: &'a [String],
}

fn status_line(status: ExpiryStatus) -> &'static str {
    match status {
        ExpiryStatus::Expired => "🔴 Session Expired",
        ExpiryStatus::Critical => "🔴 Expiring Soon",
        ExpiryStatus::Warning => "🟡 Expires in < 2 hours",
        ExpiryStatus::Active => "🟢 Session Active",
    }
}

fn login_item(label: &str, ctx: &MenuContext<'_>) -> MenuItem {
    MenuItem::new(label)
        .bash(ctx.login_script, &[ctx.selected_profile])
        .terminal(false)
}

fn profile_switcher(menu: &mut Menu, ctx: &MenuContext<'_>) {
    menu.text("Switch Profile");
    for profile in ctx.profiles {
        let checkmark = if profile == ctx.selected_profile {
            CHECKMARK
        } else {
            ""
        };
        menu.item(
            MenuItem::new(format!("{}{}", checkmark, profile))
                .depth(1)
                .bash(ctx.plugin_path, &[SELECT_PROFILE_COMMAND, profile.as_str()])
                .terminal(false)
                .refresh(true),
        );
    }
}

/// Build the menu for a resolved session
///
/// `tz` is the zone used to display the absolute expiry time.
pub fn render<Tz>(state: &SessionState, ctx: &MenuContext<'_>, tz: &Tz) -> Menu
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match state {
        SessionState::NoSession => {
            let mut menu = Menu::new(MenuItem::new(format!("{} No Session", ICON)).color("red"));
            menu.text(format!(
                "No AWS SSO session found for '{}'",
                ctx.selected_profile
            ))
            .item(login_item("🔐 Login to AWS SSO", ctx))
            .separator();
            profile_switcher(&mut menu, ctx);
            menu
        }
        // The profile switcher is not offered here, unlike the no-session menu
        SessionState::Unparsable { .. } => {
            let mut menu = Menu::new(MenuItem::new(format!("{} Error", ICON)).color("red"));
            menu.text("Could not parse expiration time");
            menu
        }
        SessionState::Valid {
            expires_at,
            classification,
            console_url,
            ..
        } => {
            let time_remaining = classification.time_remaining();
            let mut menu = Menu::new(
                MenuItem::new(format!("{} {}", ICON, time_remaining))
                    .color(classification.status.color()),
            );

            menu.text(format!("AWS SSO Status ({})", ctx.selected_profile))
                .text(format!("Expires: {}", format_expiry(expires_at, tz)))
                .text(format!("Time Remaining: {}", time_remaining))
                .text(status_line(classification.status))
                .separator();

            let action = if classification.is_expired() {
                "🔐 Login to AWS SSO"
            } else {
                "🔐 Refresh Session"
            };
            menu.item(login_item(action, ctx));

            if let Some(url) = console_url {
                menu.item(MenuItem::new("🌐 Open AWS Console").href(url));
            }

            menu.separator();
            profile_switcher(&mut menu, ctx);
            menu
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expiry::classify;
    use chrono::{Duration, FixedOffset, Utc};
    use std::path::PathBuf;

    struct Fixture {
        plugin: PathBuf,
        login: PathBuf,
        profiles: Vec<String>,
    }

    impl Fixture {
        fn new(profiles: &[&str]) -> Self {
            Self {
                plugin: PathBuf::from("/plugins/sso-status"),
                login: PathBuf::from("/plugins/login.sh"),
                profiles: profiles.iter().map(|p| p.to_string()).collect(),
            }
        }

        fn ctx<'a>(&'a self, selected: &'a str) -> MenuContext<'a> {
            MenuContext {
                plugin_path: &self.plugin,
                login_script: &self.login,
                selected_profile: selected,
                profiles: &self.profiles,
            }
        }
    }

    fn valid_state(minutes: i64, console_url: Option<&str>) -> SessionState {
        let now = Utc.with_ymd_and_hms(2025, 1, 5, 12, 0, 0).unwrap();
        let expires_at = now + Duration::minutes(minutes);
        SessionState::Valid {
            expires_at,
            classification: classify(&expires_at, &now),
            console_url: console_url.map(str::to_string),
            region: "us-east-1".to_string(),
        }
    }

    fn lines(menu: &Menu) -> Vec<String> {
        menu.to_string().lines().map(str::to_string).collect()
    }

    #[test]
    fn test_menu_item_attributes() {
        let item = MenuItem::new("x")
            .depth(1)
            .bash(Path::new("/bin/run"), &["a", "b"])
            .terminal(false)
            .refresh(true);
        assert_eq!(
            item.to_string(),
            "--x | bash=/bin/run param1=a param2=b terminal=false refresh=true"
        );
        assert_eq!(MenuItem::new("plain").to_string(), "plain");
    }

    #[test]
    fn test_no_session_menu() {
        let fixture = Fixture::new(&["default", "work"]);
        let menu = render(&SessionState::NoSession, &fixture.ctx("work"), &Utc);
        assert_eq!(
            lines(&menu),
            vec![
                "☁️ No Session | color=red",
                "---",
                "No AWS SSO session found for 'work'",
                "🔐 Login to AWS SSO | bash=/plugins/login.sh param1=work terminal=false",
                "---",
                "Switch Profile",
                "--default | bash=/plugins/sso-status param1=select-profile param2=default terminal=false refresh=true",
                "--✓ work | bash=/plugins/sso-status param1=select-profile param2=work terminal=false refresh=true",
            ]
        );
    }

    #[test]
    fn test_no_session_without_profiles() {
        let fixture = Fixture::new(&[]);
        let rendered = lines(&render(&SessionState::NoSession, &fixture.ctx("prod"), &Utc));
        assert_eq!(rendered.last().map(String::as_str), Some("Switch Profile"));
    }

    #[test]
    fn test_unparsable_menu() {
        let fixture = Fixture::new(&["work"]);
        let state = SessionState::Unparsable {
            raw: "garbage".to_string(),
        };
        let rendered = lines(&render(&state, &fixture.ctx("work"), &Utc));
        assert_eq!(
            rendered,
            vec![
                "☁️ Error | color=red",
                "---",
                "Could not parse expiration time"
            ]
        );
    }

    #[test]
    fn test_warning_menu() {
        let fixture = Fixture::new(&["work"]);
        let state = valid_state(45, Some("https://work.awsapps.com/start"));
        let rendered = lines(&render(&state, &fixture.ctx("work"), &Utc));
        assert_eq!(
            rendered,
            vec![
                "☁️ 45m | color=yellow",
                "---",
                "AWS SSO Status (work)",
                "Expires: Jan 05, 2025 12:45",
                "Time Remaining: 45m",
                "🟡 Expires in < 2 hours",
                "---",
                "🔐 Refresh Session | bash=/plugins/login.sh param1=work terminal=false",
                "🌐 Open AWS Console | href=https://work.awsapps.com/start",
                "---",
                "Switch Profile",
                "--✓ work | bash=/plugins/sso-status param1=select-profile param2=work terminal=false refresh=true",
            ]
        );
    }

    #[test]
    fn test_expired_menu_offers_login() {
        let fixture = Fixture::new(&["work"]);
        let rendered = lines(&render(&valid_state(-10, None), &fixture.ctx("work"), &Utc));
        assert_eq!(rendered[0], "☁️ Expired | color=red");
        assert!(rendered.contains(&"🔴 Session Expired".to_string()));
        assert!(rendered
            .iter()
            .any(|l| l.starts_with("🔐 Login to AWS SSO | bash=/plugins/login.sh param1=work")));
        assert!(!rendered.iter().any(|l| l.contains("href=")));
    }

    #[test]
    fn test_title_color_groups_but_status_line_distinguishes() {
        let fixture = Fixture::new(&[]);
        let critical = lines(&render(&valid_state(10, None), &fixture.ctx("p"), &Utc));
        assert_eq!(critical[0], "☁️ 10m | color=red");
        assert_eq!(critical[5], "🔴 Expiring Soon");

        let active = lines(&render(&valid_state(300, None), &fixture.ctx("p"), &Utc));
        assert_eq!(active[0], "☁️ 5h | color=#7ED321");
        assert_eq!(active[5], "🟢 Session Active");
    }

    #[test]
    fn test_expiry_uses_given_zone() {
        let fixture = Fixture::new(&[]);
        let berlin_winter = FixedOffset::east_opt(3600).unwrap();
        let rendered = lines(&render(
            &valid_state(300, None),
            &fixture.ctx("p"),
            &berlin_winter,
        ));
        assert_eq!(rendered[3], "Expires: Jan 05, 2025 18:00");
    }

    #[test]
    fn test_render_is_deterministic() {
        let fixture = Fixture::new(&["a", "b"]);
        let state = valid_state(90, Some("https://x/start"));
        let first = render(&state, &fixture.ctx("a"), &Utc).to_string();
        let second = render(&state, &fixture.ctx("a"), &Utc).to_string();
        assert_eq!(first, second);
    }
}
