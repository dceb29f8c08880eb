//! Hash Router
//!
//! Views are addressed by `location.hash` (`#/files`, `#/lottery`, ...) so the
//! console can be served as static files behind the bot's API.

use leptos::ev;
use leptos::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Dashboard,
    Files,
    Anon,
    Lottery,
    Roles,
    Tools,
    Config,
    Faq,
    Login,
}

/// Sidebar order
pub const NAV: [Route; 8] = [
    Route::Dashboard,
    Route::Files,
    Route::Anon,
    Route::Lottery,
    Route::Roles,
    Route::Tools,
    Route::Config,
    Route::Faq,
];

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Dashboard => "/",
            Route::Files => "/files",
            Route::Anon => "/anon",
            Route::Lottery => "/lottery",
            Route::Roles => "/roles",
            Route::Tools => "/tools",
            Route::Config => "/config",
            Route::Faq => "/faq",
            Route::Login => "/login",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Route::Dashboard => "仪表盘",
            Route::Files => "文件管理",
            Route::Anon => "匿名区",
            Route::Lottery => "抽奖管理",
            Route::Roles => "身份组",
            Route::Tools => "工具",
            Route::Config => "鹅的设置",
            Route::Faq => "使用说明",
            Route::Login => "登录",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Route::Dashboard => "📊",
            Route::Files => "📁",
            Route::Anon => "🎭",
            Route::Lottery => "🎰",
            Route::Roles => "🏷️",
            Route::Tools => "🔧",
            Route::Config => "⚙️",
            Route::Faq => "❓",
            Route::Login => "🔑",
        }
    }

    pub fn href(&self) -> String {
        format!("#{}", self.path())
    }

    /// Resolve a hash path by prefix (`/files/x` and `/filesystem` are both
    /// files); anything unknown lands on the dashboard
    pub fn from_path(path: &str) -> Route {
        const PREFIXED: [Route; 8] = [
            Route::Files,
            Route::Anon,
            Route::Lottery,
            Route::Roles,
            Route::Tools,
            Route::Config,
            Route::Faq,
            Route::Login,
        ];
        PREFIXED
            .into_iter()
            .find(|route| path.starts_with(route.path()))
            .unwrap_or(Route::Dashboard)
    }

    /// Whether this nav entry should be highlighted for the current route
    pub fn is_active(&self, current: Route) -> bool {
        *self == current
    }
}

/// `"#/files"` → `"/files"`, empty → `"/"`
pub fn hash_path(hash: &str) -> &str {
    let path = hash.strip_prefix('#').unwrap_or(hash);
    if path.is_empty() {
        "/"
    } else {
        path
    }
}

pub fn current_route() -> Route {
    let hash = window().location().hash().unwrap_or_default();
    Route::from_path(hash_path(&hash))
}

pub fn navigate(route: Route) {
    if window().location().set_hash(route.path()).is_err() {
        log::warn!("[router] could not navigate to {}", route.path());
    }
}

/// Current route as a signal, updated on every `hashchange`
pub fn use_hash_route() -> ReadSignal<Route> {
    let (route, set_route) = signal(current_route());
    let handle = window_event_listener(ev::hashchange, move |_| {
        let next = current_route();
        log::debug!("[router] -> {}", next.path());
        set_route.set(next);
    });
    on_cleanup(move || handle.remove());
    route
}

/// Pull `token` out of a `?a=b&token=...` query string
pub fn token_param(search: &str) -> Option<String> {
    search
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "token")
        .map(|(_, value)| {
            let value = value.replace('+', " ");
            percent_encoding::percent_decode_str(&value)
                .decode_utf8_lossy()
                .into_owned()
        })
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hash_paths() {
        assert_eq!(Route::from_path(hash_path("")), Route::Dashboard);
        assert_eq!(Route::from_path(hash_path("#/")), Route::Dashboard);
        assert_eq!(Route::from_path(hash_path("#/files")), Route::Files);
        assert_eq!(Route::from_path(hash_path("#/lottery/12")), Route::Lottery);
        assert_eq!(Route::from_path(hash_path("#/login?next=x")), Route::Login);
        assert_eq!(Route::from_path(hash_path("#/nowhere")), Route::Dashboard);
    }

    #[test]
    fn matches_by_prefix() {
        assert_eq!(Route::from_path("/filesystem"), Route::Files);
        assert_eq!(Route::from_path("/config/"), Route::Config);
        assert_eq!(Route::from_path("files"), Route::Dashboard);
    }

    #[test]
    fn nav_paths_round_trip() {
        for route in NAV {
            assert_eq!(Route::from_path(route.path()), route);
            assert!(route.href().starts_with("#/"));
        }
        assert!(!NAV.contains(&Route::Login));
    }

    #[test]
    fn active_only_for_exact_route() {
        assert!(Route::Dashboard.is_active(Route::Dashboard));
        assert!(!Route::Dashboard.is_active(Route::Files));
    }

    #[test]
    fn extracts_token_from_query() {
        assert_eq!(token_param("?token=abc.def"), Some("abc.def".to_string()));
        assert_eq!(token_param("?x=1&token=a%2Bb"), Some("a+b".to_string()));
        assert_eq!(token_param("?token="), None);
        assert_eq!(token_param(""), None);
        assert_eq!(token_param("?tokens=1"), None);
    }

    #[test]
    fn plus_in_token_is_a_space() {
        assert_eq!(token_param("?token=a+b"), Some("a b".to_string()));
        assert_eq!(token_param("?token=a%2B+b"), Some("a+ b".to_string()));
    }
}
