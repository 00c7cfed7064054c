use serde::Serialize;

/// The screen a client-side path resolves to.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "screen", rename_all = "camelCase")]
pub enum Screen {
    Home,
    #[serde(rename_all = "camelCase")]
    Ratios { stock_code: String },
    Screener,
    Reports,
    NotFound,
}

impl Screen {
    pub fn from_path(path: &str) -> Screen {
        let path = path.split(&['?', '#'][..]).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        if !trimmed.is_empty() && !trimmed.starts_with('/') {
            return Screen::NotFound;
        }
        let segments: Vec<&str> = trimmed.split('/').skip(1).collect();

        match segments.as_slice() {
            [] => Screen::Home,
            ["ratios", code] if !code.is_empty() => Screen::Ratios {
                stock_code: code.to_string(),
            },
            ["screener"] => Screen::Screener,
            ["reports"] => Screen::Reports,
            _ => Screen::NotFound,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub path: &'static str,
    pub label: &'static str,
    pub active: bool,
}

const NAV: [(&str, &str); 4] = [
    ("/", "Home"),
    ("/ratios/AAPL", "Stock Analysis"),
    ("/screener", "Stock Screener"),
    ("/reports", "Analyst Reports"),
];

/// Navigation bar entries. An entry is active only on an exact path match.
pub fn nav_items(current_path: &str) -> Vec<NavItem> {
    NAV.iter()
        .map(|&(path, label)| NavItem {
            path,
            label,
            active: path == current_path,
        })
        .collect()
}

#[derive(Serialize, Debug)]
pub struct ShellView {
    pub path: String,
    #[serde(flatten)]
    pub screen: Screen,
    pub nav: Vec<NavItem>,
}

impl ShellView {
    pub fn for_path(path: &str) -> Self {
        ShellView {
            path: path.to_string(),
            screen: Screen::from_path(path),
            nav: nav_items(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_paths() {
        assert_eq!(Screen::from_path("/"), Screen::Home);
        assert_eq!(Screen::from_path(""), Screen::Home);
        assert_eq!(
            Screen::from_path("/ratios/MSFT"),
            Screen::Ratios {
                stock_code: "MSFT".into()
            }
        );
        assert_eq!(Screen::from_path("/screener/"), Screen::Screener);
        assert_eq!(Screen::from_path("/reports?x=1"), Screen::Reports);
    }

    #[test]
    fn unknown_paths_are_not_found() {
        assert_eq!(Screen::from_path("/ratios"), Screen::NotFound);
        assert_eq!(Screen::from_path("/ratios/AAPL/extra"), Screen::NotFound);
        assert_eq!(Screen::from_path("/settings"), Screen::NotFound);
        assert_eq!(Screen::from_path("screener"), Screen::NotFound);
    }

    #[test]
    fn only_the_exact_path_is_active() {
        let nav = nav_items("/ratios/AAPL");
        let active: Vec<&str> = nav.iter().filter(|n| n.active).map(|n| n.label).collect();
        assert_eq!(active, ["Stock Analysis"]);

        let nav = nav_items("/ratios/MSFT");
        assert!(nav.iter().all(|n| !n.active));
    }
}
