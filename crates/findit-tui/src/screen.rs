//! Screen identifiers, tab-bar order, and per-screen access policies.

use std::fmt;

use findit_core::AccessPolicy;

/// Identifies each TUI screen. The first four are navigable by number
/// keys; the rest are reached through flows (sign-in, item selection).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    #[default]
    Home, // 1
    Dashboard, // 2
    CreateItem, // 3
    Admin, // 4
    /// Sign-in form -- not in the tab bar.
    Login,
    /// Account creation form -- not in the tab bar.
    Register,
    /// Single-item view -- reached from a listing.
    ItemDetail,
    /// Edit form -- reached from detail or dashboard.
    EditItem,
}

impl ScreenId {
    /// All screens in tab-bar order.
    pub const ALL: [ScreenId; 4] = [Self::Home, Self::Dashboard, Self::CreateItem, Self::Admin];

    /// Numeric key (1-4) for this screen. Flow screens have no number key.
    pub fn number(self) -> u8 {
        match self {
            Self::Home => 1,
            Self::Dashboard => 2,
            Self::CreateItem => 3,
            Self::Admin => 4,
            Self::Login | Self::Register | Self::ItemDetail | Self::EditItem => 0,
        }
    }

    /// Screen from a numeric key (1-4). Returns None for out-of-range.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Home),
            2 => Some(Self::Dashboard),
            3 => Some(Self::CreateItem),
            4 => Some(Self::Admin),
            _ => None,
        }
    }

    /// Next screen in tab order (wraps around).
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous screen in tab order (wraps around).
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Label for the tab bar.
    pub fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Dashboard => "Dashboard",
            Self::CreateItem => "Post Item",
            Self::Admin => "Admin",
            Self::Login => "Sign In",
            Self::Register => "Register",
            Self::ItemDetail => "Item",
            Self::EditItem => "Edit Item",
        }
    }

    /// Who may enter this screen. `None` means public.
    pub fn access_policy(self) -> Option<AccessPolicy> {
        match self {
            Self::Dashboard | Self::CreateItem | Self::EditItem => {
                Some(AccessPolicy::Authenticated)
            }
            Self::Admin => Some(AccessPolicy::Admin),
            Self::Home | Self::Login | Self::Register | Self::ItemDetail => None,
        }
    }

    /// Route name, used as the guard's recorded return path.
    pub fn route(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Dashboard => "/dashboard",
            Self::CreateItem => "/items/create",
            Self::Admin => "/admin",
            Self::Login => "/login",
            Self::Register => "/register",
            Self::ItemDetail => "/items",
            Self::EditItem => "/items/edit",
        }
    }

    /// Inverse of [`route`](Self::route).
    pub fn from_route(route: &str) -> Option<Self> {
        match route {
            "/" => Some(Self::Home),
            "/dashboard" => Some(Self::Dashboard),
            "/items/create" => Some(Self::CreateItem),
            "/admin" => Some(Self::Admin),
            "/login" => Some(Self::Login),
            "/register" => Some(Self::Register),
            "/items" => Some(Self::ItemDetail),
            "/items/edit" => Some(Self::EditItem),
            _ => None,
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use findit_core::AccessPolicy;

    #[test]
    fn number_keys_round_trip() {
        for screen in ScreenId::ALL {
            assert_eq!(ScreenId::from_number(screen.number()), Some(screen));
        }
        assert_eq!(ScreenId::from_number(9), None);
    }

    #[test]
    fn tab_cycling_wraps() {
        assert_eq!(ScreenId::Admin.next(), ScreenId::Home);
        assert_eq!(ScreenId::Home.prev(), ScreenId::Admin);
    }

    #[test]
    fn guarded_screens_carry_the_right_policy() {
        assert_eq!(ScreenId::Home.access_policy(), None);
        assert_eq!(
            ScreenId::Dashboard.access_policy(),
            Some(AccessPolicy::Authenticated)
        );
        assert_eq!(ScreenId::Admin.access_policy(), Some(AccessPolicy::Admin));
    }

    #[test]
    fn routes_round_trip() {
        for screen in [
            ScreenId::Home,
            ScreenId::Dashboard,
            ScreenId::CreateItem,
            ScreenId::Admin,
            ScreenId::Login,
            ScreenId::Register,
        ] {
            assert_eq!(ScreenId::from_route(screen.route()), Some(screen));
        }
    }
}
