//! Screen components, one per [`ScreenId`].

mod admin;
mod dashboard;
mod home;
mod item_detail;
mod item_form;
mod login;
mod register;

use crate::component::Component;
use crate::screen::ScreenId;
use crate::services::Services;

use admin::AdminScreen;
use dashboard::DashboardScreen;
use home::HomeScreen;
use item_detail::ItemDetailScreen;
use item_form::{FormMode, ItemFormScreen};
use login::LoginScreen;
use register::RegisterScreen;

/// Build every screen, each holding its own clone of the service handles.
pub fn create_screens(services: &Services) -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (
            ScreenId::Home,
            Box::new(HomeScreen::new(services.clone())) as Box<dyn Component>,
        ),
        (
            ScreenId::Dashboard,
            Box::new(DashboardScreen::new(services.clone())),
        ),
        (
            ScreenId::CreateItem,
            Box::new(ItemFormScreen::new(services.clone(), FormMode::Create)),
        ),
        (
            ScreenId::EditItem,
            Box::new(ItemFormScreen::new(services.clone(), FormMode::Edit)),
        ),
        (ScreenId::Admin, Box::new(AdminScreen::new(services.clone()))),
        (ScreenId::Login, Box::new(LoginScreen::new(services.clone()))),
        (
            ScreenId::Register,
            Box::new(RegisterScreen::new(services.clone())),
        ),
        (
            ScreenId::ItemDetail,
            Box::new(ItemDetailScreen::new(services.clone())),
        ),
    ]
}
