//! Ephemeral view state. Never part of the persisted document.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenSize {
    #[default]
    Desktop,
    Mobile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MainTab {
    #[default]
    Editor,
    Preview,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub selected_screen_size: ScreenSize,
    pub selected_main_tab: MainTab,
    pub inspector_drawer_open: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            selected_screen_size: ScreenSize::Desktop,
            selected_main_tab: MainTab::Editor,
            inspector_drawer_open: true,
        }
    }
}
