// Components - the pieces of the single screen
//
// Top to bottom: title bar, tab bar, form, result area, status bar.

pub mod form_panel;
pub mod formatters;
pub mod result_panel;
pub mod status_bar;
pub mod tab_bar;
pub mod title_bar;
