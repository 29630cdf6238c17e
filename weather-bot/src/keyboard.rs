use teloxide::types::{KeyboardButton, KeyboardMarkup};

/// Menu button labels. Incoming messages matching these are treated as
/// selections, everything else as free text.
pub const CURRENT_WEATHER: &str = "Current weather 🌤️";
pub const WEATHER_HISTORY: &str = "Weather history (1 month)";

/// Main menu shown whenever the dialogue is idle.
pub fn main_menu() -> KeyboardMarkup {
    KeyboardMarkup::new([[
        KeyboardButton::new(CURRENT_WEATHER),
        KeyboardButton::new(WEATHER_HISTORY),
    ]])
    .resize_keyboard()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_has_one_row_with_both_reports() {
        let menu = main_menu();
        assert_eq!(menu.keyboard.len(), 1);
        let labels: Vec<&str> = menu.keyboard[0].iter().map(|b| b.text.as_str()).collect();
        assert_eq!(labels, vec![CURRENT_WEATHER, WEATHER_HISTORY]);
    }
}
