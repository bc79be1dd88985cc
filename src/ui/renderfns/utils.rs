use ratatui::prelude::Color;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Display color for a card's element type
pub fn type_color(card_type: &str) -> Color {
  match card_type {
    "Fire" => Color::Red,
    "Water" => Color::Blue,
    "Grass" => Color::Green,
    "Lightning" => Color::Yellow,
    "Psychic" | "Fairy" => Color::Magenta,
    "Fighting" => Color::LightRed,
    "Darkness" => Color::DarkGray,
    "Metal" => Color::Gray,
    "Dragon" => Color::LightYellow,
    _ => Color::White,
  }
}

/// Format a price in dollars with two decimals
pub fn format_price(value: f64) -> String {
  format!("${:.2}", value)
}

/// "Holofoil" from "holofoil", "Reverse holofoil" from "reverseHolofoil"
pub fn humanize_key(key: &str) -> String {
  let mut out = String::with_capacity(key.len() + 4);
  for (i, c) in key.chars().enumerate() {
    if i == 0 {
      out.extend(c.to_uppercase());
    } else if c.is_uppercase() {
      out.push(' ');
      out.extend(c.to_lowercase());
    } else {
      out.push(c);
    }
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
  }

  #[test]
  fn test_truncate_exact_length() {
    assert_eq!(truncate("hello", 5), "hello");
  }

  #[test]
  fn test_truncate_long_string() {
    assert_eq!(truncate("hello world", 8), "hello...");
  }

  #[test]
  fn test_truncate_multibyte() {
    assert_eq!(truncate("Pokémon Trainer", 8), "Pokém...");
  }

  #[test]
  fn test_type_color() {
    assert_eq!(type_color("Fire"), Color::Red);
    assert_eq!(type_color("Water"), Color::Blue);
    assert_eq!(type_color("Colorless"), Color::White);
  }

  #[test]
  fn test_format_price() {
    assert_eq!(format_price(3.0), "$3.00");
    assert_eq!(format_price(380.126), "$380.13");
  }

  #[test]
  fn test_humanize_key() {
    assert_eq!(humanize_key("holofoil"), "Holofoil");
    assert_eq!(humanize_key("reverseHolofoil"), "Reverse holofoil");
    assert_eq!(humanize_key("1stEditionHolofoil"), "1st edition holofoil");
  }
}
