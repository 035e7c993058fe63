use std::fmt;

/// Direction requested by a hall call button.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonDirection {
    Up,
    Down,
}

impl ButtonDirection {
    pub fn as_string(self) -> String {
        match self {
            ButtonDirection::Up => String::from("up"),
            ButtonDirection::Down => String::from("down"),
        }
    }

    pub fn iter() -> impl Iterator<Item = ButtonDirection> {
        [ButtonDirection::Up, ButtonDirection::Down].iter().copied()
    }
}

impl fmt::Display for ButtonDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}
