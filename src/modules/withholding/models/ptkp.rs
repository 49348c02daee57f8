use serde::{Deserialize, Serialize};

/// PTKP (non-taxable income) code: marital status plus number of dependents
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PtkpCode {
    #[serde(rename = "TK/0")]
    Tk0,
    #[serde(rename = "TK/1")]
    Tk1,
    #[serde(rename = "TK/2")]
    Tk2,
    #[serde(rename = "TK/3")]
    Tk3,
    #[serde(rename = "K/0")]
    K0,
    #[serde(rename = "K/1")]
    K1,
    #[serde(rename = "K/2")]
    K2,
    #[serde(rename = "K/3")]
    K3,
}

/// TER rate table category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerCategory {
    A,
    B,
    C,
}

impl PtkpCode {
    pub const ALL: [PtkpCode; 8] = [
        Self::Tk0,
        Self::Tk1,
        Self::Tk2,
        Self::Tk3,
        Self::K0,
        Self::K1,
        Self::K2,
        Self::K3,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tk0 => "TK/0",
            Self::Tk1 => "TK/1",
            Self::Tk2 => "TK/2",
            Self::Tk3 => "TK/3",
            Self::K0 => "K/0",
            Self::K1 => "K/1",
            Self::K2 => "K/2",
            Self::K3 => "K/3",
        }
    }

    /// Lenient parse: case-insensitive, ignores whitespace, slash optional.
    /// Anything unrecognised resolves to `TK/0`, the lowest exemption.
    pub fn parse_or_default(code: &str) -> Self {
        code.parse().unwrap_or(Self::Tk0)
    }

    /// TER category per PP 58/2023
    pub fn ter_category(&self) -> TerCategory {
        match self {
            Self::Tk0 | Self::Tk1 | Self::K0 => TerCategory::A,
            Self::Tk2 | Self::Tk3 | Self::K1 | Self::K2 => TerCategory::B,
            Self::K3 => TerCategory::C,
        }
    }
}

impl std::fmt::Display for PtkpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PtkpCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '/')
            .collect::<String>()
            .to_uppercase();

        match normalized.as_str() {
            "TK0" => Ok(Self::Tk0),
            "TK1" => Ok(Self::Tk1),
            "TK2" => Ok(Self::Tk2),
            "TK3" => Ok(Self::Tk3),
            "K0" => Ok(Self::K0),
            "K1" => Ok(Self::K1),
            "K2" => Ok(Self::K2),
            "K3" => Ok(Self::K3),
            _ => Err(format!("Invalid PTKP code: {}", s)),
        }
    }
}

impl std::fmt::Display for TerCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerCategory::A => write!(f, "A"),
            TerCategory::B => write!(f, "B"),
            TerCategory::C => write!(f, "C"),
        }
    }
}

impl TryFrom<String> for TerCategory {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        match value.as_str() {
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            "C" => Ok(Self::C),
            _ => Err(format!("Invalid TER category: {}", value)),
        }
    }
}
